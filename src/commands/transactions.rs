// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Result, anyhow, bail};

use super::Context;
use crate::dates;
use crate::metrics::{self, TransactionFilter, TransactionView};
use crate::models::{TransactionKind, TransactionPatch};
use crate::notify::Notification;
use crate::utils::{maybe_print_json, parse_date, parse_decimal, parse_month, pretty_table};
use crate::validation::{TransactionForm, summarize};

pub fn handle(ctx: &Context, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(ctx, sub)?,
        Some(("list", sub)) => list(ctx, sub)?,
        Some(("recent", sub)) => recent(ctx, sub)?,
        Some(("month", sub)) => month(ctx, sub)?,
        Some(("range", sub)) => range(ctx, sub)?,
        Some(("rm", sub)) => remove(ctx, sub)?,
        Some(("edit", sub)) => edit(ctx, sub)?,
        _ => {}
    }
    Ok(())
}

fn arg(sub: &clap::ArgMatches, name: &str) -> String {
    sub.get_one::<String>(name).cloned().unwrap_or_default()
}

fn parse_kind(raw: &str) -> Result<TransactionKind> {
    raw.parse().map_err(|e: String| anyhow!(e))
}

fn add(ctx: &Context, sub: &clap::ArgMatches) -> Result<()> {
    let form = TransactionForm {
        kind: arg(sub, "type"),
        category: arg(sub, "category"),
        amount: arg(sub, "amount"),
        description: arg(sub, "description"),
        date: sub
            .get_one::<String>("date")
            .cloned()
            .unwrap_or_else(|| dates::today_string(ctx.clock.as_ref())),
    };
    let new = match form.validate() {
        Ok(new) => new,
        Err(errors) => {
            let message = summarize(&errors);
            ctx.bus
                .publish(Notification::error("Failed to add transaction", message.clone()));
            bail!(message);
        }
    };

    let mut ledger = ctx.ledger()?;
    let tx = ledger.add_transaction(new)?;
    ctx.save(&ledger)?;
    println!("Recorded {} #{} in '{}'", tx.kind, tx.id, tx.category);
    Ok(())
}

fn print_views(sub: &clap::ArgMatches, views: &[TransactionView]) -> Result<()> {
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &views)? {
        return Ok(());
    }
    let rows: Vec<Vec<String>> = views
        .iter()
        .map(|v| {
            vec![
                v.transaction.id.to_string(),
                v.formatted_date.clone(),
                v.relative_time.clone(),
                v.kind_label.to_string(),
                v.transaction.category.clone(),
                v.formatted_amount.clone(),
                v.transaction.description.clone(),
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(
            &["ID", "Date", "When", "Type", "Category", "Amount", "Description"],
            rows,
        )
    );
    Ok(())
}

fn list(ctx: &Context, sub: &clap::ArgMatches) -> Result<()> {
    let views = query_rows(ctx, sub)?;
    print_views(sub, &views)
}

/// Transactions matching the `tx list` filters, newest first.
pub fn query_rows(ctx: &Context, sub: &clap::ArgMatches) -> Result<Vec<TransactionView>> {
    let ledger = ctx.ledger()?;
    let from = sub.get_one::<String>("from").map(|s| parse_date(s)).transpose()?;
    let to = sub.get_one::<String>("to").map(|s| parse_date(s)).transpose()?;
    let range = match (from, to) {
        (None, None) => None,
        (start, end) => Some((
            start.unwrap_or(chrono::NaiveDate::MIN),
            end.unwrap_or(chrono::NaiveDate::MAX),
        )),
    };
    let filter = TransactionFilter {
        range,
        kind: sub.get_one::<String>("type").map(|s| parse_kind(s)).transpose()?,
        category: sub.get_one::<String>("category").cloned(),
    };

    let mut views = metrics::transaction_views(ledger.transactions(), &filter, &ctx.view_options());
    if let Some(limit) = sub.get_one::<usize>("limit") {
        views.truncate(*limit);
    }
    Ok(views)
}

fn recent(ctx: &Context, sub: &clap::ArgMatches) -> Result<()> {
    let days = sub
        .get_one::<u32>("days")
        .copied()
        .unwrap_or(ctx.settings.recent_days);
    let ledger = ctx.ledger()?;
    let views = metrics::recent_views(ledger.transactions(), days, &ctx.view_options());
    print_views(sub, &views)
}

fn month(ctx: &Context, sub: &clap::ArgMatches) -> Result<()> {
    let (year, month) = match sub.get_one::<String>("month") {
        Some(raw) => {
            let (y, m) = parse_month(raw)?;
            (Some(y), Some(m))
        }
        None => (None, None),
    };
    let ledger = ctx.ledger()?;
    let txs = ledger.monthly_transactions(year, month);
    let views = metrics::transaction_views(&txs, &TransactionFilter::default(), &ctx.view_options());
    print_views(sub, &views)
}

fn range(ctx: &Context, sub: &clap::ArgMatches) -> Result<()> {
    let start = parse_date(&arg(sub, "from"))?;
    let end = parse_date(&arg(sub, "to"))?;
    if start > end {
        bail!("--from {} is after --to {}", start, end);
    }
    let ledger = ctx.ledger()?;
    let txs = ledger.transactions_by_date_range(start, end);
    let views = metrics::transaction_views(&txs, &TransactionFilter::default(), &ctx.view_options());
    print_views(sub, &views)
}

fn remove(ctx: &Context, sub: &clap::ArgMatches) -> Result<()> {
    let id = *sub
        .get_one::<i64>("id")
        .ok_or_else(|| anyhow!("missing transaction id"))?;
    let mut ledger = ctx.ledger()?;
    let removed = ledger.remove_transaction(id)?;
    ctx.save(&ledger)?;
    println!("Removed #{} ({})", removed.id, removed.category);
    Ok(())
}

fn edit(ctx: &Context, sub: &clap::ArgMatches) -> Result<()> {
    let id = *sub
        .get_one::<i64>("id")
        .ok_or_else(|| anyhow!("missing transaction id"))?;
    let patch = TransactionPatch {
        kind: sub.get_one::<String>("type").map(|s| parse_kind(s)).transpose()?,
        category: sub.get_one::<String>("category").map(|s| s.trim().to_string()),
        amount: sub
            .get_one::<String>("amount")
            .map(|s| parse_decimal(s))
            .transpose()?,
        description: sub.get_one::<String>("description").map(|s| s.trim().to_string()),
        date: sub.get_one::<String>("date").map(|s| parse_date(s)).transpose()?,
    };
    let mut ledger = ctx.ledger()?;
    let updated = ledger.update_transaction(id, patch)?;
    ctx.save(&ledger)?;
    println!("Updated #{} ({})", updated.id, updated.category);
    Ok(())
}
