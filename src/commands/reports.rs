// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Result, anyhow};
use serde::Serialize;

use super::Context;
use crate::metrics::{self, ChartSlice, ChartStatistics, PeriodStats};
use crate::models::TransactionKind;
use crate::utils::{fmt_money, fmt_percent, maybe_print_json, parse_date, pretty_table};

pub fn handle(ctx: &Context, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("overview", sub)) => overview(ctx, sub)?,
        Some(("dashboard", sub)) => dashboard(ctx, sub)?,
        Some(("month", sub)) => month(ctx, sub)?,
        Some(("week", sub)) => week(ctx, sub)?,
        Some(("categories", sub)) => categories(ctx, sub)?,
        Some(("chart", sub)) => chart(ctx, sub)?,
        Some(("monthly", sub)) => monthly(ctx, sub)?,
        _ => {}
    }
    Ok(())
}

fn json_requested<T: Serialize>(sub: &clap::ArgMatches, v: &T) -> Result<bool> {
    maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), v)
}

fn overview(ctx: &Context, sub: &clap::ArgMatches) -> Result<()> {
    let ledger = ctx.ledger()?;
    let data = metrics::overview(ledger.transactions(), ledger.salary());
    if json_requested(sub, &data)? {
        return Ok(());
    }
    let ccy = ledger.currency();
    let rows = vec![
        vec!["Salary".into(), fmt_money(&ledger.salary(), ccy)],
        vec!["Income".into(), fmt_money(&data.total_income, ccy)],
        vec!["Expenses".into(), fmt_money(&data.total_expenses, ccy)],
        vec!["Balance".into(), fmt_money(&data.balance, ccy)],
        vec!["Available".into(), fmt_money(&data.total_available, ccy)],
        vec!["Spent".into(), fmt_percent(&data.expense_percentage)],
        vec!["Savings".into(), fmt_money(&data.savings, ccy)],
        vec!["Saved".into(), fmt_percent(&data.savings_percentage)],
    ];
    println!("{}", pretty_table(&["Metric", "Value"], rows));
    Ok(())
}

fn dashboard(ctx: &Context, sub: &clap::ArgMatches) -> Result<()> {
    let ledger = ctx.ledger()?;
    let data = metrics::dashboard(ledger.snapshot(), ctx.clock.now(), ctx.settings.week_start);
    if json_requested(sub, &data)? {
        return Ok(());
    }
    let ccy = ledger.currency();
    let rows = vec![
        vec![
            "Overall".into(),
            fmt_money(&data.overview.total_income, ccy),
            fmt_money(&data.overview.total_expenses, ccy),
            fmt_money(&data.overview.balance, ccy),
            ledger.transactions().len().to_string(),
        ],
        vec![
            "This month".into(),
            fmt_money(&data.monthly_income, ccy),
            fmt_money(&data.monthly_expenses, ccy),
            fmt_money(&data.monthly_balance, ccy),
            data.month_transaction_count.to_string(),
        ],
        vec![
            "This week".into(),
            fmt_money(&data.weekly_income, ccy),
            fmt_money(&data.weekly_expenses, ccy),
            fmt_money(&(data.weekly_income - data.weekly_expenses), ccy),
            data.week_transaction_count.to_string(),
        ],
    ];
    println!(
        "{}",
        pretty_table(&["Period", "Income", "Expenses", "Balance", "Count"], rows)
    );
    println!(
        "Salary {} | {} of available income spent",
        fmt_money(&data.salary, ccy),
        fmt_percent(&data.overview.expense_percentage)
    );
    Ok(())
}

fn print_period(ctx: &Context, sub: &clap::ArgMatches, stats: &PeriodStats) -> Result<()> {
    if json_requested(sub, stats)? {
        return Ok(());
    }
    let ccy = &ctx.settings.currency_symbol;
    let row = vec![
        stats.period.clone(),
        fmt_money(&stats.income, ccy),
        fmt_money(&stats.expenses, ccy),
        fmt_money(&stats.balance, ccy),
        stats.transaction_count.to_string(),
    ];
    println!(
        "{}",
        pretty_table(&["Period", "Income", "Expenses", "Balance", "Count"], vec![row])
    );
    Ok(())
}

fn month(ctx: &Context, sub: &clap::ArgMatches) -> Result<()> {
    let ledger = ctx.ledger()?;
    let stats = metrics::current_month_stats(ledger.transactions(), ctx.clock.now());
    print_period(ctx, sub, &stats)
}

fn week(ctx: &Context, sub: &clap::ArgMatches) -> Result<()> {
    let ledger = ctx.ledger()?;
    let stats = metrics::weekly_stats(ledger.transactions(), ctx.clock.now(), ctx.settings.week_start);
    print_period(ctx, sub, &stats)
}

fn categories(ctx: &Context, sub: &clap::ArgMatches) -> Result<()> {
    let ledger = ctx.ledger()?;
    let from = sub.get_one::<String>("from").map(|s| parse_date(s)).transpose()?;
    let to = sub.get_one::<String>("to").map(|s| parse_date(s)).transpose()?;
    let txs: Vec<_> = ledger
        .transactions()
        .iter()
        .filter(|t| from.is_none_or(|d| t.date >= d) && to.is_none_or(|d| t.date <= d))
        .cloned()
        .collect();
    let data = metrics::category_stats(&txs);
    if json_requested(sub, &data)? {
        return Ok(());
    }
    let ccy = ledger.currency();
    let rows: Vec<Vec<String>> = data
        .iter()
        .map(|c| {
            vec![
                c.name.clone(),
                fmt_money(&c.income, ccy),
                fmt_money(&c.expenses, ccy),
                c.count.to_string(),
                fmt_percent(&c.percentage),
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(&["Category", "Income", "Expenses", "Count", "Share"], rows)
    );
    Ok(())
}

#[derive(Serialize)]
struct ChartReport {
    kind: TransactionKind,
    slices: Vec<ChartSlice>,
    statistics: ChartStatistics,
}

fn chart(ctx: &Context, sub: &clap::ArgMatches) -> Result<()> {
    let kind: TransactionKind = sub
        .get_one::<String>("type")
        .map(String::as_str)
        .unwrap_or("expense")
        .parse()
        .map_err(|e: String| anyhow!(e))?;
    let ledger = ctx.ledger()?;
    let mut slices = metrics::category_breakdown(ledger.transactions(), kind);
    if sub.get_flag("bar") {
        slices = metrics::bar_series(&slices);
    }
    let report = ChartReport {
        kind,
        statistics: metrics::chart_statistics(&slices),
        slices,
    };
    if json_requested(sub, &report)? {
        return Ok(());
    }
    let ccy = ledger.currency();
    let rows: Vec<Vec<String>> = report
        .slices
        .iter()
        .map(|s| {
            vec![
                s.name.clone(),
                fmt_money(&s.value, ccy),
                format!("{}%", s.percentage),
                s.color.to_string(),
            ]
        })
        .collect();
    println!("{}", pretty_table(&["Category", "Total", "Share", "Color"], rows));
    println!(
        "Top category {}% | average {}%",
        report.statistics.top_percentage, report.statistics.average_percentage
    );
    Ok(())
}

fn monthly(ctx: &Context, sub: &clap::ArgMatches) -> Result<()> {
    let ledger = ctx.ledger()?;
    let data = metrics::monthly_totals(ledger.transactions());
    if json_requested(sub, &data)? {
        return Ok(());
    }
    let ccy = ledger.currency();
    let rows: Vec<Vec<String>> = data
        .iter()
        .map(|m| {
            vec![
                m.label.clone(),
                fmt_money(&m.income, ccy),
                fmt_money(&m.expenses, ccy),
                fmt_money(&(m.income - m.expenses), ccy),
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(&["Month", "Income", "Expenses", "Net"], rows)
    );
    Ok(())
}
