// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Result, bail};

use super::Context;
use crate::dates;
use crate::notify::Notification;
use crate::utils::{fmt_money, maybe_print_json, pretty_table};
use crate::validation::{SalaryForm, summarize};

pub fn handle(ctx: &Context, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("set", sub)) => set(ctx, sub)?,
        Some(("show", sub)) => show(ctx, sub)?,
        _ => {}
    }
    Ok(())
}

fn set(ctx: &Context, sub: &clap::ArgMatches) -> Result<()> {
    let form = SalaryForm {
        amount: sub.get_one::<String>("amount").cloned().unwrap_or_default(),
        receipt_date: sub
            .get_one::<String>("receipt_date")
            .cloned()
            .unwrap_or_else(|| dates::today_string(ctx.clock.as_ref())),
        source: sub.get_one::<String>("source").cloned().unwrap_or_default(),
    };
    let salary = match form.validate() {
        Ok(salary) => salary,
        Err(errors) => {
            let message = summarize(&errors);
            ctx.bus
                .publish(Notification::error("Failed to set salary", message.clone()));
            bail!(message);
        }
    };

    let mut ledger = ctx.ledger()?;
    ledger.set_salary(salary)?;
    ctx.save(&ledger)?;
    Ok(())
}

fn show(ctx: &Context, sub: &clap::ArgMatches) -> Result<()> {
    let ledger = ctx.ledger()?;
    let salary = ledger.salary_details();
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), salary)? {
        return Ok(());
    }
    let row = vec![
        fmt_money(&salary.amount, ledger.currency()),
        salary.receipt_date.map(dates::format_date).unwrap_or_default(),
        salary.source.clone().unwrap_or_default(),
    ];
    println!("{}", pretty_table(&["Amount", "Received", "Source"], vec![row]));
    Ok(())
}
