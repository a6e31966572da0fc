// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;

use super::Context;

pub fn handle(ctx: &Context, m: &clap::ArgMatches) -> Result<()> {
    let mut ledger = ctx.ledger()?;
    match m.subcommand() {
        Some(("demo", _)) => ledger.load_demo_data(),
        Some(("clear", _)) => ledger.clear_all_data(),
        _ => return Ok(()),
    }
    ctx.save(&ledger)?;
    println!(
        "{} transactions, salary {}",
        ledger.transactions().len(),
        crate::utils::fmt_money(&ledger.salary(), ledger.currency())
    );
    Ok(())
}
