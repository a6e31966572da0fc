// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context as _, Result};

use super::Context;
use crate::config::{save_settings_to, settings_path};
use crate::utils::{maybe_print_json, pretty_table};

pub fn handle(ctx: &Context, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("show", sub)) => show(ctx, sub)?,
        Some(("set", sub)) => set(ctx, sub)?,
        _ => {}
    }
    Ok(())
}

fn show(ctx: &Context, sub: &clap::ArgMatches) -> Result<()> {
    let s = &ctx.settings;
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), s)? {
        return Ok(());
    }
    let rows = vec![
        vec!["currency_symbol".into(), s.currency_symbol.clone()],
        vec!["locale".into(), s.locale.to_string()],
        vec!["week_start".into(), s.week_start.to_string()],
        vec!["recent_days".into(), s.recent_days.to_string()],
        vec!["log_level".into(), s.log_level.clone()],
    ];
    println!("{}", pretty_table(&["Key", "Value"], rows));
    Ok(())
}

fn set(ctx: &Context, sub: &clap::ArgMatches) -> Result<()> {
    let key = sub.get_one::<String>("key").context("key is required")?;
    let value = sub.get_one::<String>("value").context("value is required")?;
    let mut settings = ctx.settings.clone();
    settings.set(key, value)?;
    let path = match &ctx.settings_path {
        Some(path) => path.clone(),
        None => settings_path()?,
    };
    save_settings_to(&path, &settings)?;
    println!("Set {} = {} in {}", key, value, path.display());
    Ok(())
}
