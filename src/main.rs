// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::io::Write;
use std::sync::Arc;

use anyhow::Result;

use finflow::commands::{self, Context};
use finflow::dates::{Clock, FixedClock, SystemClock};
use finflow::notify::{Notification, NotificationBus};
use finflow::{cli, config, db, logging, utils};

/// Pins "today" to a `YYYY-MM-DD` date, for reproducible output.
const TODAY_ENV: &str = "FINFLOW_TODAY";

fn clock() -> Result<Arc<dyn Clock>> {
    match std::env::var(TODAY_ENV) {
        Ok(raw) if !raw.trim().is_empty() => Ok(Arc::new(FixedClock::on(utils::parse_date(&raw)?))),
        _ => Ok(Arc::new(SystemClock)),
    }
}

fn print_notification(n: &Notification) -> anyhow::Result<()> {
    let mut err = std::io::stderr().lock();
    match &n.message {
        Some(message) => writeln!(err, "[{}] {} {}", n.kind, n.title, message)?,
        None => writeln!(err, "[{}] {}", n.kind, n.title)?,
    }
    Ok(())
}

fn main() -> Result<()> {
    let cli = cli::build_cli();
    let matches = cli.get_matches();

    let settings = config::load_settings();
    logging::init(&settings.log_level);

    let conn = db::open_or_init()?;
    let bus = NotificationBus::new();
    bus.subscribe(print_notification);

    let mut ctx = Context::new(conn, settings, clock()?, bus);
    if let Ok(path) = config::settings_path() {
        ctx = ctx.with_settings_path(path);
    }

    match matches.subcommand() {
        Some(("init", _)) => {
            println!("Database initialized at {}", db::db_path()?.display());
        }
        Some(("tx", sub)) => commands::transactions::handle(&ctx, sub)?,
        Some(("salary", sub)) => commands::salary::handle(&ctx, sub)?,
        Some(("report", sub)) => commands::reports::handle(&ctx, sub)?,
        Some(("export", sub)) => commands::exporter::handle(&ctx, sub)?,
        Some(("data", sub)) => commands::data::handle(&ctx, sub)?,
        Some(("auth", sub)) => commands::auth::handle(&ctx, sub)?,
        Some(("config", sub)) => commands::config::handle(&ctx, sub)?,
        _ => {
            cli::build_cli().print_help()?;
            println!();
        }
    }
    Ok(())
}
