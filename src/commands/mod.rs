// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

pub mod auth;
pub mod config;
pub mod data;
pub mod exporter;
pub mod reports;
pub mod salary;
pub mod transactions;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use rusqlite::Connection;

use crate::config::Settings;
use crate::dates::Clock;
use crate::db;
use crate::error::StorageError;
use crate::ledger::Ledger;
use crate::metrics::ViewOptions;
use crate::notify::{Notification, NotificationBus};

/// What every command handler needs: storage, settings, the clock and the bus.
pub struct Context {
    pub conn: Connection,
    pub settings: Settings,
    pub settings_path: Option<PathBuf>,
    pub clock: Arc<dyn Clock>,
    pub bus: NotificationBus,
}

impl Context {
    pub fn new(conn: Connection, settings: Settings, clock: Arc<dyn Clock>, bus: NotificationBus) -> Self {
        Self {
            conn,
            settings,
            settings_path: None,
            clock,
            bus,
        }
    }

    pub fn with_settings_path(mut self, path: PathBuf) -> Self {
        self.settings_path = Some(path);
        self
    }

    /// The persisted ledger, wired to this context's clock and bus.
    pub fn ledger(&self) -> Result<Ledger> {
        let snapshot = db::load_financial(&self.conn)?;
        Ok(Ledger::from_snapshot(snapshot, self.clock.clone(), self.bus.clone())
            .with_currency(self.settings.currency_symbol.clone()))
    }

    /// Persists the ledger. A failed write is announced on the bus as an error.
    pub fn save(&self, ledger: &Ledger) -> Result<()> {
        self.persisted(db::save_financial(&self.conn, ledger.snapshot()))
    }

    pub fn persisted(&self, outcome: Result<(), StorageError>) -> Result<()> {
        if let Err(err) = outcome {
            tracing::error!("could not persist data: {err}");
            self.bus
                .publish(Notification::error("Failed to save data", err.to_string()));
            return Err(err.into());
        }
        Ok(())
    }

    pub fn view_options(&self) -> ViewOptions<'_> {
        ViewOptions {
            now: self.clock.now(),
            locale: self.settings.locale,
            currency: &self.settings.currency_symbol,
        }
    }
}
