// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! The transaction store: owns the transactions and the salary, validates
//! every mutation and announces the outcome on the notification bus.

use std::sync::{Arc, Mutex};

use chrono::{Datelike, Duration, NaiveDate};
use rust_decimal::Decimal;

use crate::dates::{self, Clock};
use crate::error::{LedgerError, ValidationError};
use crate::models::{
    FinancialSnapshot, NewTransaction, Salary, Transaction, TransactionKind, TransactionPatch,
};
use crate::notify::{Notification, NotificationBus};
use crate::utils::fmt_money;

pub const DEFAULT_CURRENCY: &str = "R$";

/// Largest amount a transaction or salary may carry (10^15). Keeps every
/// aggregate well inside `Decimal`'s range.
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(0xA4C6_8000, 0x3_8D7E, 0, false, 0);

/// A ledger shared between threads. Holding the lock for the duration of a
/// mutation keeps every mutation all-or-nothing.
pub type SharedLedger = Arc<Mutex<Ledger>>;

pub struct Ledger {
    snapshot: FinancialSnapshot,
    last_id: i64,
    clock: Arc<dyn Clock>,
    bus: NotificationBus,
    currency: String,
}

impl std::fmt::Debug for Ledger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Ledger")
            .field("transactions", &self.snapshot.transactions.len())
            .field("salary", &self.snapshot.salary.amount)
            .field("currency", &self.currency)
            .finish()
    }
}

pub(crate) fn validate(
    category: &str,
    amount: Decimal,
    date: NaiveDate,
    today: NaiveDate,
) -> Result<(), ValidationError> {
    if category.trim().is_empty() {
        return Err(ValidationError::MissingCategory);
    }
    if amount <= Decimal::ZERO {
        return Err(ValidationError::NonPositiveAmount(amount));
    }
    if amount > MAX_AMOUNT {
        return Err(ValidationError::AmountTooLarge(amount));
    }
    if date > today {
        return Err(ValidationError::FutureDate(date));
    }
    Ok(())
}

fn describe(kind: TransactionKind, verb: &str) -> String {
    format!("{} {}!", kind.label(), verb)
}

impl Ledger {
    pub fn new(clock: Arc<dyn Clock>, bus: NotificationBus) -> Self {
        Self::from_snapshot(FinancialSnapshot::default(), clock, bus)
    }

    pub fn from_snapshot(
        snapshot: FinancialSnapshot,
        clock: Arc<dyn Clock>,
        bus: NotificationBus,
    ) -> Self {
        let last_id = snapshot
            .transactions
            .iter()
            .map(|t| t.id)
            .max()
            .unwrap_or(0);
        Self {
            snapshot,
            last_id,
            clock,
            bus,
            currency: DEFAULT_CURRENCY.to_string(),
        }
    }

    pub fn with_currency(mut self, currency: impl Into<String>) -> Self {
        self.currency = currency.into();
        self
    }

    pub fn into_shared(self) -> SharedLedger {
        Arc::new(Mutex::new(self))
    }

    pub fn clock(&self) -> &dyn Clock {
        self.clock.as_ref()
    }

    pub fn bus(&self) -> &NotificationBus {
        &self.bus
    }

    pub fn currency(&self) -> &str {
        &self.currency
    }

    pub fn transactions(&self) -> &[Transaction] {
        &self.snapshot.transactions
    }

    pub fn salary(&self) -> Decimal {
        self.snapshot.salary.amount
    }

    pub fn salary_details(&self) -> &Salary {
        &self.snapshot.salary
    }

    pub fn snapshot(&self) -> &FinancialSnapshot {
        &self.snapshot
    }

    pub fn get(&self, id: i64) -> Option<&Transaction> {
        self.snapshot.transactions.iter().find(|t| t.id == id)
    }

    fn summary(&self, category: &str, amount: Decimal, date: NaiveDate) -> String {
        format!(
            "{}: {} ({})",
            category,
            fmt_money(&amount, &self.currency),
            dates::format_date(date)
        )
    }

    fn reject<T>(&self, title: &str, err: LedgerError) -> Result<T, LedgerError> {
        tracing::warn!("{title}: {err}");
        self.bus.publish(Notification::error(title, err.to_string()));
        Err(err)
    }

    // Millisecond timestamps, bumped past the previous id when two arrive in
    // the same millisecond.
    fn next_id(&mut self) -> i64 {
        let stamp = self.clock.now().and_utc().timestamp_millis();
        self.last_id = stamp.max(self.last_id + 1);
        self.last_id
    }

    pub fn add_transaction(&mut self, new: NewTransaction) -> Result<Transaction, LedgerError> {
        const TITLE: &str = "Failed to add transaction";
        if let Err(err) = validate(&new.category, new.amount, new.date, self.clock.today()) {
            return self.reject(TITLE, err.into());
        }

        let transaction = Transaction {
            id: self.next_id(),
            kind: new.kind,
            category: new.category,
            amount: new.amount,
            description: new.description,
            date: new.date,
            created_at: self.clock.now(),
        };
        self.snapshot.transactions.push(transaction.clone());

        tracing::info!(
            id = transaction.id,
            kind = %transaction.kind,
            amount = %transaction.amount,
            "added transaction"
        );
        self.bus.publish(Notification::success(
            describe(transaction.kind, "added"),
            self.summary(&transaction.category, transaction.amount, transaction.date),
        ));
        Ok(transaction)
    }

    pub fn remove_transaction(&mut self, id: i64) -> Result<Transaction, LedgerError> {
        let Some(pos) = self.snapshot.transactions.iter().position(|t| t.id == id) else {
            return self.reject("Failed to remove transaction", LedgerError::NotFound(id));
        };
        let removed = self.snapshot.transactions.remove(pos);

        tracing::info!(id, "removed transaction");
        self.bus.publish(Notification::success(
            describe(removed.kind, "removed"),
            self.summary(&removed.category, removed.amount, removed.date),
        ));
        Ok(removed)
    }

    pub fn update_transaction(
        &mut self,
        id: i64,
        patch: TransactionPatch,
    ) -> Result<Transaction, LedgerError> {
        const TITLE: &str = "Failed to update transaction";
        let Some(pos) = self.snapshot.transactions.iter().position(|t| t.id == id) else {
            return self.reject(TITLE, LedgerError::NotFound(id));
        };

        let merged = patch.apply_to(&self.snapshot.transactions[pos]);
        if let Err(err) = validate(
            &merged.category,
            merged.amount,
            merged.date,
            self.clock.today(),
        ) {
            return self.reject(TITLE, err.into());
        }
        self.snapshot.transactions[pos] = merged.clone();

        tracing::info!(id, no_op = patch.is_empty(), "updated transaction");
        self.bus.publish(Notification::success(
            describe(merged.kind, "updated"),
            self.summary(&merged.category, merged.amount, merged.date),
        ));
        Ok(merged)
    }

    pub fn set_salary(&mut self, salary: Salary) -> Result<(), LedgerError> {
        if salary.amount < Decimal::ZERO {
            return self.reject(
                "Failed to set salary",
                LedgerError::NegativeSalary(salary.amount),
            );
        }
        if salary.amount > MAX_AMOUNT {
            return self.reject(
                "Failed to set salary",
                ValidationError::AmountTooLarge(salary.amount).into(),
            );
        }
        let message = format!("Salary set to {}", fmt_money(&salary.amount, &self.currency));
        tracing::info!(amount = %salary.amount, "salary replaced");
        self.snapshot.salary = salary;
        self.bus
            .publish(Notification::success("Salary updated!", message));
        Ok(())
    }

    pub fn clear_all_data(&mut self) {
        let removed = self.snapshot.transactions.len();
        self.snapshot = FinancialSnapshot::default();
        tracing::info!(removed, "cleared all financial data");
        self.bus.publish(
            Notification::info("Data cleared!", "All financial data was removed")
                .with_duration(crate::notify::SUCCESS_DURATION_MS),
        );
    }

    /// Replaces the snapshot with a small sample ledger dated around today.
    pub fn load_demo_data(&mut self) {
        let now = self.clock.now();
        let yesterday = now - Duration::days(1);
        let sample = |id, kind, category: &str, cents, description: &str, at: chrono::NaiveDateTime| {
            Transaction {
                id,
                kind,
                category: category.to_string(),
                amount: Decimal::new(cents, 2),
                description: description.to_string(),
                date: at.date(),
                created_at: at,
            }
        };
        self.snapshot = FinancialSnapshot {
            transactions: vec![
                sample(1, TransactionKind::Expense, "Alimentação", 4590, "Supermercado", now),
                sample(2, TransactionKind::Income, "Freelance", 50000, "Projeto website", now),
                sample(3, TransactionKind::Expense, "Transporte", 12000, "Combustível", yesterday),
                sample(4, TransactionKind::Income, "Salário", 250000, "Salário mensal", yesterday),
            ],
            salary: Salary::new(Decimal::new(3000, 0)),
        };
        self.last_id = self.last_id.max(4);
        tracing::info!("loaded demo data");
        self.bus
            .publish(Notification::info("Demo data loaded", "Sample transactions are ready"));
    }

    /// Transactions dated within `[start, end]`.
    pub fn transactions_by_date_range(&self, start: NaiveDate, end: NaiveDate) -> Vec<Transaction> {
        self.snapshot
            .transactions
            .iter()
            .filter(|t| t.date >= start && t.date <= end)
            .cloned()
            .collect()
    }

    /// Transactions dated after `today - days`.
    pub fn recent_transactions(&self, days: u32) -> Vec<Transaction> {
        let cutoff = dates::days_before(self.clock.today(), days);
        self.snapshot
            .transactions
            .iter()
            .filter(|t| t.date > cutoff)
            .cloned()
            .collect()
    }

    /// Transactions in `month` (1-based) of `year`; the current month unless
    /// both are given.
    pub fn monthly_transactions(&self, year: Option<i32>, month: Option<u32>) -> Vec<Transaction> {
        let today = self.clock.today();
        let (year, month) = match (year, month) {
            (Some(y), Some(m)) => (y, m),
            _ => (today.year(), today.month()),
        };
        self.snapshot
            .transactions
            .iter()
            .filter(|t| t.date.year() == year && t.date.month() == month)
            .cloned()
            .collect()
    }
}
