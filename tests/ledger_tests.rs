// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::collections::HashSet;
use std::sync::Arc;
use std::thread;

use chrono::NaiveDate;
use finflow::dates::{Clock, FixedClock};
use finflow::error::{LedgerError, ValidationError};
use finflow::ledger::{Ledger, MAX_AMOUNT};
use finflow::metrics;
use finflow::models::{NewTransaction, Salary, TransactionKind, TransactionPatch};
use finflow::notify::{NotificationBus, NotificationKind};
use rust_decimal::Decimal;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn today() -> NaiveDate {
    date(2025, 6, 18)
}

fn ledger() -> (Ledger, NotificationBus) {
    let bus = NotificationBus::new();
    let ledger = Ledger::new(Arc::new(FixedClock::on(today())), bus.clone());
    (ledger, bus)
}

fn expense(category: &str, cents: i64, on: NaiveDate) -> NewTransaction {
    NewTransaction {
        kind: TransactionKind::Expense,
        category: category.to_string(),
        amount: Decimal::new(cents, 2),
        description: "test".to_string(),
        date: on,
    }
}

#[test]
fn add_assigns_unique_increasing_ids() {
    let (mut ledger, _bus) = ledger();
    let a = ledger.add_transaction(expense("Food", 1000, today())).unwrap();
    let b = ledger.add_transaction(expense("Food", 2000, today())).unwrap();
    assert!(b.id > a.id);
    assert_eq!(ledger.transactions().len(), 2);
    assert_eq!(ledger.get(a.id).unwrap().amount, Decimal::new(1000, 2));
}

#[test]
fn add_announces_success() {
    let (mut ledger, bus) = ledger();
    let (_id, rx) = bus.subscribe_channel();
    assert_eq!(ledger.bus().listener_count(), 1);
    ledger
        .add_transaction(expense("Alimentação", 4590, ledger.clock().today()))
        .unwrap();

    let n = rx.try_recv().unwrap();
    assert_eq!(n.kind, NotificationKind::Success);
    assert_eq!(n.title, "Expense added!");
    assert_eq!(n.message.as_deref(), Some("Alimentação: R$ 45.90 (18/06/2025)"));
    assert!(rx.try_recv().is_err());
}

#[test]
fn add_rejects_future_date_and_leaves_store_untouched() {
    let (mut ledger, bus) = ledger();
    let (_id, rx) = bus.subscribe_channel();
    let err = ledger
        .add_transaction(expense("Food", 1000, date(2025, 6, 19)))
        .unwrap_err();
    assert_eq!(
        err,
        LedgerError::Validation(ValidationError::FutureDate(date(2025, 6, 19)))
    );
    assert!(ledger.transactions().is_empty());

    let n = rx.try_recv().unwrap();
    assert_eq!(n.kind, NotificationKind::Error);
    assert_eq!(n.title, "Failed to add transaction");
}

#[test]
fn add_rejects_blank_category_and_non_positive_amount() {
    let (mut ledger, _bus) = ledger();
    assert_eq!(
        ledger.add_transaction(expense("  ", 1000, today())).unwrap_err(),
        LedgerError::Validation(ValidationError::MissingCategory)
    );
    assert!(matches!(
        ledger.add_transaction(expense("Food", 0, today())),
        Err(LedgerError::Validation(ValidationError::NonPositiveAmount(_)))
    ));
    assert!(ledger.transactions().is_empty());
}

#[test]
fn remove_unknown_id_fails() {
    let (mut ledger, bus) = ledger();
    let (_id, rx) = bus.subscribe_channel();
    assert_eq!(ledger.remove_transaction(42), Err(LedgerError::NotFound(42)));
    assert_eq!(rx.try_recv().unwrap().kind, NotificationKind::Error);
}

#[test]
fn remove_returns_the_removed_transaction() {
    let (mut ledger, _bus) = ledger();
    let tx = ledger.add_transaction(expense("Food", 1000, today())).unwrap();
    let removed = ledger.remove_transaction(tx.id).unwrap();
    assert_eq!(removed, tx);
    assert!(ledger.get(tx.id).is_none());
}

#[test]
fn update_merges_patch_and_revalidates() {
    let (mut ledger, _bus) = ledger();
    let tx = ledger.add_transaction(expense("Food", 1000, today())).unwrap();

    let updated = ledger
        .update_transaction(
            tx.id,
            TransactionPatch {
                amount: Some(Decimal::new(2500, 2)),
                ..TransactionPatch::default()
            },
        )
        .unwrap();
    assert_eq!(updated.amount, Decimal::new(2500, 2));
    assert_eq!(updated.category, "Food");
    assert_eq!(updated.created_at, tx.created_at);

    let err = ledger
        .update_transaction(
            tx.id,
            TransactionPatch {
                date: Some(date(2030, 1, 1)),
                ..TransactionPatch::default()
            },
        )
        .unwrap_err();
    assert!(matches!(
        err,
        LedgerError::Validation(ValidationError::FutureDate(_))
    ));
    assert_eq!(ledger.get(tx.id).unwrap().date, today());
}

#[test]
fn salary_rejects_negative_amounts() {
    let (mut ledger, _bus) = ledger();
    ledger.set_salary(Salary::new(Decimal::new(3000, 0))).unwrap();
    assert_eq!(ledger.salary(), Decimal::new(3000, 0));

    let err = ledger.set_salary(Salary::new(Decimal::new(-1, 0))).unwrap_err();
    assert_eq!(err, LedgerError::NegativeSalary(Decimal::new(-1, 0)));
    assert_eq!(ledger.salary(), Decimal::new(3000, 0));
}

#[test]
fn clear_all_data_resets_everything() {
    let (mut ledger, bus) = ledger();
    ledger.load_demo_data();
    let (_id, rx) = bus.subscribe_channel();
    ledger.clear_all_data();
    assert!(ledger.transactions().is_empty());
    assert_eq!(ledger.salary(), Decimal::ZERO);
    assert_eq!(rx.try_recv().unwrap().title, "Data cleared!");
}

#[test]
fn demo_data_has_four_transactions_and_a_salary() {
    let (mut ledger, _bus) = ledger();
    ledger.load_demo_data();
    let ids: Vec<i64> = ledger.transactions().iter().map(|t| t.id).collect();
    assert_eq!(ids, vec![1, 2, 3, 4]);
    assert_eq!(ledger.salary(), Decimal::new(3000, 0));
    assert_eq!(ledger.get(3).unwrap().date, date(2025, 6, 17));

    let next = ledger.add_transaction(expense("Food", 100, today())).unwrap();
    assert!(next.id > 4);
}

#[test]
fn date_range_is_inclusive() {
    let (mut ledger, _bus) = ledger();
    ledger.load_demo_data();
    let yesterday = date(2025, 6, 17);
    let hits = ledger.transactions_by_date_range(yesterday, yesterday);
    let categories: Vec<&str> = hits.iter().map(|t| t.category.as_str()).collect();
    assert_eq!(categories, vec!["Transporte", "Salário"]);
    assert!(hits[0].is_expense());
    assert_eq!(ledger.transactions_by_date_range(yesterday, today()).len(), 4);
}

#[test]
fn recent_keeps_dates_after_the_cutoff() {
    let (mut ledger, _bus) = ledger();
    ledger.load_demo_data();
    assert_eq!(ledger.recent_transactions(1).len(), 2);
    assert_eq!(ledger.recent_transactions(2).len(), 4);
    assert!(ledger.recent_transactions(0).is_empty());
}

#[test]
fn recent_with_an_oversized_window_returns_everything() {
    let (mut ledger, _bus) = ledger();
    ledger.load_demo_data();
    assert_eq!(ledger.recent_transactions(u32::MAX).len(), 4);
}

#[test]
fn amounts_above_the_cap_are_rejected() {
    let (mut ledger, bus) = ledger();
    let (_id, rx) = bus.subscribe_channel();
    let huge = Decimal::from_i128_with_scale(10_i128.pow(28), 0);
    let mut input = expense("Food", 100, today());
    input.amount = huge;
    assert_eq!(
        ledger.add_transaction(input).unwrap_err(),
        LedgerError::Validation(ValidationError::AmountTooLarge(huge))
    );
    assert_eq!(rx.try_recv().unwrap().kind, NotificationKind::Error);
    assert!(ledger.transactions().is_empty());

    assert!(matches!(
        ledger.set_salary(Salary::new(MAX_AMOUNT + Decimal::ONE)),
        Err(LedgerError::Validation(ValidationError::AmountTooLarge(_)))
    ));
    assert_eq!(ledger.salary(), Decimal::ZERO);
}

#[test]
fn largest_amounts_still_aggregate() {
    let (mut ledger, _bus) = ledger();
    ledger.set_salary(Salary::new(MAX_AMOUNT)).unwrap();
    for kind in [TransactionKind::Income, TransactionKind::Expense, TransactionKind::Income] {
        let mut input = expense("Big", 100, today());
        input.kind = kind;
        input.amount = MAX_AMOUNT;
        ledger.add_transaction(input).unwrap();
    }

    let o = metrics::overview(ledger.transactions(), ledger.salary());
    assert_eq!(o.total_income, MAX_AMOUNT * Decimal::TWO);
    assert_eq!(o.balance, MAX_AMOUNT * Decimal::TWO);
    assert!(o.expense_percentage > Decimal::ZERO);
    assert_eq!(metrics::category_stats(ledger.transactions()).len(), 1);
}

#[test]
fn monthly_defaults_to_the_current_month() {
    let (mut ledger, _bus) = ledger();
    ledger.load_demo_data();
    ledger
        .add_transaction(expense("Food", 1000, date(2025, 5, 31)))
        .unwrap();
    assert_eq!(ledger.monthly_transactions(None, None).len(), 4);
    assert_eq!(ledger.monthly_transactions(Some(2025), Some(5)).len(), 1);
    assert!(ledger.monthly_transactions(Some(2024), Some(6)).is_empty());
}

#[test]
fn shared_ledger_serializes_concurrent_adds() {
    let (ledger, _bus) = ledger();
    let shared = ledger.into_shared();
    let handles: Vec<_> = (0..4)
        .map(|_| {
            let shared = Arc::clone(&shared);
            thread::spawn(move || {
                for _ in 0..10 {
                    shared
                        .lock()
                        .unwrap()
                        .add_transaction(expense("Food", 100, today()))
                        .unwrap();
                }
            })
        })
        .collect();
    for h in handles {
        h.join().unwrap();
    }

    let guard = shared.lock().unwrap();
    let ids: HashSet<i64> = guard.transactions().iter().map(|t| t.id).collect();
    assert_eq!(ids.len(), 40);
}

#[test]
fn added_transaction_is_found_by_a_covering_range() {
    let (mut ledger, _bus) = ledger();
    ledger.load_demo_data();
    let input = expense("Farmácia", 3399, date(2025, 6, 10));
    let tx = ledger.add_transaction(input.clone()).unwrap();

    let hits = ledger.transactions_by_date_range(date(2025, 6, 1), date(2025, 6, 15));
    assert_eq!(hits, vec![tx.clone()]);
    assert_eq!(tx.kind, input.kind);
    assert_eq!(tx.category, input.category);
    assert_eq!(tx.amount, input.amount);
    assert_eq!(tx.description, input.description);
    assert_eq!(tx.date, input.date);
}

#[test]
fn empty_patch_leaves_the_record_identical() {
    let (mut ledger, _bus) = ledger();
    ledger.load_demo_data();
    let before = ledger.get(2).unwrap().clone();
    let after = ledger
        .update_transaction(2, TransactionPatch::default())
        .unwrap();
    assert_eq!(after, before);
    assert_eq!(ledger.get(2), Some(&before));
}

#[test]
fn failed_remove_does_not_announce_success() {
    let (mut ledger, bus) = ledger();
    ledger.load_demo_data();
    let (_id, rx) = bus.subscribe_channel();
    assert!(ledger.remove_transaction(999).is_err());
    assert_eq!(ledger.transactions().len(), 4);
    let kinds: Vec<NotificationKind> = rx.try_iter().map(|n| n.kind).collect();
    assert_eq!(kinds, vec![NotificationKind::Error]);
}
