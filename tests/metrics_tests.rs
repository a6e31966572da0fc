// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::str::FromStr;
use std::sync::Arc;

use chrono::NaiveDate;
use finflow::dates::{Clock, FixedClock, Locale, WeekStart};
use finflow::ledger::Ledger;
use finflow::metrics::{self, BAR_PALETTE, EXPENSE_PALETTE, TransactionFilter, ViewOptions};
use finflow::models::{NewTransaction, Transaction, TransactionKind};
use finflow::notify::NotificationBus;
use rust_decimal::Decimal;

fn d(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

fn date(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

fn clock() -> FixedClock {
    // a Wednesday
    FixedClock::on(date(2025, 6, 18))
}

fn demo() -> Ledger {
    let mut ledger = Ledger::new(Arc::new(clock()), NotificationBus::new());
    ledger.load_demo_data();
    ledger
}

fn tx(id: i64, kind: TransactionKind, category: &str, amount: &str, on: NaiveDate) -> Transaction {
    Transaction {
        id,
        kind,
        category: category.to_string(),
        amount: d(amount),
        description: String::new(),
        date: on,
        created_at: on.and_hms_opt(9, 0, 0).unwrap(),
    }
}

#[test]
fn overview_of_demo_data() {
    let ledger = demo();
    let o = metrics::overview(ledger.transactions(), ledger.salary());
    assert_eq!(o.total_income, d("3000.00"));
    assert_eq!(o.total_expenses, d("165.90"));
    assert_eq!(o.balance, d("5834.10"));
    assert_eq!(o.total_available, d("6000.00"));
    assert_eq!(o.expense_percentage, d("2.765"));
    assert_eq!(o.savings, d("5834.10"));
    assert_eq!(o.savings_percentage, d("97.235"));
}

#[test]
fn overview_of_empty_ledger_has_zero_percentages() {
    let o = metrics::overview(&[], Decimal::ZERO);
    assert_eq!(o.balance, Decimal::ZERO);
    assert_eq!(o.expense_percentage, Decimal::ZERO);
    assert_eq!(o.savings_percentage, Decimal::ZERO);
}

#[test]
fn dashboard_monthly_balance_includes_salary() {
    let ledger = demo();
    let dash = metrics::dashboard(ledger.snapshot(), clock().now(), WeekStart::Sunday);
    assert_eq!(dash.monthly_income, d("3000"));
    assert_eq!(dash.monthly_expenses, d("165.90"));
    assert_eq!(dash.monthly_balance, d("5834.10"));
    assert_eq!(dash.weekly_expenses, d("165.90"));
    assert_eq!(dash.month_transaction_count, 4);
    assert_eq!(dash.week_transaction_count, 4);
}

#[test]
fn weekly_stats_follow_the_configured_week_start() {
    let sunday = date(2025, 6, 15);
    let txs = vec![tx(1, TransactionKind::Expense, "Food", "10", sunday)];
    let now = clock().now();

    let from_sunday = metrics::weekly_stats(&txs, now, WeekStart::Sunday);
    assert_eq!(from_sunday.start, sunday);
    assert_eq!(from_sunday.end, date(2025, 6, 21));
    assert_eq!(from_sunday.transaction_count, 1);

    let from_monday = metrics::weekly_stats(&txs, now, WeekStart::Monday);
    assert_eq!(from_monday.start, date(2025, 6, 16));
    assert_eq!(from_monday.transaction_count, 0);
}

#[test]
fn current_month_stats_cover_the_whole_month() {
    let txs = vec![
        tx(1, TransactionKind::Income, "Job", "100", date(2025, 6, 1)),
        tx(2, TransactionKind::Expense, "Food", "40", date(2025, 6, 30)),
        tx(3, TransactionKind::Expense, "Food", "99", date(2025, 5, 31)),
    ];
    let stats = metrics::current_month_stats(&txs, clock().now());
    assert_eq!(stats.period, "01/06/2025 to 30/06/2025");
    assert_eq!(stats.income, d("100"));
    assert_eq!(stats.expenses, d("40"));
    assert_eq!(stats.balance, d("60"));
    assert_eq!(stats.transaction_count, 2);
}

#[test]
fn category_stats_keep_first_seen_order() {
    let ledger = demo();
    let stats = metrics::category_stats(ledger.transactions());
    let names: Vec<&str> = stats.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["Alimentação", "Freelance", "Transporte", "Salário"]);
    assert_eq!(
        stats[0].percentage,
        metrics::ratio_percent(d("45.90"), d("165.90"))
    );
    assert_eq!(stats[1].percentage, metrics::ratio_percent(d("500"), d("3000")));
}

#[test]
fn mixed_category_is_measured_against_income() {
    let today = date(2025, 6, 18);
    let txs = vec![
        tx(1, TransactionKind::Income, "Extra", "100", today),
        tx(2, TransactionKind::Expense, "Extra", "50", today),
        tx(3, TransactionKind::Expense, "Food", "50", today),
    ];
    let stats = metrics::category_stats(&txs);
    assert_eq!(stats[0].count, 2);
    assert_eq!(stats[0].percentage, d("150"));
    assert_eq!(stats[1].percentage, d("50"));
}

#[test]
fn breakdown_groups_and_sorts_with_stable_colors() {
    let mut ledger = demo();
    ledger
        .add_transaction(NewTransaction {
            kind: TransactionKind::Expense,
            category: "Alimentação".to_string(),
            amount: d("10.00"),
            description: "Padaria".to_string(),
            date: date(2025, 6, 18),
        })
        .unwrap();

    let slices = metrics::category_breakdown(ledger.transactions(), TransactionKind::Expense);
    assert_eq!(slices.len(), 2);
    assert_eq!(slices[0].name, "Transporte");
    assert_eq!(slices[0].color, EXPENSE_PALETTE[1]);
    assert_eq!(slices[0].percentage, 68);
    assert_eq!(slices[1].name, "Alimentação");
    assert_eq!(slices[1].value, d("55.90"));
    assert_eq!(slices[1].color, EXPENSE_PALETTE[0]);
    assert_eq!(slices[1].percentage, 32);

    let stats = metrics::chart_statistics(&slices);
    assert_eq!(stats.top_percentage, 68);
    assert_eq!(stats.average_percentage, 50);
}

#[test]
fn bar_series_keeps_the_leading_eight() {
    let today = date(2025, 6, 18);
    let txs: Vec<Transaction> = (1..=10)
        .map(|i| {
            tx(
                i,
                TransactionKind::Expense,
                &format!("C{}", i),
                &(i * 10).to_string(),
                today,
            )
        })
        .collect();
    let slices = metrics::category_breakdown(&txs, TransactionKind::Expense);
    let bars = metrics::bar_series(&slices);
    assert_eq!(bars.len(), 8);
    assert_eq!(bars[0].name, "C10");
    assert_eq!(bars[0].color, BAR_PALETTE[0]);
    assert_eq!(bars[7].name, "C3");
    assert_eq!(bars[7].color, BAR_PALETTE[7]);
}

#[test]
fn empty_chart_statistics_are_zero() {
    let stats = metrics::chart_statistics(&[]);
    assert_eq!(stats.top_percentage, 0);
    assert_eq!(stats.average_percentage, 0);
}

#[test]
fn monthly_totals_are_chronological() {
    let txs = vec![
        tx(1, TransactionKind::Expense, "Food", "20", date(2025, 6, 2)),
        tx(2, TransactionKind::Income, "Job", "100", date(2025, 5, 10)),
        tx(3, TransactionKind::Expense, "Food", "5", date(2025, 6, 9)),
    ];
    let totals = metrics::monthly_totals(&txs);
    let labels: Vec<&str> = totals.iter().map(|m| m.label.as_str()).collect();
    assert_eq!(labels, vec!["05/2025", "06/2025"]);
    assert_eq!(totals[1].expenses, d("25"));
    assert_eq!(totals[1].income, Decimal::ZERO);
}

#[test]
fn views_are_decorated_and_newest_first() {
    let ledger = demo();
    let opts = ViewOptions {
        now: clock().now(),
        locale: Locale::En,
        currency: "R$",
    };
    let views = metrics::transaction_views(ledger.transactions(), &TransactionFilter::default(), &opts);
    assert_eq!(views.len(), 4);
    assert!(views[0].is_today);
    assert_eq!(views[0].formatted_date, "18/06/2025");
    assert_eq!(views[0].relative_time, "12 hours ago");
    assert_eq!(views[0].formatted_amount, "R$ 45.90");
    assert_eq!(views[0].kind_label, "Expense");
    assert!(views[3].is_yesterday);

    let filter = TransactionFilter {
        kind: Some(TransactionKind::Income),
        ..TransactionFilter::default()
    };
    let income = metrics::transaction_views(ledger.transactions(), &filter, &opts);
    assert!(income.iter().all(|v| v.transaction.is_income()));
    assert_eq!(income.len(), 2);
}

#[test]
fn recent_views_apply_the_day_window() {
    let ledger = demo();
    let opts = ViewOptions {
        now: clock().now(),
        locale: Locale::PtBr,
        currency: "R$",
    };
    let views = metrics::recent_views(ledger.transactions(), 1, &opts);
    assert_eq!(views.len(), 2);
    assert_eq!(views[0].relative_time, "há 12 horas");

    assert_eq!(metrics::recent_views(ledger.transactions(), u32::MAX, &opts).len(), 4);
}

#[test]
fn balance_identity_and_percentage_bounds_hold() {
    let today = date(2025, 6, 18);
    for salary in ["0", "1500.50", "3000"] {
        for n in 0..6i64 {
            let mut txs = Vec::new();
            for i in 0..n {
                txs.push(tx(2 * i, TransactionKind::Income, "Job", &format!("{}.33", 100 + i), today));
                txs.push(tx(2 * i + 1, TransactionKind::Expense, "Food", &format!("{}.17", 50 + i), today));
            }
            let o = metrics::overview(&txs, d(salary));
            assert_eq!(o.total_income - o.total_expenses + d(salary), o.balance);
            if o.total_available > Decimal::ZERO {
                for p in [o.expense_percentage, o.savings_percentage] {
                    assert!(p >= Decimal::ZERO && p <= Decimal::ONE_HUNDRED, "{p}");
                }
            } else {
                assert_eq!(o.expense_percentage, Decimal::ZERO);
                assert_eq!(o.savings_percentage, Decimal::ZERO);
            }
        }
    }
}
