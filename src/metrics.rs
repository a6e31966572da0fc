// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Derived metrics over a transaction snapshot.
//!
//! Nothing here is cached: every call recomputes from the slice it is given,
//! and calendar windows are taken relative to the `now` passed in.

use std::collections::{BTreeMap, HashMap};

use chrono::{Datelike, NaiveDate, NaiveDateTime};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;

use crate::dates::{self, Locale, WeekStart};
use crate::models::{FinancialSnapshot, Transaction, TransactionKind};
use crate::utils::fmt_money;

pub const EXPENSE_PALETTE: [&str; 10] = [
    "#EF4444", "#F59E0B", "#84CC16", "#06B6D4", "#8B5CF6", "#EC4899", "#14B8A6", "#F97316",
    "#6366F1", "#10B981",
];

pub const INCOME_PALETTE: [&str; 10] = [
    "#10B981", "#84CC16", "#06B6D4", "#3B82F6", "#8B5CF6", "#EC4899", "#F59E0B", "#F97316",
    "#6366F1", "#14B8A6",
];

pub const BAR_PALETTE: [&str; 10] = [
    "#3B82F6", "#EF4444", "#10B981", "#F59E0B", "#8B5CF6", "#EC4899", "#06B6D4", "#84CC16",
    "#F97316", "#6366F1",
];

/// Number of categories shown in the bar chart.
pub const BAR_CHART_MAX_ITEMS: usize = 8;

const HUNDRED: Decimal = Decimal::ONE_HUNDRED;

/// `part / whole * 100`, or zero when `whole` is not positive. Saturates at
/// `Decimal::MAX` instead of overflowing.
pub fn ratio_percent(part: Decimal, whole: Decimal) -> Decimal {
    if whole > Decimal::ZERO {
        part.checked_mul(HUNDRED)
            .and_then(|scaled| scaled.checked_div(whole))
            .or_else(|| part.checked_div(whole).and_then(|ratio| ratio.checked_mul(HUNDRED)))
            .unwrap_or(Decimal::MAX)
    } else {
        Decimal::ZERO
    }
}

fn round_whole(value: Decimal) -> u32 {
    value
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_u32()
        .unwrap_or(0)
}

/// Whole-number percentage, rounded half away from zero.
pub fn rounded_percent(part: Decimal, whole: Decimal) -> u32 {
    round_whole(ratio_percent(part, whole))
}

fn sum_kind<'a>(
    transactions: impl IntoIterator<Item = &'a Transaction>,
    kind: TransactionKind,
) -> Decimal {
    transactions
        .into_iter()
        .filter(|t| t.kind == kind)
        .map(|t| t.amount)
        .sum()
}

fn income_and_expenses<'a, I>(transactions: I) -> (Decimal, Decimal)
where
    I: IntoIterator<Item = &'a Transaction>,
{
    let mut income = Decimal::ZERO;
    let mut expenses = Decimal::ZERO;
    for t in transactions {
        match t.kind {
            TransactionKind::Income => income += t.amount,
            TransactionKind::Expense => expenses += t.amount,
        }
    }
    (income, expenses)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FinancialOverview {
    pub total_income: Decimal,
    pub total_expenses: Decimal,
    pub balance: Decimal,
    pub total_available: Decimal,
    pub expense_percentage: Decimal,
    pub savings: Decimal,
    pub savings_percentage: Decimal,
}

pub fn overview(transactions: &[Transaction], salary: Decimal) -> FinancialOverview {
    let (total_income, total_expenses) = income_and_expenses(transactions);
    let total_available = salary + total_income;
    let savings = total_available - total_expenses;
    FinancialOverview {
        total_income,
        total_expenses,
        balance: salary + total_income - total_expenses,
        total_available,
        expense_percentage: ratio_percent(total_expenses, total_available),
        savings,
        savings_percentage: ratio_percent(savings, total_available),
    }
}

/// Everything the dashboard cards show.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Dashboard {
    pub salary: Decimal,
    #[serde(flatten)]
    pub overview: FinancialOverview,
    pub monthly_income: Decimal,
    pub monthly_expenses: Decimal,
    /// Includes the salary.
    pub monthly_balance: Decimal,
    pub weekly_income: Decimal,
    pub weekly_expenses: Decimal,
    pub month_transaction_count: usize,
    pub week_transaction_count: usize,
}

pub fn dashboard(snapshot: &FinancialSnapshot, now: NaiveDateTime, week_start: WeekStart) -> Dashboard {
    let salary = snapshot.salary.amount;
    let transactions = &snapshot.transactions;

    let month: Vec<&Transaction> = transactions
        .iter()
        .filter(|t| dates::is_current_month(t.date, now))
        .collect();
    let (monthly_income, monthly_expenses) = income_and_expenses(month.iter().copied());

    let (week_start_day, week_end_day) = dates::week_bounds(now.date(), week_start);
    let week: Vec<&Transaction> = transactions
        .iter()
        .filter(|t| t.date >= week_start_day && t.date <= week_end_day)
        .collect();

    Dashboard {
        salary,
        overview: overview(transactions, salary),
        monthly_income,
        monthly_expenses,
        monthly_balance: salary + monthly_income - monthly_expenses,
        weekly_income: sum_kind(week.iter().copied(), TransactionKind::Income),
        weekly_expenses: sum_kind(week.iter().copied(), TransactionKind::Expense),
        month_transaction_count: month.len(),
        week_transaction_count: week.len(),
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PeriodStats {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub income: Decimal,
    pub expenses: Decimal,
    /// Income minus expenses, salary excluded.
    pub balance: Decimal,
    pub transaction_count: usize,
    pub period: String,
}

/// Totals for transactions dated within `[start, end]`.
pub fn period_stats(transactions: &[Transaction], start: NaiveDate, end: NaiveDate) -> PeriodStats {
    let in_range: Vec<&Transaction> = transactions
        .iter()
        .filter(|t| t.date >= start && t.date <= end)
        .collect();
    let (income, expenses) = income_and_expenses(in_range.iter().copied());
    PeriodStats {
        start,
        end,
        income,
        expenses,
        balance: income - expenses,
        transaction_count: in_range.len(),
        period: format!(
            "{} to {}",
            dates::format_date(start),
            dates::format_date(end)
        ),
    }
}

pub fn current_month_stats(transactions: &[Transaction], now: NaiveDateTime) -> PeriodStats {
    let today = now.date();
    period_stats(
        transactions,
        dates::start_of_month(today),
        dates::end_of_month(today),
    )
}

pub fn weekly_stats(
    transactions: &[Transaction],
    now: NaiveDateTime,
    week_start: WeekStart,
) -> PeriodStats {
    let (start, end) = dates::week_bounds(now.date(), week_start);
    period_stats(transactions, start, end)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryStats {
    pub name: String,
    pub income: Decimal,
    pub expenses: Decimal,
    pub count: usize,
    pub percentage: Decimal,
}

/// Per-category sums in first-seen order.
///
/// A category with any income is measured against total income, otherwise
/// against total expenses. Mixed categories therefore report a share of
/// income that also counts their expenses.
pub fn category_stats(transactions: &[Transaction]) -> Vec<CategoryStats> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut stats: Vec<CategoryStats> = Vec::new();

    for t in transactions {
        let i = *index.entry(t.category.as_str()).or_insert_with(|| {
            stats.push(CategoryStats {
                name: t.category.clone(),
                income: Decimal::ZERO,
                expenses: Decimal::ZERO,
                count: 0,
                percentage: Decimal::ZERO,
            });
            stats.len() - 1
        });
        let entry = &mut stats[i];
        match t.kind {
            TransactionKind::Income => entry.income += t.amount,
            TransactionKind::Expense => entry.expenses += t.amount,
        }
        entry.count += 1;
    }

    let total_income: Decimal = stats.iter().map(|c| c.income).sum();
    let total_expenses: Decimal = stats.iter().map(|c| c.expenses).sum();
    for c in &mut stats {
        let total = if c.income > Decimal::ZERO {
            total_income
        } else {
            total_expenses
        };
        c.percentage = ratio_percent(c.income + c.expenses, total);
    }
    stats
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChartSlice {
    pub name: String,
    pub value: Decimal,
    pub color: &'static str,
    pub percentage: u32,
}

pub fn palette(kind: TransactionKind) -> &'static [&'static str; 10] {
    match kind {
        TransactionKind::Expense => &EXPENSE_PALETTE,
        TransactionKind::Income => &INCOME_PALETTE,
    }
}

/// Per-category totals of one kind, largest first.
///
/// Colors are assigned by first-seen position before sorting, so a category
/// keeps its color when amounts shift.
pub fn category_breakdown(transactions: &[Transaction], kind: TransactionKind) -> Vec<ChartSlice> {
    let colors = palette(kind);
    let mut grouped: Vec<(String, Decimal)> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    for t in transactions.iter().filter(|t| t.kind == kind) {
        match index.get(t.category.as_str()) {
            Some(&i) => grouped[i].1 += t.amount,
            None => {
                index.insert(t.category.as_str(), grouped.len());
                grouped.push((t.category.clone(), t.amount));
            }
        }
    }

    let total: Decimal = grouped.iter().map(|(_, v)| *v).sum();
    let mut slices: Vec<ChartSlice> = grouped
        .into_iter()
        .enumerate()
        .map(|(i, (name, value))| ChartSlice {
            percentage: rounded_percent(value, total),
            name,
            value,
            color: colors[i % colors.len()],
        })
        .collect();
    // stable: ties keep first-seen order
    slices.sort_by(|a, b| b.value.cmp(&a.value));
    slices
}

/// The leading slices recolored for the bar chart.
pub fn bar_series(slices: &[ChartSlice]) -> Vec<ChartSlice> {
    slices
        .iter()
        .take(BAR_CHART_MAX_ITEMS)
        .enumerate()
        .map(|(i, s)| ChartSlice {
            color: BAR_PALETTE[i % BAR_PALETTE.len()],
            ..s.clone()
        })
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ChartStatistics {
    pub top_percentage: u32,
    pub average_percentage: u32,
}

pub fn chart_statistics(slices: &[ChartSlice]) -> ChartStatistics {
    let top_percentage = slices.first().map(|s| s.percentage).unwrap_or(0);
    let average_percentage = if slices.is_empty() {
        0
    } else {
        let sum: u32 = slices.iter().map(|s| s.percentage).sum();
        round_whole(Decimal::from(sum) / Decimal::from(slices.len() as u64))
    };
    ChartStatistics {
        top_percentage,
        average_percentage,
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthlyTotals {
    pub month: NaiveDate,
    pub label: String,
    pub income: Decimal,
    pub expenses: Decimal,
}

/// Income and expense totals per calendar month, oldest first.
pub fn monthly_totals(transactions: &[Transaction]) -> Vec<MonthlyTotals> {
    let mut by_month: BTreeMap<NaiveDate, (Decimal, Decimal)> = BTreeMap::new();
    for t in transactions {
        let month = dates::start_of_month(t.date);
        let entry = by_month
            .entry(month)
            .or_insert((Decimal::ZERO, Decimal::ZERO));
        match t.kind {
            TransactionKind::Income => entry.0 += t.amount,
            TransactionKind::Expense => entry.1 += t.amount,
        }
    }
    by_month
        .into_iter()
        .map(|(month, (income, expenses))| MonthlyTotals {
            label: format!("{:02}/{}", month.month(), month.year()),
            month,
            income,
            expenses,
        })
        .collect()
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransactionFilter {
    /// Inclusive date range.
    pub range: Option<(NaiveDate, NaiveDate)>,
    pub kind: Option<TransactionKind>,
    pub category: Option<String>,
}

impl TransactionFilter {
    pub fn matches(&self, t: &Transaction) -> bool {
        if let Some((start, end)) = self.range {
            if t.date < start || t.date > end {
                return false;
            }
        }
        if self.kind.is_some_and(|k| k != t.kind) {
            return false;
        }
        if let Some(ref c) = self.category {
            if &t.category != c {
                return false;
            }
        }
        true
    }
}

/// A transaction decorated for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TransactionView {
    #[serde(flatten)]
    pub transaction: Transaction,
    pub formatted_date: String,
    pub relative_time: String,
    pub is_today: bool,
    pub is_yesterday: bool,
    pub formatted_amount: String,
    pub kind_label: &'static str,
}

#[derive(Debug, Clone, Copy)]
pub struct ViewOptions<'a> {
    pub now: NaiveDateTime,
    pub locale: Locale,
    pub currency: &'a str,
}

pub fn view(t: &Transaction, opts: &ViewOptions<'_>) -> TransactionView {
    TransactionView {
        formatted_date: dates::format_date(t.date),
        relative_time: dates::relative_date(t.date, opts.now, opts.locale),
        is_today: dates::is_today(t.date, opts.now),
        is_yesterday: dates::is_yesterday(t.date, opts.now),
        formatted_amount: fmt_money(&t.amount, opts.currency),
        kind_label: t.kind.label(),
        transaction: t.clone(),
    }
}

/// Filtered, decorated transactions, newest date first.
pub fn transaction_views(
    transactions: &[Transaction],
    filter: &TransactionFilter,
    opts: &ViewOptions<'_>,
) -> Vec<TransactionView> {
    let mut views: Vec<TransactionView> = transactions
        .iter()
        .filter(|t| filter.matches(t))
        .map(|t| view(t, opts))
        .collect();
    views.sort_by(|a, b| b.transaction.date.cmp(&a.transaction.date));
    views
}

/// Decorated transactions from the last `days` days, newest first.
pub fn recent_views(
    transactions: &[Transaction],
    days: u32,
    opts: &ViewOptions<'_>,
) -> Vec<TransactionView> {
    let cutoff = dates::days_before(opts.now.date(), days);
    let recent: Vec<Transaction> = transactions
        .iter()
        .filter(|t| t.date > cutoff)
        .cloned()
        .collect();
    transaction_views(&recent, &TransactionFilter::default(), opts)
}
