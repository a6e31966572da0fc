// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Date formatting, relative-time text and calendar window helpers.
//!
//! Every function takes its reference instant explicitly. The only place that
//! reads the wall clock is [`SystemClock`].

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, Local, Months, NaiveDate, NaiveDateTime, NaiveTime, Weekday};
use serde::{Deserialize, Serialize};

/// Source of "now" for the ledger and the dashboards.
pub trait Clock: Send + Sync {
    fn now(&self) -> NaiveDateTime;

    fn today(&self) -> NaiveDate {
        self.now().date()
    }
}

/// Local wall-clock time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

/// A clock pinned to one instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock(pub NaiveDateTime);

impl FixedClock {
    /// Noon on `date`.
    pub fn on(date: NaiveDate) -> Self {
        Self(date.and_time(NaiveTime::from_hms_opt(12, 0, 0).unwrap_or(NaiveTime::MIN)))
    }
}

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        self.0
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Locale {
    #[default]
    #[serde(rename = "en")]
    En,
    #[serde(rename = "pt-BR")]
    PtBr,
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::En => f.write_str("en"),
            Self::PtBr => f.write_str("pt-BR"),
        }
    }
}

impl FromStr for Locale {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "en" | "en-us" | "en-gb" => Ok(Self::En),
            "pt-br" | "pt" => Ok(Self::PtBr),
            other => Err(format!("unsupported locale '{}' (use en|pt-BR)", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeekStart {
    #[default]
    Sunday,
    Monday,
}

impl WeekStart {
    pub fn weekday(self) -> Weekday {
        match self {
            Self::Sunday => Weekday::Sun,
            Self::Monday => Weekday::Mon,
        }
    }
}

impl fmt::Display for WeekStart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sunday => f.write_str("sunday"),
            Self::Monday => f.write_str("monday"),
        }
    }
}

impl FromStr for WeekStart {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sunday" | "sun" => Ok(Self::Sunday),
            "monday" | "mon" => Ok(Self::Monday),
            other => Err(format!("unsupported week start '{}' (use sunday|monday)", other)),
        }
    }
}

/// `DD/MM/YYYY`
pub fn format_date(date: NaiveDate) -> String {
    date.format("%d/%m/%Y").to_string()
}

/// `DD/MM/YYYY às HH:mm` (pt-BR) or `DD/MM/YYYY at HH:mm` (en).
pub fn format_date_time(instant: NaiveDateTime, locale: Locale) -> String {
    let joiner = match locale {
        Locale::En => "at",
        Locale::PtBr => "às",
    };
    format!(
        "{} {} {}",
        instant.format("%d/%m/%Y"),
        joiner,
        instant.format("%H:%M")
    )
}

/// `YYYY-MM-DD` for the clock's current day.
pub fn today_string(clock: &dyn Clock) -> String {
    clock.today().format("%Y-%m-%d").to_string()
}

pub fn is_today(date: NaiveDate, now: NaiveDateTime) -> bool {
    date == now.date()
}

pub fn is_yesterday(date: NaiveDate, now: NaiveDateTime) -> bool {
    now.date().pred_opt() == Some(date)
}

pub fn is_current_month(date: NaiveDate, now: NaiveDateTime) -> bool {
    date.year() == now.year() && date.month() == now.month()
}

pub fn start_of_month(today: NaiveDate) -> NaiveDate {
    today.with_day(1).unwrap_or(today)
}

pub fn end_of_month(today: NaiveDate) -> NaiveDate {
    start_of_month(today)
        .checked_add_months(Months::new(1))
        .and_then(|d| d.pred_opt())
        .unwrap_or(today)
}

/// First and last day of `month` (1-based) in `year`.
pub fn month_bounds(year: i32, month: u32) -> Option<(NaiveDate, NaiveDate)> {
    let start = NaiveDate::from_ymd_opt(year, month, 1)?;
    Some((start, end_of_month(start)))
}

/// `today` minus `days`, clamped to `NaiveDate::MIN`.
pub fn days_before(today: NaiveDate, days: u32) -> NaiveDate {
    today
        .checked_sub_signed(chrono::Duration::days(i64::from(days)))
        .unwrap_or(NaiveDate::MIN)
}

/// Inclusive bounds of the calendar week containing `today`.
pub fn week_bounds(today: NaiveDate, week_start: WeekStart) -> (NaiveDate, NaiveDate) {
    let offset = (7 + today.weekday().num_days_from_monday()
        - week_start.weekday().num_days_from_monday())
        % 7;
    let start = today - chrono::Duration::days(i64::from(offset));
    (start, start + chrono::Duration::days(6))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Unit {
    Second,
    Minute,
    Hour,
    Day,
    Month,
    Year,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phrase {
    FewSeconds,
    Minute,
    Minutes,
    Hour,
    Hours,
    Day,
    Days,
    Month,
    Months,
    Year,
    Years,
}

// A step without a unit keeps comparing against the previous unit's value.
const THRESHOLDS: [(Phrase, Option<i64>, Option<Unit>); 11] = [
    (Phrase::FewSeconds, Some(44), Some(Unit::Second)),
    (Phrase::Minute, Some(89), None),
    (Phrase::Minutes, Some(44), Some(Unit::Minute)),
    (Phrase::Hour, Some(89), None),
    (Phrase::Hours, Some(21), Some(Unit::Hour)),
    (Phrase::Day, Some(35), None),
    (Phrase::Days, Some(25), Some(Unit::Day)),
    (Phrase::Month, Some(45), None),
    (Phrase::Months, Some(10), Some(Unit::Month)),
    (Phrase::Year, Some(17), None),
    (Phrase::Years, None, Some(Unit::Year)),
];

fn shift_months(dt: NaiveDateTime, n: i64) -> NaiveDateTime {
    let months = Months::new(n.unsigned_abs().min(u64::from(u32::MAX)) as u32);
    let shifted = if n >= 0 {
        dt.checked_add_months(months)
    } else {
        dt.checked_sub_months(months)
    };
    shifted.unwrap_or(dt)
}

/// Signed, fractional number of calendar months from `from` to `to`.
fn months_between(from: NaiveDateTime, to: NaiveDateTime) -> f64 {
    let whole = i64::from(to.year() - from.year()) * 12 + i64::from(to.month())
        - i64::from(from.month());
    let anchor = shift_months(from, whole);
    let (lo, hi) = if to < anchor {
        (shift_months(from, whole - 1), anchor)
    } else {
        (anchor, shift_months(from, whole + 1))
    };
    let span = (hi - lo).num_milliseconds() as f64;
    if span == 0.0 {
        return whole as f64;
    }
    whole as f64 + (to - anchor).num_milliseconds() as f64 / span
}

fn diff_in(unit: Unit, now: NaiveDateTime, instant: NaiveDateTime) -> f64 {
    let ms = (instant - now).num_milliseconds() as f64;
    match unit {
        Unit::Second => ms / 1_000.0,
        Unit::Minute => ms / 60_000.0,
        Unit::Hour => ms / 3_600_000.0,
        Unit::Day => ms / 86_400_000.0,
        Unit::Month => months_between(now, instant),
        Unit::Year => months_between(now, instant) / 12.0,
    }
}

fn humanize(now: NaiveDateTime, instant: NaiveDateTime) -> (Phrase, i64) {
    let mut value = 0.0;
    for (i, &(phrase, limit, unit)) in THRESHOLDS.iter().enumerate() {
        if let Some(unit) = unit {
            value = diff_in(unit, now, instant);
        }
        let n = value.abs().round() as i64;
        if limit.is_none_or(|r| n <= r) {
            // "1 minutes" reads as "a minute"
            let phrase = if n <= 1 && i > 0 {
                THRESHOLDS[i - 1].0
            } else {
                phrase
            };
            return (phrase, n);
        }
    }
    (Phrase::Years, value.abs().round() as i64)
}

fn phrase_text(phrase: Phrase, n: i64, locale: Locale) -> String {
    match locale {
        Locale::En => match phrase {
            Phrase::FewSeconds => "a few seconds".to_string(),
            Phrase::Minute => "a minute".to_string(),
            Phrase::Minutes => format!("{} minutes", n),
            Phrase::Hour => "an hour".to_string(),
            Phrase::Hours => format!("{} hours", n),
            Phrase::Day => "a day".to_string(),
            Phrase::Days => format!("{} days", n),
            Phrase::Month => "a month".to_string(),
            Phrase::Months => format!("{} months", n),
            Phrase::Year => "a year".to_string(),
            Phrase::Years => format!("{} years", n),
        },
        Locale::PtBr => match phrase {
            Phrase::FewSeconds => "poucos segundos".to_string(),
            Phrase::Minute => "um minuto".to_string(),
            Phrase::Minutes => format!("{} minutos", n),
            Phrase::Hour => "uma hora".to_string(),
            Phrase::Hours => format!("{} horas", n),
            Phrase::Day => "um dia".to_string(),
            Phrase::Days => format!("{} dias", n),
            Phrase::Month => "um mês".to_string(),
            Phrase::Months => format!("{} meses", n),
            Phrase::Year => "um ano".to_string(),
            Phrase::Years => format!("{} anos", n),
        },
    }
}

/// Humanized distance between `instant` and `now`, e.g. "2 days ago".
pub fn relative_time(instant: NaiveDateTime, now: NaiveDateTime, locale: Locale) -> String {
    let (phrase, n) = humanize(now, instant);
    let text = phrase_text(phrase, n, locale);
    let future = instant > now;
    match (locale, future) {
        (Locale::En, false) => format!("{} ago", text),
        (Locale::En, true) => format!("in {}", text),
        (Locale::PtBr, false) => format!("há {}", text),
        (Locale::PtBr, true) => format!("em {}", text),
    }
}

/// [`relative_time`] measured from the start of `date`.
pub fn relative_date(date: NaiveDate, now: NaiveDateTime, locale: Locale) -> String {
    relative_time(date.and_time(NaiveTime::MIN), now, locale)
}
