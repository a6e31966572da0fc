// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Field-level validation of raw form input.
//!
//! Each form either parses into its typed value or yields every failing field
//! with a message. The ledger re-checks its own invariants regardless.

use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::ledger::MAX_AMOUNT;
use crate::models::{NewTransaction, Salary, TransactionKind};
use crate::utils::{parse_date, parse_decimal};

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is valid"));

const MIN_PASSWORD_LEN: usize = 6;
const MIN_NAME_LEN: usize = 2;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Joins field errors into one line for notifications and error messages.
pub fn summarize(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

#[derive(Default)]
struct Errors(Vec<FieldError>);

impl Errors {
    fn push(&mut self, field: &'static str, message: impl Into<String>) {
        self.0.push(FieldError {
            field,
            message: message.into(),
        });
    }

    fn required(&mut self, field: &'static str, value: &str, message: &str) -> bool {
        if value.trim().is_empty() {
            self.push(field, message);
            false
        } else {
            true
        }
    }

    fn finish<T>(self, value: impl FnOnce() -> T) -> Result<T, Vec<FieldError>> {
        if self.0.is_empty() {
            Ok(value())
        } else {
            Err(self.0)
        }
    }
}

fn check_email(errors: &mut Errors, email: &str) {
    if errors.required("email", email, "email is required") && !is_valid_email(email) {
        errors.push("email", "invalid email");
    }
}

fn check_amount(errors: &mut Errors, raw: &str) -> Option<Decimal> {
    match parse_decimal(raw) {
        Ok(v) if v > MAX_AMOUNT => {
            errors.push("amount", "amount is too large");
            None
        }
        Ok(v) if v >= Decimal::new(1, 2) => Some(v),
        Ok(_) => {
            errors.push("amount", "amount must be greater than 0");
            None
        }
        Err(_) => {
            errors.push("amount", format!("'{}' is not a number", raw.trim()));
            None
        }
    }
}

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email.trim())
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransactionForm {
    pub kind: String,
    pub category: String,
    pub amount: String,
    pub description: String,
    pub date: String,
}

impl TransactionForm {
    pub fn validate(&self) -> Result<NewTransaction, Vec<FieldError>> {
        let mut errors = Errors::default();
        let kind = match self.kind.parse::<TransactionKind>() {
            Ok(k) => Some(k),
            Err(_) => {
                errors.push("type", "type must be income or expense");
                None
            }
        };
        errors.required("category", &self.category, "category is required");
        let amount = check_amount(&mut errors, &self.amount);
        errors.required("description", &self.description, "description is required");
        let date = if errors.required("date", &self.date, "date is required") {
            match parse_date(&self.date) {
                Ok(d) => Some(d),
                Err(_) => {
                    errors.push("date", "invalid date");
                    None
                }
            }
        } else {
            None
        };

        match (kind, amount, date) {
            (Some(kind), Some(amount), Some(date)) => errors.finish(|| NewTransaction {
                kind,
                category: self.category.trim().to_string(),
                amount,
                description: self.description.trim().to_string(),
                date,
            }),
            _ => Err(errors.0),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SalaryForm {
    pub amount: String,
    pub receipt_date: String,
    pub source: String,
}

impl SalaryForm {
    pub fn validate(&self) -> Result<Salary, Vec<FieldError>> {
        let mut errors = Errors::default();
        let amount = check_amount(&mut errors, &self.amount);
        let receipt_date = if errors.required(
            "receipt_date",
            &self.receipt_date,
            "receipt date is required",
        ) {
            match parse_date(&self.receipt_date) {
                Ok(d) => Some(d),
                Err(_) => {
                    errors.push("receipt_date", "invalid date");
                    None
                }
            }
        } else {
            None
        };
        errors.required("source", &self.source, "source is required");

        match amount {
            Some(amount) => errors.finish(|| Salary {
                amount,
                receipt_date,
                source: Some(self.source.trim().to_string()),
            }),
            None => Err(errors.0),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

impl LoginForm {
    pub fn validate(&self) -> Result<(), Vec<FieldError>> {
        let mut errors = Errors::default();
        check_email(&mut errors, &self.email);
        if errors.required("password", &self.password, "password is required")
            && self.password.chars().count() < MIN_PASSWORD_LEN
        {
            errors.push("password", "password must have at least 6 characters");
        }
        errors.finish(|| ())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegisterForm {
    pub name: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

impl RegisterForm {
    pub fn validate(&self) -> Result<(), Vec<FieldError>> {
        let mut errors = Errors::default();
        if errors.required("name", &self.name, "name is required")
            && self.name.trim().chars().count() < MIN_NAME_LEN
        {
            errors.push("name", "name must have at least 2 characters");
        }
        check_email(&mut errors, &self.email);
        if errors.required("password", &self.password, "password is required") {
            if self.password.chars().count() < MIN_PASSWORD_LEN {
                errors.push("password", "password must have at least 6 characters");
            }
            let lower = self.password.chars().any(|c| c.is_lowercase());
            let upper = self.password.chars().any(|c| c.is_uppercase());
            let digit = self.password.chars().any(|c| c.is_ascii_digit());
            if !(lower && upper && digit) {
                errors.push(
                    "password",
                    "password must contain an uppercase letter, a lowercase letter and a number",
                );
            }
        }
        if errors.required(
            "confirm_password",
            &self.confirm_password,
            "password confirmation is required",
        ) && self.confirm_password != self.password
        {
            errors.push("confirm_password", "passwords do not match");
        }
        errors.finish(|| ())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResetPasswordForm {
    pub email: String,
}

impl ResetPasswordForm {
    pub fn validate(&self) -> Result<(), Vec<FieldError>> {
        let mut errors = Errors::default();
        check_email(&mut errors, &self.email);
        errors.finish(|| ())
    }
}
