// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use thiserror::Error;

/// Reasons a transaction is rejected before it touches the ledger.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("type, category and amount are required")]
    MissingCategory,

    #[error("amount must be greater than zero, got {0}")]
    NonPositiveAmount(Decimal),

    #[error("amount must not exceed 1000000000000000, got {0}")]
    AmountTooLarge(Decimal),

    /// Transactions record events that already happened.
    #[error("cannot record a transaction dated in the future ({0})")]
    FutureDate(NaiveDate),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("transaction {0} not found")]
    NotFound(i64),

    #[error("salary cannot be negative, got {0}")]
    NegativeSalary(Decimal),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    #[error("email and password are required")]
    MissingCredentials,

    #[error("all fields are required")]
    MissingFields,

    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("email {0} is already in use")]
    EmailInUse(String),

    #[error("email {0} not found")]
    EmailNotFound(String),
}

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("database error: {0}")]
    Db(#[from] rusqlite::Error),

    #[error("snapshot '{key}' is not valid JSON: {source}")]
    Corrupt {
        key: String,
        source: serde_json::Error,
    },

    #[error("could not serialize snapshot '{key}': {source}")]
    Serialize {
        key: String,
        source: serde_json::Error,
    },
}
