// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

pub mod auth;
pub mod cli;
pub mod commands;
pub mod config;
pub mod dates;
pub mod db;
pub mod error;
pub mod ledger;
pub mod logging;
pub mod metrics;
pub mod models;
pub mod notify;
pub mod utils;
pub mod validation;
