// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Local key-value snapshot storage on top of SQLite.
//!
//! Each key holds one JSON document that is replaced wholesale on save.

use anyhow::{Context, Result};
use directories::ProjectDirs;
use rusqlite::{Connection, OptionalExtension, params};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::StorageError;
use crate::models::{AuthSnapshot, FinancialSnapshot};

const QUALIFIER: &str = "com.finflow";
const ORGANIZATION: &str = "Finflow";
const APPLICATION: &str = "finflow";

pub const FINANCIAL_KEY: &str = "financial-storage";
pub const AUTH_KEY: &str = "auth-storage";

/// Overrides the database location.
pub const DB_ENV: &str = "FINFLOW_DB";

pub fn project_dirs() -> Result<ProjectDirs> {
    ProjectDirs::from(QUALIFIER, ORGANIZATION, APPLICATION)
        .context("Could not determine platform-specific data dir")
}

pub fn db_path() -> Result<PathBuf> {
    if let Some(path) = std::env::var_os(DB_ENV) {
        return Ok(PathBuf::from(path));
    }
    let proj = project_dirs()?;
    let data_dir = proj.data_dir();
    fs::create_dir_all(data_dir).context("Failed to create data dir")?;
    Ok(data_dir.join("finflow.sqlite"))
}

pub fn open_or_init() -> Result<Connection> {
    open_at(&db_path()?)
}

pub fn open_at(path: &Path) -> Result<Connection> {
    let conn =
        Connection::open(path).with_context(|| format!("Open DB at {}", path.display()))?;
    init_schema(&conn)?;
    Ok(conn)
}

pub fn init_schema(conn: &Connection) -> Result<(), StorageError> {
    conn.execute_batch(
        r#"
    CREATE TABLE IF NOT EXISTS storage(
        key TEXT PRIMARY KEY,
        value TEXT NOT NULL,
        updated_at TEXT NOT NULL DEFAULT (datetime('now'))
    );
    "#,
    )?;
    Ok(())
}

/// The stored document for `key`, or `T::default()` when none exists.
pub fn load_snapshot<T>(conn: &Connection, key: &str) -> Result<T, StorageError>
where
    T: DeserializeOwned + Default,
{
    let raw: Option<String> = conn
        .query_row(
            "SELECT value FROM storage WHERE key=?1",
            params![key],
            |r| r.get(0),
        )
        .optional()?;
    match raw {
        Some(json) => {
            tracing::debug!(key, bytes = json.len(), "loaded snapshot");
            serde_json::from_str(&json).map_err(|source| StorageError::Corrupt {
                key: key.to_string(),
                source,
            })
        }
        None => Ok(T::default()),
    }
}

pub fn save_snapshot<T: Serialize>(conn: &Connection, key: &str, value: &T) -> Result<(), StorageError> {
    let json = serde_json::to_string(value).map_err(|source| StorageError::Serialize {
        key: key.to_string(),
        source,
    })?;
    conn.execute(
        "INSERT INTO storage(key, value) VALUES(?1, ?2)
         ON CONFLICT(key) DO UPDATE SET value=excluded.value, updated_at=datetime('now')",
        params![key, json],
    )?;
    tracing::debug!(key, bytes = json.len(), "saved snapshot");
    Ok(())
}

/// Returns whether a document was removed.
pub fn delete_snapshot(conn: &Connection, key: &str) -> Result<bool, StorageError> {
    let n = conn.execute("DELETE FROM storage WHERE key=?1", params![key])?;
    Ok(n > 0)
}

pub fn load_financial(conn: &Connection) -> Result<FinancialSnapshot, StorageError> {
    load_snapshot(conn, FINANCIAL_KEY)
}

pub fn save_financial(conn: &Connection, snapshot: &FinancialSnapshot) -> Result<(), StorageError> {
    save_snapshot(conn, FINANCIAL_KEY, snapshot)
}

pub fn load_auth(conn: &Connection) -> Result<AuthSnapshot, StorageError> {
    load_snapshot(conn, AUTH_KEY)
}

pub fn save_auth(conn: &Connection, snapshot: &AuthSnapshot) -> Result<(), StorageError> {
    save_snapshot(conn, AUTH_KEY, snapshot)
}
