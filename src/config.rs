// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};

use crate::dates::{Locale, WeekStart};
use crate::ledger::DEFAULT_CURRENCY;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default = "default_currency")]
    pub currency_symbol: String,
    #[serde(default)]
    pub locale: Locale,
    #[serde(default)]
    pub week_start: WeekStart,
    #[serde(default = "default_recent_days")]
    pub recent_days: u32,
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_currency() -> String {
    DEFAULT_CURRENCY.to_string()
}

fn default_recent_days() -> u32 {
    7
}

fn default_log_level() -> String {
    "warn".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            currency_symbol: default_currency(),
            locale: Locale::default(),
            week_start: WeekStart::default(),
            recent_days: default_recent_days(),
            log_level: default_log_level(),
        }
    }
}

impl Settings {
    /// Updates one field from its textual form.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "currency_symbol" => self.currency_symbol = value.trim().to_string(),
            "locale" => self.locale = value.parse().map_err(|e: String| anyhow!(e))?,
            "week_start" => self.week_start = value.parse().map_err(|e: String| anyhow!(e))?,
            "recent_days" => {
                self.recent_days = value
                    .trim()
                    .parse()
                    .with_context(|| format!("Invalid day count '{}'", value))?
            }
            "log_level" => self.log_level = value.trim().to_string(),
            other => return Err(anyhow!("Unknown setting '{}'", other)),
        }
        Ok(())
    }
}

pub fn settings_path() -> Result<PathBuf> {
    Ok(crate::db::project_dirs()?.config_dir().join("settings.json"))
}

/// Missing or unreadable files fall back to defaults.
pub fn load_settings_from(path: &Path) -> Settings {
    match std::fs::read_to_string(path) {
        Ok(content) => serde_json::from_str(&content).unwrap_or_else(|err| {
            tracing::warn!("ignoring malformed settings at {}: {err}", path.display());
            Settings::default()
        }),
        Err(_) => Settings::default(),
    }
}

pub fn load_settings() -> Settings {
    match settings_path() {
        Ok(path) => load_settings_from(&path),
        Err(_) => Settings::default(),
    }
}

pub fn save_settings_to(path: &Path, settings: &Settings) -> Result<()> {
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create {}", dir.display()))?;
    }
    let json = serde_json::to_string_pretty(settings)?;
    std::fs::write(path, format!("{json}\n"))
        .with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}

pub fn save_settings(settings: &Settings) -> Result<()> {
    save_settings_to(&settings_path()?, settings)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_merges_with_defaults() {
        let json = r#"{"currency_symbol": "$", "locale": "pt-BR"}"#;
        let s: Settings = serde_json::from_str(json).unwrap();
        assert_eq!(s.currency_symbol, "$");
        assert_eq!(s.locale, Locale::PtBr);
        assert_eq!(s.week_start, WeekStart::Sunday);
        assert_eq!(s.recent_days, 7);
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("settings.json");
        let mut settings = Settings::default();
        settings.set("week_start", "monday").unwrap();
        settings.set("recent_days", "30").unwrap();
        save_settings_to(&path, &settings).unwrap();
        assert_eq!(load_settings_from(&path), settings);
    }

    #[test]
    fn test_set_rejects_unknown_key() {
        let mut settings = Settings::default();
        assert!(settings.set("theme", "dark").is_err());
        assert!(settings.set("locale", "fr").is_err());
    }

    #[test]
    fn test_load_returns_defaults_when_missing() {
        let dir = tempfile::tempdir().unwrap();
        let s = load_settings_from(&dir.path().join("absent.json"));
        assert_eq!(s, Settings::default());
    }
}
