//! # Configuration Module
//!
//! This module defines the application configuration, read from the
//! environment (and a `.env` file loaded by the binary).

use anyhow::{Context, Result};
use std::env;
use std::fs;
use std::path::PathBuf;
use tracing::info;

use crate::currency::DEFAULT_CURRENCY_SYMBOL;
use crate::units::UnitTable;

// Environment variable names
pub const LANGUAGE_VAR: &str = "FOOD_COST_LANGUAGE";
pub const CURRENCY_SYMBOL_VAR: &str = "FOOD_COST_CURRENCY_SYMBOL";
pub const UNITS_FILE_VAR: &str = "FOOD_COST_UNITS_FILE";
pub const LOG_FORMAT_VAR: &str = "FOOD_COST_LOG_FORMAT";

pub const DEFAULT_LANGUAGE: &str = "en";

/// Output format of log events
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Human readable lines
    #[default]
    Text,
    /// One JSON object per event
    Json,
}

impl std::str::FromStr for LogFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "text" => Ok(LogFormat::Text),
            "json" => Ok(LogFormat::Json),
            other => Err(anyhow::anyhow!("Unknown log format '{other}', expected text or json")),
        }
    }
}

/// Application configuration
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    /// Language of text reports (e.g., "en", "fr")
    pub language: String,
    /// Symbol printed before currency amounts
    pub currency_symbol: String,
    /// JSON file replacing the standard unit table
    pub units_file: Option<PathBuf>,
    /// Log output format
    pub log_format: LogFormat,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            language: DEFAULT_LANGUAGE.to_string(),
            currency_symbol: DEFAULT_CURRENCY_SYMBOL.to_string(),
            units_file: None,
            log_format: LogFormat::Text,
        }
    }
}

impl AppConfig {
    /// Read the configuration from the process environment
    ///
    /// Unset or blank variables keep their default values.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the configuration from any key lookup
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        let defaults = Self::default();

        let log_format = match get(LOG_FORMAT_VAR) {
            Some(raw) => raw
                .parse::<LogFormat>()
                .with_context(|| format!("Invalid value for {LOG_FORMAT_VAR}"))?,
            None => defaults.log_format,
        };

        Ok(Self {
            language: get(LANGUAGE_VAR)
                .map(|v| v.trim().to_string())
                .unwrap_or(defaults.language),
            currency_symbol: get(CURRENCY_SYMBOL_VAR)
                .map(|v| v.trim().to_string())
                .unwrap_or(defaults.currency_symbol),
            units_file: get(UNITS_FILE_VAR).map(|v| PathBuf::from(v.trim())),
            log_format,
        })
    }

    /// Load the configured unit table, or the standard one
    pub fn load_unit_table(&self) -> Result<UnitTable> {
        match &self.units_file {
            Some(path) => {
                info!(path = %path.display(), "Loading unit table");
                let content = fs::read_to_string(path)
                    .with_context(|| format!("Failed to read unit table {}", path.display()))?;
                UnitTable::from_json_str(&content)
                    .with_context(|| format!("Invalid unit table {}", path.display()))
            }
            None => Ok(UnitTable::standard()),
        }
    }
}
