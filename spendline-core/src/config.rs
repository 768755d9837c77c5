//! Configuration management
//!
//! Settings live in `settings.json` in the data directory:
//! ```json
//! {
//!   "app": { "storage": "json", "currencySymbol": "₹", "trendMonths": 6 },
//!   "passwordHashing": { "memoryCost": 19456, "timeCost": 2, "parallelism": 1 }
//! }
//! ```
//! Keys this crate does not know about are preserved on save.

use std::collections::HashMap;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::result::{Error, Result};
use crate::domain::Argon2Params;
use crate::services::aggregate::DEFAULT_TREND_MONTHS;

pub const SETTINGS_FILENAME: &str = "settings.json";

/// Environment variable overriding `app.storage`
pub const STORAGE_ENV_VAR: &str = "SPENDLINE_STORAGE";

pub const DEFAULT_CURRENCY_SYMBOL: &str = "₹";

/// Which repository adapter backs the store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    /// `store.json` key-value file
    #[default]
    Json,
    /// `spendline.duckdb`
    Duckdb,
}

impl fmt::Display for StorageBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            StorageBackend::Json => "json",
            StorageBackend::Duckdb => "duckdb",
        })
    }
}

impl FromStr for StorageBackend {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "json" => Ok(StorageBackend::Json),
            "duckdb" => Ok(StorageBackend::Duckdb),
            other => Err(Error::Config(format!(
                "Unknown storage backend '{}'. Expected json or duckdb",
                other
            ))),
        }
    }
}

/// Raw settings.json structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SettingsFile {
    #[serde(default)]
    app: AppSettings,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    password_hashing: Option<Argon2Params>,
    #[serde(flatten)]
    other: HashMap<String, serde_json::Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AppSettings {
    #[serde(default)]
    storage: StorageBackend,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    currency_symbol: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    trend_months: Option<usize>,
    #[serde(flatten)]
    other: HashMap<String, serde_json::Value>,
}

/// Spendline configuration (resolved view of settings)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub storage: StorageBackend,
    pub currency_symbol: String,
    pub trend_months: usize,
    pub password_hashing: Argon2Params,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            storage: StorageBackend::default(),
            currency_symbol: DEFAULT_CURRENCY_SYMBOL.to_string(),
            trend_months: DEFAULT_TREND_MONTHS,
            password_hashing: Argon2Params::default(),
        }
    }
}

impl Config {
    /// Load config from the data directory
    ///
    /// A missing file gives defaults. `SPENDLINE_STORAGE` overrides the
    /// storage backend.
    pub fn load(data_dir: &Path) -> Result<Self> {
        let mut config = Self::load_file(data_dir)?;
        if let Some(storage) = storage_override()? {
            config.storage = storage;
        }
        Ok(config)
    }

    /// Load settings.json alone, ignoring environment overrides
    pub fn load_file(data_dir: &Path) -> Result<Self> {
        let raw = read_settings(data_dir)?;
        let storage = raw.app.storage;

        let trend_months = raw.app.trend_months.unwrap_or(DEFAULT_TREND_MONTHS);
        if trend_months == 0 {
            return Err(Error::Config("app.trendMonths must be at least 1".to_string()));
        }

        Ok(Self {
            storage,
            currency_symbol: raw
                .app
                .currency_symbol
                .unwrap_or_else(|| DEFAULT_CURRENCY_SYMBOL.to_string()),
            trend_months,
            password_hashing: raw.password_hashing.unwrap_or_default(),
        })
    }

    /// Change one setting by its CLI name: `storage`, `currency` or
    /// `trend-months`
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let value = value.trim();
        match key {
            "storage" => self.storage = value.parse()?,
            "currency" => {
                if value.is_empty() {
                    return Err(Error::validation("Currency symbol cannot be empty"));
                }
                self.currency_symbol = value.to_string();
            }
            "trend-months" => {
                self.trend_months = match value.parse::<usize>() {
                    Ok(n) if n > 0 => n,
                    _ => {
                        return Err(Error::validation(format!(
                            "trend-months must be a whole number of at least 1, got '{}'",
                            value
                        )))
                    }
                };
            }
            other => {
                return Err(Error::validation(format!(
                    "Unknown setting '{}'. Expected storage, currency or trend-months",
                    other
                )))
            }
        }
        Ok(())
    }

    /// Save config, preserving settings this crate doesn't manage
    pub fn save(&self, data_dir: &Path) -> Result<()> {
        let mut settings = read_settings(data_dir)?;

        settings.app.storage = self.storage;
        settings.app.currency_symbol = Some(self.currency_symbol.clone());
        settings.app.trend_months = Some(self.trend_months);
        settings.password_hashing = Some(self.password_hashing.clone());

        let content = serde_json::to_string_pretty(&settings)?;
        std::fs::write(data_dir.join(SETTINGS_FILENAME), content)?;
        Ok(())
    }
}

/// Backend named by `SPENDLINE_STORAGE`, if set
pub fn storage_override() -> Result<Option<StorageBackend>> {
    match std::env::var(STORAGE_ENV_VAR) {
        Ok(value) if !value.trim().is_empty() => Ok(Some(value.parse()?)),
        _ => Ok(None),
    }
}

fn read_settings(data_dir: &Path) -> Result<SettingsFile> {
    let settings_path = data_dir.join(SETTINGS_FILENAME);
    if !settings_path.exists() {
        return Ok(SettingsFile::default());
    }

    let content = std::fs::read_to_string(&settings_path)?;
    serde_json::from_str(&content)
        .map_err(|e| Error::Config(format!("Invalid {}: {}", settings_path.display(), e)))
}
