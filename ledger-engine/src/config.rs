//! Engine configuration, loaded from environment (prefix `APP`, `__`
//! separator) plus an optional `configuration` file.

use ledger_core::error::AppError;
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct LedgerConfig {
    #[serde(default = "default_service_name")]
    pub service_name: String,
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default)]
    pub otlp_endpoint: Option<String>,
    pub database: DatabaseConfig,
    #[serde(default)]
    pub import: ImportConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
}

/// Import policy. The lookback window is deliberately configurable:
/// six months is a default, not a business requirement.
#[derive(Debug, Deserialize, Clone)]
pub struct ImportConfig {
    #[serde(default = "default_lookback_months")]
    pub lookback_months: u32,
    #[serde(default = "default_created_by")]
    pub created_by: String,
    /// When set, the binary imports this file on startup.
    #[serde(default)]
    pub csv_path: Option<String>,
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            lookback_months: default_lookback_months(),
            created_by: default_created_by(),
            csv_path: None,
        }
    }
}

fn default_service_name() -> String {
    "ledger-engine".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_max_connections() -> u32 {
    5
}

fn default_min_connections() -> u32 {
    1
}

fn default_lookback_months() -> u32 {
    crate::services::dedup::DEFAULT_LOOKBACK_MONTHS
}

fn default_created_by() -> String {
    "CSV Import".to_string()
}

impl LedgerConfig {
    pub fn load() -> Result<Self, AppError> {
        ledger_core::config::load()
    }
}
