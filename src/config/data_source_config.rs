//! Data source configuration parsing from environment variables.

use anyhow::{Context, Result};
use std::env;

pub const DEFAULT_FRED_BASE_URL: &str = "https://api.stlouisfed.org";
pub const DEFAULT_YAHOO_BASE_URL: &str = "https://query1.finance.yahoo.com";

pub const DEFAULT_SHILLER_PE: f64 = 33.0;
pub const DEFAULT_BUFFETT_INDICATOR: f64 = 170.0;
pub const DEFAULT_MARGIN_DEBT_Z: f64 = 0.5;

/// Macro and market data source environment configuration
#[derive(Debug, Clone)]
pub struct DataSourceEnvConfig {
    pub fred_api_key: String,
    pub fred_base_url: String,
    pub yahoo_base_url: String,
    pub shiller_pe: f64,
    pub buffett_indicator: f64,
    pub margin_debt_z: f64,
}

impl Default for DataSourceEnvConfig {
    fn default() -> Self {
        Self {
            fred_api_key: String::new(),
            fred_base_url: DEFAULT_FRED_BASE_URL.to_string(),
            yahoo_base_url: DEFAULT_YAHOO_BASE_URL.to_string(),
            shiller_pe: DEFAULT_SHILLER_PE,
            buffett_indicator: DEFAULT_BUFFETT_INDICATOR,
            margin_debt_z: DEFAULT_MARGIN_DEBT_Z,
        }
    }
}

impl DataSourceEnvConfig {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            fred_api_key: env::var("FRED_API_KEY").unwrap_or_default(),
            fred_base_url: env::var("FRED_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_FRED_BASE_URL.to_string()),
            yahoo_base_url: env::var("YAHOO_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_YAHOO_BASE_URL.to_string()),
            shiller_pe: env_f64("SHILLER_PE_OVERRIDE", DEFAULT_SHILLER_PE)?,
            buffett_indicator: env_f64("BUFFETT_INDICATOR_OVERRIDE", DEFAULT_BUFFETT_INDICATOR)?,
            margin_debt_z: env_f64("MARGIN_DEBT_Z_OVERRIDE", DEFAULT_MARGIN_DEBT_Z)?,
        })
    }
}

/// Parse an optional float variable; a present but malformed value is an error
pub(crate) fn env_f64(name: &str, default: f64) -> Result<f64> {
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse::<f64>()
            .with_context(|| format!("Invalid {}: '{}' is not a number", name, raw)),
        Err(_) => Ok(default),
    }
}
