//! Configuration module for CrashGuard.
//!
//! Two sources: the TOML scoring document (bands, weights, boosts, thresholds,
//! ticker universe) and environment variables (paths, API credentials,
//! indicator overrides, notification channels).

mod data_source_config;
mod notification_config;
mod stocks_config;

pub use data_source_config::{
    DEFAULT_BUFFETT_INDICATOR, DEFAULT_FRED_BASE_URL, DEFAULT_MARGIN_DEBT_Z, DEFAULT_SHILLER_PE,
    DEFAULT_YAHOO_BASE_URL, DataSourceEnvConfig,
};
pub use notification_config::{DEFAULT_PUSHOVER_API_URL, NotificationEnvConfig, PushoverConfig};
pub use stocks_config::{DEFAULT_LOOKBACK_DAYS, DEFAULT_MAX_CONCURRENCY, StocksConfig};

use crate::domain::errors::ConfigError;
use crate::domain::scoring::ScoringConfig;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_PATH: &str = "config.toml";
pub const DEFAULT_HISTORY_PATH: &str = "crashguard_history.json";

/// The TOML configuration document.
///
/// Scoring tables sit at the top level; the ticker universe lives under `[stocks]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrashGuardConfig {
    #[serde(flatten)]
    pub scoring: ScoringConfig,
    #[serde(default)]
    pub stocks: StocksConfig,
}

impl CrashGuardConfig {
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: CrashGuardConfig =
            toml::from_str(content).context("Failed to parse configuration TOML")?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        Self::from_toml_str(&content)
            .with_context(|| format!("Invalid config file: {}", path.display()))
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.scoring.validate()?;
        self.stocks.validate()
    }
}

/// Process-level settings read from the environment.
#[derive(Debug, Clone)]
pub struct Config {
    pub config_path: PathBuf,
    pub history_path: PathBuf,
    pub data_sources: DataSourceEnvConfig,
    pub notifications: NotificationEnvConfig,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let data_sources =
            DataSourceEnvConfig::from_env().context("Failed to load data source config")?;
        let notifications = NotificationEnvConfig::from_env();

        Ok(Self {
            config_path: env::var("CRASHGUARD_CONFIG")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_PATH)),
            history_path: env::var("CRASHGUARD_HISTORY")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(DEFAULT_HISTORY_PATH)),
            data_sources,
            notifications,
        })
    }
}
