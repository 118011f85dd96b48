//! Ticker universe section of the configuration document.

use crate::domain::errors::ConfigError;
use crate::domain::signals::SignalRules;
use serde::{Deserialize, Serialize};

pub const DEFAULT_LOOKBACK_DAYS: u32 = 120;
pub const DEFAULT_MAX_CONCURRENCY: usize = 4;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StocksConfig {
    pub tickers: Vec<String>,
    pub lookback_days: u32,
    pub max_concurrency: usize,
    pub rules: SignalRules,
}

impl Default for StocksConfig {
    fn default() -> Self {
        Self {
            tickers: Vec::new(),
            lookback_days: DEFAULT_LOOKBACK_DAYS,
            max_concurrency: DEFAULT_MAX_CONCURRENCY,
            rules: SignalRules::default(),
        }
    }
}

impl StocksConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.lookback_days == 0 {
            return Err(ConfigError::InvalidStockRule {
                rule: "lookback_days".to_string(),
                value: 0,
            });
        }
        if self.max_concurrency == 0 {
            return Err(ConfigError::InvalidStockRule {
                rule: "max_concurrency".to_string(),
                value: 0,
            });
        }
        self.rules.validate()
    }

    /// Tickers trimmed, upper-cased and de-duplicated, first occurrence wins
    pub fn normalized_tickers(&self) -> Vec<String> {
        let mut out: Vec<String> = Vec::with_capacity(self.tickers.len());
        for ticker in &self.tickers {
            let t = ticker.trim().to_uppercase();
            if !t.is_empty() && !out.contains(&t) {
                out.push(t);
            }
        }
        out
    }
}
