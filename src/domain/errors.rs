use thiserror::Error;

/// Errors raised while loading or validating the scoring configuration
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("Missing band table for indicator '{indicator}'")]
    MissingBands { indicator: String },

    #[error("Band table for '{indicator}' is empty")]
    EmptyBands { indicator: String },

    #[error("Invalid band #{index} for '{indicator}': lower {lower} must be < upper {upper}")]
    InvalidBand {
        indicator: String,
        index: usize,
        lower: f64,
        upper: f64,
    },

    #[error("Unknown band table '{name}'")]
    UnknownBandTable { name: String },

    #[error("Weight keys do not match score keys (missing: {missing:?}, unexpected: {unexpected:?})")]
    WeightKeyMismatch {
        missing: Vec<String>,
        unexpected: Vec<String>,
    },

    #[error("Weight for '{key}' must be finite and non-negative, got {weight}")]
    InvalidWeight { key: String, weight: f64 },

    #[error("Velocity boost threshold '{key}' is not a finite number")]
    InvalidVelocityThreshold { key: String },

    #[error("Boost '{name}' must be finite and non-negative, got {boost}")]
    InvalidBoost { name: String, boost: f64 },

    #[error("Confluence trigger '{name}' is listed more than once")]
    DuplicateTrigger { name: String },

    #[error("Thresholds must satisfy yellow <= orange <= red, got {yellow} / {orange} / {red}")]
    ThresholdOrder { yellow: f64, orange: f64, red: f64 },

    #[error("Stock rule '{rule}' must be >= 1, got {value}")]
    InvalidStockRule { rule: String, value: usize },
}

/// Errors raised by the scoring engine itself
#[derive(Debug, Error, PartialEq)]
pub enum ScoringError {
    #[error("Indicator '{indicator}' has non-finite value {value}")]
    NonFiniteInput { indicator: String, value: f64 },

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

/// Errors related to market and macro data retrieval
#[derive(Debug, Error, PartialEq)]
pub enum MarketDataError {
    #[error("No data returned for {symbol}")]
    NoData { symbol: String },

    #[error("Invalid market data for {symbol}: {reason}")]
    InvalidData { symbol: String, reason: String },

    #[error("Series {series} needs at least {needed} observations, got {available}")]
    InsufficientHistory {
        series: String,
        needed: usize,
        available: usize,
    },

    #[error("No fetcher registered for indicator '{indicator}'")]
    MissingFetcher { indicator: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_weight_mismatch_formatting() {
        let err = ConfigError::WeightKeyMismatch {
            missing: vec!["vix".to_string()],
            unexpected: vec!["vol".to_string()],
        };

        let msg = err.to_string();
        assert!(msg.contains("vix"));
        assert!(msg.contains("vol"));
    }

    #[test]
    fn test_scoring_error_wraps_config_error() {
        let err: ScoringError = ConfigError::DuplicateTrigger {
            name: "vix_gt_30".to_string(),
        }
        .into();

        assert!(err.to_string().contains("vix_gt_30"));
    }
}
