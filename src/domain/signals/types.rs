use crate::domain::errors::ConfigError;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SignalKind {
    Drawdown,
    #[serde(rename = "MA")]
    MovingAverage,
    Cross,
    Gap,
}

impl fmt::Display for SignalKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Drawdown => write!(f, "Drawdown"),
            Self::MovingAverage => write!(f, "MA"),
            Self::Cross => write!(f, "Cross"),
            Self::Gap => write!(f, "Gap"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SignalLevel {
    Alert,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TickerSignal {
    #[serde(rename = "type")]
    pub kind: SignalKind,
    pub level: SignalLevel,
    pub detail: String,
}

impl TickerSignal {
    pub fn alert(kind: SignalKind, detail: impl Into<String>) -> Self {
        Self {
            kind,
            level: SignalLevel::Alert,
            detail: detail.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TickerStatus {
    Ok,
    Alert,
}

/// Per-ticker outcome: a full analysis, or the reason there is none
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TickerAnalysis {
    Analyzed {
        ticker: String,
        price: f64,
        signals: Vec<TickerSignal>,
        status: TickerStatus,
    },
    Failed {
        ticker: String,
        error: String,
    },
}

impl TickerAnalysis {
    pub fn failed(ticker: impl Into<String>, error: impl fmt::Display) -> Self {
        Self::Failed {
            ticker: ticker.into(),
            error: error.to_string(),
        }
    }

    pub fn ticker(&self) -> &str {
        match self {
            Self::Analyzed { ticker, .. } | Self::Failed { ticker, .. } => ticker,
        }
    }

    /// True only for a successful analysis whose status is ALERT
    pub fn is_alert(&self) -> bool {
        matches!(
            self,
            Self::Analyzed {
                status: TickerStatus::Alert,
                ..
            }
        )
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }
}

/// Window lengths and alert levels for the technical signals.
///
/// Percentages are signed: an alert fires when the move is at or below
/// the configured (negative) level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SignalRules {
    pub drawdown_window: usize,
    pub drawdown_alert_pct: f64,
    pub ma_period: usize,
    pub ma_alert_pct: f64,
    pub fast_ma_period: usize,
    pub slow_ma_period: usize,
    pub gap_alert_pct: f64,
}

impl Default for SignalRules {
    fn default() -> Self {
        Self {
            drawdown_window: 20,
            drawdown_alert_pct: -5.0,
            ma_period: 50,
            ma_alert_pct: -3.0,
            fast_ma_period: 20,
            slow_ma_period: 50,
            gap_alert_pct: -3.0,
        }
    }
}

impl SignalRules {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let windows = [
            ("drawdown_window", self.drawdown_window),
            ("ma_period", self.ma_period),
            ("fast_ma_period", self.fast_ma_period),
            ("slow_ma_period", self.slow_ma_period),
        ];
        for (rule, value) in windows {
            if value == 0 {
                return Err(ConfigError::InvalidStockRule {
                    rule: rule.to_string(),
                    value,
                });
            }
        }
        Ok(())
    }
}
