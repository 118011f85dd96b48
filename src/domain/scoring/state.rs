use crate::domain::errors::ConfigError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Risk classification of a final CRI value, ordered from calm to severe
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RiskState {
    Green,
    Yellow,
    Orange,
    Red,
}

impl RiskState {
    /// Any state above GREEN warrants a notification
    pub fn is_elevated(&self) -> bool {
        *self != RiskState::Green
    }

    /// Numeric level used for gauges (GREEN = 0 ... RED = 3)
    pub fn level(&self) -> u8 {
        match self {
            Self::Green => 0,
            Self::Yellow => 1,
            Self::Orange => 2,
            Self::Red => 3,
        }
    }
}

impl fmt::Display for RiskState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Green => "GREEN",
            Self::Yellow => "YELLOW",
            Self::Orange => "ORANGE",
            Self::Red => "RED",
        };
        f.pad(name)
    }
}

/// Inclusive lower bounds of the YELLOW, ORANGE and RED states
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Thresholds {
    pub yellow: f64,
    pub orange: f64,
    pub red: f64,
}

impl Thresholds {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let finite = self.yellow.is_finite() && self.orange.is_finite() && self.red.is_finite();
        if !finite || self.yellow > self.orange || self.orange > self.red {
            return Err(ConfigError::ThresholdOrder {
                yellow: self.yellow,
                orange: self.orange,
                red: self.red,
            });
        }
        Ok(())
    }

    /// Highest bar first; no hysteresis, the prior state is never consulted
    pub fn classify(&self, cri: f64) -> RiskState {
        if cri >= self.red {
            RiskState::Red
        } else if cri >= self.orange {
            RiskState::Orange
        } else if cri >= self.yellow {
            RiskState::Yellow
        } else {
            RiskState::Green
        }
    }
}
