use serde::{Deserialize, Serialize};
use std::fmt;

/// The eight macro/market indicators feeding the Crash Risk Index.
///
/// Each indicator is known under two keys: the *input key* used for raw
/// values and band tables, and the shorter *score key* used for scores and
/// weights. Persisted history relies on both spellings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Indicator {
    Shiller,
    Buffett,
    UnempYoy,
    CpiYoy,
    GdpQoqAnnualized,
    CurveBps,
    Vix,
    MarginZ,
}

impl Indicator {
    pub const ALL: [Indicator; 8] = [
        Indicator::Shiller,
        Indicator::Buffett,
        Indicator::UnempYoy,
        Indicator::CpiYoy,
        Indicator::GdpQoqAnnualized,
        Indicator::CurveBps,
        Indicator::Vix,
        Indicator::MarginZ,
    ];

    pub fn input_key(&self) -> &'static str {
        match self {
            Self::Shiller => "shiller",
            Self::Buffett => "buffett",
            Self::UnempYoy => "unemp_yoy",
            Self::CpiYoy => "cpi_yoy",
            Self::GdpQoqAnnualized => "gdp_qoq_annualized",
            Self::CurveBps => "curve_bps",
            Self::Vix => "vix",
            Self::MarginZ => "margin_z",
        }
    }

    pub fn score_key(&self) -> &'static str {
        match self {
            Self::Shiller => "shiller",
            Self::Buffett => "buffett",
            Self::UnempYoy => "unemp",
            Self::CpiYoy => "cpi",
            Self::GdpQoqAnnualized => "gdp",
            Self::CurveBps => "curve",
            Self::Vix => "vix",
            Self::MarginZ => "margin",
        }
    }

    pub fn from_input_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|i| i.input_key() == key)
    }
}

impl fmt::Display for Indicator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.input_key())
    }
}

/// Raw indicator values for one scoring run
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IndicatorSet {
    pub shiller: f64,
    pub buffett: f64,
    pub unemp_yoy: f64,
    pub cpi_yoy: f64,
    pub gdp_qoq_annualized: f64,
    pub curve_bps: f64,
    pub vix: f64,
    pub margin_z: f64,
}

impl IndicatorSet {
    pub fn get(&self, indicator: Indicator) -> f64 {
        match indicator {
            Indicator::Shiller => self.shiller,
            Indicator::Buffett => self.buffett,
            Indicator::UnempYoy => self.unemp_yoy,
            Indicator::CpiYoy => self.cpi_yoy,
            Indicator::GdpQoqAnnualized => self.gdp_qoq_annualized,
            Indicator::CurveBps => self.curve_bps,
            Indicator::Vix => self.vix,
            Indicator::MarginZ => self.margin_z,
        }
    }

    /// Iterate `(indicator, value)` pairs in canonical order
    pub fn iter(&self) -> impl Iterator<Item = (Indicator, f64)> + '_ {
        Indicator::ALL.into_iter().map(move |i| (i, self.get(i)))
    }
}

/// Incrementally assembles an `IndicatorSet`, one fetched value at a time
#[derive(Debug, Default)]
pub struct IndicatorSetBuilder {
    values: [Option<f64>; 8],
}

impl IndicatorSetBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, indicator: Indicator, value: f64) -> &mut Self {
        self.values[Self::slot(indicator)] = Some(value);
        self
    }

    /// Indicators that have not been set yet
    pub fn missing(&self) -> Vec<Indicator> {
        Indicator::ALL
            .into_iter()
            .filter(|i| self.values[Self::slot(*i)].is_none())
            .collect()
    }

    /// Returns `None` if any indicator is still missing
    pub fn build(&self) -> Option<IndicatorSet> {
        let v = |i: Indicator| self.values[Self::slot(i)];
        Some(IndicatorSet {
            shiller: v(Indicator::Shiller)?,
            buffett: v(Indicator::Buffett)?,
            unemp_yoy: v(Indicator::UnempYoy)?,
            cpi_yoy: v(Indicator::CpiYoy)?,
            gdp_qoq_annualized: v(Indicator::GdpQoqAnnualized)?,
            curve_bps: v(Indicator::CurveBps)?,
            vix: v(Indicator::Vix)?,
            margin_z: v(Indicator::MarginZ)?,
        })
    }

    fn slot(indicator: Indicator) -> usize {
        Indicator::ALL
            .iter()
            .position(|i| *i == indicator)
            .unwrap_or_default()
    }
}
