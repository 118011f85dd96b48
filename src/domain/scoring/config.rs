//! Scoring configuration value objects.
//!
//! Every scoring call receives a `ScoringConfig` explicitly. The types here
//! deserialize straight from the configuration document and validate their
//! own invariants, so a loaded config is always internally consistent.

use crate::domain::errors::ConfigError;
use crate::domain::market::Indicator;
use crate::domain::scoring::confluence::Trigger;
use crate::domain::scoring::state::Thresholds;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashSet};

/// A half-open `[lower, upper)` interval mapped to an ordinal score
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "(f64, f64, f64)", into = "(f64, f64, f64)")]
pub struct Band {
    pub lower: f64,
    pub upper: f64,
    pub score: f64,
}

impl Band {
    pub fn new(lower: f64, upper: f64, score: f64) -> Self {
        Self {
            lower,
            upper,
            score,
        }
    }

    pub fn contains(&self, value: f64) -> bool {
        self.lower <= value && value < self.upper
    }
}

impl From<(f64, f64, f64)> for Band {
    fn from((lower, upper, score): (f64, f64, f64)) -> Self {
        Self::new(lower, upper, score)
    }
}

impl From<Band> for (f64, f64, f64) {
    fn from(band: Band) -> Self {
        (band.lower, band.upper, band.score)
    }
}

/// Ordered bands for one indicator; evaluation order is list order
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BandTable(pub Vec<Band>);

impl BandTable {
    pub fn bands(&self) -> &[Band] {
        &self.0
    }

    fn validate(&self, indicator: Indicator) -> Result<(), ConfigError> {
        if self.0.is_empty() {
            return Err(ConfigError::EmptyBands {
                indicator: indicator.input_key().to_string(),
            });
        }
        for (index, band) in self.0.iter().enumerate() {
            // Negated so NaN bounds are rejected too
            if !(band.lower < band.upper) || band.score.is_nan() {
                return Err(ConfigError::InvalidBand {
                    indicator: indicator.input_key().to_string(),
                    index,
                    lower: band.lower,
                    upper: band.upper,
                });
            }
        }
        Ok(())
    }
}

/// Band tables for all eight indicators, keyed by input key in the document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(
    try_from = "BTreeMap<String, BandTable>",
    into = "BTreeMap<String, BandTable>"
)]
pub struct BandTables(BTreeMap<Indicator, BandTable>);

impl BandTables {
    pub fn get(&self, indicator: Indicator) -> &[Band] {
        self.0.get(&indicator).map(BandTable::bands).unwrap_or(&[])
    }
}

impl TryFrom<BTreeMap<String, BandTable>> for BandTables {
    type Error = ConfigError;

    fn try_from(raw: BTreeMap<String, BandTable>) -> Result<Self, Self::Error> {
        let mut tables = BTreeMap::new();
        for (name, table) in raw {
            let indicator = Indicator::from_input_key(&name)
                .ok_or(ConfigError::UnknownBandTable { name })?;
            table.validate(indicator)?;
            tables.insert(indicator, table);
        }

        if let Some(missing) = Indicator::ALL.iter().find(|i| !tables.contains_key(*i)) {
            return Err(ConfigError::MissingBands {
                indicator: missing.input_key().to_string(),
            });
        }

        Ok(Self(tables))
    }
}

impl From<BandTables> for BTreeMap<String, BandTable> {
    fn from(tables: BandTables) -> Self {
        tables
            .0
            .into_iter()
            .map(|(indicator, table)| (indicator.input_key().to_string(), table))
            .collect()
    }
}

/// Indicator weights keyed by score key.
///
/// Kept as a raw mapping: the composite aggregator checks its key set
/// against the scores it is handed on every call.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WeightSet(pub BTreeMap<String, f64>);

impl WeightSet {
    pub fn get(&self, key: &str) -> Option<f64> {
        self.0.get(key).copied()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        check_key_sets(
            Indicator::ALL.iter().map(|i| i.score_key()),
            self.keys(),
        )?;
        for (key, weight) in &self.0 {
            if !weight.is_finite() || *weight < 0.0 {
                return Err(ConfigError::InvalidWeight {
                    key: key.clone(),
                    weight: *weight,
                });
            }
        }
        Ok(())
    }
}

/// Fails with the missing and unexpected keys when the two sets differ
pub fn check_key_sets<'a>(
    expected: impl Iterator<Item = &'a str>,
    actual: impl Iterator<Item = &'a str>,
) -> Result<(), ConfigError> {
    let expected: BTreeSet<&str> = expected.collect();
    let actual: BTreeSet<&str> = actual.collect();

    if expected == actual {
        return Ok(());
    }

    Err(ConfigError::WeightKeyMismatch {
        missing: expected.difference(&actual).map(|k| k.to_string()).collect(),
        unexpected: actual.difference(&expected).map(|k| k.to_string()).collect(),
    })
}

/// One velocity tier: boost applies when the 7-step CRI delta reaches `threshold`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VelocityTier {
    pub threshold: f64,
    pub boost: f64,
}

/// Velocity tiers, written in the document as a `"threshold" = boost` table
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(try_from = "BTreeMap<String, f64>", into = "BTreeMap<String, f64>")]
pub struct VelocityBoostTable(Vec<VelocityTier>);

impl VelocityBoostTable {
    pub fn new(tiers: Vec<VelocityTier>) -> Self {
        Self(tiers)
    }

    pub fn tiers(&self) -> &[VelocityTier] {
        &self.0
    }
}

impl TryFrom<BTreeMap<String, f64>> for VelocityBoostTable {
    type Error = ConfigError;

    fn try_from(raw: BTreeMap<String, f64>) -> Result<Self, Self::Error> {
        let mut tiers = Vec::with_capacity(raw.len());
        for (key, boost) in raw {
            let threshold = key
                .trim()
                .parse::<f64>()
                .ok()
                .filter(|t| t.is_finite())
                .ok_or_else(|| ConfigError::InvalidVelocityThreshold { key: key.clone() })?;
            check_boost(&format!("velocity_boost.{}", key), boost)?;
            tiers.push(VelocityTier { threshold, boost });
        }
        tiers.sort_by(|a, b| a.threshold.total_cmp(&b.threshold));
        Ok(Self(tiers))
    }
}

impl From<VelocityBoostTable> for BTreeMap<String, f64> {
    fn from(table: VelocityBoostTable) -> Self {
        table
            .0
            .into_iter()
            .map(|tier| (tier.threshold.to_string(), tier.boost))
            .collect()
    }
}

fn check_boost(name: &str, boost: f64) -> Result<(), ConfigError> {
    if !boost.is_finite() || boost < 0.0 {
        return Err(ConfigError::InvalidBoost {
            name: name.to_string(),
            boost,
        });
    }
    Ok(())
}

/// Everything the scoring engine needs for one run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringConfig {
    pub bands: BandTables,
    pub weights: WeightSet,
    pub velocity_boost: VelocityBoostTable,
    pub confluence_hard_triggers: Vec<Trigger>,
    pub confluence_boost: f64,
    pub thresholds: Thresholds,
}

impl ScoringConfig {
    /// Cross-field validation not covered by deserialization
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.weights.validate()?;
        self.thresholds.validate()?;
        check_boost("confluence_boost", self.confluence_boost)?;
        for tier in self.velocity_boost.tiers() {
            check_boost("velocity_boost", tier.boost)?;
        }

        let mut seen = HashSet::new();
        for trigger in &self.confluence_hard_triggers {
            if !seen.insert(*trigger) {
                return Err(ConfigError::DuplicateTrigger {
                    name: trigger.to_string(),
                });
            }
        }
        Ok(())
    }
}
