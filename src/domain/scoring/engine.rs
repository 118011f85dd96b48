use crate::domain::errors::ScoringError;
use crate::domain::market::IndicatorSet;
use crate::domain::scoring::bands::band_score;
use crate::domain::scoring::composite::composite_score;
use crate::domain::scoring::config::ScoringConfig;
use crate::domain::scoring::confluence::{Trigger, confluence_boost, fired_triggers};
use crate::domain::scoring::state::RiskState;
use crate::domain::scoring::velocity::velocity_boost;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

/// Boost breakdown recorded next to every score
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ScoreDetails {
    #[serde(rename = "vel_boost")]
    pub velocity_boost: f64,
    #[serde(rename = "conf_boost")]
    pub confluence_boost: f64,
    /// Every trigger that fired, whether or not it counted toward the boost
    pub triggers: Vec<Trigger>,
}

/// Outcome of one scoring run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreResult {
    pub scores: BTreeMap<String, f64>,
    pub cri: f64,
    pub state: RiskState,
    pub details: ScoreDetails,
}

/// Round to two decimals, half away from zero
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Score one `IndicatorSet` against the configuration and CRI history.
///
/// Order: band scores, weighted composite, velocity boost, confluence
/// boost, a single rounding to 2 decimals, then classification of the
/// rounded value.
pub fn compute_scores(
    config: &ScoringConfig,
    inputs: &IndicatorSet,
    history_cri: &[f64],
) -> Result<ScoreResult, ScoringError> {
    let mut scores = BTreeMap::new();
    for (indicator, value) in inputs.iter() {
        if !value.is_finite() {
            return Err(ScoringError::NonFiniteInput {
                indicator: indicator.input_key().to_string(),
                value,
            });
        }
        let score = band_score(config.bands.get(indicator), value);
        debug!(indicator = %indicator, value, score, "Band score");
        scores.insert(indicator.score_key().to_string(), score);
    }

    let raw_cri = composite_score(&scores, &config.weights)?;
    let vel_boost = velocity_boost(raw_cri, history_cri, &config.velocity_boost);

    let triggers = fired_triggers(inputs);
    let conf_boost = confluence_boost(
        &triggers,
        &config.confluence_hard_triggers,
        config.confluence_boost,
    );

    let cri = round2(raw_cri + vel_boost + conf_boost);
    let state = config.thresholds.classify(cri);

    debug!(
        raw_cri,
        vel_boost,
        conf_boost,
        cri,
        state = %state,
        "Composite CRI computed"
    );

    Ok(ScoreResult {
        scores,
        cri,
        state,
        details: ScoreDetails {
            velocity_boost: vel_boost,
            confluence_boost: conf_boost,
            triggers,
        },
    })
}
