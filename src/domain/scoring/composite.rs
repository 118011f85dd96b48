use crate::domain::errors::ConfigError;
use crate::domain::scoring::config::{WeightSet, check_key_sets};
use std::collections::BTreeMap;

/// Weighted sum of per-indicator scores.
///
/// Key sets of `scores` and `weights` must match exactly; no normalization
/// is applied to the result.
pub fn composite_score(
    scores: &BTreeMap<String, f64>,
    weights: &WeightSet,
) -> Result<f64, ConfigError> {
    check_key_sets(scores.keys().map(String::as_str), weights.keys())?;

    Ok(scores
        .iter()
        .map(|(key, score)| score * weights.get(key).unwrap_or_default())
        .sum())
}
