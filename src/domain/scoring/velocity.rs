use crate::domain::scoring::config::VelocityBoostTable;

/// Number of history entries back used for the week-over-week delta
pub const VELOCITY_LOOKBACK: usize = 7;

/// Boost for a sharp rise in CRI over the last `VELOCITY_LOOKBACK` runs.
///
/// `history_cri` is oldest first. The boost is the largest one among all
/// satisfied tiers, never their sum; shorter histories get no boost.
pub fn velocity_boost(cri: f64, history_cri: &[f64], table: &VelocityBoostTable) -> f64 {
    if history_cri.len() < VELOCITY_LOOKBACK {
        return 0.0;
    }

    let delta7 = cri - history_cri[history_cri.len() - VELOCITY_LOOKBACK];

    table
        .tiers()
        .iter()
        .filter(|tier| delta7 >= tier.threshold)
        .fold(0.0, |boost: f64, tier| boost.max(tier.boost))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::scoring::config::VelocityTier;

    fn table() -> VelocityBoostTable {
        VelocityBoostTable::new(vec![
            VelocityTier {
                threshold: 5.0,
                boost: 3.0,
            },
            VelocityTier {
                threshold: 10.0,
                boost: 8.0,
            },
        ])
    }

    #[test]
    fn test_short_history_never_boosts() {
        let history = vec![0.0; VELOCITY_LOOKBACK - 1];
        assert_eq!(velocity_boost(100.0, &history, &table()), 0.0);
        assert_eq!(velocity_boost(100.0, &[], &table()), 0.0);
    }

    #[test]
    fn test_highest_satisfied_tier_wins() {
        let history = vec![20.0, 21.0, 22.0, 23.0, 24.0, 25.0, 26.0];
        assert_eq!(velocity_boost(35.0, &history, &table()), 8.0);
        assert_eq!(velocity_boost(29.0, &history, &table()), 3.0);
        assert_eq!(velocity_boost(24.9, &history, &table()), 0.0);
    }

    #[test]
    fn test_tier_applies_at_exact_threshold() {
        // history[len - 7] == 20.0
        let history = vec![20.0, 21.0, 22.0, 23.0, 24.0, 25.0, 26.0];
        assert_eq!(velocity_boost(25.0, &history, &table()), 3.0);
        assert_eq!(velocity_boost(30.0, &history, &table()), 8.0);
    }

    #[test]
    fn test_uses_entry_seven_back_from_end() {
        let history = vec![90.0, 10.0, 50.0, 50.0, 50.0, 50.0, 50.0, 50.0];
        // history[len - 7] == 10.0
        assert_eq!(velocity_boost(20.0, &history, &table()), 8.0);
    }

    #[test]
    fn test_boost_is_monotonic_in_delta() {
        let history = vec![0.0; VELOCITY_LOOKBACK];
        let mut previous = 0.0;
        for step in 0..300 {
            let cri = step as f64 * 0.1;
            let boost = velocity_boost(cri, &history, &table());
            assert!(boost >= previous);
            previous = boost;
        }
    }

    #[test]
    fn test_tiers_not_cumulative_regardless_of_order() {
        let reversed = VelocityBoostTable::new(vec![
            VelocityTier {
                threshold: 10.0,
                boost: 8.0,
            },
            VelocityTier {
                threshold: 5.0,
                boost: 3.0,
            },
        ]);
        let history = vec![0.0; VELOCITY_LOOKBACK];
        assert_eq!(velocity_boost(12.0, &history, &reversed), 8.0);
    }
}
