use crate::domain::market::IndicatorSet;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Minimum number of configured hard triggers that must fire together
pub const CONFLUENCE_MIN_TRIGGERS: usize = 3;

/// Hard-risk conditions evaluated on absolute indicator values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Trigger {
    #[serde(rename = "curve_inverted")]
    CurveInverted,
    #[serde(rename = "vix_gt_30")]
    VixGt30,
    #[serde(rename = "shiller_gt_35")]
    ShillerGt35,
    #[serde(rename = "buffett_gt_180")]
    BuffettGt180,
}

impl Trigger {
    pub const ALL: [Trigger; 4] = [
        Trigger::CurveInverted,
        Trigger::VixGt30,
        Trigger::ShillerGt35,
        Trigger::BuffettGt180,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::CurveInverted => "curve_inverted",
            Self::VixGt30 => "vix_gt_30",
            Self::ShillerGt35 => "shiller_gt_35",
            Self::BuffettGt180 => "buffett_gt_180",
        }
    }

    pub fn fires(&self, inputs: &IndicatorSet) -> bool {
        match self {
            Self::CurveInverted => inputs.curve_bps < 0.0,
            Self::VixGt30 => inputs.vix > 30.0,
            Self::ShillerGt35 => inputs.shiller > 35.0,
            Self::BuffettGt180 => inputs.buffett > 180.0,
        }
    }
}

impl fmt::Display for Trigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Every trigger that fired, in rule order
pub fn fired_triggers(inputs: &IndicatorSet) -> Vec<Trigger> {
    Trigger::ALL
        .into_iter()
        .filter(|t| t.fires(inputs))
        .collect()
}

/// Flat `boost` when at least `CONFLUENCE_MIN_TRIGGERS` hard triggers fired, else 0
pub fn confluence_boost(fired: &[Trigger], hard_triggers: &[Trigger], boost: f64) -> f64 {
    let count = hard_triggers.iter().filter(|t| fired.contains(t)).count();
    if count >= CONFLUENCE_MIN_TRIGGERS {
        boost
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn calm_inputs() -> IndicatorSet {
        IndicatorSet {
            shiller: 25.0,
            buffett: 120.0,
            unemp_yoy: 0.0,
            cpi_yoy: 2.0,
            gdp_qoq_annualized: 2.5,
            curve_bps: 80.0,
            vix: 14.0,
            margin_z: 0.0,
        }
    }

    #[test]
    fn test_all_four_fire_and_boost_applies() {
        let inputs = IndicatorSet {
            curve_bps: -10.0,
            vix: 35.0,
            shiller: 40.0,
            buffett: 190.0,
            ..calm_inputs()
        };

        let fired = fired_triggers(&inputs);
        assert_eq!(fired, Trigger::ALL.to_vec());
        assert_eq!(confluence_boost(&fired, &Trigger::ALL, 10.0), 10.0);
    }

    #[test]
    fn test_comparisons_are_strict() {
        let inputs = IndicatorSet {
            curve_bps: 0.0,
            vix: 30.0,
            shiller: 35.0,
            buffett: 180.0,
            ..calm_inputs()
        };
        assert!(fired_triggers(&inputs).is_empty());
    }

    #[test]
    fn test_boost_is_all_or_nothing() {
        let fired = vec![Trigger::CurveInverted, Trigger::VixGt30];
        assert_eq!(confluence_boost(&fired, &Trigger::ALL, 10.0), 0.0);

        let fired = vec![Trigger::CurveInverted, Trigger::VixGt30, Trigger::BuffettGt180];
        assert_eq!(confluence_boost(&fired, &Trigger::ALL, 10.0), 10.0);
    }

    #[test]
    fn test_only_configured_hard_triggers_count() {
        let fired = Trigger::ALL.to_vec();
        let hard = vec![Trigger::CurveInverted, Trigger::VixGt30];
        assert_eq!(confluence_boost(&fired, &hard, 10.0), 0.0);
    }

    #[test]
    fn test_trigger_names_serialize() {
        let json = serde_json::to_string(&vec![Trigger::VixGt30, Trigger::CurveInverted]).unwrap();
        assert_eq!(json, r#"["vix_gt_30","curve_inverted"]"#);
        let parsed: Trigger = serde_json::from_str("\"buffett_gt_180\"").unwrap();
        assert_eq!(parsed, Trigger::BuffettGt180);
    }
}
