use crashguard::config::CrashGuardConfig;
use crashguard::domain::market::IndicatorSet;
use crashguard::domain::scoring::{RiskState, Trigger, compute_scores};
use std::path::Path;

fn shipped_config() -> CrashGuardConfig {
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("config.toml");
    CrashGuardConfig::load(&path).expect("shipped config.toml should load")
}

fn calm() -> IndicatorSet {
    IndicatorSet {
        shiller: 18.0,
        buffett: 90.0,
        unemp_yoy: -0.1,
        cpi_yoy: 2.0,
        gdp_qoq_annualized: 3.5,
        curve_bps: 150.0,
        vix: 12.0,
        margin_z: -0.5,
    }
}

/// Scores 9+9+8+2+6+12+8+4 = 58 with only the curve trigger firing
fn late_cycle() -> IndicatorSet {
    IndicatorSet {
        shiller: 31.0,
        buffett: 175.0,
        unemp_yoy: 0.4,
        cpi_yoy: 3.1,
        gdp_qoq_annualized: 1.6,
        curve_bps: -12.0,
        vix: 22.5,
        margin_z: 0.5,
    }
}

fn panic_market() -> IndicatorSet {
    IndicatorSet {
        shiller: 36.0,
        buffett: 195.0,
        unemp_yoy: 1.2,
        cpi_yoy: 4.0,
        gdp_qoq_annualized: -0.5,
        curve_bps: -60.0,
        vix: 35.0,
        margin_z: 2.5,
    }
}

#[test]
fn test_calm_market_is_green() {
    let config = shipped_config();
    let result = compute_scores(&config.scoring, &calm(), &[]).unwrap();

    assert_eq!(result.cri, 0.0);
    assert_eq!(result.state, RiskState::Green);
    assert!(result.details.triggers.is_empty());
    assert_eq!(result.scores.len(), 8);
    assert!(result.scores.values().all(|s| *s == 0.0));
}

#[test]
fn test_late_cycle_is_orange_without_confluence() {
    let config = shipped_config();
    let result = compute_scores(&config.scoring, &late_cycle(), &[]).unwrap();

    assert_eq!(result.scores["curve"], 3.0);
    assert_eq!(result.scores["margin"], 2.0);
    assert_eq!(result.cri, 58.0);
    assert_eq!(result.state, RiskState::Orange);
    assert_eq!(result.details.triggers, vec![Trigger::CurveInverted]);
    assert_eq!(result.details.confluence_boost, 0.0);
}

#[test]
fn test_panic_market_gets_confluence_boost() {
    let config = shipped_config();
    let result = compute_scores(&config.scoring, &panic_market(), &[]).unwrap();

    assert_eq!(result.details.triggers.len(), 4);
    assert_eq!(result.details.confluence_boost, 10.0);
    assert_eq!(result.cri, 106.0);
    assert_eq!(result.state, RiskState::Red);
}

#[test]
fn test_velocity_uses_value_seven_runs_back() {
    let config = shipped_config();

    // 58 - 50 = 8: only the 5-point tier applies
    let history = [50.0, 40.0, 40.0, 40.0, 40.0, 40.0, 40.0];
    let result = compute_scores(&config.scoring, &late_cycle(), &history).unwrap();
    assert_eq!(result.details.velocity_boost, 5.0);
    assert_eq!(result.cri, 63.0);

    // 58 - 45 = 13: largest tier wins, tiers do not add up
    let history = [10.0, 45.0, 57.0, 57.0, 57.0, 57.0, 57.0, 57.0];
    let result = compute_scores(&config.scoring, &late_cycle(), &history).unwrap();
    assert_eq!(result.details.velocity_boost, 10.0);
    assert_eq!(result.cri, 68.0);
    assert_eq!(result.state, RiskState::Orange);
}

#[test]
fn test_short_history_has_no_velocity() {
    let config = shipped_config();
    let result = compute_scores(&config.scoring, &late_cycle(), &[0.0; 6]).unwrap();
    assert_eq!(result.details.velocity_boost, 0.0);
}

#[test]
fn test_record_field_names_match_history_format() {
    let config = shipped_config();
    let result = compute_scores(&config.scoring, &late_cycle(), &[]).unwrap();
    let json = serde_json::to_value(&result).unwrap();

    assert_eq!(json["state"], "ORANGE");
    assert_eq!(json["details"]["vel_boost"], 0.0);
    assert_eq!(json["details"]["triggers"][0], "curve_inverted");
    assert!(json["scores"].get("unemp").is_some());
}
