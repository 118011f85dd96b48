//! Crash Risk Index scoring engine.
//!
//! Band scorer → composite aggregator → velocity booster → confluence
//! booster → state classifier. Everything here is pure and synchronous.

pub mod bands;
pub mod composite;
pub mod config;
pub mod confluence;
pub mod engine;
pub mod state;
pub mod velocity;

pub use bands::band_score;
pub use composite::composite_score;
pub use config::{Band, BandTable, BandTables, ScoringConfig, VelocityBoostTable, VelocityTier, WeightSet};
pub use confluence::{Trigger, confluence_boost, fired_triggers};
pub use engine::{ScoreDetails, ScoreResult, compute_scores, round2};
pub use state::{RiskState, Thresholds};
pub use velocity::velocity_boost;
