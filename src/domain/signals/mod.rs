//! Per-ticker technical alert signals.

pub mod analyzer;
pub mod types;

pub use analyzer::{analyze_closes, sma_series};
pub use types::{
    SignalKind, SignalLevel, SignalRules, TickerAnalysis, TickerSignal, TickerStatus,
};
