use crate::domain::market::IndicatorSet;
use crate::domain::scoring::{RiskState, ScoreDetails, ScoreResult};
use crate::domain::signals::TickerAnalysis;
use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Number of records kept when history is saved
pub const HISTORY_CAPACITY: usize = 365;

/// Ticker analyses captured alongside one CRI run
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct StockSection {
    pub tickers: Vec<String>,
    pub analyses: Vec<TickerAnalysis>,
}

impl StockSection {
    pub fn alert_count(&self) -> usize {
        self.analyses.iter().filter(|a| a.is_alert()).count()
    }

    pub fn error_count(&self) -> usize {
        self.analyses.iter().filter(|a| a.is_error()).count()
    }

    pub fn has_alerts(&self) -> bool {
        self.analyses.iter().any(TickerAnalysis::is_alert)
    }
}

/// One persisted run, also the record printed and sent in notifications
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryRecord {
    pub ts: DateTime<Utc>,
    pub inputs: IndicatorSet,
    pub scores: BTreeMap<String, f64>,
    pub cri: f64,
    pub state: RiskState,
    pub details: ScoreDetails,
    /// Absent in records written before ticker analysis existed
    #[serde(default)]
    pub stocks: StockSection,
}

impl HistoryRecord {
    /// `ts` is truncated to whole seconds so it serializes as `YYYY-MM-DDTHH:MM:SSZ`
    pub fn new(
        ts: DateTime<Utc>,
        inputs: IndicatorSet,
        score: ScoreResult,
        stocks: StockSection,
    ) -> Self {
        Self {
            ts: ts.trunc_subsecs(0),
            inputs,
            scores: score.scores,
            cri: score.cri,
            state: score.state,
            details: score.details,
            stocks,
        }
    }

    /// Notify on any elevated state, or on any ticker alert
    pub fn requires_notification(&self) -> bool {
        self.state.is_elevated() || self.stocks.has_alerts()
    }
}

/// CRI values oldest first, the series the velocity booster consumes
pub fn cri_series(records: &[HistoryRecord]) -> Vec<f64> {
    records.iter().map(|r| r.cri).collect()
}

/// Keep only the most recent `capacity` records, dropping the oldest first
pub fn retain_recent<T>(mut records: Vec<T>, capacity: usize) -> Vec<T> {
    if records.len() > capacity {
        records.drain(..records.len() - capacity);
    }
    records
}
