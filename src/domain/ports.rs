//! Port interfaces to the collaborators around the scoring core.
//!
//! Adapters in `infrastructure` implement these; the application layer only
//! ever sees the traits.

use crate::domain::history::HistoryRecord;
use crate::domain::market::{Indicator, PricePoint};
use anyhow::Result;
use async_trait::async_trait;

/// Supplies the current value of a single macro/market indicator
#[async_trait]
pub trait IndicatorFetcher: Send + Sync {
    fn indicator(&self) -> Indicator;

    async fn fetch(&self) -> Result<f64>;
}

/// Daily closing prices for a ticker, ascending, non-finite closes removed
#[async_trait]
pub trait PriceHistoryProvider: Send + Sync {
    async fn daily_closes(&self, ticker: &str, lookback_days: u32) -> Result<Vec<PricePoint>>;
}

/// Whole-sequence load/save of the CRI history
#[async_trait]
pub trait HistoryRepository: Send + Sync {
    /// Ordered oldest first; empty when nothing has been saved yet
    async fn load(&self) -> Result<Vec<HistoryRecord>>;

    /// Persist the sequence, keeping only the most recent `HISTORY_CAPACITY`
    async fn save(&self, records: &[HistoryRecord]) -> Result<()>;
}

/// One delivery route for notifications (push service, webhook, ...)
#[async_trait]
pub trait NotificationChannel: Send + Sync {
    fn name(&self) -> &str;

    async fn send(&self, title: &str, body: &str) -> Result<()>;
}
