//! In-memory implementations of the port traits.
//!
//! Used by tests and offline runs; nothing here touches the network or disk.

use crate::domain::history::{HISTORY_CAPACITY, HistoryRecord, retain_recent};
use crate::domain::market::{Indicator, IndicatorSet, PricePoint};
use crate::domain::ports::{
    HistoryRepository, IndicatorFetcher, NotificationChannel, PriceHistoryProvider,
};
use anyhow::Result;
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::RwLock;

/// Returns a fixed value, or fails when built with `failing`
pub struct MockIndicatorFetcher {
    indicator: Indicator,
    value: Option<f64>,
    calls: AtomicUsize,
}

impl MockIndicatorFetcher {
    pub fn new(indicator: Indicator, value: f64) -> Self {
        Self {
            indicator,
            value: Some(value),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing(indicator: Indicator) -> Self {
        Self {
            indicator,
            value: None,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// One fetcher per indicator, serving the values of `set`
    pub fn for_set(set: &IndicatorSet) -> Vec<Arc<dyn IndicatorFetcher>> {
        set.iter()
            .map(|(indicator, value)| {
                Arc::new(Self::new(indicator, value)) as Arc<dyn IndicatorFetcher>
            })
            .collect()
    }
}

#[async_trait]
impl IndicatorFetcher for MockIndicatorFetcher {
    fn indicator(&self) -> Indicator {
        self.indicator
    }

    async fn fetch(&self) -> Result<f64> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match self.value {
            Some(v) => Ok(v),
            None => anyhow::bail!("mock fetch failure for {}", self.indicator),
        }
    }
}

/// Serves canned close series per ticker; unknown tickers return no data
#[derive(Default)]
pub struct MockPriceHistory {
    series: HashMap<String, Vec<PricePoint>>,
    failing: HashSet<String>,
}

impl MockPriceHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_series(mut self, ticker: &str, points: Vec<PricePoint>) -> Self {
        self.series.insert(ticker.to_string(), points);
        self
    }

    pub fn with_failure(mut self, ticker: &str) -> Self {
        self.failing.insert(ticker.to_string());
        self
    }
}

#[async_trait]
impl PriceHistoryProvider for MockPriceHistory {
    async fn daily_closes(&self, ticker: &str, _lookback_days: u32) -> Result<Vec<PricePoint>> {
        if self.failing.contains(ticker) {
            anyhow::bail!("mock provider unavailable for {}", ticker);
        }
        Ok(self.series.get(ticker).cloned().unwrap_or_default())
    }
}

#[derive(Default)]
pub struct InMemoryHistoryRepository {
    records: Arc<RwLock<Vec<HistoryRecord>>>,
    fail_saves: bool,
}

impl InMemoryHistoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_records(records: Vec<HistoryRecord>) -> Self {
        Self {
            records: Arc::new(RwLock::new(records)),
            fail_saves: false,
        }
    }

    /// Every `save` returns an error
    pub fn failing_saves() -> Self {
        Self {
            records: Arc::new(RwLock::new(Vec::new())),
            fail_saves: true,
        }
    }

    pub async fn snapshot(&self) -> Vec<HistoryRecord> {
        self.records.read().await.clone()
    }
}

#[async_trait]
impl HistoryRepository for InMemoryHistoryRepository {
    async fn load(&self) -> Result<Vec<HistoryRecord>> {
        Ok(self.records.read().await.clone())
    }

    async fn save(&self, records: &[HistoryRecord]) -> Result<()> {
        if self.fail_saves {
            anyhow::bail!("mock history save failure");
        }
        let mut guard = self.records.write().await;
        *guard = retain_recent(records.to_vec(), HISTORY_CAPACITY);
        Ok(())
    }
}

/// Captures every message; optionally fails every send
#[derive(Clone)]
pub struct RecordingChannel {
    name: String,
    fail: bool,
    sent: Arc<RwLock<Vec<(String, String)>>>,
}

impl RecordingChannel {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            fail: false,
            sent: Arc::new(RwLock::new(Vec::new())),
        }
    }

    pub fn failing(name: &str) -> Self {
        Self {
            fail: true,
            ..Self::new(name)
        }
    }

    pub async fn sent(&self) -> Vec<(String, String)> {
        self.sent.read().await.clone()
    }
}

#[async_trait]
impl NotificationChannel for RecordingChannel {
    fn name(&self) -> &str {
        &self.name
    }

    async fn send(&self, title: &str, body: &str) -> Result<()> {
        if self.fail {
            anyhow::bail!("{} unavailable", self.name);
        }
        self.sent
            .write()
            .await
            .push((title.to_string(), body.to_string()));
        Ok(())
    }
}
