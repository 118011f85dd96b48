use crate::config::StocksConfig;
use crate::domain::history::StockSection;
use crate::domain::ports::PriceHistoryProvider;
use crate::domain::signals::{SignalRules, TickerAnalysis, analyze_closes};
use futures::stream::{self, StreamExt};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Runs the ticker signal analyzer over the configured universe.
///
/// Per-ticker failures become `TickerAnalysis::Failed`; the batch always completes.
pub struct UniverseScanner {
    provider: Arc<dyn PriceHistoryProvider>,
    rules: SignalRules,
    lookback_days: u32,
    max_concurrency: usize,
}

impl UniverseScanner {
    pub fn new(provider: Arc<dyn PriceHistoryProvider>, config: &StocksConfig) -> Self {
        Self {
            provider,
            rules: config.rules.clone(),
            lookback_days: config.lookback_days,
            max_concurrency: config.max_concurrency.max(1),
        }
    }

    pub async fn analyze_ticker(&self, ticker: &str) -> TickerAnalysis {
        match self.provider.daily_closes(ticker, self.lookback_days).await {
            Ok(closes) => {
                let analysis = analyze_closes(ticker, &closes, &self.rules);
                debug!("{}: {:?}", ticker, analysis);
                analysis
            }
            Err(e) => {
                warn!("Price history for {} unavailable: {:#}", ticker, e);
                TickerAnalysis::failed(ticker, format!("{:#}", e))
            }
        }
    }

    /// Analyses in the same order as `tickers`
    pub async fn scan(&self, tickers: &[String]) -> StockSection {
        let analyses: Vec<TickerAnalysis> = stream::iter(tickers.iter())
            .map(|ticker| self.analyze_ticker(ticker))
            .buffered(self.max_concurrency)
            .collect()
            .await;

        let section = StockSection {
            tickers: tickers.to_vec(),
            analyses,
        };
        info!(
            "Scanned {} tickers: {} alerting, {} failed",
            section.tickers.len(),
            section.alert_count(),
            section.error_count()
        );
        section
    }
}
