use crate::application::crash_guard::CrashGuardService;
use crate::application::indicator_snapshot::IndicatorSnapshotService;
use crate::application::notification_service::NotificationService;
use crate::application::universe_scanner::UniverseScanner;
use crate::config::{Config, CrashGuardConfig};
use crate::domain::ports::{IndicatorFetcher, PriceHistoryProvider};
use crate::infrastructure::JsonHistoryStore;
use crate::infrastructure::market_data::{
    FredClient, FredIndicatorFetcher, StaticIndicatorFetcher, VixFetcher, YahooClient,
};
use crate::infrastructure::notifications::channels_from_config;
use crate::infrastructure::observability::Metrics;
use anyhow::{Context, Result};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};

/// Live adapters built from the environment
pub struct Adapters {
    pub fetchers: Vec<Arc<dyn IndicatorFetcher>>,
    pub prices: Arc<dyn PriceHistoryProvider>,
}

impl Adapters {
    pub fn from_env(config: &Config) -> Self {
        let sources = &config.data_sources;
        if sources.fred_api_key.is_empty() {
            warn!("FRED_API_KEY is not set; FRED requests will be rejected");
        }

        let fred = Arc::new(FredClient::new(
            sources.fred_base_url.clone(),
            sources.fred_api_key.clone(),
        ));
        let yahoo = Arc::new(YahooClient::new(sources.yahoo_base_url.clone()));

        let mut fetchers: Vec<Arc<dyn IndicatorFetcher>> = Vec::new();
        for fetcher in FredIndicatorFetcher::all(fred) {
            fetchers.push(Arc::new(fetcher));
        }
        fetchers.push(Arc::new(VixFetcher::new(yahoo.clone())));
        for fetcher in StaticIndicatorFetcher::from_config(sources) {
            fetchers.push(Arc::new(fetcher));
        }

        Self {
            fetchers,
            prices: yahoo,
        }
    }
}

pub struct CrashGuardBootstrap;

impl CrashGuardBootstrap {
    /// Wire a service against live data sources and the JSON history file
    pub fn init(
        config: &Config,
        scoring_config: CrashGuardConfig,
        history_path: Option<PathBuf>,
    ) -> Result<CrashGuardService> {
        let adapters = Adapters::from_env(config);
        let history_path = history_path.unwrap_or_else(|| config.history_path.clone());
        info!("History file: {:?}", history_path);

        if !config.notifications.has_channels() {
            warn!("No notification channel configured (PUSHOVER_TOKEN/PUSHOVER_USER or NOTIFY_WEBHOOK_URL)");
        }

        let scanner = UniverseScanner::new(adapters.prices, &scoring_config.stocks);
        let snapshot = IndicatorSnapshotService::new(adapters.fetchers)
            .context("Indicator fetchers are incomplete")?;
        let metrics = Metrics::new().context("Failed to create metrics registry")?;

        Ok(CrashGuardService::new(
            Arc::new(scoring_config),
            snapshot,
            scanner,
            Arc::new(JsonHistoryStore::new(history_path)),
            NotificationService::new(channels_from_config(&config.notifications)),
            metrics,
        ))
    }
}
