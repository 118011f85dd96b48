use crate::application::indicator_snapshot::IndicatorSnapshotService;
use crate::application::notification_service::NotificationService;
use crate::application::universe_scanner::UniverseScanner;
use crate::config::CrashGuardConfig;
use crate::domain::history::{HistoryRecord, StockSection, cri_series};
use crate::domain::ports::HistoryRepository;
use crate::domain::scoring::compute_scores;
use crate::infrastructure::observability::Metrics;
use anyhow::{Context, Result};
use chrono::Utc;
use std::sync::Arc;
use tracing::{info, warn};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunOptions {
    /// Compute and print only: no history write, no notification
    pub dry_run: bool,
    pub skip_stocks: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationOutcome {
    /// Green state and no ticker alerts
    NotRequired,
    /// Required, but suppressed by a dry run
    Suppressed,
    Delivered,
    Failed,
}

/// A scored run that has not been persisted yet
#[derive(Debug, Clone)]
pub struct Evaluation {
    pub history: Vec<HistoryRecord>,
    pub record: HistoryRecord,
}

#[derive(Debug, Clone)]
pub struct RunOutcome {
    pub record: HistoryRecord,
    pub notification: NotificationOutcome,
}

/// One CrashGuard run: score the market, scan tickers, persist, alert
pub struct CrashGuardService {
    config: Arc<CrashGuardConfig>,
    snapshot: IndicatorSnapshotService,
    scanner: UniverseScanner,
    history: Arc<dyn HistoryRepository>,
    notifier: NotificationService,
    metrics: Metrics,
}

impl CrashGuardService {
    pub fn new(
        config: Arc<CrashGuardConfig>,
        snapshot: IndicatorSnapshotService,
        scanner: UniverseScanner,
        history: Arc<dyn HistoryRepository>,
        notifier: NotificationService,
        metrics: Metrics,
    ) -> Self {
        Self {
            config,
            snapshot,
            scanner,
            history,
            notifier,
            metrics,
        }
    }

    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }

    /// Load history, fetch indicators, score, scan tickers
    pub async fn evaluate(&self, options: RunOptions) -> Result<Evaluation> {
        let history = self.history.load().await.context("Failed to load history")?;
        info!("Loaded {} prior runs", history.len());

        let inputs = self
            .snapshot
            .snapshot()
            .await
            .context("Indicator snapshot failed")?;

        let result = compute_scores(&self.config.scoring, &inputs, &cri_series(&history))
            .context("Scoring failed")?;
        info!(
            "CRI {} -> {} (velocity +{}, confluence +{}, {} triggers)",
            result.cri,
            result.state,
            result.details.velocity_boost,
            result.details.confluence_boost,
            result.details.triggers.len()
        );

        let tickers = self.config.stocks.normalized_tickers();
        let stocks = if options.skip_stocks || tickers.is_empty() {
            StockSection::default()
        } else {
            self.scanner.scan(&tickers).await
        };

        let record = HistoryRecord::new(Utc::now(), inputs, result, stocks);
        Ok(Evaluation { history, record })
    }

    /// Append and save, publish metrics, then notify if required
    pub async fn commit(&self, evaluation: Evaluation, options: RunOptions) -> Result<RunOutcome> {
        let Evaluation {
            mut history,
            record,
        } = evaluation;

        if options.dry_run {
            info!("Dry run: history not saved");
        } else {
            history.push(record.clone());
            self.history
                .save(&history)
                .await
                .context("Failed to save history")?;
        }

        self.metrics.record_run(&record);

        let notification = if !record.requires_notification() {
            NotificationOutcome::NotRequired
        } else if options.dry_run {
            info!("Dry run: notification suppressed ({})", record.state);
            NotificationOutcome::Suppressed
        } else if self.notifier.notify_record(&record).await {
            NotificationOutcome::Delivered
        } else {
            warn!("Notification for {} run was not delivered", record.state);
            NotificationOutcome::Failed
        };

        Ok(RunOutcome {
            record,
            notification,
        })
    }

    pub async fn run(&self, options: RunOptions) -> Result<RunOutcome> {
        let evaluation = self.evaluate(options).await?;
        self.commit(evaluation, options).await
    }
}
