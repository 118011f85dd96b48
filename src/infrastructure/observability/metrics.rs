//! Prometheus metrics definitions for CrashGuard
//!
//! All metrics use the `crashguard_` prefix and describe the latest run.

use crate::domain::history::HistoryRecord;
use anyhow::{Context, Result};
use prometheus::{
    Gauge, GaugeVec, Opts, Registry, TextEncoder,
    core::{AtomicF64, GenericGauge, GenericGaugeVec},
};
use std::path::Path;
use std::sync::Arc;

#[derive(Clone)]
pub struct Metrics {
    registry: Arc<Registry>,
    /// Final Crash Risk Index
    pub cri: GenericGauge<AtomicF64>,
    /// Risk state level (0=GREEN .. 3=RED)
    pub risk_state: GenericGauge<AtomicF64>,
    pub velocity_boost: GenericGauge<AtomicF64>,
    pub confluence_boost: GenericGauge<AtomicF64>,
    /// Number of confluence triggers that fired
    pub triggers_fired: GenericGauge<AtomicF64>,
    pub ticker_alerts: GenericGauge<AtomicF64>,
    pub ticker_errors: GenericGauge<AtomicF64>,
    /// Band score per indicator, labelled by score key
    pub indicator_score: GenericGaugeVec<AtomicF64>,
    /// Unix time of the run that produced these values
    pub last_run_timestamp_seconds: GenericGauge<AtomicF64>,
}

fn gauge(registry: &Registry, name: &str, help: &str) -> Result<GenericGauge<AtomicF64>> {
    let gauge = Gauge::with_opts(Opts::new(name, help))?;
    registry.register(Box::new(gauge.clone()))?;
    Ok(gauge)
}

impl Metrics {
    pub fn new() -> Result<Self> {
        let registry = Registry::new();

        let cri = gauge(&registry, "crashguard_cri", "Crash Risk Index (0-100)")?;
        let risk_state = gauge(
            &registry,
            "crashguard_risk_state",
            "Risk state level: 0=GREEN, 1=YELLOW, 2=ORANGE, 3=RED",
        )?;
        let velocity_boost = gauge(
            &registry,
            "crashguard_velocity_boost",
            "Velocity boost added to the composite score",
        )?;
        let confluence_boost = gauge(
            &registry,
            "crashguard_confluence_boost",
            "Confluence boost added to the composite score",
        )?;
        let triggers_fired = gauge(
            &registry,
            "crashguard_triggers_fired",
            "Number of confluence triggers that fired",
        )?;
        let ticker_alerts = gauge(
            &registry,
            "crashguard_ticker_alerts",
            "Tickers with at least one alert signal",
        )?;
        let ticker_errors = gauge(
            &registry,
            "crashguard_ticker_errors",
            "Tickers whose analysis failed",
        )?;

        let indicator_score = GaugeVec::new(
            Opts::new("crashguard_indicator_score", "Band score per indicator"),
            &["indicator"],
        )?;
        registry.register(Box::new(indicator_score.clone()))?;

        let last_run_timestamp_seconds = gauge(
            &registry,
            "crashguard_last_run_timestamp_seconds",
            "Unix time of the last completed run",
        )?;

        Ok(Self {
            registry: Arc::new(registry),
            cri,
            risk_state,
            velocity_boost,
            confluence_boost,
            triggers_fired,
            ticker_alerts,
            ticker_errors,
            indicator_score,
            last_run_timestamp_seconds,
        })
    }

    /// Publish everything a run produced
    pub fn record_run(&self, record: &HistoryRecord) {
        self.cri.set(record.cri);
        self.risk_state.set(f64::from(record.state.level()));
        self.velocity_boost.set(record.details.velocity_boost);
        self.confluence_boost.set(record.details.confluence_boost);
        self.triggers_fired.set(record.details.triggers.len() as f64);
        self.ticker_alerts.set(record.stocks.alert_count() as f64);
        self.ticker_errors.set(record.stocks.error_count() as f64);
        for (key, score) in &record.scores {
            self.indicator_score.with_label_values(&[key.as_str()]).set(*score);
        }
        self.last_run_timestamp_seconds.set(record.ts.timestamp() as f64);
    }

    /// Render all metrics in Prometheus text format
    pub fn render(&self) -> String {
        let encoder = TextEncoder::new();
        let metric_families = self.registry.gather();
        encoder
            .encode_to_string(&metric_families)
            .unwrap_or_default()
    }

    /// Write the exposition for a node-exporter textfile collector.
    ///
    /// Written to a temp file and renamed so the collector never sees a partial file.
    pub fn write_textfile(&self, path: &Path) -> Result<()> {
        let temp_path = path.with_extension("prom.tmp");
        std::fs::write(&temp_path, self.render())
            .with_context(|| format!("Failed to write metrics file {:?}", temp_path))?;
        std::fs::rename(&temp_path, path)
            .with_context(|| format!("Failed to rename metrics file to {:?}", path))?;
        Ok(())
    }
}
