//! Yahoo Finance chart API (v8), used for the VIX level and ticker history.

use crate::domain::errors::MarketDataError;
use crate::domain::market::{Indicator, PricePoint, normalize_series};
use crate::domain::ports::{IndicatorFetcher, PriceHistoryProvider};
use crate::infrastructure::core::{HttpClientFactory, build_url};
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use reqwest_middleware::ClientWithMiddleware;
use serde::Deserialize;
use std::sync::Arc;
use tracing::{debug, info};

pub const VIX_SYMBOL: &str = "^VIX";

/// A few sessions so at least one close is available over holidays
pub const VIX_LOOKBACK_DAYS: u32 = 10;

#[derive(Debug, Deserialize)]
struct ChartEnvelope {
    chart: Chart,
}

#[derive(Debug, Deserialize)]
struct Chart {
    result: Option<Vec<ChartResult>>,
    error: Option<ChartError>,
}

#[derive(Debug, Deserialize)]
struct ChartError {
    code: String,
    description: String,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    #[serde(default)]
    timestamp: Vec<i64>,
    indicators: ChartIndicators,
}

#[derive(Debug, Deserialize)]
struct ChartIndicators {
    #[serde(default)]
    quote: Vec<Quote>,
    #[serde(default)]
    adjclose: Vec<AdjClose>,
}

#[derive(Debug, Deserialize)]
struct Quote {
    #[serde(default)]
    close: Vec<Option<f64>>,
}

#[derive(Debug, Deserialize)]
struct AdjClose {
    #[serde(default)]
    adjclose: Vec<Option<f64>>,
}

/// Pair timestamps with closes, preferring adjusted closes, and normalize.
///
/// Null closes are dropped; the result is ascending by date.
fn chart_to_series(symbol: &str, envelope: ChartEnvelope) -> Result<Vec<PricePoint>, MarketDataError> {
    if let Some(err) = envelope.chart.error {
        return Err(MarketDataError::InvalidData {
            symbol: symbol.to_string(),
            reason: format!("{}: {}", err.code, err.description),
        });
    }

    let result = envelope
        .chart
        .result
        .and_then(|mut r| if r.is_empty() { None } else { Some(r.swap_remove(0)) })
        .ok_or_else(|| MarketDataError::NoData {
            symbol: symbol.to_string(),
        })?;

    let adjusted = result
        .indicators
        .adjclose
        .into_iter()
        .next()
        .map(|a| a.adjclose)
        .filter(|a| !a.is_empty());
    let closes = match adjusted {
        Some(closes) => closes,
        None => result
            .indicators
            .quote
            .into_iter()
            .next()
            .map(|q| q.close)
            .unwrap_or_default(),
    };

    let points: Vec<PricePoint> = result
        .timestamp
        .iter()
        .zip(closes)
        .filter_map(|(ts, close)| {
            let close = close?;
            let date = DateTime::from_timestamp(*ts, 0)?.date_naive();
            Some(PricePoint::new(date, close))
        })
        .collect();

    let series = normalize_series(points);
    if series.is_empty() {
        return Err(MarketDataError::NoData {
            symbol: symbol.to_string(),
        });
    }
    Ok(series)
}

pub struct YahooClient {
    client: ClientWithMiddleware,
    base_url: String,
}

impl YahooClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: HttpClientFactory::create_client(),
            base_url: base_url.into(),
        }
    }

    /// Daily closes for `symbol` over the last `lookback_days` calendar days
    pub async fn chart(&self, symbol: &str, lookback_days: u32) -> Result<Vec<PricePoint>> {
        let now = Utc::now();
        let start = now - Duration::days(i64::from(lookback_days));
        let period1 = start.timestamp().to_string();
        let period2 = now.timestamp().to_string();

        let path = format!("v8/finance/chart/{}", symbol.replace('^', "%5E"));
        let url = build_url(
            &self.base_url,
            &path,
            &[
                ("period1", period1.as_str()),
                ("period2", period2.as_str()),
                ("interval", "1d"),
                ("includeAdjustedClose", "true"),
            ],
        )?;

        let response = self
            .client
            .get(url)
            .send()
            .await
            .with_context(|| format!("Failed to send Yahoo chart request for {}", symbol))?;

        if !response.status().is_success() {
            anyhow::bail!("Yahoo chart API returned status {} for {}", response.status(), symbol);
        }

        let envelope: ChartEnvelope = response
            .json()
            .await
            .with_context(|| format!("Failed to parse Yahoo chart response for {}", symbol))?;

        let series = chart_to_series(symbol, envelope)?;
        debug!("Yahoo {}: {} daily closes", symbol, series.len());
        Ok(series)
    }
}

#[async_trait]
impl PriceHistoryProvider for YahooClient {
    async fn daily_closes(&self, ticker: &str, lookback_days: u32) -> Result<Vec<PricePoint>> {
        self.chart(ticker, lookback_days).await
    }
}

/// Latest VIX close
pub struct VixFetcher {
    client: Arc<YahooClient>,
}

impl VixFetcher {
    pub fn new(client: Arc<YahooClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl IndicatorFetcher for VixFetcher {
    fn indicator(&self) -> Indicator {
        Indicator::Vix
    }

    async fn fetch(&self) -> Result<f64> {
        let series = self.client.chart(VIX_SYMBOL, VIX_LOOKBACK_DAYS).await?;
        let last = series.last().ok_or_else(|| MarketDataError::NoData {
            symbol: VIX_SYMBOL.to_string(),
        })?;
        info!("VIX close {} on {}", last.close, last.date);
        Ok(last.close)
    }
}
