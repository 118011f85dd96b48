//! FRED (Federal Reserve Economic Data) macro series.
//!
//! Observations are requested newest first with a limit, then reversed so
//! derivations always see an ascending series.

use crate::domain::errors::MarketDataError;
use crate::domain::market::Indicator;
use crate::domain::ports::IndicatorFetcher;
use crate::infrastructure::core::{HttpClientFactory, build_url};
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest_middleware::ClientWithMiddleware;
use serde::Deserialize;
use std::sync::Arc;
use tracing::{debug, info};

/// Number of observations requested per series; monthly derivations need 13
const OBSERVATION_LIMIT: usize = 48;

/// Periods used for the year-over-year derivations of monthly series
const YOY_PERIODS: usize = 12;

#[derive(Debug, Deserialize)]
struct ObservationsResponse {
    observations: Vec<Observation>,
}

#[derive(Debug, Deserialize)]
struct Observation {
    date: String,
    value: String,
}

/// The FRED series CrashGuard reads, each feeding one indicator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FredSeries {
    /// 10-year minus 2-year treasury spread, percent
    YieldCurve,
    /// Civilian unemployment rate, percent
    Unemployment,
    /// CPI for all urban consumers, index level
    ConsumerPrices,
    /// Real GDP, percent change from preceding period, annualized
    RealGdp,
}

impl FredSeries {
    pub const ALL: [FredSeries; 4] = [
        FredSeries::YieldCurve,
        FredSeries::Unemployment,
        FredSeries::ConsumerPrices,
        FredSeries::RealGdp,
    ];

    pub fn series_id(&self) -> &'static str {
        match self {
            FredSeries::YieldCurve => "T10Y2Y",
            FredSeries::Unemployment => "UNRATE",
            FredSeries::ConsumerPrices => "CPIAUCSL",
            FredSeries::RealGdp => "A191RL1Q225SBEA",
        }
    }

    pub fn indicator(&self) -> Indicator {
        match self {
            FredSeries::YieldCurve => Indicator::CurveBps,
            FredSeries::Unemployment => Indicator::UnempYoy,
            FredSeries::ConsumerPrices => Indicator::CpiYoy,
            FredSeries::RealGdp => Indicator::GdpQoqAnnualized,
        }
    }

    /// Turn an ascending series into the indicator value
    pub fn derive(&self, values: &[f64]) -> Result<f64, MarketDataError> {
        let id = self.series_id();
        match self {
            FredSeries::YieldCurve => last_value(id, values).map(|v| v * 100.0),
            FredSeries::Unemployment => difference_over(id, values, YOY_PERIODS),
            FredSeries::ConsumerPrices => {
                pct_change_over(id, values, YOY_PERIODS).map(|v| v * 100.0)
            }
            FredSeries::RealGdp => last_value(id, values),
        }
    }
}

pub fn last_value(series: &str, values: &[f64]) -> Result<f64, MarketDataError> {
    values.last().copied().ok_or_else(|| MarketDataError::NoData {
        symbol: series.to_string(),
    })
}

/// Latest value minus the value `periods` observations earlier
pub fn difference_over(series: &str, values: &[f64], periods: usize) -> Result<f64, MarketDataError> {
    let (then, now) = endpoints(series, values, periods)?;
    Ok(now - then)
}

/// Fractional change from `periods` observations earlier to the latest value
pub fn pct_change_over(series: &str, values: &[f64], periods: usize) -> Result<f64, MarketDataError> {
    let (then, now) = endpoints(series, values, periods)?;
    if then == 0.0 {
        return Err(MarketDataError::InvalidData {
            symbol: series.to_string(),
            reason: "base observation is zero".to_string(),
        });
    }
    Ok(now / then - 1.0)
}

fn endpoints(series: &str, values: &[f64], periods: usize) -> Result<(f64, f64), MarketDataError> {
    let needed = periods + 1;
    if values.len() < needed {
        return Err(MarketDataError::InsufficientHistory {
            series: series.to_string(),
            needed,
            available: values.len(),
        });
    }
    let last = values.len() - 1;
    Ok((values[last - periods], values[last]))
}

/// Parse raw observation values, skipping FRED's "." missing-value marker
fn parse_observations(series: &str, observations: &[Observation]) -> Result<Vec<f64>, MarketDataError> {
    let mut values = Vec::with_capacity(observations.len());
    for obs in observations {
        let raw = obs.value.trim();
        if raw == "." || raw.is_empty() {
            continue;
        }
        let value: f64 = raw.parse().map_err(|_| MarketDataError::InvalidData {
            symbol: series.to_string(),
            reason: format!("unparseable value '{}' on {}", raw, obs.date),
        })?;
        if value.is_finite() {
            values.push(value);
        }
    }
    Ok(values)
}

pub struct FredClient {
    client: ClientWithMiddleware,
    base_url: String,
    api_key: String,
}

impl FredClient {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            client: HttpClientFactory::create_client(),
            base_url: base_url.into(),
            api_key: api_key.into(),
        }
    }

    /// Recent observations of a series, ascending, missing values dropped
    pub async fn observations(&self, series_id: &str) -> Result<Vec<f64>> {
        let limit = OBSERVATION_LIMIT.to_string();
        let url = build_url(
            &self.base_url,
            "fred/series/observations",
            &[
                ("series_id", series_id),
                ("api_key", self.api_key.as_str()),
                ("file_type", "json"),
                ("sort_order", "desc"),
                ("limit", limit.as_str()),
            ],
        )?;

        let response = self
            .client
            .get(url)
            .send()
            .await
            .with_context(|| format!("Failed to send FRED request for {}", series_id))?;

        if !response.status().is_success() {
            anyhow::bail!("FRED API returned status {} for {}", response.status(), series_id);
        }

        let body: ObservationsResponse = response
            .json()
            .await
            .with_context(|| format!("Failed to parse FRED response for {}", series_id))?;

        let mut values = parse_observations(series_id, &body.observations)?;
        values.reverse();
        debug!("FRED {}: {} usable observations", series_id, values.len());
        Ok(values)
    }
}

/// One FRED-backed indicator
pub struct FredIndicatorFetcher {
    client: Arc<FredClient>,
    series: FredSeries,
}

impl FredIndicatorFetcher {
    pub fn new(client: Arc<FredClient>, series: FredSeries) -> Self {
        Self { client, series }
    }

    /// Fetchers for every FRED-backed indicator sharing one client
    pub fn all(client: Arc<FredClient>) -> Vec<Self> {
        FredSeries::ALL
            .iter()
            .map(|s| Self::new(client.clone(), *s))
            .collect()
    }
}

#[async_trait]
impl IndicatorFetcher for FredIndicatorFetcher {
    fn indicator(&self) -> Indicator {
        self.series.indicator()
    }

    async fn fetch(&self) -> Result<f64> {
        let id = self.series.series_id();
        let values = self.client.observations(id).await?;
        let value = self.series.derive(&values)?;
        info!("FRED {} -> {} = {:.4}", id, self.series.indicator(), value);
        Ok(value)
    }
}
