use crate::domain::errors::MarketDataError;
use crate::domain::market::{Indicator, IndicatorSet, IndicatorSetBuilder};
use crate::domain::ports::IndicatorFetcher;
use anyhow::{Context, Result};
use futures::future::try_join_all;
use std::sync::Arc;
use tracing::info;

/// Collects one value per indicator into an `IndicatorSet`.
///
/// Fetches run concurrently; the first failure aborts the snapshot.
pub struct IndicatorSnapshotService {
    fetchers: Vec<Arc<dyn IndicatorFetcher>>,
}

impl IndicatorSnapshotService {
    /// Requires exactly one fetcher per indicator
    pub fn new(fetchers: Vec<Arc<dyn IndicatorFetcher>>) -> Result<Self> {
        for indicator in Indicator::ALL {
            let count = fetchers
                .iter()
                .filter(|f| f.indicator() == indicator)
                .count();
            if count == 0 {
                return Err(MarketDataError::MissingFetcher {
                    indicator: indicator.to_string(),
                }
                .into());
            }
            if count > 1 {
                anyhow::bail!("{} fetchers registered for indicator '{}'", count, indicator);
            }
        }
        Ok(Self { fetchers })
    }

    pub async fn snapshot(&self) -> Result<IndicatorSet> {
        let values = try_join_all(self.fetchers.iter().map(|fetcher| async move {
            let indicator = fetcher.indicator();
            let value = fetcher
                .fetch()
                .await
                .with_context(|| format!("Failed to fetch indicator '{}'", indicator))?;
            if !value.is_finite() {
                anyhow::bail!("Indicator '{}' returned non-finite value {}", indicator, value);
            }
            Ok::<_, anyhow::Error>((indicator, value))
        }))
        .await?;

        let mut builder = IndicatorSetBuilder::new();
        for (indicator, value) in values {
            builder.set(indicator, value);
        }
        let set = builder.build().ok_or_else(|| MarketDataError::MissingFetcher {
            indicator: builder
                .missing()
                .first()
                .map(|i| i.to_string())
                .unwrap_or_default(),
        })?;

        info!(
            "Indicators: shiller={} buffett={} unemp_yoy={:.2} cpi_yoy={:.2} gdp={:.2} curve_bps={:.1} vix={:.2} margin_z={}",
            set.shiller,
            set.buffett,
            set.unemp_yoy,
            set.cpi_yoy,
            set.gdp_qoq_annualized,
            set.curve_bps,
            set.vix,
            set.margin_z
        );
        Ok(set)
    }
}
