use crate::config::DataSourceEnvConfig;
use crate::domain::market::Indicator;
use crate::domain::ports::IndicatorFetcher;
use anyhow::Result;
use async_trait::async_trait;
use tracing::info;

/// Indicator with no free live feed; its value comes from configuration.
///
/// Covers Shiller CAPE, the Buffett indicator and the margin debt z-score.
pub struct StaticIndicatorFetcher {
    indicator: Indicator,
    value: f64,
}

impl StaticIndicatorFetcher {
    pub fn new(indicator: Indicator, value: f64) -> Self {
        Self { indicator, value }
    }

    pub fn from_config(config: &DataSourceEnvConfig) -> Vec<Self> {
        vec![
            Self::new(Indicator::Shiller, config.shiller_pe),
            Self::new(Indicator::Buffett, config.buffett_indicator),
            Self::new(Indicator::MarginZ, config.margin_debt_z),
        ]
    }
}

#[async_trait]
impl IndicatorFetcher for StaticIndicatorFetcher {
    fn indicator(&self) -> Indicator {
        self.indicator
    }

    async fn fetch(&self) -> Result<f64> {
        info!("{} = {} (configured)", self.indicator, self.value);
        Ok(self.value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_configured_values_returned() {
        let config = DataSourceEnvConfig {
            buffett_indicator: 181.0,
            ..DataSourceEnvConfig::default()
        };
        let fetchers = StaticIndicatorFetcher::from_config(&config);
        assert_eq!(fetchers.len(), 3);

        let buffett = fetchers
            .iter()
            .find(|f| f.indicator() == Indicator::Buffett)
            .unwrap();
        assert_eq!(buffett.fetch().await.unwrap(), 181.0);

        let shiller = fetchers
            .iter()
            .find(|f| f.indicator() == Indicator::Shiller)
            .unwrap();
        assert_eq!(shiller.fetch().await.unwrap(), 33.0);
    }
}
