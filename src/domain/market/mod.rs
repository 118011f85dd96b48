pub mod indicators;
pub mod price;

pub use indicators::{Indicator, IndicatorSet, IndicatorSetBuilder};
pub use price::{PricePoint, normalize_series};
