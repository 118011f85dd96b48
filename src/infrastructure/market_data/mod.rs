pub mod fred;
pub mod static_indicators;
pub mod yahoo;

pub use fred::{FredClient, FredIndicatorFetcher, FredSeries};
pub use static_indicators::StaticIndicatorFetcher;
pub use yahoo::{VixFetcher, YahooClient};
