use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A single daily close, the only shape the signal analyzer accepts.
///
/// Adapters normalize whatever upstream format they receive into an
/// ascending `Vec<PricePoint>` with non-finite closes removed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub date: NaiveDate,
    pub close: f64,
}

impl PricePoint {
    pub fn new(date: NaiveDate, close: f64) -> Self {
        Self { date, close }
    }
}

/// Sort ascending by date and drop non-finite closes
pub fn normalize_series(mut points: Vec<PricePoint>) -> Vec<PricePoint> {
    points.retain(|p| p.close.is_finite());
    points.sort_by_key(|p| p.date);
    points
}
