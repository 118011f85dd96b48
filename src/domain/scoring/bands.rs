use crate::domain::scoring::config::Band;

/// Score `value` against an ordered band list.
///
/// First band with `lower <= value < upper` wins. Unmatched values never
/// error: below the lowest lower bound they take that band's score,
/// anything else (above the top, inside a gap, NaN) takes the last band's.
pub fn band_score(bands: &[Band], value: f64) -> f64 {
    if let Some(band) = bands.iter().find(|b| b.contains(value)) {
        return band.score;
    }

    let lowest = bands
        .iter()
        .reduce(|low, b| if b.lower < low.lower { b } else { low });
    match lowest {
        Some(low) if value < low.lower => low.score,
        _ => bands.last().map_or(0.0, |b| b.score),
    }
}
