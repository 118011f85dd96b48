use crate::domain::market::PricePoint;
use crate::domain::signals::types::{
    SignalKind, SignalRules, TickerAnalysis, TickerSignal, TickerStatus,
};
use ta::Next;
use ta::indicators::SimpleMovingAverage;
use tracing::debug;

/// Rolling SMA aligned with the input; `None` until the window is full
pub fn sma_series(values: &[f64], period: usize) -> Vec<Option<f64>> {
    let Ok(mut sma) = SimpleMovingAverage::new(period) else {
        return vec![None; values.len()];
    };

    values
        .iter()
        .enumerate()
        .map(|(i, &v)| {
            let avg = sma.next(v);
            (i + 1 >= period).then_some(avg)
        })
        .collect()
}

fn pct_change(from: f64, to: f64) -> Option<f64> {
    (from > 0.0).then(|| (to - from) / from * 100.0)
}

/// Technical alert analysis for one ticker's ascending closes.
///
/// Each sub-signal needing more history than is available is skipped;
/// only an empty series produces an error result.
pub fn analyze_closes(ticker: &str, series: &[PricePoint], rules: &SignalRules) -> TickerAnalysis {
    let closes: Vec<f64> = series.iter().map(|p| p.close).collect();
    let Some(&latest) = closes.last() else {
        return TickerAnalysis::failed(ticker, "No data");
    };

    let mut signals = Vec::new();

    // Drawdown vs trailing high
    let window = &closes[closes.len().saturating_sub(rules.drawdown_window)..];
    let recent_high = window.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if let Some(drawdown) = pct_change(recent_high, latest) {
        if drawdown <= rules.drawdown_alert_pct {
            signals.push(TickerSignal::alert(
                SignalKind::Drawdown,
                format!("{:.2}% below {}d high", drawdown, rules.drawdown_window),
            ));
        }
    }

    // Distance below the long moving average
    let long_ma = sma_series(&closes, rules.ma_period);
    let below_ma = long_ma
        .last()
        .copied()
        .flatten()
        .and_then(|ma| pct_change(ma, latest));
    if let Some(below) = below_ma {
        if below <= rules.ma_alert_pct {
            signals.push(TickerSignal::alert(
                SignalKind::MovingAverage,
                format!("{:.2}% below {}DMA", below, rules.ma_period),
            ));
        }
    }

    // Same-day bearish cross of fast under slow
    let fast = sma_series(&closes, rules.fast_ma_period);
    let slow = sma_series(&closes, rules.slow_ma_period);
    if closes.len() >= 2 {
        let (t, y) = (closes.len() - 1, closes.len() - 2);
        if let (Some(ft), Some(st), Some(fy), Some(sy)) = (fast[t], slow[t], fast[y], slow[y]) {
            if ft < st && fy >= sy {
                signals.push(TickerSignal::alert(
                    SignalKind::Cross,
                    format!(
                        "{}DMA crossed below {}DMA",
                        rules.fast_ma_period, rules.slow_ma_period
                    ),
                ));
            }
        }
    }

    // Day-over-day gap down
    let gap = match closes.len() {
        0 | 1 => None,
        n => pct_change(closes[n - 2], latest),
    };
    if let Some(gap) = gap {
        if gap <= rules.gap_alert_pct {
            signals.push(TickerSignal::alert(
                SignalKind::Gap,
                format!("{:.2}% gap down", gap),
            ));
        }
    }

    let status = if signals.is_empty() {
        TickerStatus::Ok
    } else {
        TickerStatus::Alert
    };

    debug!(
        ticker,
        price = latest,
        points = closes.len(),
        signals = signals.len(),
        "Ticker analyzed"
    );

    TickerAnalysis::Analyzed {
        ticker: ticker.to_string(),
        price: latest,
        signals,
        status,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, NaiveDate};

    fn series(closes: &[f64]) -> Vec<PricePoint> {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        closes
            .iter()
            .enumerate()
            .map(|(i, &c)| PricePoint::new(start + Duration::days(i as i64), c))
            .collect()
    }

    fn signal_kinds(analysis: &TickerAnalysis) -> Vec<SignalKind> {
        match analysis {
            TickerAnalysis::Analyzed { signals, .. } => signals.iter().map(|s| s.kind).collect(),
            TickerAnalysis::Failed { .. } => panic!("expected analysis, got error"),
        }
    }

    #[test]
    fn test_empty_series_is_error() {
        let analysis = analyze_closes("NONE", &[], &SignalRules::default());
        assert_eq!(analysis, TickerAnalysis::failed("NONE", "No data"));
    }

    #[test]
    fn test_drawdown_after_flat_run() {
        let mut closes = vec![100.0; 20];
        closes.push(94.0);

        let analysis = analyze_closes("SPY", &series(&closes), &SignalRules::default());

        assert!(analysis.is_alert());
        match &analysis {
            TickerAnalysis::Analyzed { signals, price, .. } => {
                assert_eq!(*price, 94.0);
                assert_eq!(signals[0].kind, SignalKind::Drawdown);
                assert_eq!(signals[0].detail, "-6.00% below 20d high");
            }
            TickerAnalysis::Failed { .. } => panic!("expected analysis"),
        }
        // 21 points: no 50DMA yet, gap fires too
        assert_eq!(signal_kinds(&analysis), vec![SignalKind::Drawdown, SignalKind::Gap]);
    }

    #[test]
    fn test_flat_series_is_ok() {
        let analysis = analyze_closes("QQQ", &series(&[50.0; 60]), &SignalRules::default());
        assert!(!analysis.is_alert());
        assert!(signal_kinds(&analysis).is_empty());
    }

    #[test]
    fn test_single_point_skips_everything() {
        let analysis = analyze_closes("ONE", &series(&[10.0]), &SignalRules::default());
        assert!(signal_kinds(&analysis).is_empty());
    }

    #[test]
    fn test_below_fifty_day_average() {
        // 50 flat closes at 100, then 96.5
        let mut closes = vec![100.0; 50];
        closes.push(96.5);

        let analysis = analyze_closes("IWM", &series(&closes), &SignalRules::default());
        let kinds = signal_kinds(&analysis);

        // sma50 = (49 * 100 + 96.5) / 50 = 99.93 -> -3.43%
        assert!(kinds.contains(&SignalKind::MovingAverage));
        assert!(kinds.contains(&SignalKind::Gap));
        assert!(kinds.contains(&SignalKind::Cross));
    }

    #[test]
    fn test_bearish_cross_requires_same_day_crossing() {
        // Falling series: fast average is already below slow for many days
        let closes: Vec<f64> = (0..80).map(|i| 200.0 - i as f64).collect();
        let analysis = analyze_closes("DOWN", &series(&closes), &SignalRules::default());

        assert!(!signal_kinds(&analysis).contains(&SignalKind::Cross));
    }

    #[test]
    fn test_gap_threshold_is_inclusive() {
        let analysis = analyze_closes("GAP", &series(&[100.0, 97.0]), &SignalRules::default());
        assert_eq!(signal_kinds(&analysis), vec![SignalKind::Gap]);

        let analysis = analyze_closes("GAP", &series(&[100.0, 97.5]), &SignalRules::default());
        assert!(signal_kinds(&analysis).is_empty());
    }

    #[test]
    fn test_sma_series_alignment() {
        let sma = sma_series(&[1.0, 2.0, 3.0, 4.0], 3);
        assert_eq!(sma, vec![None, None, Some(2.0), Some(3.0)]);
        assert!(sma_series(&[1.0, 2.0], 0).iter().all(Option::is_none));
    }
}
