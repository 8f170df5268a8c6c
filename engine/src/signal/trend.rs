//! Trend Estimator
//!
//! Percent change between the last two simple moving averages of a series.
//!
//! ```text
//! ma[i]   = mean(series[i - window + 1 ..= i])
//! trend   = (ma_last - ma_prev) / (|ma_prev| + EPSILON) * 100
//! ```
//!
//! Fewer than `window + 1` points give 0. A zero previous average also gives
//! 0 rather than an unbounded percentage.

use corelib::models::TrendResult;

pub const DEFAULT_WINDOW: usize = 3;

const EPSILON: f64 = 1e-9;

/// Simple moving averages of every full window, oldest first.
pub fn moving_average(series: &[f64], window: usize) -> Vec<f64> {
    if window == 0 {
        return Vec::new();
    }
    series
        .windows(window)
        .map(|w| w.iter().sum::<f64>() / window as f64)
        .collect()
}

pub fn rolling_trend(series: &[f64], window: usize) -> TrendResult {
    if window == 0 || series.len() < window + 1 {
        return 0.0;
    }

    let ma = moving_average(series, window);
    let Some(&last) = ma.last() else {
        return 0.0;
    };
    let prev = ma.len().checked_sub(2).map_or(last, |i| ma[i]);

    if prev == 0.0 {
        return 0.0;
    }

    (last - prev) / (prev.abs() + EPSILON) * 100.0
}
