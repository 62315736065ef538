//! Technical indicators used by the sentiment scorer
//!
//! This module provides:
//! - Population standard deviation
//! - Percentile rank against a reference distribution
//! - 14-period Wilder RSI
//!
//! All functions are pure and never fail: degenerate input maps to a neutral value
//! or `None`.

use statrs::statistics::Statistics;

/// RSI lookback length
pub const RSI_PERIOD: usize = 14;

/// Population standard deviation (divides by N, not N-1).
///
/// Returns 0.0 for an empty slice.
pub fn standard_deviation(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().population_std_dev()
}

/// Percentage (0-100) of `values` that are less than or equal to `x`.
///
/// Binary search over a sorted copy finds the rightmost insertion point, so values
/// equal to `x` count as below it. An empty reference yields 50.
///
/// # Example
/// `percentile_rank(&[10.0, 20.0, 30.0], 20.0)` is two thirds, about 66.67.
pub fn percentile_rank(values: &[f64], x: f64) -> f64 {
    if values.is_empty() {
        return 50.0;
    }

    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));

    let at_or_below = sorted.partition_point(|v| *v <= x);
    at_or_below as f64 / sorted.len() as f64 * 100.0
}

/// 14-period Relative Strength Index with Wilder smoothing
///
/// The first average gain/loss is the simple mean of the first 14 differences;
/// every later difference updates it as `(avg * 13 + value) / 14`.
///
/// # Returns
/// * `Some(f64)` - RSI between 0 and 100 (exactly 100 when there were no losses)
/// * `None` - Fewer than 15 closes
pub fn relative_strength_index_14(closes: &[f64]) -> Option<f64> {
    if closes.len() < RSI_PERIOD + 1 {
        return None;
    }

    let diffs: Vec<f64> = closes.windows(2).map(|w| w[1] - w[0]).collect();
    let gains: Vec<f64> = diffs.iter().map(|d| if *d > 0.0 { *d } else { 0.0 }).collect();
    let losses: Vec<f64> = diffs.iter().map(|d| if *d < 0.0 { -*d } else { 0.0 }).collect();

    let period = RSI_PERIOD as f64;
    let mut avg_gain = gains[..RSI_PERIOD].iter().sum::<f64>() / period;
    let mut avg_loss = losses[..RSI_PERIOD].iter().sum::<f64>() / period;

    for i in RSI_PERIOD..gains.len() {
        avg_gain = (avg_gain * (period - 1.0) + gains[i]) / period;
        avg_loss = (avg_loss * (period - 1.0) + losses[i]) / period;
    }

    if avg_loss == 0.0 {
        return Some(100.0);
    }

    let relative_strength = avg_gain / avg_loss;
    Some(100.0 - 100.0 / (1.0 + relative_strength))
}
