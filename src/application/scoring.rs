use crate::application::indicators::{
    percentile_rank, relative_strength_index_14, standard_deviation,
};
use crate::domain::price::{PriceRow, closes};
use crate::domain::sentiment::{IndicatorSnapshot, SentimentBucket, SentimentResult};
use tracing::debug;

/// Tunables of the price-based sentiment score.
#[derive(Debug, Clone)]
pub struct ScoringParams {
    /// Below this many rows the scorer has no opinion
    pub min_rows: usize,
    /// Only the most recent rows are considered
    pub max_rows: usize,
    /// Trailing window (in returns) for realized volatility
    pub volatility_window: usize,
    /// Trading days per year, used to annualize volatility
    pub annualization_days: f64,
    /// Number of rolling volatility observations used as the reference distribution
    pub volatility_history: usize,
    pub rsi_weight: f64,
    pub volatility_weight: f64,
}

impl Default for ScoringParams {
    fn default() -> Self {
        Self {
            min_rows: 60,
            max_rows: 600,
            volatility_window: 20,
            annualization_days: 252.0,
            volatility_history: 252,
            rsi_weight: 0.7,
            volatility_weight: 0.3,
        }
    }
}

/// Turns a daily price series into a bounded 0-100 sentiment score.
///
/// Momentum (RSI14) dominates; the volatility regime is a secondary modifier where
/// unusually high recent volatility pulls the score towards fear.
#[derive(Debug, Clone, Default)]
pub struct SentimentScorer {
    params: ScoringParams,
}

impl SentimentScorer {
    pub fn new(params: ScoringParams) -> Self {
        Self { params }
    }

    pub fn score(&self, series: &[PriceRow]) -> SentimentResult {
        let p = &self.params;
        if series.len() < p.min_rows {
            debug!(
                "SentimentScorer: {} rows < {} required, no score",
                series.len(),
                p.min_rows
            );
            return SentimentResult::unavailable();
        }

        let tail = &series[series.len().saturating_sub(p.max_rows)..];
        let closes = closes(tail);
        let as_of_date = tail
            .last()
            .map(|row| row.date.clone())
            .unwrap_or_default();

        let volatility_percentile = self.volatility_percentile(&closes);
        let volatility_score = 100.0 - volatility_percentile;
        let rsi14 = relative_strength_index_14(&closes);

        let score = rsi14.map(|rsi| {
            let blended = p.rsi_weight * rsi + p.volatility_weight * volatility_score;
            blended.round().clamp(0.0, 100.0) as u8
        });

        debug!(
            "SentimentScorer: as_of={} rsi14={:?} vol_pct={:.2} score={:?}",
            as_of_date, rsi14, volatility_percentile, score
        );

        SentimentResult {
            score,
            bucket: score.map(SentimentBucket::from_score),
            as_of_date,
            indicators: Some(IndicatorSnapshot {
                rsi14,
                volatility_percentile,
            }),
        }
    }

    /// Rank of the latest rolling volatility within its recent history.
    fn volatility_percentile(&self, closes: &[f64]) -> f64 {
        let returns = log_returns(closes);
        let series = self.rolling_volatility(&returns);

        let current = series.last().copied().unwrap_or(0.0);
        let history = &series[series.len().saturating_sub(self.params.volatility_history)..];
        percentile_rank(history, current)
    }

    /// Annualized standard deviation over every full trailing window.
    pub fn rolling_volatility(&self, returns: &[f64]) -> Vec<f64> {
        let window = self.params.volatility_window;
        if window == 0 || returns.len() < window {
            return Vec::new();
        }
        let annualize = self.params.annualization_days.sqrt();
        returns
            .windows(window)
            .map(|w| standard_deviation(w) * annualize)
            .collect()
    }
}

/// `ln(close[i] / close[i-1])` for consecutive closes.
pub fn log_returns(closes: &[f64]) -> Vec<f64> {
    closes.windows(2).map(|w| (w[1] / w[0]).ln()).collect()
}
