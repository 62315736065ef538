use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::market::{MarketId, MarketItem};

/// Five ordered sentiment bands spanning the 0-100 score range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SentimentBucket {
    ExtremeFear,
    Fear,
    Neutral,
    Greed,
    ExtremeGreed,
}

impl fmt::Display for SentimentBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ExtremeFear => write!(f, "Extreme Fear"),
            Self::Fear => write!(f, "Fear"),
            Self::Neutral => write!(f, "Neutral"),
            Self::Greed => write!(f, "Greed"),
            Self::ExtremeGreed => write!(f, "Extreme Greed"),
        }
    }
}

impl SentimentBucket {
    /// Upper bounds are inclusive and checked in ascending order.
    pub fn from_score(score: u8) -> Self {
        match score {
            0..=20 => Self::ExtremeFear,
            21..=40 => Self::Fear,
            41..=60 => Self::Neutral,
            61..=80 => Self::Greed,
            _ => Self::ExtremeGreed,
        }
    }

    /// Maps an Alternative.me `value_classification` label.
    ///
    /// The extreme bands match by substring, the others must match exactly
    /// (case-insensitive).
    pub fn from_alternative_label(label: &str) -> Option<Self> {
        let v = label.to_lowercase();
        if v.contains("extreme fear") {
            return Some(Self::ExtremeFear);
        }
        match v.as_str() {
            "fear" => Some(Self::Fear),
            "neutral" => Some(Self::Neutral),
            "greed" => Some(Self::Greed),
            _ if v.contains("extreme greed") => Some(Self::ExtremeGreed),
            _ => None,
        }
    }

    /// Maps a CNN `rating` label. Exact match only (case-insensitive).
    pub fn from_cnn_rating(rating: &str) -> Option<Self> {
        match rating.to_lowercase().as_str() {
            "extreme fear" => Some(Self::ExtremeFear),
            "fear" => Some(Self::Fear),
            "neutral" => Some(Self::Neutral),
            "greed" => Some(Self::Greed),
            "extreme greed" => Some(Self::ExtremeGreed),
            _ => None,
        }
    }
}

/// Indicator values behind a computed score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IndicatorSnapshot {
    pub rsi14: Option<f64>,
    pub volatility_percentile: f64,
}

/// Output of the price-based scorer.
///
/// An absent score is a valid "no opinion" outcome (too little history or no RSI),
/// not an error.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SentimentResult {
    pub score: Option<u8>,
    pub bucket: Option<SentimentBucket>,
    pub as_of_date: String,
    pub indicators: Option<IndicatorSnapshot>,
}

impl SentimentResult {
    pub fn unavailable() -> Self {
        Self::default()
    }
}

#[async_trait]
pub trait SentimentProvider: Send + Sync {
    /// Market this provider publishes for
    fn market(&self) -> MarketId;

    /// Fetch and score the current sentiment for this market
    async fn fetch_sentiment(&self) -> anyhow::Result<MarketItem>;
}
