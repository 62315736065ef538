pub mod alternative_me;
pub mod cnn;

pub use alternative_me::AlternativeMeSentimentProvider;
pub use cnn::CnnSentimentProvider;

use serde::Deserialize;

/// Numeric feed field that some upstreams send as a JSON string.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum FeedNumber {
    Number(f64),
    Text(String),
}

impl FeedNumber {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            Self::Text(s) => s.trim().parse().ok(),
        }
        .filter(|n: &f64| n.is_finite())
    }
}

/// Rounds an index reading to the nearest integer and bounds it to 0-100.
pub fn score_from_raw(raw: f64) -> Option<u8> {
    raw.is_finite()
        .then(|| raw.round().clamp(0.0, 100.0) as u8)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feed_number_parsing() {
        assert_eq!(FeedNumber::Text(" 42 ".to_string()).as_f64(), Some(42.0));
        assert_eq!(FeedNumber::Number(61.7).as_f64(), Some(61.7));
        assert_eq!(FeedNumber::Text("".to_string()).as_f64(), None);
        assert_eq!(FeedNumber::Text("NaN".to_string()).as_f64(), None);
    }

    #[test]
    fn test_score_from_raw_rounds_and_clamps() {
        assert_eq!(score_from_raw(61.5), Some(62));
        assert_eq!(score_from_raw(61.49), Some(61));
        assert_eq!(score_from_raw(104.0), Some(100));
        assert_eq!(score_from_raw(-3.0), Some(0));
        assert_eq!(score_from_raw(f64::NAN), None);
    }
}
