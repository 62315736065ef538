use crate::domain::errors::FeedError;
use crate::domain::market::{MarketId, MarketItem, SourceLabel, format_data_time};
use crate::domain::sentiment::{SentimentBucket, SentimentProvider};
use crate::infrastructure::core::RetrievalChain;
use crate::infrastructure::sentiment::{FeedNumber, score_from_raw};
use anyhow::Context;
use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use serde::Deserialize;
use tracing::info;

/// Latest crypto Fear & Greed reading
pub const DEFAULT_ALTERNATIVE_ME_URL: &str = "https://api.alternative.me/fng/?limit=1&format=json";

const FEED: &str = "Alternative.me";

#[derive(Debug, Deserialize)]
struct AlternativeMeResponse {
    #[serde(default)]
    data: Vec<AlternativeMeData>,
}

#[derive(Debug, Deserialize)]
struct AlternativeMeData {
    value: Option<FeedNumber>,
    value_classification: Option<String>,
    timestamp: Option<FeedNumber>,
}

pub struct AlternativeMeSentimentProvider {
    chain: RetrievalChain,
    url: String,
}

impl AlternativeMeSentimentProvider {
    pub fn new(chain: RetrievalChain, url: impl Into<String>) -> Self {
        Self {
            chain,
            url: url.into(),
        }
    }
}

/// Decodes an Alternative.me payload into the crypto market item.
///
/// The bucket follows the feed's own classification label.
pub fn parse_alternative_me(body: &str) -> Result<MarketItem, FeedError> {
    let response: AlternativeMeResponse =
        serde_json::from_str(body).map_err(|e| FeedError::Malformed {
            feed: FEED,
            reason: e.to_string(),
        })?;

    let data = response
        .data
        .into_iter()
        .next()
        .ok_or(FeedError::MissingRecord { feed: FEED })?;

    let score = data.value.as_ref().and_then(FeedNumber::as_f64).and_then(score_from_raw);
    let bucket = data
        .value_classification
        .as_deref()
        .and_then(SentimentBucket::from_alternative_label);

    let data_time = data
        .timestamp
        .as_ref()
        .and_then(FeedNumber::as_f64)
        .filter(|secs| *secs > 0.0)
        .and_then(|secs| Utc.timestamp_opt(secs as i64, 0).single())
        .map(|at| format_data_time(&at))
        .unwrap_or_default();

    Ok(MarketItem {
        id: MarketId::Crypto,
        score,
        bucket,
        original_rating: None,
        source: Some(SourceLabel::AlternativeMe),
        data_time,
    })
}

#[async_trait]
impl SentimentProvider for AlternativeMeSentimentProvider {
    fn market(&self) -> MarketId {
        MarketId::Crypto
    }

    async fn fetch_sentiment(&self) -> anyhow::Result<MarketItem> {
        info!("Fetching sentiment from Alternative.me...");

        let body = self
            .chain
            .fetch_text(&self.url)
            .await
            .context("Failed to fetch Alternative.me sentiment")?;

        let item = parse_alternative_me(&body).context("Failed to parse Alternative.me response")?;

        info!(
            "Fetched crypto sentiment: {:?} ({:?}) at {}",
            item.score, item.bucket, item.data_time
        );
        Ok(item)
    }
}
