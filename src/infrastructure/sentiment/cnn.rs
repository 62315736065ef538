use crate::domain::errors::FeedError;
use crate::domain::market::{MarketId, MarketItem, SourceLabel, format_data_time};
use crate::domain::sentiment::{SentimentBucket, SentimentProvider};
use crate::infrastructure::core::RetrievalChain;
use crate::infrastructure::sentiment::{FeedNumber, score_from_raw};
use anyhow::Context;
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use serde::Deserialize;
use tracing::info;

/// CNN dataviz graph data; the request date is appended as a path segment.
pub const DEFAULT_CNN_GRAPHDATA_URL: &str =
    "https://production.dataviz.cnn.io/index/fearandgreed/graphdata";

const FEED: &str = "CNN";

#[derive(Debug, Deserialize)]
struct CnnResponse {
    fear_and_greed: Option<CnnCurrent>,
}

#[derive(Debug, Deserialize)]
struct CnnCurrent {
    score: Option<FeedNumber>,
    rating: Option<String>,
    timestamp: Option<FeedNumber>,
}

/// US equities sentiment from the CNN Fear & Greed index.
pub struct CnnSentimentProvider {
    chain: RetrievalChain,
    base_url: String,
}

impl CnnSentimentProvider {
    pub fn new(chain: RetrievalChain, base_url: impl Into<String>) -> Self {
        Self {
            chain,
            base_url: base_url.into(),
        }
    }

    pub fn graphdata_url(&self, date: NaiveDate) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            date.format("%Y-%m-%d")
        )
    }
}

/// Decodes a CNN graph data payload into the US market item.
///
/// The bucket is derived from the rounded score; CNN's own label is kept as the
/// original rating. `request_date` is used as the data time when CNN omits one.
pub fn parse_cnn(body: &str, request_date: NaiveDate) -> Result<MarketItem, FeedError> {
    let response: CnnResponse = serde_json::from_str(body).map_err(|e| FeedError::Malformed {
        feed: FEED,
        reason: e.to_string(),
    })?;

    let current = response.fear_and_greed;
    let score = current
        .as_ref()
        .and_then(|fg| fg.score.as_ref())
        .and_then(FeedNumber::as_f64)
        .and_then(score_from_raw);
    let original_rating = current
        .as_ref()
        .and_then(|fg| fg.rating.as_deref())
        .and_then(SentimentBucket::from_cnn_rating);
    let data_time = current
        .as_ref()
        .and_then(|fg| fg.timestamp.as_ref())
        .and_then(format_cnn_timestamp)
        .unwrap_or_else(|| request_date.format("%Y-%m-%d").to_string());

    Ok(MarketItem {
        id: MarketId::Us,
        score,
        bucket: score.map(SentimentBucket::from_score),
        original_rating,
        source: Some(SourceLabel::Cnn),
        data_time,
    })
}

/// RFC 3339 strings and epoch milliseconds are reformatted; anything else is kept verbatim.
fn format_cnn_timestamp(raw: &FeedNumber) -> Option<String> {
    match raw {
        FeedNumber::Text(text) if text.trim().is_empty() => None,
        FeedNumber::Text(text) => Some(
            DateTime::parse_from_rfc3339(text.trim())
                .map(|at| format_data_time(&at))
                .unwrap_or_else(|_| text.trim().to_string()),
        ),
        FeedNumber::Number(ms) => Utc
            .timestamp_millis_opt(*ms as i64)
            .single()
            .map(|at| format_data_time(&at)),
    }
}

#[async_trait]
impl SentimentProvider for CnnSentimentProvider {
    fn market(&self) -> MarketId {
        MarketId::Us
    }

    async fn fetch_sentiment(&self) -> anyhow::Result<MarketItem> {
        let today = Utc::now().date_naive();
        let url = self.graphdata_url(today);
        info!("Fetching sentiment from CNN dataviz...");

        let body = self
            .chain
            .fetch_text(&url)
            .await
            .context("Failed to fetch CNN Fear & Greed data")?;

        let item = parse_cnn(&body, today).context("Failed to parse CNN response")?;

        info!(
            "Fetched US sentiment: {:?} ({:?}, CNN rating {:?}) at {}",
            item.score, item.bucket, item.original_rating, item.data_time
        );
        Ok(item)
    }
}
