use crate::application::scoring::SentimentScorer;
use crate::domain::market::{MarketId, MarketItem, SourceLabel};
use crate::domain::sentiment::SentimentProvider;
use crate::infrastructure::core::RetrievalChain;
use crate::infrastructure::core::http_client_factory::build_url_with_query;
use crate::infrastructure::stooq::price_csv::PriceCsvParser;
use anyhow::Context;
use async_trait::async_trait;
use tracing::info;

/// Default Stooq daily history endpoint
pub const DEFAULT_STOOQ_BASE_URL: &str = "https://stooq.com/q/d/l/";

/// Computes a market's sentiment from its index's daily closes on Stooq.
pub struct StooqSentimentProvider {
    market: MarketId,
    symbol: String,
    base_url: String,
    chain: RetrievalChain,
    parser: PriceCsvParser,
    scorer: SentimentScorer,
}

impl StooqSentimentProvider {
    pub fn new(
        market: MarketId,
        symbol: impl Into<String>,
        base_url: impl Into<String>,
        chain: RetrievalChain,
    ) -> Self {
        Self {
            market,
            symbol: symbol.into(),
            base_url: base_url.into(),
            chain,
            parser: PriceCsvParser::default(),
            scorer: SentimentScorer::default(),
        }
    }

    /// Daily history URL for the configured symbol
    pub fn history_url(&self) -> String {
        build_url_with_query(&self.base_url, &[("s", self.symbol.as_str()), ("i", "d")])
    }
}

#[async_trait]
impl SentimentProvider for StooqSentimentProvider {
    fn market(&self) -> MarketId {
        self.market
    }

    async fn fetch_sentiment(&self) -> anyhow::Result<MarketItem> {
        let url = self.history_url();
        info!("Fetching {} daily history from Stooq...", self.symbol);

        let csv = self
            .chain
            .fetch_text(&url)
            .await
            .with_context(|| format!("Failed to fetch {} history from Stooq", self.symbol))?;

        let rows = self.parser.parse(&csv);
        let result = self.scorer.score(&rows);

        info!(
            "{}: {} rows, score {:?} ({:?}) as of {}",
            self.symbol,
            rows.len(),
            result.score,
            result.bucket,
            if result.as_of_date.is_empty() { "-" } else { &result.as_of_date }
        );

        Ok(MarketItem {
            id: self.market,
            score: result.score,
            bucket: result.bucket,
            original_rating: None,
            source: Some(SourceLabel::StooqComputed),
            data_time: result.as_of_date,
        })
    }
}
