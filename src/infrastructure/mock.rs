//! In-memory stand-ins for the network edges, used by tests and offline runs.

use crate::domain::errors::FetchError;
use crate::domain::market::{MarketId, MarketItem, SourceLabel};
use crate::domain::ports::TextRetriever;
use crate::domain::sentiment::{SentimentBucket, SentimentProvider};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;
use tracing::debug;

/// Retriever that answers every request with the same body or status.
pub struct MockRetriever {
    name: &'static str,
    response: Result<String, u16>,
    urls: Mutex<Vec<String>>,
}

impl MockRetriever {
    pub fn ok(name: &'static str, body: impl Into<String>) -> Self {
        Self {
            name,
            response: Ok(body.into()),
            urls: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(name: &'static str, status: u16) -> Self {
        Self {
            name,
            response: Err(status),
            urls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> usize {
        self.urls.lock().map(|urls| urls.len()).unwrap_or(0)
    }

    pub fn requested_urls(&self) -> Vec<String> {
        self.urls.lock().map(|urls| urls.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl TextRetriever for MockRetriever {
    fn name(&self) -> &'static str {
        self.name
    }

    async fn retrieve(&self, url: &str) -> Result<String, FetchError> {
        if let Ok(mut urls) = self.urls.lock() {
            urls.push(url.to_string());
        }
        match &self.response {
            Ok(body) => Ok(body.clone()),
            Err(status) => Err(FetchError::Status {
                url: url.to_string(),
                status: *status,
            }),
        }
    }
}

/// Scripted result of one [`MockSentimentProvider`] call
#[derive(Debug, Clone)]
pub enum MockOutcome {
    Item(MarketItem),
    Fail(String),
}

/// Provider whose results, latency and release timing are controlled by the caller.
pub struct MockSentimentProvider {
    market: MarketId,
    queued: Mutex<VecDeque<MockOutcome>>,
    fallback: MockOutcome,
    gate: Option<Arc<Notify>>,
    calls: AtomicUsize,
}

impl MockSentimentProvider {
    pub fn succeeding(market: MarketId, score: u8) -> Self {
        Self::with_outcome(market, MockOutcome::Item(scored_item(market, score)))
    }

    pub fn failing(market: MarketId) -> Self {
        Self::with_outcome(
            market,
            MockOutcome::Fail(format!("{} upstream unavailable", market)),
        )
    }

    fn with_outcome(market: MarketId, fallback: MockOutcome) -> Self {
        Self {
            market,
            queued: Mutex::new(VecDeque::new()),
            fallback,
            gate: None,
            calls: AtomicUsize::new(0),
        }
    }

    /// Outcome for the next call, ahead of the default one
    pub fn then(self, outcome: MockOutcome) -> Self {
        if let Ok(mut queued) = self.queued.lock() {
            queued.push_back(outcome);
        }
        self
    }

    /// Every call blocks until the gate is notified once.
    pub fn gated(mut self, gate: Arc<Notify>) -> Self {
        self.gate = Some(gate);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SentimentProvider for MockSentimentProvider {
    fn market(&self) -> MarketId {
        self.market
    }

    async fn fetch_sentiment(&self) -> anyhow::Result<MarketItem> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        if let Some(gate) = &self.gate {
            gate.notified().await;
        }

        let outcome = self
            .queued
            .lock()
            .ok()
            .and_then(|mut queued| queued.pop_front())
            .unwrap_or_else(|| self.fallback.clone());

        debug!("MockSentimentProvider[{}]: {:?}", self.market, outcome);
        match outcome {
            MockOutcome::Item(item) => Ok(item),
            MockOutcome::Fail(reason) => anyhow::bail!(reason),
        }
    }
}

/// Fully populated item for `market` with the given score.
pub fn scored_item(market: MarketId, score: u8) -> MarketItem {
    let source = match market {
        MarketId::Us => SourceLabel::Cnn,
        MarketId::Crypto => SourceLabel::AlternativeMe,
        MarketId::Hk | MarketId::Cn => SourceLabel::StooqComputed,
    };
    MarketItem {
        id: market,
        score: Some(score),
        bucket: Some(SentimentBucket::from_score(score)),
        original_rating: None,
        source: Some(source),
        data_time: "2026-10-16".to_string(),
    }
}
