//! Text retrieval strategies
//!
//! Some upstreams are unreachable from the host but reachable through a
//! read-through proxy that wraps the body in a markdown envelope. A
//! [`RetrievalChain`] tries the direct strategy first and the proxied one second.

use crate::domain::errors::FetchError;
use crate::domain::ports::TextRetriever;
use crate::infrastructure::observability::Metrics;
use async_trait::async_trait;
use reqwest::Client;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, warn};

/// Default read-through proxy prefix
pub const DEFAULT_PROXY_BASE: &str = "https://r.jina.ai/http://";

const PROXY_BODY_MARKER: &str = "Markdown Content:";

/// Rewrites `url` so it is fetched through the proxy at `proxy_base`.
///
/// The target's scheme is dropped; the proxy re-adds it.
pub fn to_proxy_url(proxy_base: &str, url: &str) -> String {
    let without_scheme = url
        .strip_prefix("https://")
        .or_else(|| url.strip_prefix("http://"))
        .unwrap_or(url);
    format!("{}{}", proxy_base, without_scheme)
}

/// Unwraps a proxied response: everything after the first marker, trimmed.
pub fn extract_proxy_body(text: &str) -> &str {
    match text.find(PROXY_BODY_MARKER) {
        Some(idx) => text[idx + PROXY_BODY_MARKER.len()..].trim(),
        None => text.trim(),
    }
}

/// Plain GET against the target URL.
pub struct DirectRetriever {
    client: Client,
}

impl DirectRetriever {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl TextRetriever for DirectRetriever {
    fn name(&self) -> &'static str {
        "direct"
    }

    async fn retrieve(&self, url: &str) -> Result<String, FetchError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| FetchError::Transport {
                url: url.to_string(),
                reason: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        response.text().await.map_err(|e| FetchError::Body {
            url: url.to_string(),
            reason: e.to_string(),
        })
    }
}

/// Fetches through the read-through proxy and strips its envelope.
pub struct ProxyRetriever {
    inner: Arc<dyn TextRetriever>,
    proxy_base: String,
}

impl ProxyRetriever {
    pub fn new(inner: Arc<dyn TextRetriever>, proxy_base: impl Into<String>) -> Self {
        Self {
            inner,
            proxy_base: proxy_base.into(),
        }
    }
}

#[async_trait]
impl TextRetriever for ProxyRetriever {
    fn name(&self) -> &'static str {
        "proxy"
    }

    async fn retrieve(&self, url: &str) -> Result<String, FetchError> {
        let proxied = to_proxy_url(&self.proxy_base, url);
        let text = self.inner.retrieve(&proxied).await?;
        Ok(extract_proxy_body(&text).to_string())
    }
}

/// Ordered list of strategies; the first success wins.
#[derive(Clone)]
pub struct RetrievalChain {
    strategies: Vec<Arc<dyn TextRetriever>>,
    metrics: Option<Metrics>,
}

impl RetrievalChain {
    pub fn new(strategies: Vec<Arc<dyn TextRetriever>>) -> Self {
        Self {
            strategies,
            metrics: None,
        }
    }

    /// Direct fetch, then the proxy on any failure.
    pub fn direct_then_proxy(client: Client, proxy_base: &str) -> Self {
        let direct: Arc<dyn TextRetriever> = Arc::new(DirectRetriever::new(client));
        let proxy: Arc<dyn TextRetriever> =
            Arc::new(ProxyRetriever::new(direct.clone(), proxy_base));
        Self::new(vec![direct, proxy])
    }

    /// Proxy only, for endpoints that always reject direct calls.
    pub fn proxy_only(client: Client, proxy_base: &str) -> Self {
        let direct: Arc<dyn TextRetriever> = Arc::new(DirectRetriever::new(client));
        let proxy: Arc<dyn TextRetriever> = Arc::new(ProxyRetriever::new(direct, proxy_base));
        Self::new(vec![proxy])
    }

    pub fn with_metrics(mut self, metrics: Metrics) -> Self {
        self.metrics = Some(metrics);
        self
    }

    /// Returns the first successful body, or the last error when all strategies fail.
    pub async fn fetch_text(&self, url: &str) -> Result<String, FetchError> {
        let mut last_error = FetchError::NoStrategy;

        for (attempt, strategy) in self.strategies.iter().enumerate() {
            if attempt > 0 {
                if let Some(metrics) = &self.metrics {
                    metrics.inc_fallbacks(strategy.name());
                }
            }

            let started = Instant::now();
            let result = strategy.retrieve(url).await;
            if let Some(metrics) = &self.metrics {
                metrics.observe_fetch_latency(strategy.name(), started.elapsed().as_secs_f64());
            }

            match result {
                Ok(body) => {
                    debug!(
                        "RetrievalChain: {} succeeded for {} ({} bytes)",
                        strategy.name(),
                        url,
                        body.len()
                    );
                    return Ok(body);
                }
                Err(e) => {
                    warn!("RetrievalChain: {} failed for {}: {}", strategy.name(), url, e);
                    last_error = e;
                }
            }
        }

        Err(last_error)
    }
}
