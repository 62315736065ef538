//! Prometheus metrics definitions for the sentiment monitor
//!
//! All metrics use the `feargreed_` prefix and are read-only.

use prometheus::{
    Gauge, GaugeVec, HistogramOpts, HistogramVec, IntCounter, IntCounterVec, Opts, Registry,
    TextEncoder,
    core::{AtomicF64, GenericGauge, GenericGaugeVec},
};
use std::sync::Arc;

/// Outcome label values for `feargreed_market_refresh_total`
pub const OUTCOME_PUBLISHED: &str = "published";
pub const OUTCOME_FAILED: &str = "failed";
pub const OUTCOME_SKIPPED: &str = "skipped";

/// Prometheus metrics for the refresh pipeline
#[derive(Clone)]
pub struct Metrics {
    registry: Arc<Registry>,
    /// Refresh cycles started
    pub refresh_cycles_total: IntCounter,
    /// Per-market task outcomes
    pub market_refresh_total: IntCounterVec,
    /// Latest published score per market
    pub market_score: GenericGaugeVec<AtomicF64>,
    /// Requests that had to move on to a later retrieval strategy
    pub fetch_fallbacks_total: IntCounterVec,
    /// Time spent per retrieval attempt
    pub fetch_latency_seconds: HistogramVec,
    /// Uptime in seconds
    pub uptime_seconds: GenericGauge<AtomicF64>,
}

impl Metrics {
    /// Create a new Metrics instance with all gauges and counters registered
    pub fn new() -> anyhow::Result<Self> {
        let registry = Registry::new();

        let refresh_cycles_total = IntCounter::with_opts(Opts::new(
            "feargreed_refresh_cycles_total",
            "Refresh cycles started",
        ))?;
        registry.register(Box::new(refresh_cycles_total.clone()))?;

        let market_refresh_total = IntCounterVec::new(
            Opts::new(
                "feargreed_market_refresh_total",
                "Per-market refresh outcomes",
            ),
            &["market", "outcome"],
        )?;
        registry.register(Box::new(market_refresh_total.clone()))?;

        let market_score = GaugeVec::new(
            Opts::new("feargreed_market_score", "Latest sentiment score (0-100)"),
            &["market"],
        )?;
        registry.register(Box::new(market_score.clone()))?;

        let fetch_fallbacks_total = IntCounterVec::new(
            Opts::new(
                "feargreed_fetch_fallbacks_total",
                "Fetches handed to a later retrieval strategy",
            ),
            &["strategy"],
        )?;
        registry.register(Box::new(fetch_fallbacks_total.clone()))?;

        let fetch_latency_seconds = HistogramVec::new(
            HistogramOpts::new(
                "feargreed_fetch_latency_seconds",
                "Retrieval attempt latency in seconds",
            )
            .buckets(vec![0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0]),
            &["strategy"],
        )?;
        registry.register(Box::new(fetch_latency_seconds.clone()))?;

        let uptime_seconds = Gauge::with_opts(Opts::new(
            "feargreed_uptime_seconds",
            "Process uptime in seconds",
        ))?;
        registry.register(Box::new(uptime_seconds.clone()))?;

        Ok(Self {
            registry: Arc::new(registry),
            refresh_cycles_total,
            market_refresh_total,
            market_score,
            fetch_fallbacks_total,
            fetch_latency_seconds,
            uptime_seconds,
        })
    }

    /// Render all metrics in Prometheus text format
    pub fn render(&self) -> String {
        let encoder = TextEncoder::new();
        let metric_families = self.registry.gather();
        encoder
            .encode_to_string(&metric_families)
            .unwrap_or_default()
    }

    pub fn inc_refresh_cycles(&self) {
        self.refresh_cycles_total.inc();
    }

    pub fn inc_market_outcome(&self, market: &str, outcome: &str) {
        self.market_refresh_total
            .with_label_values(&[market, outcome])
            .inc();
    }

    pub fn market_outcome_total(&self, market: &str, outcome: &str) -> u64 {
        self.market_refresh_total
            .with_label_values(&[market, outcome])
            .get()
    }

    pub fn set_market_score(&self, market: &str, score: f64) {
        self.market_score.with_label_values(&[market]).set(score);
    }

    /// Drops the score series of a market that currently has no score.
    pub fn clear_market_score(&self, market: &str) {
        let _ = self.market_score.remove_label_values(&[market]);
    }

    pub fn inc_fallbacks(&self, strategy: &str) {
        self.fetch_fallbacks_total
            .with_label_values(&[strategy])
            .inc();
    }

    pub fn fallbacks_total(&self, strategy: &str) -> u64 {
        self.fetch_fallbacks_total
            .with_label_values(&[strategy])
            .get()
    }

    /// Observe retrieval latency
    pub fn observe_fetch_latency(&self, strategy: &str, latency: f64) {
        self.fetch_latency_seconds
            .with_label_values(&[strategy])
            .observe(latency);
    }
}
