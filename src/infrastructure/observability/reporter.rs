//! Periodic `METRICS_JSON:` lines describing the published board.

use crate::application::snapshot_store::{BoardSnapshot, SnapshotStore};
use crate::infrastructure::observability::metrics::Metrics;
use serde::Serialize;
use std::time::{Duration, Instant};
use tracing::{info, warn};

/// Metrics snapshot for JSON output
#[derive(Serialize)]
pub struct MetricsSnapshot {
    pub timestamp: String,
    pub uptime_seconds: u64,
    pub version: String,
    pub refreshed_at: Option<String>,
    pub markets: Vec<MarketSnapshot>,
}

#[derive(Serialize)]
pub struct MarketSnapshot {
    pub market: String,
    pub score: Option<u8>,
    pub bucket: Option<String>,
    pub data_time: String,
}

/// Outputs metrics as structured JSON logs on a configurable interval.
pub struct MetricsReporter {
    store: SnapshotStore,
    metrics: Metrics,
    start_time: Instant,
    interval: Duration,
}

impl MetricsReporter {
    /// `interval_seconds` below one is raised to one.
    pub fn new(store: SnapshotStore, metrics: Metrics, interval_seconds: u64) -> Self {
        Self {
            store,
            metrics,
            start_time: Instant::now(),
            interval: Duration::from_secs(interval_seconds.max(1)),
        }
    }

    pub async fn run(self) {
        info!(
            "MetricsReporter: Starting push-based metrics (interval: {:?})",
            self.interval
        );

        loop {
            tokio::time::sleep(self.interval).await;

            let snapshot = self.collect_snapshot();
            match serde_json::to_string(&snapshot) {
                Ok(json) => {
                    println!("METRICS_JSON:{}", json);
                    info!(
                        "Markets scored: {}/{} | Uptime: {}s",
                        snapshot.markets.iter().filter(|m| m.score.is_some()).count(),
                        snapshot.markets.len(),
                        snapshot.uptime_seconds
                    );
                }
                Err(e) => warn!("Failed to serialize metrics: {}", e),
            }
        }
    }

    fn collect_snapshot(&self) -> MetricsSnapshot {
        let uptime = self.start_time.elapsed().as_secs();
        self.metrics.uptime_seconds.set(uptime as f64);
        build_snapshot(&self.store.current(), uptime)
    }
}

fn build_snapshot(board: &BoardSnapshot, uptime_seconds: u64) -> MetricsSnapshot {
    MetricsSnapshot {
        timestamp: chrono::Utc::now().to_rfc3339(),
        uptime_seconds,
        version: env!("CARGO_PKG_VERSION").to_string(),
        refreshed_at: board.refreshed_at.map(|t| t.to_rfc3339()),
        markets: board
            .items
            .iter()
            .map(|item| MarketSnapshot {
                market: item.id.to_string(),
                score: item.score,
                bucket: item.bucket.map(|b| b.to_string()),
                data_time: item.data_time.clone(),
            })
            .collect(),
    }
}
