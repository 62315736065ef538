use crate::application::snapshot_store::SnapshotStore;
use crate::domain::market::MarketId;
use crate::domain::sentiment::SentimentProvider;
use crate::infrastructure::observability::Metrics;
use crate::infrastructure::observability::metrics::{
    OUTCOME_FAILED, OUTCOME_PUBLISHED, OUTCOME_SKIPPED,
};
use chrono::Local;
use futures::future::join_all;
use std::collections::HashSet;
use std::sync::{Arc, Mutex};
use tokio::sync::watch;
use tokio::time::{self, Duration, MissedTickBehavior};
use tracing::{debug, error, info, warn};

/// Tally of one fan-out cycle, available once every task has settled.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CycleReport {
    pub published: usize,
    pub failed: usize,
    pub skipped: usize,
}

/// Markets with a fetch still outstanding.
#[derive(Clone, Default)]
struct FlightTracker {
    active: Arc<Mutex<HashSet<MarketId>>>,
}

impl FlightTracker {
    fn try_acquire(&self, market: MarketId) -> Option<FlightPermit> {
        let mut active = self.active.lock().unwrap_or_else(|e| e.into_inner());
        if !active.insert(market) {
            return None;
        }
        Some(FlightPermit {
            market,
            active: Arc::clone(&self.active),
        })
    }
}

/// Releases the market when the task finishes, even if it panics.
struct FlightPermit {
    market: MarketId,
    active: Arc<Mutex<HashSet<MarketId>>>,
}

impl Drop for FlightPermit {
    fn drop(&mut self) {
        let mut active = self.active.lock().unwrap_or_else(|e| e.into_inner());
        active.remove(&self.market);
    }
}

/// Fans out one fetch+score task per market on a fixed interval.
///
/// Each market publishes on its own as soon as its task completes; a failure
/// leaves that market's previous item on the board. With single-flight enabled
/// (the default) a market whose previous fetch is still running sits the new
/// cycle out instead of racing it.
#[derive(Clone)]
pub struct RefreshOrchestrator {
    providers: Arc<Vec<Arc<dyn SentimentProvider>>>,
    store: SnapshotStore,
    metrics: Option<Metrics>,
    interval: Duration,
    single_flight: bool,
    flights: FlightTracker,
}

impl RefreshOrchestrator {
    pub fn new(
        providers: Vec<Arc<dyn SentimentProvider>>,
        store: SnapshotStore,
        interval: Duration,
    ) -> Self {
        Self {
            providers: Arc::new(providers),
            store,
            metrics: None,
            interval,
            single_flight: true,
            flights: FlightTracker::default(),
        }
    }

    pub fn with_metrics(mut self, metrics: Metrics) -> Self {
        self.metrics = Some(metrics);
        self
    }

    /// `false` allows overlapping fetches for the same market.
    pub fn with_single_flight(mut self, enabled: bool) -> Self {
        self.single_flight = enabled;
        self
    }

    pub fn store(&self) -> &SnapshotStore {
        &self.store
    }

    /// Runs one refresh cycle and waits for every task it started.
    ///
    /// The refresh timestamp is recorded before any provider is polled.
    pub async fn refresh_all(&self) -> CycleReport {
        self.store.mark_refreshed(Local::now());
        if let Some(metrics) = &self.metrics {
            metrics.inc_refresh_cycles();
        }

        let mut report = CycleReport::default();
        let mut handles = Vec::with_capacity(self.providers.len());

        for provider in self.providers.iter() {
            let market = provider.market();

            let permit = if self.single_flight {
                match self.flights.try_acquire(market) {
                    Some(permit) => Some(permit),
                    None => {
                        debug!(
                            "RefreshOrchestrator: {} still in flight, skipping this cycle",
                            market
                        );
                        report.skipped += 1;
                        self.record_outcome(market, OUTCOME_SKIPPED);
                        continue;
                    }
                }
            } else {
                None
            };

            let provider = Arc::clone(provider);
            let store = self.store.clone();
            let metrics = self.metrics.clone();
            let handle = tokio::spawn(async move {
                let _permit = permit;
                refresh_market(provider.as_ref(), &store, metrics.as_ref()).await
            });
            handles.push((market, handle));
        }

        let (markets, handles): (Vec<_>, Vec<_>) = handles.into_iter().unzip();
        for (market, joined) in markets.into_iter().zip(join_all(handles).await) {
            match joined {
                Ok(true) => report.published += 1,
                Ok(false) => report.failed += 1,
                Err(e) => {
                    error!("RefreshOrchestrator: {} task aborted: {}", market, e);
                    self.record_outcome(market, OUTCOME_FAILED);
                    report.failed += 1;
                }
            }
        }

        report
    }

    /// Refreshes immediately, then on every interval until `shutdown` turns true.
    ///
    /// Cycles are spawned, so a slow cycle never delays the next tick.
    pub async fn run(self, mut shutdown: watch::Receiver<bool>) {
        info!(
            "RefreshOrchestrator started. Markets: {}, interval: {:?}, single-flight: {}",
            self.providers.len(),
            self.interval,
            self.single_flight
        );

        let mut interval = time::interval(self.interval);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = interval.tick() => {
                    let this = self.clone();
                    tokio::spawn(async move {
                        let report = this.refresh_all().await;
                        info!(
                            "Refresh cycle done: {} published, {} failed, {} skipped",
                            report.published, report.failed, report.skipped
                        );
                    });
                }
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        info!("RefreshOrchestrator: shutdown requested, stopping scheduler");
                        break;
                    }
                }
            }
        }
    }

    fn record_outcome(&self, market: MarketId, outcome: &str) {
        if let Some(metrics) = &self.metrics {
            metrics.inc_market_outcome(market.as_str(), outcome);
        }
    }
}

/// Fetches one market and publishes it. Returns whether a new item was published.
async fn refresh_market(
    provider: &dyn SentimentProvider,
    store: &SnapshotStore,
    metrics: Option<&Metrics>,
) -> bool {
    let market = provider.market();

    match provider.fetch_sentiment().await {
        Ok(item) => {
            if item.id != market {
                warn!(
                    "RefreshOrchestrator: provider for {} returned an item for {}, dropping it",
                    market, item.id
                );
                if let Some(metrics) = metrics {
                    metrics.inc_market_outcome(market.as_str(), OUTCOME_FAILED);
                }
                return false;
            }

            if let Some(metrics) = metrics {
                match item.score {
                    Some(score) => metrics.set_market_score(market.as_str(), f64::from(score)),
                    None => metrics.clear_market_score(market.as_str()),
                }
                metrics.inc_market_outcome(market.as_str(), OUTCOME_PUBLISHED);
            }
            store.publish(item)
        }
        Err(e) => {
            warn!(
                "RefreshOrchestrator: {} refresh failed, keeping previous data: {:#}",
                market, e
            );
            if let Some(metrics) = metrics {
                metrics.inc_market_outcome(market.as_str(), OUTCOME_FAILED);
            }
            false
        }
    }
}
