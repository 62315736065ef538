//! Fear & Greed Board - Headless sentiment dashboard
//!
//! Polls four markets (US, Hong Kong, China, Crypto) on a fixed interval and
//! prints the board to stdout every time a market updates. Metrics are pushed
//! via structured JSON logs to stdout.
//!
//! # Usage
//! ```sh
//! REFRESH_INTERVAL_SECS=300 cargo run
//! ```
//!
//! # Environment Variables
//! - `REFRESH_INTERVAL_SECS` - Seconds between refresh cycles (default: 300)
//! - `REFRESH_SINGLE_FLIGHT` - Skip markets still fetching (default: true)
//! - `OBSERVABILITY_ENABLED` - Enable metrics reporting (default: true)
//! - `OBSERVABILITY_INTERVAL` - Interval in seconds between metric outputs (default: 60)

use anyhow::Result;
use feargreed::application::{RefreshOrchestrator, SnapshotStore};
use feargreed::config::Config;
use feargreed::domain::market::MarketId;
use feargreed::domain::sentiment::SentimentProvider;
use feargreed::infrastructure::observability::{Metrics, MetricsReporter};
use feargreed::infrastructure::sentiment::{AlternativeMeSentimentProvider, CnnSentimentProvider};
use feargreed::infrastructure::stooq::StooqSentimentProvider;
use feargreed::infrastructure::{HttpClientFactory, RetrievalChain};
use feargreed::interfaces::render_board;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{Level, info};
use tracing_subscriber::prelude::*;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let stdout_layer = tracing_subscriber::fmt::layer().with_target(false).pretty();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env().add_directive(Level::INFO.into()))
        .with(stdout_layer)
        .init();

    info!("Fear & Greed Board {} starting...", env!("CARGO_PKG_VERSION"));

    let config = Config::from_env()?;
    info!(
        "Configuration loaded: Interval={:?}, SingleFlight={}, CN={}, HK={}",
        config.refresh.interval,
        config.refresh.single_flight,
        config.endpoints.cn_symbol,
        config.endpoints.hk_symbol
    );

    let metrics = Metrics::new()?;
    let client = HttpClientFactory::create_client();
    let endpoints = &config.endpoints;

    let fallback_chain = RetrievalChain::direct_then_proxy(client.clone(), &endpoints.proxy_base_url)
        .with_metrics(metrics.clone());
    // dataviz.cnn.io rejects direct browserless requests
    let proxy_chain = RetrievalChain::proxy_only(client, &endpoints.proxy_base_url)
        .with_metrics(metrics.clone());

    let providers: Vec<Arc<dyn SentimentProvider>> = vec![
        Arc::new(CnnSentimentProvider::new(
            proxy_chain,
            endpoints.cnn_graphdata_url.clone(),
        )),
        Arc::new(StooqSentimentProvider::new(
            MarketId::Hk,
            endpoints.hk_symbol.clone(),
            endpoints.stooq_base_url.clone(),
            fallback_chain.clone(),
        )),
        Arc::new(StooqSentimentProvider::new(
            MarketId::Cn,
            endpoints.cn_symbol.clone(),
            endpoints.stooq_base_url.clone(),
            fallback_chain.clone(),
        )),
        Arc::new(AlternativeMeSentimentProvider::new(
            fallback_chain,
            endpoints.alternative_me_url.clone(),
        )),
    ];

    let store = SnapshotStore::new(&MarketId::ALL);
    let orchestrator = RefreshOrchestrator::new(providers, store.clone(), config.refresh.interval)
        .with_metrics(metrics.clone())
        .with_single_flight(config.refresh.single_flight);

    // Board printer: one render per published change
    let mut board_rx = store.subscribe();
    tokio::spawn(async move {
        println!("{}", render_board(&board_rx.borrow_and_update()));
        while board_rx.changed().await.is_ok() {
            let board = board_rx.borrow_and_update().clone();
            println!("{}", render_board(&board));
        }
    });

    if config.observability.enabled {
        let interval = config.observability.interval_secs;
        let reporter = MetricsReporter::new(store.clone(), metrics, interval);
        tokio::spawn(async move {
            reporter.run().await;
        });
        info!("Metrics reporter started (interval: {}s)", interval);
    } else {
        info!("Metrics reporting disabled.");
    }

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let refresher = tokio::spawn(orchestrator.run(shutdown_rx));

    info!("Board running. Press Ctrl+C to shutdown.");

    tokio::signal::ctrl_c().await?;
    info!("Shutdown signal received. Stopping refresh loop...");

    let _ = shutdown_tx.send(true);
    refresher.await?;

    Ok(())
}
