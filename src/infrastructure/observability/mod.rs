//! Outbound-only observability
//!
//! Counters live in a private Prometheus registry; the reporter pushes the board
//! and uptime to stdout as `METRICS_JSON:` lines. Nothing listens for requests.

pub mod metrics;
pub mod reporter;

pub use metrics::Metrics;
pub use reporter::MetricsReporter;
