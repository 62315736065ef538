// Technical indicators over daily closes
pub mod indicators;

// Price-derived sentiment scoring
pub mod scoring;

// Board state shared with readers
pub mod snapshot_store;

// Periodic refresh orchestrator
pub mod refresh;

pub use refresh::{CycleReport, RefreshOrchestrator};
pub use scoring::{ScoringParams, SentimentScorer};
pub use snapshot_store::{BoardSnapshot, SnapshotStore};
