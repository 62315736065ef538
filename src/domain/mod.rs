// Tracked markets and their display state
pub mod market;

// Daily price rows
pub mod price;

// Sentiment buckets, scores and the provider port
pub mod sentiment;

// Port interfaces
pub mod ports;

// Domain-specific error types
pub mod errors;
