//! Observability configuration parsing from environment variables.
//!
//! This module handles loading the push-based metrics reporter settings.

use std::env;

/// Observability environment configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObservabilityEnvConfig {
    pub enabled: bool,
    /// Seconds between `METRICS_JSON` lines
    pub interval_secs: u64,
}

impl Default for ObservabilityEnvConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            interval_secs: 60,
        }
    }
}

impl ObservabilityEnvConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            enabled: env::var("OBSERVABILITY_ENABLED")
                .ok()
                .and_then(|v| v.trim().parse::<bool>().ok())
                .unwrap_or(defaults.enabled),
            interval_secs: env::var("OBSERVABILITY_INTERVAL")
                .ok()
                .and_then(|v| v.trim().parse::<u64>().ok())
                .filter(|secs| *secs > 0)
                .unwrap_or(defaults.interval_secs),
        }
    }
}
