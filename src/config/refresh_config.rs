//! Refresh scheduling configuration parsing from environment variables.

use anyhow::{Context, Result};
use std::env;
use std::time::Duration;

/// Refresh scheduler environment configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefreshEnvConfig {
    pub interval: Duration,
    /// Skip a market while its previous fetch is still running
    pub single_flight: bool,
}

impl Default for RefreshEnvConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(5 * 60),
            single_flight: true,
        }
    }
}

impl RefreshEnvConfig {
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();

        let interval = match env::var("REFRESH_INTERVAL_SECS") {
            Ok(raw) => {
                let secs = raw
                    .trim()
                    .parse::<u64>()
                    .with_context(|| format!("Invalid REFRESH_INTERVAL_SECS: {}", raw))?;
                if secs == 0 {
                    anyhow::bail!("REFRESH_INTERVAL_SECS must be greater than 0");
                }
                Duration::from_secs(secs)
            }
            Err(_) => defaults.interval,
        };

        let single_flight = match env::var("REFRESH_SINGLE_FLIGHT") {
            Ok(raw) => raw
                .trim()
                .parse::<bool>()
                .with_context(|| format!("Invalid REFRESH_SINGLE_FLIGHT: {}", raw))?,
            Err(_) => defaults.single_flight,
        };

        Ok(Self {
            interval,
            single_flight,
        })
    }
}
