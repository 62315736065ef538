//! Configuration module.
//!
//! This module provides structured configuration loading from environment variables,
//! organized by concern: Refresh scheduling, Endpoints, and Observability.

mod endpoint_config;
mod observability_config;
mod refresh_config;

pub use endpoint_config::EndpointEnvConfig;
pub use observability_config::ObservabilityEnvConfig;
pub use refresh_config::RefreshEnvConfig;

use anyhow::Result;

/// Main application configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Config {
    pub refresh: RefreshEnvConfig,
    pub endpoints: EndpointEnvConfig,
    pub observability: ObservabilityEnvConfig,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            refresh: RefreshEnvConfig::from_env()?,
            endpoints: EndpointEnvConfig::from_env(),
            observability: ObservabilityEnvConfig::from_env(),
        })
    }
}
