//! Upstream endpoint configuration parsing from environment variables.

use crate::infrastructure::core::retrieval::DEFAULT_PROXY_BASE;
use crate::infrastructure::sentiment::alternative_me::DEFAULT_ALTERNATIVE_ME_URL;
use crate::infrastructure::sentiment::cnn::DEFAULT_CNN_GRAPHDATA_URL;
use crate::infrastructure::stooq::DEFAULT_STOOQ_BASE_URL;
use std::env;

/// Endpoint environment configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndpointEnvConfig {
    pub proxy_base_url: String,
    pub alternative_me_url: String,
    pub cnn_graphdata_url: String,
    pub stooq_base_url: String,
    pub cn_symbol: String,
    pub hk_symbol: String,
}

impl Default for EndpointEnvConfig {
    fn default() -> Self {
        Self {
            proxy_base_url: DEFAULT_PROXY_BASE.to_string(),
            alternative_me_url: DEFAULT_ALTERNATIVE_ME_URL.to_string(),
            cnn_graphdata_url: DEFAULT_CNN_GRAPHDATA_URL.to_string(),
            stooq_base_url: DEFAULT_STOOQ_BASE_URL.to_string(),
            cn_symbol: "^shc".to_string(),
            hk_symbol: "^hsi".to_string(),
        }
    }
}

fn var_or(name: &str, default: String) -> String {
    env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .unwrap_or(default)
}

impl EndpointEnvConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            proxy_base_url: var_or("PROXY_BASE_URL", defaults.proxy_base_url),
            alternative_me_url: var_or("ALTERNATIVE_ME_URL", defaults.alternative_me_url),
            cnn_graphdata_url: var_or("CNN_GRAPHDATA_URL", defaults.cnn_graphdata_url),
            stooq_base_url: var_or("STOOQ_BASE_URL", defaults.stooq_base_url),
            cn_symbol: var_or("CN_SYMBOL", defaults.cn_symbol),
            hk_symbol: var_or("HK_SYMBOL", defaults.hk_symbol),
        }
    }
}
