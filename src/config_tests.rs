use crate::config::Config;
use std::env;
use std::sync::Mutex;
use std::sync::OnceLock;
use std::time::Duration;

// Global lock to prevent race conditions when modifying environment variables in tests
static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();

fn get_env_lock() -> &'static Mutex<()> {
    ENV_LOCK.get_or_init(|| Mutex::new(()))
}

const VARS: [&str; 10] = [
    "REFRESH_INTERVAL_SECS",
    "REFRESH_SINGLE_FLIGHT",
    "PROXY_BASE_URL",
    "ALTERNATIVE_ME_URL",
    "CNN_GRAPHDATA_URL",
    "STOOQ_BASE_URL",
    "CN_SYMBOL",
    "HK_SYMBOL",
    "OBSERVABILITY_ENABLED",
    "OBSERVABILITY_INTERVAL",
];

fn clear_vars() {
    for var in VARS {
        // SAFETY: guarded by ENV_LOCK; no other test thread touches these variables
        unsafe { env::remove_var(var) };
    }
}

fn set_var(key: &str, value: &str) {
    // SAFETY: guarded by ENV_LOCK
    unsafe { env::set_var(key, value) };
}

#[test]
fn test_config_defaults() {
    let _guard = get_env_lock().lock().unwrap_or_else(|e| e.into_inner());
    clear_vars();

    let config = Config::from_env().unwrap();
    assert_eq!(config, Config::default());
    assert_eq!(config.refresh.interval, Duration::from_secs(300));
    assert!(config.refresh.single_flight);
    assert_eq!(config.endpoints.cn_symbol, "^shc");
    assert_eq!(config.endpoints.hk_symbol, "^hsi");
    assert_eq!(config.endpoints.proxy_base_url, "https://r.jina.ai/http://");
    assert!(config.observability.enabled);
}

#[test]
fn test_config_overrides() {
    let _guard = get_env_lock().lock().unwrap_or_else(|e| e.into_inner());
    clear_vars();

    set_var("REFRESH_INTERVAL_SECS", "90");
    set_var("REFRESH_SINGLE_FLIGHT", "false");
    set_var("HK_SYMBOL", "^hscei");
    set_var("STOOQ_BASE_URL", "http://localhost:8080/q/d/l/");
    set_var("OBSERVABILITY_ENABLED", "false");
    set_var("OBSERVABILITY_INTERVAL", "15");

    let config = Config::from_env().unwrap();
    assert_eq!(config.refresh.interval, Duration::from_secs(90));
    assert!(!config.refresh.single_flight);
    assert_eq!(config.endpoints.hk_symbol, "^hscei");
    assert_eq!(config.endpoints.cn_symbol, "^shc");
    assert_eq!(config.endpoints.stooq_base_url, "http://localhost:8080/q/d/l/");
    assert!(!config.observability.enabled);
    assert_eq!(config.observability.interval_secs, 15);

    clear_vars();
}

#[test]
fn test_config_rejects_bad_interval() {
    let _guard = get_env_lock().lock().unwrap_or_else(|e| e.into_inner());
    clear_vars();

    set_var("REFRESH_INTERVAL_SECS", "five minutes");
    assert!(Config::from_env().is_err());

    set_var("REFRESH_INTERVAL_SECS", "0");
    assert!(Config::from_env().is_err());

    clear_vars();
}

#[test]
fn test_blank_endpoint_falls_back_to_default() {
    let _guard = get_env_lock().lock().unwrap_or_else(|e| e.into_inner());
    clear_vars();

    set_var("PROXY_BASE_URL", "   ");
    let config = Config::from_env().unwrap();
    assert_eq!(config.endpoints.proxy_base_url, "https://r.jina.ai/http://");

    clear_vars();
}
