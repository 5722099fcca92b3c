//! Configuration loaded from the environment

use crate::error::{CliError, Result};
use file_lru_cache::CacheConfig;
use std::path::PathBuf;

/// Build the cache configuration from `CACHE_DIR`, `CACHE_CAPACITY` and
/// `CACHE_LOGGING`, falling back to defaults for unset variables
pub fn load_config() -> Result<CacheConfig> {
    config_from(|name| std::env::var(name).ok())
}

fn config_from(var: impl Fn(&str) -> Option<String>) -> Result<CacheConfig> {
    let defaults = CacheConfig::default();

    let cache_dir = var("CACHE_DIR")
        .map(PathBuf::from)
        .unwrap_or(defaults.cache_dir);

    let capacity = match var("CACHE_CAPACITY") {
        Some(s) => s
            .parse::<usize>()
            .map_err(|e| CliError::Config(format!("invalid CACHE_CAPACITY {:?}: {}", s, e)))?,
        None => defaults.capacity,
    };

    let logging = var("CACHE_LOGGING")
        .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
        .unwrap_or(defaults.logging);

    Ok(CacheConfig {
        cache_dir,
        capacity,
        logging,
    })
}
