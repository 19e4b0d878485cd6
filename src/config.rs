//! Scanner Configuration
//!
//! Runtime settings stored in TOML format. Heuristic scoring constants are
//! deliberately not configurable; they live as named constants next to the
//! code that uses them so behavior stays reproducible.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Scanner settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScanConfig {
    /// Catalog collaborator settings
    pub catalog: CatalogConfig,
    /// Lookup cache settings
    pub cache: CacheConfig,
    /// Match reporting settings
    pub matching: MatchingConfig,
}

/// Settings for the external card catalog
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// Base URL of the catalog API
    pub base_url: String,
    /// Minimum interval between outbound requests in milliseconds
    pub min_request_interval_ms: u64,
    /// Request timeout in seconds
    pub request_timeout_secs: u64,
    /// User-Agent header sent with catalog requests
    pub user_agent: String,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.scryfall.com".to_string(),
            min_request_interval_ms: 100,
            request_timeout_secs: 30,
            user_agent: format!("cardlens/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl CatalogConfig {
    /// Minimum inter-request interval as a `Duration`
    pub fn min_request_interval(&self) -> Duration {
        Duration::from_millis(self.min_request_interval_ms)
    }
}

/// Settings for the lookup cache
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Seconds a cached lookup stays valid
    pub ttl_secs: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            // 24 hours
            ttl_secs: 86_400,
        }
    }
}

impl CacheConfig {
    /// Cache time-to-live as a `Duration`
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_secs)
    }
}

/// Settings for match reporting
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchingConfig {
    /// Match quality below which an identification should be treated as
    /// advisory-only by callers
    pub low_quality_threshold: f64,
}

impl Default for MatchingConfig {
    fn default() -> Self {
        Self {
            low_quality_threshold: 0.5,
        }
    }
}

/// Load configuration from file
pub fn load_config(path: &Path) -> Result<ScanConfig> {
    let content = std::fs::read_to_string(path)?;
    let config: ScanConfig = toml::from_str(&content)?;
    Ok(config)
}

/// Save configuration to file
pub fn save_config(config: &ScanConfig, path: &Path) -> Result<()> {
    let content = toml::to_string_pretty(config)?;
    std::fs::write(path, content)?;
    Ok(())
}
