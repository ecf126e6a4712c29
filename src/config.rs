//! Runtime configuration
//!
//! Every field has a default, so an empty TOML file (or none) is valid.

use crate::data::fx::{default_cache_path, RateQuery, DEFAULT_CACHE_TTL, DEFAULT_WITHIN_DAYS, ECB_HISTORY_URL};
use crate::error::{FxError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Environment variable overriding `source_url`
pub const SOURCE_URL_ENV: &str = "ECB_FX_SOURCE_URL";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FxConfig {
    #[serde(default = "default_source_url")]
    pub source_url: String,
    /// Keep the downloaded table on disk between calls
    #[serde(default = "default_true")]
    pub cache: bool,
    #[serde(default = "default_cache_path")]
    pub cache_file: PathBuf,
    #[serde(default = "default_cache_ttl_secs")]
    pub cache_ttl_secs: u64,
    #[serde(default = "default_within_days")]
    pub within_days: u32,
    #[serde(default = "default_true")]
    pub continue_on_error: bool,
    /// HTTP request timeout
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_source_url() -> String {
    ECB_HISTORY_URL.to_string()
}

fn default_true() -> bool {
    true
}

fn default_cache_ttl_secs() -> u64 {
    DEFAULT_CACHE_TTL.as_secs()
}

fn default_within_days() -> u32 {
    DEFAULT_WITHIN_DAYS
}

fn default_timeout_secs() -> u64 {
    30
}

impl Default for FxConfig {
    fn default() -> Self {
        Self {
            source_url: default_source_url(),
            cache: true,
            cache_file: default_cache_path(),
            cache_ttl_secs: default_cache_ttl_secs(),
            within_days: default_within_days(),
            continue_on_error: true,
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl FxConfig {
    /// Parse a TOML document; missing keys take their defaults
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        toml::from_str(contents).map_err(|e| FxError::ConfigError(e.to_string()))
    }

    /// Load a TOML config file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)?;
        toml::from_str(&contents).map_err(|e| {
            FxError::ConfigError(format!("Failed to parse {}: {}", path.display(), e))
        })
    }

    /// Apply `ECB_FX_SOURCE_URL` if set
    pub fn with_env_overrides(self) -> Self {
        self.with_source_url_from(SOURCE_URL_ENV)
    }

    /// Take `source_url` from the environment variable `var`; blank values are ignored
    pub fn with_source_url_from(mut self, var: &str) -> Self {
        if let Ok(url) = std::env::var(var) {
            if !url.trim().is_empty() {
                log::debug!("{} overrides source url: {}", var, url);
                self.source_url = url.trim().to_string();
            }
        }
        self
    }

    /// Reject settings no provider can work with
    pub fn validate(&self) -> Result<()> {
        if self.source_url.trim().is_empty() {
            return Err(FxError::ConfigError("source_url must not be empty".to_string()));
        }
        if self.timeout_secs == 0 {
            return Err(FxError::ConfigError("timeout_secs must be positive".to_string()));
        }
        if self.cache && self.cache_file.as_os_str().is_empty() {
            return Err(FxError::ConfigError(
                "cache_file must be set when caching is enabled".to_string(),
            ));
        }
        Ok(())
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Query for `base` carrying this configuration's tolerance and error policy
    pub fn query(&self, base: &str) -> RateQuery {
        RateQuery::new(base)
            .within_days(self.within_days)
            .continue_on_error(self.continue_on_error)
    }
}
