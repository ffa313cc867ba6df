//! Application configuration structures.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

/// Root application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Upstream API location and HTTP behavior
    #[serde(default)]
    pub api: ApiConfig,

    /// Batch loading behavior
    #[serde(default)]
    pub fetcher: FetcherConfig,

    /// Log output settings
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Load configuration or return default if loading fails.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        Self::load(&path).unwrap_or_else(|e| {
            log::warn!(
                "Config load failed from {:?}: {}. Using defaults.",
                path.as_ref(),
                e
            );
            Self::default()
        })
    }

    /// Validate configuration values for basic sanity.
    pub fn validate(&self) -> Result<()> {
        if self.api.user_agent.trim().is_empty() {
            return Err(AppError::validation("api.user_agent is empty"));
        }
        if self.api.timeout_secs == 0 {
            return Err(AppError::validation("api.timeout_secs must be > 0"));
        }
        if self.api.max_id == 0 {
            return Err(AppError::validation("api.max_id must be > 0"));
        }
        url::Url::parse(&self.api.base_url)
            .map_err(|e| AppError::validation(format!("api.base_url is invalid: {e}")))?;
        url::Url::parse(&self.api.bulk_url)
            .map_err(|e| AppError::validation(format!("api.bulk_url is invalid: {e}")))?;
        if self.fetcher.batch_size == 0 {
            return Err(AppError::validation("fetcher.batch_size must be > 0"));
        }
        if self.fetcher.max_concurrent == 0 {
            return Err(AppError::validation("fetcher.max_concurrent must be > 0"));
        }
        Ok(())
    }
}

/// Which upstream generation to talk to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApiShape {
    /// One request per identifier, paginated by the load-more driver
    #[default]
    PerId,
    /// A single request returning every record, no pagination
    Bulk,
}

/// Upstream API settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL of the per-identifier API (`{base}/digimon/{id}`)
    #[serde(default = "defaults::base_url")]
    pub base_url: String,

    /// Bulk endpoint URL
    #[serde(default = "defaults::bulk_url")]
    pub bulk_url: String,

    /// Upstream generation used by the initial load
    #[serde(default)]
    pub shape: ApiShape,

    /// Highest identifier the API serves
    #[serde(default = "defaults::max_id")]
    pub max_id: u32,

    /// Page size requested from the listing endpoint
    #[serde(default = "defaults::search_page_size")]
    pub search_page_size: u32,

    /// User-Agent header for HTTP requests
    #[serde(default = "defaults::user_agent")]
    pub user_agent: String,

    /// Request timeout in seconds
    #[serde(default = "defaults::timeout")]
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: defaults::base_url(),
            bulk_url: defaults::bulk_url(),
            shape: ApiShape::default(),
            max_id: defaults::max_id(),
            search_page_size: defaults::search_page_size(),
            user_agent: defaults::user_agent(),
            timeout_secs: defaults::timeout(),
        }
    }
}

/// Batch loading settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetcherConfig {
    /// Identifiers requested per load-more cycle
    #[serde(default = "defaults::batch_size")]
    pub batch_size: u32,

    /// In-flight requests within one batch (1 = sequential)
    #[serde(default = "defaults::max_concurrent")]
    pub max_concurrent: usize,

    /// Delay between requests in milliseconds
    #[serde(default)]
    pub request_delay_ms: u64,
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            batch_size: defaults::batch_size(),
            max_concurrent: defaults::max_concurrent(),
            request_delay_ms: 0,
        }
    }
}

/// Log output settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default filter when RUST_LOG is not set
    #[serde(default = "defaults::log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: defaults::log_level(),
        }
    }
}

mod defaults {
    // API defaults
    pub fn base_url() -> String {
        "https://digi-api.com/api/v1/".into()
    }
    pub fn bulk_url() -> String {
        "https://digimon-api.vercel.app/api/digimon".into()
    }
    pub fn max_id() -> u32 {
        1460
    }
    pub fn search_page_size() -> u32 {
        100
    }
    pub fn user_agent() -> String {
        "Mozilla/5.0 (compatible; catalog/0.1)".into()
    }
    pub fn timeout() -> u64 {
        30
    }

    // Fetcher defaults
    pub fn batch_size() -> u32 {
        20
    }
    pub fn max_concurrent() -> usize {
        1
    }

    // Logging defaults
    pub fn log_level() -> String {
        "info".into()
    }
}
