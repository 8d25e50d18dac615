//! Client configuration
//!
//! Everything that used to be a module-level constant (API base URL, page
//! sizes, cache directory) lives here and is threaded into the components.

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

/// Public Jolpica-F1 mirror of the Ergast API
pub const DEFAULT_BASE_URL: &str = "https://api.jolpi.ca/ergast/f1/";
/// Page size the API uses when no limit is given
pub const DEFAULT_PAGE_SIZE: u32 = 30;
/// Largest `limit` the API accepts
pub const MAX_PAGE_SIZE: u32 = 100;
/// Per-request timeout
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

const CACHE_DIR_NAME: &str = "jolpica-client";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Base URL every endpoint is resolved against
    pub base_url: String,
    /// Directory holding one JSON file per cache entry
    pub cache_dir: PathBuf,
    /// Limit used for the probe request that learns the total
    pub default_page_size: u32,
    /// Limit used while paginating
    pub max_page_size: u32,
    pub request_timeout_secs: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            cache_dir: default_cache_dir(),
            default_page_size: DEFAULT_PAGE_SIZE,
            max_page_size: MAX_PAGE_SIZE,
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
        }
    }
}

/// `<platform cache dir>/jolpica-client`, falling back to the temp dir
pub fn default_cache_dir() -> PathBuf {
    dirs::cache_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join(CACHE_DIR_NAME)
}

impl ClientConfig {
    /// Load a JSON config file. Missing fields take their defaults.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Could not read config file {:?}", path))?;
        let config: ClientConfig = serde_json::from_str(&content)
            .with_context(|| format!("Invalid config file {:?}", path))?;
        config.validate()?;
        debug!("Loaded client config from {:?}", path);
        Ok(config)
    }

    pub fn with_cache_dir(mut self, cache_dir: impl Into<PathBuf>) -> Self {
        self.cache_dir = cache_dir.into();
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Base URL parsed and normalized to end with '/', so relative endpoints
    /// join underneath it instead of replacing its last segment.
    pub fn base_url(&self) -> Result<url::Url> {
        let mut raw = self.base_url.trim().to_string();
        if !raw.ends_with('/') {
            raw.push('/');
        }
        url::Url::parse(&raw).with_context(|| format!("Invalid base URL '{}'", self.base_url))
    }

    pub fn validate(&self) -> Result<()> {
        self.base_url()?;
        if self.default_page_size == 0 || self.max_page_size == 0 {
            return Err(anyhow!("Page sizes must be greater than zero"));
        }
        if self.default_page_size > self.max_page_size {
            return Err(anyhow!(
                "default_page_size ({}) exceeds max_page_size ({})",
                self.default_page_size,
                self.max_page_size
            ));
        }
        Ok(())
    }
}
