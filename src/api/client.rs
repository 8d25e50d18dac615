//! Jolpica client - entry point for F1 data
//!
//! Wires config, HTTP transport, page cache and paginator together.

use anyhow::Result;
use tracing::debug;

use super::cache::CacheStore;
use super::fetcher::PageFetcher;
use super::http::{HttpTransport, Transport};
use crate::config::ClientConfig;
use crate::error::{Error, FetchError, QueryError};
use crate::resource::{
    validate, Collection, Endpoint, Envelope, Paginator, ResourceQuery, RESOURCES,
};

/// Client for the Ergast-compatible Jolpica-F1 API
#[derive(Debug)]
pub struct JolpicaClient<T = HttpTransport> {
    config: ClientConfig,
    paginator: Paginator<T>,
}

impl JolpicaClient<HttpTransport> {
    /// Create a client talking to `config.base_url`
    pub fn new(config: ClientConfig) -> Result<Self> {
        config.validate()?;
        let transport = HttpTransport::new(&config)?;
        Ok(Self::with_transport(config, transport))
    }
}

impl<T: Transport> JolpicaClient<T> {
    /// Create a client on top of any transport. The config is taken as is.
    pub fn with_transport(config: ClientConfig, transport: T) -> Self {
        debug!(
            "Jolpica client: cache at {}, page sizes {}/{}",
            config.cache_dir.display(),
            config.default_page_size,
            config.max_page_size
        );
        let fetcher = PageFetcher::new(transport, CacheStore::new(&config.cache_dir));
        let paginator = Paginator::new(fetcher, &config);
        Self { config, paginator }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn cache(&self) -> &CacheStore {
        self.paginator.fetcher().cache()
    }

    /// Fetch every record matching `query`
    pub async fn get_all(&self, query: &ResourceQuery, use_cache: bool) -> Result<Collection, Error> {
        self.paginator.get_all(query, use_cache).await
    }

    /// Shorthand for [`get_all`](Self::get_all) with caching on
    pub async fn get_resource(
        &self,
        resource_type: &str,
        filters: &[(&str, &str)],
    ) -> Result<Collection, Error> {
        let query = filters
            .iter()
            .fold(ResourceQuery::new(resource_type), |query, (key, value)| {
                query.filter(*key, *value)
            });
        self.get_all(&query, true).await
    }

    /// Fetch one raw page of `query` without paginating
    pub async fn fetch_page(
        &self,
        query: &ResourceQuery,
        limit: u32,
        offset: u64,
        use_cache: bool,
    ) -> Result<Envelope, Error> {
        let descriptor = validate(&query.resource_type, &query.filters)?;
        let endpoint = Endpoint::build(descriptor.name, &query.filters);
        let envelope = self
            .paginator
            .fetcher()
            .fetch(&endpoint, limit, offset, use_cache)
            .await?;
        Ok(envelope)
    }
}

/// Format client errors into user-friendly messages
pub fn format_error(err: &Error) -> String {
    match err {
        Error::InvalidQuery(QueryError::UnknownResourceType(name)) => format!(
            "Unknown resource type '{}' - expected one of: {}",
            name,
            RESOURCES
                .iter()
                .map(|r| r.name)
                .collect::<Vec<_>>()
                .join(", ")
        ),
        Error::InvalidQuery(QueryError::MissingMandatoryFilter { resource, filter }) => {
            format!("'{}' requires a '{}' filter", resource, filter)
        }
        Error::InvalidQuery(e) => format!("Invalid query - {}", e),
        Error::Network(FetchError::Status { status: 404, .. }) => {
            "Not found - check the filter values".to_string()
        }
        Error::Network(FetchError::Status { status: 429, .. }) => {
            "Rate limited by the API - wait a moment and retry".to_string()
        }
        Error::Network(FetchError::Status { status, .. }) if *status >= 500 => {
            format!("API unavailable (HTTP {}) - try again later", status)
        }
        Error::Network(FetchError::Transport(_)) => {
            "Connection failed - check internet connection".to_string()
        }
        Error::Network(e) => format!("Request failed - {}", e),
        Error::PathNotFound(e) => format!("No records found - {}", e),
        Error::MalformedEnvelope(detail) => format!("Unexpected API response - {}", detail),
    }
}
