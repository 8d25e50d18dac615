//! Single page fetching with read-through/write-through caching

use super::cache::{CacheKey, CacheStore};
use super::http::Transport;
use crate::error::FetchError;
use crate::resource::envelope::{Envelope, ROOT_KEY};
use crate::resource::Endpoint;
use tracing::{debug, warn};

/// Fetches one `(limit, offset)` window of an endpoint
#[derive(Debug)]
pub struct PageFetcher<T> {
    transport: T,
    cache: CacheStore,
}

impl<T: Transport> PageFetcher<T> {
    pub fn new(transport: T, cache: CacheStore) -> Self {
        Self { transport, cache }
    }

    pub fn cache(&self) -> &CacheStore {
        &self.cache
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Fetch one page.
    ///
    /// With `use_cache`, a cached copy of the same window is returned without
    /// touching the network, and a freshly fetched page is written to the
    /// cache before it is returned. Failures are never retried here.
    pub async fn fetch(
        &self,
        endpoint: &Endpoint,
        limit: u32,
        offset: u64,
        use_cache: bool,
    ) -> Result<Envelope, FetchError> {
        let key = CacheKey::page(endpoint.as_str(), limit, offset);

        if use_cache {
            if let Some(value) = self.cache.load(&key) {
                match Envelope::from_value(value) {
                    Some(envelope) => return Ok(envelope),
                    None => warn!("Cached page {} is not an envelope, refetching", key.file_name()),
                }
            }
        }

        let value = self.transport.get_page(endpoint, limit, offset).await?;
        let envelope = Envelope::from_value(value)
            .ok_or_else(|| FetchError::Decode(format!("missing '{}' object", ROOT_KEY)))?;
        debug!(
            "Fetched {} limit={} offset={} (total: {:?})",
            endpoint,
            limit,
            offset,
            envelope.total()
        );

        if use_cache {
            if let Err(e) = self.cache.store(&key, envelope.as_value()) {
                warn!("Could not cache page {}: {}", key.file_name(), e);
            }
        }

        Ok(envelope)
    }
}
