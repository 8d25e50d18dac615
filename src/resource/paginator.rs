//! Full result-set retrieval
//!
//! 1. validate the query and build its endpoint
//! 2. return the merged result from cache if present
//! 3. probe the first page to learn `total` and discover the record path
//! 4. walk `0, size, 2*size, ...` below `total`, merging each page in order
//! 5. write the records back into the probe envelope and cache it
//!
//! Pages are fetched strictly one after another; the boundary merge relies on
//! seeing them in increasing offset order.

use super::endpoint::Endpoint;
use super::envelope::Envelope;
use super::merge::merge;
use super::path_extractor::{locate, PathSpec};
use super::query::ResourceQuery;
use crate::api::cache::CacheKey;
use crate::api::fetcher::PageFetcher;
use crate::api::http::Transport;
use crate::config::ClientConfig;
use crate::error::{Error, FetchError, LocateError};
use serde_json::Value;
use tracing::{debug, info, warn};

/// Whether every page of a result set made it in
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Completeness {
    Complete,
    /// Pagination stopped at `offset` because of `error`; records before it are kept
    Partial { offset: u64, error: FetchError },
}

/// Merged result of a query
#[derive(Debug, Clone, PartialEq)]
pub struct Collection {
    pub endpoint: Endpoint,
    /// Envelope with every fetched record written back at `path`
    pub envelope: Envelope,
    pub path: PathSpec,
    pub completeness: Completeness,
}

impl Collection {
    /// The merged record array, in API order
    pub fn records(&self) -> &[Value] {
        self.envelope
            .records(&self.path)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn total(&self) -> Option<u64> {
        self.envelope.total()
    }

    pub fn is_complete(&self) -> bool {
        self.completeness == Completeness::Complete
    }

    /// Human readable warning for partial results
    pub fn warning(&self) -> Option<String> {
        match &self.completeness {
            Completeness::Complete => None,
            Completeness::Partial { offset, error } => Some(format!(
                "Incomplete data for {}: pagination stopped at offset {} ({})",
                self.endpoint, offset, error
            )),
        }
    }
}

/// Drives a [`PageFetcher`] through a whole result set
#[derive(Debug)]
pub struct Paginator<T> {
    fetcher: PageFetcher<T>,
    probe_page_size: u32,
    page_size: u32,
}

impl<T: Transport> Paginator<T> {
    /// Page sizes come from `config`. A zero size is raised to 1 so the
    /// offset always advances.
    pub fn new(fetcher: PageFetcher<T>, config: &ClientConfig) -> Self {
        if config.default_page_size == 0 || config.max_page_size == 0 {
            warn!(
                "Page size of 0 configured (probe {}, pages {}), using 1",
                config.default_page_size, config.max_page_size
            );
        }
        Self {
            fetcher,
            probe_page_size: config.default_page_size.max(1),
            page_size: config.max_page_size.max(1),
        }
    }

    pub fn fetcher(&self) -> &PageFetcher<T> {
        &self.fetcher
    }

    /// Fetch every record of `query`.
    ///
    /// Invalid queries and undiscoverable record paths are errors. A network
    /// failure on the probe is an error; a failure while paginating stops the
    /// walk and returns what was merged so far as a partial collection,
    /// which is never cached.
    pub async fn get_all(&self, query: &ResourceQuery, use_cache: bool) -> Result<Collection, Error> {
        let descriptor = query.validate()?;
        let endpoint = Endpoint::build(descriptor.name, &query.filters);
        let all_key = CacheKey::all(endpoint.as_str());

        if use_cache {
            if let Some(collection) = self.load_cached(&endpoint, descriptor.name) {
                return Ok(collection);
            }
        }

        let mut envelope = self
            .fetcher
            .fetch(&endpoint, self.probe_page_size, 0, use_cache)
            .await?;
        let total = envelope.total().ok_or_else(|| {
            Error::MalformedEnvelope(format!("response for {} has no readable total", endpoint))
        })?;
        let path = locate(&envelope, descriptor.name)?;
        info!("{}: {} rows, records at {}", endpoint, total, path);

        let step = u64::from(self.page_size);
        let mut accumulated: Vec<Value> = Vec::new();
        let mut completeness = Completeness::Complete;
        let mut offset = 0;

        while offset < total {
            match self
                .fetcher
                .fetch(&endpoint, self.page_size, offset, false)
                .await
            {
                Ok(mut page) => {
                    let Some(records) = page.take_records(&path) else {
                        warn!(
                            "{}: no records at {} for offset {}, stopping",
                            endpoint, path, offset
                        );
                        completeness = Completeness::Partial {
                            offset,
                            error: FetchError::Decode(format!("no record array at {}", path)),
                        };
                        break;
                    };
                    debug!("{}: offset {} returned {} records", endpoint, offset, records.len());
                    accumulated = merge(accumulated, records);
                }
                Err(error) => {
                    warn!(
                        "{}: pagination stopped at offset {}: {}",
                        endpoint, offset, error
                    );
                    completeness = Completeness::Partial { offset, error };
                    break;
                }
            }
            offset += step;
        }

        if !envelope.set_records(&path, accumulated) {
            return Err(LocateError {
                resource: descriptor.name.to_string(),
                reason: format!("{} vanished from the probe response", path),
            }
            .into());
        }
        envelope.set_window(total, 0);

        if use_cache && completeness == Completeness::Complete {
            if let Err(e) = self.fetcher.cache().store(&all_key, envelope.as_value()) {
                warn!("Could not cache merged result for {}: {}", endpoint, e);
            }
        }

        Ok(Collection {
            endpoint,
            envelope,
            path,
            completeness,
        })
    }

    /// Previously merged result, re-located so callers get the same shape as
    /// a fresh fetch. Anything unusable counts as a miss.
    fn load_cached(&self, endpoint: &Endpoint, resource_type: &str) -> Option<Collection> {
        let value = self.fetcher.cache().load(&CacheKey::all(endpoint.as_str()))?;
        let Some(envelope) = Envelope::from_value(value) else {
            warn!("Cached result for {} is not an envelope, refetching", endpoint);
            return None;
        };
        match locate(&envelope, resource_type) {
            Ok(path) => Some(Collection {
                endpoint: endpoint.clone(),
                envelope,
                path,
                completeness: Completeness::Complete,
            }),
            Err(e) => {
                warn!("Cached result for {} is unusable ({}), refetching", endpoint, e);
                None
            }
        }
    }
}
