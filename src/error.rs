//! Error types for query validation, fetching, discovery and caching
//!
//! Callers need to tell "the query is wrong" apart from "the network degraded",
//! so each failure family gets its own enum and the top-level [`Error`] keeps
//! them tagged.

use std::path::PathBuf;
use thiserror::Error;

/// A query rejected before any cache or network access
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
    #[error("Unknown resource type: {0}")]
    UnknownResourceType(String),

    #[error("Filter '{filter}' is not valid for resource type '{resource}'")]
    UnknownFilter { resource: String, filter: String },

    #[error("Resource type '{resource}' requires the '{filter}' filter")]
    MissingMandatoryFilter { resource: String, filter: String },

    #[error("Resource type '{resource}': 'round' can only be used together with 'season'")]
    RoundWithoutSeason { resource: String },

    #[error("Filter '{filter}' is given more than once")]
    DuplicateFilter { filter: String },

    #[error("Filter '{filter}' has an invalid value '{value}'")]
    InvalidFilterValue { filter: String, value: String },
}

/// Transport or HTTP failure for a single page request
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    #[error("Invalid request URL: {0}")]
    Url(String),

    #[error("Request failed: {0}")]
    Transport(String),

    #[error("Request failed ({status}): {body}")]
    Status { status: u16, body: String },

    #[error("Response is not a valid envelope: {0}")]
    Decode(String),
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            FetchError::Decode(err.to_string())
        } else {
            FetchError::Transport(err.to_string())
        }
    }
}

/// Structural discovery could not reach a record array
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Record array for '{resource}' not found: {reason}")]
pub struct LocateError {
    pub resource: String,
    pub reason: String,
}

/// Cache read/write failure. Reads are downgraded to misses by the store.
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("Cache I/O error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Cache entry {path:?} is not valid JSON: {source}")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Could not encode cache entry {path:?}: {source}")]
    Encode {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Top-level error returned by [`crate::JolpicaClient`]
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    InvalidQuery(#[from] QueryError),

    #[error(transparent)]
    PathNotFound(#[from] LocateError),

    #[error(transparent)]
    Network(#[from] FetchError),

    #[error("Malformed envelope: {0}")]
    MalformedEnvelope(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
