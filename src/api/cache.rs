//! On-disk cache of fetched pages and merged result sets
//!
//! One JSON file per entry, named after the endpoint plus either the page
//! window (`{endpoint}_{limit}_{offset}.json`) or `all` for a merged result
//! (`{endpoint}_all.json`). There is no expiry: entries live until removed
//! from disk. Writes go through a temp file in the cache directory and are
//! renamed into place, so readers never see a half-written entry.

use crate::error::CacheError;
use serde_json::Value;
use std::fs;
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use tracing::{debug, trace, warn};

/// Identifies one cache entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CacheKey<'a> {
    /// A single raw page
    Page {
        endpoint: &'a str,
        limit: u32,
        offset: u64,
    },
    /// The fully merged result of an endpoint
    All { endpoint: &'a str },
}

impl<'a> CacheKey<'a> {
    pub fn page(endpoint: &'a str, limit: u32, offset: u64) -> Self {
        CacheKey::Page {
            endpoint,
            limit,
            offset,
        }
    }

    pub fn all(endpoint: &'a str) -> Self {
        CacheKey::All { endpoint }
    }

    /// Flat, filesystem-safe file name for this entry
    pub fn file_name(&self) -> String {
        match self {
            CacheKey::Page {
                endpoint,
                limit,
                offset,
            } => format!("{}_{}_{}.json", sanitize(endpoint), limit, offset),
            CacheKey::All { endpoint } => format!("{}_all.json", sanitize(endpoint)),
        }
    }
}

/// Replace path separators (and anything else unsafe in a file name) with '_'
fn sanitize(endpoint: &str) -> String {
    endpoint
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.') {
                c
            } else {
                '_'
            }
        })
        .collect()
}

/// Cache rooted at a directory, created lazily on first write
#[derive(Debug, Clone)]
pub struct CacheStore {
    dir: PathBuf,
}

impl CacheStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, key: &CacheKey<'_>) -> PathBuf {
        self.dir.join(key.file_name())
    }

    pub fn contains(&self, key: &CacheKey<'_>) -> bool {
        self.path_for(key).is_file()
    }

    /// Read an entry. `Ok(None)` when it does not exist.
    pub fn read(&self, key: &CacheKey<'_>) -> Result<Option<Value>, CacheError> {
        let path = self.path_for(key);
        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(source) => return Err(CacheError::Io { path, source }),
        };
        let value =
            serde_json::from_str(&content).map_err(|source| CacheError::Corrupt { path, source })?;
        Ok(Some(value))
    }

    /// Read an entry, treating unreadable or corrupt files as a miss
    pub fn load(&self, key: &CacheKey<'_>) -> Option<Value> {
        match self.read(key) {
            Ok(Some(value)) => {
                debug!("Cache hit: {}", key.file_name());
                Some(value)
            }
            Ok(None) => {
                trace!("Cache miss: {}", key.file_name());
                None
            }
            Err(e) => {
                warn!("Ignoring unreadable cache entry: {}", e);
                None
            }
        }
    }

    /// Write an entry atomically (temp file + rename). Last writer wins.
    pub fn store(&self, key: &CacheKey<'_>, value: &Value) -> Result<(), CacheError> {
        let path = self.path_for(key);
        let io_err = |source: std::io::Error| CacheError::Io {
            path: path.clone(),
            source,
        };

        fs::create_dir_all(&self.dir).map_err(io_err)?;

        let temp_file = tempfile::NamedTempFile::new_in(&self.dir).map_err(io_err)?;
        let mut writer = BufWriter::new(temp_file);
        serde_json::to_writer(&mut writer, value).map_err(|source| CacheError::Encode {
            path: path.clone(),
            source,
        })?;
        let temp_file = writer.into_inner().map_err(|e| io_err(e.into_error()))?;
        temp_file.as_file().sync_all().map_err(io_err)?;
        temp_file.persist(&path).map_err(|e| io_err(e.error))?;

        debug!("Cached {}", key.file_name());
        Ok(())
    }

    /// Delete an entry if present
    pub fn remove(&self, key: &CacheKey<'_>) -> Result<bool, CacheError> {
        let path = self.path_for(key);
        match fs::remove_file(&path) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(source) => Err(CacheError::Io { path, source }),
        }
    }
}
