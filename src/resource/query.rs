//! Resource queries and filter validation

use super::registry::{get_resource, ResourceDescriptor};
use crate::error::QueryError;
use serde::{Deserialize, Serialize};

/// A resource type plus its filters, in the order they were added
///
/// Filter order matters: it decides the order of path segments in the
/// endpoint, and therefore the cache key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct ResourceQuery {
    pub resource_type: String,
    #[serde(default)]
    pub filters: Vec<(String, String)>,
}

impl ResourceQuery {
    pub fn new(resource_type: impl Into<String>) -> Self {
        Self {
            resource_type: resource_type.into(),
            filters: Vec::new(),
        }
    }

    /// Add a filter. Setting an existing key replaces its value in place.
    pub fn filter(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        let key = key.into();
        let value = value.into();
        if let Some(slot) = self.filters.iter_mut().find(|(k, _)| *k == key) {
            slot.1 = value;
        } else {
            self.filters.push((key, value));
        }
        self
    }

    /// Value of a filter, treating an empty value as absent
    pub fn get(&self, key: &str) -> Option<&str> {
        self.filters
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.trim())
            .filter(|v| !v.is_empty())
    }

    /// Filters with a non-empty value, in insertion order
    pub fn active_filters(&self) -> impl Iterator<Item = (&str, &str)> {
        self.filters
            .iter()
            .map(|(k, v)| (k.as_str(), v.trim()))
            .filter(|(_, v)| !v.is_empty())
    }

    /// Check the query against the resource table. No I/O happens here.
    pub fn validate(&self) -> Result<&'static ResourceDescriptor, QueryError> {
        validate(&self.resource_type, &self.filters)
    }
}

/// Validate a resource type and its filters.
///
/// Fails on an unknown resource type, a filter the type does not accept or
/// that is given twice, a dot-only value (`.` or `..`), a missing mandatory
/// filter, or a `round` given without a `season`.
pub fn validate(
    resource_type: &str,
    filters: &[(String, String)],
) -> Result<&'static ResourceDescriptor, QueryError> {
    let descriptor = get_resource(resource_type)
        .ok_or_else(|| QueryError::UnknownResourceType(resource_type.to_string()))?;

    for (index, (key, value)) in filters.iter().enumerate() {
        if !descriptor.accepts(key) {
            return Err(QueryError::UnknownFilter {
                resource: descriptor.name.to_string(),
                filter: key.clone(),
            });
        }
        if filters[..index].iter().any(|(k, _)| k == key) {
            return Err(QueryError::DuplicateFilter {
                filter: key.clone(),
            });
        }
        let value = value.trim();
        if !value.is_empty() && value.chars().all(|c| c == '.') {
            return Err(QueryError::InvalidFilterValue {
                filter: key.clone(),
                value: value.to_string(),
            });
        }
    }

    let is_set = |name: &str| {
        filters
            .iter()
            .any(|(k, v)| k == name && !v.trim().is_empty())
    };

    for filter in descriptor.mandatory_filters {
        if !is_set(filter) {
            return Err(QueryError::MissingMandatoryFilter {
                resource: descriptor.name.to_string(),
                filter: filter.to_string(),
            });
        }
    }

    if is_set("round") && !is_set("season") {
        return Err(QueryError::RoundWithoutSeason {
            resource: descriptor.name.to_string(),
        });
    }

    Ok(descriptor)
}
