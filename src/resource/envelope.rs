//! Response envelope
//!
//! Every response looks like
//! `{"MRData": {"xmlns", "series", "url", "limit", "offset", "total", <container>: {...}}}`
//! where `<container>` (the dynamic key) changes with the resource type.

use serde::Serialize;
use serde_json::{Map, Value};

use super::path_extractor::{extract_records, extract_records_mut, PathSpec};

/// Key wrapping the whole response
pub const ROOT_KEY: &str = "MRData";

/// Metadata fields that sit next to the dynamic container
pub const METADATA_KEYS: &[&str] = &["xmlns", "series", "url", "limit", "offset", "total"];

/// A raw or merged response document
///
/// Only constructed through [`Envelope::from_value`], so the `MRData` object
/// is always present.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Envelope(Value);

impl Envelope {
    /// Wrap a JSON document, or `None` if it has no `MRData` object
    pub fn from_value(value: Value) -> Option<Self> {
        if value.get(ROOT_KEY).is_some_and(Value::is_object) {
            Some(Self(value))
        } else {
            None
        }
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }

    pub fn into_value(self) -> Value {
        self.0
    }

    /// The `MRData` object
    pub fn meta(&self) -> &Map<String, Value> {
        match self.0.get(ROOT_KEY) {
            Some(Value::Object(map)) => map,
            // from_value guarantees the root object
            _ => unreachable!("envelope without {} object", ROOT_KEY),
        }
    }

    fn meta_value(&self) -> &Value {
        &self.0[ROOT_KEY]
    }

    fn meta_value_mut(&mut self) -> &mut Value {
        &mut self.0[ROOT_KEY]
    }

    /// Query-wide row count. The API reports it as a string.
    pub fn total(&self) -> Option<u64> {
        self.meta().get("total").and_then(as_count)
    }

    pub fn limit(&self) -> Option<u64> {
        self.meta().get("limit").and_then(as_count)
    }

    pub fn offset(&self) -> Option<u64> {
        self.meta().get("offset").and_then(as_count)
    }

    /// First key of `MRData` that is not pagination metadata
    pub fn dynamic_key(&self) -> Option<&str> {
        self.meta()
            .keys()
            .map(String::as_str)
            .find(|k| !METADATA_KEYS.contains(k))
    }

    /// Record array at `path`
    pub fn records(&self, path: &PathSpec) -> Option<&Vec<Value>> {
        extract_records(self.meta_value(), path)
    }

    /// Move the record array at `path` out, leaving an empty array behind
    pub fn take_records(&mut self, path: &PathSpec) -> Option<Vec<Value>> {
        extract_records_mut(self.meta_value_mut(), path).map(std::mem::take)
    }

    /// Overwrite the record array at `path`. Returns false if the path does
    /// not lead to an array in this envelope.
    pub fn set_records(&mut self, path: &PathSpec, records: Vec<Value>) -> bool {
        match extract_records_mut(self.meta_value_mut(), path) {
            Some(slot) => {
                *slot = records;
                true
            }
            None => false,
        }
    }

    /// Rewrite `limit`/`offset`, keeping the API's string encoding
    pub fn set_window(&mut self, limit: u64, offset: u64) {
        if let Value::Object(meta) = self.meta_value_mut() {
            meta.insert("limit".to_string(), Value::String(limit.to_string()));
            meta.insert("offset".to_string(), Value::String(offset.to_string()));
        }
    }
}

fn as_count(value: &Value) -> Option<u64> {
    match value {
        Value::String(s) => s.trim().parse().ok(),
        Value::Number(n) => n.as_u64(),
        _ => None,
    }
}
