//! Request path construction
//!
//! The API addresses resources positionally: `{season}/{round}/{key}/{value}/.../{resource}/{position}`.
//! Reordering segments changes which resource is requested, so the order
//! below is part of the API contract.

use serde::{Deserialize, Serialize};
use std::fmt;

const SEASON: &str = "season";
const ROUND: &str = "round";
const POSITION: &str = "position";

/// Request path relative to the API base URL (e.g. "2021/drivers/max_verstappen/results")
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(transparent)]
pub struct Endpoint(String);

impl Endpoint {
    /// Build the endpoint for a resource type and its filters.
    ///
    /// - `season`, then `round` (only inside a season) come first
    /// - other filters follow as `key/value` pairs in insertion order
    /// - the resource name is appended unless a filter already emitted it
    /// - `position` goes last
    ///
    /// Filters with empty or dot-only values are skipped. Values are
    /// percent-encoded.
    pub fn build(resource_name: &str, filters: &[(String, String)]) -> Self {
        let value_of = |name: &str| {
            filters
                .iter()
                .find(|(k, _)| k == name)
                .map(|(_, v)| v.trim())
                .filter(|v| usable(v))
        };

        let mut segments: Vec<String> = Vec::new();

        if let Some(season) = value_of(SEASON) {
            segments.push(encode(season));
            if let Some(round) = value_of(ROUND) {
                segments.push(encode(round));
            }
        }

        for (key, value) in filters {
            let value = value.trim();
            if !usable(value) || matches!(key.as_str(), SEASON | ROUND | POSITION) {
                continue;
            }
            segments.push(encode(key));
            segments.push(encode(value));
        }

        if !segments.iter().any(|s| s == resource_name) {
            segments.push(resource_name.to_string());
        }

        if let Some(position) = value_of(POSITION) {
            segments.push(encode(position));
        }

        Endpoint(segments.join("/"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Endpoint {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

fn encode(segment: &str) -> String {
    urlencoding::encode(segment).into_owned()
}

/// Empty values and dot-only values (`.`, `..`) never become segments. URL
/// resolution treats dot segments, escaped or not, as relative steps.
fn usable(value: &str) -> bool {
    !value.is_empty() && !value.chars().all(|c| c == '.')
}
