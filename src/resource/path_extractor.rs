//! Record-array discovery and path-based extraction
//!
//! Responses nest the record array under a resource-dependent chain of
//! containers, e.g.
//! - circuits: `MRData/CircuitTable/Circuits`
//! - results:  `MRData/RaceTable/Races` (each race carries its `Results`)
//! - laps:     `MRData/RaceTable/Races[0]/Laps`
//! - standings: `MRData/StandingsTable/StandingsLists[0]/DriverStandings`
//!
//! The chain is not declared anywhere, so it is discovered from a real
//! response by always following the last key of each object until a key
//! matching the resource type shows up.

use crate::error::LocateError;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

use super::envelope::Envelope;

/// Key path from the envelope's metadata object to the record array.
///
/// The first segment is the dynamic key. At every step an array is replaced
/// by its first element before the next key is looked up.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(transparent)]
pub struct PathSpec(Vec<String>);

impl PathSpec {
    pub fn new(segments: Vec<String>) -> Self {
        Self(segments)
    }

    pub fn segments(&self) -> &[String] {
        &self.0
    }

    /// Container key directly under the metadata object (e.g. "RaceTable")
    pub fn dynamic_key(&self) -> Option<&str> {
        self.0.first().map(String::as_str)
    }

    /// Key holding the record array (e.g. "Races")
    pub fn record_key(&self) -> Option<&str> {
        self.0.last().map(String::as_str)
    }
}

impl fmt::Display for PathSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for segment in &self.0 {
            write!(f, "/{}", segment)?;
        }
        Ok(())
    }
}

/// Name of the container that holds records for a resource type.
///
/// Race-scoped sub-lists are nested per race rather than given their own
/// top-level container, so they resolve to "Races".
pub fn record_container(resource_type: &str) -> &str {
    let normalized = resource_type.to_ascii_lowercase();
    match normalized.as_str() {
        "results" | "qualifying" | "sprint" => "Races",
        _ => resource_type,
    }
}

/// Discover the path to the record array of `resource_type` in `envelope`.
pub fn locate(envelope: &Envelope, resource_type: &str) -> Result<PathSpec, LocateError> {
    let target = record_container(resource_type);
    let not_found = |reason: String| LocateError {
        resource: resource_type.to_string(),
        reason,
    };

    let dynamic_key = envelope
        .dynamic_key()
        .ok_or_else(|| not_found("envelope has no data container".to_string()))?;
    let mut node = envelope
        .meta()
        .get(dynamic_key)
        .ok_or_else(|| not_found(format!("missing container '{}'", dynamic_key)))?;
    let mut path = vec![dynamic_key.to_string()];

    loop {
        let object = match node {
            Value::Object(map) => map,
            Value::Array(items) => match items.first() {
                Some(Value::Object(map)) => map,
                Some(_) => {
                    return Err(not_found(format!(
                        "array at {} holds scalars",
                        PathSpec(path)
                    )))
                }
                None => {
                    return Err(not_found(format!(
                        "array at {} is empty",
                        PathSpec(path)
                    )))
                }
            },
            _ => {
                return Err(not_found(format!(
                    "dead end at {} looking for '{}'",
                    PathSpec(path),
                    target
                )))
            }
        };

        let Some((last_key, value)) = object.iter().next_back() else {
            return Err(not_found(format!("empty object at {}", PathSpec(path))));
        };

        path.push(last_key.clone());
        if last_key.eq_ignore_ascii_case(target) {
            return Ok(PathSpec(path));
        }
        node = value;
    }
}

/// Replace an array by its first element; other nodes pass through
fn descend(node: &Value) -> Option<&Value> {
    match node {
        Value::Array(items) => items.first(),
        other => Some(other),
    }
}

fn descend_mut(node: &mut Value) -> Option<&mut Value> {
    match node {
        Value::Array(items) => items.first_mut(),
        other => Some(other),
    }
}

/// Follow `path` from `root` and return the record array it ends in.
pub fn extract_records<'a>(root: &'a Value, path: &PathSpec) -> Option<&'a Vec<Value>> {
    let mut node = root;
    for key in path.segments() {
        node = descend(node)?.as_object()?.get(key)?;
    }
    node.as_array()
}

/// Mutable counterpart of [`extract_records`]
pub fn extract_records_mut<'a>(root: &'a mut Value, path: &PathSpec) -> Option<&'a mut Vec<Value>> {
    let mut node = root;
    for key in path.segments() {
        node = descend_mut(node)?.as_object_mut()?.get_mut(key)?;
    }
    node.as_array_mut()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn envelope(value: Value) -> Envelope {
        Envelope::from_value(value).expect("valid envelope")
    }

    #[test]
    fn test_locate_circuits() {
        let env = envelope(json!({
            "MRData": {
                "total": "2",
                "CircuitTable": {
                    "Circuits": [
                        {"circuitId": "albert_park"},
                        {"circuitId": "monza"}
                    ]
                }
            }
        }));

        let path = locate(&env, "circuits").unwrap();
        assert_eq!(path.segments(), ["CircuitTable", "Circuits"]);
        assert_eq!(path.to_string(), "/CircuitTable/Circuits");
    }

    #[test]
    fn test_locate_results_resolves_to_races() {
        let env = envelope(json!({
            "MRData": {
                "xmlns": "",
                "series": "f1",
                "url": "http://api.jolpi.ca/ergast/f1/2021/results/",
                "limit": "30",
                "offset": "0",
                "total": "440",
                "RaceTable": {
                    "season": "2021",
                    "Races": [
                        {"round": "1", "raceName": "Bahrain Grand Prix", "Results": [{"position": "1"}]}
                    ]
                }
            }
        }));

        let path = locate(&env, "results").unwrap();
        assert_eq!(path.segments(), ["RaceTable", "Races"]);
        assert_eq!(path.dynamic_key(), Some("RaceTable"));
        assert_eq!(path.record_key(), Some("Races"));
    }

    #[test]
    fn test_locate_descends_through_first_array_element() {
        let env = envelope(json!({
            "MRData": {
                "total": "1",
                "RaceTable": {
                    "season": "2023",
                    "round": "6",
                    "Races": [
                        {
                            "round": "6",
                            "Laps": [{"number": "1", "Timings": []}]
                        }
                    ]
                }
            }
        }));

        let path = locate(&env, "laps").unwrap();
        assert_eq!(path.segments(), ["RaceTable", "Races", "Laps"]);
    }

    #[test]
    fn test_locate_standings_case_insensitive() {
        let env = envelope(json!({
            "MRData": {
                "total": "22",
                "StandingsTable": {
                    "season": "2023",
                    "StandingsLists": [
                        {"season": "2023", "round": "22", "DriverStandings": [{"position": "1"}]}
                    ]
                }
            }
        }));

        let path = locate(&env, "driverStandings").unwrap();
        assert_eq!(
            path.segments(),
            ["StandingsTable", "StandingsLists", "DriverStandings"]
        );
    }

    #[test]
    fn test_locate_dead_end() {
        let env = envelope(json!({
            "MRData": {
                "total": "1",
                "CircuitTable": {"Circuits": [{"circuitId": "monza", "circuitName": "Monza"}]}
            }
        }));

        let err = locate(&env, "drivers").unwrap_err();
        assert_eq!(err.resource, "drivers");
        assert!(err.reason.contains("dead end"), "{}", err.reason);
    }

    #[test]
    fn test_locate_empty_array_fails() {
        let env = envelope(json!({
            "MRData": {"total": "0", "RaceTable": {"season": "1900", "Races": []}}
        }));

        // "Races" itself matches before the empty array is entered
        assert!(locate(&env, "races").is_ok());
        let err = locate(&env, "laps").unwrap_err();
        assert!(err.reason.contains("empty"), "{}", err.reason);
    }

    #[test]
    fn test_locate_without_container() {
        let env = envelope(json!({"MRData": {"limit": "30", "offset": "0", "total": "0"}}));
        assert!(locate(&env, "circuits").is_err());
    }

    #[test]
    fn test_locate_is_deterministic() {
        let env = envelope(json!({
            "MRData": {"total": "1", "SeasonTable": {"Seasons": [{"season": "1950"}]}}
        }));
        assert_eq!(locate(&env, "seasons"), locate(&env, "seasons"));
    }

    #[test]
    fn test_record_container_alias() {
        assert_eq!(record_container("results"), "Races");
        assert_eq!(record_container("Qualifying"), "Races");
        assert_eq!(record_container("sprint"), "Races");
        assert_eq!(record_container("circuits"), "circuits");
    }

    #[test]
    fn test_extract_records_nested() {
        let value = json!({
            "RaceTable": {
                "Races": [
                    {"Laps": [{"number": "1"}, {"number": "2"}]},
                    {"Laps": [{"number": "99"}]}
                ]
            }
        });
        let path = PathSpec::new(vec![
            "RaceTable".to_string(),
            "Races".to_string(),
            "Laps".to_string(),
        ]);

        let laps = extract_records(&value, &path).unwrap();
        assert_eq!(laps.len(), 2);
        assert_eq!(laps[1]["number"], "2");
    }

    #[test]
    fn test_extract_records_mut_replaces_in_place() {
        let mut value = json!({"CircuitTable": {"Circuits": [{"circuitId": "spa"}]}});
        let path = PathSpec::new(vec!["CircuitTable".to_string(), "Circuits".to_string()]);

        extract_records_mut(&mut value, &path)
            .unwrap()
            .push(json!({"circuitId": "suzuka"}));
        assert_eq!(value["CircuitTable"]["Circuits"][1]["circuitId"], "suzuka");
    }

    #[test]
    fn test_extract_records_missing() {
        let value = json!({"CircuitTable": {"season": "2024"}});
        let path = PathSpec::new(vec!["CircuitTable".to_string(), "Circuits".to_string()]);
        assert!(extract_records(&value, &path).is_none());
    }
}
