//! Page boundary merging
//!
//! The API paginates over nested rows (e.g. individual results), not over the
//! parent records that hold them (races). A race with twenty results can end
//! one page and continue on the next, so the same race shows up twice: once
//! at the end of the accumulated records and once at the start of the new
//! page, each with part of its sub-lists. Concatenating would duplicate the
//! race and split its results.

use serde_json::{Map, Value};

/// Append `incoming` to `accumulated`, folding a parent record that was split
/// across the page boundary back into one.
///
/// The last accumulated record and the first incoming record are treated as
/// the same parent when both are objects, they share at least one key, and
/// at least one shared key has equal values. In that case every shared key
/// holding arrays on both sides gets the union of both arrays (existing
/// items first), and the incoming duplicate is dropped. In every other case
/// the pages are simply concatenated.
///
/// This identifies the parent heuristically: two different races of the same
/// season share `season` and are folded together. Only the first incoming
/// record is ever considered, so at most one parent per boundary is merged.
pub fn merge(mut accumulated: Vec<Value>, incoming: Vec<Value>) -> Vec<Value> {
    if accumulated.is_empty() {
        return incoming;
    }
    let mut incoming = incoming.into_iter();
    let Some(first) = incoming.next() else {
        return accumulated;
    };

    let folded = match (accumulated.last_mut(), &first) {
        (Some(Value::Object(last)), Value::Object(head)) => {
            if is_same_parent(last, head) {
                union_sub_lists(last, head);
                true
            } else {
                false
            }
        }
        _ => false,
    };

    if !folded {
        accumulated.push(first);
    }
    accumulated.extend(incoming);
    accumulated
}

fn is_same_parent(last: &Map<String, Value>, first: &Map<String, Value>) -> bool {
    last.iter()
        .any(|(key, value)| first.get(key).is_some_and(|other| other == value))
}

fn union_sub_lists(last: &mut Map<String, Value>, first: &Map<String, Value>) {
    for (key, value) in last.iter_mut() {
        let (Value::Array(existing), Some(Value::Array(additional))) = (value, first.get(key))
        else {
            continue;
        };
        for item in additional {
            if !existing.contains(item) {
                existing.push(item.clone());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn records(value: Value) -> Vec<Value> {
        match value {
            Value::Array(items) => items,
            other => panic!("expected array, got {}", other),
        }
    }

    #[test]
    fn test_merge_with_empty_sides() {
        let x = records(json!([{"id": 1}, {"id": 2}]));
        assert_eq!(merge(vec![], x.clone()), x);
        assert_eq!(merge(x.clone(), vec![]), x);
        assert_eq!(merge(vec![], vec![]), Vec::<Value>::new());
    }

    #[test]
    fn test_merge_distinct_records_concatenates() {
        let merged = merge(records(json!([{"id": 1}])), records(json!([{"id": 2}])));
        assert_eq!(merged, records(json!([{"id": 1}, {"id": 2}])));
    }

    #[test]
    fn test_merge_split_parent_unions_sub_lists() {
        let merged = merge(
            records(json!([{"id": "1", "x": [1, 2]}])),
            records(json!([{"id": "1", "x": [2, 3]}, {"id": "2"}])),
        );
        assert_eq!(merged, records(json!([{"id": "1", "x": [1, 2, 3]}, {"id": "2"}])));
    }

    #[test]
    fn test_merge_scalar_entries_concatenate() {
        let merged = merge(records(json!(["a", "b"])), records(json!(["b", "c"])));
        assert_eq!(merged, records(json!(["a", "b", "b", "c"])));

        let merged = merge(records(json!([{"id": 1}])), records(json!(["raw"])));
        assert_eq!(merged.len(), 2);
    }

    #[test]
    fn test_merge_no_common_keys_concatenates() {
        let merged = merge(
            records(json!([{"lap": "1"}])),
            records(json!([{"stop": "1"}])),
        );
        assert_eq!(merged.len(), 2);
    }

    #[test]
    fn test_merge_race_split_across_pages() {
        let page_one = records(json!([
            {"round": "1", "raceName": "Bahrain Grand Prix", "Results": [{"position": "1"}]},
            {"round": "2", "raceName": "Saudi Arabian Grand Prix", "Results": [
                {"position": "1", "Driver": {"driverId": "perez"}},
                {"position": "2", "Driver": {"driverId": "max_verstappen"}}
            ]}
        ]));
        let page_two = records(json!([
            {"round": "2", "raceName": "Saudi Arabian Grand Prix", "Results": [
                {"position": "3", "Driver": {"driverId": "alonso"}}
            ]},
            {"round": "3", "raceName": "Australian Grand Prix", "Results": [{"position": "1"}]}
        ]));

        let merged = merge(page_one, page_two);
        assert_eq!(merged.len(), 3);
        assert_eq!(merged[1]["Results"].as_array().unwrap().len(), 3);
        assert_eq!(merged[1]["Results"][2]["Driver"]["driverId"], "alonso");
        assert_eq!(merged[2]["round"], "3");
    }

    #[test]
    fn test_merge_union_skips_structural_duplicates() {
        let merged = merge(
            records(json!([{"number": "5", "Timings": [{"driverId": "a", "time": "1:30"}]}])),
            records(json!([{"number": "5", "Timings": [
                {"time": "1:30", "driverId": "a"},
                {"driverId": "b", "time": "1:31"}
            ]}])),
        );
        assert_eq!(merged.len(), 1);
        assert_eq!(
            merged[0]["Timings"],
            json!([{"driverId": "a", "time": "1:30"}, {"driverId": "b", "time": "1:31"}])
        );
    }

    #[test]
    fn test_merge_only_touches_arrays_on_both_sides() {
        let merged = merge(
            records(json!([{"id": "1", "name": "old", "tags": ["a"]}])),
            records(json!([{"id": "1", "name": "new", "tags": "b"}])),
        );
        assert_eq!(merged, records(json!([{"id": "1", "name": "old", "tags": ["a"]}])));
    }

    // The parent check is a heuristic: any shared key with an equal value
    // counts, so two different races of one season are folded together.
    #[test]
    fn test_merge_heuristic_folds_records_sharing_any_value() {
        let merged = merge(
            records(json!([{"season": "2021", "round": "5", "Results": [{"position": "1"}]}])),
            records(json!([{"season": "2021", "round": "6", "Results": [{"position": "2"}]}])),
        );
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0]["round"], "5");
        assert_eq!(merged[0]["Results"].as_array().unwrap().len(), 2);
    }
}
