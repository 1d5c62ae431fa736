//! Path helpers over the JSON query document.

use serde_json::{Map, Value};

use crate::error::{QueryError, Result};

/// Returns the object at `path`, creating missing (or null) levels.
pub(crate) fn object_at<'a>(
    root: &'a mut Map<String, Value>,
    path: &[&str],
) -> Result<&'a mut Map<String, Value>> {
    let mut current = root;
    for (depth, key) in path.iter().enumerate() {
        let slot = current
            .entry(key.to_string())
            .or_insert_with(|| Value::Object(Map::new()));
        if slot.is_null() {
            *slot = Value::Object(Map::new());
        }
        current = match slot {
            Value::Object(map) => map,
            other => return Err(QueryError::conflict(&path[..=depth], other)),
        };
    }
    Ok(current)
}

/// Returns the array at `path`, creating it and any missing parents.
pub(crate) fn array_at<'a>(
    root: &'a mut Map<String, Value>,
    path: &[&str],
) -> Result<&'a mut Vec<Value>> {
    let Some((last, parents)) = path.split_last() else {
        return Err(QueryError::Conflict {
            path: String::new(),
            found: "the document root",
        });
    };
    let parent = object_at(root, parents)?;
    let slot = parent
        .entry(last.to_string())
        .or_insert_with(|| Value::Array(Vec::new()));
    if slot.is_null() {
        *slot = Value::Array(Vec::new());
    }
    match slot {
        Value::Array(items) => Ok(items),
        other => Err(QueryError::conflict(path, other)),
    }
}

/// Merges `source` into `target`: objects merge recursively, arrays append,
/// anything else overwrites.
pub(crate) fn merge(target: &mut Map<String, Value>, source: Map<String, Value>) {
    for (key, incoming) in source {
        let replacement = match (target.get_mut(&key), incoming) {
            (Some(Value::Object(existing)), Value::Object(incoming)) => {
                merge(existing, incoming);
                None
            }
            (Some(Value::Array(existing)), Value::Array(incoming)) => {
                existing.extend(incoming);
                None
            }
            (_, incoming) => Some(incoming),
        };
        if let Some(incoming) = replacement {
            target.insert(key, incoming);
        }
    }
}

/// Looks up a dot-separated path (`"aggregations.alive.buckets"`).
///
/// Numeric segments index into arrays.
pub fn lookup<'a>(value: &'a Value, path: &str) -> Option<&'a Value> {
    if path.is_empty() {
        return Some(value);
    }
    path.split('.').try_fold(value, |current, segment| match current {
        Value::Object(map) => map.get(segment),
        Value::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn as_map(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected object"),
        }
    }

    #[test]
    fn array_at_creates_levels() {
        let mut doc = Map::new();
        array_at(&mut doc, &["query", "bool", "must"])
            .unwrap()
            .push(json!(1));
        assert_eq!(Value::Object(doc), json!({"query": {"bool": {"must": [1]}}}));
    }

    #[test]
    fn array_at_reuses_existing() {
        let mut doc = as_map(json!({"sort": [{"a": "asc"}]}));
        array_at(&mut doc, &["sort"]).unwrap().push(json!({"b": "desc"}));
        assert_eq!(
            Value::Object(doc),
            json!({"sort": [{"a": "asc"}, {"b": "desc"}]})
        );
    }

    #[test]
    fn null_levels_are_replaced() {
        let mut doc = as_map(json!({"query": null}));
        array_at(&mut doc, &["query", "bool", "should"]).unwrap();
        assert_eq!(Value::Object(doc), json!({"query": {"bool": {"should": []}}}));
    }

    #[test]
    fn wrong_shape_is_a_conflict() {
        let mut doc = as_map(json!({"query": "everything"}));
        let err = array_at(&mut doc, &["query", "bool", "must"]).unwrap_err();
        match err {
            QueryError::Conflict { path, found } => {
                assert_eq!(path, "query");
                assert_eq!(found, "a string");
            }
            other => panic!("unexpected error: {other}"),
        }

        let mut doc = as_map(json!({"sort": {"a": "asc"}}));
        assert!(array_at(&mut doc, &["sort"]).is_err());
    }

    #[test]
    fn merge_rules() {
        let mut doc = as_map(json!({"a": {"x": 1}, "list": [1], "n": 1}));
        merge(
            &mut doc,
            as_map(json!({"a": {"y": 2}, "list": [2], "n": 5, "new": true})),
        );
        assert_eq!(
            Value::Object(doc),
            json!({"a": {"x": 1, "y": 2}, "list": [1, 2], "n": 5, "new": true})
        );
    }

    #[test]
    fn lookup_paths() {
        let doc = json!({"aggregations": {"alive": {"buckets": [{"key": "yes"}]}}});
        assert_eq!(
            lookup(&doc, "aggregations.alive.buckets.0.key"),
            Some(&json!("yes"))
        );
        assert_eq!(lookup(&doc, "aggregations.missing"), None);
        assert_eq!(lookup(&doc, ""), Some(&doc));
    }
}
