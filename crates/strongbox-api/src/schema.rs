//! Request-body key validation.
//!
//! A JSON document is flattened into the bracket-notation paths of every
//! object key it contains (`$['a']`, `$['a']['b']`). Objects nested in
//! arrays use a `[*]` segment (`$['a'][*]['b']`); scalar array elements
//! contribute nothing. Backslashes and single quotes inside a key are
//! escaped, so distinct keys always produce distinct paths. Each path must
//! appear literally in the caller's allow-set.

use std::collections::BTreeSet;

use serde_json::Value;
use strongbox_core::error::{StrongboxError, StrongboxResult};

/// Every key path in `document`, in document order. Containers are
/// listed before their children.
pub fn key_paths(document: &Value) -> Vec<String> {
    let mut paths = Vec::new();
    collect(document, "$", &mut paths);
    paths
}

fn collect(value: &Value, prefix: &str, out: &mut Vec<String>) {
    match value {
        Value::Object(map) => {
            for (key, child) in map {
                let path = format!("{prefix}['{}']", escape_segment(key));
                out.push(path.clone());
                collect(child, &path, out);
            }
        }
        Value::Array(items) => {
            let path = format!("{prefix}[*]");
            for item in items {
                collect(item, &path, out);
            }
        }
        _ => {}
    }
}

fn escape_segment(key: &str) -> String {
    key.replace('\\', "\\\\").replace('\'', "\\'")
}

/// Fail with `invalid_json_key` on the first path not in `allowed`.
pub fn validate_keys(document: &Value, allowed: &BTreeSet<String>) -> StrongboxResult<()> {
    match key_paths(document)
        .into_iter()
        .find(|path| !allowed.contains(path))
    {
        Some(path) => Err(StrongboxError::InvalidJsonKey { path }),
        None => Ok(()),
    }
}

/// Build an allow-set from string literals.
pub fn allow_set(paths: &[&str]) -> BTreeSet<String> {
    paths.iter().map(|p| (*p).to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn allowed() -> BTreeSet<String> {
        allow_set(&["$['foo']", "$['bar']", "$['baz']", "$['baz']['quux']"])
    }

    fn rejected_path(document: Value) -> String {
        match validate_keys(&document, &allowed()) {
            Err(StrongboxError::InvalidJsonKey { path }) => path,
            other => panic!("expected invalid_json_key, got {other:?}"),
        }
    }

    #[test]
    fn accepts_declared_keys() {
        let doc = json!({"foo": "value", "bar": "", "baz": {"quux": false}});
        validate_keys(&doc, &allowed()).unwrap();
    }

    #[test]
    fn rejects_extra_top_level_key() {
        let doc = json!({"foo1": "value", "bar": "", "baz": {"quux": false}});
        assert_eq!(rejected_path(doc), "$['foo1']");
    }

    #[test]
    fn rejects_extra_nested_key_by_its_full_path() {
        let doc = json!({"foo": "value", "bar": "", "baz": {"quux1": false}});
        assert_eq!(rejected_path(doc), "$['baz']['quux1']");
    }

    #[test]
    fn first_offender_in_document_order_is_reported() {
        let doc: Value =
            serde_json::from_str(r#"{"zed": 1, "foo": "v", "alpha": 2}"#).unwrap();
        assert_eq!(rejected_path(doc), "$['zed']");
    }

    #[test]
    fn scalar_arrays_contribute_no_paths() {
        let doc = json!({"names": ["a.com", "b.com"]});
        assert_eq!(key_paths(&doc), vec!["$['names']"]);
    }

    #[test]
    fn objects_in_arrays_use_wildcard_segment() {
        let doc = json!({"items": [{"name": "a"}, {"name": "b", "extra": 1}]});
        let paths = key_paths(&doc);
        assert_eq!(
            paths,
            vec![
                "$['items']",
                "$['items'][*]['name']",
                "$['items'][*]['name']",
                "$['items'][*]['extra']",
            ]
        );

        let allowed = allow_set(&["$['items']", "$['items'][*]['name']"]);
        assert!(matches!(
            validate_keys(&doc, &allowed),
            Err(StrongboxError::InvalidJsonKey { path }) if path == "$['items'][*]['extra']"
        ));
    }

    #[test]
    fn quotes_in_keys_cannot_forge_nested_paths() {
        let doc = json!({"foo": "v", "baz']['quux": 1});
        assert_eq!(rejected_path(doc), r"$['baz\']['quux']");
    }

    #[test]
    fn backslashes_in_keys_are_escaped() {
        let doc = json!({"a\\": {"b": 1}});
        assert_eq!(key_paths(&doc), vec![r"$['a\\']", r"$['a\\']['b']"]);
    }

    #[test]
    fn empty_object_is_always_valid() {
        validate_keys(&json!({}), &BTreeSet::new()).unwrap();
    }
}
