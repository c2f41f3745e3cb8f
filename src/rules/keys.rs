//! Dot-separated key path lookup in parsed documents.
//!
//! `a.b.c` walks nested mappings. Sequences are never traversed, so `items.0`
//! does not reach into an array. A key that is present with an explicit null
//! value counts as present.

/// A parsed document that can be walked by mapping keys
pub trait KeyedDocument {
    /// Child value under a mapping key, `None` for non-mappings
    fn child(&self, key: &str) -> Option<&Self>;
}

impl KeyedDocument for serde_json::Value {
    fn child(&self, key: &str) -> Option<&Self> {
        match self {
            serde_json::Value::Object(map) => map.get(key),
            _ => None,
        }
    }
}

impl KeyedDocument for serde_yaml::Value {
    fn child(&self, key: &str) -> Option<&Self> {
        match self {
            serde_yaml::Value::Mapping(map) => map
                .iter()
                .find(|(k, _)| yaml_key_matches(k, key))
                .map(|(_, v)| v),
            serde_yaml::Value::Tagged(tagged) => tagged.value.child(key),
            _ => None,
        }
    }
}

/// YAML keys may be numbers or booleans; match them by their text form
fn yaml_key_matches(key: &serde_yaml::Value, segment: &str) -> bool {
    match key {
        serde_yaml::Value::String(s) => s == segment,
        serde_yaml::Value::Number(n) => n.to_string() == segment,
        serde_yaml::Value::Bool(b) => b.to_string() == segment,
        _ => false,
    }
}

/// Value at a dot-separated key path
pub fn get_nested<'a, D: KeyedDocument>(document: &'a D, key_path: &str) -> Option<&'a D> {
    key_path
        .split('.')
        .try_fold(document, |current, segment| current.child(segment))
}

/// Check if a dot-separated key path is present
pub fn has_key<D: KeyedDocument>(document: &D, key_path: &str) -> bool {
    get_nested(document, key_path).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_json_nested_keys() {
        let doc = json!({"name": "x", "a": {"b": 1}});
        assert!(has_key(&doc, "name"));
        assert!(has_key(&doc, "a.b"));
        assert!(!has_key(&doc, "a.c"));
        assert!(!has_key(&doc, "a.b.c"));
    }

    #[test]
    fn test_json_arrays_are_not_traversed() {
        let doc = json!({"items": [{"name": "a"}]});
        assert!(has_key(&doc, "items"));
        assert!(!has_key(&doc, "items.0"));
        assert!(!has_key(&doc, "items.0.name"));
    }

    #[test]
    fn test_json_null_counts_as_present() {
        let doc = json!({"license": null});
        assert!(has_key(&doc, "license"));
        assert!(!has_key(&doc, "license.spdx"));
    }

    #[test]
    fn test_yaml_nested_keys() {
        let doc: serde_yaml::Value =
            serde_yaml::from_str("on:\n  push:\n    branches: [main]\njobs:\n").unwrap();
        assert!(has_key(&doc, "on.push.branches"));
        assert!(has_key(&doc, "jobs"));
        assert!(!has_key(&doc, "on.pull_request"));
    }

    #[test]
    fn test_yaml_non_string_keys() {
        let doc: serde_yaml::Value = serde_yaml::from_str("versions:\n  3: ok\n  true: yes\n").unwrap();
        assert!(has_key(&doc, "versions.3"));
        assert!(has_key(&doc, "versions.true"));
    }

    #[test]
    fn test_yaml_sequences_are_not_traversed() {
        let doc: serde_yaml::Value = serde_yaml::from_str("steps:\n  - name: a\n").unwrap();
        assert!(!has_key(&doc, "steps.0.name"));
    }
}
