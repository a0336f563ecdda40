//! Structural merging of JSON field maps
//!
//! Two precedence rules are used by the pipeline:
//! - [`deep_merge`]: later call arguments override earlier ones.
//! - [`merge_defaults`]: caller data always beats configured defaults.
//!
//! Both recurse into nested objects. Any non-object value (arrays included)
//! is a leaf and is replaced or kept whole.

use serde_json::{Map, Value};

/// Merge `source` into `target`; `source` wins at every leaf
pub fn deep_merge(target: &mut Map<String, Value>, source: Map<String, Value>) {
    for (key, incoming) in source {
        if let Value::Object(nested) = incoming {
            if let Some(Value::Object(existing)) = target.get_mut(&key) {
                deep_merge(existing, nested);
                continue;
            }
            target.insert(key, Value::Object(nested));
        } else {
            target.insert(key, incoming);
        }
    }
}

/// Fill gaps in `caller` from `defaults`; `caller` wins at every matched path
///
/// A key present on both sides keeps the caller's value unless both values
/// are objects, in which case the two objects are combined with the same rule.
#[must_use]
pub fn merge_defaults(mut caller: Map<String, Value>, defaults: &Map<String, Value>) -> Map<String, Value> {
    fill_defaults(&mut caller, defaults);
    caller
}

fn fill_defaults(caller: &mut Map<String, Value>, defaults: &Map<String, Value>) {
    for (key, default) in defaults {
        if !caller.contains_key(key) {
            caller.insert(key.clone(), default.clone());
            continue;
        }
        if let (Some(Value::Object(existing)), Value::Object(nested)) = (caller.get_mut(key), default) {
            fill_defaults(existing, nested);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn obj(v: Value) -> Map<String, Value> {
        match v {
            Value::Object(m) => m,
            _ => panic!("expected object"),
        }
    }

    #[test]
    fn test_deep_merge_later_wins() {
        let mut target = obj(json!({"a": 1, "n": {"x": 1, "y": 2}}));
        deep_merge(&mut target, obj(json!({"a": 2, "n": {"y": 3, "z": 4}})));
        assert_eq!(Value::Object(target), json!({"a": 2, "n": {"x": 1, "y": 3, "z": 4}}));
    }

    #[test]
    fn test_deep_merge_replaces_arrays() {
        let mut target = obj(json!({"list": [1, 2]}));
        deep_merge(&mut target, obj(json!({"list": [3]})));
        assert_eq!(target["list"], json!([3]));
    }

    #[test]
    fn test_deep_merge_keeps_insertion_order() {
        let mut target = obj(json!({"b": 1}));
        deep_merge(&mut target, obj(json!({"a": 2})));
        let keys: Vec<_> = target.keys().cloned().collect();
        assert_eq!(keys, vec!["b", "a"]);
    }

    #[test]
    fn test_merge_defaults_caller_wins() {
        let caller = obj(json!({"hostname": "caller"}));
        let defaults = obj(json!({"hostname": "configured", "ip": "1.2.3.4"}));
        let merged = merge_defaults(caller, &defaults);
        assert_eq!(Value::Object(merged), json!({"hostname": "caller", "ip": "1.2.3.4"}));
    }

    #[test]
    fn test_merge_defaults_nested() {
        let caller = obj(json!({"nested": {"obj": 2}}));
        let defaults = obj(json!({"nested": {"obj": 1, "extra": true}}));
        let merged = merge_defaults(caller, &defaults);
        assert_eq!(merged["nested"], json!({"obj": 2, "extra": true}));
    }

    #[test]
    fn test_merge_defaults_type_mismatch_keeps_caller() {
        let caller = obj(json!({"nested": "flat"}));
        let defaults = obj(json!({"nested": {"obj": 1}}));
        let merged = merge_defaults(caller, &defaults);
        assert_eq!(merged["nested"], json!("flat"));
    }
}
