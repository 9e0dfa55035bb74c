//! Recursive merge of two values.

use super::error::MergeError;
use super::options::MergeOptions;
use crate::value::{Map, Value};
use once_cell::sync::Lazy;
use tracing::trace;

static DEFAULT_OPTIONS: Lazy<MergeOptions> = Lazy::new(MergeOptions::default);

/// Merges `source` into `target` with default options and returns the result.
///
/// Neither input is modified. See [`merge_with`] for the rules.
pub fn merge(target: &Value, source: &Value) -> Value {
    merge_with(target, source, &DEFAULT_OPTIONS)
}

/// Merges `source` into `target` and returns a new value.
///
/// - If exactly one side is a list, the source wins wholesale.
/// - If both are lists, `options.array_merge` combines them.
/// - Otherwise the two are merged key by key. Sides that are not maps
///   contribute no keys, so merging two scalars yields an empty map.
pub fn merge_with(target: &Value, source: &Value, options: &MergeOptions) -> Value {
    match (target, source) {
        (Value::List(t), Value::List(s)) => {
            Value::list(options.array_merge.merge_arrays(t, s, options))
        }
        _ if target.is_list() != source.is_list() => {
            trace!(
                target_type = target.type_name(),
                source_type = source.type_name(),
                "shape mismatch, source replaces target"
            );
            clone_unless_otherwise_specified(source, options)
        }
        _ => Value::map(merge_object(target, source, options)),
    }
}

/// Deep-copies `value` when cloning is enabled and the classifier accepts it,
/// otherwise returns it as is (sharing any container).
pub fn clone_unless_otherwise_specified(value: &Value, options: &MergeOptions) -> Value {
    if options.clone && options.is_mergeable(value) {
        merge_with(&empty_target(value), value, options)
    } else {
        value.clone()
    }
}

fn empty_target(value: &Value) -> Value {
    if value.is_list() {
        Value::empty_list()
    } else {
        Value::empty_map()
    }
}

fn merge_object(target: &Value, source: &Value, options: &MergeOptions) -> Map {
    let target_map = target.as_map();
    let source_map = source.as_map();
    let mut destination =
        Map::with_capacity(target_map.map_or(0, Map::len) + source_map.map_or(0, Map::len));

    if let Some(fields) = target_map.filter(|_| options.is_mergeable(target)) {
        for (key, value) in fields.iter() {
            destination.set(key.clone(), clone_unless_otherwise_specified(value, options));
        }
    }

    let Some(source_map) = source_map else {
        trace!(source_type = source.type_name(), "source has no keys");
        return destination;
    };

    for (key, value) in source_map.iter() {
        // Falsy target entries count as missing.
        let existing = target_map
            .and_then(|m| m.get(key))
            .filter(|existing| existing.is_truthy());
        let merged = match existing {
            Some(existing) if options.is_mergeable(value) => merge_with(existing, value, options),
            _ => clone_unless_otherwise_specified(value, options),
        };
        destination.set(key.clone(), merged);
    }
    destination
}

/// Folds [`merge`] over a list of values, starting from an empty map.
pub fn merge_all(values: &Value) -> Result<Value, MergeError> {
    merge_all_with(values, &DEFAULT_OPTIONS)
}

/// Folds [`merge_with`] over a list of values, starting from an empty map.
///
/// Fails with [`MergeError::InvalidArgument`] if `values` is not a list.
pub fn merge_all_with(values: &Value, options: &MergeOptions) -> Result<Value, MergeError> {
    let values = values.as_list().ok_or_else(|| {
        MergeError::invalid_argument(format!(
            "merge_all expects a list, got {}",
            values.type_name()
        ))
    })?;
    Ok(merge_slice(values, options))
}

/// Folds [`merge_with`] over a slice of values, starting from an empty map.
pub fn merge_slice(values: &[Value], options: &MergeOptions) -> Value {
    trace!(count = values.len(), "merging all");
    values
        .iter()
        .fold(Value::empty_map(), |acc, next| merge_with(&acc, next, options))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::from_json;
    use pretty_assertions::assert_eq;

    fn v(json: &str) -> Value {
        from_json(json).unwrap()
    }

    #[test]
    fn test_scalars_merge_to_empty_map() {
        assert_eq!(merge(&Value::Int(1), &Value::Int(2)), Value::empty_map());
    }

    #[test]
    fn test_scalar_source_keeps_target_keys() {
        assert_eq!(merge(&v(r#"{"a":1}"#), &Value::Int(5)), v(r#"{"a":1}"#));
    }

    #[test]
    fn test_clone_helper_copies_mergeable() {
        let value = v(r#"{"a":{"b":[1,2]}}"#);
        let copy = clone_unless_otherwise_specified(&value, &MergeOptions::default());
        assert_eq!(copy, value);
        assert!(!copy.shares_structure_with(&value));
    }

    #[test]
    fn test_clone_helper_shares_without_clone() {
        let value = v(r#"{"a":1}"#);
        let opts = MergeOptions::default().with_clone(false);
        assert!(clone_unless_otherwise_specified(&value, &opts).ptr_eq(&value));
    }

    #[test]
    fn test_clone_helper_passes_opaque_through() {
        let value = v(r#"[1]"#);
        let opts = MergeOptions::default()
            .with_classifier(|_: &Value| crate::merge::Classification::Opaque);
        assert!(clone_unless_otherwise_specified(&value, &opts).ptr_eq(&value));
    }

    #[test]
    fn test_result_key_order() {
        let out = merge(&v(r#"{"b":1,"a":2}"#), &v(r#"{"c":3,"a":4}"#));
        let keys: Vec<_> = out.as_map().unwrap().keys().cloned().collect();
        assert_eq!(keys, vec!["b", "a", "c"]);
    }

    #[test]
    fn test_merge_slice_empty() {
        assert_eq!(merge_slice(&[], &MergeOptions::default()), Value::empty_map());
    }

    #[test]
    fn test_merge_all_rejects_non_list() {
        let err = merge_all(&Value::from("not an array")).unwrap_err();
        assert!(matches!(err, MergeError::InvalidArgument { .. }));
        assert!(err.to_string().contains("string"));
    }
}
