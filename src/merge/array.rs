//! Array merge strategies.

use super::merger::{clone_unless_otherwise_specified, merge_with};
use super::options::MergeOptions;
use crate::value::Value;
use indexmap::{IndexMap, IndexSet};
use tracing::trace;

/// ArrayMerge combines two lists into one.
///
/// Implementations must route every element they copy from the inputs
/// through [`clone_unless_otherwise_specified`] so results never alias
/// the inputs when cloning is enabled.
pub trait ArrayMerge: Send + Sync {
    fn merge_arrays(
        &self,
        target: &[Value],
        source: &[Value],
        options: &MergeOptions,
    ) -> Vec<Value>;
}

impl<F> ArrayMerge for F
where
    F: Fn(&[Value], &[Value], &MergeOptions) -> Vec<Value> + Send + Sync,
{
    fn merge_arrays(
        &self,
        target: &[Value],
        source: &[Value],
        options: &MergeOptions,
    ) -> Vec<Value> {
        self(target, source, options)
    }
}

/// ConcatArrayMerge appends the source elements after the target elements.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConcatArrayMerge;

impl ArrayMerge for ConcatArrayMerge {
    fn merge_arrays(
        &self,
        target: &[Value],
        source: &[Value],
        options: &MergeOptions,
    ) -> Vec<Value> {
        trace!(
            target_len = target.len(),
            source_len = source.len(),
            "concatenating lists"
        );
        target
            .iter()
            .chain(source)
            .map(|element| clone_unless_otherwise_specified(element, options))
            .collect()
    }
}

/// ArrayMergeById merges map entries that share an identity key and
/// concatenates everything else. See [`array_merge_by_id`].
#[derive(Debug, Clone, Copy, Default)]
pub struct ArrayMergeById;

impl ArrayMerge for ArrayMergeById {
    fn merge_arrays(
        &self,
        target: &[Value],
        source: &[Value],
        options: &MergeOptions,
    ) -> Vec<Value> {
        array_merge_by_id(target, source, options)
    }
}

/// Merges two lists by correlating map entries on `options.identity_key`.
///
/// Entries without the key (including non-map entries) are cloned into the
/// result first, target's before source's. Then one entry per distinct
/// identity value follows, in the order the ids were first seen (target
/// first), each being the deep merge of the target and source entries with
/// that id. A missing side is treated as an empty map. Within one list a
/// later entry with the same id replaces an earlier one.
pub fn array_merge_by_id(
    target: &[Value],
    source: &[Value],
    options: &MergeOptions,
) -> Vec<Value> {
    let key = options.identity_key.as_str();
    let mut results = Vec::new();

    let target_by_id = index_by_id(target, key, options, &mut results);
    let source_by_id = index_by_id(source, key, options, &mut results);

    let mut ids: IndexSet<&Value> = target_by_id.keys().copied().collect();
    ids.extend(source_by_id.keys().copied());

    trace!(
        unkeyed = results.len(),
        ids = ids.len(),
        key,
        "merging lists by id"
    );

    let empty = Value::empty_map();
    results.reserve(ids.len());
    for id in ids {
        let target_entry = target_by_id.get(id).copied().unwrap_or(&empty);
        let source_entry = source_by_id.get(id).copied().unwrap_or(&empty);
        results.push(merge_with(target_entry, source_entry, options));
    }
    results
}

fn index_by_id<'a>(
    entries: &'a [Value],
    key: &str,
    options: &MergeOptions,
    unkeyed: &mut Vec<Value>,
) -> IndexMap<&'a Value, &'a Value> {
    let mut by_id = IndexMap::new();
    for entry in entries {
        match entry.get(key) {
            Some(id) => {
                by_id.insert(id, entry);
            }
            None => unkeyed.push(clone_unless_otherwise_specified(entry, options)),
        }
    }
    by_id
}
