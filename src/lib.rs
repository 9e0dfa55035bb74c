//! # Deepmerge
//!
//! Recursive structural merge of JSON/YAML-like values.
//!
//! Merging two values produces a new value and never mutates either input.
//! Maps are merged key by key, lists are combined by a pluggable strategy,
//! and anything the classifier calls opaque is replaced wholesale.
//!
//! ```
//! use deepmerge::{merge, value::from_json};
//!
//! let target = from_json(r#"{"a":{"x":1},"l":[1]}"#).unwrap();
//! let source = from_json(r#"{"a":{"y":2},"l":[2]}"#).unwrap();
//! assert_eq!(
//!     merge(&target, &source),
//!     from_json(r#"{"a":{"x":1,"y":2},"l":[1,2]}"#).unwrap()
//! );
//! ```
//!
//! ## Modules
//!
//! - [`value`] - In-memory representation of YAML/JSON objects
//! - [`merge`] - Merge entry points, array strategies and options
//!
//! Inputs are immutable and every result is freshly allocated, so merges may
//! run concurrently from any number of threads.

pub mod merge;
pub mod value;

pub use merge::{
    array_merge_by_id, clone_unless_otherwise_specified, merge, merge_all, merge_all_with,
    merge_slice, merge_with, ArrayMerge, ArrayMergeById, ArrayMergeKind, Classification,
    Classify, ConcatArrayMerge, ConfigError, DefaultClassifier, MergeConfig, MergeError,
    MergeOptions,
};
pub use value::{Map, Value};
