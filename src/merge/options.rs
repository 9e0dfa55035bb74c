//! Merge options and the mergeability classifier.

use super::array::{ArrayMerge, ConcatArrayMerge};
use crate::value::Value;
use std::fmt;
use std::sync::Arc;

/// The identity key used by [`ArrayMergeById`](super::ArrayMergeById) unless overridden.
pub const DEFAULT_IDENTITY_KEY: &str = "_id";

/// Classification is how the merger treats a single value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    /// Merged key by key.
    Mapping,
    /// Merged by the configured array strategy.
    Sequence,
    /// Replaced wholesale.
    Opaque,
}

impl Classification {
    /// Returns true for mappings and sequences.
    pub fn is_mergeable(self) -> bool {
        !matches!(self, Classification::Opaque)
    }
}

/// Classify decides whether a value is merged recursively or replaced.
pub trait Classify: Send + Sync {
    fn classify(&self, value: &Value) -> Classification;
}

impl<F> Classify for F
where
    F: Fn(&Value) -> Classification + Send + Sync,
{
    fn classify(&self, value: &Value) -> Classification {
        self(value)
    }
}

/// DefaultClassifier treats maps and lists as mergeable and everything else as opaque.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultClassifier;

impl Classify for DefaultClassifier {
    fn classify(&self, value: &Value) -> Classification {
        match value {
            Value::Map(_) => Classification::Mapping,
            Value::List(_) => Classification::Sequence,
            _ => Classification::Opaque,
        }
    }
}

/// MergeOptions configures a merge.
///
/// Options are resolved once, before a merge starts, and only borrowed
/// during recursion.
#[derive(Clone)]
pub struct MergeOptions {
    pub classifier: Arc<dyn Classify>,
    pub array_merge: Arc<dyn ArrayMerge>,
    /// When false, mergeable leaves are shared with the inputs instead of deep-copied.
    pub clone: bool,
    pub identity_key: String,
}

impl Default for MergeOptions {
    fn default() -> Self {
        MergeOptions {
            classifier: Arc::new(DefaultClassifier),
            array_merge: Arc::new(ConcatArrayMerge),
            clone: true,
            identity_key: DEFAULT_IDENTITY_KEY.to_string(),
        }
    }
}

impl MergeOptions {
    /// Creates options with every field at its default.
    pub fn new() -> Self {
        MergeOptions::default()
    }

    /// Sets the mergeability classifier.
    pub fn with_classifier(mut self, classifier: impl Classify + 'static) -> Self {
        self.classifier = Arc::new(classifier);
        self
    }

    /// Sets the array merge strategy.
    pub fn with_array_merge(mut self, array_merge: impl ArrayMerge + 'static) -> Self {
        self.array_merge = Arc::new(array_merge);
        self
    }

    /// Sets whether mergeable leaves are deep-copied.
    pub fn with_clone(mut self, clone: bool) -> Self {
        self.clone = clone;
        self
    }

    /// Sets the key used to correlate entries by identity.
    pub fn with_identity_key(mut self, key: impl Into<String>) -> Self {
        self.identity_key = key.into();
        self
    }

    /// Classifies `value` with the configured classifier.
    pub fn classify(&self, value: &Value) -> Classification {
        self.classifier.classify(value)
    }

    /// Returns true if the configured classifier accepts `value` as mergeable.
    pub fn is_mergeable(&self, value: &Value) -> bool {
        self.classify(value).is_mergeable()
    }
}

impl fmt::Debug for MergeOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MergeOptions")
            .field("clone", &self.clone)
            .field("identity_key", &self.identity_key)
            .finish_non_exhaustive()
    }
}
