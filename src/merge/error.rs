//! Error types for merge operations.

use thiserror::Error;

/// MergeError is returned by the batch entry points when their input is unusable.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MergeError {
    #[error("invalid argument: {message}")]
    InvalidArgument { message: String },
}

impl MergeError {
    /// Creates an invalid argument error.
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        MergeError::InvalidArgument {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_argument_display() {
        let err = MergeError::invalid_argument("expected a list, got string");
        assert_eq!(
            err.to_string(),
            "invalid argument: expected a list, got string"
        );
    }
}
