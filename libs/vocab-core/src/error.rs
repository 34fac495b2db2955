//! Error types for vocab-core.

use thiserror::Error;
use uuid::Uuid;

/// Result type alias using CoreError.
pub type Result<T> = std::result::Result<T, CoreError>;

/// Failures reported by a word store collaborator.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum StoreError {
    #[error("network error: {0}")]
    Network(String),

    #[error("not authenticated: {0}")]
    Auth(String),

    #[error("validation error: {0}")]
    Validation(String),

    #[error("word not found: {0}")]
    NotFound(Uuid),

    #[error("storage error: {0}")]
    Storage(String),
}

/// Errors raised by the review controller and the scheduling functions.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A review was requested from an empty due set.
    #[error("no words are due for review")]
    NoDueWords,

    #[error("no review is in progress")]
    NoActiveReview,

    #[error("word limit of {limit} reached")]
    WordLimit { limit: usize },

    #[error("unknown word: {0}")]
    UnknownWord(Uuid),

    /// Scheduling state that can only come from a bug upstream.
    #[error("malformed word {id}: {reason}")]
    MalformedWord { id: Uuid, reason: String },

    #[error("invalid settings: {0}")]
    InvalidSettings(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_error_display() {
        let error = StoreError::Auth("session expired".to_string());
        assert_eq!(error.to_string(), "not authenticated: session expired");
    }

    #[test]
    fn test_store_error_is_transparent() {
        let error: CoreError = StoreError::Network("timeout".to_string()).into();
        assert_eq!(error.to_string(), "network error: timeout");
    }

    #[test]
    fn test_word_limit_display() {
        let error = CoreError::WordLimit { limit: 999 };
        assert_eq!(error.to_string(), "word limit of 999 reached");
    }
}
