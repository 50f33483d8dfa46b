//! Error types for batchr

use thiserror::Error;

/// Result type alias using batchr's Error
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in batch operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// A string key (or dot-path component) does not resolve and no default
    /// factory is configured
    #[error("key '{key}' not found, available keys: {available:?}")]
    KeyNotFound {
        /// The key that failed to resolve
        key: String,
        /// Top-level keys known at the time of the lookup
        available: Vec<String>,
    },

    /// A member lacks the requested attribute or operation during broadcasting
    #[error("operation '{name}' not supported for member '{key}' of type {type_name}")]
    AttributeNotFound {
        /// The requested attribute or operation name
        name: String,
        /// The key of the offending member
        key: String,
        /// The runtime type of the offending member
        type_name: &'static str,
    },

    /// Broadcasting over zero members is disallowed
    #[error("cannot broadcast '{name}' over an empty batch")]
    EmptyBatch {
        /// The requested attribute or operation name
        name: String,
    },

    /// An index shape does not match any supported dispatch case
    #[error("unsupported index shape: {found}")]
    UnsupportedIndex {
        /// Description of the rejected index
        found: String,
    },

    /// Element indexing past the end of a sequence
    #[error("index {index} out of bounds for length {len}")]
    IndexOutOfBounds {
        /// The requested index
        index: isize,
        /// Length of the indexed sequence
        len: usize,
    },

    /// Assertion-style invariant violation
    #[error("invariant violation: {msg}")]
    Invariant {
        /// Description of the violated invariant
        msg: String,
    },
}

impl Error {
    /// Fill in the member key on an `AttributeNotFound` raised below the
    /// broadcast layer, where the member key is not known yet.
    pub(crate) fn with_key(self, key: &str) -> Error {
        match self {
            Error::AttributeNotFound {
                name,
                key: k,
                type_name,
            } if k.is_empty() => Error::AttributeNotFound {
                name,
                key: key.to_string(),
                type_name,
            },
            other => other,
        }
    }
}
