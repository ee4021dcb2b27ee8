//! Error types for the persistence layer.
//!
//! All errors are propagated via [`DbError`], which wraps the underlying
//! I/O and [`serde_json`] errors with the record key that failed.

/// Errors that can occur in the persistence layer.
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    /// A filesystem operation on a record failed.
    #[error("I/O error on record {key:?}: {source}")]
    Io {
        /// The record key, or the data directory for store-wide operations.
        key: String,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    /// A serialization or deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A key that cannot be mapped to a record file.
    #[error("Invalid record key: {0:?}")]
    InvalidKey(String),
}

impl DbError {
    /// Wrap an I/O error with the key it happened on.
    pub fn io(key: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            key: key.into(),
            source,
        }
    }
}
