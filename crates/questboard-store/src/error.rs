//! Error types for questboard storage.

use questboard_core::GameError;

/// Result type for storage operations.
pub type Result<T> = std::result::Result<T, StoreError>;

/// Errors that can occur in storage operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Database operation failed.
    #[error("database error: {0}")]
    Database(String),

    /// Serialization/deserialization failed.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// Record not found.
    #[error("{entity} not found: {id}")]
    NotFound {
        /// Kind of record.
        entity: &'static str,
        /// Its identifier.
        id: String,
    },

    /// A unique index already points at another student.
    #[error("{field} already in use: {value}")]
    Conflict {
        /// Indexed field (`name` or `email`).
        field: &'static str,
        /// The colliding value.
        value: String,
    },
}

impl From<StoreError> for GameError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Conflict { field, value } => Self::Conflict { field, value },
            StoreError::Serialization(msg) => Self::Serialization(msg),
            StoreError::Database(msg) => Self::Storage(msg),
            err @ StoreError::NotFound { .. } => Self::Storage(err.to_string()),
        }
    }
}
