//! Error types for the storage layer.

use scrapbook_model::ValidationError;
use scrapbook_types::ErrorKind;
use thiserror::Error;

/// Result type for storage operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors that can occur in storage operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Database error from SQLite (including aborted transactions).
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Serialization/deserialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Referenced entity does not exist.
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    /// Entity exists but the caller does not own it.
    #[error("access denied to {entity} {id}")]
    Forbidden { entity: &'static str, id: String },

    /// Payload failed validation.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// A stored row could not be decoded.
    #[error("invalid data: {0}")]
    InvalidData(String),

    /// Another thread panicked while holding the connection.
    #[error("database connection lock poisoned")]
    LockPoisoned,
}

impl StoreError {
    pub(crate) fn not_found(entity: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            entity,
            id: id.to_string(),
        }
    }

    /// Maps the error onto the caller-facing taxonomy.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::Forbidden { .. } => ErrorKind::Forbidden,
            Self::Validation(_) => ErrorKind::Validation,
            Self::Database(_) | Self::Serialization(_) | Self::InvalidData(_) | Self::LockPoisoned => {
                ErrorKind::Storage
            }
        }
    }
}
