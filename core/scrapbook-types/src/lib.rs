//! Core type definitions for the scrapbook service.
//!
//! This crate defines the small, storage-agnostic types shared by every
//! other crate:
//! - Entity identifiers (UUID v7 newtypes, one per entity kind)
//! - Millisecond wall-clock timestamps
//! - The error-kind taxonomy surfaced to callers
//!
//! Entity records and their validation rules live in `scrapbook-model`.

mod error_kind;
mod ids;
mod timestamp;

pub use error_kind::ErrorKind;
pub use ids::{ElementId, PageId, ScrapbookId, SongId, SongLinkId, UserId};
pub use timestamp::Timestamp;

/// Result type alias using the crate's error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in type operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid UUID: {0}")]
    InvalidUuid(#[from] uuid::Error),

    #[error("invalid timestamp: {0}")]
    InvalidTimestamp(String),
}
