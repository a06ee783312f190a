//! Error types for identity verification.

use scrapbook_types::ErrorKind;
use thiserror::Error;

/// Reasons a credential was not accepted.
#[derive(Debug, Error)]
pub enum AuthError {
    /// No `Authorization` header, or not a bearer credential.
    #[error("authentication required")]
    MissingCredential,

    /// Token is not `payload.signature` base64url.
    #[error("invalid token format: {0}")]
    InvalidFormat(String),

    /// Ed25519 signature verification failed.
    #[error("token signature invalid")]
    InvalidSignature,

    /// Payload JSON is malformed or missing required claims.
    #[error("invalid token payload: {0}")]
    InvalidPayload(String),

    /// Token has expired.
    #[error("token expired at {expired_at}")]
    Expired { expired_at: i64 },

    /// Token claims to be issued in the future.
    #[error("token not yet valid (issued at {issued_at})")]
    NotYetValid { issued_at: i64 },

    /// Configured verifying key is unusable.
    #[error("invalid verifying key: {0}")]
    InvalidKey(String),
}

impl AuthError {
    /// Always [`ErrorKind::Unauthenticated`].
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        ErrorKind::Unauthenticated
    }
}

/// Result type for auth operations.
pub type AuthResult<T> = Result<T, AuthError>;
