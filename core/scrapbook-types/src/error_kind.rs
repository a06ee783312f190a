use serde::{Deserialize, Serialize};
use std::fmt;

/// The closed set of failure kinds every operation reports.
///
/// Crate-specific errors map onto exactly one kind so that callers can
/// branch on the kind without inspecting messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// No credential, or a credential that failed verification.
    Unauthenticated,
    /// The referenced entity does not exist.
    NotFound,
    /// The entity exists but the caller does not own it.
    Forbidden,
    /// The payload failed structural or semantic checks.
    Validation,
    /// The storage engine failed or aborted the transaction.
    Storage,
}

impl ErrorKind {
    /// Returns the snake_case wire name of this kind.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Unauthenticated => "unauthenticated",
            Self::NotFound => "not_found",
            Self::Forbidden => "forbidden",
            Self::Validation => "validation",
            Self::Storage => "storage",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
