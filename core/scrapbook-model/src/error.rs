//! Validation errors for model inputs.

use scrapbook_types::ErrorKind;
use thiserror::Error;

/// A payload failed a structural or semantic check.
///
/// `field` is a path into the payload (e.g. `elements[2].scale`) so the
/// caller can point at the offending value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid {field}: {reason}")]
pub struct ValidationError {
    pub field: String,
    pub reason: String,
}

impl ValidationError {
    pub fn new(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Prefixes the field path with `parent`.
    #[must_use]
    pub fn nested(self, parent: &str) -> Self {
        let field = if self.field.is_empty() {
            parent.to_string()
        } else {
            format!("{parent}.{}", self.field)
        };
        Self { field, ..self }
    }

    /// Prefixes the field path with a collection name and index.
    #[must_use]
    pub fn within(self, collection: &str, index: usize) -> Self {
        self.nested(&format!("{collection}[{index}]"))
    }

    /// Always [`ErrorKind::Validation`].
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        ErrorKind::Validation
    }
}
