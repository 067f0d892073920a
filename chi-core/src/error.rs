//! Deployment model error abstractions.

use thiserror::Error;

/// Deployment model error variants.
#[derive(Debug, Error, PartialEq)]
pub enum ChiError {
    /// An identifier was registered twice with conflicting content.
    #[error("duplicate identifier `{0}` registered with conflicting content")]
    DuplicateIdentifier(String),
    /// The referenced object is not registered.
    #[error("{kind} `{name}` not found")]
    NotFound {
        /// The kind of object which was looked up.
        kind: &'static str,
        /// The name or identifier of the object.
        name: String,
    },
    /// The given input was invalid.
    #[error("validation error: {0}")]
    InvalidInput(String),
}

impl ChiError {
    /// Construct a new `NotFound` error.
    pub(crate) fn not_found(kind: &'static str, name: impl ToString) -> Self {
        Self::NotFound { kind, name: name.to_string() }
    }
}
