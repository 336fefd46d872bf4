//! Error types for canteras.

use thiserror::Error;

/// Result type alias for canteras operations.
pub type Result<T> = std::result::Result<T, CanterasError>;

/// Errors that can occur while reading and interpreting roster documents.
#[derive(Error, Debug)]
pub enum CanterasError {
    /// A document field holds a value outside the six supported kinds.
    #[error("Unsupported value of kind '{kind}' in field '{field}'")]
    UnsupportedValue {
        /// The field that held the value.
        field: String,
        /// The kind reported by the source.
        kind: String,
    },

    /// A required field is absent from a document.
    #[error("Document '{id}' is missing field '{field}'")]
    MissingField {
        /// The document identifier.
        id: String,
        /// The missing field name.
        field: &'static str,
    },

    /// A field is present but holds the wrong kind of value.
    #[error("Document '{id}' has an invalid '{field}' field: {reason}")]
    InvalidField {
        /// The document identifier.
        id: String,
        /// The offending field name.
        field: &'static str,
        /// Why the value was rejected.
        reason: String,
    },

    /// A document identifier is empty or contains a path separator.
    #[error("Invalid document identifier: {0:?}")]
    InvalidIdentifier(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
