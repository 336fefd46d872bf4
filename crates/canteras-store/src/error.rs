//! Error types for document store access.

use std::path::PathBuf;

use canteras_types::CanterasError;
use thiserror::Error;

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;

/// Errors that can occur while reading from a document store.
#[derive(Error, Debug)]
pub enum StoreError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Server returned an error status.
    #[error("Server error: {status}")]
    ServerError {
        /// HTTP status code.
        status: u16,
    },

    /// The requested resource does not exist on the server.
    #[error("Not found: {0}")]
    NotFound(String),

    /// A response could not be decoded into documents.
    #[error("Decode error: {0}")]
    Decode(String),

    /// A document violates the data model.
    #[error(transparent)]
    Document(#[from] CanterasError),

    /// No export exists for the requested collection.
    #[error("Collection '{name}' not found in '{dir}'")]
    CollectionNotFound {
        /// The collection name.
        name: String,
        /// The export directory that was searched.
        dir: PathBuf,
    },

    /// Failed to read a file.
    #[error("Failed to read file '{path}': {source}")]
    ReadFile {
        /// The path that could not be read.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// Failed to write a file.
    #[error("Failed to write file '{path}': {source}")]
    WriteFile {
        /// The path that could not be written.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// Failed to parse a JSON export.
    #[error("Failed to parse export '{path}': {source}")]
    ParseJson {
        /// The path that could not be parsed.
        path: PathBuf,
        /// The underlying JSON error.
        source: serde_json::Error,
    },

    /// Failed to serialize JSON.
    #[error("Failed to serialize collection: {0}")]
    SerializeJson(#[from] serde_json::Error),

    /// Failed to parse the settings file.
    #[error("Failed to parse settings '{path}': {source}")]
    ParseSettings {
        /// The path that could not be parsed.
        path: PathBuf,
        /// The underlying TOML error.
        source: toml::de::Error,
    },

    /// The configuration is incomplete or inconsistent.
    #[error("Configuration error: {0}")]
    Config(String),
}
