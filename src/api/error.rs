//! Error types for the library API.

use thiserror::Error;

/// Errors surfaced by the prompt library, importer and dispatcher.
///
/// None of these are fatal: every failing operation leaves the previous
/// state in place and reports one of these to the caller.
#[derive(Error, Debug)]
pub enum StoreError {
    /// A required field was empty. Nothing was changed.
    #[error("{0}")]
    Validation(String),

    /// An import file could not be understood. The live library is untouched.
    #[error("Invalid import file: {0}")]
    Format(String),

    /// A destination or setting is missing or unknown.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Reading or writing persistent storage failed.
    #[error("Storage error: {0}")]
    Storage(String),

    /// The clipboard could not be reached or written.
    #[error("Clipboard error: {0}")]
    Clipboard(String),

    /// The browser tab could not be opened.
    #[error("Unable to open {url}: {reason}")]
    Browser { url: String, reason: String },

    /// Failed to serialize or deserialize data.
    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),
}

impl StoreError {
    pub(crate) fn validation(msg: impl Into<String>) -> Self {
        StoreError::Validation(msg.into())
    }

    pub(crate) fn format(msg: impl Into<String>) -> Self {
        StoreError::Format(msg.into())
    }

    pub(crate) fn config(msg: impl Into<String>) -> Self {
        StoreError::Config(msg.into())
    }
}
