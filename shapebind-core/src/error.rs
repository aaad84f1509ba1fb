//! Error types for shapebind-core

use thiserror::Error;

/// Result type for binding operations
pub type Result<T> = std::result::Result<T, BindError>;

/// Errors produced while constructing, validating, linking, or serializing
/// an object graph
#[derive(Debug, Error)]
pub enum BindError {
    /// A value violated a property constraint
    ///
    /// Recoverable: reported through the `ErrorHandler`, which decides
    /// whether processing continues.
    #[error("Validation failed at {path}: {message}")]
    Validation { path: String, message: String },

    /// An object violated a structural rule (node kind, malformed record)
    ///
    /// Fatal to the current object; a permissive handler may continue with
    /// the rest of the document.
    #[error("Structural error at {path}: {message}")]
    Structural { path: String, message: String },

    /// A declared type could not be resolved to an instantiable class
    #[error("Cannot instantiate type {iri}: {message}")]
    Type { iri: String, message: String },

    /// The serialized form had an unexpected shape
    #[error("Decode error at {path}: {message}")]
    Decode { path: String, message: String },

    /// A pattern constraint failed to compile
    #[error("Invalid regex pattern '{pattern}': {message}")]
    InvalidPattern { pattern: String, message: String },

    /// JSON parsing or emission error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error from the underlying stream, propagated unchanged
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl BindError {
    /// Create a validation error
    pub fn validation(path: impl Into<String>, message: impl Into<String>) -> Self {
        BindError::Validation {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create a structural error
    pub fn structural(path: impl Into<String>, message: impl Into<String>) -> Self {
        BindError::Structural {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create a type resolution error
    pub fn type_error(iri: impl Into<String>, message: impl Into<String>) -> Self {
        BindError::Type {
            iri: iri.into(),
            message: message.into(),
        }
    }

    /// Create a decode error
    pub fn decode(path: impl Into<String>, message: impl Into<String>) -> Self {
        BindError::Decode {
            path: path.into(),
            message: message.into(),
        }
    }
}
