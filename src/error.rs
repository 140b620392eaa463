//! Error types for model loading, querying, and artifact writing.
//!
//! Structural defects (a malformed query expression, an unresolvable
//! namespace prefix, a broken XML document) are fatal and surface as
//! [`ModelError`]. Data defects — one guard failing to parse, one
//! attribute whose type cannot be resolved — never appear here; the
//! stages that hit them skip the offending item and continue.

use thiserror::Error;

/// Errors that indicate the tool or its schema assumptions are wrong.
#[derive(Debug, Error)]
pub enum ModelError {
    /// XML parsing error while loading the document.
    #[error("XML error: {0}")]
    Xml(String),

    /// A path expression that does not parse.
    #[error("invalid path expression `{path}`: {message}")]
    InvalidPath { path: String, message: String },

    /// A namespace-qualified path step whose prefix is not declared
    /// anywhere in the document.
    #[error("unknown namespace prefix `{0}`")]
    UnknownPrefix(String),

    /// IO error while reading the document.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ModelError {
    /// Create an XML error.
    pub fn xml(message: impl Into<String>) -> Self {
        Self::Xml(message.into())
    }

    /// Create an invalid-path error.
    pub fn invalid_path(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidPath {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// Errors raised while writing output artifacts.
#[derive(Debug, Error)]
pub enum ReportError {
    /// CSV serialization error.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// IO error during artifact writing.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
