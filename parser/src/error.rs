//! Parser error types.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while reading a mapping document.
#[derive(Debug, Error)]
pub enum ParseError {
    /// The text is not YAML of the expected shape.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// The document file could not be read.
    #[error("Cannot read '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Well-formed YAML with missing or inconsistent content.
    #[error("Invalid document: {message}")]
    InvalidDocument { message: String },
}

impl ParseError {
    pub fn invalid_document(message: impl Into<String>) -> Self {
        Self::InvalidDocument {
            message: message.into(),
        }
    }
}

/// Result type for parsing operations.
pub type ParseResult<T> = Result<T, ParseError>;
