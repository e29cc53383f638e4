//! Harness error types.

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Result type for harness operations.
pub type HarnessResult<T> = Result<T, HarnessError>;

/// Errors raised while loading fixtures or running a pipeline.
#[derive(Debug, Error)]
pub enum HarnessError {
    #[error("Cannot read fixture '{}': {source}", .path.display())]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed fixture '{}': {message}", .path.display())]
    Fixture { path: PathBuf, message: String },

    #[error(transparent)]
    Parse(#[from] arbor_parser::ParseError),

    #[error(transparent)]
    Compile(#[from] arbor_compiler::CompileError),

    #[error(transparent)]
    Codec(#[from] arbor_graph::CodecError),

    #[error(transparent)]
    Rule(#[from] arbor_rule::RuleError),
}

impl HarnessError {
    pub fn file_read(path: &Path, source: std::io::Error) -> Self {
        Self::FileRead {
            path: path.to_path_buf(),
            source,
        }
    }

    pub fn fixture(path: &Path, message: impl Into<String>) -> Self {
        Self::Fixture {
            path: path.to_path_buf(),
            message: message.into(),
        }
    }
}
