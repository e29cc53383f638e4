//! Compiler error types.

use arbor_parser::ParseError;
use arbor_rule::RuleError;
use thiserror::Error;

/// Result type for compilation.
pub type CompileResult<T> = Result<T, CompileError>;

/// Errors that can occur during compilation.
#[derive(Debug, Error)]
pub enum CompileError {
    /// Parse error from the parser.
    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),

    /// A document constant has an unusable shape.
    #[error("Invalid constant '{name}': {message}")]
    InvalidConstant { name: String, message: String },

    /// The generated program failed validation.
    #[error("Invalid generated program: {0}")]
    Program(#[from] RuleError),
}

impl CompileError {
    pub fn invalid_constant(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidConstant {
            name: name.into(),
            message: message.into(),
        }
    }
}
