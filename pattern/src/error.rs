//! Pattern error types.

use thiserror::Error;

/// Errors that can occur during matching or expression evaluation.
///
/// A pattern that simply does not match is not an error.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PatternError {
    /// Unbound variable or out-of-range parameter.
    #[error("Unbound variable '{name}'")]
    UnboundVariable { name: String },

    /// Unrecognized pattern, expression, operator or function.
    #[error("Unsupported {construct}")]
    UnsupportedConstruct { construct: String },

    /// Type mismatch in expression.
    #[error("type error: {message}")]
    TypeError { message: String },

    /// Division by zero.
    #[error("Division by zero")]
    DivisionByZero,
}

impl PatternError {
    pub fn unbound_variable(name: impl Into<String>) -> Self {
        Self::UnboundVariable { name: name.into() }
    }

    pub fn unsupported(construct: impl Into<String>) -> Self {
        Self::UnsupportedConstruct {
            construct: construct.into(),
        }
    }

    pub fn type_error(message: impl Into<String>) -> Self {
        Self::TypeError {
            message: message.into(),
        }
    }
}

/// Result type for pattern operations.
pub type PatternResult<T> = Result<T, PatternError>;
