//! Rule error types.

use arbor_pattern::PatternError;
use thiserror::Error;

/// Result type for rule operations.
pub type RuleResult<T> = Result<T, RuleError>;

/// Errors that abort a transformation.
#[derive(Debug, Error)]
pub enum RuleError {
    #[error("Unknown state '{state}'")]
    UnknownState { state: String },

    #[error("Unbound variable '{name}'")]
    UnboundVariable { name: String },

    #[error("Unsupported {construct}")]
    UnsupportedConstruct { construct: String },

    #[error("Maximum recursion depth ({depth}) exceeded")]
    MaxDepthExceeded { depth: usize },

    #[error("Step limit ({steps}) exceeded")]
    StepLimitExceeded { steps: usize },

    #[error("Invalid program: {message}")]
    InvalidProgram { message: String },

    #[error(transparent)]
    Pattern(PatternError),
}

impl RuleError {
    pub fn unknown_state(state: impl Into<String>) -> Self {
        Self::UnknownState {
            state: state.into(),
        }
    }

    pub fn unbound_variable(name: impl Into<String>) -> Self {
        Self::UnboundVariable { name: name.into() }
    }

    pub fn unsupported(construct: impl Into<String>) -> Self {
        Self::UnsupportedConstruct {
            construct: construct.into(),
        }
    }

    pub fn max_depth_exceeded(depth: usize) -> Self {
        Self::MaxDepthExceeded { depth }
    }

    pub fn step_limit_exceeded(steps: usize) -> Self {
        Self::StepLimitExceeded { steps }
    }

    pub fn invalid_program(message: impl Into<String>) -> Self {
        Self::InvalidProgram {
            message: message.into(),
        }
    }
}

impl From<PatternError> for RuleError {
    fn from(e: PatternError) -> Self {
        match e {
            PatternError::UnboundVariable { name } => Self::UnboundVariable { name },
            PatternError::UnsupportedConstruct { construct } => {
                Self::UnsupportedConstruct { construct }
            }
            other => Self::Pattern(other),
        }
    }
}
