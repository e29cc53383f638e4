//! Graph and codec error types.

use thiserror::Error;

/// Errors that can occur while building a graph.
#[derive(Debug, Error)]
pub enum GraphError {
    /// A node with the same id already exists.
    #[error("Duplicate node id '{0}'")]
    DuplicateNode(String),

    /// An edge with the same id already exists.
    #[error("Duplicate edge id '{0}'")]
    DuplicateEdge(String),

    /// Edge endpoint does not exist.
    #[error("Node not found: {0}")]
    NodeNotFound(String),
}

/// Result type for graph operations.
pub type GraphResult<T> = Result<T, GraphError>;

/// Errors raised by the Graph↔Tree codec.
#[derive(Debug, Error)]
pub enum CodecError {
    /// The policy name is not one of `star`, `canonical-root`, `nested`.
    #[error("Unknown encoding policy '{name}'")]
    UnknownPolicy { name: String },

    /// No node could serve as the canonical root.
    #[error("Cannot find root node (requested: {requested:?})")]
    NoRoot { requested: Option<String> },
}

impl CodecError {
    pub fn unknown_policy(name: impl Into<String>) -> Self {
        Self::UnknownPolicy { name: name.into() }
    }

    pub fn no_root(requested: Option<&str>) -> Self {
        Self::NoRoot {
            requested: requested.map(str::to_string),
        }
    }
}

/// Result type for codec operations.
pub type CodecResult<T> = Result<T, CodecError>;
