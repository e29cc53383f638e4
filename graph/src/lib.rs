//! Arbor Graph
//!
//! This crate provides the labeled property graph and its tree encodings:
//! - Node and edge storage in insertion order
//! - Adjacency index: outgoing edges and incoming markers by node id
//! - Graph↔Tree codec under the `star`, `canonical-root` and `nested` policies

mod codec;
mod error;
mod graph;
mod index;

pub use codec::*;
pub use error::*;
pub use graph::*;
pub use index::AdjacencyIndex;
