//! Arbor Core Types
//!
//! This crate provides the foundational types used throughout Arbor:
//! - Value types (the Value enum with scalars, subtrees and keyed maps)
//! - The labeled ordered tree every transducer component operates on
//! - Property maps and the `attrs!` helper macro

mod tree;
mod value;

pub use tree::*;
pub use value::*;
