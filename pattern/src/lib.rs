//! Arbor Pattern
//!
//! Match tree patterns, evaluate expressions.
//!
//! Responsibilities:
//! - Tree patterns (`kind_pattern`, `variable_pattern`, `wildcard`)
//! - Positional, total-or-nothing matching into borrowed bindings
//! - Expressions over bindings and positional parameters
//! - Built-in functions and binary operators

mod binding;
mod error;
mod eval;
mod expr;
mod matcher;
mod pattern;

pub use binding::Bindings;
pub use error::{PatternError, PatternResult};
pub use eval::{normalize_key, Evaluator, Scope};
pub use expr::{BinaryOp, Expression};
pub use matcher::Matcher;
pub use pattern::TreePattern;
