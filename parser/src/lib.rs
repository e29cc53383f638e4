//! Arbor Parser
//!
//! This crate parses declarative YAML mapping documents:
//! - Metadata and constants sections
//! - Name-keyed transformation steps flattened into an operation list
//! - String expressions (`$.a.b` paths, `current_date`, bare variables)

mod ast;
mod error;
mod expr;
mod parser;

pub use ast::*;
pub use error::*;
pub use expr::{lower_expression, lower_str};
pub use parser::DslParser;
