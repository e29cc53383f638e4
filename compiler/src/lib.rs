//! Arbor Compiler
//!
//! Lower mapping documents into transducer programs.
//!
//! Responsibilities:
//! - Group document operations into compilation units
//! - Generic lowering of match/create/set/aggregate into rules
//! - Hand-wired energy-to-emission rules driven by document constants
//! - Fresh state and rule names from an owned generator

mod error;
mod generic;
mod ghg;
mod names;

pub use error::{CompileError, CompileResult};
pub use generic::{compile, DslCompiler, DISPATCH_STATE, INITIAL_STATE};
pub use ghg::{GhgCompiler, AGGREGATE_STATE, EMISSION_STATE};
pub use names::NameGen;
