//! Arbor Rule
//!
//! Macro tree transducer: rules, programs and the execution engine.
//!
//! Responsibilities:
//! - Output templates instantiated against bindings and parameters
//! - Rules grouped by control state and root kind
//! - First-match-wins dispatch with guards and identity fallback
//! - Bounded recursion across states with threaded parameters
//! - Tail calls run in a loop, so long cons lists fold in constant stack

mod config;
mod engine;
mod error;
mod program;
mod template;

pub use config::EngineConfig;
pub use engine::MttEngine;
pub use error::{RuleError, RuleResult};
pub use program::{MttProgram, MttRule};
pub use template::{TemplateAttr, TreeTemplate};

/// Default bound on nested `transform` invocations.
pub const DEFAULT_MAX_DEPTH: usize = 256;

/// Default bound on tail steps taken within one nested invocation.
pub const DEFAULT_MAX_STEPS: usize = 1_000_000;
