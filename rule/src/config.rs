//! Engine configuration.

use crate::{DEFAULT_MAX_DEPTH, DEFAULT_MAX_STEPS};
use serde::{Deserialize, Serialize};

/// Limits applied by the engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Maximum number of nested `transform` invocations.
    pub max_depth: usize,
    /// Maximum number of tail steps (`variable_template` or `recursive_call`
    /// as a whole rule output) within one invocation.
    pub max_steps: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            max_steps: DEFAULT_MAX_STEPS,
        }
    }
}

impl EngineConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn with_max_steps(mut self, max_steps: usize) -> Self {
        self.max_steps = max_steps;
        self
    }
}
