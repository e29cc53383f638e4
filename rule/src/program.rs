//! Rules and programs.

use crate::{RuleError, RuleResult, TreeTemplate};
use arbor_pattern::{Expression, TreePattern};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// A single transducer rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MttRule {
    pub name: String,
    pub state: String,
    pub input_pattern: TreePattern,
    /// Declared parameter names, readable by name or as `param<N>`.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub parameters: Vec<String>,
    pub output_template: TreeTemplate,
    /// Extra condition; the rule applies only when it evaluates truthy.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub guard: Option<Expression>,
}

impl MttRule {
    pub fn new(
        name: impl Into<String>,
        state: impl Into<String>,
        input_pattern: TreePattern,
        output_template: TreeTemplate,
    ) -> Self {
        Self {
            name: name.into(),
            state: state.into(),
            input_pattern,
            parameters: Vec::new(),
            output_template,
            guard: None,
        }
    }

    pub fn with_parameters<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.parameters = names.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_guard(mut self, guard: Expression) -> Self {
        self.guard = Some(guard);
        self
    }
}

/// An ordered rule list plus the state a run starts in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MttProgram {
    pub rules: Vec<MttRule>,
    pub initial_state: String,
}

impl MttProgram {
    pub fn new(initial_state: impl Into<String>) -> Self {
        Self {
            rules: Vec::new(),
            initial_state: initial_state.into(),
        }
    }

    /// Append a rule. Declaration order is match priority.
    pub fn push(&mut self, rule: MttRule) {
        self.rules.push(rule);
    }

    pub fn with_rule(mut self, rule: MttRule) -> Self {
        self.push(rule);
        self
    }

    /// Load a program from YAML text.
    pub fn from_yaml_str(source: &str) -> RuleResult<Self> {
        serde_yaml::from_str(source).map_err(|e| RuleError::invalid_program(e.to_string()))
    }

    /// Load a program from JSON text.
    pub fn from_json_str(source: &str) -> RuleResult<Self> {
        serde_json::from_str(source).map_err(|e| RuleError::invalid_program(e.to_string()))
    }

    pub fn to_json_string(&self) -> RuleResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| RuleError::invalid_program(e.to_string()))
    }

    /// Find a rule by name.
    pub fn rule(&self, name: &str) -> Option<&MttRule> {
        self.rules.iter().find(|r| r.name == name)
    }

    /// The state a named rule lives in.
    pub fn state_of(&self, rule_name: &str) -> Option<&str> {
        self.rule(rule_name).map(|r| r.state.as_str())
    }

    /// Declared states in first-declaration order.
    pub fn states(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        self.rules
            .iter()
            .map(|r| r.state.as_str())
            .filter(|s| seen.insert(*s))
            .collect()
    }

    pub fn rules_in<'a>(&'a self, state: &'a str) -> impl Iterator<Item = &'a MttRule> + 'a {
        self.rules.iter().filter(move |r| r.state == state)
    }

    /// Check that the initial state and every `recursive_call` target are
    /// declared by some rule.
    ///
    /// The engine does not require this; undeclared states only fail when
    /// reached.
    pub fn validate(&self) -> RuleResult<()> {
        let states: HashSet<&str> = self.rules.iter().map(|r| r.state.as_str()).collect();
        if !self.rules.is_empty() && !states.contains(self.initial_state.as_str()) {
            return Err(RuleError::invalid_program(format!(
                "initial state '{}' has no rules",
                self.initial_state
            )));
        }
        for rule in &self.rules {
            for target in rule.output_template.called_states() {
                if !states.contains(target) {
                    return Err(RuleError::invalid_program(format!(
                        "rule '{}' calls undeclared state '{}'",
                        rule.name, target
                    )));
                }
            }
        }
        Ok(())
    }
}
