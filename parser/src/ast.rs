//! Abstract Syntax Tree for mapping documents.

use arbor_core::Value;
use arbor_pattern::Expression;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// ==================== Document ====================

/// A parsed mapping document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DslProgram {
    pub metadata: DslMetadata,
    pub constants: BTreeMap<String, Value>,
    pub operations: Vec<DslOperation>,
}

impl DslProgram {
    pub fn constant(&self, name: &str) -> Option<&Value> {
        self.constants.get(name)
    }

    /// Number of operations including those nested in `match` bodies.
    pub fn operation_count(&self) -> usize {
        fn count(ops: &[DslOperation]) -> usize {
            ops.iter()
                .map(|op| match op {
                    DslOperation::Match { body, .. } => 1 + count(body),
                    _ => 1,
                })
                .sum()
        }
        count(&self.operations)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DslMetadata {
    pub name: String,
    pub version: String,
    pub source_ontology: String,
    pub target_ontology: String,
    pub description: String,
}

impl Default for DslMetadata {
    fn default() -> Self {
        Self {
            name: "Unnamed".to_string(),
            version: "1.0".to_string(),
            source_ontology: String::new(),
            target_ontology: String::new(),
            description: String::new(),
        }
    }
}

// ==================== Operations ====================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DslOperation {
    /// For every node matching `pattern`, run `body` with the node bound to
    /// `variable`.
    Match {
        pattern: DslPattern,
        variable: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        condition: Option<Expression>,
        body: Vec<DslOperation>,
    },
    /// Emit a node of `node_type`.
    CreateNode {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        id: Option<Expression>,
        node_type: String,
        properties: BTreeMap<String, Expression>,
    },
    /// Set `key` on the node aliased by `target`.
    SetProperty {
        target: String,
        key: String,
        value: Expression,
    },
    /// Fold a list of nodes into a single value.
    Aggregate {
        group_by: Vec<Expression>,
        variable: String,
        function: AggregateFunction,
    },
}

impl DslOperation {
    pub fn kind_name(&self) -> &'static str {
        match self {
            DslOperation::Match { .. } => "match",
            DslOperation::CreateNode { .. } => "create_node",
            DslOperation::SetProperty { .. } => "set_property",
            DslOperation::Aggregate { .. } => "aggregate",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DslPattern {
    /// A node of a given type with attribute equality filters.
    Node {
        variable: String,
        node_type: String,
        #[serde(default)]
        properties: BTreeMap<String, Value>,
    },
    /// Any node.
    Variable { name: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AggregateFunction {
    Sum { field: String },
    Count { field: Option<String> },
    Avg { field: String },
    Min { field: String },
    Max { field: String },
}

impl AggregateFunction {
    /// Build from a function name. Unknown names fold as `sum`.
    pub fn from_name(name: &str, field: impl Into<String>) -> Self {
        let field = field.into();
        match name {
            "count" => AggregateFunction::Count { field: Some(field) },
            "avg" => AggregateFunction::Avg { field },
            "min" => AggregateFunction::Min { field },
            "max" => AggregateFunction::Max { field },
            _ => AggregateFunction::Sum { field },
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            AggregateFunction::Sum { .. } => "sum",
            AggregateFunction::Count { .. } => "count",
            AggregateFunction::Avg { .. } => "avg",
            AggregateFunction::Min { .. } => "min",
            AggregateFunction::Max { .. } => "max",
        }
    }

    pub fn field(&self) -> Option<&str> {
        match self {
            AggregateFunction::Count { field } => field.as_deref(),
            AggregateFunction::Sum { field }
            | AggregateFunction::Avg { field }
            | AggregateFunction::Min { field }
            | AggregateFunction::Max { field } => Some(field),
        }
    }
}
