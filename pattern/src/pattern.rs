//! Tree patterns.

use arbor_core::Value;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A pattern tested against a single tree node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case", rename_all_fields = "camelCase")]
pub enum TreePattern {
    /// Matches a node of the given kind, with optional name, attribute and
    /// positional child constraints.
    KindPattern {
        kind: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        name_pattern: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        attr_patterns: Option<BTreeMap<String, Value>>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        child_patterns: Option<Vec<TreePattern>>,
        /// Bind the whole matched node under this name.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        bind: Option<String>,
    },
    /// Matches anything and binds it.
    VariablePattern { var_name: String },
    /// Matches anything, binds nothing.
    Wildcard,
    /// Any unrecognized `type` tag.
    #[serde(other)]
    Unsupported,
}

impl TreePattern {
    /// `kind_pattern` with no constraints beyond the kind.
    pub fn kind(kind: impl Into<String>) -> Self {
        TreePattern::KindPattern {
            kind: kind.into(),
            name_pattern: None,
            attr_patterns: None,
            child_patterns: None,
            bind: None,
        }
    }

    pub fn var(name: impl Into<String>) -> Self {
        TreePattern::VariablePattern {
            var_name: name.into(),
        }
    }

    pub fn wildcard() -> Self {
        TreePattern::Wildcard
    }

    /// Require an exact node name. No effect on non-kind patterns.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        if let TreePattern::KindPattern { name_pattern, .. } = &mut self {
            *name_pattern = Some(name.into());
        }
        self
    }

    /// Require an attribute value. No effect on non-kind patterns.
    pub fn with_attr(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        if let TreePattern::KindPattern { attr_patterns, .. } = &mut self {
            attr_patterns
                .get_or_insert_with(BTreeMap::new)
                .insert(key.into(), value.into());
        }
        self
    }

    /// Require exactly these children, in order. No effect on non-kind
    /// patterns.
    pub fn with_children(mut self, children: impl IntoIterator<Item = TreePattern>) -> Self {
        if let TreePattern::KindPattern { child_patterns, .. } = &mut self {
            *child_patterns = Some(children.into_iter().collect());
        }
        self
    }

    /// Bind the matched node. No effect on non-kind patterns.
    pub fn bind(mut self, name: impl Into<String>) -> Self {
        if let TreePattern::KindPattern { bind, .. } = &mut self {
            *bind = Some(name.into());
        }
        self
    }

    /// The root kind this pattern dispatches on, if it is a `kind_pattern`.
    pub fn root_kind(&self) -> Option<&str> {
        match self {
            TreePattern::KindPattern { kind, .. } => Some(kind),
            _ => None,
        }
    }
}
