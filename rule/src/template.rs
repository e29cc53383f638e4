//! Output templates.

use arbor_pattern::Expression;
use serde::{Deserialize, Serialize};

/// One attribute of a `node_template`: a key and the expression producing its
/// value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemplateAttr {
    pub key: String,
    pub value: Expression,
}

impl TemplateAttr {
    pub fn new(key: impl Into<String>, value: Expression) -> Self {
        Self {
            key: key.into(),
            value,
        }
    }
}

/// The right-hand side of a rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case", rename_all_fields = "camelCase")]
pub enum TreeTemplate {
    /// Build a node; children are instantiated in the same scope.
    NodeTemplate {
        kind: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        name: Option<Expression>,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        attrs: Vec<TemplateAttr>,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        children: Vec<TreeTemplate>,
    },
    /// Keep rewriting a bound subtree in the current state with the current
    /// parameters.
    VariableTemplate { var_name: String },
    /// Rewrite a bound subtree in another state with new parameters.
    RecursiveCall {
        state: String,
        child_var: String,
        #[serde(default)]
        params: Vec<Expression>,
    },
    /// Wrap the instantiated elements in a `list` node.
    ListTemplate { elements: Vec<TreeTemplate> },
    /// Any unrecognized `type` tag.
    #[serde(other)]
    Unsupported,
}

impl TreeTemplate {
    /// `node_template` with no name, attributes or children.
    pub fn node(kind: impl Into<String>) -> Self {
        TreeTemplate::NodeTemplate {
            kind: kind.into(),
            name: None,
            attrs: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn var(name: impl Into<String>) -> Self {
        TreeTemplate::VariableTemplate {
            var_name: name.into(),
        }
    }

    pub fn call(state: impl Into<String>, child_var: impl Into<String>, params: Vec<Expression>) -> Self {
        TreeTemplate::RecursiveCall {
            state: state.into(),
            child_var: child_var.into(),
            params,
        }
    }

    pub fn list(elements: Vec<TreeTemplate>) -> Self {
        TreeTemplate::ListTemplate { elements }
    }

    /// Set the name expression. No effect on non-node templates.
    pub fn with_name(mut self, expr: Expression) -> Self {
        if let TreeTemplate::NodeTemplate { name, .. } = &mut self {
            *name = Some(expr);
        }
        self
    }

    /// Append an attribute. No effect on non-node templates.
    pub fn with_attr(mut self, key: impl Into<String>, value: Expression) -> Self {
        if let TreeTemplate::NodeTemplate { attrs, .. } = &mut self {
            attrs.push(TemplateAttr::new(key, value));
        }
        self
    }

    /// Append a child template. No effect on non-node templates.
    pub fn with_child(mut self, child: TreeTemplate) -> Self {
        if let TreeTemplate::NodeTemplate { children, .. } = &mut self {
            children.push(child);
        }
        self
    }

    /// States targeted by `recursive_call`s anywhere in this template.
    pub fn called_states(&self) -> Vec<&str> {
        let mut states = Vec::new();
        self.collect_called_states(&mut states);
        states
    }

    fn collect_called_states<'a>(&'a self, out: &mut Vec<&'a str>) {
        match self {
            TreeTemplate::NodeTemplate { children, .. } => {
                children.iter().for_each(|c| c.collect_called_states(out))
            }
            TreeTemplate::ListTemplate { elements } => {
                elements.iter().for_each(|c| c.collect_called_states(out))
            }
            TreeTemplate::RecursiveCall { state, .. } => out.push(state),
            TreeTemplate::VariableTemplate { .. } | TreeTemplate::Unsupported => {}
        }
    }
}
