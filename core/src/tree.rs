//! Labeled ordered trees.
//!
//! A `TreeNode` exclusively owns its attributes and children; there is no
//! sharing and no parent pointer. Attribute order is insertion order. It is
//! significant for display but lookups are by key.

use crate::Value;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of the synthetic node produced by list templates and cons lists.
pub const LIST_KIND: &str = "list";

/// Kind of the empty cons list.
pub const NIL_KIND: &str = "nil";

/// A single key/value attribute.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attr {
    pub key: String,
    pub value: Value,
}

impl Attr {
    pub fn new(key: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// A labeled tree node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TreeNode {
    /// Dispatch label.
    pub kind: String,
    /// Optional node identifier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Ordered attributes.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attrs: Vec<Attr>,
    /// Ordered children.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<TreeNode>,
}

impl TreeNode {
    /// Create a leaf node with no name and no attributes.
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            name: None,
            attrs: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Set the node name.
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Append an attribute.
    pub fn with_attr(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.attrs.push(Attr::new(key, value));
        self
    }

    /// Append a child.
    pub fn with_child(mut self, child: TreeNode) -> Self {
        self.children.push(child);
        self
    }

    /// Append several children.
    pub fn with_children(mut self, children: impl IntoIterator<Item = TreeNode>) -> Self {
        self.children.extend(children);
        self
    }

    /// Look up an attribute value by key.
    pub fn attr(&self, key: &str) -> Option<&Value> {
        self.attrs.iter().find(|a| a.key == key).map(|a| &a.value)
    }

    /// Set an attribute, replacing the value in place if the key exists.
    pub fn set_attr(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        let key = key.into();
        let value = value.into();
        match self.attrs.iter_mut().find(|a| a.key == key) {
            Some(attr) => attr.value = value,
            None => self.attrs.push(Attr { key, value }),
        }
    }

    /// Returns true if this node has no children.
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Number of nodes in this subtree, including this one.
    pub fn size(&self) -> usize {
        1 + self.children.iter().map(TreeNode::size).sum::<usize>()
    }

    /// Height of this subtree; a leaf has depth 1.
    pub fn depth(&self) -> usize {
        1 + self.children.iter().map(TreeNode::depth).max().unwrap_or(0)
    }

    /// Build `list(h1, list(h2, ... nil))` from the given items.
    pub fn cons_list(items: impl IntoIterator<Item = TreeNode>) -> Self {
        let items: Vec<TreeNode> = items.into_iter().collect();
        items
            .into_iter()
            .rev()
            .fold(TreeNode::new(NIL_KIND), |tail, head| {
                TreeNode::new(LIST_KIND).with_child(head).with_child(tail)
            })
    }

    /// Flatten a cons list back into its items. Returns None if the tree is
    /// not a well-formed cons list.
    pub fn cons_items(&self) -> Option<Vec<&TreeNode>> {
        let mut items = Vec::new();
        let mut current = self;
        loop {
            match (current.kind.as_str(), current.children.as_slice()) {
                (NIL_KIND, []) => return Some(items),
                (LIST_KIND, [head, tail]) => {
                    items.push(head);
                    current = tail;
                }
                _ => return None,
            }
        }
    }
}

impl fmt::Display for TreeNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.kind)?;
        if let Some(name) = &self.name {
            write!(f, "#{}", name)?;
        }
        if !self.attrs.is_empty() {
            write!(f, "[")?;
            for (i, attr) in self.attrs.iter().enumerate() {
                if i > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{}={}", attr.key, attr.value)?;
            }
            write!(f, "]")?;
        }
        if !self.children.is_empty() {
            write!(f, "(")?;
            for (i, child) in self.children.iter().enumerate() {
                if i > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{}", child)?;
            }
            write!(f, ")")?;
        }
        Ok(())
    }
}
