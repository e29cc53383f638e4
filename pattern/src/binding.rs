//! Variable bindings for pattern matching.

use arbor_core::TreeNode;
use std::collections::HashMap;

/// Names bound to subtrees of the tree being matched.
///
/// Bindings borrow from the input tree and live only for the rule
/// application that produced them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Bindings<'t> {
    map: HashMap<String, &'t TreeNode>,
}

impl<'t> Bindings<'t> {
    /// Create new empty bindings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create bindings with a single entry.
    pub fn with(name: impl Into<String>, node: &'t TreeNode) -> Self {
        let mut bindings = Self::new();
        bindings.insert(name, node);
        bindings
    }

    /// Insert a binding. A later binding of the same name wins.
    pub fn insert(&mut self, name: impl Into<String>, node: &'t TreeNode) {
        self.map.insert(name.into(), node);
    }

    /// Get a bound subtree by name.
    pub fn get(&self, name: &str) -> Option<&'t TreeNode> {
        self.map.get(name).copied()
    }

    /// Check if a variable is bound.
    pub fn contains(&self, name: &str) -> bool {
        self.map.contains_key(name)
    }

    /// Get all variable names.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.map.keys().map(|s| s.as_str())
    }

    /// Get the number of bindings.
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Check if empty.
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Iterate over bindings.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &'t TreeNode)> {
        self.map.iter().map(|(k, v)| (k.as_str(), *v))
    }
}
