//! Pattern matching against tree nodes.

use crate::{Bindings, PatternError, PatternResult, TreePattern};
use arbor_core::TreeNode;

/// Structural matcher.
///
/// Matching is positional and total-or-nothing: a failed attempt leaves no
/// bindings behind.
#[derive(Debug, Clone, Copy, Default)]
pub struct Matcher;

impl Matcher {
    /// Create a new matcher.
    pub fn new() -> Self {
        Self
    }

    /// Match `pattern` against `tree`.
    ///
    /// Returns `Ok(None)` when the pattern does not match. Errors are reserved
    /// for patterns the matcher cannot interpret.
    pub fn match_node<'t>(
        &self,
        pattern: &TreePattern,
        tree: &'t TreeNode,
    ) -> PatternResult<Option<Bindings<'t>>> {
        let mut bindings = Bindings::new();
        if self.match_into(pattern, tree, &mut bindings)? {
            Ok(Some(bindings))
        } else {
            Ok(None)
        }
    }

    /// Check whether `pattern` matches `tree` without keeping bindings.
    pub fn matches(&self, pattern: &TreePattern, tree: &TreeNode) -> PatternResult<bool> {
        Ok(self.match_node(pattern, tree)?.is_some())
    }

    fn match_into<'t>(
        &self,
        pattern: &TreePattern,
        tree: &'t TreeNode,
        bindings: &mut Bindings<'t>,
    ) -> PatternResult<bool> {
        match pattern {
            TreePattern::KindPattern {
                kind,
                name_pattern,
                attr_patterns,
                child_patterns,
                bind,
            } => {
                if *kind != tree.kind {
                    return Ok(false);
                }
                if let Some(name) = name_pattern {
                    if tree.name.as_deref() != Some(name.as_str()) {
                        return Ok(false);
                    }
                }
                if let Some(constraints) = attr_patterns {
                    for (key, expected) in constraints {
                        match tree.attr(key) {
                            Some(actual) if actual.same_as(expected) => {}
                            _ => return Ok(false),
                        }
                    }
                }
                if let Some(children) = child_patterns {
                    if children.len() != tree.children.len() {
                        return Ok(false);
                    }
                    for (child_pattern, child) in children.iter().zip(&tree.children) {
                        if !self.match_into(child_pattern, child, bindings)? {
                            return Ok(false);
                        }
                    }
                }
                if let Some(name) = bind {
                    bindings.insert(name.clone(), tree);
                }
                Ok(true)
            }
            TreePattern::VariablePattern { var_name } => {
                bindings.insert(var_name.clone(), tree);
                Ok(true)
            }
            TreePattern::Wildcard => Ok(true),
            TreePattern::Unsupported => Err(PatternError::unsupported("pattern type")),
        }
    }
}
