//! Fluent assertions over trees.
//!
//! ```ignore
//! assert_tree(&out)
//!     .kind("Emission")
//!     .attr("scope", 2i64)
//!     .attr_approx("co2_amount", 1500.0, 1e-9);
//! ```

use arbor_core::{TreeNode, Value};

/// Start asserting on `tree`.
pub fn assert_tree(tree: &TreeNode) -> TreeAssert<'_> {
    TreeAssert { tree, path: String::from("$") }
}

/// Chainable checks on one node. Failures panic with the node's path.
#[derive(Debug, Clone)]
pub struct TreeAssert<'t> {
    tree: &'t TreeNode,
    path: String,
}

impl<'t> TreeAssert<'t> {
    pub fn kind(self, expected: &str) -> Self {
        assert_eq!(self.tree.kind, expected, "kind at {}", self.path);
        self
    }

    pub fn name(self, expected: &str) -> Self {
        assert_eq!(self.tree.name.as_deref(), Some(expected), "name at {}", self.path);
        self
    }

    pub fn unnamed(self) -> Self {
        assert_eq!(self.tree.name, None, "name at {}", self.path);
        self
    }

    pub fn attr(self, key: &str, expected: impl Into<Value>) -> Self {
        let expected = expected.into();
        match self.tree.attr(key) {
            Some(actual) => assert!(
                actual.same_as(&expected),
                "attr '{}' at {}: expected {}, got {}",
                key,
                self.path,
                expected,
                actual
            ),
            None => panic!("attr '{}' missing at {} in {}", key, self.path, self.tree),
        }
        self
    }

    /// Numeric attribute within `tolerance` of `expected`.
    pub fn attr_approx(self, key: &str, expected: f64, tolerance: f64) -> Self {
        let actual = self
            .tree
            .attr(key)
            .and_then(Value::as_f64)
            .unwrap_or_else(|| panic!("attr '{}' at {} is not numeric", key, self.path));
        assert!(
            (actual - expected).abs() <= tolerance,
            "attr '{}' at {}: expected {} ± {}, got {}",
            key,
            self.path,
            expected,
            tolerance,
            actual
        );
        self
    }

    pub fn no_attr(self, key: &str) -> Self {
        assert!(self.tree.attr(key).is_none(), "unexpected attr '{}' at {}", key, self.path);
        self
    }

    pub fn children(self, expected: usize) -> Self {
        assert_eq!(self.tree.children.len(), expected, "child count at {}", self.path);
        self
    }

    /// Run `check` against child `index`.
    pub fn child(self, index: usize, check: impl FnOnce(TreeAssert<'t>)) -> Self {
        let child = self
            .tree
            .children
            .get(index)
            .unwrap_or_else(|| panic!("no child {} at {}", index, self.path));
        check(TreeAssert {
            tree: child,
            path: format!("{}.{}", self.path, index),
        });
        self
    }

    /// Child kinds, in order.
    pub fn child_kinds(self, expected: &[&str]) -> Self {
        let kinds: Vec<&str> = self.tree.children.iter().map(|c| c.kind.as_str()).collect();
        assert_eq!(kinds, expected, "child kinds at {}", self.path);
        self
    }

    pub fn equals(self, expected: &TreeNode) -> Self {
        assert_eq!(self.tree, expected, "subtree at {}", self.path);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> TreeNode {
        TreeNode::new("a")
            .named("root")
            .with_attr("n", 3i64)
            .with_attr("x", 0.1 + 0.2)
            .with_child(TreeNode::new("b"))
            .with_child(TreeNode::new("c").with_attr("k", "v"))
    }

    #[test]
    fn test_chained_checks() {
        assert_tree(&sample())
            .kind("a")
            .name("root")
            .attr("n", 3.0)
            .attr_approx("x", 0.3, 1e-9)
            .no_attr("missing")
            .child_kinds(&["b", "c"])
            .child(1, |c| {
                c.kind("c").unnamed().attr("k", "v");
            });
    }

    #[test]
    #[should_panic(expected = "kind at $.0")]
    fn test_failure_reports_path() {
        assert_tree(&sample()).child(0, |c| {
            c.kind("z");
        });
    }
}
