//! Graph↔Tree codec.
//!
//! A graph is turned into a single tree so the transducer can rewrite it, and
//! the rewritten tree is turned back into a graph afterwards. Three policies
//! are supported:
//!
//! - `star`: one child per graph node, each carrying a `neighbor` wrapper per
//!   outgoing edge with a flat copy of the target.
//! - `canonical-root`: a depth-first expansion from a chosen root, with `edge`
//!   wrappers and `ref` placeholders where a cycle closes.
//! - `nested`: nodes grouped into `type_group` children. Edges are dropped.

mod canonical;
mod nested;
mod star;

use crate::{CodecError, CodecResult, Graph, GraphNode};
use arbor_core::{Attr, Properties, TreeNode, Value};
use std::fmt;
use std::str::FromStr;
use tracing::debug;

/// Root kind of `star` and `nested` encodings.
pub const GRAPH_KIND: &str = "graph";
/// Edge wrapper kind of the `star` encoding.
pub const NEIGHBOR_KIND: &str = "neighbor";
/// Edge wrapper kind of the `canonical-root` encoding.
pub const EDGE_KIND: &str = "edge";
/// Cycle-break placeholder kind of the `canonical-root` encoding.
pub const REF_KIND: &str = "ref";
/// Group kind of the `nested` encoding.
pub const TYPE_GROUP_KIND: &str = "type_group";

/// Label given to decoded edges whose wrapper carries none.
pub const DEFAULT_EDGE_LABEL: &str = "related";

/// How a graph is laid out as a tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum EncodingPolicy {
    #[default]
    Star,
    CanonicalRoot,
    Nested,
}

impl EncodingPolicy {
    pub fn name(&self) -> &'static str {
        match self {
            EncodingPolicy::Star => "star",
            EncodingPolicy::CanonicalRoot => "canonical-root",
            EncodingPolicy::Nested => "nested",
        }
    }

    /// Whether decoding reconstructs edges.
    pub fn preserves_edges(&self) -> bool {
        !matches!(self, EncodingPolicy::Nested)
    }
}

impl FromStr for EncodingPolicy {
    type Err = CodecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "star" => Ok(EncodingPolicy::Star),
            "canonical-root" => Ok(EncodingPolicy::CanonicalRoot),
            "nested" => Ok(EncodingPolicy::Nested),
            other => Err(CodecError::unknown_policy(other)),
        }
    }
}

impl fmt::Display for EncodingPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Codec options: the policy plus, for `canonical-root`, an optional root id.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GraphCodec {
    pub policy: EncodingPolicy,
    pub root: Option<String>,
}

impl GraphCodec {
    pub fn new(policy: EncodingPolicy) -> Self {
        Self { policy, root: None }
    }

    /// Build a codec from a policy name such as `"canonical-root"`.
    pub fn from_name(name: &str) -> CodecResult<Self> {
        Ok(Self::new(name.parse()?))
    }

    /// Root id for `canonical-root`. Ignored by the other policies.
    pub fn with_root(mut self, root: impl Into<String>) -> Self {
        self.root = Some(root.into());
        self
    }

    pub fn encode(&self, graph: &Graph) -> CodecResult<TreeNode> {
        debug!(
            policy = %self.policy,
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            "encoding graph"
        );
        let tree = match self.policy {
            EncodingPolicy::Star => star::encode(graph),
            EncodingPolicy::CanonicalRoot => canonical::encode(graph, self.root.as_deref())?,
            EncodingPolicy::Nested => nested::encode(graph),
        };
        debug!(policy = %self.policy, size = tree.size(), "encoded graph");
        Ok(tree)
    }

    pub fn decode(&self, tree: &TreeNode) -> Graph {
        let graph = match self.policy {
            EncodingPolicy::Star => star::decode(tree),
            EncodingPolicy::CanonicalRoot => canonical::decode(tree),
            EncodingPolicy::Nested => nested::decode(tree),
        };
        debug!(
            policy = %self.policy,
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            "decoded graph"
        );
        graph
    }
}

/// Encode `graph` under `policy`. `root` only applies to `canonical-root`.
pub fn encode(graph: &Graph, policy: EncodingPolicy, root: Option<&str>) -> CodecResult<TreeNode> {
    let codec = GraphCodec {
        policy,
        root: root.map(str::to_string),
    };
    codec.encode(graph)
}

/// Decode `tree` under `policy`.
pub fn decode(tree: &TreeNode, policy: EncodingPolicy) -> Graph {
    GraphCodec::new(policy).decode(tree)
}

/// Attributes-only encoding of a node: kind is the node type, name the id.
fn flat_node(node: &GraphNode) -> TreeNode {
    let mut tree = TreeNode::new(node.node_type.clone()).named(node.id.clone());
    tree.attrs = node
        .properties
        .iter()
        .map(|(key, value)| Attr::new(key.clone(), value.clone()))
        .collect();
    tree
}

/// Rebuild a node from its tree form. `ordinal` names nodes without a name.
fn node_from_tree(tree: &TreeNode, ordinal: usize) -> GraphNode {
    let id = tree
        .name
        .clone()
        .unwrap_or_else(|| format!("node_{}", ordinal));
    let properties: Properties = tree
        .attrs
        .iter()
        .map(|attr| (attr.key.clone(), attr.value.clone()))
        .collect();
    GraphNode::new(id, tree.kind.clone(), properties)
}

/// Edge label carried by a wrapper node.
fn wrapper_label(wrapper: &TreeNode) -> String {
    match wrapper.attr("label") {
        Some(Value::Null) | None => DEFAULT_EDGE_LABEL.to_string(),
        Some(value) => {
            let text = value.to_text();
            if text.is_empty() {
                DEFAULT_EDGE_LABEL.to_string()
            } else {
                text
            }
        }
    }
}
