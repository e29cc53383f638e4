//! Adjacency index for codec walks.

use crate::{Graph, GraphEdge, GraphNode};
use std::collections::{HashMap, HashSet};

/// Borrowed lookup tables over a graph:
/// node id -> node, node id -> outgoing edges (in edge order), and the set of
/// ids that are the target of at least one edge.
#[derive(Debug)]
pub struct AdjacencyIndex<'g> {
    nodes: HashMap<&'g str, &'g GraphNode>,
    outgoing: HashMap<&'g str, Vec<&'g GraphEdge>>,
    targeted: HashSet<&'g str>,
}

impl<'g> AdjacencyIndex<'g> {
    pub fn build(graph: &'g Graph) -> Self {
        let mut nodes = HashMap::new();
        for node in graph.nodes() {
            // First occurrence wins for graphs assembled without validation.
            nodes.entry(node.id.as_str()).or_insert(node);
        }

        let mut outgoing: HashMap<&str, Vec<&GraphEdge>> = HashMap::new();
        let mut targeted = HashSet::new();
        for edge in graph.edges() {
            outgoing.entry(edge.source_id.as_str()).or_default().push(edge);
            targeted.insert(edge.target_id.as_str());
        }

        Self {
            nodes,
            outgoing,
            targeted,
        }
    }

    pub fn node(&self, id: &str) -> Option<&'g GraphNode> {
        self.nodes.get(id).copied()
    }

    pub fn outgoing(&self, id: &str) -> &[&'g GraphEdge] {
        self.outgoing.get(id).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn has_incoming(&self, id: &str) -> bool {
        self.targeted.contains(id)
    }
}
