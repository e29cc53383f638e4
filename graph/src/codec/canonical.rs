//! `canonical-root` policy: depth-first expansion from a single root.
//!
//! The visited set is the current DFS path, not every node seen so far. A
//! node reachable along several paths is expanded once per path, which keeps
//! the acyclic round trip exact but grows with the number of paths: a ladder
//! of k diamonds emits its bottom node 2^k times. Only an edge back onto the
//! current path becomes a `ref`. Decoding emits each id once.

use super::{flat_node, node_from_tree, wrapper_label, EDGE_KIND, REF_KIND};
use crate::index::AdjacencyIndex;
use crate::{CodecError, CodecResult, Graph, GraphEdge, GraphNode};
use arbor_core::TreeNode;
use std::collections::HashSet;
use tracing::trace;

/// Pick the traversal origin: the requested id, else the first node without
/// incoming edges, else the first node.
fn select_root<'g>(
    graph: &'g Graph,
    index: &AdjacencyIndex<'g>,
    requested: Option<&str>,
) -> CodecResult<&'g GraphNode> {
    if let Some(id) = requested {
        return index.node(id).ok_or_else(|| CodecError::no_root(Some(id)));
    }
    graph
        .nodes()
        .iter()
        .find(|n| !index.has_incoming(&n.id))
        .or_else(|| graph.nodes().first())
        .ok_or_else(|| CodecError::no_root(None))
}

pub(super) fn encode(graph: &Graph, requested: Option<&str>) -> CodecResult<TreeNode> {
    let index = graph.index();
    let root = select_root(graph, &index, requested)?;
    let mut path = HashSet::new();
    Ok(encode_subtree(root, &index, &mut path))
}

fn encode_subtree<'g>(
    node: &'g GraphNode,
    index: &AdjacencyIndex<'g>,
    path: &mut HashSet<&'g str>,
) -> TreeNode {
    if path.contains(node.id.as_str()) {
        trace!(id = %node.id, "cycle closed, emitting ref");
        return TreeNode::new(REF_KIND).with_attr("id", node.id.clone());
    }
    path.insert(node.id.as_str());

    let mut tree = flat_node(node);
    for edge in index.outgoing(&node.id) {
        if let Some(target) = index.node(&edge.target_id) {
            let wrapper = TreeNode::new(EDGE_KIND)
                .with_attr("label", edge.label.clone())
                .with_child(encode_subtree(target, index, path));
            tree.children.push(wrapper);
        }
    }

    path.remove(node.id.as_str());
    tree
}

pub(super) fn decode(tree: &TreeNode) -> Graph {
    let mut decoder = Decoder::default();
    decoder.visit(tree);
    Graph::from_parts(decoder.nodes, decoder.edges)
}

#[derive(Default)]
struct Decoder {
    nodes: Vec<GraphNode>,
    edges: Vec<GraphEdge>,
    seen: HashSet<String>,
}

impl Decoder {
    /// Decode a subtree, returning the id of the node it stands for.
    fn visit(&mut self, tree: &TreeNode) -> Option<String> {
        if tree.kind == REF_KIND {
            return None;
        }

        let node = node_from_tree(tree, self.nodes.len());
        let id = node.id.clone();
        if !self.seen.insert(id.clone()) {
            // Already emitted along an earlier path, edges included.
            return Some(id);
        }
        self.nodes.push(node);

        for wrapper in tree.children.iter().filter(|c| c.kind == EDGE_KIND) {
            let Some(target) = wrapper.children.first() else {
                continue;
            };
            if let Some(target_id) = self.visit(target) {
                let edge = GraphEdge::new(
                    format!("edge_{}", self.edges.len()),
                    wrapper_label(wrapper),
                    id.clone(),
                    target_id,
                );
                self.edges.push(edge);
            }
        }
        Some(id)
    }
}
