//! `nested` policy: nodes grouped by type, edges discarded.

use super::{flat_node, node_from_tree, GRAPH_KIND, TYPE_GROUP_KIND};
use crate::{Graph, GraphNode};
use arbor_core::TreeNode;

pub(super) fn encode(graph: &Graph) -> TreeNode {
    let mut groups: Vec<(&str, Vec<&GraphNode>)> = Vec::new();
    for node in graph.nodes() {
        match groups.iter().position(|(ty, _)| *ty == node.node_type) {
            Some(i) => groups[i].1.push(node),
            None => groups.push((node.node_type.as_str(), vec![node])),
        }
    }

    let children = groups.into_iter().map(|(ty, members)| {
        TreeNode::new(TYPE_GROUP_KIND)
            .with_attr("type", ty)
            .with_children(members.into_iter().map(flat_node))
    });
    TreeNode::new(GRAPH_KIND).with_children(children)
}

pub(super) fn decode(tree: &TreeNode) -> Graph {
    let mut nodes = Vec::new();
    if tree.kind == GRAPH_KIND {
        for group in tree.children.iter().filter(|c| c.kind == TYPE_GROUP_KIND) {
            for member in &group.children {
                let node = node_from_tree(member, nodes.len());
                nodes.push(node);
            }
        }
    }
    Graph::from_parts(nodes, Vec::new())
}
