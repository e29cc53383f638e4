//! `star` policy: every node with its immediate neighbors.

use super::{flat_node, node_from_tree, wrapper_label, GRAPH_KIND, NEIGHBOR_KIND};
use crate::{Graph, GraphEdge};
use arbor_core::{TreeNode, Value};

pub(super) fn encode(graph: &Graph) -> TreeNode {
    let index = graph.index();
    let children = graph.nodes().iter().map(|node| {
        let neighbors = index.outgoing(&node.id).iter().filter_map(|edge| {
            // Dangling edges have nothing to copy.
            let target = index.node(&edge.target_id)?;
            Some(
                TreeNode::new(NEIGHBOR_KIND)
                    .with_attr("label", edge.label.clone())
                    .with_attr("target_id", target.id.clone())
                    .with_attr("target_type", target.node_type.clone())
                    .with_child(flat_node(target)),
            )
        });
        flat_node(node).with_children(neighbors)
    });
    TreeNode::new(GRAPH_KIND).with_children(children)
}

pub(super) fn decode(tree: &TreeNode) -> Graph {
    let mut nodes = Vec::new();
    let mut edges = Vec::new();
    if tree.kind != GRAPH_KIND {
        return Graph::new();
    }

    for child in &tree.children {
        let node = node_from_tree(child, nodes.len());
        for neighbor in child.children.iter().filter(|c| c.kind == NEIGHBOR_KIND) {
            let target_id = match neighbor.attr("target_id") {
                None | Some(Value::Null) => continue,
                Some(value) => value.to_text(),
            };
            edges.push(GraphEdge::new(
                format!("edge_{}", edges.len()),
                wrapper_label(neighbor),
                node.id.clone(),
                target_id,
            ));
        }
        nodes.push(node);
    }
    Graph::from_parts(nodes, edges)
}
