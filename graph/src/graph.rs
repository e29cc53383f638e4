//! Labeled property graph storage.
//!
//! Nodes and edges are kept in insertion order. That order is significant:
//! canonical root selection and every encoding walk nodes and edges in it.

use crate::index::AdjacencyIndex;
use crate::{GraphError, GraphResult};
use arbor_core::{Properties, Value};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// A node in the graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphNode {
    /// Unique identifier for this node.
    pub id: String,
    /// Node label.
    #[serde(rename = "type")]
    pub node_type: String,
    /// Property values.
    #[serde(default)]
    pub properties: Properties,
}

impl GraphNode {
    /// Create a new node with the given properties.
    pub fn new(id: impl Into<String>, node_type: impl Into<String>, properties: Properties) -> Self {
        Self {
            id: id.into(),
            node_type: node_type.into(),
            properties,
        }
    }

    /// Get a property value by name.
    pub fn get_prop(&self, name: &str) -> Option<&Value> {
        self.properties.get(name)
    }
}

/// A directed, labeled edge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphEdge {
    /// Unique identifier for this edge.
    pub id: String,
    /// Edge label.
    pub label: String,
    /// Source node id.
    pub source_id: String,
    /// Target node id.
    pub target_id: String,
    /// Property values.
    #[serde(default)]
    pub properties: Properties,
}

impl GraphEdge {
    /// Create a new edge without properties.
    pub fn new(
        id: impl Into<String>,
        label: impl Into<String>,
        source_id: impl Into<String>,
        target_id: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            source_id: source_id.into(),
            target_id: target_id.into(),
            properties: Properties::new(),
        }
    }
}

/// The in-memory graph.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Graph {
    nodes: Vec<GraphNode>,
    edges: Vec<GraphEdge>,
}

impl Graph {
    /// Create a new empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Assemble a graph from parts without validating ids or endpoints.
    pub fn from_parts(nodes: Vec<GraphNode>, edges: Vec<GraphEdge>) -> Self {
        Self { nodes, edges }
    }

    // ==================== Node Operations ====================

    /// Add a node. Fails if the id is already taken.
    pub fn add_node(&mut self, node: GraphNode) -> GraphResult<()> {
        if self.contains_node(&node.id) {
            return Err(GraphError::DuplicateNode(node.id));
        }
        self.nodes.push(node);
        Ok(())
    }

    /// Builder-style node insertion.
    pub fn with_node(mut self, node: GraphNode) -> GraphResult<Self> {
        self.add_node(node)?;
        Ok(self)
    }

    /// Get a node by id.
    pub fn node(&self, id: &str) -> Option<&GraphNode> {
        self.nodes.iter().find(|n| n.id == id)
    }

    /// Check whether a node id exists.
    pub fn contains_node(&self, id: &str) -> bool {
        self.nodes.iter().any(|n| n.id == id)
    }

    /// All nodes in insertion order.
    pub fn nodes(&self) -> &[GraphNode] {
        &self.nodes
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    // ==================== Edge Operations ====================

    /// Add an edge. Both endpoints must already exist.
    pub fn add_edge(&mut self, edge: GraphEdge) -> GraphResult<()> {
        if self.edges.iter().any(|e| e.id == edge.id) {
            return Err(GraphError::DuplicateEdge(edge.id));
        }
        for endpoint in [&edge.source_id, &edge.target_id] {
            if !self.contains_node(endpoint) {
                return Err(GraphError::NodeNotFound(endpoint.clone()));
            }
        }
        self.edges.push(edge);
        Ok(())
    }

    /// Builder-style edge insertion.
    pub fn with_edge(mut self, edge: GraphEdge) -> GraphResult<Self> {
        self.add_edge(edge)?;
        Ok(self)
    }

    /// All edges in insertion order.
    pub fn edges(&self) -> &[GraphEdge] {
        &self.edges
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Outgoing edges of a node, in edge order.
    pub fn edges_from<'a>(&'a self, id: &'a str) -> impl Iterator<Item = &'a GraphEdge> + 'a {
        self.edges.iter().filter(move |e| e.source_id == id)
    }

    /// Incoming edges of a node, in edge order.
    pub fn edges_to<'a>(&'a self, id: &'a str) -> impl Iterator<Item = &'a GraphEdge> + 'a {
        self.edges.iter().filter(move |e| e.target_id == id)
    }

    /// Returns true if the graph has no nodes.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Build an adjacency index over this graph.
    pub fn index(&self) -> AdjacencyIndex<'_> {
        AdjacencyIndex::build(self)
    }

    /// Ids of all nodes reachable from `start` via outgoing edges, `start`
    /// included.
    pub fn reachable_from(&self, start: &str) -> HashSet<String> {
        let index = self.index();
        let mut seen = HashSet::new();
        let mut stack = vec![start];
        while let Some(id) = stack.pop() {
            if index.node(id).is_none() || !seen.insert(id.to_string()) {
                continue;
            }
            stack.extend(index.outgoing(id).iter().map(|e| e.target_id.as_str()));
        }
        seen
    }
}
