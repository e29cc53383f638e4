//! In-code fixtures shared by the integration tests.

use arbor_core::attrs;
use arbor_graph::{Graph, GraphEdge, GraphNode};

/// The GHG mapping document from `fixtures/ghg_mapping.yaml`.
pub const GHG_MAPPING: &str = include_str!("../fixtures/ghg_mapping.yaml");

/// One facility consuming electricity and natural gas.
pub fn energy_graph() -> Graph {
    Graph::from_parts(
        vec![
            GraphNode::new("F001", "Facility", attrs! { "name" => "Tokyo Plant" }),
            GraphNode::new(
                "E001",
                "EnergyConsumption",
                attrs! {
                    "facility_id" => "F001",
                    "energy_type" => "electricity",
                    "amount" => 3000i64,
                    "unit" => "kWh",
                },
            ),
            GraphNode::new(
                "E002",
                "EnergyConsumption",
                attrs! {
                    "facility_id" => "F001",
                    "energy_type" => "natural_gas",
                    "amount" => 500i64,
                    "unit" => "m3",
                },
            ),
        ],
        vec![
            GraphEdge::new("r1", "consumes", "F001", "E001"),
            GraphEdge::new("r2", "consumes", "F001", "E002"),
        ],
    )
}

/// `A -> B -> C -> A`, plus `A -> D`.
pub fn cyclic_graph() -> Graph {
    Graph::from_parts(
        ["A", "B", "C", "D"]
            .iter()
            .map(|id| GraphNode::new(*id, "Step", attrs! { "label" => *id }))
            .collect(),
        vec![
            GraphEdge::new("ab", "next", "A", "B"),
            GraphEdge::new("bc", "next", "B", "C"),
            GraphEdge::new("ca", "next", "C", "A"),
            GraphEdge::new("ad", "branch", "A", "D"),
        ],
    )
}

/// One facility with `count` electricity readings of `10 kWh` each.
pub fn metered_facility(count: usize) -> Graph {
    let mut nodes = vec![GraphNode::new("F001", "Facility", attrs! { "name" => "Osaka Plant" })];
    let mut edges = Vec::with_capacity(count);
    for i in 0..count {
        let id = format!("M{:05}", i);
        nodes.push(GraphNode::new(
            id.as_str(),
            "EnergyConsumption",
            attrs! {
                "facility_id" => "F001",
                "energy_type" => "electricity",
                "amount" => 10i64,
                "unit" => "kWh",
            },
        ));
        edges.push(GraphEdge::new(format!("m{}", i), "consumes", "F001", id.as_str()));
    }
    Graph::from_parts(nodes, edges)
}
