//! End-to-end pipeline: encode, transform node by node, fold, decode.

use arbor_compiler::{GhgCompiler, AGGREGATE_STATE};
use arbor_core::TreeNode;
use arbor_graph::{EncodingPolicy, Graph, GraphCodec, GRAPH_KIND};
use arbor_parser::DslParser;
use arbor_rule::{MttEngine, MttProgram};

use crate::error::HarnessResult;

const EMISSION_KIND: &str = "Emission";

/// Runs a program over every top-level node of an encoded graph.
#[derive(Debug)]
pub struct Pipeline {
    codec: GraphCodec,
    engine: MttEngine,
    entry_state: String,
}

/// Everything a pipeline run produced.
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineOutput {
    /// The encoded input graph.
    pub encoded: TreeNode,
    /// One output per top-level child of `encoded`, in order.
    pub transformed: Vec<TreeNode>,
    /// The folded report, when the program declares an `aggregate` state.
    pub report: Option<TreeNode>,
}

impl Pipeline {
    /// Star encoding, starting in the program's initial state.
    pub fn new(program: MttProgram) -> Self {
        let entry_state = program.initial_state.clone();
        Self {
            codec: GraphCodec::new(EncodingPolicy::Star),
            engine: MttEngine::new(program),
            entry_state,
        }
    }

    /// Parse a mapping document and compile it with [`GhgCompiler`].
    pub fn ghg(mapping: &str) -> HarnessResult<Self> {
        let document = DslParser::new().parse_yaml(mapping)?;
        Ok(Self::new(GhgCompiler::new().compile(&document)?))
    }

    pub fn with_codec(mut self, codec: GraphCodec) -> Self {
        self.codec = codec;
        self
    }

    /// State each top-level node is transformed in.
    pub fn with_entry_state(mut self, state: impl Into<String>) -> Self {
        self.entry_state = state.into();
        self
    }

    pub fn engine(&self) -> &MttEngine {
        &self.engine
    }

    pub fn run(&self, graph: &Graph) -> HarnessResult<PipelineOutput> {
        let encoded = self.codec.encode(graph)?;
        let transformed = encoded
            .children
            .iter()
            .map(|node| self.engine.transform(&self.entry_state, node, &[]))
            .collect::<Result<Vec<_>, _>>()?;

        let report = if self.engine.has_state(AGGREGATE_STATE) {
            let emissions = transformed
                .iter()
                .filter(|t| t.kind == EMISSION_KIND)
                .cloned();
            Some(self.engine.transform(
                AGGREGATE_STATE,
                &TreeNode::cons_list(emissions),
                &GhgCompiler::report_seed(),
            )?)
        } else {
            None
        };

        Ok(PipelineOutput {
            encoded,
            transformed,
            report,
        })
    }
}

impl PipelineOutput {
    pub fn emissions(&self) -> impl Iterator<Item = &TreeNode> {
        self.transformed.iter().filter(|t| t.kind == EMISSION_KIND)
    }

    /// The emissions decoded back into a graph under `star`.
    pub fn emission_graph(&self) -> Graph {
        let tree = TreeNode::new(GRAPH_KIND).with_children(self.emissions().cloned());
        GraphCodec::new(EncodingPolicy::Star).decode(&tree)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{energy_graph, GHG_MAPPING};

    #[test]
    fn test_ghg_pipeline_shapes() {
        let output = Pipeline::ghg(GHG_MAPPING).unwrap().run(&energy_graph()).unwrap();
        assert_eq!(output.encoded.kind, "graph");
        assert_eq!(output.transformed.len(), 3);
        assert_eq!(output.emissions().count(), 2);
        assert_eq!(output.transformed[0].kind, "Facility");
        assert!(output.report.is_some());
    }

    #[test]
    fn test_emission_graph_has_generated_ids() {
        let output = Pipeline::ghg(GHG_MAPPING).unwrap().run(&energy_graph()).unwrap();
        let graph = output.emission_graph();
        assert_eq!(graph.node_count(), 2);
        assert_eq!(graph.edge_count(), 0);
        assert!(graph.contains_node("node_0"));
    }
}
