//! Arbor Integration Test Harness
//!
//! Provides fixtures, fluent tree assertions and an end-to-end pipeline that
//! encodes a graph, runs a compiled program over it and folds the results.

mod assertion;
mod error;
mod fixtures;
mod loader;
mod runner;

pub use assertion::{assert_tree, TreeAssert};
pub use error::{HarnessError, HarnessResult};
pub use fixtures::*;
pub use loader::{fixture_path, load_graph, load_mapping, load_text};
pub use runner::{Pipeline, PipelineOutput};

/// Everything a test file needs.
pub mod prelude {
    pub use crate::{
        assert_tree, cyclic_graph, energy_graph, fixture_path, load_graph, load_mapping, metered_facility,
        load_text, Pipeline, PipelineOutput, TreeAssert, GHG_MAPPING,
    };
    pub use arbor_compiler::{compile, DslCompiler, GhgCompiler, AGGREGATE_STATE};
    pub use arbor_core::{attrs, TreeNode, Value};
    pub use arbor_graph::{decode, encode, EncodingPolicy, Graph, GraphCodec, GraphEdge, GraphNode};
    pub use arbor_parser::DslParser;
    pub use arbor_pattern::{Expression, TreePattern};
    pub use arbor_rule::{MttEngine, MttProgram, MttRule, RuleError, TreeTemplate};
}
