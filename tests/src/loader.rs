//! Loader for files under `tests/fixtures`.

use std::fs;
use std::path::{Path, PathBuf};

use arbor_graph::Graph;
use arbor_parser::{DslParser, DslProgram};

use crate::error::{HarnessError, HarnessResult};

/// Absolute path of a fixture file.
pub fn fixture_path(relative: impl AsRef<Path>) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("fixtures")
        .join(relative)
}

pub fn load_text(relative: impl AsRef<Path>) -> HarnessResult<String> {
    let path = fixture_path(relative);
    fs::read_to_string(&path).map_err(|e| HarnessError::file_read(&path, e))
}

/// Load a graph stored as `{"nodes": [...], "edges": [...]}` JSON.
pub fn load_graph(relative: impl AsRef<Path>) -> HarnessResult<Graph> {
    let path = fixture_path(relative.as_ref());
    let source = load_text(relative)?;
    serde_json::from_str(&source).map_err(|e| HarnessError::fixture(&path, e.to_string()))
}

/// Parse a YAML mapping document.
pub fn load_mapping(relative: impl AsRef<Path>) -> HarnessResult<DslProgram> {
    Ok(DslParser::new().parse_file(fixture_path(relative))?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_graph_fixture() {
        let graph = load_graph("energy_graph.json").unwrap();
        assert_eq!(graph.node_count(), 4);
        assert_eq!(graph.edge_count(), 3);
    }

    #[test]
    fn test_missing_fixture() {
        let err = load_text("missing.yaml").unwrap_err();
        assert!(matches!(err, HarnessError::FileRead { .. }));
        assert!(err.to_string().contains("missing.yaml"));
    }
}
