//! Mapping document parser.
//!
//! The YAML is first read into loosely typed raw structs, then each named
//! transformation step is interpreted into operations.

use crate::expr::{lower_expression, lower_str, yaml_to_value};
use crate::{
    AggregateFunction, DslMetadata, DslOperation, DslPattern, DslProgram, ParseError, ParseResult,
};
use arbor_core::Value;
use arbor_pattern::Expression;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;
use tracing::debug;

const DEFAULT_SOURCE_TYPE: &str = "ManufacturingActivity";
const DEFAULT_VARIABLE: &str = "activity";
const DEFAULT_CREATED_TYPE: &str = "Emission";
const DEFAULT_AGGREGATE_FIELD: &str = "value";
const REPORT_TARGET: &str = "report";
const TYPE_TARGET: &str = "@type";

// ==================== Raw document ====================

#[derive(Debug, Default, Deserialize)]
struct RawDocument {
    #[serde(default)]
    metadata: Option<RawMetadata>,
    #[serde(default)]
    constants: Option<serde_yaml::Mapping>,
    #[serde(default)]
    transformation_steps: Option<Vec<RawStep>>,
}

#[derive(Debug, Default, Deserialize)]
struct RawMetadata {
    name: Option<serde_yaml::Value>,
    version: Option<serde_yaml::Value>,
    source_ontology: Option<serde_yaml::Value>,
    target_ontology: Option<serde_yaml::Value>,
    description: Option<serde_yaml::Value>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawStep {
    name: Option<String>,
    substeps: Vec<RawStep>,
    source_type: Option<String>,
    variable: Option<String>,
    filter: Option<serde_yaml::Mapping>,
    condition: Option<serde_yaml::Value>,
    mapping: Vec<RawMapping>,
    mappings: Vec<RawMapping>,
    aggregations: Vec<RawAggregation>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawMapping {
    target: Option<String>,
    value: Option<serde_yaml::Value>,
    source: Option<serde_yaml::Value>,
    calculation: Option<serde_yaml::Value>,
    function: Option<serde_yaml::Value>,
    factor: Option<f64>,
    scope: Option<i64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawAggregation {
    target: Option<String>,
    aggregate: Option<RawAggregate>,
    group_by: Vec<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawAggregate {
    function: Option<String>,
    field: Option<String>,
}

// ==================== Parser ====================

/// Parser for YAML mapping documents.
#[derive(Debug, Clone, Copy, Default)]
pub struct DslParser;

impl DslParser {
    pub fn new() -> Self {
        Self
    }

    /// Read and parse a document from disk.
    pub fn parse_file(&self, path: impl AsRef<Path>) -> ParseResult<DslProgram> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|source| ParseError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        self.parse_yaml(&source)
    }

    /// Parse a document from YAML text.
    pub fn parse_yaml(&self, source: &str) -> ParseResult<DslProgram> {
        if source.trim().is_empty() {
            return Err(ParseError::invalid_document("empty document"));
        }
        let doc: RawDocument = serde_yaml::from_str(source)?;

        let metadata = parse_metadata(doc.metadata.unwrap_or_default());
        let constants = parse_constants(doc.constants.unwrap_or_default())?;
        let mut operations = Vec::new();
        for step in doc.transformation_steps.unwrap_or_default() {
            operations.extend(parse_step(&step)?);
        }

        let program = DslProgram {
            metadata,
            constants,
            operations,
        };
        debug!(
            name = %program.metadata.name,
            constants = program.constants.len(),
            operations = program.operation_count(),
            "parsed mapping document"
        );
        Ok(program)
    }
}

fn parse_metadata(raw: RawMetadata) -> DslMetadata {
    let defaults = DslMetadata::default();
    DslMetadata {
        name: scalar_text(raw.name).unwrap_or(defaults.name),
        version: scalar_text(raw.version).unwrap_or(defaults.version),
        source_ontology: scalar_text(raw.source_ontology).unwrap_or(defaults.source_ontology),
        target_ontology: scalar_text(raw.target_ontology).unwrap_or(defaults.target_ontology),
        description: scalar_text(raw.description).unwrap_or(defaults.description),
    }
}

/// Text of a scalar; empty strings and non-scalars count as absent.
fn scalar_text(value: Option<serde_yaml::Value>) -> Option<String> {
    let text = match value? {
        serde_yaml::Value::String(s) => s,
        serde_yaml::Value::Number(n) => n.to_string(),
        serde_yaml::Value::Bool(b) => b.to_string(),
        _ => return None,
    };
    (!text.is_empty()).then_some(text)
}

fn parse_constants(raw: serde_yaml::Mapping) -> ParseResult<BTreeMap<String, Value>> {
    raw.iter()
        .map(|(key, value)| match key.as_str() {
            Some(key) => Ok((key.to_string(), yaml_to_value(value))),
            None => Err(ParseError::invalid_document(format!(
                "constant names must be strings, found {:?}",
                key
            ))),
        })
        .collect()
}

fn parse_step(step: &RawStep) -> ParseResult<Vec<DslOperation>> {
    match step.name.as_deref() {
        Some("transform_activities_to_emissions") => Ok(vec![parse_activity_transform(step)?]),
        Some("calculate_aggregations") => parse_aggregations(step),
        Some("generate_report_metadata") => Ok(parse_report_metadata(step)),
        name => {
            if step.substeps.is_empty() {
                debug!(step = name.unwrap_or("<unnamed>"), "step contributes no operations");
                return Ok(Vec::new());
            }
            let mut operations = Vec::new();
            for substep in &step.substeps {
                operations.extend(parse_step(substep)?);
            }
            Ok(operations)
        }
    }
}

/// One `match` over the source nodes, its body built from every
/// `transform_energy_to_emission` substep.
fn parse_activity_transform(step: &RawStep) -> ParseResult<DslOperation> {
    let node_type = step
        .source_type
        .clone()
        .unwrap_or_else(|| DEFAULT_SOURCE_TYPE.to_string());
    let variable = step
        .variable
        .clone()
        .unwrap_or_else(|| DEFAULT_VARIABLE.to_string());

    let mut properties = BTreeMap::new();
    for (key, value) in step.filter.iter().flatten() {
        let key = key.as_str().ok_or_else(|| {
            ParseError::invalid_document(format!("filter keys must be strings, found {:?}", key))
        })?;
        properties.insert(key.to_string(), yaml_to_value(value));
    }

    let mut body = Vec::new();
    for substep in &step.substeps {
        if substep.name.as_deref() == Some("transform_energy_to_emission") {
            body.extend(parse_mappings(&substep.mapping, &variable));
        }
    }

    Ok(DslOperation::Match {
        pattern: DslPattern::Node {
            variable: variable.clone(),
            node_type,
            properties,
        },
        variable,
        condition: step.condition.as_ref().map(lower_expression),
        body,
    })
}

fn parse_mappings(mappings: &[RawMapping], variable: &str) -> Vec<DslOperation> {
    let mut operations = Vec::new();
    let mut alias = DEFAULT_CREATED_TYPE.to_lowercase();

    for mapping in mappings {
        let Some(target) = mapping.target.as_deref() else {
            debug!("mapping without target skipped");
            continue;
        };

        if target == TYPE_TARGET {
            let node_type = mapping
                .value
                .as_ref()
                .and_then(|v| v.as_str())
                .unwrap_or(DEFAULT_CREATED_TYPE)
                .to_string();
            alias = node_type.to_lowercase();
            operations.push(DslOperation::CreateNode {
                id: None,
                node_type,
                properties: BTreeMap::new(),
            });
            continue;
        }

        let value = if let Some(calculation) = &mapping.calculation {
            lower_calculation(calculation, mapping, variable)
        } else if let Some(source) = &mapping.source {
            lower_expression(source)
        } else if let Some(value) = &mapping.value {
            Expression::literal(yaml_to_value(value))
        } else {
            debug!(target, "mapping without value skipped");
            continue;
        };

        operations.push(DslOperation::SetProperty {
            target: alias.clone(),
            key: target.to_string(),
            value,
        });
    }
    operations
}

/// Named calculations. Unknown names lower to a null literal.
fn lower_calculation(calculation: &serde_yaml::Value, mapping: &RawMapping, variable: &str) -> Expression {
    match calculation.as_str() {
        Some("calculate_co2_emission") => {
            let factor = match mapping.factor {
                Some(factor) => Expression::literal(factor),
                None => Expression::var_prop(variable, "emission_factor"),
            };
            Expression::binary("*", Expression::var_prop(variable, "amount"), factor)
        }
        Some("determine_scope") => Expression::literal(mapping.scope.unwrap_or(1)),
        other => {
            debug!(calculation = ?other, "unknown calculation");
            Expression::null()
        }
    }
}

fn parse_aggregations(step: &RawStep) -> ParseResult<Vec<DslOperation>> {
    step.aggregations
        .iter()
        .map(|agg| {
            let variable = agg
                .target
                .clone()
                .ok_or_else(|| ParseError::invalid_document("aggregation without target"))?;
            let aggregate = agg.aggregate.as_ref();
            let name = aggregate.and_then(|a| a.function.as_deref()).unwrap_or("sum");
            let field = aggregate
                .and_then(|a| a.field.clone())
                .unwrap_or_else(|| DEFAULT_AGGREGATE_FIELD.to_string());
            Ok(DslOperation::Aggregate {
                group_by: agg.group_by.iter().map(|path| lower_str(path)).collect(),
                variable,
                function: AggregateFunction::from_name(name, field),
            })
        })
        .collect()
}

fn parse_report_metadata(step: &RawStep) -> Vec<DslOperation> {
    step.mappings
        .iter()
        .filter_map(|mapping| {
            let key = mapping.target.clone()?;
            let value = mapping
                .calculation
                .as_ref()
                .or(mapping.function.as_ref())
                .map(lower_expression)
                .unwrap_or_else(Expression::null);
            Some(DslOperation::SetProperty {
                target: REPORT_TARGET.to_string(),
                key,
                value,
            })
        })
        .collect()
}
