//! Hand-wired energy-to-emission compiler.
//!
//! Instead of lowering document operations one by one, this compiler reads
//! the emission factor table from the document constants and emits one
//! guarded rule per energy type, plus a fold that totals emissions into a
//! report.

use crate::{CompileError, CompileResult};
use arbor_core::{Value, LIST_KIND, NIL_KIND};
use arbor_parser::DslProgram;
use arbor_pattern::{normalize_key, Expression, TreePattern};
use arbor_rule::{MttProgram, MttRule, TreeTemplate};
use std::collections::{BTreeMap, HashSet};
use tracing::debug;

/// State holding the per-node emission rules.
pub const EMISSION_STATE: &str = "q0";

/// State holding the report fold.
pub const AGGREGATE_STATE: &str = "aggregate";

const SOURCE_KIND: &str = "EnergyConsumption";
const EMISSION_KIND: &str = "Emission";
const REPORT_KIND: &str = "GHGReport";
const ENERGY: &str = "energy";

const FACTORS_CONSTANT: &str = "emission_factors";
const SCOPES_CONSTANT: &str = "scope_classification";

/// kg-CO2 per unit, used when the document declares no factor table.
const DEFAULT_FACTORS: &[(&str, f64)] = &[
    ("coal", 2.42),
    ("diesel", 2.68),
    ("electricity", 0.5),
    ("fuel_oil", 2.68),
    ("gasoline", 2.31),
    ("lpg", 1.51),
    ("natural_gas", 2.03),
];

/// Fold parameters, in positional order.
const REPORT_PARAMS: [&str; 4] = ["total", "scope1", "scope2", "count"];

/// One row of the factor table.
#[derive(Debug, Clone, PartialEq)]
struct Factor {
    energy_type: String,
    factor: f64,
    scope: i64,
}

/// Compiles a mapping document into the energy-to-emission program.
///
/// State `q0` turns an `EnergyConsumption` node into an `Emission` node;
/// state `aggregate` folds a cons list of emissions into a `GHGReport`.
/// Call the fold with [`GhgCompiler::report_seed`] as parameters.
#[derive(Debug, Clone, Copy, Default)]
pub struct GhgCompiler;

impl GhgCompiler {
    pub fn new() -> Self {
        Self
    }

    /// Initial parameters for the `aggregate` state.
    pub fn report_seed() -> Vec<Value> {
        vec![Value::Float(0.0), Value::Float(0.0), Value::Float(0.0), Value::Int(0)]
    }

    pub fn compile(&self, program: &DslProgram) -> CompileResult<MttProgram> {
        let scopes = scope_classification(program.constant(SCOPES_CONSTANT))?;
        let factors = factor_table(program.constant(FACTORS_CONSTANT), &scopes)?;

        let mut out = MttProgram::new(EMISSION_STATE);
        for factor in &factors {
            out.push(emission_rule(factor));
        }
        out.push(unclassified_rule());
        for rule in report_rules(&program.metadata.name) {
            out.push(rule);
        }

        out.validate()?;
        debug!(
            energy_types = factors.len(),
            rules = out.rules.len(),
            "compiled emission program"
        );
        Ok(out)
    }
}

// ==================== Constants ====================

/// Energy types listed under `scope1` / `scope2`.
#[derive(Debug, Default)]
struct Scopes {
    scope1: HashSet<String>,
    scope2: HashSet<String>,
}

impl Scopes {
    fn scope_of(&self, energy_type: &str) -> i64 {
        if self.scope1.contains(energy_type) {
            1
        } else if self.scope2.contains(energy_type) || energy_type == "electricity" {
            2
        } else {
            1
        }
    }
}

fn scope_classification(value: Option<&Value>) -> CompileResult<Scopes> {
    let Some(value) = value else {
        return Ok(Scopes::default());
    };
    let map = value
        .as_map()
        .ok_or_else(|| CompileError::invalid_constant(SCOPES_CONSTANT, "expected a mapping"))?;

    let names = |key: &str| -> CompileResult<HashSet<String>> {
        match map.get(key) {
            None | Some(Value::Null) => Ok(HashSet::new()),
            Some(Value::List(items)) => items
                .iter()
                .map(|item| {
                    item.as_str().map(normalize_key).ok_or_else(|| {
                        CompileError::invalid_constant(
                            SCOPES_CONSTANT,
                            format!("{} entries must be strings", key),
                        )
                    })
                })
                .collect(),
            Some(other) => Err(CompileError::invalid_constant(
                SCOPES_CONSTANT,
                format!("{} must be a list, found {}", key, other.type_name()),
            )),
        }
    };

    Ok(Scopes {
        scope1: names("scope1")?,
        scope2: names("scope2")?,
    })
}

/// Entries are either a bare number or `{factor, scope?}`. Energy type keys
/// are normalized with [`normalize_key`], as are the node types they match.
fn factor_table(value: Option<&Value>, scopes: &Scopes) -> CompileResult<Vec<Factor>> {
    let Some(value) = value else {
        return Ok(DEFAULT_FACTORS
            .iter()
            .map(|(energy_type, factor)| Factor {
                energy_type: energy_type.to_string(),
                factor: *factor,
                scope: scopes.scope_of(energy_type),
            })
            .collect());
    };
    let map: &BTreeMap<String, Value> = value
        .as_map()
        .ok_or_else(|| CompileError::invalid_constant(FACTORS_CONSTANT, "expected a mapping"))?;

    map.iter()
        .map(|(energy_type, entry)| -> CompileResult<Factor> {
            let invalid = |message: &str| {
                CompileError::invalid_constant(
                    FACTORS_CONSTANT,
                    format!("{}: {}", energy_type, message),
                )
            };
            let (factor, scope) = match entry {
                Value::Map(fields) => {
                    let factor = fields
                        .get("factor")
                        .and_then(Value::as_f64)
                        .ok_or_else(|| invalid("missing numeric factor"))?;
                    let scope = match fields.get("scope") {
                        None => None,
                        Some(scope) => {
                            Some(scope.as_int().ok_or_else(|| invalid("scope must be an integer"))?)
                        }
                    };
                    (factor, scope)
                }
                other => (
                    other.as_f64().ok_or_else(|| invalid("expected a number or mapping"))?,
                    None,
                ),
            };
            let energy_type = normalize_key(energy_type);
            Ok(Factor {
                scope: scope.unwrap_or_else(|| scopes.scope_of(&energy_type)),
                energy_type,
                factor,
            })
        })
        .collect()
}

// ==================== Rules ====================

fn energy_attr(key: &str) -> Expression {
    Expression::var_prop(ENERGY, key)
}

/// `Emission` node built from the bound `energy` node.
fn emission_template(energy_type: Expression, factor: f64, scope: i64) -> TreeTemplate {
    TreeTemplate::node(EMISSION_KIND)
        .with_attr("facility_id", energy_attr("facility_id"))
        .with_attr("energy_type", energy_type)
        .with_attr("amount", energy_attr("amount"))
        .with_attr("unit", energy_attr("unit"))
        .with_attr("emission_factor", Expression::literal(factor))
        .with_attr(
            "co2_amount",
            Expression::binary("*", energy_attr("amount"), Expression::literal(factor)),
        )
        .with_attr("scope", Expression::literal(scope))
        .with_attr("year", energy_attr("year"))
        .with_attr("month", energy_attr("month"))
}

fn emission_rule(factor: &Factor) -> MttRule {
    MttRule::new(
        format!("energy_to_emission_{}", factor.energy_type),
        EMISSION_STATE,
        TreePattern::kind(SOURCE_KIND).bind(ENERGY),
        emission_template(
            Expression::literal(factor.energy_type.as_str()),
            factor.factor,
            factor.scope,
        ),
    )
    .with_guard(Expression::binary(
        "and",
        Expression::binary(
            "==",
            Expression::call("normalize_key", vec![energy_attr("energy_type")]),
            Expression::literal(factor.energy_type.as_str()),
        ),
        Expression::binary(">", energy_attr("amount"), Expression::literal(0i64)),
    ))
}

/// Any other consumption node becomes a zero-factor scope 1 emission.
fn unclassified_rule() -> MttRule {
    MttRule::new(
        "energy_to_emission_unclassified",
        EMISSION_STATE,
        TreePattern::kind(SOURCE_KIND).bind(ENERGY),
        emission_template(energy_attr("energy_type"), 0.0, 1),
    )
}

/// The fold over `list(Emission, tail)`. Scope 2 heads are routed by guard;
/// everything else counts as scope 1.
fn report_rules(report_name: &str) -> Vec<MttRule> {
    let [total, scope1, scope2, count] = REPORT_PARAMS;
    let co2 = || Expression::var_prop("head", "co2_amount");
    let plus = |param: &str, value: Expression| Expression::binary("+", Expression::var(param), value);
    let cons = || {
        TreePattern::kind(LIST_KIND).with_children([
            TreePattern::kind(EMISSION_KIND).bind("head"),
            TreePattern::var("tail"),
        ])
    };

    let scope2_head = MttRule::new(
        "report_scope2_emission",
        AGGREGATE_STATE,
        cons(),
        TreeTemplate::call(
            AGGREGATE_STATE,
            "tail",
            vec![
                plus(total, co2()),
                Expression::var(scope1),
                plus(scope2, co2()),
                plus(count, Expression::literal(1i64)),
            ],
        ),
    )
    .with_parameters(REPORT_PARAMS)
    .with_guard(Expression::binary(
        "==",
        Expression::var_prop("head", "scope"),
        Expression::literal(2i64),
    ));

    let scope1_head = MttRule::new(
        "report_scope1_emission",
        AGGREGATE_STATE,
        cons(),
        TreeTemplate::call(
            AGGREGATE_STATE,
            "tail",
            vec![
                plus(total, co2()),
                plus(scope1, co2()),
                Expression::var(scope2),
                plus(count, Expression::literal(1i64)),
            ],
        ),
    )
    .with_parameters(REPORT_PARAMS);

    let report = MttRule::new(
        "report_done",
        AGGREGATE_STATE,
        TreePattern::kind(NIL_KIND),
        TreeTemplate::node(REPORT_KIND)
            .with_name(Expression::literal(report_name))
            .with_attr("total_co2", Expression::var(total))
            .with_attr("total_scope1", Expression::var(scope1))
            .with_attr("total_scope2", Expression::var(scope2))
            .with_attr("emission_count", Expression::var(count)),
    )
    .with_parameters(REPORT_PARAMS);

    vec![scope2_head, scope1_head, report]
}
