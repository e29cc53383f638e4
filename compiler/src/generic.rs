//! Generic lowering of document operations into transducer rules.

use crate::{CompileResult, NameGen};
use arbor_core::{LIST_KIND, NIL_KIND};
use arbor_parser::{AggregateFunction, DslOperation, DslParser, DslPattern, DslProgram};
use arbor_pattern::{Expression, TreePattern};
use arbor_rule::{MttProgram, MttRule, TreeTemplate};
use tracing::debug;

/// State the compiled program starts in.
pub const INITIAL_STATE: &str = "q0";

/// State holding the top-level `match` and `create_node` rules.
pub const DISPATCH_STATE: &str = "q";

const GRAPH_KIND: &str = "graph";
const MATCHED_KIND: &str = "matched";
const RESULT_KIND: &str = "result";
const ACCUMULATOR: &str = "accumulator";
const HEAD: &str = "head";
const TAIL: &str = "tail";

/// Parse a mapping document and compile it with a fresh [`DslCompiler`].
pub fn compile(source: &str) -> CompileResult<MttProgram> {
    let program = DslParser::new().parse_yaml(source)?;
    DslCompiler::new().compile(&program)
}

// ==================== Units ====================

/// Operations grouped into the pieces that each become one rule set.
#[derive(Debug)]
enum Unit<'a> {
    Match {
        pattern: &'a DslPattern,
        variable: &'a str,
        condition: Option<&'a Expression>,
        body: &'a [DslOperation],
    },
    /// A created node plus the properties later set on its alias.
    Create {
        id: Option<&'a Expression>,
        node_type: &'a str,
        attrs: Vec<(&'a str, &'a Expression)>,
    },
    /// A run of `set_property` on the same target.
    Properties {
        target: &'a str,
        attrs: Vec<(&'a str, &'a Expression)>,
    },
    Aggregate {
        variable: &'a str,
        function: &'a AggregateFunction,
    },
}

fn group_units(operations: &[DslOperation]) -> Vec<Unit<'_>> {
    let mut units: Vec<Unit<'_>> = Vec::new();
    for op in operations {
        match op {
            DslOperation::SetProperty { target, key, value } => match units.last_mut() {
                Some(Unit::Create {
                    node_type, attrs, ..
                }) if node_type.eq_ignore_ascii_case(target) => attrs.push((key.as_str(), value)),
                Some(Unit::Properties { target: t, attrs }) if *t == target.as_str() => {
                    attrs.push((key.as_str(), value))
                }
                _ => units.push(Unit::Properties {
                    target,
                    attrs: vec![(key.as_str(), value)],
                }),
            },
            DslOperation::Match {
                pattern,
                variable,
                condition,
                body,
            } => units.push(Unit::Match {
                pattern,
                variable,
                condition: condition.as_ref(),
                body,
            }),
            DslOperation::CreateNode {
                id,
                node_type,
                properties,
            } => units.push(Unit::Create {
                id: id.as_ref(),
                node_type,
                attrs: properties.iter().map(|(k, v)| (k.as_str(), v)).collect(),
            }),
            DslOperation::Aggregate {
                variable, function, ..
            } => units.push(Unit::Aggregate { variable, function }),
        }
    }
    units
}

// ==================== Compiler ====================

/// Compiles a [`DslProgram`] into an [`MttProgram`].
///
/// The program starts in `q0` with a rule that hands the single child of a
/// `graph` node to the dispatch state `q`. Top-level `match` and
/// `create_node` rules live in `q`; every other rule set gets a fresh state.
#[derive(Debug, Clone)]
pub struct DslCompiler {
    names: NameGen,
}

impl Default for DslCompiler {
    fn default() -> Self {
        Self::new()
    }
}

impl DslCompiler {
    pub fn new() -> Self {
        Self::with_names(NameGen::after_entry())
    }

    /// Use a caller-supplied name generator.
    pub fn with_names(names: NameGen) -> Self {
        Self { names }
    }

    /// Compile a parsed document.
    ///
    /// The output is not validated: a document without top-level `match` or
    /// `create_node` operations leaves the dispatch state undeclared, and
    /// running it fails with `UnknownState` only when `q` is reached.
    pub fn compile(&mut self, program: &DslProgram) -> CompileResult<MttProgram> {
        let mut out = MttProgram::new(INITIAL_STATE);
        out.push(entry_rule());

        for unit in group_units(&program.operations) {
            let state = match unit {
                Unit::Match { .. } | Unit::Create { .. } => DISPATCH_STATE.to_string(),
                Unit::Properties { .. } | Unit::Aggregate { .. } => self.fresh_state(),
            };
            let (rules, _) = self.compile_unit(&unit, &state, None);
            rules.into_iter().for_each(|r| out.push(r));
        }

        debug!(
            name = %program.metadata.name,
            rules = out.rules.len(),
            states = out.states().len(),
            "compiled mapping document"
        );
        Ok(out)
    }

    fn fresh_state(&mut self) -> String {
        let state = self.names.fresh_state();
        debug!(state = %state, "allocated state");
        state
    }

    /// Compile one unit into `state`.
    ///
    /// `within` names the variable bound by an enclosing `match`. Returns the
    /// rules and the parameters the enclosing match passes when it calls
    /// into `state`.
    fn compile_unit(
        &mut self,
        unit: &Unit<'_>,
        state: &str,
        within: Option<&str>,
    ) -> (Vec<MttRule>, Vec<Expression>) {
        match unit {
            Unit::Match {
                pattern,
                variable,
                condition,
                body,
            } => (
                self.compile_match(pattern, variable, *condition, body, state),
                Vec::new(),
            ),
            Unit::Create {
                id,
                node_type,
                attrs,
            } => {
                let mut template = TreeTemplate::node(*node_type);
                if let Some(id) = id {
                    template = template.with_name((*id).clone());
                }
                let template = with_attrs(template, attrs);
                let name = format!("create_{}_{}", node_type, self.names.serial());
                let rule = MttRule::new(name, state, input_of(within), template);
                (vec![rule], Vec::new())
            }
            Unit::Properties { target, attrs } => {
                let template = with_attrs(TreeTemplate::node(*target), attrs);
                let name = format!("set_{}_{}", target, self.names.serial());
                let rule = MttRule::new(name, state, input_of(within), template);
                (vec![rule], Vec::new())
            }
            Unit::Aggregate { variable, function } => {
                let seed = match within {
                    Some(_) => vec![Expression::literal(0i64)],
                    None => Vec::new(),
                };
                (aggregate_rules(variable, function, state), seed)
            }
        }
    }

    fn compile_match(
        &mut self,
        pattern: &DslPattern,
        variable: &str,
        condition: Option<&Expression>,
        body: &[DslOperation],
        state: &str,
    ) -> Vec<MttRule> {
        let input = match pattern {
            DslPattern::Node {
                node_type,
                properties,
                ..
            } => properties
                .iter()
                .fold(TreePattern::kind(node_type.as_str()), |p, (k, v)| {
                    p.with_attr(k.as_str(), v.clone())
                })
                .bind(variable),
            DslPattern::Variable { .. } => TreePattern::var(variable),
        };

        let mut output = TreeTemplate::node(MATCHED_KIND).with_name(Expression::literal(variable));
        let mut body_rules = Vec::new();
        for unit in group_units(body) {
            let unit_state = self.fresh_state();
            let (rules, params) = self.compile_unit(&unit, &unit_state, Some(variable));
            output = output.with_child(TreeTemplate::call(unit_state, variable, params));
            body_rules.extend(rules);
        }

        let name = format!("match_{}_{}", variable, self.names.serial());
        let mut rule = MttRule::new(name, state, input, output);
        if let Some(condition) = condition {
            rule = rule.with_guard(condition.clone());
        }

        let mut rules = vec![rule];
        rules.extend(body_rules);
        rules
    }
}

/// `graph(nodes)` in `q0` hands `nodes` to the dispatch state.
fn entry_rule() -> MttRule {
    MttRule::new(
        "init",
        INITIAL_STATE,
        TreePattern::kind(GRAPH_KIND).with_children([TreePattern::var("nodes")]),
        TreeTemplate::call(DISPATCH_STATE, "nodes", Vec::new()),
    )
}

/// Inside a match body the matched node is re-bound by name; at top level
/// any node applies.
fn input_of(within: Option<&str>) -> TreePattern {
    within.map(|v| TreePattern::var(v)).unwrap_or_else(TreePattern::wildcard)
}

fn with_attrs(template: TreeTemplate, attrs: &[(&str, &Expression)]) -> TreeTemplate {
    attrs
        .iter()
        .fold(template, |t, (key, value)| t.with_attr(*key, (*value).clone()))
}

/// A cons-list fold: the list rule recurses on the tail with the combined
/// accumulator, the empty rule emits `result[value = accumulator]`.
fn aggregate_rules(variable: &str, function: &AggregateFunction, state: &str) -> Vec<MttRule> {
    let combined = match function {
        AggregateFunction::Sum { field } => Expression::binary(
            "+",
            Expression::var(ACCUMULATOR),
            Expression::var_prop(HEAD, field.as_str()),
        ),
        AggregateFunction::Count { .. } => Expression::binary(
            "+",
            Expression::var(ACCUMULATOR),
            Expression::literal(1i64),
        ),
        AggregateFunction::Avg { .. }
        | AggregateFunction::Min { .. }
        | AggregateFunction::Max { .. } => Expression::var(ACCUMULATOR),
    };

    let list = MttRule::new(
        format!("aggregate_{}_list", variable),
        state,
        TreePattern::kind(LIST_KIND).with_children([TreePattern::var(HEAD), TreePattern::var(TAIL)]),
        TreeTemplate::call(state, TAIL, vec![combined]),
    )
    .with_parameters([ACCUMULATOR]);

    let empty = MttRule::new(
        format!("aggregate_{}_empty", variable),
        state,
        TreePattern::kind(NIL_KIND),
        TreeTemplate::node(RESULT_KIND)
            .with_name(Expression::literal(variable))
            .with_attr("value", Expression::var(ACCUMULATOR)),
    )
    .with_parameters([ACCUMULATOR]);

    vec![list, empty]
}
