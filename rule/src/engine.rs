//! Transducer execution engine.

use std::collections::HashMap;

use arbor_core::{TreeNode, Value, LIST_KIND};
use arbor_pattern::{Bindings, Evaluator, Expression, Matcher, Scope};
use tracing::trace;

use crate::error::{RuleError, RuleResult};
use crate::{EngineConfig, MttProgram, MttRule, TreeTemplate};

/// Rule indices for one state, in declaration order.
#[derive(Debug, Default)]
struct StateRules {
    by_kind: HashMap<String, Vec<usize>>,
    wildcard: Vec<usize>,
}

/// The transducer.
///
/// Holds a program indexed by `state -> root kind -> rules`. Each `transform`
/// call is independent; the engine keeps no state between calls.
#[derive(Debug)]
pub struct MttEngine {
    program: MttProgram,
    index: HashMap<String, StateRules>,
    config: EngineConfig,
    matcher: Matcher,
    evaluator: Evaluator,
}

impl MttEngine {
    /// Create an engine with the default configuration.
    pub fn new(program: MttProgram) -> Self {
        Self::with_config(program, EngineConfig::default())
    }

    pub fn with_config(program: MttProgram, config: EngineConfig) -> Self {
        let mut index: HashMap<String, StateRules> = HashMap::new();
        for (i, rule) in program.rules.iter().enumerate() {
            let bucket = index.entry(rule.state.clone()).or_default();
            match rule.input_pattern.root_kind() {
                Some(kind) => bucket.by_kind.entry(kind.to_string()).or_default().push(i),
                None => bucket.wildcard.push(i),
            }
        }
        trace!(
            rules = program.rules.len(),
            states = index.len(),
            "indexed program"
        );
        Self {
            program,
            index,
            config,
            matcher: Matcher::new(),
            evaluator: Evaluator::new(),
        }
    }

    pub fn program(&self) -> &MttProgram {
        &self.program
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Declared states in first-declaration order.
    pub fn states(&self) -> Vec<&str> {
        self.program.states()
    }

    pub fn has_state(&self, state: &str) -> bool {
        self.index.contains_key(state)
    }

    /// Transform `tree` at the program's initial state with no parameters.
    pub fn run(&self, tree: &TreeNode) -> RuleResult<TreeNode> {
        self.transform(&self.program.initial_state, tree, &[])
    }

    /// Transform `tree` in `state` with positional `params`.
    ///
    /// The first rule (kind bucket before wildcard bucket, declaration order
    /// within each) whose pattern matches and whose guard holds is applied.
    /// When none applies the input is returned unchanged.
    pub fn transform(&self, state: &str, tree: &TreeNode, params: &[Value]) -> RuleResult<TreeNode> {
        self.transform_at(state, tree, params, 0)
    }

    /// One nested `transform` frame.
    ///
    /// A rule whose whole output is a `variable_template` or `recursive_call`
    /// continues in this frame instead of nesting, so folds over cons lists
    /// and walks down a right spine run in constant stack. Only calls made
    /// from inside a built node count against `max_depth`; tail steps count
    /// against `max_steps`.
    fn transform_at<'s, 't>(
        &'s self,
        mut state: &'s str,
        mut tree: &'t TreeNode,
        params: &[Value],
        depth: usize,
    ) -> RuleResult<TreeNode> {
        if depth >= self.config.max_depth {
            return Err(RuleError::max_depth_exceeded(self.config.max_depth));
        }
        let mut params = params.to_vec();
        let mut steps = 0usize;

        loop {
            let Some((rule, bindings)) = self.select(state, tree, &params)? else {
                trace!(state, kind = %tree.kind, "no rule matched, keeping input");
                return Ok(tree.clone());
            };
            let scope = Scope::new(&bindings, &params).with_param_names(&rule.parameters);
            trace!(rule = %rule.name, state, kind = %tree.kind, depth, steps, "applying rule");

            match &rule.output_template {
                TreeTemplate::VariableTemplate { var_name } => {
                    tree = bindings
                        .get(var_name)
                        .ok_or_else(|| RuleError::unbound_variable(var_name))?;
                }
                TreeTemplate::RecursiveCall {
                    state: target,
                    child_var,
                    params: args,
                } => {
                    let next = bindings
                        .get(child_var)
                        .ok_or_else(|| RuleError::unbound_variable(child_var))?;
                    let next_params = args
                        .iter()
                        .map(|p| self.evaluator.eval(p, &scope))
                        .collect::<Result<Vec<_>, _>>()?;
                    state = target.as_str();
                    tree = next;
                    params = next_params;
                }
                template => return self.instantiate(template, &scope, state, depth),
            }

            steps += 1;
            if steps >= self.config.max_steps {
                return Err(RuleError::step_limit_exceeded(self.config.max_steps));
            }
        }
    }

    /// First applicable rule for `tree` in `state`, with its bindings.
    fn select<'t>(
        &self,
        state: &str,
        tree: &'t TreeNode,
        params: &[Value],
    ) -> RuleResult<Option<(&MttRule, Bindings<'t>)>> {
        let rules = self
            .index
            .get(state)
            .ok_or_else(|| RuleError::unknown_state(state))?;

        let candidates = rules
            .by_kind
            .get(&tree.kind)
            .into_iter()
            .flatten()
            .chain(&rules.wildcard);

        for &i in candidates {
            let rule = &self.program.rules[i];
            let Some(bindings) = self.matcher.match_node(&rule.input_pattern, tree)? else {
                continue;
            };
            let scope = Scope::new(&bindings, params).with_param_names(&rule.parameters);
            if !self.guard_holds(rule, &scope)? {
                trace!(rule = %rule.name, state, "guard rejected");
                continue;
            }
            return Ok(Some((rule, bindings)));
        }
        Ok(None)
    }

    fn guard_holds(&self, rule: &MttRule, scope: &Scope<'_, '_>) -> RuleResult<bool> {
        match &rule.guard {
            Some(guard) => Ok(self.evaluator.eval_bool(guard, scope)?),
            None => Ok(true),
        }
    }

    /// Build the output of a template.
    fn instantiate(
        &self,
        template: &TreeTemplate,
        scope: &Scope<'_, '_>,
        state: &str,
        depth: usize,
    ) -> RuleResult<TreeNode> {
        match template {
            TreeTemplate::NodeTemplate {
                kind,
                name,
                attrs,
                children,
            } => {
                let mut node = TreeNode::new(kind.clone());
                if let Some(expr) = name {
                    node.name = self.eval_name(expr, scope)?;
                }
                for attr in attrs {
                    let value = self.evaluator.eval(&attr.value, scope)?;
                    node.set_attr(attr.key.clone(), value);
                }
                for child in children {
                    let child = self.instantiate(child, scope, state, depth)?;
                    node.children.push(child);
                }
                Ok(node)
            }
            TreeTemplate::VariableTemplate { var_name } => {
                let subtree = scope
                    .bindings
                    .get(var_name)
                    .ok_or_else(|| RuleError::unbound_variable(var_name))?;
                self.transform_at(state, subtree, scope.params, depth + 1)
            }
            TreeTemplate::RecursiveCall {
                state: target,
                child_var,
                params,
            } => {
                let subtree = scope
                    .bindings
                    .get(child_var)
                    .ok_or_else(|| RuleError::unbound_variable(child_var))?;
                let params = params
                    .iter()
                    .map(|p| self.evaluator.eval(p, scope))
                    .collect::<Result<Vec<_>, _>>()?;
                self.transform_at(target, subtree, &params, depth + 1)
            }
            TreeTemplate::ListTemplate { elements } => {
                let items = elements
                    .iter()
                    .map(|e| self.instantiate(e, scope, state, depth))
                    .collect::<RuleResult<Vec<_>>>()?;
                Ok(TreeNode::new(LIST_KIND).with_children(items))
            }
            TreeTemplate::Unsupported => Err(RuleError::unsupported("template type")),
        }
    }

    /// Strings are used as-is, Null leaves the node unnamed.
    fn eval_name(&self, expr: &Expression, scope: &Scope<'_, '_>) -> RuleResult<Option<String>> {
        Ok(match self.evaluator.eval(expr, scope)? {
            Value::Null => None,
            Value::String(s) => Some(s),
            other => Some(other.to_text()),
        })
    }
}
