//! Expression evaluation.

use crate::{BinaryOp, Bindings, Expression, PatternError, PatternResult};
use arbor_core::{TreeNode, Value};
use std::cmp::Ordering;
use tracing::trace;

/// Everything an expression can see: the bindings of the current rule
/// application and the positional parameters of the current call.
#[derive(Debug, Clone, Copy)]
pub struct Scope<'a, 't> {
    pub bindings: &'a Bindings<'t>,
    pub params: &'a [Value],
    /// Declared parameter names; the i-th name reads `params[i]`.
    pub param_names: &'a [String],
}

impl<'a, 't> Scope<'a, 't> {
    pub fn new(bindings: &'a Bindings<'t>, params: &'a [Value]) -> Self {
        Self {
            bindings,
            params,
            param_names: &[],
        }
    }

    pub fn with_param_names(mut self, names: &'a [String]) -> Self {
        self.param_names = names;
        self
    }
}

/// A resolved variable: either a bound subtree or a parameter value.
enum Resolved<'t> {
    Node(&'t TreeNode),
    Value(Value),
}

/// Expression evaluator.
///
/// The evaluator is stateless; the scope is passed to each eval call.
#[derive(Debug, Clone, Copy, Default)]
pub struct Evaluator;

impl Evaluator {
    /// Create a new evaluator.
    pub fn new() -> Self {
        Self
    }

    /// Evaluate an expression in the given scope.
    pub fn eval(&self, expr: &Expression, scope: &Scope<'_, '_>) -> PatternResult<Value> {
        match expr {
            Expression::Literal { value } => Ok(value.clone()),
            Expression::Variable { name } => Ok(match self.resolve(name, scope)? {
                Resolved::Node(node) => Value::from(node.clone()),
                Resolved::Value(value) => value,
            }),
            Expression::PropertyAccess { object, property } => {
                self.eval_property_access(object, property, scope)
            }
            Expression::FunctionCall { name, arguments } => {
                self.eval_fn_call(name, arguments, scope)
            }
            Expression::Binary {
                operator,
                left,
                right,
            } => self.eval_binary_op(operator, left, right, scope),
            Expression::Unsupported => Err(PatternError::unsupported("expression type")),
        }
    }

    /// Evaluate an expression and test its truthiness.
    pub fn eval_bool(&self, expr: &Expression, scope: &Scope<'_, '_>) -> PatternResult<bool> {
        Ok(self.eval(expr, scope)?.is_truthy())
    }

    /// Resolve a variable: `param<N>`, then bindings, then declared
    /// parameter names.
    fn resolve<'t>(&self, name: &str, scope: &Scope<'_, 't>) -> PatternResult<Resolved<'t>> {
        if let Some(index) = positional_index(name) {
            return scope
                .params
                .get(index)
                .cloned()
                .map(Resolved::Value)
                .ok_or_else(|| PatternError::unbound_variable(name));
        }
        if let Some(node) = scope.bindings.get(name) {
            return Ok(Resolved::Node(node));
        }
        scope
            .param_names
            .iter()
            .position(|declared| declared == name)
            .and_then(|index| scope.params.get(index).cloned())
            .map(Resolved::Value)
            .ok_or_else(|| PatternError::unbound_variable(name))
    }

    /// Evaluate an attribute access. Missing attributes are Null.
    fn eval_property_access(
        &self,
        object: &Expression,
        property: &str,
        scope: &Scope<'_, '_>,
    ) -> PatternResult<Value> {
        // Read straight from a bound node instead of copying the subtree.
        if let Expression::Variable { name } = object {
            if let Resolved::Node(node) = self.resolve(name, scope)? {
                return Ok(node.attr(property).cloned().unwrap_or(Value::Null));
            }
        }

        let base = self.eval(object, scope)?;
        Ok(match &base {
            Value::Tree(node) => node.attr(property).cloned().unwrap_or(Value::Null),
            Value::Map(map) => map.get(property).cloned().unwrap_or(Value::Null),
            _ => Value::Null,
        })
    }

    /// Evaluate a built-in function call.
    fn eval_fn_call(
        &self,
        name: &str,
        args: &[Expression],
        scope: &Scope<'_, '_>,
    ) -> PatternResult<Value> {
        let values = args
            .iter()
            .map(|arg| self.eval(arg, scope))
            .collect::<PatternResult<Vec<_>>>()?;
        trace!(function = name, args = values.len(), "calling built-in");

        match name.to_lowercase().as_str() {
            "concat" => Ok(Value::String(values.iter().map(Value::to_text).collect())),
            "upper" => Ok(map_text(values.first(), |s| s.to_uppercase())),
            "lower" => Ok(map_text(values.first(), |s| s.to_lowercase())),
            "normalize_key" => Ok(map_text(values.first(), normalize_key)),
            "sum" => values
                .iter()
                .try_fold(Value::Int(0), |acc, v| match v {
                    Value::Int(_) | Value::Float(_) => self.eval_add(&acc, v),
                    other => Err(PatternError::type_error(format!(
                        "sum expects numeric arguments, got {}",
                        other.type_name()
                    ))),
                }),
            "current_date" => Ok(Value::String(
                chrono::Local::now().format("%Y-%m-%d").to_string(),
            )),
            _ => Err(PatternError::unsupported(format!("function '{}'", name))),
        }
    }

    /// Evaluate a binary operation.
    fn eval_binary_op(
        &self,
        op: &BinaryOp,
        left: &Expression,
        right: &Expression,
        scope: &Scope<'_, '_>,
    ) -> PatternResult<Value> {
        if let BinaryOp::Unsupported(symbol) = op {
            return Err(PatternError::unsupported(format!("operator '{}'", symbol)));
        }

        let left_val = self.eval(left, scope)?;

        // Logical operators yield an operand and skip the right side when
        // the left one decides.
        match op {
            BinaryOp::And if !left_val.is_truthy() => return Ok(left_val),
            BinaryOp::Or if left_val.is_truthy() => return Ok(left_val),
            BinaryOp::And | BinaryOp::Or => return self.eval(right, scope),
            _ => {}
        }

        let right_val = self.eval(right, scope)?;

        match op {
            // Arithmetic
            BinaryOp::Add => self.eval_add(&left_val, &right_val),
            BinaryOp::Sub => self.eval_sub(&left_val, &right_val),
            BinaryOp::Mul => self.eval_mul(&left_val, &right_val),
            BinaryOp::Div => self.eval_div(&left_val, &right_val),

            // Comparison
            BinaryOp::Eq => Ok(Value::Bool(left_val.same_as(&right_val))),
            BinaryOp::NotEq => Ok(Value::Bool(!left_val.same_as(&right_val))),
            BinaryOp::Lt => self.eval_ordering(op, &left_val, &right_val, Ordering::is_lt),
            BinaryOp::LtEq => self.eval_ordering(op, &left_val, &right_val, Ordering::is_le),
            BinaryOp::Gt => self.eval_ordering(op, &left_val, &right_val, Ordering::is_gt),
            BinaryOp::GtEq => self.eval_ordering(op, &left_val, &right_val, Ordering::is_ge),

            BinaryOp::And | BinaryOp::Or | BinaryOp::Unsupported(_) => {
                Err(PatternError::unsupported(format!("operator '{}'", op)))
            }
        }
    }

    // ========== Arithmetic helpers ==========

    fn eval_add(&self, left: &Value, right: &Value) -> PatternResult<Value> {
        match (left, right) {
            // Null propagation
            (Value::Null, _) | (_, Value::Null) => Ok(Value::Null),
            (Value::String(_), _) | (_, Value::String(_)) => {
                Ok(Value::String(format!("{}{}", left.to_text(), right.to_text())))
            }
            (Value::Int(a), Value::Int(b)) => Ok(a
                .checked_add(*b)
                .map(Value::Int)
                .unwrap_or(Value::Float(*a as f64 + *b as f64))),
            _ => self.float_op("add", left, right, |a, b| a + b),
        }
    }

    fn eval_sub(&self, left: &Value, right: &Value) -> PatternResult<Value> {
        match (left, right) {
            (Value::Null, _) | (_, Value::Null) => Ok(Value::Null),
            (Value::Int(a), Value::Int(b)) => Ok(a
                .checked_sub(*b)
                .map(Value::Int)
                .unwrap_or(Value::Float(*a as f64 - *b as f64))),
            _ => self.float_op("subtract", left, right, |a, b| a - b),
        }
    }

    fn eval_mul(&self, left: &Value, right: &Value) -> PatternResult<Value> {
        match (left, right) {
            (Value::Null, _) | (_, Value::Null) => Ok(Value::Null),
            (Value::Int(a), Value::Int(b)) => Ok(a
                .checked_mul(*b)
                .map(Value::Int)
                .unwrap_or(Value::Float(*a as f64 * *b as f64))),
            _ => self.float_op("multiply", left, right, |a, b| a * b),
        }
    }

    fn eval_div(&self, left: &Value, right: &Value) -> PatternResult<Value> {
        match (left, right) {
            (Value::Null, _) | (_, Value::Null) => Ok(Value::Null),
            _ => match right.as_f64() {
                Some(divisor) if divisor == 0.0 && left.is_number() => {
                    Err(PatternError::DivisionByZero)
                }
                _ => self.float_op("divide", left, right, |a, b| a / b),
            },
        }
    }

    /// Apply a numeric operation in floating point.
    fn float_op(
        &self,
        verb: &str,
        left: &Value,
        right: &Value,
        op: impl Fn(f64, f64) -> f64,
    ) -> PatternResult<Value> {
        match (left.as_f64(), right.as_f64()) {
            (Some(a), Some(b)) => Ok(Value::Float(op(a, b))),
            _ => Err(PatternError::type_error(format!(
                "cannot {} {} and {}",
                verb,
                left.type_name(),
                right.type_name()
            ))),
        }
    }

    // ========== Comparison helpers ==========

    fn eval_ordering(
        &self,
        op: &BinaryOp,
        left: &Value,
        right: &Value,
        accept: fn(Ordering) -> bool,
    ) -> PatternResult<Value> {
        if left.is_null() || right.is_null() {
            return Ok(Value::Null);
        }
        match left.compare(right) {
            Some(ordering) => Ok(Value::Bool(accept(ordering))),
            None => Err(PatternError::type_error(format!(
                "cannot compare {} {} {}",
                left.type_name(),
                op,
                right.type_name()
            ))),
        }
    }
}

/// Index of a reserved `param<N>` name.
fn positional_index(name: &str) -> Option<usize> {
    let digits = name.strip_prefix("param")?;
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}

/// Apply a text function to the textual form of `value`. Null stays Null.
fn map_text(value: Option<&Value>, f: impl Fn(&str) -> String) -> Value {
    match value {
        None | Some(Value::Null) => Value::Null,
        Some(other) => Value::String(f(&other.to_text())),
    }
}

/// Lowercase, with each whitespace run and each `-` replaced by `_`.
///
/// `"Natural Gas"` and `"natural-gas"` both become `"natural_gas"`.
pub fn normalize_key(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut in_space = false;
    for c in s.chars() {
        if c.is_whitespace() {
            if !in_space {
                out.push('_');
            }
            in_space = true;
            continue;
        }
        in_space = false;
        if c == '-' {
            out.push('_');
        } else {
            out.extend(c.to_lowercase());
        }
    }
    out
}
