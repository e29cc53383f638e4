//! Lowering of document expressions.

use arbor_core::Value;
use arbor_pattern::Expression;

/// Prefix of path expressions such as `$.energy.amount`.
const PATH_PREFIX: &str = "$.";

/// Reserved name lowered to a call of the `current_date` built-in.
const CURRENT_DATE: &str = "current_date";

/// Lower a YAML scalar into an expression.
///
/// Strings go through [`lower_str`], numbers and booleans become literals and
/// anything else becomes a null literal.
pub fn lower_expression(value: &serde_yaml::Value) -> Expression {
    match value {
        serde_yaml::Value::String(s) => lower_str(s),
        serde_yaml::Value::Bool(b) => Expression::literal(*b),
        serde_yaml::Value::Number(n) => match n.as_i64() {
            Some(i) => Expression::literal(i),
            None => n
                .as_f64()
                .map(|f| Expression::literal(f))
                .unwrap_or_else(Expression::null),
        },
        _ => Expression::null(),
    }
}

/// Lower a string expression: `$.a.b.c` becomes `a.b.c` property access,
/// `current_date` a zero-argument call, anything else a variable.
pub fn lower_str(source: &str) -> Expression {
    if let Some(path) = source.strip_prefix(PATH_PREFIX) {
        let mut segments = path.split('.');
        let root = segments.next().unwrap_or_default();
        return segments.fold(Expression::var(root), |object, segment| {
            Expression::prop(object, segment)
        });
    }
    if source == CURRENT_DATE {
        return Expression::call(CURRENT_DATE, Vec::new());
    }
    Expression::var(source)
}

/// Convert a YAML value into a core value. Mappings with non-string keys
/// and tagged values become Null.
pub(crate) fn yaml_to_value(value: &serde_yaml::Value) -> Value {
    match value {
        serde_yaml::Value::Null => Value::Null,
        serde_yaml::Value::Bool(b) => Value::Bool(*b),
        serde_yaml::Value::Number(n) => match n.as_i64() {
            Some(i) => Value::Int(i),
            None => n.as_f64().map(Value::Float).unwrap_or(Value::Null),
        },
        serde_yaml::Value::String(s) => Value::String(s.clone()),
        serde_yaml::Value::Sequence(items) => Value::List(items.iter().map(yaml_to_value).collect()),
        serde_yaml::Value::Mapping(map) => {
            let mut out = std::collections::BTreeMap::new();
            for (key, item) in map {
                match key.as_str() {
                    Some(key) => {
                        out.insert(key.to_string(), yaml_to_value(item));
                    }
                    None => return Value::Null,
                }
            }
            Value::Map(out)
        }
        serde_yaml::Value::Tagged(_) => Value::Null,
    }
}
