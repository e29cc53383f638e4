//! Expression AST.

use arbor_core::Value;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Binary operators.
///
/// Serialized as the operator symbol. Unknown symbols are kept so the
/// evaluator can reject them when they are actually used.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum BinaryOp {
    Eq,
    NotEq,
    Lt,
    Gt,
    LtEq,
    GtEq,
    Add,
    Sub,
    Mul,
    Div,
    And,
    Or,
    Unsupported(String),
}

impl BinaryOp {
    pub fn symbol(&self) -> &str {
        match self {
            BinaryOp::Eq => "==",
            BinaryOp::NotEq => "!=",
            BinaryOp::Lt => "<",
            BinaryOp::Gt => ">",
            BinaryOp::LtEq => "<=",
            BinaryOp::GtEq => ">=",
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::And => "and",
            BinaryOp::Or => "or",
            BinaryOp::Unsupported(op) => op,
        }
    }
}

impl From<&str> for BinaryOp {
    fn from(s: &str) -> Self {
        match s {
            "==" => BinaryOp::Eq,
            "!=" => BinaryOp::NotEq,
            "<" => BinaryOp::Lt,
            ">" => BinaryOp::Gt,
            "<=" => BinaryOp::LtEq,
            ">=" => BinaryOp::GtEq,
            "+" => BinaryOp::Add,
            "-" => BinaryOp::Sub,
            "*" => BinaryOp::Mul,
            "/" => BinaryOp::Div,
            "and" => BinaryOp::And,
            "or" => BinaryOp::Or,
            other => BinaryOp::Unsupported(other.to_string()),
        }
    }
}

impl From<String> for BinaryOp {
    fn from(s: String) -> Self {
        BinaryOp::from(s.as_str())
    }
}

impl From<BinaryOp> for String {
    fn from(op: BinaryOp) -> Self {
        op.symbol().to_string()
    }
}

impl fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// An expression evaluated against bindings and parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Expression {
    Literal {
        value: Value,
    },
    Variable {
        name: String,
    },
    PropertyAccess {
        object: Box<Expression>,
        property: String,
    },
    FunctionCall {
        name: String,
        #[serde(default)]
        arguments: Vec<Expression>,
    },
    Binary {
        operator: BinaryOp,
        left: Box<Expression>,
        right: Box<Expression>,
    },
    /// Any unrecognized `type` tag.
    #[serde(other)]
    Unsupported,
}

impl Expression {
    pub fn literal(value: impl Into<Value>) -> Self {
        Expression::Literal {
            value: value.into(),
        }
    }

    pub fn null() -> Self {
        Expression::Literal { value: Value::Null }
    }

    pub fn var(name: impl Into<String>) -> Self {
        Expression::Variable { name: name.into() }
    }

    /// `object.property`
    pub fn prop(object: Expression, property: impl Into<String>) -> Self {
        Expression::PropertyAccess {
            object: Box::new(object),
            property: property.into(),
        }
    }

    /// `var.property`, the common case.
    pub fn var_prop(var: impl Into<String>, property: impl Into<String>) -> Self {
        Self::prop(Self::var(var), property)
    }

    pub fn call(name: impl Into<String>, arguments: Vec<Expression>) -> Self {
        Expression::FunctionCall {
            name: name.into(),
            arguments,
        }
    }

    pub fn binary(operator: impl Into<BinaryOp>, left: Expression, right: Expression) -> Self {
        Expression::Binary {
            operator: operator.into(),
            left: Box::new(left),
            right: Box::new(right),
        }
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expression::Literal { value } => write!(f, "{}", value),
            Expression::Variable { name } => write!(f, "{}", name),
            Expression::PropertyAccess { object, property } => {
                write!(f, "{}.{}", object, property)
            }
            Expression::FunctionCall { name, arguments } => {
                write!(f, "{}(", name)?;
                for (i, arg) in arguments.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", arg)?;
                }
                write!(f, ")")
            }
            Expression::Binary {
                operator,
                left,
                right,
            } => write!(f, "({} {} {})", left, operator, right),
            Expression::Unsupported => write!(f, "<unsupported>"),
        }
    }
}
