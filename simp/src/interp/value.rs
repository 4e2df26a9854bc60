//! Runtime values for the interpreter

use crate::ast::TypeTag;
use std::fmt;

/// Runtime value
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// 64-bit integer; comparisons and logical operators yield 1 or 0
    Int(i64),
    /// Text
    Text(String),
    /// Single character
    Char(char),
    /// Array of values, stored by value
    Array(Vec<Value>),
    /// Result of a statement that produces nothing
    Undefined,
}

impl Value {
    /// Boolean as the language represents it
    pub fn from_bool(b: bool) -> Self {
        Value::Int(i64::from(b))
    }

    /// Check if value is truthy
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Int(n) => *n != 0,
            Value::Text(s) => !s.is_empty(),
            Value::Char(_) => true,
            Value::Array(items) => !items.is_empty(),
            Value::Undefined => false,
        }
    }

    /// Get type name for error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Int(_) => "num",
            Value::Text(_) => "str",
            Value::Char(_) => "chr",
            Value::Array(_) => "array",
            Value::Undefined => "undefined",
        }
    }

    /// Try to convert to i64
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(n) => Some(*n),
            _ => None,
        }
    }

    /// Whether the value satisfies a declared type tag. Arrays match when
    /// every element does.
    pub fn matches_tag(&self, tag: TypeTag) -> bool {
        match (self, tag) {
            (Value::Int(_), TypeTag::Num) => true,
            (Value::Text(_), TypeTag::Str) => true,
            (Value::Char(_), TypeTag::Chr) => true,
            (Value::Array(items), tag) => items.iter().all(|v| v.matches_tag(tag)),
            _ => false,
        }
    }

    /// Whether two values have the same runtime kind
    pub fn same_kind(&self, other: &Value) -> bool {
        std::mem::discriminant(self) == std::mem::discriminant(other)
    }

    fn fmt_element(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Text(s) => write!(f, "{s:?}"),
            Value::Char(c) => write!(f, "{c:?}"),
            other => write!(f, "{other}"),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(n) => write!(f, "{n}"),
            Value::Text(s) => write!(f, "{s}"),
            Value::Char(c) => write!(f, "{c}"),
            Value::Array(items) => {
                write!(f, "[")?;
                for (i, v) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    v.fmt_element(f)?;
                }
                write!(f, "]")
            }
            Value::Undefined => write!(f, "undefined"),
        }
    }
}
