//! Dynamic values produced by parsers.
//!
//! Every parser returns a result of the same shape, so the value carried on
//! success is a small tagged union rather than a type parameter. Consumers
//! know which variant their parser produces and match on it, or go through
//! the accessors.

use std::fmt;

/// A value produced by a successful parse.
///
/// `Unit` comes from `eof`, `Str` from `literal` and `regex` (the matched
/// input text), `List` from `sequence` and the repetition combinators.
/// `Int` exists for user maps that turn matched text into numbers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    Unit,
    Str(String),
    Int(i64),
    List(Vec<Value>),
}

impl Value {
    /// Shorthand for building a `Value::Str`.
    pub fn string(text: impl Into<String>) -> Self {
        Value::Str(text.into())
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(text) => Some(text),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(number) => Some(*number),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }

    /// Consume the value, returning the owned string if it is a `Str`.
    pub fn into_string(self) -> Option<String> {
        match self {
            Value::Str(text) => Some(text),
            _ => None,
        }
    }

    /// Consume the value, returning the items if it is a `List`.
    pub fn into_list(self) -> Option<Vec<Value>> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Unit => write!(f, "()"),
            Value::Str(text) => write!(f, "{}", text),
            Value::Int(number) => write!(f, "{}", number),
            Value::List(items) => {
                write!(f, "[")?;
                for (position, item) in items.iter().enumerate() {
                    if position > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                write!(f, "]")
            }
        }
    }
}
