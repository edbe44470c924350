//! The one value shape shared by every literal.

use std::fmt;

use super::format::quote_literal;
use super::{AstNode, NodeTag};

/// A literal value.
///
/// Numeric text that does not fit an `i32` is kept verbatim as
/// [`Value::Float`]. Bit strings keep a leading `b` or `x` marker followed by
/// the digits as written.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Value {
    String(String),
    Integer(i32),
    Float(String),
    Boolean(bool),
    BitString(String),
    Null,
}

impl Value {
    /// Returns the string payload, if this is a string.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Returns true for `NULL`.
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Returns the value with its sign flipped, for numeric values.
    #[must_use]
    pub fn negated(&self) -> Option<Self> {
        match self {
            Self::Integer(i) => Some(match i.checked_neg() {
                Some(n) => Self::Integer(n),
                None => Self::Float((-i64::from(*i)).to_string()),
            }),
            Self::Float(s) => Some(Self::Float(match s.strip_prefix('-') {
                Some(abs) => abs.to_owned(),
                None => format!("-{s}"),
            })),
            _ => None,
        }
    }
}

impl AstNode for Value {
    fn tag(&self) -> NodeTag {
        match self {
            Self::String(_) => NodeTag::String,
            Self::Integer(_) => NodeTag::Integer,
            Self::Float(_) => NodeTag::Float,
            Self::Boolean(_) => NodeTag::Boolean,
            Self::BitString(_) => NodeTag::BitString,
            Self::Null => NodeTag::Null,
        }
    }

    fn children(&self) -> Vec<&dyn AstNode> {
        Vec::new()
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::String(s) => f.write_str(&quote_literal(s)),
            Self::Integer(i) => write!(f, "{i}"),
            Self::Float(s) => f.write_str(s),
            Self::Boolean(true) => f.write_str("TRUE"),
            Self::Boolean(false) => f.write_str("FALSE"),
            Self::BitString(s) => match s.strip_prefix('x') {
                Some(digits) => write!(f, "X'{digits}'"),
                None => write!(f, "B'{}'", s.strip_prefix('b').unwrap_or(s)),
            },
            Self::Null => f.write_str("NULL"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tags() {
        assert_eq!(Value::String("a".into()).tag().as_str(), "T_String");
        assert_eq!(Value::Integer(1).tag().as_str(), "T_Integer");
        assert_eq!(Value::Float("1.5".into()).tag().as_str(), "T_Float");
        assert_eq!(Value::Boolean(true).tag().as_str(), "T_Boolean");
        assert_eq!(Value::BitString("b01".into()).tag().as_str(), "T_BitString");
        assert_eq!(Value::Null.tag().as_str(), "T_Null");
    }

    #[test]
    fn test_render() {
        assert_eq!(Value::String("it's".into()).to_string(), "'it''s'");
        assert_eq!(Value::Integer(-3).to_string(), "-3");
        assert_eq!(Value::Float("1e10".into()).to_string(), "1e10");
        assert_eq!(Value::BitString("b0101".into()).to_string(), "B'0101'");
        assert_eq!(Value::BitString("x1F".into()).to_string(), "X'1F'");
        assert_eq!(Value::Null.to_string(), "NULL");
    }

    #[test]
    fn test_negated() {
        assert_eq!(Value::Integer(5).negated(), Some(Value::Integer(-5)));
        assert_eq!(
            Value::Integer(i32::MIN).negated(),
            Some(Value::Float("2147483648".into()))
        );
        assert_eq!(
            Value::Float("2147483648".into()).negated(),
            Some(Value::Float("-2147483648".into()))
        );
        assert_eq!(Value::Float("-1.5".into()).negated(), Some(Value::Float("1.5".into())));
        assert_eq!(Value::Null.negated(), None);
    }
}
