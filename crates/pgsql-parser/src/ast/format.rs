//! Rendering helpers shared by the node `Display` impls.

use std::borrow::Cow;
use std::fmt;

use super::expression::{AExprKind, BoolExprType, FuncFormat, SubLinkType};
use super::{Node, Value};
use crate::lexer::keywords::{self, KeywordCategory};

/// Binding strength of rendered expressions, loosest first.
pub(crate) mod prec {
    pub const OR: u8 = 1;
    pub const AND: u8 = 2;
    pub const NOT: u8 = 3;
    pub const IS: u8 = 4;
    pub const CMP: u8 = 5;
    pub const LIKE: u8 = 6;
    pub const OP: u8 = 8;
    pub const ADD: u8 = 9;
    pub const MUL: u8 = 10;
    pub const EXP: u8 = 11;
    pub const AT: u8 = 12;
    pub const COLLATE: u8 = 13;
    pub const UNARY: u8 = 14;
    pub const TYPECAST: u8 = 16;
    pub const PRIMARY: u8 = 20;
}

/// Quotes `ident` unless it can be written bare.
///
/// A bare identifier consists of lowercase ASCII letters, digits and
/// underscores, does not start with a digit, and is not a keyword outside
/// the unreserved category. Otherwise the name is wrapped in double quotes
/// with embedded quotes doubled.
#[must_use]
pub fn quote_identifier(ident: &str) -> Cow<'_, str> {
    let safe_chars = ident
        .chars()
        .next()
        .is_some_and(|c| c.is_ascii_lowercase() || c == '_')
        && ident
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_');
    let reserved = keywords::lookup(ident)
        .is_some_and(|entry| entry.category != KeywordCategory::Unreserved);
    if safe_chars && !reserved {
        Cow::Borrowed(ident)
    } else {
        Cow::Owned(format!("\"{}\"", ident.replace('"', "\"\"")))
    }
}

/// Renders a string constant, switching to `E''` syntax when the text
/// contains a backslash.
#[must_use]
pub fn quote_literal(text: &str) -> String {
    let doubled = text.replace('\'', "''");
    if text.contains('\\') {
        format!("E'{}'", doubled.replace('\\', "\\\\"))
    } else {
        format!("'{doubled}'")
    }
}

/// Displays an identifier, quoted as needed.
pub(crate) struct Ident<'a>(pub &'a str);

impl fmt::Display for Ident<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&quote_identifier(self.0))
    }
}

/// Displays a dotted name, each part quoted as needed.
pub(crate) struct QualifiedName<'a>(pub &'a [String]);

impl fmt::Display for QualifiedName<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, part) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(".")?;
            }
            write!(f, "{}", Ident(part))?;
        }
        Ok(())
    }
}

/// Displays a comma separated list of identifiers.
pub(crate) struct IdentList<'a>(pub &'a [String]);

impl fmt::Display for IdentList<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, part) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}", Ident(part))?;
        }
        Ok(())
    }
}

/// Displays items joined by a separator.
pub(crate) struct Sep<'a, T>(pub &'a [T], pub &'static str);

impl<T: fmt::Display> fmt::Display for Sep<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, item) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(self.1)?;
            }
            write!(f, "{item}")?;
        }
        Ok(())
    }
}

/// Comma separated list.
pub(crate) fn comma<T>(items: &[T]) -> Sep<'_, T> {
    Sep(items, ", ")
}

/// Displays a node, parenthesized when `wrap` holds.
pub(crate) struct Wrapped<'a>(pub &'a Node, pub bool);

impl fmt::Display for Wrapped<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.1 {
            write!(f, "({})", self.0)
        } else {
            write!(f, "{}", self.0)
        }
    }
}

/// Left operand of a left-associative operator at `level`.
pub(crate) fn left(node: &Node, level: u8) -> Wrapped<'_> {
    Wrapped(node, precedence(node) < level)
}

/// Right operand of a left-associative operator, or any operand of a
/// non-associative one, at `level`.
pub(crate) fn tight(node: &Node, level: u8) -> Wrapped<'_> {
    Wrapped(node, precedence(node) <= level)
}

/// Level of a binary operator spelled `op`.
pub(crate) fn operator_precedence(op: &str) -> u8 {
    match op {
        "=" | "<" | ">" | "<=" | ">=" | "<>" => prec::CMP,
        "+" | "-" => prec::ADD,
        "*" | "/" | "%" => prec::MUL,
        "^" => prec::EXP,
        _ => prec::OP,
    }
}

/// Returns how tightly `node` binds when rendered.
pub(crate) fn precedence(node: &Node) -> u8 {
    match node {
        Node::BoolExpr(b) => match b.boolop {
            BoolExprType::Or => prec::OR,
            BoolExprType::And => prec::AND,
            BoolExprType::Not => prec::NOT,
        },
        Node::NullTest(_) | Node::BooleanTest(_) => prec::IS,
        Node::AExpr(e) => match e.kind {
            AExprKind::Op | AExprKind::OpAny | AExprKind::OpAll if e.lexpr.is_none() => {
                if matches!(e.name.as_str(), "-" | "+") {
                    prec::UNARY
                } else {
                    prec::OP
                }
            }
            AExprKind::Op | AExprKind::OpAny | AExprKind::OpAll => operator_precedence(&e.name),
            AExprKind::Distinct | AExprKind::NotDistinct => prec::IS,
            AExprKind::NullIf => prec::PRIMARY,
            _ => prec::LIKE,
        },
        Node::SubLink(s) => match (s.sub_link_type, &s.oper_name) {
            (SubLinkType::Any, None) => prec::LIKE,
            (SubLinkType::Any | SubLinkType::All, Some(op)) => operator_precedence(op),
            _ => prec::PRIMARY,
        },
        Node::CollateClause(_) => prec::COLLATE,
        Node::FuncCall(f) if f.func_format == FuncFormat::SqlSyntax && f.is_timezone() => prec::AT,
        Node::AConst(c) => match &c.val {
            Value::Integer(i) if *i < 0 => prec::UNARY,
            Value::Float(s) if s.starts_with('-') => prec::UNARY,
            _ => prec::PRIMARY,
        },
        _ => prec::PRIMARY,
    }
}
