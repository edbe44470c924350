//! Pratt expression parser for operator precedence.
//!
//! Binding powers are derived from the rendering precedence levels so that
//! the parser and the `Display` impls agree on grouping. A level `L` binds
//! with `(2L, 2L + 1)`, which makes every binary operator left associative.

use crate::ast::prec;
use crate::lexer::{Keyword, TokenKind};

/// Left binding power of an operator at `level`.
#[must_use]
pub const fn left_bp(level: u8) -> u8 {
    level * 2
}

/// Right binding power of an operator at `level`.
#[must_use]
pub const fn right_bp(level: u8) -> u8 {
    level * 2 + 1
}

/// Returns the binding power of a prefix operator's operand.
///
/// Returns `None` if the token is not a prefix operator.
#[must_use]
pub const fn prefix_binding_power(kind: &TokenKind) -> Option<u8> {
    match kind {
        TokenKind::Keyword(Keyword::Not) => Some(right_bp(prec::NOT)),
        TokenKind::Minus | TokenKind::Plus => Some(right_bp(prec::UNARY)),
        TokenKind::Op(_) => Some(right_bp(prec::OP)),
        _ => None,
    }
}

/// Returns the precedence level of an infix or postfix operator.
///
/// `AT` only counts when followed by `TIME ZONE`, which the caller checks.
#[must_use]
pub const fn infix_level(kind: &TokenKind) -> Option<u8> {
    let level = match kind {
        TokenKind::Keyword(Keyword::Or) => prec::OR,
        TokenKind::Keyword(Keyword::And) => prec::AND,
        TokenKind::Keyword(Keyword::Is | Keyword::Isnull | Keyword::Notnull) => prec::IS,
        TokenKind::Eq
        | TokenKind::NotEq
        | TokenKind::Lt
        | TokenKind::LtEq
        | TokenKind::Gt
        | TokenKind::GtEq => prec::CMP,
        TokenKind::Keyword(
            Keyword::Between | Keyword::In | Keyword::Like | Keyword::Ilike | Keyword::Similar,
        )
        | TokenKind::NotLa => prec::LIKE,
        TokenKind::Op(_) => prec::OP,
        TokenKind::Plus | TokenKind::Minus => prec::ADD,
        TokenKind::Star | TokenKind::Slash | TokenKind::Percent => prec::MUL,
        TokenKind::Caret => prec::EXP,
        TokenKind::Keyword(Keyword::At) => prec::AT,
        TokenKind::Keyword(Keyword::Collate) => prec::COLLATE,
        TokenKind::Typecast => prec::TYPECAST,
        _ => return None,
    };
    Some(level)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn level(kind: &TokenKind) -> u8 {
        infix_level(kind).unwrap()
    }

    #[test]
    fn test_precedence_ordering() {
        assert!(level(&TokenKind::Star) > level(&TokenKind::Plus));
        assert!(level(&TokenKind::Keyword(Keyword::And)) > level(&TokenKind::Keyword(Keyword::Or)));

        // LIKE binds tighter than comparisons, IS looser
        let eq = level(&TokenKind::Eq);
        assert!(level(&TokenKind::Keyword(Keyword::Like)) > eq);
        assert!(level(&TokenKind::Keyword(Keyword::Is)) < eq);
    }

    #[test]
    fn test_left_associativity() {
        let caret = level(&TokenKind::Caret);
        assert!(left_bp(caret) < right_bp(caret));
        // the next level up still beats this level's right operand
        assert!(left_bp(caret + 1) > right_bp(caret));
    }

    #[test]
    fn test_prefix_operators() {
        let not = prefix_binding_power(&TokenKind::Keyword(Keyword::Not)).unwrap();
        // NOT a IS NULL groups as NOT (a IS NULL)
        assert!(left_bp(level(&TokenKind::Keyword(Keyword::Is))) > not);
        let neg = prefix_binding_power(&TokenKind::Minus).unwrap();
        assert!(left_bp(level(&TokenKind::Typecast)) > neg);
        assert_eq!(prefix_binding_power(&TokenKind::Comma), None);
    }

    #[test]
    fn test_non_operators() {
        assert_eq!(infix_level(&TokenKind::Comma), None);
        assert_eq!(infix_level(&TokenKind::Keyword(Keyword::From)), None);
        assert_eq!(infix_level(&TokenKind::NotLa), Some(prec::LIKE));
    }
}
