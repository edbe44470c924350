//! Token types produced by the scanner.

use std::fmt;

use super::{Keyword, Span};
use crate::ast::Value;

/// The kind of token, carrying its semantic value where it has one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenKind {
    // Literals
    /// Case-folded bare identifier or delimited identifier.
    Ident(String),
    /// String constant with escapes resolved.
    SConst(String),
    /// Integer constant that fits in 32 bits.
    IConst(i32),
    /// Any other numeric constant, kept as written.
    FConst(String),
    /// Bit string constant (`B'0101'`), digits only.
    BConst(String),
    /// Hex string constant (`X'1F'`), digits only.
    XConst(String),
    /// Positional parameter (`$1`).
    Param(i32),
    /// Undecoded `U&"..."` body. Resolved to [`TokenKind::Ident`] by the scanner.
    UIdent(String),
    /// Undecoded `U&'...'` body. Resolved to [`TokenKind::SConst`] by the scanner.
    UConst(String),

    /// SQL keyword.
    Keyword(Keyword),
    /// `NOT` followed by `BETWEEN`, `IN`, `LIKE`, `ILIKE` or `SIMILAR`.
    NotLa,
    /// `NULLS` followed by `FIRST` or `LAST`.
    NullsLa,
    /// `WITH` followed by `TIME` or `ORDINALITY`.
    WithLa,
    /// `WITHOUT` followed by `TIME`.
    WithoutLa,

    // Operators
    /// Any operator without a dedicated token.
    Op(String),
    /// +
    Plus,
    /// -
    Minus,
    /// *
    Star,
    /// /
    Slash,
    /// %
    Percent,
    /// ^
    Caret,
    /// =
    Eq,
    /// <
    Lt,
    /// >
    Gt,
    /// <=
    LtEq,
    /// >=
    GtEq,
    /// <> or !=
    NotEq,
    /// ::
    Typecast,
    /// ..
    DotDot,
    /// :=
    ColonEquals,
    /// =>
    EqualsGreater,

    // Delimiters
    /// (
    LeftParen,
    /// )
    RightParen,
    /// [
    LeftBracket,
    /// ]
    RightBracket,
    /// ,
    Comma,
    /// ;
    Semicolon,
    /// .
    Dot,
    /// :
    Colon,

    // Special
    /// A character no lexical rule accepts.
    Other(char),
    /// End of input.
    Eof,
}

impl TokenKind {
    /// Returns the operator spelling for operator tokens.
    #[must_use]
    pub fn operator(&self) -> Option<&str> {
        Some(match self {
            Self::Op(op) => op,
            Self::Plus => "+",
            Self::Minus => "-",
            Self::Star => "*",
            Self::Slash => "/",
            Self::Percent => "%",
            Self::Caret => "^",
            Self::Eq => "=",
            Self::Lt => "<",
            Self::Gt => ">",
            Self::LtEq => "<=",
            Self::GtEq => ">=",
            Self::NotEq => "<>",
            _ => return None,
        })
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ident(s) | Self::UIdent(s) => write!(f, "identifier \"{s}\""),
            Self::SConst(_) | Self::UConst(_) => f.write_str("string constant"),
            Self::IConst(i) => write!(f, "{i}"),
            Self::FConst(s) => f.write_str(s),
            Self::BConst(s) => write!(f, "B'{s}'"),
            Self::XConst(s) => write!(f, "X'{s}'"),
            Self::Param(n) => write!(f, "${n}"),
            Self::Keyword(kw) => write!(f, "{kw}"),
            Self::NotLa => f.write_str("NOT"),
            Self::NullsLa => f.write_str("NULLS"),
            Self::WithLa => f.write_str("WITH"),
            Self::WithoutLa => f.write_str("WITHOUT"),
            Self::Typecast => f.write_str("::"),
            Self::DotDot => f.write_str(".."),
            Self::ColonEquals => f.write_str(":="),
            Self::EqualsGreater => f.write_str("=>"),
            Self::LeftParen => f.write_str("("),
            Self::RightParen => f.write_str(")"),
            Self::LeftBracket => f.write_str("["),
            Self::RightBracket => f.write_str("]"),
            Self::Comma => f.write_str(","),
            Self::Semicolon => f.write_str(";"),
            Self::Dot => f.write_str("."),
            Self::Colon => f.write_str(":"),
            Self::Other(c) => write!(f, "{c}"),
            Self::Eof => f.write_str("end of input"),
            op => f.write_str(op.operator().unwrap_or_default()),
        }
    }
}

/// A token with its span in the source code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    /// The kind of token.
    pub kind: TokenKind,
    /// The location in the source code.
    pub span: Span,
}

impl Token {
    /// Creates a new token.
    #[must_use]
    pub const fn new(kind: TokenKind, span: Span) -> Self {
        Self { kind, span }
    }

    /// Returns true if this is an EOF token.
    #[must_use]
    pub const fn is_eof(&self) -> bool {
        matches!(self.kind, TokenKind::Eof)
    }

    /// Returns the keyword if this is a plain keyword token.
    #[must_use]
    pub const fn as_keyword(&self) -> Option<Keyword> {
        match &self.kind {
            TokenKind::Keyword(kw) => Some(*kw),
            _ => None,
        }
    }

    /// Returns the semantic value carried by the token.
    ///
    /// Identifiers and keywords yield their (folded) spelling as a string.
    #[must_use]
    pub fn semantic_value(&self) -> Option<Value> {
        match &self.kind {
            TokenKind::Ident(s) | TokenKind::SConst(s) => Some(Value::String(s.clone())),
            TokenKind::IConst(i) | TokenKind::Param(i) => Some(Value::Integer(*i)),
            TokenKind::FConst(s) => Some(Value::Float(s.clone())),
            TokenKind::BConst(s) => Some(Value::BitString(format!("b{s}"))),
            TokenKind::XConst(s) => Some(Value::BitString(format!("x{s}"))),
            TokenKind::Keyword(kw) => Some(Value::String(kw.as_str().to_owned())),
            TokenKind::Op(op) => Some(Value::String(op.clone())),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_is_eof() {
        let eof = Token::new(TokenKind::Eof, Span::new(0, 0));
        let select = Token::new(TokenKind::Keyword(Keyword::Select), Span::new(0, 6));
        assert!(eof.is_eof());
        assert!(!select.is_eof());
    }

    #[test]
    fn test_token_as_keyword() {
        let select = Token::new(TokenKind::Keyword(Keyword::Select), Span::new(0, 6));
        let plus = Token::new(TokenKind::Plus, Span::new(0, 1));
        assert_eq!(select.as_keyword(), Some(Keyword::Select));
        assert_eq!(plus.as_keyword(), None);
    }

    #[test]
    fn test_semantic_value() {
        let ident = Token::new(TokenKind::Ident("table_a".into()), Span::new(0, 7));
        assert_eq!(ident.semantic_value(), Some(Value::String("table_a".into())));
        let bits = Token::new(TokenKind::XConst("1F".into()), Span::new(0, 5));
        assert_eq!(bits.semantic_value(), Some(Value::BitString("x1F".into())));
        let comma = Token::new(TokenKind::Comma, Span::new(0, 1));
        assert_eq!(comma.semantic_value(), None);
    }

    #[test]
    fn test_operator_spelling() {
        assert_eq!(TokenKind::NotEq.operator(), Some("<>"));
        assert_eq!(TokenKind::Op("||".into()).operator(), Some("||"));
        assert_eq!(TokenKind::Comma.operator(), None);
        assert_eq!(TokenKind::Op("@>".into()).to_string(), "@>");
    }
}
