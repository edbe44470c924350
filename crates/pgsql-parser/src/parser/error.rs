//! Parser error types.

use thiserror::Error;

use crate::lexer::{Span, Token, TokenKind};

/// A parse error.
///
/// Productions return it through `?`; the statement loop turns it into an
/// ERROR diagnostic and resumes after the next `;`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message} at position {}..{}", .span.start, .span.end)]
pub struct ParseError {
    /// The error message.
    pub message: String,
    /// The location of the error.
    pub span: Span,
    /// Expected tokens (if applicable).
    pub expected: Option<String>,
    /// The actual token found.
    pub found: Option<TokenKind>,
}

impl ParseError {
    /// Creates a new parse error.
    #[must_use]
    pub fn new(message: impl Into<String>, span: Span) -> Self {
        Self {
            message: message.into(),
            span,
            expected: None,
            found: None,
        }
    }

    /// Creates a syntax error pointing at `token`, whose source text is `text`.
    #[must_use]
    pub fn syntax(token: &Token, text: &str) -> Self {
        let message = if token.is_eof() {
            "syntax error at end of input".to_owned()
        } else {
            format!("syntax error at or near \"{text}\"")
        };
        Self {
            message,
            span: token.span,
            expected: None,
            found: Some(token.kind.clone()),
        }
    }

    /// Creates an "unexpected token" error.
    #[must_use]
    pub fn unexpected(expected: impl Into<String>, token: &Token, text: &str) -> Self {
        Self {
            expected: Some(expected.into()),
            ..Self::syntax(token, text)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_syntax_error_message() {
        let token = Token::new(TokenKind::Comma, Span::new(7, 8));
        let err = ParseError::syntax(&token, ",");
        assert_eq!(err.message, "syntax error at or near \",\"");
        assert_eq!(err.to_string(), "syntax error at or near \",\" at position 7..8");
        assert_eq!(err.found, Some(TokenKind::Comma));
    }

    #[test]
    fn test_end_of_input() {
        let token = Token::new(TokenKind::Eof, Span::new(12, 12));
        let err = ParseError::unexpected("expression", &token, "");
        assert_eq!(err.message, "syntax error at end of input");
        assert_eq!(err.expected.as_deref(), Some("expression"));
    }
}
