//! The pull interface over the raw lexer.
//!
//! [`Scanner`] resolves the keywords whose token code depends on the next
//! token and decodes `U&` literals, which needs a look at a trailing
//! `UESCAPE` clause. Both require buffering one raw token.

use std::borrow::Cow;
use std::io::Read;

use tracing::trace;

use super::tokenizer::{truncate_identifier, Lexer, ScanOptions};
use super::unicode::{check_uescape, decode_unicode_escapes};
use super::{Keyword, Span, Token, TokenKind};
use crate::dialect::{Dialect, PostgresDialect};
use crate::diagnostics::{Diagnostic, ErrorSaveContext, Location};
use crate::error::Result;

/// Pull-based token source with one token of lookahead.
#[derive(Debug)]
pub struct Scanner<'a> {
    lexer: Lexer<'a>,
    errors: ErrorSaveContext,
    lookahead: Option<Token>,
    options: ScanOptions,
}

impl<'a> Scanner<'a> {
    /// Creates a scanner using the default PostgreSQL settings.
    #[must_use]
    pub fn new(input: impl Into<Cow<'a, str>>) -> Self {
        Self::with_dialect(input, &PostgresDialect::new())
    }

    /// Creates a scanner using the settings of `dialect`.
    #[must_use]
    pub fn with_dialect(input: impl Into<Cow<'a, str>>, dialect: &dyn Dialect) -> Self {
        let options = ScanOptions::from_dialect(dialect);
        Self {
            lexer: Lexer::new(input, options),
            errors: ErrorSaveContext::new(),
            lookahead: None,
            options,
        }
    }

    /// Reads all of `reader` and creates a scanner over it.
    ///
    /// # Errors
    ///
    /// Returns an error if reading fails or the bytes are not valid UTF-8.
    pub fn from_reader(mut reader: impl Read, dialect: &dyn Dialect) -> Result<Scanner<'static>> {
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes)?;
        let text = String::from_utf8(bytes)?;
        Ok(Scanner::with_dialect(text, dialect))
    }

    /// Returns the full input text.
    #[must_use]
    pub fn source(&self) -> &str {
        self.lexer.source()
    }

    /// Returns the diagnostics recorded so far.
    #[must_use]
    pub fn diagnostics(&self) -> &[Diagnostic] {
        self.errors.diagnostics()
    }

    /// Gives mutable access to the error context shared with the parser.
    pub fn errors_mut(&mut self) -> &mut ErrorSaveContext {
        &mut self.errors
    }

    /// Consumes the scanner, returning its diagnostics.
    #[must_use]
    pub fn into_diagnostics(self) -> Vec<Diagnostic> {
        self.errors.into_diagnostics()
    }

    /// Returns the location of byte `offset` in the input.
    #[must_use]
    pub fn location(&self, offset: usize) -> Location {
        self.lexer.location(offset)
    }

    /// Returns the next token. After the end of input this keeps returning
    /// [`TokenKind::Eof`].
    pub fn next_token(&mut self) -> Token {
        let raw = match self.lookahead.take() {
            Some(token) => token,
            None => self.lexer.next_token(&mut self.errors),
        };
        let token = self.resolve(raw);
        trace!(kind = ?token.kind, start = token.span.start, "token");
        token
    }

    /// Scans the remaining input, including the final EOF token.
    #[must_use]
    pub fn tokenize(mut self) -> (Vec<Token>, Vec<Diagnostic>) {
        let mut tokens = Vec::new();
        loop {
            let token = self.next_token();
            let done = token.is_eof();
            tokens.push(token);
            if done {
                break;
            }
        }
        (tokens, self.into_diagnostics())
    }

    fn resolve(&mut self, token: Token) -> Token {
        match token.kind {
            TokenKind::Keyword(kw) if kw.entry().lookahead => {
                let next = self.lexer.next_token(&mut self.errors);
                let kind = resolve_lookahead(kw, next.as_keyword());
                self.lookahead = Some(next);
                Token::new(kind, token.span)
            }
            TokenKind::UConst(body) => {
                let escape = self.unicode_escape_char();
                let decoded = decode_unicode_escapes(&body, escape);
                self.report_decoding(token.span, decoded.errors);
                Token::new(TokenKind::SConst(decoded.text), token.span)
            }
            TokenKind::UIdent(body) => {
                let escape = self.unicode_escape_char();
                let decoded = decode_unicode_escapes(&body, escape);
                self.report_decoding(token.span, decoded.errors);
                let mut ident = decoded.text;
                if ident.is_empty() {
                    let at = self.location(token.span.start);
                    self.errors
                        .error("zero-length delimited identifier", Some(at));
                }
                let lexer = &self.lexer;
                truncate_identifier(
                    &mut ident,
                    self.options.max_identifier_length,
                    &mut self.errors,
                    || lexer.location(token.span.start),
                );
                Token::new(TokenKind::Ident(ident), token.span)
            }
            _ => token,
        }
    }

    fn report_decoding(&mut self, span: Span, errors: Vec<&'static str>) {
        if errors.is_empty() {
            return;
        }
        let at = self.location(span.start);
        for message in errors {
            self.errors.error(message, Some(at));
        }
    }

    /// Consumes an optional `UESCAPE 'c'` clause and returns the escape
    /// character to decode with.
    fn unicode_escape_char(&mut self) -> char {
        let next = self.lexer.next_token(&mut self.errors);
        if next.as_keyword() != Some(Keyword::Uescape) {
            self.lookahead = Some(next);
            return '\\';
        }
        let operand = self.lexer.next_token(&mut self.errors);
        let at = self.location(operand.span.start);
        if let TokenKind::SConst(text) = &operand.kind {
            if let Some(escape) = check_uescape(text) {
                return escape;
            }
            self.errors.error("invalid Unicode escape character", Some(at));
            return '\\';
        }
        self.errors
            .error("UESCAPE must be followed by a simple string literal", Some(at));
        self.lookahead = Some(operand);
        '\\'
    }
}

fn resolve_lookahead(kw: Keyword, next: Option<Keyword>) -> TokenKind {
    match (kw, next) {
        (
            Keyword::Not,
            Some(Keyword::Between | Keyword::In | Keyword::Like | Keyword::Ilike | Keyword::Similar),
        ) => TokenKind::NotLa,
        (Keyword::Nulls, Some(Keyword::First | Keyword::Last)) => TokenKind::NullsLa,
        (Keyword::With, Some(Keyword::Time | Keyword::Ordinality)) => TokenKind::WithLa,
        (Keyword::Without, Some(Keyword::Time)) => TokenKind::WithoutLa,
        _ => TokenKind::Keyword(kw),
    }
}
