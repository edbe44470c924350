//! SQL Parser implementation.

use std::mem;

use tracing::debug;

use super::error::ParseError;
use crate::ast::{Node, RangeVar, RawStmt};
use crate::dialect::Dialect;
use crate::diagnostics::{Diagnostic, Severity};
use crate::lexer::{Keyword, KeywordCategory, Scanner, Span, Token, TokenKind};

/// Outcome of parsing a whole input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseResult {
    /// False if any statement had a syntax error.
    pub success: bool,
    /// The statements that parsed, in source order.
    pub statements: Vec<RawStmt>,
    /// Lexical and syntax diagnostics, in the order they were reported.
    pub diagnostics: Vec<Diagnostic>,
}

impl ParseResult {
    /// Returns true if parsing succeeded and no ERROR was recorded.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.success && !self.diagnostics.iter().any(Diagnostic::is_error)
    }

    /// Returns the recorded warnings.
    pub fn warnings(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == Severity::Warning)
    }

    /// Returns the recorded errors.
    pub fn errors(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter().filter(|d| d.is_error())
    }
}

/// How deeply expressions and subqueries may nest before the parser gives
/// up on a statement.
pub const MAX_NESTING_DEPTH: usize = 100;

/// SQL Parser.
///
/// Pulls tokens from a [`Scanner`] with up to two tokens of lookahead.
pub struct Parser<'a> {
    pub(super) scanner: Scanner<'a>,
    pub(super) current: Token,
    pub(super) previous: Token,
    peeked: Option<Token>,
    depth: usize,
}

impl<'a> Parser<'a> {
    /// Creates a new parser for the given input.
    #[must_use]
    pub fn new(input: &'a str) -> Self {
        Self::from_scanner(Scanner::new(input))
    }

    /// Creates a parser using the lexical settings of `dialect`.
    #[must_use]
    pub fn with_dialect(input: &'a str, dialect: &dyn Dialect) -> Self {
        Self::from_scanner(Scanner::with_dialect(input, dialect))
    }

    /// Creates a parser reading from an existing scanner.
    #[must_use]
    pub fn from_scanner(mut scanner: Scanner<'a>) -> Self {
        let current = scanner.next_token();
        Self {
            scanner,
            current,
            previous: Token::new(TokenKind::Eof, Span::new(0, 0)),
            peeked: None,
            depth: 0,
        }
    }

    /// Parses every statement in the input.
    ///
    /// A statement with a syntax error is reported and skipped up to the
    /// next `;`; parsing continues with the statement after it.
    #[must_use]
    pub fn parse(mut self) -> ParseResult {
        let mut statements = Vec::new();
        let mut success = true;
        loop {
            while self.check(&TokenKind::Semicolon) {
                self.advance();
            }
            if self.current.is_eof() {
                break;
            }
            let start = self.current.span.start;
            let result = self.parse_statement().and_then(|stmt| {
                if self.check(&TokenKind::Semicolon) || self.current.is_eof() {
                    Ok(stmt)
                } else {
                    Err(self.syntax_error())
                }
            });
            match result {
                Ok(stmt) => statements.push(RawStmt {
                    stmt,
                    stmt_location: start,
                    stmt_len: self.previous.span.end.saturating_sub(start),
                }),
                Err(err) => {
                    success = false;
                    debug!(error = %err, "skipping to next statement");
                    self.report(&err);
                    self.synchronize();
                }
            }
        }
        debug!(statements = statements.len(), success, "parse finished");
        ParseResult {
            success,
            statements,
            diagnostics: self.scanner.into_diagnostics(),
        }
    }

    /// Parses a single SQL statement.
    ///
    /// # Errors
    ///
    /// Returns a `ParseError` if the input is not a valid SQL statement.
    pub fn parse_statement(&mut self) -> Result<Node, ParseError> {
        match &self.current.kind {
            TokenKind::Keyword(Keyword::Select | Keyword::Values) | TokenKind::LeftParen => {
                Ok(self.parse_select_stmt()?.into())
            }
            TokenKind::Keyword(Keyword::With) => self.parse_with_statement(),
            TokenKind::Keyword(Keyword::Insert) => Ok(self.parse_insert()?.into()),
            TokenKind::Keyword(Keyword::Update) => Ok(self.parse_update()?.into()),
            TokenKind::Keyword(Keyword::Delete) => Ok(self.parse_delete()?.into()),
            TokenKind::Keyword(Keyword::Create) => self.parse_create(),
            TokenKind::Keyword(Keyword::Drop) => Ok(self.parse_drop()?.into()),
            TokenKind::Keyword(Keyword::Truncate) => Ok(self.parse_truncate()?.into()),
            TokenKind::Keyword(
                Keyword::Begin
                | Keyword::Start
                | Keyword::Commit
                | Keyword::End
                | Keyword::Rollback
                | Keyword::Abort
                | Keyword::Savepoint
                | Keyword::Release,
            ) => Ok(self.parse_transaction()?.into()),
            TokenKind::Keyword(Keyword::Set) => Ok(self.parse_variable_set()?.into()),
            TokenKind::Keyword(Keyword::Reset) => Ok(self.parse_variable_reset()?.into()),
            TokenKind::Keyword(Keyword::Show) => Ok(self.parse_variable_show()?.into()),
            _ => Err(self.syntax_error()),
        }
    }

    /// Records `err` as an ERROR diagnostic.
    fn report(&mut self, err: &ParseError) {
        let location = self.scanner.location(err.span.start);
        self.scanner
            .errors_mut()
            .error(err.message.clone(), Some(location));
    }

    /// Skips tokens up to the next `;` or the end of input.
    fn synchronize(&mut self) {
        while !self.check(&TokenKind::Semicolon) && !self.current.is_eof() {
            self.advance();
        }
    }

    /// Runs a recursive production one nesting level deeper.
    ///
    /// Fails with `stack depth limit exceeded` past [`MAX_NESTING_DEPTH`].
    pub(super) fn nested<T>(
        &mut self,
        production: impl FnOnce(&mut Self) -> Result<T, ParseError>,
    ) -> Result<T, ParseError> {
        if self.depth >= MAX_NESTING_DEPTH {
            return Err(ParseError::new(
                "stack depth limit exceeded",
                self.current.span,
            ));
        }
        self.depth += 1;
        let result = production(self);
        self.depth -= 1;
        result
    }

    /// Records a WARNING at `span`.
    pub(super) fn warn(&mut self, message: impl Into<String>, span: Span) {
        let location = self.scanner.location(span.start);
        self.scanner.errors_mut().warning(message, Some(location));
    }

    /// Advances to the next token.
    pub(super) fn advance(&mut self) {
        let next = match self.peeked.take() {
            Some(token) => token,
            None => self.scanner.next_token(),
        };
        self.previous = mem::replace(&mut self.current, next);
    }

    /// Returns the token after the current one without consuming anything.
    pub(super) fn peek(&mut self) -> &TokenKind {
        let scanner = &mut self.scanner;
        &self.peeked.get_or_insert_with(|| scanner.next_token()).kind
    }

    /// Returns true if the token after the current one is `keyword`.
    pub(super) fn peek_keyword(&mut self, keyword: Keyword) -> bool {
        matches!(self.peek(), TokenKind::Keyword(kw) if *kw == keyword)
    }

    /// Checks if the current token matches the given kind.
    pub(super) fn check(&self, kind: &TokenKind) -> bool {
        mem::discriminant(&self.current.kind) == mem::discriminant(kind)
    }

    /// Checks if the current token is the given keyword.
    pub(super) fn check_keyword(&self, keyword: Keyword) -> bool {
        matches!(&self.current.kind, TokenKind::Keyword(kw) if *kw == keyword)
    }

    /// Consumes the current token if it matches the given kind.
    pub(super) fn consume(&mut self, kind: &TokenKind) -> bool {
        let matched = self.check(kind);
        if matched {
            self.advance();
        }
        matched
    }

    /// Consumes the current token if it is the given keyword.
    pub(super) fn consume_keyword(&mut self, keyword: Keyword) -> bool {
        let matched = self.check_keyword(keyword);
        if matched {
            self.advance();
        }
        matched
    }

    /// Expects the current token to be the given kind.
    pub(super) fn expect(&mut self, kind: &TokenKind) -> Result<(), ParseError> {
        if self.consume(kind) {
            Ok(())
        } else {
            Err(self.unexpected(kind.to_string()))
        }
    }

    /// Expects the current token to be the given keyword.
    pub(super) fn expect_keyword(&mut self, keyword: Keyword) -> Result<(), ParseError> {
        if self.consume_keyword(keyword) {
            Ok(())
        } else {
            Err(self.unexpected(keyword.to_string()))
        }
    }

    /// A syntax error at the current token.
    pub(super) fn syntax_error(&self) -> ParseError {
        ParseError::syntax(&self.current, self.current_text())
    }

    /// A syntax error at the current token, noting what was expected.
    pub(super) fn unexpected(&self, expected: impl Into<String>) -> ParseError {
        ParseError::unexpected(expected, &self.current, self.current_text())
    }

    fn current_text(&self) -> &str {
        self.current.span.text(self.scanner.source())
    }

    /// Returns the keyword the current token spells, including the
    /// lookahead-resolved forms.
    pub(super) const fn current_keyword(&self) -> Option<Keyword> {
        match &self.current.kind {
            TokenKind::Keyword(kw) => Some(*kw),
            TokenKind::NotLa => Some(Keyword::Not),
            TokenKind::NullsLa => Some(Keyword::Nulls),
            TokenKind::WithLa => Some(Keyword::With),
            TokenKind::WithoutLa => Some(Keyword::Without),
            _ => None,
        }
    }

    /// Returns true if the current token can be a column or table name.
    pub(super) fn at_col_id(&self) -> bool {
        match &self.current.kind {
            TokenKind::Ident(_) => true,
            TokenKind::Keyword(kw) => kw.is_col_id(),
            _ => false,
        }
    }

    /// Parses a column or table name: an identifier or a keyword that is
    /// not reserved for other uses.
    pub(super) fn parse_col_id(&mut self) -> Result<String, ParseError> {
        match &self.current.kind {
            TokenKind::Ident(name) => {
                let name = name.clone();
                self.advance();
                Ok(name)
            }
            TokenKind::Keyword(kw) if kw.is_col_id() => {
                let name = kw.as_str().to_owned();
                self.advance();
                Ok(name)
            }
            _ => Err(self.unexpected("identifier")),
        }
    }

    /// Parses a function or type name.
    pub(super) fn parse_type_function_name(&mut self) -> Result<String, ParseError> {
        match &self.current.kind {
            TokenKind::Ident(name) => {
                let name = name.clone();
                self.advance();
                Ok(name)
            }
            TokenKind::Keyword(kw) if kw.is_type_func_name() => {
                let name = kw.as_str().to_owned();
                self.advance();
                Ok(name)
            }
            _ => Err(self.unexpected("identifier")),
        }
    }

    /// Parses a label, where any keyword is allowed.
    pub(super) fn parse_col_label(&mut self) -> Result<String, ParseError> {
        if let TokenKind::Ident(name) = &self.current.kind {
            let name = name.clone();
            self.advance();
            return Ok(name);
        }
        match self.current_keyword() {
            Some(kw) => {
                self.advance();
                Ok(kw.as_str().to_owned())
            }
            None => Err(self.unexpected("identifier")),
        }
    }

    /// Parses a column label after `AS`; reserved keywords are accepted with
    /// a warning.
    pub(super) fn parse_col_label_checked(&mut self) -> Result<String, ParseError> {
        if let Some(kw) = self.current_keyword() {
            if kw.category() != KeywordCategory::Unreserved {
                let span = self.current.span;
                self.warn(
                    format!("keyword \"{}\" used as a column label", kw.as_str()),
                    span,
                );
            }
        }
        self.parse_col_label()
    }

    /// Parses `name [. label ...]`.
    pub(super) fn parse_any_name(&mut self) -> Result<Vec<String>, ParseError> {
        let mut names = vec![self.parse_col_id()?];
        while self.consume(&TokenKind::Dot) {
            names.push(self.parse_col_label()?);
        }
        Ok(names)
    }

    /// Parses a possibly qualified relation name.
    pub(super) fn parse_qualified_name(&mut self) -> Result<RangeVar, ParseError> {
        let start = self.current.span;
        let names = self.parse_any_name()?;
        self.range_var(names, start.merge(self.previous.span))
    }

    /// Builds a relation from dotted name parts.
    pub(super) fn range_var(&self, names: Vec<String>, span: Span) -> Result<RangeVar, ParseError> {
        let text = names.join(".");
        RangeVar::from_names(names).ok_or_else(|| {
            ParseError::new(
                format!("improper qualified name (too many dotted names): {text}"),
                span,
            )
        })
    }

    /// Parses `(name, ...)`.
    pub(super) fn parse_paren_name_list(&mut self) -> Result<Vec<String>, ParseError> {
        self.expect(&TokenKind::LeftParen)?;
        let mut names = vec![self.parse_col_id()?];
        while self.consume(&TokenKind::Comma) {
            names.push(self.parse_col_id()?);
        }
        self.expect(&TokenKind::RightParen)?;
        Ok(names)
    }

    /// Parses `name [, ...]` where each item is produced by `item`.
    pub(super) fn parse_comma_list<T>(
        &mut self,
        mut item: impl FnMut(&mut Self) -> Result<T, ParseError>,
    ) -> Result<Vec<T>, ParseError> {
        let mut items = vec![item(self)?];
        while self.consume(&TokenKind::Comma) {
            items.push(item(self)?);
        }
        Ok(items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{AstNode, NodeTag};

    fn parse(sql: &str) -> ParseResult {
        Parser::new(sql).parse()
    }

    #[test]
    fn test_empty_statements_are_skipped() {
        let result = parse(";; SELECT 1 ;;; SELECT 2;");
        assert!(result.is_clean());
        assert_eq!(result.statements.len(), 2);
    }

    #[test]
    fn test_comment_only_input() {
        let result = parse("-- nothing here\n/* or here */");
        assert!(result.success);
        assert!(result.statements.is_empty());
        assert!(result.diagnostics.is_empty());
    }

    #[test]
    fn test_statement_locations() {
        let sql = "SELECT 1; UPDATE t SET a = 2";
        let result = parse(sql);
        let second = &result.statements[1];
        assert_eq!(second.stmt_location, 10);
        assert_eq!(&sql[second.stmt_location..second.stmt_location + second.stmt_len], "UPDATE t SET a = 2");
    }

    #[test]
    fn test_recovery_after_syntax_error() {
        let result = parse("SELECT 1; SELEC 2; SELECT 3");
        assert!(!result.success);
        assert_eq!(result.statements.len(), 2);
        let errors: Vec<_> = result.errors().collect();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].message, "syntax error at or near \"SELEC\"");
        assert_eq!(errors[0].location.map(|l| l.offset), Some(10));
    }

    #[test]
    fn test_trailing_garbage_is_an_error() {
        let result = parse("SELECT 1 2");
        assert!(!result.success);
        assert!(result.statements.is_empty());
        assert_eq!(
            result.errors().next().map(|d| d.message.as_str()),
            Some("syntax error at or near \"2\"")
        );
    }

    #[test]
    fn test_error_at_end_of_input() {
        let result = parse("SELECT 1 +");
        assert!(!result.success);
        assert_eq!(
            result.errors().next().map(|d| d.message.as_str()),
            Some("syntax error at end of input")
        );
    }

    #[test]
    fn test_parse_statement() {
        let mut parser = Parser::new("DELETE FROM t");
        let stmt = parser.parse_statement().unwrap();
        assert_eq!(stmt.tag(), NodeTag::DeleteStmt);
        assert!(parser.current.is_eof());
    }

    #[test]
    fn test_peek_does_not_consume() {
        let mut parser = Parser::new("a b c");
        assert!(matches!(parser.peek(), TokenKind::Ident(s) if s == "b"));
        assert!(matches!(&parser.current.kind, TokenKind::Ident(s) if s == "a"));
        parser.advance();
        assert!(matches!(&parser.current.kind, TokenKind::Ident(s) if s == "b"));
        parser.advance();
        assert!(matches!(&parser.current.kind, TokenKind::Ident(s) if s == "c"));
    }

    #[test]
    fn test_too_many_dotted_names() {
        let result = parse("SELECT * FROM a.b.c.d");
        assert_eq!(
            result.errors().next().map(|d| d.message.as_str()),
            Some("improper qualified name (too many dotted names): a.b.c.d")
        );
    }

    #[test]
    fn test_reserved_label_warns() {
        let result = parse("SELECT 1 AS select");
        assert!(result.is_clean());
        assert_eq!(result.warnings().count(), 1);
    }
}
