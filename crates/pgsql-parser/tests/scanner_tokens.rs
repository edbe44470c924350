//! Tests for the scanner's pull interface.

use pgsql_parser::diagnostics::Severity;
use pgsql_parser::lexer::keywords;
use pgsql_parser::{Keyword, PostgresDialect, Scanner, TokenKind};

fn kinds(sql: &str) -> Vec<TokenKind> {
    let (tokens, diagnostics) = Scanner::new(sql).tokenize();
    assert!(diagnostics.is_empty(), "unexpected diagnostics: {diagnostics:?}");
    tokens.into_iter().map(|t| t.kind).collect()
}

#[test]
fn simple_select_tokens() {
    assert_eq!(
        kinds("select * from table_a"),
        vec![
            TokenKind::Keyword(Keyword::Select),
            TokenKind::Star,
            TokenKind::Keyword(Keyword::From),
            TokenKind::Ident("table_a".into()),
            TokenKind::Eof,
        ]
    );
}

#[test]
fn nested_comment_is_skipped() {
    assert_eq!(kinds("/* some /* nested */ comment */"), vec![TokenKind::Eof]);
}

#[test]
fn lookahead_keywords() {
    assert_eq!(
        kinds("a NOT IN b NULLS FIRST WITH TIME WITHOUT TIME NOT EXISTS"),
        vec![
            TokenKind::Ident("a".into()),
            TokenKind::NotLa,
            TokenKind::Keyword(Keyword::In),
            TokenKind::Ident("b".into()),
            TokenKind::NullsLa,
            TokenKind::Keyword(Keyword::First),
            TokenKind::WithLa,
            TokenKind::Keyword(Keyword::Time),
            TokenKind::WithoutLa,
            TokenKind::Keyword(Keyword::Time),
            TokenKind::Keyword(Keyword::Not),
            TokenKind::Keyword(Keyword::Exists),
            TokenKind::Eof,
        ]
    );
}

#[test]
fn literals_and_parameters() {
    assert_eq!(
        kinds("$1 42 1.5 $$a'b$$ E'\\n' x'1F' 0x10 1_000"),
        vec![
            TokenKind::Param(1),
            TokenKind::IConst(42),
            TokenKind::FConst("1.5".into()),
            TokenKind::SConst("a'b".into()),
            TokenKind::SConst("\n".into()),
            TokenKind::XConst("1F".into()),
            TokenKind::IConst(16),
            TokenKind::IConst(1000),
            TokenKind::Eof,
        ]
    );
}

#[test]
fn unicode_identifier() {
    assert_eq!(
        kinds("U&\"d\\0061t\\+000061\""),
        vec![TokenKind::Ident("data".into()), TokenKind::Eof]
    );
}

#[test]
fn lexical_errors_are_recorded() {
    let (tokens, diagnostics) = Scanner::new("SELECT 'abc").tokenize();
    assert_eq!(tokens.last().map(|t| &t.kind), Some(&TokenKind::Eof));
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].severity, Severity::Error);
    assert_eq!(diagnostics[0].message, "unterminated quoted string");
}

#[test]
fn identifier_truncation_warns() {
    let dialect = PostgresDialect::new().with_max_identifier_length(4);
    let (tokens, diagnostics) = Scanner::with_dialect("abcdefgh", &dialect).tokenize();
    assert_eq!(tokens[0].kind, TokenKind::Ident("abcd".into()));
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].severity, Severity::Warning);
}

#[test]
fn keyword_lookup_is_case_insensitive() {
    assert_eq!(keywords::lookup("SeLeCt").map(|e| e.keyword), Some(Keyword::Select));
    assert!(keywords::lookup("table_a").is_none());
}

#[test]
fn many_identifiers_scan_in_one_pass() {
    let count = 100_000;
    let (tokens, diagnostics) = Scanner::new("a,".repeat(count)).tokenize();
    assert_eq!(tokens.len(), count * 2 + 1);
    assert!(diagnostics.is_empty());
}

#[test]
fn truncation_warning_points_at_identifier() {
    let dialect = PostgresDialect::new().with_max_identifier_length(4);
    let (_, diagnostics) = Scanner::with_dialect("ab,\n\n  abcdefgh", &dialect).tokenize();
    let location = diagnostics[0].location.unwrap();
    assert_eq!((location.offset, location.line, location.column), (7, 3, 3));
}
