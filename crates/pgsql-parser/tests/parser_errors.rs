//! Tests for syntax errors, recovery and diagnostics.

mod common;
use common::*;

use pgsql_parser::diagnostics::Severity;
use pgsql_parser::{parse_reader, parse_sql_with_dialect, Error, PostgresDialect};

#[test]
fn error_empty_input_statement() {
    let _ = parse_err("");
}

#[test]
fn error_incomplete_from() {
    let err = parse_err("SELECT * FROM");
    assert_eq!(err.message, "syntax error at end of input");
}

#[test]
fn error_unclosed_paren() {
    let _ = parse_err("SELECT (1 + 2");
}

#[test]
fn error_misspelled_keyword() {
    let diagnostic = first_error("SELEC 1");
    assert_eq!(diagnostic.message, "syntax error at or near \"SELEC\"");
    let location = diagnostic.location.unwrap();
    assert_eq!((location.offset, location.line, location.column), (0, 1, 1));
}

#[test]
fn error_location_on_later_line() {
    let diagnostic = first_error("SELECT 1;\nSELECT * FROM t WHERE;");
    assert_eq!(diagnostic.message, "syntax error at or near \";\"");
    let location = diagnostic.location.unwrap();
    assert_eq!(location.line, 2);
}

#[test]
fn recovery_continues_after_error() {
    let result = parse_all("SELECT 1; INSERT t VALUES (1); UPDATE t SET a = 1; DELETE t");
    assert!(!result.success);
    assert_eq!(result.statements.len(), 2);
    assert_eq!(result.errors().count(), 2);
}

#[test]
fn comment_only_input_is_success() {
    let result = parse_all("-- comment");
    assert!(result.success);
    assert!(result.statements.is_empty());
    assert!(result.diagnostics.is_empty());
}

#[test]
fn lexical_error_keeps_success() {
    let result = parse_all("SELECT 123abc");
    assert!(result.diagnostics.iter().any(|d| d.message.starts_with("trailing junk")));
    assert!(!result.is_clean());
}

#[test]
fn reserved_label_warning() {
    let result = parse_all("SELECT 1 AS from");
    assert!(result.success);
    let warnings: Vec<_> = result.warnings().collect();
    assert_eq!(warnings.len(), 1);
    assert_eq!(warnings[0].severity, Severity::Warning);
}

#[test]
fn nonstandard_string_warning() {
    let dialect = PostgresDialect::new().with_standard_conforming_strings(false);
    let result = parse_sql_with_dialect("SELECT 'a\\tb'", &dialect);
    assert!(result.is_clean());
    assert_eq!(result.warnings().count(), 1);
    assert_eq!(result.statements[0].stmt.to_string(), "SELECT 'a\tb'");
}

#[test]
fn reader_input() {
    let result = parse_reader("SELECT 1; SELECT 2".as_bytes()).unwrap();
    assert_eq!(result.statements.len(), 2);
    let err = parse_reader(&[0x53, 0xff, 0xfe][..]).unwrap_err();
    assert!(matches!(err, Error::Encoding(_)));
}

#[test]
fn grammar_specific_errors() {
    assert_eq!(
        first_error("SELECT 1 LIMIT 1, 2").message,
        "LIMIT #,# syntax is not supported"
    );
    assert_eq!(
        first_error("SELECT * FROM a.b.c.d").message,
        "improper qualified name (too many dotted names): a.b.c.d"
    );
    assert_eq!(
        first_error("CREATE TABLE t (a float(60))").message,
        "precision for type float must be less than 54 bits"
    );
}

#[test]
fn deep_parenthesis_nesting_is_reported() {
    let depth = 10_000;
    let sql = format!("SELECT {}1{}; SELECT 2", "(".repeat(depth), ")".repeat(depth));
    let result = parse_all(&sql);
    assert!(!result.success);
    assert_eq!(result.statements.len(), 1);
    let errors: Vec<_> = result.errors().collect();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].message, "stack depth limit exceeded");
}

#[test]
fn deep_subquery_and_operator_nesting_is_reported() {
    let depth = 5_000;
    let subqueries = format!("SELECT {}1{}", "(SELECT ".repeat(depth), ")".repeat(depth));
    assert_eq!(first_error(&subqueries).message, "stack depth limit exceeded");
    let negations = format!("SELECT {}TRUE", "NOT ".repeat(depth));
    assert_eq!(first_error(&negations).message, "stack depth limit exceeded");
    let arrays = format!("SELECT ARRAY{}1{}", "[".repeat(depth), "]".repeat(depth));
    assert_eq!(first_error(&arrays).message, "stack depth limit exceeded");
    let from = format!("SELECT * FROM {}t{}", "(".repeat(depth), ")".repeat(depth));
    assert_eq!(first_error(&from).message, "stack depth limit exceeded");
}

#[test]
fn moderate_nesting_parses() {
    let sql = format!("SELECT {}1{}", "(".repeat(30), ")".repeat(30));
    assert_eq!(parse(&sql).to_string(), "SELECT 1");
    let sql = format!("SELECT {}1{}", "(SELECT ".repeat(10), ")".repeat(10));
    let _ = parse(&sql);
}
