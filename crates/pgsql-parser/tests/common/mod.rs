#![allow(dead_code)]

use std::sync::Once;

use pgsql_parser::ast::{DeleteStmt, InsertStmt, SelectStmt, UpdateStmt};
use pgsql_parser::{parse_sql, Diagnostic, Node, ParseError, ParseResult, Parser};

static TRACING: Once = Once::new();

/// Sends parser events to the captured test output.
pub fn init_tracing() {
    TRACING.call_once(|| {
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::TRACE)
            .with_test_writer()
            .finish();
        let _ = tracing::subscriber::set_global_default(subscriber);
    });
}

pub fn parse_all(sql: &str) -> ParseResult {
    init_tracing();
    parse_sql(sql)
}

pub fn parse(sql: &str) -> Node {
    let result = parse_all(sql);
    assert!(
        result.is_clean(),
        "Failed to parse: {sql}\nDiagnostics: {:?}",
        result.diagnostics
    );
    assert_eq!(result.statements.len(), 1, "Expected one statement: {sql}");
    result.statements.into_iter().next().unwrap().stmt
}

pub fn parse_err(sql: &str) -> ParseError {
    Parser::new(sql)
        .parse_statement()
        .expect_err(&format!("Expected parse error for: {sql}"))
}

/// Returns the first ERROR reported for `sql`.
pub fn first_error(sql: &str) -> Diagnostic {
    let result = parse_all(sql);
    assert!(!result.success, "Expected a syntax error for: {sql}");
    let first = result.errors().next().cloned();
    first.unwrap_or_else(|| panic!("No error recorded for: {sql}"))
}

pub fn parse_select(sql: &str) -> SelectStmt {
    match parse(sql) {
        Node::SelectStmt(s) => *s,
        other => panic!("Expected SELECT, got {other:?}"),
    }
}

pub fn parse_insert(sql: &str) -> InsertStmt {
    match parse(sql) {
        Node::InsertStmt(i) => *i,
        other => panic!("Expected INSERT, got {other:?}"),
    }
}

pub fn parse_update(sql: &str) -> UpdateStmt {
    match parse(sql) {
        Node::UpdateStmt(u) => *u,
        other => panic!("Expected UPDATE, got {other:?}"),
    }
}

pub fn parse_delete(sql: &str) -> DeleteStmt {
    match parse(sql) {
        Node::DeleteStmt(d) => *d,
        other => panic!("Expected DELETE, got {other:?}"),
    }
}

/// Renders the first expression of `SELECT <sql>`.
pub fn expr(sql: &str) -> String {
    let select = parse_select(&format!("SELECT {sql}"));
    select.target_list[0].val.as_ref().unwrap().to_string()
}

/// Verifies that rendering is a fixed point: the rendering of `sql`
/// re-parses to an equal tree that renders to the same string.
pub fn round_trip(sql: &str) -> String {
    let ast1 = parse(sql);
    let rendered1 = ast1.to_string();
    let ast2 = parse(&rendered1);
    let rendered2 = ast2.to_string();
    assert_eq!(
        rendered1, rendered2,
        "Round-trip failed.\n  Input:    {sql}\n  First:    {rendered1}\n  Second:   {rendered2}"
    );
    assert_eq!(ast1, ast2, "Round-trip changed the tree for: {sql}");
    rendered1
}
