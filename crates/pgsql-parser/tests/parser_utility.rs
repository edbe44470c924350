//! Tests for transaction control and configuration statements.

mod common;
use common::*;

use pgsql_parser::ast::{TransactionStmtKind, VariableSetKind};
use pgsql_parser::Node;

#[test]
fn transaction_block() {
    let result = parse_all(
        "BEGIN ISOLATION LEVEL SERIALIZABLE; SAVEPOINT s1; ROLLBACK TO SAVEPOINT s1; RELEASE s1; COMMIT",
    );
    assert!(result.is_clean());
    let kinds: Vec<_> = result
        .statements
        .iter()
        .map(|raw| match &raw.stmt {
            Node::TransactionStmt(stmt) => stmt.kind,
            other => panic!("expected transaction control, got {other:?}"),
        })
        .collect();
    assert_eq!(
        kinds,
        [
            TransactionStmtKind::Begin,
            TransactionStmtKind::Savepoint,
            TransactionStmtKind::RollbackTo,
            TransactionStmtKind::Release,
            TransactionStmtKind::Commit,
        ]
    );
}

#[test]
fn transaction_round_trip() {
    round_trip("START TRANSACTION ISOLATION LEVEL READ COMMITTED, READ WRITE");
    round_trip("ROLLBACK AND CHAIN");
    assert_eq!(round_trip("END WORK"), "COMMIT");
}

#[test]
fn set_reset_show() {
    let Node::VariableSetStmt(set) = parse("SET LOCAL search_path = app, public") else {
        panic!("expected SET");
    };
    assert!(set.is_local);
    assert_eq!(set.kind, VariableSetKind::Value);
    assert_eq!(set.args.len(), 2);
    round_trip("SET work_mem TO '64MB'");
    round_trip("SET x TO DEFAULT");
    round_trip("RESET ALL");
    round_trip("SHOW search_path");
}
