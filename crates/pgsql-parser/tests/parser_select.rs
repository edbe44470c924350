//! Tests for SELECT statements.

mod common;
use common::*;

use pgsql_parser::ast::{LimitOption, SetOperation};
use pgsql_parser::{AstNode, Node, NodeTag};

#[test]
fn select_targets_and_from() {
    let select = parse_select("SELECT id, name AS n, u.* FROM public.users u WHERE id > 10");
    assert_eq!(select.target_list.len(), 3);
    assert_eq!(select.target_list[1].name.as_deref(), Some("n"));
    let Node::RangeVar(users) = &select.from_clause[0] else {
        panic!("expected a table");
    };
    assert_eq!(users.schemaname.as_deref(), Some("public"));
    assert_eq!(users.relname, "users");
    assert_eq!(users.alias.as_ref().map(|a| a.aliasname.as_str()), Some("u"));
    assert!(select.where_clause.is_some());
}

#[test]
fn select_without_targets() {
    let select = parse_select("SELECT FROM t");
    assert!(select.target_list.is_empty());
    assert_eq!(round_trip("SELECT FROM t"), "SELECT FROM t");
}

#[test]
fn select_set_operations() {
    let select = parse_select("SELECT 1 UNION ALL SELECT 2 EXCEPT SELECT 3");
    assert_eq!(select.op, SetOperation::Except);
    assert!(select.larg.as_ref().is_some_and(|l| l.all));
    assert_eq!(
        round_trip("SELECT a FROM t INTERSECT (SELECT b FROM u UNION SELECT c FROM v)"),
        "SELECT a FROM t INTERSECT (SELECT b FROM u UNION SELECT c FROM v)"
    );
}

#[test]
fn select_limit_forms() {
    let select = parse_select("SELECT * FROM t ORDER BY a FETCH FIRST 5 ROWS WITH TIES");
    assert_eq!(select.limit_option, LimitOption::WithTies);
    let select = parse_select("SELECT * FROM t LIMIT 5");
    assert_eq!(select.limit_option, LimitOption::Count);
    round_trip("SELECT * FROM t ORDER BY a DESC NULLS LAST, b USING < LIMIT 10 OFFSET 20");
}

#[test]
fn select_values_and_subqueries() {
    round_trip("VALUES (1, 'one'), (2, 'two')");
    round_trip("SELECT * FROM (VALUES (1), (2)) AS v(x)");
    round_trip("SELECT (SELECT max(x) FROM t) AS m, EXISTS (SELECT 1 FROM u WHERE u.id = t.id)");
}

#[test]
fn select_joins_round_trip() {
    round_trip(
        "SELECT * FROM a LEFT JOIN b ON a.id = b.a_id RIGHT JOIN c USING (id) CROSS JOIN d NATURAL JOIN e",
    );
    round_trip("SELECT * FROM a, LATERAL (SELECT * FROM b WHERE b.x = a.x) AS s");
    round_trip("SELECT * FROM generate_series(1, 10) WITH ORDINALITY AS g(n, i)");
}

#[test]
fn select_with_recursive() {
    let select = parse_select(
        "WITH RECURSIVE t(n) AS (VALUES (1) UNION ALL SELECT n + 1 FROM t WHERE n < 100) SELECT sum(n) FROM t",
    );
    let with = select.with_clause.as_ref().unwrap();
    assert!(with.recursive);
    assert_eq!(with.ctes[0].ctename, "t");
    assert_eq!(with.ctes[0].aliascolnames, vec!["n".to_owned()]);
}

#[test]
fn select_locking() {
    round_trip("SELECT * FROM jobs WHERE state = 'ready' LIMIT 1 FOR UPDATE SKIP LOCKED");
}

#[test]
fn select_window_functions() {
    round_trip(
        "SELECT row_number() OVER (PARTITION BY dept ORDER BY salary DESC RANGE BETWEEN UNBOUNDED PRECEDING AND CURRENT ROW) FROM emp",
    );
    round_trip("SELECT avg(x) OVER w FROM t WINDOW w AS (ORDER BY y ROWS 3 PRECEDING)");
}

#[test]
fn select_tree_shape() {
    let node = parse("SELECT a + 1 FROM t WHERE b");
    assert_eq!(node.tag(), NodeTag::SelectStmt);
    let mut tags = Vec::new();
    pgsql_parser::walk(node.as_ast(), &mut |n: &dyn AstNode| tags.push(n.tag()));
    assert_eq!(tags[0], NodeTag::SelectStmt);
    assert!(tags.contains(&NodeTag::ResTarget));
    assert!(tags.contains(&NodeTag::AExpr));
    assert!(tags.contains(&NodeTag::RangeVar));
    assert!(tags.contains(&NodeTag::Integer));
}
