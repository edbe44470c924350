//! INSERT, UPDATE and DELETE.

use super::error::ParseError;
use super::parser::Parser;
use crate::ast::{
    Alias, DeleteStmt, InferClause, InsertStmt, Node, OnConflictAction, OnConflictClause,
    ResTarget, UpdateStmt,
};
use crate::lexer::{Keyword, TokenKind};

impl Parser<'_> {
    /// Parses `INSERT INTO`.
    pub(super) fn parse_insert(&mut self) -> Result<InsertStmt, ParseError> {
        self.expect_keyword(Keyword::Insert)?;
        self.expect_keyword(Keyword::Into)?;
        let mut relation = self.parse_qualified_name()?;
        if self.consume_keyword(Keyword::As) {
            relation.alias = Some(Alias::new(self.parse_col_id()?));
        }

        let column_list = self.check(&TokenKind::LeftParen)
            && !matches!(
                self.peek(),
                TokenKind::Keyword(Keyword::Select | Keyword::Values | Keyword::With)
                    | TokenKind::LeftParen
            );
        let cols = if column_list {
            self.advance();
            let cols = self.parse_comma_list(|p| Ok(ResTarget::column(p.parse_col_id()?)))?;
            self.expect(&TokenKind::RightParen)?;
            cols
        } else {
            Vec::new()
        };

        let select_stmt = if self.consume_keyword(Keyword::Default) {
            self.expect_keyword(Keyword::Values)?;
            None
        } else {
            Some(self.parse_select_stmt()?)
        };

        let on_conflict = if self.consume_keyword(Keyword::On) {
            self.expect_keyword(Keyword::Conflict)?;
            Some(self.parse_on_conflict()?)
        } else {
            None
        };

        Ok(InsertStmt {
            relation,
            cols,
            select_stmt,
            on_conflict,
            returning_list: self.parse_returning()?,
            with_clause: None,
        })
    }

    fn parse_on_conflict(&mut self) -> Result<OnConflictClause, ParseError> {
        let infer = if self.consume(&TokenKind::LeftParen) {
            let index_elems = self.parse_comma_list(Self::parse_index_elem)?;
            self.expect(&TokenKind::RightParen)?;
            let where_clause = self.parse_opt_where()?;
            Some(InferClause {
                index_elems,
                where_clause,
                conname: None,
            })
        } else if self.consume_keyword(Keyword::On) {
            self.expect_keyword(Keyword::Constraint)?;
            Some(InferClause {
                index_elems: Vec::new(),
                where_clause: None,
                conname: Some(self.parse_col_id()?),
            })
        } else {
            None
        };

        self.expect_keyword(Keyword::Do)?;
        if self.consume_keyword(Keyword::Nothing) {
            return Ok(OnConflictClause {
                action: OnConflictAction::Nothing,
                infer,
                target_list: Vec::new(),
                where_clause: None,
            });
        }
        let span = self.current.span;
        self.expect_keyword(Keyword::Update)?;
        if infer.is_none() {
            return Err(ParseError::new(
                "ON CONFLICT DO UPDATE requires inference specification or constraint name",
                span,
            ));
        }
        self.expect_keyword(Keyword::Set)?;
        let target_list = self.parse_set_clause_list()?;
        Ok(OnConflictClause {
            action: OnConflictAction::Update,
            infer,
            target_list,
            where_clause: self.parse_opt_where()?,
        })
    }

    /// Parses `UPDATE`.
    pub(super) fn parse_update(&mut self) -> Result<UpdateStmt, ParseError> {
        self.expect_keyword(Keyword::Update)?;
        let only = self.consume_keyword(Keyword::Only);
        let mut relation = self.parse_qualified_name()?;
        if only {
            relation.inh = false;
        } else {
            self.consume(&TokenKind::Star);
        }
        relation.alias = self.parse_opt_alias()?;
        self.expect_keyword(Keyword::Set)?;
        let target_list = self.parse_set_clause_list()?;
        let from_clause = if self.consume_keyword(Keyword::From) {
            self.parse_comma_list(Self::parse_table_ref)?
        } else {
            Vec::new()
        };
        Ok(UpdateStmt {
            relation,
            target_list,
            where_clause: self.parse_opt_where()?,
            from_clause,
            returning_list: self.parse_returning()?,
            with_clause: None,
        })
    }

    /// Parses `DELETE FROM`.
    pub(super) fn parse_delete(&mut self) -> Result<DeleteStmt, ParseError> {
        self.expect_keyword(Keyword::Delete)?;
        self.expect_keyword(Keyword::From)?;
        let only = self.consume_keyword(Keyword::Only);
        let mut relation = self.parse_qualified_name()?;
        if only {
            relation.inh = false;
        } else {
            self.consume(&TokenKind::Star);
        }
        relation.alias = self.parse_opt_alias()?;
        let using_clause = if self.consume_keyword(Keyword::Using) {
            self.parse_comma_list(Self::parse_table_ref)?
        } else {
            Vec::new()
        };
        Ok(DeleteStmt {
            relation,
            using_clause,
            where_clause: self.parse_opt_where()?,
            returning_list: self.parse_returning()?,
            with_clause: None,
        })
    }

    /// Parses `col = expr [, ...]`, where the value may be `DEFAULT`.
    fn parse_set_clause_list(&mut self) -> Result<Vec<ResTarget>, ParseError> {
        self.parse_comma_list(|p| {
            let name = p.parse_col_id()?;
            p.expect(&TokenKind::Eq)?;
            let val = p.parse_expr_or_default()?;
            Ok(ResTarget::new(val, Some(name)))
        })
    }

    pub(super) fn parse_opt_where(&mut self) -> Result<Option<Node>, ParseError> {
        if self.consume_keyword(Keyword::Where) {
            Ok(Some(self.parse_expr()?))
        } else {
            Ok(None)
        }
    }

    fn parse_returning(&mut self) -> Result<Vec<ResTarget>, ParseError> {
        if self.consume_keyword(Keyword::Returning) {
            self.parse_comma_list(Self::parse_target_el)
        } else {
            Ok(Vec::new())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{AstNode, NodeTag};

    fn statement(sql: &str) -> Node {
        let mut parser = Parser::new(sql);
        let stmt = parser.parse_statement().unwrap();
        assert!(parser.current.is_eof(), "trailing input in {sql:?}");
        stmt
    }

    fn render(sql: &str) -> String {
        statement(sql).to_string()
    }

    #[test]
    fn test_insert_values() {
        let Node::InsertStmt(insert) = statement("INSERT INTO s.t (a, b) VALUES (1, DEFAULT)") else {
            panic!("expected INSERT");
        };
        assert_eq!(insert.relation.schemaname.as_deref(), Some("s"));
        assert_eq!(insert.cols.len(), 2);
        let rows = &insert.select_stmt.as_ref().unwrap().values_lists;
        assert_eq!(rows[0][1].tag(), NodeTag::SetToDefault);
    }

    #[test]
    fn test_insert_forms() {
        assert_eq!(
            render("INSERT INTO t DEFAULT VALUES RETURNING id"),
            "INSERT INTO t DEFAULT VALUES RETURNING id"
        );
        assert_eq!(
            render("INSERT INTO t (SELECT * FROM u)"),
            "INSERT INTO t SELECT * FROM u"
        );
        assert_eq!(
            render("INSERT INTO t AS x (a) SELECT 1"),
            "INSERT INTO t AS x (a) SELECT 1"
        );
    }

    #[test]
    fn test_on_conflict() {
        assert_eq!(
            render("INSERT INTO t (id) VALUES (1) ON CONFLICT (id) WHERE id > 0 DO UPDATE SET n = t.n + 1 WHERE t.n < 10"),
            "INSERT INTO t (id) VALUES (1) ON CONFLICT (id) WHERE id > 0 DO UPDATE SET n = t.n + 1 WHERE t.n < 10"
        );
        assert_eq!(
            render("INSERT INTO t VALUES (1) ON CONFLICT ON CONSTRAINT t_pkey DO NOTHING"),
            "INSERT INTO t VALUES (1) ON CONFLICT ON CONSTRAINT t_pkey DO NOTHING"
        );
        assert_eq!(
            render("INSERT INTO t VALUES (1) ON CONFLICT DO NOTHING"),
            "INSERT INTO t VALUES (1) ON CONFLICT DO NOTHING"
        );
        let err = Parser::new("INSERT INTO t VALUES (1) ON CONFLICT DO UPDATE SET a = 1")
            .parse_statement()
            .unwrap_err();
        assert_eq!(
            err.message,
            "ON CONFLICT DO UPDATE requires inference specification or constraint name"
        );
    }

    #[test]
    fn test_update() {
        assert_eq!(
            render("UPDATE ONLY t AS x SET a = DEFAULT, b = x.b * 2 FROM u WHERE x.id = u.id RETURNING *"),
            "UPDATE ONLY t AS x SET a = DEFAULT, b = x.b * 2 FROM u WHERE x.id = u.id RETURNING *"
        );
        let Node::UpdateStmt(update) = statement("UPDATE t set a = 1") else {
            panic!("expected UPDATE");
        };
        assert!(update.relation.alias.is_none());
    }

    #[test]
    fn test_delete() {
        assert_eq!(
            render("DELETE FROM t x USING u WHERE x.id = u.id RETURNING x.id"),
            "DELETE FROM t AS x USING u WHERE x.id = u.id RETURNING x.id"
        );
        let Node::DeleteStmt(delete) = statement("DELETE FROM ONLY t") else {
            panic!("expected DELETE");
        };
        assert!(!delete.relation.inh);
    }

    #[test]
    fn test_with_dml() {
        assert_eq!(
            render("WITH d AS (DELETE FROM t RETURNING *) INSERT INTO u SELECT * FROM d"),
            "WITH d AS (DELETE FROM t RETURNING *) INSERT INTO u SELECT * FROM d"
        );
    }
}
