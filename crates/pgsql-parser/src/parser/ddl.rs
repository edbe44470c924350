//! CREATE, DROP and TRUNCATE.

use tracing::trace;

use super::error::ParseError;
use super::parser::Parser;
use super::pratt::left_bp;
use crate::ast::{
    prec, ColumnDef, ConstrType, Constraint, CreateStmt, DropBehavior, DropStmt, FkAction,
    IndexElem, IndexStmt, Node, ObjectType, RelPersistence, SortByDir, TruncateStmt, ViewStmt,
};
use crate::lexer::{Keyword, TokenKind};

impl Parser<'_> {
    /// Parses `CREATE TABLE`, `CREATE VIEW` or `CREATE INDEX`.
    pub(super) fn parse_create(&mut self) -> Result<Node, ParseError> {
        self.expect_keyword(Keyword::Create)?;
        let replace = if self.consume_keyword(Keyword::Or) {
            self.expect_keyword(Keyword::Replace)?;
            true
        } else {
            false
        };
        let persistence = self.parse_opt_persistence();

        match self.current_keyword() {
            Some(Keyword::Table) if !replace => {
                self.advance();
                Ok(self.parse_create_table(persistence)?.into())
            }
            Some(Keyword::View) => {
                self.advance();
                Ok(self.parse_create_view(persistence, replace)?.into())
            }
            Some(Keyword::Index | Keyword::Unique)
                if !replace && persistence == RelPersistence::Permanent =>
            {
                Ok(self.parse_create_index()?.into())
            }
            _ => Err(self.syntax_error()),
        }
    }

    fn parse_opt_persistence(&mut self) -> RelPersistence {
        match self.current_keyword() {
            Some(Keyword::Temp | Keyword::Temporary) => {
                self.advance();
                RelPersistence::Temp
            }
            Some(Keyword::Unlogged) => {
                self.advance();
                RelPersistence::Unlogged
            }
            _ => RelPersistence::Permanent,
        }
    }

    fn parse_if_not_exists(&mut self) -> Result<bool, ParseError> {
        if self.check_keyword(Keyword::If) && self.peek_keyword(Keyword::Not) {
            self.advance();
            self.advance();
            self.expect_keyword(Keyword::Exists)?;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    fn parse_if_exists(&mut self) -> Result<bool, ParseError> {
        if self.check_keyword(Keyword::If) && self.peek_keyword(Keyword::Exists) {
            self.advance();
            self.advance();
            Ok(true)
        } else {
            Ok(false)
        }
    }

    fn parse_create_table(
        &mut self,
        persistence: RelPersistence,
    ) -> Result<CreateStmt, ParseError> {
        let if_not_exists = self.parse_if_not_exists()?;
        let mut relation = self.parse_qualified_name()?;
        relation.relpersistence = persistence;
        trace!(table = %relation, "create table");

        self.expect(&TokenKind::LeftParen)?;
        let table_elts = if self.check(&TokenKind::RightParen) {
            Vec::new()
        } else {
            self.parse_comma_list(Self::parse_table_element)?
        };
        self.expect(&TokenKind::RightParen)?;
        Ok(CreateStmt {
            relation,
            table_elts,
            if_not_exists,
        })
    }

    fn parse_table_element(&mut self) -> Result<Node, ParseError> {
        if matches!(
            self.current_keyword(),
            Some(
                Keyword::Constraint
                    | Keyword::Check
                    | Keyword::Primary
                    | Keyword::Unique
                    | Keyword::Foreign
            )
        ) {
            return Ok(self.parse_table_constraint()?.into());
        }
        Ok(self.parse_column_def()?.into())
    }

    fn parse_column_def(&mut self) -> Result<ColumnDef, ParseError> {
        let colname = self.parse_col_id()?;
        let type_name = self.parse_type_name()?;
        let mut column = ColumnDef {
            colname,
            type_name,
            constraints: Vec::new(),
            collation: Vec::new(),
        };
        loop {
            if self.consume_keyword(Keyword::Collate) {
                column.collation = self.parse_any_name()?;
                continue;
            }
            match self.parse_column_constraint()? {
                Some(constraint) => column.constraints.push(constraint),
                None => break,
            }
        }
        Ok(column)
    }

    /// Parses one column constraint, or returns `None` if none starts here.
    fn parse_column_constraint(&mut self) -> Result<Option<Constraint>, ParseError> {
        let conname = if self.consume_keyword(Keyword::Constraint) {
            Some(self.parse_col_id()?)
        } else {
            None
        };
        let mut constraint = match self.current_keyword() {
            Some(Keyword::Not) => {
                self.advance();
                self.expect_keyword(Keyword::Null)?;
                Constraint::new(ConstrType::NotNull)
            }
            Some(Keyword::Null) => {
                self.advance();
                Constraint::new(ConstrType::Null)
            }
            Some(Keyword::Default) => {
                self.advance();
                let mut default = Constraint::new(ConstrType::Default);
                default.raw_expr = Some(self.parse_expr_bp(left_bp(prec::CMP))?);
                default
            }
            Some(Keyword::Check) => {
                self.advance();
                self.parse_check_body()?
            }
            Some(Keyword::Primary) => {
                self.advance();
                self.expect_keyword(Keyword::Key)?;
                Constraint::new(ConstrType::Primary)
            }
            Some(Keyword::Unique) => {
                self.advance();
                Constraint::new(ConstrType::Unique)
            }
            Some(Keyword::References) => {
                self.advance();
                self.parse_references(Constraint::new(ConstrType::Foreign))?
            }
            _ if conname.is_some() => return Err(self.syntax_error()),
            _ => return Ok(None),
        };
        constraint.conname = conname;
        Ok(Some(constraint))
    }

    fn parse_table_constraint(&mut self) -> Result<Constraint, ParseError> {
        let conname = if self.consume_keyword(Keyword::Constraint) {
            Some(self.parse_col_id()?)
        } else {
            None
        };
        let mut constraint = match self.current_keyword() {
            Some(Keyword::Check) => {
                self.advance();
                self.parse_check_body()?
            }
            Some(Keyword::Primary) => {
                self.advance();
                self.expect_keyword(Keyword::Key)?;
                let mut primary = Constraint::new(ConstrType::Primary);
                primary.keys = self.parse_paren_name_list()?;
                primary
            }
            Some(Keyword::Unique) => {
                self.advance();
                let mut unique = Constraint::new(ConstrType::Unique);
                unique.keys = self.parse_paren_name_list()?;
                unique
            }
            Some(Keyword::Foreign) => {
                self.advance();
                self.expect_keyword(Keyword::Key)?;
                let mut foreign = Constraint::new(ConstrType::Foreign);
                foreign.fk_attrs = self.parse_paren_name_list()?;
                self.expect_keyword(Keyword::References)?;
                self.parse_references(foreign)?
            }
            _ => return Err(self.syntax_error()),
        };
        constraint.conname = conname;
        Ok(constraint)
    }

    fn parse_check_body(&mut self) -> Result<Constraint, ParseError> {
        self.expect(&TokenKind::LeftParen)?;
        let mut check = Constraint::new(ConstrType::Check);
        check.raw_expr = Some(self.parse_expr()?);
        self.expect(&TokenKind::RightParen)?;
        Ok(check)
    }

    /// Parses the part of a foreign key after `REFERENCES`.
    fn parse_references(&mut self, mut foreign: Constraint) -> Result<Constraint, ParseError> {
        foreign.pktable = Some(self.parse_qualified_name()?);
        if self.check(&TokenKind::LeftParen) {
            foreign.pk_attrs = self.parse_paren_name_list()?;
        }
        while self.check_keyword(Keyword::On) {
            let on_delete = match self.peek() {
                TokenKind::Keyword(Keyword::Delete) => true,
                TokenKind::Keyword(Keyword::Update) => false,
                _ => break,
            };
            self.advance();
            self.advance();
            let action = self.parse_fk_action()?;
            if on_delete {
                foreign.fk_del_action = action;
            } else {
                foreign.fk_upd_action = action;
            }
        }
        Ok(foreign)
    }

    fn parse_fk_action(&mut self) -> Result<FkAction, ParseError> {
        let action = match self.current_keyword() {
            Some(Keyword::No) => {
                self.advance();
                self.expect_keyword(Keyword::Action)?;
                return Ok(FkAction::NoAction);
            }
            Some(Keyword::Restrict) => FkAction::Restrict,
            Some(Keyword::Cascade) => FkAction::Cascade,
            Some(Keyword::Set) => {
                self.advance();
                if self.consume_keyword(Keyword::Null) {
                    return Ok(FkAction::SetNull);
                }
                self.expect_keyword(Keyword::Default)?;
                return Ok(FkAction::SetDefault);
            }
            _ => return Err(self.syntax_error()),
        };
        self.advance();
        Ok(action)
    }

    fn parse_create_index(&mut self) -> Result<IndexStmt, ParseError> {
        let unique = self.consume_keyword(Keyword::Unique);
        self.expect_keyword(Keyword::Index)?;
        let concurrent = self.consume_keyword(Keyword::Concurrently);
        let if_not_exists = self.parse_if_not_exists()?;
        let idxname = if if_not_exists || !self.check_keyword(Keyword::On) {
            Some(self.parse_col_id()?)
        } else {
            None
        };
        self.expect_keyword(Keyword::On)?;
        let only = self.consume_keyword(Keyword::Only);
        let mut relation = self.parse_qualified_name()?;
        relation.inh = !only;
        let access_method = if self.consume_keyword(Keyword::Using) {
            Some(self.parse_col_id()?)
        } else {
            None
        };
        self.expect(&TokenKind::LeftParen)?;
        let index_params = self.parse_comma_list(Self::parse_index_elem)?;
        self.expect(&TokenKind::RightParen)?;
        Ok(IndexStmt {
            idxname,
            relation,
            access_method,
            index_params,
            where_clause: self.parse_opt_where()?,
            unique,
            concurrent,
            if_not_exists,
        })
    }

    /// Parses a column, function call or parenthesized expression of an
    /// index, with its ordering.
    pub(super) fn parse_index_elem(&mut self) -> Result<IndexElem, ParseError> {
        let is_call = match &self.current.kind {
            TokenKind::Ident(_) => true,
            TokenKind::Keyword(kw) => kw.is_type_func_name(),
            _ => false,
        } && matches!(self.peek(), TokenKind::LeftParen);

        let (name, expr) = if self.consume(&TokenKind::LeftParen) {
            let expr = self.parse_expr()?;
            self.expect(&TokenKind::RightParen)?;
            (None, Some(expr))
        } else if is_call {
            let funcname = vec![self.parse_type_function_name()?];
            (None, Some(self.parse_func_call(funcname)?.into()))
        } else {
            (Some(self.parse_col_id()?), None)
        };

        let ordering = if self.consume_keyword(Keyword::Asc) {
            SortByDir::Asc
        } else if self.consume_keyword(Keyword::Desc) {
            SortByDir::Desc
        } else {
            SortByDir::Default
        };
        Ok(IndexElem {
            name,
            expr,
            ordering,
            nulls_ordering: self.parse_opt_nulls_order()?,
        })
    }

    fn parse_create_view(
        &mut self,
        persistence: RelPersistence,
        replace: bool,
    ) -> Result<ViewStmt, ParseError> {
        let mut view = self.parse_qualified_name()?;
        view.relpersistence = persistence;
        let aliases = if self.check(&TokenKind::LeftParen) {
            self.parse_paren_name_list()?
        } else {
            Vec::new()
        };
        self.expect_keyword(Keyword::As)?;
        Ok(ViewStmt {
            view,
            aliases,
            query: self.parse_select_stmt()?,
            replace,
        })
    }

    /// Parses `DROP`.
    pub(super) fn parse_drop(&mut self) -> Result<DropStmt, ParseError> {
        self.expect_keyword(Keyword::Drop)?;
        let remove_type = match self.current_keyword() {
            Some(Keyword::Table) => ObjectType::Table,
            Some(Keyword::View) => ObjectType::View,
            Some(Keyword::Index) => ObjectType::Index,
            Some(Keyword::Sequence) => ObjectType::Sequence,
            Some(Keyword::Schema) => ObjectType::Schema,
            _ => return Err(self.unexpected("object type")),
        };
        self.advance();
        let concurrent =
            remove_type == ObjectType::Index && self.consume_keyword(Keyword::Concurrently);
        let missing_ok = self.parse_if_exists()?;
        let objects = self.parse_comma_list(Self::parse_any_name)?;
        Ok(DropStmt {
            remove_type,
            objects,
            behavior: self.parse_opt_drop_behavior(),
            missing_ok,
            concurrent,
        })
    }

    fn parse_opt_drop_behavior(&mut self) -> DropBehavior {
        if self.consume_keyword(Keyword::Cascade) {
            DropBehavior::Cascade
        } else {
            self.consume_keyword(Keyword::Restrict);
            DropBehavior::Restrict
        }
    }

    /// Parses `TRUNCATE`.
    pub(super) fn parse_truncate(&mut self) -> Result<TruncateStmt, ParseError> {
        self.expect_keyword(Keyword::Truncate)?;
        self.consume_keyword(Keyword::Table);
        let relations = self.parse_comma_list(|p| {
            let only = p.consume_keyword(Keyword::Only);
            let mut relation = p.parse_qualified_name()?;
            if only {
                relation.inh = false;
            } else {
                p.consume(&TokenKind::Star);
            }
            Ok(relation)
        })?;
        let restart_seqs = if self.consume_keyword(Keyword::Restart) {
            self.expect_keyword(Keyword::Identity)?;
            true
        } else if self.consume_keyword(Keyword::Continue) {
            self.expect_keyword(Keyword::Identity)?;
            false
        } else {
            false
        };
        Ok(TruncateStmt {
            relations,
            restart_seqs,
            behavior: self.parse_opt_drop_behavior(),
        })
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
    fn test_create_table_columns() {
        let Node::CreateStmt(create) = statement(
            "CREATE TABLE IF NOT EXISTS s.t (id int PRIMARY KEY, name varchar(40) NOT NULL DEFAULT 'x', note text COLLATE \"C\")",
        ) else {
            panic!("expected CREATE TABLE");
        };
        assert!(create.if_not_exists);
        assert_eq!(create.relation.schemaname.as_deref(), Some("s"));
        assert_eq!(create.table_elts.len(), 3);
        let Node::ColumnDef(name) = &create.table_elts[1] else {
            panic!("expected column");
        };
        assert_eq!(name.type_name.system_name(), Some("varchar"));
        assert_eq!(name.constraints[0].contype, ConstrType::NotNull);
        assert_eq!(name.constraints[1].contype, ConstrType::Default);
        assert_eq!(
            create.to_string(),
            "CREATE TABLE IF NOT EXISTS s.t (id integer PRIMARY KEY, name character varying(40) NOT NULL DEFAULT 'x', note text COLLATE \"C\")"
        );
    }

    #[test]
    fn test_table_constraints() {
        assert_eq!(
            render("create temp table t (a int, b int, CONSTRAINT pk PRIMARY KEY (a, b), UNIQUE (b), CHECK (a > 0))"),
            "CREATE TEMPORARY TABLE t (a integer, b integer, CONSTRAINT pk PRIMARY KEY (a, b), UNIQUE (b), CHECK (a > 0))"
        );
        assert_eq!(
            render("CREATE TABLE t (o int, FOREIGN KEY (o) REFERENCES u (id) ON UPDATE SET NULL ON DELETE CASCADE)"),
            "CREATE TABLE t (o integer, FOREIGN KEY (o) REFERENCES u (id) ON DELETE CASCADE ON UPDATE SET NULL)"
        );
        assert_eq!(
            render("CREATE UNLOGGED TABLE t (o int REFERENCES u ON DELETE NO ACTION)"),
            "CREATE UNLOGGED TABLE t (o integer REFERENCES u)"
        );
    }

    #[test]
    fn test_default_binds_above_comparison() {
        let Node::CreateStmt(create) = statement("CREATE TABLE t (a int DEFAULT 1 + 2 NOT NULL)") else {
            panic!("expected CREATE TABLE");
        };
        let Node::ColumnDef(column) = &create.table_elts[0] else {
            panic!("expected column");
        };
        assert_eq!(column.constraints.len(), 2);
        assert_eq!(column.constraints[0].raw_expr.as_ref().unwrap().to_string(), "1 + 2");
    }

    #[test]
    fn test_create_index() {
        assert_eq!(
            render("CREATE UNIQUE INDEX CONCURRENTLY IF NOT EXISTS i ON ONLY t USING btree (a DESC NULLS LAST, lower(b), (a + b)) WHERE a > 0"),
            "CREATE UNIQUE INDEX CONCURRENTLY IF NOT EXISTS i ON ONLY t USING btree (a DESC NULLS LAST, lower(b), (a + b)) WHERE a > 0"
        );
        let Node::IndexStmt(index) = statement("CREATE INDEX ON t (a)") else {
            panic!("expected CREATE INDEX");
        };
        assert!(index.idxname.is_none());
        assert!(Parser::new("CREATE INDEX IF NOT EXISTS ON t (a)")
            .parse_statement()
            .is_err());
    }

    #[test]
    fn test_create_view() {
        assert_eq!(
            render("CREATE OR REPLACE TEMP VIEW v (x) AS SELECT a FROM t"),
            "CREATE OR REPLACE TEMPORARY VIEW v (x) AS SELECT a FROM t"
        );
        assert!(Parser::new("CREATE OR REPLACE TABLE t (a int)")
            .parse_statement()
            .is_err());
    }

    #[test]
    fn test_drop() {
        let Node::DropStmt(drop) = statement("DROP TABLE IF EXISTS a, s.b CASCADE") else {
            panic!("expected DROP");
        };
        assert!(drop.missing_ok);
        assert_eq!(drop.objects, vec![vec!["a".to_owned()], vec!["s".to_owned(), "b".to_owned()]]);
        assert_eq!(drop.behavior, DropBehavior::Cascade);
        assert_eq!(
            render("DROP INDEX CONCURRENTLY i RESTRICT"),
            "DROP INDEX CONCURRENTLY i"
        );
        assert!(Parser::new("DROP FUNCTION f").parse_statement().is_err());
    }

    #[test]
    fn test_truncate() {
        assert_eq!(
            render("TRUNCATE TABLE ONLY a, b * RESTART IDENTITY CASCADE"),
            "TRUNCATE ONLY a, b RESTART IDENTITY CASCADE"
        );
        assert_eq!(render("truncate t continue identity"), "TRUNCATE t");
        assert_eq!(statement("TRUNCATE t").tag(), NodeTag::TruncateStmt);
    }
}
