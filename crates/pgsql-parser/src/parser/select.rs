//! SELECT, VALUES, set operations and FROM items.

use super::error::ParseError;
use super::parser::Parser;
use super::pratt::right_bp;
use crate::ast::{
    prec, AConst, Alias, ColumnRef, CommonTableExpr, CteMaterialize, JoinExpr, JoinType,
    LimitOption, LockStrength, LockWaitPolicy, LockingClause, Node, RangeFunction,
    RangeSubselect, ResTarget, SelectStmt, SetOperation, SetToDefault, WithClause,
};
use crate::lexer::{Keyword, KeywordCategory, TokenKind};

/// What a parenthesized FROM item turned out to be.
enum FromParen {
    Select(SelectStmt),
    Table(Node),
}

impl Parser<'_> {
    /// Returns true if the current token starts a select statement.
    pub(super) fn starts_select(&self) -> bool {
        matches!(
            self.current.kind,
            TokenKind::Keyword(Keyword::Select | Keyword::Values | Keyword::With)
        )
    }

    /// Returns true if the current token continues a complete select with a
    /// set operation or a trailing clause.
    pub(super) fn continues_select(&self) -> bool {
        matches!(
            self.current.kind,
            TokenKind::Keyword(
                Keyword::Union
                    | Keyword::Intersect
                    | Keyword::Except
                    | Keyword::Order
                    | Keyword::Limit
                    | Keyword::Offset
                    | Keyword::Fetch
                    | Keyword::For
            )
        )
    }

    /// Parses a complete select, including `WITH` and trailing clauses.
    pub(super) fn parse_select_stmt(&mut self) -> Result<SelectStmt, ParseError> {
        self.nested(|p| {
            let with = if p.check_keyword(Keyword::With) {
                Some(p.parse_with_clause()?)
            } else {
                None
            };
            p.parse_select_after_with(with)
        })
    }

    /// Parses a statement that starts with `WITH`.
    pub(super) fn parse_with_statement(&mut self) -> Result<Node, ParseError> {
        let with = self.parse_with_clause()?;
        let node = match self.current.as_keyword() {
            Some(Keyword::Insert) => {
                let mut stmt = self.parse_insert()?;
                stmt.with_clause = Some(with);
                stmt.into()
            }
            Some(Keyword::Update) => {
                let mut stmt = self.parse_update()?;
                stmt.with_clause = Some(with);
                stmt.into()
            }
            Some(Keyword::Delete) => {
                let mut stmt = self.parse_delete()?;
                stmt.with_clause = Some(with);
                stmt.into()
            }
            _ => self.parse_select_after_with(Some(with))?.into(),
        };
        Ok(node)
    }

    fn parse_select_after_with(
        &mut self,
        with: Option<WithClause>,
    ) -> Result<SelectStmt, ParseError> {
        let start = self.current.span;
        let mut select = self.parse_set_operations(0)?;
        self.parse_select_tail(&mut select)?;
        if let Some(with) = with {
            if select.with_clause.is_some() {
                return Err(ParseError::new("multiple WITH clauses not allowed", start));
            }
            select.with_clause = Some(with);
        }
        Ok(select)
    }

    /// Continues a parenthesized select with set operations and trailing
    /// clauses, as in `((SELECT 1) UNION SELECT 2)`.
    pub(super) fn parse_select_continuation(
        &mut self,
        select: SelectStmt,
    ) -> Result<SelectStmt, ParseError> {
        let mut select = self.parse_set_operations_from(select, 0)?;
        self.parse_select_tail(&mut select)?;
        Ok(select)
    }

    fn parse_set_operations(&mut self, min_prec: u8) -> Result<SelectStmt, ParseError> {
        let left = self.parse_select_primary()?;
        self.parse_set_operations_from(left, min_prec)
    }

    fn parse_set_operations_from(
        &mut self,
        mut left: SelectStmt,
        min_prec: u8,
    ) -> Result<SelectStmt, ParseError> {
        loop {
            let op = match self.current.as_keyword() {
                Some(Keyword::Union) => SetOperation::Union,
                Some(Keyword::Intersect) => SetOperation::Intersect,
                Some(Keyword::Except) => SetOperation::Except,
                _ => break,
            };
            let op_prec = op.precedence();
            if op_prec < min_prec {
                break;
            }
            self.advance();
            let all = self.consume_keyword(Keyword::All);
            if !all {
                self.consume_keyword(Keyword::Distinct);
            }
            let right = self.parse_set_operations(op_prec + 1)?;
            left = SelectStmt::set_operation(op, all, left, right);
        }
        Ok(left)
    }

    fn parse_select_primary(&mut self) -> Result<SelectStmt, ParseError> {
        match self.current.as_keyword() {
            Some(Keyword::Select) => self.parse_simple_select(),
            Some(Keyword::Values) => self.parse_values(),
            _ if self.check(&TokenKind::LeftParen) => {
                self.advance();
                let select = self.parse_select_stmt()?;
                self.expect(&TokenKind::RightParen)?;
                Ok(select)
            }
            _ => Err(self.unexpected("SELECT or VALUES")),
        }
    }

    /// Parses ORDER BY, LIMIT, OFFSET, FETCH and locking clauses into
    /// `select`.
    fn parse_select_tail(&mut self, select: &mut SelectStmt) -> Result<(), ParseError> {
        if self.check_keyword(Keyword::Order) {
            let span = self.current.span;
            self.advance();
            self.expect_keyword(Keyword::By)?;
            if !select.sort_clause.is_empty() {
                return Err(ParseError::new("multiple ORDER BY clauses not allowed", span));
            }
            select.sort_clause = self.parse_sort_list()?;
        }
        loop {
            let span = self.current.span;
            match self.current.as_keyword() {
                Some(Keyword::Limit) => {
                    self.advance();
                    if select.limit_count.is_some() {
                        return Err(ParseError::new("multiple LIMIT clauses not allowed", span));
                    }
                    let count = if self.consume_keyword(Keyword::All) {
                        AConst::null().into()
                    } else {
                        self.parse_expr()?
                    };
                    if self.check(&TokenKind::Comma) {
                        return Err(ParseError::new(
                            "LIMIT #,# syntax is not supported",
                            span.merge(self.current.span),
                        ));
                    }
                    select.limit_count = Some(count);
                    select.limit_option = LimitOption::Count;
                }
                Some(Keyword::Offset) => {
                    self.advance();
                    if select.limit_offset.is_some() {
                        return Err(ParseError::new("multiple OFFSET clauses not allowed", span));
                    }
                    select.limit_offset = Some(self.parse_expr()?);
                    if !self.consume_keyword(Keyword::Rows) {
                        self.consume_keyword(Keyword::Row);
                    }
                }
                Some(Keyword::Fetch) => {
                    self.advance();
                    if select.limit_count.is_some() {
                        return Err(ParseError::new("multiple LIMIT clauses not allowed", span));
                    }
                    self.parse_fetch_clause(select)?;
                }
                Some(Keyword::For) => {
                    self.advance();
                    let lock = self.parse_locking_clause()?;
                    select.locking_clause.push(lock);
                }
                _ => break,
            }
        }
        if select.limit_option == LimitOption::WithTies && select.sort_clause.is_empty() {
            return Err(ParseError::new(
                "WITH TIES cannot be specified without ORDER BY clause",
                self.previous.span,
            ));
        }
        Ok(())
    }

    /// `FETCH {FIRST | NEXT} [n] {ROW | ROWS} {ONLY | WITH TIES}`.
    fn parse_fetch_clause(&mut self, select: &mut SelectStmt) -> Result<(), ParseError> {
        if !self.consume_keyword(Keyword::First) {
            self.expect_keyword(Keyword::Next)?;
        }
        let count = if self.check_keyword(Keyword::Row) || self.check_keyword(Keyword::Rows) {
            AConst::integer(1).into()
        } else {
            self.parse_expr_bp(right_bp(prec::UNARY))?
        };
        if !self.consume_keyword(Keyword::Rows) {
            self.expect_keyword(Keyword::Row)?;
        }
        select.limit_option = if self.consume_keyword(Keyword::With) {
            self.expect_keyword(Keyword::Ties)?;
            LimitOption::WithTies
        } else {
            self.expect_keyword(Keyword::Only)?;
            LimitOption::Count
        };
        select.limit_count = Some(count);
        Ok(())
    }

    fn parse_locking_clause(&mut self) -> Result<LockingClause, ParseError> {
        let strength = match self.current.as_keyword() {
            Some(Keyword::Update) => LockStrength::Update,
            Some(Keyword::No) => {
                self.advance();
                self.expect_keyword(Keyword::Key)?;
                LockStrength::NoKeyUpdate
            }
            Some(Keyword::Share) => LockStrength::Share,
            Some(Keyword::Key) => {
                self.advance();
                LockStrength::KeyShare
            }
            _ => return Err(self.unexpected("UPDATE, NO KEY UPDATE, SHARE or KEY SHARE")),
        };
        match strength {
            LockStrength::NoKeyUpdate => self.expect_keyword(Keyword::Update)?,
            LockStrength::KeyShare => self.expect_keyword(Keyword::Share)?,
            _ => self.advance(),
        }
        let locked_rels = if self.consume_keyword(Keyword::Of) {
            self.parse_comma_list(Self::parse_qualified_name)?
        } else {
            Vec::new()
        };
        let wait_policy = if self.consume_keyword(Keyword::Nowait) {
            LockWaitPolicy::Error
        } else if self.consume_keyword(Keyword::Skip) {
            self.expect_keyword(Keyword::Locked)?;
            LockWaitPolicy::Skip
        } else {
            LockWaitPolicy::Block
        };
        Ok(LockingClause {
            locked_rels,
            strength,
            wait_policy,
        })
    }

    fn parse_simple_select(&mut self) -> Result<SelectStmt, ParseError> {
        self.expect_keyword(Keyword::Select)?;
        let mut select = SelectStmt::default();
        if self.consume_keyword(Keyword::Distinct) {
            if self.consume_keyword(Keyword::On) {
                self.expect(&TokenKind::LeftParen)?;
                select.distinct_clause = Some(self.parse_expr_list()?);
                self.expect(&TokenKind::RightParen)?;
            } else {
                select.distinct_clause = Some(Vec::new());
            }
        } else {
            self.consume_keyword(Keyword::All);
        }
        if !self.at_target_list_end() {
            select.target_list = self.parse_comma_list(Self::parse_target_el)?;
        }
        if self.consume_keyword(Keyword::From) {
            select.from_clause = self.parse_comma_list(Self::parse_table_ref)?;
        }
        if self.consume_keyword(Keyword::Where) {
            select.where_clause = Some(self.parse_expr()?);
        }
        if self.consume_keyword(Keyword::Group) {
            self.expect_keyword(Keyword::By)?;
            select.group_clause = self.parse_expr_list()?;
        }
        if self.consume_keyword(Keyword::Having) {
            select.having_clause = Some(self.parse_expr()?);
        }
        if self.consume_keyword(Keyword::Window) {
            select.window_clause = self.parse_comma_list(|p| {
                let name = p.parse_col_id()?;
                p.expect_keyword(Keyword::As)?;
                let mut window = p.parse_window_spec()?;
                window.name = Some(name);
                Ok(window)
            })?;
        }
        Ok(select)
    }

    /// A select list may be empty, as in `SELECT FROM t`.
    fn at_target_list_end(&self) -> bool {
        match &self.current.kind {
            TokenKind::Eof | TokenKind::Semicolon | TokenKind::RightParen => true,
            TokenKind::Keyword(kw) => matches!(
                kw,
                Keyword::From
                    | Keyword::Where
                    | Keyword::Group
                    | Keyword::Having
                    | Keyword::Window
                    | Keyword::Union
                    | Keyword::Intersect
                    | Keyword::Except
                    | Keyword::Order
                    | Keyword::Limit
                    | Keyword::Offset
                    | Keyword::Fetch
                    | Keyword::For
            ),
            _ => false,
        }
    }

    /// Parses one output column: `*`, or an expression with an optional label.
    pub(super) fn parse_target_el(&mut self) -> Result<ResTarget, ParseError> {
        if self.consume(&TokenKind::Star) {
            return Ok(ResTarget::new(ColumnRef::star().into(), None));
        }
        let val = self.parse_expr()?;
        let name = if self.consume_keyword(Keyword::As) {
            Some(self.parse_col_label_checked()?)
        } else {
            match &self.current.kind {
                TokenKind::Ident(_) => Some(self.parse_col_label()?),
                TokenKind::Keyword(kw) if kw.category() == KeywordCategory::Unreserved => {
                    Some(self.parse_col_label()?)
                }
                _ => None,
            }
        };
        Ok(ResTarget::new(val, name))
    }

    fn parse_values(&mut self) -> Result<SelectStmt, ParseError> {
        let start = self.current.span;
        self.expect_keyword(Keyword::Values)?;
        let values_lists = self.parse_comma_list(|p| {
            p.expect(&TokenKind::LeftParen)?;
            let row = p.parse_comma_list(Self::parse_expr_or_default)?;
            p.expect(&TokenKind::RightParen)?;
            Ok(row)
        })?;
        if let Some(first) = values_lists.first() {
            if values_lists.iter().any(|row| row.len() != first.len()) {
                return Err(ParseError::new(
                    "VALUES lists must all be the same length",
                    start.merge(self.previous.span),
                ));
            }
        }
        Ok(SelectStmt {
            values_lists,
            ..SelectStmt::default()
        })
    }

    /// An expression, or `DEFAULT` where a column default may be used.
    pub(super) fn parse_expr_or_default(&mut self) -> Result<Node, ParseError> {
        if self.consume_keyword(Keyword::Default) {
            Ok(SetToDefault.into())
        } else {
            self.parse_expr()
        }
    }

    /// Parses `WITH [RECURSIVE] name AS (...) [, ...]`.
    fn parse_with_clause(&mut self) -> Result<WithClause, ParseError> {
        self.expect_keyword(Keyword::With)?;
        let recursive = self.consume_keyword(Keyword::Recursive);
        let ctes = self.parse_comma_list(Self::parse_cte)?;
        Ok(WithClause { ctes, recursive })
    }

    fn parse_cte(&mut self) -> Result<CommonTableExpr, ParseError> {
        let ctename = self.parse_col_id()?;
        let aliascolnames = if self.check(&TokenKind::LeftParen) {
            self.parse_paren_name_list()?
        } else {
            Vec::new()
        };
        self.expect_keyword(Keyword::As)?;
        let ctematerialized = if self.consume_keyword(Keyword::Materialized) {
            CteMaterialize::Always
        } else if self.consume_keyword(Keyword::Not) {
            self.expect_keyword(Keyword::Materialized)?;
            CteMaterialize::Never
        } else {
            CteMaterialize::Default
        };
        self.expect(&TokenKind::LeftParen)?;
        let ctequery = match self.current.as_keyword() {
            Some(Keyword::Insert) => self.parse_insert()?.into(),
            Some(Keyword::Update) => self.parse_update()?.into(),
            Some(Keyword::Delete) => self.parse_delete()?.into(),
            _ => self.parse_select_stmt()?.into(),
        };
        self.expect(&TokenKind::RightParen)?;
        Ok(CommonTableExpr {
            ctename,
            aliascolnames,
            ctematerialized,
            ctequery,
        })
    }

    /// Parses a FROM item with any joins that follow it.
    pub(super) fn parse_table_ref(&mut self) -> Result<Node, ParseError> {
        let left = self.parse_table_primary()?;
        self.parse_joins(left)
    }

    fn parse_joins(&mut self, mut left: Node) -> Result<Node, ParseError> {
        loop {
            let is_natural = self.consume_keyword(Keyword::Natural);
            let jointype = match self.current.as_keyword() {
                Some(Keyword::Cross) if !is_natural => {
                    self.advance();
                    self.expect_keyword(Keyword::Join)?;
                    let rarg = self.parse_table_primary()?;
                    left = JoinExpr {
                        jointype: JoinType::Inner,
                        is_natural: false,
                        larg: left,
                        rarg,
                        using_clause: Vec::new(),
                        quals: None,
                        alias: None,
                    }
                    .into();
                    continue;
                }
                Some(Keyword::Join) => JoinType::Inner,
                Some(Keyword::Inner) => {
                    self.advance();
                    JoinType::Inner
                }
                Some(kw @ (Keyword::Left | Keyword::Right | Keyword::Full)) => {
                    self.advance();
                    self.consume_keyword(Keyword::Outer);
                    match kw {
                        Keyword::Left => JoinType::Left,
                        Keyword::Right => JoinType::Right,
                        _ => JoinType::Full,
                    }
                }
                _ if is_natural => return Err(self.unexpected("JOIN")),
                _ => return Ok(left),
            };
            self.expect_keyword(Keyword::Join)?;
            let rarg = self.parse_table_primary()?;
            let (quals, using_clause) = if is_natural {
                (None, Vec::new())
            } else if self.consume_keyword(Keyword::On) {
                (Some(self.parse_expr()?), Vec::new())
            } else if self.consume_keyword(Keyword::Using) {
                (None, self.parse_paren_name_list()?)
            } else {
                return Err(self.unexpected("ON or USING"));
            };
            left = JoinExpr {
                jointype,
                is_natural,
                larg: left,
                rarg,
                using_clause,
                quals,
                alias: None,
            }
            .into();
        }
    }

    fn parse_table_primary(&mut self) -> Result<Node, ParseError> {
        let lateral = self.consume_keyword(Keyword::Lateral);
        if self.check(&TokenKind::LeftParen) {
            return match self.parse_from_paren()? {
                FromParen::Select(subquery) => Ok(RangeSubselect {
                    lateral,
                    subquery,
                    alias: self.parse_opt_alias()?,
                }
                .into()),
                FromParen::Table(table) => self.with_alias(table),
            };
        }
        if !lateral && self.consume_keyword(Keyword::Only) {
            let parenthesized = self.consume(&TokenKind::LeftParen);
            let mut rel = self.parse_qualified_name()?;
            if parenthesized {
                self.expect(&TokenKind::RightParen)?;
            }
            rel.inh = false;
            rel.alias = self.parse_opt_alias()?;
            return Ok(rel.into());
        }
        let start = self.current.span;
        let names = self.parse_any_name()?;
        if self.check(&TokenKind::LeftParen) {
            let function = self.parse_func_call(names)?;
            let ordinality = self.consume(&TokenKind::WithLa);
            if ordinality {
                self.expect_keyword(Keyword::Ordinality)?;
            }
            return Ok(RangeFunction {
                lateral,
                ordinality,
                function,
                alias: self.parse_opt_alias()?,
            }
            .into());
        }
        if lateral {
            return Err(self.unexpected("subquery or function call"));
        }
        let mut rel = self.range_var(names, start.merge(self.previous.span))?;
        self.consume(&TokenKind::Star);
        rel.alias = self.parse_opt_alias()?;
        Ok(rel.into())
    }

    /// Parses a parenthesized FROM item, which is either a subquery or a
    /// nested join.
    fn parse_from_paren(&mut self) -> Result<FromParen, ParseError> {
        self.nested(Self::parse_from_paren_inner)
    }

    fn parse_from_paren_inner(&mut self) -> Result<FromParen, ParseError> {
        self.expect(&TokenKind::LeftParen)?;
        let content = if self.starts_select() {
            FromParen::Select(self.parse_select_stmt()?)
        } else if self.check(&TokenKind::LeftParen) {
            match self.parse_from_paren()? {
                FromParen::Select(select)
                    if self.continues_select() || self.check(&TokenKind::RightParen) =>
                {
                    FromParen::Select(self.parse_select_continuation(select)?)
                }
                FromParen::Select(subquery) => {
                    let table = RangeSubselect {
                        lateral: false,
                        subquery,
                        alias: self.parse_opt_alias()?,
                    }
                    .into();
                    FromParen::Table(self.parse_joins(table)?)
                }
                FromParen::Table(table) => {
                    let table = self.with_alias(table)?;
                    FromParen::Table(self.parse_joins(table)?)
                }
            }
        } else {
            FromParen::Table(self.parse_table_ref()?)
        };
        self.expect(&TokenKind::RightParen)?;
        Ok(content)
    }

    /// Applies an optional alias to a parenthesized FROM item.
    fn with_alias(&mut self, table: Node) -> Result<Node, ParseError> {
        let Some(alias) = self.parse_opt_alias()? else {
            return Ok(table);
        };
        Ok(match table {
            Node::JoinExpr(mut join) => {
                join.alias = Some(alias);
                Node::JoinExpr(join)
            }
            Node::RangeVar(mut rel) => {
                rel.alias = Some(alias);
                Node::RangeVar(rel)
            }
            Node::RangeSubselect(mut sub) => {
                sub.alias = Some(alias);
                Node::RangeSubselect(sub)
            }
            Node::RangeFunction(mut func) => {
                func.alias = Some(alias);
                Node::RangeFunction(func)
            }
            other => other,
        })
    }

    /// Parses `[AS] alias [(col, ...)]`.
    pub(super) fn parse_opt_alias(&mut self) -> Result<Option<Alias>, ParseError> {
        let explicit = self.consume_keyword(Keyword::As);
        let bare = match &self.current.kind {
            TokenKind::Ident(_) => true,
            TokenKind::Keyword(kw) => kw.is_col_id() && *kw != Keyword::Set,
            _ => false,
        };
        if !explicit && !bare {
            return Ok(None);
        }
        let mut alias = Alias::new(self.parse_col_id()?);
        if self.check(&TokenKind::LeftParen) {
            alias.colnames = self.parse_paren_name_list()?;
        }
        Ok(Some(alias))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{AstNode, NodeTag, RangeVar};

    fn select(sql: &str) -> SelectStmt {
        let mut parser = Parser::new(sql);
        let stmt = parser.parse_select_stmt().unwrap();
        assert!(parser.current.is_eof(), "trailing input in {sql:?}");
        stmt
    }

    fn render(sql: &str) -> String {
        select(sql).to_string()
    }

    fn error(sql: &str) -> ParseError {
        Parser::new(sql).parse_select_stmt().unwrap_err()
    }

    #[test]
    fn test_simple_select() {
        let stmt = select("SELECT a, b AS c, t.* FROM t WHERE a > 1");
        assert_eq!(stmt.target_list.len(), 3);
        assert_eq!(stmt.target_list[1].name.as_deref(), Some("c"));
        assert_eq!(stmt.from_clause, vec![Node::from(RangeVar::new("t"))]);
        assert!(stmt.where_clause.is_some());
        assert_eq!(render("select *"), "SELECT *");
        assert_eq!(render("SELECT"), "SELECT");
    }

    #[test]
    fn test_bare_labels() {
        let stmt = select("SELECT 1 one, 2 action");
        let names: Vec<_> = stmt
            .target_list
            .iter()
            .map(|t| t.name.as_deref())
            .collect();
        assert_eq!(names, [Some("one"), Some("action")]);
    }

    #[test]
    fn test_distinct_and_grouping() {
        assert_eq!(
            render("SELECT DISTINCT ON (a) a, count(*) FROM t GROUP BY a HAVING count(*) > 1"),
            "SELECT DISTINCT ON (a) a, count(*) FROM t GROUP BY a HAVING count(*) > 1"
        );
        assert_eq!(select("SELECT DISTINCT a").distinct_clause, Some(Vec::new()));
        assert_eq!(select("SELECT ALL a").distinct_clause, None);
    }

    #[test]
    fn test_set_operation_precedence() {
        let stmt = select("SELECT 1 UNION SELECT 2 INTERSECT SELECT 3");
        assert_eq!(stmt.op, SetOperation::Union);
        assert_eq!(stmt.rarg.as_ref().map(|r| r.op), Some(SetOperation::Intersect));
        let stmt = select("SELECT 1 EXCEPT ALL SELECT 2 UNION SELECT 3");
        assert_eq!(stmt.op, SetOperation::Union);
        assert!(stmt.larg.as_ref().is_some_and(|l| l.all));
        assert_eq!(
            render("SELECT 1 UNION (SELECT 2 UNION SELECT 3)"),
            "SELECT 1 UNION (SELECT 2 UNION SELECT 3)"
        );
    }

    #[test]
    fn test_trailing_clauses() {
        assert_eq!(
            render("SELECT a FROM t ORDER BY a DESC NULLS FIRST LIMIT 10 OFFSET 5"),
            "SELECT a FROM t ORDER BY a DESC NULLS FIRST LIMIT 10 OFFSET 5"
        );
        assert_eq!(render("SELECT a FROM t LIMIT ALL"), "SELECT a FROM t LIMIT ALL");
        assert_eq!(
            render("SELECT a FROM t OFFSET 2 ROWS FETCH FIRST 3 ROWS ONLY"),
            "SELECT a FROM t LIMIT 3 OFFSET 2"
        );
        assert_eq!(
            render("SELECT a FROM t ORDER BY a FETCH NEXT ROW WITH TIES"),
            "SELECT a FROM t ORDER BY a FETCH FIRST 1 ROWS WITH TIES"
        );
        assert_eq!(
            render("SELECT 1 UNION SELECT 2 ORDER BY 1"),
            "SELECT 1 UNION SELECT 2 ORDER BY 1"
        );
    }

    #[test]
    fn test_locking() {
        assert_eq!(
            render("SELECT * FROM t FOR NO KEY UPDATE OF t SKIP LOCKED FOR SHARE NOWAIT"),
            "SELECT * FROM t FOR NO KEY UPDATE OF t SKIP LOCKED FOR SHARE NOWAIT"
        );
        assert_eq!(render("SELECT 1 FOR KEY SHARE"), "SELECT 1 FOR KEY SHARE");
    }

    #[test]
    fn test_clause_errors() {
        assert_eq!(
            error("(SELECT 1 ORDER BY 1) ORDER BY 1").message,
            "multiple ORDER BY clauses not allowed"
        );
        assert_eq!(
            error("SELECT 1 LIMIT 1 LIMIT 2").message,
            "multiple LIMIT clauses not allowed"
        );
        assert_eq!(
            error("SELECT 1 LIMIT 1, 2").message,
            "LIMIT #,# syntax is not supported"
        );
        assert_eq!(
            error("SELECT 1 FETCH FIRST 1 ROW WITH TIES").message,
            "WITH TIES cannot be specified without ORDER BY clause"
        );
        assert_eq!(
            error("VALUES (1, 2), (3)").message,
            "VALUES lists must all be the same length"
        );
        assert_eq!(
            error("WITH a AS (SELECT 1) (WITH b AS (SELECT 2) SELECT 3)").message,
            "multiple WITH clauses not allowed"
        );
    }

    #[test]
    fn test_values() {
        let stmt = select("VALUES (1, 'a'), (DEFAULT, 'b')");
        assert_eq!(stmt.values_lists.len(), 2);
        assert_eq!(stmt.values_lists[1][0].tag(), NodeTag::SetToDefault);
        assert_eq!(render("VALUES (1), (2) ORDER BY 1"), "VALUES (1), (2) ORDER BY 1");
    }

    #[test]
    fn test_joins() {
        assert_eq!(
            render("SELECT * FROM a JOIN b ON a.id = b.id LEFT OUTER JOIN c USING (id)"),
            "SELECT * FROM a JOIN b ON a.id = b.id LEFT JOIN c USING (id)"
        );
        assert_eq!(
            render("SELECT * FROM a NATURAL FULL JOIN b, c CROSS JOIN d"),
            "SELECT * FROM a NATURAL FULL JOIN b, c CROSS JOIN d"
        );
        assert_eq!(
            render("SELECT * FROM a JOIN (b JOIN c ON true) ON true"),
            "SELECT * FROM a JOIN (b JOIN c ON TRUE) ON TRUE"
        );
        assert_eq!(
            render("SELECT * FROM (a JOIN b USING (id)) AS j"),
            "SELECT * FROM (a JOIN b USING (id)) AS j"
        );
        assert_eq!(
            error("SELECT * FROM a JOIN b").message,
            "syntax error at end of input"
        );
    }

    #[test]
    fn test_from_items() {
        assert_eq!(
            render("SELECT * FROM ONLY s.t x, (SELECT 1) AS sub(c), LATERAL f(x.a) WITH ORDINALITY AS g"),
            "SELECT * FROM ONLY s.t AS x, (SELECT 1) AS sub(c), LATERAL f(x.a) WITH ORDINALITY AS g"
        );
        assert_eq!(
            render("SELECT * FROM ((SELECT 1) UNION (SELECT 2)) u"),
            "SELECT * FROM (SELECT 1 UNION SELECT 2) AS u"
        );
        let stmt = select("SELECT * FROM t*");
        assert_eq!(stmt.from_clause, vec![Node::from(RangeVar::new("t"))]);
    }

    #[test]
    fn test_with_clause() {
        assert_eq!(
            render("WITH RECURSIVE r(n) AS (SELECT 1 UNION ALL SELECT n + 1 FROM r) SELECT n FROM r"),
            "WITH RECURSIVE r(n) AS (SELECT 1 UNION ALL SELECT n + 1 FROM r) SELECT n FROM r"
        );
        assert_eq!(
            render("WITH a AS NOT MATERIALIZED (SELECT 1), b AS MATERIALIZED (VALUES (2)) SELECT 3"),
            "WITH a AS NOT MATERIALIZED (SELECT 1), b AS MATERIALIZED (VALUES (2)) SELECT 3"
        );
    }

    #[test]
    fn test_window_clause() {
        assert_eq!(
            render("SELECT sum(x) OVER w FROM t WINDOW w AS (PARTITION BY y)"),
            "SELECT sum(x) OVER w FROM t WINDOW w AS (PARTITION BY y)"
        );
        assert_eq!(
            render("SELECT sum(x) OVER (w ROWS 2 PRECEDING) FROM t"),
            "SELECT sum(x) OVER (w ROWS 2 PRECEDING) FROM t"
        );
    }
}
