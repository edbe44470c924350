//! Transaction control and configuration parameters.

use super::error::ParseError;
use super::parser::Parser;
use crate::ast::{
    AConst, IsolationLevel, Node, TransactionMode, TransactionStmt, TransactionStmtKind, Value,
    VariableSetKind, VariableSetStmt, VariableShowStmt,
};
use crate::lexer::{Keyword, TokenKind};

impl Parser<'_> {
    /// Parses `BEGIN`, `COMMIT`, `ROLLBACK`, `SAVEPOINT` and their synonyms.
    pub(super) fn parse_transaction(&mut self) -> Result<TransactionStmt, ParseError> {
        let keyword = match self.current_keyword() {
            Some(
                kw @ (Keyword::Begin
                | Keyword::Start
                | Keyword::Commit
                | Keyword::End
                | Keyword::Rollback
                | Keyword::Abort
                | Keyword::Savepoint
                | Keyword::Release),
            ) => kw,
            _ => return Err(self.syntax_error()),
        };
        self.advance();
        let stmt = match keyword {
            Keyword::Begin => {
                self.parse_opt_transaction();
                let mut stmt = TransactionStmt::new(TransactionStmtKind::Begin);
                stmt.options = self.parse_transaction_modes()?;
                stmt
            }
            Keyword::Start => {
                self.expect_keyword(Keyword::Transaction)?;
                let mut stmt = TransactionStmt::new(TransactionStmtKind::Start);
                stmt.options = self.parse_transaction_modes()?;
                stmt
            }
            Keyword::Commit | Keyword::End => {
                self.parse_opt_transaction();
                let mut stmt = TransactionStmt::new(TransactionStmtKind::Commit);
                stmt.chain = self.parse_opt_chain()?;
                stmt
            }
            Keyword::Rollback | Keyword::Abort => {
                self.parse_opt_transaction();
                if keyword == Keyword::Rollback && self.consume_keyword(Keyword::To) {
                    self.consume_keyword(Keyword::Savepoint);
                    let mut stmt = TransactionStmt::new(TransactionStmtKind::RollbackTo);
                    stmt.savepoint_name = Some(self.parse_col_id()?);
                    stmt
                } else {
                    let mut stmt = TransactionStmt::new(TransactionStmtKind::Rollback);
                    stmt.chain = self.parse_opt_chain()?;
                    stmt
                }
            }
            Keyword::Savepoint => {
                let mut stmt = TransactionStmt::new(TransactionStmtKind::Savepoint);
                stmt.savepoint_name = Some(self.parse_col_id()?);
                stmt
            }
            _ => {
                self.consume_keyword(Keyword::Savepoint);
                let mut stmt = TransactionStmt::new(TransactionStmtKind::Release);
                stmt.savepoint_name = Some(self.parse_col_id()?);
                stmt
            }
        };
        Ok(stmt)
    }

    /// Skips the noise words `WORK` and `TRANSACTION`.
    fn parse_opt_transaction(&mut self) {
        if !self.consume_keyword(Keyword::Work) {
            self.consume_keyword(Keyword::Transaction);
        }
    }

    fn parse_opt_chain(&mut self) -> Result<bool, ParseError> {
        if !self.consume_keyword(Keyword::And) {
            return Ok(false);
        }
        let chain = !self.consume_keyword(Keyword::No);
        self.expect_keyword(Keyword::Chain)?;
        Ok(chain)
    }

    /// Parses transaction characteristics; commas between them are optional.
    fn parse_transaction_modes(&mut self) -> Result<Vec<TransactionMode>, ParseError> {
        let mut modes = Vec::new();
        loop {
            let after_comma = !modes.is_empty() && self.consume(&TokenKind::Comma);
            match self.parse_transaction_mode()? {
                Some(mode) => modes.push(mode),
                None if after_comma => return Err(self.syntax_error()),
                None => return Ok(modes),
            }
        }
    }

    fn parse_transaction_mode(&mut self) -> Result<Option<TransactionMode>, ParseError> {
        let mode = match self.current_keyword() {
            Some(Keyword::Isolation) => {
                self.advance();
                self.expect_keyword(Keyword::Level)?;
                TransactionMode::IsolationLevel(self.parse_isolation_level()?)
            }
            Some(Keyword::Read) => {
                self.advance();
                if self.consume_keyword(Keyword::Only) {
                    TransactionMode::ReadOnly
                } else {
                    self.expect_keyword(Keyword::Write)?;
                    TransactionMode::ReadWrite
                }
            }
            Some(Keyword::Deferrable) => {
                self.advance();
                TransactionMode::Deferrable
            }
            Some(Keyword::Not) if self.peek_keyword(Keyword::Deferrable) => {
                self.advance();
                self.advance();
                TransactionMode::NotDeferrable
            }
            _ => return Ok(None),
        };
        Ok(Some(mode))
    }

    fn parse_isolation_level(&mut self) -> Result<IsolationLevel, ParseError> {
        let level = match self.current_keyword() {
            Some(Keyword::Serializable) => IsolationLevel::Serializable,
            Some(Keyword::Repeatable) => {
                self.advance();
                self.expect_keyword(Keyword::Read)?;
                return Ok(IsolationLevel::RepeatableRead);
            }
            Some(Keyword::Read) => {
                self.advance();
                if self.consume_keyword(Keyword::Committed) {
                    return Ok(IsolationLevel::ReadCommitted);
                }
                self.expect_keyword(Keyword::Uncommitted)?;
                return Ok(IsolationLevel::ReadUncommitted);
            }
            _ => return Err(self.unexpected("isolation level")),
        };
        self.advance();
        Ok(level)
    }

    /// Parses `SET [LOCAL | SESSION] name {TO | =} {DEFAULT | value, ...}`.
    pub(super) fn parse_variable_set(&mut self) -> Result<VariableSetStmt, ParseError> {
        self.expect_keyword(Keyword::Set)?;
        let is_local = if self.consume_keyword(Keyword::Local) {
            true
        } else {
            self.consume_keyword(Keyword::Session);
            false
        };

        if self.check_keyword(Keyword::Time) && self.peek_keyword(Keyword::Zone) {
            self.advance();
            self.advance();
            let (kind, args) = match self.current_keyword() {
                Some(Keyword::Default | Keyword::Local) => {
                    self.advance();
                    (VariableSetKind::Default, Vec::new())
                }
                _ => (VariableSetKind::Value, vec![self.parse_var_value()?]),
            };
            return Ok(VariableSetStmt {
                kind,
                name: Some("timezone".to_owned()),
                args,
                is_local,
            });
        }

        let name = self.parse_var_name()?;
        if !self.consume_keyword(Keyword::To) {
            self.expect(&TokenKind::Eq)?;
        }
        let (kind, args) = if self.consume_keyword(Keyword::Default) {
            (VariableSetKind::Default, Vec::new())
        } else {
            (
                VariableSetKind::Value,
                self.parse_comma_list(Self::parse_var_value)?,
            )
        };
        Ok(VariableSetStmt {
            kind,
            name: Some(name),
            args,
            is_local,
        })
    }

    /// Parses `RESET name`, `RESET TIME ZONE` or `RESET ALL`.
    pub(super) fn parse_variable_reset(&mut self) -> Result<VariableSetStmt, ParseError> {
        self.expect_keyword(Keyword::Reset)?;
        let (kind, name) = if self.consume_keyword(Keyword::All) {
            (VariableSetKind::ResetAll, None)
        } else {
            (VariableSetKind::Reset, Some(self.parse_var_name()?))
        };
        Ok(VariableSetStmt {
            kind,
            name,
            args: Vec::new(),
            is_local: false,
        })
    }

    /// Parses `SHOW name`, `SHOW TIME ZONE` or `SHOW ALL`.
    pub(super) fn parse_variable_show(&mut self) -> Result<VariableShowStmt, ParseError> {
        self.expect_keyword(Keyword::Show)?;
        let name = if self.consume_keyword(Keyword::All) {
            "all".to_owned()
        } else {
            self.parse_var_name()?
        };
        Ok(VariableShowStmt { name })
    }

    /// Parses a dotted parameter name; `TIME ZONE` names `timezone`.
    fn parse_var_name(&mut self) -> Result<String, ParseError> {
        if self.check_keyword(Keyword::Time) && self.peek_keyword(Keyword::Zone) {
            self.advance();
            self.advance();
            return Ok("timezone".to_owned());
        }
        let mut name = self.parse_col_id()?;
        while self.consume(&TokenKind::Dot) {
            name.push('.');
            name.push_str(&self.parse_col_id()?);
        }
        Ok(name)
    }

    /// Parses one parameter value. Words are kept as strings.
    fn parse_var_value(&mut self) -> Result<Node, ParseError> {
        if matches!(self.current.kind, TokenKind::Plus | TokenKind::Minus) {
            return self.parse_signed_var_value();
        }
        let value = match &self.current.kind {
            TokenKind::SConst(s) | TokenKind::Ident(s) => Value::String(s.clone()),
            TokenKind::IConst(i) => Value::Integer(*i),
            TokenKind::FConst(s) => Value::Float(s.clone()),
            TokenKind::Keyword(kw)
                if matches!(kw, Keyword::True | Keyword::False | Keyword::On)
                    || !kw.is_reserved() =>
            {
                Value::String(kw.as_str().to_owned())
            }
            _ => return Err(self.unexpected("parameter value")),
        };
        self.advance();
        Ok(AConst::new(value).into())
    }

    fn parse_signed_var_value(&mut self) -> Result<Node, ParseError> {
        let negative = self.check(&TokenKind::Minus);
        self.advance();
        let number = match &self.current.kind {
            TokenKind::IConst(i) => Value::Integer(*i),
            TokenKind::FConst(s) => Value::Float(s.clone()),
            _ => return Err(self.syntax_error()),
        };
        self.advance();
        let number = match number.negated() {
            Some(negated) if negative => negated,
            _ => number,
        };
        Ok(AConst::new(number).into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

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
    fn test_begin_and_start() {
        assert_eq!(render("BEGIN"), "BEGIN");
        assert_eq!(
            render("begin work isolation level repeatable read, read only"),
            "BEGIN ISOLATION LEVEL REPEATABLE READ, READ ONLY"
        );
        assert_eq!(
            render("START TRANSACTION READ WRITE NOT DEFERRABLE"),
            "START TRANSACTION READ WRITE, NOT DEFERRABLE"
        );
        let Node::TransactionStmt(stmt) =
            statement("BEGIN ISOLATION LEVEL READ UNCOMMITTED DEFERRABLE")
        else {
            panic!("expected BEGIN");
        };
        assert_eq!(
            stmt.options,
            vec![
                TransactionMode::IsolationLevel(IsolationLevel::ReadUncommitted),
                TransactionMode::Deferrable
            ]
        );
        assert!(Parser::new("BEGIN READ ONLY,").parse_statement().is_err());
    }

    #[test]
    fn test_commit_and_rollback() {
        assert_eq!(render("END TRANSACTION"), "COMMIT");
        assert_eq!(render("COMMIT AND CHAIN"), "COMMIT AND CHAIN");
        assert_eq!(render("COMMIT AND NO CHAIN"), "COMMIT");
        assert_eq!(render("ABORT"), "ROLLBACK");
        assert_eq!(render("ROLLBACK WORK AND CHAIN"), "ROLLBACK AND CHAIN");
        assert_eq!(render("ROLLBACK TO sp1"), "ROLLBACK TO SAVEPOINT sp1");
    }

    #[test]
    fn test_savepoints() {
        assert_eq!(render("SAVEPOINT a"), "SAVEPOINT a");
        assert_eq!(render("RELEASE a"), "RELEASE SAVEPOINT a");
        assert_eq!(render("RELEASE SAVEPOINT a"), "RELEASE SAVEPOINT a");
    }

    #[test]
    fn test_set() {
        assert_eq!(
            render("SET search_path TO public, \"$user\""),
            "SET search_path TO 'public', '$user'"
        );
        assert_eq!(
            render("SET LOCAL statement_timeout = 5000"),
            "SET LOCAL statement_timeout TO 5000"
        );
        assert_eq!(render("SET my.flag = on"), "SET my.flag TO 'on'");
        assert_eq!(render("SET SESSION x TO DEFAULT"), "SET x TO DEFAULT");
        assert_eq!(render("SET extra_float_digits = -3"), "SET extra_float_digits TO -3");
        assert_eq!(render("SET TIME ZONE 'UTC'"), "SET timezone TO 'UTC'");
        assert_eq!(render("SET TIME ZONE LOCAL"), "SET timezone TO DEFAULT");
    }

    #[test]
    fn test_reset_and_show() {
        assert_eq!(render("RESET ALL"), "RESET ALL");
        assert_eq!(render("RESET work_mem"), "RESET work_mem");
        assert_eq!(render("RESET TIME ZONE"), "RESET timezone");
        assert_eq!(render("SHOW ALL"), "SHOW ALL");
        assert_eq!(render("SHOW TIME ZONE"), "SHOW timezone");
        let Node::VariableShowStmt(show) = statement("SHOW my.setting") else {
            panic!("expected SHOW");
        };
        assert_eq!(show.name, "my.setting");
    }
}
