//! # pgsql-parser
//!
//! A parser for the PostgreSQL SQL dialect.
//!
//! This crate provides:
//! - A finite-state scanner for the PostgreSQL lexical grammar, with the
//!   lookahead that keyword pairs such as `NOT IN` and `NULLS FIRST` need
//! - A recursive descent parser with Pratt expression parsing that recovers
//!   from syntax errors at statement boundaries
//! - A typed syntax tree whose nodes render back to SQL that parses to the
//!   same tree
//!
//! ## Parsing
//!
//! ```rust
//! use pgsql_parser::parse_sql;
//!
//! let result = parse_sql("SELECT a, b FROM t WHERE a > 1; SELEC 2; DELETE FROM t");
//! assert!(!result.success);
//! assert_eq!(result.statements.len(), 2);
//! assert_eq!(
//!     result.errors().next().map(|d| d.message.as_str()),
//!     Some("syntax error at or near \"SELEC\"")
//! );
//! ```
//!
//! ## Rendering
//!
//! Every node implements [`Display`](std::fmt::Display). Rendering a
//! statement and parsing the output again yields an equal tree:
//!
//! ```rust
//! use pgsql_parser::parse_sql;
//!
//! let first = parse_sql("select x::int from t where not a or b");
//! let sql = first.statements[0].stmt.to_string();
//! assert_eq!(sql, "SELECT CAST(x AS integer) FROM t WHERE NOT a OR b");
//! let second = parse_sql(&sql);
//! assert_eq!(first.statements[0].stmt, second.statements[0].stmt);
//! ```
//!
//! ## Dialect settings
//!
//! Scanner behavior that depends on server settings is configured through a
//! [`Dialect`]:
//!
//! ```rust
//! use pgsql_parser::{parse_sql_with_dialect, PostgresDialect};
//!
//! let dialect = PostgresDialect::new().with_standard_conforming_strings(false);
//! let result = parse_sql_with_dialect(r"SELECT 'a\nb'", &dialect);
//! assert!(result.success);
//! assert_eq!(result.warnings().count(), 1);
//! ```

pub mod ast;
pub mod diagnostics;
pub mod dialect;
pub mod error;
pub mod lexer;
pub mod numeric;
pub mod parser;

use std::io::Read;

pub use ast::{walk, AstNode, Node, NodeTag, RawStmt};
pub use diagnostics::{Diagnostic, ErrorSaveContext, Location, Severity};
pub use dialect::{Dialect, PostgresDialect};
pub use error::{Error, Result};
pub use lexer::{Keyword, Scanner, Token, TokenKind};
pub use parser::{ParseError, ParseResult, Parser};

/// Parses `sql` with the default PostgreSQL settings.
#[must_use]
pub fn parse_sql(sql: &str) -> ParseResult {
    Parser::new(sql).parse()
}

/// Parses `sql` with the scanning rules of `dialect`.
#[must_use]
pub fn parse_sql_with_dialect(sql: &str, dialect: &dyn Dialect) -> ParseResult {
    Parser::with_dialect(sql, dialect).parse()
}

/// Reads SQL text from `reader` and parses it.
///
/// # Errors
///
/// Returns [`Error::Io`] if reading fails and [`Error::Encoding`] if the
/// input is not valid UTF-8. Syntax errors are reported in the result.
pub fn parse_reader(reader: impl Read) -> Result<ParseResult> {
    let scanner = Scanner::from_reader(reader, &PostgresDialect::new())?;
    Ok(Parser::from_scanner(scanner).parse())
}
