//! SQL Parser
//!
//! A hand-written recursive descent parser with Pratt expression parsing.
//! Statements are pulled one at a time from the [`Scanner`](crate::lexer::Scanner);
//! a statement with a syntax error is reported and skipped so the rest of
//! the input still parses.

mod ddl;
mod dml;
mod error;
mod expression;
#[allow(clippy::module_inception)]
mod parser;
mod pratt;
mod select;
mod types;
mod utility;

pub use error::ParseError;
pub use parser::{ParseResult, Parser, MAX_NESTING_DEPTH};
