//! SQL dialect configuration.
//!
//! A [`Dialect`] carries the server settings that change how text is
//! scanned: whether backslashes are escapes in plain strings, whether to
//! warn about them, and how long identifiers may be.

mod postgres;

pub use postgres::PostgresDialect;

use crate::ast::quote_identifier;

/// Trait for dialect-specific scanning behavior.
pub trait Dialect {
    /// Returns the name of the dialect.
    fn name(&self) -> &'static str;

    /// Returns true if backslashes are ordinary characters in `'...'`.
    fn standard_conforming_strings(&self) -> bool {
        true
    }

    /// Returns true if backslashes in `'...'` should raise a warning when
    /// [`standard_conforming_strings`](Self::standard_conforming_strings) is
    /// off.
    fn escape_string_warning(&self) -> bool {
        true
    }

    /// Returns the maximum identifier length in bytes. Longer identifiers
    /// are truncated.
    fn max_identifier_length(&self) -> usize {
        63
    }

    /// Quotes an identifier if necessary.
    fn quote_identifier(&self, name: &str) -> String {
        quote_identifier(name).into_owned()
    }
}
