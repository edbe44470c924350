//! PostgreSQL dialect.

use super::Dialect;

/// PostgreSQL scanning rules with configurable server settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PostgresDialect {
    standard_conforming_strings: bool,
    escape_string_warning: bool,
    max_identifier_length: usize,
}

impl PostgresDialect {
    /// Creates a dialect with the server defaults.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            standard_conforming_strings: true,
            escape_string_warning: true,
            max_identifier_length: 63,
        }
    }

    /// Sets `standard_conforming_strings`.
    #[must_use]
    pub const fn with_standard_conforming_strings(mut self, on: bool) -> Self {
        self.standard_conforming_strings = on;
        self
    }

    /// Sets `escape_string_warning`.
    #[must_use]
    pub const fn with_escape_string_warning(mut self, on: bool) -> Self {
        self.escape_string_warning = on;
        self
    }

    /// Sets the identifier length limit in bytes.
    #[must_use]
    pub const fn with_max_identifier_length(mut self, len: usize) -> Self {
        self.max_identifier_length = len;
        self
    }
}

impl Default for PostgresDialect {
    fn default() -> Self {
        Self::new()
    }
}

impl Dialect for PostgresDialect {
    fn name(&self) -> &'static str {
        "postgres"
    }

    fn standard_conforming_strings(&self) -> bool {
        self.standard_conforming_strings
    }

    fn escape_string_warning(&self) -> bool {
        self.escape_string_warning
    }

    fn max_identifier_length(&self) -> usize {
        self.max_identifier_length
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_postgres_dialect_defaults() {
        let dialect = PostgresDialect::new();
        assert_eq!(dialect.name(), "postgres");
        assert!(dialect.standard_conforming_strings());
        assert!(dialect.escape_string_warning());
        assert_eq!(dialect.max_identifier_length(), 63);
    }

    #[test]
    fn test_postgres_dialect_builders() {
        let dialect = PostgresDialect::new()
            .with_standard_conforming_strings(false)
            .with_escape_string_warning(false)
            .with_max_identifier_length(8);
        assert!(!dialect.standard_conforming_strings());
        assert!(!dialect.escape_string_warning());
        assert_eq!(dialect.max_identifier_length(), 8);
    }

    #[test]
    fn test_quote_identifier() {
        let dialect = PostgresDialect::default();
        assert_eq!(dialect.quote_identifier("users"), "users");
        assert_eq!(dialect.quote_identifier("Users"), "\"Users\"");
        assert_eq!(dialect.quote_identifier("select"), "\"select\"");
    }
}
