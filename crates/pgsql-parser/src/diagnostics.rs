//! Non-fatal error reporting shared by the scanner and the parser.
//!
//! Lexical and syntax problems never abort a parse. They are recorded in an
//! [`ErrorSaveContext`] in the order they are found, and handed back to the
//! caller alongside whatever tree could be built.

use std::fmt;

/// Severity of a recorded diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Severity {
    /// Suspicious but accepted input.
    Warning,
    /// Input that could not be handled as written.
    Error,
}

impl Severity {
    /// Returns the upper-case label used when printing diagnostics.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Warning => "WARNING",
            Self::Error => "ERROR",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A position in the source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Location {
    /// Byte offset from the start of the input.
    pub offset: usize,
    /// 1-based line number.
    pub line: usize,
    /// 1-based column, counted in characters.
    pub column: usize,
}

impl Location {
    /// Computes the line and column of `offset` within `source`.
    ///
    /// Offsets past the end of `source` are clamped to its length. Callers
    /// resolving many offsets in the same text should build a [`LineIndex`].
    #[must_use]
    pub fn from_offset(source: &str, offset: usize) -> Self {
        LineIndex::new(source).locate(source, offset)
    }
}

/// Line start offsets of a source text.
///
/// Built in one pass; each lookup is a binary search plus, on lines with
/// non-ASCII text, a character count within the line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineIndex {
    starts: Vec<usize>,
    ascii: Vec<bool>,
}

impl LineIndex {
    /// Indexes the lines of `source`.
    #[must_use]
    pub fn new(source: &str) -> Self {
        let mut starts = vec![0];
        let mut ascii = Vec::new();
        for line in source.split_inclusive('\n') {
            ascii.push(line.is_ascii());
            starts.push(starts[starts.len() - 1] + line.len());
        }
        if source.ends_with('\n') || source.is_empty() {
            ascii.push(true);
        } else {
            starts.pop();
        }
        Self { starts, ascii }
    }

    /// Returns the location of `offset` in `source`, which must be the text
    /// this index was built from.
    #[must_use]
    pub fn locate(&self, source: &str, offset: usize) -> Location {
        let mut offset = offset.min(source.len());
        while !source.is_char_boundary(offset) {
            offset -= 1;
        }
        let line = self.starts.partition_point(|&start| start <= offset);
        let line_start = self.starts[line - 1];
        let column = if self.ascii[line - 1] {
            offset - line_start
        } else {
            source[line_start..offset].chars().count()
        };
        Location {
            offset,
            line,
            column: column + 1,
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}, column {}", self.line, self.column)
    }
}

/// One recorded problem.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// How serious the problem is.
    pub severity: Severity,
    /// Human readable message.
    pub message: String,
    /// Where the problem was found, if known.
    pub location: Option<Location>,
}

impl Diagnostic {
    /// Returns true for [`Severity::Error`] diagnostics.
    #[must_use]
    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.severity, self.message)?;
        if let Some(location) = &self.location {
            write!(f, " at {location}")?;
        }
        Ok(())
    }
}

/// Ordered collection of diagnostics plus the "error reported" flag.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ErrorSaveContext {
    diagnostics: Vec<Diagnostic>,
}

impl ErrorSaveContext {
    /// Creates an empty context.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            diagnostics: Vec::new(),
        }
    }

    /// Records a diagnostic.
    pub fn report(
        &mut self,
        severity: Severity,
        message: impl Into<String>,
        location: Option<Location>,
    ) {
        self.diagnostics.push(Diagnostic {
            severity,
            message: message.into(),
            location,
        });
    }

    /// Records an ERROR.
    pub fn error(&mut self, message: impl Into<String>, location: Option<Location>) {
        self.report(Severity::Error, message, location);
    }

    /// Records a WARNING.
    pub fn warning(&mut self, message: impl Into<String>, location: Option<Location>) {
        self.report(Severity::Warning, message, location);
    }

    /// Returns true once any ERROR has been recorded.
    #[must_use]
    pub fn error_occurred(&self) -> bool {
        self.diagnostics.iter().any(Diagnostic::is_error)
    }

    /// Returns true if nothing has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    /// Returns the recorded diagnostics in order.
    #[must_use]
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Consumes the context, returning its diagnostics.
    #[must_use]
    pub fn into_diagnostics(self) -> Vec<Diagnostic> {
        self.diagnostics
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_location_from_offset() {
        let src = "select 1;\nselect x";
        let loc = Location::from_offset(src, 17);
        assert_eq!(loc.line, 2);
        assert_eq!(loc.column, 8);
        assert_eq!(loc.offset, 17);
    }

    #[test]
    fn test_location_clamps_past_end() {
        let loc = Location::from_offset("ab", 10);
        assert_eq!(loc.offset, 2);
        assert_eq!(loc.column, 3);
    }

    #[test]
    fn test_line_index_matches_line_scan() {
        let src = "a\n\nbé c\nlast";
        let index = LineIndex::new(src);
        let expected = [
            (0, 1, 1),
            (1, 1, 2),
            (2, 2, 1),
            (3, 3, 1),
            (6, 3, 3),
            (7, 3, 4),
            (9, 4, 1),
            (13, 4, 5),
        ];
        for (offset, line, column) in expected {
            let loc = index.locate(src, offset);
            assert_eq!((loc.line, loc.column), (line, column), "offset {offset}");
        }
        assert_eq!(index.locate(src, 5).offset, 4);
    }

    #[test]
    fn test_line_index_edges() {
        assert_eq!(LineIndex::new("").locate("", 0).line, 1);
        let loc = LineIndex::new("x\n").locate("x\n", 2);
        assert_eq!((loc.line, loc.column), (2, 1));
    }

    #[test]
    fn test_error_flag_ignores_warnings() {
        let mut ctx = ErrorSaveContext::new();
        ctx.warning("identifier will be truncated", None);
        assert!(!ctx.error_occurred());
        ctx.error("unterminated quoted string", None);
        assert!(ctx.error_occurred());
        assert_eq!(ctx.diagnostics().len(), 2);
        assert_eq!(ctx.diagnostics()[0].severity, Severity::Warning);
    }

    #[test]
    fn test_diagnostic_display() {
        let d = Diagnostic {
            severity: Severity::Error,
            message: String::from("syntax error at or near \"FROM\""),
            location: Some(Location {
                offset: 7,
                line: 1,
                column: 8,
            }),
        };
        assert_eq!(
            d.to_string(),
            "ERROR: syntax error at or near \"FROM\" at line 1, column 8"
        );
    }
}
