//! The keyword table.
//!
//! Entries are kept sorted by spelling so lookups can binary search. The
//! category decides where a keyword may double as an identifier and whether
//! identifiers spelled like it must be quoted when rendered.

use std::fmt;

/// How strongly a keyword is reserved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeywordCategory {
    /// Usable as any kind of name.
    Unreserved,
    /// Usable as a column or table name, not as a function or type name.
    ColName,
    /// Usable as a function or type name, not as a column name.
    TypeFuncName,
    /// Usable only as a column label after `AS`.
    Reserved,
}

/// One row of the keyword table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeywordEntry {
    /// Lowercase spelling.
    pub spelling: &'static str,
    /// Token code.
    pub keyword: Keyword,
    /// Reservation category.
    pub category: KeywordCategory,
    /// Whether the scanner must peek at the next token to resolve the code.
    pub lookahead: bool,
}

macro_rules! keywords {
    (@la lookahead) => { true };
    (@la) => { false };
    ($($variant:ident => $spelling:literal, $category:ident $(, $la:ident)?;)*) => {
        /// SQL keywords.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum Keyword {
            $(
                #[allow(missing_docs)]
                $variant,
            )*
        }

        impl Keyword {
            /// Returns the lowercase spelling.
            #[must_use]
            pub const fn as_str(self) -> &'static str {
                match self {
                    $(Self::$variant => $spelling,)*
                }
            }
        }

        /// All keywords, sorted by spelling.
        pub static KEYWORDS: &[KeywordEntry] = &[
            $(
                KeywordEntry {
                    spelling: $spelling,
                    keyword: Keyword::$variant,
                    category: KeywordCategory::$category,
                    lookahead: keywords!(@la $($la)?),
                },
            )*
        ];
    };
}

keywords! {
    Abort => "abort", Unreserved;
    Absolute => "absolute", Unreserved;
    Action => "action", Unreserved;
    Add => "add", Unreserved;
    All => "all", Reserved;
    Alter => "alter", Unreserved;
    Always => "always", Unreserved;
    Analyse => "analyse", Reserved;
    Analyze => "analyze", Reserved;
    And => "and", Reserved;
    Any => "any", Reserved;
    Array => "array", Reserved;
    As => "as", Reserved;
    Asc => "asc", Reserved;
    Asymmetric => "asymmetric", Reserved;
    At => "at", Unreserved;
    Authorization => "authorization", TypeFuncName;
    Begin => "begin", Unreserved;
    Between => "between", ColName;
    Bigint => "bigint", ColName;
    Binary => "binary", TypeFuncName;
    Bit => "bit", ColName;
    Boolean => "boolean", ColName;
    Both => "both", Reserved;
    By => "by", Unreserved;
    Cascade => "cascade", Unreserved;
    Case => "case", Reserved;
    Cast => "cast", Reserved;
    Chain => "chain", Unreserved;
    Char => "char", ColName;
    Character => "character", ColName;
    Check => "check", Reserved;
    Coalesce => "coalesce", ColName;
    Collate => "collate", Reserved;
    Collation => "collation", TypeFuncName;
    Column => "column", Reserved;
    Commit => "commit", Unreserved;
    Committed => "committed", Unreserved;
    Concurrently => "concurrently", TypeFuncName;
    Conflict => "conflict", Unreserved;
    Constraint => "constraint", Reserved;
    Continue => "continue", Unreserved;
    Create => "create", Reserved;
    Cross => "cross", TypeFuncName;
    Current => "current", Unreserved;
    CurrentCatalog => "current_catalog", Reserved;
    CurrentDate => "current_date", Reserved;
    CurrentRole => "current_role", Reserved;
    CurrentSchema => "current_schema", TypeFuncName;
    CurrentTime => "current_time", Reserved;
    CurrentTimestamp => "current_timestamp", Reserved;
    CurrentUser => "current_user", Reserved;
    Cycle => "cycle", Unreserved;
    Data => "data", Unreserved;
    Day => "day", Unreserved;
    Dec => "dec", ColName;
    Decimal => "decimal", ColName;
    Default => "default", Reserved;
    Deferrable => "deferrable", Reserved;
    Deferred => "deferred", Unreserved;
    Delete => "delete", Unreserved;
    Desc => "desc", Reserved;
    Distinct => "distinct", Reserved;
    Do => "do", Reserved;
    Double => "double", Unreserved;
    Drop => "drop", Unreserved;
    Else => "else", Reserved;
    End => "end", Reserved;
    Escape => "escape", Unreserved;
    Except => "except", Reserved;
    Exclude => "exclude", Unreserved;
    Exists => "exists", ColName;
    Extract => "extract", ColName;
    False => "false", Reserved;
    Fetch => "fetch", Reserved;
    Filter => "filter", Unreserved;
    First => "first", Unreserved;
    Float => "float", ColName;
    Following => "following", Unreserved;
    For => "for", Reserved;
    Foreign => "foreign", Reserved;
    From => "from", Reserved;
    Full => "full", TypeFuncName;
    Grant => "grant", Reserved;
    Greatest => "greatest", ColName;
    Group => "group", Reserved;
    Groups => "groups", Unreserved;
    Having => "having", Reserved;
    Hour => "hour", Unreserved;
    Identity => "identity", Unreserved;
    If => "if", Unreserved;
    Ilike => "ilike", TypeFuncName;
    Immediate => "immediate", Unreserved;
    In => "in", Reserved;
    Index => "index", Unreserved;
    Initially => "initially", Reserved;
    Inner => "inner", TypeFuncName;
    Insert => "insert", Unreserved;
    Int => "int", ColName;
    Integer => "integer", ColName;
    Intersect => "intersect", Reserved;
    Interval => "interval", ColName;
    Into => "into", Reserved;
    Is => "is", TypeFuncName;
    Isnull => "isnull", TypeFuncName;
    Isolation => "isolation", Unreserved;
    Join => "join", TypeFuncName;
    Key => "key", Unreserved;
    Last => "last", Unreserved;
    Lateral => "lateral", Reserved;
    Leading => "leading", Reserved;
    Least => "least", ColName;
    Left => "left", TypeFuncName;
    Level => "level", Unreserved;
    Like => "like", TypeFuncName;
    Limit => "limit", Reserved;
    Local => "local", Unreserved;
    Localtime => "localtime", Reserved;
    Localtimestamp => "localtimestamp", Reserved;
    Locked => "locked", Unreserved;
    Materialized => "materialized", Unreserved;
    Minute => "minute", Unreserved;
    Month => "month", Unreserved;
    National => "national", ColName;
    Natural => "natural", TypeFuncName;
    Nchar => "nchar", ColName;
    Next => "next", Unreserved;
    No => "no", Unreserved;
    None => "none", ColName;
    Not => "not", Reserved, lookahead;
    Nothing => "nothing", Unreserved;
    Notnull => "notnull", TypeFuncName;
    Nowait => "nowait", Unreserved;
    Null => "null", Reserved;
    Nullif => "nullif", ColName;
    Nulls => "nulls", Unreserved, lookahead;
    Numeric => "numeric", ColName;
    Of => "of", Unreserved;
    Offset => "offset", Reserved;
    On => "on", Reserved;
    Only => "only", Reserved;
    Option => "option", Unreserved;
    Or => "or", Reserved;
    Order => "order", Reserved;
    Ordinality => "ordinality", Unreserved;
    Others => "others", Unreserved;
    Outer => "outer", TypeFuncName;
    Over => "over", Unreserved;
    Overlaps => "overlaps", TypeFuncName;
    Overlay => "overlay", ColName;
    Partition => "partition", Unreserved;
    Placing => "placing", Reserved;
    Position => "position", ColName;
    Preceding => "preceding", Unreserved;
    Precision => "precision", ColName;
    Primary => "primary", Reserved;
    Range => "range", Unreserved;
    Read => "read", Unreserved;
    Real => "real", ColName;
    Recursive => "recursive", Unreserved;
    References => "references", Reserved;
    Release => "release", Unreserved;
    Rename => "rename", Unreserved;
    Repeatable => "repeatable", Unreserved;
    Replace => "replace", Unreserved;
    Reset => "reset", Unreserved;
    Restart => "restart", Unreserved;
    Restrict => "restrict", Unreserved;
    Returning => "returning", Reserved;
    Right => "right", TypeFuncName;
    Rollback => "rollback", Unreserved;
    Row => "row", ColName;
    Rows => "rows", Unreserved;
    Savepoint => "savepoint", Unreserved;
    Schema => "schema", Unreserved;
    Second => "second", Unreserved;
    Select => "select", Reserved;
    Sequence => "sequence", Unreserved;
    Serializable => "serializable", Unreserved;
    Session => "session", Unreserved;
    SessionUser => "session_user", Reserved;
    Set => "set", Unreserved;
    Setof => "setof", ColName;
    Share => "share", Unreserved;
    Show => "show", Unreserved;
    Similar => "similar", TypeFuncName;
    Skip => "skip", Unreserved;
    Smallint => "smallint", ColName;
    Some => "some", Reserved;
    Start => "start", Unreserved;
    Substring => "substring", ColName;
    Symmetric => "symmetric", Reserved;
    SystemUser => "system_user", Reserved;
    Table => "table", Reserved;
    Tablesample => "tablesample", TypeFuncName;
    Temp => "temp", Unreserved;
    Temporary => "temporary", Unreserved;
    Then => "then", Reserved;
    Ties => "ties", Unreserved;
    Time => "time", ColName;
    Timestamp => "timestamp", ColName;
    To => "to", Reserved;
    Trailing => "trailing", Reserved;
    Transaction => "transaction", Unreserved;
    Treat => "treat", ColName;
    Trim => "trim", ColName;
    True => "true", Reserved;
    Truncate => "truncate", Unreserved;
    Uescape => "uescape", Unreserved;
    Unbounded => "unbounded", Unreserved;
    Uncommitted => "uncommitted", Unreserved;
    Union => "union", Reserved;
    Unique => "unique", Reserved;
    Unknown => "unknown", Unreserved;
    Unlogged => "unlogged", Unreserved;
    Update => "update", Unreserved;
    User => "user", Reserved;
    Using => "using", Reserved;
    Values => "values", ColName;
    Varchar => "varchar", ColName;
    Variadic => "variadic", Reserved;
    Varying => "varying", Unreserved;
    Verbose => "verbose", TypeFuncName;
    View => "view", Unreserved;
    When => "when", Reserved;
    Where => "where", Reserved;
    Window => "window", Reserved;
    With => "with", Reserved, lookahead;
    Without => "without", Unreserved, lookahead;
    Work => "work", Unreserved;
    Write => "write", Unreserved;
    Year => "year", Unreserved;
    Zone => "zone", Unreserved;
}

/// Longest spelling in [`KEYWORDS`]; longer words are never keywords.
const MAX_KEYWORD_LEN: usize = 17;

/// Finds the table entry for `word`, ignoring ASCII case.
#[must_use]
pub fn lookup(word: &str) -> Option<&'static KeywordEntry> {
    if word.len() > MAX_KEYWORD_LEN || !word.is_ascii() {
        return None;
    }
    let lower = word.to_ascii_lowercase();
    KEYWORDS
        .binary_search_by(|entry| entry.spelling.cmp(lower.as_str()))
        .ok()
        .map(|i| &KEYWORDS[i])
}

impl Keyword {
    /// Looks up a keyword by spelling (case-insensitive).
    #[must_use]
    pub fn lookup(word: &str) -> Option<Self> {
        lookup(word).map(|entry| entry.keyword)
    }

    /// Returns the table entry for this keyword.
    #[must_use]
    pub fn entry(self) -> &'static KeywordEntry {
        // The enum is declared in table order, so the discriminant is the index.
        &KEYWORDS[self as usize]
    }

    /// Returns the reservation category.
    #[must_use]
    pub fn category(self) -> KeywordCategory {
        self.entry().category
    }

    /// Returns true if the keyword can be used as a column or table name.
    #[must_use]
    pub fn is_col_id(self) -> bool {
        matches!(
            self.category(),
            KeywordCategory::Unreserved | KeywordCategory::ColName
        )
    }

    /// Returns true if the keyword can be used as a function or type name.
    #[must_use]
    pub fn is_type_func_name(self) -> bool {
        matches!(
            self.category(),
            KeywordCategory::Unreserved | KeywordCategory::TypeFuncName
        )
    }

    /// Returns true for fully reserved keywords.
    #[must_use]
    pub fn is_reserved(self) -> bool {
        self.category() == KeywordCategory::Reserved
    }
}

impl fmt::Display for Keyword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_str().to_ascii_uppercase())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_is_sorted() {
        for pair in KEYWORDS.windows(2) {
            assert!(
                pair[0].spelling < pair[1].spelling,
                "{} must sort before {}",
                pair[0].spelling,
                pair[1].spelling
            );
        }
    }

    #[test]
    fn test_discriminant_matches_index() {
        for (i, entry) in KEYWORDS.iter().enumerate() {
            assert_eq!(entry.keyword as usize, i);
            assert_eq!(entry.keyword.as_str(), entry.spelling);
        }
    }

    #[test]
    fn test_max_len() {
        let longest = KEYWORDS.iter().map(|e| e.spelling.len()).max();
        assert_eq!(longest, Some(MAX_KEYWORD_LEN));
    }

    #[test]
    fn test_lookup_case_insensitive() {
        assert_eq!(Keyword::lookup("SELECT"), Some(Keyword::Select));
        assert_eq!(Keyword::lookup("SeLeCt"), Some(Keyword::Select));
        assert_eq!(Keyword::lookup("table_a"), None);
        assert_eq!(Keyword::lookup("current_timestamp"), Some(Keyword::CurrentTimestamp));
    }

    #[test]
    fn test_lookahead_flags() {
        let flagged: Vec<_> = KEYWORDS
            .iter()
            .filter(|e| e.lookahead)
            .map(|e| e.spelling)
            .collect();
        assert_eq!(flagged, ["not", "nulls", "with", "without"]);
    }

    #[test]
    fn test_categories() {
        assert!(Keyword::Select.is_reserved());
        assert!(Keyword::Abort.is_col_id());
        assert!(Keyword::Int.is_col_id());
        assert!(!Keyword::Left.is_col_id());
        assert!(Keyword::Left.is_type_func_name());
        assert!(!Keyword::Coalesce.is_type_func_name());
    }

    #[test]
    fn test_display_upper_case() {
        assert_eq!(Keyword::Localtimestamp.to_string(), "LOCALTIMESTAMP");
    }
}
