//! SQL type names.

use std::fmt;

use super::format::{comma, QualifiedName};
use super::{AstNode, Children, Node, Value};

/// Schema that holds the built-in types.
pub const SYSTEM_SCHEMA: &str = "pg_catalog";

/// Field bits of an `interval` type's first typmod.
///
/// `interval day to second(3)` stores `DAY | HOUR | MINUTE | SECOND` and
/// then the precision `3`; `interval(3)` stores `FULL_RANGE` and `3`.
pub mod interval {
    pub const MONTH: i32 = 1 << 1;
    pub const YEAR: i32 = 1 << 2;
    pub const DAY: i32 = 1 << 3;
    pub const HOUR: i32 = 1 << 10;
    pub const MINUTE: i32 = 1 << 11;
    pub const SECOND: i32 = 1 << 12;
    /// No field restriction.
    pub const FULL_RANGE: i32 = 0x7FFF;

    const RANGES: &[(i32, &str)] = &[
        (YEAR, "year"),
        (MONTH, "month"),
        (DAY, "day"),
        (HOUR, "hour"),
        (MINUTE, "minute"),
        (SECOND, "second"),
        (YEAR | MONTH, "year to month"),
        (DAY | HOUR, "day to hour"),
        (DAY | HOUR | MINUTE, "day to minute"),
        (DAY | HOUR | MINUTE | SECOND, "day to second"),
        (HOUR | MINUTE, "hour to minute"),
        (HOUR | MINUTE | SECOND, "hour to second"),
        (MINUTE | SECOND, "minute to second"),
    ];

    /// Returns the SQL spelling of a field range, such as `day to second`.
    #[must_use]
    pub fn range_name(mask: i32) -> Option<&'static str> {
        RANGES
            .iter()
            .find(|(bits, _)| *bits == mask)
            .map(|(_, name)| *name)
    }
}

/// A type reference such as `integer`, `varchar(20)` or `myschema.t[]`.
///
/// Types with dedicated SQL syntax are stored under their `pg_catalog`
/// internal names (`int4`, `bpchar`, `timestamptz`, ...) and rendered back
/// in the standard spelling.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TypeName {
    /// Possibly qualified name.
    pub names: Vec<String>,
    /// Type modifiers, such as a length or precision.
    pub typmods: Vec<Node>,
    /// Array dimensions; `-1` for an unsized `[]`.
    pub array_bounds: Vec<i32>,
    /// `SETOF` prefix.
    pub setof: bool,
}

impl TypeName {
    /// A type referenced by name.
    #[must_use]
    pub fn new(names: Vec<String>) -> Self {
        Self {
            names,
            ..Self::default()
        }
    }

    /// A built-in type with dedicated syntax.
    #[must_use]
    pub fn system(name: &str) -> Self {
        Self::new(vec![SYSTEM_SCHEMA.to_owned(), name.to_owned()])
    }

    /// Returns the internal name if this is a built-in type.
    #[must_use]
    pub fn system_name(&self) -> Option<&str> {
        match self.names.as_slice() {
            [schema, name] if schema == SYSTEM_SCHEMA => Some(name),
            _ => None,
        }
    }

    pub(super) fn child_nodes(&self) -> Vec<&dyn AstNode> {
        Children::new().list(&self.typmods).finish()
    }

    fn fmt_typmods(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.typmods.is_empty() {
            Ok(())
        } else {
            write!(f, "({})", comma(&self.typmods))
        }
    }

    /// `interval`, `interval(p)` or `interval <fields>[(p)]`, falling back to
    /// a plain typmod list for anything else.
    fn fmt_interval(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("interval")?;
        let typmods: Option<Vec<i32>> = self.typmods.iter().map(integer_typmod).collect();
        match typmods.as_deref() {
            Some([interval::FULL_RANGE, precision]) => write!(f, "({precision})"),
            Some([range, rest @ ..]) => match (interval::range_name(*range), rest) {
                (Some(name), []) => write!(f, " {name}"),
                (Some(name), [precision]) if range & interval::SECOND != 0 => {
                    write!(f, " {name}({precision})")
                }
                _ => self.fmt_typmods(f),
            },
            _ => self.fmt_typmods(f),
        }
    }

    fn fmt_base(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (spelling, suffix) = match self.system_name() {
            Some("int2") if self.typmods.is_empty() => ("smallint", ""),
            Some("int4") if self.typmods.is_empty() => ("integer", ""),
            Some("int8") if self.typmods.is_empty() => ("bigint", ""),
            Some("float4") if self.typmods.is_empty() => ("real", ""),
            Some("float8") if self.typmods.is_empty() => ("double precision", ""),
            Some("bool") if self.typmods.is_empty() => ("boolean", ""),
            Some("numeric") => ("numeric", ""),
            Some("bpchar") => ("character", ""),
            Some("varchar") => ("character varying", ""),
            Some("bit") => ("bit", ""),
            Some("varbit") => ("bit varying", ""),
            Some("timestamp") => ("timestamp", ""),
            Some("timestamptz") => ("timestamp", " with time zone"),
            Some("time") => ("time", ""),
            Some("timetz") => ("time", " with time zone"),
            Some("interval") => return self.fmt_interval(f),
            _ => {
                write!(f, "{}", QualifiedName(&self.names))?;
                return self.fmt_typmods(f);
            }
        };
        f.write_str(spelling)?;
        self.fmt_typmods(f)?;
        f.write_str(suffix)
    }
}

fn integer_typmod(node: &Node) -> Option<i32> {
    match node {
        Node::AConst(constant) => match constant.val {
            Value::Integer(n) => Some(n),
            _ => None,
        },
        _ => None,
    }
}

impl fmt::Display for TypeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.setof {
            f.write_str("SETOF ")?;
        }
        self.fmt_base(f)?;
        for bound in &self.array_bounds {
            if *bound < 0 {
                f.write_str("[]")?;
            } else {
                write!(f, "[{bound}]")?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::AConst;

    #[test]
    fn test_builtin_spellings() {
        assert_eq!(TypeName::system("int4").to_string(), "integer");
        assert_eq!(TypeName::system("float8").to_string(), "double precision");
        let mut ts = TypeName::system("timestamptz");
        ts.typmods.push(AConst::integer(3).into());
        assert_eq!(ts.to_string(), "timestamp(3) with time zone");
        let mut vc = TypeName::system("varchar");
        vc.typmods.push(AConst::integer(20).into());
        vc.array_bounds = vec![-1, 4];
        assert_eq!(vc.to_string(), "character varying(20)[][4]");
    }

    #[test]
    fn test_interval_spellings() {
        let interval = |typmods: &[i32]| TypeName {
            typmods: typmods.iter().map(|&n| AConst::integer(n).into()).collect(),
            ..TypeName::system("interval")
        };
        assert_eq!(interval(&[]).to_string(), "interval");
        assert_eq!(interval(&[interval::FULL_RANGE, 2]).to_string(), "interval(2)");
        assert_eq!(interval(&[interval::DAY]).to_string(), "interval day");
        assert_eq!(
            interval(&[interval::DAY | interval::HOUR | interval::MINUTE | interval::SECOND, 3])
                .to_string(),
            "interval day to second(3)"
        );
        assert_eq!(interval(&[interval::YEAR | interval::MONTH]).to_string(), "interval year to month");
        // not a field range
        assert_eq!(interval(&[5]).to_string(), "interval(5)");
    }

    #[test]
    fn test_named_types() {
        let t = TypeName::new(vec!["My".into(), "t".into()]);
        assert_eq!(t.to_string(), "\"My\".t");
        let mut setof = TypeName::new(vec!["text".into()]);
        setof.setof = true;
        assert_eq!(setof.to_string(), "SETOF text");
    }
}
