//! Type names.

use super::error::ParseError;
use super::parser::Parser;
use crate::ast::{interval, AConst, Node, TypeName};
use crate::lexer::{Keyword, TokenKind};

impl Parser<'_> {
    /// Parses `[SETOF] type [array bounds]`.
    pub(super) fn parse_type_name(&mut self) -> Result<TypeName, ParseError> {
        let setof = self.consume_keyword(Keyword::Setof);
        let mut type_name = self.parse_simple_type_name()?;
        type_name.setof = setof;
        type_name.array_bounds = self.parse_array_bounds()?;
        Ok(type_name)
    }

    fn parse_array_bounds(&mut self) -> Result<Vec<i32>, ParseError> {
        let mut bounds = Vec::new();
        if self.consume_keyword(Keyword::Array) {
            if self.consume(&TokenKind::LeftBracket) {
                bounds.push(self.parse_iconst()?);
                self.expect(&TokenKind::RightBracket)?;
            } else {
                bounds.push(-1);
            }
            return Ok(bounds);
        }
        while self.consume(&TokenKind::LeftBracket) {
            if self.consume(&TokenKind::RightBracket) {
                bounds.push(-1);
            } else {
                bounds.push(self.parse_iconst()?);
                self.expect(&TokenKind::RightBracket)?;
            }
        }
        Ok(bounds)
    }

    /// Parses a type without `SETOF` or array bounds.
    ///
    /// Types with dedicated SQL syntax map to their internal names.
    pub(super) fn parse_simple_type_name(&mut self) -> Result<TypeName, ParseError> {
        let Some(kw) = self.current.as_keyword() else {
            return self.parse_generic_type();
        };
        let type_name = match kw {
            Keyword::Int | Keyword::Integer => self.builtin("int4"),
            Keyword::Smallint => self.builtin("int2"),
            Keyword::Bigint => self.builtin("int8"),
            Keyword::Real => self.builtin("float4"),
            Keyword::Boolean => self.builtin("bool"),
            Keyword::Float => {
                self.advance();
                self.parse_float_type()?
            }
            Keyword::Double if self.peek_keyword(Keyword::Precision) => {
                self.advance();
                self.builtin("float8")
            }
            Keyword::Dec | Keyword::Decimal | Keyword::Numeric => {
                let mut numeric = self.builtin("numeric");
                numeric.typmods = self.parse_opt_typmods()?;
                numeric
            }
            Keyword::Bit => {
                self.advance();
                let varying = self.consume_keyword(Keyword::Varying);
                let mut bit = TypeName::system(if varying { "varbit" } else { "bit" });
                bit.typmods = self.parse_opt_typmods()?;
                if !varying && bit.typmods.is_empty() {
                    bit.typmods.push(AConst::integer(1).into());
                }
                bit
            }
            Keyword::Char | Keyword::Character | Keyword::Nchar => {
                self.advance();
                self.parse_character_type()?
            }
            Keyword::National => {
                self.advance();
                if !self.consume_keyword(Keyword::Character) {
                    self.expect_keyword(Keyword::Char)?;
                }
                self.parse_character_type()?
            }
            Keyword::Varchar => {
                let mut varchar = self.builtin("varchar");
                varchar.typmods = self.parse_opt_typmods()?;
                varchar
            }
            Keyword::Timestamp | Keyword::Time => {
                self.advance();
                let typmods = self.parse_opt_typmods()?;
                let with_zone = self.parse_opt_time_zone()?;
                let name = match (kw, with_zone) {
                    (Keyword::Timestamp, false) => "timestamp",
                    (Keyword::Timestamp, true) => "timestamptz",
                    (_, false) => "time",
                    (_, true) => "timetz",
                };
                TypeName {
                    typmods,
                    ..TypeName::system(name)
                }
            }
            Keyword::Interval => {
                self.advance();
                let typmods = if self.consume(&TokenKind::LeftParen) {
                    let precision = self.parse_iconst()?;
                    self.expect(&TokenKind::RightParen)?;
                    vec![
                        AConst::integer(interval::FULL_RANGE).into(),
                        AConst::integer(precision).into(),
                    ]
                } else {
                    self.parse_opt_interval()?
                };
                TypeName {
                    typmods,
                    ..TypeName::system("interval")
                }
            }
            _ => return self.parse_generic_type(),
        };
        Ok(type_name)
    }

    /// Consumes the keyword naming a built-in type.
    fn builtin(&mut self, name: &str) -> TypeName {
        self.advance();
        TypeName::system(name)
    }

    fn parse_float_type(&mut self) -> Result<TypeName, ParseError> {
        if !self.consume(&TokenKind::LeftParen) {
            return Ok(TypeName::system("float8"));
        }
        let span = self.current.span;
        let precision = self.parse_iconst()?;
        self.expect(&TokenKind::RightParen)?;
        let name = match precision {
            i32::MIN..=0 => {
                return Err(ParseError::new(
                    "precision for type float must be at least 1 bit",
                    span,
                ))
            }
            1..=24 => "float4",
            25..=53 => "float8",
            _ => {
                return Err(ParseError::new(
                    "precision for type float must be less than 54 bits",
                    span,
                ))
            }
        };
        Ok(TypeName::system(name))
    }

    /// `[VARYING] [(n)]` after `CHARACTER`; a fixed-length type without a
    /// length holds one character.
    fn parse_character_type(&mut self) -> Result<TypeName, ParseError> {
        let varying = self.consume_keyword(Keyword::Varying);
        let mut character = TypeName::system(if varying { "varchar" } else { "bpchar" });
        character.typmods = self.parse_opt_typmods()?;
        if !varying && character.typmods.is_empty() {
            character.typmods.push(AConst::integer(1).into());
        }
        Ok(character)
    }

    fn parse_opt_time_zone(&mut self) -> Result<bool, ParseError> {
        let with_zone = match self.current.kind {
            TokenKind::WithLa => true,
            TokenKind::WithoutLa => false,
            _ => return Ok(false),
        };
        self.advance();
        self.expect_keyword(Keyword::Time)?;
        self.expect_keyword(Keyword::Zone)?;
        Ok(with_zone)
    }

    /// Parses the optional field range after `interval`, such as `day`,
    /// `hour to minute` or `second(3)`, into interval typmods.
    pub(super) fn parse_opt_interval(&mut self) -> Result<Vec<Node>, ParseError> {
        let first = match self.current.as_keyword() {
            Some(Keyword::Year) => interval::YEAR,
            Some(Keyword::Month) => interval::MONTH,
            Some(Keyword::Day) => interval::DAY,
            Some(Keyword::Hour) => interval::HOUR,
            Some(Keyword::Minute) => interval::MINUTE,
            Some(Keyword::Second) => interval::SECOND,
            _ => return Ok(Vec::new()),
        };
        self.advance();
        let range = if first != interval::SECOND && self.consume_keyword(Keyword::To) {
            let last = self.current.as_keyword();
            let range = match (first, last) {
                (interval::YEAR, Some(Keyword::Month)) => interval::YEAR | interval::MONTH,
                (interval::DAY, Some(Keyword::Hour)) => interval::DAY | interval::HOUR,
                (interval::DAY, Some(Keyword::Minute)) => {
                    interval::DAY | interval::HOUR | interval::MINUTE
                }
                (interval::DAY, Some(Keyword::Second)) => {
                    interval::DAY | interval::HOUR | interval::MINUTE | interval::SECOND
                }
                (interval::HOUR, Some(Keyword::Minute)) => interval::HOUR | interval::MINUTE,
                (interval::HOUR, Some(Keyword::Second)) => {
                    interval::HOUR | interval::MINUTE | interval::SECOND
                }
                (interval::MINUTE, Some(Keyword::Second)) => interval::MINUTE | interval::SECOND,
                _ => return Err(self.syntax_error()),
            };
            self.advance();
            range
        } else {
            first
        };
        let mut typmods = vec![AConst::integer(range).into()];
        if range & interval::SECOND != 0 && self.consume(&TokenKind::LeftParen) {
            typmods.push(AConst::integer(self.parse_iconst()?).into());
            self.expect(&TokenKind::RightParen)?;
        }
        Ok(typmods)
    }

    fn parse_opt_typmods(&mut self) -> Result<Vec<Node>, ParseError> {
        if !self.consume(&TokenKind::LeftParen) {
            return Ok(Vec::new());
        }
        let typmods = self.parse_expr_list()?;
        self.expect(&TokenKind::RightParen)?;
        Ok(typmods)
    }

    fn parse_generic_type(&mut self) -> Result<TypeName, ParseError> {
        let mut names = vec![self.parse_type_function_name()?];
        while self.consume(&TokenKind::Dot) {
            names.push(self.parse_col_label()?);
        }
        Ok(TypeName {
            typmods: self.parse_opt_typmods()?,
            ..TypeName::new(names)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn type_name(sql: &str) -> TypeName {
        let mut parser = Parser::new(sql);
        let parsed = parser.parse_type_name().unwrap();
        assert!(parser.current.is_eof(), "trailing input in {sql:?}");
        parsed
    }

    #[test]
    fn test_builtin_names() {
        assert_eq!(type_name("int").system_name(), Some("int4"));
        assert_eq!(type_name("INTEGER").system_name(), Some("int4"));
        assert_eq!(type_name("smallint").system_name(), Some("int2"));
        assert_eq!(type_name("bigint").system_name(), Some("int8"));
        assert_eq!(type_name("real").system_name(), Some("float4"));
        assert_eq!(type_name("double precision").system_name(), Some("float8"));
        assert_eq!(type_name("boolean").system_name(), Some("bool"));
        assert_eq!(type_name("float").system_name(), Some("float8"));
        assert_eq!(type_name("float(24)").system_name(), Some("float4"));
        assert_eq!(type_name("float(25)").system_name(), Some("float8"));
    }

    #[test]
    fn test_float_precision_limits() {
        let err = Parser::new("float(0)").parse_type_name().unwrap_err();
        assert_eq!(err.message, "precision for type float must be at least 1 bit");
        let err = Parser::new("float(54)").parse_type_name().unwrap_err();
        assert_eq!(err.message, "precision for type float must be less than 54 bits");
    }

    #[test]
    fn test_character_types() {
        assert_eq!(type_name("varchar(20)").to_string(), "character varying(20)");
        assert_eq!(type_name("character varying").to_string(), "character varying");
        assert_eq!(type_name("char").to_string(), "character(1)");
        assert_eq!(type_name("national char(3)").to_string(), "character(3)");
        assert_eq!(type_name("bit varying(8)").to_string(), "bit varying(8)");
        assert_eq!(type_name("bit").to_string(), "bit(1)");
    }

    #[test]
    fn test_datetime_types() {
        assert_eq!(
            type_name("timestamp(3) with time zone").to_string(),
            "timestamp(3) with time zone"
        );
        assert_eq!(type_name("timestamp without time zone").system_name(), Some("timestamp"));
        assert_eq!(type_name("time with time zone").system_name(), Some("timetz"));
        assert_eq!(type_name("interval(2)").to_string(), "interval(2)");
    }

    #[test]
    fn test_interval_fields() {
        assert_eq!(type_name("interval").typmods, Vec::<Node>::new());
        assert_eq!(
            type_name("interval day").typmods,
            vec![Node::from(AConst::integer(interval::DAY))]
        );
        assert_eq!(type_name("INTERVAL YEAR TO MONTH").to_string(), "interval year to month");
        assert_eq!(type_name("interval hour to second").to_string(), "interval hour to second");
        assert_eq!(type_name("interval second(3)").to_string(), "interval second(3)");
        assert_eq!(
            type_name("interval day to second(6)").to_string(),
            "interval day to second(6)"
        );
        let precision = type_name("interval(4)");
        assert_eq!(
            precision.typmods,
            vec![
                Node::from(AConst::integer(interval::FULL_RANGE)),
                Node::from(AConst::integer(4)),
            ]
        );
    }

    #[test]
    fn test_bad_interval_ranges() {
        for sql in ["interval month to day", "interval day to year", "interval hour to day"] {
            assert!(Parser::new(sql).parse_type_name().is_err(), "{sql}");
        }
        // SECOND ends the range
        let mut parser = Parser::new("interval second to minute");
        assert_eq!(parser.parse_type_name().unwrap().to_string(), "interval second");
        assert!(parser.check_keyword(Keyword::To));
    }

    #[test]
    fn test_generic_and_arrays() {
        assert_eq!(type_name("numeric(10, 2)").to_string(), "numeric(10, 2)");
        assert_eq!(type_name("public.my_type").to_string(), "public.my_type");
        assert_eq!(type_name("text[][3]").array_bounds, vec![-1, 3]);
        assert_eq!(type_name("int ARRAY").array_bounds, vec![-1]);
        assert_eq!(type_name("int ARRAY[4]").to_string(), "integer[4]");
        let setof = type_name("SETOF text");
        assert!(setof.setof);
        assert_eq!(setof.names, vec!["text".to_owned()]);
    }
}
