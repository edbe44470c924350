//! Expression parsing: the Pratt loop, primaries and function calls.

use std::iter;

use super::error::ParseError;
use super::parser::Parser;
use super::pratt::{infix_level, left_bp, prefix_binding_power, right_bp};
use crate::ast::{
    prec, AArrayExpr, AConst, AExpr, AExprKind, AIndices, AIndirection, BoolExpr, BoolExprType,
    BoolTestType, BooleanTest, CaseExpr, CaseWhen, CoalesceExpr, CollateClause, ColumnRef,
    ColumnRefField, FrameBound, FrameExclusion, FrameMode, FuncCall, Indirection, List,
    MinMaxExpr, MinMaxOp, NamedArgExpr, Node, NullTest, NullTestType, ParamRef, RowExpr,
    SelectStmt, SortBy, SortByDir, SortByNulls, SqlValueFunction, SqlValueFunctionOp, SubLink,
    SubLinkType, TypeCast, TypeName, Value, WindowDef, WindowFrame,
};
use crate::lexer::{Keyword, TokenKind};

/// What a parenthesized group in expression position turned out to be.
pub(super) enum ParenContent {
    Select(SelectStmt),
    Expr(Node),
}

impl Parser<'_> {
    /// Parses an expression.
    pub(super) fn parse_expr(&mut self) -> Result<Node, ParseError> {
        self.parse_expr_bp(0)
    }

    /// Parses an expression whose infix operators bind at least `min_bp`.
    pub(super) fn parse_expr_bp(&mut self, min_bp: u8) -> Result<Node, ParseError> {
        self.nested(|p| {
            let lhs = p.parse_prefix()?;
            p.parse_infix(lhs, min_bp)
        })
    }

    pub(super) fn parse_expr_list(&mut self) -> Result<Vec<Node>, ParseError> {
        self.parse_comma_list(Self::parse_expr)
    }

    fn parse_prefix(&mut self) -> Result<Node, ParseError> {
        let Some(bp) = prefix_binding_power(&self.current.kind) else {
            return self.parse_primary();
        };
        let op = self.current.kind.clone();
        self.advance();
        let operand = self.parse_expr_bp(bp)?;
        Ok(match op {
            TokenKind::Keyword(_) => BoolExpr::not(operand).into(),
            TokenKind::Minus => negate(operand),
            TokenKind::Op(name) => AExpr::prefix(name, operand).into(),
            _ => AExpr::prefix("+", operand).into(),
        })
    }

    /// Continues an expression whose left operand is already parsed.
    pub(super) fn parse_infix(&mut self, mut lhs: Node, min_bp: u8) -> Result<Node, ParseError> {
        while let Some(level) = infix_level(&self.current.kind) {
            if left_bp(level) < min_bp {
                break;
            }
            if self.check_keyword(Keyword::At) && !self.peek_keyword(Keyword::Time) {
                break;
            }
            lhs = self.parse_infix_op(lhs, level)?;
        }
        Ok(lhs)
    }

    fn parse_infix_op(&mut self, lhs: Node, level: u8) -> Result<Node, ParseError> {
        let op = self.current.kind.clone();
        self.advance();
        let rbp = right_bp(level);
        let node: Node = match op {
            TokenKind::Keyword(Keyword::Or) => {
                let rhs = self.parse_expr_bp(rbp)?;
                BoolExpr::combine(BoolExprType::Or, lhs, rhs).into()
            }
            TokenKind::Keyword(Keyword::And) => {
                let rhs = self.parse_expr_bp(rbp)?;
                BoolExpr::combine(BoolExprType::And, lhs, rhs).into()
            }
            TokenKind::Keyword(Keyword::Is) => self.parse_is(lhs)?,
            TokenKind::Keyword(Keyword::Isnull) => NullTest {
                arg: lhs,
                nulltesttype: NullTestType::IsNull,
            }
            .into(),
            TokenKind::Keyword(Keyword::Notnull) => NullTest {
                arg: lhs,
                nulltesttype: NullTestType::IsNotNull,
            }
            .into(),
            TokenKind::Keyword(Keyword::Between) => self.parse_between(lhs, false)?,
            TokenKind::Keyword(Keyword::In) => self.parse_in(lhs, false)?,
            TokenKind::Keyword(Keyword::Like) => self.parse_like(lhs, AExprKind::Like, false)?,
            TokenKind::Keyword(Keyword::Ilike) => self.parse_like(lhs, AExprKind::ILike, false)?,
            TokenKind::Keyword(Keyword::Similar) => {
                self.parse_like(lhs, AExprKind::Similar, false)?
            }
            TokenKind::NotLa => self.parse_negated_predicate(lhs)?,
            TokenKind::Keyword(Keyword::At) => {
                self.expect_keyword(Keyword::Time)?;
                self.expect_keyword(Keyword::Zone)?;
                let zone = self.parse_expr_bp(rbp)?;
                FuncCall::system("timezone", vec![zone, lhs]).into()
            }
            TokenKind::Keyword(Keyword::Collate) => CollateClause {
                arg: lhs,
                collname: self.parse_any_name()?,
            }
            .into(),
            TokenKind::Typecast => TypeCast {
                arg: lhs,
                type_name: self.parse_type_name()?,
            }
            .into(),
            other => {
                let name = other.operator().unwrap_or_default().to_owned();
                self.parse_binary(lhs, name, level)?
            }
        };
        Ok(node)
    }

    fn parse_binary(&mut self, lhs: Node, name: String, level: u8) -> Result<Node, ParseError> {
        let quantified = matches!(
            self.current.kind,
            TokenKind::Keyword(Keyword::Any | Keyword::Some | Keyword::All)
        ) && matches!(self.peek(), TokenKind::LeftParen);
        if !quantified {
            let rhs = self.parse_expr_bp(right_bp(level))?;
            return Ok(AExpr::op(name, lhs, rhs).into());
        }
        let all = self.check_keyword(Keyword::All);
        self.advance();
        self.expect(&TokenKind::LeftParen)?;
        let node: Node = if self.starts_select() {
            let link_type = if all { SubLinkType::All } else { SubLinkType::Any };
            SubLink {
                testexpr: Some(lhs),
                oper_name: Some(name),
                ..SubLink::new(link_type, self.parse_select_stmt()?)
            }
            .into()
        } else {
            let kind = if all { AExprKind::OpAll } else { AExprKind::OpAny };
            let rhs = self.parse_expr()?;
            AExpr::new(kind, name, Some(lhs), Some(rhs)).into()
        };
        self.expect(&TokenKind::RightParen)?;
        Ok(node)
    }

    fn parse_is(&mut self, arg: Node) -> Result<Node, ParseError> {
        let negated = self.consume_keyword(Keyword::Not);
        let keyword = self.current.as_keyword();
        let node: Node = match keyword {
            Some(Keyword::Null) => {
                self.advance();
                let nulltesttype = if negated {
                    NullTestType::IsNotNull
                } else {
                    NullTestType::IsNull
                };
                NullTest { arg, nulltesttype }.into()
            }
            Some(kw @ (Keyword::True | Keyword::False | Keyword::Unknown)) => {
                self.advance();
                let booltesttype = match (kw, negated) {
                    (Keyword::True, false) => BoolTestType::IsTrue,
                    (Keyword::True, true) => BoolTestType::IsNotTrue,
                    (Keyword::False, false) => BoolTestType::IsFalse,
                    (Keyword::False, true) => BoolTestType::IsNotFalse,
                    (_, false) => BoolTestType::IsUnknown,
                    (_, true) => BoolTestType::IsNotUnknown,
                };
                BooleanTest { arg, booltesttype }.into()
            }
            Some(Keyword::Distinct) => {
                self.advance();
                self.expect_keyword(Keyword::From)?;
                let rhs = self.parse_expr_bp(right_bp(prec::IS))?;
                let kind = if negated {
                    AExprKind::NotDistinct
                } else {
                    AExprKind::Distinct
                };
                AExpr::new(kind, "=", Some(arg), Some(rhs)).into()
            }
            _ => return Err(self.unexpected("NULL, TRUE, FALSE, UNKNOWN or DISTINCT")),
        };
        Ok(node)
    }

    fn parse_negated_predicate(&mut self, lhs: Node) -> Result<Node, ParseError> {
        let keyword = self.current.as_keyword();
        self.advance();
        match keyword {
            Some(Keyword::Between) => self.parse_between(lhs, true),
            Some(Keyword::In) => self.parse_in(lhs, true),
            Some(Keyword::Like) => self.parse_like(lhs, AExprKind::Like, true),
            Some(Keyword::Ilike) => self.parse_like(lhs, AExprKind::ILike, true),
            Some(Keyword::Similar) => self.parse_like(lhs, AExprKind::Similar, true),
            _ => Err(ParseError::syntax(&self.previous, "NOT")),
        }
    }

    fn parse_between(&mut self, arg: Node, negated: bool) -> Result<Node, ParseError> {
        let symmetric = self.consume_keyword(Keyword::Symmetric);
        if !symmetric {
            self.consume_keyword(Keyword::Asymmetric);
        }
        let bp = right_bp(prec::LIKE);
        let low = self.parse_expr_bp(bp)?;
        self.expect_keyword(Keyword::And)?;
        let high = self.parse_expr_bp(bp)?;
        let (kind, name) = match (negated, symmetric) {
            (false, false) => (AExprKind::Between, "BETWEEN"),
            (true, false) => (AExprKind::NotBetween, "NOT BETWEEN"),
            (false, true) => (AExprKind::BetweenSym, "BETWEEN SYMMETRIC"),
            (true, true) => (AExprKind::NotBetweenSym, "NOT BETWEEN SYMMETRIC"),
        };
        let bounds = List {
            items: vec![low, high],
        };
        Ok(AExpr::new(kind, name, Some(arg), Some(bounds.into())).into())
    }

    fn parse_in(&mut self, arg: Node, negated: bool) -> Result<Node, ParseError> {
        self.expect(&TokenKind::LeftParen)?;
        if self.starts_select() {
            let subselect = self.parse_select_stmt()?;
            self.expect(&TokenKind::RightParen)?;
            let link: Node = SubLink {
                testexpr: Some(arg),
                ..SubLink::new(SubLinkType::Any, subselect)
            }
            .into();
            return Ok(if negated {
                BoolExpr::not(link).into()
            } else {
                link
            });
        }
        let items = self.parse_expr_list()?;
        self.expect(&TokenKind::RightParen)?;
        let name = if negated { "<>" } else { "=" };
        Ok(AExpr::new(AExprKind::In, name, Some(arg), Some(List { items }.into())).into())
    }

    fn parse_like(&mut self, arg: Node, kind: AExprKind, negated: bool) -> Result<Node, ParseError> {
        if kind == AExprKind::Similar {
            self.expect_keyword(Keyword::To)?;
        }
        let bp = right_bp(prec::LIKE);
        let pattern = self.parse_expr_bp(bp)?;
        let escape = if self.consume_keyword(Keyword::Escape) {
            Some(self.parse_expr_bp(bp)?)
        } else {
            None
        };
        let (name, escape_func) = match (kind, negated) {
            (AExprKind::Like, false) => ("~~", "like_escape"),
            (AExprKind::Like, true) => ("!~~", "like_escape"),
            (AExprKind::ILike, false) => ("~~*", "like_escape"),
            (AExprKind::ILike, true) => ("!~~*", "like_escape"),
            (_, false) => ("~", "similar_to_escape"),
            (_, true) => ("!~", "similar_to_escape"),
        };
        let pattern = match escape {
            Some(escape) => FuncCall::system(escape_func, vec![pattern, escape]).into(),
            None if kind == AExprKind::Similar => FuncCall::system(escape_func, vec![pattern]).into(),
            None => pattern,
        };
        Ok(AExpr::new(kind, name, Some(arg), Some(pattern)).into())
    }

    fn parse_primary(&mut self) -> Result<Node, ParseError> {
        let value = match &self.current.kind {
            TokenKind::IConst(i) => Value::Integer(*i),
            TokenKind::FConst(s) => Value::Float(s.clone()),
            TokenKind::SConst(s) => Value::String(s.clone()),
            TokenKind::BConst(s) => Value::BitString(format!("b{s}")),
            TokenKind::XConst(s) => Value::BitString(format!("x{s}")),
            TokenKind::Param(number) => {
                let number = *number;
                self.advance();
                return self.parse_indirection(ParamRef { number }.into());
            }
            TokenKind::LeftParen => return self.parse_paren_expr(),
            TokenKind::Ident(_) => return self.parse_name_expr(),
            TokenKind::Keyword(kw) => return self.parse_keyword_expr(*kw),
            _ => return Err(self.unexpected("expression")),
        };
        self.advance();
        Ok(AConst::new(value).into())
    }

    fn parse_keyword_expr(&mut self, kw: Keyword) -> Result<Node, ParseError> {
        if let Some(op) = sql_value_function(kw) {
            self.advance();
            let typmod = if op.takes_precision() && self.consume(&TokenKind::LeftParen) {
                let precision = self.parse_iconst()?;
                self.expect(&TokenKind::RightParen)?;
                Some(precision)
            } else {
                None
            };
            return Ok(SqlValueFunction { op, typmod }.into());
        }
        if self.at_typed_literal(kw) {
            let type_name = self.parse_simple_type_name()?;
            return self.parse_typed_literal(type_name);
        }
        let next_is_paren = matches!(self.peek(), TokenKind::LeftParen);
        match kw {
            Keyword::True | Keyword::False => {
                self.advance();
                Ok(AConst::new(Value::Boolean(kw == Keyword::True)).into())
            }
            Keyword::Null => {
                self.advance();
                Ok(AConst::null().into())
            }
            Keyword::Case => self.parse_case(),
            Keyword::Cast => self.parse_cast(),
            Keyword::Exists => {
                self.advance();
                self.expect(&TokenKind::LeftParen)?;
                let subselect = self.parse_select_stmt()?;
                self.expect(&TokenKind::RightParen)?;
                Ok(SubLink::new(SubLinkType::Exists, subselect).into())
            }
            Keyword::Array => self.parse_array(),
            Keyword::Row if next_is_paren => {
                self.advance();
                self.expect(&TokenKind::LeftParen)?;
                let args = if self.check(&TokenKind::RightParen) {
                    Vec::new()
                } else {
                    self.parse_expr_list()?
                };
                self.expect(&TokenKind::RightParen)?;
                self.parse_indirection(RowExpr { args, explicit: true }.into())
            }
            Keyword::Coalesce
            | Keyword::Greatest
            | Keyword::Least
            | Keyword::Nullif
            | Keyword::Extract
            | Keyword::Position
            | Keyword::Substring
            | Keyword::Trim
                if next_is_paren =>
            {
                self.parse_special_function(kw)
            }
            _ if kw.is_col_id() || (kw.is_type_func_name() && next_is_paren) => {
                self.parse_name_expr()
            }
            _ => Err(self.unexpected("expression")),
        }
    }

    /// Parses `name`, `a.b.c`, `t.*`, `f(...)` or `typename 'literal'`.
    fn parse_name_expr(&mut self) -> Result<Node, ParseError> {
        let first = match &self.current.kind {
            TokenKind::Ident(name) => name.clone(),
            TokenKind::Keyword(kw) => kw.as_str().to_owned(),
            _ => return Err(self.unexpected("identifier")),
        };
        self.advance();
        let mut names = vec![first];
        while self.consume(&TokenKind::Dot) {
            if self.consume(&TokenKind::Star) {
                let fields = names
                    .into_iter()
                    .map(ColumnRefField::Name)
                    .chain(iter::once(ColumnRefField::Star))
                    .collect();
                return Ok(ColumnRef { fields }.into());
            }
            names.push(self.parse_col_label()?);
        }
        if self.check(&TokenKind::LeftParen) {
            return Ok(self.parse_func_call(names)?.into());
        }
        if matches!(self.current.kind, TokenKind::SConst(_)) {
            return self.parse_typed_literal(TypeName::new(names));
        }
        self.parse_indirection(ColumnRef::new(names).into())
    }

    /// Returns true if `kw` starts a built-in type written before a literal,
    /// as in `timestamp with time zone '...'`.
    fn at_typed_literal(&mut self, kw: Keyword) -> bool {
        match kw {
            Keyword::Double => self.peek_keyword(Keyword::Precision),
            Keyword::Int
            | Keyword::Integer
            | Keyword::Smallint
            | Keyword::Bigint
            | Keyword::Real
            | Keyword::Float
            | Keyword::Dec
            | Keyword::Decimal
            | Keyword::Numeric
            | Keyword::Boolean
            | Keyword::Bit
            | Keyword::Char
            | Keyword::Character
            | Keyword::Nchar
            | Keyword::National
            | Keyword::Varchar
            | Keyword::Timestamp
            | Keyword::Time
            | Keyword::Interval => matches!(
                self.peek(),
                TokenKind::SConst(_)
                    | TokenKind::LeftParen
                    | TokenKind::WithLa
                    | TokenKind::WithoutLa
                    | TokenKind::Keyword(Keyword::Varying | Keyword::Char | Keyword::Character)
            ),
            _ => false,
        }
    }

    /// Parses the string of `type 'literal'`. An `interval` literal without
    /// a precision may be followed by its field range.
    fn parse_typed_literal(&mut self, mut type_name: TypeName) -> Result<Node, ParseError> {
        let TokenKind::SConst(text) = &self.current.kind else {
            return Err(self.unexpected("string constant"));
        };
        let arg = AConst::string(text.clone()).into();
        self.advance();
        if type_name.system_name() == Some("interval") && type_name.typmods.is_empty() {
            type_name.typmods = self.parse_opt_interval()?;
        }
        Ok(TypeCast { arg, type_name }.into())
    }

    fn parse_paren_expr(&mut self) -> Result<Node, ParseError> {
        let node: Node = match self.parse_paren_content()? {
            ParenContent::Select(subselect) => SubLink::new(SubLinkType::Expr, subselect).into(),
            ParenContent::Expr(expr) => expr,
        };
        self.parse_indirection(node)
    }

    /// Parses a parenthesized group that may hold a subquery, a scalar
    /// expression or an implicit row.
    pub(super) fn parse_paren_content(&mut self) -> Result<ParenContent, ParseError> {
        self.nested(Self::parse_paren_content_inner)
    }

    fn parse_paren_content_inner(&mut self) -> Result<ParenContent, ParseError> {
        self.expect(&TokenKind::LeftParen)?;
        if self.starts_select() {
            let select = self.parse_select_stmt()?;
            self.expect(&TokenKind::RightParen)?;
            return Ok(ParenContent::Select(select));
        }
        let first = if self.check(&TokenKind::LeftParen) {
            let lhs = match self.parse_paren_content()? {
                ParenContent::Select(select) if self.continues_select() => {
                    let select = self.parse_select_continuation(select)?;
                    self.expect(&TokenKind::RightParen)?;
                    return Ok(ParenContent::Select(select));
                }
                ParenContent::Select(select) if self.check(&TokenKind::RightParen) => {
                    self.advance();
                    return Ok(ParenContent::Select(select));
                }
                ParenContent::Select(select) => SubLink::new(SubLinkType::Expr, select).into(),
                ParenContent::Expr(expr) => expr,
            };
            let lhs = self.parse_indirection(lhs)?;
            self.parse_infix(lhs, 0)?
        } else {
            self.parse_expr()?
        };
        if self.check(&TokenKind::Comma) {
            let mut args = vec![first];
            while self.consume(&TokenKind::Comma) {
                args.push(self.parse_expr()?);
            }
            self.expect(&TokenKind::RightParen)?;
            return Ok(ParenContent::Expr(
                RowExpr {
                    args,
                    explicit: false,
                }
                .into(),
            ));
        }
        self.expect(&TokenKind::RightParen)?;
        Ok(ParenContent::Expr(first))
    }

    /// Parses subscripts and field selections after `arg`.
    pub(super) fn parse_indirection(&mut self, arg: Node) -> Result<Node, ParseError> {
        let mut indirection = Vec::new();
        loop {
            if self.consume(&TokenKind::LeftBracket) {
                indirection.push(Indirection::Index(self.parse_subscript()?));
            } else if self.consume(&TokenKind::Dot) {
                if self.consume(&TokenKind::Star) {
                    indirection.push(Indirection::Star);
                } else {
                    indirection.push(Indirection::Field(self.parse_col_label()?));
                }
            } else {
                break;
            }
        }
        if indirection.is_empty() {
            Ok(arg)
        } else {
            Ok(AIndirection { arg, indirection }.into())
        }
    }

    fn parse_subscript(&mut self) -> Result<AIndices, ParseError> {
        let lower = if self.check(&TokenKind::Colon) {
            None
        } else {
            Some(self.parse_expr()?)
        };
        let indices = if self.consume(&TokenKind::Colon) {
            let uidx = if self.check(&TokenKind::RightBracket) {
                None
            } else {
                Some(self.parse_expr()?)
            };
            AIndices {
                is_slice: true,
                lidx: lower,
                uidx,
            }
        } else {
            AIndices {
                is_slice: false,
                lidx: None,
                uidx: lower,
            }
        };
        self.expect(&TokenKind::RightBracket)?;
        Ok(indices)
    }

    fn parse_case(&mut self) -> Result<Node, ParseError> {
        self.expect_keyword(Keyword::Case)?;
        let arg = if self.check_keyword(Keyword::When) {
            None
        } else {
            Some(self.parse_expr()?)
        };
        let mut args = Vec::new();
        while self.consume_keyword(Keyword::When) {
            let expr = self.parse_expr()?;
            self.expect_keyword(Keyword::Then)?;
            let result = self.parse_expr()?;
            args.push(CaseWhen { expr, result });
        }
        if args.is_empty() {
            return Err(self.unexpected("WHEN"));
        }
        let defresult = if self.consume_keyword(Keyword::Else) {
            Some(self.parse_expr()?)
        } else {
            None
        };
        self.expect_keyword(Keyword::End)?;
        Ok(CaseExpr {
            arg,
            args,
            defresult,
        }
        .into())
    }

    fn parse_cast(&mut self) -> Result<Node, ParseError> {
        self.expect_keyword(Keyword::Cast)?;
        self.expect(&TokenKind::LeftParen)?;
        let arg = self.parse_expr()?;
        self.expect_keyword(Keyword::As)?;
        let type_name = self.parse_type_name()?;
        self.expect(&TokenKind::RightParen)?;
        Ok(TypeCast { arg, type_name }.into())
    }

    fn parse_array(&mut self) -> Result<Node, ParseError> {
        self.expect_keyword(Keyword::Array)?;
        let node: Node = if self.consume(&TokenKind::LeftParen) {
            let subselect = self.parse_select_stmt()?;
            self.expect(&TokenKind::RightParen)?;
            SubLink::new(SubLinkType::Array, subselect).into()
        } else {
            self.parse_array_elements()?.into()
        };
        self.parse_indirection(node)
    }

    fn parse_array_elements(&mut self) -> Result<AArrayExpr, ParseError> {
        self.expect(&TokenKind::LeftBracket)?;
        let elements = if self.check(&TokenKind::RightBracket) {
            Vec::new()
        } else {
            self.parse_comma_list(|p| {
                if p.check(&TokenKind::LeftBracket) {
                    Ok(Node::from(p.nested(Self::parse_array_elements)?))
                } else {
                    p.parse_expr()
                }
            })?
        };
        self.expect(&TokenKind::RightBracket)?;
        Ok(AArrayExpr { elements })
    }

    /// Functions with dedicated syntax or node types.
    fn parse_special_function(&mut self, kw: Keyword) -> Result<Node, ParseError> {
        self.advance();
        self.expect(&TokenKind::LeftParen)?;
        let node: Node = match kw {
            Keyword::Coalesce => CoalesceExpr {
                args: self.parse_expr_list()?,
            }
            .into(),
            Keyword::Greatest | Keyword::Least => {
                let op = if kw == Keyword::Greatest {
                    MinMaxOp::Greatest
                } else {
                    MinMaxOp::Least
                };
                MinMaxExpr {
                    op,
                    args: self.parse_expr_list()?,
                }
                .into()
            }
            Keyword::Nullif => {
                let lhs = self.parse_expr()?;
                self.expect(&TokenKind::Comma)?;
                let rhs = self.parse_expr()?;
                AExpr::new(AExprKind::NullIf, "=", Some(lhs), Some(rhs)).into()
            }
            Keyword::Extract => {
                let field = self.parse_extract_field()?;
                self.expect_keyword(Keyword::From)?;
                let source = self.parse_expr()?;
                FuncCall::system("extract", vec![AConst::string(field).into(), source]).into()
            }
            Keyword::Position => {
                let bp = right_bp(prec::LIKE);
                let needle = self.parse_expr_bp(bp)?;
                self.expect_keyword(Keyword::In)?;
                let haystack = self.parse_expr_bp(bp)?;
                FuncCall::system("position", vec![haystack, needle]).into()
            }
            Keyword::Substring => FuncCall::system("substring", self.parse_substring_args()?).into(),
            _ => self.parse_trim()?,
        };
        self.expect(&TokenKind::RightParen)?;
        Ok(node)
    }

    fn parse_extract_field(&mut self) -> Result<String, ParseError> {
        let field = match &self.current.kind {
            TokenKind::Ident(s) | TokenKind::SConst(s) => s.clone(),
            TokenKind::Keyword(kw) => kw.as_str().to_owned(),
            _ => return Err(self.unexpected("field name")),
        };
        self.advance();
        Ok(field)
    }

    fn parse_substring_args(&mut self) -> Result<Vec<Node>, ParseError> {
        let source = self.parse_expr()?;
        if self.consume_keyword(Keyword::From) {
            let mut args = vec![source, self.parse_expr()?];
            if self.consume_keyword(Keyword::For) {
                args.push(self.parse_expr()?);
            }
            return Ok(args);
        }
        if self.consume_keyword(Keyword::For) {
            let count = self.parse_expr()?;
            let start = if self.consume_keyword(Keyword::From) {
                self.parse_expr()?
            } else {
                AConst::integer(1).into()
            };
            return Ok(vec![source, start, count]);
        }
        let mut args = vec![source];
        while self.consume(&TokenKind::Comma) {
            args.push(self.parse_expr()?);
        }
        Ok(args)
    }

    /// `TRIM([BOTH | LEADING | TRAILING] [chars] FROM source)`.
    fn parse_trim(&mut self) -> Result<Node, ParseError> {
        let name = if self.consume_keyword(Keyword::Leading) {
            "ltrim"
        } else if self.consume_keyword(Keyword::Trailing) {
            "rtrim"
        } else {
            self.consume_keyword(Keyword::Both);
            "btrim"
        };
        let args = if self.consume_keyword(Keyword::From) {
            self.parse_expr_list()?
        } else {
            let first = self.parse_expr()?;
            if self.consume_keyword(Keyword::From) {
                let mut args = self.parse_expr_list()?;
                args.push(first);
                args
            } else {
                let mut args = vec![first];
                while self.consume(&TokenKind::Comma) {
                    args.push(self.parse_expr()?);
                }
                args
            }
        };
        Ok(FuncCall::system(name, args).into())
    }

    /// Parses `(args) [FILTER (WHERE ...)] [OVER ...]` after a function name.
    pub(super) fn parse_func_call(&mut self, funcname: Vec<String>) -> Result<FuncCall, ParseError> {
        self.expect(&TokenKind::LeftParen)?;
        let mut call = FuncCall::new(funcname, Vec::new());
        if self.consume(&TokenKind::Star) {
            call.agg_star = true;
        } else if !self.check(&TokenKind::RightParen) {
            if self.consume_keyword(Keyword::Distinct) {
                call.agg_distinct = true;
            } else {
                self.consume_keyword(Keyword::All);
            }
            call.args = self.parse_comma_list(Self::parse_func_arg)?;
            if self.consume_keyword(Keyword::Order) {
                self.expect_keyword(Keyword::By)?;
                call.agg_order = self.parse_sort_list()?;
            }
        }
        self.expect(&TokenKind::RightParen)?;
        if self.check_keyword(Keyword::Filter) && matches!(self.peek(), TokenKind::LeftParen) {
            self.advance();
            self.advance();
            self.expect_keyword(Keyword::Where)?;
            call.agg_filter = Some(self.parse_expr()?);
            self.expect(&TokenKind::RightParen)?;
        }
        if self.consume_keyword(Keyword::Over) {
            call.over = Some(if self.check(&TokenKind::LeftParen) {
                self.parse_window_spec()?
            } else {
                WindowDef {
                    name: Some(self.parse_col_id()?),
                    ..WindowDef::default()
                }
            });
        }
        Ok(call)
    }

    fn parse_func_arg(&mut self) -> Result<Node, ParseError> {
        if matches!(self.peek(), TokenKind::EqualsGreater | TokenKind::ColonEquals) {
            let name = self.parse_type_function_name()?;
            self.advance();
            let arg = self.parse_expr()?;
            return Ok(NamedArgExpr { name, arg }.into());
        }
        self.parse_expr()
    }

    /// Parses `([refname] [PARTITION BY ...] [ORDER BY ...] [frame])`.
    pub(super) fn parse_window_spec(&mut self) -> Result<WindowDef, ParseError> {
        self.expect(&TokenKind::LeftParen)?;
        let mut window = WindowDef::default();
        let starts_clause = matches!(
            self.current.kind,
            TokenKind::Keyword(
                Keyword::Partition | Keyword::Order | Keyword::Rows | Keyword::Range | Keyword::Groups
            )
        );
        if self.at_col_id() && !starts_clause {
            window.refname = Some(self.parse_col_id()?);
        }
        if self.consume_keyword(Keyword::Partition) {
            self.expect_keyword(Keyword::By)?;
            window.partition_clause = self.parse_expr_list()?;
        }
        if self.consume_keyword(Keyword::Order) {
            self.expect_keyword(Keyword::By)?;
            window.order_clause = self.parse_sort_list()?;
        }
        window.frame = self.parse_opt_frame()?;
        self.expect(&TokenKind::RightParen)?;
        Ok(window)
    }

    fn parse_opt_frame(&mut self) -> Result<Option<WindowFrame>, ParseError> {
        let mode = match self.current.as_keyword() {
            Some(Keyword::Rows) => FrameMode::Rows,
            Some(Keyword::Range) => FrameMode::Range,
            Some(Keyword::Groups) => FrameMode::Groups,
            _ => return Ok(None),
        };
        self.advance();
        let (start, end) = if self.consume_keyword(Keyword::Between) {
            let start = self.parse_frame_bound()?;
            self.expect_keyword(Keyword::And)?;
            (start, Some(self.parse_frame_bound()?))
        } else {
            (self.parse_frame_bound()?, None)
        };
        let exclusion = if self.consume_keyword(Keyword::Exclude) {
            let exclusion = match self.current.as_keyword() {
                Some(Keyword::Current) => {
                    self.advance();
                    self.expect_keyword(Keyword::Row)?;
                    FrameExclusion::CurrentRow
                }
                Some(Keyword::Group) => {
                    self.advance();
                    FrameExclusion::Group
                }
                Some(Keyword::Ties) => {
                    self.advance();
                    FrameExclusion::Ties
                }
                Some(Keyword::No) => {
                    self.advance();
                    self.expect_keyword(Keyword::Others)?;
                    FrameExclusion::NoOthers
                }
                _ => return Err(self.unexpected("CURRENT ROW, GROUP, TIES or NO OTHERS")),
            };
            Some(exclusion)
        } else {
            None
        };
        Ok(Some(WindowFrame {
            mode,
            start,
            end,
            exclusion,
        }))
    }

    fn parse_frame_bound(&mut self) -> Result<FrameBound, ParseError> {
        if self.consume_keyword(Keyword::Unbounded) {
            if self.consume_keyword(Keyword::Preceding) {
                return Ok(FrameBound::UnboundedPreceding);
            }
            self.expect_keyword(Keyword::Following)?;
            return Ok(FrameBound::UnboundedFollowing);
        }
        if self.check_keyword(Keyword::Current) && self.peek_keyword(Keyword::Row) {
            self.advance();
            self.advance();
            return Ok(FrameBound::CurrentRow);
        }
        let offset = self.parse_expr()?;
        if self.consume_keyword(Keyword::Preceding) {
            return Ok(FrameBound::Preceding(offset));
        }
        self.expect_keyword(Keyword::Following)?;
        Ok(FrameBound::Following(offset))
    }

    pub(super) fn parse_sort_list(&mut self) -> Result<Vec<SortBy>, ParseError> {
        self.parse_comma_list(Self::parse_sort_by)
    }

    fn parse_sort_by(&mut self) -> Result<SortBy, ParseError> {
        let node = self.parse_expr()?;
        let sortby_dir = if self.consume_keyword(Keyword::Asc) {
            SortByDir::Asc
        } else if self.consume_keyword(Keyword::Desc) {
            SortByDir::Desc
        } else if self.consume_keyword(Keyword::Using) {
            let op = self
                .current
                .kind
                .operator()
                .map(str::to_owned)
                .ok_or_else(|| self.unexpected("operator"))?;
            self.advance();
            SortByDir::Using(op)
        } else {
            SortByDir::Default
        };
        let sortby_nulls = self.parse_opt_nulls_order()?;
        Ok(SortBy {
            node,
            sortby_dir,
            sortby_nulls,
        })
    }

    pub(super) fn parse_opt_nulls_order(&mut self) -> Result<SortByNulls, ParseError> {
        if !self.consume(&TokenKind::NullsLa) {
            return Ok(SortByNulls::Default);
        }
        if self.consume_keyword(Keyword::First) {
            return Ok(SortByNulls::First);
        }
        self.expect_keyword(Keyword::Last)?;
        Ok(SortByNulls::Last)
    }

    pub(super) fn parse_iconst(&mut self) -> Result<i32, ParseError> {
        if let TokenKind::IConst(value) = self.current.kind {
            self.advance();
            Ok(value)
        } else {
            Err(self.unexpected("integer"))
        }
    }
}

/// Applies unary minus, folding it into numeric constants.
fn negate(operand: Node) -> Node {
    if let Node::AConst(constant) = &operand {
        match constant.val.negated() {
            Some(Value::Float(text)) => {
                // -2147483648 scans as a float but fits an integer once negated
                let val = text
                    .parse::<i32>()
                    .map_or(Value::Float(text), Value::Integer);
                return AConst::new(val).into();
            }
            Some(val) => return AConst::new(val).into(),
            None => {}
        }
    }
    AExpr::prefix("-", operand).into()
}

const fn sql_value_function(kw: Keyword) -> Option<SqlValueFunctionOp> {
    let op = match kw {
        Keyword::CurrentDate => SqlValueFunctionOp::CurrentDate,
        Keyword::CurrentTime => SqlValueFunctionOp::CurrentTime,
        Keyword::CurrentTimestamp => SqlValueFunctionOp::CurrentTimestamp,
        Keyword::Localtime => SqlValueFunctionOp::LocalTime,
        Keyword::Localtimestamp => SqlValueFunctionOp::LocalTimestamp,
        Keyword::CurrentRole => SqlValueFunctionOp::CurrentRole,
        Keyword::CurrentUser => SqlValueFunctionOp::CurrentUser,
        Keyword::User => SqlValueFunctionOp::User,
        Keyword::SessionUser => SqlValueFunctionOp::SessionUser,
        Keyword::SystemUser => SqlValueFunctionOp::SystemUser,
        Keyword::CurrentCatalog => SqlValueFunctionOp::CurrentCatalog,
        Keyword::CurrentSchema => SqlValueFunctionOp::CurrentSchema,
        _ => return None,
    };
    Some(op)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{AstNode, NodeTag};

    fn expr(sql: &str) -> Node {
        let mut parser = Parser::new(sql);
        let node = parser.parse_expr().unwrap();
        assert!(parser.current.is_eof(), "trailing input in {sql:?}");
        node
    }

    fn render(sql: &str) -> String {
        expr(sql).to_string()
    }

    #[test]
    fn test_arithmetic_precedence() {
        let Node::AExpr(sum) = expr("1 + 2 * 3") else {
            panic!("expected operator expression");
        };
        assert_eq!(sum.name, "+");
        assert!(matches!(&sum.rexpr, Some(Node::AExpr(product)) if product.name == "*"));
        assert_eq!(render("(1 + 2) * 3"), "(1 + 2) * 3");
        assert_eq!(render("1 - (2 - 3)"), "1 - (2 - 3)");
        assert_eq!(render("(1 - 2) - 3"), "1 - 2 - 3");
        assert_eq!(render("2 ^ 3 ^ 2"), "2 ^ 3 ^ 2");
    }

    #[test]
    fn test_negative_constants_fold() {
        assert_eq!(expr("-5"), AConst::integer(-5).into());
        assert_eq!(expr("- 1.5"), AConst::new(Value::Float("-1.5".into())).into());
        assert_eq!(expr("-2147483648"), AConst::integer(i32::MIN).into());
        assert_eq!(render("-a"), "-a");
        assert_eq!(render("- -1"), "1");
    }

    #[test]
    fn test_boolean_connectives() {
        let Node::BoolExpr(or) = expr("a OR b OR c AND d") else {
            panic!("expected OR");
        };
        assert_eq!(or.boolop, BoolExprType::Or);
        assert_eq!(or.args.len(), 3);
        assert_eq!(render("NOT a = b"), "NOT a = b");
        assert_eq!(render("(a OR b) AND c"), "(a OR b) AND c");
        assert_eq!(render("NOT a IS NULL"), "NOT a IS NULL");
    }

    #[test]
    fn test_is_predicates() {
        assert_eq!(render("a IS NOT NULL"), "a IS NOT NULL");
        assert_eq!(render("a ISNULL"), "a IS NULL");
        assert_eq!(render("a IS NOT TRUE"), "a IS NOT TRUE");
        assert_eq!(render("a IS UNKNOWN"), "a IS UNKNOWN");
        assert_eq!(render("a IS NOT DISTINCT FROM b"), "a IS NOT DISTINCT FROM b");
    }

    #[test]
    fn test_pattern_matching() {
        let Node::AExpr(like) = expr("x NOT LIKE 'a%'") else {
            panic!("expected LIKE");
        };
        assert_eq!(like.kind, AExprKind::Like);
        assert_eq!(like.name, "!~~");
        assert_eq!(render("x ILIKE 'a%' ESCAPE '!'"), "x ILIKE 'a%' ESCAPE '!'");
        assert_eq!(render("x SIMILAR TO 'a|b'"), "x SIMILAR TO 'a|b'");
        assert_eq!(render("x NOT SIMILAR TO 'a' ESCAPE '#'"), "x NOT SIMILAR TO 'a' ESCAPE '#'");
    }

    #[test]
    fn test_between_and_in() {
        let Node::BoolExpr(and) = expr("a BETWEEN 1 AND 2 AND b") else {
            panic!("expected AND");
        };
        assert_eq!(and.args.len(), 2);
        assert_eq!(render("a NOT BETWEEN SYMMETRIC 1 AND 2"), "a NOT BETWEEN SYMMETRIC 1 AND 2");
        let Node::AExpr(list) = expr("a NOT IN (1, 2)") else {
            panic!("expected IN");
        };
        assert_eq!((list.kind, list.name.as_str()), (AExprKind::In, "<>"));
        assert_eq!(render("a IN (SELECT b FROM t)"), "a IN (SELECT b FROM t)");
        assert_eq!(render("a NOT IN (SELECT b FROM t)"), "NOT a IN (SELECT b FROM t)");
    }

    #[test]
    fn test_quantified_comparisons() {
        assert_eq!(render("x = ANY (ARRAY[1, 2])"), "x = ANY (ARRAY[1, 2])");
        assert_eq!(render("x > ALL (SELECT y FROM t)"), "x > ALL (SELECT y FROM t)");
        let Node::SubLink(link) = expr("x < SOME (SELECT 1)") else {
            panic!("expected sublink");
        };
        assert_eq!(link.sub_link_type, SubLinkType::Any);
        assert_eq!(link.oper_name.as_deref(), Some("<"));
    }

    #[test]
    fn test_casts_and_collation() {
        assert_eq!(render("a::int[]"), "CAST(a AS integer[])");
        assert_eq!(render("CAST(a AS varchar(10))"), "CAST(a AS character varying(10))");
        assert_eq!(render("interval '1 day'"), "CAST('1 day' AS interval)");
        assert_eq!(render("date '2024-01-01'"), "CAST('2024-01-01' AS date)");
        assert_eq!(
            render("timestamp with time zone '2024-01-01'"),
            "CAST('2024-01-01' AS timestamp with time zone)"
        );
        assert_eq!(render("a COLLATE \"C\""), "a COLLATE \"C\"");
        assert_eq!(render("ts AT TIME ZONE 'UTC'"), "ts AT TIME ZONE 'UTC'");
    }

    #[test]
    fn test_column_references() {
        let Node::ColumnRef(star) = expr("t.*") else {
            panic!("expected column reference");
        };
        assert_eq!(star.fields.last(), Some(&ColumnRefField::Star));
        assert_eq!(render("s.t.\"Col\""), "s.t.\"Col\"");
        assert_eq!(render("a[1][2:3]"), "a[1][2:3]");
        assert_eq!(render("(a).b"), "a.b");
        assert_eq!(render("$1[2]"), "$1[2]");
        assert_eq!(expr("$3"), ParamRef { number: 3 }.into());
    }

    #[test]
    fn test_function_calls() {
        assert_eq!(
            render("count(*) FILTER (WHERE x > 1) OVER w"),
            "count(*) FILTER (WHERE x > 1) OVER w"
        );
        assert_eq!(
            render("sum(DISTINCT x ORDER BY y DESC)"),
            "sum(DISTINCT x ORDER BY y DESC)"
        );
        assert_eq!(
            render("rank() OVER (PARTITION BY a ORDER BY b NULLS LAST ROWS BETWEEN UNBOUNDED PRECEDING AND CURRENT ROW)"),
            "rank() OVER (PARTITION BY a ORDER BY b NULLS LAST ROWS BETWEEN UNBOUNDED PRECEDING AND CURRENT ROW)"
        );
        assert_eq!(render("f(a => 1, b := 2)"), "f(a => 1, b => 2)");
        assert_eq!(render("pg_catalog.now()"), "pg_catalog.now()");
    }

    #[test]
    fn test_special_functions() {
        assert_eq!(render("EXTRACT(year FROM d)"), "EXTRACT(year FROM d)");
        assert_eq!(render("COALESCE(a, b, 0)"), "COALESCE(a, b, 0)");
        assert_eq!(render("NULLIF(a, '')"), "NULLIF(a, '')");
        assert_eq!(render("GREATEST(1, 2)"), "GREATEST(1, 2)");
        let Node::FuncCall(position) = expr("POSITION('a' IN b)") else {
            panic!("expected call");
        };
        assert!(position.is_system("position"));
        assert_eq!(position.args[0], ColumnRef::new(vec!["b".into()]).into());
        let Node::FuncCall(trim) = expr("TRIM(LEADING 'x' FROM s)") else {
            panic!("expected call");
        };
        assert!(trim.is_system("ltrim"));
        assert_eq!(trim.args.len(), 2);
        let Node::FuncCall(substring) = expr("SUBSTRING(s FOR 2)") else {
            panic!("expected call");
        };
        assert_eq!(substring.args[1], AConst::integer(1).into());
    }

    #[test]
    fn test_constructors() {
        assert_eq!(render("CASE WHEN a THEN 1 ELSE 2 END"), "CASE WHEN a THEN 1 ELSE 2 END");
        assert_eq!(render("CASE x WHEN 1 THEN 'a' END"), "CASE x WHEN 1 THEN 'a' END");
        assert_eq!(render("ARRAY[[1, 2], [3]]"), "ARRAY[ARRAY[1, 2], ARRAY[3]]");
        assert_eq!(render("ROW(1, 2)"), "ROW(1, 2)");
        assert_eq!(render("(1, 'a')"), "(1, 'a')");
        assert_eq!(render("ROW()"), "ROW()");
        assert_eq!(render("EXISTS (SELECT 1)"), "EXISTS (SELECT 1)");
        assert_eq!(render("ARRAY(SELECT 1)"), "ARRAY(SELECT 1)");
        assert_eq!(expr("(SELECT 1)").tag(), NodeTag::SubLink);
        assert_eq!(render("CURRENT_TIMESTAMP(3)"), "CURRENT_TIMESTAMP(3)");
        assert_eq!(render("current_user"), "CURRENT_USER");
    }

    #[test]
    fn test_constants() {
        assert_eq!(render("'it''s'"), "'it''s'");
        assert_eq!(render("B'101'"), "B'101'");
        assert_eq!(render("X'1F'"), "X'1F'");
        assert_eq!(render("TRUE"), "TRUE");
        assert_eq!(render("NULL"), "NULL");
        assert_eq!(render("1.5e3"), "1.5e3");
    }

    #[test]
    fn test_nested_parentheses() {
        assert_eq!(render("((a + 1)) * 2"), "(a + 1) * 2");
        assert_eq!(render("((SELECT 1) UNION SELECT 2)"), "(SELECT 1 UNION SELECT 2)");
        assert_eq!(render("((SELECT 1)) + 1"), "(SELECT 1) + 1");
    }

    #[test]
    fn test_reserved_keyword_is_not_an_expression() {
        let err = Parser::new("FROM").parse_expr().unwrap_err();
        assert_eq!(err.message, "syntax error at or near \"FROM\"");
    }
}
