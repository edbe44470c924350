//! Expression AST types.

use std::fmt;

use super::format::{
    comma, left, operator_precedence, prec, quote_identifier, quote_literal, tight,
    Ident, QualifiedName, Wrapped,
};
use super::{AstNode, Children, Node, SelectStmt, SortBy, TypeName, Value};

/// One dotted component of a column reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColumnRefField {
    /// A name.
    Name(String),
    /// `*`, only allowed as the last component.
    Star,
}

/// A possibly qualified column reference such as `t.a` or `t.*`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnRef {
    /// The dotted components.
    pub fields: Vec<ColumnRefField>,
}

impl ColumnRef {
    /// Creates a reference from plain names.
    #[must_use]
    pub fn new(names: Vec<String>) -> Self {
        Self {
            fields: names.into_iter().map(ColumnRefField::Name).collect(),
        }
    }

    /// Creates the bare `*` reference.
    #[must_use]
    pub fn star() -> Self {
        Self {
            fields: vec![ColumnRefField::Star],
        }
    }

    /// Returns the name if the reference is one unqualified name.
    #[must_use]
    pub fn single_name(&self) -> Option<&str> {
        match self.fields.as_slice() {
            [ColumnRefField::Name(name)] => Some(name),
            _ => None,
        }
    }

    pub(super) fn child_nodes(&self) -> Vec<&dyn AstNode> {
        Vec::new()
    }
}

impl fmt::Display for ColumnRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, field) in self.fields.iter().enumerate() {
            if i > 0 {
                f.write_str(".")?;
            }
            match field {
                ColumnRefField::Name(name) => write!(f, "{}", Ident(name))?,
                ColumnRefField::Star => f.write_str("*")?,
            }
        }
        Ok(())
    }
}

/// A positional parameter, `$n`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParamRef {
    /// The parameter number.
    pub number: i32,
}

impl ParamRef {
    pub(super) fn child_nodes(&self) -> Vec<&dyn AstNode> {
        Vec::new()
    }
}

impl fmt::Display for ParamRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "${}", self.number)
    }
}

/// A constant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AConst {
    /// The value.
    pub val: Value,
}

impl AConst {
    /// Creates a constant holding `val`.
    #[must_use]
    pub const fn new(val: Value) -> Self {
        Self { val }
    }

    /// Integer constant.
    #[must_use]
    pub const fn integer(i: i32) -> Self {
        Self::new(Value::Integer(i))
    }

    /// String constant.
    #[must_use]
    pub fn string(s: impl Into<String>) -> Self {
        Self::new(Value::String(s.into()))
    }

    /// `NULL`.
    #[must_use]
    pub const fn null() -> Self {
        Self::new(Value::Null)
    }

    pub(super) fn child_nodes(&self) -> Vec<&dyn AstNode> {
        Children::new().node(&self.val).finish()
    }
}

impl fmt::Display for AConst {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.val)
    }
}

/// What an [`AExpr`] computes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AExprKind {
    /// Plain operator, binary or prefix.
    Op,
    /// `a op ANY (array)`.
    OpAny,
    /// `a op ALL (array)`.
    OpAll,
    /// `IS DISTINCT FROM`.
    Distinct,
    /// `IS NOT DISTINCT FROM`.
    NotDistinct,
    /// `NULLIF(a, b)`.
    NullIf,
    /// `IN (list)`; the name is `=` or `<>` for `NOT IN`.
    In,
    /// `LIKE`; the name is `~~` or `!~~`.
    Like,
    /// `ILIKE`; the name is `~~*` or `!~~*`.
    ILike,
    /// `SIMILAR TO`; the name is `~` or `!~`.
    Similar,
    /// `BETWEEN`.
    Between,
    /// `NOT BETWEEN`.
    NotBetween,
    /// `BETWEEN SYMMETRIC`.
    BetweenSym,
    /// `NOT BETWEEN SYMMETRIC`.
    NotBetweenSym,
}

/// An operator expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AExpr {
    /// Kind of expression.
    pub kind: AExprKind,
    /// Operator name.
    pub name: String,
    /// Left operand, absent for prefix operators.
    pub lexpr: Option<Node>,
    /// Right operand.
    pub rexpr: Option<Node>,
}

impl AExpr {
    /// Creates an expression of any kind.
    #[must_use]
    pub fn new(kind: AExprKind, name: impl Into<String>, lexpr: Option<Node>, rexpr: Option<Node>) -> Self {
        Self {
            kind,
            name: name.into(),
            lexpr,
            rexpr,
        }
    }

    /// Binary operator expression.
    #[must_use]
    pub fn op(name: impl Into<String>, lexpr: Node, rexpr: Node) -> Self {
        Self::new(AExprKind::Op, name, Some(lexpr), Some(rexpr))
    }

    /// Prefix operator expression.
    #[must_use]
    pub fn prefix(name: impl Into<String>, rexpr: Node) -> Self {
        Self::new(AExprKind::Op, name, None, Some(rexpr))
    }

    pub(super) fn child_nodes(&self) -> Vec<&dyn AstNode> {
        Children::new().opt(&self.lexpr).opt(&self.rexpr).finish()
    }

    fn negated(&self) -> bool {
        self.name.starts_with('!') || self.name == "<>"
    }

    fn fmt_binary(&self, f: &mut fmt::Formatter<'_>, l: &Node, r: &Node) -> fmt::Result {
        let level = operator_precedence(&self.name);
        let lhs = if level == prec::CMP { tight(l, level) } else { left(l, level) };
        write!(f, "{lhs} {} {}", self.name, tight(r, level))
    }

    fn fmt_pattern(f: &mut fmt::Formatter<'_>, pattern: &Node, escape_func: &str) -> fmt::Result {
        if let Node::FuncCall(call) = pattern {
            if call.is_system(escape_func) && call.func_format == FuncFormat::SqlSyntax {
                return match call.args.as_slice() {
                    [p] => write!(f, "{}", tight(p, prec::LIKE)),
                    [p, e] => write!(f, "{} ESCAPE {}", tight(p, prec::LIKE), tight(e, prec::LIKE)),
                    _ => write!(f, "{}", tight(pattern, prec::LIKE)),
                };
            }
        }
        write!(f, "{}", tight(pattern, prec::LIKE))
    }
}

impl fmt::Display for AExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let not = if self.negated() { "NOT " } else { "" };
        match (self.kind, &self.lexpr, &self.rexpr) {
            (AExprKind::Op, Some(l), Some(r)) => self.fmt_binary(f, l, r),
            (AExprKind::Op, None, Some(r)) => {
                if matches!(self.name.as_str(), "-" | "+") {
                    write!(f, "{}{}", self.name, tight(r, prec::UNARY))
                } else {
                    write!(f, "{} {}", self.name, tight(r, prec::OP))
                }
            }
            (AExprKind::OpAny | AExprKind::OpAll, Some(l), Some(r)) => {
                let level = operator_precedence(&self.name);
                let lhs = if level == prec::CMP { tight(l, level) } else { left(l, level) };
                let quantifier = if self.kind == AExprKind::OpAny { "ANY" } else { "ALL" };
                write!(f, "{lhs} {} {quantifier} ({r})", self.name)
            }
            (AExprKind::Distinct | AExprKind::NotDistinct, Some(l), Some(r)) => {
                let not = if self.kind == AExprKind::NotDistinct { "NOT " } else { "" };
                write!(
                    f,
                    "{} IS {not}DISTINCT FROM {}",
                    tight(l, prec::IS),
                    tight(r, prec::IS)
                )
            }
            (AExprKind::NullIf, Some(l), Some(r)) => write!(f, "NULLIF({l}, {r})"),
            (AExprKind::In, Some(l), Some(r)) => {
                write!(f, "{} {not}IN ({r})", tight(l, prec::LIKE))
            }
            (AExprKind::Like | AExprKind::ILike, Some(l), Some(r)) => {
                let op = if self.kind == AExprKind::Like { "LIKE" } else { "ILIKE" };
                write!(f, "{} {not}{op} ", tight(l, prec::LIKE))?;
                Self::fmt_pattern(f, r, "like_escape")
            }
            (AExprKind::Similar, Some(l), Some(r)) => {
                write!(f, "{} {not}SIMILAR TO ", tight(l, prec::LIKE))?;
                Self::fmt_pattern(f, r, "similar_to_escape")
            }
            (
                AExprKind::Between
                | AExprKind::NotBetween
                | AExprKind::BetweenSym
                | AExprKind::NotBetweenSym,
                Some(l),
                Some(Node::List(bounds)),
            ) if bounds.items.len() == 2 => {
                let not = if matches!(self.kind, AExprKind::NotBetween | AExprKind::NotBetweenSym) {
                    "NOT "
                } else {
                    ""
                };
                let symmetric = if matches!(self.kind, AExprKind::BetweenSym | AExprKind::NotBetweenSym) {
                    "SYMMETRIC "
                } else {
                    ""
                };
                write!(
                    f,
                    "{} {not}BETWEEN {symmetric}{} AND {}",
                    tight(l, prec::LIKE),
                    tight(&bounds.items[0], prec::LIKE),
                    tight(&bounds.items[1], prec::LIKE)
                )
            }
            (_, l, r) => {
                // Malformed trees still render something readable.
                if let Some(l) = l {
                    write!(f, "{l} ")?;
                }
                f.write_str(&self.name)?;
                if let Some(r) = r {
                    write!(f, " {r}")?;
                }
                Ok(())
            }
        }
    }
}

/// Boolean connective.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BoolExprType {
    And,
    Or,
    Not,
}

/// `AND`, `OR` or `NOT`. Chains of the same connective are kept flat.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoolExpr {
    /// The connective.
    pub boolop: BoolExprType,
    /// Operands, exactly one for `NOT`.
    pub args: Vec<Node>,
}

impl BoolExpr {
    /// Joins two operands, extending `lhs` when it already uses `boolop`.
    #[must_use]
    pub fn combine(boolop: BoolExprType, lhs: Node, rhs: Node) -> Self {
        match lhs {
            Node::BoolExpr(mut existing) if existing.boolop == boolop => {
                existing.args.push(rhs);
                *existing
            }
            lhs => Self {
                boolop,
                args: vec![lhs, rhs],
            },
        }
    }

    /// `NOT arg`.
    #[must_use]
    pub fn not(arg: Node) -> Self {
        Self {
            boolop: BoolExprType::Not,
            args: vec![arg],
        }
    }

    pub(super) fn child_nodes(&self) -> Vec<&dyn AstNode> {
        Children::new().list(&self.args).finish()
    }
}

impl fmt::Display for BoolExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (level, sep) = match self.boolop {
            BoolExprType::Not => {
                f.write_str("NOT")?;
                for arg in &self.args {
                    write!(f, " {}", tight(arg, prec::NOT))?;
                }
                return Ok(());
            }
            BoolExprType::And => (prec::AND, " AND "),
            BoolExprType::Or => (prec::OR, " OR "),
        };
        for (i, arg) in self.args.iter().enumerate() {
            if i == 0 {
                write!(f, "{}", left(arg, level))?;
            } else {
                write!(f, "{sep}{}", tight(arg, level))?;
            }
        }
        Ok(())
    }
}

/// `IS NULL` or `IS NOT NULL`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NullTestType {
    IsNull,
    IsNotNull,
}

/// A null test.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NullTest {
    /// Tested expression.
    pub arg: Node,
    /// Test kind.
    pub nulltesttype: NullTestType,
}

impl NullTest {
    pub(super) fn child_nodes(&self) -> Vec<&dyn AstNode> {
        Children::new().node(&self.arg).finish()
    }
}

impl fmt::Display for NullTest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let test = match self.nulltesttype {
            NullTestType::IsNull => "IS NULL",
            NullTestType::IsNotNull => "IS NOT NULL",
        };
        write!(f, "{} {test}", tight(&self.arg, prec::IS))
    }
}

/// Which truth value a [`BooleanTest`] checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BoolTestType {
    IsTrue,
    IsNotTrue,
    IsFalse,
    IsNotFalse,
    IsUnknown,
    IsNotUnknown,
}

/// `IS [NOT] TRUE | FALSE | UNKNOWN`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BooleanTest {
    /// Tested expression.
    pub arg: Node,
    /// Test kind.
    pub booltesttype: BoolTestType,
}

impl BooleanTest {
    pub(super) fn child_nodes(&self) -> Vec<&dyn AstNode> {
        Children::new().node(&self.arg).finish()
    }
}

impl fmt::Display for BooleanTest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let test = match self.booltesttype {
            BoolTestType::IsTrue => "IS TRUE",
            BoolTestType::IsNotTrue => "IS NOT TRUE",
            BoolTestType::IsFalse => "IS FALSE",
            BoolTestType::IsNotFalse => "IS NOT FALSE",
            BoolTestType::IsUnknown => "IS UNKNOWN",
            BoolTestType::IsNotUnknown => "IS NOT UNKNOWN",
        };
        write!(f, "{} {test}", tight(&self.arg, prec::IS))
    }
}

/// How a subquery is used.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SubLinkType {
    /// `EXISTS (query)`.
    Exists,
    /// `a op ALL (query)`.
    All,
    /// `a op ANY (query)`, or `a IN (query)` without an operator.
    Any,
    /// `(query)` used as a scalar.
    Expr,
    /// `ARRAY(query)`.
    Array,
}

/// A subquery inside an expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubLink {
    /// How the result is used.
    pub sub_link_type: SubLinkType,
    /// Left operand for `ANY`/`ALL`.
    pub testexpr: Option<Node>,
    /// Comparison operator; `None` with [`SubLinkType::Any`] means `IN`.
    pub oper_name: Option<String>,
    /// The subquery.
    pub subselect: SelectStmt,
}

impl SubLink {
    /// A subquery with no left operand.
    #[must_use]
    pub fn new(sub_link_type: SubLinkType, subselect: SelectStmt) -> Self {
        Self {
            sub_link_type,
            testexpr: None,
            oper_name: None,
            subselect,
        }
    }

    pub(super) fn child_nodes(&self) -> Vec<&dyn AstNode> {
        Children::new()
            .opt(&self.testexpr)
            .node(&self.subselect)
            .finish()
    }
}

impl fmt::Display for SubLink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sub = &self.subselect;
        match (self.sub_link_type, &self.testexpr, &self.oper_name) {
            (SubLinkType::Exists, _, _) => write!(f, "EXISTS ({sub})"),
            (SubLinkType::Array, _, _) => write!(f, "ARRAY({sub})"),
            (SubLinkType::Any, Some(test), None) => {
                write!(f, "{} IN ({sub})", tight(test, prec::LIKE))
            }
            (SubLinkType::Any | SubLinkType::All, Some(test), Some(op)) => {
                let level = operator_precedence(op);
                let lhs = if level == prec::CMP { tight(test, level) } else { left(test, level) };
                let quantifier = if self.sub_link_type == SubLinkType::Any { "ANY" } else { "ALL" };
                write!(f, "{lhs} {op} {quantifier} ({sub})")
            }
            _ => write!(f, "({sub})"),
        }
    }
}

/// Whether a function call is written with ordinary call syntax or with
/// dedicated SQL syntax such as `EXTRACT(x FROM y)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FuncFormat {
    #[default]
    Regular,
    SqlSyntax,
}

/// A function call, including aggregates and window functions.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FuncCall {
    /// Possibly qualified function name.
    pub funcname: Vec<String>,
    /// Arguments.
    pub args: Vec<Node>,
    /// `ORDER BY` inside the argument list.
    pub agg_order: Vec<SortBy>,
    /// `FILTER (WHERE ...)`.
    pub agg_filter: Option<Node>,
    /// `OVER` clause.
    pub over: Option<WindowDef>,
    /// `f(*)`.
    pub agg_star: bool,
    /// `f(DISTINCT ...)`.
    pub agg_distinct: bool,
    /// Rendering style.
    pub func_format: FuncFormat,
}

impl FuncCall {
    /// A plain call.
    #[must_use]
    pub fn new(funcname: Vec<String>, args: Vec<Node>) -> Self {
        Self {
            funcname,
            args,
            ..Self::default()
        }
    }

    /// A call to a `pg_catalog` function written with special syntax.
    #[must_use]
    pub fn system(name: &str, args: Vec<Node>) -> Self {
        Self {
            func_format: FuncFormat::SqlSyntax,
            ..Self::new(vec!["pg_catalog".to_owned(), name.to_owned()], args)
        }
    }

    /// Returns true if this calls `pg_catalog.<name>`.
    #[must_use]
    pub fn is_system(&self, name: &str) -> bool {
        matches!(self.funcname.as_slice(), [schema, func] if schema == "pg_catalog" && func == name)
    }

    pub(crate) fn is_timezone(&self) -> bool {
        self.is_system("timezone") && self.args.len() == 2
    }

    pub(super) fn child_nodes(&self) -> Vec<&dyn AstNode> {
        Children::new()
            .list(&self.args)
            .list(&self.agg_order)
            .opt(&self.agg_filter)
            .opt(&self.over)
            .finish()
    }

    fn fmt_special(&self, f: &mut fmt::Formatter<'_>) -> Option<fmt::Result> {
        if self.func_format != FuncFormat::SqlSyntax {
            return None;
        }
        match self.args.as_slice() {
            [Node::AConst(field), source] if self.is_system("extract") => {
                let field = field.val.as_str()?;
                Some(match quote_identifier(field) {
                    std::borrow::Cow::Borrowed(bare) => write!(f, "EXTRACT({bare} FROM {source})"),
                    std::borrow::Cow::Owned(_) => {
                        write!(f, "EXTRACT({} FROM {source})", quote_literal(field))
                    }
                })
            }
            [zone, source] if self.is_system("timezone") => Some(write!(
                f,
                "{} AT TIME ZONE {}",
                left(source, prec::AT),
                tight(zone, prec::AT)
            )),
            _ => None,
        }
    }
}

impl fmt::Display for FuncCall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(result) = self.fmt_special(f) {
            return result;
        }
        write!(f, "{}(", QualifiedName(&self.funcname))?;
        if self.agg_star {
            f.write_str("*")?;
        } else {
            if self.agg_distinct {
                f.write_str("DISTINCT ")?;
            }
            write!(f, "{}", comma(&self.args))?;
            if !self.agg_order.is_empty() {
                write!(f, " ORDER BY {}", comma(&self.agg_order))?;
            }
        }
        f.write_str(")")?;
        if let Some(filter) = &self.agg_filter {
            write!(f, " FILTER (WHERE {filter})")?;
        }
        if let Some(over) = &self.over {
            match &over.name {
                Some(name) => write!(f, " OVER {}", Ident(name))?,
                None => write!(f, " OVER {over}")?,
            }
        }
        Ok(())
    }
}

/// `name => value` inside an argument list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamedArgExpr {
    /// Parameter name.
    pub name: String,
    /// Argument value.
    pub arg: Node,
}

impl NamedArgExpr {
    pub(super) fn child_nodes(&self) -> Vec<&dyn AstNode> {
        Children::new().node(&self.arg).finish()
    }
}

impl fmt::Display for NamedArgExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} => {}", Ident(&self.name), self.arg)
    }
}

/// Unit of a window frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FrameMode {
    Rows,
    Range,
    Groups,
}

/// One end of a window frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FrameBound {
    UnboundedPreceding,
    Preceding(Node),
    CurrentRow,
    Following(Node),
    UnboundedFollowing,
}

impl fmt::Display for FrameBound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnboundedPreceding => f.write_str("UNBOUNDED PRECEDING"),
            Self::Preceding(offset) => write!(f, "{offset} PRECEDING"),
            Self::CurrentRow => f.write_str("CURRENT ROW"),
            Self::Following(offset) => write!(f, "{offset} FOLLOWING"),
            Self::UnboundedFollowing => f.write_str("UNBOUNDED FOLLOWING"),
        }
    }
}

/// `EXCLUDE` option of a window frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FrameExclusion {
    CurrentRow,
    Group,
    Ties,
    NoOthers,
}

/// A window frame clause.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowFrame {
    /// Frame unit.
    pub mode: FrameMode,
    /// Start bound.
    pub start: FrameBound,
    /// End bound, when written with `BETWEEN`.
    pub end: Option<FrameBound>,
    /// Exclusion option.
    pub exclusion: Option<FrameExclusion>,
}

impl fmt::Display for WindowFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self.mode {
            FrameMode::Rows => "ROWS ",
            FrameMode::Range => "RANGE ",
            FrameMode::Groups => "GROUPS ",
        })?;
        match &self.end {
            Some(end) => write!(f, "BETWEEN {} AND {end}", self.start)?,
            None => write!(f, "{}", self.start)?,
        }
        if let Some(exclusion) = self.exclusion {
            f.write_str(match exclusion {
                FrameExclusion::CurrentRow => " EXCLUDE CURRENT ROW",
                FrameExclusion::Group => " EXCLUDE GROUP",
                FrameExclusion::Ties => " EXCLUDE TIES",
                FrameExclusion::NoOthers => " EXCLUDE NO OTHERS",
            })?;
        }
        Ok(())
    }
}

/// A window specification.
///
/// `name` is set for entries of a `WINDOW` clause and for `OVER name`;
/// `refname` is the window a specification builds on.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct WindowDef {
    /// Name given to this window.
    pub name: Option<String>,
    /// Base window.
    pub refname: Option<String>,
    /// `PARTITION BY`.
    pub partition_clause: Vec<Node>,
    /// `ORDER BY`.
    pub order_clause: Vec<SortBy>,
    /// Frame clause.
    pub frame: Option<WindowFrame>,
}

impl WindowDef {
    pub(super) fn child_nodes(&self) -> Vec<&dyn AstNode> {
        let mut children = Children::new()
            .list(&self.partition_clause)
            .list(&self.order_clause);
        if let Some(frame) = &self.frame {
            for bound in [Some(&frame.start), frame.end.as_ref()].into_iter().flatten() {
                if let FrameBound::Preceding(offset) | FrameBound::Following(offset) = bound {
                    children = children.node(offset);
                }
            }
        }
        children.finish()
    }
}

impl fmt::Display for WindowDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts = Vec::new();
        if let Some(refname) = &self.refname {
            parts.push(Ident(refname).to_string());
        }
        if !self.partition_clause.is_empty() {
            parts.push(format!("PARTITION BY {}", comma(&self.partition_clause)));
        }
        if !self.order_clause.is_empty() {
            parts.push(format!("ORDER BY {}", comma(&self.order_clause)));
        }
        if let Some(frame) = &self.frame {
            parts.push(frame.to_string());
        }
        write!(f, "({})", parts.join(" "))
    }
}

/// `CAST(arg AS type)`, also written `arg::type`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeCast {
    /// Value being cast.
    pub arg: Node,
    /// Target type.
    pub type_name: TypeName,
}

impl TypeCast {
    pub(super) fn child_nodes(&self) -> Vec<&dyn AstNode> {
        Children::new().node(&self.arg).node(&self.type_name).finish()
    }
}

impl fmt::Display for TypeCast {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CAST({} AS {})", self.arg, self.type_name)
    }
}

/// `arg COLLATE name`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollateClause {
    /// Collated expression.
    pub arg: Node,
    /// Collation name.
    pub collname: Vec<String>,
}

impl CollateClause {
    pub(super) fn child_nodes(&self) -> Vec<&dyn AstNode> {
        Children::new().node(&self.arg).finish()
    }
}

impl fmt::Display for CollateClause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} COLLATE {}",
            left(&self.arg, prec::COLLATE),
            QualifiedName(&self.collname)
        )
    }
}

/// `CASE [arg] WHEN ... END`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaseExpr {
    /// Operand of a simple `CASE`.
    pub arg: Option<Node>,
    /// `WHEN` arms.
    pub args: Vec<CaseWhen>,
    /// `ELSE` result.
    pub defresult: Option<Node>,
}

impl CaseExpr {
    pub(super) fn child_nodes(&self) -> Vec<&dyn AstNode> {
        Children::new()
            .opt(&self.arg)
            .list(&self.args)
            .opt(&self.defresult)
            .finish()
    }
}

impl fmt::Display for CaseExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("CASE")?;
        if let Some(arg) = &self.arg {
            write!(f, " {arg}")?;
        }
        for when in &self.args {
            write!(f, " {when}")?;
        }
        if let Some(default) = &self.defresult {
            write!(f, " ELSE {default}")?;
        }
        f.write_str(" END")
    }
}

/// One `WHEN expr THEN result` arm.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaseWhen {
    /// Condition or comparison value.
    pub expr: Node,
    /// Result.
    pub result: Node,
}

impl CaseWhen {
    pub(super) fn child_nodes(&self) -> Vec<&dyn AstNode> {
        Children::new().node(&self.expr).node(&self.result).finish()
    }
}

impl fmt::Display for CaseWhen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "WHEN {} THEN {}", self.expr, self.result)
    }
}

/// `ARRAY[...]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AArrayExpr {
    /// Elements; nested brackets become nested arrays.
    pub elements: Vec<Node>,
}

impl AArrayExpr {
    pub(super) fn child_nodes(&self) -> Vec<&dyn AstNode> {
        Children::new().list(&self.elements).finish()
    }
}

impl fmt::Display for AArrayExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ARRAY[{}]", comma(&self.elements))
    }
}

/// A subscript or slice, `[i]` or `[lo:hi]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AIndices {
    /// Written with a colon.
    pub is_slice: bool,
    /// Lower bound of a slice.
    pub lidx: Option<Node>,
    /// Subscript, or upper bound of a slice.
    pub uidx: Option<Node>,
}

impl AIndices {
    pub(super) fn child_nodes(&self) -> Vec<&dyn AstNode> {
        Children::new().opt(&self.lidx).opt(&self.uidx).finish()
    }
}

impl fmt::Display for AIndices {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        if self.is_slice {
            if let Some(lidx) = &self.lidx {
                write!(f, "{lidx}")?;
            }
            f.write_str(":")?;
        }
        if let Some(uidx) = &self.uidx {
            write!(f, "{uidx}")?;
        }
        f.write_str("]")
    }
}

/// One step of an [`AIndirection`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Indirection {
    /// Subscript.
    Index(AIndices),
    /// `.field`.
    Field(String),
    /// `.*`.
    Star,
}

impl fmt::Display for Indirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Index(indices) => write!(f, "{indices}"),
            Self::Field(name) => write!(f, ".{}", Ident(name)),
            Self::Star => f.write_str(".*"),
        }
    }
}

/// Subscripts and field selections applied to an expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AIndirection {
    /// Base expression.
    pub arg: Node,
    /// Steps applied in order.
    pub indirection: Vec<Indirection>,
}

impl AIndirection {
    pub(super) fn child_nodes(&self) -> Vec<&dyn AstNode> {
        let mut children = Children::new().node(&self.arg);
        for step in &self.indirection {
            if let Indirection::Index(indices) = step {
                children = children.node(indices);
            }
        }
        children.finish()
    }
}

impl fmt::Display for AIndirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let bare = matches!(self.arg, Node::ColumnRef(_) | Node::ParamRef(_));
        write!(f, "{}", Wrapped(&self.arg, !bare))?;
        for step in &self.indirection {
            write!(f, "{step}")?;
        }
        Ok(())
    }
}

/// A row constructor, `ROW(a, b)` or `(a, b)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowExpr {
    /// Fields.
    pub args: Vec<Node>,
    /// Written with the `ROW` keyword.
    pub explicit: bool,
}

impl RowExpr {
    pub(super) fn child_nodes(&self) -> Vec<&dyn AstNode> {
        Children::new().list(&self.args).finish()
    }
}

impl fmt::Display for RowExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.explicit || self.args.len() < 2 {
            f.write_str("ROW")?;
        }
        write!(f, "({})", comma(&self.args))
    }
}

/// `COALESCE(...)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoalesceExpr {
    /// Arguments.
    pub args: Vec<Node>,
}

impl CoalesceExpr {
    pub(super) fn child_nodes(&self) -> Vec<&dyn AstNode> {
        Children::new().list(&self.args).finish()
    }
}

impl fmt::Display for CoalesceExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "COALESCE({})", comma(&self.args))
    }
}

/// `GREATEST` or `LEAST`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MinMaxOp {
    Greatest,
    Least,
}

/// `GREATEST(...)` or `LEAST(...)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MinMaxExpr {
    /// Which function.
    pub op: MinMaxOp,
    /// Arguments.
    pub args: Vec<Node>,
}

impl MinMaxExpr {
    pub(super) fn child_nodes(&self) -> Vec<&dyn AstNode> {
        Children::new().list(&self.args).finish()
    }
}

impl fmt::Display for MinMaxExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self.op {
            MinMaxOp::Greatest => "GREATEST",
            MinMaxOp::Least => "LEAST",
        };
        write!(f, "{name}({})", comma(&self.args))
    }
}

/// Niladic functions written without parentheses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SqlValueFunctionOp {
    CurrentDate,
    CurrentTime,
    CurrentTimestamp,
    LocalTime,
    LocalTimestamp,
    CurrentRole,
    CurrentUser,
    User,
    SessionUser,
    SystemUser,
    CurrentCatalog,
    CurrentSchema,
}

impl SqlValueFunctionOp {
    /// Returns the SQL spelling.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::CurrentDate => "CURRENT_DATE",
            Self::CurrentTime => "CURRENT_TIME",
            Self::CurrentTimestamp => "CURRENT_TIMESTAMP",
            Self::LocalTime => "LOCALTIME",
            Self::LocalTimestamp => "LOCALTIMESTAMP",
            Self::CurrentRole => "CURRENT_ROLE",
            Self::CurrentUser => "CURRENT_USER",
            Self::User => "USER",
            Self::SessionUser => "SESSION_USER",
            Self::SystemUser => "SYSTEM_USER",
            Self::CurrentCatalog => "CURRENT_CATALOG",
            Self::CurrentSchema => "CURRENT_SCHEMA",
        }
    }

    /// Returns true for the variants that accept a precision.
    #[must_use]
    pub const fn takes_precision(self) -> bool {
        matches!(
            self,
            Self::CurrentTime | Self::CurrentTimestamp | Self::LocalTime | Self::LocalTimestamp
        )
    }
}

/// `CURRENT_DATE`, `CURRENT_USER` and friends.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SqlValueFunction {
    /// Which function.
    pub op: SqlValueFunctionOp,
    /// Precision of the time variants.
    pub typmod: Option<i32>,
}

impl SqlValueFunction {
    pub(super) fn child_nodes(&self) -> Vec<&dyn AstNode> {
        Vec::new()
    }
}

impl fmt::Display for SqlValueFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.op.as_str())?;
        if let Some(precision) = self.typmod {
            write!(f, "({precision})")?;
        }
        Ok(())
    }
}

/// `DEFAULT` in a `VALUES` row or `SET` clause.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetToDefault;

impl SetToDefault {
    pub(super) fn child_nodes(&self) -> Vec<&dyn AstNode> {
        Vec::new()
    }
}

impl fmt::Display for SetToDefault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("DEFAULT")
    }
}

/// A bare list of expressions, used for `IN` lists and `BETWEEN` bounds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct List {
    /// Items.
    pub items: Vec<Node>,
}

impl List {
    pub(super) fn child_nodes(&self) -> Vec<&dyn AstNode> {
        Children::new().list(&self.items).finish()
    }
}

impl fmt::Display for List {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", comma(&self.items))
    }
}
