//! Clause-level AST types: targets, sorting, table references, CTEs.

use std::fmt;

use super::format::{comma, Ident, IdentList, QualifiedName};
use super::{AstNode, Children, FuncCall, Node, SelectStmt};

/// An output column, an `INSERT` target column or a `SET` assignment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResTarget {
    /// Column label or target column name.
    pub name: Option<String>,
    /// Value expression.
    pub val: Option<Node>,
}

impl ResTarget {
    /// An output column with an optional label.
    #[must_use]
    pub fn new(val: Node, name: Option<String>) -> Self {
        Self {
            name,
            val: Some(val),
        }
    }

    /// A bare column name.
    #[must_use]
    pub fn column(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            val: None,
        }
    }

    pub(super) fn child_nodes(&self) -> Vec<&dyn AstNode> {
        Children::new().opt(&self.val).finish()
    }
}

impl fmt::Display for ResTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.val, &self.name) {
            (Some(val), Some(name)) => write!(f, "{val} AS {}", Ident(name)),
            (Some(val), None) => write!(f, "{val}"),
            (None, Some(name)) => write!(f, "{}", Ident(name)),
            (None, None) => Ok(()),
        }
    }
}

/// Displays `name = value` assignments.
pub(crate) struct Assignments<'a>(pub &'a [ResTarget]);

impl fmt::Display for Assignments<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, target) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            let name = target.name.as_deref().unwrap_or_default();
            match &target.val {
                Some(val) => write!(f, "{} = {val}", Ident(name))?,
                None => write!(f, "{}", Ident(name))?,
            }
        }
        Ok(())
    }
}

/// Sort direction.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SortByDir {
    #[default]
    Default,
    Asc,
    Desc,
    /// `USING operator`.
    Using(String),
}

impl fmt::Display for SortByDir {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Default => Ok(()),
            Self::Asc => f.write_str(" ASC"),
            Self::Desc => f.write_str(" DESC"),
            Self::Using(op) => write!(f, " USING {op}"),
        }
    }
}

/// Placement of nulls in a sort.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SortByNulls {
    #[default]
    Default,
    First,
    Last,
}

impl fmt::Display for SortByNulls {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Default => Ok(()),
            Self::First => f.write_str(" NULLS FIRST"),
            Self::Last => f.write_str(" NULLS LAST"),
        }
    }
}

/// One `ORDER BY` item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortBy {
    /// Sort key.
    pub node: Node,
    /// Direction.
    pub sortby_dir: SortByDir,
    /// Null placement.
    pub sortby_nulls: SortByNulls,
}

impl SortBy {
    pub(super) fn child_nodes(&self) -> Vec<&dyn AstNode> {
        Children::new().node(&self.node).finish()
    }
}

impl fmt::Display for SortBy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.node, self.sortby_dir, self.sortby_nulls)
    }
}

/// Persistence of a relation being created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum RelPersistence {
    #[default]
    Permanent,
    Unlogged,
    Temp,
}

/// `AS name (col, ...)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alias {
    /// Alias name.
    pub aliasname: String,
    /// Column aliases.
    pub colnames: Vec<String>,
}

impl Alias {
    /// An alias without column names.
    #[must_use]
    pub fn new(aliasname: impl Into<String>) -> Self {
        Self {
            aliasname: aliasname.into(),
            colnames: Vec::new(),
        }
    }

    pub(super) fn child_nodes(&self) -> Vec<&dyn AstNode> {
        Vec::new()
    }
}

impl fmt::Display for Alias {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", Ident(&self.aliasname))?;
        if !self.colnames.is_empty() {
            write!(f, "({})", IdentList(&self.colnames))?;
        }
        Ok(())
    }
}

/// A table reference by name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RangeVar {
    /// Database name.
    pub catalogname: Option<String>,
    /// Schema name.
    pub schemaname: Option<String>,
    /// Relation name.
    pub relname: String,
    /// Include inheritance children; false for `ONLY`.
    pub inh: bool,
    /// Persistence for `CREATE`.
    pub relpersistence: RelPersistence,
    /// Table alias.
    pub alias: Option<Alias>,
}

impl RangeVar {
    /// An unqualified relation.
    #[must_use]
    pub fn new(relname: impl Into<String>) -> Self {
        Self {
            catalogname: None,
            schemaname: None,
            relname: relname.into(),
            inh: true,
            relpersistence: RelPersistence::Permanent,
            alias: None,
        }
    }

    /// Builds a relation from one to three dotted names.
    #[must_use]
    pub fn from_names(mut names: Vec<String>) -> Option<Self> {
        if names.len() > 3 {
            return None;
        }
        let relname = names.pop()?;
        let schemaname = names.pop();
        let catalogname = names.pop();
        Some(Self {
            catalogname,
            schemaname,
            ..Self::new(relname)
        })
    }

    /// Returns the dotted name parts.
    #[must_use]
    pub fn names(&self) -> Vec<String> {
        [&self.catalogname, &self.schemaname]
            .into_iter()
            .flatten()
            .cloned()
            .chain(std::iter::once(self.relname.clone()))
            .collect()
    }

    pub(super) fn child_nodes(&self) -> Vec<&dyn AstNode> {
        Children::new().opt(&self.alias).finish()
    }
}

impl fmt::Display for RangeVar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.inh {
            f.write_str("ONLY ")?;
        }
        write!(f, "{}", QualifiedName(&self.names()))?;
        if let Some(alias) = &self.alias {
            write!(f, " AS {alias}")?;
        }
        Ok(())
    }
}

/// A subquery in `FROM`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RangeSubselect {
    /// `LATERAL`.
    pub lateral: bool,
    /// The subquery.
    pub subquery: SelectStmt,
    /// Alias.
    pub alias: Option<Alias>,
}

impl RangeSubselect {
    pub(super) fn child_nodes(&self) -> Vec<&dyn AstNode> {
        Children::new()
            .node(&self.subquery)
            .opt(&self.alias)
            .finish()
    }
}

impl fmt::Display for RangeSubselect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.lateral {
            f.write_str("LATERAL ")?;
        }
        write!(f, "({})", self.subquery)?;
        if let Some(alias) = &self.alias {
            write!(f, " AS {alias}")?;
        }
        Ok(())
    }
}

/// A function call in `FROM`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RangeFunction {
    /// `LATERAL`.
    pub lateral: bool,
    /// `WITH ORDINALITY`.
    pub ordinality: bool,
    /// The call.
    pub function: FuncCall,
    /// Alias.
    pub alias: Option<Alias>,
}

impl RangeFunction {
    pub(super) fn child_nodes(&self) -> Vec<&dyn AstNode> {
        Children::new()
            .node(&self.function)
            .opt(&self.alias)
            .finish()
    }
}

impl fmt::Display for RangeFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.lateral {
            f.write_str("LATERAL ")?;
        }
        write!(f, "{}", self.function)?;
        if self.ordinality {
            f.write_str(" WITH ORDINALITY")?;
        }
        if let Some(alias) = &self.alias {
            write!(f, " AS {alias}")?;
        }
        Ok(())
    }
}

/// Join kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JoinType {
    Inner,
    Left,
    Full,
    Right,
}

/// `larg JOIN rarg ...`. A `CROSS JOIN` is an inner join without
/// qualification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JoinExpr {
    /// Join kind.
    pub jointype: JoinType,
    /// `NATURAL`.
    pub is_natural: bool,
    /// Left side.
    pub larg: Node,
    /// Right side.
    pub rarg: Node,
    /// `USING (...)` columns.
    pub using_clause: Vec<String>,
    /// `ON` condition.
    pub quals: Option<Node>,
    /// Alias of a parenthesized join.
    pub alias: Option<Alias>,
}

impl JoinExpr {
    pub(super) fn child_nodes(&self) -> Vec<&dyn AstNode> {
        Children::new()
            .node(&self.larg)
            .node(&self.rarg)
            .opt(&self.quals)
            .opt(&self.alias)
            .finish()
    }

    fn keyword(&self) -> &'static str {
        match self.jointype {
            JoinType::Inner if !self.is_natural && self.quals.is_none() && self.using_clause.is_empty() => {
                "CROSS JOIN"
            }
            JoinType::Inner => "JOIN",
            JoinType::Left => "LEFT JOIN",
            JoinType::Right => "RIGHT JOIN",
            JoinType::Full => "FULL JOIN",
        }
    }
}

impl fmt::Display for JoinExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.alias.is_some() {
            f.write_str("(")?;
        }
        write!(f, "{} ", self.larg)?;
        if self.is_natural {
            f.write_str("NATURAL ")?;
        }
        f.write_str(self.keyword())?;
        match &self.rarg {
            Node::JoinExpr(join) if join.alias.is_none() => write!(f, " ({join})")?,
            rarg => write!(f, " {rarg}")?,
        }
        if !self.using_clause.is_empty() {
            write!(f, " USING ({})", IdentList(&self.using_clause))?;
        } else if let Some(quals) = &self.quals {
            write!(f, " ON {quals}")?;
        }
        if let Some(alias) = &self.alias {
            write!(f, ") AS {alias}")?;
        }
        Ok(())
    }
}

/// `WITH [RECURSIVE] ...`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WithClause {
    /// The common table expressions.
    pub ctes: Vec<CommonTableExpr>,
    /// `RECURSIVE`.
    pub recursive: bool,
}

impl WithClause {
    pub(super) fn child_nodes(&self) -> Vec<&dyn AstNode> {
        Children::new().list(&self.ctes).finish()
    }
}

impl fmt::Display for WithClause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("WITH ")?;
        if self.recursive {
            f.write_str("RECURSIVE ")?;
        }
        write!(f, "{}", comma(&self.ctes))
    }
}

/// Materialization hint of a CTE.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CteMaterialize {
    #[default]
    Default,
    Always,
    Never,
}

/// `name (cols) AS (query)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommonTableExpr {
    /// CTE name.
    pub ctename: String,
    /// Column aliases.
    pub aliascolnames: Vec<String>,
    /// Materialization hint.
    pub ctematerialized: CteMaterialize,
    /// The query: a select, insert, update or delete.
    pub ctequery: Node,
}

impl CommonTableExpr {
    pub(super) fn child_nodes(&self) -> Vec<&dyn AstNode> {
        Children::new().node(&self.ctequery).finish()
    }
}

impl fmt::Display for CommonTableExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", Ident(&self.ctename))?;
        if !self.aliascolnames.is_empty() {
            write!(f, "({})", IdentList(&self.aliascolnames))?;
        }
        f.write_str(" AS ")?;
        match self.ctematerialized {
            CteMaterialize::Default => {}
            CteMaterialize::Always => f.write_str("MATERIALIZED ")?,
            CteMaterialize::Never => f.write_str("NOT MATERIALIZED ")?,
        }
        write!(f, "({})", self.ctequery)
    }
}

/// What `ON CONFLICT` does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OnConflictAction {
    Nothing,
    Update,
}

/// `ON CONFLICT ... DO ...`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OnConflictClause {
    /// The action.
    pub action: OnConflictAction,
    /// Conflict target.
    pub infer: Option<InferClause>,
    /// `SET` assignments of `DO UPDATE`.
    pub target_list: Vec<ResTarget>,
    /// `WHERE` of `DO UPDATE`.
    pub where_clause: Option<Node>,
}

impl OnConflictClause {
    pub(super) fn child_nodes(&self) -> Vec<&dyn AstNode> {
        Children::new()
            .opt(&self.infer)
            .list(&self.target_list)
            .opt(&self.where_clause)
            .finish()
    }
}

impl fmt::Display for OnConflictClause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ON CONFLICT")?;
        if let Some(infer) = &self.infer {
            write!(f, " {infer}")?;
        }
        match self.action {
            OnConflictAction::Nothing => f.write_str(" DO NOTHING")?,
            OnConflictAction::Update => {
                write!(f, " DO UPDATE SET {}", Assignments(&self.target_list))?;
                if let Some(cond) = &self.where_clause {
                    write!(f, " WHERE {cond}")?;
                }
            }
        }
        Ok(())
    }
}

/// Conflict target: index columns or a constraint name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InferClause {
    /// Index columns or expressions.
    pub index_elems: Vec<IndexElem>,
    /// Partial index predicate.
    pub where_clause: Option<Node>,
    /// `ON CONSTRAINT name`.
    pub conname: Option<String>,
}

impl InferClause {
    pub(super) fn child_nodes(&self) -> Vec<&dyn AstNode> {
        Children::new()
            .list(&self.index_elems)
            .opt(&self.where_clause)
            .finish()
    }
}

impl fmt::Display for InferClause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(name) = &self.conname {
            return write!(f, "ON CONSTRAINT {}", Ident(name));
        }
        write!(f, "({})", comma(&self.index_elems))?;
        if let Some(cond) = &self.where_clause {
            write!(f, " WHERE {cond}")?;
        }
        Ok(())
    }
}

/// One column or expression of an index definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexElem {
    /// Column name.
    pub name: Option<String>,
    /// Expression, when not a plain column.
    pub expr: Option<Node>,
    /// Sort direction.
    pub ordering: SortByDir,
    /// Null placement.
    pub nulls_ordering: SortByNulls,
}

impl IndexElem {
    pub(super) fn child_nodes(&self) -> Vec<&dyn AstNode> {
        Children::new().opt(&self.expr).finish()
    }
}

impl fmt::Display for IndexElem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.name, &self.expr) {
            (Some(name), _) => write!(f, "{}", Ident(name))?,
            (None, Some(Node::FuncCall(call))) if call.func_format == super::FuncFormat::Regular => {
                write!(f, "{call}")?;
            }
            (None, Some(expr)) => write!(f, "({expr})")?,
            (None, None) => {}
        }
        write!(f, "{}{}", self.ordering, self.nulls_ordering)
    }
}

/// Row lock strength.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LockStrength {
    Update,
    NoKeyUpdate,
    Share,
    KeyShare,
}

/// What to do when a row is already locked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum LockWaitPolicy {
    #[default]
    Block,
    Skip,
    Error,
}

/// `FOR UPDATE [OF ...] [NOWAIT | SKIP LOCKED]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LockingClause {
    /// Relations named after `OF`.
    pub locked_rels: Vec<RangeVar>,
    /// Lock strength.
    pub strength: LockStrength,
    /// Wait policy.
    pub wait_policy: LockWaitPolicy,
}

impl LockingClause {
    pub(super) fn child_nodes(&self) -> Vec<&dyn AstNode> {
        Children::new().list(&self.locked_rels).finish()
    }
}

impl fmt::Display for LockingClause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self.strength {
            LockStrength::Update => "FOR UPDATE",
            LockStrength::NoKeyUpdate => "FOR NO KEY UPDATE",
            LockStrength::Share => "FOR SHARE",
            LockStrength::KeyShare => "FOR KEY SHARE",
        })?;
        if !self.locked_rels.is_empty() {
            write!(f, " OF {}", comma(&self.locked_rels))?;
        }
        match self.wait_policy {
            LockWaitPolicy::Block => Ok(()),
            LockWaitPolicy::Skip => f.write_str(" SKIP LOCKED"),
            LockWaitPolicy::Error => f.write_str(" NOWAIT"),
        }
    }
}
