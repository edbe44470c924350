//! Statement AST types.

use std::fmt;

use super::clause::Assignments;
use super::format::{comma, prec, precedence, Ident, Wrapped};
use super::{
    AstNode, Children, LockingClause, Node, OnConflictClause, RangeVar, ResTarget, SortBy, Value,
    WindowDef, WithClause,
};

/// A top-level statement with its position in the input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawStmt {
    /// The statement.
    pub stmt: Node,
    /// Byte offset of the first token.
    pub stmt_location: usize,
    /// Length in bytes, up to the end of the last token.
    pub stmt_len: usize,
}

impl RawStmt {
    pub(super) fn child_nodes(&self) -> Vec<&dyn AstNode> {
        Children::new().node(&self.stmt).finish()
    }
}

impl fmt::Display for RawStmt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.stmt)
    }
}

/// Set operation combining two selects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SetOperation {
    /// A plain select or `VALUES`.
    #[default]
    None,
    Union,
    Intersect,
    Except,
}

impl SetOperation {
    /// Binding strength; `INTERSECT` binds tighter than `UNION` and `EXCEPT`.
    #[must_use]
    pub const fn precedence(self) -> u8 {
        match self {
            Self::None => 3,
            Self::Intersect => 2,
            Self::Union | Self::Except => 1,
        }
    }

    /// Returns the SQL keyword.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::None => "",
            Self::Union => "UNION",
            Self::Intersect => "INTERSECT",
            Self::Except => "EXCEPT",
        }
    }
}

/// How the row count limit was written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum LimitOption {
    /// No limit.
    #[default]
    Default,
    /// `LIMIT n` or `FETCH FIRST n ROWS ONLY`.
    Count,
    /// `FETCH FIRST n ROWS WITH TIES`.
    WithTies,
}

/// `SELECT`, `VALUES`, or a set operation over two selects.
///
/// A set operation leaves the select-list fields empty and fills `op`,
/// `larg` and `rarg`. Sorting, limits, locking and `WITH` may decorate any
/// form.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SelectStmt {
    /// `None` for no `DISTINCT`, an empty list for plain `DISTINCT`.
    pub distinct_clause: Option<Vec<Node>>,
    /// Output columns.
    pub target_list: Vec<ResTarget>,
    /// `FROM` items.
    pub from_clause: Vec<Node>,
    /// `WHERE` condition.
    pub where_clause: Option<Node>,
    /// `GROUP BY` items.
    pub group_clause: Vec<Node>,
    /// `HAVING` condition.
    pub having_clause: Option<Node>,
    /// `WINDOW` definitions.
    pub window_clause: Vec<WindowDef>,
    /// Rows of a `VALUES` list.
    pub values_lists: Vec<Vec<Node>>,
    /// `ORDER BY` items.
    pub sort_clause: Vec<SortBy>,
    /// `OFFSET` expression.
    pub limit_offset: Option<Node>,
    /// `LIMIT` expression; a null constant means `LIMIT ALL`.
    pub limit_count: Option<Node>,
    /// Limit style.
    pub limit_option: LimitOption,
    /// `FOR UPDATE` and friends.
    pub locking_clause: Vec<LockingClause>,
    /// `WITH` clause.
    pub with_clause: Option<WithClause>,
    /// Set operation.
    pub op: SetOperation,
    /// `ALL` on the set operation.
    pub all: bool,
    /// Left input of a set operation.
    pub larg: Option<Box<SelectStmt>>,
    /// Right input of a set operation.
    pub rarg: Option<Box<SelectStmt>>,
}

impl SelectStmt {
    /// Combines two selects with a set operation.
    #[must_use]
    pub fn set_operation(op: SetOperation, all: bool, larg: Self, rarg: Self) -> Self {
        Self {
            op,
            all,
            larg: Some(Box::new(larg)),
            rarg: Some(Box::new(rarg)),
            ..Self::default()
        }
    }

    /// Returns true if any clause that applies after set operations is set.
    #[must_use]
    pub fn has_trailing_clauses(&self) -> bool {
        !self.sort_clause.is_empty()
            || self.limit_count.is_some()
            || self.limit_offset.is_some()
            || !self.locking_clause.is_empty()
            || self.with_clause.is_some()
    }

    pub(super) fn child_nodes(&self) -> Vec<&dyn AstNode> {
        let mut children = Children::new().opt(&self.with_clause);
        if let Some(distinct) = &self.distinct_clause {
            children = children.list(distinct);
        }
        children = children
            .list(&self.target_list)
            .list(&self.from_clause)
            .opt(&self.where_clause)
            .list(&self.group_clause)
            .opt(&self.having_clause)
            .list(&self.window_clause);
        for row in &self.values_lists {
            children = children.list(row);
        }
        if let Some(larg) = &self.larg {
            children = children.node(larg.as_ref());
        }
        if let Some(rarg) = &self.rarg {
            children = children.node(rarg.as_ref());
        }
        children
            .list(&self.sort_clause)
            .opt(&self.limit_offset)
            .opt(&self.limit_count)
            .list(&self.locking_clause)
            .finish()
    }

    fn fmt_set_operand(&self, f: &mut fmt::Formatter<'_>, child: &Self, right: bool) -> fmt::Result {
        let (mine, theirs) = (self.op.precedence(), child.op.precedence());
        let wrap = child.has_trailing_clauses() || if right { theirs <= mine } else { theirs < mine };
        if wrap {
            write!(f, "({child})")
        } else {
            write!(f, "{child}")
        }
    }

    fn fmt_body(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let (Some(larg), Some(rarg)) = (&self.larg, &self.rarg) {
            self.fmt_set_operand(f, larg, false)?;
            write!(f, " {}", self.op.as_str())?;
            if self.all {
                f.write_str(" ALL")?;
            }
            f.write_str(" ")?;
            return self.fmt_set_operand(f, rarg, true);
        }
        if !self.values_lists.is_empty() {
            f.write_str("VALUES ")?;
            for (i, row) in self.values_lists.iter().enumerate() {
                if i > 0 {
                    f.write_str(", ")?;
                }
                write!(f, "({})", comma(row))?;
            }
            return Ok(());
        }
        f.write_str("SELECT")?;
        match &self.distinct_clause {
            Some(on) if on.is_empty() => f.write_str(" DISTINCT")?,
            Some(on) => write!(f, " DISTINCT ON ({})", comma(on))?,
            None => {}
        }
        if !self.target_list.is_empty() {
            write!(f, " {}", comma(&self.target_list))?;
        }
        if !self.from_clause.is_empty() {
            write!(f, " FROM {}", comma(&self.from_clause))?;
        }
        if let Some(cond) = &self.where_clause {
            write!(f, " WHERE {cond}")?;
        }
        if !self.group_clause.is_empty() {
            write!(f, " GROUP BY {}", comma(&self.group_clause))?;
        }
        if let Some(cond) = &self.having_clause {
            write!(f, " HAVING {cond}")?;
        }
        if !self.window_clause.is_empty() {
            f.write_str(" WINDOW ")?;
            for (i, window) in self.window_clause.iter().enumerate() {
                if i > 0 {
                    f.write_str(", ")?;
                }
                let name = window.name.as_deref().unwrap_or_default();
                write!(f, "{} AS {window}", Ident(name))?;
            }
        }
        Ok(())
    }

    fn fmt_limits(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.limit_option == LimitOption::WithTies {
            if let Some(offset) = &self.limit_offset {
                write!(f, " OFFSET {offset}")?;
            }
            if let Some(count) = &self.limit_count {
                let wrap = precedence(count) < prec::PRIMARY;
                write!(f, " FETCH FIRST {} ROWS WITH TIES", Wrapped(count, wrap))?;
            }
            return Ok(());
        }
        match &self.limit_count {
            Some(Node::Value(Value::Null)) => f.write_str(" LIMIT ALL")?,
            Some(Node::AConst(c)) if c.val.is_null() => f.write_str(" LIMIT ALL")?,
            Some(count) => write!(f, " LIMIT {count}")?,
            None => {}
        }
        if let Some(offset) = &self.limit_offset {
            write!(f, " OFFSET {offset}")?;
        }
        Ok(())
    }
}

impl fmt::Display for SelectStmt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(with) = &self.with_clause {
            write!(f, "{with} ")?;
        }
        self.fmt_body(f)?;
        if !self.sort_clause.is_empty() {
            write!(f, " ORDER BY {}", comma(&self.sort_clause))?;
        }
        self.fmt_limits(f)?;
        for lock in &self.locking_clause {
            write!(f, " {lock}")?;
        }
        Ok(())
    }
}

/// `INSERT INTO ...`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InsertStmt {
    /// Target table.
    pub relation: RangeVar,
    /// Target columns.
    pub cols: Vec<ResTarget>,
    /// Source rows; `None` for `DEFAULT VALUES`.
    pub select_stmt: Option<SelectStmt>,
    /// `ON CONFLICT` clause.
    pub on_conflict: Option<OnConflictClause>,
    /// `RETURNING` list.
    pub returning_list: Vec<ResTarget>,
    /// `WITH` clause.
    pub with_clause: Option<WithClause>,
}

impl InsertStmt {
    pub(super) fn child_nodes(&self) -> Vec<&dyn AstNode> {
        Children::new()
            .opt(&self.with_clause)
            .node(&self.relation)
            .list(&self.cols)
            .opt(&self.select_stmt)
            .opt(&self.on_conflict)
            .list(&self.returning_list)
            .finish()
    }
}

impl fmt::Display for InsertStmt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(with) = &self.with_clause {
            write!(f, "{with} ")?;
        }
        write!(f, "INSERT INTO {}", self.relation)?;
        if !self.cols.is_empty() {
            write!(f, " ({})", comma(&self.cols))?;
        }
        match &self.select_stmt {
            Some(select) => write!(f, " {select}")?,
            None => f.write_str(" DEFAULT VALUES")?,
        }
        if let Some(conflict) = &self.on_conflict {
            write!(f, " {conflict}")?;
        }
        if !self.returning_list.is_empty() {
            write!(f, " RETURNING {}", comma(&self.returning_list))?;
        }
        Ok(())
    }
}

/// `UPDATE ... SET ...`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateStmt {
    /// Target table.
    pub relation: RangeVar,
    /// Assignments.
    pub target_list: Vec<ResTarget>,
    /// `WHERE` condition.
    pub where_clause: Option<Node>,
    /// `FROM` items.
    pub from_clause: Vec<Node>,
    /// `RETURNING` list.
    pub returning_list: Vec<ResTarget>,
    /// `WITH` clause.
    pub with_clause: Option<WithClause>,
}

impl UpdateStmt {
    pub(super) fn child_nodes(&self) -> Vec<&dyn AstNode> {
        Children::new()
            .opt(&self.with_clause)
            .node(&self.relation)
            .list(&self.target_list)
            .list(&self.from_clause)
            .opt(&self.where_clause)
            .list(&self.returning_list)
            .finish()
    }
}

impl fmt::Display for UpdateStmt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(with) = &self.with_clause {
            write!(f, "{with} ")?;
        }
        write!(
            f,
            "UPDATE {} SET {}",
            self.relation,
            Assignments(&self.target_list)
        )?;
        if !self.from_clause.is_empty() {
            write!(f, " FROM {}", comma(&self.from_clause))?;
        }
        if let Some(cond) = &self.where_clause {
            write!(f, " WHERE {cond}")?;
        }
        if !self.returning_list.is_empty() {
            write!(f, " RETURNING {}", comma(&self.returning_list))?;
        }
        Ok(())
    }
}

/// `DELETE FROM ...`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteStmt {
    /// Target table.
    pub relation: RangeVar,
    /// `USING` items.
    pub using_clause: Vec<Node>,
    /// `WHERE` condition.
    pub where_clause: Option<Node>,
    /// `RETURNING` list.
    pub returning_list: Vec<ResTarget>,
    /// `WITH` clause.
    pub with_clause: Option<WithClause>,
}

impl DeleteStmt {
    pub(super) fn child_nodes(&self) -> Vec<&dyn AstNode> {
        Children::new()
            .opt(&self.with_clause)
            .node(&self.relation)
            .list(&self.using_clause)
            .opt(&self.where_clause)
            .list(&self.returning_list)
            .finish()
    }
}

impl fmt::Display for DeleteStmt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(with) = &self.with_clause {
            write!(f, "{with} ")?;
        }
        write!(f, "DELETE FROM {}", self.relation)?;
        if !self.using_clause.is_empty() {
            write!(f, " USING {}", comma(&self.using_clause))?;
        }
        if let Some(cond) = &self.where_clause {
            write!(f, " WHERE {cond}")?;
        }
        if !self.returning_list.is_empty() {
            write!(f, " RETURNING {}", comma(&self.returning_list))?;
        }
        Ok(())
    }
}

/// Transaction control statement kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransactionStmtKind {
    Begin,
    Start,
    Commit,
    Rollback,
    Savepoint,
    Release,
    RollbackTo,
}

/// Isolation levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IsolationLevel {
    ReadUncommitted,
    ReadCommitted,
    RepeatableRead,
    Serializable,
}

impl IsolationLevel {
    /// Returns the SQL spelling.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ReadUncommitted => "READ UNCOMMITTED",
            Self::ReadCommitted => "READ COMMITTED",
            Self::RepeatableRead => "REPEATABLE READ",
            Self::Serializable => "SERIALIZABLE",
        }
    }
}

/// One transaction characteristic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransactionMode {
    IsolationLevel(IsolationLevel),
    ReadOnly,
    ReadWrite,
    Deferrable,
    NotDeferrable,
}

impl fmt::Display for TransactionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::IsolationLevel(level) => write!(f, "ISOLATION LEVEL {}", level.as_str()),
            Self::ReadOnly => f.write_str("READ ONLY"),
            Self::ReadWrite => f.write_str("READ WRITE"),
            Self::Deferrable => f.write_str("DEFERRABLE"),
            Self::NotDeferrable => f.write_str("NOT DEFERRABLE"),
        }
    }
}

/// `BEGIN`, `COMMIT`, `SAVEPOINT` and the rest of transaction control.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionStmt {
    /// Statement kind.
    pub kind: TransactionStmtKind,
    /// Characteristics for `BEGIN` and `START TRANSACTION`.
    pub options: Vec<TransactionMode>,
    /// Savepoint name.
    pub savepoint_name: Option<String>,
    /// `AND CHAIN`.
    pub chain: bool,
}

impl TransactionStmt {
    /// A statement of `kind` with no options.
    #[must_use]
    pub fn new(kind: TransactionStmtKind) -> Self {
        Self {
            kind,
            options: Vec::new(),
            savepoint_name: None,
            chain: false,
        }
    }

    pub(super) fn child_nodes(&self) -> Vec<&dyn AstNode> {
        Vec::new()
    }
}

impl fmt::Display for TransactionStmt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let savepoint = self.savepoint_name.as_deref().unwrap_or_default();
        match self.kind {
            TransactionStmtKind::Begin => f.write_str("BEGIN")?,
            TransactionStmtKind::Start => f.write_str("START TRANSACTION")?,
            TransactionStmtKind::Commit => f.write_str("COMMIT")?,
            TransactionStmtKind::Rollback => f.write_str("ROLLBACK")?,
            TransactionStmtKind::Savepoint => write!(f, "SAVEPOINT {}", Ident(savepoint))?,
            TransactionStmtKind::Release => write!(f, "RELEASE SAVEPOINT {}", Ident(savepoint))?,
            TransactionStmtKind::RollbackTo => {
                write!(f, "ROLLBACK TO SAVEPOINT {}", Ident(savepoint))?;
            }
        }
        if !self.options.is_empty() {
            write!(f, " {}", comma(&self.options))?;
        }
        if self.chain {
            f.write_str(" AND CHAIN")?;
        }
        Ok(())
    }
}

/// What a `SET`/`RESET` statement does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VariableSetKind {
    /// `SET name TO value`.
    Value,
    /// `SET name TO DEFAULT`.
    Default,
    /// `RESET name`.
    Reset,
    /// `RESET ALL`.
    ResetAll,
}

/// Displays a dotted configuration parameter name.
struct ParamName<'a>(&'a str);

impl fmt::Display for ParamName<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, part) in self.0.split('.').enumerate() {
            if i > 0 {
                f.write_str(".")?;
            }
            write!(f, "{}", Ident(part))?;
        }
        Ok(())
    }
}

/// `SET` or `RESET` of a configuration parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariableSetStmt {
    /// Statement kind.
    pub kind: VariableSetKind,
    /// Parameter name, dotted for custom parameters.
    pub name: Option<String>,
    /// Values.
    pub args: Vec<Node>,
    /// `SET LOCAL`.
    pub is_local: bool,
}

impl VariableSetStmt {
    pub(super) fn child_nodes(&self) -> Vec<&dyn AstNode> {
        Children::new().list(&self.args).finish()
    }
}

impl fmt::Display for VariableSetStmt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = ParamName(self.name.as_deref().unwrap_or_default());
        let local = if self.is_local { "LOCAL " } else { "" };
        match self.kind {
            VariableSetKind::Value => write!(f, "SET {local}{name} TO {}", comma(&self.args)),
            VariableSetKind::Default => write!(f, "SET {local}{name} TO DEFAULT"),
            VariableSetKind::Reset => write!(f, "RESET {name}"),
            VariableSetKind::ResetAll => f.write_str("RESET ALL"),
        }
    }
}

/// `SHOW name` or `SHOW ALL`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariableShowStmt {
    /// Parameter name; `all` for `SHOW ALL`.
    pub name: String,
}

impl VariableShowStmt {
    pub(super) fn child_nodes(&self) -> Vec<&dyn AstNode> {
        Vec::new()
    }
}

impl fmt::Display for VariableShowStmt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.name == "all" {
            f.write_str("SHOW ALL")
        } else {
            write!(f, "SHOW {}", ParamName(&self.name))
        }
    }
}
