//! Data definition statements.

use std::fmt;

use super::format::{comma, prec, precedence, Ident, IdentList, QualifiedName, Wrapped};
use super::{
    AstNode, Children, IndexElem, Node, RangeVar, RelPersistence, SelectStmt, TypeName,
};

fn persistence_prefix(persistence: RelPersistence) -> &'static str {
    match persistence {
        RelPersistence::Permanent => "",
        RelPersistence::Unlogged => "UNLOGGED ",
        RelPersistence::Temp => "TEMPORARY ",
    }
}

/// `CREATE TABLE`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateStmt {
    /// The new table.
    pub relation: RangeVar,
    /// Column definitions and table constraints.
    pub table_elts: Vec<Node>,
    /// `IF NOT EXISTS`.
    pub if_not_exists: bool,
}

impl CreateStmt {
    pub(super) fn child_nodes(&self) -> Vec<&dyn AstNode> {
        Children::new()
            .node(&self.relation)
            .list(&self.table_elts)
            .finish()
    }
}

impl fmt::Display for CreateStmt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "CREATE {}TABLE ",
            persistence_prefix(self.relation.relpersistence)
        )?;
        if self.if_not_exists {
            f.write_str("IF NOT EXISTS ")?;
        }
        write!(f, "{} ({})", self.relation, comma(&self.table_elts))
    }
}

/// One column of `CREATE TABLE`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnDef {
    /// Column name.
    pub colname: String,
    /// Column type.
    pub type_name: TypeName,
    /// Column constraints, in source order.
    pub constraints: Vec<Constraint>,
    /// `COLLATE` name; empty when absent.
    pub collation: Vec<String>,
}

impl ColumnDef {
    pub(super) fn child_nodes(&self) -> Vec<&dyn AstNode> {
        Children::new()
            .node(&self.type_name)
            .list(&self.constraints)
            .finish()
    }
}

impl fmt::Display for ColumnDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", Ident(&self.colname), self.type_name)?;
        if !self.collation.is_empty() {
            write!(f, " COLLATE {}", QualifiedName(&self.collation))?;
        }
        for constraint in &self.constraints {
            write!(f, " {constraint}")?;
        }
        Ok(())
    }
}

/// Constraint kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConstrType {
    Null,
    NotNull,
    Default,
    Check,
    Primary,
    Unique,
    Foreign,
}

/// Referential action of a foreign key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FkAction {
    #[default]
    NoAction,
    Restrict,
    Cascade,
    SetNull,
    SetDefault,
}

impl FkAction {
    /// Returns the SQL spelling.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NoAction => "NO ACTION",
            Self::Restrict => "RESTRICT",
            Self::Cascade => "CASCADE",
            Self::SetNull => "SET NULL",
            Self::SetDefault => "SET DEFAULT",
        }
    }
}

/// A column or table constraint.
///
/// Column constraints leave `keys` and `fk_attrs` empty; table constraints
/// list the columns they cover.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Constraint {
    /// Constraint kind.
    pub contype: ConstrType,
    /// `CONSTRAINT name`.
    pub conname: Option<String>,
    /// `CHECK` condition or `DEFAULT` value.
    pub raw_expr: Option<Node>,
    /// Columns of a table-level `PRIMARY KEY` or `UNIQUE`.
    pub keys: Vec<String>,
    /// Referenced table.
    pub pktable: Option<RangeVar>,
    /// Referencing columns of a table-level foreign key.
    pub fk_attrs: Vec<String>,
    /// Referenced columns.
    pub pk_attrs: Vec<String>,
    /// `ON DELETE` action.
    pub fk_del_action: FkAction,
    /// `ON UPDATE` action.
    pub fk_upd_action: FkAction,
}

impl Constraint {
    /// A constraint of `contype` with nothing else set.
    #[must_use]
    pub fn new(contype: ConstrType) -> Self {
        Self {
            contype,
            conname: None,
            raw_expr: None,
            keys: Vec::new(),
            pktable: None,
            fk_attrs: Vec::new(),
            pk_attrs: Vec::new(),
            fk_del_action: FkAction::NoAction,
            fk_upd_action: FkAction::NoAction,
        }
    }

    pub(super) fn child_nodes(&self) -> Vec<&dyn AstNode> {
        Children::new()
            .opt(&self.raw_expr)
            .opt(&self.pktable)
            .finish()
    }

    fn fmt_keys(f: &mut fmt::Formatter<'_>, keys: &[String]) -> fmt::Result {
        if keys.is_empty() {
            Ok(())
        } else {
            write!(f, " ({})", IdentList(keys))
        }
    }
}

impl fmt::Display for Constraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(name) = &self.conname {
            write!(f, "CONSTRAINT {} ", Ident(name))?;
        }
        match self.contype {
            ConstrType::Null => f.write_str("NULL"),
            ConstrType::NotNull => f.write_str("NOT NULL"),
            ConstrType::Default => match &self.raw_expr {
                Some(expr) => {
                    let wrap = precedence(expr) < prec::CMP;
                    write!(f, "DEFAULT {}", Wrapped(expr, wrap))
                }
                None => f.write_str("DEFAULT NULL"),
            },
            ConstrType::Check => match &self.raw_expr {
                Some(expr) => write!(f, "CHECK ({expr})"),
                None => f.write_str("CHECK (TRUE)"),
            },
            ConstrType::Primary => {
                f.write_str("PRIMARY KEY")?;
                Self::fmt_keys(f, &self.keys)
            }
            ConstrType::Unique => {
                f.write_str("UNIQUE")?;
                Self::fmt_keys(f, &self.keys)
            }
            ConstrType::Foreign => {
                if !self.fk_attrs.is_empty() {
                    write!(f, "FOREIGN KEY ({}) ", IdentList(&self.fk_attrs))?;
                }
                f.write_str("REFERENCES")?;
                if let Some(table) = &self.pktable {
                    write!(f, " {table}")?;
                }
                Self::fmt_keys(f, &self.pk_attrs)?;
                if self.fk_del_action != FkAction::NoAction {
                    write!(f, " ON DELETE {}", self.fk_del_action.as_str())?;
                }
                if self.fk_upd_action != FkAction::NoAction {
                    write!(f, " ON UPDATE {}", self.fk_upd_action.as_str())?;
                }
                Ok(())
            }
        }
    }
}

/// `CREATE INDEX`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexStmt {
    /// Index name.
    pub idxname: Option<String>,
    /// Indexed table.
    pub relation: RangeVar,
    /// `USING method`.
    pub access_method: Option<String>,
    /// Indexed columns and expressions.
    pub index_params: Vec<IndexElem>,
    /// Partial index predicate.
    pub where_clause: Option<Node>,
    /// `UNIQUE`.
    pub unique: bool,
    /// `CONCURRENTLY`.
    pub concurrent: bool,
    /// `IF NOT EXISTS`.
    pub if_not_exists: bool,
}

impl IndexStmt {
    pub(super) fn child_nodes(&self) -> Vec<&dyn AstNode> {
        Children::new()
            .node(&self.relation)
            .list(&self.index_params)
            .opt(&self.where_clause)
            .finish()
    }
}

impl fmt::Display for IndexStmt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("CREATE ")?;
        if self.unique {
            f.write_str("UNIQUE ")?;
        }
        f.write_str("INDEX ")?;
        if self.concurrent {
            f.write_str("CONCURRENTLY ")?;
        }
        if let Some(name) = &self.idxname {
            if self.if_not_exists {
                f.write_str("IF NOT EXISTS ")?;
            }
            write!(f, "{} ", Ident(name))?;
        }
        write!(f, "ON {}", self.relation)?;
        if let Some(method) = &self.access_method {
            write!(f, " USING {}", Ident(method))?;
        }
        write!(f, " ({})", comma(&self.index_params))?;
        if let Some(cond) = &self.where_clause {
            write!(f, " WHERE {cond}")?;
        }
        Ok(())
    }
}

/// `CREATE VIEW`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewStmt {
    /// The view.
    pub view: RangeVar,
    /// Column names.
    pub aliases: Vec<String>,
    /// Defining query.
    pub query: SelectStmt,
    /// `OR REPLACE`.
    pub replace: bool,
}

impl ViewStmt {
    pub(super) fn child_nodes(&self) -> Vec<&dyn AstNode> {
        Children::new().node(&self.view).node(&self.query).finish()
    }
}

impl fmt::Display for ViewStmt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("CREATE ")?;
        if self.replace {
            f.write_str("OR REPLACE ")?;
        }
        write!(
            f,
            "{}VIEW {}",
            persistence_prefix(self.view.relpersistence),
            self.view
        )?;
        if !self.aliases.is_empty() {
            write!(f, " ({})", IdentList(&self.aliases))?;
        }
        write!(f, " AS {}", self.query)
    }
}

/// Kind of object a `DROP` removes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObjectType {
    Table,
    View,
    Index,
    Sequence,
    Schema,
}

impl ObjectType {
    /// Returns the SQL keyword.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Table => "TABLE",
            Self::View => "VIEW",
            Self::Index => "INDEX",
            Self::Sequence => "SEQUENCE",
            Self::Schema => "SCHEMA",
        }
    }
}

/// `CASCADE` or `RESTRICT`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DropBehavior {
    #[default]
    Restrict,
    Cascade,
}

/// `DROP TABLE` and friends.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DropStmt {
    /// Object kind.
    pub remove_type: ObjectType,
    /// Dotted names of the objects.
    pub objects: Vec<Vec<String>>,
    /// Dependent object handling.
    pub behavior: DropBehavior,
    /// `IF EXISTS`.
    pub missing_ok: bool,
    /// `CONCURRENTLY`.
    pub concurrent: bool,
}

impl DropStmt {
    pub(super) fn child_nodes(&self) -> Vec<&dyn AstNode> {
        Vec::new()
    }
}

impl fmt::Display for DropStmt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DROP {} ", self.remove_type.as_str())?;
        if self.concurrent {
            f.write_str("CONCURRENTLY ")?;
        }
        if self.missing_ok {
            f.write_str("IF EXISTS ")?;
        }
        for (i, name) in self.objects.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}", QualifiedName(name))?;
        }
        if self.behavior == DropBehavior::Cascade {
            f.write_str(" CASCADE")?;
        }
        Ok(())
    }
}

/// `TRUNCATE`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TruncateStmt {
    /// Tables to empty.
    pub relations: Vec<RangeVar>,
    /// `RESTART IDENTITY`.
    pub restart_seqs: bool,
    /// Dependent table handling.
    pub behavior: DropBehavior,
}

impl TruncateStmt {
    pub(super) fn child_nodes(&self) -> Vec<&dyn AstNode> {
        Children::new().list(&self.relations).finish()
    }
}

impl fmt::Display for TruncateStmt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TRUNCATE {}", comma(&self.relations))?;
        if self.restart_seqs {
            f.write_str(" RESTART IDENTITY")?;
        }
        if self.behavior == DropBehavior::Cascade {
            f.write_str(" CASCADE")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{AConst, AExpr, BoolExpr, ColumnRef};

    fn column(name: &str, ty: &str, constraints: Vec<Constraint>) -> Node {
        ColumnDef {
            colname: name.into(),
            type_name: TypeName::system(ty),
            constraints,
            collation: Vec::new(),
        }
        .into()
    }

    #[test]
    fn test_create_table() {
        let mut default = Constraint::new(ConstrType::Default);
        default.raw_expr = Some(AConst::integer(0).into());
        let mut fk = Constraint::new(ConstrType::Foreign);
        fk.conname = Some("fk_owner".into());
        fk.fk_attrs = vec!["owner".into()];
        fk.pktable = Some(RangeVar::new("users"));
        fk.pk_attrs = vec!["id".into()];
        fk.fk_del_action = FkAction::Cascade;
        let mut rel = RangeVar::new("t");
        rel.relpersistence = RelPersistence::Temp;
        let stmt = CreateStmt {
            relation: rel,
            table_elts: vec![
                column("id", "int4", vec![Constraint::new(ConstrType::Primary)]),
                column("n", "int8", vec![Constraint::new(ConstrType::NotNull), default]),
                fk.into(),
            ],
            if_not_exists: true,
        };
        assert_eq!(
            stmt.to_string(),
            "CREATE TEMPORARY TABLE IF NOT EXISTS t (id integer PRIMARY KEY, \
             n bigint NOT NULL DEFAULT 0, CONSTRAINT fk_owner FOREIGN KEY (owner) \
             REFERENCES users (id) ON DELETE CASCADE)"
        );
    }

    #[test]
    fn test_default_parenthesizes_loose_expressions() {
        let mut default = Constraint::new(ConstrType::Default);
        let col = ColumnRef::new(vec!["x".into()]);
        default.raw_expr = Some(BoolExpr::not(col.clone().into()).into());
        assert_eq!(default.to_string(), "DEFAULT (NOT x)");
        default.raw_expr = Some(AExpr::op("=", col.into(), AConst::integer(1).into()).into());
        assert_eq!(default.to_string(), "DEFAULT x = 1");
    }

    #[test]
    fn test_drop_and_truncate() {
        let drop = DropStmt {
            remove_type: ObjectType::Index,
            objects: vec![vec!["s".into(), "i".into()], vec!["j".into()]],
            behavior: DropBehavior::Cascade,
            missing_ok: true,
            concurrent: true,
        };
        assert_eq!(drop.to_string(), "DROP INDEX CONCURRENTLY IF EXISTS s.i, j CASCADE");
        let truncate = TruncateStmt {
            relations: vec![RangeVar::new("a"), RangeVar::new("b")],
            restart_seqs: true,
            behavior: DropBehavior::Restrict,
        };
        assert_eq!(truncate.to_string(), "TRUNCATE a, b RESTART IDENTITY");
    }
}
