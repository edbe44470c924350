//! Abstract Syntax Tree (AST) types for SQL statements.
//!
//! Every node kind is a struct wrapped by one variant of the closed [`Node`]
//! enum. Each kind reports a [`NodeTag`] whose name is `T_` followed by the
//! kind name, renders back to SQL through `Display`, and lists its direct
//! children for traversal with [`walk`].

mod clause;
mod ddl;
mod expression;
mod format;
mod statement;
mod types;
mod value;

use std::fmt;

pub use clause::{
    Alias, CommonTableExpr, CteMaterialize, IndexElem, InferClause, JoinExpr, JoinType,
    LockStrength, LockWaitPolicy, LockingClause, OnConflictAction, OnConflictClause,
    RangeFunction, RangeSubselect, RangeVar, RelPersistence, ResTarget, SortBy, SortByDir,
    SortByNulls, WithClause,
};
pub use ddl::{
    ColumnDef, ConstrType, Constraint, CreateStmt, DropBehavior, DropStmt, FkAction, IndexStmt,
    ObjectType, TruncateStmt, ViewStmt,
};
pub use expression::{
    AArrayExpr, AConst, AExpr, AExprKind, AIndices, AIndirection, BoolExpr, BoolExprType,
    BoolTestType, BooleanTest, CaseExpr, CaseWhen, CoalesceExpr, CollateClause, ColumnRef,
    ColumnRefField, FrameBound, FrameExclusion, FrameMode, FuncCall, FuncFormat, Indirection,
    List, MinMaxExpr, MinMaxOp, NamedArgExpr, NullTest, NullTestType, ParamRef, RowExpr,
    SetToDefault, SqlValueFunction, SqlValueFunctionOp, SubLink, SubLinkType, TypeCast,
    WindowDef, WindowFrame,
};
pub(crate) use format::prec;
pub use format::{quote_identifier, quote_literal};
pub use statement::{
    DeleteStmt, InsertStmt, IsolationLevel, LimitOption, RawStmt, SelectStmt, SetOperation,
    TransactionMode, TransactionStmt, TransactionStmtKind, UpdateStmt, VariableSetKind,
    VariableSetStmt, VariableShowStmt,
};
pub use types::{interval, TypeName};
pub use value::Value;

use crate::error::{Error, Result};

/// Behaviour shared by every node kind.
pub trait AstNode: fmt::Display + fmt::Debug {
    /// Returns the kind tag.
    fn tag(&self) -> NodeTag;

    /// Returns the direct children in source order.
    fn children(&self) -> Vec<&dyn AstNode>;

    /// Renders the node as SQL text.
    fn render(&self) -> String {
        self.to_string()
    }
}

/// Visits `node` and then its descendants, depth first.
pub fn walk<'n>(node: &'n dyn AstNode, visit: &mut dyn FnMut(&'n dyn AstNode)) {
    visit(node);
    for child in node.children() {
        walk(child, visit);
    }
}

/// Collects child references for [`AstNode::children`].
#[derive(Default)]
pub(crate) struct Children<'a>(Vec<&'a dyn AstNode>);

impl<'a> Children<'a> {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn node(mut self, node: &'a dyn AstNode) -> Self {
        self.0.push(node);
        self
    }

    pub(crate) fn opt<T: AstNode>(mut self, node: &'a Option<T>) -> Self {
        if let Some(node) = node {
            self.0.push(node);
        }
        self
    }

    pub(crate) fn list<T: AstNode>(mut self, nodes: &'a [T]) -> Self {
        self.0.extend(nodes.iter().map(|n| n as &dyn AstNode));
        self
    }

    pub(crate) fn finish(self) -> Vec<&'a dyn AstNode> {
        self.0
    }
}

macro_rules! nodes {
    ($($kind:ident),* $(,)?) => {
        /// Any node of the tree.
        #[derive(Debug, Clone, PartialEq, Eq)]
        pub enum Node {
            $(
                #[allow(missing_docs)]
                $kind(Box<$kind>),
            )*
            /// A literal value.
            Value(Value),
        }

        /// Identifies the kind of a node.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum NodeTag {
            $(
                #[allow(missing_docs)]
                $kind,
            )*
            #[allow(missing_docs)]
            String,
            #[allow(missing_docs)]
            Integer,
            #[allow(missing_docs)]
            Float,
            #[allow(missing_docs)]
            Boolean,
            #[allow(missing_docs)]
            BitString,
            #[allow(missing_docs)]
            Null,
        }

        impl NodeTag {
            /// Returns the tag name, `T_` followed by the kind name.
            #[must_use]
            pub const fn as_str(self) -> &'static str {
                match self {
                    $(Self::$kind => concat!("T_", stringify!($kind)),)*
                    Self::String => "T_String",
                    Self::Integer => "T_Integer",
                    Self::Float => "T_Float",
                    Self::Boolean => "T_Boolean",
                    Self::BitString => "T_BitString",
                    Self::Null => "T_Null",
                }
            }
        }

        impl Node {
            /// Returns the wrapped node as a trait object.
            #[must_use]
            pub fn as_ast(&self) -> &dyn AstNode {
                match self {
                    $(Self::$kind(node) => node.as_ref(),)*
                    Self::Value(value) => value,
                }
            }
        }

        $(
            impl From<$kind> for Node {
                fn from(node: $kind) -> Self {
                    Self::$kind(Box::new(node))
                }
            }

            impl AstNode for $kind {
                fn tag(&self) -> NodeTag {
                    NodeTag::$kind
                }

                fn children(&self) -> Vec<&dyn AstNode> {
                    self.child_nodes()
                }
            }
        )*
    };
}

nodes! {
    RawStmt,
    SelectStmt,
    InsertStmt,
    UpdateStmt,
    DeleteStmt,
    CreateStmt,
    ColumnDef,
    Constraint,
    IndexStmt,
    IndexElem,
    ViewStmt,
    DropStmt,
    TruncateStmt,
    TransactionStmt,
    VariableSetStmt,
    VariableShowStmt,
    ColumnRef,
    ParamRef,
    AConst,
    AExpr,
    BoolExpr,
    NullTest,
    BooleanTest,
    SubLink,
    FuncCall,
    NamedArgExpr,
    WindowDef,
    TypeCast,
    TypeName,
    CollateClause,
    CaseExpr,
    CaseWhen,
    AArrayExpr,
    AIndirection,
    AIndices,
    RowExpr,
    CoalesceExpr,
    MinMaxExpr,
    SqlValueFunction,
    SetToDefault,
    ResTarget,
    SortBy,
    RangeVar,
    Alias,
    RangeSubselect,
    RangeFunction,
    JoinExpr,
    WithClause,
    CommonTableExpr,
    OnConflictClause,
    InferClause,
    LockingClause,
    List,
}

impl fmt::Display for NodeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<Value> for Node {
    fn from(value: Value) -> Self {
        Self::Value(value)
    }
}

impl Node {
    /// Overwrites `self` with a deep copy of `source`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::TagMismatch`] if the two nodes are of different kinds.
    pub fn copy_from(&mut self, source: &Self) -> Result<()> {
        let (expected, found) = (self.tag(), source.tag());
        if expected != found {
            return Err(Error::TagMismatch { expected, found });
        }
        self.clone_from(source);
        Ok(())
    }
}

impl AstNode for Node {
    fn tag(&self) -> NodeTag {
        self.as_ast().tag()
    }

    fn children(&self) -> Vec<&dyn AstNode> {
        self.as_ast().children()
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self.as_ast(), f)
    }
}
