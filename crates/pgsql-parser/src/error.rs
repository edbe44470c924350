//! Fatal error types.
//!
//! Lexical and syntax problems are reported through
//! [`ErrorSaveContext`](crate::diagnostics::ErrorSaveContext) and never show
//! up here. These variants cover faults that stop work altogether.

use crate::ast::NodeTag;

/// Errors that abort an operation.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Reading the SQL source failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The SQL source is not valid UTF-8.
    #[error("invalid byte sequence for encoding \"UTF8\": {0}")]
    Encoding(#[from] std::string::FromUtf8Error),

    /// A node was copied from a node of another concrete variant.
    #[error("cannot copy {found} into {expected}")]
    TagMismatch {
        /// Tag of the destination node.
        expected: NodeTag,
        /// Tag of the source node.
        found: NodeTag,
    },
}

/// Result type for fallible crate operations.
pub type Result<T> = std::result::Result<T, Error>;
