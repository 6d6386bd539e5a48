//! Error types for tree operations

use crate::path::PathError;

/// Errors from tree lookups, validation and edits
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TreeError {
    /// No node at the path
    #[error("not found: {0}")]
    NotFound(String),

    /// Root path where a node path was required
    #[error("empty path")]
    EmptyPath,

    /// Path could not be parsed
    #[error("invalid path: {0}")]
    InvalidPath(#[from] PathError),

    /// Two siblings share a name
    #[error("duplicate name '{name}' under '{parent}'")]
    DuplicateName { parent: String, name: String },

    /// Target of an insert already exists
    #[error("already exists: {0}")]
    AlreadyExists(String),

    /// An intermediate segment names a file
    #[error("not a directory: {0}")]
    NotADirectory(String),
}
