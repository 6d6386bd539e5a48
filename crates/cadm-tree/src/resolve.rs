//! Path resolution against a tree snapshot

use crate::error::TreeError;
use crate::node::{find, TreeNode};
use crate::path::ConfigPath;

/// Resolve a slash-separated path against the root sequence
///
/// One leading separator is stripped, the rest is split into segments and
/// walked from the root. The first segment without an exact, case-sensitive
/// match ends the walk. Segments below a file never match.
///
/// Returns `None` for the empty path and for malformed paths (`a//b`); a miss
/// is an ordinary outcome, not an error.
#[must_use]
pub fn resolve<'a>(tree: &'a [TreeNode], path: &str) -> Option<&'a TreeNode> {
    let parsed = path.parse::<ConfigPath>().ok()?;
    resolve_path(tree, &parsed)
}

/// Resolve an already parsed path
#[must_use]
pub fn resolve_path<'a>(tree: &'a [TreeNode], path: &ConfigPath) -> Option<&'a TreeNode> {
    let (last, init) = path.segments().split_last()?;
    let mut level = tree;
    for segment in init {
        level = find(level, segment)?.children();
    }
    find(level, last)
}

/// Like [`resolve`], but reports a miss as [`TreeError::NotFound`]
///
/// # Errors
/// Returns [`TreeError::NotFound`] when no node matches.
pub fn resolve_required<'a>(tree: &'a [TreeNode], path: &str) -> Result<&'a TreeNode, TreeError> {
    resolve(tree, path).ok_or_else(|| TreeError::NotFound(path.to_string()))
}

/// True iff the node exists and is a directory
#[inline]
#[must_use]
pub fn is_directory(node: Option<&TreeNode>) -> bool {
    node.is_some_and(TreeNode::is_directory)
}
