//! Copy-on-write tree edits
//!
//! Edits never touch the input slice. Untouched siblings are cloned into the
//! new tree; trees are small enough that sharing is not worth the indirection.

use crate::error::TreeError;
use crate::node::TreeNode;
use crate::path::ConfigPath;

/// Return a new tree with a file added at `path`
///
/// Missing intermediate directories are created.
///
/// # Errors
/// - [`TreeError::EmptyPath`] / [`TreeError::InvalidPath`] for unusable paths
/// - [`TreeError::AlreadyExists`] if a node already sits at `path`
/// - [`TreeError::NotADirectory`] if an intermediate segment is a file
pub fn with_file(tree: &[TreeNode], path: &str) -> Result<Vec<TreeNode>, TreeError> {
    let parsed = parse_node_path(path)?;
    insert(tree, parsed.segments(), &parsed)
}

/// Return a new tree without the node at `path` (and its subtree)
///
/// # Errors
/// - [`TreeError::NotFound`] if nothing sits at `path`
/// - [`TreeError::EmptyPath`] / [`TreeError::InvalidPath`] for unusable paths
pub fn without_path(tree: &[TreeNode], path: &str) -> Result<Vec<TreeNode>, TreeError> {
    let parsed = parse_node_path(path)?;
    remove(tree, parsed.segments(), &parsed)
}

fn parse_node_path(path: &str) -> Result<ConfigPath, TreeError> {
    let parsed: ConfigPath = path.parse()?;
    if parsed.is_empty() {
        return Err(TreeError::EmptyPath);
    }
    Ok(parsed)
}

fn insert(
    level: &[TreeNode],
    segments: &[String],
    full: &ConfigPath,
) -> Result<Vec<TreeNode>, TreeError> {
    let Some((head, rest)) = segments.split_first() else {
        return Ok(level.to_vec());
    };

    let mut out = level.to_vec();
    match out.iter().position(|node| node.name() == head) {
        Some(_) if rest.is_empty() => return Err(TreeError::AlreadyExists(full.to_string())),
        Some(idx) => {
            let existing = &out[idx];
            if existing.is_file() {
                return Err(TreeError::NotADirectory(full.to_string()));
            }
            let children = insert(existing.children(), rest, full)?;
            out[idx] = TreeNode::directory(head.clone(), children);
        }
        None if rest.is_empty() => out.push(TreeNode::file(head.clone())),
        None => {
            let children = insert(&[], rest, full)?;
            out.push(TreeNode::directory(head.clone(), children));
        }
    }
    Ok(out)
}

fn remove(
    level: &[TreeNode],
    segments: &[String],
    full: &ConfigPath,
) -> Result<Vec<TreeNode>, TreeError> {
    let not_found = || TreeError::NotFound(full.to_string());
    let (head, rest) = segments.split_first().ok_or_else(not_found)?;
    let idx = level
        .iter()
        .position(|node| node.name() == head)
        .ok_or_else(not_found)?;

    let mut out = level.to_vec();
    if rest.is_empty() {
        out.remove(idx);
    } else {
        let children = remove(level[idx].children(), rest, full)?;
        out[idx] = TreeNode::directory(head.clone(), children);
    }
    Ok(out)
}
