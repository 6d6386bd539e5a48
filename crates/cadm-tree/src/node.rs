//! Tree nodes
//!
//! A configuration tree is an ordered sequence of root [`TreeNode`]s. Nodes are
//! immutable snapshots: edits build a new tree (see [`crate::with_file`]).

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::TreeError;
use crate::path::ConfigPath;

/// Node classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    File,
    Directory,
}

/// File or directory in a configuration tree
///
/// # Invariants
/// - Names are unique within one `children` sequence (see [`validate_tree`])
/// - Only directories carry children; a file's children are always empty
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TreeNode {
    name: String,

    #[serde(rename = "type")]
    kind: NodeKind,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    children: Vec<TreeNode>,
}

impl TreeNode {
    /// Create a file node
    #[inline]
    #[must_use]
    pub fn file(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: NodeKind::File,
            children: Vec::new(),
        }
    }

    /// Create a directory node with ordered children
    #[inline]
    #[must_use]
    pub fn directory(name: impl Into<String>, children: Vec<TreeNode>) -> Self {
        Self {
            name: name.into(),
            kind: NodeKind::Directory,
            children,
        }
    }

    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    #[must_use]
    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    /// Ordered children; empty for files even if the source data carried some
    #[inline]
    #[must_use]
    pub fn children(&self) -> &[TreeNode] {
        match self.kind {
            NodeKind::Directory => &self.children,
            NodeKind::File => &[],
        }
    }

    #[inline]
    #[must_use]
    pub fn is_directory(&self) -> bool {
        self.kind == NodeKind::Directory
    }

    #[inline]
    #[must_use]
    pub fn is_file(&self) -> bool {
        self.kind == NodeKind::File
    }

    /// Find direct child by exact, case-sensitive name
    #[inline]
    #[must_use]
    pub fn child(&self, name: &str) -> Option<&TreeNode> {
        find(self.children(), name)
    }
}

pub(crate) fn find<'a>(level: &'a [TreeNode], name: &str) -> Option<&'a TreeNode> {
    level.iter().find(|node| node.name == name)
}

/// Check the unique-name invariant at every level of the tree
///
/// # Errors
/// Returns [`TreeError::DuplicateName`] for the first repeated name found,
/// walking depth-first in order.
pub fn validate_tree(tree: &[TreeNode]) -> Result<(), TreeError> {
    validate_level(tree, &ConfigPath::root())
}

fn validate_level(level: &[TreeNode], parent: &ConfigPath) -> Result<(), TreeError> {
    let mut seen = HashSet::with_capacity(level.len());
    for node in level {
        if !seen.insert(node.name.as_str()) {
            return Err(TreeError::DuplicateName {
                parent: parent.to_string(),
                name: node.name.clone(),
            });
        }
        validate_level(node.children(), &parent.child(node.name.clone()))?;
    }
    Ok(())
}

/// Full paths of every file node, depth-first in sibling order
#[must_use]
pub fn file_paths(tree: &[TreeNode]) -> Vec<String> {
    let mut out = Vec::new();
    collect_files(tree, &ConfigPath::root(), &mut out);
    out
}

fn collect_files(level: &[TreeNode], parent: &ConfigPath, out: &mut Vec<String>) {
    for node in level {
        let path = parent.child(node.name.clone());
        match node.kind {
            NodeKind::File => out.push(path.to_string()),
            NodeKind::Directory => collect_files(&node.children, &path, out),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sample() -> Vec<TreeNode> {
        vec![
            TreeNode::directory(
                "docs",
                vec![
                    TreeNode::file("guide.yaml"),
                    TreeNode::directory("nested", vec![TreeNode::file("deep.yaml")]),
                ],
            ),
            TreeNode::file("README.yaml"),
        ]
    }

    #[test]
    fn deserializes_server_shape() {
        let yaml = r"
- name: docs
  type: directory
  children:
    - name: guide.yaml
      type: file
- name: README.yaml
  type: file
";
        let tree: Vec<TreeNode> = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(tree[0].kind(), NodeKind::Directory);
        assert_eq!(tree[0].children()[0].name(), "guide.yaml");
        assert!(tree[1].is_file());
    }

    #[test]
    fn file_children_are_hidden() {
        let json = r#"{"name":"odd.yaml","type":"file","children":[{"name":"x","type":"file"}]}"#;
        let node: TreeNode = serde_json::from_str(json).unwrap();
        assert!(node.children().is_empty());
        assert!(node.child("x").is_none());
    }

    #[test]
    fn validate_accepts_unique_names() {
        assert!(validate_tree(&sample()).is_ok());
    }

    #[test]
    fn validate_rejects_nested_duplicates() {
        let tree = vec![TreeNode::directory(
            "docs",
            vec![TreeNode::file("a.yaml"), TreeNode::file("a.yaml")],
        )];
        let err = validate_tree(&tree).unwrap_err();
        assert!(matches!(
            err,
            TreeError::DuplicateName { ref parent, ref name } if parent == "docs" && name == "a.yaml"
        ));
    }

    #[test]
    fn same_name_in_different_directories_is_fine() {
        let tree = vec![
            TreeNode::directory("a", vec![TreeNode::file("x.yaml")]),
            TreeNode::directory("b", vec![TreeNode::file("x.yaml")]),
        ];
        assert!(validate_tree(&tree).is_ok());
    }

    #[test]
    fn file_paths_depth_first() {
        assert_eq!(
            file_paths(&sample()),
            vec!["docs/guide.yaml", "docs/nested/deep.yaml", "README.yaml"]
        );
    }
}
