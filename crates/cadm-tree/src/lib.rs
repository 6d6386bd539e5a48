//! Config Admin Tree
//!
//! Immutable snapshots of the configuration file tree and slash-path resolution.
//!
//! # Core Concepts
//!
//! - [`TreeNode`]: A named file or directory; directories own ordered children
//! - [`ConfigPath`]: Parsed slash-separated path (`docs/guide.yaml`)
//! - [`resolve`]: Walks a path from the root sequence, short-circuiting on the first miss
//! - [`TreeFingerprint`]: Blake3 digest of a snapshot, used to detect replaced trees
//!
//! # Example
//!
//! ```rust
//! use cadm_tree::{resolve, is_directory, TreeNode};
//!
//! let tree = vec![
//!     TreeNode::directory("docs", vec![TreeNode::file("guide.yaml")]),
//!     TreeNode::file("README.yaml"),
//! ];
//!
//! assert!(resolve(&tree, "docs/guide.yaml").is_some());
//! assert!(resolve(&tree, "README.yaml/x").is_none());
//! assert!(is_directory(resolve(&tree, "/docs")));
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

mod edit;
mod error;
mod fingerprint;
mod node;
mod path;
mod resolve;

pub use edit::{with_file, without_path};
pub use error::TreeError;
pub use fingerprint::TreeFingerprint;
pub use node::{file_paths, validate_tree, NodeKind, TreeNode};
pub use path::{ConfigPath, PathError, SEPARATOR};
pub use resolve::{is_directory, resolve, resolve_path, resolve_required};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
