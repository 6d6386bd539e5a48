//! Tree snapshot fingerprints
//!
//! Provides [`TreeFingerprint`], a Blake3 digest over the structure of a tree.
//! Two snapshots with the same names, kinds and order share a fingerprint.

use std::fmt::{self, Display, Formatter};

use crate::node::{NodeKind, TreeNode};

/// A 32-byte Blake3 digest of a tree snapshot
///
/// Immutable and cheap to clone (Copy).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct TreeFingerprint([u8; 32]);

impl TreeFingerprint {
    /// Fingerprint a root sequence
    #[must_use]
    pub fn of(tree: &[TreeNode]) -> Self {
        let mut hasher = blake3::Hasher::new();
        feed_level(&mut hasher, tree);
        Self(*hasher.finalize().as_bytes())
    }

    #[inline]
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Short string representation (first 16 hex chars)
    #[inline]
    #[must_use]
    pub fn short(&self) -> String {
        hex::encode(&self.0[..8])
    }
}

// Length prefixes keep `["ab"]` and `["a", "b"]` apart.
fn feed_level(hasher: &mut blake3::Hasher, level: &[TreeNode]) {
    hasher.update(&(level.len() as u64).to_le_bytes());
    for node in level {
        let tag: u8 = match node.kind() {
            NodeKind::File => 0,
            NodeKind::Directory => 1,
        };
        hasher.update(&[tag]);
        hasher.update(&(node.name().len() as u64).to_le_bytes());
        hasher.update(node.name().as_bytes());
        feed_level(hasher, node.children());
    }
}

impl Display for TreeFingerprint {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode(self.0))
    }
}
