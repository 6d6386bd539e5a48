//! Inputs and outputs of a review
//!
//! [`PromotionDiff`] is what the server reports for a staged/published pair;
//! [`PublishRequest`] is the all-or-nothing request sent back.

use std::fmt::{self, Display, Formatter};

use cadm_tree::{TreeFingerprint, TreeNode};
use serde::{Deserialize, Serialize};

/// One changed path in a staged/published diff
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiffEntry {
    pub path: String,
    /// Published-side content changed since staging began
    #[serde(default)]
    pub has_conflict: bool,
}

impl DiffEntry {
    #[inline]
    #[must_use]
    pub fn new(path: impl Into<String>, has_conflict: bool) -> Self {
        Self {
            path: path.into(),
            has_conflict,
        }
    }
}

/// Ordered changed paths between a staged and the published version
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromotionDiff {
    pub staged_version: String,
    pub published_version: String,
    #[serde(default)]
    pub entries: Vec<DiffEntry>,
}

impl PromotionDiff {
    #[inline]
    #[must_use]
    pub fn new(
        staged_version: impl Into<String>,
        published_version: impl Into<String>,
        entries: Vec<DiffEntry>,
    ) -> Self {
        Self {
            staged_version: staged_version.into(),
            published_version: published_version.into(),
            entries,
        }
    }
}

/// Identity of the console snapshot a review was computed against
///
/// `staged_tree` is the fingerprint of the staged version's tree, present only
/// when that tree was the one loaded. Two bases conflict when the version list
/// changed size, or both carry a staged fingerprint and they differ; browsing
/// another version's tree never conflicts.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ReviewBasis {
    pub version_count: usize,
    pub staged_tree: Option<TreeFingerprint>,
}

impl ReviewBasis {
    /// Basis with the staged version's tree loaded
    #[inline]
    #[must_use]
    pub fn capture(version_count: usize, staged_tree: &[TreeNode]) -> Self {
        Self {
            version_count,
            staged_tree: Some(TreeFingerprint::of(staged_tree)),
        }
    }

    /// Basis while some other version's tree is loaded
    #[inline]
    #[must_use]
    pub fn versions_only(version_count: usize) -> Self {
        Self {
            version_count,
            staged_tree: None,
        }
    }

    /// The snapshot moved under a review opened against `self`
    #[must_use]
    pub fn conflicts_with(&self, current: &Self) -> bool {
        if self.version_count != current.version_count {
            return true;
        }
        matches!(
            (&self.staged_tree, &current.staged_tree),
            (Some(opened), Some(now)) if opened != now
        )
    }
}

impl Display for ReviewBasis {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match &self.staged_tree {
            Some(tree) => write!(f, "{} versions, staged tree {}", self.version_count, tree.short()),
            None => write!(f, "{} versions, staged tree not loaded", self.version_count),
        }
    }
}

/// Publish submission: every reviewed path, all approved and conflict-free
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublishRequest {
    pub staged_version: String,
    pub published_version: String,
    pub paths: Vec<String>,
}
