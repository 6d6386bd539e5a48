//! Console state snapshot
//!
//! A [`ConsoleState`] is never mutated in place. The reducer builds a new
//! snapshot per action; the tree is shared behind an `Arc` and the unsaved
//! maps and review files are persistent collections, so copies are cheap.

use std::sync::Arc;

use cadm_mappings::{has_unsaved_changes, MappingsModel, UnsavedChanges};
use cadm_promotion::{PromotionSession, PublishRequest, ReviewBasis};
use cadm_tree::{is_directory, resolve, TreeNode};
use cadm_version::VersionRegistry;

use crate::config::{ConsoleConfig, DEFAULT_MAPPINGS_LABEL};

/// Result of asking whether it is safe to navigate away
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigationGuard {
    Clean,
    /// Unsaved entries that navigation would discard
    Dirty { keys: Vec<String> },
}

impl NavigationGuard {
    #[inline]
    #[must_use]
    pub fn is_clean(&self) -> bool {
        matches!(self, Self::Clean)
    }
}

/// Immutable console snapshot
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsoleState {
    pub(crate) tree: Arc<[TreeNode]>,
    /// Version the loaded tree was fetched for, when one was known
    pub(crate) tree_version: Option<String>,
    pub(crate) versions: VersionRegistry,
    pub(crate) mappings: MappingsModel,
    pub(crate) mappings_draft: Option<String>,
    pub(crate) mappings_label: String,
    pub(crate) unsaved_rules: UnsavedChanges,
    pub(crate) unsaved_handlers: UnsavedChanges,
    pub(crate) promotion: PromotionSession,
    pub(crate) pending_publish: Option<PublishRequest>,
    pub(crate) selected_path: Option<String>,
}

impl Default for ConsoleState {
    fn default() -> Self {
        Self {
            tree: Arc::from(Vec::new()),
            tree_version: None,
            versions: VersionRegistry::default(),
            mappings: MappingsModel::default(),
            mappings_draft: None,
            mappings_label: DEFAULT_MAPPINGS_LABEL.to_string(),
            unsaved_rules: UnsavedChanges::new(),
            unsaved_handlers: UnsavedChanges::new(),
            promotion: PromotionSession::new(),
            pending_publish: None,
            selected_path: None,
        }
    }
}

impl ConsoleState {
    /// Empty state honoring `config`
    #[must_use]
    pub fn new(config: &ConsoleConfig) -> Self {
        Self {
            mappings_label: config.mappings_label.clone(),
            ..Self::default()
        }
    }

    /// Top-level tree nodes; empty when no tree is available
    #[inline]
    #[must_use]
    pub fn tree(&self) -> &[TreeNode] {
        &self.tree
    }

    #[inline]
    #[must_use]
    pub fn tree_version(&self) -> Option<&str> {
        self.tree_version.as_deref()
    }

    #[inline]
    #[must_use]
    pub fn versions(&self) -> &VersionRegistry {
        &self.versions
    }

    #[inline]
    #[must_use]
    pub fn mappings(&self) -> &MappingsModel {
        &self.mappings
    }

    /// Unsaved mappings editor text
    #[inline]
    #[must_use]
    pub fn mappings_draft(&self) -> Option<&str> {
        self.mappings_draft.as_deref()
    }

    #[inline]
    #[must_use]
    pub fn mappings_label(&self) -> &str {
        &self.mappings_label
    }

    #[inline]
    #[must_use]
    pub fn unsaved_rules(&self) -> &UnsavedChanges {
        &self.unsaved_rules
    }

    #[inline]
    #[must_use]
    pub fn unsaved_handlers(&self) -> &UnsavedChanges {
        &self.unsaved_handlers
    }

    #[inline]
    #[must_use]
    pub fn promotion(&self) -> &PromotionSession {
        &self.promotion
    }

    /// Request frozen by the last accepted publish, until completed or failed
    #[inline]
    #[must_use]
    pub fn pending_publish(&self) -> Option<&PublishRequest> {
        self.pending_publish.as_ref()
    }

    #[inline]
    #[must_use]
    pub fn selected_path(&self) -> Option<&str> {
        self.selected_path.as_deref()
    }

    /// Node at the selected path, if it resolves
    #[must_use]
    pub fn selected_node(&self) -> Option<&TreeNode> {
        self.selected_path
            .as_deref()
            .and_then(|path| resolve(&self.tree, path))
    }

    /// Selected node is a directory (false when nothing resolves)
    #[must_use]
    pub fn selected_is_directory(&self) -> bool {
        is_directory(self.selected_node())
    }

    /// The viewed version is the newest one (or nothing is pinned)
    #[inline]
    #[must_use]
    pub fn is_latest_selected(&self) -> bool {
        self.versions.is_latest_selected()
    }

    /// Any rule, handler or mappings edit not yet saved
    #[must_use]
    pub fn has_unsaved_changes(&self) -> bool {
        has_unsaved_changes(&self.unsaved_rules, &self.unsaved_handlers)
            || self.mappings_draft.is_some()
    }

    /// Snapshot identity for the open review's staged version
    #[must_use]
    pub fn review_basis(&self) -> ReviewBasis {
        self.basis_for(self.promotion.staged_version())
    }

    /// Snapshot identity for a review of `staged`
    ///
    /// The tree only counts when it is the staged version's tree.
    #[must_use]
    pub fn basis_for(&self, staged: &str) -> ReviewBasis {
        if self.tree_version.as_deref() == Some(staged) {
            ReviewBasis::capture(self.versions.len(), &self.tree)
        } else {
            ReviewBasis::versions_only(self.versions.len())
        }
    }

    /// Open review no longer matches the snapshot and must be re-opened
    #[must_use]
    pub fn is_review_stale(&self) -> bool {
        self.promotion.is_reviewing() && self.promotion.is_stale(&self.review_basis())
    }

    /// Same snapshot as `other`, comparing the shared tree by pointer
    #[must_use]
    pub fn is_same_snapshot(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.tree, &other.tree)
            && self.tree_version == other.tree_version
            && self.selected_path == other.selected_path
            && self.mappings_draft == other.mappings_draft
            && self.promotion == other.promotion
            && self.pending_publish == other.pending_publish
            && self.unsaved_rules == other.unsaved_rules
            && self.unsaved_handlers == other.unsaved_handlers
            && self.versions == other.versions
            && self.mappings == other.mappings
            && self.mappings_label == other.mappings_label
    }

    /// Unsaved keys a navigation would discard
    #[must_use]
    pub fn navigation_guard(&self) -> NavigationGuard {
        let mut keys: Vec<String> = self
            .unsaved_rules
            .keys()
            .map(|id| format!("rule:{id}"))
            .chain(self.unsaved_handlers.keys().map(|id| format!("handler:{id}")))
            .collect();
        if self.mappings_draft.is_some() {
            keys.push(self.mappings_label.clone());
        }

        if keys.is_empty() {
            NavigationGuard::Clean
        } else {
            NavigationGuard::Dirty { keys }
        }
    }
}
