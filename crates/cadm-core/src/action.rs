//! Tagged console actions

use cadm_mappings::MappingsModel;
use cadm_promotion::PromotionDiff;
use cadm_tree::TreeNode;
use cadm_version::Version;

/// Everything that can change the console state
///
/// Applied one at a time by [`reduce`](crate::reduce).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsoleAction {
    /// Server tree snapshot for the effective version
    TreeLoaded(Vec<TreeNode>),
    /// Server version list, newest first
    VersionsLoaded(Vec<Version>),
    /// Parsed mappings document from the server
    MappingsLoaded(MappingsModel),
    /// Pin a version, or `None` to follow latest
    SelectVersion(Option<String>),
    /// Navigate the tree
    SelectPath(String),
    ClearSelection,

    EditRule { id: String, content: String },
    DiscardRule(String),
    RuleSaved(String),
    EditHandler { id: String, content: String },
    DiscardHandler(String),
    HandlerSaved(String),

    /// Raw text typed into the mappings editor
    EditMappingsText(String),
    DiscardMappingsText,
    /// Mappings persisted; the draft is gone
    MappingsSaved(MappingsModel),

    OpenReview(PromotionDiff),
    ApproveFile(String),
    UnapproveFile(String),
    FocusFile(String),
    ResolveConflict(String),
    CancelReview,
    /// Freeze the review and compute the publish request
    RequestPublish,
    PublishCompleted,
    /// Server refused the publish; the review is dropped
    PublishFailed,
}

impl ConsoleAction {
    /// Action tag for logs and observers
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::TreeLoaded(_) => "tree_loaded",
            Self::VersionsLoaded(_) => "versions_loaded",
            Self::MappingsLoaded(_) => "mappings_loaded",
            Self::SelectVersion(_) => "select_version",
            Self::SelectPath(_) => "select_path",
            Self::ClearSelection => "clear_selection",
            Self::EditRule { .. } => "edit_rule",
            Self::DiscardRule(_) => "discard_rule",
            Self::RuleSaved(_) => "rule_saved",
            Self::EditHandler { .. } => "edit_handler",
            Self::DiscardHandler(_) => "discard_handler",
            Self::HandlerSaved(_) => "handler_saved",
            Self::EditMappingsText(_) => "edit_mappings_text",
            Self::DiscardMappingsText => "discard_mappings_text",
            Self::MappingsSaved(_) => "mappings_saved",
            Self::OpenReview(_) => "open_review",
            Self::ApproveFile(_) => "approve_file",
            Self::UnapproveFile(_) => "unapprove_file",
            Self::FocusFile(_) => "focus_file",
            Self::ResolveConflict(_) => "resolve_conflict",
            Self::CancelReview => "cancel_review",
            Self::RequestPublish => "request_publish",
            Self::PublishCompleted => "publish_completed",
            Self::PublishFailed => "publish_failed",
        }
    }

    /// Server snapshot replacing part of the state wholesale
    #[inline]
    #[must_use]
    pub fn is_snapshot(&self) -> bool {
        matches!(
            self,
            Self::TreeLoaded(_) | Self::VersionsLoaded(_) | Self::MappingsLoaded(_)
        )
    }
}
