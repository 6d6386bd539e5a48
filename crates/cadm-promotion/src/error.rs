//! Error types for promotion reviews

use crate::diff::ReviewBasis;
use crate::state::ReviewState;

/// Recoverable outcomes of review operations
///
/// None of these disturb the session they were raised against; callers keep
/// the previous value.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PromotionError {
    /// Operation requires an open review
    #[error("no review in progress")]
    NoActiveReview,

    /// State machine rejected the transition
    #[error("illegal review transition: {from:?} -> {to:?}")]
    InvalidTransition { from: ReviewState, to: ReviewState },

    /// Publish attempted while conflicts are unresolved
    #[error("conflicts outstanding: {}", .paths.join(", "))]
    ConflictsOutstanding { paths: Vec<String> },

    /// Publish attempted before every file was approved
    #[error("not all approved: {approved} of {total}")]
    NotAllApproved { approved: usize, total: usize },

    /// Versions or tree changed since the review opened
    #[error("review is stale: opened against {opened}, now {current}")]
    StaleReview {
        opened: ReviewBasis,
        current: ReviewBasis,
    },

    /// The diff contained no changed paths
    #[error("nothing to publish")]
    NothingToPublish,
}

impl PromotionError {
    /// Stale reviews can only be fixed by re-opening, not by more approvals
    #[inline]
    #[must_use]
    pub fn requires_refresh(&self) -> bool {
        matches!(self, Self::StaleReview { .. })
    }
}
