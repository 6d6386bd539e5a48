//! Per-file review state and approval progress

use std::fmt::{self, Display, Formatter};

use serde::{Deserialize, Serialize};

/// Review state of one changed file
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromotionFileState {
    pub path: String,
    pub approved: bool,
    pub has_conflict: bool,
}

impl PromotionFileState {
    #[inline]
    #[must_use]
    pub fn new(path: impl Into<String>, has_conflict: bool) -> Self {
        Self {
            path: path.into(),
            approved: false,
            has_conflict,
        }
    }

    /// Approved and free of conflicts
    #[inline]
    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.approved && !self.has_conflict
    }
}

/// Approval progress for display ("3 of 7 approved")
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ApprovalProgress {
    pub approved: usize,
    pub total: usize,
}

impl ApprovalProgress {
    #[inline]
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.approved == self.total
    }
}

impl Display for ApprovalProgress {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{} of {} approved", self.approved, self.total)
    }
}
