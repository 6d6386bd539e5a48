//! Promotion review session
//!
//! Provides [`PromotionSession`], an immutable value: every operation returns a
//! new session and leaves the receiver untouched. The file list is an
//! `im::Vector`, so these copies share structure.

use std::collections::HashMap;

use im::Vector;

use crate::diff::{PromotionDiff, PublishRequest, ReviewBasis};
use crate::error::PromotionError;
use crate::file_state::{ApprovalProgress, PromotionFileState};
use crate::state::{validate_transition, ReviewState};

/// Per-file review state for one staged/published promotion
///
/// # Invariants
/// - `files` holds one entry per distinct changed path, in diff order
/// - `current_selection`, when set, names an entry of `files`
/// - `files` is empty outside `Reviewing` and `Publishing`
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PromotionSession {
    state: ReviewState,
    files: Vector<PromotionFileState>,
    current_selection: Option<String>,
    staged_version: String,
    published_version: String,
    basis: Option<ReviewBasis>,
    stale: bool,
}

impl PromotionSession {
    /// Idle session with no review
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a review from a server diff
    ///
    /// Every changed path starts unapproved. A path listed twice keeps its
    /// first position and is conflicted if any listing was.
    ///
    /// # Errors
    /// Returns [`PromotionError::InvalidTransition`] unless the session is idle.
    pub fn open_review(
        &self,
        diff: PromotionDiff,
        basis: ReviewBasis,
    ) -> Result<Self, PromotionError> {
        validate_transition(self.state, ReviewState::Reviewing)?;

        let mut files: Vector<PromotionFileState> = Vector::new();
        let mut positions: HashMap<String, usize> = HashMap::new();
        for entry in diff.entries {
            if let Some(&idx) = positions.get(&entry.path) {
                if let Some(existing) = files.get_mut(idx) {
                    existing.has_conflict |= entry.has_conflict;
                }
                continue;
            }
            positions.insert(entry.path.clone(), files.len());
            files.push_back(PromotionFileState::new(entry.path, entry.has_conflict));
        }

        tracing::info!(
            staged = %diff.staged_version,
            published = %diff.published_version,
            files = files.len(),
            conflicts = files.iter().filter(|f| f.has_conflict).count(),
            "promotion review opened"
        );

        Ok(Self {
            state: ReviewState::Reviewing,
            files,
            current_selection: None,
            staged_version: diff.staged_version,
            published_version: diff.published_version,
            basis: Some(basis),
            stale: false,
        })
    }

    #[inline]
    #[must_use]
    pub fn state(&self) -> ReviewState {
        self.state
    }

    #[inline]
    #[must_use]
    pub fn is_reviewing(&self) -> bool {
        self.state == ReviewState::Reviewing
    }

    #[inline]
    #[must_use]
    pub fn is_publishing(&self) -> bool {
        self.state == ReviewState::Publishing
    }

    #[inline]
    pub fn files(&self) -> impl Iterator<Item = &PromotionFileState> {
        self.files.iter()
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.files.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    #[inline]
    #[must_use]
    pub fn file(&self, path: &str) -> Option<&PromotionFileState> {
        self.files.iter().find(|f| f.path == path)
    }

    #[inline]
    #[must_use]
    pub fn staged_version(&self) -> &str {
        &self.staged_version
    }

    #[inline]
    #[must_use]
    pub fn published_version(&self) -> &str {
        &self.published_version
    }

    /// Basis captured when the review opened
    #[inline]
    #[must_use]
    pub fn basis(&self) -> Option<&ReviewBasis> {
        self.basis.as_ref()
    }

    #[inline]
    #[must_use]
    pub fn current_selection(&self) -> Option<&str> {
        self.current_selection.as_deref()
    }

    /// Entry for the focused path, `None` if unset or no longer in the review
    #[must_use]
    pub fn current_selection_file(&self) -> Option<&PromotionFileState> {
        self.current_selection().and_then(|path| self.file(path))
    }

    /// Number of approved entries
    #[must_use]
    pub fn approval_count(&self) -> usize {
        self.files.iter().filter(|f| f.approved).count()
    }

    #[must_use]
    pub fn conflict_count(&self) -> usize {
        self.files.iter().filter(|f| f.has_conflict).count()
    }

    #[must_use]
    pub fn progress(&self) -> ApprovalProgress {
        ApprovalProgress {
            approved: self.approval_count(),
            total: self.files.len(),
        }
    }

    /// Paths still carrying a conflict, in review order
    #[must_use]
    pub fn conflicted_paths(&self) -> Vec<String> {
        self.files
            .iter()
            .filter(|f| f.has_conflict)
            .map(|f| f.path.clone())
            .collect()
    }

    /// Reviewing, non-empty, every entry approved and conflict-free
    #[must_use]
    pub fn is_ready_to_publish(&self) -> bool {
        self.is_reviewing() && !self.files.is_empty() && self.files.iter().all(PromotionFileState::is_ready)
    }

    /// Already invalidated by a snapshot change, or `current` conflicts with
    /// the basis the review opened with
    #[must_use]
    pub fn is_stale(&self, current: &ReviewBasis) -> bool {
        self.stale
            || self
                .basis
                .as_ref()
                .is_some_and(|opened| opened.conflicts_with(current))
    }

    /// Invalidated by an earlier [`observe`](Self::observe); only re-opening clears it
    #[inline]
    #[must_use]
    pub fn is_invalidated(&self) -> bool {
        self.stale
    }

    /// Check a new console snapshot against the review
    ///
    /// A conflicting snapshot invalidates the review for good; returning to
    /// the old snapshot does not revive it. A review opened before the staged
    /// tree was loaded adopts the first staged fingerprint it sees.
    #[must_use]
    pub fn observe(&self, current: &ReviewBasis) -> Self {
        let Some(opened) = self.basis.as_ref().filter(|_| self.is_reviewing() && !self.stale) else {
            return self.clone();
        };

        if opened.conflicts_with(current) {
            tracing::warn!(
                staged = %self.staged_version,
                %opened,
                %current,
                "snapshot changed under review; review invalidated"
            );
            return Self {
                stale: true,
                ..self.clone()
            };
        }

        if opened.staged_tree.is_none() && current.staged_tree.is_some() {
            return Self {
                basis: Some(current.clone()),
                ..self.clone()
            };
        }
        self.clone()
    }

    /// Mark `path` approved; idempotent
    #[must_use]
    pub fn approve(&self, path: &str) -> Self {
        self.update_file(path, "approve", |file| file.approved = true)
    }

    /// Mark `path` unapproved; idempotent
    #[must_use]
    pub fn unapprove(&self, path: &str) -> Self {
        self.update_file(path, "unapprove", |file| file.approved = false)
    }

    /// Record a manual conflict resolution
    ///
    /// Clears the conflict and withdraws any approval, since the content the
    /// approval was given for has changed.
    #[must_use]
    pub fn resolve_conflict(&self, path: &str) -> Self {
        self.update_file(path, "resolve conflict", |file| {
            file.has_conflict = false;
            file.approved = false;
        })
    }

    /// Focus `path`; an unknown path leaves the selection as it was
    #[must_use]
    pub fn select(&self, path: &str) -> Self {
        if self.file(path).is_none() {
            tracing::warn!(path, "cannot focus path outside the review");
            return self.clone();
        }
        Self {
            current_selection: Some(path.to_string()),
            ..self.clone()
        }
    }

    #[must_use]
    pub fn clear_selection(&self) -> Self {
        Self {
            current_selection: None,
            ..self.clone()
        }
    }

    /// Abandon the review, discarding every file state
    ///
    /// # Errors
    /// Returns [`PromotionError::InvalidTransition`] unless reviewing.
    pub fn cancel(&self) -> Result<Self, PromotionError> {
        validate_transition(self.state, ReviewState::Cancelled)?;
        tracing::info!(staged = %self.staged_version, "promotion review cancelled");
        Ok(Self {
            state: ReviewState::Cancelled,
            files: Vector::new(),
            current_selection: None,
            basis: None,
            stale: false,
            ..self.clone()
        })
    }

    /// Accept the review for publishing
    ///
    /// Checks, in order: a review is open, `current` still matches the basis,
    /// no conflicts remain, the review is non-empty, every entry is approved.
    /// On success the returned session is `Publishing` and the request lists
    /// every path in review order.
    ///
    /// # Errors
    /// - [`PromotionError::NoActiveReview`] when idle or cancelled
    /// - [`PromotionError::InvalidTransition`] when already publishing
    /// - [`PromotionError::StaleReview`] when `current` differs from the basis
    /// - [`PromotionError::ConflictsOutstanding`] regardless of approvals
    /// - [`PromotionError::NothingToPublish`] for an empty diff
    /// - [`PromotionError::NotAllApproved`] otherwise
    pub fn publish(&self, current: &ReviewBasis) -> Result<(Self, PublishRequest), PromotionError> {
        match self.state {
            ReviewState::Idle | ReviewState::Cancelled => return Err(PromotionError::NoActiveReview),
            ReviewState::Publishing | ReviewState::Reviewing => {
                validate_transition(self.state, ReviewState::Publishing)?;
            }
        }

        if self.is_stale(current) {
            return Err(PromotionError::StaleReview {
                opened: self.basis.clone().unwrap_or_else(|| current.clone()),
                current: current.clone(),
            });
        }

        let conflicts = self.conflicted_paths();
        if !conflicts.is_empty() {
            return Err(PromotionError::ConflictsOutstanding { paths: conflicts });
        }

        if self.files.is_empty() {
            return Err(PromotionError::NothingToPublish);
        }

        let progress = self.progress();
        if !progress.is_complete() {
            return Err(PromotionError::NotAllApproved {
                approved: progress.approved,
                total: progress.total,
            });
        }

        let request = PublishRequest {
            staged_version: self.staged_version.clone(),
            published_version: self.published_version.clone(),
            paths: self.files.iter().map(|f| f.path.clone()).collect(),
        };
        tracing::info!(
            staged = %request.staged_version,
            files = request.paths.len(),
            "promotion accepted for publishing"
        );

        Ok((
            Self {
                state: ReviewState::Publishing,
                ..self.clone()
            },
            request,
        ))
    }

    fn update_file(&self, path: &str, op: &str, f: impl FnOnce(&mut PromotionFileState)) -> Self {
        if !self.is_reviewing() {
            tracing::warn!(path, op, state = ?self.state, "ignored: no review in progress");
            return self.clone();
        }
        let Some(idx) = self.files.iter().position(|file| file.path == path) else {
            tracing::warn!(path, op, "ignored: path not in review");
            return self.clone();
        };

        let mut files = self.files.clone();
        if let Some(file) = files.get_mut(idx) {
            f(file);
        }
        Self {
            files,
            ..self.clone()
        }
    }
}
