//! Review state machine

use serde::{Deserialize, Serialize};

use crate::error::PromotionError;

/// Lifecycle of a promotion review
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReviewState {
    #[default]
    Idle,
    Reviewing,
    /// Terminal: the publish request was accepted and handed to the server
    Publishing,
    /// Terminal: the review was abandoned and its file states discarded
    Cancelled,
}

impl ReviewState {
    #[inline]
    #[must_use]
    pub fn is_terminal(self) -> bool {
        allowed_transitions(self).is_empty()
    }
}

#[must_use]
pub fn allowed_transitions(from: ReviewState) -> &'static [ReviewState] {
    use ReviewState::*;
    match from {
        Idle => &[Reviewing],
        Reviewing => &[Publishing, Cancelled],
        Publishing | Cancelled => &[],
    }
}

/// Validates a review state transition.
///
/// # Errors
/// Returns [`PromotionError::InvalidTransition`] when `to` is not reachable from `from`.
pub fn validate_transition(from: ReviewState, to: ReviewState) -> Result<(), PromotionError> {
    if allowed_transitions(from).contains(&to) {
        Ok(())
    } else {
        Err(PromotionError::InvalidTransition { from, to })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn any_state() -> impl Strategy<Value = ReviewState> {
        prop_oneof![
            Just(ReviewState::Idle),
            Just(ReviewState::Reviewing),
            Just(ReviewState::Publishing),
            Just(ReviewState::Cancelled),
        ]
    }

    #[test]
    fn idle_only_opens_review() {
        assert!(validate_transition(ReviewState::Idle, ReviewState::Reviewing).is_ok());
        assert!(validate_transition(ReviewState::Idle, ReviewState::Publishing).is_err());
        assert!(validate_transition(ReviewState::Idle, ReviewState::Cancelled).is_err());
    }

    #[test]
    fn reviewing_ends_in_publish_or_cancel() {
        assert!(validate_transition(ReviewState::Reviewing, ReviewState::Publishing).is_ok());
        assert!(validate_transition(ReviewState::Reviewing, ReviewState::Cancelled).is_ok());
        assert!(validate_transition(ReviewState::Reviewing, ReviewState::Idle).is_err());
    }

    #[test]
    fn terminal_states() {
        assert!(ReviewState::Publishing.is_terminal());
        assert!(ReviewState::Cancelled.is_terminal());
        assert!(!ReviewState::Idle.is_terminal());
        assert!(!ReviewState::Reviewing.is_terminal());
    }

    proptest! {
        #[test]
        fn prop_validate_agrees_with_allowed(from in any_state(), to in any_state()) {
            let ok = validate_transition(from, to).is_ok();
            prop_assert_eq!(ok, allowed_transitions(from).contains(&to));
        }
    }
}
