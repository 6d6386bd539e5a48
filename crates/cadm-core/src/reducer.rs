//! The single state reducer

use std::sync::Arc;

use cadm_promotion::{validate_transition, PromotionSession, ReviewState};
use cadm_tree::{resolve, validate_tree, TreeNode};
use tracing::{debug, info, warn};

use crate::action::ConsoleAction;
use crate::error::ConsoleResult;
use crate::state::ConsoleState;

/// Apply one action, returning the next snapshot
///
/// `state` is never modified. On error the caller keeps `state` as is.
///
/// # Errors
///
/// - `Tree` when a loaded tree has duplicate sibling names
/// - `Promotion` when the review state machine rejects the action, or
///   publish is refused (conflicts, missing approvals, stale review)
pub fn reduce(state: &ConsoleState, action: ConsoleAction) -> ConsoleResult<ConsoleState> {
    debug!(action = action.name(), "reducing");
    let snapshot = action.is_snapshot();

    let next = match action {
        ConsoleAction::TreeLoaded(tree) => load_tree(state, tree)?,
        ConsoleAction::VersionsLoaded(versions) => {
            info!(count = versions.len(), "versions loaded");
            ConsoleState {
                versions: state.versions.with_versions(versions),
                ..state.clone()
            }
        }
        ConsoleAction::MappingsLoaded(mappings) => {
            info!(rules = mappings.len(), "mappings loaded");
            ConsoleState {
                mappings,
                ..state.clone()
            }
        }
        ConsoleAction::SelectVersion(Some(id)) => ConsoleState {
            versions: state.versions.select(id),
            ..state.clone()
        },
        ConsoleAction::SelectVersion(None) => ConsoleState {
            versions: state.versions.track_latest(),
            ..state.clone()
        },
        ConsoleAction::SelectPath(path) => ConsoleState {
            selected_path: Some(path),
            ..state.clone()
        },
        ConsoleAction::ClearSelection => ConsoleState {
            selected_path: None,
            ..state.clone()
        },

        ConsoleAction::EditRule { id, content } => ConsoleState {
            unsaved_rules: state.unsaved_rules.set_content(id, content),
            ..state.clone()
        },
        ConsoleAction::DiscardRule(id) | ConsoleAction::RuleSaved(id) => ConsoleState {
            unsaved_rules: state.unsaved_rules.clear(&id),
            ..state.clone()
        },
        ConsoleAction::EditHandler { id, content } => ConsoleState {
            unsaved_handlers: state.unsaved_handlers.set_content(id, content),
            ..state.clone()
        },
        ConsoleAction::DiscardHandler(id) | ConsoleAction::HandlerSaved(id) => ConsoleState {
            unsaved_handlers: state.unsaved_handlers.clear(&id),
            ..state.clone()
        },

        ConsoleAction::EditMappingsText(text) => ConsoleState {
            mappings_draft: Some(text),
            ..state.clone()
        },
        ConsoleAction::DiscardMappingsText => ConsoleState {
            mappings_draft: None,
            ..state.clone()
        },
        ConsoleAction::MappingsSaved(mappings) => {
            info!(rules = mappings.len(), "mappings saved");
            ConsoleState {
                mappings,
                mappings_draft: None,
                ..state.clone()
            }
        }

        ConsoleAction::OpenReview(diff) => {
            if state.promotion.is_publishing() {
                validate_transition(ReviewState::Publishing, ReviewState::Reviewing)?;
            }
            let basis = state.basis_for(&diff.staged_version);
            let promotion = PromotionSession::new().open_review(diff, basis)?;
            ConsoleState {
                promotion,
                pending_publish: None,
                ..state.clone()
            }
        }
        ConsoleAction::ApproveFile(path) => with_promotion(state, state.promotion.approve(&path)),
        ConsoleAction::UnapproveFile(path) => {
            with_promotion(state, state.promotion.unapprove(&path))
        }
        ConsoleAction::FocusFile(path) => with_promotion(state, state.promotion.select(&path)),
        ConsoleAction::ResolveConflict(path) => {
            with_promotion(state, state.promotion.resolve_conflict(&path))
        }
        ConsoleAction::CancelReview => with_promotion(state, state.promotion.cancel()?),
        ConsoleAction::RequestPublish => {
            let (promotion, request) = state.promotion.publish(&state.review_basis())?;
            ConsoleState {
                promotion,
                pending_publish: Some(request),
                ..state.clone()
            }
        }
        ConsoleAction::PublishCompleted | ConsoleAction::PublishFailed => {
            if !state.promotion.is_publishing() {
                warn!(state = ?state.promotion.state(), "publish outcome without a publish in flight");
            }
            ConsoleState {
                promotion: PromotionSession::new(),
                pending_publish: None,
                ..state.clone()
            }
        }
    };

    Ok(if snapshot { observe_snapshot(next) } else { next })
}

/// Invalidate an open review the new snapshot no longer matches
fn observe_snapshot(state: ConsoleState) -> ConsoleState {
    if !state.promotion.is_reviewing() {
        return state;
    }
    let promotion = state.promotion.observe(&state.review_basis());
    ConsoleState { promotion, ..state }
}

fn load_tree(state: &ConsoleState, tree: Vec<TreeNode>) -> ConsoleResult<ConsoleState> {
    validate_tree(&tree)?;

    let selected_path = state
        .selected_path
        .as_ref()
        .filter(|path| resolve(&tree, path.as_str()).is_some())
        .cloned();
    if selected_path.is_none() && state.selected_path.is_some() {
        debug!(path = ?state.selected_path, "selection no longer resolves; dropped");
    }

    let tree_version = state.versions.effective_version().map(|v| v.id.clone());
    info!(nodes = tree.len(), version = ?tree_version, "tree loaded");
    Ok(ConsoleState {
        tree: Arc::from(tree),
        tree_version,
        selected_path,
        ..state.clone()
    })
}

fn with_promotion(state: &ConsoleState, promotion: PromotionSession) -> ConsoleState {
    ConsoleState {
        promotion,
        ..state.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ConsoleError;
    use cadm_mappings::{MappingEntry, MappingsModel};
    use cadm_promotion::{DiffEntry, PromotionDiff, PromotionError};
    use cadm_version::Version;
    use chrono::{TimeZone, Utc};
    use pretty_assertions::assert_eq;

    fn tree() -> Vec<TreeNode> {
        vec![TreeNode::directory(
            "agents",
            vec![TreeNode::file("coder.yaml"), TreeNode::file("reviewer.yaml")],
        )]
    }

    fn version(id: &str, day: u32) -> Version {
        Version::new(id, Utc.with_ymd_and_hms(2026, 1, day, 0, 0, 0).unwrap(), "")
    }

    fn apply(state: &ConsoleState, actions: Vec<ConsoleAction>) -> ConsoleState {
        actions
            .into_iter()
            .fold(state.clone(), |s, a| reduce(&s, a).unwrap())
    }

    fn diff(entries: &[(&str, bool)]) -> PromotionDiff {
        PromotionDiff::new(
            "v2",
            "v1",
            entries
                .iter()
                .map(|(p, c)| DiffEntry::new(*p, *c))
                .collect(),
        )
    }

    #[test]
    fn tree_loaded_replaces_wholesale() {
        let state = apply(&ConsoleState::default(), vec![ConsoleAction::TreeLoaded(tree())]);
        assert_eq!(state.tree().len(), 1);

        let state = apply(&state, vec![ConsoleAction::TreeLoaded(vec![])]);
        assert!(state.tree().is_empty());
    }

    #[test]
    fn duplicate_tree_rejected_and_state_kept() {
        let state = apply(&ConsoleState::default(), vec![ConsoleAction::TreeLoaded(tree())]);
        let bad = vec![TreeNode::file("a"), TreeNode::file("a")];

        let err = reduce(&state, ConsoleAction::TreeLoaded(bad)).unwrap_err();
        assert!(matches!(err, ConsoleError::Tree(_)));
        assert_eq!(state.tree().len(), 1);
    }

    #[test]
    fn selection_dropped_when_tree_no_longer_has_it() {
        let state = apply(
            &ConsoleState::default(),
            vec![
                ConsoleAction::TreeLoaded(tree()),
                ConsoleAction::SelectPath("agents/coder.yaml".into()),
            ],
        );
        assert_eq!(state.selected_node().map(TreeNode::name), Some("coder.yaml"));

        let kept = apply(&state, vec![ConsoleAction::TreeLoaded(tree())]);
        assert_eq!(kept.selected_path(), Some("agents/coder.yaml"));

        let dropped = apply(
            &state,
            vec![ConsoleAction::TreeLoaded(vec![TreeNode::file("other.yaml")])],
        );
        assert_eq!(dropped.selected_path(), None);
    }

    #[test]
    fn version_selection() {
        let state = apply(
            &ConsoleState::default(),
            vec![ConsoleAction::VersionsLoaded(vec![
                version("v3", 3),
                version("v2", 2),
            ])],
        );
        assert!(state.is_latest_selected());

        let pinned = apply(&state, vec![ConsoleAction::SelectVersion(Some("v2".into()))]);
        assert!(!pinned.is_latest_selected());

        let back = apply(&pinned, vec![ConsoleAction::SelectVersion(None)]);
        assert!(back.is_latest_selected());
    }

    #[test]
    fn rule_and_handler_edits_tracked_until_saved() {
        let state = apply(
            &ConsoleState::default(),
            vec![
                ConsoleAction::EditRule {
                    id: "r1".into(),
                    content: "deny all".into(),
                },
                ConsoleAction::EditHandler {
                    id: "h1".into(),
                    content: "notify".into(),
                },
            ],
        );
        assert!(state.has_unsaved_changes());
        assert_eq!(state.unsaved_rules().get("r1"), Some("deny all"));

        let state = apply(&state, vec![ConsoleAction::RuleSaved("r1".into())]);
        assert!(state.has_unsaved_changes());

        let state = apply(&state, vec![ConsoleAction::DiscardHandler("h1".into())]);
        assert!(!state.has_unsaved_changes());
    }

    #[test]
    fn mappings_draft_cleared_on_save() {
        let saved = MappingsModel::new(vec![MappingEntry::new(vec![], "coder-.*", "agents/coder.yaml")]);
        let state = apply(
            &ConsoleState::default(),
            vec![ConsoleAction::EditMappingsText("- broken".into())],
        );
        assert_eq!(state.mappings_draft(), Some("- broken"));
        assert!(state.has_unsaved_changes());

        let state = apply(&state, vec![ConsoleAction::MappingsSaved(saved.clone())]);
        assert_eq!(state.mappings_draft(), None);
        assert_eq!(state.mappings(), &saved);
        assert!(!state.has_unsaved_changes());
    }

    #[test]
    fn review_flow_publishes() {
        let state = apply(
            &ConsoleState::default(),
            vec![
                ConsoleAction::TreeLoaded(tree()),
                ConsoleAction::OpenReview(diff(&[("agents/coder.yaml", false), ("agents/reviewer.yaml", true)])),
                ConsoleAction::ApproveFile("agents/coder.yaml".into()),
                ConsoleAction::ResolveConflict("agents/reviewer.yaml".into()),
                ConsoleAction::ApproveFile("agents/reviewer.yaml".into()),
                ConsoleAction::RequestPublish,
            ],
        );
        assert!(state.promotion().is_publishing());
        let request = state.pending_publish().unwrap();
        assert_eq!(request.paths, vec!["agents/coder.yaml", "agents/reviewer.yaml"]);

        let done = apply(&state, vec![ConsoleAction::PublishCompleted]);
        assert_eq!(done.promotion().state(), ReviewState::Idle);
        assert!(done.pending_publish().is_none());
    }

    #[test]
    fn conflict_blocks_publish_and_keeps_state() {
        let state = apply(
            &ConsoleState::default(),
            vec![
                ConsoleAction::OpenReview(diff(&[("a", true)])),
                ConsoleAction::ApproveFile("a".into()),
            ],
        );
        let err = reduce(&state, ConsoleAction::RequestPublish).unwrap_err();
        assert!(matches!(
            err,
            ConsoleError::Promotion(PromotionError::ConflictsOutstanding { .. })
        ));
        assert!(state.promotion().is_reviewing());
    }

    #[test]
    fn snapshot_change_makes_review_stale() {
        let state = apply(
            &ConsoleState::default(),
            vec![
                ConsoleAction::TreeLoaded(tree()),
                ConsoleAction::OpenReview(diff(&[("agents/coder.yaml", false)])),
                ConsoleAction::ApproveFile("agents/coder.yaml".into()),
                ConsoleAction::VersionsLoaded(vec![version("v3", 3)]),
            ],
        );
        let err = reduce(&state, ConsoleAction::RequestPublish).unwrap_err();
        assert!(err.requires_refresh());
    }

    fn reviewing_latest() -> ConsoleState {
        apply(
            &ConsoleState::default(),
            vec![
                ConsoleAction::VersionsLoaded(vec![version("v2", 2), version("v1", 1)]),
                ConsoleAction::TreeLoaded(tree()),
                ConsoleAction::OpenReview(diff(&[("agents/coder.yaml", false)])),
                ConsoleAction::ApproveFile("agents/coder.yaml".into()),
            ],
        )
    }

    #[test]
    fn browsing_other_version_keeps_review_valid() {
        let state = reviewing_latest();
        assert_eq!(state.tree_version(), Some("v2"));

        let browsing = apply(
            &state,
            vec![
                ConsoleAction::SelectVersion(Some("v1".into())),
                ConsoleAction::TreeLoaded(vec![TreeNode::file("old.yaml")]),
            ],
        );
        assert_eq!(browsing.tree_version(), Some("v1"));
        assert!(!browsing.is_review_stale());

        let published = apply(&browsing, vec![ConsoleAction::RequestPublish]);
        assert!(published.promotion().is_publishing());
    }

    #[test]
    fn staged_tree_change_invalidates_review_for_good() {
        let state = reviewing_latest();
        let changed = apply(
            &state,
            vec![ConsoleAction::TreeLoaded(vec![TreeNode::file("replaced.yaml")])],
        );
        assert!(changed.is_review_stale());
        assert!(changed.promotion().is_invalidated());

        let restored = apply(&changed, vec![ConsoleAction::TreeLoaded(tree())]);
        assert!(restored.is_review_stale());
        let err = reduce(&restored, ConsoleAction::RequestPublish).unwrap_err();
        assert!(err.requires_refresh());
    }

    #[test]
    fn version_list_growth_invalidates_on_load() {
        let state = reviewing_latest();
        let grown = apply(
            &state,
            vec![ConsoleAction::VersionsLoaded(vec![
                version("v3", 3),
                version("v2", 2),
                version("v1", 1),
            ])],
        );
        assert!(grown.promotion().is_invalidated());
    }

    #[test]
    fn reopening_replaces_review() {
        let state = apply(
            &ConsoleState::default(),
            vec![
                ConsoleAction::OpenReview(diff(&[("a", false)])),
                ConsoleAction::ApproveFile("a".into()),
                ConsoleAction::OpenReview(diff(&[("a", false), ("b", false)])),
            ],
        );
        assert_eq!(state.promotion().len(), 2);
        assert_eq!(state.promotion().approval_count(), 0);
    }

    #[test]
    fn cannot_reopen_while_publishing() {
        let state = apply(
            &ConsoleState::default(),
            vec![
                ConsoleAction::OpenReview(diff(&[("a", false)])),
                ConsoleAction::ApproveFile("a".into()),
                ConsoleAction::RequestPublish,
            ],
        );
        let err = reduce(&state, ConsoleAction::OpenReview(diff(&[("b", false)]))).unwrap_err();
        assert!(matches!(
            err,
            ConsoleError::Promotion(PromotionError::InvalidTransition { .. })
        ));
    }

    #[test]
    fn cancel_then_open_again() {
        let state = apply(
            &ConsoleState::default(),
            vec![
                ConsoleAction::OpenReview(diff(&[("a", false)])),
                ConsoleAction::CancelReview,
            ],
        );
        assert_eq!(state.promotion().state(), ReviewState::Cancelled);
        assert!(state.promotion().is_empty());

        let state = apply(&state, vec![ConsoleAction::OpenReview(diff(&[("b", false)]))]);
        assert!(state.promotion().is_reviewing());
    }

    #[test]
    fn cancel_without_review_is_error() {
        let err = reduce(&ConsoleState::default(), ConsoleAction::CancelReview).unwrap_err();
        assert!(matches!(err, ConsoleError::Promotion(_)));
    }

    #[test]
    fn publish_failure_drops_review() {
        let state = apply(
            &ConsoleState::default(),
            vec![
                ConsoleAction::OpenReview(diff(&[("a", false)])),
                ConsoleAction::ApproveFile("a".into()),
                ConsoleAction::RequestPublish,
                ConsoleAction::PublishFailed,
            ],
        );
        assert_eq!(state.promotion().state(), ReviewState::Idle);
        assert!(state.pending_publish().is_none());
    }
}
