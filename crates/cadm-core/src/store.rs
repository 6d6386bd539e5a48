//! Current snapshot and change notification

use std::sync::Arc;

use parking_lot::{Mutex, RwLock};

use crate::action::ConsoleAction;
use crate::error::ConsoleResult;
use crate::reducer::reduce;
use crate::state::ConsoleState;

/// Notified after every dispatch that changed the state
pub trait StateObserver: Send + Sync {
    fn on_change(&self, action: &'static str, old: &ConsoleState, new: &ConsoleState);
}

impl<F> StateObserver for F
where
    F: Fn(&'static str, &ConsoleState, &ConsoleState) + Send + Sync,
{
    fn on_change(&self, action: &'static str, old: &ConsoleState, new: &ConsoleState) {
        self(action, old, new);
    }
}

/// Holds the current [`ConsoleState`]
///
/// Dispatches are serialized; the last one to finish wins. Observers run
/// after the lock is released, so they may read or dispatch again.
pub struct ConsoleStore {
    current: Mutex<Arc<ConsoleState>>,
    observers: RwLock<Vec<Arc<dyn StateObserver>>>,
}

impl ConsoleStore {
    #[must_use]
    pub fn new(initial: ConsoleState) -> Self {
        Self {
            current: Mutex::new(Arc::new(initial)),
            observers: RwLock::new(Vec::new()),
        }
    }

    /// Current snapshot
    #[must_use]
    pub fn state(&self) -> Arc<ConsoleState> {
        Arc::clone(&self.current.lock())
    }

    pub fn subscribe(&self, observer: Arc<dyn StateObserver>) {
        self.observers.write().push(observer);
    }

    #[must_use]
    pub fn observer_count(&self) -> usize {
        self.observers.read().len()
    }

    /// Reduce `action` against the current snapshot and install the result
    ///
    /// # Errors
    ///
    /// Propagates the reducer error; the current snapshot is unchanged.
    pub fn dispatch(&self, action: ConsoleAction) -> ConsoleResult<Arc<ConsoleState>> {
        let name = action.name();
        let (old, new) = {
            let mut current = self.current.lock();
            let next = match reduce(&current, action) {
                Ok(next) => Arc::new(next),
                Err(err) => {
                    tracing::warn!(action = name, error = %err, "action rejected");
                    return Err(err);
                }
            };
            let old = std::mem::replace(&mut *current, Arc::clone(&next));
            (old, next)
        };

        if !old.is_same_snapshot(&new) {
            let observers: Vec<Arc<dyn StateObserver>> = self.observers.read().clone();
            for observer in &observers {
                observer.on_change(name, &old, &new);
            }
        }
        Ok(new)
    }
}

impl Default for ConsoleStore {
    fn default() -> Self {
        Self::new(ConsoleState::default())
    }
}

impl std::fmt::Debug for ConsoleStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConsoleStore")
            .field("state", &self.state())
            .field("observers", &self.observer_count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cadm_tree::TreeNode;

    fn recorder() -> (Arc<Mutex<Vec<&'static str>>>, Arc<dyn StateObserver>) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let observer: Arc<dyn StateObserver> =
            Arc::new(move |action: &'static str, _: &ConsoleState, _: &ConsoleState| {
                sink.lock().push(action);
            });
        (seen, observer)
    }

    #[test]
    fn dispatch_installs_new_snapshot() {
        let store = ConsoleStore::default();
        let before = store.state();
        store
            .dispatch(ConsoleAction::TreeLoaded(vec![TreeNode::file("a")]))
            .unwrap();
        assert!(before.tree().is_empty());
        assert_eq!(store.state().tree().len(), 1);
    }

    #[test]
    fn observers_see_old_and_new() {
        let store = ConsoleStore::default();
        let counts = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&counts);
        store.subscribe(Arc::new(
            move |_: &'static str, old: &ConsoleState, new: &ConsoleState| {
                sink.lock().push((old.tree().len(), new.tree().len()));
            },
        ));

        store
            .dispatch(ConsoleAction::TreeLoaded(vec![TreeNode::file("a")]))
            .unwrap();
        assert_eq!(*counts.lock(), vec![(0, 1)]);
    }

    #[test]
    fn unchanged_state_not_notified() {
        let store = ConsoleStore::default();
        let (seen, observer) = recorder();
        store.subscribe(observer);

        // nothing selected, nothing to approve
        store.dispatch(ConsoleAction::ClearSelection).unwrap();
        store.dispatch(ConsoleAction::ApproveFile("x".into())).unwrap();
        assert!(seen.lock().is_empty());

        store.dispatch(ConsoleAction::SelectPath("x".into())).unwrap();
        assert_eq!(*seen.lock(), vec!["select_path"]);
    }

    #[test]
    fn reloading_identical_tree_notifies() {
        let store = ConsoleStore::default();
        let (seen, observer) = recorder();
        store.subscribe(observer);

        let tree = vec![TreeNode::file("a")];
        store.dispatch(ConsoleAction::TreeLoaded(tree.clone())).unwrap();
        store.dispatch(ConsoleAction::TreeLoaded(tree)).unwrap();
        assert_eq!(*seen.lock(), vec!["tree_loaded", "tree_loaded"]);
    }

    #[test]
    fn rejected_action_keeps_snapshot_and_skips_observers() {
        let store = ConsoleStore::default();
        let (seen, observer) = recorder();
        store.subscribe(observer);
        let before = store.state();

        assert!(store.dispatch(ConsoleAction::CancelReview).is_err());
        assert!(Arc::ptr_eq(&before, &store.state()));
        assert!(seen.lock().is_empty());
    }
}
