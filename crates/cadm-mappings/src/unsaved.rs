//! Unsaved edit tracking
//!
//! Provides [`UnsavedChanges`], a persistent map from entity id (rule id,
//! handler id, the mappings document) to its pending text. Presence means
//! "has unsaved edits". Every update returns a new map, so holders of the old
//! one can diff old against new.

use std::collections::BTreeSet;

use im::OrdMap;

/// Pending, not yet persisted edits keyed by entity id
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct UnsavedChanges {
    entries: OrdMap<String, String>,
}

impl UnsavedChanges {
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Return a new map with `key → content` set
    #[must_use]
    pub fn set_content(&self, key: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            entries: self.entries.update(key.into(), content.into()),
        }
    }

    /// Return a new map without `key`; clearing an absent key is a no-op
    #[must_use]
    pub fn clear(&self, key: &str) -> Self {
        if !self.entries.contains_key(key) {
            return self.clone();
        }
        Self {
            entries: self.entries.without(key),
        }
    }

    /// True when any edit is pending
    #[inline]
    #[must_use]
    pub fn is_dirty(&self) -> bool {
        !self.entries.is_empty()
    }

    #[inline]
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    #[inline]
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Keys with pending edits, in sorted order
    #[inline]
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }
}

/// True iff either map holds a pending edit
///
/// Derived on every call; there is no separate dirty flag to go stale.
#[inline]
#[must_use]
pub fn has_unsaved_changes(unsaved_rules: &UnsavedChanges, unsaved_handlers: &UnsavedChanges) -> bool {
    unsaved_rules.is_dirty() || unsaved_handlers.is_dirty()
}

/// Keys added, removed or changed between two snapshots, sorted
#[must_use]
pub fn changed_keys(old: &UnsavedChanges, new: &UnsavedChanges) -> Vec<String> {
    let all: BTreeSet<&str> = old.keys().chain(new.keys()).collect();
    all.into_iter()
        .filter(|key| old.get(key) != new.get(key))
        .map(str::to_string)
        .collect()
}
