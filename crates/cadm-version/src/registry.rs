//! Version registry
//!
//! Provides [`VersionRegistry`], an immutable newest-first version list plus the
//! operator's selection. Updates return a new registry.

use crate::version::{Version, VersionRef};

/// True when the selection should be treated as "on latest"
///
/// Three cases count as latest:
/// - nothing selected (the console tracks latest)
/// - no versions exist yet, so there is nothing older to warn about
/// - the selection equals `versions[0].id`
#[must_use]
pub fn is_latest_selected(versions: &[Version], selected: Option<&str>) -> bool {
    match (selected, versions.first()) {
        (None, _) | (_, None) => true,
        (Some(id), Some(latest)) => latest.id == id,
    }
}

/// Newest-first versions and the current selection
///
/// # Invariants
/// - `versions[0]` is the most recently created version
/// - `selected` is either `None` (track latest) or any id, known or not;
///   an unknown id resolves to latest in [`VersionRegistry::effective_version`]
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct VersionRegistry {
    versions: Vec<Version>,
    selected: Option<String>,
}

impl VersionRegistry {
    /// Create a registry tracking latest
    #[inline]
    #[must_use]
    pub fn new(versions: Vec<Version>) -> Self {
        Self {
            versions,
            selected: None,
        }
    }

    #[inline]
    #[must_use]
    pub fn versions(&self) -> &[Version] {
        &self.versions
    }

    #[inline]
    #[must_use]
    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.versions.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.versions.is_empty()
    }

    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = &Version> {
        self.versions.iter()
    }

    /// Id at index 0, if any
    #[inline]
    #[must_use]
    pub fn latest_version_id(&self) -> Option<&str> {
        self.versions.first().map(|v| v.id.as_str())
    }

    /// See [`is_latest_selected`]
    #[inline]
    #[must_use]
    pub fn is_latest_selected(&self) -> bool {
        is_latest_selected(&self.versions, self.selected())
    }

    #[inline]
    #[must_use]
    pub fn find(&self, id: &str) -> Option<&Version> {
        self.versions.iter().find(|v| v.id == id)
    }

    /// Select a version id
    ///
    /// The id is not checked against the list; a selection may arrive before
    /// the list refresh that contains it.
    #[must_use]
    pub fn select(&self, version_id: impl Into<String>) -> Self {
        let version_id = version_id.into();
        tracing::debug!(version = %version_id, "selecting version");
        Self {
            versions: self.versions.clone(),
            selected: Some(version_id),
        }
    }

    /// Clear the selection so the console follows latest again
    #[must_use]
    pub fn track_latest(&self) -> Self {
        Self {
            versions: self.versions.clone(),
            selected: None,
        }
    }

    /// Replace the version list wholesale, keeping the selection
    #[must_use]
    pub fn with_versions(&self, versions: Vec<Version>) -> Self {
        Self {
            versions,
            selected: self.selected.clone(),
        }
    }

    /// The version the console should show
    ///
    /// The selected version when it is in the list, otherwise latest.
    #[must_use]
    pub fn effective_version(&self) -> Option<&Version> {
        if let Some(id) = self.selected() {
            if let Some(found) = self.find(id) {
                return Some(found);
            }
            tracing::debug!(version = %id, "selected version not in list; falling back to latest");
        }
        self.versions.first()
    }

    /// What to ask the server for when fetching the tree
    #[inline]
    #[must_use]
    pub fn version_ref(&self) -> VersionRef {
        VersionRef::from_selection(self.selected())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn versions(ids: &[&str]) -> Vec<Version> {
        ids.iter()
            .enumerate()
            .map(|(i, id)| {
                // Deliberately older timestamps first: ordering must not matter.
                let at = Utc.timestamp_opt(1_700_000_000 + i as i64, 0).unwrap();
                Version::new(*id, at, format!("label {id}"))
            })
            .collect()
    }

    #[test]
    fn latest_is_index_zero() {
        let registry = VersionRegistry::new(versions(&["v3", "v2", "v1"]));
        assert_eq!(registry.latest_version_id(), Some("v3"));
    }

    #[test]
    fn latest_of_empty_is_none() {
        assert_eq!(VersionRegistry::default().latest_version_id(), None);
    }

    #[test]
    fn older_selection_is_not_latest() {
        let list = versions(&["v3", "v2", "v1"]);
        assert!(!is_latest_selected(&list, Some("v2")));
        assert!(is_latest_selected(&list, None));
        assert!(is_latest_selected(&list, Some("v3")));
    }

    #[test]
    fn empty_list_is_vacuously_latest() {
        assert!(is_latest_selected(&[], Some("anything")));
        assert!(is_latest_selected(&[], None));
    }

    #[test]
    fn unknown_selection_is_not_latest_but_falls_back() {
        let registry = VersionRegistry::new(versions(&["v3", "v2"])).select("v9");
        assert!(!registry.is_latest_selected());
        assert_eq!(registry.effective_version().map(|v| v.id.as_str()), Some("v3"));
    }

    #[test]
    fn select_does_not_mutate_original() {
        let registry = VersionRegistry::new(versions(&["v2", "v1"]));
        let pinned = registry.select("v1");
        assert_eq!(registry.selected(), None);
        assert_eq!(pinned.selected(), Some("v1"));
        assert_eq!(pinned.effective_version().map(|v| v.id.as_str()), Some("v1"));
    }

    #[test]
    fn with_versions_keeps_selection() {
        let registry = VersionRegistry::new(versions(&["v1"])).select("v2");
        assert!(registry.effective_version().is_some_and(|v| v.id == "v1"));

        let refreshed = registry.with_versions(versions(&["v2", "v1"]));
        assert_eq!(refreshed.selected(), Some("v2"));
        assert!(refreshed.is_latest_selected());
    }

    #[test]
    fn version_ref_follows_selection() {
        let registry = VersionRegistry::new(versions(&["v2", "v1"]));
        assert_eq!(registry.version_ref(), VersionRef::Latest);
        assert_eq!(registry.select("v1").version_ref(), VersionRef::Id("v1".into()));
    }
}
