//! Slash-separated configuration paths
//!
//! Provides [`ConfigPath`] for addressing nodes in a configuration tree.

use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

/// Path separator used by the configuration server
pub const SEPARATOR: char = '/';

/// Path within a configuration tree
///
/// Segments are node names from the root downwards. Parsing strips at most one
/// leading separator, so `/docs/guide.yaml` and `docs/guide.yaml` are equal.
///
/// # Examples
/// - `["docs", "guide.yaml"]` → `docs/guide.yaml`
/// - `[]` → `` (root)
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct ConfigPath(Vec<String>);

impl ConfigPath {
    /// Create new path from segments
    #[inline]
    #[must_use]
    pub fn new(segments: Vec<String>) -> Self {
        Self(segments)
    }

    /// Empty path (root)
    #[inline]
    #[must_use]
    pub fn root() -> Self {
        Self(Vec::new())
    }

    /// Get path segments
    #[inline]
    #[must_use]
    pub fn segments(&self) -> &[String] {
        &self.0
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Check if path is empty (root)
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Get parent path (if not root)
    #[inline]
    #[must_use]
    pub fn parent(&self) -> Option<Self> {
        let (_, init) = self.0.split_last()?;
        Some(Self(init.to_vec()))
    }

    /// Final segment, i.e. the node's own name
    #[inline]
    #[must_use]
    pub fn file_name(&self) -> Option<&str> {
        self.0.last().map(String::as_str)
    }

    /// Append a segment, returning new path
    #[inline]
    #[must_use]
    pub fn child(&self, segment: impl Into<String>) -> Self {
        let mut new = self.clone();
        new.0.push(segment.into());
        new
    }

    /// Check if this path is a prefix of another
    ///
    /// # Examples
    /// - `docs` is prefix of `docs/guide.yaml`
    /// - `docs` is NOT prefix of `documents/guide.yaml`
    #[inline]
    #[must_use]
    pub fn is_prefix_of(&self, other: &Self) -> bool {
        self.0.len() <= other.0.len() && self.0 == other.0[..self.0.len()]
    }

    /// Iterator over segments from root to leaf
    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

impl Display for ConfigPath {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for segment in &self.0 {
            if !first {
                write!(f, "{SEPARATOR}")?;
            }
            write!(f, "{segment}")?;
            first = false;
        }
        Ok(())
    }
}

impl FromStr for ConfigPath {
    type Err = PathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.strip_prefix(SEPARATOR).unwrap_or(s);
        if trimmed.is_empty() {
            return Ok(Self::root());
        }

        let segments = trimmed
            .split(SEPARATOR)
            .map(|seg| {
                if seg.is_empty() {
                    Err(PathError::EmptySegment(s.to_string()))
                } else {
                    Ok(seg.to_string())
                }
            })
            .collect::<Result<_, _>>()?;

        Ok(Self(segments))
    }
}

impl From<Vec<String>> for ConfigPath {
    fn from(segments: Vec<String>) -> Self {
        Self(segments)
    }
}

/// Errors related to configuration paths
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PathError {
    /// Empty segment in path (`a//b`, trailing separator, double leading separator)
    #[error("path '{0}' contains an empty segment")]
    EmptySegment(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn leading_separator_is_optional() {
        let a: ConfigPath = "/docs/guide.yaml".parse().unwrap();
        let b: ConfigPath = "docs/guide.yaml".parse().unwrap();
        assert_eq!(a, b);
        assert_eq!(a.segments(), &["docs", "guide.yaml"]);
    }

    #[test]
    fn only_one_leading_separator_is_stripped() {
        let result: Result<ConfigPath, _> = "//docs".parse();
        assert!(matches!(result, Err(PathError::EmptySegment(_))));
    }

    #[test]
    fn empty_and_bare_separator_are_root() {
        assert!("".parse::<ConfigPath>().unwrap().is_empty());
        assert!("/".parse::<ConfigPath>().unwrap().is_empty());
    }

    #[test]
    fn trailing_separator_is_rejected() {
        let result: Result<ConfigPath, _> = "docs/".parse();
        assert!(matches!(result, Err(PathError::EmptySegment(_))));
    }

    #[test]
    fn names_keep_dots_and_dashes() {
        let path: ConfigPath = "team-a/app.v2.yaml".parse().unwrap();
        assert_eq!(path.file_name(), Some("app.v2.yaml"));
    }

    #[test]
    fn display_joins_with_separator() {
        let path = ConfigPath::root().child("docs").child("guide.yaml");
        assert_eq!(path.to_string(), "docs/guide.yaml");
        assert_eq!(ConfigPath::root().to_string(), "");
    }

    #[test]
    fn parent_and_prefix() {
        let path: ConfigPath = "a/b/c".parse().unwrap();
        let parent = path.parent().unwrap();
        assert_eq!(parent.to_string(), "a/b");
        assert!(parent.is_prefix_of(&path));
        assert!(!path.is_prefix_of(&parent));
        assert!(ConfigPath::root().parent().is_none());
    }

    #[test]
    fn prefix_is_segment_wise() {
        let docs: ConfigPath = "docs".parse().unwrap();
        let documents: ConfigPath = "documents/x".parse().unwrap();
        assert!(!docs.is_prefix_of(&documents));
    }
}
