//! Version records and fetch references

use std::fmt::{self, Display, Formatter};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A named snapshot of the whole configuration set
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Version {
    pub id: String,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub label: String,
}

impl Version {
    #[inline]
    #[must_use]
    pub fn new(id: impl Into<String>, created_at: DateTime<Utc>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            created_at,
            label: label.into(),
        }
    }
}

/// Which version a tree fetch should return
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VersionRef {
    /// Whatever the server currently considers newest
    #[default]
    Latest,
    /// A specific version id
    Id(String),
}

impl VersionRef {
    /// Build from an optional selection (`None` tracks latest)
    #[inline]
    #[must_use]
    pub fn from_selection(selected: Option<&str>) -> Self {
        selected.map_or(Self::Latest, |id| Self::Id(id.to_string()))
    }
}

impl Display for VersionRef {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Latest => write!(f, "latest"),
            Self::Id(id) => write!(f, "{id}"),
        }
    }
}
