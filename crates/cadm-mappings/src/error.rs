//! Error types for mapping rules

use std::fmt::{self, Display, Formatter};

/// Position inside mappings text, when the parser could tell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextLocation {
    Unknown,
    At { line: usize, column: usize },
}

impl Display for TextLocation {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unknown => write!(f, "unknown position"),
            Self::At { line, column } => write!(f, "line {line}, column {column}"),
        }
    }
}

/// Errors from parsing, serializing and evaluating mapping rules
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MappingsError {
    /// Text is not a valid rule sequence
    #[error("malformed mappings at {location}: {message}")]
    Parse {
        location: TextLocation,
        message: String,
    },

    /// Rules could not be written as YAML
    #[error("serialization failed: {0}")]
    Serialize(String),

    /// `agentPattern` is not a valid regular expression
    #[error(
        "{}invalid agent pattern '{pattern}': {message}",
        .index.map(|i| format!("rule {i}: ")).unwrap_or_default()
    )]
    InvalidPattern {
        /// Position of the rule, when known
        index: Option<usize>,
        pattern: String,
        message: String,
    },
}

impl MappingsError {
    /// Build a parse error from a YAML error, keeping its location
    pub(crate) fn from_yaml(err: &serde_yaml::Error) -> Self {
        let location = err.location().map_or(TextLocation::Unknown, |loc| TextLocation::At {
            line: loc.line(),
            column: loc.column(),
        });
        Self::Parse {
            location,
            message: err.to_string(),
        }
    }

    /// Attach a rule position to an [`InvalidPattern`](Self::InvalidPattern)
    #[must_use]
    pub fn at_rule(self, rule: usize) -> Self {
        match self {
            Self::InvalidPattern {
                pattern, message, ..
            } => Self::InvalidPattern {
                index: Some(rule),
                pattern,
                message,
            },
            other => other,
        }
    }

    /// Location for parse errors
    #[inline]
    #[must_use]
    pub fn location(&self) -> Option<TextLocation> {
        match self {
            Self::Parse { location, .. } => Some(*location),
            _ => None,
        }
    }
}
