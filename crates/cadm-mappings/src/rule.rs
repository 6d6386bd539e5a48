//! Agent mapping rules and their branch/agent matching

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::MappingsError;

/// Branch entry matching every branch
pub const ANY_BRANCH: &str = "*";

/// One agent mapping rule
///
/// An agent whose name fully matches `agent_pattern`, running on one of
/// `source_branches`, reads `target_file`. An empty branch list, or one
/// containing [`ANY_BRANCH`], applies to every branch.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct MappingEntry {
    pub source_branches: Vec<String>,
    pub agent_pattern: String,
    pub target_file: String,
}

impl MappingEntry {
    #[inline]
    #[must_use]
    pub fn new(
        source_branches: Vec<String>,
        agent_pattern: impl Into<String>,
        target_file: impl Into<String>,
    ) -> Self {
        Self {
            source_branches,
            agent_pattern: agent_pattern.into(),
            target_file: target_file.into(),
        }
    }

    /// Compile `agent_pattern`, anchored to the whole agent name
    ///
    /// # Errors
    /// Returns [`MappingsError::InvalidPattern`] with no rule index; callers
    /// that know the rule's position attach it with `at_rule`.
    pub fn compile(&self) -> Result<Regex, MappingsError> {
        Regex::new(&format!("^(?:{})$", self.agent_pattern)).map_err(|e| {
            MappingsError::InvalidPattern {
                index: None,
                pattern: self.agent_pattern.clone(),
                message: e.to_string(),
            }
        })
    }

    #[inline]
    #[must_use]
    pub fn applies_to_branch(&self, branch: &str) -> bool {
        self.source_branches.is_empty()
            || self
                .source_branches
                .iter()
                .any(|b| b == ANY_BRANCH || b == branch)
    }

    /// Check whether this rule routes `agent` on `branch`
    ///
    /// # Errors
    /// Returns [`MappingsError::InvalidPattern`] if the pattern does not compile.
    pub fn matches(&self, branch: &str, agent: &str) -> Result<bool, MappingsError> {
        if !self.applies_to_branch(branch) {
            return Ok(false);
        }
        Ok(self.compile()?.is_match(agent))
    }
}
