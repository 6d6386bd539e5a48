//! Text form of mapping rules
//!
//! Rules are stored and edited as a block-style YAML sequence:
//!
//! ```yaml
//! - sourceBranches:
//!   - main
//!   agentPattern: web-.*
//!   targetFile: web.yaml
//! ```

use crate::error::MappingsError;
use crate::rule::MappingEntry;

/// Serialize rules to block-style YAML, preserving order
///
/// # Errors
/// Returns [`MappingsError::Serialize`] if the YAML emitter fails.
pub fn to_text(rules: &[MappingEntry]) -> Result<String, MappingsError> {
    serde_yaml::to_string(rules).map_err(|e| MappingsError::Serialize(e.to_string()))
}

/// Parse rules from YAML text
///
/// Blank text is an empty rule set. Anything that is not a sequence of
/// complete rules fails as a whole; no entry is skipped.
///
/// # Errors
/// Returns [`MappingsError::Parse`] with the parser's line and column.
pub fn from_text(text: &str) -> Result<Vec<MappingEntry>, MappingsError> {
    if text.trim().is_empty() {
        return Ok(Vec::new());
    }
    serde_yaml::from_str(text).map_err(|e| {
        let err = MappingsError::from_yaml(&e);
        tracing::debug!(error = %err, "rejected mappings text");
        err
    })
}
