//! Mappings model
//!
//! Provides [`MappingsModel`], the rule set currently loaded from the server.

use crate::codec::{from_text, to_text};
use crate::error::MappingsError;
use crate::rule::MappingEntry;

/// Ordered agent mapping rules
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MappingsModel {
    rules: Vec<MappingEntry>,
}

impl MappingsModel {
    #[inline]
    #[must_use]
    pub fn new(rules: Vec<MappingEntry>) -> Self {
        Self { rules }
    }

    /// Parse a model from its text form
    ///
    /// # Errors
    /// See [`from_text`].
    pub fn parse(text: &str) -> Result<Self, MappingsError> {
        from_text(text).map(Self::new)
    }

    /// Text form for editing or saving
    ///
    /// # Errors
    /// See [`to_text`].
    pub fn to_text(&self) -> Result<String, MappingsError> {
        to_text(&self.rules)
    }

    #[inline]
    #[must_use]
    pub fn rules(&self) -> &[MappingEntry] {
        &self.rules
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Check every agent pattern compiles
    ///
    /// # Errors
    /// Returns the first [`MappingsError::InvalidPattern`] in rule order.
    pub fn validate(&self) -> Result<(), MappingsError> {
        for (index, rule) in self.rules.iter().enumerate() {
            rule.compile().map_err(|e| e.at_rule(index))?;
        }
        Ok(())
    }

    /// First rule routing `agent` on `branch`
    ///
    /// # Errors
    /// Returns [`MappingsError::InvalidPattern`] for the first rule that applies
    /// to `branch` but whose pattern does not compile. Later rules are not
    /// consulted, since they could only match if the broken rule did not.
    pub fn first_match(
        &self,
        branch: &str,
        agent: &str,
    ) -> Result<Option<(usize, &MappingEntry)>, MappingsError> {
        for (index, rule) in self.rules.iter().enumerate() {
            if !rule.applies_to_branch(branch) {
                continue;
            }
            if rule.compile().map_err(|e| e.at_rule(index))?.is_match(agent) {
                tracing::trace!(index, branch, agent, target = %rule.target_file, "mapping matched");
                return Ok(Some((index, rule)));
            }
        }
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn model() -> MappingsModel {
        MappingsModel::new(vec![
            MappingEntry::new(vec!["main".into()], "web-.*", "web-main.yaml"),
            MappingEntry::new(vec![], "web-.*", "web-any.yaml"),
            MappingEntry::new(vec![], ".*", "default.yaml"),
        ])
    }

    #[test]
    fn first_match_wins() {
        let model = model();
        let (index, rule) = model.first_match("main", "web-1").unwrap().unwrap();
        assert_eq!(index, 0);
        assert_eq!(rule.target_file, "web-main.yaml");
    }

    #[test]
    fn falls_through_to_later_rules() {
        let model = model();
        let (_, rule) = model.first_match("dev", "web-1").unwrap().unwrap();
        assert_eq!(rule.target_file, "web-any.yaml");
        let (_, rule) = model.first_match("dev", "db-1").unwrap().unwrap();
        assert_eq!(rule.target_file, "default.yaml");
    }

    #[test]
    fn no_match() {
        let model = MappingsModel::new(vec![MappingEntry::new(vec!["main".into()], "x", "x.yaml")]);
        assert!(model.first_match("dev", "x").unwrap().is_none());
    }

    #[test]
    fn validate_reports_first_bad_index() {
        let model = MappingsModel::new(vec![
            MappingEntry::new(vec![], "ok", "a.yaml"),
            MappingEntry::new(vec![], "[", "b.yaml"),
            MappingEntry::new(vec![], "(", "c.yaml"),
        ]);
        assert!(matches!(
            model.validate(),
            Err(MappingsError::InvalidPattern { index: Some(1), .. })
        ));
    }

    #[test]
    fn first_match_reports_real_rule_index() {
        let model = MappingsModel::new(vec![
            MappingEntry::new(vec!["main".into()], "x", "a.yaml"),
            MappingEntry::new(vec!["dev".into()], "(", "b.yaml"),
        ]);
        assert!(matches!(
            model.first_match("dev", "y"),
            Err(MappingsError::InvalidPattern { index: Some(1), .. })
        ));
    }

    #[test]
    fn parse_and_print() {
        let text = model().to_text().unwrap();
        assert_eq!(MappingsModel::parse(&text).unwrap(), model());
    }
}
