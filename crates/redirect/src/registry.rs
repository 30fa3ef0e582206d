//! Ordered rule collection

use crate::rule::PatternRule;
use crate::rules::default_rules;
use wynnparse_core::{ChatChannel, Result};

/// Rule Registry
///
/// # Purpose
/// Holds the redirect rules in dispatch order. Built once at startup and
/// never mutated afterwards.
#[derive(Debug)]
pub struct RuleRegistry {
    rules: Vec<PatternRule>,
}

impl RuleRegistry {
    /// Registry with the built-in rule table
    ///
    /// # Errors
    /// Returns an error if a built-in pattern fails to compile
    pub fn with_default_rules() -> Result<Self> {
        let rules = default_rules()?;
        tracing::debug!("Registered {} redirect rules", rules.len());
        Ok(Self { rules })
    }

    /// Registry with caller-supplied rules, kept in the given order
    pub fn from_rules(rules: Vec<PatternRule>) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &[PatternRule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&PatternRule> {
        self.rules.iter().find(|rule| rule.name() == name)
    }

    /// Rules that have a pattern for `channel`, in dispatch order
    pub fn for_channel(&self, channel: ChatChannel) -> impl Iterator<Item = &PatternRule> {
        self.rules.iter().filter(move |rule| rule.pattern(channel).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_registry() {
        let registry = RuleRegistry::with_default_rules().unwrap();
        assert_eq!(registry.len(), 31);
        assert!(registry.get("SoulPointGain").is_some());
        assert!(registry.get("Teleport").is_none());

        // Rules with a background variant
        let background: Vec<_> = registry
            .for_channel(ChatChannel::Background)
            .map(PatternRule::name)
            .collect();
        assert_eq!(
            background,
            vec![
                "FriendJoin",
                "FriendLeave",
                "HealedByOther",
                "Login",
                "SoulPointGainDiscarder",
                "SoulPointGain",
            ]
        );
        assert_eq!(registry.for_channel(ChatChannel::Foreground).count(), 31);
    }

    #[test]
    fn test_empty_registry() {
        let registry = RuleRegistry::from_rules(Vec::new());
        assert!(registry.is_empty());
    }
}
