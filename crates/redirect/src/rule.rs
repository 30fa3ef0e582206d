//! # Pattern Rule
//!
//! One entry of the redirect table: a matcher per chat channel, the category
//! whose configured action applies, and a projection from a match to zero or
//! more notifications.

use regex::{Captures, Regex};
use std::fmt;
use wynnparse_config::RedirectCategory;
use wynnparse_core::{ChatChannel, Result};

/// Builds the replacement notifications for a matched line
///
/// Every capture group a projection reads must be guaranteed by the rule's
/// patterns; the rule table tests cover this for each rule and channel.
pub type Projection = fn(&Captures<'_>) -> Vec<String>;

/// Redirect rule
///
/// # Purpose
/// Immutable association of channel patterns, category and projection.
pub struct PatternRule {
    /// Rule name, used in logs and outcomes
    name: &'static str,

    /// Category whose configured action applies to this rule
    category: RedirectCategory,

    /// Pattern for foreground chat, if the message exists in that style
    foreground: Option<Regex>,

    /// Pattern for background chat, if the message exists in that style
    background: Option<Regex>,

    /// Match to notifications
    project: Projection,
}

impl PatternRule {
    /// Create a rule with no patterns yet
    pub fn new(name: &'static str, category: RedirectCategory, project: Projection) -> Self {
        Self {
            name,
            category,
            foreground: None,
            background: None,
            project,
        }
    }

    /// Set the foreground pattern
    ///
    /// # Errors
    /// Returns an error if the pattern does not compile
    pub fn foreground(mut self, pattern: &str) -> Result<Self> {
        self.foreground = Some(Regex::new(pattern)?);
        Ok(self)
    }

    /// Set the background pattern
    ///
    /// # Errors
    /// Returns an error if the pattern does not compile
    pub fn background(mut self, pattern: &str) -> Result<Self> {
        self.background = Some(Regex::new(pattern)?);
        Ok(self)
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn category(&self) -> RedirectCategory {
        self.category
    }

    /// Pattern for a channel, `None` when the rule does not apply to it
    pub fn pattern(&self, channel: ChatChannel) -> Option<&Regex> {
        match channel {
            ChatChannel::Foreground => self.foreground.as_ref(),
            ChatChannel::Background => self.background.as_ref(),
        }
    }

    /// Run the projection on a successful match
    pub fn notifications(&self, captures: &Captures<'_>) -> Vec<String> {
        (self.project)(captures)
    }
}

impl fmt::Debug for PatternRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PatternRule")
            .field("name", &self.name)
            .field("category", &self.category)
            .field("foreground", &self.foreground.as_ref().map(Regex::as_str))
            .field("background", &self.background.as_ref().map(Regex::as_str))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn echo(captures: &Captures<'_>) -> Vec<String> {
        vec![captures[1].to_string()]
    }

    #[test]
    fn test_channel_patterns() {
        let rule = PatternRule::new("Echo", RedirectCategory::Speed, echo)
            .foreground(r"^fg (\w+)$")
            .unwrap();

        assert!(rule.pattern(ChatChannel::Foreground).is_some());
        assert!(rule.pattern(ChatChannel::Background).is_none());
        assert_eq!(rule.name(), "Echo");
        assert_eq!(rule.category(), RedirectCategory::Speed);

        let pattern = rule.pattern(ChatChannel::Foreground).unwrap();
        let captures = pattern.captures("fg word").unwrap();
        assert_eq!(rule.notifications(&captures), vec!["word"]);
    }

    #[test]
    fn test_invalid_pattern() {
        let result = PatternRule::new("Broken", RedirectCategory::Speed, echo).background("(unclosed");
        assert!(result.is_err());
    }
}
