//! # Chat Redirector
//!
//! Runs each incoming chat line against the registry. The first rule that
//! is not set to `keep` and whose pattern matches wins: the line is
//! suppressed and, for `redirect`, its notifications are queued.

use crate::registry::RuleRegistry;
use std::sync::Arc;
use wynnparse_config::{ConfigStore, RedirectAction};
use wynnparse_core::NotificationSink;
use wynnparse_protocol::RawLine;

/// What happened to a dispatched line
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RedirectOutcome {
    /// The line must not reach the chat window
    pub suppressed: bool,
    /// Name of the rule that fired
    pub rule: Option<&'static str>,
    /// Action applied by that rule
    pub action: Option<RedirectAction>,
    /// Notifications forwarded to the sink
    pub notifications: Vec<String>,
}

impl RedirectOutcome {
    /// No rule matched; the line is shown unchanged
    pub fn passthrough() -> Self {
        Self::default()
    }
}

/// Chat Redirector
///
/// # Purpose
/// Owns the rule registry and reads each category's action from the live
/// configuration at dispatch time.
pub struct ChatRedirector {
    registry: RuleRegistry,
    config: ConfigStore,
    sink: Arc<dyn NotificationSink>,
}

impl ChatRedirector {
    pub fn new(registry: RuleRegistry, config: ConfigStore, sink: Arc<dyn NotificationSink>) -> Self {
        Self {
            registry,
            config,
            sink,
        }
    }

    pub fn registry(&self) -> &RuleRegistry {
        &self.registry
    }

    /// Dispatch one chat line
    ///
    /// # Process
    /// 1. Pass lines spoken by players or NPCs through untouched
    /// 2. Skip rules whose category is set to `keep`
    /// 3. Skip rules without a pattern for the line's channel
    /// 4. On the first match, suppress the line and stop
    /// 5. For `redirect`, forward the projected notifications to the sink
    pub fn dispatch(&self, line: &RawLine) -> RedirectOutcome {
        let recipient = line.recipient();
        if !recipient.is_info() {
            tracing::trace!("Not redirecting {:?} line", recipient);
            return RedirectOutcome::passthrough();
        }

        for rule in self.registry.rules() {
            let action = self.config.redirect_action(rule.category());
            if action == RedirectAction::Keep {
                continue;
            }

            let Some(pattern) = rule.pattern(line.channel()) else {
                continue;
            };
            let Some(captures) = pattern.captures(line.coded()) else {
                continue;
            };

            tracing::debug!("Redirect rule {} matched ({})", rule.name(), action.as_str());

            let notifications = match action {
                RedirectAction::Redirect => rule.notifications(&captures),
                _ => Vec::new(),
            };
            for notification in &notifications {
                self.sink.queue_message(notification);
            }

            return RedirectOutcome {
                suppressed: true,
                rule: Some(rule.name()),
                action: Some(action),
                notifications,
            };
        }

        RedirectOutcome::passthrough()
    }
}

impl std::fmt::Debug for ChatRedirector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChatRedirector")
            .field("rules", &self.registry.len())
            .finish()
    }
}
