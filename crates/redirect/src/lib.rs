//! # wynnparse Chat Redirects
//!
//! Hides noisy server chat lines and replaces them with short notifications.
//!
//! ## Modules
//!
//! - `rule` - A single pattern rule and its projection
//! - `rules` - The built-in rule table, in registration order
//! - `registry` - Ordered, immutable rule collection
//! - `dispatcher` - First-match dispatch against the live configuration

pub mod rule;
pub mod rules;
pub mod registry;
pub mod dispatcher;

// Re-export commonly used types
pub use rule::{PatternRule, Projection};
pub use registry::RuleRegistry;
pub use dispatcher::{ChatRedirector, RedirectOutcome};
