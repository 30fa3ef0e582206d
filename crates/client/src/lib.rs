//! # wynnparse Client
//!
//! Owns every parser for one session and routes host callbacks to them.
//!
//! ## Modules
//!
//! - `context` - [`ClientContext`], the single entry point for host events

pub mod context;

pub use context::{ChatOutcome, ClientContext};
