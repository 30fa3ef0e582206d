//! # wynnparse Game State Layer
//!
//! Stateful parsers that follow the player's session from server text.
//!
//! ## Modules
//!
//! - `events` - Domain events posted on the bus
//! - `world` - Current world state and its transitions
//! - `relations` - Friend and party lists
//! - `mask` - Shaman mask titles
//! - `trade_market` - Price shorthand for the trade market prompt
//! - `segments` - Scoreboard and action bar segment classifiers

pub mod events;
pub mod world;
pub mod relations;
pub mod mask;
pub mod trade_market;
pub mod segments;

// Re-export commonly used types
pub use events::*;
pub use world::WorldStateTracker;
pub use relations::{ListState, RelationsParser};
pub use mask::{MaskParser, MaskType};
pub use trade_market::TradeMarketConverter;
pub use segments::actionbar::{ActionBarHandler, ActionBarKind, ActionBarReading, Vitals};
pub use segments::scoreboard::{
    GuildAttack, GuildAttackTracker, Objective, ObjectiveTracker, QuestTracker, ScoreboardHandler,
    ScoreboardKind, ScoreboardSegment, TrackedQuest,
};
pub use segments::{SegmentChange, SegmentKind, SegmentListener, SegmentTracker};
