//! # Domain Events
//!
//! Immutable results of successful parsing, posted on the
//! [`EventBus`](wynnparse_core::EventBus) for rendering and other consumers.

use crate::mask::MaskType;
use crate::segments::actionbar::{ActionBarKind, ActionBarReading};
use crate::segments::scoreboard::ScoreboardSegment;
use crate::segments::SegmentChange;
use serde::Serialize;
use std::collections::BTreeSet;
use wynnparse_core::{ActionBarPosition, WorldState};

/// Which relation list changed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum RelationList {
    Friends,
    Party,
}

impl RelationList {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Friends => "friends",
            Self::Party => "party",
        }
    }
}

/// How a relation list changed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ChangeType {
    /// `members` were added
    Add,
    /// `members` were removed
    Remove,
    /// `members` is the complete new list
    Reload,
}

/// Friend or party list update
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RelationsUpdate {
    pub list: RelationList,
    pub members: BTreeSet<String>,
    pub change: ChangeType,
}

impl RelationsUpdate {
    pub fn new(list: RelationList, members: BTreeSet<String>, change: ChangeType) -> Self {
        Self {
            list,
            members,
            change,
        }
    }

    /// Single-member add or remove
    pub fn single(list: RelationList, member: &str, change: ChangeType) -> Self {
        Self::new(list, BTreeSet::from([member.to_string()]), change)
    }

    /// Reload with an empty list
    pub fn cleared(list: RelationList) -> Self {
        Self::new(list, BTreeSet::new(), ChangeType::Reload)
    }
}

/// The worn mask changed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MaskChanged {
    pub previous: MaskType,
    pub current: MaskType,
}

/// A mask title was parsed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MaskTitle {
    pub mask: MaskType,
    /// The title is hidden from the screen
    pub suppressed: bool,
}

/// The client moved between session states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct WorldStateChanged {
    pub previous: WorldState,
    pub current: WorldState,
}

/// A scoreboard segment appeared, changed or went away
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScoreboardSegmentEvent {
    pub change: SegmentChange,
    pub segment: ScoreboardSegment,
}

/// An action bar segment appeared, changed or went away
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActionBarSegmentEvent {
    pub change: SegmentChange,
    pub position: ActionBarPosition,
    pub kind: ActionBarKind,
    /// Parsed payload; `None` for removals
    pub reading: Option<ActionBarReading>,
}

/// The center of the action bar went back to its default segment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CenterSegmentCleared;
