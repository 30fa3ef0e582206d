//! Action bar segments
//!
//! The host splits the action bar into left, center and right segments.
//! Health sits on the left, mana on the right. The center shows the
//! coordinates unless something more important, such as a powder special
//! charge, takes its place.

use super::{classify, SegmentChange, SegmentKind, SegmentTracker};
use crate::events::{ActionBarSegmentEvent, CenterSegmentCleared};
use parking_lot::Mutex;
use regex::{Captures, Regex};
use serde::Serialize;
use std::sync::{Arc, OnceLock};
use wynnparse_core::{ActionBarPosition, EventBus};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ActionBarKind {
    Health,
    Mana,
    PowderSpecial,
    /// Fallback center segment
    Coordinates,
}

static HEALTH: OnceLock<Regex> = OnceLock::new();
static MANA: OnceLock<Regex> = OnceLock::new();
static POWDER_SPECIAL: OnceLock<Regex> = OnceLock::new();
static COORDINATES: OnceLock<Regex> = OnceLock::new();

fn pattern(cell: &'static OnceLock<Regex>, pattern: &str) -> &'static Regex {
    cell.get_or_init(|| Regex::new(pattern).expect("Invalid action bar regex"))
}

impl ActionBarKind {
    pub fn position(&self) -> ActionBarPosition {
        match self {
            Self::Health => ActionBarPosition::Left,
            Self::Mana => ActionBarPosition::Right,
            Self::PowderSpecial | Self::Coordinates => ActionBarPosition::Center,
        }
    }

    fn read(&self, caps: &Captures<'_>) -> Option<ActionBarReading> {
        Some(match self {
            Self::Health => ActionBarReading::Health {
                current: caps[1].parse().ok()?,
                max: caps[2].parse().ok()?,
            },
            Self::Mana => ActionBarReading::Mana {
                current: caps[1].parse().ok()?,
                max: caps[2].parse().ok()?,
            },
            Self::PowderSpecial => ActionBarReading::PowderSpecial {
                symbol: caps[1].chars().next()?,
                charge: caps[2].parse().ok()?,
            },
            Self::Coordinates => ActionBarReading::Coordinates,
        })
    }
}

impl SegmentKind for ActionBarKind {
    /// Powder special must be tried before the coordinates fallback
    const ALL: &'static [Self] = &[Self::Health, Self::Mana, Self::PowderSpecial, Self::Coordinates];

    fn header_pattern(&self) -> &'static Regex {
        match self {
            Self::Health => pattern(&HEALTH, r"❤ (\d+)/(\d+)"),
            Self::Mana => pattern(&MANA, r"✺ (\d+)/(\d+)"),
            Self::PowderSpecial => pattern(&POWDER_SPECIAL, r"(Ⓓ|Ⓐ|Ⓑ|Ⓔ|Ⓒ) (\d+)%"),
            Self::Coordinates => {
                pattern(&COORDINATES, r"(§0 *)§7 ?(-?\d+)§f ?(.+)§7 ?(-?\d+)( *)")
            }
        }
    }

    /// Health and mana are drawn by our own overlays
    fn is_hidden(&self) -> bool {
        matches!(self, Self::Health | Self::Mana)
    }
}

/// Parsed segment payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ActionBarReading {
    Health { current: u32, max: u32 },
    Mana { current: u32, max: u32 },
    PowderSpecial { symbol: char, charge: u32 },
    /// Position is not tracked
    Coordinates,
}

/// Last values read from the action bar
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Vitals {
    /// (current, max)
    pub health: Option<(u32, u32)>,
    /// (current, max)
    pub mana: Option<(u32, u32)>,
    /// (element symbol, charge percent)
    pub powder_special: Option<(char, u32)>,
}

impl Vitals {
    fn apply(&mut self, reading: ActionBarReading) {
        match reading {
            ActionBarReading::Health { current, max } => self.health = Some((current, max)),
            ActionBarReading::Mana { current, max } => self.mana = Some((current, max)),
            ActionBarReading::PowderSpecial { symbol, charge } => {
                self.powder_special = Some((symbol, charge))
            }
            ActionBarReading::Coordinates => {}
        }
    }

    fn clear(&mut self, kind: ActionBarKind) {
        match kind {
            ActionBarKind::Health => self.health = None,
            ActionBarKind::Mana => self.mana = None,
            ActionBarKind::PowderSpecial => self.powder_special = None,
            ActionBarKind::Coordinates => {}
        }
    }
}

#[derive(Default)]
struct ActionBarState {
    tracker: SegmentTracker<ActionBarPosition, ActionBarKind>,
    vitals: Vitals,
}

/// Action Bar Handler
///
/// # Purpose
/// Classifies each positioned segment, keeps the latest readings and posts
/// transitions on the bus.
pub struct ActionBarHandler {
    state: Mutex<ActionBarState>,
    bus: Arc<EventBus>,
}

impl ActionBarHandler {
    pub fn new(bus: Arc<EventBus>) -> Self {
        Self {
            state: Mutex::new(ActionBarState::default()),
            bus,
        }
    }

    pub fn vitals(&self) -> Vitals {
        self.state.lock().vitals
    }

    /// Handle one segment for this tick
    ///
    /// # Returns
    /// `true` if the raw segment should not be rendered
    pub fn on_segment(&self, position: ActionBarPosition, text: &str) -> bool {
        let kinds = ActionBarKind::ALL
            .iter()
            .copied()
            .filter(|kind| kind.position() == position);
        let classified = classify(kinds, text);
        let reading = classified
            .as_ref()
            .and_then(|(kind, caps)| kind.read(caps));
        let kind = classified.map(|(kind, _)| kind);

        let changes = {
            let mut state = self.state.lock();
            let changes = state.tracker.observe(position, kind);
            for (kind, change) in &changes {
                match change {
                    SegmentChange::Removed => state.vitals.clear(*kind),
                    SegmentChange::Updated => {
                        if let Some(reading) = reading {
                            state.vitals.apply(reading);
                        }
                    }
                    SegmentChange::Appeared => {}
                }
            }
            changes
        };

        for (kind, change) in changes {
            tracing::trace!("Action bar {:?} {:?} at {}", kind, change, position.as_str());
            self.bus.post(ActionBarSegmentEvent {
                change,
                position,
                kind,
                reading: match change {
                    SegmentChange::Removed => None,
                    _ => reading,
                },
            });

            if kind == ActionBarKind::Coordinates && change == SegmentChange::Appeared {
                self.bus.post(CenterSegmentCleared);
            }
        }

        kind.map_or(false, |kind| kind.is_hidden())
    }
}
