//! World state tracking

use crate::events::WorldStateChanged;
use parking_lot::RwLock;
use std::sync::Arc;
use wynnparse_core::{EventBus, WorldState};

/// World State Tracker
///
/// # Purpose
/// Holds the host-reported session state and posts [`WorldStateChanged`]
/// on every real transition. Parsers that reset on a world change subscribe
/// to that event instead of being called directly.
pub struct WorldStateTracker {
    state: RwLock<WorldState>,
    bus: Arc<EventBus>,
}

impl WorldStateTracker {
    pub fn new(bus: Arc<EventBus>) -> Self {
        Self {
            state: RwLock::new(WorldState::default()),
            bus,
        }
    }

    pub fn current(&self) -> WorldState {
        *self.state.read()
    }

    pub fn is_in_world(&self) -> bool {
        self.current().is_in_world()
    }

    /// Record a new state
    ///
    /// # Returns
    /// `true` if the state changed and an event was posted
    pub fn set(&self, current: WorldState) -> bool {
        let previous = {
            let mut state = self.state.write();
            if *state == current {
                return false;
            }
            std::mem::replace(&mut *state, current)
        };

        tracing::info!("World state {:?} -> {:?}", previous, current);
        // State is stored before posting so subscribers see the new value
        self.bus.post(WorldStateChanged { previous, current });
        true
    }
}

impl std::fmt::Debug for WorldStateTracker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WorldStateTracker")
            .field("state", &self.current())
            .finish()
    }
}
