//! # Territory Manager
//!
//! Holds the latest territory profile snapshot and the POIs built from the
//! territory advancements the server sends.

use crate::error::Result;
use crate::info::TerritoryInfo;
use crate::profile::{parse_territory_document, TerritoryProfile};
use dashmap::DashMap;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use wynnparse_core::EventBus;
use wynnparse_protocol::strip_formatting;

/// Posted after every successful profile refresh
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TerritoriesRefreshed {
    pub count: usize,
}

/// How `filtered_pois` compares defence levels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DefenceFilter {
    /// At least the given level
    Higher,
    /// At most the given level
    Lower,
    /// Exactly the given level
    Default,
}

impl DefenceFilter {
    fn accepts(&self, defence: u8, level: u8) -> bool {
        match self {
            Self::Higher => defence >= level,
            Self::Lower => defence <= level,
            Self::Default => defence == level,
        }
    }
}

/// Advancement frame; headquarters use `Challenge`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdvancementFrame {
    Task,
    Goal,
    Challenge,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdvancementDisplay {
    /// Formatted title
    pub title: String,
    /// Formatted description, lines separated by `\n`
    pub description: String,
    pub frame: AdvancementFrame,
}

/// One advancement added by the server
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdvancementEntry {
    pub id: String,
    /// Entries without a display only draw the connecting lines
    pub display: Option<AdvancementDisplay>,
}

/// A territory as shown on the map
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TerritoryPoi {
    pub profile: TerritoryProfile,
    /// Only known once the territory advancement has been received
    pub info: Option<TerritoryInfo>,
}

impl TerritoryPoi {
    pub fn name(&self) -> &str {
        &self.profile.name
    }

    pub fn defence_level(&self) -> u8 {
        self.info.as_ref().map_or(0, TerritoryInfo::defence_level)
    }
}

/// Territory Manager
///
/// # Purpose
/// Serves territory lookups from an immutable profile snapshot that the
/// poller swaps out wholesale, and tracks advancement-derived POIs.
///
/// # Thread Safety
/// Readers clone the snapshot `Arc` and never block the poller for longer
/// than the swap. POIs live in a DashMap.
pub struct TerritoryManager {
    /// Key: territory name
    profiles: RwLock<Arc<HashMap<String, TerritoryProfile>>>,
    /// Key: territory name
    pois: DashMap<String, TerritoryPoi>,
    bus: Arc<EventBus>,
}

impl TerritoryManager {
    pub fn new(bus: Arc<EventBus>) -> Self {
        tracing::debug!("Creating TerritoryManager");

        Self {
            profiles: RwLock::new(Arc::new(HashMap::new())),
            pois: DashMap::new(),
            bus,
        }
    }

    /// Current profile snapshot
    #[inline]
    pub fn profiles(&self) -> Arc<HashMap<String, TerritoryProfile>> {
        self.profiles.read().clone()
    }

    pub fn profile(&self, name: &str) -> Option<TerritoryProfile> {
        self.profiles.read().get(name).cloned()
    }

    /// Sorted territory names
    pub fn territory_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.profiles.read().keys().cloned().collect();
        names.sort();
        names
    }

    /// One POI per profile, with advancement info where known
    pub fn profile_pois(&self) -> Vec<TerritoryPoi> {
        let mut pois: Vec<TerritoryPoi> = self
            .profiles()
            .values()
            .map(|profile| TerritoryPoi {
                profile: profile.clone(),
                info: self.pois.get(&profile.name).and_then(|poi| poi.info.clone()),
            })
            .collect();
        pois.sort_by(|a, b| a.profile.name.cmp(&b.profile.name));
        pois
    }

    /// Swap in a new snapshot
    pub fn replace_profiles(&self, profiles: HashMap<String, TerritoryProfile>) {
        let count = profiles.len();
        *self.profiles.write() = Arc::new(profiles);

        tracing::debug!("Territory profiles refreshed ({} territories)", count);
        self.bus.post(TerritoriesRefreshed { count });
    }

    /// Parse a territory document and swap it in
    ///
    /// # Returns
    /// `false` if the document had no `territories` object; the snapshot is
    /// left untouched
    ///
    /// # Errors
    /// Returns an error if the document is malformed
    pub fn refresh_from_document(&self, json: &str) -> Result<bool> {
        match parse_territory_document(json)? {
            Some(profiles) => {
                self.replace_profiles(profiles);
                Ok(true)
            }
            None => {
                tracing::debug!("Territory document has no territories, ignoring");
                Ok(false)
            }
        }
    }

    /// Build POIs from newly added advancements
    ///
    /// # Returns
    /// The number of POIs inserted or replaced
    pub fn on_advancement_update(&self, entries: &[AdvancementEntry]) -> usize {
        let mut parsed: HashMap<String, TerritoryInfo> = HashMap::new();

        for entry in entries {
            let Some(display) = &entry.display else {
                continue;
            };

            let name = strip_formatting(&display.title).replace(['[', ']'], "");
            let name = name.trim();
            if name.is_empty() || parsed.contains_key(name) {
                continue;
            }

            let colored: Vec<String> = display.description.split('\n').map(str::to_string).collect();
            let raw: Vec<String> = strip_formatting(&display.description)
                .split('\n')
                .map(str::to_string)
                .collect();
            let headquarters = display.frame == AdvancementFrame::Challenge;

            parsed.insert(name.to_string(), TerritoryInfo::parse(&raw, &colored, headquarters));
        }

        let snapshot = self.profiles();
        let mut updated = 0;
        for (name, info) in parsed {
            let Some(profile) = snapshot.get(&name) else {
                tracing::trace!("No profile for territory advancement {}", name);
                continue;
            };
            self.pois.insert(
                name,
                TerritoryPoi {
                    profile: profile.clone(),
                    info: Some(info),
                },
            );
            updated += 1;
        }

        tracing::debug!("Updated {} territory POIs from advancements", updated);
        updated
    }

    pub fn poi(&self, name: &str) -> Option<TerritoryPoi> {
        self.pois.get(name).map(|entry| entry.clone())
    }

    /// Advancement-derived POIs
    pub fn pois(&self) -> Vec<TerritoryPoi> {
        self.pois.iter().map(|entry| entry.value().clone()).collect()
    }

    /// Advancement-derived POIs whose defence level passes `filter`
    pub fn filtered_pois(&self, level: u8, filter: DefenceFilter) -> Vec<TerritoryPoi> {
        self.pois
            .iter()
            .filter(|entry| filter.accepts(entry.defence_level(), level))
            .map(|entry| entry.value().clone())
            .collect()
    }

    /// Number of advancement-derived POIs
    #[inline]
    pub fn poi_count(&self) -> usize {
        self.pois.len()
    }
}
