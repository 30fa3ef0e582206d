//! # wynnparse Territory Data
//!
//! Guild territory profiles polled in the background, joined with the
//! territory details the server sends as advancements.
//!
//! ## Modules
//!
//! - `error` - Territory error type
//! - `profile` - Territory profile document
//! - `info` - Advancement description parsing
//! - `manager` - Profile snapshot and territory POIs
//! - `source` - Where the profile document comes from
//! - `poller` - Background refresh task

pub mod error;
pub mod profile;
pub mod info;
pub mod manager;
pub mod source;
pub mod poller;

pub use error::{Result, TerritoryError};
pub use profile::{parse_territory_document, TerritoryLocation, TerritoryProfile};
pub use info::{GuildResource, ResourceLevel, ResourceStorage, TerritoryInfo};
pub use manager::{
    AdvancementDisplay, AdvancementEntry, AdvancementFrame, DefenceFilter, TerritoriesRefreshed,
    TerritoryManager, TerritoryPoi,
};
pub use source::{FileSource, TerritorySource};
pub use poller::{poll_once, spawn_territory_poller, PollerHandle};
