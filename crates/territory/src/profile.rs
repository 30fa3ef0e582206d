//! # Territory Profiles
//!
//! Territory ownership document, keyed by territory name:
//!
//! ```json
//! {
//!   "territories": {
//!     "Ragni": {
//!       "territory": "Ragni",
//!       "guild": "Some Guild",
//!       "guildPrefix": "SG",
//!       "guildColor": "#1e90ff",
//!       "acquired": "2022-09-01 12:00:00",
//!       "level": 1,
//!       "location": { "startX": -955, "startY": -1415, "endX": -756, "endY": -1594 }
//!     }
//!   }
//! }
//! ```

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Map rectangle of a territory; `y` is the horizontal map axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TerritoryLocation {
    pub start_x: i32,
    pub start_y: i32,
    pub end_x: i32,
    pub end_y: i32,
}

impl TerritoryLocation {
    /// Corners may come in any order
    pub fn contains(&self, x: i32, y: i32) -> bool {
        let (min_x, max_x) = (self.start_x.min(self.end_x), self.start_x.max(self.end_x));
        let (min_y, max_y) = (self.start_y.min(self.end_y), self.start_y.max(self.end_y));
        (min_x..=max_x).contains(&x) && (min_y..=max_y).contains(&y)
    }

    pub fn center(&self) -> (i32, i32) {
        ((self.start_x + self.end_x) / 2, (self.start_y + self.end_y) / 2)
    }
}

fn default_level() -> u32 {
    1
}

/// Ownership data for one territory
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TerritoryProfile {
    /// Territory name; filled from the document key when absent
    #[serde(rename = "territory", default)]
    pub name: String,
    #[serde(default)]
    pub guild: Option<String>,
    #[serde(default)]
    pub guild_prefix: Option<String>,
    /// `#rrggbb`
    #[serde(default)]
    pub guild_color: Option<String>,
    #[serde(default)]
    pub acquired: Option<String>,
    #[serde(default = "default_level")]
    pub level: u32,
    #[serde(default)]
    pub location: Option<TerritoryLocation>,
}

#[derive(Deserialize)]
struct TerritoryDocument {
    territories: Option<HashMap<String, TerritoryProfile>>,
}

/// Parse a territory document
///
/// # Returns
/// `None` if the document has no `territories` object
///
/// # Errors
/// Returns an error if the document is not valid JSON of the expected shape
pub fn parse_territory_document(json: &str) -> Result<Option<HashMap<String, TerritoryProfile>>> {
    let document: TerritoryDocument = serde_json::from_str(json)?;

    Ok(document.territories.map(|territories| {
        territories
            .into_iter()
            .map(|(key, mut profile)| {
                if profile.name.is_empty() {
                    profile.name = key.clone();
                }
                (key, profile)
            })
            .collect()
    }))
}
