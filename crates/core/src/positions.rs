//! On-screen anchor positions for segmented text regions

use serde::{Deserialize, Serialize};

/// Anchor of an action bar segment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActionBarPosition {
    Left,
    Center,
    Right,
}

impl ActionBarPosition {
    pub const ALL: [ActionBarPosition; 3] = [Self::Left, Self::Center, Self::Right];

    pub fn from_str(value: &str) -> Option<Self> {
        match value.to_ascii_lowercase().as_str() {
            "left" => Some(Self::Left),
            "center" | "centre" => Some(Self::Center),
            "right" => Some(Self::Right),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Center => "center",
            Self::Right => "right",
        }
    }
}
