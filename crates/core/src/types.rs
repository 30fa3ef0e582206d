//! Core type definitions

use serde::{Deserialize, Serialize};

/// Chat delivery style
///
/// The server sends the same logical message in two styles, so patterns
/// come in a foreground and a background variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChatChannel {
    /// Normal chat
    Foreground,
    /// Dimmed chat replayed behind an open dialogue
    Background,
}

impl ChatChannel {
    pub fn from_str(value: &str) -> Option<Self> {
        match value.to_ascii_lowercase().as_str() {
            "fg" | "foreground" => Some(Self::Foreground),
            "bg" | "background" => Some(Self::Background),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Foreground => "foreground",
            Self::Background => "background",
        }
    }
}

/// Where the client currently is in the session lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WorldState {
    NotConnected,
    Connecting,
    CharacterSelection,
    Hub,
    /// Playing on a live world
    World,
}

impl WorldState {
    pub fn from_str(value: &str) -> Option<Self> {
        match value.to_ascii_lowercase().as_str() {
            "none" | "notconnected" | "not_connected" => Some(Self::NotConnected),
            "connecting" => Some(Self::Connecting),
            "select" | "characterselection" | "character_selection" => {
                Some(Self::CharacterSelection)
            }
            "hub" => Some(Self::Hub),
            "world" => Some(Self::World),
            _ => None,
        }
    }

    pub fn is_in_world(&self) -> bool {
        matches!(self, Self::World)
    }
}

impl Default for WorldState {
    fn default() -> Self {
        Self::NotConnected
    }
}
