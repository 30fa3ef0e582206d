//! # Shaman Masks
//!
//! The server announces mask switches through the subtitle, either as
//! `§cMask of the Lunatic` or as a transition line containing `➤`.

use crate::events::{MaskChanged, MaskTitle, WorldStateChanged};
use parking_lot::Mutex;
use regex::Regex;
use serde::Serialize;
use std::sync::{Arc, OnceLock};
use wynnparse_config::ConfigStore;
use wynnparse_core::EventBus;
use wynnparse_protocol::ChatFormatting;

static MASK_REGEX: OnceLock<Regex> = OnceLock::new();

fn mask_regex() -> &'static Regex {
    MASK_REGEX.get_or_init(|| {
        Regex::new(r"^§cMask of the (Coward|Lunatic|Fanatic)$").expect("Invalid mask regex")
    })
}

/// Worn shaman mask
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Default)]
pub enum MaskType {
    #[default]
    None,
    Lunatic,
    Fanatic,
    Coward,
    Awakened,
}

impl MaskType {
    pub const ALL: [MaskType; 5] = [
        Self::None,
        Self::Lunatic,
        Self::Fanatic,
        Self::Coward,
        Self::Awakened,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::None => "None",
            Self::Lunatic => "Lunatic",
            Self::Fanatic => "Fanatic",
            Self::Coward => "Coward",
            Self::Awakened => "Awakened",
        }
    }

    /// Overlay colour
    pub fn color(&self) -> ChatFormatting {
        match self {
            Self::None => ChatFormatting::Gray,
            Self::Lunatic => ChatFormatting::DarkRed,
            Self::Fanatic => ChatFormatting::Gold,
            Self::Coward => ChatFormatting::Aqua,
            Self::Awakened => ChatFormatting::DarkPurple,
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|mask| mask.name() == name)
    }

    /// Mask named in a subtitle
    ///
    /// A plain `Mask of the X` title names the mask directly. Otherwise the
    /// first mask in declaration order whose name appears wins.
    pub fn parse_title(title: &str) -> Self {
        if let Some(caps) = mask_regex().captures(title) {
            return Self::from_name(&caps[1]).unwrap_or_default();
        }

        Self::ALL
            .into_iter()
            .filter(|mask| *mask != Self::None)
            .find(|mask| title.contains(mask.name()))
            .unwrap_or_default()
    }
}

/// Whether a subtitle is a mask announcement at all
pub fn is_mask_title(title: &str) -> bool {
    title.contains("Mask of the ") || title.contains('➤')
}

/// Mask Parser
///
/// # Purpose
/// Tracks the current mask from subtitles and decides whether the title
/// itself is shown.
pub struct MaskParser {
    current: Mutex<MaskType>,
    config: ConfigStore,
    bus: Arc<EventBus>,
}

impl MaskParser {
    pub fn new(config: ConfigStore, bus: Arc<EventBus>) -> Self {
        Self {
            current: Mutex::new(MaskType::None),
            config,
            bus,
        }
    }

    pub fn current(&self) -> MaskType {
        *self.current.lock()
    }

    /// Handle a subtitle
    ///
    /// # Returns
    /// `true` if the subtitle should be hidden
    pub fn on_subtitle(&self, title: &str) -> bool {
        if !is_mask_title(title) {
            return false;
        }

        let mask = MaskType::parse_title(title);
        self.set(mask);

        let suppressed = self.config.read(|config| config.hide_mask_titles);
        tracing::debug!("Mask title parsed as {} (suppressed: {})", mask.name(), suppressed);
        self.bus.post(MaskTitle { mask, suppressed });
        suppressed
    }

    /// Any world change takes the mask off
    pub fn on_world_state_changed(&self, _event: &WorldStateChanged) {
        self.set(MaskType::None);
    }

    fn set(&self, current: MaskType) {
        let previous = std::mem::replace(&mut *self.current.lock(), current);
        if previous != current {
            self.bus.post(MaskChanged { previous, current });
        }
    }

    /// Overlay text for the current mask
    ///
    /// # Returns
    /// `None` when no mask is worn, unless the overlay is configured to show
    /// that too
    pub fn overlay_text(&self) -> Option<String> {
        let mask = self.current();
        self.config.read(|config| {
            if mask == MaskType::None && !config.display_none_mask {
                return None;
            }
            Some(format!(
                "{}{}",
                mask.color(),
                config.mask_display.replace("%mask%", mask.name())
            ))
        })
    }
}

impl std::fmt::Debug for MaskParser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MaskParser")
            .field("current", &self.current())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wynnparse_core::WorldState;

    fn parser() -> (MaskParser, ConfigStore, Arc<Mutex<Vec<MaskChanged>>>) {
        let bus = Arc::new(EventBus::new());
        let changes = Arc::new(Mutex::new(Vec::new()));
        let sink = changes.clone();
        bus.subscribe(move |event: &MaskChanged| sink.lock().push(*event));

        let config = ConfigStore::default();
        (MaskParser::new(config.clone(), bus), config, changes)
    }

    #[test]
    fn test_parse_title() {
        assert_eq!(MaskType::parse_title("§cMask of the Lunatic"), MaskType::Lunatic);
        assert_eq!(MaskType::parse_title("§cMask of the Coward"), MaskType::Coward);
        assert_eq!(MaskType::parse_title("§5Awakened §7➤ §6Fanatic"), MaskType::Fanatic);
        assert_eq!(MaskType::parse_title("§6Fanatic §7➤ §5Awakened"), MaskType::Fanatic);
        assert_eq!(MaskType::parse_title("§bCoward §7➤ §4Lunatic"), MaskType::Lunatic);
        assert_eq!(MaskType::parse_title("§7➤"), MaskType::None);
    }

    #[test]
    fn test_non_mask_titles_pass() {
        let (parser, _, changes) = parser();
        assert!(!parser.on_subtitle("§aWelcome to Wynncraft"));
        assert!(changes.lock().is_empty());
    }

    #[test]
    fn test_title_suppression_follows_config() {
        let (parser, config, changes) = parser();

        assert!(parser.on_subtitle("§cMask of the Lunatic"));
        assert_eq!(parser.current(), MaskType::Lunatic);

        config.update(|config| config.hide_mask_titles = false);
        assert!(!parser.on_subtitle("§cMask of the Lunatic"));

        // Same mask twice is one change
        assert_eq!(
            *changes.lock(),
            vec![MaskChanged { previous: MaskType::None, current: MaskType::Lunatic }]
        );
    }

    #[test]
    fn test_world_change_resets() {
        let (parser, _, changes) = parser();
        parser.on_subtitle("§cMask of the Fanatic");

        parser.on_world_state_changed(&WorldStateChanged {
            previous: WorldState::World,
            current: WorldState::Hub,
        });
        assert_eq!(parser.current(), MaskType::None);
        assert_eq!(changes.lock().len(), 2);
    }

    #[test]
    fn test_overlay_text() {
        let (parser, config, _) = parser();
        assert_eq!(parser.overlay_text(), None);

        config.update(|config| config.display_none_mask = true);
        assert_eq!(parser.overlay_text().as_deref(), Some("§7None mask"));

        parser.on_subtitle("§cMask of the Coward");
        config.update(|config| config.mask_display = "Mask: %mask%".into());
        assert_eq!(parser.overlay_text().as_deref(), Some("§bMask: Coward"));
    }
}
