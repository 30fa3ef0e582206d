//! Redirect categories and their actions

/// What to do with a chat line matched by a redirect rule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RedirectAction {
    /// Leave the line alone
    Keep,
    /// Suppress the line
    Hide,
    /// Suppress the line and show a short notification instead
    Redirect,
}

impl RedirectAction {
    pub fn from_str(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "keep" => Some(Self::Keep),
            "hide" => Some(Self::Hide),
            "redirect" => Some(Self::Redirect),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Keep => "keep",
            Self::Hide => "hide",
            Self::Redirect => "redirect",
        }
    }
}

impl Default for RedirectAction {
    fn default() -> Self {
        Self::Redirect
    }
}

/// User-facing toggle shared by one or more redirect rules
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RedirectCategory {
    CraftedDurability,
    FriendJoin,
    Heal,
    Horse,
    HousingTeleport,
    IngredientPouch,
    LoginAnnouncements,
    MageTeleport,
    NotEnoughMana,
    Potion,
    ScrollTeleport,
    Shaman,
    SoulPoint,
    Speed,
    ToolDurability,
    UnusedPoints,
}

impl RedirectCategory {
    pub const ALL: [RedirectCategory; 16] = [
        Self::CraftedDurability,
        Self::FriendJoin,
        Self::Heal,
        Self::Horse,
        Self::HousingTeleport,
        Self::IngredientPouch,
        Self::LoginAnnouncements,
        Self::MageTeleport,
        Self::NotEnoughMana,
        Self::Potion,
        Self::ScrollTeleport,
        Self::Shaman,
        Self::SoulPoint,
        Self::Speed,
        Self::ToolDurability,
        Self::UnusedPoints,
    ];

    /// Configuration key, e.g. `soulPoint`
    pub fn key(&self) -> &'static str {
        match self {
            Self::CraftedDurability => "craftedDurability",
            Self::FriendJoin => "friendJoin",
            Self::Heal => "heal",
            Self::Horse => "horse",
            Self::HousingTeleport => "housingTeleport",
            Self::IngredientPouch => "ingredientPouch",
            Self::LoginAnnouncements => "loginAnnouncements",
            Self::MageTeleport => "mageTeleport",
            Self::NotEnoughMana => "notEnoughMana",
            Self::Potion => "potion",
            Self::ScrollTeleport => "scrollTeleport",
            Self::Shaman => "shaman",
            Self::SoulPoint => "soulPoint",
            Self::Speed => "speed",
            Self::ToolDurability => "toolDurability",
            Self::UnusedPoints => "unusedPoints",
        }
    }

    /// Case-insensitive key lookup
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|category| category.key().eq_ignore_ascii_case(key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_parsing() {
        assert_eq!(RedirectAction::from_str("HIDE"), Some(RedirectAction::Hide));
        assert_eq!(RedirectAction::from_str(" keep "), Some(RedirectAction::Keep));
        assert_eq!(RedirectAction::from_str("drop"), None);
        assert_eq!(RedirectAction::default(), RedirectAction::Redirect);
    }

    #[test]
    fn test_category_keys() {
        for category in RedirectCategory::ALL {
            assert_eq!(RedirectCategory::from_key(category.key()), Some(category));
        }
        assert_eq!(RedirectCategory::from_key("soulpoint"), Some(RedirectCategory::SoulPoint));
        assert_eq!(RedirectCategory::from_key("teleport"), None);
    }
}
