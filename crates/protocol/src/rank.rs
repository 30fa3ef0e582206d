//! Player rank badges

use crate::formatting::ChatFormatting;

/// Rank tags shown in login announcements
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Rank {
    Vip,
    VipPlus,
    Hero,
    Champion,
    Media,
    Moderator,
    GameMaster,
    Admin,
}

impl Rank {
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "VIP" => Some(Self::Vip),
            "VIP+" => Some(Self::VipPlus),
            "HERO" => Some(Self::Hero),
            "CHAMPION" => Some(Self::Champion),
            "MEDIA" => Some(Self::Media),
            "MOD" | "MODERATOR" => Some(Self::Moderator),
            "GM" => Some(Self::GameMaster),
            "ADMIN" => Some(Self::Admin),
            _ => None,
        }
    }

    pub fn tag(&self) -> &'static str {
        match self {
            Self::Vip => "VIP",
            Self::VipPlus => "VIP+",
            Self::Hero => "HERO",
            Self::Champion => "CHAMPION",
            Self::Media => "MEDIA",
            Self::Moderator => "MOD",
            Self::GameMaster => "GM",
            Self::Admin => "ADMIN",
        }
    }

    /// (bracket colour, tag colour)
    fn colors(&self) -> (ChatFormatting, ChatFormatting) {
        match self {
            Self::Vip => (ChatFormatting::DarkGreen, ChatFormatting::Green),
            Self::VipPlus => (ChatFormatting::DarkAqua, ChatFormatting::Aqua),
            Self::Hero => (ChatFormatting::DarkPurple, ChatFormatting::LightPurple),
            Self::Champion => (ChatFormatting::Yellow, ChatFormatting::Gold),
            Self::Media => (ChatFormatting::DarkPurple, ChatFormatting::LightPurple),
            Self::Moderator => (ChatFormatting::Gold, ChatFormatting::Yellow),
            Self::GameMaster => (ChatFormatting::DarkAqua, ChatFormatting::Aqua),
            Self::Admin => (ChatFormatting::DarkRed, ChatFormatting::Red),
        }
    }

    /// Coloured `[TAG] ` prefix
    pub fn badge(&self) -> String {
        let (outer, inner) = self.colors();
        format!("{outer}[{inner}{}{outer}] ", self.tag())
    }
}

/// Coloured badge for a raw rank tag, grey for tags we do not know
pub fn format_rank(tag: &str) -> String {
    match Rank::from_tag(tag) {
        Some(rank) => rank.badge(),
        None => format!("{gray}[{tag}] ", gray = ChatFormatting::Gray),
    }
}
