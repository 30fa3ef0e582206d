//! Who a chat line is addressed to
//!
//! Server information lines carry no speaker. Anything typed by a player
//! or said by an NPC has a recognisable prefix and is classified here so
//! that parsers meant for server messages can ignore it.

use crate::formatting::strip_formatting;
use regex::Regex;
use std::sync::OnceLock;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecipientType {
    /// Server information; no speaker
    Info,
    /// `[1/2] Npc: ...` dialogue
    Npc,
    /// `[Alice ➤ Bob] ...`
    Private,
    /// `Alice [WC1] shouts: ...`
    Shout,
    Guild,
    Party,
    /// Public chat, `[WC1] Alice: ...` or `[12/Mage] Alice: ...`
    Normal,
}

struct RecipientPatterns {
    npc: Regex,
    private: Regex,
    shout: Regex,
    guild: Regex,
    party: Regex,
    normal: Regex,
}

static PATTERNS: OnceLock<RecipientPatterns> = OnceLock::new();

fn patterns() -> &'static RecipientPatterns {
    PATTERNS.get_or_init(|| {
        let compile = |pattern: &str| Regex::new(pattern).expect("Invalid recipient regex");
        RecipientPatterns {
            npc: compile(r"^\[\d+/\d+\] [^:]+: "),
            private: compile(r"^\[[^\]]+ ➤ [^\]]+\] "),
            shout: compile(r"^\S+ \[[A-Z0-9]+\] shouts: "),
            // Coded: guild and party brackets are told apart by colour
            guild: compile(r"^(?:§r)?§3\[(?:§b)?★*(?:§3)?[^§\]]+§3\] "),
            party: compile(r"^(?:§r)?§7\[(?:§r)?§e"),
            normal: compile(r"^\[[^\]]+\] [^\s:][^:]*: "),
        }
    })
}

impl RecipientType {
    /// Classify a coded chat line
    pub fn classify(coded: &str) -> Self {
        let patterns = patterns();
        if patterns.guild.is_match(coded) {
            return Self::Guild;
        }
        if patterns.party.is_match(coded) {
            return Self::Party;
        }

        let unformatted = strip_formatting(coded);
        if patterns.npc.is_match(&unformatted) {
            Self::Npc
        } else if patterns.private.is_match(&unformatted) {
            Self::Private
        } else if patterns.shout.is_match(&unformatted) {
            Self::Shout
        } else if patterns.normal.is_match(&unformatted) {
            Self::Normal
        } else {
            Self::Info
        }
    }

    pub fn is_info(&self) -> bool {
        matches!(self, Self::Info)
    }
}
