//! # Territory Info
//!
//! Details of a guild-owned territory as shown in its advancement
//! description:
//!
//! ```text
//! §a+9000 Emeralds per Hour
//! §f+3600 Ore per Hour
//! §a0/3000 stored
//! §f✦ 120/300 stored
//! §7Treasury: §fMedium
//! §7Territory Defences: §cVery High
//! §7Trading Routes:
//! §7- Detlas
//! ```
//!
//! Storage lines do not name their resource; the line colour does.

use regex::Regex;
use std::collections::BTreeMap;
use std::sync::OnceLock;
use wynnparse_protocol::{ChatFormatting, FORMAT_PREFIX};

/// Resources produced by territories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum GuildResource {
    Emeralds,
    Ore,
    Wood,
    Fish,
    Crops,
}

impl GuildResource {
    pub const ALL: [GuildResource; 5] = [Self::Emeralds, Self::Ore, Self::Wood, Self::Fish, Self::Crops];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Emeralds => "Emeralds",
            Self::Ore => "Ore",
            Self::Wood => "Wood",
            Self::Fish => "Fish",
            Self::Crops => "Crops",
        }
    }

    /// Colour the resource is written in
    pub fn color(&self) -> ChatFormatting {
        match self {
            Self::Emeralds => ChatFormatting::Green,
            Self::Ore => ChatFormatting::White,
            Self::Wood => ChatFormatting::Gold,
            Self::Fish => ChatFormatting::Aqua,
            Self::Crops => ChatFormatting::Yellow,
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|resource| resource.name() == name)
    }

    pub fn from_color(color: ChatFormatting) -> Option<Self> {
        Self::ALL.into_iter().find(|resource| resource.color() == color)
    }
}

/// Treasury and defence rating
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ResourceLevel {
    VeryLow,
    Low,
    Medium,
    High,
    VeryHigh,
}

impl ResourceLevel {
    pub fn from_str(value: &str) -> Option<Self> {
        match value.trim() {
            "Very Low" => Some(Self::VeryLow),
            "Low" => Some(Self::Low),
            "Medium" => Some(Self::Medium),
            "High" => Some(Self::High),
            "Very High" => Some(Self::VeryHigh),
            _ => None,
        }
    }

    /// 1 for very low up to 5 for very high
    pub fn level(&self) -> u8 {
        match self {
            Self::VeryLow => 1,
            Self::Low => 2,
            Self::Medium => 3,
            Self::High => 4,
            Self::VeryHigh => 5,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResourceStorage {
    pub current: u64,
    pub max: u64,
}

/// Parsed territory advancement
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TerritoryInfo {
    pub headquarters: bool,
    pub defences: Option<ResourceLevel>,
    pub treasury: Option<ResourceLevel>,
    /// Per hour
    pub generators: BTreeMap<GuildResource, u64>,
    pub storage: BTreeMap<GuildResource, ResourceStorage>,
    pub trading_routes: Vec<String>,
}

struct InfoPatterns {
    generator: Regex,
    storage: Regex,
    treasury: Regex,
    defences: Regex,
    route: Regex,
}

static PATTERNS: OnceLock<InfoPatterns> = OnceLock::new();

fn patterns() -> &'static InfoPatterns {
    PATTERNS.get_or_init(|| {
        let compile = |pattern: &str| Regex::new(pattern).expect("Invalid territory info regex");
        InfoPatterns {
            generator: compile(r"^\+(\d+) (Emeralds|Ore|Wood|Fish|Crops) per Hour$"),
            storage: compile(r"^(?:\S )?(\d+)/(\d+) stored$"),
            treasury: compile(r"^Treasury: (.+)$"),
            defences: compile(r"^(?:Territory )?Defences: (.+)$"),
            route: compile(r"^- (.+)$"),
        }
    })
}

/// First colour code of a formatted line
fn leading_color(coded: &str) -> Option<ChatFormatting> {
    let mut chars = coded.chars();
    while let Some(c) = chars.next() {
        if c != FORMAT_PREFIX {
            continue;
        }
        if let Some(format) = chars.next().and_then(ChatFormatting::from_code) {
            if format.is_color() {
                return Some(format);
            }
        }
    }
    None
}

impl TerritoryInfo {
    /// Parse description lines
    ///
    /// # Arguments
    /// * `raw` - Lines without formatting
    /// * `colored` - The same lines with formatting
    /// * `headquarters` - The advancement uses the challenge frame
    pub fn parse(raw: &[String], colored: &[String], headquarters: bool) -> Self {
        let patterns = patterns();
        let mut info = Self {
            headquarters,
            ..Self::default()
        };
        let mut in_routes = false;

        for (index, line) in raw.iter().enumerate() {
            let line = line.trim();
            if line.is_empty() {
                in_routes = false;
                continue;
            }

            if line == "Trading Routes:" {
                in_routes = true;
                continue;
            }
            if in_routes {
                if let Some(caps) = patterns.route.captures(line) {
                    info.trading_routes.push(caps[1].trim().to_string());
                    continue;
                }
                in_routes = false;
            }

            if let Some(caps) = patterns.generator.captures(line) {
                if let (Ok(amount), Some(resource)) = (caps[1].parse(), GuildResource::from_name(&caps[2])) {
                    info.generators.insert(resource, amount);
                }
            } else if let Some(caps) = patterns.storage.captures(line) {
                let resource = colored
                    .get(index)
                    .and_then(|coded| leading_color(coded))
                    .and_then(GuildResource::from_color);
                if let (Some(resource), Ok(current), Ok(max)) = (resource, caps[1].parse(), caps[2].parse()) {
                    info.storage.insert(resource, ResourceStorage { current, max });
                }
            } else if let Some(caps) = patterns.treasury.captures(line) {
                info.treasury = ResourceLevel::from_str(&caps[1]);
            } else if let Some(caps) = patterns.defences.captures(line) {
                info.defences = ResourceLevel::from_str(&caps[1]);
            }
        }

        info
    }

    /// Defence level, 0 when unknown
    pub fn defence_level(&self) -> u8 {
        self.defences.map_or(0, |level| level.level())
    }
}
