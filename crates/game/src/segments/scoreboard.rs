//! # Scoreboard Segments
//!
//! The sidebar is a flat list of lines. Blank lines split it into blocks;
//! the first line of a block is its header and decides the kind, the rest
//! is content. A block keeps its identity while its kind is unchanged, even
//! when blocks above it come and go.
//!
//! ```text
//!  0  Tracked Quest:          ┐ Quest
//!  1  The Corrupted Village   │
//!  2  Talk to the Mayor       ┘
//!  3                            (blank)
//!  4  Daily Objectives:       ┐ Objective
//!  5  - Slay 50 Mobs: 10/50   ┘
//! ```
//!
//! Lines arrive one by one and are only split and classified at the end of
//! a tick, so a half-updated sidebar is never seen by listeners.

use super::{classify, SegmentChange, SegmentKind, SegmentListener, SegmentTracker};
use crate::events::ScoreboardSegmentEvent;
use parking_lot::{Mutex, RwLock};
use regex::Regex;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, OnceLock};
use std::time::Duration;
use wynnparse_core::EventBus;
use wynnparse_protocol::strip_formatting;

/// Sidebar block kinds, in classification order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ScoreboardKind {
    Quest,
    Party,
    Objective,
    GuildObjective,
    GuildAttackTimer,
}

static QUEST_HEADER: OnceLock<Regex> = OnceLock::new();
static PARTY_HEADER: OnceLock<Regex> = OnceLock::new();
static OBJECTIVE_HEADER: OnceLock<Regex> = OnceLock::new();
static GUILD_OBJECTIVE_HEADER: OnceLock<Regex> = OnceLock::new();
static GUILD_ATTACK_HEADER: OnceLock<Regex> = OnceLock::new();

fn header(cell: &'static OnceLock<Regex>, pattern: &str) -> &'static Regex {
    cell.get_or_init(|| Regex::new(pattern).expect("Invalid scoreboard header regex"))
}

impl SegmentKind for ScoreboardKind {
    const ALL: &'static [Self] = &[
        Self::Quest,
        Self::Party,
        Self::Objective,
        Self::GuildObjective,
        Self::GuildAttackTimer,
    ];

    fn header_pattern(&self) -> &'static Regex {
        match self {
            Self::Quest => header(&QUEST_HEADER, r"^Tracked Quest:$"),
            Self::Party => header(&PARTY_HEADER, r"^Party:\s\[Lv. (\d+)\]$"),
            Self::Objective => header(&OBJECTIVE_HEADER, r"^([★⭑] )?(Daily )?Objectives?:$"),
            Self::GuildObjective => header(&GUILD_OBJECTIVE_HEADER, r"^([★⭑] )?Guild Obj: (.+)$"),
            Self::GuildAttackTimer => header(&GUILD_ATTACK_HEADER, r"^Upcoming Attacks:$"),
        }
    }

    /// The party block is replaced by our own party list
    fn is_hidden(&self) -> bool {
        matches!(self, Self::Party)
    }
}

/// One classified sidebar block
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScoreboardSegment {
    pub kind: ScoreboardKind,
    /// Block position on the sidebar, counted from the top
    pub ordinal: usize,
    /// Header line without formatting
    pub header: String,
    /// Content lines, still formatted
    pub content: Vec<String>,
    /// Sidebar line indices covered by this block, header included
    pub line_indices: Vec<usize>,
}

impl ScoreboardSegment {
    pub fn unformatted_content(&self) -> impl Iterator<Item = String> + '_ {
        self.content.iter().map(|line| strip_formatting(line).trim().to_string())
    }
}

struct Registration {
    kinds: Vec<ScoreboardKind>,
    listener: Arc<dyn SegmentListener<ScoreboardSegment>>,
}

/// A block's identity across ticks: its kind and how many blocks of that
/// kind sit above it
type Slot = (ScoreboardKind, usize);

#[derive(Default)]
struct TickState {
    tracker: SegmentTracker<Slot, ScoreboardKind>,
    segments: HashMap<Slot, ScoreboardSegment>,
}

/// Scoreboard Handler
///
/// # Purpose
/// Collects sidebar line changes, classifies blocks once per tick and
/// delivers transitions to listeners and the bus.
pub struct ScoreboardHandler {
    lines: Mutex<BTreeMap<usize, String>>,
    tick: Mutex<TickState>,
    listeners: RwLock<Vec<Registration>>,
    bus: Arc<EventBus>,
}

impl ScoreboardHandler {
    pub fn new(bus: Arc<EventBus>) -> Self {
        Self {
            lines: Mutex::new(BTreeMap::new()),
            tick: Mutex::new(TickState::default()),
            listeners: RwLock::new(Vec::new()),
            bus,
        }
    }

    /// Register a listener for one or more kinds
    pub fn register_listener(
        &self,
        kinds: &[ScoreboardKind],
        listener: Arc<dyn SegmentListener<ScoreboardSegment>>,
    ) {
        self.listeners.write().push(Registration {
            kinds: kinds.to_vec(),
            listener,
        });
    }

    pub fn on_line(&self, index: usize, text: &str) {
        self.lines.lock().insert(index, text.to_string());
    }

    pub fn on_line_removed(&self, index: usize) {
        self.lines.lock().remove(&index);
    }

    /// Segment currently shown at a block position
    pub fn segment(&self, ordinal: usize) -> Option<ScoreboardSegment> {
        self.tick
            .lock()
            .segments
            .values()
            .find(|segment| segment.ordinal == ordinal)
            .cloned()
    }

    /// Classify the sidebar as it stands at the end of a tick
    ///
    /// # Returns
    /// Line indices that belong to hidden segments
    pub fn on_tick(&self) -> Vec<usize> {
        let blocks = split_blocks(&self.lines.lock());

        let mut classified = Vec::new();
        let mut occurrences: HashMap<ScoreboardKind, usize> = HashMap::new();
        for (ordinal, block) in blocks.iter().enumerate() {
            if let Some(segment) = build_segment(ordinal, block) {
                let occurrence = occurrences.entry(segment.kind).or_default();
                classified.push(((segment.kind, *occurrence), segment));
                *occurrence += 1;
            }
        }

        let mut deliveries = Vec::new();
        let mut hidden = Vec::new();
        {
            let mut tick = self.tick.lock();

            let mut vanished = tick
                .tracker
                .retain_slots(|slot| classified.iter().any(|(seen, _)| seen == slot));
            vanished.sort_by_key(|(slot, _)| tick.segments.get(slot).map(|segment| segment.ordinal));
            for (slot, _) in vanished {
                if let Some(previous) = tick.segments.remove(&slot) {
                    deliveries.push((SegmentChange::Removed, previous));
                }
            }

            for (slot, segment) in classified {
                for (_, change) in tick.tracker.observe(slot, Some(segment.kind)) {
                    deliveries.push((change, segment.clone()));
                }
                if segment.kind.is_hidden() {
                    hidden.extend(segment.line_indices.iter().copied());
                }
                tick.segments.insert(slot, segment);
            }
        }

        for (change, segment) in deliveries {
            self.deliver(change, segment);
        }
        hidden
    }

    fn deliver(&self, change: SegmentChange, segment: ScoreboardSegment) {
        tracing::trace!("Scoreboard {:?} {:?} at {}", segment.kind, change, segment.ordinal);

        let listeners: Vec<_> = self
            .listeners
            .read()
            .iter()
            .filter(|registration| registration.kinds.contains(&segment.kind))
            .map(|registration| registration.listener.clone())
            .collect();

        for listener in listeners {
            match change {
                SegmentChange::Appeared => listener.appeared(&segment),
                SegmentChange::Updated => listener.update(&segment),
                SegmentChange::Removed => listener.removed(&segment),
            }
        }

        self.bus.post(ScoreboardSegmentEvent { change, segment });
    }
}

/// Split sidebar lines into blocks at blank lines
fn split_blocks(lines: &BTreeMap<usize, String>) -> Vec<Vec<(usize, String)>> {
    let mut blocks = Vec::new();
    let mut current = Vec::new();

    for (index, line) in lines {
        if strip_formatting(line).trim().is_empty() {
            if !current.is_empty() {
                blocks.push(std::mem::take(&mut current));
            }
            continue;
        }
        current.push((*index, line.clone()));
    }
    if !current.is_empty() {
        blocks.push(current);
    }
    blocks
}

fn build_segment(ordinal: usize, block: &[(usize, String)]) -> Option<ScoreboardSegment> {
    let (_, header_line) = block.first()?;
    let header = strip_formatting(header_line).trim().to_string();
    let (kind, _) = classify(ScoreboardKind::ALL.iter().copied(), &header)?;

    Some(ScoreboardSegment {
        kind,
        ordinal,
        header,
        content: block[1..].iter().map(|(_, line)| line.clone()).collect(),
        line_indices: block.iter().map(|(index, _)| *index).collect(),
    })
}

/// Quest shown under "Tracked Quest:"
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackedQuest {
    pub name: String,
    pub description: String,
}

/// Follows the tracked quest
#[derive(Debug, Default)]
pub struct QuestTracker {
    quest: Mutex<Option<TrackedQuest>>,
}

impl QuestTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Option<TrackedQuest> {
        self.quest.lock().clone()
    }
}

impl SegmentListener<ScoreboardSegment> for QuestTracker {
    fn update(&self, segment: &ScoreboardSegment) {
        let mut lines = segment.unformatted_content().filter(|line| !line.is_empty());
        let Some(name) = lines.next() else {
            return;
        };
        let description = lines.collect::<Vec<_>>().join(" ");

        let quest = TrackedQuest { name, description };
        let mut current = self.quest.lock();
        if current.as_ref() != Some(&quest) {
            tracing::info!("Tracking quest {}", quest.name);
            *current = Some(quest);
        }
    }

    fn removed(&self, _segment: &ScoreboardSegment) {
        tracing::info!("Quest no longer tracked");
        *self.quest.lock() = None;
    }
}

/// Daily or guild objective progress
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Objective {
    pub goal: String,
    pub score: u32,
    pub max: u32,
    pub guild: bool,
}

impl Objective {
    pub fn is_complete(&self) -> bool {
        self.score >= self.max
    }
}

static OBJECTIVE_LINE: OnceLock<Regex> = OnceLock::new();
static PROGRESS: OnceLock<Regex> = OnceLock::new();

fn objective_line() -> &'static Regex {
    OBJECTIVE_LINE
        .get_or_init(|| Regex::new(r"^[- ]*(.+?): *(\d+)/(\d+)$").expect("Invalid objective regex"))
}

fn progress() -> &'static Regex {
    PROGRESS.get_or_init(|| Regex::new(r"(\d+)/(\d+)").expect("Invalid progress regex"))
}

/// Follows daily and guild objectives
#[derive(Debug, Default)]
pub struct ObjectiveTracker {
    daily: Mutex<Vec<Objective>>,
    guild: Mutex<Option<Objective>>,
}

impl ObjectiveTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn daily(&self) -> Vec<Objective> {
        self.daily.lock().clone()
    }

    pub fn guild(&self) -> Option<Objective> {
        self.guild.lock().clone()
    }

    /// Long goals wrap onto several lines; join until the progress shows up
    fn parse_daily(segment: &ScoreboardSegment) -> Vec<Objective> {
        let mut objectives = Vec::new();
        let mut pending = String::new();

        for line in segment.unformatted_content().filter(|line| !line.is_empty()) {
            if !pending.is_empty() {
                pending.push(' ');
            }
            pending.push_str(&line);

            if let Some(caps) = objective_line().captures(&pending) {
                if let (Ok(score), Ok(max)) = (caps[2].parse(), caps[3].parse()) {
                    objectives.push(Objective {
                        goal: caps[1].trim().to_string(),
                        score,
                        max,
                        guild: false,
                    });
                }
                pending.clear();
            }
        }
        objectives
    }

    fn parse_guild(segment: &ScoreboardSegment) -> Option<Objective> {
        let header = ScoreboardKind::GuildObjective
            .header_pattern()
            .captures(&segment.header)?;
        let goal = header[2].trim().to_string();

        segment.unformatted_content().find_map(|line| {
            let caps = progress().captures(&line)?;
            Some(Objective {
                goal: goal.clone(),
                score: caps[1].parse().ok()?,
                max: caps[2].parse().ok()?,
                guild: true,
            })
        })
    }
}

impl SegmentListener<ScoreboardSegment> for ObjectiveTracker {
    fn update(&self, segment: &ScoreboardSegment) {
        match segment.kind {
            ScoreboardKind::Objective => *self.daily.lock() = Self::parse_daily(segment),
            ScoreboardKind::GuildObjective => *self.guild.lock() = Self::parse_guild(segment),
            _ => {}
        }
    }

    fn removed(&self, segment: &ScoreboardSegment) {
        match segment.kind {
            ScoreboardKind::Objective => self.daily.lock().clear(),
            ScoreboardKind::GuildObjective => *self.guild.lock() = None,
            _ => {}
        }
    }
}

/// Upcoming attack on a guild territory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuildAttack {
    pub territory: String,
    pub remaining: Duration,
}

static ATTACK_LINE: OnceLock<Regex> = OnceLock::new();

fn attack_line() -> &'static Regex {
    ATTACK_LINE.get_or_init(|| Regex::new(r"^- (\d+):(\d+) (.+)$").expect("Invalid attack regex"))
}

/// Follows the guild attack timers
#[derive(Debug, Default)]
pub struct GuildAttackTracker {
    attacks: Mutex<Vec<GuildAttack>>,
}

impl GuildAttackTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn attacks(&self) -> Vec<GuildAttack> {
        self.attacks.lock().clone()
    }
}

impl SegmentListener<ScoreboardSegment> for GuildAttackTracker {
    fn update(&self, segment: &ScoreboardSegment) {
        let attacks = segment
            .unformatted_content()
            .filter_map(|line| {
                let caps = attack_line().captures(&line)?;
                let minutes: u64 = caps[1].parse().ok()?;
                let seconds: u64 = caps[2].parse().ok()?;
                Some(GuildAttack {
                    territory: caps[3].trim().to_string(),
                    remaining: Duration::from_secs(minutes * 60 + seconds),
                })
            })
            .collect();
        *self.attacks.lock() = attacks;
    }

    fn removed(&self, _segment: &ScoreboardSegment) {
        self.attacks.lock().clear();
    }
}
