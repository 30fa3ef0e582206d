//! # Relations Parser
//!
//! Keeps the player's friend and party lists in sync with the server.
//!
//! # Protocol
//!
//! The server has no structured relation feed. The lists are requested with
//! `/friend list` and `/party list` and come back as ordinary chat lines,
//! mixed in with everything else. Changes between requests arrive as one-off
//! announcements.
//!
//! ```text
//! request ──► AwaitingListing ──► listing line ──► Idle (Reload, suppressed)
//!                   │
//!                   └──► "no list" sentinel ──► Idle (Reload(empty), suppressed)
//! ```
//!
//! Announcements (`X has been added to your friends!`) are applied in any
//! state, never suppressed, and never touch the listing state. Listing lines
//! that arrive while `Idle` were not requested by us and are left alone.

use crate::events::{ChangeType, RelationList, RelationsUpdate, WorldStateChanged};
use crate::world::WorldStateTracker;
use parking_lot::Mutex;
use regex::Regex;
use std::collections::BTreeSet;
use std::sync::{Arc, OnceLock};
use wynnparse_core::{ChatChannel, EventBus, ServerConnection, WorldState};
use wynnparse_protocol::RawLine;

/// Listing state of one relation list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListState {
    /// No listing requested
    Idle,

    /// A list command was sent and its reply has not arrived yet
    AwaitingListing,
}

struct RelationPatterns {
    friend_list: Regex,
    friend_no_list_teaser: Regex,
    friend_no_list: Regex,
    friend_added: Regex,
    friend_removed: Regex,

    party_list: Regex,
    party_no_list: Regex,
    party_member_left: Regex,
    party_member_joined: Regex,
    party_member_switched: Regex,
    party_self_removed: Regex,
    party_self_joined: Regex,
    party_disbanded: Regex,
}

static PATTERNS: OnceLock<RelationPatterns> = OnceLock::new();

fn patterns() -> &'static RelationPatterns {
    PATTERNS.get_or_init(|| {
        let compile = |pattern: &str| Regex::new(pattern).expect("Invalid relation regex");
        RelationPatterns {
            friend_list: compile(r"^.+'s friends \(.+\): (.*)$"),
            friend_no_list_teaser: compile(r"^§eWe couldn't find any friends\.$"),
            friend_no_list: compile(r"^§eTry typing §r§6/friend add Username§r§e!$"),
            friend_added: compile(r"^§e(.+) has been added to your friends!$"),
            friend_removed: compile(r"^§e(.+) has been removed from your friends!$"),

            party_list: compile(r"^Party members: (.*)$"),
            party_no_list: compile(r"^§eYou must be in a party to list\.$"),
            party_member_left: compile(r"^§e(.+) has left the party\.$"),
            party_member_joined: compile(r"^§e(.+) has joined the party\.$"),
            party_member_switched: compile(r"^§eSay hello to (.+) which just joined your party!$"),
            party_self_removed: compile(r"^§eYou have been removed from the party\.$"),
            party_self_joined: compile(r"^§eYou have successfully joined the party\.$"),
            party_disbanded: compile(r"^§eYour party has been disbanded\.$"),
        }
    })
}

/// Listing state and members of one list, always locked together
#[derive(Debug)]
struct RelationState {
    state: ListState,
    members: BTreeSet<String>,
}

impl RelationState {
    fn new() -> Self {
        Self {
            state: ListState::Idle,
            members: BTreeSet::new(),
        }
    }
}

fn split_listing(listing: &str) -> BTreeSet<String> {
    listing
        .split(", ")
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect()
}

/// Relations Parser
///
/// # Purpose
/// Owns the friend and party lists and posts a [`RelationsUpdate`] for
/// every change.
///
/// # Thread Safety
/// Each list's `(state, members)` pair sits behind its own mutex. Events
/// are posted after the lock is released.
pub struct RelationsParser {
    friends: Mutex<RelationState>,
    party: Mutex<RelationState>,
    world: Arc<WorldStateTracker>,
    connection: Arc<dyn ServerConnection>,
    bus: Arc<EventBus>,
}

impl RelationsParser {
    pub fn new(
        world: Arc<WorldStateTracker>,
        connection: Arc<dyn ServerConnection>,
        bus: Arc<EventBus>,
    ) -> Self {
        Self {
            friends: Mutex::new(RelationState::new()),
            party: Mutex::new(RelationState::new()),
            world,
            connection,
            bus,
        }
    }

    fn list(&self, list: RelationList) -> &Mutex<RelationState> {
        match list {
            RelationList::Friends => &self.friends,
            RelationList::Party => &self.party,
        }
    }

    /// Current members of a list
    pub fn members(&self, list: RelationList) -> BTreeSet<String> {
        self.list(list).lock().members.clone()
    }

    pub fn state(&self, list: RelationList) -> ListState {
        self.list(list).lock().state
    }

    /// Ask the server for the friend list
    ///
    /// # Returns
    /// `false` if not in a world, in which case nothing is sent
    pub fn request_friend_list(&self) -> bool {
        self.request(RelationList::Friends, "friend list")
    }

    /// Ask the server for the party list
    ///
    /// # Returns
    /// `false` if not in a world, in which case nothing is sent
    pub fn request_party_list(&self) -> bool {
        self.request(RelationList::Party, "party list")
    }

    fn request(&self, list: RelationList, command: &str) -> bool {
        if !self.world.is_in_world() {
            tracing::debug!("Not in a world, skipping {} list request", list.as_str());
            return false;
        }

        // Arm before sending so a fast reply is not missed
        self.list(list).lock().state = ListState::AwaitingListing;
        self.connection.send_command(command);
        tracing::info!("Requested {} list", list.as_str());
        true
    }

    /// Handle a received chat line
    ///
    /// # Returns
    /// `true` if the line answered one of our list requests and should be
    /// hidden
    pub fn on_chat(&self, line: &RawLine) -> bool {
        if line.channel() != ChatChannel::Foreground {
            return false;
        }

        let coded = line.coded();
        if self.try_friend_announcement(coded) || self.try_party_announcement(coded) {
            return false;
        }

        let unformatted = line.unformatted();
        self.try_friend_listing(coded, &unformatted) || self.try_party_listing(coded, &unformatted)
    }

    fn try_friend_announcement(&self, coded: &str) -> bool {
        let patterns = patterns();

        if let Some(caps) = patterns.friend_removed.captures(coded) {
            tracing::info!("Friend removed: {}", &caps[1]);
            self.apply_single(RelationList::Friends, &caps[1], ChangeType::Remove);
            return true;
        }

        if let Some(caps) = patterns.friend_added.captures(coded) {
            tracing::info!("Friend added: {}", &caps[1]);
            self.apply_single(RelationList::Friends, &caps[1], ChangeType::Add);
            return true;
        }

        false
    }

    fn try_party_announcement(&self, coded: &str) -> bool {
        let patterns = patterns();

        if patterns.party_disbanded.is_match(coded) || patterns.party_self_removed.is_match(coded) {
            tracing::info!("Left the party");
            self.clear_members(RelationList::Party);
            return true;
        }

        if patterns.party_self_joined.is_match(coded) {
            tracing::info!("Joined a party");
            self.request_party_list();
            return true;
        }

        let joined = patterns
            .party_member_joined
            .captures(coded)
            .or_else(|| patterns.party_member_switched.captures(coded));
        if let Some(caps) = joined {
            tracing::info!("Party member joined: {}", &caps[1]);
            self.apply_single(RelationList::Party, &caps[1], ChangeType::Add);
            return true;
        }

        if let Some(caps) = patterns.party_member_left.captures(coded) {
            tracing::info!("Party member left: {}", &caps[1]);
            self.apply_single(RelationList::Party, &caps[1], ChangeType::Remove);
            return true;
        }

        false
    }

    fn try_friend_listing(&self, coded: &str, unformatted: &str) -> bool {
        let patterns = patterns();
        let mut friends = self.friends.lock();
        if friends.state != ListState::AwaitingListing {
            return false;
        }

        if let Some(caps) = patterns.friend_list.captures(unformatted) {
            friends.members = split_listing(&caps[1]);
            friends.state = ListState::Idle;
            let update = RelationsUpdate::new(RelationList::Friends, friends.members.clone(), ChangeType::Reload);
            drop(friends);

            tracing::info!("Friend list updated, {} friends", update.members.len());
            self.bus.post(update);
            return true;
        }

        if patterns.friend_no_list.is_match(coded) {
            friends.members.clear();
            friends.state = ListState::Idle;
            drop(friends);

            tracing::info!("Friend list is empty");
            self.bus.post(RelationsUpdate::cleared(RelationList::Friends));
            return true;
        }

        // First of the two "no friends" lines; the sentinel follows
        patterns.friend_no_list_teaser.is_match(coded)
    }

    fn try_party_listing(&self, coded: &str, unformatted: &str) -> bool {
        let patterns = patterns();
        let mut party = self.party.lock();
        if party.state != ListState::AwaitingListing {
            return false;
        }

        if patterns.party_no_list.is_match(coded) {
            party.members.clear();
            party.state = ListState::Idle;
            drop(party);

            tracing::info!("Not in a party");
            self.bus.post(RelationsUpdate::cleared(RelationList::Party));
            return true;
        }

        if let Some(caps) = patterns.party_list.captures(unformatted) {
            party.members = split_listing(&caps[1]);
            party.state = ListState::Idle;
            let update = RelationsUpdate::new(RelationList::Party, party.members.clone(), ChangeType::Reload);
            drop(party);

            tracing::info!("Party list updated, {} members", update.members.len());
            self.bus.post(update);
            return true;
        }

        false
    }

    fn apply_single(&self, list: RelationList, member: &str, change: ChangeType) {
        {
            let mut relation = self.list(list).lock();
            match change {
                ChangeType::Remove => {
                    relation.members.remove(member);
                }
                _ => {
                    relation.members.insert(member.to_string());
                }
            }
        }
        self.bus.post(RelationsUpdate::single(list, member, change));
    }

    /// Empty the set; a pending listing request stays armed
    fn clear_members(&self, list: RelationList) {
        self.list(list).lock().members.clear();
        self.bus.post(RelationsUpdate::cleared(list));
    }

    fn reset(&self, list: RelationList) {
        {
            let mut relation = self.list(list).lock();
            relation.members.clear();
            relation.state = ListState::Idle;
        }
        self.bus.post(RelationsUpdate::cleared(list));
    }

    /// Entering a world requests fresh lists; leaving one clears them
    pub fn on_world_state_changed(&self, event: &WorldStateChanged) {
        if event.current == WorldState::World {
            self.request_friend_list();
            self.request_party_list();
        } else {
            self.reset(RelationList::Friends);
            self.reset(RelationList::Party);
        }
    }

    /// The host finished authenticating with its backend
    pub fn on_authenticated(&self) {
        if !self.world.is_in_world() {
            return;
        }
        self.request_friend_list();
        self.request_party_list();
    }
}

impl std::fmt::Debug for RelationsParser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RelationsParser")
            .field("friends", &*self.friends.lock())
            .field("party", &*self.party.lock())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wynnparse_core::{MemoryConnection, Outbound};

    struct Fixture {
        parser: Arc<RelationsParser>,
        world: Arc<WorldStateTracker>,
        connection: Arc<MemoryConnection>,
        updates: Arc<Mutex<Vec<RelationsUpdate>>>,
    }

    fn fixture() -> Fixture {
        let bus = Arc::new(EventBus::new());
        let world = Arc::new(WorldStateTracker::new(bus.clone()));
        let connection = Arc::new(MemoryConnection::new());
        let parser = Arc::new(RelationsParser::new(world.clone(), connection.clone(), bus.clone()));

        let updates = Arc::new(Mutex::new(Vec::new()));
        let sink = updates.clone();
        bus.subscribe(move |update: &RelationsUpdate| sink.lock().push(update.clone()));

        let weak = Arc::downgrade(&parser);
        bus.subscribe(move |event: &WorldStateChanged| {
            if let Some(parser) = weak.upgrade() {
                parser.on_world_state_changed(event);
            }
        });

        Fixture {
            parser,
            world,
            connection,
            updates,
        }
    }

    fn names(names: &[&str]) -> BTreeSet<String> {
        names.iter().map(|name| name.to_string()).collect()
    }

    fn in_world() -> Fixture {
        let fixture = fixture();
        fixture.world.set(WorldState::World);
        fixture.updates.lock().clear();
        fixture
    }

    #[test]
    fn test_entering_world_requests_lists() {
        let fixture = fixture();
        fixture.world.set(WorldState::World);

        assert_eq!(fixture.connection.commands(), vec!["friend list", "party list"]);
        assert_eq!(fixture.parser.state(RelationList::Friends), ListState::AwaitingListing);
        assert_eq!(fixture.parser.state(RelationList::Party), ListState::AwaitingListing);
    }

    #[test]
    fn test_request_outside_world_is_skipped() {
        let fixture = fixture();
        assert!(!fixture.parser.request_friend_list());
        assert!(fixture.connection.sent().is_empty());
        assert_eq!(fixture.parser.state(RelationList::Friends), ListState::Idle);
    }

    #[test]
    fn test_friend_listing_while_awaiting() {
        let fixture = in_world();

        let suppressed = fixture
            .parser
            .on_chat(&RawLine::foreground("§eSteve's friends (2): §r§fAlice, Bob"));
        assert!(suppressed);
        assert_eq!(fixture.parser.state(RelationList::Friends), ListState::Idle);

        let updates = fixture.updates.lock();
        assert_eq!(updates.len(), 1);
        assert_eq!(
            updates[0],
            RelationsUpdate::new(RelationList::Friends, names(&["Alice", "Bob"]), ChangeType::Reload)
        );
    }

    #[test]
    fn test_incremental_add_while_idle() {
        let fixture = fixture();

        let suppressed = fixture
            .parser
            .on_chat(&RawLine::foreground("§eCharlie has been added to your friends!"));
        assert!(!suppressed);
        assert_eq!(fixture.parser.state(RelationList::Friends), ListState::Idle);
        assert_eq!(fixture.parser.members(RelationList::Friends), names(&["Charlie"]));

        let updates = fixture.updates.lock();
        assert_eq!(
            *updates,
            vec![RelationsUpdate::single(RelationList::Friends, "Charlie", ChangeType::Add)]
        );
    }

    #[test]
    fn test_incremental_remove_keeps_awaiting() {
        let fixture = in_world();
        fixture.parser.on_chat(&RawLine::foreground("§eSteve's friends (2): Alice, Bob"));
        fixture.parser.request_friend_list();

        fixture
            .parser
            .on_chat(&RawLine::foreground("§eBob has been removed from your friends!"));
        assert_eq!(fixture.parser.members(RelationList::Friends), names(&["Alice"]));
        assert_eq!(fixture.parser.state(RelationList::Friends), ListState::AwaitingListing);
    }

    #[test]
    fn test_empty_friend_list_race() {
        let fixture = in_world();

        let teaser = fixture
            .parser
            .on_chat(&RawLine::foreground("§eWe couldn't find any friends."));
        assert!(teaser);
        assert!(fixture.updates.lock().is_empty());
        assert_eq!(fixture.parser.state(RelationList::Friends), ListState::AwaitingListing);

        let sentinel = fixture
            .parser
            .on_chat(&RawLine::foreground("§eTry typing §r§6/friend add Username§r§e!"));
        assert!(sentinel);
        assert_eq!(fixture.parser.state(RelationList::Friends), ListState::Idle);
        assert_eq!(*fixture.updates.lock(), vec![RelationsUpdate::cleared(RelationList::Friends)]);
    }

    #[test]
    fn test_listing_while_idle_is_ignored() {
        let fixture = fixture();
        let line = RawLine::foreground("§eSteve's friends (2): Alice, Bob");

        assert!(!fixture.parser.on_chat(&line));
        assert!(!fixture.parser.on_chat(&line));
        assert!(fixture.updates.lock().is_empty());
        assert!(fixture.parser.members(RelationList::Friends).is_empty());
    }

    #[test]
    fn test_background_lines_are_ignored() {
        let fixture = in_world();
        let suppressed = fixture
            .parser
            .on_chat(&RawLine::background("§eSteve's friends (1): Alice"));
        assert!(!suppressed);
        assert_eq!(fixture.parser.state(RelationList::Friends), ListState::AwaitingListing);
    }

    #[test]
    fn test_party_listing_and_sentinel() {
        let fixture = in_world();

        assert!(fixture
            .parser
            .on_chat(&RawLine::foreground("§6Party members: §r§eSteve, §r§fAlex")));
        assert_eq!(fixture.parser.members(RelationList::Party), names(&["Alex", "Steve"]));

        fixture.parser.request_party_list();
        assert!(fixture
            .parser
            .on_chat(&RawLine::foreground("§eYou must be in a party to list.")));
        assert!(fixture.parser.members(RelationList::Party).is_empty());
        assert_eq!(fixture.parser.state(RelationList::Party), ListState::Idle);

        let updates = fixture.updates.lock();
        assert_eq!(updates.len(), 2);
        assert_eq!(updates[1], RelationsUpdate::cleared(RelationList::Party));
    }

    #[test]
    fn test_party_announcements() {
        let fixture = in_world();
        let parser = &fixture.parser;

        assert!(!parser.on_chat(&RawLine::foreground("§eAlex has joined the party.")));
        assert!(!parser.on_chat(&RawLine::foreground("§eSay hello to Sam which just joined your party!")));
        assert_eq!(parser.members(RelationList::Party), names(&["Alex", "Sam"]));

        parser.on_chat(&RawLine::foreground("§eAlex has left the party."));
        assert_eq!(parser.members(RelationList::Party), names(&["Sam"]));

        parser.on_chat(&RawLine::foreground("§eYour party has been disbanded."));
        assert!(parser.members(RelationList::Party).is_empty());
        assert_eq!(
            fixture.updates.lock().last(),
            Some(&RelationsUpdate::cleared(RelationList::Party))
        );
    }

    #[test]
    fn test_leaving_party_keeps_request_armed() {
        let fixture = in_world();
        let parser = &fixture.parser;
        assert!(parser.request_party_list());

        assert!(!parser.on_chat(&RawLine::foreground("§eYou have been removed from the party.")));
        assert_eq!(parser.state(RelationList::Party), ListState::AwaitingListing);

        fixture.updates.lock().clear();
        assert!(parser.on_chat(&RawLine::foreground("§eYou must be in a party to list.")));
        assert_eq!(parser.state(RelationList::Party), ListState::Idle);
        assert_eq!(
            *fixture.updates.lock(),
            vec![RelationsUpdate::cleared(RelationList::Party)]
        );
    }

    #[test]
    fn test_joining_party_requests_list() {
        let fixture = in_world();

        fixture
            .parser
            .on_chat(&RawLine::foreground("§eYou have successfully joined the party."));
        assert_eq!(
            fixture.connection.sent().last(),
            Some(&Outbound::Command("party list".into()))
        );
    }

    #[test]
    fn test_leaving_world_clears_lists() {
        let fixture = in_world();
        fixture.parser.on_chat(&RawLine::foreground("§eSteve's friends (1): Alice"));
        fixture.updates.lock().clear();

        fixture.world.set(WorldState::Hub);
        assert!(fixture.parser.members(RelationList::Friends).is_empty());
        assert_eq!(
            *fixture.updates.lock(),
            vec![
                RelationsUpdate::cleared(RelationList::Friends),
                RelationsUpdate::cleared(RelationList::Party),
            ]
        );
    }

    #[test]
    fn test_authentication_requests_only_in_world() {
        let fixture = fixture();
        fixture.parser.on_authenticated();
        assert!(fixture.connection.sent().is_empty());

        fixture.world.set(WorldState::World);
        fixture.parser.on_authenticated();
        assert_eq!(fixture.connection.commands().len(), 4);
    }
}
