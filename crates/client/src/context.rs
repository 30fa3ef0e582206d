//! # Client Context
//!
//! Builds every subsystem once and wires the bus between them. The host
//! calls the `on_*` methods from its own event hooks; the methods that
//! return `bool` tell the host to drop the original element.

use std::sync::{Arc, Weak};
use wynnparse_config::ConfigStore;
use wynnparse_core::{
    ActionBarPosition, EventBus, NotificationSink, Result, ServerConnection, WorldState,
};
use wynnparse_game::{
    ActionBarHandler, GuildAttackTracker, MaskParser, ObjectiveTracker, QuestTracker,
    RelationsParser, ScoreboardHandler, ScoreboardKind, TradeMarketConverter, WorldStateChanged,
    WorldStateTracker,
};
use wynnparse_protocol::RawLine;
use wynnparse_redirect::{ChatRedirector, RedirectOutcome, RuleRegistry};
use wynnparse_territory::{
    spawn_territory_poller, AdvancementEntry, PollerHandle, TerritoryManager, TerritorySource,
};

/// Combined verdict for one incoming chat line
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChatOutcome {
    pub redirect: RedirectOutcome,
    /// The relations parser consumed the line
    pub relations: bool,
}

impl ChatOutcome {
    /// The line must not reach the chat window
    pub fn suppressed(&self) -> bool {
        self.redirect.suppressed || self.relations
    }
}

/// Client Context
///
/// # Purpose
/// Holds the parsers for one session. There are no global singletons; a
/// second context is fully independent of the first.
///
/// # Thread Safety
/// Every subsystem synchronizes internally, so the context can be shared
/// behind an `Arc` and called from any thread.
pub struct ClientContext {
    config: ConfigStore,
    bus: Arc<EventBus>,
    world: Arc<WorldStateTracker>,
    redirector: ChatRedirector,
    relations: Arc<RelationsParser>,
    mask: Arc<MaskParser>,
    trade_market: TradeMarketConverter,
    scoreboard: ScoreboardHandler,
    quests: Arc<QuestTracker>,
    objectives: Arc<ObjectiveTracker>,
    guild_attacks: Arc<GuildAttackTracker>,
    action_bar: ActionBarHandler,
    territories: Arc<TerritoryManager>,
}

impl ClientContext {
    /// Create a context with the built-in redirect rules
    ///
    /// # Arguments
    /// * `config` - Live configuration, shared with whoever edits it
    /// * `notifications` - Receives redirect notifications
    /// * `connection` - Outbound commands and chat
    ///
    /// # Errors
    /// Returns an error if a built-in rule pattern fails to compile
    pub fn new(
        config: ConfigStore,
        notifications: Arc<dyn NotificationSink>,
        connection: Arc<dyn ServerConnection>,
    ) -> Result<Self> {
        Ok(Self::with_registry(
            config,
            notifications,
            connection,
            RuleRegistry::with_default_rules()?,
        ))
    }

    /// Create a context with a custom rule registry
    pub fn with_registry(
        config: ConfigStore,
        notifications: Arc<dyn NotificationSink>,
        connection: Arc<dyn ServerConnection>,
        registry: RuleRegistry,
    ) -> Self {
        let bus = Arc::new(EventBus::new());
        let world = Arc::new(WorldStateTracker::new(bus.clone()));

        let redirector = ChatRedirector::new(registry, config.clone(), notifications);
        let relations = Arc::new(RelationsParser::new(
            world.clone(),
            connection.clone(),
            bus.clone(),
        ));
        let mask = Arc::new(MaskParser::new(config.clone(), bus.clone()));
        let trade_market = TradeMarketConverter::new(config.clone(), connection);

        let scoreboard = ScoreboardHandler::new(bus.clone());
        let quests = Arc::new(QuestTracker::new());
        let objectives = Arc::new(ObjectiveTracker::new());
        let guild_attacks = Arc::new(GuildAttackTracker::new());
        scoreboard.register_listener(&[ScoreboardKind::Quest], quests.clone());
        scoreboard.register_listener(
            &[ScoreboardKind::Objective, ScoreboardKind::GuildObjective],
            objectives.clone(),
        );
        scoreboard.register_listener(&[ScoreboardKind::GuildAttackTimer], guild_attacks.clone());

        let action_bar = ActionBarHandler::new(bus.clone());
        let territories = Arc::new(TerritoryManager::new(bus.clone()));

        // Weak handles: the bus must not keep the parsers alive
        let weak: Weak<RelationsParser> = Arc::downgrade(&relations);
        bus.subscribe(move |event: &WorldStateChanged| {
            if let Some(relations) = weak.upgrade() {
                relations.on_world_state_changed(event);
            }
        });
        let weak: Weak<MaskParser> = Arc::downgrade(&mask);
        bus.subscribe(move |event: &WorldStateChanged| {
            if let Some(mask) = weak.upgrade() {
                mask.on_world_state_changed(event);
            }
        });

        tracing::debug!(
            "Client context ready ({} redirect rules)",
            redirector.registry().len()
        );

        Self {
            config,
            bus,
            world,
            redirector,
            relations,
            mask,
            trade_market,
            scoreboard,
            quests,
            objectives,
            guild_attacks,
            action_bar,
            territories,
        }
    }

    /// Incoming chat line
    ///
    /// The redirector, the relations parser and the trade market all see
    /// the line, even when an earlier one already suppressed it.
    pub fn on_chat_received(&self, line: &RawLine) -> ChatOutcome {
        let redirect = self.redirector.dispatch(line);
        let relations = self.relations.on_chat(line);
        self.trade_market.on_chat(line);

        ChatOutcome {
            redirect,
            relations,
        }
    }

    /// Outgoing chat message typed by the player
    ///
    /// # Returns
    /// `true` if the message was replaced and the original must not be sent
    pub fn on_chat_sent(&self, message: &str) -> bool {
        self.trade_market.on_chat_sent(message)
    }

    pub fn on_scoreboard_line(&self, index: usize, text: &str) {
        self.scoreboard.on_line(index, text);
    }

    pub fn on_scoreboard_line_removed(&self, index: usize) {
        self.scoreboard.on_line_removed(index);
    }

    /// End of a scoreboard update
    ///
    /// # Returns
    /// Line indices the host should not render
    pub fn on_scoreboard_tick(&self) -> Vec<usize> {
        self.scoreboard.on_tick()
    }

    /// # Returns
    /// `true` if the segment should not be rendered
    pub fn on_action_bar_segment(&self, position: ActionBarPosition, text: &str) -> bool {
        self.action_bar.on_segment(position, text)
    }

    /// # Returns
    /// `true` if the subtitle should not be shown
    pub fn on_subtitle(&self, title: &str) -> bool {
        self.mask.on_subtitle(title)
    }

    /// # Returns
    /// `true` if the state changed
    pub fn on_world_state(&self, state: WorldState) -> bool {
        self.world.set(state)
    }

    pub fn on_authenticated(&self) {
        self.relations.on_authenticated();
    }

    pub fn on_screen_opened(&self, title: &str) {
        self.trade_market.on_screen_opened(title);
    }

    /// # Returns
    /// The number of territory POIs updated
    pub fn on_advancement_update(&self, entries: &[AdvancementEntry]) -> usize {
        self.territories.on_advancement_update(entries)
    }

    /// Start refreshing territory profiles at the configured interval
    ///
    /// Must be called from within a tokio runtime.
    pub fn start_territory_poller(&self, source: Arc<dyn TerritorySource>) -> PollerHandle {
        let interval = self.config.read(|config| config.territory_update_interval());
        spawn_territory_poller(self.territories.clone(), source, interval)
    }

    pub fn config(&self) -> &ConfigStore {
        &self.config
    }

    /// Subscribe here to observe domain events
    pub fn bus(&self) -> &Arc<EventBus> {
        &self.bus
    }

    pub fn world(&self) -> &WorldStateTracker {
        &self.world
    }

    pub fn relations(&self) -> &RelationsParser {
        &self.relations
    }

    pub fn mask(&self) -> &MaskParser {
        &self.mask
    }

    pub fn trade_market(&self) -> &TradeMarketConverter {
        &self.trade_market
    }

    pub fn scoreboard(&self) -> &ScoreboardHandler {
        &self.scoreboard
    }

    pub fn quests(&self) -> &QuestTracker {
        &self.quests
    }

    pub fn objectives(&self) -> &ObjectiveTracker {
        &self.objectives
    }

    pub fn guild_attacks(&self) -> &GuildAttackTracker {
        &self.guild_attacks
    }

    pub fn action_bar(&self) -> &ActionBarHandler {
        &self.action_bar
    }

    pub fn territories(&self) -> &Arc<TerritoryManager> {
        &self.territories
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;
    use std::io::Write;
    use std::time::Duration;
    use wynnparse_config::{ClientConfig, RedirectAction, RedirectCategory};
    use wynnparse_core::{MemoryConnection, MemoryNotifications, Outbound};
    use wynnparse_game::{ListState, MaskType, RelationList};
    use wynnparse_territory::{AdvancementDisplay, AdvancementFrame, FileSource, TerritoriesRefreshed};

    struct Fixture {
        context: ClientContext,
        notifications: Arc<MemoryNotifications>,
        connection: Arc<MemoryConnection>,
    }

    fn fixture_with(config: ClientConfig) -> Fixture {
        let notifications = Arc::new(MemoryNotifications::new());
        let connection = Arc::new(MemoryConnection::new());
        let context = ClientContext::new(
            ConfigStore::new(config),
            notifications.clone(),
            connection.clone(),
        )
        .unwrap();
        Fixture {
            context,
            notifications,
            connection,
        }
    }

    fn fixture() -> Fixture {
        fixture_with(ClientConfig::default())
    }

    #[test]
    fn test_redirected_chat_is_suppressed() {
        let fixture = fixture();

        let outcome = fixture
            .context
            .on_chat_received(&RawLine::foreground("§d[+1 Soul Point]"));
        assert!(outcome.suppressed());
        assert!(!outcome.relations);
        assert_eq!(fixture.notifications.messages(), vec!["§d[+1 Soul Point]"]);

        let outcome = fixture.context.on_chat_received(&RawLine::foreground("§7Hello there"));
        assert!(!outcome.suppressed());
    }

    #[test]
    fn test_world_entry_requests_lists() {
        let fixture = fixture();

        assert!(fixture.context.on_world_state(WorldState::World));
        assert!(!fixture.context.on_world_state(WorldState::World));
        assert_eq!(fixture.connection.commands(), vec!["friend list", "party list"]);

        let outcome = fixture
            .context
            .on_chat_received(&RawLine::foreground("§eSteve's friends (2): §r§fAlice, Bob"));
        assert!(outcome.suppressed());
        assert!(outcome.relations);

        let relations = fixture.context.relations();
        assert_eq!(relations.state(RelationList::Friends), ListState::Idle);
        assert_eq!(relations.members(RelationList::Friends).len(), 2);

        fixture.context.on_world_state(WorldState::Hub);
        assert!(relations.members(RelationList::Friends).is_empty());
    }

    #[test]
    fn test_mask_resets_on_world_change() {
        let fixture = fixture();
        fixture.context.on_world_state(WorldState::World);

        assert!(fixture.context.on_subtitle("§cMask of the Lunatic"));
        assert_eq!(fixture.context.mask().current(), MaskType::Lunatic);

        fixture.context.on_world_state(WorldState::Hub);
        assert_eq!(fixture.context.mask().current(), MaskType::None);
    }

    #[test]
    fn test_trade_market_conversion() {
        let fixture = fixture();

        fixture.context.on_chat_received(&RawLine::foreground(
            "§6Type the price in emeralds or type 'cancel' to cancel:",
        ));
        assert!(fixture.context.on_chat_sent("2le"));
        assert_eq!(fixture.connection.sent(), vec![Outbound::Chat("8192".into())]);

        // Disarmed after one message
        assert!(!fixture.context.on_chat_sent("2le"));
    }

    #[test]
    fn test_live_config_changes() {
        let fixture = fixture();
        fixture.context.config().update(|config| {
            config.set_redirect_action(RedirectCategory::SoulPoint, RedirectAction::Keep)
        });

        let outcome = fixture
            .context
            .on_chat_received(&RawLine::foreground("§d[+1 Soul Point]"));
        assert!(!outcome.suppressed());
        assert!(fixture.notifications.messages().is_empty());
    }

    #[test]
    fn test_scoreboard_and_action_bar() {
        let fixture = fixture();
        let context = &fixture.context;

        context.on_scoreboard_line(0, "§e§lTracked Quest:");
        context.on_scoreboard_line(1, "§fKing's Recruit");
        context.on_scoreboard_line(2, "§7Talk to Tasim");
        context.on_scoreboard_tick();
        assert_eq!(context.quests().current().unwrap().name, "King's Recruit");

        assert!(context.on_action_bar_segment(ActionBarPosition::Left, "§c❤ 450/500"));
        assert_eq!(context.action_bar().vitals().health, Some((450, 500)));
    }

    #[test]
    fn test_advancements_need_profiles() {
        let fixture = fixture();
        let context = &fixture.context;
        let entry = AdvancementEntry {
            id: "territory/ragni".to_string(),
            display: Some(AdvancementDisplay {
                title: "§f[§aRagni§f]".to_string(),
                description: "§7Territory Defences: §eMedium".to_string(),
                frame: AdvancementFrame::Task,
            }),
        };

        assert_eq!(context.on_advancement_update(std::slice::from_ref(&entry)), 0);

        context
            .territories()
            .refresh_from_document(r#"{"territories": {"Ragni": {}}}"#)
            .unwrap();
        assert_eq!(context.on_advancement_update(&[entry]), 1);
        assert_eq!(context.territories().poi("Ragni").unwrap().defence_level(), 3);
    }

    #[test]
    fn test_contexts_are_independent() {
        let first = fixture();
        let second = fixture();

        first.context.on_world_state(WorldState::World);
        assert!(second.context.world().current() != WorldState::World);
        assert!(second.connection.sent().is_empty());
    }

    #[tokio::test]
    async fn test_territory_poller_uses_config_interval() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"territories": {{"Ragni": {{}}}}}}"#).unwrap();

        let fixture = fixture_with(ClientConfig {
            territory_update_ms: 3_600_000,
            ..ClientConfig::default()
        });
        let refreshed = Arc::new(Mutex::new(0));
        let counter = refreshed.clone();
        fixture
            .context
            .bus()
            .subscribe(move |event: &TerritoriesRefreshed| *counter.lock() = event.count);

        let handle = fixture
            .context
            .start_territory_poller(Arc::new(FileSource::new(file.path())));

        tokio::time::timeout(Duration::from_secs(5), async {
            while *refreshed.lock() == 0 {
                tokio::time::sleep(Duration::from_millis(5)).await;
            }
        })
        .await
        .unwrap();

        assert_eq!(fixture.context.territories().territory_names(), vec!["Ragni"]);
        handle.shutdown().await;
    }
}
