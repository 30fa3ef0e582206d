//! wynnparse - replay a recorded client session
//!
//! Feeds a transcript of host events through a fresh client context and
//! logs every decision, notification and bus event.

mod transcript;

use anyhow::Context;
use clap::{Parser, ValueEnum};
use parking_lot::Mutex;
use serde::Serialize;
use std::any::Any;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;
use transcript::{parse_line, HostEvent};
use wynnparse_client::ClientContext;
use wynnparse_config::{ClientConfig, ConfigStore};
use wynnparse_core::{EventBus, MemoryConnection, MemoryNotifications, Outbound, ServerConnection};
use wynnparse_game::{
    ActionBarSegmentEvent, CenterSegmentCleared, MaskChanged, MaskTitle, RelationList,
    RelationsUpdate, ScoreboardSegmentEvent, WorldStateChanged,
};
use wynnparse_territory::{poll_once, FileSource, TerritoriesRefreshed};

/// Replay a recorded client session
#[derive(Parser)]
#[command(name = "wynnparse")]
#[command(about = "Replay a client session transcript through the parsers", long_about = None)]
#[command(version)]
struct Cli {
    /// Configuration file (defaults to config/wynnparse.txt if present)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Territory document to load before replaying
    #[arg(short, long)]
    territories: Option<PathBuf>,

    /// Summary format
    #[arg(short, long, default_value = "pretty")]
    output: OutputFormat,

    /// Transcript file, one host event per line
    transcript: PathBuf,
}

#[derive(Clone, Debug, ValueEnum)]
enum OutputFormat {
    Json,
    Pretty,
}

/// Forwards to a [`MemoryConnection`] and logs what would be sent
#[derive(Default)]
struct ReplayConnection {
    inner: MemoryConnection,
}

impl ServerConnection for ReplayConnection {
    fn send_command(&self, command: &str) {
        info!("-> /{}", command);
        self.inner.send_command(command);
    }

    fn send_chat(&self, message: &str) {
        info!("-> {}", message);
        self.inner.send_chat(message);
    }
}

#[derive(Debug, Default, Serialize)]
struct Summary {
    events: usize,
    skipped: usize,
    suppressed_chat: usize,
    suppressed_titles: usize,
    hidden_action_bar: usize,
    replaced_messages: usize,
    notifications: Vec<String>,
    commands: Vec<String>,
    friends: Vec<String>,
    party: Vec<String>,
    mask: String,
    quest: Option<String>,
    territories: usize,
    territory_pois: usize,
}

/// Log every `E` posted on the bus as JSON
fn log_events<E>(bus: &EventBus, name: &'static str)
where
    E: Any + Send + Sync + Serialize,
{
    bus.subscribe(move |event: &E| match serde_json::to_string(event) {
        Ok(json) => info!(target: "wynnparse::event", "{} {}", name, json),
        Err(e) => warn!("Failed to serialize {}: {}", name, e),
    });
}

fn load_config(path: Option<&PathBuf>) -> anyhow::Result<ClientConfig> {
    match path {
        Some(path) => ClientConfig::load_from_file(path)
            .with_context(|| format!("Failed to load configuration from {}", path.display())),
        None => match ClientConfig::load_default() {
            Ok(config) => Ok(config),
            Err(e) => {
                debug!("No default configuration ({}), using built-in defaults", e);
                Ok(ClientConfig::default())
            }
        },
    }
}

fn apply(context: &ClientContext, event: HostEvent, summary: &mut Summary) {
    match event {
        HostEvent::Chat(line) => {
            let outcome = context.on_chat_received(&line);
            if outcome.suppressed() {
                summary.suppressed_chat += 1;
                info!(
                    "Suppressed {} chat {:?} (rule: {}, relations: {})",
                    line.channel().as_str(),
                    line.coded(),
                    outcome.redirect.rule.unwrap_or("-"),
                    outcome.relations
                );
            } else {
                debug!("Passed {} chat {:?}", line.channel().as_str(), line.coded());
            }
            for message in &outcome.redirect.notifications {
                info!("Notification: {}", message);
            }
        }
        HostEvent::Sent(message) => {
            if context.on_chat_sent(&message) {
                summary.replaced_messages += 1;
                info!("Replaced outgoing chat {:?}", message);
            }
        }
        HostEvent::ScoreboardLine { index, text } => context.on_scoreboard_line(index, &text),
        HostEvent::ScoreboardRemove(index) => context.on_scoreboard_line_removed(index),
        HostEvent::ScoreboardTick => {
            let hidden = context.on_scoreboard_tick();
            if !hidden.is_empty() {
                debug!("Hidden scoreboard lines: {:?}", hidden);
            }
        }
        HostEvent::ActionBar { position, text } => {
            if context.on_action_bar_segment(position, &text) {
                summary.hidden_action_bar += 1;
            }
        }
        HostEvent::Title(title) => {
            if context.on_subtitle(&title) {
                summary.suppressed_titles += 1;
                info!("Suppressed title {:?}", title);
            }
        }
        HostEvent::World(state) => {
            context.on_world_state(state);
        }
        HostEvent::Authenticated => context.on_authenticated(),
        HostEvent::Screen(title) => context.on_screen_opened(&title),
        HostEvent::Advancement(entry) => {
            let updated = context.on_advancement_update(std::slice::from_ref(&entry));
            debug!("Advancement {} updated {} territories", entry.id, updated);
        }
    }
}

fn print_summary(summary: &Summary, output: &OutputFormat) -> anyhow::Result<()> {
    match output {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(summary)?),
        OutputFormat::Pretty => {
            println!("Replayed {} events ({} skipped)", summary.events, summary.skipped);
            println!("  Suppressed chat lines: {}", summary.suppressed_chat);
            println!("  Suppressed titles:     {}", summary.suppressed_titles);
            println!("  Hidden action bar:     {}", summary.hidden_action_bar);
            println!("  Replaced messages:     {}", summary.replaced_messages);
            println!("  Notifications:         {}", summary.notifications.len());
            for message in &summary.notifications {
                println!("    {}", message);
            }
            println!("  Commands sent:         {}", summary.commands.join(", "));
            println!("  Friends:               {}", summary.friends.join(", "));
            println!("  Party:                 {}", summary.party.join(", "));
            println!("  Mask:                  {}", summary.mask);
            if let Some(quest) = &summary.quest {
                println!("  Tracked quest:         {}", quest);
            }
            println!(
                "  Territories:           {} ({} with advancement info)",
                summary.territories, summary.territory_pois
            );
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut config = load_config(cli.config.as_ref())?;
    if let Some(path) = &cli.territories {
        config.territory_source = Some(path.clone());
    }
    config.display();

    let notifications = Arc::new(MemoryNotifications::new());
    let connection = Arc::new(ReplayConnection::default());
    let context = ClientContext::new(
        ConfigStore::new(config.clone()),
        notifications.clone(),
        connection.clone(),
    )?;

    let bus = context.bus();
    log_events::<RelationsUpdate>(bus, "RelationsUpdate");
    log_events::<MaskChanged>(bus, "MaskChanged");
    log_events::<MaskTitle>(bus, "MaskTitle");
    log_events::<WorldStateChanged>(bus, "WorldStateChanged");
    log_events::<ScoreboardSegmentEvent>(bus, "ScoreboardSegment");
    log_events::<ActionBarSegmentEvent>(bus, "ActionBarSegment");
    log_events::<CenterSegmentCleared>(bus, "CenterSegmentCleared");
    let refreshed = Arc::new(Mutex::new(0));
    let counter = refreshed.clone();
    bus.subscribe(move |event: &TerritoriesRefreshed| {
        info!(target: "wynnparse::event", "TerritoriesRefreshed {:?}", event);
        *counter.lock() += 1;
    });

    if let Some(path) = &config.territory_source {
        let source = FileSource::new(path);
        if !poll_once(context.territories(), &source).await {
            warn!("No territory profiles loaded from {}", path.display());
        }
    }

    let transcript = tokio::fs::read_to_string(&cli.transcript)
        .await
        .with_context(|| format!("Failed to read transcript {}", cli.transcript.display()))?;
    info!("Replaying {}", cli.transcript.display());

    let mut summary = Summary::default();
    for (number, line) in transcript.lines().enumerate() {
        match parse_line(line) {
            Ok(Some(event)) => {
                summary.events += 1;
                apply(&context, event, &mut summary);
            }
            Ok(None) => {}
            Err(e) => {
                summary.skipped += 1;
                warn!("Line {}: {}", number + 1, e);
            }
        }
    }

    summary.notifications = notifications.messages();
    summary.commands = connection
        .inner
        .sent()
        .into_iter()
        .filter_map(|outbound| match outbound {
            Outbound::Command(command) => Some(command),
            Outbound::Chat(_) => None,
        })
        .collect();
    summary.friends = context.relations().members(RelationList::Friends).into_iter().collect();
    summary.party = context.relations().members(RelationList::Party).into_iter().collect();
    summary.mask = context.mask().current().name().to_string();
    summary.quest = context.quests().current().map(|quest| quest.name);
    summary.territories = context.territories().profiles().len();
    summary.territory_pois = context.territories().poi_count();
    debug!("Territory refreshes: {}", *refreshed.lock());

    print_summary(&summary, &cli.output)
}
