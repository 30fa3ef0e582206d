//! Trade market price prompt
//!
//! After the sell dialogue asks for a price, the next chat message the
//! player sends is the price. Shorthand such as `2le 32eb` is converted to
//! the plain emerald count the market accepts.

use regex::Regex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, OnceLock};
use wynnparse_config::ConfigStore;
use wynnparse_core::ServerConnection;
use wynnparse_protocol::{convert_emerald_price, RawLine};

/// Title of the screen that opens the sell dialogue
pub const SELL_SCREEN_TITLE: &str = "What would you like to sell?";

static PRICE_PROMPT_REGEX: OnceLock<Regex> = OnceLock::new();
static CANCELLED_REGEX: OnceLock<Regex> = OnceLock::new();

fn price_prompt_regex() -> &'static Regex {
    PRICE_PROMPT_REGEX.get_or_init(|| {
        Regex::new(r"^§6Type the price in emeralds or type 'cancel' to cancel:$")
            .expect("Invalid price prompt regex")
    })
}

fn cancelled_regex() -> &'static Regex {
    CANCELLED_REGEX.get_or_init(|| {
        Regex::new(r"^You moved and your chat input was canceled\.$").expect("Invalid cancel regex")
    })
}

/// Trade Market Converter
///
/// # Purpose
/// Arms on the price prompt and rewrites the next outgoing chat message.
pub struct TradeMarketConverter {
    armed: AtomicBool,
    config: ConfigStore,
    connection: Arc<dyn ServerConnection>,
}

impl TradeMarketConverter {
    pub fn new(config: ConfigStore, connection: Arc<dyn ServerConnection>) -> Self {
        Self {
            armed: AtomicBool::new(false),
            config,
            connection,
        }
    }

    pub fn is_armed(&self) -> bool {
        self.armed.load(Ordering::Acquire)
    }

    /// Observe a received chat line; never suppresses it
    pub fn on_chat(&self, line: &RawLine) {
        if price_prompt_regex().is_match(line.coded()) {
            tracing::debug!("Trade market price prompt seen");
            self.armed.store(true, Ordering::Release);
        }
        if cancelled_regex().is_match(&line.unformatted()) {
            self.armed.store(false, Ordering::Release);
        }
    }

    /// Handle a chat message the player is about to send
    ///
    /// # Returns
    /// `true` if the message was replaced by a converted price and the
    /// original must not be sent
    pub fn on_chat_sent(&self, message: &str) -> bool {
        if !self.armed.swap(false, Ordering::AcqRel) {
            return false;
        }
        if !self.config.read(|config| config.trade_market_price_conversion) {
            return false;
        }

        match convert_emerald_price(message) {
            Some(emeralds) => {
                tracing::info!("Converted price {:?} to {} emeralds", message, emeralds);
                self.connection.send_chat(&emeralds.to_string());
                true
            }
            None => false,
        }
    }

    pub fn on_screen_opened(&self, title: &str) {
        if title == SELL_SCREEN_TITLE {
            self.armed.store(false, Ordering::Release);
        }
    }
}

impl std::fmt::Debug for TradeMarketConverter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TradeMarketConverter")
            .field("armed", &self.is_armed())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wynnparse_core::{MemoryConnection, Outbound};

    const PROMPT: &str = "§6Type the price in emeralds or type 'cancel' to cancel:";

    fn converter() -> (TradeMarketConverter, ConfigStore, Arc<MemoryConnection>) {
        let config = ConfigStore::default();
        let connection = Arc::new(MemoryConnection::new());
        (TradeMarketConverter::new(config.clone(), connection.clone()), config, connection)
    }

    #[test]
    fn test_converts_next_message() {
        let (converter, _, connection) = converter();
        converter.on_chat(&RawLine::foreground(PROMPT));
        assert!(converter.is_armed());

        assert!(converter.on_chat_sent("1stx 2le"));
        assert_eq!(connection.sent(), vec![Outbound::Chat("270336".into())]);

        // Only the first message after the prompt
        assert!(!converter.on_chat_sent("1stx"));
    }

    #[test]
    fn test_unarmed_and_plain_messages_pass() {
        let (converter, _, connection) = converter();
        assert!(!converter.on_chat_sent("2le"));

        converter.on_chat(&RawLine::foreground(PROMPT));
        assert!(!converter.on_chat_sent("4096"));
        assert!(connection.sent().is_empty());
    }

    #[test]
    fn test_disarm() {
        let (converter, _, _) = converter();

        converter.on_chat(&RawLine::foreground(PROMPT));
        converter.on_chat(&RawLine::foreground("§cYou moved and your chat input was canceled."));
        assert!(!converter.is_armed());

        converter.on_chat(&RawLine::foreground(PROMPT));
        converter.on_screen_opened(SELL_SCREEN_TITLE);
        assert!(!converter.is_armed());
    }

    #[test]
    fn test_disabled_by_config() {
        let (converter, config, connection) = converter();
        config.update(|config| config.trade_market_price_conversion = false);

        converter.on_chat(&RawLine::foreground(PROMPT));
        assert!(!converter.on_chat_sent("2le"));
        assert!(connection.sent().is_empty());
        assert!(!converter.is_armed());
    }
}
