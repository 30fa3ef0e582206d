//! wynnparse Configuration Management
//!
//! Loads the client configuration from a `key = value` text file.
//!
//! ```text
//! # config/wynnparse.txt
//! soulPoint = hide
//! heal = keep
//! hideMaskTitles = true
//! maskDisplay = %mask% mask
//! territoryUpdateMs = 15000
//! ```

mod redirect;
mod store;

pub use redirect::{RedirectAction, RedirectCategory};
pub use store::ConfigStore;

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use wynnparse_core::WynnError;

/// Default location of the config file, relative to the working directory
pub const DEFAULT_CONFIG_PATH: &str = "config/wynnparse.txt";

/// Configuration errors
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("Config file not readable: {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl From<ConfigError> for WynnError {
    fn from(err: ConfigError) -> Self {
        WynnError::Config(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ConfigError>;

/// Complete client configuration
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Per-category redirect actions (missing categories use the default action)
    pub redirect_actions: HashMap<RedirectCategory, RedirectAction>,

    /// Suppress mask titles once they are parsed (from "hideMaskTitles")
    pub hide_mask_titles: bool,
    /// Mask overlay template, `%mask%` is replaced (from "maskDisplay")
    pub mask_display: String,
    /// Show the overlay when no mask is worn (from "displayNoneMask")
    pub display_none_mask: bool,

    /// Convert price shorthand typed into the trade market (from "tradeMarketPriceConversion")
    pub trade_market_price_conversion: bool,

    /// Territory poll interval in milliseconds (from "territoryUpdateMs")
    pub territory_update_ms: u64,
    /// Territory list document to poll (from "territorySource")
    pub territory_source: Option<PathBuf>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            redirect_actions: HashMap::new(),
            hide_mask_titles: true,
            mask_display: "%mask% mask".into(),
            display_none_mask: false,
            trade_market_price_conversion: true,
            territory_update_ms: 15_000,
            territory_source: None,
        }
    }
}

impl ClientConfig {
    /// Load configuration from a file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&content)
    }

    /// Load configuration from [`DEFAULT_CONFIG_PATH`]
    pub fn load_default() -> Result<Self> {
        Self::load_from_file(DEFAULT_CONFIG_PATH)
    }

    /// Parse config file content
    ///
    /// Malformed lines, unknown keys and bad values are logged and skipped.
    pub fn parse(content: &str) -> Result<Self> {
        let mut config = Self::default();

        for (index, line) in content.lines().enumerate() {
            let line = line.trim();

            // Skip comments and empty lines
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let Some(eq_pos) = line.find('=') else {
                tracing::warn!("Ignoring config line {}: expected key = value, got {:?}", index + 1, line);
                continue;
            };

            let key = line[..eq_pos].trim();
            let value = line[eq_pos + 1..].trim();
            config.parse_option(key, value);
        }

        Ok(config)
    }

    fn parse_option(&mut self, key: &str, value: &str) {
        if let Some(category) = RedirectCategory::from_key(key) {
            match RedirectAction::from_str(value) {
                Some(action) => self.set_redirect_action(category, action),
                None => tracing::warn!("Invalid redirect action for {}: {}", key, value),
            }
            return;
        }

        match key.to_ascii_lowercase().as_str() {
            "hidemasktitles" => {
                self.hide_mask_titles = value.parse().unwrap_or(true);
            }
            "maskdisplay" => self.mask_display = value.into(),
            "displaynonemask" => {
                self.display_none_mask = value.parse().unwrap_or(false);
            }
            "trademarketpriceconversion" => {
                self.trade_market_price_conversion = value.parse().unwrap_or(true);
            }
            "territoryupdatems" => {
                self.territory_update_ms = value.parse().unwrap_or(15_000);
            }
            "territorysource" => {
                self.territory_source = (!value.is_empty()).then(|| PathBuf::from(value));
            }
            _ => {
                tracing::debug!("Unknown config option: {} = {}", key, value);
            }
        }
    }

    pub fn redirect_action(&self, category: RedirectCategory) -> RedirectAction {
        self.redirect_actions
            .get(&category)
            .copied()
            .unwrap_or_default()
    }

    pub fn set_redirect_action(&mut self, category: RedirectCategory, action: RedirectAction) {
        self.redirect_actions.insert(category, action);
    }

    /// Territory poll interval, never shorter than one second
    pub fn territory_update_interval(&self) -> Duration {
        Duration::from_millis(self.territory_update_ms.max(1_000))
    }

    /// Display configuration summary
    pub fn display(&self) {
        tracing::info!("Client configuration:");
        for category in RedirectCategory::ALL {
            tracing::info!("  {:<20} {}", category.key(), self.redirect_action(category).as_str());
        }
        tracing::info!("  hideMaskTitles       {}", self.hide_mask_titles);
        tracing::info!("  maskDisplay          {}", self.mask_display);
        tracing::info!("  displayNoneMask      {}", self.display_none_mask);
        tracing::info!("  tradeMarketPriceConversion {}", self.trade_market_price_conversion);
        tracing::info!("  territoryUpdateMs    {}", self.territory_update_ms);
        match &self.territory_source {
            Some(path) => tracing::info!("  territorySource      {}", path.display()),
            None => tracing::info!("  territorySource      (none)"),
        }
    }
}
