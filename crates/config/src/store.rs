//! Shared, replaceable configuration handle

use crate::{ClientConfig, RedirectAction, RedirectCategory};
use parking_lot::RwLock;
use std::sync::Arc;

/// Shared handle to the live [`ClientConfig`]
///
/// # Purpose
/// Parsers read the current value at dispatch time instead of caching it,
/// so a config change takes effect on the very next line.
///
/// # Thread Safety
/// Cloning the store shares the same underlying config.
#[derive(Debug, Clone, Default)]
pub struct ConfigStore {
    inner: Arc<RwLock<ClientConfig>>,
}

impl ConfigStore {
    pub fn new(config: ClientConfig) -> Self {
        Self {
            inner: Arc::new(RwLock::new(config)),
        }
    }

    /// Copy of the current config
    pub fn snapshot(&self) -> ClientConfig {
        self.inner.read().clone()
    }

    /// Read a value from the current config
    pub fn read<T>(&self, f: impl FnOnce(&ClientConfig) -> T) -> T {
        f(&self.inner.read())
    }

    /// Replace the whole config
    pub fn replace(&self, config: ClientConfig) {
        tracing::info!("Configuration replaced");
        *self.inner.write() = config;
    }

    /// Modify the config in place
    pub fn update(&self, f: impl FnOnce(&mut ClientConfig)) {
        f(&mut self.inner.write());
    }

    pub fn redirect_action(&self, category: RedirectCategory) -> RedirectAction {
        self.inner.read().redirect_action(category)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clones_share_state() {
        let store = ConfigStore::default();
        let other = store.clone();

        assert_eq!(store.redirect_action(RedirectCategory::Heal), RedirectAction::Redirect);
        other.update(|config| config.set_redirect_action(RedirectCategory::Heal, RedirectAction::Hide));
        assert_eq!(store.redirect_action(RedirectCategory::Heal), RedirectAction::Hide);
    }

    #[test]
    fn test_replace() {
        let store = ConfigStore::default();
        let mut config = ClientConfig::default();
        config.hide_mask_titles = false;

        store.replace(config);
        assert!(!store.read(|config| config.hide_mask_titles));
        assert!(!store.snapshot().hide_mask_titles);
    }
}
