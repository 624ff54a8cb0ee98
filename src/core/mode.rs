//! API-mode selection: which transport backs the chat and booking views.

use std::fmt;
use std::sync::Arc;

use tracing::info;

use crate::core::config::io::ConfigError;
use crate::core::config::settings::Settings;
use crate::core::config::store::ConfigStore;
use crate::core::transport::http::HttpTransport;
use crate::core::transport::mock::MockTransport;
use crate::core::transport::Transport;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ApiMode {
    Mock,
    Live,
}

impl ApiMode {
    pub fn from_mock(mock: bool) -> Self {
        if mock {
            ApiMode::Mock
        } else {
            ApiMode::Live
        }
    }

    pub fn is_mock(self) -> bool {
        self == ApiMode::Mock
    }

    pub fn label(self) -> &'static str {
        match self {
            ApiMode::Mock => "mock",
            ApiMode::Live => "live",
        }
    }

    pub fn badge(self) -> &'static str {
        match self {
            ApiMode::Mock => "🧪 Mock API Mode",
            ApiMode::Live => "🌐 Live API Mode",
        }
    }
}

impl fmt::Display for ApiMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Holds the effective settings and hands out the transport they select.
///
/// The selector is built once and passed to whoever needs a transport.
/// Changing the mode persists it immediately, but transports already
/// handed out keep talking to the old backend until the caller asks for a
/// new one.
#[derive(Debug, Clone)]
pub struct ModeSelector {
    store: ConfigStore,
    settings: Settings,
}

impl ModeSelector {
    pub fn new(store: ConfigStore, settings: Settings) -> Self {
        Self { store, settings }
    }

    /// Load the config behind `store` and resolve settings from it.
    pub fn open(store: ConfigStore) -> Result<Self, ConfigError> {
        let config = store.load()?;
        let settings = Settings::from_config(&config);
        Ok(Self::new(store, settings))
    }

    pub fn transport(&self) -> Arc<dyn Transport> {
        match self.settings.mode {
            ApiMode::Mock => Arc::new(MockTransport::new(self.settings.mock_delay)),
            ApiMode::Live => Arc::new(HttpTransport::new(&self.settings)),
        }
    }

    pub fn set_mode(&mut self, mock: bool) -> Result<(), ConfigError> {
        let mode = ApiMode::from_mock(mock);
        self.store.mutate(|config| config.use_mock = Some(mock))?;
        self.settings.mode = mode;
        info!(mode = mode.label(), "switched API mode");
        Ok(())
    }

    pub fn is_mock(&self) -> bool {
        self.settings.mode.is_mock()
    }

    pub fn mode(&self) -> ApiMode {
        self.settings.mode
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn store(&self) -> &ConfigStore {
        &self.store
    }

    /// Persist the host's phone number and use it for later requests.
    pub fn set_registered_number(&mut self, number: &str) -> Result<(), ConfigError> {
        let number = number.trim().to_string();
        self.store
            .mutate(|config| config.registered_number = Some(number.clone()))?;
        self.settings.registered_number = Some(number);
        Ok(())
    }

    /// Re-read the config file, as a fresh process would.
    pub fn reload(&self) -> Result<Self, ConfigError> {
        Self::open(self.store.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::data::Config;
    use tempfile::TempDir;

    fn selector_in(dir: &TempDir) -> ModeSelector {
        let store = ConfigStore::new(dir.path().join("config.toml"));
        let settings = Settings::resolve(&Config::default(), |_| None);
        ModeSelector::new(store, settings)
    }

    #[test]
    fn set_mode_true_reads_back_as_mock() {
        let dir = TempDir::new().expect("temp dir");
        let mut selector = selector_in(&dir);

        selector.set_mode(true).expect("persist");
        assert!(selector.is_mock());
        assert_eq!(selector.mode(), ApiMode::Mock);
    }

    #[test]
    fn mode_survives_a_reload_from_disk() {
        let dir = TempDir::new().expect("temp dir");
        let mut selector = selector_in(&dir);

        selector.set_mode(true).expect("persist");
        let reloaded = selector.reload().expect("reload");
        assert!(reloaded.is_mock());

        let mut reloaded = reloaded;
        reloaded.set_mode(false).expect("persist");
        assert!(!reloaded.reload().expect("reload").is_mock());
    }

    #[test]
    fn is_mock_has_no_side_effects() {
        let dir = TempDir::new().expect("temp dir");
        let selector = selector_in(&dir);

        let _ = selector.is_mock();
        assert!(!selector.store().path().exists());
    }

    #[test]
    fn registered_number_is_trimmed_and_persisted() {
        let dir = TempDir::new().expect("temp dir");
        let mut selector = selector_in(&dir);

        selector.set_registered_number(" 919834069861 ").expect("persist");
        assert_eq!(
            selector.settings().registered_number.as_deref(),
            Some("919834069861")
        );
        let config = selector.store().load().expect("load");
        assert_eq!(config.registered_number(), Some("919834069861"));
    }

    #[tokio::test]
    async fn mock_mode_hands_out_the_mock_transport() {
        let dir = TempDir::new().expect("temp dir");
        let mut selector = selector_in(&dir);
        selector.set_mode(true).expect("persist");

        let transport = selector.transport();
        assert_eq!(transport.name(), "mock");
    }
}
