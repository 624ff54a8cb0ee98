use super::data::Config;
use super::io::ConfigError;
use super::settings::{
    default_mode_for, Settings, DEFAULT_BASE_URL, ENV_API_TOKEN, ENV_BOOKINGS_BASE_URL,
    ENV_CHAT_BASE_URL, ENV_RUN_ENVIRONMENT,
};
use super::store::ConfigStore;
use crate::core::mode::ApiMode;
use std::collections::HashMap;
use std::time::Duration;
use tempfile::TempDir;

fn no_env(_: &str) -> Option<String> {
    None
}

#[test]
fn test_load_nonexistent_config() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let config_path = temp_dir.path().join("nonexistent_config.toml");

    let config = Config::load_from_path(&config_path).expect("Failed to load config");

    assert_eq!(config, Config::default());
}

#[test]
fn test_config_persistence_lifecycle() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let config_path = temp_dir.path().join("nested").join("config.toml");

    let config = Config {
        use_mock: Some(true),
        registered_number: Some("919834069861".to_string()),
        ..Default::default()
    };
    config
        .save_to_path(&config_path)
        .expect("Failed to save config");
    let loaded = Config::load_from_path(&config_path).expect("Failed to load config");
    assert_eq!(loaded.use_mock, Some(true));
    assert_eq!(loaded.registered_number(), Some("919834069861"));

    let mut config = loaded;
    config.use_mock = None;
    config
        .save_to_path(&config_path)
        .expect("Failed to save unset config");
    let loaded = Config::load_from_path(&config_path).expect("Failed to load unset config");
    assert_eq!(loaded.use_mock, None);
    assert_eq!(loaded.registered_number(), Some("919834069861"));
}

#[test]
fn invalid_toml_reports_parse_error_with_path() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let config_path = temp_dir.path().join("config.toml");
    std::fs::write(&config_path, "use_mock = [not toml").expect("write");

    let err = Config::load_from_path(&config_path).expect_err("parse should fail");
    assert!(matches!(err, ConfigError::Parse { .. }));
    assert!(err.to_string().contains("config.toml"));
}

#[test]
fn blank_registered_number_is_treated_as_unset() {
    let config = Config {
        registered_number: Some("   ".to_string()),
        ..Default::default()
    };
    assert_eq!(config.registered_number(), None);
}

#[test]
fn store_mutations_survive_a_fresh_store() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let path = temp_dir.path().join("config.toml");

    ConfigStore::new(&path)
        .mutate(|config| config.use_mock = Some(false))
        .expect("mutate failed");
    ConfigStore::new(&path)
        .mutate(|config| config.registered_number = Some("98765".to_string()))
        .expect("mutate failed");

    let loaded = ConfigStore::new(&path).load().expect("load failed");
    assert_eq!(loaded.use_mock, Some(false));
    assert_eq!(loaded.registered_number(), Some("98765"));
}

#[test]
fn settings_fall_back_to_defaults() {
    let settings = Settings::resolve(&Config::default(), no_env);
    assert_eq!(settings.chat_base_url, DEFAULT_BASE_URL);
    assert_eq!(settings.bookings_base_url, DEFAULT_BASE_URL);
    assert_eq!(settings.reply_delay, Duration::from_millis(1500));
    assert_eq!(settings.api_token, None);
    assert_eq!(settings.mode, settings.default_mode);
}

#[test]
fn environment_overrides_config_values() {
    let config = Config {
        chat_base_url: Some("http://config.example".to_string()),
        api_token: Some("from-config".to_string()),
        ..Default::default()
    };
    let env: HashMap<&str, &str> = HashMap::from([
        (ENV_CHAT_BASE_URL, "http://env.example"),
        (ENV_BOOKINGS_BASE_URL, "http://bookings.example"),
        (ENV_API_TOKEN, "from-env"),
    ]);

    let settings = Settings::resolve(&config, |key| env.get(key).map(|v| v.to_string()));
    assert_eq!(settings.chat_base_url, "http://env.example");
    assert_eq!(settings.bookings_base_url, "http://bookings.example");
    assert_eq!(settings.api_token.as_deref(), Some("from-env"));
}

#[test]
fn bookings_url_follows_chat_url_when_unset() {
    let config = Config {
        chat_base_url: Some("http://chat.example".to_string()),
        ..Default::default()
    };
    let settings = Settings::resolve(&config, no_env);
    assert_eq!(settings.bookings_base_url, "http://chat.example");
}

#[test]
fn persisted_mode_wins_over_environment_default() {
    let config = Config {
        use_mock: Some(false),
        ..Default::default()
    };
    let settings = Settings::resolve(&config, |key| {
        (key == ENV_RUN_ENVIRONMENT).then(|| "development".to_string())
    });
    assert_eq!(settings.default_mode, ApiMode::Mock);
    assert_eq!(settings.mode, ApiMode::Live);
}

#[test]
fn run_environment_selects_default_mode() {
    assert_eq!(default_mode_for(Some("development")), ApiMode::Mock);
    assert_eq!(default_mode_for(Some("Production")), ApiMode::Live);
    let by_profile = if cfg!(debug_assertions) {
        ApiMode::Mock
    } else {
        ApiMode::Live
    };
    assert_eq!(default_mode_for(None), by_profile);
}
