//! Effective runtime settings: environment overrides on top of the config
//! file on top of built-in defaults.

use std::time::Duration;

use crate::core::config::data::Config;
use crate::core::mode::ApiMode;

pub const DEFAULT_BASE_URL: &str = "http://localhost:3002";
pub const DEFAULT_REPLY_DELAY_MS: u64 = 1500;
pub const DEFAULT_MOCK_DELAY_MS: u64 = 300;
pub const DEFAULT_BOOKING_MONTHS_AHEAD: u32 = 2;

pub const ENV_CHAT_BASE_URL: &str = "AASTHA_API_BASE_URL";
pub const ENV_BOOKINGS_BASE_URL: &str = "AASTHA_BOOKINGS_BASE_URL";
pub const ENV_API_TOKEN: &str = "AASTHA_API_TOKEN";
pub const ENV_RUN_ENVIRONMENT: &str = "AASTHA_ENV";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Mode used when nothing is persisted; fixed for the process lifetime.
    pub default_mode: ApiMode,
    /// Mode after applying the persisted preference.
    pub mode: ApiMode,
    pub chat_base_url: String,
    pub bookings_base_url: String,
    pub api_token: Option<String>,
    pub registered_number: Option<String>,
    pub reply_delay: Duration,
    pub mock_delay: Duration,
    pub booking_months_ahead: u32,
}

impl Settings {
    pub fn from_config(config: &Config) -> Self {
        Self::resolve(config, |key| std::env::var(key).ok())
    }

    pub fn resolve<F>(config: &Config, env: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let lookup = |key: &str| {
            env(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let default_mode = default_mode_for(lookup(ENV_RUN_ENVIRONMENT).as_deref());
        let mode = config.use_mock.map(ApiMode::from_mock).unwrap_or(default_mode);

        let chat_base_url = lookup(ENV_CHAT_BASE_URL)
            .or_else(|| config.chat_base_url.clone())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        let bookings_base_url = lookup(ENV_BOOKINGS_BASE_URL)
            .or_else(|| config.bookings_base_url.clone())
            .unwrap_or_else(|| chat_base_url.clone());

        Self {
            default_mode,
            mode,
            chat_base_url,
            bookings_base_url,
            api_token: lookup(ENV_API_TOKEN).or_else(|| config.api_token.clone()),
            registered_number: config.registered_number().map(str::to_string),
            reply_delay: Duration::from_millis(
                config.reply_delay_ms.unwrap_or(DEFAULT_REPLY_DELAY_MS),
            ),
            mock_delay: Duration::from_millis(config.mock_delay_ms.unwrap_or(DEFAULT_MOCK_DELAY_MS)),
            booking_months_ahead: config
                .booking_months_ahead
                .unwrap_or(DEFAULT_BOOKING_MONTHS_AHEAD),
        }
    }
}

/// Mock in development, live otherwise. `AASTHA_ENV` wins over the build profile.
pub fn default_mode_for(run_environment: Option<&str>) -> ApiMode {
    match run_environment.map(str::to_ascii_lowercase).as_deref() {
        Some("development" | "dev") => ApiMode::Mock,
        Some("production" | "prod") => ApiMode::Live,
        _ if cfg!(debug_assertions) => ApiMode::Mock,
        _ => ApiMode::Live,
    }
}
