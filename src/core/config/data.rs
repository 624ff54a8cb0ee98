use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Persisted client state and connection overrides, stored as TOML.
#[derive(Debug, Serialize, Deserialize, Default, Clone, PartialEq, Eq)]
pub struct Config {
    /// Back the chat and booking views with canned data instead of the backend
    pub use_mock: Option<bool>,
    /// Phone number the host registered with; scopes booking queries
    pub registered_number: Option<String>,
    /// Base URL of the chat backend (`/test`, `/chat-history`)
    pub chat_base_url: Option<String>,
    /// Base URL of the booking backend (`/bookings`, `/calendar`)
    pub bookings_base_url: Option<String>,
    /// Bearer token sent with every backend request
    pub api_token: Option<String>,
    /// Pause before an assistant reply is shown, in milliseconds
    pub reply_delay_ms: Option<u64>,
    /// Simulated latency of the mock backend, in milliseconds
    pub mock_delay_ms: Option<u64>,
    /// How many months past the current one the bookings window covers
    pub booking_months_ahead: Option<u32>,
}

impl Config {
    pub fn registered_number(&self) -> Option<&str> {
        self.registered_number
            .as_deref()
            .map(str::trim)
            .filter(|number| !number.is_empty())
    }
}

/// Get a user-friendly display string for a path
/// Converts absolute paths to use ~ notation on Unix-like systems when possible
pub fn path_display<P: AsRef<Path>>(path: P) -> String {
    let path = path.as_ref();

    #[cfg(unix)]
    {
        if let Some(home) = std::env::var_os("HOME") {
            let home_path = PathBuf::from(home);
            if let Ok(relative) = path.strip_prefix(&home_path) {
                return format!("~/{}", relative.display());
            }
        }
    }

    path.display().to_string()
}
