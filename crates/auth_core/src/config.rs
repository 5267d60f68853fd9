use serde::{Deserialize, Serialize};
use std::time::Duration;

const CONFIG_FILE_PATH: &str = "config.toml";

const DEFAULT_API_BASE: &str = "https://dummyjson.com";
const DEFAULT_TOKEN_TTL_MINS: u64 = 30;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Base URL of the remote user-directory service.
    #[serde(default = "default_api_base")]
    pub api_base: String,

    /// Access-token lifetime requested on login/refresh, in minutes.
    #[serde(default = "default_token_ttl_mins")]
    pub token_ttl_mins: u64,
}

fn default_api_base() -> String {
    DEFAULT_API_BASE.to_string()
}

fn default_token_ttl_mins() -> u64 {
    DEFAULT_TOKEN_TTL_MINS
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

impl Config {
    pub fn new() -> Self {
        let mut config = Config {
            api_base: default_api_base(),
            token_ttl_mins: default_token_ttl_mins(),
        };

        // Read from config.toml when present
        if std::path::Path::new(CONFIG_FILE_PATH).exists() {
            if let Ok(content) = std::fs::read_to_string(CONFIG_FILE_PATH) {
                if let Ok(file_config) = toml::from_str::<Config>(&content) {
                    config = file_config;
                }
            }
        }

        // Override with environment variables if they exist
        if let Ok(api_base) = std::env::var("DIRECTORY_API_BASE") {
            if !api_base.trim().is_empty() {
                config.api_base = api_base.trim().to_string();
            }
        }
        if let Ok(ttl) = std::env::var("TOKEN_TTL_MINS") {
            if let Ok(mins) = ttl.trim().parse::<u64>() {
                if mins > 0 {
                    config.token_ttl_mins = mins;
                }
            }
        }
        config
    }

    /// Period of the silent-refresh timer: 5/6 of the token lifetime, so
    /// renewal lands safely before expiry (25 minutes for the default 30).
    pub fn refresh_period(&self) -> Duration {
        Duration::from_secs(self.token_ttl_mins * 60 * 5 / 6)
    }
}
