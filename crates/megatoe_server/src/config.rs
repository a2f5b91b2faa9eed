//! Server configuration.

use derive_getters::Getters;
use derive_more::{Display, Error};
use megatoe_engine::{AiConfig, AiPlayer, DEFAULT_SMART_PROBABILITY};
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info, instrument};

/// Environment variable holding the Discord bot token.
pub const DISCORD_TOKEN_VAR: &str = "DISCORD_BOT_TOKEN";

/// Settings for the server, terminal play and self play.
///
/// Every field has a default, so an empty file (or no file) is valid.
#[derive(Debug, Clone, PartialEq, Getters, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Address to bind the HTTP server to.
    #[serde(default = "default_host")]
    host: String,

    /// Port to bind the HTTP server to.
    #[serde(default = "default_port")]
    port: u16,

    /// Fallback tracing filter when `RUST_LOG` is unset.
    #[serde(default = "default_log_filter")]
    log_filter: String,

    /// Base URL of the Discord REST API.
    #[serde(default = "default_discord_api_base")]
    discord_api_base: String,

    /// Chance that medium difficulty plays the heuristic.
    #[serde(default = "default_smart_probability")]
    smart_probability: f64,

    /// Pause before each computer move in terminal play.
    #[serde(default = "default_ai_delay_ms")]
    ai_delay_ms: u64,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_log_filter() -> String {
    "info".to_string()
}

fn default_discord_api_base() -> String {
    "https://discord.com/api/v9".to_string()
}

fn default_smart_probability() -> f64 {
    DEFAULT_SMART_PROBABILITY
}

fn default_ai_delay_ms() -> u64 {
    500
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            log_filter: default_log_filter(),
            discord_api_base: default_discord_api_base(),
            smart_probability: default_smart_probability(),
            ai_delay_ms: default_ai_delay_ms(),
        }
    }
}

impl ServerConfig {
    /// Loads configuration from a TOML file.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        debug!("Loading config from file");
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::new(format!("Failed to read config file: {}", e)))?;

        let config = Self::from_toml(&content)?;
        info!(host = %config.host, port = config.port, "Config loaded successfully");
        Ok(config)
    }

    /// Parses and validates configuration from TOML text.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)
            .map_err(|e| ConfigError::new(format!("Failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Loads `path` if given, otherwise the defaults.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::from_file(path),
            None => {
                debug!("No config file given, using defaults");
                Ok(Self::default())
            }
        }
    }

    /// Checks value ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=1.0).contains(&self.smart_probability) {
            return Err(ConfigError::new(format!(
                "smart_probability must be between 0 and 1, got {}",
                self.smart_probability
            )));
        }
        if self.host.trim().is_empty() {
            return Err(ConfigError::new("host must not be empty".to_string()));
        }
        Ok(())
    }

    /// Replaces the bind host.
    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    /// Replaces the bind port.
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// `host:port` for the listener.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Pacing delay for terminal computer moves.
    pub fn ai_delay(&self) -> Duration {
        Duration::from_millis(self.ai_delay_ms)
    }

    /// AI constants derived from this configuration.
    pub fn ai_config(&self) -> AiConfig {
        AiConfig {
            smart_probability: self.smart_probability,
        }
    }

    /// Builds an AI, seeded for reproducible games or from the OS otherwise.
    pub fn ai_player(&self, seed: Option<u64>) -> AiPlayer<StdRng> {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        AiPlayer::with_config(self.ai_config(), rng)
    }
}

/// Reads the Discord bot token from the environment.
pub fn discord_token() -> Option<String> {
    std::env::var(DISCORD_TOKEN_VAR)
        .ok()
        .filter(|token| !token.trim().is_empty())
}

/// Configuration error.
#[derive(Debug, Clone, Display, Error)]
#[display("Config error: {} at {}:{}", message, file, line)]
pub struct ConfigError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl ConfigError {
    /// Creates a new configuration error.
    #[track_caller]
    pub fn new(message: String) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message,
            line: loc.line(),
            file: loc.file(),
        }
    }
}
