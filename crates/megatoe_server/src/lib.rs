//! Megatoe server - HTTP game API, Discord lookup proxy and terminal front end.
//!
//! # Architecture
//!
//! - **Config**: TOML settings with defaults; the Discord token comes from the environment
//! - **Sessions**: in-memory store of games, each with its own controller and AI
//! - **Api**: axum routes for games and the lookup proxy, all CORS-open
//! - **Lookup**: id validation and the Discord REST client behind [`UserDirectory`]
//! - **Terminal / Selfplay**: local front ends over the same controller
//!
//! # Example
//!
//! ```no_run
//! use megatoe_server::{AppState, DiscordClient, ServerConfig, SessionManager, router};
//! use std::sync::Arc;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let config = ServerConfig::default();
//! let directory = DiscordClient::new(config.discord_api_base().clone(), None);
//! let state = AppState::new(SessionManager::new(config.ai_config()), Arc::new(directory));
//! let listener = tokio::net::TcpListener::bind(config.bind_address()).await?;
//! axum::serve(listener, router(state)).await?;
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod api;
pub mod cli;
mod config;
mod lookup;
pub mod selfplay;
mod sessions;
pub mod terminal;

// Crate-level exports - Configuration
pub use config::{ConfigError, DISCORD_TOKEN_VAR, ServerConfig, discord_token};

// Crate-level exports - HTTP API
pub use api::{
    ApiError, AppState, CreateGameRequest, LookupQuery, LookupResponse, SessionView,
    SettingsRequest, TurnResponse, router,
};

// Crate-level exports - Discord lookup
pub use lookup::{DiscordClient, LookupError, UserDirectory, validate_user_id};

// Crate-level exports - Session management
pub use sessions::{GameEntry, SessionError, SessionId, SessionManager};
