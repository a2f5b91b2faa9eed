//! Discord user lookup proxy.
//!
//! Browsers cannot hold the bot token, so the server validates the requested
//! id, calls the Discord REST API with the token from the environment, and
//! relays the user object. Upstream failures are reported with a generic
//! message and never retried.

use async_trait::async_trait;
use derive_more::{Display, Error};
use reqwest::StatusCode;
use reqwest::header::AUTHORIZATION;
use serde_json::Value;
use tracing::{debug, error, info, instrument, warn};

/// Reasons a lookup fails, each with its HTTP status.
#[derive(Debug, Clone, PartialEq, Eq, Display, Error)]
pub enum LookupError {
    /// No `id` query parameter.
    #[display("User ID is required")]
    MissingId,

    /// `id` is not 17-20 decimal digits.
    #[display("Invalid Discord ID format")]
    InvalidIdFormat,

    /// Discord reported no such user.
    #[display("User not found")]
    UpstreamNotFound,

    /// Discord answered with a non-success status other than 404.
    #[display("Internal server error")]
    UpstreamError {
        /// Status returned by Discord.
        status: u16,
    },

    /// Transport, decoding or credential failure.
    #[display("Internal server error")]
    InternalError {
        /// Detail for the log; never sent to the client.
        reason: String,
    },
}

impl LookupError {
    /// HTTP status reported to the client.
    pub fn status(&self) -> StatusCode {
        match self {
            LookupError::MissingId | LookupError::InvalidIdFormat => StatusCode::BAD_REQUEST,
            LookupError::UpstreamNotFound => StatusCode::NOT_FOUND,
            LookupError::UpstreamError { .. } | LookupError::InternalError { .. } => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

/// Validates the `id` query parameter.
///
/// An absent or empty id is missing; otherwise it must be 17-20 ASCII digits.
pub fn validate_user_id(id: Option<&str>) -> Result<&str, LookupError> {
    let id = match id {
        Some(id) if !id.is_empty() => id,
        _ => return Err(LookupError::MissingId),
    };
    if (17..=20).contains(&id.len()) && id.bytes().all(|b| b.is_ascii_digit()) {
        Ok(id)
    } else {
        Err(LookupError::InvalidIdFormat)
    }
}

/// Source of Discord user objects.
#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// Fetches the user with a validated id.
    async fn fetch_user(&self, id: &str) -> Result<Value, LookupError>;
}

/// Discord REST client authenticated as a bot.
#[derive(Debug, Clone)]
pub struct DiscordClient {
    client: reqwest::Client,
    api_base: String,
    token: Option<String>,
}

impl DiscordClient {
    /// Creates a client for `api_base` (e.g. `https://discord.com/api/v9`).
    ///
    /// A missing token is reported per request rather than at startup, so the
    /// game API keeps working without Discord credentials.
    pub fn new(api_base: impl Into<String>, token: Option<String>) -> Self {
        let api_base = api_base.into().trim_end_matches('/').to_string();
        if token.is_none() {
            warn!("No Discord bot token configured; lookups will fail");
        }
        Self {
            client: reqwest::Client::new(),
            api_base,
            token,
        }
    }

    fn user_url(&self, id: &str) -> String {
        format!("{}/users/{}", self.api_base, id)
    }
}

#[async_trait]
impl UserDirectory for DiscordClient {
    #[instrument(skip(self), fields(api_base = %self.api_base))]
    async fn fetch_user(&self, id: &str) -> Result<Value, LookupError> {
        let token = self.token.as_deref().ok_or_else(|| {
            error!("Discord bot token missing");
            LookupError::InternalError {
                reason: "Discord bot token missing".to_string(),
            }
        })?;

        debug!("Requesting user from Discord");
        let response = self
            .client
            .get(self.user_url(id))
            .header(AUTHORIZATION, format!("Bot {}", token))
            .send()
            .await
            .map_err(|e| {
                error!(error = %e, "Discord request failed");
                LookupError::InternalError {
                    reason: e.to_string(),
                }
            })?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            info!("Discord user not found");
            return Err(LookupError::UpstreamNotFound);
        }
        if !status.is_success() {
            error!(status = %status, "Discord API error");
            return Err(LookupError::UpstreamError {
                status: status.as_u16(),
            });
        }

        let user = response.json::<Value>().await.map_err(|e| {
            error!(error = %e, "Failed to parse Discord response");
            LookupError::InternalError {
                reason: e.to_string(),
            }
        })?;

        info!("Discord user fetched");
        Ok(user)
    }
}
