//! HTTP client for the Discord REST API.
//!
//! Wraps `reqwest` with bot-token authentication, typed response
//! deserialization and Discord's error envelope. Only the three read
//! endpoints the pipeline needs are covered.

use std::time::Duration;

use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use reqwest::{Client, StatusCode, Url};
use serde::de::DeserializeOwned;

use crate::config::DEFAULT_API_BASE;
use crate::error::{CanaryfetchError, Result};
use crate::history::ChatPlatform;
use crate::message::{Channel, ChannelMessage, User};

const USER_AGENT: &str = concat!("DiscordBot (canaryfetch, ", env!("CARGO_PKG_VERSION"), ")");

/// Client for the Discord REST API.
///
/// Use [`DiscordClient::new`] for production or
/// [`DiscordClient::with_base_url`] to point at a mock server in tests.
pub struct DiscordClient {
    client: Client,
    base_url: Url,
}

impl DiscordClient {
    /// Creates a client for the production API.
    ///
    /// # Errors
    ///
    /// Returns [`CanaryfetchError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`CanaryfetchError::InvalidConfig`] if the
    /// token cannot be sent as a header.
    pub fn new(token: &str, timeout_secs: u64) -> Result<Self> {
        Self::with_base_url(token, timeout_secs, DEFAULT_API_BASE)
    }

    /// Creates a client with a custom API root.
    pub fn with_base_url(token: &str, timeout_secs: u64, base_url: &str) -> Result<Self> {
        let mut auth = HeaderValue::from_str(&format!("Bot {token}")).map_err(|_| {
            CanaryfetchError::invalid_config("token contains characters not allowed in a header")
        })?;
        auth.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, auth);

        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .build()?;

        // Exactly one trailing slash, so relative joins append to the path.
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalised).map_err(|e| {
            CanaryfetchError::invalid_config(format!("invalid API base URL '{base_url}': {e}"))
        })?;

        Ok(Self { client, base_url })
    }

    /// Fetches the bot's own user (`GET /users/@me`).
    pub async fn current_user(&self) -> Result<User> {
        let url = self.endpoint("users/@me", &[])?;
        self.get_json(&url).await
    }

    /// Fetches a channel by id (`GET /channels/{id}`).
    ///
    /// # Errors
    ///
    /// A 403 or 404 answer becomes [`CanaryfetchError::ChannelNotFound`].
    pub async fn get_channel(&self, channel_id: u64) -> Result<Channel> {
        let url = self.endpoint(&format!("channels/{channel_id}"), &[])?;
        match self.get_json(&url).await {
            Err(CanaryfetchError::Api { status, .. })
                if status == StatusCode::NOT_FOUND.as_u16()
                    || status == StatusCode::FORBIDDEN.as_u16() =>
            {
                Err(CanaryfetchError::ChannelNotFound { channel_id })
            }
            other => other,
        }
    }

    /// Fetches up to `limit` messages newer than `after`
    /// (`GET /channels/{id}/messages?after=&limit=`).
    ///
    /// Discord returns the page newest first.
    pub async fn get_messages(
        &self,
        channel_id: u64,
        after: u64,
        limit: u8,
    ) -> Result<Vec<ChannelMessage>> {
        let url = self.endpoint(
            &format!("channels/{channel_id}/messages"),
            &[("after", &after.to_string()), ("limit", &limit.to_string())],
        )?;
        self.get_json(&url).await
    }

    /// Joins `path` onto the base URL and appends percent-encoded query pairs.
    fn endpoint(&self, path: &str, query: &[(&str, &str)]) -> Result<Url> {
        let mut url = self
            .base_url
            .join(path)
            .map_err(|e| CanaryfetchError::invalid_config(format!("bad endpoint '{path}': {e}")))?;
        if !query.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (k, v) in query {
                pairs.append_pair(k, v);
            }
        }
        Ok(url)
    }

    /// Sends a GET request and decodes a 2xx body as `T`.
    ///
    /// # Errors
    ///
    /// - [`CanaryfetchError::Http`] on network failure or timeout.
    /// - [`CanaryfetchError::Api`] on a non-2xx status.
    /// - [`CanaryfetchError::Decode`] if the body does not match `T`.
    async fn get_json<T: DeserializeOwned>(&self, url: &Url) -> Result<T> {
        let response = self.client.get(url.clone()).send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(CanaryfetchError::api(status.as_u16(), error_message(&body)));
        }

        serde_json::from_str(&body).map_err(|e| CanaryfetchError::decode(url.path(), e))
    }
}

/// Pulls `message` out of Discord's `{"code": .., "message": ..}` envelope,
/// falling back to the raw body.
fn error_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v.get("message").and_then(|m| m.as_str()).map(str::to_string))
        .unwrap_or_else(|| body.chars().take(200).collect())
}

impl ChatPlatform for DiscordClient {
    async fn current_user(&self) -> Result<User> {
        DiscordClient::current_user(self).await
    }

    async fn channel(&self, channel_id: u64) -> Result<Channel> {
        self.get_channel(channel_id).await
    }

    async fn messages_after(
        &self,
        channel_id: u64,
        after: u64,
        limit: u8,
    ) -> Result<Vec<ChannelMessage>> {
        self.get_messages(channel_id, after, limit).await
    }
}
