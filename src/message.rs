//! Discord channel message types.
//!
//! This module provides [`ChannelMessage`] and its [`Embed`]s, the subset of
//! Discord's message object that the extraction pipeline reads. The types
//! deserialize straight from the REST API's JSON; unknown fields are ignored.
//!
//! # Overview
//!
//! A message consists of:
//! - **Required**: `id` (snowflake)
//! - **Optional**: `timestamp`, `author`, `content`, `embeds`
//!
//! Each embed carries an ordered list of [`EmbedField`]s. Field names and
//! values may be absent; the parser treats absent and empty the same way.
//!
//! # Example
//!
//! ```
//! use canaryfetch::message::{ChannelMessage, Embed};
//!
//! let json = r#"{
//!     "id": "1386237000000000001",
//!     "timestamp": "2025-06-20T10:30:00.000000+00:00",
//!     "embeds": [{"fields": [{"name": "UserAgent", "value": "`curl/8.0`"}]}]
//! }"#;
//!
//! let msg: ChannelMessage = serde_json::from_str(json)?;
//! assert_eq!(msg.id, 1386237000000000001);
//! assert_eq!(msg.embeds[0].fields[0].value.as_deref(), Some("`curl/8.0`"));
//! # Ok::<(), serde_json::Error>(())
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// A message from a channel's history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChannelMessage {
    /// Discord snowflake. Snowflakes sort chronologically.
    #[serde(deserialize_with = "snowflake")]
    pub id: u64,

    /// When the message was sent.
    #[serde(default)]
    pub timestamp: Option<DateTime<Utc>>,

    /// Message author, absent for some system messages.
    #[serde(default)]
    pub author: Option<User>,

    /// Plain text content.
    #[serde(default)]
    pub content: String,

    /// Rich embeds attached to the message, in display order.
    #[serde(default)]
    pub embeds: Vec<Embed>,
}

impl ChannelMessage {
    /// Creates a message with only an id.
    pub fn new(id: u64) -> Self {
        Self {
            id,
            timestamp: None,
            author: None,
            content: String::new(),
            embeds: Vec::new(),
        }
    }

    /// Builder-style method to append an embed.
    #[must_use]
    pub fn with_embed(mut self, embed: Embed) -> Self {
        self.embeds.push(embed);
        self
    }

    /// Builder-style method to set the timestamp.
    #[must_use]
    pub fn with_timestamp(mut self, ts: DateTime<Utc>) -> Self {
        self.timestamp = Some(ts);
        self
    }
}

/// A rich embed.
///
/// Only `fields` matter for extraction; `title` and `description` are kept
/// for logging.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Embed {
    #[serde(default)]
    pub title: Option<String>,

    #[serde(default)]
    pub description: Option<String>,

    #[serde(default)]
    pub fields: Vec<EmbedField>,
}

impl Embed {
    /// Creates an empty embed.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style method to append a field.
    ///
    /// ```
    /// use canaryfetch::message::Embed;
    ///
    /// let embed = Embed::new()
    ///     .field("UserAgent", "curl/8.0")
    ///     .field("Geo Info", r#"{"ip":"1.2.3.4"}"#);
    /// assert_eq!(embed.fields.len(), 2);
    /// ```
    #[must_use]
    pub fn field(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.push(EmbedField {
            name: Some(name.into()),
            value: Some(value.into()),
            inline: false,
        });
        self
    }
}

/// One name/value entry of an embed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EmbedField {
    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub value: Option<String>,

    #[serde(default)]
    pub inline: bool,
}

impl EmbedField {
    /// Field name, empty when absent.
    pub fn name(&self) -> &str {
        self.name.as_deref().unwrap_or_default()
    }

    /// Field value, empty when absent.
    pub fn value(&self) -> &str {
        self.value.as_deref().unwrap_or_default()
    }
}

/// A Discord user (the bot itself, or a message author).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    #[serde(deserialize_with = "snowflake")]
    pub id: u64,

    pub username: String,

    /// Legacy four-digit tag; `"0"` for migrated usernames.
    #[serde(default)]
    pub discriminator: Option<String>,

    #[serde(default)]
    pub bot: bool,
}

impl std::fmt::Display for User {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.discriminator.as_deref() {
            Some(tag) if tag != "0" => write!(f, "{}#{}", self.username, tag),
            _ => write!(f, "{}", self.username),
        }
    }
}

/// A channel, as returned by channel lookup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Channel {
    #[serde(deserialize_with = "snowflake")]
    pub id: u64,

    /// Absent for DM channels.
    #[serde(default)]
    pub name: Option<String>,
}

impl std::fmt::Display for Channel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.name {
            Some(name) => write!(f, "#{}", name),
            None => write!(f, "{}", self.id),
        }
    }
}

/// Discord sends snowflakes as JSON strings; accept bare numbers too.
fn snowflake<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;

    // Decoded through `Value`: with arbitrary-precision numbers an untagged
    // enum no longer sees bare integers as `u64`.
    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(s) => s.parse().map_err(D::Error::custom),
        serde_json::Value::Number(n) => n
            .as_u64()
            .ok_or_else(|| D::Error::custom(format!("snowflake out of range: {n}"))),
        other => Err(D::Error::custom(format!("expected snowflake, got {other}"))),
    }
}
