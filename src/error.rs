//! Unified error types for canaryfetch.
//!
//! This module provides a single [`CanaryfetchError`] enum that covers every
//! failure the library can surface. Per-field parse failures inside embeds are
//! not represented here: a malformed `geo info` or
//! `request headers` value just drops that field (see
//! [`parsing::embed`](crate::parsing::embed)).
//!
//! # Error Classes
//!
//! - **Startup** - the credential file is missing or empty; nothing was sent
//! - **Remote** - the Discord API failed or returned something unexpected
//! - **Output** - the JSON or CSV file could not be written

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// A specialized [`Result`] type for canaryfetch operations.
///
/// # Example
///
/// ```rust
/// use canaryfetch::error::Result;
/// use canaryfetch::core::Record;
///
/// fn my_function() -> Result<Vec<Record>> {
///     Ok(vec![])
/// }
/// ```
pub type Result<T> = std::result::Result<T, CanaryfetchError>;

/// Exit code for a missing credential file.
pub const EXIT_MISSING_TOKEN: i32 = 1;

/// Exit code for every other failure.
pub const EXIT_FAILURE: i32 = 2;

/// The error type for all canaryfetch operations.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CanaryfetchError {
    /// An I/O error occurred.
    ///
    /// Usually raised while writing the JSON or CSV output.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// CSV writing error.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Network or TLS failure from the underlying HTTP client, including
    /// request timeouts.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The Discord API answered with a non-success status.
    #[error("Discord API error ({status}): {message}")]
    Api {
        /// HTTP status code
        status: u16,
        /// The `message` field of Discord's error body, or the raw body
        message: String,
    },

    /// The credential file does not exist.
    #[error("Token file '{}' not found!", path.display())]
    MissingToken {
        /// Path that was looked up
        path: PathBuf,
    },

    /// The credential file exists but holds nothing but whitespace.
    #[error("Token file '{}' is empty", path.display())]
    EmptyToken {
        /// Path that was read
        path: PathBuf,
    },

    /// The configured channel does not exist or the bot cannot see it.
    #[error("Channel {channel_id} not found or not accessible")]
    ChannelNotFound {
        /// The channel snowflake
        channel_id: u64,
    },

    /// A response body did not match the expected shape.
    #[error("Failed to decode {context}: {source}")]
    Decode {
        /// What was being decoded (usually the request URL)
        context: String,
        /// The underlying JSON error
        #[source]
        source: serde_json::Error,
    },

    /// Invalid configuration value.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

// ============================================================================
// Convenience constructors
// ============================================================================

impl CanaryfetchError {
    /// Creates a missing-token error.
    pub fn missing_token(path: impl Into<PathBuf>) -> Self {
        CanaryfetchError::MissingToken { path: path.into() }
    }

    /// Creates an API error from a status code and message.
    pub fn api(status: u16, message: impl Into<String>) -> Self {
        CanaryfetchError::Api {
            status,
            message: message.into(),
        }
    }

    /// Creates a decode error.
    pub fn decode(context: impl Into<String>, source: serde_json::Error) -> Self {
        CanaryfetchError::Decode {
            context: context.into(),
            source,
        }
    }

    /// Creates an invalid configuration error.
    pub fn invalid_config(message: impl Into<String>) -> Self {
        CanaryfetchError::InvalidConfig(message.into())
    }

    /// Returns `true` if this is an IO error.
    pub fn is_io(&self) -> bool {
        matches!(self, CanaryfetchError::Io(_))
    }

    /// Returns `true` if the credential file was missing.
    pub fn is_missing_token(&self) -> bool {
        matches!(self, CanaryfetchError::MissingToken { .. })
    }

    /// Returns `true` if the error came from the remote platform.
    pub fn is_remote(&self) -> bool {
        matches!(
            self,
            CanaryfetchError::Http(_)
                | CanaryfetchError::Api { .. }
                | CanaryfetchError::ChannelNotFound { .. }
                | CanaryfetchError::Decode { .. }
        )
    }

    /// Process exit code the CLI uses for this error.
    pub fn exit_code(&self) -> i32 {
        if self.is_missing_token() {
            EXIT_MISSING_TOKEN
        } else {
            EXIT_FAILURE
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
