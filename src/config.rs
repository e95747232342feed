//! Configuration for a fetch run.
//!
//! This module provides [`FetchConfig`], a plain struct with builder methods
//! and no CLI framework dependency. The binary fills it from command-line
//! arguments; library users build it directly.
//!
//! # Example
//!
//! ```rust
//! use canaryfetch::config::FetchConfig;
//!
//! let config = FetchConfig::new()
//!     .with_channel_id(1386236984497930312)
//!     .with_token_file("secrets/token.txt")
//!     .with_timeout_secs(60);
//!
//! assert!(config.validate().is_ok());
//! ```

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::core::models::OutputConfig;
use crate::error::{CanaryfetchError, Result};

/// Default credential file.
pub const DEFAULT_TOKEN_FILE: &str = "token.txt";

/// Default channel to export.
pub const DEFAULT_CHANNEL_ID: u64 = 1386236984497930312;

pub const DEFAULT_OUTPUT_JSON: &str = "discord_dataset.json";
pub const DEFAULT_OUTPUT_CSV: &str = "discord_dataset.csv";

/// Discord REST API root.
pub const DEFAULT_API_BASE: &str = "https://discord.com/api/v10/";

/// Largest page Discord serves for channel history.
pub const MAX_PAGE_SIZE: u8 = 100;

/// Configuration for one fetch → parse → filter → write run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchConfig {
    /// File holding the bot token (default: `token.txt`)
    pub token_file: PathBuf,

    /// Channel snowflake to read
    pub channel_id: u64,

    /// JSON output path (default: `discord_dataset.json`)
    pub output_json: PathBuf,

    /// CSV output path (default: `discord_dataset.csv`)
    pub output_csv: PathBuf,

    /// Per-request timeout in seconds (default: 30)
    pub timeout_secs: u64,

    /// Messages per history request, 1..=100 (default: 100)
    pub page_size: u8,

    /// Stop after this many messages (default: no limit)
    pub max_messages: Option<usize>,

    /// API root (default: Discord v10)
    pub api_base: String,

    /// CSV field delimiter (default: `,`)
    pub csv_delimiter: u8,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            token_file: PathBuf::from(DEFAULT_TOKEN_FILE),
            channel_id: DEFAULT_CHANNEL_ID,
            output_json: PathBuf::from(DEFAULT_OUTPUT_JSON),
            output_csv: PathBuf::from(DEFAULT_OUTPUT_CSV),
            timeout_secs: 30,
            page_size: MAX_PAGE_SIZE,
            max_messages: None,
            api_base: DEFAULT_API_BASE.to_string(),
            csv_delimiter: b',',
        }
    }
}

impl FetchConfig {
    /// Creates a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_token_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.token_file = path.into();
        self
    }

    #[must_use]
    pub fn with_channel_id(mut self, channel_id: u64) -> Self {
        self.channel_id = channel_id;
        self
    }

    /// Sets both output paths.
    #[must_use]
    pub fn with_outputs(mut self, json: impl Into<PathBuf>, csv: impl Into<PathBuf>) -> Self {
        self.output_json = json.into();
        self.output_csv = csv.into();
        self
    }

    #[must_use]
    pub fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    #[must_use]
    pub fn with_page_size(mut self, size: u8) -> Self {
        self.page_size = size;
        self
    }

    #[must_use]
    pub fn with_max_messages(mut self, max: usize) -> Self {
        self.max_messages = Some(max);
        self
    }

    /// Points the client at another API root (a mock server in tests).
    #[must_use]
    pub fn with_api_base(mut self, base: impl Into<String>) -> Self {
        self.api_base = base.into();
        self
    }

    #[must_use]
    pub fn with_csv_delimiter(mut self, delimiter: u8) -> Self {
        self.csv_delimiter = delimiter;
        self
    }

    /// Output layout derived from this configuration.
    pub fn output_config(&self) -> OutputConfig {
        OutputConfig::new().with_delimiter(self.csv_delimiter)
    }

    /// Checks value ranges.
    ///
    /// # Errors
    ///
    /// Returns [`CanaryfetchError::InvalidConfig`] for a page size outside
    /// 1..=100, a zero timeout, or identical output paths.
    pub fn validate(&self) -> Result<()> {
        if self.page_size == 0 || self.page_size > MAX_PAGE_SIZE {
            return Err(CanaryfetchError::invalid_config(format!(
                "page size must be between 1 and {MAX_PAGE_SIZE}, got {}",
                self.page_size
            )));
        }
        if self.timeout_secs == 0 {
            return Err(CanaryfetchError::invalid_config("timeout must be positive"));
        }
        if self.output_json == self.output_csv {
            return Err(CanaryfetchError::invalid_config(format!(
                "JSON and CSV outputs both point at {}",
                self.output_json.display()
            )));
        }
        Ok(())
    }
}

/// Reads the bot token from `path`, trimming surrounding whitespace.
///
/// # Errors
///
/// - [`CanaryfetchError::MissingToken`] if the file does not exist
/// - [`CanaryfetchError::EmptyToken`] if it holds only whitespace
/// - [`CanaryfetchError::Io`] for any other read failure
pub fn load_token(path: impl AsRef<Path>) -> Result<String> {
    let path = path.as_ref();
    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            return Err(CanaryfetchError::missing_token(path));
        }
        Err(e) => return Err(e.into()),
    };

    let token = raw.trim();
    if token.is_empty() {
        return Err(CanaryfetchError::EmptyToken {
            path: path.to_path_buf(),
        });
    }
    Ok(token.to_string())
}
