//! Command-line interface definition using clap.
//!
//! Every option also reads an environment variable, so a deployment can pin
//! the channel and paths without a wrapper script.
//!
//! ```rust
//! use canaryfetch::cli::Args;
//! use clap::Parser;
//!
//! let args = Args::parse_from(["canaryfetch", "--channel-id", "42"]);
//! let config = args.to_config();
//! assert_eq!(config.channel_id, 42);
//! ```

use std::path::PathBuf;

use clap::Parser;

use crate::config::{
    DEFAULT_API_BASE, DEFAULT_CHANNEL_ID, DEFAULT_OUTPUT_CSV, DEFAULT_OUTPUT_JSON,
    DEFAULT_TOKEN_FILE, FetchConfig, MAX_PAGE_SIZE,
};

/// Export geolocation, header and user-agent records posted by a canary bot
/// into a Discord channel as JSON and CSV.
#[derive(Parser, Debug, Clone)]
#[command(name = "canaryfetch")]
#[command(version, about, long_about = None)]
#[command(after_help = "EXAMPLES:
    canaryfetch
    canaryfetch --channel-id 1386236984497930312 --token-file bot.token
    canaryfetch --json hits.json --csv hits.csv --delimiter ';'
    RUST_LOG=canaryfetch=debug canaryfetch")]
pub struct Args {
    /// File containing the bot token
    #[arg(short, long, env = "CANARYFETCH_TOKEN_FILE", default_value = DEFAULT_TOKEN_FILE)]
    pub token_file: PathBuf,

    /// Channel to export
    #[arg(short, long, env = "CANARYFETCH_CHANNEL_ID", default_value_t = DEFAULT_CHANNEL_ID)]
    pub channel_id: u64,

    /// JSON output path
    #[arg(long, env = "CANARYFETCH_OUTPUT_JSON", default_value = DEFAULT_OUTPUT_JSON)]
    pub json: PathBuf,

    /// CSV output path
    #[arg(long, env = "CANARYFETCH_OUTPUT_CSV", default_value = DEFAULT_OUTPUT_CSV)]
    pub csv: PathBuf,

    /// CSV field delimiter (one ASCII character)
    #[arg(long, default_value_t = ',', value_parser = parse_delimiter)]
    pub delimiter: char,

    /// Per-request timeout in seconds
    #[arg(long, env = "CANARYFETCH_TIMEOUT", default_value_t = 30)]
    pub timeout: u64,

    /// Messages per history request
    #[arg(long, default_value_t = MAX_PAGE_SIZE,
          value_parser = clap::value_parser!(u8).range(1..=i64::from(MAX_PAGE_SIZE)))]
    pub page_size: u8,

    /// Stop after this many messages
    #[arg(long, value_name = "N")]
    pub limit: Option<usize>,

    /// Discord API root
    #[arg(long, env = "CANARYFETCH_API_BASE", default_value = DEFAULT_API_BASE, hide = true)]
    pub api_base: String,
}

impl Args {
    /// Builds the run configuration.
    pub fn to_config(&self) -> FetchConfig {
        let mut config = FetchConfig::new()
            .with_token_file(&self.token_file)
            .with_channel_id(self.channel_id)
            .with_outputs(&self.json, &self.csv)
            .with_timeout_secs(self.timeout)
            .with_page_size(self.page_size)
            .with_api_base(&self.api_base)
            .with_csv_delimiter(u8::try_from(self.delimiter).unwrap_or(b','));
        if let Some(limit) = self.limit {
            config = config.with_max_messages(limit);
        }
        config
    }
}

fn parse_delimiter(s: &str) -> Result<char, String> {
    let mut chars = s.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) if c.is_ascii() => Ok(c),
        _ => Err(format!("delimiter must be a single ASCII character, got '{s}'")),
    }
}
