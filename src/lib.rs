//! # canaryfetch
//!
//! Export the records a canary bot posts into a Discord channel.
//!
//! ## Overview
//!
//! Canary bots report every triggered token as a Discord embed with
//! `UserAgent`, `Geo Info` and `Request Headers` fields. canaryfetch reads the
//! whole channel history oldest first, pulls those fields out of each
//! message, keeps the messages that carried geolocation (`ip` and `loc`) and
//! writes the result twice: as a pretty-printed JSON array and as a flat CSV
//! table with `headers.*` columns.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use canaryfetch::prelude::*;
//!
//! # async fn example() -> Result<()> {
//! let config = FetchConfig::new().with_channel_id(1386236984497930312);
//! let summary = run(&config, |event| println!("{event}")).await?;
//! println!("{} records", summary.records());
//! # Ok(())
//! # }
//! ```
//!
//! ## Working Offline
//!
//! The extraction core needs no network:
//!
//! ```rust
//! use canaryfetch::core::{FilterConfig, merge_embeds, to_csv, OutputConfig};
//! use canaryfetch::message::Embed;
//!
//! let record = merge_embeds(&[Embed::new()
//!     .field("Geo Info", r#"`{"ip":"1.2.3.4","loc":"10,20"}`"#)
//!     .field("Request Headers", r#"`{"Host":"example.com"}`"#)]);
//!
//! assert!(FilterConfig::new().matches(&record));
//! let csv = to_csv(&[record], &OutputConfig::new()).unwrap();
//! assert!(csv.starts_with("ip,loc,headers.Host"));
//! ```
//!
//! ## Module Structure
//!
//! - [`message`] - Discord message, embed and field types
//! - [`parsing`] - [`extract_sections`](parsing::extract_sections) for one embed
//! - [`core`] - [`Record`](core::Record), filtering, merging, JSON/CSV output
//! - [`client`] - [`DiscordClient`](client::DiscordClient) REST client
//! - [`history`] - [`ChatPlatform`](history::ChatPlatform) and the oldest-first stream
//! - [`session`] - scoped authenticated [`Session`](session::Session)
//! - [`pipeline`] - [`run`](pipeline::run), the whole fetch → write pass
//! - [`progress`] - [`RunEvent`](progress::RunEvent) milestones
//! - [`config`] - [`FetchConfig`](config::FetchConfig) and token loading
//! - [`cli`] - command-line arguments (feature `cli`)
//! - [`error`] - [`CanaryfetchError`], [`Result`]

#[cfg(feature = "cli")]
pub mod cli;
pub mod client;
pub mod config;
pub mod core;
pub mod error;
pub mod history;
pub mod message;
pub mod parsing;
pub mod pipeline;
pub mod progress;
pub mod session;

// Re-export the main types at the crate root for convenience
pub use error::{CanaryfetchError, Result};
pub use message::ChannelMessage;

/// Convenient re-exports for common usage.
///
/// ```rust
/// use canaryfetch::prelude::*;
/// ```
pub mod prelude {
    pub use crate::ChannelMessage;

    // Error types
    pub use crate::error::{CanaryfetchError, Result};

    // Configuration
    pub use crate::config::{FetchConfig, load_token};

    // Records and processing
    pub use crate::core::{
        Dataset, FilterConfig, OutputConfig, ProcessingStats, Record, accept, apply_filters,
        export, merge_embeds,
    };
    pub use crate::parsing::extract_sections;

    // Platform access
    pub use crate::client::DiscordClient;
    pub use crate::history::{ChatPlatform, history};
    pub use crate::session::Session;

    // Driver
    pub use crate::pipeline::{RunSummary, collect_dataset, run, run_with};
    pub use crate::progress::RunEvent;
}
