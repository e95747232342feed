//! Core processing logic for canaryfetch.
//!
//! This module contains:
//! - [`models`] - [`Record`], [`Dataset`] and [`OutputConfig`]
//! - [`filter`] - Record filtering by required keys
//! - [`processor`] - Per-message embed merging and statistics
//! - [`output`] - Format writers (JSON, CSV)
//!
//! # Quick Start
//!
//! ```rust
//! use canaryfetch::core::{FilterConfig, merge_embeds};
//! use canaryfetch::message::Embed;
//!
//! let embeds = vec![
//!     Embed::new().field("Geo Info", r#"{"ip":"1.2.3.4","loc":"10,20"}"#),
//!     Embed::new().field("Request Headers", r#"{"Host":"example.com"}"#),
//! ];
//!
//! let record = merge_embeds(&embeds);
//! assert!(FilterConfig::new().matches(&record));
//! ```

pub mod filter;
pub mod models;
pub mod output;
pub mod processor;

// Re-export main types for convenience
pub use filter::{FilterConfig, accept, apply_filters};
pub use models::{Dataset, OutputConfig, Record};
pub use output::{export, to_csv, to_json, write_csv, write_json};
pub use processor::{ProcessingStats, merge_embeds};
