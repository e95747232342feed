//! Parsing of platform payloads into records.
//!
//! - [`embed`] - field extraction from canary bot embeds

pub mod embed;

pub use embed::{Extraction, FieldKind, extract_sections, parse_embed, parse_json_field};
