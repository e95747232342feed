//! Output format writers.
//!
//! This module provides writers for the two export formats:
//! - [`write_json`] / [`to_json`] - pretty-printed JSON array of records
//! - [`write_csv`] / [`to_csv`] - flattened CSV table (`headers.Host`, ...)
//!
//! [`export`] writes both, JSON first.
//!
//! # Example
//!
//! ```rust,no_run
//! # fn main() -> canaryfetch::Result<()> {
//! use canaryfetch::core::output::export;
//! use canaryfetch::core::{OutputConfig, Record};
//! use serde_json::json;
//!
//! let mut record = Record::new();
//! record.insert("ip", json!("1.2.3.4"));
//! record.insert("loc", json!("10,20"));
//!
//! export(&[record], "discord_dataset.json", "discord_dataset.csv", &OutputConfig::new())?;
//! # Ok(())
//! # }
//! ```

mod csv_writer;
mod json_writer;

use std::path::Path;

use tracing::debug;

pub use csv_writer::{to_csv, write_csv};
pub use json_writer::{to_json, write_json};

use crate::core::models::{OutputConfig, Record};
use crate::error::Result;

/// Writes the dataset as JSON to `json_path` and as CSV to `csv_path`.
///
/// Both files are overwritten. A failure on either write is returned; a file
/// written before the failure is left in place.
pub fn export(
    records: &[Record],
    json_path: impl AsRef<Path>,
    csv_path: impl AsRef<Path>,
    config: &OutputConfig,
) -> Result<()> {
    let json_path = json_path.as_ref();
    let csv_path = csv_path.as_ref();

    write_json(records, json_path)?;
    debug!(path = %json_path.display(), records = records.len(), "wrote JSON");

    write_csv(records, csv_path, config)?;
    debug!(path = %csv_path.display(), records = records.len(), "wrote CSV");

    Ok(())
}
