//! JSON output writer.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::core::models::Record;
use crate::error::Result;

/// Writes records to a JSON file as a pretty-printed array.
///
/// # Format
/// ```json
/// [
///   {
///     "ip": "1.2.3.4",
///     "loc": "10,20",
///     "headers": {
///       "Host": "example.com"
///     }
///   }
/// ]
/// ```
///
/// Two-space indentation, keys in record order, non-ASCII text written as-is.
/// An existing file is overwritten.
pub fn write_json(records: &[Record], output_path: impl AsRef<Path>) -> Result<()> {
    let file = File::create(output_path)?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, records)?;
    writer.flush()?;
    Ok(())
}

/// Converts records to the same JSON text `write_json` produces.
pub fn to_json(records: &[Record]) -> Result<String> {
    Ok(serde_json::to_string_pretty(records)?)
}
