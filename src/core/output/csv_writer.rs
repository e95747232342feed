//! CSV output writer.

use std::collections::HashMap;
use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use serde_json::Value;

use crate::core::models::{OutputConfig, Record};
use crate::error::{CanaryfetchError, Result};

/// Writes records to CSV, one row per record.
///
/// # Format
/// - Delimiter: `OutputConfig::delimiter` (default `,`)
/// - Columns: union of all flattened keys, in order of first appearance;
///   nested mappings become dotted names such as `headers.Host`
/// - Missing values: empty cell
/// - Header row included, no index column
/// - Encoding: UTF-8
///
/// An empty dataset produces an empty file.
pub fn write_csv(
    records: &[Record],
    output_path: impl AsRef<Path>,
    config: &OutputConfig,
) -> Result<()> {
    let file = File::create(output_path)?;
    write_records(records, file, config)?;
    Ok(())
}

/// Converts records to the same CSV text `write_csv` produces.
pub fn to_csv(records: &[Record], config: &OutputConfig) -> Result<String> {
    let buffer = write_records(records, Vec::new(), config)?;
    String::from_utf8(buffer)
        .map_err(|e| CanaryfetchError::Io(io::Error::new(io::ErrorKind::InvalidData, e)))
}

fn write_records<W: Write>(records: &[Record], sink: W, config: &OutputConfig) -> Result<W> {
    let flattened: Vec<Vec<(String, &Value)>> = records
        .iter()
        .map(|r| r.flatten(&config.separator))
        .collect();

    let (columns, index) = build_header(&flattened);

    let mut writer = csv::WriterBuilder::new()
        .delimiter(config.delimiter)
        .from_writer(sink);

    if !columns.is_empty() {
        writer.write_record(&columns)?;

        for row in &flattened {
            let mut cells = vec![String::new(); columns.len()];
            for (column, value) in row {
                cells[index[column]] = render_cell(value);
            }
            writer.write_record(&cells)?;
        }
    }

    writer.flush()?;
    writer.into_inner().map_err(|e| e.into_error().into())
}

/// Collects column names in order of first appearance.
fn build_header(rows: &[Vec<(String, &Value)>]) -> (Vec<String>, HashMap<String, usize>) {
    let mut columns = Vec::new();
    let mut index = HashMap::new();

    for row in rows {
        for (column, _) in row {
            if !index.contains_key(column) {
                index.insert(column.clone(), columns.len());
                columns.push(column.clone());
            }
        }
    }

    (columns, index)
}

/// Renders a scalar for a CSV cell.
fn render_cell(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        // Arrays (and objects, which flattening never leaves behind) as compact JSON
        other => other.to_string(),
    }
}
