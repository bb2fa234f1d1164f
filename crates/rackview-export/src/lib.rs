//! Spreadsheet export of server records.
//!
//! Serializes a record slice restricted to the visible columns. Two
//! contracts are fixed: column headers are the camelCase field names in
//! Title Case, and every data cell is wrapped in quotes with internal
//! quotes doubled.

use rackview_model::{FieldKey, Server};
use thiserror::Error;

/// Output format of an export.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExportFormat {
    #[default]
    Csv,
    /// Excel-flavored export. Encodes the same CSV stream, which
    /// spreadsheet applications open in place; there is no native
    /// workbook writer in the stack.
    Xlsx,
}

/// Export serialization failure.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("failed to encode export")]
    Encode(#[from] csv::Error),
    #[error("failed to flush export buffer")]
    Io(#[from] std::io::Error),
}

/// Serialize `records` to a byte stream, one row per record, one
/// column per visible field, in the given order.
pub fn export_records(
    records: &[Server],
    visible_fields: &[FieldKey],
    format: ExportFormat,
) -> Result<Vec<u8>, ExportError> {
    match format {
        ExportFormat::Csv | ExportFormat::Xlsx => write_csv(records, visible_fields),
    }
}

/// Transform a camelCase field name into a Title Case column header
/// (`"serverName"` -> `"Server Name"`).
pub fn title_case_header(name: &str) -> String {
    let mut header = String::with_capacity(name.len() + 4);
    for (index, ch) in name.chars().enumerate() {
        if index == 0 {
            header.extend(ch.to_uppercase());
        } else {
            if ch.is_uppercase() {
                header.push(' ');
            }
            header.push(ch);
        }
    }
    header
}

fn write_csv(records: &[Server], visible_fields: &[FieldKey]) -> Result<Vec<u8>, ExportError> {
    let mut buffer = Vec::new();

    // Header row is written plain; data cells are always quoted.
    {
        let mut header_writer = csv::Writer::from_writer(&mut buffer);
        let headers: Vec<String> = visible_fields
            .iter()
            .map(|field| title_case_header(field.as_str()))
            .collect();
        header_writer.write_record(&headers)?;
        header_writer.flush()?;
    }

    let mut writer = csv::WriterBuilder::new()
        .quote_style(csv::QuoteStyle::Always)
        .from_writer(&mut buffer);
    for server in records {
        let row: Vec<String> = visible_fields
            .iter()
            .map(|field| field.value(server).into_text().into_owned())
            .collect();
        writer.write_record(&row)?;
    }
    writer.flush()?;
    drop(writer);

    Ok(buffer)
}
