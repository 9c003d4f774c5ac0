//! Row and table types plus CSV parsing

use crate::error::Result;
use indexmap::IndexMap;

/// A single record: column name to raw text value, in header order.
///
/// Rows may be sparse; a column absent from a row is distinct from a column
/// holding an empty string.
pub type Row = IndexMap<String, String>;

/// Rows in source order.
pub type Table = Vec<Row>;

const UTF8_BOM: char = '\u{feff}';

/// Parse CSV content using the first record as column names.
///
/// Blank lines are skipped. A record whose field count differs from the
/// header is a parse error.
pub fn parse_csv(content: &[u8]) -> Result<Table> {
    let text = String::from_utf8_lossy(content);
    let text = text.trim_start_matches(UTF8_BOM);

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(text.as_bytes());

    let headers = reader.headers()?.clone();
    let mut table = Table::new();

    for record in reader.records() {
        let record = record?;
        let row: Row = headers
            .iter()
            .zip(record.iter())
            .map(|(name, value)| (name.to_string(), value.to_string()))
            .collect();
        table.push(row);
    }

    log::debug!("Parsed {} rows with {} columns", table.len(), headers.len());
    Ok(table)
}

/// Build a row from `(column, value)` pairs.
pub fn row<'a>(fields: impl IntoIterator<Item = (&'a str, &'a str)>) -> Row {
    fields
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}
