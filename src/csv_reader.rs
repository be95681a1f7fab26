use std::io::Read;

use crate::data::{Record, Value};
use crate::error::InputError;

/// Read CSV with a header row into records.
///
/// Every cell stays text; the classifier decides what is numeric or a date.
/// Empty cells become null so they count as missing.
pub fn read_csv<R: Read>(reader: R) -> Result<Vec<Record>, InputError> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let headers: Vec<String> = rdr.headers()?.iter().map(|h| h.trim().to_string()).collect();

    let mut rows = Vec::new();
    for result in rdr.records() {
        let record = result?;
        if record.len() > headers.len() {
            tracing::warn!(
                line = record.position().map(|p| p.line()),
                extra = record.len() - headers.len(),
                "cells past the header row ignored"
            );
        }
        let row: Record = headers
            .iter()
            .zip(record.iter())
            .map(|(name, cell)| {
                let value = if cell.is_empty() {
                    Value::Null
                } else {
                    Value::Text(cell.to_string())
                };
                (name.clone(), value)
            })
            .collect();
        rows.push(row);
    }

    tracing::debug!(rows = rows.len(), columns = headers.len(), "csv read");
    Ok(rows)
}
