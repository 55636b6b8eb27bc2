//! CSV reading into header-keyed rows.

use std::path::Path;

use csv::ReaderBuilder;

use bodycomp_model::RawRow;

use crate::error::{IngestError, Result};

/// Read a CSV file into a vector of row maps.
///
/// Each row is a map keyed by column header. Handles BOM characters and
/// trims whitespace from headers and values.
pub fn read_csv_rows(path: &Path) -> Result<Vec<RawRow>> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)
        .map_err(|source| csv_error(path, source))?;

    let headers = reader
        .headers()
        .map_err(|source| csv_error(path, source))?
        .clone();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|source| csv_error(path, source))?;
        let mut row = RawRow::new();
        for (idx, value) in record.iter().enumerate() {
            let key = headers
                .get(idx)
                .unwrap_or("")
                .trim_matches('\u{feff}')
                .trim()
                .to_string();
            row.insert(key, value.trim().to_string());
        }
        rows.push(row);
    }
    Ok(rows)
}

fn csv_error(path: &Path, source: csv::Error) -> IngestError {
    IngestError::Csv {
        path: path.to_path_buf(),
        source,
    }
}
