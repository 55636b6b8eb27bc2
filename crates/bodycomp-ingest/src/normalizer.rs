//! Row normalization: coercion, validation, dedup, watermark filtering.

use std::path::{Path, PathBuf};
use std::time::Instant;

use chrono::{NaiveDate, NaiveDateTime};
use tracing::{debug, info};

use bodycomp_map::{extract_field, map_row, validate_mandatory};
use bodycomp_model::{MappedValue, MappingSchema, RawRow, RecordSet, TIMESTAMP_FIELD, USER_NAME_FIELD};

use crate::csv_rows::read_csv_rows;
use crate::error::{IngestError, Result};

/// Validated per-run normalization configuration.
#[derive(Debug, Clone)]
pub struct NormalizeOptions {
    /// chrono strftime format for the timestamp column.
    pub date_time_format: String,
    /// Only rows whose mapped `userName` equals this value are considered.
    pub user_filter: Option<String>,
    /// Sort input rows before processing (reporting order only).
    pub sort_rows: bool,
    /// Rows dated strictly before this are already imported.
    pub watermark: Option<NaiveDate>,
}

impl NormalizeOptions {
    /// Build options from the settings values, failing fast on the
    /// configuration holes that would otherwise corrupt a run.
    pub fn new(
        date_time_format: Option<String>,
        filter_by_user: bool,
        user: Option<String>,
        sort_rows: bool,
        watermark: Option<NaiveDate>,
    ) -> Result<Self> {
        let date_time_format = date_time_format.ok_or(IngestError::MissingDateTimeFormat)?;
        let user_filter = if filter_by_user {
            Some(user.filter(|u| !u.is_empty()).ok_or(IngestError::MissingFilterUser)?)
        } else {
            None
        };
        Ok(Self {
            date_time_format,
            user_filter,
            sort_rows,
            watermark,
        })
    }
}

/// Per-file processing counts.
#[derive(Debug, Clone)]
pub struct FileReport {
    pub path: PathBuf,
    pub rows_read: usize,
    pub inserted: usize,
    pub discarded: usize,
}

struct ParsedRow<'a> {
    timestamp: NaiveDateTime,
    row: &'a RawRow,
}

/// Normalize one weight file into the record set.
///
/// Rows are skipped, in order: user-filter mismatch, timestamp date before
/// the watermark, mandatory-field violation, duplicate timestamp. Everything
/// else is inserted. The report counts every non-inserted row as discarded.
pub fn process_weight_file(
    path: &Path,
    schema: &MappingSchema,
    options: &NormalizeOptions,
    records: &mut RecordSet,
) -> Result<FileReport> {
    let start = Instant::now();
    let rows = read_csv_rows(path)?;

    let timestamp_rule = schema
        .rule(TIMESTAMP_FIELD)
        .ok_or(IngestError::MissingTimestampRule)?;

    let mut parsed = Vec::with_capacity(rows.len());
    for (idx, row) in rows.iter().enumerate() {
        let raw = row.get(&timestamp_rule.source_column).ok_or_else(|| {
            IngestError::MissingTimestampColumn {
                path: path.to_path_buf(),
                column: timestamp_rule.source_column.clone(),
            }
        })?;
        let timestamp = NaiveDateTime::parse_from_str(raw, &options.date_time_format).map_err(
            |_| IngestError::TimestampParse {
                path: path.to_path_buf(),
                row: idx + 1,
                value: raw.clone(),
                format: options.date_time_format.clone(),
            },
        )?;
        parsed.push(ParsedRow { timestamp, row });
    }

    if options.sort_rows {
        if options.user_filter.is_some() {
            parsed.sort_by(|a, b| {
                row_user(schema, a.row)
                    .cmp(&row_user(schema, b.row))
                    .then(a.timestamp.cmp(&b.timestamp))
            });
        } else {
            parsed.sort_by_key(|item| item.timestamp);
        }
    }

    let rows_read = parsed.len();
    let mut inserted = 0usize;
    for item in &parsed {
        if let Some(filter) = &options.user_filter {
            let user = extract_field(schema, item.row, USER_NAME_FIELD);
            if user.as_ref().and_then(MappedValue::as_text) != Some(filter.as_str()) {
                continue;
            }
        }
        if let Some(watermark) = options.watermark
            && item.timestamp.date() < watermark
        {
            debug!(timestamp = %item.timestamp, "row predates watermark, skipping");
            continue;
        }
        let mapped = map_row(schema, item.row);
        if let Err(violation) = validate_mandatory(schema, &mapped) {
            debug!(timestamp = %item.timestamp, violation = %violation, "row discarded");
            continue;
        }
        if records.contains(item.timestamp) {
            debug!(timestamp = %item.timestamp, "duplicate timestamp, skipping");
            continue;
        }
        records.insert(mapped.into_record(item.timestamp));
        inserted += 1;
    }

    let discarded = rows_read - inserted;
    info!(
        path = %path.display(),
        rows_read,
        discarded,
        inserted,
        duration_ms = start.elapsed().as_millis(),
        "weight file processed"
    );

    Ok(FileReport {
        path: path.to_path_buf(),
        rows_read,
        inserted,
        discarded,
    })
}

fn row_user(schema: &MappingSchema, row: &RawRow) -> Option<String> {
    extract_field(schema, row, USER_NAME_FIELD)
        .and_then(|value| value.as_text().map(str::to_string))
}
