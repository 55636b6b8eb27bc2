//! Schema-driven extraction over raw rows.

use std::collections::BTreeMap;

use chrono::NaiveDateTime;
use thiserror::Error;

use bodycomp_model::{BodyComposition, METRIC_FIELDS, MappedValue, MappingSchema, RawRow};

use crate::extract::coerce;

/// A row failed validation because a mandatory field has no value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("mandatory field {field} has no value")]
pub struct MandatoryViolation {
    pub field: String,
}

/// Extract one canonical field from a raw row.
///
/// Absent when the schema has no rule for the field, the rule's source
/// column is missing from the row, or coercion fails.
pub fn extract_field(schema: &MappingSchema, row: &RawRow, field: &str) -> Option<MappedValue> {
    let rule = schema.rule(field)?;
    let raw = row.get(&rule.source_column)?;
    coerce(rule.rule_type, raw)
}

/// Metric values extracted from one raw row.
#[derive(Debug, Clone, Default)]
pub struct MappedRow {
    values: BTreeMap<String, MappedValue>,
}

impl MappedRow {
    pub fn value(&self, field: &str) -> Option<&MappedValue> {
        self.values.get(field)
    }

    /// Assemble the canonical record, parsing text values into metrics
    /// where possible.
    pub fn into_record(self, timestamp: NaiveDateTime) -> BodyComposition {
        let mut record = BodyComposition::new(timestamp);
        for (field, value) in &self.values {
            record.set_metric(field, value.as_number());
        }
        record
    }
}

/// Extract every canonical metric field from a raw row.
pub fn map_row(schema: &MappingSchema, row: &RawRow) -> MappedRow {
    let mut mapped = MappedRow::default();
    for field in METRIC_FIELDS {
        if let Some(value) = extract_field(schema, row, field) {
            mapped.values.insert(field.to_string(), value);
        }
    }
    mapped
}

/// A row is valid iff every mandatory field has a present value.
///
/// Fields are checked in canonical order and the first violation wins.
pub fn validate_mandatory(
    schema: &MappingSchema,
    mapped: &MappedRow,
) -> Result<(), MandatoryViolation> {
    for field in METRIC_FIELDS {
        let mandatory = schema.rule(field).is_some_and(|rule| rule.mandatory);
        if !mandatory {
            continue;
        }
        let present = mapped.value(field).is_some_and(MappedValue::is_present);
        if !present {
            return Err(MandatoryViolation {
                field: field.to_string(),
            });
        }
    }
    Ok(())
}
