//! Canonical body-composition record shape.
//!
//! Source CSVs name their columns freely; the mapping schema translates them
//! into the fixed set of canonical fields below. The `timestamp` is the
//! unique key of a record, every metric is optional unless the schema marks
//! it mandatory.

use chrono::NaiveDateTime;

/// Canonical field name of the record key.
pub const TIMESTAMP_FIELD: &str = "timestamp";

/// Canonical field name used only for user filtering, not stored on records.
pub const USER_NAME_FIELD: &str = "userName";

/// Canonical metric field names, in output order.
pub const METRIC_FIELDS: [&str; 12] = [
    "weight",
    "percent_fat",
    "percent_hydration",
    "visceral_fat_mass",
    "bone_mass",
    "muscle_mass",
    "basal_met",
    "active_met",
    "physique_rating",
    "metabolic_age",
    "visceral_fat_rating",
    "bmi",
];

/// One normalized body-composition measurement.
#[derive(Debug, Clone, PartialEq)]
pub struct BodyComposition {
    /// Measurement date and time; unique key within a record set.
    pub timestamp: NaiveDateTime,
    pub weight: Option<f64>,
    pub percent_fat: Option<f64>,
    pub percent_hydration: Option<f64>,
    pub visceral_fat_mass: Option<f64>,
    pub bone_mass: Option<f64>,
    pub muscle_mass: Option<f64>,
    pub basal_met: Option<f64>,
    pub active_met: Option<f64>,
    pub physique_rating: Option<f64>,
    pub metabolic_age: Option<f64>,
    pub visceral_fat_rating: Option<f64>,
    pub bmi: Option<f64>,
}

impl BodyComposition {
    /// Create an empty record for the given timestamp.
    pub fn new(timestamp: NaiveDateTime) -> Self {
        Self {
            timestamp,
            weight: None,
            percent_fat: None,
            percent_hydration: None,
            visceral_fat_mass: None,
            bone_mass: None,
            muscle_mass: None,
            basal_met: None,
            active_met: None,
            physique_rating: None,
            metabolic_age: None,
            visceral_fat_rating: None,
            bmi: None,
        }
    }

    /// Look up a metric by canonical field name.
    ///
    /// Returns `None` both for an unset metric and for a name outside
    /// [`METRIC_FIELDS`].
    pub fn metric(&self, field: &str) -> Option<f64> {
        match field {
            "weight" => self.weight,
            "percent_fat" => self.percent_fat,
            "percent_hydration" => self.percent_hydration,
            "visceral_fat_mass" => self.visceral_fat_mass,
            "bone_mass" => self.bone_mass,
            "muscle_mass" => self.muscle_mass,
            "basal_met" => self.basal_met,
            "active_met" => self.active_met,
            "physique_rating" => self.physique_rating,
            "metabolic_age" => self.metabolic_age,
            "visceral_fat_rating" => self.visceral_fat_rating,
            "bmi" => self.bmi,
            _ => None,
        }
    }

    /// Set a metric by canonical field name; names outside
    /// [`METRIC_FIELDS`] are ignored.
    pub fn set_metric(&mut self, field: &str, value: Option<f64>) {
        match field {
            "weight" => self.weight = value,
            "percent_fat" => self.percent_fat = value,
            "percent_hydration" => self.percent_hydration = value,
            "visceral_fat_mass" => self.visceral_fat_mass = value,
            "bone_mass" => self.bone_mass = value,
            "muscle_mass" => self.muscle_mass = value,
            "basal_met" => self.basal_met = value,
            "active_met" => self.active_met = value,
            "physique_rating" => self.physique_rating = value,
            "metabolic_age" => self.metabolic_age = value,
            "visceral_fat_rating" => self.visceral_fat_rating = value,
            "bmi" => self.bmi = value,
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn ts() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_opt(8, 0, 0)
            .unwrap()
    }

    #[test]
    fn metric_roundtrip_by_name() {
        let mut record = BodyComposition::new(ts());
        for field in METRIC_FIELDS {
            assert_eq!(record.metric(field), None);
            record.set_metric(field, Some(1.5));
            assert_eq!(record.metric(field), Some(1.5));
        }
    }

    #[test]
    fn unknown_field_is_ignored() {
        let mut record = BodyComposition::new(ts());
        record.set_metric("userName", Some(1.0));
        assert_eq!(record.metric("userName"), None);
        assert_eq!(record, BodyComposition::new(ts()));
    }
}
