//! Settings document handling.
//!
//! The whole JSON document is kept in memory as a raw `serde_json::Value` so
//! that keys this tool does not understand survive the load/store
//! round-trip. Lookups are tolerant: an absent key, a wrong type, or any
//! other read problem yields the caller's default instead of an error.

use std::fs;
use std::path::Path;

use chrono::NaiveDate;
use serde_json::Value;
use tracing::debug;

use bodycomp_model::{MappingRule, MappingSchema, RuleType};

use crate::error::{ConfigError, Result};

/// File mask applied when `data.fileMask` is not configured.
pub const DEFAULT_FILE_MASK: &str = "*.csv";

const DATE_FORMAT: &str = "%Y-%m-%d";

/// In-memory settings document.
#[derive(Debug, Clone)]
pub struct Settings {
    document: Value,
}

/// Typed view of the `imap` section, for mail-source implementors.
#[derive(Debug, Clone, Default)]
pub struct MailboxSettings {
    pub host: Option<String>,
    pub user_name: Option<String>,
    pub password: Option<String>,
    pub folder: Option<String>,
}

/// Typed view of the `garmin` section.
#[derive(Debug, Clone, Default)]
pub struct AccountSettings {
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Typed view of the `data` section.
#[derive(Debug, Clone)]
pub struct DataSettings {
    pub weight_files_folder: Option<String>,
    pub file_mask: String,
    pub date_time_format: Option<String>,
    pub filter_by_user: bool,
    pub user: Option<String>,
    pub sort_data: bool,
    pub call_api: bool,
    pub delete_old_data: bool,
    /// Watermark: last successfully imported date.
    pub last_date: Option<NaiveDate>,
}

impl Settings {
    /// Read and parse the settings document.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let document = serde_json::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self { document })
    }

    /// Serialize the document back to `path`, pretty-printed.
    pub fn store(&self, path: &Path) -> Result<()> {
        let contents = serde_json::to_string_pretty(&self.document)?;
        fs::write(path, contents).map_err(|source| ConfigError::Write {
            path: path.to_path_buf(),
            source,
        })
    }

    fn value(&self, section: &str, key: &str) -> Option<&Value> {
        self.document.get(section)?.get(key)
    }

    /// String lookup; absent keys and non-string values yield `None`.
    pub fn str_value(&self, section: &str, key: &str) -> Option<String> {
        self.value(section, key)
            .and_then(Value::as_str)
            .map(str::to_string)
    }

    /// Boolean lookup with default fallback.
    ///
    /// Accepts JSON booleans as well as the `"True"`/`"False"` strings the
    /// original settings files use.
    pub fn bool_value(&self, section: &str, key: &str, default: bool) -> bool {
        match self.value(section, key) {
            Some(Value::Bool(flag)) => *flag,
            Some(Value::String(text)) => text.eq_ignore_ascii_case("true"),
            _ => default,
        }
    }

    pub fn mailbox(&self) -> MailboxSettings {
        MailboxSettings {
            host: self.str_value("imap", "host"),
            user_name: self.str_value("imap", "userName"),
            password: self.str_value("imap", "password"),
            folder: self.str_value("imap", "folder"),
        }
    }

    pub fn account(&self) -> AccountSettings {
        AccountSettings {
            email: self.str_value("garmin", "email"),
            password: self.str_value("garmin", "password"),
        }
    }

    pub fn data(&self) -> DataSettings {
        let last_date = self.str_value("data", "lastDate").and_then(|raw| {
            let parsed = NaiveDate::parse_from_str(&raw, DATE_FORMAT).ok();
            if parsed.is_none() {
                debug!(value = %raw, "ignoring unparsable lastDate");
            }
            parsed
        });
        DataSettings {
            weight_files_folder: self.str_value("data", "weightFilesFolder"),
            file_mask: self
                .str_value("data", "fileMask")
                .unwrap_or_else(|| DEFAULT_FILE_MASK.to_string()),
            date_time_format: self.str_value("data", "dateTimeFormat"),
            filter_by_user: self.bool_value("data", "filterByUser", false),
            user: self.str_value("data", "user"),
            sort_data: self.bool_value("data", "sortData", false),
            call_api: self.bool_value("data", "callAPI", false),
            delete_old_data: self.bool_value("data", "deleteOldData", false),
            last_date,
        }
    }

    /// Build the mapping schema from `data.Mapping`.
    ///
    /// Entries without a source column name are dropped (they could never
    /// match a row); a missing `type` falls back to a plain value parse.
    pub fn mapping_schema(&self) -> MappingSchema {
        let mut schema = MappingSchema::new();
        let Some(mapping) = self
            .document
            .get("data")
            .and_then(|data| data.get("Mapping"))
            .and_then(Value::as_object)
        else {
            return schema;
        };
        for (field, entry) in mapping {
            let Some(source_column) = entry.get("name").and_then(Value::as_str) else {
                debug!(field = %field, "mapping entry has no source column, skipping");
                continue;
            };
            let rule_type = entry
                .get("type")
                .and_then(Value::as_str)
                .map(RuleType::parse)
                .unwrap_or_default();
            let mandatory = match entry.get("mandatory") {
                Some(Value::Bool(flag)) => *flag,
                Some(Value::String(text)) => text.eq_ignore_ascii_case("true"),
                _ => false,
            };
            schema.insert(
                field.clone(),
                MappingRule {
                    source_column: source_column.to_string(),
                    rule_type,
                    mandatory,
                },
            );
        }
        schema
    }

    /// Advance the persisted watermark in the in-memory document.
    pub fn set_last_date(&mut self, date: NaiveDate) {
        if let Some(section) = self.document.get_mut("data").and_then(Value::as_object_mut) {
            section.insert(
                "lastDate".to_string(),
                Value::String(date.format(DATE_FORMAT).to_string()),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn make_settings(document: Value) -> Settings {
        Settings { document }
    }

    #[test]
    fn lookups_fall_back_on_missing_and_wrong_types() {
        let settings = make_settings(json!({
            "data": {
                "sortData": "True",
                "callAPI": false,
                "deleteOldData": 42,
                "fileMask": ["*.csv"]
            }
        }));
        assert!(settings.bool_value("data", "sortData", false));
        assert!(!settings.bool_value("data", "callAPI", true));
        assert!(settings.bool_value("data", "deleteOldData", true));
        assert!(!settings.bool_value("missing", "key", false));
        assert_eq!(settings.str_value("data", "fileMask"), None);
        assert_eq!(settings.data().file_mask, DEFAULT_FILE_MASK);
    }

    #[test]
    fn data_view_parses_last_date() {
        let settings = make_settings(json!({"data": {"lastDate": "2024-03-01"}}));
        assert_eq!(
            settings.data().last_date,
            NaiveDate::from_ymd_opt(2024, 3, 1)
        );

        let settings = make_settings(json!({"data": {"lastDate": "yesterday"}}));
        assert_eq!(settings.data().last_date, None);
    }

    #[test]
    fn mapping_schema_from_document() {
        let settings = make_settings(json!({
            "data": {
                "Mapping": {
                    "timestamp": {"name": "Date/Time", "mandatory": "True"},
                    "weight": {"name": "Weight", "type": "weight", "mandatory": true},
                    "bmi": {"name": "BMI", "type": "mystery"},
                    "broken": {"type": "value"}
                }
            }
        }));
        let schema = settings.mapping_schema();
        assert_eq!(schema.len(), 3);
        let timestamp = schema.rule("timestamp").unwrap();
        assert_eq!(timestamp.source_column, "Date/Time");
        assert_eq!(timestamp.rule_type, RuleType::Value);
        assert!(timestamp.mandatory);
        assert_eq!(schema.rule("weight").unwrap().rule_type, RuleType::Weight);
        assert_eq!(schema.rule("bmi").unwrap().rule_type, RuleType::Raw);
        assert!(!schema.rule("bmi").unwrap().mandatory);
        assert!(schema.rule("broken").is_none());
    }

    #[test]
    fn store_round_trip_preserves_unknown_keys_and_updates_watermark() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(
            &path,
            r#"{"data": {"lastDate": "2024-01-01"}, "custom": {"keep": "me"}}"#,
        )
        .unwrap();

        let mut settings = Settings::load(&path).unwrap();
        settings.set_last_date(NaiveDate::from_ymd_opt(2024, 2, 2).unwrap());
        settings.store(&path).unwrap();

        let reloaded = Settings::load(&path).unwrap();
        assert_eq!(
            reloaded.data().last_date,
            NaiveDate::from_ymd_opt(2024, 2, 2)
        );
        assert_eq!(
            reloaded.str_value("custom", "keep"),
            Some("me".to_string())
        );
    }

    #[test]
    fn load_reports_parse_failures() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, "{not json").unwrap();
        assert!(matches!(
            Settings::load(&path),
            Err(ConfigError::Parse { .. })
        ));
        assert!(matches!(
            Settings::load(&dir.path().join("absent.json")),
            Err(ConfigError::Read { .. })
        ));
    }
}
