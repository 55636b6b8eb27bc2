//! Push the accumulated record set to the remote account.

use std::time::Instant;

use chrono::NaiveDate;
use tracing::{debug, info};

use bodycomp_model::RecordSet;

use crate::account::AccountClient;
use crate::error::AccountError;

/// Import behavior flags from the settings document.
#[derive(Debug, Clone, Copy, Default)]
pub struct ImportOptions {
    /// Delete existing remote entries for each date before inserting.
    pub delete_old_data: bool,
}

/// Watermark state carried across the run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportState {
    /// Last imported date; advanced in memory as date groups are entered,
    /// persisted only after the whole run succeeds.
    pub last_date: Option<NaiveDate>,
}

/// Outcome of a completed import.
#[derive(Debug, Clone, Copy)]
pub struct ImportReport {
    pub imported: usize,
    pub dates: usize,
}

/// Push every record, grouped by calendar date in ascending order.
///
/// Entering a new date advances the in-memory watermark before any push for
/// that date succeeds; a failure aborts the run with the watermark already
/// moved, which is why callers must not persist state on error paths.
pub fn import_records(
    client: &mut dyn AccountClient,
    records: &RecordSet,
    options: ImportOptions,
    state: &mut ImportState,
) -> Result<ImportReport, AccountError> {
    let start = Instant::now();
    let mut current_date: Option<NaiveDate> = None;
    let mut imported = 0usize;
    let mut dates = 0usize;

    for record in records {
        let date = record.timestamp.date();
        if current_date != Some(date) {
            current_date = Some(date);
            dates += 1;
            state.last_date = Some(date);
            info!(date = %date, "importing date");

            if options.delete_old_data {
                let existing = client.entries_for_date(date)?;
                if !existing.is_empty() {
                    info!(date = %date, count = existing.len(), "deleting existing weigh-ins");
                    for entry in existing {
                        client.delete_entry(&entry.id, date)?;
                    }
                }
            }
        }

        client.add_composition(record)?;
        debug!(time = %record.timestamp.format("%H:%M:%S"), "composition entry inserted");
        imported += 1;
    }

    info!(
        imported,
        dates,
        duration_ms = start.elapsed().as_millis(),
        "import complete"
    );

    Ok(ImportReport { imported, dates })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::account::WeighIn;
    use bodycomp_model::BodyComposition;
    use chrono::NaiveDateTime;
    use std::collections::BTreeMap;

    #[derive(Default)]
    struct FakeAccount {
        existing: BTreeMap<NaiveDate, Vec<WeighIn>>,
        listed: Vec<NaiveDate>,
        deleted: Vec<(String, NaiveDate)>,
        added: Vec<NaiveDateTime>,
        fail_after_adds: Option<usize>,
    }

    impl AccountClient for FakeAccount {
        fn login(&mut self, _email: &str, _password: &str) -> Result<String, AccountError> {
            Ok("Test User".to_string())
        }

        fn entries_for_date(&mut self, date: NaiveDate) -> Result<Vec<WeighIn>, AccountError> {
            self.listed.push(date);
            Ok(self.existing.get(&date).cloned().unwrap_or_default())
        }

        fn delete_entry(&mut self, id: &str, date: NaiveDate) -> Result<(), AccountError> {
            self.deleted.push((id.to_string(), date));
            Ok(())
        }

        fn add_composition(&mut self, record: &BodyComposition) -> Result<(), AccountError> {
            if let Some(limit) = self.fail_after_adds
                && self.added.len() >= limit
            {
                return Err(AccountError::Remote("server unavailable".to_string()));
            }
            self.added.push(record.timestamp);
            Ok(())
        }
    }

    fn record(day: u32, hour: u32) -> BodyComposition {
        let timestamp = NaiveDate::from_ymd_opt(2024, 1, day)
            .unwrap()
            .and_hms_opt(hour, 0, 0)
            .unwrap();
        BodyComposition::new(timestamp)
    }

    fn records(times: &[(u32, u32)]) -> RecordSet {
        let mut set = RecordSet::new();
        for (day, hour) in times {
            set.insert(record(*day, *hour));
        }
        set
    }

    #[test]
    fn pushes_every_record_and_advances_watermark() {
        let mut client = FakeAccount::default();
        let mut state = ImportState::default();
        let set = records(&[(1, 8), (1, 20), (2, 8)]);

        let report =
            import_records(&mut client, &set, ImportOptions::default(), &mut state).unwrap();

        assert_eq!(report.imported, 3);
        assert_eq!(report.dates, 2);
        assert_eq!(client.added.len(), 3);
        assert_eq!(state.last_date, NaiveDate::from_ymd_opt(2024, 1, 2));
        // without the flag, existing entries are never even listed
        assert!(client.listed.is_empty());
        assert!(client.deleted.is_empty());
    }

    #[test]
    fn delete_old_data_clears_each_date_before_inserting() {
        let mut client = FakeAccount::default();
        client.existing.insert(
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            vec![
                WeighIn {
                    id: "101".to_string(),
                },
                WeighIn {
                    id: "102".to_string(),
                },
            ],
        );
        let mut state = ImportState::default();
        let set = records(&[(1, 8), (1, 20), (2, 8)]);

        let options = ImportOptions {
            delete_old_data: true,
        };
        let report = import_records(&mut client, &set, options, &mut state).unwrap();

        assert_eq!(report.imported, 3);
        // one listing per date, not per record
        assert_eq!(client.listed.len(), 2);
        assert_eq!(
            client.deleted,
            vec![
                ("101".to_string(), NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()),
                ("102".to_string(), NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()),
            ]
        );
    }

    #[test]
    fn failure_leaves_watermark_at_entered_date() {
        let mut client = FakeAccount {
            fail_after_adds: Some(1),
            ..FakeAccount::default()
        };
        let mut state = ImportState {
            last_date: NaiveDate::from_ymd_opt(2023, 12, 31),
        };
        let set = records(&[(1, 8), (2, 8)]);

        let result = import_records(&mut client, &set, ImportOptions::default(), &mut state);

        assert!(matches!(result, Err(AccountError::Remote(_))));
        // the second date group was entered before its push failed
        assert_eq!(state.last_date, NaiveDate::from_ymd_opt(2024, 1, 2));
        assert_eq!(client.added.len(), 1);
    }

    #[test]
    fn empty_record_set_is_a_no_op() {
        let mut client = FakeAccount::default();
        let mut state = ImportState::default();
        let report = import_records(
            &mut client,
            &RecordSet::new(),
            ImportOptions::default(),
            &mut state,
        )
        .unwrap();
        assert_eq!(report.imported, 0);
        assert_eq!(state.last_date, None);
    }
}
