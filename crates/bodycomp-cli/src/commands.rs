use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use tracing::{info, info_span};

use bodycomp_config::Settings;
use bodycomp_import::{AccountClient, ImportState, MailSource};
use bodycomp_ingest::IngestError;

use crate::pipeline::{fetch, normalize, push};
use crate::types::{ImportOutcome, RunResult};

/// External collaborators injected into a run.
///
/// The mail and account protocol clients are implemented outside this
/// workspace; the shipped binary runs without them (fetch becomes a no-op
/// and an enabled `callAPI` fails fast).
pub struct Collaborators<'a> {
    pub mail: Option<&'a mut dyn MailSource>,
    pub account: Option<&'a mut dyn AccountClient>,
}

impl Collaborators<'_> {
    pub fn none() -> Self {
        Collaborators {
            mail: None,
            account: None,
        }
    }
}

/// Run the whole import: fetch, normalize, push, persist watermark.
pub fn run_import(settings_path: &Path, collaborators: Collaborators<'_>) -> Result<RunResult> {
    let run_span = info_span!("run", settings = %settings_path.display());
    let _run_guard = run_span.enter();
    let run_start = Instant::now();

    let mut settings = Settings::load(settings_path).context("load settings")?;
    let schema = settings.mapping_schema();
    let data = settings.data();
    if let Some(date) = data.last_date {
        info!(last_date = %date, "resuming after last imported date");
    }

    let folder = data
        .weight_files_folder
        .as_deref()
        .filter(|value| !value.is_empty())
        .map(PathBuf::from)
        .ok_or(IngestError::MissingWeightFilesFolder)?;

    let fetch_result = fetch(collaborators.mail, &settings.mailbox(), &folder);

    let normalize_result = normalize(&folder, &data, &schema)?;

    let mut state = ImportState {
        last_date: data.last_date,
    };
    let outcome = push(
        collaborators.account,
        &settings.account(),
        &normalize_result.records,
        &data,
        &mut state,
    )?;

    // Persist the advanced watermark only after every stage has succeeded.
    if !normalize_result.records.is_empty() {
        if let Some(date) = state.last_date {
            settings.set_last_date(date);
        }
        settings.store(settings_path).context("persist settings")?;
    }

    let imported = match outcome {
        ImportOutcome::Imported { records, .. } => records,
        _ => 0,
    };
    info!(
        record_count = normalize_result.records.len(),
        imported,
        duration_ms = run_start.elapsed().as_millis(),
        "run complete"
    );

    Ok(RunResult {
        settings_path: settings_path.to_path_buf(),
        attachments_saved: fetch_result.saved,
        files: normalize_result.files,
        records: normalize_result.records.len(),
        import: outcome,
        last_date: state.last_date,
    })
}
