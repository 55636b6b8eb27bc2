//! Import pipeline with explicit stages.
//!
//! The pipeline follows these stages in order:
//! 1. **Fetch**: download CSV attachments from unread mail
//! 2. **Normalize**: read each weight file into the record set
//! 3. **Push**: send new records to the remote account
//!
//! Each stage takes the output of the previous stage and returns typed
//! results; the settings write-back happens in the command layer after every
//! stage has succeeded.

use std::path::Path;
use std::time::Instant;

use anyhow::{Result, anyhow};
use tracing::{info, info_span};

use bodycomp_config::{AccountSettings, DataSettings, MailboxSettings};
use bodycomp_import::{
    AccountClient, AccountError, ImportOptions, ImportState, MailSource, download_attachments,
    import_records,
};
use bodycomp_ingest::{FileReport, NormalizeOptions, list_weight_files, process_weight_file};
use bodycomp_model::{MappingSchema, RecordSet};

use crate::types::ImportOutcome;

/// Result of the fetch stage.
#[derive(Debug)]
pub struct FetchResult {
    /// Attachment files written into the weight-files folder.
    pub saved: usize,
}

/// Download attachments from unread mail into the weight-files folder.
///
/// Without a mail transport the stage is a no-op: whatever is already in the
/// folder gets processed.
pub fn fetch(
    mail: Option<&mut dyn MailSource>,
    mailbox: &MailboxSettings,
    folder: &Path,
) -> FetchResult {
    let fetch_span = info_span!("fetch", folder = %folder.display());
    let _fetch_guard = fetch_span.enter();
    match mail {
        Some(source) => {
            let saved = download_attachments(source, folder);
            FetchResult { saved }
        }
        None => {
            if mailbox.host.is_some() {
                info!(
                    "imap host is configured but no mail transport is compiled into this \
                     binary; processing files already in the folder"
                );
            }
            FetchResult { saved: 0 }
        }
    }
}

/// Result of the normalize stage.
#[derive(Debug)]
pub struct NormalizeResult {
    /// Per-file counts, in processing order.
    pub files: Vec<FileReport>,
    /// The accumulated record set.
    pub records: RecordSet,
}

/// Read every matching weight file into a fresh record set.
pub fn normalize(
    folder: &Path,
    data: &DataSettings,
    schema: &MappingSchema,
) -> Result<NormalizeResult> {
    let normalize_span = info_span!("normalize", folder = %folder.display());
    let _normalize_guard = normalize_span.enter();
    let start = Instant::now();

    let options = NormalizeOptions::new(
        data.date_time_format.clone(),
        data.filter_by_user,
        data.user.clone(),
        data.sort_data,
        data.last_date,
    )?;
    let paths = list_weight_files(folder, &data.file_mask)?;
    info!(
        mask = %data.file_mask,
        file_count = paths.len(),
        "processing weight files"
    );

    let mut records = RecordSet::new();
    let mut files = Vec::with_capacity(paths.len());
    for path in &paths {
        files.push(process_weight_file(path, schema, &options, &mut records)?);
    }

    info!(
        file_count = files.len(),
        record_count = records.len(),
        duration_ms = start.elapsed().as_millis(),
        "normalization complete"
    );

    Ok(NormalizeResult { files, records })
}

/// Push the record set to the remote account.
///
/// Skipped entirely — zero remote calls, watermark untouched — when the
/// record set is empty or `callAPI` is disabled.
pub fn push(
    account: Option<&mut dyn AccountClient>,
    credentials: &AccountSettings,
    records: &RecordSet,
    data: &DataSettings,
    state: &mut ImportState,
) -> Result<ImportOutcome> {
    let push_span = info_span!("push");
    let _push_guard = push_span.enter();

    if records.is_empty() {
        info!("no records to import");
        return Ok(ImportOutcome::NoRecords);
    }
    if !data.call_api {
        info!("callAPI is disabled, skipping remote import");
        return Ok(ImportOutcome::CallApiDisabled);
    }

    let client = account.ok_or_else(|| {
        anyhow!("callAPI is enabled but no account client is available in this build")
    })?;

    let email = credentials
        .email
        .as_deref()
        .filter(|value| !value.is_empty())
        .ok_or(AccountError::MissingCredentials)?;
    let password = credentials
        .password
        .as_deref()
        .filter(|value| !value.is_empty())
        .ok_or(AccountError::MissingCredentials)?;

    info!(account = %email, "logging in to remote account");
    let display_name = client.login(email, password)?;
    info!(account_name = %display_name, "logged in");

    let options = ImportOptions {
        delete_old_data: data.delete_old_data,
    };
    let report = import_records(client, records, options, state)?;

    Ok(ImportOutcome::Imported {
        records: report.imported,
        dates: report.dates,
    })
}
