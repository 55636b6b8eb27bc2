//! Mail collaborator interface and attachment extraction.
//!
//! The mailbox protocol client (IMAP or whatever else delivers the scale
//! exports) lives outside this crate; transports implement [`MailSource`].
//! Everything after the fetch — MIME walking, attachment decoding, writing
//! files into the weight-files folder — is handled here.

use std::fs;
use std::path::{Path, PathBuf};

use mailparse::{ParsedMail, parse_mail};
use tracing::{debug, info, warn};

use crate::error::MailError;

/// One fetched message, as raw RFC 822 bytes.
#[derive(Debug, Clone)]
pub struct MailMessage {
    pub raw: Vec<u8>,
}

impl MailMessage {
    pub fn new(raw: impl Into<Vec<u8>>) -> Self {
        Self { raw: raw.into() }
    }
}

/// Mailbox access as the pipeline needs it.
///
/// Implementations connect with the `imap` settings section
/// (host, user name, password, folder).
pub trait MailSource {
    /// Unread messages; fetching marks them read on the backing store.
    fn fetch_unread(&mut self) -> Result<Vec<MailMessage>, MailError>;

    /// Release the underlying mailbox session.
    fn close(&mut self) -> Result<(), MailError>;
}

/// Save a message's attachments into `folder`.
///
/// Only MIME leaves carrying an attachment filename are written; multipart
/// containers and body parts are skipped. Files that already exist are left
/// untouched. Returns the paths written.
pub fn save_attachments(message: &MailMessage, folder: &Path) -> Result<Vec<PathBuf>, MailError> {
    let mail = parse_mail(&message.raw)?;
    let mut saved = Vec::new();
    save_parts(&mail, folder, &mut saved)?;
    Ok(saved)
}

fn save_parts(
    part: &ParsedMail<'_>,
    folder: &Path,
    saved: &mut Vec<PathBuf>,
) -> Result<(), MailError> {
    if !part.subparts.is_empty() {
        for sub in &part.subparts {
            save_parts(sub, folder, saved)?;
        }
        return Ok(());
    }

    let Some(filename) = attachment_filename(part) else {
        return Ok(());
    };
    // Flatten to the final path component; attachment names are untrusted.
    let Some(name) = Path::new(&filename).file_name() else {
        return Ok(());
    };
    let path = folder.join(name);
    if path.is_file() {
        debug!(path = %path.display(), "attachment already downloaded, skipping");
        return Ok(());
    }

    let payload = part.get_body_raw()?;
    fs::write(&path, payload).map_err(|source| MailError::Save {
        path: path.clone(),
        source,
    })?;
    info!(path = %path.display(), "attachment saved");
    saved.push(path);
    Ok(())
}

fn attachment_filename(part: &ParsedMail<'_>) -> Option<String> {
    let disposition = part.get_content_disposition();
    if let Some(name) = disposition.params.get("filename") {
        return Some(name.clone());
    }
    part.ctype.params.get("name").cloned()
}

/// Fetch unread messages and save their attachments into `folder`.
///
/// Best-effort: a message that cannot be parsed or saved is logged and
/// skipped; already-saved attachments are not rolled back. Returns the
/// number of files written.
pub fn download_attachments(source: &mut dyn MailSource, folder: &Path) -> usize {
    let messages = match source.fetch_unread() {
        Ok(messages) => messages,
        Err(error) => {
            warn!(error = %error, "failed to fetch unread messages");
            return 0;
        }
    };

    let mut saved = 0usize;
    for message in &messages {
        match save_attachments(message, folder) {
            Ok(paths) => saved += paths.len(),
            Err(error) => {
                warn!(error = %error, "failed to save attachments, skipping message");
            }
        }
    }

    if let Err(error) = source.close() {
        warn!(error = %error, "failed to close mailbox");
    }

    info!(messages = messages.len(), saved, "attachment download finished");
    saved
}

#[cfg(test)]
mod tests {
    use super::*;

    const CSV_BODY: &str = "Date/Time,Weight\r\n2024-01-01 08:00:00,70.5\r\n";

    fn message_with_attachment(filename: &str) -> MailMessage {
        let raw = format!(
            "From: scale@example.com\r\n\
             To: inbox@example.com\r\n\
             Subject: weight export\r\n\
             MIME-Version: 1.0\r\n\
             Content-Type: multipart/mixed; boundary=\"sep\"\r\n\
             \r\n\
             --sep\r\n\
             Content-Type: text/plain\r\n\
             \r\n\
             see attachment\r\n\
             --sep\r\n\
             Content-Type: text/csv; name=\"{filename}\"\r\n\
             Content-Disposition: attachment; filename=\"{filename}\"\r\n\
             Content-Transfer-Encoding: 7bit\r\n\
             \r\n\
             {CSV_BODY}\
             --sep--\r\n"
        );
        MailMessage::new(raw)
    }

    struct FakeSource {
        messages: Vec<MailMessage>,
        closed: bool,
    }

    impl MailSource for FakeSource {
        fn fetch_unread(&mut self) -> Result<Vec<MailMessage>, MailError> {
            Ok(std::mem::take(&mut self.messages))
        }

        fn close(&mut self) -> Result<(), MailError> {
            self.closed = true;
            Ok(())
        }
    }

    struct BrokenSource;

    impl MailSource for BrokenSource {
        fn fetch_unread(&mut self) -> Result<Vec<MailMessage>, MailError> {
            Err(MailError::Mailbox("connection reset".to_string()))
        }

        fn close(&mut self) -> Result<(), MailError> {
            Ok(())
        }
    }

    #[test]
    fn saves_attachment_parts_only() {
        let dir = tempfile::tempdir().unwrap();
        let saved =
            save_attachments(&message_with_attachment("scale.csv"), dir.path()).unwrap();

        assert_eq!(saved.len(), 1);
        assert_eq!(saved[0], dir.path().join("scale.csv"));
        let contents = fs::read_to_string(&saved[0]).unwrap();
        assert!(contents.contains("70.5"));
        // the text/plain body part must not land on disk
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn existing_files_are_not_overwritten() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scale.csv");
        fs::write(&path, "already here").unwrap();

        let saved =
            save_attachments(&message_with_attachment("scale.csv"), dir.path()).unwrap();

        assert!(saved.is_empty());
        assert_eq!(fs::read_to_string(&path).unwrap(), "already here");
    }

    #[test]
    fn attachment_names_are_flattened() {
        let dir = tempfile::tempdir().unwrap();
        let saved =
            save_attachments(&message_with_attachment("../../escape.csv"), dir.path()).unwrap();

        assert_eq!(saved.len(), 1);
        assert_eq!(saved[0], dir.path().join("escape.csv"));
    }

    #[test]
    fn download_is_best_effort() {
        let dir = tempfile::tempdir().unwrap();
        let mut source = FakeSource {
            messages: vec![
                message_with_attachment("a.csv"),
                // no attachments at all
                MailMessage::new("Subject: empty\r\n\r\nnothing here\r\n"),
                message_with_attachment("b.csv"),
            ],
            closed: false,
        };

        let saved = download_attachments(&mut source, dir.path());
        assert_eq!(saved, 2);
        assert!(source.closed);
    }

    #[test]
    fn fetch_failure_yields_zero_saved() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(download_attachments(&mut BrokenSource, dir.path()), 0);
    }
}
