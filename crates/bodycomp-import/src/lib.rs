pub mod account;
pub mod error;
pub mod importer;
pub mod mail;

pub use account::{AccountClient, WeighIn};
pub use error::{AccountError, MailError};
pub use importer::{ImportOptions, ImportReport, ImportState, import_records};
pub use mail::{MailMessage, MailSource, download_attachments, save_attachments};
