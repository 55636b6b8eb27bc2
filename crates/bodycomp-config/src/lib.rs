pub mod error;
pub mod settings;

pub use error::{ConfigError, Result};
pub use settings::{
    AccountSettings, DEFAULT_FILE_MASK, DataSettings, MailboxSettings, Settings,
};
