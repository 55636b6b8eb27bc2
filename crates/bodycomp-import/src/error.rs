use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum MailError {
    #[error("mailbox error: {0}")]
    Mailbox(String),

    #[error("failed to parse message: {0}")]
    Parse(#[from] mailparse::MailParseError),

    #[error("failed to save attachment {path}: {source}")]
    Save {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, thiserror::Error)]
pub enum AccountError {
    #[error("account credentials are not configured")]
    MissingCredentials,

    #[error("login failed: {0}")]
    Login(String),

    #[error("remote call failed: {0}")]
    Remote(String),
}
