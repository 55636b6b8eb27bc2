use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    #[error("weight files folder is not configured")]
    MissingWeightFilesFolder,

    #[error("weight files folder not found: {path}")]
    FolderNotFound { path: PathBuf },

    #[error("failed to read folder {path}: {source}")]
    FolderRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid file mask {mask:?}: {source}")]
    InvalidFileMask {
        mask: String,
        #[source]
        source: glob::PatternError,
    },

    #[error("failed to read csv {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("date-time format is not configured")]
    MissingDateTimeFormat,

    #[error("user filtering is enabled but no filter user is configured")]
    MissingFilterUser,

    #[error("the column mapping has no timestamp rule")]
    MissingTimestampRule,

    #[error("{path}: timestamp column {column:?} is missing from the header")]
    MissingTimestampColumn { path: PathBuf, column: String },

    #[error("{path} row {row}: cannot parse timestamp {value:?} with format {format:?}")]
    TimestampParse {
        path: PathBuf,
        row: usize,
        value: String,
        format: String,
    },
}

pub type Result<T> = std::result::Result<T, IngestError>;
