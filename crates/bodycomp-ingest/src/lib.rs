pub mod csv_rows;
pub mod discovery;
pub mod error;
pub mod normalizer;

pub use csv_rows::read_csv_rows;
pub use discovery::list_weight_files;
pub use error::{IngestError, Result};
pub use normalizer::{FileReport, NormalizeOptions, process_weight_file};
