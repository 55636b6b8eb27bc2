pub mod engine;
pub mod extract;

pub use engine::{MandatoryViolation, MappedRow, extract_field, map_row, validate_mandatory};
pub use extract::coerce;
