pub mod mapping;
pub mod record;
pub mod record_set;

pub use mapping::{MappedValue, MappingRule, MappingSchema, RawRow, RuleType};
pub use record::{BodyComposition, METRIC_FIELDS, TIMESTAMP_FIELD, USER_NAME_FIELD};
pub use record_set::RecordSet;
