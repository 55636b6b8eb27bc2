//! Remote fitness-account collaborator interface.
//!
//! The concrete HTTP client lives outside this crate; the import loop only
//! needs the operations below.

use chrono::NaiveDate;

use bodycomp_model::BodyComposition;

use crate::error::AccountError;

/// An existing weigh-in entry on the remote account.
#[derive(Debug, Clone, PartialEq)]
pub struct WeighIn {
    /// Remote handle used for deletion.
    pub id: String,
}

/// Session-oriented view of the remote account.
pub trait AccountClient {
    /// Authenticate; returns the account's display name.
    fn login(&mut self, email: &str, password: &str) -> Result<String, AccountError>;

    /// Existing composition entries for one calendar date.
    fn entries_for_date(&mut self, date: NaiveDate) -> Result<Vec<WeighIn>, AccountError>;

    fn delete_entry(&mut self, id: &str, date: NaiveDate) -> Result<(), AccountError>;

    /// Push one composition entry with all canonical metric fields.
    fn add_composition(&mut self, record: &BodyComposition) -> Result<(), AccountError>;
}
