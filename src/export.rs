//! JSON snapshot export of the user's data.

use serde::Serialize;
use time::OffsetDateTime;

use crate::{
    Error,
    models::{Account, Expense, Profile},
    stores::{AccountStore, ExpenseStore, ProfileStore},
};

/// A point-in-time snapshot of the profile, accounts and expenses,
/// ready to be serialized as JSON.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportData {
    /// The crate version that produced the snapshot.
    pub version: String,
    /// When the snapshot was taken.
    pub export_date: OffsetDateTime,
    /// The profile, if one has been saved.
    pub profile: Option<Profile>,
    /// Every account.
    pub accounts: Vec<Account>,
    /// Every expense.
    pub expenses: Vec<Expense>,
}

impl ExportData {
    /// Serialize the snapshot as pretty-printed JSON.
    ///
    /// # Errors
    /// Returns an [Error::JSONSerializationError] if serialization
    /// fails.
    pub fn to_json(&self) -> Result<String, Error> {
        serde_json::to_string_pretty(self)
            .map_err(|error| Error::JSONSerializationError(error.to_string()))
    }
}

/// Take a snapshot of the profile, accounts and expenses.
///
/// # Errors
/// Returns an [Error::SqlError] if reading any of the stores fails.
pub fn export_snapshot<P, A, E>(
    profile: &P,
    accounts: &A,
    expenses: &E,
) -> Result<ExportData, Error>
where
    P: ProfileStore,
    A: AccountStore,
    E: ExpenseStore,
{
    Ok(ExportData {
        version: env!("CARGO_PKG_VERSION").to_string(),
        export_date: OffsetDateTime::now_utc(),
        profile: profile.get()?,
        accounts: accounts.get_all()?,
        expenses: expenses.get_all()?,
    })
}
