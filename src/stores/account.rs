//! Defines the account store trait.

use crate::{
    Error,
    models::{Account, DatabaseID, NewAccount},
};

/// Handles the creation and retrieval of accounts.
pub trait AccountStore {
    /// Create a new account in the store.
    ///
    /// # Errors
    /// Returns an [Error::DuplicateAccountName] if an account with the
    /// same name already exists, an [Error::InvalidDayOfMonth] if a
    /// billing cycle day is out of bounds, or an [Error::SqlError] if
    /// there is an SQL error.
    fn create(&mut self, new_account: NewAccount) -> Result<Account, Error>;

    /// Retrieve an account from the store by its `id`.
    ///
    /// # Errors
    /// Returns an [Error::NotFound] if `id` does not refer to a valid
    /// account, or an [Error::SqlError] if there is some other SQL
    /// error.
    fn get_by_id(&self, id: DatabaseID) -> Result<Account, Error>;

    /// Retrieve every account in the store.
    fn get_all(&self) -> Result<Vec<Account>, Error>;

    /// Overwrite the stored account with `account`'s id with its
    /// current field values.
    ///
    /// # Errors
    /// Returns an [Error::UpdateMissingAccount] if no account with that
    /// id exists, or an [Error::SqlError] if there is an SQL error.
    fn update(&mut self, account: &Account) -> Result<(), Error>;

    /// Delete the account with `id` from the store, leaving any records
    /// that reference it in place.
    ///
    /// Deleting an id that does not exist is a no-op.
    fn delete(&mut self, id: DatabaseID) -> Result<(), Error>;

    /// Delete the account with `id` and every expense recorded against
    /// it, in a single all-or-nothing transaction.
    fn delete_with_expenses(&mut self, id: DatabaseID) -> Result<(), Error>;
}
