//! Defines the transfer store trait.

use crate::{
    Error,
    models::{DatabaseID, NewTransfer, Transfer},
    stores::DateRange,
};

/// Handles the creation and retrieval of transfers.
///
/// Transfers carry no category, account filter or recurring origin, so
/// the query surface is smaller than for expenses and incomes.
pub trait TransferStore {
    /// Create a new transfer in the store. The leg ids start out unset;
    /// the component that materialises the legs records them via
    /// [TransferStore::update].
    ///
    /// # Errors
    /// Returns an [Error::InvalidAmount] if the amount is zero or
    /// negative, or an [Error::SqlError] if there is an SQL error.
    fn create(&mut self, new_transfer: NewTransfer) -> Result<Transfer, Error>;

    /// Retrieve a transfer from the store by its `id`.
    ///
    /// # Errors
    /// Returns an [Error::NotFound] if `id` does not refer to a valid
    /// transfer, or an [Error::SqlError] if there is some other SQL
    /// error.
    fn get_by_id(&self, id: DatabaseID) -> Result<Transfer, Error>;

    /// Retrieve every transfer in the store.
    fn get_all(&self) -> Result<Vec<Transfer>, Error>;

    /// Retrieve the transfers dated within `date_range` (inclusive).
    fn get_by_date_range(&self, date_range: &DateRange) -> Result<Vec<Transfer>, Error>;

    /// Overwrite the stored transfer with `transfer`'s id with its
    /// current field values.
    ///
    /// # Errors
    /// Returns an [Error::UpdateMissingTransfer] if no transfer with
    /// that id exists, an [Error::InvalidAmount] if the amount is zero
    /// or negative, or an [Error::SqlError] if there is an SQL error.
    fn update(&mut self, transfer: &Transfer) -> Result<(), Error>;

    /// Delete the transfer with `id` from the store.
    ///
    /// Deleting an id that does not exist is a no-op. The transfer's
    /// legs are left untouched.
    fn delete(&mut self, id: DatabaseID) -> Result<(), Error>;
}
