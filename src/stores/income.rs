//! Defines the income store trait.

use crate::{
    Error,
    models::{DatabaseID, Income, NewIncome},
    stores::DateRange,
};

/// Handles the creation and retrieval of incomes.
pub trait IncomeStore {
    /// Create a new income in the store.
    ///
    /// # Errors
    /// Returns an [Error::InvalidAmount] if the amount is zero or
    /// negative, or an [Error::SqlError] if there is an SQL error.
    fn create(&mut self, new_income: NewIncome) -> Result<Income, Error>;

    /// Retrieve an income from the store by its `id`.
    ///
    /// # Errors
    /// Returns an [Error::NotFound] if `id` does not refer to a valid
    /// income, or an [Error::SqlError] if there is some other SQL
    /// error.
    fn get_by_id(&self, id: DatabaseID) -> Result<Income, Error>;

    /// Retrieve every income in the store.
    fn get_all(&self) -> Result<Vec<Income>, Error>;

    /// Retrieve the incomes whose category equals `category` exactly.
    fn get_by_category(&self, category: &str) -> Result<Vec<Income>, Error>;

    /// Retrieve the incomes credited to `account_id`.
    fn get_by_account(&self, account_id: DatabaseID) -> Result<Vec<Income>, Error>;

    /// Retrieve the incomes matching both `category` and `account_id`.
    fn get_by_category_and_account(
        &self,
        category: &str,
        account_id: DatabaseID,
    ) -> Result<Vec<Income>, Error>;

    /// Retrieve the incomes dated within `date_range` (inclusive).
    fn get_by_date_range(&self, date_range: &DateRange) -> Result<Vec<Income>, Error>;

    /// Retrieve the incomes matching `category`, `account_id` and
    /// `date_range` all at once.
    fn get_by_category_and_account_and_date_range(
        &self,
        category: &str,
        account_id: DatabaseID,
        date_range: &DateRange,
    ) -> Result<Vec<Income>, Error>;

    /// Retrieve the incomes that are not the by-product of a transfer,
    /// i.e. those with no transfer origin.
    fn get_all_without_transfer(&self) -> Result<Vec<Income>, Error>;

    /// Retrieve the incomes that were entered manually rather than
    /// materialised from a recurring template.
    fn get_all_without_recurring(&self) -> Result<Vec<Income>, Error>;

    /// Retrieve the incomes that were materialised from a recurring
    /// template.
    fn get_all_only_recurring(&self) -> Result<Vec<Income>, Error>;

    /// Overwrite the stored income with `income`'s id with its current
    /// field values.
    ///
    /// # Errors
    /// Returns an [Error::UpdateMissingIncome] if no income with that
    /// id exists, an [Error::InvalidAmount] if the amount is zero or
    /// negative, or an [Error::SqlError] if there is an SQL error.
    fn update(&mut self, income: &Income) -> Result<(), Error>;

    /// Delete the income with `id` from the store.
    ///
    /// Deleting an id that does not exist is a no-op.
    fn delete(&mut self, id: DatabaseID) -> Result<(), Error>;
}
