//! Defines the expense store trait.

use crate::{
    Error,
    models::{DatabaseID, Expense, NewExpense},
    stores::DateRange,
};

/// Handles the creation and retrieval of expenses.
pub trait ExpenseStore {
    /// Create a new expense in the store.
    ///
    /// # Errors
    /// Returns an [Error::InvalidAmount] if the amount is zero or
    /// negative, or an [Error::SqlError] if there is an SQL error.
    fn create(&mut self, new_expense: NewExpense) -> Result<Expense, Error>;

    /// Retrieve an expense from the store by its `id`.
    ///
    /// # Errors
    /// Returns an [Error::NotFound] if `id` does not refer to a valid
    /// expense, or an [Error::SqlError] if there is some other SQL
    /// error.
    fn get_by_id(&self, id: DatabaseID) -> Result<Expense, Error>;

    /// Retrieve every expense in the store.
    fn get_all(&self) -> Result<Vec<Expense>, Error>;

    /// Retrieve the expenses whose category equals `category` exactly.
    fn get_by_category(&self, category: &str) -> Result<Vec<Expense>, Error>;

    /// Retrieve the expenses recorded against `account_id`.
    fn get_by_account(&self, account_id: DatabaseID) -> Result<Vec<Expense>, Error>;

    /// Retrieve the expenses matching both `category` and `account_id`.
    fn get_by_category_and_account(
        &self,
        category: &str,
        account_id: DatabaseID,
    ) -> Result<Vec<Expense>, Error>;

    /// Retrieve the expenses dated within `date_range` (inclusive).
    fn get_by_date_range(&self, date_range: &DateRange) -> Result<Vec<Expense>, Error>;

    /// Retrieve the expenses matching `category`, `account_id` and
    /// `date_range` all at once.
    fn get_by_category_and_account_and_date_range(
        &self,
        category: &str,
        account_id: DatabaseID,
        date_range: &DateRange,
    ) -> Result<Vec<Expense>, Error>;

    /// Retrieve the expenses that are not the by-product of a transfer,
    /// i.e. those with no transfer origin.
    fn get_all_without_transfer(&self) -> Result<Vec<Expense>, Error>;

    /// Retrieve the expenses that were entered manually rather than
    /// materialised from a recurring template.
    fn get_all_without_recurring(&self) -> Result<Vec<Expense>, Error>;

    /// Retrieve the expenses that were materialised from a recurring
    /// template.
    fn get_all_only_recurring(&self) -> Result<Vec<Expense>, Error>;

    /// Overwrite the stored expense with `expense`'s id with its
    /// current field values.
    ///
    /// # Errors
    /// Returns an [Error::UpdateMissingExpense] if no expense with that
    /// id exists, an [Error::InvalidAmount] if the amount is zero or
    /// negative, or an [Error::SqlError] if there is an SQL error.
    fn update(&mut self, expense: &Expense) -> Result<(), Error>;

    /// Delete the expense with `id` from the store.
    ///
    /// Deleting an id that does not exist is a no-op.
    fn delete(&mut self, id: DatabaseID) -> Result<(), Error>;
}
