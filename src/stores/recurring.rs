//! Defines the recurring template store trait.

use time::Date;

use crate::{
    Error,
    models::{DatabaseID, NewRecurringTemplate, RecurringTemplate},
};

/// Handles the creation and retrieval of recurring templates.
pub trait RecurringStore {
    /// Create a new recurring template in the store.
    ///
    /// # Errors
    /// Returns an [Error::InvalidDayOfMonth] if the trigger day is out
    /// of bounds, an [Error::InvalidAmount] if the amount is zero or
    /// negative, or an [Error::SqlError] if there is an SQL error.
    fn create(&mut self, new_template: NewRecurringTemplate) -> Result<RecurringTemplate, Error>;

    /// Retrieve a recurring template from the store by its `id`.
    ///
    /// # Errors
    /// Returns an [Error::NotFound] if `id` does not refer to a valid
    /// template, or an [Error::SqlError] if there is some other SQL
    /// error.
    fn get_by_id(&self, id: DatabaseID) -> Result<RecurringTemplate, Error>;

    /// Retrieve every recurring template in the store.
    fn get_all(&self) -> Result<Vec<RecurringTemplate>, Error>;

    /// Overwrite the stored template with `template`'s id with its
    /// current field values.
    ///
    /// # Errors
    /// Returns an [Error::UpdateMissingTemplate] if no template with
    /// that id exists, or an [Error::SqlError] if there is an SQL
    /// error.
    fn update(&mut self, template: &RecurringTemplate) -> Result<(), Error>;

    /// Delete the template with `id` from the store.
    ///
    /// Deleting an id that does not exist is a no-op.
    fn delete(&mut self, id: DatabaseID) -> Result<(), Error>;

    /// Record that the template with `id` fired on `date`.
    ///
    /// This is the only field the generator mutates.
    ///
    /// # Errors
    /// Returns an [Error::UpdateMissingTemplate] if no template with
    /// that id exists.
    fn mark_triggered(&mut self, id: DatabaseID, date: Date) -> Result<(), Error>;
}
