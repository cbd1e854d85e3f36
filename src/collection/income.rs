//! The filtered collection of incomes.

use std::sync::Arc;

use crate::{
    Error,
    collection::{FilterState, RecurringScope},
    models::{DatabaseID, Income, NewIncome},
    notify::Notifier,
    stores::{DateRange, IncomeStore},
};

/// Holds the current income filter state and the record set it selects.
///
/// Behaves exactly like
/// [ExpenseCollection](crate::collection::ExpenseCollection): pull-based
/// re-derivation, local recovery of load failures, and re-thrown
/// mutation failures.
pub struct IncomeCollection<S: IncomeStore> {
    store: S,
    notifier: Arc<dyn Notifier>,
    filter: FilterState,
    records: Option<Vec<Income>>,
    error: Option<Error>,
    dirty: bool,
    revision: u64,
}

impl<S: IncomeStore> IncomeCollection<S> {
    /// Create a collection over `store` with no filters applied.
    pub fn new(store: S, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            store,
            notifier,
            filter: FilterState::default(),
            records: None,
            error: None,
            dirty: true,
            revision: 0,
        }
    }

    /// The incomes selected by the current filter state, re-deriving
    /// them from the store if the collection is stale.
    pub fn records(&mut self) -> &[Income] {
        if self.dirty || self.records.is_none() {
            self.load();
        }

        self.records.as_deref().unwrap_or(&[])
    }

    /// The record set from the last load, without re-deriving.
    pub(crate) fn loaded(&self) -> &[Income] {
        self.records.as_deref().unwrap_or(&[])
    }

    /// Whether the record set has not yet caught up with the filter
    /// state.
    pub fn is_loading(&self) -> bool {
        self.dirty || self.records.is_none()
    }

    /// The error from the last failed load or `None` if it succeeded.
    pub fn error(&self) -> Option<&Error> {
        self.error.as_ref()
    }

    /// A counter that changes every time the record set is re-derived.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// The currently applied filters.
    pub fn filter_state(&self) -> &FilterState {
        &self.filter
    }

    /// Mark the collection stale so the next read re-queries the store.
    pub fn refresh(&mut self) {
        self.dirty = true;
    }

    /// Replace the scope, category and account filters, keeping the
    /// date range.
    pub fn filter(
        &mut self,
        recurring_scope: RecurringScope,
        category: Option<&str>,
        account_id: Option<DatabaseID>,
    ) {
        self.filter = self
            .filter
            .clone()
            .with_selection(recurring_scope, category, account_id);
        self.refresh();
    }

    /// Replace the date range filter, keeping the other filters.
    pub fn filter_by_date_range(&mut self, date_range: DateRange) {
        self.filter = self.filter.clone().with_date_range(date_range);
        self.refresh();
    }

    /// Create an income, notify the outcome and mark the collection
    /// stale.
    ///
    /// # Errors
    /// Failures are re-thrown after notifying so the caller can react
    /// as well.
    pub fn create(&mut self, new_income: NewIncome) -> Result<Income, Error> {
        match self.store.create(new_income) {
            Ok(income) => {
                self.notifier.success("Income created successfully");
                self.refresh();
                Ok(income)
            }
            Err(error) => {
                self.notifier.error("Failed to create income");
                Err(error)
            }
        }
    }

    /// Update an income, notify the outcome and mark the collection
    /// stale.
    ///
    /// # Errors
    /// Failures are re-thrown after notifying so the caller can react
    /// as well.
    pub fn update(&mut self, income: &Income) -> Result<(), Error> {
        match self.store.update(income) {
            Ok(()) => {
                self.notifier.success("Income updated successfully");
                self.refresh();
                Ok(())
            }
            Err(error) => {
                self.notifier.error("Failed to update income");
                Err(error)
            }
        }
    }

    /// Delete an income, notify the outcome and mark the collection
    /// stale. Deleting an id that does not exist is a no-op.
    ///
    /// # Errors
    /// Failures are re-thrown after notifying so the caller can react
    /// as well.
    pub fn delete(&mut self, id: DatabaseID) -> Result<(), Error> {
        match self.store.delete(id) {
            Ok(()) => {
                self.notifier.success("Income deleted");
                self.refresh();
                Ok(())
            }
            Err(error) => {
                self.notifier.error("Failed to delete income");
                Err(error)
            }
        }
    }

    fn load(&mut self) {
        match self.run_query() {
            Ok(incomes) => {
                self.records = Some(incomes);
                self.error = None;
            }
            Err(error) => {
                tracing::error!("failed to load incomes: {error}");
                self.notifier.error("Failed to load incomes");
                self.records = Some(Vec::new());
                self.error = Some(error);
            }
        }

        self.dirty = false;
        self.revision += 1;
    }

    /// Resolve the filter state to a store query. First matching branch
    /// wins, mirroring the expense cascade.
    fn run_query(&self) -> Result<Vec<Income>, Error> {
        match self.filter.recurring_scope {
            RecurringScope::Recurring => return self.store.get_all_only_recurring(),
            RecurringScope::NoRecurring => return self.store.get_all_without_recurring(),
            RecurringScope::All => {}
        }

        if let (Some(category), Some(account_id), true) = (
            &self.filter.category,
            self.filter.account_id,
            self.filter.date_range.is_set(),
        ) {
            return self.store.get_by_category_and_account_and_date_range(
                category,
                account_id,
                &self.filter.date_range,
            );
        }

        if self.filter.date_range.is_set() {
            return self.store.get_by_date_range(&self.filter.date_range);
        }

        match (&self.filter.category, self.filter.account_id) {
            (Some(category), Some(account_id)) => {
                self.store.get_by_category_and_account(category, account_id)
            }
            (Some(category), None) => self.store.get_by_category(category),
            (None, Some(account_id)) => self.store.get_by_account(account_id),
            (None, None) => self.store.get_all_without_transfer(),
        }
    }
}
