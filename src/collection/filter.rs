//! The filter state applied to a per-kind collection.

use crate::{models::DatabaseID, stores::DateRange};

/// Narrows a collection to records by their recurring-template origin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RecurringScope {
    /// Do not filter on recurring origin.
    #[default]
    All,
    /// Only records that were materialised from a recurring template.
    Recurring,
    /// Only records that were entered manually.
    NoRecurring,
}

/// The filters currently applied to a collection.
///
/// A `FilterState` is an immutable value: the `with_*` methods return
/// the new state instead of mutating shared fields, and collections
/// swap in the returned value wholesale.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterState {
    /// The recurring-origin scope. When not [RecurringScope::All], all
    /// other filters are ignored.
    pub recurring_scope: RecurringScope,
    /// Only records with exactly this category.
    pub category: Option<String>,
    /// Only records against this account.
    pub account_id: Option<DatabaseID>,
    /// Only records dated within this range.
    pub date_range: DateRange,
}

impl FilterState {
    /// The state with a new scope, category and account selection,
    /// keeping the current date range.
    ///
    /// Passing `None` for `category` or `account_id` clears that
    /// filter.
    pub fn with_selection(
        self,
        recurring_scope: RecurringScope,
        category: Option<&str>,
        account_id: Option<DatabaseID>,
    ) -> Self {
        Self {
            recurring_scope,
            category: category.map(str::to_owned),
            account_id,
            date_range: self.date_range,
        }
    }

    /// The state with a new date range, keeping the other filters.
    pub fn with_date_range(self, date_range: DateRange) -> Self {
        Self { date_range, ..self }
    }
}
