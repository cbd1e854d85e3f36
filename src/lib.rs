//! Pennywise is a local-first engine for tracking personal finances:
//! accounts, expenses, incomes, transfers between accounts, and
//! recurring templates that materialise into concrete records each
//! month.
//!
//! The heart of the library is the [TransactionFeed]: it unifies the
//! three independently stored record kinds into one filterable,
//! chronologically ordered transaction stream, and routes mutations
//! back to the store that owns each kind.

#![warn(missing_docs)]

use time::Date;

pub mod collection;
pub mod db;
pub mod export;
pub mod feed;
pub mod models;
pub mod notify;
pub mod recurring;
pub mod stores;

pub use collection::{FilterState, RecurringScope};
pub use feed::{FeedTab, TaggedTransaction, TransactionFeed, TransactionKind};
pub use models::DatabaseID;
pub use notify::Notifier;
pub use stores::DateRange;

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// The requested record could not be found.
    ///
    /// Internally, this error may occur when a query returns no rows.
    #[error("the requested record could not be found")]
    NotFound,

    /// A zero or negative amount was used to create a monetary record.
    #[error("{0} is not a valid amount, amounts must be greater than zero")]
    InvalidAmount(f64),

    /// A day-of-month outside 1-31 was used for a recurring template
    /// trigger or a billing cycle boundary.
    #[error("{0} is not a valid day of the month")]
    InvalidDayOfMonth(i64),

    /// The end of a date range was earlier than its start.
    #[error("the date range {0} to {1} ends before it starts")]
    InvalidDateRange(Date, Date),

    /// The specified account name already exists in the database.
    #[error("the account \"{0}\" already exists in the database")]
    DuplicateAccountName(String),

    /// Tried to update an expense that does not exist.
    #[error("tried to update an expense that is not in the database")]
    UpdateMissingExpense,

    /// Tried to update an income that does not exist.
    #[error("tried to update an income that is not in the database")]
    UpdateMissingIncome,

    /// Tried to update a transfer that does not exist.
    #[error("tried to update a transfer that is not in the database")]
    UpdateMissingTransfer,

    /// Tried to update an account that does not exist.
    #[error("tried to update an account that is not in the database")]
    UpdateMissingAccount,

    /// Tried to update a recurring template that does not exist.
    #[error("tried to update a recurring template that is not in the database")]
    UpdateMissingTemplate,

    /// An error occurred while serializing a struct as JSON.
    #[error("could not serialize as JSON: {0}")]
    JSONSerializationError(String),

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
            error => {
                tracing::error!("an unhandled SQL error occurred: {}", error);
                Error::SqlError(error)
            }
        }
    }
}
