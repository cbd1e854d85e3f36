//! SQLite backed implementations of the store traits, all sharing one
//! connection.

mod account;
mod expense;
mod income;
mod profile;
mod recurring;
mod transfer;

pub use account::SQLiteAccountStore;
pub use expense::SQLiteExpenseStore;
pub use income::SQLiteIncomeStore;
pub use profile::SQLiteProfileStore;
pub use recurring::SQLiteRecurringStore;
pub use transfer::SQLiteTransferStore;

use std::sync::{Arc, Mutex};

use rusqlite::{Connection, types::Value};

use crate::{Error, db::initialize, stores::DateRange};

/// The full set of SQLite backed stores over a single connection.
#[derive(Debug, Clone)]
pub struct SQLiteStores {
    /// The store for [accounts](crate::models::Account).
    pub accounts: SQLiteAccountStore,
    /// The store for [expenses](crate::models::Expense).
    pub expenses: SQLiteExpenseStore,
    /// The store for [incomes](crate::models::Income).
    pub incomes: SQLiteIncomeStore,
    /// The store for [transfers](crate::models::Transfer).
    pub transfers: SQLiteTransferStore,
    /// The store for [recurring templates](crate::models::RecurringTemplate).
    pub recurring: SQLiteRecurringStore,
    /// The store for the [profile](crate::models::Profile).
    pub profile: SQLiteProfileStore,
}

/// Creates the set of SQLite backed stores for `db_connection`.
///
/// This function will modify the database by adding the tables for the
/// domain models to the database.
pub fn create_stores(db_connection: Connection) -> Result<SQLiteStores, Error> {
    initialize(&db_connection)?;

    let connection = Arc::new(Mutex::new(db_connection));

    Ok(SQLiteStores {
        accounts: SQLiteAccountStore::new(connection.clone()),
        expenses: SQLiteExpenseStore::new(connection.clone()),
        incomes: SQLiteIncomeStore::new(connection.clone()),
        transfers: SQLiteTransferStore::new(connection.clone()),
        recurring: SQLiteRecurringStore::new(connection.clone()),
        profile: SQLiteProfileStore::new(connection),
    })
}

/// Append `date >= start`/`date <= end` clauses for the bounds that are
/// set in `date_range`, numbering the placeholders after the parameters
/// already collected.
pub(crate) fn push_date_range_clauses(
    date_range: &DateRange,
    clauses: &mut Vec<String>,
    parameters: &mut Vec<Value>,
) {
    if let Some(start) = date_range.start {
        clauses.push(format!("date >= ?{}", parameters.len() + 1));
        parameters.push(Value::Text(start.to_string()));
    }

    if let Some(end) = date_range.end {
        clauses.push(format!("date <= ?{}", parameters.len() + 1));
        parameters.push(Value::Text(end.to_string()));
    }
}

#[cfg(test)]
pub(crate) fn open_test_stores() -> SQLiteStores {
    let connection =
        Connection::open_in_memory().expect("Could not initialise in-memory SQLite database");

    create_stores(connection).expect("Could not create stores")
}
