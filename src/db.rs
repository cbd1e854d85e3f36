//! Defines the traits for mapping the domain models to and from the
//! SQLite database, and the function for initializing the schema.

use rusqlite::{Connection, Error, Row, Transaction as SqlTransaction};

use crate::stores::sqlite::{
    SQLiteAccountStore, SQLiteExpenseStore, SQLiteIncomeStore, SQLiteProfileStore,
    SQLiteRecurringStore, SQLiteTransferStore,
};

/// A trait for adding an object schema to a database.
pub trait CreateTable {
    /// Create a table for the model.
    ///
    /// # Errors
    /// Returns an error if there is an SQL error.
    fn create_table(connection: &Connection) -> Result<(), Error>;
}

/// A trait for mapping from a `rusqlite::Row` from a SQLite database to
/// a concrete rust type.
pub trait MapRow {
    /// The type that rows are mapped to.
    type ReturnType;

    /// Convert a row into a concrete type.
    ///
    /// **Note:** This function expects that the row object contains all
    /// the table columns in the order they were defined.
    ///
    /// # Errors
    /// Returns an error if a row item cannot be converted into the
    /// corresponding rust type, or if an invalid column index was used.
    fn map_row(row: &Row) -> Result<Self::ReturnType, Error> {
        Self::map_row_with_offset(row, 0)
    }

    /// Convert a row into a concrete type.
    ///
    /// The `offset` indicates which column the row should be read from.
    /// This is useful in cases where tables have been joined and you
    /// want to construct two different types from the one query.
    ///
    /// # Errors
    /// Returns an error if a row item cannot be converted into the
    /// corresponding rust type, or if an invalid column index was used.
    fn map_row_with_offset(row: &Row, offset: usize) -> Result<Self::ReturnType, Error>;
}

/// Create the tables for all of the domain models.
///
/// # Errors
/// Returns an [crate::Error::SqlError] if there is an SQL error.
pub fn initialize(connection: &Connection) -> Result<(), crate::Error> {
    let transaction =
        SqlTransaction::new_unchecked(connection, rusqlite::TransactionBehavior::Exclusive)?;

    SQLiteProfileStore::create_table(&transaction)?;
    SQLiteAccountStore::create_table(&transaction)?;
    SQLiteExpenseStore::create_table(&transaction)?;
    SQLiteIncomeStore::create_table(&transaction)?;
    SQLiteRecurringStore::create_table(&transaction)?;
    SQLiteTransferStore::create_table(&transaction)?;

    transaction.commit()?;

    Ok(())
}

#[cfg(test)]
mod initialize_tests {
    use rusqlite::Connection;

    use super::initialize;

    #[test]
    fn creates_all_tables() {
        let connection =
            Connection::open_in_memory().expect("Could not initialise in-memory SQLite database");

        initialize(&connection).expect("Could not initialize schema");

        let count: i64 = connection
            .query_row(
                "SELECT COUNT(name) FROM sqlite_master WHERE type = 'table'
                 AND name IN ('profile', 'account', 'expense', 'income', 'recurring_template', 'transfer')",
                [],
                |row| row.get(0),
            )
            .unwrap();

        assert_eq!(count, 6);
    }

    #[test]
    fn is_idempotent() {
        let connection = Connection::open_in_memory().unwrap();

        initialize(&connection).unwrap();

        assert_eq!(Ok(()), initialize(&connection));
    }
}
