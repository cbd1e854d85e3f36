//! Implements a SQLite backed transfer store.

use std::sync::{Arc, Mutex};

use rusqlite::{Connection, Row, params_from_iter};
use time::OffsetDateTime;

use crate::{
    Error,
    db::{CreateTable, MapRow},
    models::{DatabaseID, NewTransfer, Transfer, check_amount},
    stores::{DateRange, TransferStore, sqlite::push_date_range_clauses},
};

const SELECT_TRANSFER: &str = "SELECT id, from_account_id, to_account_id, amount, date, \
     description, created_at, expense_leg_id, income_leg_id FROM transfer";

/// Stores transfers in a SQLite database.
#[derive(Debug, Clone)]
pub struct SQLiteTransferStore {
    connection: Arc<Mutex<Connection>>,
}

impl SQLiteTransferStore {
    /// Create a new store for the SQLite `connection`.
    pub fn new(connection: Arc<Mutex<Connection>>) -> Self {
        Self { connection }
    }
}

impl TransferStore for SQLiteTransferStore {
    fn create(&mut self, new_transfer: NewTransfer) -> Result<Transfer, Error> {
        check_amount(new_transfer.amount)?;

        let created_at = OffsetDateTime::now_utc();

        let transfer = self
            .connection
            .lock()
            .unwrap()
            .prepare(
                "INSERT INTO transfer (from_account_id, to_account_id, amount, date, \
                 description, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)
                 RETURNING id, from_account_id, to_account_id, amount, date, description, \
                 created_at, expense_leg_id, income_leg_id",
            )?
            .query_row(
                (
                    new_transfer.from_account_id,
                    new_transfer.to_account_id,
                    new_transfer.amount,
                    new_transfer.date,
                    &new_transfer.description,
                    created_at,
                ),
                Self::map_row,
            )?;

        Ok(transfer)
    }

    fn get_by_id(&self, id: DatabaseID) -> Result<Transfer, Error> {
        let transfer = self
            .connection
            .lock()
            .unwrap()
            .prepare(&format!("{SELECT_TRANSFER} WHERE id = :id"))?
            .query_row(&[(":id", &id)], Self::map_row)?;

        Ok(transfer)
    }

    fn get_all(&self) -> Result<Vec<Transfer>, Error> {
        self.connection
            .lock()
            .unwrap()
            .prepare(SELECT_TRANSFER)?
            .query_map([], Self::map_row)?
            .map(|maybe_transfer| maybe_transfer.map_err(Error::SqlError))
            .collect()
    }

    fn get_by_date_range(&self, date_range: &DateRange) -> Result<Vec<Transfer>, Error> {
        let mut clauses = vec![];
        let mut parameters = vec![];
        push_date_range_clauses(date_range, &mut clauses, &mut parameters);

        if clauses.is_empty() {
            return self.get_all();
        }

        let query = format!("{SELECT_TRANSFER} WHERE {}", clauses.join(" AND "));

        self.connection
            .lock()
            .unwrap()
            .prepare(&query)?
            .query_map(params_from_iter(parameters.iter()), Self::map_row)?
            .map(|maybe_transfer| maybe_transfer.map_err(Error::SqlError))
            .collect()
    }

    fn update(&mut self, transfer: &Transfer) -> Result<(), Error> {
        check_amount(transfer.amount)?;

        let rows_updated = self.connection.lock().unwrap().execute(
            "UPDATE transfer SET from_account_id = ?1, to_account_id = ?2, amount = ?3, \
             date = ?4, description = ?5, expense_leg_id = ?6, income_leg_id = ?7 WHERE id = ?8",
            (
                transfer.from_account_id,
                transfer.to_account_id,
                transfer.amount,
                transfer.date,
                &transfer.description,
                transfer.expense_leg_id,
                transfer.income_leg_id,
                transfer.id,
            ),
        )?;

        if rows_updated == 0 {
            return Err(Error::UpdateMissingTransfer);
        }

        Ok(())
    }

    fn delete(&mut self, id: DatabaseID) -> Result<(), Error> {
        self.connection
            .lock()
            .unwrap()
            .execute("DELETE FROM transfer WHERE id = ?1", (id,))?;

        Ok(())
    }
}

impl CreateTable for SQLiteTransferStore {
    fn create_table(connection: &Connection) -> Result<(), rusqlite::Error> {
        connection.execute(
            "CREATE TABLE IF NOT EXISTS transfer (
                    id INTEGER PRIMARY KEY AUTOINCREMENT,
                    from_account_id INTEGER NOT NULL,
                    to_account_id INTEGER NOT NULL,
                    amount REAL NOT NULL,
                    date TEXT NOT NULL,
                    description TEXT,
                    created_at TEXT NOT NULL,
                    expense_leg_id INTEGER,
                    income_leg_id INTEGER
                    )",
            (),
        )?;

        Ok(())
    }
}

impl MapRow for SQLiteTransferStore {
    type ReturnType = Transfer;

    fn map_row_with_offset(row: &Row, offset: usize) -> Result<Self::ReturnType, rusqlite::Error> {
        Ok(Transfer {
            id: row.get(offset)?,
            from_account_id: row.get(offset + 1)?,
            to_account_id: row.get(offset + 2)?,
            amount: row.get(offset + 3)?,
            date: row.get(offset + 4)?,
            description: row.get(offset + 5)?,
            created_at: row.get(offset + 6)?,
            expense_leg_id: row.get(offset + 7)?,
            income_leg_id: row.get(offset + 8)?,
        })
    }
}

#[cfg(test)]
mod sqlite_transfer_store_tests {
    use time::macros::date;

    use crate::{
        Error,
        models::NewTransfer,
        stores::{DateRange, TransferStore, sqlite::open_test_stores},
    };

    fn new_transfer(amount: f64, date: time::Date) -> NewTransfer {
        NewTransfer {
            from_account_id: 1,
            to_account_id: 2,
            amount,
            date,
            description: None,
        }
    }

    #[test]
    fn create_succeeds_with_unset_legs() {
        let mut store = open_test_stores().transfers;

        let transfer = store
            .create(new_transfer(250.0, date!(2024 - 03 - 10)))
            .unwrap();

        assert!(transfer.id > 0);
        assert_eq!(transfer.amount, 250.0);
        assert_eq!(transfer.expense_leg_id, None);
        assert_eq!(transfer.income_leg_id, None);
    }

    #[test]
    fn create_fails_on_nonpositive_amount() {
        let mut store = open_test_stores().transfers;

        let result = store.create(new_transfer(0.0, date!(2024 - 03 - 10)));

        assert_eq!(result, Err(Error::InvalidAmount(0.0)));
    }

    #[test]
    fn update_records_leg_ids() {
        let mut store = open_test_stores().transfers;
        let mut transfer = store
            .create(new_transfer(250.0, date!(2024 - 03 - 10)))
            .unwrap();

        transfer.expense_leg_id = Some(11);
        transfer.income_leg_id = Some(12);
        store.update(&transfer).unwrap();

        assert_eq!(store.get_by_id(transfer.id), Ok(transfer));
    }

    #[test]
    fn update_fails_on_missing_transfer() {
        let mut store = open_test_stores().transfers;
        let mut transfer = store
            .create(new_transfer(250.0, date!(2024 - 03 - 10)))
            .unwrap();

        transfer.id += 1;

        assert_eq!(store.update(&transfer), Err(Error::UpdateMissingTransfer));
    }

    #[test]
    fn get_by_date_range_is_inclusive() {
        let mut store = open_test_stores().transfers;
        store
            .create(new_transfer(1.0, date!(2024 - 02 - 29)))
            .unwrap();
        let want = store
            .create(new_transfer(2.0, date!(2024 - 03 - 01)))
            .unwrap();

        let range = DateRange::new(Some(date!(2024 - 03 - 01)), None).unwrap();
        let got = store.get_by_date_range(&range).unwrap();

        assert_eq!(got, vec![want]);
    }

    #[test]
    fn delete_of_missing_id_is_a_no_op() {
        let mut store = open_test_stores().transfers;

        assert_eq!(Ok(()), store.delete(7));
    }
}
