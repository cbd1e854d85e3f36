//! Implements a SQLite backed income store.

use std::sync::{Arc, Mutex};

use rusqlite::{Connection, Row, params_from_iter, types::Value};
use time::OffsetDateTime;

use crate::{
    Error,
    db::{CreateTable, MapRow},
    models::{DatabaseID, Income, NewIncome, check_amount},
    stores::{DateRange, IncomeStore, sqlite::push_date_range_clauses},
};

const SELECT_INCOME: &str = "SELECT id, account_id, amount, category, description, date, \
     created_at, recurring_id, transfer_id FROM income";

/// Stores incomes in a SQLite database.
#[derive(Debug, Clone)]
pub struct SQLiteIncomeStore {
    connection: Arc<Mutex<Connection>>,
}

impl SQLiteIncomeStore {
    /// Create a new store for the SQLite `connection`.
    pub fn new(connection: Arc<Mutex<Connection>>) -> Self {
        Self { connection }
    }

    fn select_where(
        &self,
        where_clause: Option<String>,
        parameters: Vec<Value>,
    ) -> Result<Vec<Income>, Error> {
        let mut query = SELECT_INCOME.to_string();

        if let Some(clause) = where_clause {
            query.push_str(" WHERE ");
            query.push_str(&clause);
        }

        self.connection
            .lock()
            .unwrap()
            .prepare(&query)?
            .query_map(params_from_iter(parameters.iter()), Self::map_row)?
            .map(|maybe_income| maybe_income.map_err(Error::SqlError))
            .collect()
    }
}

impl IncomeStore for SQLiteIncomeStore {
    fn create(&mut self, new_income: NewIncome) -> Result<Income, Error> {
        check_amount(new_income.amount)?;

        let created_at = OffsetDateTime::now_utc();

        let income = self
            .connection
            .lock()
            .unwrap()
            .prepare(
                "INSERT INTO income (account_id, amount, category, description, date, \
                 created_at, recurring_id, transfer_id)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
                 RETURNING id, account_id, amount, category, description, date, created_at, \
                 recurring_id, transfer_id",
            )?
            .query_row(
                (
                    new_income.account_id,
                    new_income.amount,
                    &new_income.category,
                    &new_income.description,
                    new_income.date,
                    created_at,
                    new_income.recurring_id,
                    new_income.transfer_id,
                ),
                Self::map_row,
            )?;

        Ok(income)
    }

    fn get_by_id(&self, id: DatabaseID) -> Result<Income, Error> {
        let income = self
            .connection
            .lock()
            .unwrap()
            .prepare(&format!("{SELECT_INCOME} WHERE id = :id"))?
            .query_row(&[(":id", &id)], Self::map_row)?;

        Ok(income)
    }

    fn get_all(&self) -> Result<Vec<Income>, Error> {
        self.select_where(None, vec![])
    }

    fn get_by_category(&self, category: &str) -> Result<Vec<Income>, Error> {
        self.select_where(
            Some("category = ?1".to_string()),
            vec![Value::Text(category.to_owned())],
        )
    }

    fn get_by_account(&self, account_id: DatabaseID) -> Result<Vec<Income>, Error> {
        self.select_where(
            Some("account_id = ?1".to_string()),
            vec![Value::Integer(account_id)],
        )
    }

    fn get_by_category_and_account(
        &self,
        category: &str,
        account_id: DatabaseID,
    ) -> Result<Vec<Income>, Error> {
        self.select_where(
            Some("category = ?1 AND account_id = ?2".to_string()),
            vec![Value::Text(category.to_owned()), Value::Integer(account_id)],
        )
    }

    fn get_by_date_range(&self, date_range: &DateRange) -> Result<Vec<Income>, Error> {
        let mut clauses = vec![];
        let mut parameters = vec![];
        push_date_range_clauses(date_range, &mut clauses, &mut parameters);

        if clauses.is_empty() {
            return self.get_all();
        }

        self.select_where(Some(clauses.join(" AND ")), parameters)
    }

    fn get_by_category_and_account_and_date_range(
        &self,
        category: &str,
        account_id: DatabaseID,
        date_range: &DateRange,
    ) -> Result<Vec<Income>, Error> {
        let mut clauses = vec!["category = ?1".to_string(), "account_id = ?2".to_string()];
        let mut parameters = vec![Value::Text(category.to_owned()), Value::Integer(account_id)];
        push_date_range_clauses(date_range, &mut clauses, &mut parameters);

        self.select_where(Some(clauses.join(" AND ")), parameters)
    }

    fn get_all_without_transfer(&self) -> Result<Vec<Income>, Error> {
        self.select_where(Some("transfer_id IS NULL".to_string()), vec![])
    }

    fn get_all_without_recurring(&self) -> Result<Vec<Income>, Error> {
        self.select_where(Some("recurring_id IS NULL".to_string()), vec![])
    }

    fn get_all_only_recurring(&self) -> Result<Vec<Income>, Error> {
        self.select_where(Some("recurring_id IS NOT NULL".to_string()), vec![])
    }

    fn update(&mut self, income: &Income) -> Result<(), Error> {
        check_amount(income.amount)?;

        let rows_updated = self.connection.lock().unwrap().execute(
            "UPDATE income SET account_id = ?1, amount = ?2, category = ?3, description = ?4, \
             date = ?5, recurring_id = ?6, transfer_id = ?7 WHERE id = ?8",
            (
                income.account_id,
                income.amount,
                &income.category,
                &income.description,
                income.date,
                income.recurring_id,
                income.transfer_id,
                income.id,
            ),
        )?;

        if rows_updated == 0 {
            return Err(Error::UpdateMissingIncome);
        }

        Ok(())
    }

    fn delete(&mut self, id: DatabaseID) -> Result<(), Error> {
        self.connection
            .lock()
            .unwrap()
            .execute("DELETE FROM income WHERE id = ?1", (id,))?;

        Ok(())
    }
}

impl CreateTable for SQLiteIncomeStore {
    fn create_table(connection: &Connection) -> Result<(), rusqlite::Error> {
        connection.execute(
            "CREATE TABLE IF NOT EXISTS income (
                    id INTEGER PRIMARY KEY AUTOINCREMENT,
                    account_id INTEGER,
                    amount REAL NOT NULL,
                    category TEXT,
                    description TEXT,
                    date TEXT NOT NULL,
                    created_at TEXT NOT NULL,
                    recurring_id INTEGER,
                    transfer_id INTEGER
                    )",
            (),
        )?;

        Ok(())
    }
}

impl MapRow for SQLiteIncomeStore {
    type ReturnType = Income;

    fn map_row_with_offset(row: &Row, offset: usize) -> Result<Self::ReturnType, rusqlite::Error> {
        Ok(Income {
            id: row.get(offset)?,
            account_id: row.get(offset + 1)?,
            amount: row.get(offset + 2)?,
            category: row.get(offset + 3)?,
            description: row.get(offset + 4)?,
            date: row.get(offset + 5)?,
            created_at: row.get(offset + 6)?,
            recurring_id: row.get(offset + 7)?,
            transfer_id: row.get(offset + 8)?,
        })
    }
}
