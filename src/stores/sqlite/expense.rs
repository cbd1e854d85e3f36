//! Implements a SQLite backed expense store.

use std::sync::{Arc, Mutex};

use rusqlite::{Connection, Row, params_from_iter, types::Value};
use time::OffsetDateTime;

use crate::{
    Error,
    db::{CreateTable, MapRow},
    models::{DatabaseID, Expense, NewExpense, check_amount},
    stores::{DateRange, ExpenseStore, sqlite::push_date_range_clauses},
};

const SELECT_EXPENSE: &str = "SELECT id, account_id, amount, category, description, date, \
     created_at, installment, recurring_id, transfer_id FROM expense";

/// Stores expenses in a SQLite database.
#[derive(Debug, Clone)]
pub struct SQLiteExpenseStore {
    connection: Arc<Mutex<Connection>>,
}

impl SQLiteExpenseStore {
    /// Create a new store for the SQLite `connection`.
    pub fn new(connection: Arc<Mutex<Connection>>) -> Self {
        Self { connection }
    }

    fn select_where(
        &self,
        where_clause: Option<String>,
        parameters: Vec<Value>,
    ) -> Result<Vec<Expense>, Error> {
        let mut query = SELECT_EXPENSE.to_string();

        if let Some(clause) = where_clause {
            query.push_str(" WHERE ");
            query.push_str(&clause);
        }

        self.connection
            .lock()
            .unwrap()
            .prepare(&query)?
            .query_map(params_from_iter(parameters.iter()), Self::map_row)?
            .map(|maybe_expense| maybe_expense.map_err(Error::SqlError))
            .collect()
    }
}

impl ExpenseStore for SQLiteExpenseStore {
    fn create(&mut self, new_expense: NewExpense) -> Result<Expense, Error> {
        check_amount(new_expense.amount)?;

        let created_at = OffsetDateTime::now_utc();

        let expense = self
            .connection
            .lock()
            .unwrap()
            .prepare(
                "INSERT INTO expense (account_id, amount, category, description, date, \
                 created_at, installment, recurring_id, transfer_id)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
                 RETURNING id, account_id, amount, category, description, date, created_at, \
                 installment, recurring_id, transfer_id",
            )?
            .query_row(
                (
                    new_expense.account_id,
                    new_expense.amount,
                    &new_expense.category,
                    &new_expense.description,
                    new_expense.date,
                    created_at,
                    new_expense.installment,
                    new_expense.recurring_id,
                    new_expense.transfer_id,
                ),
                Self::map_row,
            )?;

        Ok(expense)
    }

    fn get_by_id(&self, id: DatabaseID) -> Result<Expense, Error> {
        let expense = self
            .connection
            .lock()
            .unwrap()
            .prepare(&format!("{SELECT_EXPENSE} WHERE id = :id"))?
            .query_row(&[(":id", &id)], Self::map_row)?;

        Ok(expense)
    }

    fn get_all(&self) -> Result<Vec<Expense>, Error> {
        self.select_where(None, vec![])
    }

    fn get_by_category(&self, category: &str) -> Result<Vec<Expense>, Error> {
        self.select_where(
            Some("category = ?1".to_string()),
            vec![Value::Text(category.to_owned())],
        )
    }

    fn get_by_account(&self, account_id: DatabaseID) -> Result<Vec<Expense>, Error> {
        self.select_where(
            Some("account_id = ?1".to_string()),
            vec![Value::Integer(account_id)],
        )
    }

    fn get_by_category_and_account(
        &self,
        category: &str,
        account_id: DatabaseID,
    ) -> Result<Vec<Expense>, Error> {
        self.select_where(
            Some("category = ?1 AND account_id = ?2".to_string()),
            vec![Value::Text(category.to_owned()), Value::Integer(account_id)],
        )
    }

    fn get_by_date_range(&self, date_range: &DateRange) -> Result<Vec<Expense>, Error> {
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
    ) -> Result<Vec<Expense>, Error> {
        let mut clauses = vec!["category = ?1".to_string(), "account_id = ?2".to_string()];
        let mut parameters = vec![Value::Text(category.to_owned()), Value::Integer(account_id)];
        push_date_range_clauses(date_range, &mut clauses, &mut parameters);

        self.select_where(Some(clauses.join(" AND ")), parameters)
    }

    fn get_all_without_transfer(&self) -> Result<Vec<Expense>, Error> {
        self.select_where(Some("transfer_id IS NULL".to_string()), vec![])
    }

    fn get_all_without_recurring(&self) -> Result<Vec<Expense>, Error> {
        self.select_where(Some("recurring_id IS NULL".to_string()), vec![])
    }

    fn get_all_only_recurring(&self) -> Result<Vec<Expense>, Error> {
        self.select_where(Some("recurring_id IS NOT NULL".to_string()), vec![])
    }

    fn update(&mut self, expense: &Expense) -> Result<(), Error> {
        check_amount(expense.amount)?;

        let rows_updated = self.connection.lock().unwrap().execute(
            "UPDATE expense SET account_id = ?1, amount = ?2, category = ?3, description = ?4, \
             date = ?5, installment = ?6, recurring_id = ?7, transfer_id = ?8 WHERE id = ?9",
            (
                expense.account_id,
                expense.amount,
                &expense.category,
                &expense.description,
                expense.date,
                expense.installment,
                expense.recurring_id,
                expense.transfer_id,
                expense.id,
            ),
        )?;

        if rows_updated == 0 {
            return Err(Error::UpdateMissingExpense);
        }

        Ok(())
    }

    fn delete(&mut self, id: DatabaseID) -> Result<(), Error> {
        self.connection
            .lock()
            .unwrap()
            .execute("DELETE FROM expense WHERE id = ?1", (id,))?;

        Ok(())
    }
}

impl CreateTable for SQLiteExpenseStore {
    fn create_table(connection: &Connection) -> Result<(), rusqlite::Error> {
        connection.execute(
            "CREATE TABLE IF NOT EXISTS expense (
                    id INTEGER PRIMARY KEY AUTOINCREMENT,
                    account_id INTEGER NOT NULL,
                    amount REAL NOT NULL,
                    category TEXT NOT NULL,
                    description TEXT,
                    date TEXT NOT NULL,
                    created_at TEXT NOT NULL,
                    installment INTEGER NOT NULL DEFAULT 0,
                    recurring_id INTEGER,
                    transfer_id INTEGER
                    )",
            (),
        )?;

        Ok(())
    }
}

impl MapRow for SQLiteExpenseStore {
    type ReturnType = Expense;

    fn map_row_with_offset(row: &Row, offset: usize) -> Result<Self::ReturnType, rusqlite::Error> {
        Ok(Expense {
            id: row.get(offset)?,
            account_id: row.get(offset + 1)?,
            amount: row.get(offset + 2)?,
            category: row.get(offset + 3)?,
            description: row.get(offset + 4)?,
            date: row.get(offset + 5)?,
            created_at: row.get(offset + 6)?,
            installment: row.get(offset + 7)?,
            recurring_id: row.get(offset + 8)?,
            transfer_id: row.get(offset + 9)?,
        })
    }
}

#[cfg(test)]
mod sqlite_expense_store_tests {
    use time::macros::date;

    use crate::{
        Error,
        models::NewExpense,
        stores::{DateRange, ExpenseStore, sqlite::open_test_stores},
    };

    #[test]
    fn create_succeeds() {
        let mut store = open_test_stores().expenses;
        let new_expense = NewExpense::new(1, 12.30, "groceries", date!(2024 - 01 - 15));

        let expense = store.create(new_expense).unwrap();

        assert!(expense.id > 0);
        assert_eq!(expense.amount, 12.30);
        assert_eq!(expense.category, "groceries");
        assert_eq!(expense.date, date!(2024 - 01 - 15));
        assert_eq!(expense.recurring_id, None);
        assert_eq!(expense.transfer_id, None);
    }

    #[test]
    fn create_fails_on_nonpositive_amount() {
        let mut store = open_test_stores().expenses;

        let zero = store.create(NewExpense::new(1, 0.0, "groceries", date!(2024 - 01 - 15)));
        let negative = store.create(NewExpense::new(1, -5.0, "groceries", date!(2024 - 01 - 15)));

        assert_eq!(zero, Err(Error::InvalidAmount(0.0)));
        assert_eq!(negative, Err(Error::InvalidAmount(-5.0)));
    }

    #[test]
    fn get_by_id_succeeds() {
        let mut store = open_test_stores().expenses;
        let expense = store
            .create(NewExpense::new(1, 9.99, "coffee", date!(2024 - 02 - 02)))
            .unwrap();

        let selected_expense = store.get_by_id(expense.id);

        assert_eq!(Ok(expense), selected_expense);
    }

    #[test]
    fn get_by_id_fails_on_invalid_id() {
        let mut store = open_test_stores().expenses;
        let expense = store
            .create(NewExpense::new(1, 9.99, "coffee", date!(2024 - 02 - 02)))
            .unwrap();

        let maybe_expense = store.get_by_id(expense.id + 654);

        assert_eq!(maybe_expense, Err(Error::NotFound));
    }

    #[test]
    fn get_by_category_matches_exactly() {
        let mut store = open_test_stores().expenses;
        let want = store
            .create(NewExpense::new(1, 10.0, "groceries", date!(2024 - 01 - 01)))
            .unwrap();
        store
            .create(NewExpense::new(1, 20.0, "Groceries", date!(2024 - 01 - 02)))
            .unwrap();
        store
            .create(NewExpense::new(1, 30.0, "rent", date!(2024 - 01 - 03)))
            .unwrap();

        let got = store.get_by_category("groceries").unwrap();

        assert_eq!(got, vec![want]);
    }

    #[test]
    fn get_by_account_only_returns_that_account() {
        let mut store = open_test_stores().expenses;
        let want = store
            .create(NewExpense::new(7, 10.0, "groceries", date!(2024 - 01 - 01)))
            .unwrap();
        store
            .create(NewExpense::new(8, 20.0, "groceries", date!(2024 - 01 - 02)))
            .unwrap();

        let got = store.get_by_account(7).unwrap();

        assert_eq!(got, vec![want]);
    }

    #[test]
    fn get_by_date_range_is_inclusive() {
        let mut store = open_test_stores().expenses;
        let inside = [
            store
                .create(NewExpense::new(1, 1.0, "a", date!(2024 - 02 - 01)))
                .unwrap(),
            store
                .create(NewExpense::new(1, 2.0, "b", date!(2024 - 02 - 15)))
                .unwrap(),
            store
                .create(NewExpense::new(1, 3.0, "c", date!(2024 - 02 - 29)))
                .unwrap(),
        ];
        store
            .create(NewExpense::new(1, 4.0, "d", date!(2024 - 01 - 31)))
            .unwrap();
        store
            .create(NewExpense::new(1, 5.0, "e", date!(2024 - 03 - 01)))
            .unwrap();

        let range =
            DateRange::new(Some(date!(2024 - 02 - 01)), Some(date!(2024 - 02 - 29))).unwrap();
        let got = store.get_by_date_range(&range).unwrap();

        assert_eq!(got, inside);
    }

    #[test]
    fn get_by_date_range_with_start_only_has_open_upper_bound() {
        let mut store = open_test_stores().expenses;
        store
            .create(NewExpense::new(1, 1.0, "a", date!(2024 - 01 - 31)))
            .unwrap();
        let want = [
            store
                .create(NewExpense::new(1, 2.0, "b", date!(2024 - 02 - 01)))
                .unwrap(),
            store
                .create(NewExpense::new(1, 3.0, "c", date!(2030 - 12 - 31)))
                .unwrap(),
        ];

        let range = DateRange::new(Some(date!(2024 - 02 - 01)), None).unwrap();
        let got = store.get_by_date_range(&range).unwrap();

        assert_eq!(got, want);
    }

    #[test]
    fn get_by_date_range_with_end_only_has_open_lower_bound() {
        let mut store = open_test_stores().expenses;
        let want = [
            store
                .create(NewExpense::new(1, 1.0, "a", date!(1999 - 01 - 01)))
                .unwrap(),
            store
                .create(NewExpense::new(1, 2.0, "b", date!(2024 - 02 - 01)))
                .unwrap(),
        ];
        store
            .create(NewExpense::new(1, 3.0, "c", date!(2024 - 02 - 02)))
            .unwrap();

        let range = DateRange::new(None, Some(date!(2024 - 02 - 01))).unwrap();
        let got = store.get_by_date_range(&range).unwrap();

        assert_eq!(got, want);
    }

    #[test]
    fn get_all_without_transfer_excludes_transfer_legs() {
        let mut store = open_test_stores().expenses;
        let manual = store
            .create(NewExpense::new(1, 10.0, "groceries", date!(2024 - 01 - 01)))
            .unwrap();
        let mut leg = NewExpense::new(1, 50.0, "transfer", date!(2024 - 01 - 02));
        leg.transfer_id = Some(42);
        store.create(leg).unwrap();

        let got = store.get_all_without_transfer().unwrap();

        assert_eq!(got, vec![manual]);
    }

    #[test]
    fn recurring_origin_queries_split_on_recurring_id() {
        let mut store = open_test_stores().expenses;
        let manual = store
            .create(NewExpense::new(1, 10.0, "groceries", date!(2024 - 01 - 01)))
            .unwrap();
        let mut from_template = NewExpense::new(1, 15.0, "rent", date!(2024 - 01 - 02));
        from_template.recurring_id = Some(3);
        let recurring = store.create(from_template).unwrap();

        assert_eq!(store.get_all_only_recurring().unwrap(), vec![recurring]);
        assert_eq!(store.get_all_without_recurring().unwrap(), vec![manual]);
    }

    #[test]
    fn update_succeeds() {
        let mut store = open_test_stores().expenses;
        let mut expense = store
            .create(NewExpense::new(1, 10.0, "groceries", date!(2024 - 01 - 01)))
            .unwrap();

        expense.amount = 12.5;
        expense.category = "food".to_string();
        store.update(&expense).unwrap();

        assert_eq!(store.get_by_id(expense.id), Ok(expense));
    }

    #[test]
    fn update_fails_on_missing_expense() {
        let mut store = open_test_stores().expenses;
        let mut expense = store
            .create(NewExpense::new(1, 10.0, "groceries", date!(2024 - 01 - 01)))
            .unwrap();

        expense.id += 1;
        let result = store.update(&expense);

        assert_eq!(result, Err(Error::UpdateMissingExpense));
    }

    #[test]
    fn delete_removes_the_expense() {
        let mut store = open_test_stores().expenses;
        let expense = store
            .create(NewExpense::new(1, 10.0, "groceries", date!(2024 - 01 - 01)))
            .unwrap();

        store.delete(expense.id).unwrap();

        assert_eq!(store.get_by_id(expense.id), Err(Error::NotFound));
    }

    #[test]
    fn delete_of_missing_id_is_a_no_op() {
        let mut store = open_test_stores().expenses;
        let expense = store
            .create(NewExpense::new(1, 10.0, "groceries", date!(2024 - 01 - 01)))
            .unwrap();

        assert_eq!(Ok(()), store.delete(expense.id + 999));
        assert_eq!(Ok(()), store.delete(expense.id));
        assert_eq!(Ok(()), store.delete(expense.id));

        assert_eq!(store.get_all().unwrap(), vec![]);
    }
}
