//! Implements a SQLite backed recurring template store.

use std::sync::{Arc, Mutex};

use rusqlite::{Connection, Row};
use time::{Date, OffsetDateTime};

use crate::{
    Error,
    db::{CreateTable, MapRow},
    models::{
        DatabaseID, NewRecurringTemplate, RecurringKind, RecurringTemplate, check_amount,
        check_day_of_month,
    },
    stores::RecurringStore,
};

const SELECT_TEMPLATE: &str = "SELECT id, day_of_month, amount, account_id, category, \
     description, kind, created_at, last_triggered FROM recurring_template";

/// Stores recurring templates in a SQLite database.
#[derive(Debug, Clone)]
pub struct SQLiteRecurringStore {
    connection: Arc<Mutex<Connection>>,
}

impl SQLiteRecurringStore {
    /// Create a new store for the SQLite `connection`.
    pub fn new(connection: Arc<Mutex<Connection>>) -> Self {
        Self { connection }
    }
}

impl RecurringStore for SQLiteRecurringStore {
    fn create(&mut self, new_template: NewRecurringTemplate) -> Result<RecurringTemplate, Error> {
        check_day_of_month(new_template.day_of_month)?;
        check_amount(new_template.amount)?;

        let created_at = OffsetDateTime::now_utc();

        let template = self
            .connection
            .lock()
            .unwrap()
            .prepare(
                "INSERT INTO recurring_template (day_of_month, amount, account_id, category, \
                 description, kind, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
                 RETURNING id, day_of_month, amount, account_id, category, description, kind, \
                 created_at, last_triggered",
            )?
            .query_row(
                (
                    new_template.day_of_month,
                    new_template.amount,
                    new_template.account_id,
                    &new_template.category,
                    &new_template.description,
                    new_template.kind.as_str(),
                    created_at,
                ),
                Self::map_row,
            )?;

        Ok(template)
    }

    fn get_by_id(&self, id: DatabaseID) -> Result<RecurringTemplate, Error> {
        let template = self
            .connection
            .lock()
            .unwrap()
            .prepare(&format!("{SELECT_TEMPLATE} WHERE id = :id"))?
            .query_row(&[(":id", &id)], Self::map_row)?;

        Ok(template)
    }

    fn get_all(&self) -> Result<Vec<RecurringTemplate>, Error> {
        self.connection
            .lock()
            .unwrap()
            .prepare(SELECT_TEMPLATE)?
            .query_map([], Self::map_row)?
            .map(|maybe_template| maybe_template.map_err(Error::SqlError))
            .collect()
    }

    fn update(&mut self, template: &RecurringTemplate) -> Result<(), Error> {
        check_day_of_month(template.day_of_month)?;
        check_amount(template.amount)?;

        let rows_updated = self.connection.lock().unwrap().execute(
            "UPDATE recurring_template SET day_of_month = ?1, amount = ?2, account_id = ?3, \
             category = ?4, description = ?5, kind = ?6, last_triggered = ?7 WHERE id = ?8",
            (
                template.day_of_month,
                template.amount,
                template.account_id,
                &template.category,
                &template.description,
                template.kind.as_str(),
                template.last_triggered,
                template.id,
            ),
        )?;

        if rows_updated == 0 {
            return Err(Error::UpdateMissingTemplate);
        }

        Ok(())
    }

    fn delete(&mut self, id: DatabaseID) -> Result<(), Error> {
        self.connection
            .lock()
            .unwrap()
            .execute("DELETE FROM recurring_template WHERE id = ?1", (id,))?;

        Ok(())
    }

    fn mark_triggered(&mut self, id: DatabaseID, date: Date) -> Result<(), Error> {
        let rows_updated = self.connection.lock().unwrap().execute(
            "UPDATE recurring_template SET last_triggered = ?1 WHERE id = ?2",
            (date, id),
        )?;

        if rows_updated == 0 {
            return Err(Error::UpdateMissingTemplate);
        }

        Ok(())
    }
}

impl CreateTable for SQLiteRecurringStore {
    fn create_table(connection: &Connection) -> Result<(), rusqlite::Error> {
        connection.execute(
            "CREATE TABLE IF NOT EXISTS recurring_template (
                    id INTEGER PRIMARY KEY AUTOINCREMENT,
                    day_of_month INTEGER NOT NULL,
                    amount REAL NOT NULL,
                    account_id INTEGER,
                    category TEXT,
                    description TEXT,
                    kind TEXT NOT NULL,
                    created_at TEXT NOT NULL,
                    last_triggered TEXT
                    )",
            (),
        )?;

        Ok(())
    }
}

impl MapRow for SQLiteRecurringStore {
    type ReturnType = RecurringTemplate;

    fn map_row_with_offset(row: &Row, offset: usize) -> Result<Self::ReturnType, rusqlite::Error> {
        let kind_name: String = row.get(offset + 6)?;

        let kind = match kind_name.as_str() {
            "expense" => RecurringKind::Expense,
            "income" => RecurringKind::Income,
            other => {
                return Err(rusqlite::Error::FromSqlConversionFailure(
                    offset + 6,
                    rusqlite::types::Type::Text,
                    format!("unknown recurring template kind \"{other}\"").into(),
                ));
            }
        };

        Ok(RecurringTemplate {
            id: row.get(offset)?,
            day_of_month: row.get(offset + 1)?,
            amount: row.get(offset + 2)?,
            account_id: row.get(offset + 3)?,
            category: row.get(offset + 4)?,
            description: row.get(offset + 5)?,
            kind,
            created_at: row.get(offset + 7)?,
            last_triggered: row.get(offset + 8)?,
        })
    }
}

#[cfg(test)]
mod sqlite_recurring_store_tests {
    use time::macros::date;

    use crate::{
        Error,
        models::{NewRecurringTemplate, RecurringKind},
        stores::{RecurringStore, sqlite::open_test_stores},
    };

    fn rent_template() -> NewRecurringTemplate {
        NewRecurringTemplate {
            day_of_month: 1,
            amount: 1200.0,
            account_id: Some(1),
            category: Some("rent".to_string()),
            description: None,
            kind: RecurringKind::Expense,
        }
    }

    #[test]
    fn create_succeeds() {
        let mut store = open_test_stores().recurring;

        let template = store.create(rent_template()).unwrap();

        assert!(template.id > 0);
        assert_eq!(template.day_of_month, 1);
        assert_eq!(template.kind, RecurringKind::Expense);
        assert_eq!(template.last_triggered, None);
    }

    #[test]
    fn create_fails_on_invalid_trigger_day() {
        let mut store = open_test_stores().recurring;
        let mut template = rent_template();
        template.day_of_month = 32;

        let result = store.create(template);

        assert_eq!(result, Err(Error::InvalidDayOfMonth(32)));
    }

    #[test]
    fn create_fails_on_nonpositive_amount() {
        let mut store = open_test_stores().recurring;
        let mut template = rent_template();
        template.amount = 0.0;

        let result = store.create(template);

        assert_eq!(result, Err(Error::InvalidAmount(0.0)));
    }

    #[test]
    fn mark_triggered_sets_the_date() {
        let mut store = open_test_stores().recurring;
        let template = store.create(rent_template()).unwrap();

        store
            .mark_triggered(template.id, date!(2024 - 05 - 01))
            .unwrap();

        let got = store.get_by_id(template.id).unwrap();
        assert_eq!(got.last_triggered, Some(date!(2024 - 05 - 01)));
    }

    #[test]
    fn mark_triggered_fails_on_missing_template() {
        let mut store = open_test_stores().recurring;

        let result = store.mark_triggered(404, date!(2024 - 05 - 01));

        assert_eq!(result, Err(Error::UpdateMissingTemplate));
    }

    #[test]
    fn income_kind_round_trips() {
        let mut store = open_test_stores().recurring;
        let mut template = rent_template();
        template.kind = RecurringKind::Income;

        let created = store.create(template).unwrap();

        assert_eq!(store.get_by_id(created.id).unwrap().kind, RecurringKind::Income);
    }
}
