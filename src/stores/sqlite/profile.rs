//! Implements a SQLite backed profile store.

use std::sync::{Arc, Mutex};

use rusqlite::{Connection, OptionalExtension, Row};
use time::OffsetDateTime;

use crate::{
    Error,
    db::{CreateTable, MapRow},
    models::{DatabaseID, NewProfile, Profile},
    stores::ProfileStore,
};

const SELECT_PROFILE: &str =
    "SELECT id, monthly_income, currency, created_at, updated_at FROM profile";

/// Stores the single-row user profile in a SQLite database.
#[derive(Debug, Clone)]
pub struct SQLiteProfileStore {
    connection: Arc<Mutex<Connection>>,
}

impl SQLiteProfileStore {
    /// Create a new store for the SQLite `connection`.
    pub fn new(connection: Arc<Mutex<Connection>>) -> Self {
        Self { connection }
    }
}

impl ProfileStore for SQLiteProfileStore {
    fn get(&self) -> Result<Option<Profile>, Error> {
        let profile = self
            .connection
            .lock()
            .unwrap()
            .prepare(&format!("{SELECT_PROFILE} LIMIT 1"))?
            .query_row([], Self::map_row)
            .optional()?;

        Ok(profile)
    }

    fn save(&mut self, new_profile: NewProfile) -> Result<Profile, Error> {
        let now = OffsetDateTime::now_utc();

        if let Some(existing) = self.get()? {
            self.connection.lock().unwrap().execute(
                "UPDATE profile SET monthly_income = ?1, currency = ?2, updated_at = ?3 \
                 WHERE id = ?4",
                (
                    new_profile.monthly_income,
                    &new_profile.currency,
                    now,
                    existing.id,
                ),
            )?;

            return Ok(Profile {
                monthly_income: new_profile.monthly_income,
                currency: new_profile.currency,
                updated_at: now,
                ..existing
            });
        }

        let profile = self
            .connection
            .lock()
            .unwrap()
            .prepare(
                "INSERT INTO profile (monthly_income, currency, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4)
                 RETURNING id, monthly_income, currency, created_at, updated_at",
            )?
            .query_row(
                (new_profile.monthly_income, &new_profile.currency, now, now),
                Self::map_row,
            )?;

        Ok(profile)
    }

    fn clear(&mut self, id: DatabaseID) -> Result<(), Error> {
        let connection = self.connection.lock().unwrap();
        let transaction = connection.unchecked_transaction()?;

        transaction.execute("DELETE FROM expense", ())?;
        transaction.execute("DELETE FROM account", ())?;
        transaction.execute("DELETE FROM profile WHERE id = ?1", (id,))?;

        transaction.commit()?;

        Ok(())
    }
}

impl CreateTable for SQLiteProfileStore {
    fn create_table(connection: &Connection) -> Result<(), rusqlite::Error> {
        connection.execute(
            "CREATE TABLE IF NOT EXISTS profile (
                    id INTEGER PRIMARY KEY AUTOINCREMENT,
                    monthly_income REAL NOT NULL,
                    currency TEXT NOT NULL,
                    created_at TEXT NOT NULL,
                    updated_at TEXT NOT NULL
                    )",
            (),
        )?;

        Ok(())
    }
}

impl MapRow for SQLiteProfileStore {
    type ReturnType = Profile;

    fn map_row_with_offset(row: &Row, offset: usize) -> Result<Self::ReturnType, rusqlite::Error> {
        Ok(Profile {
            id: row.get(offset)?,
            monthly_income: row.get(offset + 1)?,
            currency: row.get(offset + 2)?,
            created_at: row.get(offset + 3)?,
            updated_at: row.get(offset + 4)?,
        })
    }
}

#[cfg(test)]
mod sqlite_profile_store_tests {
    use time::macros::date;

    use crate::{
        models::{AccountKind, NewAccount, NewExpense, NewIncome, NewProfile},
        stores::{AccountStore, ExpenseStore, IncomeStore, ProfileStore, sqlite::open_test_stores},
    };

    fn profile_data() -> NewProfile {
        NewProfile {
            monthly_income: 4000.0,
            currency: "USD".to_string(),
        }
    }

    #[test]
    fn get_returns_none_before_first_save() {
        let store = open_test_stores().profile;

        assert_eq!(store.get(), Ok(None));
    }

    #[test]
    fn save_creates_the_profile() {
        let mut store = open_test_stores().profile;

        let profile = store.save(profile_data()).unwrap();

        assert!(profile.id > 0);
        assert_eq!(profile.monthly_income, 4000.0);
        assert_eq!(profile.currency, "USD");
        assert_eq!(store.get(), Ok(Some(profile)));
    }

    #[test]
    fn save_overwrites_settings_but_keeps_identity() {
        let mut store = open_test_stores().profile;
        let original = store.save(profile_data()).unwrap();

        let updated = store
            .save(NewProfile {
                monthly_income: 4500.0,
                currency: "EUR".to_string(),
            })
            .unwrap();

        assert_eq!(updated.id, original.id);
        assert_eq!(updated.created_at, original.created_at);
        assert_eq!(updated.monthly_income, 4500.0);
        assert_eq!(updated.currency, "EUR");
    }

    #[test]
    fn clear_wipes_profile_accounts_and_expenses() {
        let stores = open_test_stores();
        let mut profile_store = stores.profile;
        let mut account_store = stores.accounts;
        let mut expense_store = stores.expenses;
        let mut income_store = stores.incomes;

        let profile = profile_store.save(profile_data()).unwrap();
        let account = account_store
            .create(NewAccount {
                name: "Checking".to_string(),
                kind: AccountKind::BankAccount { balance: 100.0 },
            })
            .unwrap();
        expense_store
            .create(NewExpense::new(
                account.id,
                10.0,
                "groceries",
                date!(2024 - 01 - 01),
            ))
            .unwrap();
        let kept_income = income_store
            .create(NewIncome::new(Some(account.id), 50.0, date!(2024 - 01 - 02)))
            .unwrap();

        profile_store.clear(profile.id).unwrap();

        assert_eq!(profile_store.get(), Ok(None));
        assert_eq!(account_store.get_all().unwrap(), vec![]);
        assert_eq!(expense_store.get_all().unwrap(), vec![]);
        // Incomes are outside the scope of a profile wipe.
        assert_eq!(income_store.get_all().unwrap(), vec![kept_income]);
    }
}
