//! Implements a SQLite backed account store.

use std::sync::{Arc, Mutex};

use rusqlite::{Connection, Row};
use time::OffsetDateTime;

use crate::{
    Error,
    db::{CreateTable, MapRow},
    models::{Account, AccountKind, DatabaseID, NewAccount, check_day_of_month},
    stores::AccountStore,
};

const SELECT_ACCOUNT: &str = "SELECT id, name, kind, balance, credit_limit, \
     billing_cycle_start, billing_cycle_end, created_at FROM account";

/// Stores accounts in a SQLite database.
#[derive(Debug, Clone)]
pub struct SQLiteAccountStore {
    connection: Arc<Mutex<Connection>>,
}

impl SQLiteAccountStore {
    /// Create a new store for the SQLite `connection`.
    pub fn new(connection: Arc<Mutex<Connection>>) -> Self {
        Self { connection }
    }
}

/// Split an [AccountKind] into the nullable column values it is stored
/// as.
fn kind_columns(kind: &AccountKind) -> (Option<f64>, Option<f64>, Option<u8>, Option<u8>) {
    match kind {
        AccountKind::CreditCard {
            credit_limit,
            billing_cycle_start,
            billing_cycle_end,
        } => (
            None,
            Some(*credit_limit),
            Some(*billing_cycle_start),
            Some(*billing_cycle_end),
        ),
        AccountKind::DebitCard { balance } | AccountKind::BankAccount { balance } => {
            (Some(*balance), None, None, None)
        }
    }
}

fn check_kind(kind: &AccountKind) -> Result<(), Error> {
    if let AccountKind::CreditCard {
        billing_cycle_start,
        billing_cycle_end,
        ..
    } = kind
    {
        check_day_of_month(*billing_cycle_start)?;
        check_day_of_month(*billing_cycle_end)?;
    }

    Ok(())
}

impl AccountStore for SQLiteAccountStore {
    fn create(&mut self, new_account: NewAccount) -> Result<Account, Error> {
        check_kind(&new_account.kind)?;

        let (balance, credit_limit, cycle_start, cycle_end) = kind_columns(&new_account.kind);
        let created_at = OffsetDateTime::now_utc();

        let account = self
            .connection
            .lock()
            .unwrap()
            .prepare(
                "INSERT INTO account (name, kind, balance, credit_limit, billing_cycle_start, \
                 billing_cycle_end, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
                 RETURNING id, name, kind, balance, credit_limit, billing_cycle_start, \
                 billing_cycle_end, created_at",
            )?
            .query_row(
                (
                    &new_account.name,
                    new_account.kind.as_str(),
                    balance,
                    credit_limit,
                    cycle_start,
                    cycle_end,
                    created_at,
                ),
                Self::map_row,
            )
            .map_err(|error| match error {
                // Code 2067 occurs when a UNIQUE constraint failed.
                rusqlite::Error::SqliteFailure(error, Some(_)) if error.extended_code == 2067 => {
                    Error::DuplicateAccountName(new_account.name.clone())
                }
                error => error.into(),
            })?;

        Ok(account)
    }

    fn get_by_id(&self, id: DatabaseID) -> Result<Account, Error> {
        let account = self
            .connection
            .lock()
            .unwrap()
            .prepare(&format!("{SELECT_ACCOUNT} WHERE id = :id"))?
            .query_row(&[(":id", &id)], Self::map_row)?;

        Ok(account)
    }

    fn get_all(&self) -> Result<Vec<Account>, Error> {
        self.connection
            .lock()
            .unwrap()
            .prepare(SELECT_ACCOUNT)?
            .query_map([], Self::map_row)?
            .map(|maybe_account| maybe_account.map_err(Error::SqlError))
            .collect()
    }

    fn update(&mut self, account: &Account) -> Result<(), Error> {
        check_kind(&account.kind)?;

        let (balance, credit_limit, cycle_start, cycle_end) = kind_columns(&account.kind);

        let rows_updated = self
            .connection
            .lock()
            .unwrap()
            .execute(
                "UPDATE account SET name = ?1, kind = ?2, balance = ?3, credit_limit = ?4, \
                 billing_cycle_start = ?5, billing_cycle_end = ?6 WHERE id = ?7",
                (
                    &account.name,
                    account.kind.as_str(),
                    balance,
                    credit_limit,
                    cycle_start,
                    cycle_end,
                    account.id,
                ),
            )
            .map_err(|error| match error {
                rusqlite::Error::SqliteFailure(error, Some(_)) if error.extended_code == 2067 => {
                    Error::DuplicateAccountName(account.name.clone())
                }
                error => error.into(),
            })?;

        if rows_updated == 0 {
            return Err(Error::UpdateMissingAccount);
        }

        Ok(())
    }

    fn delete(&mut self, id: DatabaseID) -> Result<(), Error> {
        self.connection
            .lock()
            .unwrap()
            .execute("DELETE FROM account WHERE id = ?1", (id,))?;

        Ok(())
    }

    fn delete_with_expenses(&mut self, id: DatabaseID) -> Result<(), Error> {
        let connection = self.connection.lock().unwrap();
        let transaction = connection.unchecked_transaction()?;

        transaction.execute("DELETE FROM expense WHERE account_id = ?1", (id,))?;
        transaction.execute("DELETE FROM account WHERE id = ?1", (id,))?;

        transaction.commit()?;

        Ok(())
    }
}

impl CreateTable for SQLiteAccountStore {
    fn create_table(connection: &Connection) -> Result<(), rusqlite::Error> {
        connection.execute(
            "CREATE TABLE IF NOT EXISTS account (
                    id INTEGER PRIMARY KEY AUTOINCREMENT,
                    name TEXT NOT NULL UNIQUE,
                    kind TEXT NOT NULL,
                    balance REAL,
                    credit_limit REAL,
                    billing_cycle_start INTEGER,
                    billing_cycle_end INTEGER,
                    created_at TEXT NOT NULL
                    )",
            (),
        )?;

        Ok(())
    }
}

impl MapRow for SQLiteAccountStore {
    type ReturnType = Account;

    fn map_row_with_offset(row: &Row, offset: usize) -> Result<Self::ReturnType, rusqlite::Error> {
        let kind_name: String = row.get(offset + 2)?;

        let kind = match kind_name.as_str() {
            "credit_card" => AccountKind::CreditCard {
                credit_limit: row.get(offset + 4)?,
                billing_cycle_start: row.get(offset + 5)?,
                billing_cycle_end: row.get(offset + 6)?,
            },
            "debit_card" => AccountKind::DebitCard {
                balance: row.get(offset + 3)?,
            },
            "bank_account" => AccountKind::BankAccount {
                balance: row.get(offset + 3)?,
            },
            other => {
                return Err(rusqlite::Error::FromSqlConversionFailure(
                    offset + 2,
                    rusqlite::types::Type::Text,
                    format!("unknown account kind \"{other}\"").into(),
                ));
            }
        };

        Ok(Account {
            id: row.get(offset)?,
            name: row.get(offset + 1)?,
            kind,
            created_at: row.get(offset + 7)?,
        })
    }
}
