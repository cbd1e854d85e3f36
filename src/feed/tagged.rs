//! The tagged transaction projection used for unified display.

use serde::{Deserialize, Serialize};
use time::Date;

use crate::models::{DatabaseID, Expense, Income, TransferView};

/// Discriminates the three transaction kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionKind {
    /// An [Expense].
    Expense,
    /// An [Income].
    Income,
    /// A [transfer](crate::models::Transfer).
    Transfer,
}

/// A record from one of the three collections, tagged with its kind.
///
/// Tagging is a non-destructive projection: the wrapped record is a
/// clone of the collection's record with no field changed. Tagged
/// transactions are transient display objects and are never persisted.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "transactionKind", rename_all = "snake_case")]
pub enum TaggedTransaction {
    /// A tagged expense.
    Expense(Expense),
    /// A tagged income.
    Income(Income),
    /// A tagged transfer with its joined legs.
    Transfer(TransferView),
}

impl TaggedTransaction {
    /// The kind of the collection the record came from.
    pub fn kind(&self) -> TransactionKind {
        match self {
            TaggedTransaction::Expense(_) => TransactionKind::Expense,
            TaggedTransaction::Income(_) => TransactionKind::Income,
            TaggedTransaction::Transfer(_) => TransactionKind::Transfer,
        }
    }

    /// The id of the underlying record.
    pub fn id(&self) -> DatabaseID {
        match self {
            TaggedTransaction::Expense(expense) => expense.id,
            TaggedTransaction::Income(income) => income.id,
            TaggedTransaction::Transfer(view) => view.transfer.id,
        }
    }

    /// The date of the underlying record, used for feed ordering.
    pub fn date(&self) -> Date {
        match self {
            TaggedTransaction::Expense(expense) => expense.date,
            TaggedTransaction::Income(income) => income.date,
            TaggedTransaction::Transfer(view) => view.transfer.date,
        }
    }

    /// The amount of money the underlying record moves.
    pub fn amount(&self) -> f64 {
        match self {
            TaggedTransaction::Expense(expense) => expense.amount,
            TaggedTransaction::Income(income) => income.amount,
            TaggedTransaction::Transfer(view) => view.transfer.amount,
        }
    }

    /// The recurring template the record was materialised from, if
    /// any. Transfers never have a recurring origin.
    pub fn recurring_id(&self) -> Option<DatabaseID> {
        match self {
            TaggedTransaction::Expense(expense) => expense.recurring_id,
            TaggedTransaction::Income(income) => income.recurring_id,
            TaggedTransaction::Transfer(_) => None,
        }
    }
}
