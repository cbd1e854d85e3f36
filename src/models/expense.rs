//! This file defines the type `Expense`, an event where money was spent
//! from an account.

use serde::{Deserialize, Serialize};
use time::{Date, OffsetDateTime};

use crate::models::DatabaseID;

/// An event where money was spent from an account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Expense {
    /// The ID of the expense.
    pub id: DatabaseID,
    /// The ID of the account the money was spent from.
    pub account_id: DatabaseID,
    /// The amount of money spent. Always greater than zero.
    pub amount: f64,
    /// A user-defined category that describes the type of the expense.
    pub category: String,
    /// A text description of what the expense was for.
    pub description: Option<String>,
    /// When the expense happened.
    pub date: Date,
    /// When the expense was recorded.
    pub created_at: OffsetDateTime,
    /// Whether the expense is one payment of an installment plan.
    pub installment: bool,
    /// The recurring template that materialised this expense, if any.
    /// `None` means the expense was entered manually.
    pub recurring_id: Option<DatabaseID>,
    /// The transfer whose debit leg this expense is, if any. `None`
    /// means the expense is not a by-product of a transfer.
    pub transfer_id: Option<DatabaseID>,
}

/// The data needed to create a new [Expense].
///
/// The ID and creation timestamp are assigned by the store.
#[derive(Debug, Clone, PartialEq)]
pub struct NewExpense {
    /// The ID of the account the money was spent from.
    pub account_id: DatabaseID,
    /// The amount of money spent. Must be greater than zero.
    pub amount: f64,
    /// A user-defined category that describes the type of the expense.
    pub category: String,
    /// A text description of what the expense was for.
    pub description: Option<String>,
    /// When the expense happened.
    pub date: Date,
    /// Whether the expense is one payment of an installment plan.
    pub installment: bool,
    /// The recurring template that materialised this expense, if any.
    pub recurring_id: Option<DatabaseID>,
    /// The transfer whose debit leg this expense is, if any.
    pub transfer_id: Option<DatabaseID>,
}

impl NewExpense {
    /// A new manually entered expense with no description and no
    /// recurring or transfer origin.
    pub fn new(account_id: DatabaseID, amount: f64, category: &str, date: Date) -> Self {
        Self {
            account_id,
            amount,
            category: category.to_owned(),
            description: None,
            date,
            installment: false,
            recurring_id: None,
            transfer_id: None,
        }
    }
}
