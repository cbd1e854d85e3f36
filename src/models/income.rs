//! This file defines the type `Income`, an event where money was earned
//! or otherwise credited to an account.

use serde::{Deserialize, Serialize};
use time::{Date, OffsetDateTime};

use crate::models::DatabaseID;

/// An event where money was credited to an account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Income {
    /// The ID of the income.
    pub id: DatabaseID,
    /// The ID of the account the money was credited to, if one was
    /// recorded.
    pub account_id: Option<DatabaseID>,
    /// The amount of money received. Always greater than zero.
    pub amount: f64,
    /// A user-defined category that describes the type of the income.
    pub category: Option<String>,
    /// A text description of where the income came from.
    pub description: Option<String>,
    /// When the income happened.
    pub date: Date,
    /// When the income was recorded.
    pub created_at: OffsetDateTime,
    /// The recurring template that materialised this income, if any.
    /// `None` means the income was entered manually.
    pub recurring_id: Option<DatabaseID>,
    /// The transfer whose credit leg this income is, if any. `None`
    /// means the income is not a by-product of a transfer.
    pub transfer_id: Option<DatabaseID>,
}

/// The data needed to create a new [Income].
///
/// The ID and creation timestamp are assigned by the store.
#[derive(Debug, Clone, PartialEq)]
pub struct NewIncome {
    /// The ID of the account the money was credited to, if any.
    pub account_id: Option<DatabaseID>,
    /// The amount of money received. Must be greater than zero.
    pub amount: f64,
    /// A user-defined category that describes the type of the income.
    pub category: Option<String>,
    /// A text description of where the income came from.
    pub description: Option<String>,
    /// When the income happened.
    pub date: Date,
    /// The recurring template that materialised this income, if any.
    pub recurring_id: Option<DatabaseID>,
    /// The transfer whose credit leg this income is, if any.
    pub transfer_id: Option<DatabaseID>,
}

impl NewIncome {
    /// A new manually entered income with no category or description
    /// and no recurring or transfer origin.
    pub fn new(account_id: Option<DatabaseID>, amount: f64, date: Date) -> Self {
        Self {
            account_id,
            amount,
            category: None,
            description: None,
            date,
            recurring_id: None,
            transfer_id: None,
        }
    }
}
