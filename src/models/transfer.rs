//! This file defines the type `Transfer`, a movement of money between
//! two accounts, and the `TransferView` that joins a transfer to the
//! expense and income records representing its two legs.

use serde::{Deserialize, Serialize};
use time::{Date, OffsetDateTime};

use crate::models::{DatabaseID, Expense, Income};

/// A movement of money from one account to another.
///
/// A transfer is stored standalone, but creating one through the
/// transfer collection also materialises an [Expense] debiting the
/// source account and an [Income] crediting the destination account.
/// The ids of those two legs are recorded on the transfer so they can
/// be joined back without guessing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transfer {
    /// The ID of the transfer.
    pub id: DatabaseID,
    /// The ID of the account the money was moved from.
    pub from_account_id: DatabaseID,
    /// The ID of the account the money was moved to.
    pub to_account_id: DatabaseID,
    /// The amount of money moved. Always greater than zero.
    pub amount: f64,
    /// When the transfer happened.
    pub date: Date,
    /// A text description of what the transfer was for.
    pub description: Option<String>,
    /// When the transfer was recorded.
    pub created_at: OffsetDateTime,
    /// The ID of the expense that debits the source account, set by
    /// the component that materialises the legs.
    pub expense_leg_id: Option<DatabaseID>,
    /// The ID of the income that credits the destination account, set
    /// by the component that materialises the legs.
    pub income_leg_id: Option<DatabaseID>,
}

/// The data needed to create a new [Transfer].
///
/// The ID, creation timestamp and leg ids are assigned during
/// creation.
#[derive(Debug, Clone, PartialEq)]
pub struct NewTransfer {
    /// The ID of the account the money is moved from.
    pub from_account_id: DatabaseID,
    /// The ID of the account the money is moved to.
    pub to_account_id: DatabaseID,
    /// The amount of money to move. Must be greater than zero.
    pub amount: f64,
    /// When the transfer happened.
    pub date: Date,
    /// A text description of what the transfer is for.
    pub description: Option<String>,
}

/// A transfer joined to the expense and income records for its legs.
///
/// A missing leg is represented as `None` rather than an error: the
/// join is best-effort and the legs may have been removed
/// independently.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferView {
    /// The transfer itself.
    #[serde(flatten)]
    pub transfer: Transfer,
    /// The expense that debits the source account, if it was found.
    pub expense: Option<Expense>,
    /// The income that credits the destination account, if it was
    /// found.
    pub income: Option<Income>,
}
