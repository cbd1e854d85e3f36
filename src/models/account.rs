//! This file defines the type `Account`, the money store that expenses,
//! incomes and transfers are recorded against.

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::models::DatabaseID;

/// The kind of an account, carrying the money fields that only make
/// sense for that kind.
///
/// Bank accounts and debit cards hold a balance; credit cards hold a
/// credit limit and a billing cycle instead. Representing the kind as a
/// data-carrying enum makes the two field sets mutually exclusive by
/// construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AccountKind {
    /// A credit card with a spending limit and a billing cycle.
    #[serde(rename_all = "camelCase")]
    CreditCard {
        /// The maximum amount that can be charged to the card.
        credit_limit: f64,
        /// The day of the month (1-31) on which the billing cycle opens.
        billing_cycle_start: u8,
        /// The day of the month (1-31) on which the billing cycle closes.
        billing_cycle_end: u8,
    },
    /// A debit card holding a balance.
    DebitCard {
        /// The money currently available on the card.
        balance: f64,
    },
    /// A bank account holding a balance.
    BankAccount {
        /// The money currently held in the account.
        balance: f64,
    },
}

impl AccountKind {
    /// The balance of the account, for the kinds that carry one.
    ///
    /// Credit cards have no balance, so this returns `None` for them.
    pub fn balance(&self) -> Option<f64> {
        match self {
            AccountKind::CreditCard { .. } => None,
            AccountKind::DebitCard { balance } | AccountKind::BankAccount { balance } => {
                Some(*balance)
            }
        }
    }

    /// The string stored in the database's `kind` column.
    pub(crate) fn as_str(&self) -> &'static str {
        match self {
            AccountKind::CreditCard { .. } => "credit_card",
            AccountKind::DebitCard { .. } => "debit_card",
            AccountKind::BankAccount { .. } => "bank_account",
        }
    }
}

/// An account that transactions are recorded against.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    /// The ID of the account.
    pub id: DatabaseID,
    /// The display name of the account. Unique across accounts.
    pub name: String,
    /// The kind of the account and its kind-specific money fields.
    #[serde(flatten)]
    pub kind: AccountKind,
    /// When the account was created.
    pub created_at: OffsetDateTime,
}

/// The data needed to create a new [Account].
#[derive(Debug, Clone, PartialEq)]
pub struct NewAccount {
    /// The display name of the account.
    pub name: String,
    /// The kind of the account and its kind-specific money fields.
    pub kind: AccountKind,
}
