//! This file defines the type `RecurringTemplate`, a rule that
//! materialises a concrete expense or income on a set day each month.

use serde::{Deserialize, Serialize};
use time::{Date, OffsetDateTime};

use crate::models::DatabaseID;

/// Whether a recurring template materialises expenses or incomes.
///
/// Recurring templates never produce transfers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecurringKind {
    /// The template materialises an [crate::models::Expense].
    Expense,
    /// The template materialises an [crate::models::Income].
    Income,
}

impl RecurringKind {
    /// The string stored in the database's `kind` column.
    pub(crate) fn as_str(&self) -> &'static str {
        match self {
            RecurringKind::Expense => "expense",
            RecurringKind::Income => "income",
        }
    }
}

/// A rule that materialises a concrete expense or income each month.
///
/// Templates are created by the user, read by the generator each
/// period, and mutated only on their last-triggered date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecurringTemplate {
    /// The ID of the template.
    pub id: DatabaseID,
    /// The day of the month (1-31) on which the template fires. Days
    /// past the end of a month fire on the month's last day.
    pub day_of_month: u8,
    /// The amount of the materialised record. Always greater than zero.
    pub amount: f64,
    /// The account the materialised record is recorded against, if any.
    pub account_id: Option<DatabaseID>,
    /// The category of the materialised record, if any.
    pub category: Option<String>,
    /// The description of the materialised record, if any.
    pub description: Option<String>,
    /// Whether the template materialises expenses or incomes.
    pub kind: RecurringKind,
    /// When the template was created.
    pub created_at: OffsetDateTime,
    /// The date the template last fired, if it has ever fired.
    pub last_triggered: Option<Date>,
}

/// The data needed to create a new [RecurringTemplate].
#[derive(Debug, Clone, PartialEq)]
pub struct NewRecurringTemplate {
    /// The day of the month (1-31) on which the template fires.
    pub day_of_month: u8,
    /// The amount of the materialised record. Must be greater than zero.
    pub amount: f64,
    /// The account the materialised record is recorded against, if any.
    pub account_id: Option<DatabaseID>,
    /// The category of the materialised record, if any.
    pub category: Option<String>,
    /// The description of the materialised record, if any.
    pub description: Option<String>,
    /// Whether the template materialises expenses or incomes.
    pub kind: RecurringKind,
}
