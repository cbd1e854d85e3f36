//! This file defines the type `Profile`, the single row of user-level
//! settings.

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::models::DatabaseID;

/// User-level settings. At most one profile exists at a time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    /// The ID of the profile.
    pub id: DatabaseID,
    /// The user's expected monthly income.
    pub monthly_income: f64,
    /// The display currency, e.g. "USD".
    pub currency: String,
    /// When the profile was created.
    pub created_at: OffsetDateTime,
    /// When the profile was last modified.
    pub updated_at: OffsetDateTime,
}

/// The data needed to create or replace the [Profile].
#[derive(Debug, Clone, PartialEq)]
pub struct NewProfile {
    /// The user's expected monthly income.
    pub monthly_income: f64,
    /// The display currency, e.g. "USD".
    pub currency: String,
}
