//! Defines the profile store trait.

use crate::{
    Error,
    models::{DatabaseID, NewProfile, Profile},
};

/// Handles the single-row user profile.
pub trait ProfileStore {
    /// Retrieve the profile, or `None` if none has been saved yet.
    ///
    /// The absence of a profile is expected on first run and is not an
    /// error.
    fn get(&self) -> Result<Option<Profile>, Error>;

    /// Create the profile, or overwrite the existing one's settings
    /// while keeping its id and creation timestamp.
    fn save(&mut self, new_profile: NewProfile) -> Result<Profile, Error>;

    /// Delete the profile with `id` along with every account and
    /// expense, in a single all-or-nothing transaction.
    fn clear(&mut self, id: DatabaseID) -> Result<(), Error>;
}
