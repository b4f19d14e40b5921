//! A roster bound to its storage.
//!
//! [`Session`] is the owned replacement for process-wide roster state: the
//! shell opens one, reads through [`Session::roster`], and mutates through
//! [`Session::add`], which persists after every successful append.

use tracing::{info, warn};

use crate::date_math::LeapDayPolicy;
use crate::model::BirthdayRecord;
use crate::roster::{Roster, RosterError};
use crate::store::{PersistenceGateway, StoreError, load_or_seed};

/// Whether the roster reached storage after a mutation.
///
/// A failed write does not undo the in-memory append; the in-memory roster
/// stays authoritative for the rest of the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome {
    Saved,
    Failed(String),
}

impl SaveOutcome {
    #[must_use]
    pub const fn is_saved(&self) -> bool {
        matches!(self, Self::Saved)
    }
}

/// Result of a successful [`Session::add`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Added {
    pub record: BirthdayRecord,
    pub save: SaveOutcome,
}

#[derive(Debug)]
pub struct Session<G> {
    roster: Roster,
    gateway: G,
}

impl<G: PersistenceGateway> Session<G> {
    /// Load (or seed) the roster from `gateway`.
    ///
    /// # Errors
    ///
    /// Propagates storage access failures; unreadable content reseeds instead.
    pub fn open(
        mut gateway: G,
        max_records: usize,
        leap_policy: LeapDayPolicy,
    ) -> Result<Self, StoreError> {
        let records = load_or_seed(&mut gateway)?;
        Ok(Self {
            roster: Roster::with_records(records, max_records, leap_policy),
            gateway,
        })
    }

    #[must_use]
    pub const fn roster(&self) -> &Roster {
        &self.roster
    }

    #[must_use]
    pub const fn gateway(&self) -> &G {
        &self.gateway
    }

    /// Validate and append, then persist the whole roster.
    ///
    /// # Errors
    ///
    /// Returns [`RosterError`] when the add is refused; nothing is written in
    /// that case.
    pub fn add(&mut self, name: &str, date: &str) -> Result<Added, RosterError> {
        let record = self.roster.add(name, date)?.clone();
        info!(name = %record.name, date = %record.date, "birthday added");
        let save = match self.gateway.save(self.roster.records()) {
            Ok(()) => SaveOutcome::Saved,
            Err(error) => {
                warn!(%error, "roster write failed; keeping in-memory roster");
                SaveOutcome::Failed(error.to_string())
            }
        };
        Ok(Added { record, save })
    }
}
