//! Dirty-record accounting and the local half of a sync push.
//!
//! A record is "pending" while its `isDirty` flag is set. Pushing re-saves
//! every pending record with the synced stamp, which clears the flag and
//! records `lastSyncedAt`. Transport to a remote endpoint is out of scope;
//! callers hand the dirty records to whatever channel they have and then
//! confirm with [`push_pending`].

use crate::error::CoreResult;
use crate::store::{Store, COLLECTIONS};
use tracing::info;

/// Pending (dirty) record counts per collection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PendingCounts {
    /// Dirty contracts.
    pub contracts: usize,
    /// Dirty measurements.
    pub measurements: usize,
    /// Dirty streets.
    pub streets: usize,
    /// Dirty segments.
    pub segments: usize,
    /// Dirty professionals.
    pub professionals: usize,
    /// Dirty curb services.
    pub services: usize,
}

impl PendingCounts {
    /// Total pending records across all collections.
    #[must_use]
    pub fn total(&self) -> usize {
        self.contracts
            + self.measurements
            + self.streets
            + self.segments
            + self.professionals
            + self.services
    }

    fn slot_mut(&mut self, collection: &str) -> Option<&mut usize> {
        match collection {
            "contratos" => Some(&mut self.contracts),
            "medicoes" => Some(&mut self.measurements),
            "ruas" => Some(&mut self.streets),
            "trechos" => Some(&mut self.segments),
            "profissionais" => Some(&mut self.professionals),
            "servicos" => Some(&mut self.services),
            _ => None,
        }
    }
}

/// Counts pending records in every collection.
pub fn pending_counts(store: &Store) -> CoreResult<PendingCounts> {
    let mut counts = PendingCounts::default();
    for collection in COLLECTIONS {
        if let Some(slot) = counts.slot_mut(collection) {
            *slot = store.dirty_count(collection)?;
        }
    }
    Ok(counts)
}

/// Marks every pending record as synced.
///
/// Re-saves each dirty record with the synced stamp, clearing `isDirty`
/// and setting `lastSyncedAt`. Returns the counts of what was confirmed,
/// taken before the flags were cleared.
pub fn push_pending(store: &Store) -> CoreResult<PendingCounts> {
    let mut counts = PendingCounts::default();

    for collection in COLLECTIONS {
        let dirty = store.get_dirty_raw(collection)?;
        if let Some(slot) = counts.slot_mut(collection) {
            *slot = dirty.len();
        }
        for record in dirty {
            store.save_raw(collection, record, true)?;
        }
    }

    info!(confirmed = counts.total(), "pending records marked synced");
    Ok(counts)
}
