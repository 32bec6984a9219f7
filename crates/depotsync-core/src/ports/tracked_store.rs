//! Tracked-import store port (driven/secondary port)
//!
//! Read-only view of the import ledger: which remote snapshots were
//! imported, with which files and dependency sets. The import pipeline
//! owns the writes; this engine only compares against the records.

use crate::domain::ids::{RemoteRef, StableId};
use crate::domain::tracked::TrackedItem;

/// Port trait for reading tracked-import records
pub trait ITrackedStore: Send + Sync {
    /// Looks up the record for a remote item (any version of it)
    fn get(&self, remote: &RemoteRef) -> Option<TrackedItem>;

    /// Looks up the record joined by local stable identity
    fn get_by_stable_id(&self, id: &StableId) -> Option<TrackedItem>;

    /// Returns all tracked records
    fn all(&self) -> Vec<TrackedItem>;
}
