//! Tracked-import ledger - JSON-backed tracked store
//!
//! The import pipeline appends a record per imported snapshot; this
//! adapter reads the resulting ledger and serves it through the
//! [`ITrackedStore`] port. The engines never write to it.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use depotsync_core::domain::ids::{RemoteRef, StableId};
use depotsync_core::domain::tracked::TrackedItem;
use depotsync_core::ports::tracked_store::ITrackedStore;

use crate::WorkspaceError;

/// On-disk ledger format
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct LedgerFileFormat {
    records: Vec<TrackedItem>,
}

/// Read-only tracked store over a loaded ledger
pub struct TrackedLedger {
    records: Vec<TrackedItem>,
}

impl TrackedLedger {
    /// Loads a ledger from a JSON file
    ///
    /// A missing file yields an empty ledger: a workspace that never
    /// imported anything simply has no records yet.
    pub fn load(path: &Path) -> Result<Self, WorkspaceError> {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "No ledger file, starting empty");
                return Ok(Self {
                    records: Vec::new(),
                });
            }
            Err(source) => {
                return Err(WorkspaceError::Io {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };

        let format: LedgerFileFormat =
            serde_json::from_str(&content).map_err(|source| WorkspaceError::Serialization {
                path: path.to_path_buf(),
                source,
            })?;

        debug!(records = format.records.len(), "Loaded tracked ledger");
        Ok(Self {
            records: format.records,
        })
    }

    /// Builds a ledger from in-memory records
    pub fn from_records(records: Vec<TrackedItem>) -> Self {
        Self { records }
    }

    /// Number of tracked records
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns true when no imports are recorded
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl ITrackedStore for TrackedLedger {
    fn get(&self, remote: &RemoteRef) -> Option<TrackedItem> {
        self.records
            .iter()
            .find(|r| r.remote.same_item(remote))
            .cloned()
    }

    fn get_by_stable_id(&self, id: &StableId) -> Option<TrackedItem> {
        self.records
            .iter()
            .find(|r| r.stable_id.as_ref() == Some(id))
            .cloned()
    }

    fn all(&self) -> Vec<TrackedItem> {
        self.records.clone()
    }
}
