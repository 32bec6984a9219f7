//! Tracked-import model (consumption side)
//!
//! A [`TrackedItem`] records what was last imported from the remote store:
//! which snapshot, which files (with checksums and timestamps), and which
//! dependency identities the snapshot carried. The update/conflict checker
//! compares these records against the remote store and the local disk;
//! [`SyncCheckResult`] is its per-item answer, computed fresh per check and
//! never persisted.

use std::collections::BTreeSet;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ids::{RemoteRef, StableId};

// ============================================================================
// TrackedFile
// ============================================================================

/// One file as recorded at import time
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackedFile {
    /// Absolute local path the file was written to
    pub path: PathBuf,
    /// Content checksum recorded at import (lowercase hex SHA-256)
    pub checksum: String,
    /// Modification timestamp recorded at import
    pub modified: DateTime<Utc>,
}

// ============================================================================
// TrackedItem
// ============================================================================

/// A previously-imported item with recorded version and checksum state
///
/// Mutated by the import pipeline on successful import/update and removed
/// on local removal; this engine only reads it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackedItem {
    /// The remote snapshot that was imported
    pub remote: RemoteRef,
    /// Locally recorded sequence number (version pointer at import time)
    pub sequence: u64,
    /// Remote "last updated" timestamp recorded at import
    pub last_updated: DateTime<Utc>,
    /// Files written by the import, with recorded checksums
    pub files: Vec<TrackedFile>,
    /// Dependency identifier set recorded at import time
    pub dependencies: BTreeSet<StableId>,
    /// Stable identity of the local item, when it still exists locally
    pub stable_id: Option<StableId>,
}

impl TrackedItem {
    /// Creates a tracked record for a freshly imported snapshot
    pub fn new(remote: RemoteRef, sequence: u64, last_updated: DateTime<Utc>) -> Self {
        Self {
            remote,
            sequence,
            last_updated,
            files: Vec::new(),
            dependencies: BTreeSet::new(),
            stable_id: None,
        }
    }

    /// Returns true if this record lists the given identity as a dependency
    pub fn depends_on(&self, id: &StableId) -> bool {
        self.dependencies.contains(id)
    }
}

// ============================================================================
// SyncCheckResult
// ============================================================================

/// A file whose on-disk state diverges from the tracked record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileConflict {
    /// Local path of the conflicting file
    pub path: PathBuf,
    /// Checksum recorded at import
    pub recorded_checksum: String,
    /// Current on-disk checksum, `None` when the file is missing
    pub current_checksum: Option<String>,
}

impl FileConflict {
    /// Returns true when the file has been deleted locally
    pub fn is_missing(&self) -> bool {
        self.current_checksum.is_none()
    }
}

/// Result of checking one tracked item for staleness and divergence
///
/// Computed fresh on every check pass; not persisted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SyncCheckResult {
    /// A newer version exists in the remote store
    pub has_remote_changes: bool,
    /// The remote "last updated" timestamp differs from the tracked one
    pub is_modified: bool,
    /// The locally recorded sequence number
    pub current_version_index: u64,
    /// True when the local sequence matches the remote latest
    pub is_latest_version: bool,
    /// Files whose local state diverges from the tracked record
    pub file_conflicts: Vec<FileConflict>,
    /// Locally edited-but-unsaved objects tied to a conflicting file
    pub dirty_local_objects: Vec<StableId>,
    /// Set when the remote comparison failed (transient error marker);
    /// distinguishes "could not check" from "no changes"
    pub error: Option<String>,
}

impl SyncCheckResult {
    /// Returns true if anything needs the operator's attention
    pub fn needs_attention(&self) -> bool {
        self.has_remote_changes || !self.file_conflicts.is_empty() || self.error.is_some()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn remote() -> RemoteRef {
        RemoteRef::new("acme", "city-builder", "pkg-road-tiles", 3).unwrap()
    }

    #[test]
    fn test_new_tracked_item() {
        let item = TrackedItem::new(remote(), 3, Utc::now());
        assert_eq!(item.sequence, 3);
        assert!(item.files.is_empty());
        assert!(item.dependencies.is_empty());
        assert!(item.stable_id.is_none());
    }

    #[test]
    fn test_depends_on() {
        let dep = StableId::new();
        let mut item = TrackedItem::new(remote(), 1, Utc::now());
        item.dependencies.insert(dep);

        assert!(item.depends_on(&dep));
        assert!(!item.depends_on(&StableId::new()));
    }

    #[test]
    fn test_file_conflict_missing() {
        let conflict = FileConflict {
            path: PathBuf::from("/project/tiles/curve.mesh"),
            recorded_checksum: "abc".to_string(),
            current_checksum: None,
        };
        assert!(conflict.is_missing());
    }

    #[test]
    fn test_check_result_needs_attention() {
        let mut result = SyncCheckResult::default();
        assert!(!result.needs_attention());

        result.has_remote_changes = true;
        assert!(result.needs_attention());

        let mut result = SyncCheckResult::default();
        result.file_conflicts.push(FileConflict {
            path: PathBuf::from("/f"),
            recorded_checksum: "a".to_string(),
            current_checksum: Some("b".to_string()),
        });
        assert!(result.needs_attention());

        let mut result = SyncCheckResult::default();
        result.error = Some("network unreachable".to_string());
        assert!(result.needs_attention());
    }

    #[test]
    fn test_tracked_item_serde_roundtrip() {
        let mut item = TrackedItem::new(remote(), 3, Utc::now());
        item.files.push(TrackedFile {
            path: PathBuf::from("/project/tiles/straight.mesh"),
            checksum: "deadbeef".to_string(),
            modified: Utc::now(),
        });
        item.dependencies.insert(StableId::new());

        let json = serde_json::to_string(&item).unwrap();
        let parsed: TrackedItem = serde_json::from_str(&json).unwrap();
        assert_eq!(item, parsed);
    }
}
