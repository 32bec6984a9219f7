//! File conflict scanning
//!
//! Compares each tracked file's recorded checksum and timestamp against
//! its current on-disk counterpart, and marks unsaved in-memory objects
//! tied to conflicting files as dirty.
//!
//! Dirty-object lookups are best-effort: an individual lookup failure is
//! logged and skipped, never fatal for the item's check — the conflict
//! list itself is still returned.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{debug, warn};

use depotsync_core::domain::ids::StableId;
use depotsync_core::domain::tracked::{FileConflict, TrackedFile, TrackedItem};
use depotsync_core::ports::dirty_objects::IDirtyObjects;

use crate::checksum;

/// Scans tracked items for on-disk divergence
pub struct ConflictScanner {
    dirty: Arc<dyn IDirtyObjects>,
}

impl ConflictScanner {
    /// Creates a scanner with the dirty-object collaborator
    pub fn new(dirty: Arc<dyn IDirtyObjects>) -> Self {
        Self { dirty }
    }

    /// Scans one tracked item
    ///
    /// Returns the conflicting files and the identities of unsaved
    /// in-memory objects tied to them.
    pub async fn scan(&self, item: &TrackedItem) -> (Vec<FileConflict>, Vec<StableId>) {
        let mut conflicts = Vec::new();
        let mut dirty_objects = Vec::new();

        for file in &item.files {
            let diverged = match self.file_diverged(file).await {
                Ok(current) => current,
                Err(err) => {
                    warn!(path = %file.path.display(), error = %err,
                        "Could not read tracked file, skipping");
                    continue;
                }
            };

            let Some(current_checksum) = diverged else {
                continue;
            };

            debug!(path = %file.path.display(), "Tracked file diverged from import record");

            // Best-effort dirty lookup for the conflicting file
            match self.dirty.object_for_file(&file.path) {
                Ok(Some(id)) => {
                    if self.dirty.is_unsaved(&id) {
                        dirty_objects.push(id);
                    }
                }
                Ok(None) => {}
                Err(err) => {
                    warn!(path = %file.path.display(), error = %err,
                        "Dirty-object lookup failed, skipping");
                }
            }

            conflicts.push(FileConflict {
                path: file.path.clone(),
                recorded_checksum: file.checksum.clone(),
                current_checksum,
            });
        }

        (conflicts, dirty_objects)
    }

    /// Checks one tracked file against disk
    ///
    /// Returns `Ok(None)` when unchanged, `Ok(Some(current))` when the
    /// content diverged (`current` is `None` for a deleted file). The
    /// recorded modification timestamp short-circuits the checksum: a file
    /// whose mtime still matches the import record has not changed.
    async fn file_diverged(&self, file: &TrackedFile) -> anyhow::Result<Option<Option<String>>> {
        match tokio::fs::metadata(&file.path).await {
            Ok(metadata) => {
                if let Ok(modified) = metadata.modified() {
                    let modified: DateTime<Utc> = modified.into();
                    if modified == file.modified {
                        return Ok(None);
                    }
                }
            }
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                return Ok(Some(None));
            }
            Err(err) => return Err(err.into()),
        }

        match checksum::file_checksum(&file.path).await? {
            Some(current) if current == file.checksum => Ok(None),
            Some(current) => Ok(Some(Some(current))),
            None => Ok(Some(None)),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
