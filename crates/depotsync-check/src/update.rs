//! Update checker - remote staleness detection
//!
//! Walks a set of tracked items (expanded with their dependents and, once
//! the remote store grows dependency support, their upward dependencies)
//! and asks the remote catalog whether newer versions exist, while the
//! conflict scanner checks local divergence. Remote lookups run as a
//! bounded-concurrency fan-out, mirroring the planner's status resolution.
//!
//! A transient remote failure marks only the affected item's result;
//! sibling checks continue. Cancellation abandons the pass without
//! returning a partial result map.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use depotsync_core::domain::ids::RemoteRef;
use depotsync_core::domain::tracked::{SyncCheckResult, TrackedItem};
use depotsync_core::ports::dirty_objects::IDirtyObjects;
use depotsync_core::ports::remote_catalog::IRemoteCatalog;
use depotsync_core::ports::tracked_store::ITrackedStore;

use crate::conflict::ConflictScanner;
use crate::CheckError;

/// Checks tracked items for newer remote versions and local divergence
pub struct UpdateChecker {
    remote: Arc<dyn IRemoteCatalog>,
    tracked: Arc<dyn ITrackedStore>,
    scanner: Arc<ConflictScanner>,
    max_concurrent_checks: usize,
}

impl UpdateChecker {
    /// Creates a checker with the required collaborators
    pub fn new(
        remote: Arc<dyn IRemoteCatalog>,
        tracked: Arc<dyn ITrackedStore>,
        dirty: Arc<dyn IDirtyObjects>,
        max_concurrent_checks: usize,
    ) -> Self {
        Self {
            remote,
            tracked,
            scanner: Arc::new(ConflictScanner::new(dirty)),
            max_concurrent_checks: max_concurrent_checks.max(1),
        }
    }

    /// Checks a set of tracked items, expanded with their graph neighborhood
    ///
    /// # Errors
    ///
    /// Returns [`CheckError::Cancelled`] when the token fires before the
    /// pass completes; no partial map is returned.
    pub async fn check_for_updates(
        &self,
        items: Vec<TrackedItem>,
        cancel: &CancellationToken,
    ) -> Result<HashMap<RemoteRef, SyncCheckResult>, CheckError> {
        let items = self.expand_neighborhood(items);
        let total = items.len();
        let semaphore = Arc::new(Semaphore::new(self.max_concurrent_checks));
        let mut checks: JoinSet<Option<(RemoteRef, SyncCheckResult)>> = JoinSet::new();

        debug!(
            items = total,
            cap = self.max_concurrent_checks,
            "Starting update check"
        );

        for item in items {
            let remote = self.remote.clone();
            let scanner = self.scanner.clone();
            let semaphore = semaphore.clone();
            let cancel = cancel.clone();

            checks.spawn(async move {
                let Ok(_permit) = semaphore.acquire_owned().await else {
                    return None;
                };
                if cancel.is_cancelled() {
                    return None;
                }

                tokio::select! {
                    _ = cancel.cancelled() => None,
                    result = check_one(remote, scanner, item) => Some(result),
                }
            });
        }

        let mut results = HashMap::with_capacity(total);
        let mut observed_cancel = false;

        while let Some(joined) = checks.join_next().await {
            match joined.map_err(|e| CheckError::TaskFailed(e.to_string()))? {
                Some((remote_ref, result)) => {
                    results.insert(remote_ref, result);
                }
                None => observed_cancel = true,
            }
        }

        if observed_cancel || cancel.is_cancelled() {
            return Err(CheckError::Cancelled);
        }

        debug!(items = results.len(), "Update check complete");
        Ok(results)
    }

    /// Expands the checked set with dependents of the given items
    ///
    /// A dependent is any tracked record whose recorded dependency set
    /// references a checked item's stable identity. Upward dependencies
    /// are added by [`upward_dependencies`](Self::upward_dependencies).
    fn expand_neighborhood(&self, items: Vec<TrackedItem>) -> Vec<TrackedItem> {
        let mut seen: std::collections::HashSet<RemoteRef> =
            items.iter().map(|i| i.remote.clone()).collect();
        let mut expanded = items;

        let ids: Vec<_> = expanded.iter().filter_map(|i| i.stable_id).collect();
        for record in self.tracked.all() {
            if seen.contains(&record.remote) {
                continue;
            }
            if ids.iter().any(|id| record.depends_on(id)) {
                debug!(remote = %record.remote, "Including dependent in update check");
                seen.insert(record.remote.clone());
                expanded.push(record);
            }
        }

        let direct = expanded.clone();
        for item in &direct {
            for upward in self.upward_dependencies(item) {
                if seen.insert(upward.remote.clone()) {
                    expanded.push(upward);
                }
            }
        }

        expanded
    }

    /// Upward-dependency expansion
    ///
    /// Placeholder pending full dependency support from the remote store:
    /// the store cannot yet enumerate which remote items a snapshot
    /// depends on, so this returns nothing ("no changes") rather than
    /// failing the check.
    fn upward_dependencies(&self, _item: &TrackedItem) -> Vec<TrackedItem> {
        Vec::new()
    }
}

/// Checks one tracked item against the remote store and the local disk
async fn check_one(
    remote: Arc<dyn IRemoteCatalog>,
    scanner: Arc<ConflictScanner>,
    item: TrackedItem,
) -> (RemoteRef, SyncCheckResult) {
    let mut result = SyncCheckResult {
        current_version_index: item.sequence,
        ..SyncCheckResult::default()
    };

    match remote.latest_version(&item.remote).await {
        Ok(latest) => {
            result.has_remote_changes = latest.version > item.sequence;
            result.is_latest_version = item.sequence >= latest.version;
            result.is_modified = latest.last_updated != item.last_updated;
        }
        Err(err) => {
            warn!(remote = %item.remote, error = %err,
                "Latest-version lookup failed, marking result unknown");
            result.error = Some(err.to_string());
        }
    }

    // Local divergence is checked even when the remote lookup failed.
    let (conflicts, dirty_objects) = scanner.scan(&item).await;
    result.file_conflicts = conflicts;
    result.dirty_local_objects = dirty_objects;

    (item.remote, result)
}

// ============================================================================
// Tests
// ============================================================================
