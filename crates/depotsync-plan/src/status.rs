//! Status resolver - remote comparison and dependency propagation
//!
//! Status resolution happens in two strictly ordered passes:
//!
//! 1. **Self status** (async): each candidate is compared against the
//!    remote store independently. Probes run as a bounded-concurrency
//!    fan-out — a semaphore caps the number of in-flight remote lookups
//!    so a large plan (hundreds of items) cannot flood the connection
//!    pool. Results are collected before the second pass begins, because
//!    a dependent's final status can depend on a dependency's self status.
//! 2. **Final status** (sync, pure): statuses are propagated bottom-up
//!    through the dependency graph in topological order, enforced by a
//!    processed-set guard that also makes the pass cycle-safe.
//!
//! Cancellation terminates the first pass early with
//! [`PlanError::Cancelled`]; callers must treat a cancelled pass as having
//! produced no usable final statuses.

use std::collections::{BTreeSet, HashMap, HashSet};
use std::sync::Arc;

use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use depotsync_core::config::{PlanSettings, VersionPolicy};
use depotsync_core::domain::candidate::{UploadCandidate, UploadStatus};
use depotsync_core::domain::ids::{RemoteRef, StableId};
use depotsync_core::domain::tracked::TrackedItem;
use depotsync_core::ports::content_graph::IContentGraph;
use depotsync_core::ports::remote_catalog::IRemoteCatalog;
use depotsync_core::ports::tracked_store::ITrackedStore;

use crate::planner::ProgressCallback;
use crate::PlanError;

// ============================================================================
// Probe input
// ============================================================================

/// Owned snapshot of the candidate fields a probe task needs
struct ProbeInput {
    idx: usize,
    id: StableId,
    name: String,
    /// (destination path, checksum) of comparable (non-satellite) files
    files: Vec<(String, Option<String>)>,
}

/// Probe outcome: `None` means the task observed cancellation
type ProbeOutcome = Option<Result<(UploadStatus, Option<RemoteRef>), PlanError>>;

// ============================================================================
// StatusResolver
// ============================================================================

/// Resolves self and final statuses for a candidate set
pub struct StatusResolver {
    graph: Arc<dyn IContentGraph>,
    remote: Arc<dyn IRemoteCatalog>,
    tracked: Arc<dyn ITrackedStore>,
}

impl StatusResolver {
    /// Creates a resolver with the required collaborators
    pub fn new(
        graph: Arc<dyn IContentGraph>,
        remote: Arc<dyn IRemoteCatalog>,
        tracked: Arc<dyn ITrackedStore>,
    ) -> Self {
        Self {
            graph,
            remote,
            tracked,
        }
    }

    // ========================================================================
    // Pass 1: self status (bounded fan-out)
    // ========================================================================

    /// Resolves the self status of every candidate
    ///
    /// At most `settings.max_concurrent_checks` probes are in flight at any
    /// moment. Probe order and completion order are unspecified; each
    /// completion invokes the progress callback with
    /// `(item name, fraction complete)`.
    ///
    /// # Errors
    ///
    /// - [`PlanError::Cancelled`] when the token fires; candidate statuses
    ///   are then not usable and the caller must re-resolve.
    /// - [`PlanError::Graph`] on structural content-graph failures.
    pub async fn resolve_self_statuses(
        &self,
        candidates: &mut [UploadCandidate],
        settings: &PlanSettings,
        check_remote: bool,
        cancel: &CancellationToken,
        progress: Option<ProgressCallback>,
    ) -> Result<(), PlanError> {
        let total = candidates.len();
        let semaphore = Arc::new(Semaphore::new(settings.max_concurrent_checks.max(1)));
        let mut probes: JoinSet<(usize, String, ProbeOutcome)> = JoinSet::new();

        debug!(
            candidates = total,
            cap = settings.max_concurrent_checks,
            check_remote,
            "Starting self-status resolution"
        );

        for (idx, candidate) in candidates.iter().enumerate() {
            let input = ProbeInput {
                idx,
                id: *candidate.id(),
                name: candidate.name().to_string(),
                files: candidate
                    .comparable_files()
                    .map(|f| (f.dest_path.clone(), f.checksum.clone()))
                    .collect(),
            };

            let graph = self.graph.clone();
            let remote = self.remote.clone();
            let tracked = self.tracked.clone();
            let policy = settings.version_policy;
            let semaphore = semaphore.clone();
            let cancel = cancel.clone();

            probes.spawn(async move {
                let name = input.name.clone();

                // The permit bounds in-flight remote work; waiting for one
                // does not count against the cap.
                let Ok(_permit) = semaphore.acquire_owned().await else {
                    return (input.idx, name, None);
                };
                if cancel.is_cancelled() {
                    return (input.idx, name, None);
                }

                let outcome = tokio::select! {
                    _ = cancel.cancelled() => None,
                    result = probe_self_status(
                        graph, remote, tracked, &input, policy, check_remote,
                    ) => Some(result),
                };

                (input.idx, name, outcome)
            });
        }

        let mut done = 0usize;
        let mut observed_cancel = false;

        while let Some(joined) = probes.join_next().await {
            let (idx, name, outcome) =
                joined.map_err(|e| PlanError::TaskFailed(e.to_string()))?;

            match outcome {
                None => observed_cancel = true,
                Some(Ok((status, existing))) => {
                    candidates[idx].set_self_status(status);
                    candidates[idx].set_existing_remote(existing);
                }
                Some(Err(err)) => return Err(err),
            }

            done += 1;
            if let Some(callback) = &progress {
                callback(&name, done as f32 / total as f32);
            }
        }

        if observed_cancel || cancel.is_cancelled() {
            return Err(PlanError::Cancelled);
        }

        debug!(candidates = total, "Self-status resolution complete");
        Ok(())
    }

    // ========================================================================
    // Pass 2: final status (pure graph computation)
    // ========================================================================

    /// Propagates final statuses bottom-up through the dependency graph
    ///
    /// Must run only after *all* self statuses have been resolved. Pure:
    /// no network calls, only the candidate arena and the tracked records
    /// already joined during pass 1.
    pub fn propagate_final_statuses(&self, candidates: &mut [UploadCandidate]) {
        propagate_final_statuses(candidates, self.tracked.as_ref());
    }
}

/// Free-function form of the final-status pass, used directly in tests
pub fn propagate_final_statuses(candidates: &mut [UploadCandidate], tracked: &dyn ITrackedStore) {
    let index: HashMap<StableId, usize> = candidates
        .iter()
        .enumerate()
        .map(|(i, c)| (*c.id(), i))
        .collect();
    let mut processed: HashSet<StableId> = HashSet::with_capacity(candidates.len());

    for idx in 0..candidates.len() {
        visit_final(idx, candidates, &index, &mut processed, tracked);
    }
}

/// Depth-first visit: dependencies strictly before dependents
///
/// The processed set is updated *before* recursing, so each identity is
/// visited exactly once and dependency cycles terminate; a back-edge into
/// an unfinished candidate simply reads its (non-forcing) unresolved
/// status.
fn visit_final(
    idx: usize,
    candidates: &mut [UploadCandidate],
    index: &HashMap<StableId, usize>,
    processed: &mut HashSet<StableId>,
    tracked: &dyn ITrackedStore,
) {
    let id = *candidates[idx].id();
    if !processed.insert(id) {
        return;
    }

    let deps: Vec<StableId> = candidates[idx].dependencies().to_vec();
    for dep in &deps {
        if let Some(&dep_idx) = index.get(dep) {
            visit_final(dep_idx, candidates, index, processed, tracked);
        }
    }

    let final_status = final_status_for(idx, &deps, candidates, index, tracked);
    candidates[idx].set_final_status(final_status);
}

/// Computes one candidate's final status from its self status and its
/// dependencies' final statuses
fn final_status_for(
    idx: usize,
    deps: &[StableId],
    candidates: &[UploadCandidate],
    index: &HashMap<StableId, usize>,
    tracked: &dyn ITrackedStore,
) -> UploadStatus {
    let candidate = &candidates[idx];
    let self_status = candidate.self_status();

    // Only Skip is eligible for escalation; everything else passes through.
    if self_status != UploadStatus::Skip {
        return self_status;
    }

    // The remote counterpart's recorded dependency set differing from the
    // newly resolved one means the dependency graph changed even though
    // the item's own files did not.
    let resolved_set: BTreeSet<StableId> = deps.iter().copied().collect();
    let recorded_set: BTreeSet<StableId> = candidate
        .existing_remote()
        .and_then(|remote| tracked.get(remote))
        .map(|record| record.dependencies)
        .unwrap_or_default();

    if recorded_set != resolved_set {
        debug!(
            id = %candidate.id(),
            recorded = recorded_set.len(),
            resolved = resolved_set.len(),
            "Escalating Skip to Override: dependency set changed"
        );
        return UploadStatus::Override;
    }

    // A dependency that will actually upload changes this item's dependency
    // closure on the remote side. Ignored dependencies that cannot be
    // uploaded never force escalation.
    let forced = deps
        .iter()
        .filter_map(|dep| index.get(dep))
        .any(|&dep_idx| candidates[dep_idx].can_be_uploaded());

    if forced {
        debug!(
            id = %candidate.id(),
            "Escalating Skip to Override: dependency will upload"
        );
        UploadStatus::Override
    } else {
        UploadStatus::Skip
    }
}

// ============================================================================
// Self-status probe
// ============================================================================

/// Determines the self status of one candidate
///
/// Steps, in order:
/// 1. Root outside the managed project scope → `OutsideScope` (terminal).
/// 2. No remote counterpart in the cross-reference → `Add`.
/// 3. "Always create new" policy → `Duplicate`.
/// 4. Counterpart confirmed absent on the server → `Add`.
/// 5. Policy-dependent comparison against the last-imported record.
///
/// Transient remote failures resolve to `Unknown` so the candidate renders
/// as "status unknown" instead of silently defaulting to `Add`; sibling
/// probes are unaffected.
async fn probe_self_status(
    graph: Arc<dyn IContentGraph>,
    remote: Arc<dyn IRemoteCatalog>,
    tracked: Arc<dyn ITrackedStore>,
    input: &ProbeInput,
    policy: VersionPolicy,
    check_remote: bool,
) -> Result<(UploadStatus, Option<RemoteRef>), PlanError> {
    // Step 1: project scope (local, structural on failure)
    let within = graph
        .is_within_project(&input.id)
        .map_err(|source| PlanError::Graph {
            id: input.id,
            source,
        })?;
    if !within {
        return Ok((UploadStatus::OutsideScope, None));
    }

    // Step 2: cross-reference lookup
    let counterpart = match remote.find_counterpart(&input.id).await {
        Ok(counterpart) => counterpart,
        Err(err) => {
            warn!(id = %input.id, name = %input.name, error = %err,
                "Counterpart lookup failed, status unknown");
            return Ok((UploadStatus::Unknown, None));
        }
    };
    let Some(counterpart) = counterpart else {
        return Ok((UploadStatus::Add, None));
    };

    // Step 3: operator asked for a fresh remote item
    if policy == VersionPolicy::CreateNew {
        return Ok((UploadStatus::Duplicate, Some(counterpart)));
    }

    // Step 4: the mapping can outlive its target
    if check_remote {
        match remote.item_exists(&counterpart).await {
            Ok(true) => {}
            Ok(false) => {
                debug!(id = %input.id, remote = %counterpart,
                    "Remote counterpart gone, treating as new");
                return Ok((UploadStatus::Add, None));
            }
            Err(err) => {
                warn!(id = %input.id, remote = %counterpart, error = %err,
                    "Existence check failed, status unknown");
                return Ok((UploadStatus::Unknown, Some(counterpart)));
            }
        }
    }

    // Step 5: policy-dependent comparison
    let status = match policy {
        VersionPolicy::SkipIdentical => match tracked.get(&counterpart) {
            Some(record) if file_sets_match(&input.files, &record) => UploadStatus::Skip,
            _ => UploadStatus::Override,
        },
        VersionPolicy::ForceNewVersion => UploadStatus::Override,
        VersionPolicy::AssumeImported => UploadStatus::Imported,
        // Handled in step 3
        VersionPolicy::CreateNew => UploadStatus::Duplicate,
    };

    Ok((status, Some(counterpart)))
}

/// Compares a candidate's comparable file set against a tracked record
///
/// Files are matched as (file name, checksum) pairs; satellite metadata
/// files on the record side are skipped, mirroring the candidate side.
/// A candidate file without a checksum cannot be proven identical, so the
/// comparison conservatively reports a change.
fn file_sets_match(local: &[(String, Option<String>)], record: &TrackedItem) -> bool {
    let mut local_set: BTreeSet<(String, String)> = BTreeSet::new();
    for (dest, checksum) in local {
        let Some(checksum) = checksum else {
            return false;
        };
        local_set.insert((file_name(dest), checksum.clone()));
    }

    let recorded_set: BTreeSet<(String, String)> = record
        .files
        .iter()
        .filter(|f| !f.path.to_string_lossy().ends_with(".meta"))
        .map(|f| {
            (
                f.path
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_default(),
                f.checksum.clone(),
            )
        })
        .collect();

    local_set == recorded_set
}

fn file_name(dest: &str) -> String {
    dest.rsplit('/').next().unwrap_or(dest).to_string()
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use chrono::Utc;

    use depotsync_core::domain::candidate::LocalFile;
    use depotsync_core::domain::tracked::TrackedFile;

    use super::*;

    /// Tracked store over a fixed set of records
    #[derive(Default)]
    struct FakeTracked {
        records: Vec<TrackedItem>,
    }

    impl ITrackedStore for FakeTracked {
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

    fn candidate_with(
        self_status: UploadStatus,
        deps: Vec<StableId>,
        is_dependency: bool,
    ) -> UploadCandidate {
        let mut c = UploadCandidate::new(StableId::new(), "item", "package");
        c.set_self_status(self_status);
        c.set_dependencies(deps);
        c.set_is_dependency(is_dependency);
        c
    }

    mod final_status_tests {
        use super::*;

        #[test]
        fn test_non_skip_statuses_pass_through() {
            let tracked = FakeTracked::default();
            let mut candidates = vec![
                candidate_with(UploadStatus::Add, vec![], false),
                candidate_with(UploadStatus::Override, vec![], false),
                candidate_with(UploadStatus::OutsideScope, vec![], false),
                candidate_with(UploadStatus::Unknown, vec![], false),
            ];

            propagate_final_statuses(&mut candidates, &tracked);

            assert_eq!(candidates[0].final_status(), UploadStatus::Add);
            assert_eq!(candidates[1].final_status(), UploadStatus::Override);
            assert_eq!(candidates[2].final_status(), UploadStatus::OutsideScope);
            assert_eq!(candidates[3].final_status(), UploadStatus::Unknown);
        }

        #[test]
        fn test_skip_with_uploading_dependency_escalates() {
            let tracked = FakeTracked::default();
            let mut dep = candidate_with(UploadStatus::Add, vec![], true);
            let dep_id = *dep.id();
            dep.set_is_dependency(true);
            let parent = candidate_with(UploadStatus::Skip, vec![dep_id], false);

            let mut candidates = vec![parent, dep];
            propagate_final_statuses(&mut candidates, &tracked);

            assert_eq!(candidates[0].final_status(), UploadStatus::Override);
            assert_eq!(candidates[1].final_status(), UploadStatus::Add);
        }

        #[test]
        fn test_skip_with_skipping_dependency_stays_skip() {
            let tracked = FakeTracked::default();
            let dep = candidate_with(UploadStatus::Skip, vec![], true);
            let dep_id = *dep.id();
            let parent = candidate_with(UploadStatus::Skip, vec![dep_id], false);

            let mut candidates = vec![parent, dep];
            propagate_final_statuses(&mut candidates, &tracked);

            assert_eq!(candidates[0].final_status(), UploadStatus::Skip);
        }

        #[test]
        fn test_ignored_dependency_does_not_force_escalation() {
            let tracked = FakeTracked::default();
            let mut dep = candidate_with(UploadStatus::Add, vec![], true);
            dep.set_ignored(true);
            let dep_id = *dep.id();
            let parent = candidate_with(UploadStatus::Skip, vec![dep_id], false);

            let mut candidates = vec![parent, dep];
            propagate_final_statuses(&mut candidates, &tracked);

            // The ignored dependency cannot be uploaded, so the parent's
            // remote closure does not change.
            assert_eq!(candidates[0].final_status(), UploadStatus::Skip);
        }

        #[test]
        fn test_escalation_is_transitive() {
            let tracked = FakeTracked::default();
            let leaf = candidate_with(UploadStatus::Add, vec![], true);
            let leaf_id = *leaf.id();
            let mid = candidate_with(UploadStatus::Skip, vec![leaf_id], true);
            let mid_id = *mid.id();
            let root = candidate_with(UploadStatus::Skip, vec![mid_id], false);

            let mut candidates = vec![root, mid, leaf];
            propagate_final_statuses(&mut candidates, &tracked);

            assert_eq!(candidates[1].final_status(), UploadStatus::Override);
            assert_eq!(candidates[0].final_status(), UploadStatus::Override);
        }

        #[test]
        fn test_recorded_dependency_set_change_escalates() {
            let remote = RemoteRef::new("acme", "demo", "pkg", 2).unwrap();
            let mut record = TrackedItem::new(remote.clone(), 2, Utc::now());
            // Recorded with one dependency that is no longer resolved
            record.dependencies.insert(StableId::new());
            let tracked = FakeTracked {
                records: vec![record],
            };

            let mut parent = candidate_with(UploadStatus::Skip, vec![], false);
            parent.set_existing_remote(Some(remote));

            let mut candidates = vec![parent];
            propagate_final_statuses(&mut candidates, &tracked);

            assert_eq!(candidates[0].final_status(), UploadStatus::Override);
        }

        #[test]
        fn test_matching_recorded_dependency_set_stays_skip() {
            let remote = RemoteRef::new("acme", "demo", "pkg", 2).unwrap();
            let dep = candidate_with(UploadStatus::Skip, vec![], true);
            let dep_id = *dep.id();

            let mut record = TrackedItem::new(remote.clone(), 2, Utc::now());
            record.dependencies.insert(dep_id);
            let tracked = FakeTracked {
                records: vec![record],
            };

            let mut parent = candidate_with(UploadStatus::Skip, vec![dep_id], false);
            parent.set_existing_remote(Some(remote));

            let mut candidates = vec![parent, dep];
            propagate_final_statuses(&mut candidates, &tracked);

            assert_eq!(candidates[0].final_status(), UploadStatus::Skip);
        }

        #[test]
        fn test_cycle_terminates() {
            let tracked = FakeTracked::default();
            let mut a = candidate_with(UploadStatus::Skip, vec![], false);
            let mut b = candidate_with(UploadStatus::Skip, vec![], false);
            let (a_id, b_id) = (*a.id(), *b.id());
            a.set_dependencies(vec![b_id]);
            b.set_dependencies(vec![a_id]);

            let mut candidates = vec![a, b];
            propagate_final_statuses(&mut candidates, &tracked);

            // Every candidate gets a final status exactly once.
            assert!(candidates.iter().all(|c| c.final_status().is_resolved()));
        }
    }

    mod file_set_tests {
        use super::*;

        fn record_with(files: &[(&str, &str)]) -> TrackedItem {
            let remote = RemoteRef::new("acme", "demo", "pkg", 1).unwrap();
            let mut record = TrackedItem::new(remote, 1, Utc::now());
            record.files = files
                .iter()
                .map(|(path, checksum)| TrackedFile {
                    path: PathBuf::from(path),
                    checksum: checksum.to_string(),
                    modified: Utc::now(),
                })
                .collect();
            record
        }

        #[test]
        fn test_identical_sets_match() {
            let record = record_with(&[("/project/a.mesh", "c1"), ("/project/b.mesh", "c2")]);
            let local = vec![
                ("tiles/a.mesh".to_string(), Some("c1".to_string())),
                ("tiles/b.mesh".to_string(), Some("c2".to_string())),
            ];
            assert!(file_sets_match(&local, &record));
        }

        #[test]
        fn test_changed_checksum_differs() {
            let record = record_with(&[("/project/a.mesh", "c1")]);
            let local = vec![("tiles/a.mesh".to_string(), Some("c9".to_string()))];
            assert!(!file_sets_match(&local, &record));
        }

        #[test]
        fn test_extra_local_file_differs() {
            let record = record_with(&[("/project/a.mesh", "c1")]);
            let local = vec![
                ("tiles/a.mesh".to_string(), Some("c1".to_string())),
                ("tiles/new.mesh".to_string(), Some("c2".to_string())),
            ];
            assert!(!file_sets_match(&local, &record));
        }

        #[test]
        fn test_missing_checksum_is_conservative() {
            let record = record_with(&[("/project/a.mesh", "c1")]);
            let local = vec![("tiles/a.mesh".to_string(), None)];
            assert!(!file_sets_match(&local, &record));
        }

        #[test]
        fn test_recorded_satellite_files_ignored() {
            let record = record_with(&[
                ("/project/a.mesh", "c1"),
                ("/project/a.mesh.meta", "m1"),
            ]);
            let local = vec![("tiles/a.mesh".to_string(), Some("c1".to_string()))];
            assert!(file_sets_match(&local, &record));
        }
    }

    mod probe_tests {
        use std::sync::Mutex;

        use anyhow::anyhow;
        use depotsync_core::ports::content_graph::ItemInfo;
        use depotsync_core::ports::remote_catalog::RemoteVersion;

        use super::*;

        /// Graph where a configurable set of ids is out of scope
        #[derive(Default)]
        struct ScopeGraph {
            outside: HashSet<StableId>,
        }

        impl IContentGraph for ScopeGraph {
            fn item_info(&self, _id: &StableId) -> anyhow::Result<ItemInfo> {
                Err(anyhow!("not used by probes"))
            }

            fn direct_dependencies(
                &self,
                _id: &StableId,
                _inline: bool,
            ) -> anyhow::Result<Vec<StableId>> {
                Ok(Vec::new())
            }

            fn files(
                &self,
                _id: &StableId,
                _include_auxiliary: bool,
            ) -> anyhow::Result<Vec<LocalFile>> {
                Ok(Vec::new())
            }

            fn is_within_project(&self, id: &StableId) -> anyhow::Result<bool> {
                Ok(!self.outside.contains(id))
            }
        }

        /// Remote catalog over fixed mappings, with optional failure modes
        #[derive(Default)]
        struct FakeCatalog {
            counterparts: Mutex<HashMap<StableId, RemoteRef>>,
            missing_on_server: Mutex<HashSet<RemoteRef>>,
            fail_lookups: bool,
        }

        #[async_trait::async_trait]
        impl IRemoteCatalog for FakeCatalog {
            async fn find_counterpart(
                &self,
                id: &StableId,
            ) -> anyhow::Result<Option<RemoteRef>> {
                if self.fail_lookups {
                    return Err(anyhow!("network unreachable"));
                }
                Ok(self.counterparts.lock().unwrap().get(id).cloned())
            }

            async fn item_exists(&self, remote: &RemoteRef) -> anyhow::Result<bool> {
                if self.fail_lookups {
                    return Err(anyhow!("network unreachable"));
                }
                Ok(!self.missing_on_server.lock().unwrap().contains(remote))
            }

            async fn latest_version(&self, remote: &RemoteRef) -> anyhow::Result<RemoteVersion> {
                Ok(RemoteVersion {
                    version: remote.version(),
                    last_updated: Utc::now(),
                })
            }
        }

        fn input_for(id: StableId) -> ProbeInput {
            ProbeInput {
                idx: 0,
                id,
                name: "item".to_string(),
                files: vec![("a.mesh".to_string(), Some("c1".to_string()))],
            }
        }

        async fn run_probe(
            graph: ScopeGraph,
            catalog: FakeCatalog,
            tracked: FakeTracked,
            id: StableId,
            policy: VersionPolicy,
            check_remote: bool,
        ) -> (UploadStatus, Option<RemoteRef>) {
            probe_self_status(
                Arc::new(graph),
                Arc::new(catalog),
                Arc::new(tracked),
                &input_for(id),
                policy,
                check_remote,
            )
            .await
            .unwrap()
        }

        #[tokio::test]
        async fn test_outside_scope_is_terminal() {
            let id = StableId::new();
            let graph = ScopeGraph {
                outside: [id].into_iter().collect(),
            };

            let (status, remote) = run_probe(
                graph,
                FakeCatalog::default(),
                FakeTracked::default(),
                id,
                VersionPolicy::SkipIdentical,
                true,
            )
            .await;

            assert_eq!(status, UploadStatus::OutsideScope);
            assert!(remote.is_none());
        }

        #[tokio::test]
        async fn test_no_counterpart_is_add() {
            let id = StableId::new();

            let (status, remote) = run_probe(
                ScopeGraph::default(),
                FakeCatalog::default(),
                FakeTracked::default(),
                id,
                VersionPolicy::SkipIdentical,
                true,
            )
            .await;

            assert_eq!(status, UploadStatus::Add);
            assert!(remote.is_none());
        }

        #[tokio::test]
        async fn test_create_new_policy_is_duplicate() {
            let id = StableId::new();
            let counterpart = RemoteRef::new("acme", "demo", "pkg", 1).unwrap();
            let catalog = FakeCatalog::default();
            catalog
                .counterparts
                .lock()
                .unwrap()
                .insert(id, counterpart.clone());

            let (status, remote) = run_probe(
                ScopeGraph::default(),
                catalog,
                FakeTracked::default(),
                id,
                VersionPolicy::CreateNew,
                true,
            )
            .await;

            assert_eq!(status, UploadStatus::Duplicate);
            assert_eq!(remote, Some(counterpart));
        }

        #[tokio::test]
        async fn test_confirmed_absence_is_add() {
            let id = StableId::new();
            let counterpart = RemoteRef::new("acme", "demo", "pkg", 1).unwrap();
            let catalog = FakeCatalog::default();
            catalog
                .counterparts
                .lock()
                .unwrap()
                .insert(id, counterpart.clone());
            catalog
                .missing_on_server
                .lock()
                .unwrap()
                .insert(counterpart);

            let (status, remote) = run_probe(
                ScopeGraph::default(),
                catalog,
                FakeTracked::default(),
                id,
                VersionPolicy::SkipIdentical,
                true,
            )
            .await;

            assert_eq!(status, UploadStatus::Add);
            assert!(remote.is_none());
        }

        #[tokio::test]
        async fn test_identical_files_skip() {
            let id = StableId::new();
            let counterpart = RemoteRef::new("acme", "demo", "pkg", 1).unwrap();
            let catalog = FakeCatalog::default();
            catalog
                .counterparts
                .lock()
                .unwrap()
                .insert(id, counterpart.clone());

            let mut record = TrackedItem::new(counterpart, 1, Utc::now());
            record.files = vec![TrackedFile {
                path: PathBuf::from("/project/a.mesh"),
                checksum: "c1".to_string(),
                modified: Utc::now(),
            }];
            let tracked = FakeTracked {
                records: vec![record],
            };

            let (status, _) = run_probe(
                ScopeGraph::default(),
                catalog,
                tracked,
                id,
                VersionPolicy::SkipIdentical,
                true,
            )
            .await;

            assert_eq!(status, UploadStatus::Skip);
        }

        #[tokio::test]
        async fn test_changed_files_override() {
            let id = StableId::new();
            let counterpart = RemoteRef::new("acme", "demo", "pkg", 1).unwrap();
            let catalog = FakeCatalog::default();
            catalog
                .counterparts
                .lock()
                .unwrap()
                .insert(id, counterpart.clone());

            let mut record = TrackedItem::new(counterpart, 1, Utc::now());
            record.files = vec![TrackedFile {
                path: PathBuf::from("/project/a.mesh"),
                checksum: "different".to_string(),
                modified: Utc::now(),
            }];
            let tracked = FakeTracked {
                records: vec![record],
            };

            let (status, _) = run_probe(
                ScopeGraph::default(),
                catalog,
                tracked,
                id,
                VersionPolicy::SkipIdentical,
                true,
            )
            .await;

            assert_eq!(status, UploadStatus::Override);
        }

        #[tokio::test]
        async fn test_force_new_version_override() {
            let id = StableId::new();
            let counterpart = RemoteRef::new("acme", "demo", "pkg", 1).unwrap();
            let catalog = FakeCatalog::default();
            catalog
                .counterparts
                .lock()
                .unwrap()
                .insert(id, counterpart);

            let (status, _) = run_probe(
                ScopeGraph::default(),
                catalog,
                FakeTracked::default(),
                id,
                VersionPolicy::ForceNewVersion,
                true,
            )
            .await;

            assert_eq!(status, UploadStatus::Override);
        }

        #[tokio::test]
        async fn test_assume_imported_is_terminal_imported() {
            let id = StableId::new();
            let counterpart = RemoteRef::new("acme", "demo", "pkg", 1).unwrap();
            let catalog = FakeCatalog::default();
            catalog
                .counterparts
                .lock()
                .unwrap()
                .insert(id, counterpart);

            let (status, _) = run_probe(
                ScopeGraph::default(),
                catalog,
                FakeTracked::default(),
                id,
                VersionPolicy::AssumeImported,
                true,
            )
            .await;

            assert_eq!(status, UploadStatus::Imported);
        }

        #[tokio::test]
        async fn test_transient_failure_is_unknown() {
            let id = StableId::new();
            let catalog = FakeCatalog {
                fail_lookups: true,
                ..Default::default()
            };

            let (status, remote) = run_probe(
                ScopeGraph::default(),
                catalog,
                FakeTracked::default(),
                id,
                VersionPolicy::SkipIdentical,
                true,
            )
            .await;

            assert_eq!(status, UploadStatus::Unknown);
            assert!(remote.is_none());
        }
    }
}
