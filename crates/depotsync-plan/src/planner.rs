//! Upload planner facade
//!
//! The [`UploadPlanner`] ties the pipeline together:
//!
//! ```text
//! selection ──→ DependencyResolver ──→ CandidateBuilder ──→ StatusResolver ──→ StagingStatus
//!                  (sync, local)        (overlay merge)      (bounded async)     (pure)
//! ```
//!
//! The candidate graph is rebuilt wholesale on every regeneration and
//! published as an immutable [`PlanSnapshot`] only after the full
//! resolution pass completes. Readers (UI, CLI) always observe the last
//! *completed* snapshot; a cancelled or failed pass publishes nothing,
//! which avoids any fine-grained locking between resolution and a
//! concurrently rendering presentation layer.

use std::sync::{Arc, RwLock};

use chrono::{DateTime, Utc};
use tokio_util::sync::CancellationToken;
use tracing::info;

use depotsync_core::config::PlanSettings;
use depotsync_core::domain::candidate::UploadCandidate;
use depotsync_core::domain::ids::StableId;
use depotsync_core::domain::overlay::EditOverlay;
use depotsync_core::ports::content_graph::IContentGraph;
use depotsync_core::ports::remote_catalog::IRemoteCatalog;
use depotsync_core::ports::tracked_store::ITrackedStore;

use crate::builder::CandidateBuilder;
use crate::resolver::{DependencyResolver, ResolveOptions};
use crate::staging::StagingStatus;
use crate::status::StatusResolver;
use crate::PlanError;

/// Progress callback invoked after each completed self-status probe
///
/// Arguments are `(item name, fraction complete)`.
pub type ProgressCallback = Arc<dyn Fn(&str, f32) + Send + Sync>;

// ============================================================================
// PlanSnapshot
// ============================================================================

/// An immutable, fully resolved upload plan
#[derive(Debug, Clone)]
pub struct PlanSnapshot {
    /// Resolved candidates in deterministic order
    pub candidates: Vec<UploadCandidate>,
    /// Aggregate staging counts over the candidates
    pub staging: StagingStatus,
    /// When the resolution pass completed
    pub resolved_at: DateTime<Utc>,
}

// ============================================================================
// UploadPlanner
// ============================================================================

/// Facade over plan generation and status resolution
pub struct UploadPlanner {
    graph: Arc<dyn IContentGraph>,
    status_resolver: StatusResolver,
    settings: PlanSettings,
    /// Last completed snapshot; `None` until a pass finishes
    snapshot: RwLock<Option<Arc<PlanSnapshot>>>,
}

impl UploadPlanner {
    /// Creates a planner with the required collaborators
    pub fn new(
        graph: Arc<dyn IContentGraph>,
        remote: Arc<dyn IRemoteCatalog>,
        tracked: Arc<dyn ITrackedStore>,
        settings: PlanSettings,
    ) -> Self {
        let status_resolver = StatusResolver::new(graph.clone(), remote, tracked);
        Self {
            graph,
            status_resolver,
            settings,
            snapshot: RwLock::new(None),
        }
    }

    /// The settings this planner was configured with
    pub fn settings(&self) -> &PlanSettings {
        &self.settings
    }

    // ========================================================================
    // Plan generation (synchronous, no I/O)
    // ========================================================================

    /// Builds a fresh candidate graph for a selection
    ///
    /// Pure graph work: dependency closure plus overlay re-application.
    /// Statuses are left unresolved; call
    /// [`refresh_status`](Self::refresh_status) next.
    ///
    /// # Errors
    ///
    /// Returns [`PlanError::Graph`] on structural content-graph failures.
    pub fn generate_plan(
        &self,
        selection: &[StableId],
        overlay: &EditOverlay,
    ) -> Result<Vec<UploadCandidate>, PlanError> {
        let options = ResolveOptions {
            ignored: overlay.ignored_ids().copied().collect(),
            include_auxiliary: overlay.include_auxiliary_ids().copied().collect(),
            include_auxiliary_default: self.settings.include_auxiliary_default,
        };

        let resolver = DependencyResolver::new(self.graph.as_ref());
        let resolved = resolver.resolve(selection, &options, self.settings.dependency_mode)?;
        let candidates = CandidateBuilder::build(resolved, overlay);

        info!(
            selection = selection.len(),
            candidates = candidates.len(),
            mode = ?self.settings.dependency_mode,
            "Generated upload plan"
        );

        Ok(candidates)
    }

    // ========================================================================
    // Status resolution (async, bounded)
    // ========================================================================

    /// Resolves statuses and publishes a snapshot
    ///
    /// Runs the self-status fan-out, then the final-status propagation,
    /// then the staging reduction. The snapshot is published only after
    /// all three complete; on cancellation or error, the previously
    /// published snapshot stays in place.
    pub async fn refresh_status(
        &self,
        mut candidates: Vec<UploadCandidate>,
        check_remote: bool,
        cancel: &CancellationToken,
        progress: Option<ProgressCallback>,
    ) -> Result<Arc<PlanSnapshot>, PlanError> {
        self.status_resolver
            .resolve_self_statuses(&mut candidates, &self.settings, check_remote, cancel, progress)
            .await?;

        self.status_resolver.propagate_final_statuses(&mut candidates);

        let staging = StagingStatus::summarize(&candidates);
        let snapshot = Arc::new(PlanSnapshot {
            candidates,
            staging,
            resolved_at: Utc::now(),
        });

        *self
            .snapshot
            .write()
            .expect("plan snapshot lock poisoned") = Some(snapshot.clone());

        info!(summary = %snapshot.staging, "Status resolution complete");
        Ok(snapshot)
    }

    // ========================================================================
    // Snapshot access
    // ========================================================================

    /// Returns the last completed snapshot, if any
    pub fn snapshot(&self) -> Option<Arc<PlanSnapshot>> {
        self.snapshot
            .read()
            .expect("plan snapshot lock poisoned")
            .clone()
    }

    /// Returns the staging summary of the last completed snapshot
    pub fn staging_summary(&self) -> Option<StagingStatus> {
        self.snapshot().map(|s| s.staging.clone())
    }

    /// Clears the published snapshot (plan discarded)
    pub fn clear(&self) {
        *self
            .snapshot
            .write()
            .expect("plan snapshot lock poisoned") = None;
    }
}
