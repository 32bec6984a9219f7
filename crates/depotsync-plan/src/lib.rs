//! Depotsync Plan - Upload planning engine
//!
//! Provides:
//! - Memoized, cycle-safe dependency closure over the local item graph
//! - Candidate construction with edit-overlay re-application
//! - Asynchronous self-status resolution with bounded concurrency
//! - Pure final-status propagation through the dependency graph
//! - Staging aggregation for presentation and transfer gating
//!
//! ## Modules
//!
//! - [`resolver`] - Dependency closure (embedded/separate modes)
//! - [`builder`] - Candidate construction from resolved items + overlay
//! - [`status`] - Self-status fan-out and final-status propagation
//! - [`staging`] - Pure reduction into staging counts
//! - [`planner`] - `UploadPlanner` facade with snapshot publishing

pub mod builder;
pub mod planner;
pub mod resolver;
pub mod staging;
pub mod status;

use depotsync_core::domain::StableId;
use thiserror::Error;

/// Errors that can occur while building or resolving an upload plan
#[derive(Debug, Error)]
pub enum PlanError {
    /// The local content graph failed for an identity the plan needs.
    ///
    /// This is a structural error: a corrupt candidate graph would produce
    /// an incorrect plan, so the whole regeneration fails.
    #[error("Content graph failure for item {id}: {source}")]
    Graph {
        /// The identity that could not be resolved
        id: StableId,
        /// The underlying adapter error
        #[source]
        source: anyhow::Error,
    },

    /// Status resolution was cancelled before completion.
    ///
    /// Not a failure of the plan itself: the previous published snapshot
    /// stays untouched, and the caller must re-trigger resolution.
    #[error("Status resolution cancelled")]
    Cancelled,

    /// A resolution worker task panicked or was aborted
    #[error("Status resolution task failed: {0}")]
    TaskFailed(String),
}

pub use planner::{PlanSnapshot, ProgressCallback, UploadPlanner};
pub use resolver::{DependencyResolver, ResolveOptions, ResolvedItem};
pub use staging::StagingStatus;
pub use status::StatusResolver;
