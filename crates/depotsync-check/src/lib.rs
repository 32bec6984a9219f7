//! Depotsync Check - Update and conflict detection
//!
//! The consumption-side counterpart of the upload planner: given the set
//! of previously-imported items (plus their dependents and upward
//! dependencies), concurrently checks each one for a newer remote version
//! and for local divergence — conflicting files on disk and unsaved
//! in-memory edits tied to them.
//!
//! ## Modules
//!
//! - [`checksum`] - SHA-256 file hashing for divergence detection
//! - [`conflict`] - Per-item file conflict scanning and dirty-object lookup
//! - [`update`] - `UpdateChecker`: bounded-concurrency update checks

pub mod checksum;
pub mod conflict;
pub mod update;

use thiserror::Error;

/// Errors that can occur during an update/conflict check pass
#[derive(Debug, Error)]
pub enum CheckError {
    /// The check pass was cancelled before completion.
    ///
    /// No partial result map is returned; the caller must re-trigger the
    /// check explicitly.
    #[error("Update check cancelled")]
    Cancelled,

    /// A check worker task panicked or was aborted
    #[error("Update check task failed: {0}")]
    TaskFailed(String),
}

pub use conflict::ConflictScanner;
pub use update::UpdateChecker;
