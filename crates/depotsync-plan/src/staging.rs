//! Staging aggregator - pure reduction over the candidate set
//!
//! Summarizes a resolved plan into the counts the presentation layer
//! renders ("N ready, M skipped, K unknown") and the transfer layer gates
//! on. Recomputed after every status-resolution pass; never mutates
//! candidates, and the planner only publishes it together with a fully
//! resolved snapshot, so the summary is never computed from a partially
//! resolved candidate set.

use std::fmt;

use serde::{Deserialize, Serialize};

use depotsync_core::domain::candidate::{UploadCandidate, UploadStatus};

/// Aggregate counts over one resolved candidate set
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StagingStatus {
    /// Total number of candidates in the plan
    pub total: usize,
    /// Candidates with the manual ignore flag set
    pub ignored: usize,
    /// Candidates that will be part of the transfer (`can_be_uploaded`)
    pub ready: usize,
    /// Candidates skipped as identical
    pub skipped: usize,
    /// Candidates that will create a new remote item
    pub added: usize,
    /// Candidates that will push a new version
    pub overridden: usize,
    /// Candidates duplicated as fresh remote items
    pub duplicated: usize,
    /// Dependencies the operator manually ignored
    pub ignored_dependencies: usize,
    /// Candidates whose status could not be determined
    pub unresolved: usize,
    /// True when any candidate lies outside the managed project scope
    pub has_outside_scope: bool,
    /// Total file count over uploadable candidates
    pub total_files: usize,
    /// Total byte size over uploadable candidates
    pub total_bytes: u64,
}

impl StagingStatus {
    /// Reduces a candidate set into staging counts
    pub fn summarize(candidates: &[UploadCandidate]) -> Self {
        let mut status = Self {
            total: candidates.len(),
            ..Self::default()
        };

        for candidate in candidates {
            if candidate.is_ignored() {
                status.ignored += 1;
            }
            if candidate.is_dependency() && candidate.is_ignored() {
                status.ignored_dependencies += 1;
            }

            match candidate.final_status() {
                UploadStatus::Skip => status.skipped += 1,
                UploadStatus::Add => status.added += 1,
                UploadStatus::Override => status.overridden += 1,
                UploadStatus::Duplicate => status.duplicated += 1,
                UploadStatus::OutsideScope => status.has_outside_scope = true,
                UploadStatus::Unknown => status.unresolved += 1,
                UploadStatus::None | UploadStatus::Imported => {}
            }

            if candidate.can_be_uploaded() {
                status.ready += 1;
                status.total_files += candidate.files().len();
                status.total_bytes += candidate.total_bytes();
            }
        }

        status
    }

    /// Returns true when the plan has at least one transferable candidate
    pub fn has_work(&self) -> bool {
        self.ready > 0
    }
}

impl fmt::Display for StagingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ready, {} skipped, {} unknown ({} items, {} files, {} bytes)",
            self.ready, self.skipped, self.unresolved, self.total, self.total_files,
            self.total_bytes
        )
    }
}
