//! UploadCandidate domain entity
//!
//! This module defines the planning record for one local content item:
//! its local attributes (files, tags, type), its position in the dependency
//! graph, and the statuses assigned by the status resolver.
//!
//! ## Status model
//!
//! Every candidate carries two statuses:
//!
//! - **self status** — derived only from the item's own comparison against
//!   the remote store (existence, freshness, local modification).
//! - **final status** — the self status after propagation through the
//!   dependency graph: a dependency that must upload forces dependents
//!   that would otherwise skip to produce a new version as well.
//!
//! Candidates are rebuilt wholesale on every plan regeneration; manual
//! overrides live in the [`EditOverlay`](super::overlay::EditOverlay) and
//! are re-applied to fresh instances by the candidate builder.

use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::ids::{RemoteRef, StableId};

// ============================================================================
// UploadStatus enum
// ============================================================================

/// Planned remote action for a candidate
///
/// Assigned first as a self status by the remote comparison, then
/// propagated bottom-up through the dependency graph into a final status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UploadStatus {
    /// Not yet resolved
    #[default]
    None,
    /// No remote counterpart exists; a new remote item will be created
    Add,
    /// Remote counterpart exists and the local files are unchanged
    Skip,
    /// Remote counterpart exists and a new version must be pushed
    Override,
    /// Operator requested a fresh remote item even though one exists
    Duplicate,
    /// The item's root file lies outside the managed project scope
    OutsideScope,
    /// Treated as already imported; no action required
    Imported,
    /// Status could not be determined (transient remote failure)
    Unknown,
}

impl UploadStatus {
    /// Returns true if this status requires bytes to be uploaded
    pub fn requires_upload(&self) -> bool {
        matches!(
            self,
            UploadStatus::Add | UploadStatus::Override | UploadStatus::Duplicate
        )
    }

    /// Returns true for terminal statuses that no later pass may change
    pub fn is_terminal(&self) -> bool {
        matches!(self, UploadStatus::OutsideScope | UploadStatus::Imported)
    }

    /// Returns true once the status resolver has assigned a value
    ///
    /// `Unknown` counts as resolved: the resolver ran and recorded that
    /// the remote comparison failed, which is distinct from never having
    /// been attempted.
    pub fn is_resolved(&self) -> bool {
        !matches!(self, UploadStatus::None)
    }

    /// Returns the status name as a string
    pub fn name(&self) -> &'static str {
        match self {
            UploadStatus::None => "None",
            UploadStatus::Add => "Add",
            UploadStatus::Skip => "Skip",
            UploadStatus::Override => "Override",
            UploadStatus::Duplicate => "Duplicate",
            UploadStatus::OutsideScope => "OutsideScope",
            UploadStatus::Imported => "Imported",
            UploadStatus::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for UploadStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UploadStatus::None => write!(f, "unresolved"),
            UploadStatus::Add => write!(f, "add"),
            UploadStatus::Skip => write!(f, "skip"),
            UploadStatus::Override => write!(f, "override"),
            UploadStatus::Duplicate => write!(f, "duplicate"),
            UploadStatus::OutsideScope => write!(f, "outside-scope"),
            UploadStatus::Imported => write!(f, "imported"),
            UploadStatus::Unknown => write!(f, "unknown"),
        }
    }
}

// ============================================================================
// LocalFile
// ============================================================================

/// One file belonging to a candidate's dataset
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalFile {
    /// Absolute path of the file on disk
    pub source_path: PathBuf,
    /// Store-relative destination path
    pub dest_path: String,
    /// Size in bytes
    pub size_bytes: u64,
    /// Stable sub-identity of the file within its item
    pub sub_id: StableId,
    /// Content checksum, when the local graph has one recorded
    pub checksum: Option<String>,
    /// Whether the file is auxiliary (only shipped on request)
    pub auxiliary: bool,
}

impl LocalFile {
    /// Returns true for satellite metadata files
    ///
    /// Satellite files describe another file (editor import settings and
    /// the like) and are excluded from the "skip if identical" comparison:
    /// regenerating them must not force a new version.
    pub fn is_satellite_metadata(&self) -> bool {
        self.dest_path.ends_with(".meta")
    }
}

// ============================================================================
// UploadCandidate
// ============================================================================

/// The mutable planning record for one local content item
///
/// Built by the candidate builder from the resolved dependency closure and
/// the edit overlay, then annotated by the status resolver. The candidate
/// graph is an arena: `dependencies` holds stable identities, and edges are
/// followed through the per-plan candidate map rather than by pointer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UploadCandidate {
    /// Stable identity of the local item
    id: StableId,
    /// Display name (after overlay rename, if any)
    name: String,
    /// Item type name (package, prefab, material, ...)
    kind: String,
    /// Tags attached to the item
    tags: Vec<String>,
    /// Free-form description
    description: Option<String>,
    /// Custom key/value metadata
    custom_metadata: BTreeMap<String, String>,
    /// Files that make up the item's dataset
    files: Vec<LocalFile>,
    /// Direct dependencies (edges out), by stable identity
    dependencies: Vec<StableId>,
    /// True when the item was reached only transitively, never selected
    is_dependency: bool,
    /// Manual ignore flag from the edit overlay
    ignored: bool,
    /// Whether auxiliary files are included in the dataset
    include_auxiliary: bool,
    /// Status from the item's own remote comparison
    self_status: UploadStatus,
    /// Status after dependency-graph propagation
    final_status: UploadStatus,
    /// Remote counterpart found during self-status resolution
    existing_remote: Option<RemoteRef>,
}

impl UploadCandidate {
    /// Creates a new candidate with unresolved statuses
    pub fn new(id: StableId, name: impl Into<String>, kind: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            kind: kind.into(),
            tags: Vec::new(),
            description: None,
            custom_metadata: BTreeMap::new(),
            files: Vec::new(),
            dependencies: Vec::new(),
            is_dependency: false,
            ignored: false,
            include_auxiliary: false,
            self_status: UploadStatus::None,
            final_status: UploadStatus::None,
            existing_remote: None,
        }
    }

    // --- Getters ---

    /// Stable identity
    pub fn id(&self) -> &StableId {
        &self.id
    }

    /// Display name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Item type name
    pub fn kind(&self) -> &str {
        &self.kind
    }

    /// Tags
    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    /// Description, if any
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Custom metadata map
    pub fn custom_metadata(&self) -> &BTreeMap<String, String> {
        &self.custom_metadata
    }

    /// Dataset files
    pub fn files(&self) -> &[LocalFile] {
        &self.files
    }

    /// Direct dependency identities
    pub fn dependencies(&self) -> &[StableId] {
        &self.dependencies
    }

    /// True when reached only transitively
    pub fn is_dependency(&self) -> bool {
        self.is_dependency
    }

    /// Manual ignore flag
    pub fn is_ignored(&self) -> bool {
        self.ignored
    }

    /// Whether auxiliary files are included
    pub fn include_auxiliary(&self) -> bool {
        self.include_auxiliary
    }

    /// Self status (own remote comparison only)
    pub fn self_status(&self) -> UploadStatus {
        self.self_status
    }

    /// Final status (after dependency propagation)
    pub fn final_status(&self) -> UploadStatus {
        self.final_status
    }

    /// Remote counterpart found during resolution
    pub fn existing_remote(&self) -> Option<&RemoteRef> {
        self.existing_remote.as_ref()
    }

    // --- Derived predicates ---

    /// Returns true if this candidate will be part of the actual transfer
    ///
    /// A manually ignored dependency is never uploaded, whatever its
    /// final status says.
    pub fn can_be_uploaded(&self) -> bool {
        self.final_status.requires_upload() && !(self.is_dependency && self.ignored)
    }

    /// Returns true if the operator may toggle the ignore flag
    ///
    /// Only dependencies can be ignored, and only once resolution has
    /// shown there is something to ignore.
    pub fn can_be_ignored(&self) -> bool {
        self.is_dependency
            && !matches!(self.final_status, UploadStatus::None | UploadStatus::Skip)
    }

    /// Total byte size of the candidate's dataset
    pub fn total_bytes(&self) -> u64 {
        self.files.iter().map(|f| f.size_bytes).sum()
    }

    /// Files participating in the "skip if identical" comparison
    pub fn comparable_files(&self) -> impl Iterator<Item = &LocalFile> {
        self.files.iter().filter(|f| !f.is_satellite_metadata())
    }

    // --- Builder-style setters used during plan construction ---

    /// Replaces the display name
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// Replaces the description
    pub fn set_description(&mut self, description: Option<String>) {
        self.description = description;
    }

    /// Replaces the tag list
    pub fn set_tags(&mut self, tags: Vec<String>) {
        self.tags = tags;
    }

    /// Replaces the custom metadata map
    pub fn set_custom_metadata(&mut self, metadata: BTreeMap<String, String>) {
        self.custom_metadata = metadata;
    }

    /// Replaces the dataset file list
    pub fn set_files(&mut self, files: Vec<LocalFile>) {
        self.files = files;
    }

    /// Appends files to the dataset (embedded-mode inlining)
    pub fn extend_files(&mut self, files: impl IntoIterator<Item = LocalFile>) {
        self.files.extend(files);
    }

    /// Replaces the dependency edge list
    pub fn set_dependencies(&mut self, dependencies: Vec<StableId>) {
        self.dependencies = dependencies;
    }

    /// Marks the candidate as transitively reached
    pub fn set_is_dependency(&mut self, is_dependency: bool) {
        self.is_dependency = is_dependency;
    }

    /// Sets the manual ignore flag
    pub fn set_ignored(&mut self, ignored: bool) {
        self.ignored = ignored;
    }

    /// Sets whether auxiliary files are included
    pub fn set_include_auxiliary(&mut self, include: bool) {
        self.include_auxiliary = include;
    }

    // --- Status resolution setters ---

    /// Records the self status determined by the remote comparison
    pub fn set_self_status(&mut self, status: UploadStatus) {
        self.self_status = status;
    }

    /// Records the final status after dependency propagation
    pub fn set_final_status(&mut self, status: UploadStatus) {
        self.final_status = status;
    }

    /// Records the remote counterpart found during resolution
    pub fn set_existing_remote(&mut self, remote: Option<RemoteRef>) {
        self.existing_remote = remote;
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn file(dest: &str, size: u64) -> LocalFile {
        LocalFile {
            source_path: PathBuf::from(format!("/project/{dest}")),
            dest_path: dest.to_string(),
            size_bytes: size,
            sub_id: StableId::new(),
            checksum: None,
            auxiliary: false,
        }
    }

    mod upload_status_tests {
        use super::*;

        #[test]
        fn test_requires_upload() {
            assert!(UploadStatus::Add.requires_upload());
            assert!(UploadStatus::Override.requires_upload());
            assert!(UploadStatus::Duplicate.requires_upload());
            assert!(!UploadStatus::Skip.requires_upload());
            assert!(!UploadStatus::None.requires_upload());
            assert!(!UploadStatus::OutsideScope.requires_upload());
            assert!(!UploadStatus::Imported.requires_upload());
            assert!(!UploadStatus::Unknown.requires_upload());
        }

        #[test]
        fn test_is_terminal() {
            assert!(UploadStatus::OutsideScope.is_terminal());
            assert!(UploadStatus::Imported.is_terminal());
            assert!(!UploadStatus::Add.is_terminal());
            assert!(!UploadStatus::Skip.is_terminal());
        }

        #[test]
        fn test_is_resolved() {
            assert!(!UploadStatus::None.is_resolved());
            assert!(UploadStatus::Unknown.is_resolved());
            assert!(UploadStatus::Skip.is_resolved());
        }

        #[test]
        fn test_display() {
            assert_eq!(UploadStatus::Add.to_string(), "add");
            assert_eq!(UploadStatus::OutsideScope.to_string(), "outside-scope");
            assert_eq!(UploadStatus::None.to_string(), "unresolved");
        }

        #[test]
        fn test_default_is_none() {
            assert_eq!(UploadStatus::default(), UploadStatus::None);
        }
    }

    mod local_file_tests {
        use super::*;

        #[test]
        fn test_satellite_metadata_detection() {
            assert!(file("textures/brick.png.meta", 1).is_satellite_metadata());
            assert!(!file("textures/brick.png", 1).is_satellite_metadata());
        }
    }

    mod candidate_tests {
        use super::*;

        fn candidate() -> UploadCandidate {
            let mut c = UploadCandidate::new(StableId::new(), "Road Tiles", "package");
            c.set_files(vec![
                file("tiles/straight.mesh", 100),
                file("tiles/straight.mesh.meta", 10),
                file("tiles/curve.mesh", 200),
            ]);
            c
        }

        #[test]
        fn test_new_starts_unresolved() {
            let c = candidate();
            assert_eq!(c.self_status(), UploadStatus::None);
            assert_eq!(c.final_status(), UploadStatus::None);
            assert!(c.existing_remote().is_none());
            assert!(!c.is_dependency());
            assert!(!c.is_ignored());
        }

        #[test]
        fn test_total_bytes() {
            assert_eq!(candidate().total_bytes(), 310);
        }

        #[test]
        fn test_comparable_files_skip_satellites() {
            let c = candidate();
            let dests: Vec<&str> = c.comparable_files().map(|f| f.dest_path.as_str()).collect();
            assert_eq!(dests, vec!["tiles/straight.mesh", "tiles/curve.mesh"]);
        }

        #[test]
        fn test_can_be_uploaded() {
            let mut c = candidate();
            c.set_final_status(UploadStatus::Add);
            assert!(c.can_be_uploaded());

            c.set_final_status(UploadStatus::Skip);
            assert!(!c.can_be_uploaded());
        }

        #[test]
        fn test_ignored_dependency_cannot_be_uploaded() {
            let mut c = candidate();
            c.set_is_dependency(true);
            c.set_ignored(true);
            c.set_final_status(UploadStatus::Override);
            assert!(!c.can_be_uploaded());

            // An ignored root selection still uploads; only dependencies
            // honor the ignore flag for upload gating.
            c.set_is_dependency(false);
            assert!(c.can_be_uploaded());
        }

        #[test]
        fn test_can_be_ignored() {
            let mut c = candidate();
            c.set_is_dependency(true);

            c.set_final_status(UploadStatus::None);
            assert!(!c.can_be_ignored());

            c.set_final_status(UploadStatus::Skip);
            assert!(!c.can_be_ignored());

            c.set_final_status(UploadStatus::Add);
            assert!(c.can_be_ignored());

            c.set_is_dependency(false);
            assert!(!c.can_be_ignored());
        }

        #[test]
        fn test_serde_roundtrip() {
            let mut c = candidate();
            c.set_self_status(UploadStatus::Skip);
            c.set_final_status(UploadStatus::Override);
            c.set_existing_remote(Some(
                crate::domain::ids::RemoteRef::new("acme", "demo", "pkg", 2).unwrap(),
            ));

            let json = serde_json::to_string(&c).unwrap();
            let parsed: UploadCandidate = serde_json::from_str(&json).unwrap();
            assert_eq!(c, parsed);
        }
    }
}
