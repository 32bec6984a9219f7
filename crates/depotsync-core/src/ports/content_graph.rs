//! Local content graph port (driven/secondary port)
//!
//! This module defines the interface to the local item graph: what items
//! exist, which files belong to them, and which other items they depend
//! on. All methods are synchronous; the graph is local state (no network),
//! and dependency resolution is specified to run single-threaded.
//!
//! ## Design Notes
//!
//! - A missing identity is a structural error, not an empty answer:
//!   the resolver treats it as a hard failure for the regeneration,
//!   because a silently dropped edge would produce an incorrect plan.
//! - `direct_dependencies` takes an `inline` flag because some edge kinds
//!   only exist in embedded mode (an item may inline content it would not
//!   reference as a standalone dependency).

use std::path::PathBuf;

use crate::domain::candidate::LocalFile;
use crate::domain::ids::StableId;

/// Local attributes of one content item
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemInfo {
    /// Display name
    pub name: String,
    /// Item type name (package, prefab, material, ...)
    pub kind: String,
    /// Tags attached to the item
    pub tags: Vec<String>,
    /// Absolute path of the item's root file
    pub root_path: PathBuf,
}

/// Port trait for reading the local content graph
pub trait IContentGraph: Send + Sync {
    /// Returns the local attributes of an item
    ///
    /// # Errors
    /// Fails when the identity is unknown to the graph.
    fn item_info(&self, id: &StableId) -> anyhow::Result<ItemInfo>;

    /// Returns the direct dependency identities of an item
    ///
    /// With `inline` set, edges that only apply to embedded-mode
    /// inlining are included as well.
    fn direct_dependencies(&self, id: &StableId, inline: bool) -> anyhow::Result<Vec<StableId>>;

    /// Returns the files belonging to an item's dataset
    ///
    /// Auxiliary files are only included when `include_auxiliary` is set.
    fn files(&self, id: &StableId, include_auxiliary: bool) -> anyhow::Result<Vec<LocalFile>>;

    /// Returns true when the item's root file lies within the managed
    /// project scope
    fn is_within_project(&self, id: &StableId) -> anyhow::Result<bool>;
}
