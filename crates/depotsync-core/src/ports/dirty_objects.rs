//! Dirty-object lookup port (driven/secondary port)
//!
//! Used only by the conflict checker: given a conflicting file, find the
//! corresponding in-memory object and ask whether it has unsaved local
//! changes. Lookups are best-effort; the checker logs and skips
//! individual failures rather than aborting the item's check.

use std::path::Path;

use crate::domain::ids::StableId;

/// Port trait for resolving files to live, possibly-unsaved objects
pub trait IDirtyObjects: Send + Sync {
    /// Finds the in-memory object backed by the given file
    ///
    /// Returns `None` when no live object is tied to the file. Errors are
    /// treated as individual lookup failures by the caller.
    fn object_for_file(&self, path: &Path) -> anyhow::Result<Option<StableId>>;

    /// Returns true when the object has local edits that are not saved
    fn is_unsaved(&self, id: &StableId) -> bool;
}
