//! Dirty-object registry - in-process IDirtyObjects
//!
//! The host application registers which files are backed by live in-memory
//! objects and which of those carry unsaved edits. The registry is read
//! from concurrent check tasks while the host mutates it, hence the
//! concurrent map.

use std::path::{Path, PathBuf};

use dashmap::{DashMap, DashSet};

use depotsync_core::domain::ids::StableId;
use depotsync_core::ports::dirty_objects::IDirtyObjects;

/// Concurrent registry of file-backed in-memory objects
#[derive(Default)]
pub struct DirtyRegistry {
    objects: DashMap<PathBuf, StableId>,
    unsaved: DashSet<StableId>,
}

impl DirtyRegistry {
    /// Creates an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a live object backed by a file
    pub fn register(&self, path: PathBuf, id: StableId) {
        self.objects.insert(path, id);
    }

    /// Removes a registration (object unloaded)
    pub fn unregister(&self, path: &Path) {
        if let Some((_, id)) = self.objects.remove(path) {
            self.unsaved.remove(&id);
        }
    }

    /// Marks or clears the unsaved flag for an object
    pub fn set_unsaved(&self, id: StableId, unsaved: bool) {
        if unsaved {
            self.unsaved.insert(id);
        } else {
            self.unsaved.remove(&id);
        }
    }

    /// Number of registered objects
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// Returns true when nothing is registered
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }
}

impl IDirtyObjects for DirtyRegistry {
    fn object_for_file(&self, path: &Path) -> anyhow::Result<Option<StableId>> {
        Ok(self.objects.get(path).map(|entry| *entry.value()))
    }

    fn is_unsaved(&self, id: &StableId) -> bool {
        self.unsaved.contains(id)
    }
}
