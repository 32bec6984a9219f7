//! Workspace manifest - JSON-backed content graph
//!
//! The manifest describes the local item graph: items with their files,
//! tags, dependency edges, and embedded-only edges. It is produced by the
//! authoring tool; this adapter only reads it and serves it through the
//! [`IContentGraph`] port.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use depotsync_core::domain::candidate::LocalFile;
use depotsync_core::domain::ids::StableId;
use depotsync_core::ports::content_graph::{IContentGraph, ItemInfo};

use crate::WorkspaceError;

// ============================================================================
// Manifest schema
// ============================================================================

/// One file entry in the manifest
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ManifestFile {
    /// Absolute source path on disk
    pub source: PathBuf,
    /// Store-relative destination path
    pub dest: String,
    /// Size in bytes
    #[serde(default)]
    pub size: u64,
    /// Stable sub-identity of the file
    pub sub_id: StableId,
    /// Recorded content checksum, when the authoring tool computed one
    #[serde(default)]
    pub checksum: Option<String>,
    /// Whether the file is auxiliary (only shipped on request)
    #[serde(default)]
    pub auxiliary: bool,
}

/// One item entry in the manifest
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ManifestItem {
    /// Stable identity
    pub id: StableId,
    /// Display name
    pub name: String,
    /// Item type name
    pub kind: String,
    /// Tags
    #[serde(default)]
    pub tags: Vec<String>,
    /// Absolute path of the item's root file
    pub root: PathBuf,
    /// Files making up the dataset
    #[serde(default)]
    pub files: Vec<ManifestFile>,
    /// Dependency edges (standalone-capable)
    #[serde(default)]
    pub dependencies: Vec<StableId>,
    /// Embedded-only edges (content that rides along with this item)
    #[serde(default)]
    pub embedded: Vec<StableId>,
}

/// The JSON manifest as written by the authoring tool
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ManifestFileFormat {
    /// Root directory of the managed project
    project_root: PathBuf,
    /// All known items
    items: Vec<ManifestItem>,
}

// ============================================================================
// WorkspaceManifest
// ============================================================================

/// Content graph over a loaded manifest
pub struct WorkspaceManifest {
    project_root: PathBuf,
    items: HashMap<StableId, ManifestItem>,
}

impl WorkspaceManifest {
    /// Loads a manifest from a JSON file
    pub fn load(path: &Path) -> Result<Self, WorkspaceError> {
        let content = std::fs::read_to_string(path).map_err(|source| WorkspaceError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let format: ManifestFileFormat =
            serde_json::from_str(&content).map_err(|source| WorkspaceError::Serialization {
                path: path.to_path_buf(),
                source,
            })?;

        debug!(
            items = format.items.len(),
            project_root = %format.project_root.display(),
            "Loaded workspace manifest"
        );

        Ok(Self::from_items(format.project_root, format.items))
    }

    /// Builds a manifest graph from already-parsed items
    pub fn from_items(project_root: PathBuf, items: Vec<ManifestItem>) -> Self {
        let items = items.into_iter().map(|item| (item.id, item)).collect();
        Self {
            project_root,
            items,
        }
    }

    /// Root directory of the managed project
    pub fn project_root(&self) -> &Path {
        &self.project_root
    }

    /// All item identities in the manifest
    pub fn item_ids(&self) -> impl Iterator<Item = &StableId> {
        self.items.keys()
    }

    /// Looks up an item by display name
    pub fn find_by_name(&self, name: &str) -> Option<&ManifestItem> {
        self.items.values().find(|item| item.name == name)
    }

    fn item(&self, id: &StableId) -> anyhow::Result<&ManifestItem> {
        self.items
            .get(id)
            .ok_or_else(|| anyhow::anyhow!("unknown item in manifest: {id}"))
    }
}

impl IContentGraph for WorkspaceManifest {
    fn item_info(&self, id: &StableId) -> anyhow::Result<ItemInfo> {
        let item = self.item(id)?;
        Ok(ItemInfo {
            name: item.name.clone(),
            kind: item.kind.clone(),
            tags: item.tags.clone(),
            root_path: item.root.clone(),
        })
    }

    fn direct_dependencies(&self, id: &StableId, inline: bool) -> anyhow::Result<Vec<StableId>> {
        let item = self.item(id)?;
        let mut edges = item.dependencies.clone();
        if inline {
            edges.extend(item.embedded.iter().copied());
        }
        Ok(edges)
    }

    fn files(&self, id: &StableId, include_auxiliary: bool) -> anyhow::Result<Vec<LocalFile>> {
        let item = self.item(id)?;
        Ok(item
            .files
            .iter()
            .filter(|f| include_auxiliary || !f.auxiliary)
            .map(|f| LocalFile {
                source_path: f.source.clone(),
                dest_path: f.dest.clone(),
                size_bytes: f.size,
                sub_id: f.sub_id,
                checksum: f.checksum.clone(),
                auxiliary: f.auxiliary,
            })
            .collect())
    }

    fn is_within_project(&self, id: &StableId) -> anyhow::Result<bool> {
        let item = self.item(id)?;
        Ok(item.root.starts_with(&self.project_root))
    }
}

// ============================================================================
// Tests
// ============================================================================
