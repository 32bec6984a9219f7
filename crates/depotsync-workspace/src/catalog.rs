//! Static remote catalog - fixture-backed IRemoteCatalog
//!
//! Serves remote lookups from a JSON fixture instead of a live store.
//! Used by the CLI for offline planning and demos, and convenient for
//! reproducing planner behavior against a known remote state.

use std::collections::{HashMap, HashSet};
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use depotsync_core::domain::ids::{RemoteRef, StableId};
use depotsync_core::ports::remote_catalog::{IRemoteCatalog, RemoteVersion};

use crate::WorkspaceError;

/// On-disk fixture format
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct CatalogFileFormat {
    /// Local-to-remote cross-reference
    #[serde(default)]
    counterparts: HashMap<StableId, RemoteRef>,
    /// Remote refs that are mapped but no longer exist on the server
    #[serde(default)]
    deleted: HashSet<RemoteRef>,
    /// Latest version per remote item (keyed by display form, version part
    /// ignored on lookup)
    #[serde(default)]
    latest: HashMap<String, RemoteVersion>,
}

/// Fixture-backed remote catalog
#[derive(Default)]
pub struct StaticCatalog {
    counterparts: HashMap<StableId, RemoteRef>,
    deleted: HashSet<RemoteRef>,
    latest: HashMap<String, RemoteVersion>,
}

impl StaticCatalog {
    /// Loads a catalog fixture from a JSON file
    pub fn load(path: &Path) -> Result<Self, WorkspaceError> {
        let content = std::fs::read_to_string(path).map_err(|source| WorkspaceError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let format: CatalogFileFormat =
            serde_json::from_str(&content).map_err(|source| WorkspaceError::Serialization {
                path: path.to_path_buf(),
                source,
            })?;

        debug!(
            counterparts = format.counterparts.len(),
            latest = format.latest.len(),
            "Loaded static catalog"
        );

        Ok(Self {
            counterparts: format.counterparts,
            deleted: format.deleted,
            latest: format.latest,
        })
    }

    /// An empty catalog: every item resolves as new
    pub fn empty() -> Self {
        Self::default()
    }

    /// Registers a counterpart mapping (programmatic fixture building)
    pub fn with_counterpart(mut self, id: StableId, remote: RemoteRef) -> Self {
        self.counterparts.insert(id, remote);
        self
    }

    /// Registers a latest-version entry
    pub fn with_latest(mut self, remote: &RemoteRef, latest: RemoteVersion) -> Self {
        self.latest.insert(Self::item_key(remote), latest);
        self
    }

    fn item_key(remote: &RemoteRef) -> String {
        format!(
            "{}/{}/{}",
            remote.organization(),
            remote.project(),
            remote.item_id()
        )
    }
}

#[async_trait::async_trait]
impl IRemoteCatalog for StaticCatalog {
    async fn find_counterpart(&self, id: &StableId) -> anyhow::Result<Option<RemoteRef>> {
        Ok(self.counterparts.get(id).cloned())
    }

    async fn item_exists(&self, remote: &RemoteRef) -> anyhow::Result<bool> {
        Ok(!self.deleted.iter().any(|d| d.same_item(remote)))
    }

    async fn latest_version(&self, remote: &RemoteRef) -> anyhow::Result<RemoteVersion> {
        self.latest
            .get(&Self::item_key(remote))
            .cloned()
            .ok_or_else(|| anyhow::anyhow!("item not in catalog fixture: {remote}"))
    }
}
