//! Overlay persistence - load/save the edit overlay
//!
//! The overlay must survive plan regeneration and process restarts, so it
//! is persisted as JSON next to the workspace. Writes go through a
//! temporary file followed by an atomic rename, so a crash mid-write never
//! leaves a truncated overlay behind.

use std::path::{Path, PathBuf};

use tracing::debug;

use depotsync_core::domain::overlay::EditOverlay;

use crate::WorkspaceError;

/// Loads and saves the edit overlay
pub struct OverlayStore {
    path: PathBuf,
}

impl OverlayStore {
    /// Creates a store over the given overlay file path
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Loads the overlay; a missing file yields an empty overlay
    pub fn load(&self) -> Result<EditOverlay, WorkspaceError> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "No overlay file, starting empty");
                return Ok(EditOverlay::new());
            }
            Err(source) => {
                return Err(WorkspaceError::Io {
                    path: self.path.clone(),
                    source,
                })
            }
        };

        serde_json::from_str(&content).map_err(|source| WorkspaceError::Serialization {
            path: self.path.clone(),
            source,
        })
    }

    /// Saves the overlay atomically (write temp, then rename)
    pub fn save(&self, overlay: &EditOverlay) -> Result<(), WorkspaceError> {
        let content =
            serde_json::to_string_pretty(overlay).map_err(|source| {
                WorkspaceError::Serialization {
                    path: self.path.clone(),
                    source,
                }
            })?;

        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|source| WorkspaceError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        let temp_path = self.path.with_extension("json.tmp");
        std::fs::write(&temp_path, content).map_err(|source| WorkspaceError::Io {
            path: temp_path.clone(),
            source,
        })?;
        std::fs::rename(&temp_path, &self.path).map_err(|source| WorkspaceError::Io {
            path: self.path.clone(),
            source,
        })?;

        debug!(path = %self.path.display(), entries = overlay.len(), "Saved overlay");
        Ok(())
    }

    /// The overlay file path
    pub fn path(&self) -> &Path {
        &self.path
    }
}
