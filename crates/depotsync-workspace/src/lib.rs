//! Depotsync Workspace - Local adapters for the planning and checking engines
//!
//! Provides file-backed implementations of the core ports:
//! - [`WorkspaceManifest`] - content graph read from a JSON manifest
//! - [`TrackedLedger`] - tracked-import records read from a JSON ledger
//! - [`OverlayStore`] - persisted edit overlay (atomic JSON writes)
//! - [`StaticCatalog`] - fixture-backed remote catalog for offline use
//! - [`DirtyRegistry`] - in-process dirty-object registry

pub mod catalog;
pub mod dirty;
pub mod ledger;
pub mod manifest;
pub mod overlay_store;

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised by the workspace adapters
#[derive(Debug, Error)]
pub enum WorkspaceError {
    /// File could not be read or written
    #[error("IO error at {path}: {source}")]
    Io {
        /// The file involved
        path: PathBuf,
        /// The underlying error
        #[source]
        source: std::io::Error,
    },

    /// File content could not be parsed or encoded
    #[error("Serialization error at {path}: {source}")]
    Serialization {
        /// The file involved
        path: PathBuf,
        /// The underlying error
        #[source]
        source: serde_json::Error,
    },
}

pub use catalog::StaticCatalog;
pub use dirty::DirtyRegistry;
pub use ledger::TrackedLedger;
pub use manifest::WorkspaceManifest;
pub use overlay_store::OverlayStore;
