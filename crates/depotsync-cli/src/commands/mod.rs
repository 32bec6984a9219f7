//! CLI command implementations
//!
//! Each command owns its clap arguments and an `execute` method. Shared
//! workspace loading and selection resolution live here.

pub mod check;
pub mod completions;
pub mod edit;
pub mod plan;

use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{bail, Context, Result};

use depotsync_core::config::Config;
use depotsync_core::domain::ids::StableId;
use depotsync_workspace::{OverlayStore, TrackedLedger, WorkspaceManifest};

/// Loads the config from the given path or the platform default
pub fn load_config(config_path: Option<&str>) -> Config {
    let path = config_path
        .map(PathBuf::from)
        .unwrap_or_else(Config::default_path);
    Config::load_or_default(&path)
}

/// Loads the workspace manifest named by the config
pub fn load_manifest(config: &Config) -> Result<WorkspaceManifest> {
    WorkspaceManifest::load(&config.workspace.manifest).with_context(|| {
        format!(
            "Failed to load workspace manifest: {}",
            config.workspace.manifest.display()
        )
    })
}

/// Loads the tracked ledger named by the config
pub fn load_ledger(config: &Config) -> Result<TrackedLedger> {
    TrackedLedger::load(&config.workspace.ledger).with_context(|| {
        format!(
            "Failed to load tracked ledger: {}",
            config.workspace.ledger.display()
        )
    })
}

/// Opens the overlay store named by the config
pub fn overlay_store(config: &Config) -> OverlayStore {
    OverlayStore::new(config.workspace.overlay.clone())
}

/// Resolves an item argument (stable id or display name) against the manifest
pub fn resolve_item(manifest: &WorkspaceManifest, arg: &str) -> Result<StableId> {
    if let Ok(id) = StableId::from_str(arg) {
        return Ok(id);
    }
    match manifest.find_by_name(arg) {
        Some(item) => Ok(item.id),
        None => bail!("No item named '{arg}' in the workspace manifest"),
    }
}

/// Resolves a list of item arguments
pub fn resolve_selection(manifest: &WorkspaceManifest, args: &[String]) -> Result<Vec<StableId>> {
    args.iter().map(|arg| resolve_item(manifest, arg)).collect()
}
