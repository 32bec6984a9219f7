//! Configuration module for Depotsync.
//!
//! Provides typed configuration structs that map to the YAML configuration
//! file, with loading, validation, defaults, and conversion into the
//! engine-facing [`PlanSettings`].

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Engine-facing settings
// ---------------------------------------------------------------------------

/// How dependencies are materialized in the upload plan.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DependencyMode {
    /// Dependency files are inlined into the dependent's dataset;
    /// no separate candidate is produced unless also selected.
    Embedded,
    /// One shared candidate per distinct dependency.
    #[default]
    Separate,
}

/// How an existing remote counterpart is treated during status resolution.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VersionPolicy {
    /// Compare file sets; unchanged items are skipped, changed ones
    /// produce a new version.
    #[default]
    SkipIdentical,
    /// Always produce a new version, even when unchanged.
    ForceNewVersion,
    /// Always create a brand-new remote item (duplicate).
    CreateNew,
    /// Treat the item as already imported; no action required.
    AssumeImported,
}

/// Settings consumed by the planning engine for one regeneration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanSettings {
    /// Dependency materialization mode.
    pub dependency_mode: DependencyMode,
    /// Remote-counterpart handling policy.
    pub version_policy: VersionPolicy,
    /// Maximum number of in-flight remote lookups during status resolution.
    pub max_concurrent_checks: usize,
    /// Default for the per-item "include auxiliary files" flag.
    pub include_auxiliary_default: bool,
}

impl Default for PlanSettings {
    fn default() -> Self {
        Self {
            dependency_mode: DependencyMode::default(),
            version_policy: VersionPolicy::default(),
            max_concurrent_checks: 8,
            include_auxiliary_default: false,
        }
    }
}

// ---------------------------------------------------------------------------
// Config struct with sub-sections
// ---------------------------------------------------------------------------

/// Top-level configuration for Depotsync.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub plan: PlanConfig,
    pub check: CheckConfig,
    pub workspace: WorkspaceConfig,
    pub logging: LoggingConfig,
}

/// Upload planning settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlanConfig {
    /// Dependency materialization mode: `embedded` or `separate`.
    pub dependency_mode: DependencyMode,
    /// Remote-counterpart policy: `skip_identical`, `force_new_version`,
    /// `create_new`, or `assume_imported`.
    pub version_policy: VersionPolicy,
    /// Maximum concurrent remote lookups during status resolution.
    pub max_concurrent_checks: usize,
    /// Include auxiliary files by default.
    pub include_auxiliary: bool,
}

/// Update/conflict checker settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CheckConfig {
    /// Maximum concurrent remote lookups during update checks.
    pub max_concurrent_checks: usize,
}

/// Workspace file locations.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkspaceConfig {
    /// Path to the workspace manifest describing the local item graph.
    pub manifest: PathBuf,
    /// Path to the tracked-import ledger.
    pub ledger: PathBuf,
    /// Path to the persisted edit overlay.
    pub overlay: PathBuf,
}

/// Logging / tracing settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level: `trace`, `debug`, `info`, `warn`, or `error`.
    pub level: String,
}

// ---------------------------------------------------------------------------
// Defaults
// ---------------------------------------------------------------------------

impl Default for PlanConfig {
    fn default() -> Self {
        Self {
            dependency_mode: DependencyMode::Separate,
            version_policy: VersionPolicy::SkipIdentical,
            max_concurrent_checks: 8,
            include_auxiliary: false,
        }
    }
}

impl Default for CheckConfig {
    fn default() -> Self {
        Self {
            max_concurrent_checks: 8,
        }
    }
}

impl Default for WorkspaceConfig {
    fn default() -> Self {
        Self {
            manifest: PathBuf::from("depot.manifest.json"),
            ledger: PathBuf::from(".depotsync/ledger.json"),
            overlay: PathBuf::from(".depotsync/overlay.json"),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

impl Config {
    /// Load configuration from a YAML file at `path`.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    /// Try to load from `path`; fall back to [`Config::default`] on any error.
    pub fn load_or_default(path: &Path) -> Self {
        Self::load(path).unwrap_or_default()
    }

    /// Platform-appropriate default path for the configuration file.
    ///
    /// Typically `$XDG_CONFIG_HOME/depotsync/config.yaml` on Linux.
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("~/.config"))
            .join("depotsync")
            .join("config.yaml")
    }

    /// Builds the engine-facing plan settings from the config.
    pub fn plan_settings(&self) -> PlanSettings {
        PlanSettings {
            dependency_mode: self.plan.dependency_mode,
            version_policy: self.plan.version_policy,
            max_concurrent_checks: self.plan.max_concurrent_checks.max(1),
            include_auxiliary_default: self.plan.include_auxiliary,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
