//! `depotsync plan` - build and resolve an upload plan

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Args;
use tokio_util::sync::CancellationToken;

use depotsync_core::config::{DependencyMode, VersionPolicy};
use depotsync_core::domain::candidate::UploadCandidate;
use depotsync_plan::{PlanSnapshot, UploadPlanner};
use depotsync_workspace::StaticCatalog;

use crate::commands;
use crate::output::{get_formatter, OutputFormat};

/// Build an upload plan for a selection of items and resolve statuses
#[derive(Debug, Args)]
pub struct PlanCommand {
    /// Items to plan (display names or stable ids); all items when omitted
    pub items: Vec<String>,

    /// Dependency mode override: embedded or separate
    #[arg(long)]
    pub mode: Option<String>,

    /// Version policy override: skip_identical, force_new_version,
    /// create_new, or assume_imported
    #[arg(long)]
    pub policy: Option<String>,

    /// Remote catalog fixture for status resolution (offline otherwise)
    #[arg(long)]
    pub catalog: Option<PathBuf>,

    /// Alternate config file
    #[arg(long)]
    pub config: Option<String>,
}

impl PlanCommand {
    pub async fn execute(self, format: OutputFormat) -> Result<()> {
        let formatter = get_formatter(format);
        let config = commands::load_config(self.config.as_deref());

        let manifest = Arc::new(commands::load_manifest(&config)?);
        let ledger = Arc::new(commands::load_ledger(&config)?);
        let overlay = commands::overlay_store(&config)
            .load()
            .context("Failed to load edit overlay")?;

        let selection = if self.items.is_empty() {
            manifest.item_ids().copied().collect()
        } else {
            commands::resolve_selection(&manifest, &self.items)?
        };

        let check_remote = self.catalog.is_some();
        let catalog = match &self.catalog {
            Some(path) => Arc::new(
                StaticCatalog::load(path)
                    .with_context(|| format!("Failed to load catalog: {}", path.display()))?,
            ),
            None => Arc::new(StaticCatalog::empty()),
        };

        let mut settings = config.plan_settings();
        if let Some(mode) = &self.mode {
            settings.dependency_mode = parse_mode(mode)?;
        }
        if let Some(policy) = &self.policy {
            settings.version_policy = parse_policy(policy)?;
        }

        let planner = UploadPlanner::new(manifest, catalog, ledger, settings);
        let candidates = planner.generate_plan(&selection, &overlay)?;

        // Ctrl-C abandons the resolution pass instead of killing mid-print
        let cancel = CancellationToken::new();
        let cancel_on_signal = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                cancel_on_signal.cancel();
            }
        });

        let snapshot = planner
            .refresh_status(candidates, check_remote, &cancel, None)
            .await?;

        match format {
            OutputFormat::Json => formatter.print_json(&snapshot_json(&snapshot)),
            OutputFormat::Human => {
                for candidate in &snapshot.candidates {
                    formatter.info(&candidate_line(candidate));
                }
                formatter.success(&format!("Plan resolved: {}", snapshot.staging));
                if snapshot.staging.has_outside_scope {
                    formatter.warn("Some items lie outside the managed project scope");
                }
                if snapshot.staging.unresolved > 0 {
                    formatter.warn(&format!(
                        "{} item(s) have unknown status (remote unreachable)",
                        snapshot.staging.unresolved
                    ));
                }
            }
        }

        Ok(())
    }
}

fn parse_mode(value: &str) -> Result<DependencyMode> {
    match value {
        "embedded" => Ok(DependencyMode::Embedded),
        "separate" => Ok(DependencyMode::Separate),
        other => anyhow::bail!("Unknown dependency mode: {other}"),
    }
}

fn parse_policy(value: &str) -> Result<VersionPolicy> {
    match value {
        "skip_identical" => Ok(VersionPolicy::SkipIdentical),
        "force_new_version" => Ok(VersionPolicy::ForceNewVersion),
        "create_new" => Ok(VersionPolicy::CreateNew),
        "assume_imported" => Ok(VersionPolicy::AssumeImported),
        other => anyhow::bail!("Unknown version policy: {other}"),
    }
}

fn candidate_line(candidate: &UploadCandidate) -> String {
    let mut line = format!(
        "[{:>13}] {} ({}, {} files, {} bytes)",
        candidate.final_status().to_string(),
        candidate.name(),
        candidate.kind(),
        candidate.files().len(),
        candidate.total_bytes(),
    );
    if candidate.is_dependency() {
        line.push_str(" [dependency]");
    }
    if candidate.is_ignored() {
        line.push_str(" [ignored]");
    }
    line
}

fn snapshot_json(snapshot: &PlanSnapshot) -> serde_json::Value {
    serde_json::json!({
        "resolved_at": snapshot.resolved_at.to_rfc3339(),
        "staging": snapshot.staging,
        "candidates": snapshot.candidates.iter().map(|c| {
            serde_json::json!({
                "id": c.id().to_string(),
                "name": c.name(),
                "kind": c.kind(),
                "self_status": c.self_status(),
                "final_status": c.final_status(),
                "is_dependency": c.is_dependency(),
                "ignored": c.is_ignored(),
                "files": c.files().len(),
                "bytes": c.total_bytes(),
                "existing_remote": c.existing_remote().map(|r| r.to_string()),
            })
        }).collect::<Vec<_>>(),
    })
}
