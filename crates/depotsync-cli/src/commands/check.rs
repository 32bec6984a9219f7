//! `depotsync check` - check tracked imports for updates and conflicts

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Args;
use tokio_util::sync::CancellationToken;

use depotsync_check::UpdateChecker;
use depotsync_core::domain::tracked::SyncCheckResult;
use depotsync_core::ports::tracked_store::ITrackedStore;
use depotsync_workspace::{DirtyRegistry, StaticCatalog};

use crate::commands;
use crate::output::{get_formatter, OutputFormat};

/// Check previously-imported items for newer remote versions and local
/// file conflicts
#[derive(Debug, Args)]
pub struct CheckCommand {
    /// Remote catalog fixture to check against
    #[arg(long)]
    pub catalog: PathBuf,

    /// Alternate config file
    #[arg(long)]
    pub config: Option<String>,
}

impl CheckCommand {
    pub async fn execute(self, format: OutputFormat) -> Result<()> {
        let formatter = get_formatter(format);
        let config = commands::load_config(self.config.as_deref());

        let ledger = Arc::new(commands::load_ledger(&config)?);
        let catalog = Arc::new(
            StaticCatalog::load(&self.catalog)
                .with_context(|| format!("Failed to load catalog: {}", self.catalog.display()))?,
        );

        let items = ledger.all();
        if items.is_empty() {
            formatter.success("No tracked imports to check");
            return Ok(());
        }

        let checker = UpdateChecker::new(
            catalog,
            ledger,
            Arc::new(DirtyRegistry::new()),
            config.check.max_concurrent_checks,
        );

        let cancel = CancellationToken::new();
        let cancel_on_signal = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                cancel_on_signal.cancel();
            }
        });

        let results = checker.check_for_updates(items, &cancel).await?;

        match format {
            OutputFormat::Json => {
                let json: serde_json::Value = results
                    .iter()
                    .map(|(remote, result)| (remote.to_string(), result_json(result)))
                    .collect::<serde_json::Map<String, serde_json::Value>>()
                    .into();
                formatter.print_json(&json);
            }
            OutputFormat::Human => {
                let mut attention = 0usize;
                for (remote, result) in &results {
                    if result.needs_attention() {
                        attention += 1;
                    }
                    formatter.info(&result_line(&remote.to_string(), result));
                }
                formatter.success(&format!(
                    "{} item(s) checked, {} need attention",
                    results.len(),
                    attention
                ));
            }
        }

        Ok(())
    }
}

fn result_line(remote: &str, result: &SyncCheckResult) -> String {
    if let Some(error) = &result.error {
        return format!("[ unknown  ] {remote}: {error}");
    }

    let freshness = if result.has_remote_changes {
        "stale"
    } else {
        "current"
    };
    let mut line = format!(
        "[{:>9}] {remote} (local v{})",
        freshness, result.current_version_index
    );
    if !result.file_conflicts.is_empty() {
        line.push_str(&format!(", {} conflicting file(s)", result.file_conflicts.len()));
    }
    if !result.dirty_local_objects.is_empty() {
        line.push_str(&format!(
            ", {} unsaved object(s)",
            result.dirty_local_objects.len()
        ));
    }
    line
}

fn result_json(result: &SyncCheckResult) -> serde_json::Value {
    serde_json::json!({
        "has_remote_changes": result.has_remote_changes,
        "is_modified": result.is_modified,
        "current_version_index": result.current_version_index,
        "is_latest_version": result.is_latest_version,
        "file_conflicts": result.file_conflicts,
        "dirty_local_objects": result.dirty_local_objects,
        "error": result.error,
    })
}
