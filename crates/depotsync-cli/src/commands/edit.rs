//! `depotsync edit` - manage the persisted edit overlay

use anyhow::{Context, Result};
use clap::Subcommand;

use depotsync_core::domain::ids::StableId;
use depotsync_core::domain::overlay::{EditOverlay, FieldEdit};

use crate::commands;
use crate::output::{get_formatter, OutputFormat};

/// Manage manual overrides (ignore flags, renames, tags)
#[derive(Debug, Subcommand)]
pub enum EditCommand {
    /// Mark an item as ignored
    Ignore {
        /// Item display name or stable id
        item: String,
        /// Alternate config file
        #[arg(long)]
        config: Option<String>,
    },
    /// Clear an item's ignore flag
    Unignore {
        item: String,
        #[arg(long)]
        config: Option<String>,
    },
    /// Override an item's display name
    SetName {
        item: String,
        name: String,
        #[arg(long)]
        config: Option<String>,
    },
    /// Override an item's description
    SetDescription {
        item: String,
        description: String,
        #[arg(long)]
        config: Option<String>,
    },
    /// Replace an item's tag list
    SetTags {
        item: String,
        /// Comma-separated tags
        tags: String,
        #[arg(long)]
        config: Option<String>,
    },
    /// Include or exclude auxiliary files for an item
    Aux {
        item: String,
        /// "on" or "off"
        state: String,
        #[arg(long)]
        config: Option<String>,
    },
    /// Remove all field edits for an item (flags are kept)
    Clear {
        item: String,
        #[arg(long)]
        config: Option<String>,
    },
}

impl EditCommand {
    pub async fn execute(self, format: OutputFormat) -> Result<()> {
        let formatter = get_formatter(format);

        let message = match self {
            EditCommand::Ignore { item, config } => {
                with_overlay(config.as_deref(), &item, |overlay, id| {
                    overlay.set_ignored(id, true);
                    Ok(format!("Ignoring '{item}'"))
                })?
            }
            EditCommand::Unignore { item, config } => {
                with_overlay(config.as_deref(), &item, |overlay, id| {
                    overlay.set_ignored(id, false);
                    Ok(format!("No longer ignoring '{item}'"))
                })?
            }
            EditCommand::SetName { item, name, config } => {
                with_overlay(config.as_deref(), &item, |overlay, id| {
                    overlay.set_edit(id, FieldEdit::name(name.clone())?);
                    Ok(format!("Renamed '{item}' to '{name}'"))
                })?
            }
            EditCommand::SetDescription {
                item,
                description,
                config,
            } => with_overlay(config.as_deref(), &item, |overlay, id| {
                overlay.set_edit(id, FieldEdit::description(description)?);
                Ok(format!("Updated description of '{item}'"))
            })?,
            EditCommand::SetTags { item, tags, config } => {
                let tag_list: Vec<String> = tags
                    .split(',')
                    .map(|t| t.trim().to_string())
                    .filter(|t| !t.is_empty())
                    .collect();
                let count = tag_list.len();
                with_overlay(config.as_deref(), &item, |overlay, id| {
                    overlay.set_edit(id, FieldEdit::tags(tag_list)?);
                    Ok(format!("Tagged '{item}' with {count} tag(s)"))
                })?
            }
            EditCommand::Aux {
                item,
                state,
                config,
            } => {
                let include = match state.as_str() {
                    "on" => true,
                    "off" => false,
                    other => anyhow::bail!("Expected 'on' or 'off', got '{other}'"),
                };
                with_overlay(config.as_deref(), &item, |overlay, id| {
                    overlay.set_include_auxiliary(id, include);
                    Ok(format!(
                        "Auxiliary files {} for '{item}'",
                        if include { "included" } else { "excluded" }
                    ))
                })?
            }
            EditCommand::Clear { item, config } => {
                with_overlay(config.as_deref(), &item, |overlay, id| {
                    overlay.clear_edits(&id);
                    Ok(format!("Cleared edits for '{item}'"))
                })?
            }
        };

        formatter.success(&message);
        Ok(())
    }
}

/// Loads the overlay, applies one mutation, and persists it
fn with_overlay<F>(config_path: Option<&str>, item: &str, mutate: F) -> Result<String>
where
    F: FnOnce(&mut EditOverlay, StableId) -> Result<String>,
{
    let config = commands::load_config(config_path);
    let manifest = commands::load_manifest(&config)?;
    let id = commands::resolve_item(&manifest, item)?;

    let store = commands::overlay_store(&config);
    let mut overlay = store.load().context("Failed to load edit overlay")?;
    let message = mutate(&mut overlay, id)?;
    store.save(&overlay).context("Failed to save edit overlay")?;

    Ok(message)
}
