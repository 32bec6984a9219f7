//! Depotsync CLI - Command-line interface for Depotsync
//!
//! Provides commands for:
//! - Building and resolving upload plans
//! - Checking tracked imports for updates and conflicts
//! - Managing manual overrides (ignore flags, renames, tags)

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;
mod output;

use commands::{
    check::CheckCommand, completions::CompletionsCommand, edit::EditCommand, plan::PlanCommand,
};
use output::OutputFormat;

#[derive(Debug, Parser)]
#[command(name = "depotsync", version, about = "Upload planning for versioned content stores")]
pub struct Cli {
    /// Output in JSON format
    #[arg(long, global = true)]
    json: bool,

    /// Verbose output (can be repeated: -v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Build an upload plan and resolve per-item statuses
    Plan(PlanCommand),
    /// Check tracked imports for updates and conflicts
    Check(CheckCommand),
    /// Manage manual overrides
    #[command(subcommand)]
    Edit(EditCommand),
    /// Generate shell completions
    Completions(CompletionsCommand),
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup tracing
    let filter = match cli.verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let format = if cli.json {
        OutputFormat::Json
    } else {
        OutputFormat::Human
    };

    match cli.command {
        Commands::Plan(cmd) => cmd.execute(format).await,
        Commands::Check(cmd) => cmd.execute(format).await,
        Commands::Edit(cmd) => cmd.execute(format).await,
        Commands::Completions(cmd) => cmd.execute(format).await,
    }
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_cli_parses() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_plan_args() {
        let cli = Cli::parse_from(["depotsync", "plan", "tiles", "--mode", "embedded"]);
        match cli.command {
            Commands::Plan(cmd) => {
                assert_eq!(cmd.items, vec!["tiles".to_string()]);
                assert_eq!(cmd.mode.as_deref(), Some("embedded"));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_edit_ignore_args() {
        let cli = Cli::parse_from(["depotsync", "edit", "ignore", "tiles"]);
        assert!(matches!(
            cli.command,
            Commands::Edit(EditCommand::Ignore { .. })
        ));
    }

    #[test]
    fn test_json_flag_is_global() {
        let cli = Cli::parse_from(["depotsync", "--json", "plan"]);
        assert!(cli.json);
    }
}
