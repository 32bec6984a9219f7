//! `depotsync completions` - shell completion generation

use anyhow::Result;
use clap::{Args, CommandFactory};
use clap_complete::Shell;

use crate::output::OutputFormat;
use crate::Cli;

/// Generate shell completions
#[derive(Debug, Args)]
pub struct CompletionsCommand {
    /// Target shell
    #[arg(value_enum)]
    pub shell: Shell,
}

impl CompletionsCommand {
    pub async fn execute(self, _format: OutputFormat) -> Result<()> {
        let mut command = Cli::command();
        clap_complete::generate(
            self.shell,
            &mut command,
            "depotsync",
            &mut std::io::stdout(),
        );
        Ok(())
    }
}
