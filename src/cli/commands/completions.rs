//! Shell completions generation.
//!
//! The `ghx completions` command generates shell completion scripts.

use crate::cli::args::{Cli, CompletionsArgs};
use crate::factory::Factory;
use clap::CommandFactory;

use super::dispatcher::{Command, CommandResult};

/// The completions command implementation.
pub struct CompletionsCommand {
    args: CompletionsArgs,
}

impl CompletionsCommand {
    /// Create a new completions command.
    pub fn new(args: CompletionsArgs) -> Self {
        Self { args }
    }
}

impl Command for CompletionsCommand {
    fn execute(&self, factory: &Factory) -> crate::error::Result<CommandResult> {
        let mut cmd = Cli::command();
        clap_complete::generate(self.args.shell, &mut cmd, "ghx", &mut factory.io_streams().out());
        Ok(CommandResult::success())
    }
}
