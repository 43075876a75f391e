//! Browse command implementation.
//!
//! `ghx browse [path]` opens the base repository's web page.

use std::io::Write;

use crate::cli::args::BrowseArgs;
use crate::error::Result;
use crate::factory::Factory;

use super::dispatcher::{Command, CommandResult};

/// The browse command implementation.
pub struct BrowseCommand {
    args: BrowseArgs,
}

impl BrowseCommand {
    /// Create a new browse command.
    pub fn new(args: BrowseArgs) -> Self {
        Self { args }
    }
}

impl Command for BrowseCommand {
    fn execute(&self, factory: &Factory) -> Result<CommandResult> {
        let repo = factory.smart_base_repo()?;
        let url = repo.web_url(self.args.path.as_deref().unwrap_or_default());
        let io = factory.io_streams();

        if self.args.no_browser {
            writeln!(io.out(), "{}", url)?;
            return Ok(CommandResult::success());
        }

        if io.is_stderr_tty() {
            writeln!(io.err(), "Opening {} in your browser.", url)?;
        }
        factory.browser().browse(&url)?;
        Ok(CommandResult::success())
    }
}
