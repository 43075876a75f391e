//! Config command implementation.
//!
//! The `ghx config get` command prints one resolved configuration value,
//! environment overrides included.

use std::io::Write;

use crate::cli::args::ConfigAction;
use crate::error::Result;
use crate::factory::Factory;

use super::dispatcher::{Command, CommandResult};

/// The config command implementation.
pub struct ConfigCommand {
    action: ConfigAction,
}

impl ConfigCommand {
    /// Create a new config command.
    pub fn new(action: ConfigAction) -> Self {
        Self { action }
    }
}

impl Command for ConfigCommand {
    fn execute(&self, factory: &Factory) -> Result<CommandResult> {
        let ConfigAction::Get(args) = &self.action;
        let config = factory.config()?;
        let host = args.host.as_deref().unwrap_or_default();

        match config.get(host, &args.key) {
            Some(value) if !value.is_empty() => {
                writeln!(factory.io_streams().out(), "{}", value)?;
                Ok(CommandResult::success())
            }
            _ => Ok(CommandResult::failure(1)),
        }
    }
}
