//! Command dispatching.
//!
//! This module provides the core command infrastructure:
//! - [`Command`] trait for implementing commands
//! - [`CommandResult`] for uniform result reporting
//! - [`CommandDispatcher`] for routing CLI subcommands

use crate::cli::args::{Cli, Commands};
use crate::error::Result;
use crate::factory::Factory;

/// Trait for command implementations.
///
/// Each CLI subcommand implements this trait to provide its execution logic.
pub trait Command {
    /// Execute the command.
    ///
    /// # Arguments
    ///
    /// * `factory` - Source of config, streams, clients and repositories
    ///
    /// # Returns
    ///
    /// A [`CommandResult`] indicating success/failure and exit code.
    fn execute(&self, factory: &Factory) -> Result<CommandResult>;
}

/// Result of command execution.
#[derive(Debug)]
pub struct CommandResult {
    /// Whether the command succeeded.
    pub success: bool,

    /// Exit code to use (0 for success, non-zero for failure).
    pub exit_code: i32,
}

impl CommandResult {
    /// Create a successful result.
    pub fn success() -> Self {
        Self {
            success: true,
            exit_code: 0,
        }
    }

    /// Create a failure result.
    pub fn failure(exit_code: i32) -> Self {
        Self {
            success: false,
            exit_code,
        }
    }
}

/// Dispatches CLI commands to their implementations.
pub struct CommandDispatcher {
    factory: Factory,
}

impl CommandDispatcher {
    /// Create a new dispatcher around `factory`.
    pub fn new(factory: Factory) -> Self {
        Self { factory }
    }

    /// The factory commands run against.
    pub fn factory(&self) -> &Factory {
        &self.factory
    }

    /// Dispatch and execute a command.
    ///
    /// Routes the CLI subcommand to the appropriate command implementation
    /// and executes it.
    pub fn dispatch(&self, cli: &Cli) -> Result<CommandResult> {
        match &cli.command {
            Commands::Extensions(action) => {
                let cmd = super::extensions::ExtensionsCommand::new(action.clone());
                cmd.execute(&self.factory)
            }
            Commands::Api(args) => {
                let cmd = super::api::ApiCommand::new(args.clone());
                cmd.execute(&self.factory)
            }
            Commands::Browse(args) => {
                let cmd = super::browse::BrowseCommand::new(args.clone());
                cmd.execute(&self.factory)
            }
            Commands::Config(action) => {
                let cmd = super::config::ConfigCommand::new(action.clone());
                cmd.execute(&self.factory)
            }
            Commands::Completions(args) => {
                let cmd = super::completions::CompletionsCommand::new(args.clone());
                cmd.execute(&self.factory)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::args::ExtensionsAction;
    use crate::config::FileConfig;
    use crate::error::GhError;
    use crate::iostreams::IoStreams;
    use crate::testing::{ExtensionCall, StubExtensionManager};
    use std::sync::Arc;

    #[test]
    fn command_result_success() {
        let result = CommandResult::success();
        assert!(result.success);
        assert_eq!(result.exit_code, 0);
    }

    #[test]
    fn command_result_failure() {
        let result = CommandResult::failure(1);
        assert!(!result.success);
        assert_eq!(result.exit_code, 1);
    }

    #[test]
    fn dispatches_to_extension_manager() {
        let manager = StubExtensionManager::default();
        let (io, _) = IoStreams::test();
        let factory = Factory::builder("1.0.0")
            .io_streams(io)
            .config(FileConfig::blank())
            .extension_manager(Arc::new(manager.clone()))
            .build();
        let dispatcher = CommandDispatcher::new(factory);
        let cli = Cli {
            debug: false,
            command: Commands::Extensions(ExtensionsAction::List),
        };

        let err = dispatcher.dispatch(&cli).unwrap_err();

        assert!(matches!(err, GhError::NotFound(_)));
        assert_eq!(manager.calls(), vec![ExtensionCall::List]);
    }
}
