//! Command-line interface for ghx.
//!
//! This module provides the CLI argument parsing using clap's derive macros
//! and command implementations.
//!
//! # Architecture
//!
//! - [`args`] - Argument definitions using clap derive macros
//! - [`commands`] - Command implementations, each driven by a
//!   [`Factory`](crate::factory::Factory)

pub mod args;
pub mod commands;

pub use args::{
    ApiArgs, BrowseArgs, Cli, Commands, CompletionsArgs, ConfigAction, ConfigGetArgs,
    ExtensionInstallArgs, ExtensionRemoveArgs, ExtensionUpgradeArgs, ExtensionsAction,
};
pub use commands::{Command, CommandDispatcher, CommandResult};
