//! CLI command implementations.
//!
//! Each command implements the [`Command`] trait, which provides a uniform
//! interface for executing commands and reporting results.
//!
//! # Architecture
//!
//! Commands are dispatched via [`CommandDispatcher`], which routes CLI
//! subcommands to their implementations. Every command receives the same
//! [`Factory`](crate::factory::Factory) and pulls only the dependencies it
//! needs from it.

pub mod api;
pub mod browse;
pub mod completions;
pub mod config;
pub mod dispatcher;
pub mod extensions;

pub use dispatcher::{Command, CommandDispatcher, CommandResult};
