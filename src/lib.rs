//! ghx - a GitHub command-line client core.
//!
//! Every command runs against a [`Factory`](factory::Factory): a bundle of
//! lazily resolved, memoized dependencies (configuration, git remotes, the
//! base repository, an authenticated HTTP client, a browser launcher, the
//! extension manager). Nothing is read or dialed until a command asks.
//!
//! # Modules
//!
//! - [`api`] - Host classification and the GraphQL/REST client
//! - [`browser`] - Opening URLs
//! - [`cli`] - Command-line interface and argument parsing
//! - [`config`] - Configuration store, environment overlay, precedence chains
//! - [`error`] - Error types and result aliases
//! - [`extensions`] - Extension listing, install, upgrade and removal
//! - [`factory`] - The memoized dependency bundle
//! - [`git`] - Reading remotes and the current branch
//! - [`http`] - Transports and the header decorator pipeline
//! - [`iostreams`] - Output streams, terminal detection, pager
//! - [`repo`] - Repository identity, remote and base-repository resolution
//! - [`ui`] - Tables, colors and prompts
//!
//! # Example
//!
//! ```
//! use std::collections::HashMap;
//! use ghx::config::{resolve, FileConfig, PAGER_CHAIN};
//!
//! let env: HashMap<String, String> =
//!     [("PAGER".to_string(), "less".to_string())].into_iter().collect();
//! let cfg = FileConfig::blank();
//! let pager = resolve(PAGER_CHAIN, &env, Some(&cfg)).map(|r| r.value);
//! assert_eq!(pager.as_deref(), Some("less"));
//! ```

pub mod api;
pub mod browser;
pub mod cli;
pub mod config;
pub mod error;
pub mod extensions;
pub mod factory;
pub mod git;
pub mod http;
pub mod iostreams;
pub mod repo;
pub mod ui;

#[cfg(test)]
mod testing;

pub use error::{GhError, Result};
pub use factory::{Factory, FactoryBuilder};
