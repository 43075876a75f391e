//! Configuration access.
//!
//! The configuration store is a hierarchical key/value map scoped by host,
//! with an unscoped fallback (`host == ""`). This module provides:
//!
//! - [`Config`] - the read-only lookup interface the rest of the crate uses
//! - [`FileConfig`] - the YAML-backed store loaded from `config.yml`
//! - [`EnvOverlay`] - an environment layer merged on top after load
//! - [`precedence`] - "first non-empty candidate" resolvers (browser, pager)
//!
//! Config is loaded at most once per process by the
//! [`Factory`](crate::factory::Factory) and never reloaded.

mod env;
mod file;
pub mod precedence;

pub use env::{Env, EnvOverlay, ProcessEnv};
pub use file::{config_dir, config_file, load_config_file, FileConfig};
pub use precedence::{prompt_disabled, resolve, Candidate, Resolved, BROWSER_CHAIN, PAGER_CHAIN};

/// Read-only view of the configuration store.
pub trait Config: Send + Sync {
    /// Look up `key` for `host`, falling back to the unscoped value.
    ///
    /// Pass `""` as the host for an unscoped lookup.
    fn get(&self, host: &str, key: &str) -> Option<String>;

    /// Hosts that have their own configuration section.
    fn hosts(&self) -> Vec<String>;
}

/// Configuration keys consulted by the crate.
pub mod keys {
    /// Route all HTTP traffic through a unix domain socket.
    pub const HTTP_UNIX_SOCKET: &str = "http_unix_socket";
    /// Per-host API token.
    pub const OAUTH_TOKEN: &str = "oauth_token";
    /// Browser launcher command.
    pub const BROWSER: &str = "browser";
    /// Pager command.
    pub const PAGER: &str = "pager";
    /// `https` or `ssh` for clone URLs.
    pub const GIT_PROTOCOL: &str = "git_protocol";
    /// `disabled` turns off interactive prompts.
    pub const PROMPT: &str = "prompt";
}
