//! CLI argument definitions.
//!
//! This module defines all CLI arguments using clap's derive macros.
//! The main entry point is the [`Cli`] struct.

use clap::{Parser, Subcommand};
use clap_complete::Shell;

/// ghx - work with GitHub from the command line.
#[derive(Debug, Parser)]
#[command(name = "ghx")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Manage ghx extensions
    #[command(subcommand, visible_alias = "extension", visible_alias = "ext")]
    Extensions(ExtensionsAction),

    /// Make an authenticated API request
    Api(ApiArgs),

    /// Open the repository in the browser
    Browse(BrowseArgs),

    /// Read configuration values
    #[command(subcommand)]
    Config(ConfigAction),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

/// `extensions` subcommands.
#[derive(Debug, Clone, Subcommand)]
pub enum ExtensionsAction {
    /// List installed extensions
    #[command(visible_alias = "ls")]
    List,

    /// Install an extension from a repository, or `.` for the current directory
    Install(ExtensionInstallArgs),

    /// Upgrade an installed extension
    Upgrade(ExtensionUpgradeArgs),

    /// Remove an installed extension
    Remove(ExtensionRemoveArgs),
}

/// Arguments for `extensions install`.
#[derive(Debug, Clone, clap::Args)]
pub struct ExtensionInstallArgs {
    /// `OWNER/REPO`, `HOST/OWNER/REPO`, or `.`
    pub repo: String,
}

/// Arguments for `extensions upgrade`.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct ExtensionUpgradeArgs {
    /// Extension to upgrade
    pub names: Vec<String>,

    /// Upgrade all extensions
    #[arg(long)]
    pub all: bool,
}

/// Arguments for `extensions remove`.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct ExtensionRemoveArgs {
    /// Extension to remove
    pub names: Vec<String>,
}

/// Arguments for the `api` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct ApiArgs {
    /// REST path (e.g. `repos/{owner}/{repo}`), `graphql`, or a full URL
    pub endpoint: String,

    /// HTTP method (default GET, or POST when fields are given)
    #[arg(short = 'X', long)]
    pub method: Option<String>,

    /// Host to send the request to
    #[arg(long)]
    pub hostname: Option<String>,

    /// Extra request header in `key:value` format
    #[arg(short = 'H', long = "header", value_name = "KEY:VALUE")]
    pub headers: Vec<String>,

    /// String field for the JSON body in `key=value` format
    #[arg(short = 'f', long = "field", value_name = "KEY=VALUE")]
    pub fields: Vec<String>,
}

/// Arguments for the `browse` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct BrowseArgs {
    /// Path within the repository (e.g. `issues`, `pulls/42`)
    pub path: Option<String>,

    /// Print the URL instead of opening it
    #[arg(short = 'n', long)]
    pub no_browser: bool,
}

/// `config` subcommands.
#[derive(Debug, Clone, Subcommand)]
pub enum ConfigAction {
    /// Print the value of a configuration key
    Get(ConfigGetArgs),
}

/// Arguments for `config get`.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct ConfigGetArgs {
    /// Key to look up
    pub key: String,

    /// Look up the host-scoped value
    #[arg(long)]
    pub host: Option<String>,
}

/// Arguments for the `completions` command.
#[derive(Debug, Clone, clap::Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: Shell,
}
