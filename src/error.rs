//! Error types for ghx operations.
//!
//! This module defines [`GhError`], the error type shared by the factory,
//! the HTTP pipeline and the command layer, and a [`Result`] alias.
//!
//! # Error Handling Strategy
//!
//! - Factory accessors cache their first result, so `GhError` is `Clone`;
//!   sources that are not `Clone` are held behind an `Arc`
//! - Only [`GhError::ConfigNotFound`] is recovered locally (by the config
//!   accessor); everything else reaches the command layer unchanged
//! - Usage errors are raised before any network or filesystem mutation

use std::path::PathBuf;
use std::sync::Arc;

use thiserror::Error;

/// Core error type for ghx operations.
#[derive(Debug, Clone, Error)]
pub enum GhError {
    /// Configuration file not found at expected location.
    #[error("Configuration not found: {path}")]
    ConfigNotFound { path: PathBuf },

    /// Failed to parse configuration file.
    #[error("Failed to parse config at {path}: {message}")]
    ConfigParse { path: PathBuf, message: String },

    /// A git invocation failed (not a repository, git missing, ...).
    #[error("git: {0}")]
    Git(String),

    /// The current branch could not be resolved.
    #[error("could not determine current branch: {0}")]
    Branch(String),

    /// The checkout has no remotes at all.
    #[error("no git remotes found")]
    NoRemotes,

    /// None of the remotes point at a known host.
    #[error("none of the git remotes configured for this repository point to a known GitHub host")]
    NoKnownRemotes,

    /// A repository reference could not be parsed.
    #[error("invalid repository: {0}")]
    InvalidRepo(String),

    /// Malformed command-line arguments.
    #[error("{0}")]
    Usage(String),

    /// A user-facing "nothing there" condition.
    #[error("{0}")]
    NotFound(String),

    /// The remote API answered with an error.
    #[error("HTTP {status}: {message}")]
    Api { status: u16, message: String },

    /// Network failure below the API layer.
    #[error("HTTP error: {0}")]
    Http(Arc<reqwest::Error>),

    /// A transport could not complete a round trip.
    #[error("transport error: {0}")]
    Transport(String),

    /// The browser could not be launched.
    #[error("failed to open browser: {0}")]
    Browser(String),

    /// Extension manager failure.
    #[error("{0}")]
    Extension(String),

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(Arc<std::io::Error>),

    /// Generic wrapped error for anyhow interop.
    #[error("{0:#}")]
    Other(Arc<anyhow::Error>),
}

impl GhError {
    /// Process exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            GhError::Usage(_) => 2,
            _ => 1,
        }
    }

    /// Whether this is a usage error.
    pub fn is_usage(&self) -> bool {
        matches!(self, GhError::Usage(_))
    }
}

impl From<std::io::Error> for GhError {
    fn from(err: std::io::Error) -> Self {
        GhError::Io(Arc::new(err))
    }
}

impl From<reqwest::Error> for GhError {
    fn from(err: reqwest::Error) -> Self {
        GhError::Http(Arc::new(err))
    }
}

impl From<anyhow::Error> for GhError {
    fn from(err: anyhow::Error) -> Self {
        GhError::Other(Arc::new(err))
    }
}

impl From<serde_json::Error> for GhError {
    fn from(err: serde_json::Error) -> Self {
        GhError::Other(Arc::new(err.into()))
    }
}

/// Result type alias for ghx operations.
pub type Result<T> = std::result::Result<T, GhError>;
