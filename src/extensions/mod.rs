//! Extension commands.
//!
//! Extensions are repositories named `gh-<name>` that provide extra
//! commands. The CLI talks to them through the [`ExtensionManager`] trait;
//! [`GitExtensionManager`] keeps them as git checkouts (or symlinks, for
//! local development) under the data directory.

mod manager;

pub use manager::{extensions_dir, GitExtensionManager};

use std::io::Write;
use std::path::{Path, PathBuf};

use crate::error::Result;

/// Repository and directory prefix every extension carries.
pub const EXTENSION_PREFIX: &str = "gh-";

/// An installed extension.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extension {
    dir_name: String,
    path: PathBuf,
    url: String,
    is_local: bool,
}

impl Extension {
    /// Describe an extension installed at `path`.
    pub fn new(path: impl Into<PathBuf>, url: impl Into<String>, is_local: bool) -> Self {
        let path = path.into();
        let dir_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self {
            dir_name,
            path,
            url: url.into(),
            is_local,
        }
    }

    /// Command name, without the `gh-` prefix.
    pub fn name(&self) -> &str {
        self.dir_name
            .strip_prefix(EXTENSION_PREFIX)
            .unwrap_or(&self.dir_name)
    }

    /// Where the extension lives on disk.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The URL it was installed from (a path for local installs).
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Whether the extension is a link to a local directory.
    pub fn is_local(&self) -> bool {
        self.is_local
    }
}

/// Installs, upgrades, removes and lists extensions.
pub trait ExtensionManager: Send + Sync {
    /// Installed extensions, sorted by name.
    fn list(&self) -> Vec<Extension>;

    /// Install from a clone URL, streaming progress to `out` and `err`.
    fn install(&self, url: &str, out: &mut dyn Write, err: &mut dyn Write) -> Result<()>;

    /// Install the directory at `path` in place.
    fn install_local(&self, path: &Path) -> Result<()>;

    /// Upgrade `name`, or every extension when `name` is empty.
    fn upgrade(&self, name: &str, out: &mut dyn Write, err: &mut dyn Write) -> Result<()>;

    /// Remove `name`.
    fn remove(&self, name: &str) -> Result<()>;
}

/// Strip the `gh-` prefix a user may have typed.
pub(crate) fn normalize_name(name: &str) -> &str {
    name.strip_prefix(EXTENSION_PREFIX).unwrap_or(name)
}
