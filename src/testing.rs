//! Test doubles shared by unit tests.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use crate::error::{GhError, Result};
use crate::extensions::{Extension, ExtensionManager};
use crate::git::{Git, GitRemote};

/// Canned git answers; counts calls.
#[derive(Default)]
pub struct StubGit {
    pub remotes: Option<Vec<GitRemote>>,
    pub branch: Option<String>,
    pub remote_calls: AtomicUsize,
    pub branch_calls: AtomicUsize,
}

impl StubGit {
    pub fn with_remotes(remotes: &[(&str, &str)]) -> Self {
        Self {
            remotes: Some(
                remotes
                    .iter()
                    .map(|(name, url)| GitRemote::new(*name, *url))
                    .collect(),
            ),
            branch: Some("main".to_string()),
            ..Self::default()
        }
    }
}

impl Git for StubGit {
    fn remotes(&self) -> Result<Vec<GitRemote>> {
        self.remote_calls.fetch_add(1, Ordering::SeqCst);
        self.remotes
            .clone()
            .ok_or_else(|| GhError::Git("not a git repository".to_string()))
    }

    fn current_branch(&self) -> Result<String> {
        self.branch_calls.fetch_add(1, Ordering::SeqCst);
        self.branch
            .clone()
            .ok_or_else(|| GhError::Git("not on any branch".to_string()))
    }
}

/// A recorded extension manager call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtensionCall {
    List,
    Install(String),
    InstallLocal(PathBuf),
    Upgrade(String),
    Remove(String),
}

/// Extension manager that records calls and returns canned extensions.
#[derive(Default, Clone)]
pub struct StubExtensionManager {
    pub extensions: Vec<Extension>,
    pub calls: Arc<Mutex<Vec<ExtensionCall>>>,
}

impl StubExtensionManager {
    pub fn with_extensions(extensions: Vec<Extension>) -> Self {
        Self {
            extensions,
            ..Self::default()
        }
    }

    pub fn calls(&self) -> Vec<ExtensionCall> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: ExtensionCall) {
        self.calls.lock().unwrap().push(call);
    }
}

impl ExtensionManager for StubExtensionManager {
    fn list(&self) -> Vec<Extension> {
        self.record(ExtensionCall::List);
        self.extensions.clone()
    }

    fn install(&self, url: &str, out: &mut dyn Write, _err: &mut dyn Write) -> Result<()> {
        self.record(ExtensionCall::Install(url.to_string()));
        writeln!(out, "installed {}", url)?;
        Ok(())
    }

    fn install_local(&self, path: &Path) -> Result<()> {
        self.record(ExtensionCall::InstallLocal(path.to_path_buf()));
        Ok(())
    }

    fn upgrade(&self, name: &str, _out: &mut dyn Write, _err: &mut dyn Write) -> Result<()> {
        self.record(ExtensionCall::Upgrade(name.to_string()));
        Ok(())
    }

    fn remove(&self, name: &str) -> Result<()> {
        self.record(ExtensionCall::Remove(name.to_string()));
        Ok(())
    }
}
