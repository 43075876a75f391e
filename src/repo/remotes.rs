//! Remote resolution.

use std::ops::Deref;

use super::RepoId;
use crate::api::host::{normalize_hostname, DEFAULT_HOST};
use crate::config::Config;
use crate::error::{GhError, Result};
use crate::git::{parse_remote_url, GitRemote};

/// A git remote pointing at a known repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Remote {
    /// Remote name, e.g. `origin`.
    pub name: String,
    /// The URL the identity was derived from.
    pub fetch_url: String,
    /// Repository the remote points at.
    pub repo: RepoId,
}

/// Resolved remotes, in the order git reported them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Remotes(Vec<Remote>);

impl Remotes {
    pub fn new(remotes: Vec<Remote>) -> Self {
        Self(remotes)
    }

    /// Look a remote up by name.
    pub fn find_by_name(&self, name: &str) -> Option<&Remote> {
        self.0.iter().find(|r| r.name == name)
    }

    /// Look a remote up by the repository it points at.
    pub fn find_by_repo(&self, repo: &RepoId) -> Option<&Remote> {
        self.0.iter().find(|r| &r.repo == repo)
    }
}

impl Deref for Remotes {
    type Target = [Remote];

    fn deref(&self) -> &[Remote] {
        &self.0
    }
}

impl IntoIterator for Remotes {
    type Item = Remote;
    type IntoIter = std::vec::IntoIter<Remote>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

/// Turn git's remotes into repository identities.
///
/// Order is preserved. Remotes whose URL can't be parsed are skipped, as
/// are remotes on hosts that are neither the public host nor configured.
/// No remotes at all is [`GhError::NoRemotes`]; remotes that all point
/// elsewhere is [`GhError::NoKnownRemotes`].
pub fn resolve_remotes(git_remotes: Vec<GitRemote>, config: &dyn Config) -> Result<Remotes> {
    if git_remotes.is_empty() {
        return Err(GhError::NoRemotes);
    }

    let mut known: Vec<String> = config.hosts().iter().map(|h| normalize_hostname(h)).collect();
    known.push(DEFAULT_HOST.to_string());

    let mut resolved = Vec::new();
    for remote in git_remotes {
        let Some(raw) = remote.fetch_url.or(remote.push_url) else {
            tracing::debug!("Skipping remote {}: no URL", remote.name);
            continue;
        };
        let Some(repo) = parse_remote_url(&raw).and_then(|url| RepoId::from_url(&url).ok())
        else {
            tracing::debug!("Skipping remote {}: unparseable URL {}", remote.name, raw);
            continue;
        };
        if !known.iter().any(|h| h == repo.host()) {
            tracing::debug!("Skipping remote {}: unknown host {}", remote.name, repo.host());
            continue;
        }
        resolved.push(Remote {
            name: remote.name,
            fetch_url: raw,
            repo,
        });
    }

    tracing::debug!("Resolved {} remote(s)", resolved.len());
    if resolved.is_empty() {
        return Err(GhError::NoKnownRemotes);
    }
    Ok(Remotes(resolved))
}
