//! Repository identities, remotes, and base-repository selection.
//!
//! - [`RepoId`] - a normalized `(host, owner, name)` triple
//! - [`resolve_remotes`] - git remotes filtered down to known hosts
//! - [`fast_base_repo`] - the first remote, no network
//! - [`smart_base_repo`] - asks the API to resolve forks and renames

mod base;
mod remotes;

pub use base::{fast_base_repo, smart_base_repo, NetworkRepo, RepoNetwork};
pub use remotes::{resolve_remotes, Remote, Remotes};

use std::fmt;
use std::hash::{Hash, Hasher};

use url::Url;

use crate::api::host::{normalize_hostname, DEFAULT_HOST};
use crate::error::{GhError, Result};

/// A repository on a given host.
///
/// Equality ignores case throughout, matching how the service treats
/// names.
///
/// ```
/// use ghx::repo::RepoId;
///
/// let a = RepoId::from_full_name("Monalisa/Octo-Cat").unwrap();
/// let b = RepoId::new("GitHub.com", "monalisa", "octo-cat");
/// assert_eq!(a, b);
/// assert_eq!(a.full_name(), "Monalisa/Octo-Cat");
/// ```
#[derive(Debug, Clone)]
pub struct RepoId {
    host: String,
    owner: String,
    name: String,
}

impl RepoId {
    /// Create an identity; the host is normalized.
    pub fn new(host: &str, owner: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            host: normalize_hostname(host),
            owner: owner.into(),
            name: name.into(),
        }
    }

    /// Parse `owner/repo` (public host) or `host/owner/repo`.
    pub fn from_full_name(full_name: &str) -> Result<Self> {
        let parts: Vec<&str> = full_name.split('/').collect();
        if parts.iter().any(|p| p.trim().is_empty()) {
            return Err(invalid(full_name));
        }
        match parts.as_slice() {
            [owner, name] => Ok(Self::new(DEFAULT_HOST, *owner, *name)),
            [host, owner, name] => Ok(Self::new(host, *owner, *name)),
            _ => Err(invalid(full_name)),
        }
    }

    /// Identity from a remote or web URL: the first two path segments,
    /// with any `.git` suffix dropped.
    pub fn from_url(url: &Url) -> Result<Self> {
        let host = url.host_str().ok_or_else(|| invalid(url.as_str()))?;
        let host = host.strip_prefix("www.").unwrap_or(host);

        let segments: Vec<&str> = url
            .path()
            .trim_start_matches('/')
            .split('/')
            .filter(|s| !s.is_empty())
            .collect();
        let [owner, name, ..] = segments.as_slice() else {
            return Err(invalid(url.as_str()));
        };
        let name = name.strip_suffix(".git").unwrap_or(name);
        if name.is_empty() {
            return Err(invalid(url.as_str()));
        }
        Ok(Self::new(host, *owner, name))
    }

    /// Normalized host.
    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn owner(&self) -> &str {
        &self.owner
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// `owner/name`.
    pub fn full_name(&self) -> String {
        format!("{}/{}", self.owner, self.name)
    }

    /// Clone URL for `protocol` (`ssh` or anything else for https).
    pub fn clone_url(&self, protocol: &str) -> String {
        if protocol == "ssh" {
            format!("git@{}:{}/{}.git", self.host, self.owner, self.name)
        } else {
            format!("https://{}/{}/{}.git", self.host, self.owner, self.name)
        }
    }

    /// Web URL, optionally pointing below the repository root.
    pub fn web_url(&self, path: &str) -> String {
        let base = format!("https://{}/{}/{}", self.host, self.owner, self.name);
        let path = path.trim_start_matches('/');
        if path.is_empty() {
            base
        } else {
            format!("{}/{}", base, path)
        }
    }
}

fn invalid(input: &str) -> GhError {
    GhError::InvalidRepo(format!(
        "expected the \"[HOST/]OWNER/REPO\" format, got {:?}",
        input
    ))
}

impl PartialEq for RepoId {
    fn eq(&self, other: &Self) -> bool {
        self.host.eq_ignore_ascii_case(&other.host)
            && self.owner.eq_ignore_ascii_case(&other.owner)
            && self.name.eq_ignore_ascii_case(&other.name)
    }
}

impl Eq for RepoId {}

impl Hash for RepoId {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.host.to_ascii_lowercase().hash(state);
        self.owner.to_ascii_lowercase().hash(state);
        self.name.to_ascii_lowercase().hash(state);
    }
}

impl fmt::Display for RepoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.host == DEFAULT_HOST {
            write!(f, "{}/{}", self.owner, self.name)
        } else {
            write!(f, "{}/{}/{}", self.host, self.owner, self.name)
        }
    }
}
