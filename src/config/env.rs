//! Environment variable layering.
//!
//! [`EnvOverlay`] sits on top of the loaded file configuration: token
//! variables win over `oauth_token` from the file, and `GH_HOST` adds a
//! known host.

use std::collections::HashMap;
use std::sync::Arc;

use super::precedence::{resolve, Candidate};
use super::{keys, Config};
use crate::api::host::{is_enterprise, normalize_hostname};

const PUBLIC_TOKEN_CHAIN: &[Candidate] = &[Candidate::Env("GH_TOKEN"), Candidate::Env("GITHUB_TOKEN")];

const ENTERPRISE_TOKEN_CHAIN: &[Candidate] = &[
    Candidate::Env("GH_ENTERPRISE_TOKEN"),
    Candidate::Env("GITHUB_ENTERPRISE_TOKEN"),
];

/// Source of environment variables.
///
/// Production code uses [`ProcessEnv`]; tests use a `HashMap`.
pub trait Env: Send + Sync {
    /// Value of `key`, if set.
    fn var(&self, key: &str) -> Option<String>;
}

/// The process environment.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl Env for ProcessEnv {
    fn var(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }
}

impl Env for HashMap<String, String> {
    fn var(&self, key: &str) -> Option<String> {
        self.get(key).cloned()
    }
}

/// Configuration with environment variables merged on top.
///
/// # Example
///
/// ```
/// use std::collections::HashMap;
/// use std::sync::Arc;
/// use ghx::config::{Config, EnvOverlay, FileConfig};
///
/// let file = FileConfig::blank().with("github.com", "oauth_token", "from_file");
/// let env: HashMap<String, String> =
///     [("GH_TOKEN".to_string(), "from_env".to_string())].into_iter().collect();
///
/// let cfg = EnvOverlay::new(Arc::new(file), Arc::new(env));
/// assert_eq!(cfg.get("github.com", "oauth_token").as_deref(), Some("from_env"));
/// ```
pub struct EnvOverlay {
    inner: Arc<dyn Config>,
    env: Arc<dyn Env>,
}

impl EnvOverlay {
    /// Layer `env` over `inner`.
    pub fn new(inner: Arc<dyn Config>, env: Arc<dyn Env>) -> Self {
        Self { inner, env }
    }

    fn token_from_env(&self, host: &str) -> Option<String> {
        let chain = if !host.is_empty() && is_enterprise(host) {
            ENTERPRISE_TOKEN_CHAIN
        } else {
            PUBLIC_TOKEN_CHAIN
        };
        resolve(chain, self.env.as_ref(), None).map(|r| r.value)
    }
}

impl Config for EnvOverlay {
    fn get(&self, host: &str, key: &str) -> Option<String> {
        if key == keys::OAUTH_TOKEN {
            if let Some(token) = self.token_from_env(host) {
                return Some(token);
            }
        }
        self.inner.get(host, key)
    }

    fn hosts(&self) -> Vec<String> {
        let mut hosts = self.inner.hosts();
        if let Some(host) = self.env.var("GH_HOST").filter(|h| !h.is_empty()) {
            let host = normalize_hostname(&host);
            if !hosts.contains(&host) {
                hosts.push(host);
            }
        }
        hosts
    }
}
