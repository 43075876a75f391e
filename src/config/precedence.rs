//! Precedence resolution.
//!
//! Picks the first non-empty value from an ordered list of candidate
//! sources. Chains in use:
//!
//! - Browser: `GH_BROWSER` env, `browser` config, `BROWSER` env
//! - Pager: `GH_PAGER` env, `pager` config, `PAGER` env
//!
//! An empty result is not an error here; callers decide.

use std::fmt;

use super::{keys, Config, Env};

/// A place a value can come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Candidate {
    /// An environment variable.
    Env(&'static str),
    /// An unscoped configuration key.
    Config(&'static str),
}

impl fmt::Display for Candidate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Env(name) => write!(f, "{} environment variable", name),
            Self::Config(key) => write!(f, "{} config key", key),
        }
    }
}

/// A resolved value and where it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolved {
    /// The value (never empty).
    pub value: String,
    /// The candidate that supplied it.
    pub source: Candidate,
}

/// Browser launcher precedence.
pub const BROWSER_CHAIN: &[Candidate] = &[
    Candidate::Env("GH_BROWSER"),
    Candidate::Config(keys::BROWSER),
    Candidate::Env("BROWSER"),
];

/// Pager precedence.
pub const PAGER_CHAIN: &[Candidate] = &[
    Candidate::Env("GH_PAGER"),
    Candidate::Config(keys::PAGER),
    Candidate::Env("PAGER"),
];

/// Resolve `chain` against the environment and (optionally) configuration.
///
/// Config candidates are skipped when `config` is `None`, which is how
/// callers express "configuration failed to load".
///
/// # Example
///
/// ```
/// use std::collections::HashMap;
/// use ghx::config::{resolve, Candidate, FileConfig, BROWSER_CHAIN};
///
/// let env: HashMap<String, String> =
///     [("BROWSER".to_string(), "lynx".to_string())].into_iter().collect();
/// let cfg = FileConfig::blank().with("", "browser", "firefox");
///
/// let resolved = resolve(BROWSER_CHAIN, &env, Some(&cfg)).unwrap();
/// assert_eq!(resolved.value, "firefox");
/// assert_eq!(resolved.source, Candidate::Config("browser"));
/// ```
pub fn resolve(chain: &[Candidate], env: &dyn Env, config: Option<&dyn Config>) -> Option<Resolved> {
    chain.iter().find_map(|candidate| {
        let value = match candidate {
            Candidate::Env(name) => env.var(name),
            Candidate::Config(key) => config.and_then(|cfg| cfg.get("", key)),
        }?;

        if value.is_empty() {
            None
        } else {
            Some(Resolved {
                value,
                source: *candidate,
            })
        }
    })
}

/// Whether interactive prompting is turned off for the process.
pub fn prompt_disabled(config: &dyn Config) -> bool {
    config.get("", keys::PROMPT).as_deref() == Some("disabled")
}
