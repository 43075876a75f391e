//! Configuration file discovery and loading.
//!
//! The file lives at `config.yml` inside the config directory:
//!
//! 1. `$GH_CONFIG_DIR`
//! 2. `$XDG_CONFIG_HOME/ghx`
//! 3. The platform config directory (`~/.config/ghx` on Linux)
//!
//! Top-level scalar keys are unscoped values; the `hosts:` mapping holds
//! per-host sections.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde_yaml::Value;

use super::{Config, Env};
use crate::error::{GhError, Result};

const APP_DIR: &str = "ghx";
const CONFIG_FILE: &str = "config.yml";

/// YAML-backed configuration store.
///
/// # Example
///
/// ```
/// use ghx::config::{Config, FileConfig};
///
/// let cfg = FileConfig::from_yaml(
///     "git_protocol: https\nhosts:\n  ghe.example.com:\n    git_protocol: ssh\n",
/// )
/// .unwrap();
///
/// assert_eq!(cfg.get("", "git_protocol").as_deref(), Some("https"));
/// assert_eq!(cfg.get("ghe.example.com", "git_protocol").as_deref(), Some("ssh"));
/// assert_eq!(cfg.get("github.com", "git_protocol").as_deref(), Some("https"));
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FileConfig {
    path: Option<PathBuf>,
    values: BTreeMap<String, String>,
    hosts: BTreeMap<String, BTreeMap<String, String>>,
}

impl FileConfig {
    /// An empty configuration, used when no file exists.
    pub fn blank() -> Self {
        Self::default()
    }

    /// Parse configuration from YAML text.
    pub fn from_yaml(content: &str) -> Result<Self> {
        parse(None, content)
    }

    /// Path this configuration was loaded from, if any.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Set a value. An empty `host` sets the unscoped value.
    pub fn set(&mut self, host: &str, key: &str, value: impl Into<String>) {
        if host.is_empty() {
            self.values.insert(key.to_string(), value.into());
        } else {
            self.hosts
                .entry(host.to_lowercase())
                .or_default()
                .insert(key.to_string(), value.into());
        }
    }

    /// Builder-style [`set`](Self::set).
    pub fn with(mut self, host: &str, key: &str, value: impl Into<String>) -> Self {
        self.set(host, key, value);
        self
    }
}

impl Config for FileConfig {
    fn get(&self, host: &str, key: &str) -> Option<String> {
        if !host.is_empty() {
            let scoped = self
                .hosts
                .get(&host.to_lowercase())
                .and_then(|section| section.get(key));
            if let Some(value) = scoped {
                return Some(value.clone());
            }
        }
        self.values.get(key).cloned()
    }

    fn hosts(&self) -> Vec<String> {
        self.hosts.keys().cloned().collect()
    }
}

/// Directory holding `config.yml`.
pub fn config_dir(env: &dyn Env) -> Option<PathBuf> {
    if let Some(dir) = env.var("GH_CONFIG_DIR").filter(|d| !d.is_empty()) {
        return Some(PathBuf::from(dir));
    }
    if let Some(xdg) = env.var("XDG_CONFIG_HOME").filter(|d| !d.is_empty()) {
        return Some(PathBuf::from(xdg).join(APP_DIR));
    }
    dirs::config_dir().map(|d| d.join(APP_DIR))
}

/// Full path of `config.yml`.
pub fn config_file(env: &dyn Env) -> Option<PathBuf> {
    config_dir(env).map(|d| d.join(CONFIG_FILE))
}

/// Load and parse a config file.
///
/// # Errors
///
/// Returns `ConfigNotFound` if the file doesn't exist.
/// Returns `ConfigParse` if the YAML is invalid.
pub fn load_config_file(path: &Path) -> Result<FileConfig> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(GhError::ConfigNotFound {
                path: path.to_path_buf(),
            });
        }
        Err(e) => return Err(e.into()),
    };

    tracing::debug!("Loaded config from {}", path.display());
    parse(Some(path), &content)
}

fn parse(path: Option<&Path>, content: &str) -> Result<FileConfig> {
    let parse_error = |message: String| GhError::ConfigParse {
        path: path.map(Path::to_path_buf).unwrap_or_default(),
        message,
    };

    let mut config = FileConfig {
        path: path.map(Path::to_path_buf),
        ..FileConfig::default()
    };

    if content.trim().is_empty() {
        return Ok(config);
    }

    let doc: Value = serde_yaml::from_str(content).map_err(|e| parse_error(e.to_string()))?;
    let mapping = match doc {
        Value::Mapping(mapping) => mapping,
        Value::Null => return Ok(config),
        _ => return Err(parse_error("expected a mapping at the top level".into())),
    };

    for (key, value) in mapping {
        let Some(key) = key.as_str() else {
            continue;
        };

        if key == "hosts" {
            let hosts = match value {
                Value::Mapping(hosts) => hosts,
                Value::Null => continue,
                _ => return Err(parse_error("`hosts` must be a mapping".into())),
            };
            for (host, section) in hosts {
                let Some(host) = host.as_str() else {
                    continue;
                };
                let entry = config.hosts.entry(host.to_lowercase()).or_default();
                if let Value::Mapping(section) = section {
                    for (k, v) in section {
                        if let (Some(k), Some(v)) = (k.as_str(), scalar(&v)) {
                            entry.insert(k.to_string(), v);
                        }
                    }
                }
            }
        } else if let Some(value) = scalar(&value) {
            config.values.insert(key.to_string(), value);
        }
    }

    Ok(config)
}

fn scalar(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
