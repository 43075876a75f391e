//! Git plumbing.
//!
//! The rest of the crate talks to git through the [`Git`] trait, so tests
//! can substitute canned remotes and branches. [`CommandGit`] is the real
//! implementation and shells out to the `git` binary.

mod url;

pub use self::url::parse_remote_url;

use std::path::PathBuf;
use std::process::Command;
use std::sync::LazyLock;

use regex::Regex;

use crate::error::{GhError, Result};

/// `<name>\t<url> (fetch|push)`, one line of `git remote -v`.
static REMOTE_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<name>\S+)\s+(?P<url>\S+)\s+\((?P<kind>fetch|push)\)$")
        .expect("REMOTE_LINE must compile")
});

/// A remote as git reports it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GitRemote {
    /// Remote name, e.g. `origin`.
    pub name: String,
    /// Fetch URL as configured.
    pub fetch_url: Option<String>,
    /// Push URL as configured.
    pub push_url: Option<String>,
}

impl GitRemote {
    /// A remote with the same fetch and push URL.
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        let url = url.into();
        Self {
            name: name.into(),
            fetch_url: Some(url.clone()),
            push_url: Some(url),
        }
    }
}

/// Read access to the local checkout.
pub trait Git: Send + Sync {
    /// Remotes in the order git lists them.
    fn remotes(&self) -> Result<Vec<GitRemote>>;

    /// Short name of the checked-out branch.
    fn current_branch(&self) -> Result<String>;
}

/// [`Git`] backed by the `git` executable.
#[derive(Debug, Clone, Default)]
pub struct CommandGit {
    dir: Option<PathBuf>,
}

impl CommandGit {
    /// Run git in the current directory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Run git in `dir`.
    pub fn in_dir(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: Some(dir.into()),
        }
    }

    fn run(&self, args: &[&str]) -> Result<String> {
        let mut cmd = Command::new("git");
        cmd.args(args);
        if let Some(dir) = &self.dir {
            cmd.current_dir(dir);
        }
        tracing::debug!("Running git {}", args.join(" "));

        let output = cmd
            .output()
            .map_err(|e| GhError::Git(format!("failed to run git: {}", e)))?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            return Err(GhError::Git(if stderr.is_empty() {
                format!("git {} exited with {}", args.join(" "), output.status)
            } else {
                stderr
            }));
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

impl Git for CommandGit {
    fn remotes(&self) -> Result<Vec<GitRemote>> {
        let output = self.run(&["remote", "-v"])?;
        Ok(parse_remote_list(&output))
    }

    fn current_branch(&self) -> Result<String> {
        match self.run(&["symbolic-ref", "--quiet", "--short", "HEAD"]) {
            Ok(out) => Ok(out.trim().to_string()),
            // --quiet exits 1 without output on a detached HEAD
            Err(GhError::Git(msg)) if msg.starts_with("git symbolic-ref") => {
                Err(GhError::Git("not on any branch".to_string()))
            }
            Err(e) => Err(e),
        }
    }
}

/// Parse `git remote -v` output, keeping first-seen order.
pub fn parse_remote_list(output: &str) -> Vec<GitRemote> {
    let mut remotes: Vec<GitRemote> = Vec::new();

    for line in output.lines() {
        let Some(caps) = REMOTE_LINE.captures(line.trim()) else {
            continue;
        };
        let name = &caps["name"];
        let url = caps["url"].to_string();

        let index = match remotes.iter().position(|r| r.name == name) {
            Some(i) => i,
            None => {
                remotes.push(GitRemote {
                    name: name.to_string(),
                    fetch_url: None,
                    push_url: None,
                });
                remotes.len() - 1
            }
        };
        match &caps["kind"] {
            "fetch" => remotes[index].fetch_url = Some(url),
            _ => remotes[index].push_url = Some(url),
        }
    }

    remotes
}
