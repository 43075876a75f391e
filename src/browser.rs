//! Opening URLs in a web browser.

use std::process::Command;

use crate::error::{GhError, Result};

/// Launches URLs with a configured command, or the platform opener.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Browser {
    launcher: Option<String>,
}

impl Browser {
    /// A browser using `launcher` (split on whitespace, URL appended), or
    /// the platform default when `None` or empty.
    pub fn new(launcher: Option<String>) -> Self {
        Self {
            launcher: launcher.filter(|l| !l.trim().is_empty()),
        }
    }

    /// The configured launcher, if any.
    pub fn launcher(&self) -> Option<&str> {
        self.launcher.as_deref()
    }

    /// Open `url` and wait for the launcher to return.
    pub fn browse(&self, url: &str) -> Result<()> {
        let mut cmd = match &self.launcher {
            Some(launcher) => {
                let mut parts = launcher.split_whitespace();
                let program = parts
                    .next()
                    .ok_or_else(|| GhError::Browser("empty browser command".to_string()))?;
                let mut cmd = Command::new(program);
                cmd.args(parts);
                cmd
            }
            None => system_opener(),
        };
        cmd.arg(url);

        tracing::debug!("Opening {} with {:?}", url, cmd);
        let status = cmd
            .status()
            .map_err(|e| GhError::Browser(format!("{:?}: {}", cmd.get_program(), e)))?;
        if !status.success() {
            return Err(GhError::Browser(format!(
                "{:?} exited with {}",
                cmd.get_program(),
                status
            )));
        }
        Ok(())
    }
}

#[cfg(target_os = "macos")]
fn system_opener() -> Command {
    Command::new("open")
}

#[cfg(windows)]
fn system_opener() -> Command {
    let mut cmd = Command::new("cmd");
    cmd.args(["/c", "start", ""]);
    cmd
}

#[cfg(all(unix, not(target_os = "macos")))]
fn system_opener() -> Command {
    Command::new("xdg-open")
}
