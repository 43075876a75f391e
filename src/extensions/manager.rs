//! On-disk extension management with git.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::Command;

use anyhow::{bail, Context};

use super::{normalize_name, Extension, ExtensionManager, EXTENSION_PREFIX};
use crate::config::Env;
use crate::error::Result;

/// Directory extensions are installed into.
///
/// `$GH_DATA_DIR/extensions` when set, else the platform data directory
/// (`~/.local/share/ghx/extensions` on Linux).
pub fn extensions_dir(env: &dyn Env) -> Option<PathBuf> {
    if let Some(dir) = env.var("GH_DATA_DIR").filter(|d| !d.is_empty()) {
        return Some(PathBuf::from(dir).join("extensions"));
    }
    dirs::data_dir().map(|d| d.join("ghx").join("extensions"))
}

/// Extensions stored as git checkouts and symlinks in one directory.
#[derive(Debug, Clone)]
pub struct GitExtensionManager {
    root: PathBuf,
}

impl GitExtensionManager {
    /// Manage extensions under `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn dir_for(&self, name: &str) -> PathBuf {
        self.root
            .join(format!("{}{}", EXTENSION_PREFIX, normalize_name(name)))
    }

    fn read_extension(&self, path: PathBuf) -> Option<Extension> {
        let meta = std::fs::symlink_metadata(&path).ok()?;
        if meta.file_type().is_symlink() {
            let target = std::fs::read_link(&path).unwrap_or_else(|_| path.clone());
            return Some(Extension::new(path, target.display().to_string(), true));
        }
        if !meta.is_dir() {
            return None;
        }
        let url = git_output(&path, &["config", "remote.origin.url"]).unwrap_or_default();
        Some(Extension::new(path, url.trim(), false))
    }

    fn install_inner(&self, url: &str, out: &mut dyn Write, err: &mut dyn Write) -> anyhow::Result<()> {
        let name = repo_name_from_url(url)
            .with_context(|| format!("cannot determine extension name from {}", url))?;
        if !name.starts_with(EXTENSION_PREFIX) {
            bail!("the repository name must start with `{}`", EXTENSION_PREFIX);
        }
        let target = self.root.join(&name);
        if target.symlink_metadata().is_ok() {
            bail!("there is already an installed extension that provides the \"{}\" command", normalize_name(&name));
        }

        std::fs::create_dir_all(&self.root)
            .with_context(|| format!("failed to create {}", self.root.display()))?;

        tracing::debug!("Cloning {} into {}", url, target.display());
        let output = Command::new("git")
            .args(["clone", url, &target.to_string_lossy()])
            .output()
            .context("failed to run git")?;
        out.write_all(&output.stdout)?;
        err.write_all(&output.stderr)?;
        if !output.status.success() {
            bail!("failed to clone {}", url);
        }
        Ok(())
    }

    fn install_local_inner(&self, path: &Path) -> anyhow::Result<()> {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .with_context(|| format!("invalid extension directory {}", path.display()))?;
        if !name.starts_with(EXTENSION_PREFIX) {
            bail!("the extension directory name must start with `{}`", EXTENSION_PREFIX);
        }
        let target = self.root.join(&name);
        if target.symlink_metadata().is_ok() {
            bail!("there is already an installed extension that provides the \"{}\" command", normalize_name(&name));
        }

        std::fs::create_dir_all(&self.root)
            .with_context(|| format!("failed to create {}", self.root.display()))?;
        tracing::debug!("Linking {} to {}", target.display(), path.display());
        symlink_dir(path, &target)
            .with_context(|| format!("failed to link {}", target.display()))?;
        Ok(())
    }

    fn upgrade_inner(&self, name: &str, out: &mut dyn Write, err: &mut dyn Write) -> anyhow::Result<()> {
        let all = self.list();
        let targets: Vec<Extension> = if name.is_empty() {
            all
        } else {
            let wanted = normalize_name(name);
            all.into_iter().filter(|e| e.name() == wanted).collect()
        };

        if targets.is_empty() {
            if name.is_empty() {
                bail!("no extensions installed");
            }
            bail!("no extension matched {:?}", name);
        }

        let mut failed = Vec::new();
        for ext in targets {
            if ext.is_local() {
                writeln!(out, "[{}]: local extensions can not be upgraded", ext.name())?;
                continue;
            }
            tracing::debug!("Upgrading {}", ext.name());
            let output = Command::new("git")
                .args(["pull", "--ff-only"])
                .current_dir(ext.path())
                .output()
                .context("failed to run git")?;
            write!(out, "[{}]: ", ext.name())?;
            out.write_all(&output.stdout)?;
            err.write_all(&output.stderr)?;
            if !output.status.success() {
                failed.push(ext.name().to_string());
            }
        }

        if !failed.is_empty() {
            bail!("failed to upgrade: {}", failed.join(", "));
        }
        Ok(())
    }

    fn remove_inner(&self, name: &str) -> anyhow::Result<()> {
        let target = self.dir_for(name);
        let meta = match std::fs::symlink_metadata(&target) {
            Ok(meta) => meta,
            Err(_) => bail!("no extension found: {:?}", name),
        };
        tracing::debug!("Removing {}", target.display());
        if meta.file_type().is_symlink() || meta.is_file() {
            std::fs::remove_file(&target)
        } else {
            std::fs::remove_dir_all(&target)
        }
        .with_context(|| format!("failed to remove {}", target.display()))?;
        Ok(())
    }
}

impl ExtensionManager for GitExtensionManager {
    fn list(&self) -> Vec<Extension> {
        let Ok(entries) = std::fs::read_dir(&self.root) else {
            return Vec::new();
        };
        let mut extensions: Vec<Extension> = entries
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_name().to_string_lossy().starts_with(EXTENSION_PREFIX))
            .filter_map(|entry| self.read_extension(entry.path()))
            .collect();
        extensions.sort_by(|a, b| a.name().cmp(b.name()));
        extensions
    }

    fn install(&self, url: &str, out: &mut dyn Write, err: &mut dyn Write) -> Result<()> {
        Ok(self.install_inner(url, out, err)?)
    }

    fn install_local(&self, path: &Path) -> Result<()> {
        Ok(self.install_local_inner(path)?)
    }

    fn upgrade(&self, name: &str, out: &mut dyn Write, err: &mut dyn Write) -> Result<()> {
        Ok(self.upgrade_inner(name, out, err)?)
    }

    fn remove(&self, name: &str) -> Result<()> {
        Ok(self.remove_inner(name)?)
    }
}

/// Last path segment of a clone URL, without `.git`.
fn repo_name_from_url(url: &str) -> Option<String> {
    let trimmed = url.trim_end_matches('/');
    let last = trimmed.rsplit(['/', ':']).next()?;
    let name = last.strip_suffix(".git").unwrap_or(last);
    (!name.is_empty()).then(|| name.to_string())
}

fn git_output(dir: &Path, args: &[&str]) -> anyhow::Result<String> {
    let output = Command::new("git").args(args).current_dir(dir).output()?;
    if !output.status.success() {
        bail!("git {} failed", args.join(" "));
    }
    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

#[cfg(unix)]
fn symlink_dir(src: &Path, dst: &Path) -> std::io::Result<()> {
    std::os::unix::fs::symlink(src, dst)
}

#[cfg(windows)]
fn symlink_dir(src: &Path, dst: &Path) -> std::io::Result<()> {
    std::os::windows::fs::symlink_dir(src, dst)
}
