//! Extensions command implementation.
//!
//! `ghx extensions list|install|upgrade|remove`. Argument validation
//! happens here, before the extension manager is asked to change anything.

use std::io::Write;

use crate::cli::args::{
    ExtensionInstallArgs, ExtensionRemoveArgs, ExtensionUpgradeArgs, ExtensionsAction,
};
use crate::config::keys;
use crate::error::{GhError, Result};
use crate::extensions::{normalize_name, Extension, ExtensionManager, EXTENSION_PREFIX};
use crate::factory::Factory;
use crate::git::parse_remote_url;
use crate::repo::RepoId;
use crate::ui::{ColorScheme, TablePrinter};

use super::dispatcher::{Command, CommandResult};

/// The extensions command implementation.
pub struct ExtensionsCommand {
    action: ExtensionsAction,
}

impl ExtensionsCommand {
    /// Create a new extensions command.
    pub fn new(action: ExtensionsAction) -> Self {
        Self { action }
    }

    fn list(&self, factory: &Factory, manager: &dyn ExtensionManager) -> Result<CommandResult> {
        let extensions = manager.list();
        if extensions.is_empty() {
            return Err(GhError::NotFound("no extensions installed".to_string()));
        }

        let io = factory.io_streams();
        let mut table = TablePrinter::new(io.is_stdout_tty());
        for ext in &extensions {
            table.add_field(format!("gh {}", ext.name()));
            table.add_field(source_label(ext));
            table.end_row();
        }
        table.render(&mut io.out())?;
        Ok(CommandResult::success())
    }

    fn install(
        &self,
        factory: &Factory,
        manager: &dyn ExtensionManager,
        args: &ExtensionInstallArgs,
    ) -> Result<CommandResult> {
        let io = factory.io_streams();

        if args.repo == "." {
            let cwd = std::env::current_dir()?;
            manager.install_local(&cwd)?;
            tracing::debug!("Installed local extension from {}", cwd.display());
            return Ok(CommandResult::success());
        }

        let repo = RepoId::from_full_name(&args.repo)?;
        if !repo.name().starts_with(EXTENSION_PREFIX) {
            return Err(GhError::Extension(format!(
                "the repository name must start with `{}`",
                EXTENSION_PREFIX
            )));
        }

        let config = factory.config()?;
        let protocol = config
            .get(repo.host(), keys::GIT_PROTOCOL)
            .unwrap_or_else(|| "https".to_string());
        let url = repo.clone_url(&protocol);
        tracing::debug!("Installing extension {} from {}", repo, url);

        manager.install(&url, &mut io.out(), &mut io.err())?;
        Ok(CommandResult::success())
    }

    fn upgrade(
        &self,
        factory: &Factory,
        manager: &dyn ExtensionManager,
        args: &ExtensionUpgradeArgs,
    ) -> Result<CommandResult> {
        let name = match (args.names.as_slice(), args.all) {
            ([], false) => {
                return Err(GhError::Usage(
                    "must specify an extension to upgrade".to_string(),
                ))
            }
            ([], true) => "",
            ([name], false) => normalize_name(name),
            (_, true) => {
                return Err(GhError::Usage(
                    "cannot use `--all` with extension name".to_string(),
                ))
            }
            (_, false) => return Err(GhError::Usage("too many arguments".to_string())),
        };

        let io = factory.io_streams();
        manager.upgrade(name, &mut io.out(), &mut io.err())?;
        Ok(CommandResult::success())
    }

    fn remove(
        &self,
        factory: &Factory,
        manager: &dyn ExtensionManager,
        args: &ExtensionRemoveArgs,
    ) -> Result<CommandResult> {
        let name = match args.names.as_slice() {
            [name] => normalize_name(name),
            [] => {
                return Err(GhError::Usage(
                    "must specify an extension to remove".to_string(),
                ))
            }
            _ => return Err(GhError::Usage("too many arguments".to_string())),
        };

        manager.remove(name)?;

        let io = factory.io_streams();
        if io.is_stdout_tty() {
            let colors = ColorScheme::for_stdout(io, factory.env());
            writeln!(
                io.out(),
                "{}",
                colors.format_success(&format!("Removed extension {}", name))
            )?;
        }
        Ok(CommandResult::success())
    }
}

impl Command for ExtensionsCommand {
    fn execute(&self, factory: &Factory) -> Result<CommandResult> {
        let manager = factory.extension_manager();
        match &self.action {
            ExtensionsAction::List => self.list(factory, manager.as_ref()),
            ExtensionsAction::Install(args) => self.install(factory, manager.as_ref(), args),
            ExtensionsAction::Upgrade(args) => self.upgrade(factory, manager.as_ref(), args),
            ExtensionsAction::Remove(args) => self.remove(factory, manager.as_ref(), args),
        }
    }
}

/// `owner/repo` for remote extensions, the source path for local ones.
fn source_label(ext: &Extension) -> String {
    if ext.is_local() {
        return ext.url().to_string();
    }
    parse_remote_url(ext.url())
        .and_then(|url| RepoId::from_url(&url).ok())
        .map(|repo| repo.full_name())
        .unwrap_or_default()
}
