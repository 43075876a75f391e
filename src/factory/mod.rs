//! The per-process dependency bundle handed to every command.
//!
//! A [`Factory`] is built without doing any I/O. Each accessor resolves its
//! own dependencies the first time it is called and caches the outcome,
//! error included, for the rest of the process:
//!
//! | Accessor | Depends on |
//! |---|---|
//! | [`config`](Factory::config) | - |
//! | [`branch`](Factory::branch) | - |
//! | [`executable`](Factory::executable) | - |
//! | [`io_streams`](Factory::io_streams) | config |
//! | [`http_client`](Factory::http_client) | config, io_streams |
//! | [`remotes`](Factory::remotes) | config |
//! | [`base_repo`](Factory::base_repo) | remotes |
//! | [`smart_base_repo`](Factory::smart_base_repo) | http_client, remotes, io_streams |
//! | [`browser`](Factory::browser) | config |
//!
//! Tests wire stubs in through [`FactoryBuilder`].

mod memo;

pub use memo::Memo;

use std::path::PathBuf;
use std::sync::{Arc, OnceLock};

use url::Url;

use crate::api::ApiClient;
use crate::browser::Browser;
use crate::config::{
    config_file, load_config_file, prompt_disabled, resolve, Config, Env, EnvOverlay, FileConfig,
    ProcessEnv, BROWSER_CHAIN, PAGER_CHAIN,
};
use crate::error::{GhError, Result};
use crate::extensions::{extensions_dir, ExtensionManager, GitExtensionManager};
use crate::git::{CommandGit, Git};
use crate::http::{new_http_client, HttpClient};
use crate::iostreams::IoStreams;
use crate::repo::{self, resolve_remotes, RepoId, Remotes};

type ConfigLoader = Box<dyn Fn() -> Result<FileConfig> + Send + Sync>;
type IoConstructor = Box<dyn Fn() -> IoStreams + Send + Sync>;

/// Lazily resolved, memoized command dependencies.
pub struct Factory {
    app_version: String,
    env: Arc<dyn Env>,
    git: Arc<dyn Git>,
    load_config: ConfigLoader,
    make_io: IoConstructor,
    api_endpoint: Option<Url>,
    extensions_override: Option<Arc<dyn ExtensionManager>>,

    config: Memo<Arc<dyn Config>>,
    branch: Memo<String>,
    remotes: Memo<Remotes>,
    base_repo: Memo<RepoId>,
    smart_base_repo: Memo<RepoId>,
    http_client: Memo<Arc<HttpClient>>,
    io: OnceLock<IoStreams>,
    browser: OnceLock<Browser>,
    executable: OnceLock<String>,
    extensions: OnceLock<Arc<dyn ExtensionManager>>,
}

impl Factory {
    /// Production wiring for version `app_version`.
    pub fn new(app_version: impl Into<String>) -> Self {
        FactoryBuilder::new(app_version).build()
    }

    /// Start a customized factory.
    pub fn builder(app_version: impl Into<String>) -> FactoryBuilder {
        FactoryBuilder::new(app_version)
    }

    /// Version string reported in `User-Agent`.
    pub fn app_version(&self) -> &str {
        &self.app_version
    }

    /// Environment lookups.
    pub fn env(&self) -> &dyn Env {
        self.env.as_ref()
    }

    /// Configuration, loaded once.
    ///
    /// A missing config file yields an empty configuration; any other load
    /// failure is returned now and on every later call.
    pub fn config(&self) -> Result<Arc<dyn Config>> {
        self.config.get_or_init(|| {
            let file = match (self.load_config)() {
                Ok(file) => file,
                Err(GhError::ConfigNotFound { path }) => {
                    tracing::debug!("No config at {}, using defaults", path.display());
                    FileConfig::blank()
                }
                Err(e) => return Err(e),
            };
            let config: Arc<dyn Config> = Arc::new(EnvOverlay::new(Arc::new(file), self.env.clone()));
            Ok(config)
        })
    }

    /// The checked-out branch.
    pub fn branch(&self) -> Result<String> {
        self.branch.get_or_init(|| {
            self.git.current_branch().map_err(|e| match e {
                GhError::Git(msg) => GhError::Branch(msg),
                other => GhError::Branch(other.to_string()),
            })
        })
    }

    /// Remotes pointing at known hosts, in git's order.
    pub fn remotes(&self) -> Result<Remotes> {
        self.remotes.get_or_init(|| {
            let git_remotes = self.git.remotes()?;
            let config = self.config()?;
            resolve_remotes(git_remotes, config.as_ref())
        })
    }

    /// Base repository from the first remote. No network.
    pub fn base_repo(&self) -> Result<RepoId> {
        self.base_repo
            .get_or_init(|| repo::fast_base_repo(&self.remotes()?))
    }

    /// Base repository as resolved by the API (forks, renames).
    pub fn smart_base_repo(&self) -> Result<RepoId> {
        self.smart_base_repo.get_or_init(|| {
            let api = self.api_client()?;
            let remotes = self.remotes()?;
            repo::smart_base_repo(&remotes, &api, self.io_streams())
        })
    }

    /// The decorated HTTP client.
    pub fn http_client(&self) -> Result<Arc<HttpClient>> {
        self.http_client.get_or_init(|| {
            let config = self.config()?;
            let client = new_http_client(
                self.io_streams(),
                config,
                self.env.clone(),
                &self.app_version,
                true,
            )?;
            Ok(Arc::new(client))
        })
    }

    /// API client over [`http_client`](Self::http_client).
    pub fn api_client(&self) -> Result<ApiClient> {
        let api = ApiClient::new(self.http_client()?);
        Ok(match &self.api_endpoint {
            Some(endpoint) => api.with_endpoint(endpoint.clone()),
            None => api,
        })
    }

    /// Standard streams with pager and prompt settings applied.
    ///
    /// Config errors are not fatal here: defaults apply.
    pub fn io_streams(&self) -> &IoStreams {
        self.io.get_or_init(|| {
            let mut io = (self.make_io)();
            let config = self.config().ok();
            if config.as_deref().is_some_and(prompt_disabled) {
                io.set_never_prompt(true);
            }
            let pager = resolve(PAGER_CHAIN, self.env.as_ref(), config.as_deref());
            io.set_pager(pager.map(|p| p.value));
            io
        })
    }

    /// Browser launcher.
    pub fn browser(&self) -> &Browser {
        self.browser.get_or_init(|| {
            let config = self.config().ok();
            let launcher = resolve(BROWSER_CHAIN, self.env.as_ref(), config.as_deref());
            if let Some(resolved) = &launcher {
                tracing::debug!("Browser from {}", resolved.source);
            }
            Browser::new(launcher.map(|r| r.value))
        })
    }

    /// Path of the running executable.
    pub fn executable(&self) -> &str {
        self.executable.get_or_init(|| {
            std::env::current_exe()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|_| env!("CARGO_PKG_NAME").to_string())
        })
    }

    /// Extension manager.
    pub fn extension_manager(&self) -> Arc<dyn ExtensionManager> {
        self.extensions
            .get_or_init(|| match &self.extensions_override {
                Some(manager) => manager.clone(),
                None => {
                    let dir = extensions_dir(self.env.as_ref())
                        .unwrap_or_else(|| PathBuf::from(".ghx").join("extensions"));
                    Arc::new(GitExtensionManager::new(dir))
                }
            })
            .clone()
    }
}

/// Builder for [`Factory`].
pub struct FactoryBuilder {
    app_version: String,
    env: Option<Arc<dyn Env>>,
    git: Option<Arc<dyn Git>>,
    load_config: Option<ConfigLoader>,
    make_io: Option<IoConstructor>,
    api_endpoint: Option<Url>,
    extensions: Option<Arc<dyn ExtensionManager>>,
}

impl FactoryBuilder {
    /// A builder with production defaults.
    pub fn new(app_version: impl Into<String>) -> Self {
        Self {
            app_version: app_version.into(),
            env: None,
            git: None,
            load_config: None,
            make_io: None,
            api_endpoint: None,
            extensions: None,
        }
    }

    /// Read environment variables from `env`.
    pub fn env(mut self, env: Arc<dyn Env>) -> Self {
        self.env = Some(env);
        self
    }

    /// Use `git` for remotes and branch.
    pub fn git(mut self, git: Arc<dyn Git>) -> Self {
        self.git = Some(git);
        self
    }

    /// Load configuration with `loader`.
    pub fn config_loader<F>(mut self, loader: F) -> Self
    where
        F: Fn() -> Result<FileConfig> + Send + Sync + 'static,
    {
        self.load_config = Some(Box::new(loader));
        self
    }

    /// Use a fixed configuration.
    pub fn config(self, config: FileConfig) -> Self {
        self.config_loader(move || Ok(config.clone()))
    }

    /// Use `io` instead of the process streams.
    pub fn io_streams(mut self, io: IoStreams) -> Self {
        self.make_io = Some(Box::new(move || io.clone()));
        self
    }

    /// Send API calls to `endpoint`.
    pub fn api_endpoint(mut self, endpoint: Url) -> Self {
        self.api_endpoint = Some(endpoint);
        self
    }

    /// Use `manager` for extension commands.
    pub fn extension_manager(mut self, manager: Arc<dyn ExtensionManager>) -> Self {
        self.extensions = Some(manager);
        self
    }

    /// Assemble the factory. Performs no I/O.
    pub fn build(self) -> Factory {
        let env: Arc<dyn Env> = self.env.unwrap_or_else(|| Arc::new(ProcessEnv));
        let load_config = self.load_config.unwrap_or_else(|| {
            let env = env.clone();
            Box::new(move || {
                let path = config_file(env.as_ref()).ok_or_else(|| GhError::ConfigNotFound {
                    path: PathBuf::from("config.yml"),
                })?;
                load_config_file(&path)
            })
        });

        Factory {
            app_version: self.app_version,
            git: self.git.unwrap_or_else(|| Arc::new(CommandGit::new())),
            load_config,
            make_io: self.make_io.unwrap_or_else(|| Box::new(IoStreams::system)),
            api_endpoint: self.api_endpoint,
            extensions_override: self.extensions,
            env,
            config: Memo::new(),
            branch: Memo::new(),
            remotes: Memo::new(),
            base_repo: Memo::new(),
            smart_base_repo: Memo::new(),
            http_client: Memo::new(),
            io: OnceLock::new(),
            browser: OnceLock::new(),
            executable: OnceLock::new(),
            extensions: OnceLock::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::StubGit;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn env(pairs: &[(&str, &str)]) -> Arc<dyn Env> {
        Arc::new(
            pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect::<HashMap<_, _>>(),
        )
    }

    fn counting_loader(
        calls: Arc<AtomicUsize>,
        result: Result<FileConfig>,
    ) -> impl Fn() -> Result<FileConfig> + Send + Sync + 'static {
        move || {
            calls.fetch_add(1, Ordering::SeqCst);
            result.clone()
        }
    }

    fn builder() -> FactoryBuilder {
        let (io, _) = IoStreams::test();
        Factory::builder("1.0.0").env(env(&[])).io_streams(io)
    }

    #[test]
    fn construction_does_no_work() {
        let calls = Arc::new(AtomicUsize::new(0));
        let git = Arc::new(StubGit::default());
        let _factory = builder()
            .git(git.clone())
            .config_loader(counting_loader(calls.clone(), Ok(FileConfig::blank())))
            .build();

        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert_eq!(git.remote_calls.load(Ordering::SeqCst), 0);
        assert_eq!(git.branch_calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn config_is_loaded_once() {
        let calls = Arc::new(AtomicUsize::new(0));
        let factory = builder()
            .config_loader(counting_loader(calls.clone(), Ok(FileConfig::blank())))
            .build();

        let a = factory.config().unwrap();
        let b = factory.config().unwrap();
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn missing_config_file_is_blank() {
        let calls = Arc::new(AtomicUsize::new(0));
        let factory = builder()
            .config_loader(counting_loader(
                calls.clone(),
                Err(GhError::ConfigNotFound {
                    path: PathBuf::from("/nope/config.yml"),
                }),
            ))
            .build();

        let cfg = factory.config().unwrap();
        assert_eq!(cfg.get("", "browser"), None);
        assert!(Arc::ptr_eq(&cfg, &factory.config().unwrap()));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn parse_errors_are_cached() {
        let calls = Arc::new(AtomicUsize::new(0));
        let factory = builder()
            .config_loader(counting_loader(
                calls.clone(),
                Err(GhError::ConfigParse {
                    path: PathBuf::from("config.yml"),
                    message: "bad indent".into(),
                }),
            ))
            .build();

        assert!(matches!(factory.config(), Err(GhError::ConfigParse { .. })));
        assert!(matches!(factory.config(), Err(GhError::ConfigParse { .. })));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn environment_overlays_file_config() {
        let factory = Factory::builder("1.0.0")
            .env(env(&[("GH_TOKEN", "env-token")]))
            .config(FileConfig::blank().with("github.com", "oauth_token", "file-token"))
            .build();
        assert_eq!(
            factory.config().unwrap().get("github.com", "oauth_token").as_deref(),
            Some("env-token")
        );
    }

    #[test]
    fn branch_errors_gain_context() {
        let factory = builder().git(Arc::new(StubGit::default())).build();
        let err = factory.branch().unwrap_err();
        assert_eq!(
            err.to_string(),
            "could not determine current branch: not on any branch"
        );
    }

    #[test]
    fn base_repo_resolves_remotes_on_demand() {
        let git = Arc::new(StubGit::with_remotes(&[
            ("upstream", "https://github.com/cli/cli.git"),
            ("origin", "git@github.com:monalisa/cli.git"),
        ]));
        let factory = builder().git(git.clone()).config(FileConfig::blank()).build();

        assert_eq!(factory.base_repo().unwrap().full_name(), "cli/cli");
        assert_eq!(factory.base_repo().unwrap().full_name(), "cli/cli");
        assert_eq!(factory.remotes().unwrap().len(), 2);
        assert_eq!(git.remote_calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn git_errors_propagate_unchanged() {
        let factory = builder()
            .git(Arc::new(StubGit::default()))
            .config(FileConfig::blank())
            .build();
        assert!(matches!(factory.remotes(), Err(GhError::Git(msg)) if msg == "not a git repository"));
        assert!(matches!(factory.base_repo(), Err(GhError::Git(_))));
    }

    #[test]
    fn empty_remote_list_is_no_remotes() {
        let factory = builder()
            .git(Arc::new(StubGit::with_remotes(&[])))
            .config(FileConfig::blank())
            .build();
        assert!(matches!(factory.base_repo(), Err(GhError::NoRemotes)));
    }

    #[test]
    fn browser_precedence() {
        let factory = Factory::builder("1.0.0")
            .env(env(&[("BROWSER", "lynx"), ("GH_BROWSER", "w3m")]))
            .config(FileConfig::blank().with("", "browser", "firefox"))
            .build();
        assert_eq!(factory.browser().launcher(), Some("w3m"));

        let factory = Factory::builder("1.0.0")
            .env(env(&[("BROWSER", "lynx")]))
            .config(FileConfig::blank().with("", "browser", "firefox"))
            .build();
        assert_eq!(factory.browser().launcher(), Some("firefox"));
    }

    #[test]
    fn browser_survives_config_errors() {
        let factory = Factory::builder("1.0.0")
            .env(env(&[("BROWSER", "lynx")]))
            .config_loader(|| {
                Err(GhError::ConfigParse {
                    path: PathBuf::from("config.yml"),
                    message: "bad".into(),
                })
            })
            .build();
        assert_eq!(factory.browser().launcher(), Some("lynx"));
    }

    #[test]
    fn io_streams_apply_pager_and_prompt_settings() {
        let (io, _) = IoStreams::test();
        let factory = Factory::builder("1.0.0")
            .env(env(&[("PAGER", "more")]))
            .io_streams(io)
            .config(
                FileConfig::blank()
                    .with("", "pager", "less -R")
                    .with("", "prompt", "disabled"),
            )
            .build();

        let io = factory.io_streams();
        assert_eq!(io.pager(), Some("less -R"));

        let mut tty = io.clone();
        tty.set_stdin_tty(true);
        tty.set_stdout_tty(true);
        assert!(!tty.can_prompt());
    }

    #[test]
    fn http_client_is_shared() {
        let factory = builder().config(FileConfig::blank()).build();
        let a = factory.http_client().unwrap();
        let b = factory.http_client().unwrap();
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(
            a.layer_names(),
            &["User-Agent", "Authorization", "Time-Zone", "Accept"]
        );
    }

    #[test]
    fn executable_is_never_empty() {
        let factory = builder().build();
        assert!(!factory.executable().is_empty());
    }
}
