//! Integration tests for the ghx binary.
// The cargo_bin function is marked deprecated in favor of cargo_bin! macro,
// but both work correctly. Suppressing until assert_cmd stabilizes the new API.
#![allow(deprecated)]

use assert_cmd::cargo::cargo_bin;
use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

/// Isolated config and data directories.
struct Sandbox {
    config: TempDir,
    data: TempDir,
}

impl Sandbox {
    fn new() -> Self {
        Self {
            config: TempDir::new().unwrap(),
            data: TempDir::new().unwrap(),
        }
    }

    fn with_config(config: &str) -> Self {
        let sandbox = Self::new();
        fs::write(sandbox.config.path().join("config.yml"), config).unwrap();
        sandbox
    }

    fn ghx(&self) -> Command {
        let mut cmd = Command::new(cargo_bin("ghx"));
        cmd.env("GH_CONFIG_DIR", self.config.path())
            .env("GH_DATA_DIR", self.data.path())
            .env_remove("GH_TOKEN")
            .env_remove("GITHUB_TOKEN")
            .env_remove("GH_BROWSER")
            .env_remove("GH_PAGER")
            .env_remove("DEBUG")
            .env("NO_COLOR", "1");
        cmd
    }
}

#[test]
fn cli_shows_help() -> Result<(), Box<dyn std::error::Error>> {
    let sandbox = Sandbox::new();
    sandbox
        .ghx()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("work with GitHub from the command line"));
    Ok(())
}

#[test]
fn cli_shows_version() -> Result<(), Box<dyn std::error::Error>> {
    let sandbox = Sandbox::new();
    sandbox
        .ghx()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
    Ok(())
}

#[test]
fn cli_extensions_list_empty_fails() -> Result<(), Box<dyn std::error::Error>> {
    let sandbox = Sandbox::new();
    sandbox
        .ghx()
        .args(["extensions", "list"])
        .assert()
        .code(1)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("no extensions installed"));
    Ok(())
}

#[test]
fn cli_extensions_upgrade_requires_target() -> Result<(), Box<dyn std::error::Error>> {
    let sandbox = Sandbox::new();
    sandbox
        .ghx()
        .args(["extensions", "upgrade"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("must specify an extension to upgrade"));
    Ok(())
}

#[test]
fn cli_extensions_upgrade_rejects_name_with_all() -> Result<(), Box<dyn std::error::Error>> {
    let sandbox = Sandbox::new();
    sandbox
        .ghx()
        .args(["extensions", "upgrade", "branch", "--all"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("cannot use `--all` with extension name"));
    Ok(())
}

#[test]
fn cli_extensions_install_requires_prefix() -> Result<(), Box<dyn std::error::Error>> {
    let sandbox = Sandbox::new();
    sandbox
        .ghx()
        .args(["extensions", "install", "cli/cli"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("must start with `gh-`"));
    Ok(())
}

#[test]
fn cli_extensions_remove_unknown_fails() -> Result<(), Box<dyn std::error::Error>> {
    let sandbox = Sandbox::new();
    sandbox
        .ghx()
        .args(["extensions", "remove", "nothing"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("no extension found"));
    Ok(())
}

#[cfg(unix)]
#[test]
fn cli_extensions_local_install_list_remove() -> Result<(), Box<dyn std::error::Error>> {
    let sandbox = Sandbox::new();
    let workspace = TempDir::new()?;
    let ext_dir = workspace.path().join("gh-hello");
    fs::create_dir_all(&ext_dir)?;

    sandbox
        .ghx()
        .current_dir(&ext_dir)
        .args(["extensions", "install", "."])
        .assert()
        .success();

    sandbox
        .ghx()
        .args(["extensions", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("gh hello"));

    sandbox
        .ghx()
        .args(["extensions", "upgrade", "hello"])
        .assert()
        .success()
        .stdout(predicate::str::contains("local extensions can not be upgraded"));

    sandbox
        .ghx()
        .args(["extensions", "remove", "gh-hello"])
        .assert()
        .success();

    assert!(ext_dir.exists());
    sandbox
        .ghx()
        .args(["extensions", "list"])
        .assert()
        .code(1);
    Ok(())
}

#[test]
fn cli_config_get_prints_value() -> Result<(), Box<dyn std::error::Error>> {
    let sandbox = Sandbox::with_config("git_protocol: ssh\nhosts:\n  example.com:\n    git_protocol: https\n");
    sandbox
        .ghx()
        .args(["config", "get", "git_protocol"])
        .assert()
        .success()
        .stdout("ssh\n");
    sandbox
        .ghx()
        .args(["config", "get", "git_protocol", "--host", "example.com"])
        .assert()
        .success()
        .stdout("https\n");
    Ok(())
}

#[test]
fn cli_config_get_unset_exits_one() -> Result<(), Box<dyn std::error::Error>> {
    let sandbox = Sandbox::new();
    sandbox
        .ghx()
        .args(["config", "get", "editor"])
        .assert()
        .code(1)
        .stdout(predicate::str::is_empty());
    Ok(())
}

#[test]
fn cli_config_parse_error_is_reported() -> Result<(), Box<dyn std::error::Error>> {
    let sandbox = Sandbox::with_config("hosts: [unclosed\n");
    sandbox
        .ghx()
        .args(["config", "get", "editor"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Failed to parse config"));
    Ok(())
}

#[test]
fn cli_config_get_sees_environment_token() -> Result<(), Box<dyn std::error::Error>> {
    let sandbox = Sandbox::new();
    sandbox
        .ghx()
        .env("GH_TOKEN", "from-env")
        .args(["config", "get", "oauth_token", "--host", "github.com"])
        .assert()
        .success()
        .stdout("from-env\n");
    Ok(())
}

#[test]
fn cli_browse_outside_repository_fails() -> Result<(), Box<dyn std::error::Error>> {
    let sandbox = Sandbox::new();
    let outside = TempDir::new()?;
    sandbox
        .ghx()
        .current_dir(outside.path())
        .env("GIT_CEILING_DIRECTORIES", outside.path())
        .args(["browse", "--no-browser"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("git"));
    Ok(())
}

#[test]
fn cli_completions_bash() -> Result<(), Box<dyn std::error::Error>> {
    let sandbox = Sandbox::new();
    sandbox
        .ghx()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("ghx"));
    Ok(())
}

#[test]
fn cli_unknown_command_is_usage_error() -> Result<(), Box<dyn std::error::Error>> {
    let sandbox = Sandbox::new();
    sandbox.ghx().arg("frobnicate").assert().code(2);
    Ok(())
}

#[cfg(unix)]
#[test]
fn cli_api_over_unix_socket_sends_pipeline_headers() -> Result<(), Box<dyn std::error::Error>> {
    use std::io::{BufRead, BufReader, Write};
    use std::os::unix::net::UnixListener;

    let socket_dir = TempDir::new()?;
    let socket = socket_dir.path().join("api.sock");
    let listener = UnixListener::bind(&socket)?;

    let server = std::thread::spawn(move || {
        let (stream, _) = listener.accept().unwrap();
        let mut reader = BufReader::new(stream.try_clone().unwrap());
        let mut head = Vec::new();
        loop {
            let mut line = String::new();
            reader.read_line(&mut line).unwrap();
            if line == "\r\n" || line.is_empty() {
                break;
            }
            head.push(line.trim_end().to_string());
        }
        let body = r#"{"login":"monalisa"}"#;
        let mut stream = stream;
        write!(
            stream,
            "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: {}\r\n\r\n{}",
            body.len(),
            body
        )
        .unwrap();
        head
    });

    let sandbox = Sandbox::with_config(&format!("http_unix_socket: {}\n", socket.display()));
    sandbox
        .ghx()
        .env("GH_TOKEN", "sekrit")
        .args(["api", "user"])
        .assert()
        .success()
        .stdout(predicate::str::contains("monalisa"));

    let head = server.join().unwrap();
    let lower: Vec<String> = head.iter().map(|l| l.to_lowercase()).collect();
    assert_eq!(head[0], "GET /user HTTP/1.1");
    assert!(lower.contains(&"host: api.github.com".to_string()));
    assert!(lower.contains(&format!("user-agent: github api {}", env!("CARGO_PKG_VERSION"))));
    assert!(lower.contains(&"authorization: token sekrit".to_string()));
    assert!(lower.iter().any(|l| l.starts_with("accept: application/vnd.github.merge-info-preview+json")));
    Ok(())
}
