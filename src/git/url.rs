//! Remote URL parsing.

use std::sync::LazyLock;

use regex::Regex;
use url::Url;

/// `[user@]host:path` without a scheme.
static SCP_LIKE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:(?P<user>[^@/]+)@)?(?P<host>[^:/\s]+):(?P<path>[^/].*)$")
        .expect("SCP_LIKE must compile")
});

const SCHEMES: &[&str] = &["https", "http", "git", "ssh", "git+ssh"];

/// Parse a git remote URL into a [`Url`].
///
/// Accepts URLs with a scheme (`https`, `http`, `git`, `ssh`) and the
/// scp-like `user@host:owner/repo.git` form. `ssh.github.com` (SSH over
/// port 443) is reported as `github.com`. Returns `None` for anything else,
/// including local paths.
///
/// ```
/// use ghx::git::parse_remote_url;
///
/// let url = parse_remote_url("git@github.com:cli/cli.git").unwrap();
/// assert_eq!(url.scheme(), "ssh");
/// assert_eq!(url.host_str(), Some("github.com"));
/// assert_eq!(url.path(), "/cli/cli.git");
///
/// assert!(parse_remote_url("/srv/git/project.git").is_none());
/// ```
pub fn parse_remote_url(raw: &str) -> Option<Url> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    let mut url = if raw.contains("://") {
        Url::parse(raw).ok()?
    } else {
        let caps = SCP_LIKE.captures(raw)?;
        let user = caps.name("user").map(|m| m.as_str()).unwrap_or("git");
        let host = &caps["host"];
        let path = &caps["path"];
        Url::parse(&format!("ssh://{}@{}/{}", user, host, path)).ok()?
    };

    if !SCHEMES.contains(&url.scheme()) {
        return None;
    }
    if url.scheme() == "git+ssh" {
        url = Url::parse(&url.as_str().replacen("git+ssh", "ssh", 1)).ok()?;
    }

    if url
        .host_str()
        .is_some_and(|h| h.eq_ignore_ascii_case("ssh.github.com"))
    {
        url.set_host(Some("github.com")).ok()?;
        url.set_port(None).ok()?;
    }

    url.host_str()?;
    Some(url)
}
