//! Host classification.
//!
//! Every subdomain of `github.com` (including `api.github.com`) collapses to
//! the public host; anything else is a self-hosted enterprise instance.

/// The public, multi-tenant host.
pub const DEFAULT_HOST: &str = "github.com";

/// Lowercase `host` and fold subdomains of the public host into it.
///
/// ```
/// use ghx::api::normalize_hostname;
///
/// assert_eq!(normalize_hostname("API.GitHub.com"), "github.com");
/// assert_eq!(normalize_hostname("GHE.Corp.Example"), "ghe.corp.example");
/// ```
pub fn normalize_hostname(host: &str) -> String {
    let host = host.to_lowercase();
    if host.ends_with(&format!(".{}", DEFAULT_HOST)) {
        return DEFAULT_HOST.to_string();
    }
    host
}

/// Whether `host` is a self-hosted enterprise instance.
pub fn is_enterprise(host: &str) -> bool {
    normalize_hostname(host) != DEFAULT_HOST
}

/// GraphQL endpoint for `host`.
pub fn graphql_url(host: &str) -> String {
    if is_enterprise(host) {
        format!("https://{}/api/graphql", host)
    } else {
        format!("https://api.{}/graphql", DEFAULT_HOST)
    }
}

/// REST API prefix for `host`, always ending in `/`.
pub fn rest_prefix(host: &str) -> String {
    if is_enterprise(host) {
        format!("https://{}/api/v3/", host)
    } else {
        format!("https://api.{}/", DEFAULT_HOST)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_public_subdomains() {
        assert_eq!(normalize_hostname("github.com"), "github.com");
        assert_eq!(normalize_hostname("api.github.com"), "github.com");
        assert_eq!(normalize_hostname("uploads.GITHUB.com"), "github.com");
    }

    #[test]
    fn keeps_lookalike_hosts() {
        assert_eq!(normalize_hostname("notgithub.com"), "notgithub.com");
        assert!(is_enterprise("notgithub.com"));
    }

    #[test]
    fn classifies_enterprise_hosts() {
        assert!(!is_enterprise("github.com"));
        assert!(!is_enterprise("api.github.com"));
        assert!(is_enterprise("ghe.example.com"));
        assert!(is_enterprise("127.0.0.1"));
    }

    #[test]
    fn endpoints_for_public_host() {
        assert_eq!(graphql_url("github.com"), "https://api.github.com/graphql");
        assert_eq!(rest_prefix("github.com"), "https://api.github.com/");
    }

    #[test]
    fn endpoints_for_enterprise_host() {
        assert_eq!(graphql_url("ghe.io"), "https://ghe.io/api/graphql");
        assert_eq!(rest_prefix("ghe.io"), "https://ghe.io/api/v3/");
    }
}
