//! Header decorators.
//!
//! Each decorator is a pure function of the request (and an immutable
//! config snapshot) returning at most one header patch. Function-style
//! decorators use [`PatchMode::IfAbsent`] so a header the caller already
//! set, or an earlier layer produced, is never replaced.

use std::sync::Arc;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT, AUTHORIZATION, USER_AGENT};
use reqwest::Method;

use super::timezone::LocalZone;
use super::Request;
use crate::api::host::{is_enterprise, normalize_hostname};
use crate::config::{keys, Config, Env};
use crate::error::{GhError, Result};

const TIME_ZONE: HeaderName = HeaderName::from_static("time-zone");

/// Preview media types sent to every host.
const BASE_PREVIEWS: &[&str] = &[
    // PullRequest.mergeStateStatus
    "application/vnd.github.merge-info-preview+json",
    // repository visibility over REST
    "application/vnd.github.nebula-preview",
];

/// Preview media types only enterprise hosts still require.
const ENTERPRISE_PREVIEWS: &[&str] = &[
    // Commit.statusCheckRollup
    "application/vnd.github.antiope-preview",
    // PullRequest.isDraft
    "application/vnd.github.shadow-cat-preview",
];

/// How a patch interacts with an existing header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatchMode {
    /// Overwrite any existing value.
    Replace,
    /// Only set the header when the request doesn't carry it yet.
    IfAbsent,
}

/// A single header mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderPatch {
    /// Header to set.
    pub name: HeaderName,
    /// Value to set.
    pub value: HeaderValue,
    /// Interaction with existing values.
    pub mode: PatchMode,
}

impl HeaderPatch {
    fn new(name: HeaderName, value: &str, mode: PatchMode) -> Result<Self> {
        let value = HeaderValue::from_str(value)
            .map_err(|_| GhError::Transport(format!("invalid value for header {}", name)))?;
        Ok(Self { name, value, mode })
    }

    /// Apply the patch to `headers`.
    pub fn apply(self, headers: &mut HeaderMap) {
        match self.mode {
            PatchMode::Replace => {
                headers.insert(self.name, self.value);
            }
            PatchMode::IfAbsent => {
                if !headers.contains_key(&self.name) {
                    headers.insert(self.name, self.value);
                }
            }
        }
    }
}

/// A request decorator.
pub trait Decorator: Send + Sync {
    /// Layer name, used when listing the pipeline.
    fn name(&self) -> &'static str;

    /// The header change for `req`, if any.
    fn patch(&self, req: &Request) -> Result<Option<HeaderPatch>>;
}

/// Sets `User-Agent` unconditionally.
#[derive(Debug, Clone)]
pub struct UserAgentHeader {
    value: String,
}

impl UserAgentHeader {
    /// Create the decorator with a fixed agent string.
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
        }
    }
}

impl Decorator for UserAgentHeader {
    fn name(&self) -> &'static str {
        "User-Agent"
    }

    fn patch(&self, _req: &Request) -> Result<Option<HeaderPatch>> {
        HeaderPatch::new(USER_AGENT, &self.value, PatchMode::Replace).map(Some)
    }
}

/// Sets `Authorization: token <value>` from the per-host `oauth_token`.
///
/// Hosts without a token get no header; the request goes out
/// unauthenticated.
pub struct AuthorizationHeader {
    config: Arc<dyn Config>,
}

impl AuthorizationHeader {
    /// Create the decorator over a config snapshot.
    pub fn new(config: Arc<dyn Config>) -> Self {
        Self { config }
    }
}

impl Decorator for AuthorizationHeader {
    fn name(&self) -> &'static str {
        "Authorization"
    }

    fn patch(&self, req: &Request) -> Result<Option<HeaderPatch>> {
        let host = normalize_hostname(&req.target_host());
        match self.config.get(&host, keys::OAUTH_TOKEN) {
            Some(token) if !token.is_empty() => HeaderPatch::new(
                AUTHORIZATION,
                &format!("token {}", token),
                PatchMode::IfAbsent,
            )
            .map(Some),
            _ => Ok(None),
        }
    }
}

enum ZoneSource {
    System(Arc<dyn Env>),
    Fixed(LocalZone),
}

/// Sets `Time-Zone` on non-GET/HEAD requests.
pub struct TimeZoneHeader {
    source: ZoneSource,
}

impl TimeZoneHeader {
    /// Read the zone from the process on every request.
    pub fn system(env: Arc<dyn Env>) -> Self {
        Self {
            source: ZoneSource::System(env),
        }
    }

    /// Always report `zone`.
    pub fn fixed(zone: LocalZone) -> Self {
        Self {
            source: ZoneSource::Fixed(zone),
        }
    }

    fn zone(&self) -> LocalZone {
        match &self.source {
            ZoneSource::System(env) => LocalZone::from_env(env.as_ref()),
            ZoneSource::Fixed(zone) => zone.clone(),
        }
    }
}

impl Decorator for TimeZoneHeader {
    fn name(&self) -> &'static str {
        "Time-Zone"
    }

    fn patch(&self, req: &Request) -> Result<Option<HeaderPatch>> {
        if req.method == Method::GET || req.method == Method::HEAD {
            return Ok(None);
        }
        match self.zone().header_value() {
            Some(zone) => HeaderPatch::new(TIME_ZONE, zone, PatchMode::IfAbsent).map(Some),
            None => Ok(None),
        }
    }
}

/// Sets `Accept` to the preview media types the commands rely on.
#[derive(Debug, Clone, Copy, Default)]
pub struct AcceptHeader;

impl AcceptHeader {
    /// The `Accept` value for requests aimed at `host`.
    pub fn value_for(host: &str) -> String {
        let mut tokens: Vec<&str> = BASE_PREVIEWS.to_vec();
        if is_enterprise(host) {
            tokens.extend_from_slice(ENTERPRISE_PREVIEWS);
        }
        tokens.join(", ")
    }
}

impl Decorator for AcceptHeader {
    fn name(&self) -> &'static str {
        "Accept"
    }

    fn patch(&self, req: &Request) -> Result<Option<HeaderPatch>> {
        let value = Self::value_for(&req.target_host());
        HeaderPatch::new(ACCEPT, &value, PatchMode::IfAbsent).map(Some)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FileConfig;

    fn request(method: Method, url: &str) -> Request {
        Request::new(method, url.parse().unwrap())
    }

    fn value(patch: Option<HeaderPatch>) -> Option<String> {
        patch.map(|p| p.value.to_str().unwrap().to_string())
    }

    fn auth(config: FileConfig) -> AuthorizationHeader {
        AuthorizationHeader::new(Arc::new(config))
    }

    #[test]
    fn user_agent_replaces_existing_value() {
        let mut req = request(Method::GET, "https://api.github.com/");
        req.headers.insert(USER_AGENT, HeaderValue::from_static("curl"));

        let patch = UserAgentHeader::new("GitHub API 1.2.3").patch(&req).unwrap().unwrap();
        patch.apply(&mut req.headers);

        assert_eq!(req.headers[USER_AGENT], "GitHub API 1.2.3");
    }

    #[test]
    fn authorization_uses_normalized_url_host() {
        let cfg = FileConfig::blank().with("github.com", "oauth_token", "abc123");
        let req = request(Method::GET, "https://api.github.com/user");
        assert_eq!(
            value(auth(cfg).patch(&req).unwrap()).as_deref(),
            Some("token abc123")
        );
    }

    #[test]
    fn authorization_prefers_explicit_host() {
        let cfg = FileConfig::blank()
            .with("github.com", "oauth_token", "public")
            .with("ghe.io", "oauth_token", "enterprise");
        let req = request(Method::GET, "https://api.github.com/user").with_host("GHE.io");
        assert_eq!(
            value(auth(cfg).patch(&req).unwrap()).as_deref(),
            Some("token enterprise")
        );
    }

    #[test]
    fn authorization_omitted_without_token() {
        let cfg = FileConfig::blank().with("github.com", "oauth_token", "abc");
        let req = request(Method::POST, "https://ghe.io/api/graphql");
        assert!(auth(cfg).patch(&req).unwrap().is_none());
    }

    #[test]
    fn authorization_never_overwrites_existing_header() {
        let cfg = FileConfig::blank().with("github.com", "oauth_token", "abc");
        let mut req = request(Method::GET, "https://api.github.com/user");
        req.headers
            .insert(AUTHORIZATION, HeaderValue::from_static("token other-host"));

        let patch = auth(cfg).patch(&req).unwrap().unwrap();
        assert_eq!(patch.mode, PatchMode::IfAbsent);
        patch.apply(&mut req.headers);
        assert_eq!(req.headers[AUTHORIZATION], "token other-host");
    }

    #[test]
    fn time_zone_absent_for_get_and_head() {
        let tz = TimeZoneHeader::fixed(LocalZone::new("Europe/Paris", 3600));
        for method in [Method::GET, Method::HEAD] {
            let req = request(method, "https://api.github.com/graphql");
            assert!(tz.patch(&req).unwrap().is_none());
        }
    }

    #[test]
    fn time_zone_present_for_other_methods() {
        let tz = TimeZoneHeader::fixed(LocalZone::new("Europe/Paris", 3600));
        for method in [Method::POST, Method::PUT, Method::PATCH, Method::DELETE] {
            let req = request(method, "https://api.github.com/graphql");
            assert_eq!(value(tz.patch(&req).unwrap()).as_deref(), Some("Europe/Paris"));
        }
    }

    #[test]
    fn time_zone_falls_back_to_offset_table() {
        let tz = TimeZoneHeader::fixed(LocalZone::new(crate::http::UNKNOWN_ZONE, 0));
        let req = request(Method::POST, "https://api.github.com/graphql");
        assert_eq!(value(tz.patch(&req).unwrap()).as_deref(), Some("Europe/London"));
    }

    #[test]
    fn time_zone_unknown_offset_sets_nothing() {
        let tz = TimeZoneHeader::fixed(LocalZone::new(crate::http::UNKNOWN_ZONE, 1234));
        let req = request(Method::POST, "https://api.github.com/graphql");
        assert!(tz.patch(&req).unwrap().is_none());
    }

    #[test]
    fn accept_for_public_host_has_base_tokens_only() {
        let req = request(Method::GET, "https://api.github.com/repos/o/r");
        assert_eq!(
            value(AcceptHeader.patch(&req).unwrap()).as_deref(),
            Some(
                "application/vnd.github.merge-info-preview+json, \
                 application/vnd.github.nebula-preview"
            )
        );
    }

    #[test]
    fn accept_for_enterprise_host_appends_enterprise_tokens() {
        let req = request(Method::GET, "https://ghe.io/api/v3/repos/o/r");
        assert_eq!(
            value(AcceptHeader.patch(&req).unwrap()).as_deref(),
            Some(
                "application/vnd.github.merge-info-preview+json, \
                 application/vnd.github.nebula-preview, \
                 application/vnd.github.antiope-preview, \
                 application/vnd.github.shadow-cat-preview"
            )
        );
    }

    #[test]
    fn accept_respects_caller_value() {
        let mut req = request(Method::GET, "https://api.github.com/");
        req.headers
            .insert(ACCEPT, HeaderValue::from_static("application/vnd.github.raw"));
        AcceptHeader.patch(&req).unwrap().unwrap().apply(&mut req.headers);
        assert_eq!(req.headers[ACCEPT], "application/vnd.github.raw");
    }
}
