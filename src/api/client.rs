//! GraphQL and REST calls over the authenticated transport.

use std::sync::Arc;

use reqwest::Method;
use serde::Deserialize;
use serde_json::{json, Value};
use url::Url;

use super::host::{graphql_url, rest_prefix};
use crate::error::{GhError, Result};
use crate::http::{HttpClient, Request, Response};
use crate::repo::{NetworkRepo, RepoId, RepoNetwork};

/// API access for one process.
#[derive(Clone)]
pub struct ApiClient {
    http: Arc<HttpClient>,
    endpoint: Option<Url>,
}

impl ApiClient {
    /// Create a client that derives endpoints from the target host.
    pub fn new(http: Arc<HttpClient>) -> Self {
        Self {
            http,
            endpoint: None,
        }
    }

    /// Send every call to `endpoint` instead. Requests still carry the
    /// logical host, so per-host headers are unaffected.
    pub fn with_endpoint(mut self, endpoint: Url) -> Self {
        self.endpoint = Some(endpoint);
        self
    }

    /// The underlying transport.
    pub fn http(&self) -> &HttpClient {
        &self.http
    }

    /// Absolute URL for `path` on `host`.
    ///
    /// `path` may be a REST path (`repos/cli/cli`), `graphql`, or an
    /// absolute `https://` URL, which is used as-is.
    pub fn url_for(&self, host: &str, path: &str) -> Result<Url> {
        if path.starts_with("https://") || path.starts_with("http://") {
            return Url::parse(path).map_err(|e| GhError::Usage(format!("invalid URL {}: {}", path, e)));
        }
        let path = path.trim_start_matches('/');

        let raw = match &self.endpoint {
            Some(base) => {
                let mut base = base.clone();
                if !base.path().ends_with('/') {
                    base.set_path(&format!("{}/", base.path()));
                }
                return base
                    .join(path)
                    .map_err(|e| GhError::Usage(format!("invalid API path {}: {}", path, e)));
            }
            None if path == "graphql" => graphql_url(host),
            None => format!("{}{}", rest_prefix(host), path),
        };
        Url::parse(&raw).map_err(|e| GhError::Usage(format!("invalid API path {}: {}", path, e)))
    }

    /// A request for `path` on `host`, ready for extra headers or a body.
    pub fn request(&self, host: &str, method: Method, path: &str) -> Result<Request> {
        let req = Request::new(method, self.url_for(host, path)?);
        Ok(match self.endpoint {
            Some(_) => req.with_host(host),
            None => req,
        })
    }

    /// Send a prepared request without interpreting the status.
    pub fn send(&self, req: Request) -> Result<Response> {
        self.http.send(req)
    }

    /// Call a REST endpoint. Non-2xx answers become [`GhError::Api`].
    pub fn rest(
        &self,
        host: &str,
        method: Method,
        path: &str,
        body: Option<&Value>,
    ) -> Result<Response> {
        let mut req = self.request(host, method, path)?;
        if let Some(body) = body {
            req = req.with_json(body)?;
        }
        let resp = self.send(req)?;
        if !resp.is_success() {
            return Err(api_error(&resp));
        }
        Ok(resp)
    }

    /// Run a GraphQL query and return its `data`.
    ///
    /// Any entry in `errors` fails the call.
    pub fn graphql(&self, host: &str, query: &str, variables: Value) -> Result<Value> {
        let body = self.graphql_raw(host, query, variables)?;
        if let Some(message) = graphql_errors(&body) {
            return Err(GhError::Api {
                status: 200,
                message,
            });
        }
        Ok(body.get("data").cloned().unwrap_or(Value::Null))
    }

    fn graphql_raw(&self, host: &str, query: &str, variables: Value) -> Result<Value> {
        let req = self
            .request(host, Method::POST, "graphql")?
            .with_json(&json!({ "query": query, "variables": variables }))?;
        let resp = self.send(req)?;
        if !resp.is_success() {
            return Err(api_error(&resp));
        }
        resp.json()
    }
}

impl RepoNetwork for ApiClient {
    /// One aliased query covering every repository. Repositories the
    /// service can't find come back as `None` rather than failing the
    /// whole call.
    fn resolve_network(&self, repos: &[RepoId]) -> Result<Vec<Option<NetworkRepo>>> {
        let Some(first) = repos.first() else {
            return Ok(Vec::new());
        };
        let query = network_query(repos)?;
        let body = self.graphql_raw(first.host(), &query, json!({}))?;

        let data = body.get("data").filter(|d| !d.is_null());
        if data.is_none() {
            let message = graphql_errors(&body).unwrap_or_else(|| "empty response".to_string());
            return Err(GhError::Api {
                status: 200,
                message,
            });
        }

        Ok(repos
            .iter()
            .enumerate()
            .map(|(i, id)| {
                data.and_then(|d| d.get(alias(i)))
                    .and_then(|node| parse_network_repo(id.host(), node))
            })
            .collect())
    }
}

fn alias(i: usize) -> String {
    format!("repo_{:03}", i)
}

fn network_query(repos: &[RepoId]) -> Result<String> {
    let mut query = String::from("fragment repo on Repository {\n  name\n  owner { login }\n  viewerPermission\n}\n\nquery RepositoryNetwork {\n  viewer { login }\n");
    for (i, repo) in repos.iter().enumerate() {
        query.push_str(&format!(
            "  {}: repository(owner: {}, name: {}) {{\n    ...repo\n    parent {{ ...repo }}\n  }}\n",
            alias(i),
            serde_json::to_string(repo.owner())?,
            serde_json::to_string(repo.name())?,
        ));
    }
    query.push('}');
    Ok(query)
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RepoNode {
    name: String,
    owner: OwnerNode,
    viewer_permission: Option<String>,
    parent: Option<Box<RepoNode>>,
}

#[derive(Debug, Deserialize)]
struct OwnerNode {
    login: String,
}

fn parse_network_repo(host: &str, node: &Value) -> Option<NetworkRepo> {
    let node = RepoNode::deserialize(node).ok()?;
    Some(NetworkRepo {
        repo: RepoId::new(host, node.owner.login, node.name),
        parent: node
            .parent
            .map(|p| RepoId::new(host, p.owner.login, p.name)),
        viewer_permission: node.viewer_permission,
    })
}

fn graphql_errors(body: &Value) -> Option<String> {
    let errors = body.get("errors")?.as_array()?;
    if errors.is_empty() {
        return None;
    }
    Some(
        errors
            .iter()
            .filter_map(|e| e.get("message").and_then(Value::as_str))
            .collect::<Vec<_>>()
            .join("; "),
    )
}

/// Turn a non-2xx response into an error, preferring the server's message.
pub fn api_error(resp: &Response) -> GhError {
    let message = resp
        .json::<Value>()
        .ok()
        .and_then(|v| v.get("message").and_then(Value::as_str).map(str::to_string))
        .or_else(|| {
            let text = resp.text();
            (!text.trim().is_empty()).then(|| text.trim().to_string())
        })
        .unwrap_or_else(|| {
            resp.status
                .canonical_reason()
                .unwrap_or("request failed")
                .to_string()
        });
    GhError::Api {
        status: resp.status.as_u16(),
        message,
    }
}
