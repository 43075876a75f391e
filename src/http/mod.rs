//! Authenticated HTTP transport.
//!
//! An [`HttpClient`] is a base [`Transport`] plus an ordered list of layers:
//!
//! 1. an optional transport replacement (unix socket)
//! 2. an optional traffic logger wrapping the transport
//! 3. header [`Decorator`]s, applied to each request in registration order
//!
//! The layer order is data ([`HttpClient::layer_names`]) so it can be
//! inspected and tested. [`new_http_client`] wires the standard pipeline.
//!
//! # Example
//!
//! ```
//! use ghx::http::{AcceptHeader, Decorator, Request};
//! use reqwest::Method;
//!
//! let req = Request::new(Method::GET, "https://api.github.com/user".parse().unwrap());
//! let patch = AcceptHeader.patch(&req).unwrap().unwrap();
//! assert!(patch.value.to_str().unwrap().starts_with("application/vnd.github.merge-info-preview+json"));
//! ```

mod decorators;
mod pipeline;
mod timezone;
mod transport;
mod unix_socket;
mod verbose;

pub use decorators::{
    AcceptHeader, AuthorizationHeader, Decorator, HeaderPatch, PatchMode, TimeZoneHeader,
    UserAgentHeader,
};
pub use pipeline::{new_http_client, user_agent, UNIX_SOCKET_LAYER, VERBOSE_LAYER};
pub use timezone::{zone_for_offset, LocalZone, UNKNOWN_ZONE};
pub use transport::ReqwestTransport;
pub use unix_socket::UnixSocketTransport;
pub use verbose::VerboseTransport;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::{Method, StatusCode, Url};
use serde::de::DeserializeOwned;

use crate::error::{GhError, Result};

/// An outbound request.
#[derive(Debug, Clone)]
pub struct Request {
    /// HTTP method.
    pub method: Method,
    /// Target URL.
    pub url: Url,
    /// Explicit host, overriding the URL host for routing decisions.
    pub host: Option<String>,
    /// Request headers.
    pub headers: HeaderMap,
    /// Request body.
    pub body: Option<Vec<u8>>,
}

impl Request {
    /// Create a request with no headers or body.
    pub fn new(method: Method, url: Url) -> Self {
        Self {
            method,
            url,
            host: None,
            headers: HeaderMap::new(),
            body: None,
        }
    }

    /// Set the explicit host.
    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = Some(host.into());
        self
    }

    /// Add a header, replacing any existing value.
    pub fn with_header(mut self, name: &str, value: &str) -> Result<Self> {
        let name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|_| GhError::Usage(format!("invalid header name: {:?}", name)))?;
        let value = HeaderValue::from_str(value)
            .map_err(|_| GhError::Usage(format!("invalid value for header {}", name)))?;
        self.headers.insert(name, value);
        Ok(self)
    }

    /// Attach a JSON body and `Content-Type`.
    pub fn with_json(mut self, body: &serde_json::Value) -> Result<Self> {
        self.body = Some(serde_json::to_vec(body)?);
        self.headers.insert(
            reqwest::header::CONTENT_TYPE,
            HeaderValue::from_static("application/json; charset=utf-8"),
        );
        Ok(self)
    }

    /// Host the request is aimed at: the explicit host if set, else the URL host.
    pub fn target_host(&self) -> String {
        match self.host.as_deref() {
            Some(host) if !host.is_empty() => host.to_string(),
            _ => self.url.host_str().unwrap_or_default().to_string(),
        }
    }
}

/// A received response.
#[derive(Debug, Clone)]
pub struct Response {
    /// Status code.
    pub status: StatusCode,
    /// Response headers.
    pub headers: HeaderMap,
    /// Raw body.
    pub body: Vec<u8>,
}

impl Response {
    /// Whether the status is 2xx.
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    /// Body as (lossy) UTF-8.
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    /// Whether the response declares a JSON body.
    pub fn is_json(&self) -> bool {
        self.headers
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|ct| ct.contains("json"))
            .unwrap_or(false)
    }

    /// Decode the body as JSON.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
        Ok(serde_json::from_slice(&self.body)?)
    }
}

/// Something that can carry a request to a server and bring back a response.
pub trait Transport: Send + Sync {
    /// Perform one request/response exchange.
    fn round_trip(&self, req: Request) -> Result<Response>;
}

/// A transport with its decorator pipeline applied.
pub struct HttpClient {
    layers: Vec<&'static str>,
    decorators: Vec<Box<dyn Decorator>>,
    transport: Box<dyn Transport>,
}

impl HttpClient {
    /// Start building a client on top of `transport`.
    pub fn builder(transport: Box<dyn Transport>) -> HttpClientBuilder {
        HttpClientBuilder {
            layers: Vec::new(),
            decorators: Vec::new(),
            transport,
        }
    }

    /// Layer names in the order they were registered.
    pub fn layer_names(&self) -> &[&'static str] {
        &self.layers
    }

    /// Run every decorator against `req`, in order.
    pub fn decorate(&self, req: &mut Request) -> Result<()> {
        for decorator in &self.decorators {
            if let Some(patch) = decorator.patch(req)? {
                patch.apply(&mut req.headers);
            }
        }
        Ok(())
    }

    /// Decorate and send `req`.
    pub fn send(&self, mut req: Request) -> Result<Response> {
        self.decorate(&mut req)?;
        self.transport.round_trip(req)
    }
}

impl Transport for HttpClient {
    fn round_trip(&self, req: Request) -> Result<Response> {
        self.send(req)
    }
}

/// Builder for [`HttpClient`].
pub struct HttpClientBuilder {
    layers: Vec<&'static str>,
    decorators: Vec<Box<dyn Decorator>>,
    transport: Box<dyn Transport>,
}

impl HttpClientBuilder {
    /// Swap the underlying transport for another one entirely.
    pub fn replace_transport(mut self, name: &'static str, transport: Box<dyn Transport>) -> Self {
        self.layers.push(name);
        self.transport = transport;
        self
    }

    /// Wrap the current transport.
    pub fn wrap_transport<F>(mut self, name: &'static str, wrap: F) -> Self
    where
        F: FnOnce(Box<dyn Transport>) -> Box<dyn Transport>,
    {
        self.layers.push(name);
        self.transport = wrap(self.transport);
        self
    }

    /// Append a header decorator.
    pub fn decorator<D: Decorator + 'static>(mut self, decorator: D) -> Self {
        self.layers.push(decorator.name());
        self.decorators.push(Box::new(decorator));
        self
    }

    /// Finish the client.
    pub fn build(self) -> HttpClient {
        tracing::debug!("HTTP pipeline: {}", self.layers.join(" -> "));
        HttpClient {
            layers: self.layers,
            decorators: self.decorators,
            transport: self.transport,
        }
    }
}
