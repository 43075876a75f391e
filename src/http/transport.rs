//! Network transport backed by reqwest.

use reqwest::blocking::Client;
use reqwest::header::HOST;

use super::{Request, Response, Transport};
use crate::error::Result;

/// Sends requests over the network with a blocking reqwest client.
///
/// No timeout is configured beyond reqwest's defaults.
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    /// Create a transport with a fresh client.
    pub fn new() -> Result<Self> {
        Ok(Self {
            client: Client::builder().build()?,
        })
    }

    /// Wrap an existing client.
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

impl Transport for ReqwestTransport {
    fn round_trip(&self, req: Request) -> Result<Response> {
        let mut builder = self
            .client
            .request(req.method, req.url)
            .headers(req.headers);

        if let Some(host) = req.host.filter(|h| !h.is_empty()) {
            builder = builder.header(HOST, host);
        }
        if let Some(body) = req.body {
            builder = builder.body(body);
        }

        let response = builder.send()?;
        let status = response.status();
        let headers = response.headers().clone();
        let body = response.bytes()?.to_vec();

        Ok(Response {
            status,
            headers,
            body,
        })
    }
}
