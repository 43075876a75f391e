//! API command implementation.
//!
//! `ghx api <endpoint>` sends one authenticated request and prints the
//! response body.

use std::io::Write;

use reqwest::Method;
use serde_json::{Map, Value};

use crate::api::DEFAULT_HOST;
use crate::cli::args::ApiArgs;
use crate::error::{GhError, Result};
use crate::factory::Factory;
use crate::http::Response;

use super::dispatcher::{Command, CommandResult};

/// The api command implementation.
pub struct ApiCommand {
    args: ApiArgs,
}

impl ApiCommand {
    /// Create a new api command.
    pub fn new(args: ApiArgs) -> Self {
        Self { args }
    }

    /// Get the command arguments.
    pub fn args(&self) -> &ApiArgs {
        &self.args
    }

    fn method(&self) -> Result<Method> {
        match &self.args.method {
            Some(m) => Method::from_bytes(m.to_uppercase().as_bytes())
                .map_err(|_| GhError::Usage(format!("invalid HTTP method: {}", m))),
            None if self.args.fields.is_empty() => Ok(Method::GET),
            None => Ok(Method::POST),
        }
    }

    fn body(&self) -> Result<Option<Value>> {
        if self.args.fields.is_empty() {
            return Ok(None);
        }
        let mut body = Map::new();
        for field in &self.args.fields {
            let (key, value) = field.split_once('=').ok_or_else(|| {
                GhError::Usage(format!("field {:?} requires a value separated by '='", field))
            })?;
            body.insert(key.to_string(), Value::String(value.to_string()));
        }
        Ok(Some(Value::Object(body)))
    }
}

impl Command for ApiCommand {
    fn execute(&self, factory: &Factory) -> Result<CommandResult> {
        let method = self.method()?;
        let body = self.body()?;
        let mut headers = Vec::with_capacity(self.args.headers.len());
        for header in &self.args.headers {
            let (name, value) = header.split_once(':').ok_or_else(|| {
                GhError::Usage(format!("header {:?} requires a value separated by ':'", header))
            })?;
            headers.push((name.trim(), value.trim()));
        }

        let endpoint = fill_placeholders(&self.args.endpoint, factory)?;
        let host = self.args.hostname.as_deref().unwrap_or(DEFAULT_HOST);

        let api = factory.api_client()?;
        let mut req = api.request(host, method, &endpoint)?;
        for (name, value) in headers {
            req = req.with_header(name, value)?;
        }
        if let Some(body) = &body {
            req = req.with_json(body)?;
        }

        let resp = api.send(req)?;
        tracing::debug!("{} answered {}", endpoint, resp.status);

        let io = factory.io_streams();
        let output = render_body(&resp, io.is_stdout_tty());
        let mut out = io.start_pager()?;
        out.write_all(output.as_bytes())?;
        if !output.is_empty() && !output.ends_with('\n') {
            out.write_all(b"\n")?;
        }
        out.finish()?;

        if resp.is_success() {
            Ok(CommandResult::success())
        } else {
            writeln!(io.err(), "ghx: HTTP {}", resp.status.as_u16())?;
            Ok(CommandResult::failure(1))
        }
    }
}

/// Fill `{owner}`, `{repo}` and `{branch}` from the current checkout.
///
/// Repository and branch are only resolved when the endpoint asks for them.
fn fill_placeholders(endpoint: &str, factory: &Factory) -> Result<String> {
    let mut filled = endpoint.to_string();
    if filled.contains("{owner}") || filled.contains("{repo}") {
        let repo = factory.base_repo()?;
        filled = filled
            .replace("{owner}", repo.owner())
            .replace("{repo}", repo.name());
    }
    if filled.contains("{branch}") {
        filled = filled.replace("{branch}", &factory.branch()?);
    }
    Ok(filled)
}

/// Pretty JSON for terminals, the raw body otherwise.
fn render_body(resp: &Response, is_tty: bool) -> String {
    if is_tty && resp.is_json() {
        if let Ok(value) = resp.json::<Value>() {
            if let Ok(pretty) = serde_json::to_string_pretty(&value) {
                return pretty;
            }
        }
    }
    resp.text()
}
