//! Request/response traffic log, enabled by `DEBUG`.

use std::io::Write;
use std::time::Instant;

use console::Style;
use reqwest::header::{HeaderMap, AUTHORIZATION};

use super::{Request, Response, Transport};
use crate::error::Result;
use crate::iostreams::StreamWriter;

const REDACTED: &str = "token ████████████████████";

/// Wraps a transport and logs each exchange to a writer.
pub struct VerboseTransport {
    inner: Box<dyn Transport>,
    out: StreamWriter,
    colorize: bool,
    log_bodies: bool,
}

impl VerboseTransport {
    /// Log traffic through `inner` to `out`.
    pub fn new(inner: Box<dyn Transport>, out: StreamWriter) -> Self {
        Self {
            inner,
            out,
            colorize: false,
            log_bodies: false,
        }
    }

    /// Emit ANSI colors.
    pub fn colorize(mut self, colorize: bool) -> Self {
        self.colorize = colorize;
        self
    }

    /// Include request and response bodies.
    pub fn log_bodies(mut self, log_bodies: bool) -> Self {
        self.log_bodies = log_bodies;
        self
    }

    fn style(&self, style: Style) -> Style {
        style.force_styling(self.colorize)
    }

    fn headers(&self, log: &mut String, prefix: &str, headers: &HeaderMap) {
        let name_style = self.style(Style::new().blue());
        for (name, value) in headers {
            let value = if name == AUTHORIZATION {
                REDACTED.to_string()
            } else {
                String::from_utf8_lossy(value.as_bytes()).into_owned()
            };
            log.push_str(&format!("{} {}: {}\n", prefix, name_style.apply_to(name), value));
        }
    }

    fn body(&self, log: &mut String, body: &[u8], json: bool) {
        if !self.log_bodies || body.is_empty() {
            return;
        }
        let pretty = json
            .then(|| serde_json::from_slice::<serde_json::Value>(body).ok())
            .flatten()
            .and_then(|v| serde_json::to_string_pretty(&v).ok());
        match pretty {
            Some(text) => log.push_str(&format!("{}\n", self.style(Style::new().cyan()).apply_to(text))),
            None => log.push_str(&format!("{}\n", String::from_utf8_lossy(body))),
        }
        log.push('\n');
    }

    fn write(&self, log: &str) {
        let mut out = self.out.clone();
        // Logging must never fail the request.
        let _ = out.write_all(log.as_bytes());
        let _ = out.flush();
    }
}

impl Transport for VerboseTransport {
    fn round_trip(&self, req: Request) -> Result<Response> {
        let dim = self.style(Style::new().dim());
        let mut log = String::new();

        log.push_str(&format!("{} Request to {}\n", dim.apply_to("*"), req.url));
        let mut path = req.url.path().to_string();
        if let Some(query) = req.url.query() {
            path.push('?');
            path.push_str(query);
        }
        log.push_str(&format!("> {} {} HTTP/1.1\n", req.method, path));
        log.push_str(&format!("> Host: {}\n", req.target_host()));
        self.headers(&mut log, ">", &req.headers);
        log.push('\n');
        let req_is_json = req
            .headers
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|ct| ct.contains("json"))
            .unwrap_or(false);
        if let Some(body) = req.body.as_deref() {
            self.body(&mut log, body, req_is_json);
        }
        self.write(&log);

        let started = Instant::now();
        let result = self.inner.round_trip(req);
        let elapsed = started.elapsed();

        let mut log = String::new();
        match &result {
            Ok(resp) => {
                let status_style = if resp.is_success() {
                    self.style(Style::new().green())
                } else {
                    self.style(Style::new().red())
                };
                log.push_str(&format!(
                    "< HTTP/1.1 {}\n",
                    status_style.apply_to(resp.status)
                ));
                self.headers(&mut log, "<", &resp.headers);
                log.push('\n');
                self.body(&mut log, &resp.body, resp.is_json());
            }
            Err(e) => log.push_str(&format!("! {}\n", e)),
        }
        log.push_str(&format!(
            "{} Request took {}ms\n",
            dim.apply_to("*"),
            elapsed.as_millis()
        ));
        self.write(&log);

        result
    }
}
