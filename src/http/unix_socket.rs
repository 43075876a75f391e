//! HTTP over a unix domain socket.
//!
//! Used when `http_unix_socket` is configured: every request is written as
//! HTTP/1.1 to the socket instead of dialing the network. One connection
//! per request (`Connection: close`).

use std::path::{Path, PathBuf};

use reqwest::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_LENGTH, TRANSFER_ENCODING};
use reqwest::{Method, StatusCode};

use super::{Request, Response, Transport};
use crate::error::{GhError, Result};

/// Dials a unix socket for every request.
#[derive(Debug, Clone)]
pub struct UnixSocketTransport {
    path: PathBuf,
}

impl UnixSocketTransport {
    /// Create a transport for the socket at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Socket path.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Transport for UnixSocketTransport {
    #[cfg(unix)]
    fn round_trip(&self, req: Request) -> Result<Response> {
        use std::io::{Read, Write};
        use std::os::unix::net::UnixStream;

        let mut stream = UnixStream::connect(&self.path).map_err(|e| {
            GhError::Transport(format!("failed to dial {}: {}", self.path.display(), e))
        })?;

        stream.write_all(&encode_request(&req))?;
        stream.flush()?;

        let mut raw = Vec::new();
        stream.read_to_end(&mut raw)?;
        parse_response(&req.method, &raw)
    }

    #[cfg(not(unix))]
    fn round_trip(&self, _req: Request) -> Result<Response> {
        Err(GhError::Transport(format!(
            "unix sockets are not supported on this platform ({})",
            self.path.display()
        )))
    }
}

/// Serialize `req` as an HTTP/1.1 message.
fn encode_request(req: &Request) -> Vec<u8> {
    let mut path = req.url.path().to_string();
    if let Some(query) = req.url.query() {
        path.push('?');
        path.push_str(query);
    }

    let host = match (&req.host, req.url.port()) {
        (Some(host), _) if !host.is_empty() => host.clone(),
        (_, Some(port)) => format!("{}:{}", req.url.host_str().unwrap_or_default(), port),
        _ => req.url.host_str().unwrap_or_default().to_string(),
    };

    let mut head = format!("{} {} HTTP/1.1\r\nHost: {}\r\n", req.method, path, host);
    for (name, value) in &req.headers {
        if name == reqwest::header::HOST || name == CONTENT_LENGTH {
            continue;
        }
        head.push_str(name.as_str());
        head.push_str(": ");
        head.push_str(&String::from_utf8_lossy(value.as_bytes()));
        head.push_str("\r\n");
    }
    let body = req.body.as_deref().unwrap_or_default();
    if !body.is_empty() || req.method != reqwest::Method::GET {
        head.push_str(&format!("Content-Length: {}\r\n", body.len()));
    }
    head.push_str("Connection: close\r\n\r\n");

    let mut message = head.into_bytes();
    message.extend_from_slice(body);
    message
}

/// Parse a complete HTTP/1.1 response read until EOF.
///
/// HEAD responses and 1xx/204/304 statuses never carry a body, whatever
/// their framing headers announce.
fn parse_response(method: &Method, raw: &[u8]) -> Result<Response> {
    let malformed = |what: &str| GhError::Transport(format!("malformed response: {}", what));

    let split = raw
        .windows(4)
        .position(|w| w == b"\r\n\r\n")
        .ok_or_else(|| malformed("missing header terminator"))?;
    let head = std::str::from_utf8(&raw[..split]).map_err(|_| malformed("non-UTF-8 headers"))?;
    let rest = &raw[split + 4..];

    let mut lines = head.split("\r\n");
    let status_line = lines.next().ok_or_else(|| malformed("empty response"))?;
    let code = status_line
        .split_whitespace()
        .nth(1)
        .and_then(|c| c.parse::<u16>().ok())
        .ok_or_else(|| malformed("bad status line"))?;
    let status = StatusCode::from_u16(code).map_err(|_| malformed("bad status code"))?;

    let mut headers = HeaderMap::new();
    for line in lines {
        let Some((name, value)) = line.split_once(':') else {
            continue;
        };
        let name = HeaderName::from_bytes(name.trim().as_bytes())
            .map_err(|_| malformed("bad header name"))?;
        let value =
            HeaderValue::from_str(value.trim()).map_err(|_| malformed("bad header value"))?;
        headers.append(name, value);
    }

    let chunked = headers
        .get(TRANSFER_ENCODING)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.to_ascii_lowercase().contains("chunked"))
        .unwrap_or(false);
    let length = headers
        .get(CONTENT_LENGTH)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse::<usize>().ok());

    let bodiless = *method == Method::HEAD
        || status.is_informational()
        || status == StatusCode::NO_CONTENT
        || status == StatusCode::NOT_MODIFIED;

    let body = if bodiless {
        Vec::new()
    } else if chunked {
        decode_chunked(rest)?
    } else if let Some(length) = length {
        rest.get(..length)
            .ok_or_else(|| malformed("truncated body"))?
            .to_vec()
    } else {
        rest.to_vec()
    };

    Ok(Response {
        status,
        headers,
        body,
    })
}

fn decode_chunked(mut data: &[u8]) -> Result<Vec<u8>> {
    let malformed = || GhError::Transport("malformed chunked body".to_string());
    let mut body = Vec::new();

    loop {
        let line_end = data
            .windows(2)
            .position(|w| w == b"\r\n")
            .ok_or_else(malformed)?;
        let size_line = std::str::from_utf8(&data[..line_end]).map_err(|_| malformed())?;
        let size_hex = size_line.split(';').next().unwrap_or_default().trim();
        let size = usize::from_str_radix(size_hex, 16).map_err(|_| malformed())?;
        data = &data[line_end + 2..];

        if size == 0 {
            return Ok(body);
        }

        let chunk = data.get(..size).ok_or_else(malformed)?;
        body.extend_from_slice(chunk);
        data = data.get(size + 2..).ok_or_else(malformed)?;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encodes_request_line_host_and_body() {
        let req = Request::new(Method::POST, "http://api.github.com/graphql?x=1".parse().unwrap())
            .with_header("Authorization", "token abc")
            .unwrap();
        let req = Request {
            body: Some(b"{}".to_vec()),
            ..req
        };

        let text = String::from_utf8(encode_request(&req)).unwrap();
        assert!(text.starts_with("POST /graphql?x=1 HTTP/1.1\r\nHost: api.github.com\r\n"));
        assert!(text.contains("authorization: token abc\r\n"));
        assert!(text.contains("Content-Length: 2\r\n"));
        assert!(text.ends_with("Connection: close\r\n\r\n{}"));
    }

    #[test]
    fn encodes_explicit_host() {
        let req = Request::new(Method::GET, "http://localhost:8080/".parse().unwrap())
            .with_host("ghe.io");
        let text = String::from_utf8(encode_request(&req)).unwrap();
        assert!(text.contains("Host: ghe.io\r\n"));
        assert!(!text.contains("Content-Length"));
    }

    #[test]
    fn parses_content_length_response() {
        let raw = b"HTTP/1.1 201 Created\r\nContent-Type: application/json\r\nContent-Length: 2\r\n\r\n{}trailing";
        let resp = parse_response(&Method::GET, raw).unwrap();
        assert_eq!(resp.status, StatusCode::CREATED);
        assert_eq!(resp.body, b"{}");
        assert!(resp.is_json());
    }

    #[test]
    fn head_response_ignores_content_length() {
        let raw = b"HTTP/1.1 200 OK\r\nContent-Length: 42\r\n\r\n";
        let resp = parse_response(&Method::HEAD, raw).unwrap();
        assert_eq!(resp.status, StatusCode::OK);
        assert!(resp.body.is_empty());
        assert_eq!(resp.headers.get(CONTENT_LENGTH).unwrap(), "42");
    }

    #[test]
    fn not_modified_and_no_content_have_no_body() {
        let raw = b"HTTP/1.1 304 Not Modified\r\nContent-Length: 10\r\n\r\n";
        let resp = parse_response(&Method::GET, raw).unwrap();
        assert_eq!(resp.status, StatusCode::NOT_MODIFIED);
        assert!(resp.body.is_empty());

        let raw = b"HTTP/1.1 204 No Content\r\nTransfer-Encoding: chunked\r\n\r\n";
        assert!(parse_response(&Method::DELETE, raw).unwrap().body.is_empty());
    }

    #[test]
    fn parses_chunked_response() {
        let raw = b"HTTP/1.1 200 OK\r\nTransfer-Encoding: chunked\r\n\r\n5\r\nhello\r\n6;ext=1\r\n world\r\n0\r\n\r\n";
        let resp = parse_response(&Method::GET, raw).unwrap();
        assert_eq!(resp.text(), "hello world");
    }

    #[test]
    fn parses_read_to_eof_response() {
        let raw = b"HTTP/1.0 200 OK\r\n\r\nstreamed";
        assert_eq!(parse_response(&Method::GET, raw).unwrap().text(), "streamed");
    }

    #[test]
    fn rejects_garbage() {
        assert!(parse_response(&Method::GET, b"not http").is_err());
        assert!(parse_response(&Method::GET, b"HTTP/1.1 abc\r\n\r\n").is_err());
    }

    #[cfg(unix)]
    #[test]
    fn round_trip_over_socket() {
        use std::io::{BufRead, BufReader, Write};
        use std::os::unix::net::UnixListener;

        let dir = tempfile::TempDir::new().unwrap();
        let socket = dir.path().join("gh.sock");
        let listener = UnixListener::bind(&socket).unwrap();

        let server = std::thread::spawn(move || {
            let (stream, _) = listener.accept().unwrap();
            let mut reader = BufReader::new(stream.try_clone().unwrap());
            let mut request_line = String::new();
            reader.read_line(&mut request_line).unwrap();
            loop {
                let mut line = String::new();
                reader.read_line(&mut line).unwrap();
                if line == "\r\n" {
                    break;
                }
            }
            let mut stream = stream;
            stream
                .write_all(b"HTTP/1.1 200 OK\r\nContent-Length: 5\r\n\r\nhello")
                .unwrap();
            request_line
        });

        let transport = UnixSocketTransport::new(&socket);
        let req = Request::new(Method::GET, "http://api.github.com/user".parse().unwrap());
        let resp = transport.round_trip(req).unwrap();

        assert_eq!(resp.text(), "hello");
        assert_eq!(server.join().unwrap(), "GET /user HTTP/1.1\r\n");
    }

    #[cfg(unix)]
    #[test]
    fn head_round_trip_over_socket() {
        use std::io::{BufRead, BufReader, Write};
        use std::os::unix::net::UnixListener;

        let dir = tempfile::TempDir::new().unwrap();
        let socket = dir.path().join("gh.sock");
        let listener = UnixListener::bind(&socket).unwrap();

        let server = std::thread::spawn(move || {
            let (stream, _) = listener.accept().unwrap();
            let mut reader = BufReader::new(stream.try_clone().unwrap());
            loop {
                let mut line = String::new();
                reader.read_line(&mut line).unwrap();
                if line == "\r\n" {
                    break;
                }
            }
            let mut stream = stream;
            stream
                .write_all(b"HTTP/1.1 200 OK\r\nContent-Length: 42\r\n\r\n")
                .unwrap();
        });

        let transport = UnixSocketTransport::new(&socket);
        let req = Request::new(Method::HEAD, "http://api.github.com/user".parse().unwrap());
        let resp = transport.round_trip(req).unwrap();
        server.join().unwrap();

        assert!(resp.is_success());
        assert!(resp.body.is_empty());
    }

    #[cfg(unix)]
    #[test]
    fn missing_socket_is_a_transport_error() {
        let transport = UnixSocketTransport::new("/nonexistent/ghx.sock");
        let req = Request::new(Method::GET, "http://api.github.com/".parse().unwrap());
        assert!(matches!(
            transport.round_trip(req),
            Err(GhError::Transport(_))
        ));
    }
}
