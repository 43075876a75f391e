//! Standard pipeline wiring.

use std::sync::Arc;

use super::{
    AcceptHeader, AuthorizationHeader, HttpClient, ReqwestTransport, TimeZoneHeader, Transport,
    UnixSocketTransport, UserAgentHeader, VerboseTransport,
};
use crate::config::{keys, Config, Env};
use crate::error::Result;
use crate::iostreams::IoStreams;

/// Layer name of the unix-socket transport replacement.
pub const UNIX_SOCKET_LAYER: &str = "unix-socket";
/// Layer name of the `DEBUG` traffic log.
pub const VERBOSE_LAYER: &str = "verbose";

/// `User-Agent` value for `version`.
pub fn user_agent(version: &str) -> String {
    format!("GitHub API {}", version)
}

/// Build the authenticated client used by every command.
///
/// Layers, in order:
///
/// 1. unix socket, when `http_unix_socket` is configured
/// 2. traffic log, when `DEBUG` is set (bodies too if it mentions `api`
///    and stderr is a terminal)
/// 3. `User-Agent`
/// 4. `Authorization`
/// 5. `Time-Zone`
/// 6. `Accept`, when `set_accept` is true
pub fn new_http_client(
    io: &IoStreams,
    config: Arc<dyn Config>,
    env: Arc<dyn Env>,
    app_version: &str,
    set_accept: bool,
) -> Result<HttpClient> {
    let network = Box::new(ReqwestTransport::new()?);
    Ok(pipeline_over(network, io, config, env, app_version, set_accept))
}

/// Wire the standard layers around `network`.
fn pipeline_over(
    network: Box<dyn Transport>,
    io: &IoStreams,
    config: Arc<dyn Config>,
    env: Arc<dyn Env>,
    app_version: &str,
    set_accept: bool,
) -> HttpClient {
    let mut builder = HttpClient::builder(network);

    if let Some(socket) = config
        .get("", keys::HTTP_UNIX_SOCKET)
        .filter(|s| !s.is_empty())
    {
        tracing::debug!("Routing HTTP through unix socket {}", socket);
        builder = builder.replace_transport(UNIX_SOCKET_LAYER, Box::new(UnixSocketTransport::new(socket)));
    }

    if let Some(debug) = env.var("DEBUG").filter(|d| !d.is_empty()) {
        let stderr_tty = io.is_stderr_tty();
        let log_bodies = debug.contains("api") && stderr_tty;
        let err = io.err();
        builder = builder.wrap_transport(VERBOSE_LAYER, move |inner: Box<dyn Transport>| {
            Box::new(
                VerboseTransport::new(inner, err)
                    .colorize(stderr_tty)
                    .log_bodies(log_bodies),
            )
        });
    }

    builder = builder
        .decorator(UserAgentHeader::new(user_agent(app_version)))
        .decorator(AuthorizationHeader::new(config))
        .decorator(TimeZoneHeader::system(env));

    if set_accept {
        builder = builder.decorator(AcceptHeader);
    }

    builder.build()
}
