//! ghx CLI entry point.

use std::io::Write;
use std::process::ExitCode;

use clap::Parser;
use ghx::cli::{Cli, CommandDispatcher};
use ghx::config::{Env, ProcessEnv};
use ghx::ui::ColorScheme;
use ghx::Factory;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Initialize the tracing subscriber for logging.
///
/// Log level is controlled by:
/// 1. `--debug` flag or a non-empty `DEBUG` sets level to DEBUG
/// 2. `RUST_LOG` environment variable (if set)
/// 3. Default is WARN
fn init_tracing(debug: bool) {
    let filter = if debug {
        EnvFilter::new("ghx=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("ghx=warn"))
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let debug_env = ProcessEnv.var("DEBUG").is_some_and(|d| !d.is_empty());
    init_tracing(cli.debug || debug_env);

    tracing::debug!("ghx starting with args: {:?}", cli);

    let factory = Factory::new(env!("CARGO_PKG_VERSION"));
    let dispatcher = CommandDispatcher::new(factory);

    match dispatcher.dispatch(&cli) {
        Ok(result) => ExitCode::from(result.exit_code as u8),
        Err(e) => {
            let io = dispatcher.factory().io_streams();
            let colors = ColorScheme::for_stderr(io, &ProcessEnv);
            let _ = writeln!(io.err(), "{}", colors.format_error(&e.to_string()));
            ExitCode::from(e.exit_code() as u8)
        }
    }
}
