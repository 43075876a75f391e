//! Color scheme for command output.

use console::Style;

use crate::config::Env;
use crate::iostreams::IoStreams;

/// Styles applied to command output.
///
/// Colors are forced on or off explicitly so output written to a buffer or
/// pipe never carries stray escape codes.
#[derive(Debug, Clone)]
pub struct ColorScheme {
    /// Success messages and checkmarks (green).
    pub success: Style,
    /// Warnings (yellow).
    pub warning: Style,
    /// Errors (red bold).
    pub error: Style,
    /// Secondary text (dim).
    pub dim: Style,
    /// Emphasis (bold).
    pub bold: Style,
}

impl ColorScheme {
    /// Create a scheme, colored or not.
    pub fn new(enabled: bool) -> Self {
        let style = |s: Style| s.force_styling(enabled);
        Self {
            success: style(Style::new().green()),
            warning: style(Style::new().yellow()),
            error: style(Style::new().red().bold()),
            dim: style(Style::new().dim()),
            bold: style(Style::new().bold()),
        }
    }

    /// A scheme without colors.
    pub fn plain() -> Self {
        Self::new(false)
    }

    /// Scheme for stdout of `io`.
    pub fn for_stdout(io: &IoStreams, env: &dyn Env) -> Self {
        Self::new(should_use_colors(io.is_stdout_tty(), env))
    }

    /// Scheme for stderr of `io`.
    pub fn for_stderr(io: &IoStreams, env: &dyn Env) -> Self {
        Self::new(should_use_colors(io.is_stderr_tty(), env))
    }

    /// `✓ msg` in green.
    pub fn format_success(&self, msg: &str) -> String {
        format!("{} {}", self.success.apply_to("✓"), msg)
    }

    /// `! msg` in yellow.
    pub fn format_warning(&self, msg: &str) -> String {
        format!("{} {}", self.warning.apply_to("!"), msg)
    }

    /// `X msg` in red.
    pub fn format_error(&self, msg: &str) -> String {
        format!("{} {}", self.error.apply_to("X"), msg)
    }
}

impl Default for ColorScheme {
    fn default() -> Self {
        Self::plain()
    }
}

/// Whether to color a stream that is (or isn't) a terminal.
///
/// `NO_COLOR` (https://no-color.org/) always wins; `CLICOLOR_FORCE` turns
/// colors on for non-terminals.
pub fn should_use_colors(is_tty: bool, env: &dyn Env) -> bool {
    if env.var("NO_COLOR").is_some() {
        return false;
    }
    if env
        .var("CLICOLOR_FORCE")
        .is_some_and(|v| !v.is_empty() && v != "0")
    {
        return true;
    }
    is_tty
}
