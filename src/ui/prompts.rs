//! Interactive prompts.

use console::{style, Term};
use dialoguer::theme::ColorfulTheme;
use dialoguer::Select;

use crate::error::{GhError, Result};

/// Convert dialoguer errors to GhError.
fn map_dialoguer_err(e: dialoguer::Error) -> GhError {
    std::io::Error::from(e).into()
}

/// Dialoguer theme with a plain `?` prefix.
fn prompt_theme() -> ColorfulTheme {
    ColorfulTheme {
        prompt_prefix: style("?".to_string()).bold(),
        ..ColorfulTheme::default()
    }
}

/// Ask the user to pick one of `items`; returns the chosen index.
///
/// Drawn on stderr so stdout stays clean for piping.
pub fn select(question: &str, items: &[String], default: usize) -> Result<usize> {
    if items.is_empty() {
        return Err(GhError::Usage("nothing to choose from".to_string()));
    }

    Select::with_theme(&prompt_theme())
        .with_prompt(question)
        .items(items)
        .default(default.min(items.len() - 1))
        .interact_on(&Term::stderr())
        .map_err(map_dialoguer_err)
}
