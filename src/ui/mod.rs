//! Terminal output helpers.
//!
//! This module provides:
//! - [`TablePrinter`] for aligned (terminal) or tab-separated (piped) rows
//! - [`ColorScheme`] for success/warning/error styling
//! - [`prompts`] for interactive selection
//!
//! # Example
//!
//! ```
//! use ghx::ui::TablePrinter;
//!
//! let mut table = TablePrinter::new(false);
//! table.add_field("gh branch");
//! table.add_field("mislav/gh-branch");
//! table.end_row();
//!
//! let mut out = Vec::new();
//! table.render(&mut out).unwrap();
//! assert_eq!(out, b"gh branch\tmislav/gh-branch\n");
//! ```

pub mod prompts;
pub mod table;
pub mod theme;

pub use table::TablePrinter;
pub use theme::{should_use_colors, ColorScheme};
