//! Table rendering for formatted output.

use std::io::{self, Write};

use console::measure_text_width;

/// Prints rows of fields.
///
/// On a terminal, columns are aligned with two spaces between them. When
/// output is piped, fields are tab-separated so scripts can `cut` them.
#[derive(Debug, Default)]
pub struct TablePrinter {
    is_tty: bool,
    rows: Vec<Vec<String>>,
    current: Vec<String>,
}

impl TablePrinter {
    /// Create a printer for a terminal (`true`) or a pipe.
    pub fn new(is_tty: bool) -> Self {
        Self {
            is_tty,
            ..Self::default()
        }
    }

    /// Add a field to the current row.
    pub fn add_field(&mut self, field: impl Into<String>) {
        self.current.push(field.into());
    }

    /// Finish the current row.
    pub fn end_row(&mut self) {
        self.rows.push(std::mem::take(&mut self.current));
    }

    /// Number of finished rows.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Check if the table is empty.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Write every row to `out`. A row left open is finished first.
    pub fn render(&mut self, out: &mut dyn Write) -> io::Result<()> {
        if !self.current.is_empty() {
            self.end_row();
        }

        if !self.is_tty {
            for row in &self.rows {
                writeln!(out, "{}", row.join("\t"))?;
            }
            return Ok(());
        }

        let columns = self.rows.iter().map(Vec::len).max().unwrap_or(0);
        let mut widths = vec![0; columns];
        for row in &self.rows {
            for (i, field) in row.iter().enumerate() {
                widths[i] = widths[i].max(measure_text_width(field));
            }
        }

        for row in &self.rows {
            let mut line = String::new();
            for (i, field) in row.iter().enumerate() {
                line.push_str(field);
                if i + 1 < row.len() {
                    let pad = widths[i] - measure_text_width(field) + 2;
                    line.push_str(&" ".repeat(pad));
                }
            }
            writeln!(out, "{}", line)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(table: &mut TablePrinter) -> String {
        let mut buf = Vec::new();
        table.render(&mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    fn extensions(is_tty: bool) -> TablePrinter {
        let mut table = TablePrinter::new(is_tty);
        for (name, repo) in [
            ("gh branch", "mislav/gh-branch"),
            ("gh triage", "vilmibm/gh-triage"),
            ("gh x", "monalisa/gh-x"),
        ] {
            table.add_field(name);
            table.add_field(repo);
            table.end_row();
        }
        table
    }

    #[test]
    fn terminal_output_is_aligned() {
        let out = render(&mut extensions(true));
        insta::assert_snapshot!(out, @r"
        gh branch  mislav/gh-branch
        gh triage  vilmibm/gh-triage
        gh x       monalisa/gh-x
        ");
    }

    #[test]
    fn piped_output_is_tab_separated() {
        let out = render(&mut extensions(false));
        assert_eq!(
            out,
            "gh branch\tmislav/gh-branch\ngh triage\tvilmibm/gh-triage\ngh x\tmonalisa/gh-x\n"
        );
    }

    #[test]
    fn open_row_is_flushed_on_render() {
        let mut table = TablePrinter::new(false);
        table.add_field("a");
        table.add_field("b");
        assert_eq!(render(&mut table), "a\tb\n");
        assert_eq!(table.row_count(), 1);
    }

    #[test]
    fn ragged_rows() {
        let mut table = TablePrinter::new(true);
        table.add_field("only");
        table.end_row();
        table.add_field("x");
        table.add_field("y");
        table.end_row();
        assert_eq!(render(&mut table), "only\nx     y\n");
    }

    #[test]
    fn empty_table_renders_nothing() {
        let mut table = TablePrinter::new(true);
        assert!(table.is_empty());
        assert_eq!(render(&mut table), "");
    }
}
