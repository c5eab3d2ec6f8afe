//! Plain-text table rendering with per-column formatter hooks.
//!
//! Column widths are computed from the raw cell values; formatters (e.g.
//! status colorization) are applied only when a cell is written, after the
//! padding width is known, so ANSI escapes never skew the layout. The
//! formatter registry maps a header name to a pure `value -> display`
//! function and never mutates the underlying row data.

use std::collections::HashMap;
use std::io::{self, Write};

use super::OutputConfig;
use super::color::bold;

/// A pure per-column display hook.
pub type ColumnFormatter = Box<dyn Fn(&str) -> String>;

/// Gap between columns.
const COLUMN_GAP: &str = "  ";

/// A width-aware text table.
pub struct TableRenderer {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
    formatters: HashMap<String, ColumnFormatter>,
    config: OutputConfig,
}

impl TableRenderer {
    /// Create a renderer with the given headers.
    #[must_use]
    pub fn new(headers: &[&str], config: OutputConfig) -> Self {
        Self {
            headers: headers.iter().map(|h| (*h).to_string()).collect(),
            rows: Vec::new(),
            formatters: HashMap::new(),
            config,
        }
    }

    /// Register a display formatter for the named column.
    #[must_use]
    pub fn with_formatter(
        mut self,
        column: &str,
        formatter: impl Fn(&str) -> String + 'static,
    ) -> Self {
        self.formatters
            .insert(column.to_string(), Box::new(formatter));
        self
    }

    /// Append one row.
    ///
    /// # Errors
    ///
    /// Returns an error when the row arity does not match the headers.
    pub fn append(&mut self, row: Vec<String>) -> io::Result<()> {
        if row.len() != self.headers.len() {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!(
                    "row has {} columns, table has {}",
                    row.len(),
                    self.headers.len()
                ),
            ));
        }
        self.rows.push(row);
        Ok(())
    }

    /// Append every row in order.
    ///
    /// # Errors
    ///
    /// Returns an error on the first row whose arity does not match.
    pub fn append_all(&mut self, rows: Vec<Vec<String>>) -> io::Result<()> {
        for row in rows {
            self.append(row)?;
        }
        Ok(())
    }

    /// Write the table.
    ///
    /// # Errors
    ///
    /// Returns an IO error when the write fails.
    pub fn render<W: Write>(&self, w: &mut W) -> io::Result<()> {
        let widths = self.column_widths();

        let mut line = String::new();
        for (i, header) in self.headers.iter().enumerate() {
            if i > 0 {
                line.push_str(COLUMN_GAP);
            }
            line.push_str(&bold(header, &self.config));
            line.push_str(&pad(header, widths[i]));
        }
        writeln!(w, "{}", line.trim_end())?;

        for row in &self.rows {
            let mut line = String::new();
            for (i, cell) in row.iter().enumerate() {
                if i > 0 {
                    line.push_str(COLUMN_GAP);
                }
                line.push_str(&self.display_cell(i, cell));
                line.push_str(&pad(cell, widths[i]));
            }
            writeln!(w, "{}", line.trim_end())?;
        }

        Ok(())
    }

    /// Widths from raw values, so escape codes never count.
    fn column_widths(&self) -> Vec<usize> {
        let mut widths: Vec<usize> = self.headers.iter().map(|h| h.chars().count()).collect();
        for row in &self.rows {
            for (i, cell) in row.iter().enumerate() {
                widths[i] = widths[i].max(cell.chars().count());
            }
        }
        widths
    }

    fn display_cell(&self, column: usize, value: &str) -> String {
        match self.headers.get(column).and_then(|h| self.formatters.get(h)) {
            Some(formatter) => formatter(value),
            None => value.to_string(),
        }
    }
}

/// Padding needed after `value` to fill a column of `width`.
fn pad(value: &str, width: usize) -> String {
    " ".repeat(width.saturating_sub(value.chars().count()))
}
