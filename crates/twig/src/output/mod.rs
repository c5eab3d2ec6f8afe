//! Output formatting for CLI commands.
//!
//! This module provides utilities for formatting command output in
//! human-readable text, tabular, and JSON/YAML forms.
//!
//! Submodules:
//! - [`color`]: Color helpers gated on the output configuration
//! - [`table`]: Plain-text table rendering with per-column formatter hooks
//! - [`tree`]: ASCII tree rendering and the flattened tabular view

pub mod color;
pub mod table;
pub mod tree;

use std::env;
use std::io::{self, Write};

use serde::Serialize;
use twig_jira::types::{Issue, Project};

const DEFAULT_TERMINAL_WIDTH: u16 = 80;
const DEFAULT_MAX_CONTENT_WIDTH: usize = 100;

/// Width the summary column is truncated to in compact tree tables.
pub const SUMMARY_WIDTH_COMPACT: usize = 50;
/// Width the summary column is truncated to in verbose tree tables.
pub const SUMMARY_WIDTH_VERBOSE: usize = 40;
/// Width the summary column is truncated to in search tables.
pub const SUMMARY_WIDTH_SEARCH: usize = 60;

/// Configuration for output formatting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputConfig {
    /// Maximum content width for text wrapping.
    pub max_width: usize,
    /// Whether to use colors in output.
    pub use_colors: bool,
}

impl OutputConfig {
    /// Create an `OutputConfig` with explicit values.
    #[must_use]
    pub fn new(max_width: usize, use_colors: bool) -> Self {
        Self {
            max_width,
            use_colors,
        }
    }

    /// Create an `OutputConfig` by reading from environment variables.
    ///
    /// Reads:
    /// - `TWIG_MAX_WIDTH`: Maximum content width (default: 100)
    /// - `NO_COLOR`: Standard env var to disable colors (any value disables)
    /// - `TWIG_COLOR`: Set to "0" or "false" to disable colors (default: true)
    #[must_use]
    pub fn from_env() -> Self {
        let max_width = match env::var("TWIG_MAX_WIDTH") {
            Ok(s) if !s.is_empty() => match s.parse() {
                Ok(width) => width,
                Err(_) => {
                    tracing::warn!(
                        env_var = "TWIG_MAX_WIDTH",
                        value = %s,
                        default = DEFAULT_MAX_CONTENT_WIDTH,
                        "Invalid value, using default"
                    );
                    DEFAULT_MAX_CONTENT_WIDTH
                }
            },
            _ => DEFAULT_MAX_CONTENT_WIDTH,
        };

        // Respect the NO_COLOR standard (https://no-color.org/);
        // TWIG_COLOR allows explicit control.
        let use_colors = env::var("NO_COLOR").is_err()
            && env::var("TWIG_COLOR")
                .map(|v| v != "0" && !v.eq_ignore_ascii_case("false"))
                .unwrap_or(true);

        Self {
            max_width,
            use_colors,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            max_width: DEFAULT_MAX_CONTENT_WIDTH,
            use_colors: true,
        }
    }
}

/// Get the current terminal width, falling back to default if detection fails.
fn get_terminal_width() -> usize {
    terminal_size::terminal_size()
        .map(|(w, _)| w.0 as usize)
        .unwrap_or(DEFAULT_TERMINAL_WIDTH as usize)
}

/// Shorten a string to at most `max_len` characters.
///
/// Longer strings are cut to `max_len - 3` characters with `...` appended;
/// when `max_len` is 3 or less the raw prefix is returned without an
/// ellipsis. Counts characters, not bytes.
#[must_use]
pub fn truncate(s: &str, max_len: usize) -> String {
    if max_len == 0 {
        return String::new();
    }

    let char_count = s.chars().count();
    if char_count <= max_len {
        return s.to_string();
    }

    if max_len <= 3 {
        return s.chars().take(max_len).collect();
    }

    let prefix: String = s.chars().take(max_len - 3).collect();
    format!("{prefix}...")
}

/// Wrap text to fit within a given width, preserving existing line breaks.
/// Uses textwrap to handle edge cases like long words (URLs, file paths).
fn wrap_text(text: &str, max_width: usize) -> Vec<String> {
    text.lines()
        .flat_map(|line| {
            if line.trim().is_empty() {
                vec![String::new()]
            } else {
                textwrap::wrap(line, max_width)
                    .into_iter()
                    .map(|s| s.into_owned())
                    .collect()
            }
        })
        .collect()
}

/// Print any serializable value as pretty JSON.
///
/// # Errors
///
/// Returns an IO error when serialization or the write fails.
pub fn print_json<T: Serialize>(value: &T) -> io::Result<()> {
    let stdout = io::stdout();
    let mut handle = stdout.lock();
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
    writeln!(handle, "{json}")
}

/// Print any serializable value as YAML.
///
/// # Errors
///
/// Returns an IO error when serialization or the write fails.
pub fn print_yaml<T: Serialize>(value: &T) -> io::Result<()> {
    let stdout = io::stdout();
    let mut handle = stdout.lock();
    let yaml =
        serde_yaml::to_string(value).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
    write!(handle, "{yaml}")
}

/// Print a single issue as an aligned field listing with a wrapped
/// description below.
///
/// # Errors
///
/// Returns an IO error when the write fails.
pub fn print_issue_plain<W: Write>(
    w: &mut W,
    issue: &Issue,
    config: &OutputConfig,
) -> io::Result<()> {
    let fields = &issue.fields;

    writeln!(w, "{:<11}: {}", "Issue", issue.key)?;
    writeln!(w, "{:<11}: {}", "Summary", fields.summary)?;
    writeln!(w, "{:<11}: {}", "Status", fields.status.name)?;
    writeln!(w, "{:<11}: {}", "Type", fields.issue_type.name)?;
    writeln!(w, "{:<11}: {}", "Priority", fields.priority.name)?;
    writeln!(w, "{:<11}: {}", "Project", fields.project.name)?;

    let assignee = fields
        .assignee
        .as_ref()
        .map_or("Unassigned", |user| user.display_name.as_str());
    writeln!(w, "{:<11}: {}", "Assignee", assignee)?;

    let reporter = fields
        .reporter
        .as_ref()
        .map_or("", |user| user.display_name.as_str());
    writeln!(w, "{:<11}: {}", "Reporter", reporter)?;

    if let Some(created) = &fields.created {
        writeln!(w, "{:<11}: {}", "Created", created.format("%Y-%m-%d %H:%M:%S"))?;
    }
    if let Some(updated) = &fields.updated {
        writeln!(w, "{:<11}: {}", "Updated", updated.format("%Y-%m-%d %H:%M:%S"))?;
    }

    if let Some(description) = &fields.description {
        if !description.is_empty() {
            writeln!(w)?;
            let width = get_terminal_width().min(config.max_width);
            for line in wrap_text(description, width) {
                writeln!(w, "{line}")?;
            }
        }
    }

    Ok(())
}

/// Print a project as a short field listing.
///
/// # Errors
///
/// Returns an IO error when the write fails.
pub fn print_project_plain<W: Write>(w: &mut W, project: &Project) -> io::Result<()> {
    writeln!(w, "Project: {}", project.key)?;
    writeln!(w, "Name: {}", project.name)?;
    writeln!(w, "ID: {}", project.id)?;
    Ok(())
}
