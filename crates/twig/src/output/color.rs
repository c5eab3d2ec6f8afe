//! Color and styling helpers for CLI output.
//!
//! Semantic Color Theme:
//!   - Resolved:     green  (work that is done)
//!   - In Progress:  blue   (work in flight)
//!   - New:          red    (work not started)
//!   - Emphasis:     bold   (table headers)
//!
//! All helpers are no-ops when colors are disabled, so captured output in
//! tests and piped output stay free of ANSI codes.

use colored::Colorize;

use super::OutputConfig;

/// Colorize a status value by its well-known name.
///
/// Unknown statuses pass through unchanged; this is a presentation hook,
/// never a correctness concern.
pub fn status_color(value: &str, config: &OutputConfig) -> String {
    if !config.use_colors {
        return value.to_string();
    }
    match value {
        "Resolved" => value.green().to_string(),
        "In Progress" => value.blue().to_string(),
        "New" => value.red().to_string(),
        _ => value.to_string(),
    }
}

/// Apply bold style to text (for table headers).
pub fn bold(text: &str, config: &OutputConfig) -> String {
    if !config.use_colors {
        return text.to_string();
    }
    text.bold().to_string()
}
