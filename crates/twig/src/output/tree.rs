//! ASCII tree rendering and flattening for issue hierarchies.
//!
//! Three views of the same built tree, kept visually consistent:
//!
//! - [`render_tree`]: the descendant tree, root first, pre-order
//! - [`render_tree_reverse`]: children first, the target issue in the
//!   middle, ancestors above — read bottom-up
//! - [`flatten`]: one indented row per node for tabular display
//!
//! Connector glyphs are fixed byte-for-byte (`├── `, `└── `, `│   `, four
//! spaces) so compatibility-sensitive consumers can parse the output.

use std::io::{self, Write};

use twig_jira::tree::IssueTree;
use twig_jira::types::Issue;

use super::truncate;
use super::{SUMMARY_WIDTH_COMPACT, SUMMARY_WIDTH_VERBOSE};

/// Connector for a node with siblings below it.
pub const BRANCH: &str = "├── ";
/// Connector for the last sibling.
pub const CORNER: &str = "└── ";
/// Indent unit continuing a pending sibling line.
pub const PIPE: &str = "│   ";
/// Indent unit below a last sibling.
pub const SPACE: &str = "    ";

/// Label style for tree nodes and tree tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelStyle {
    /// `KEY: summary [status]`, status omitted when its name is empty.
    Compact,
    /// `KEY: summary [status] (type) - assignee`, assignee empty when unset.
    Verbose,
}

/// Format the one-line label for a tree node.
#[must_use]
pub fn format_label(issue: &Issue, style: LabelStyle) -> String {
    match style {
        LabelStyle::Verbose => format!(
            "{}: {} [{}] ({}) - {}",
            issue.key,
            issue.fields.summary,
            issue.fields.status.name,
            issue.fields.issue_type.name,
            issue.assignee_display()
        ),
        LabelStyle::Compact => {
            let status = if issue.fields.status.name.is_empty() {
                String::new()
            } else {
                format!(" [{}]", issue.fields.status.name)
            };
            format!("{}: {}{}", issue.key, issue.fields.summary, status)
        }
    }
}

/// Render the descendant tree, root first.
///
/// The root gets no connector unless an ancestor chain is populated, in
/// which case it hangs off the chain as a last child.
///
/// # Errors
///
/// Returns an IO error when the write fails.
pub fn render_tree<W: Write>(w: &mut W, tree: &IssueTree, style: LabelStyle) -> io::Result<()> {
    for ancestor in tree.ancestors.iter().rev() {
        writeln!(w, "{}", format_label(ancestor, style))?;
    }
    render_node(w, &tree.root, "", 0, true, !tree.ancestors.is_empty(), style)
}

fn render_node<W: Write>(
    w: &mut W,
    issue: &Issue,
    prefix: &str,
    depth: i32,
    is_last: bool,
    has_ancestor: bool,
    style: LabelStyle,
) -> io::Result<()> {
    let root = depth <= 0 && !has_ancestor;

    let connector = if root {
        ""
    } else if is_last {
        CORNER
    } else {
        BRANCH
    };
    writeln!(w, "{}{}{}", prefix, connector, format_label(issue, style))?;

    let child_prefix = if root {
        String::new()
    } else if is_last {
        format!("{prefix}{SPACE}")
    } else {
        format!("{prefix}{PIPE}")
    };

    let count = issue.children.len();
    for (i, child) in issue.children.iter().enumerate() {
        render_node(
            w,
            child,
            &child_prefix,
            depth + 1,
            i == count - 1,
            has_ancestor,
            style,
        )?;
    }

    Ok(())
}

/// Render the tree bottom-up: descendants first (post-order), then the
/// target issue, then its ancestors above it, nearest parent first.
///
/// # Errors
///
/// Returns an IO error when the write fails.
pub fn render_tree_reverse<W: Write>(
    w: &mut W,
    tree: &IssueTree,
    style: LabelStyle,
) -> io::Result<()> {
    render_node_reverse(w, &tree.root, "", 0, true, style)?;

    // The ancestor chain continues upward at depth 0 and below, so every
    // ancestor renders as a bare label.
    for ancestor in &tree.ancestors {
        writeln!(w, "{}", format_label(ancestor, style))?;
    }

    Ok(())
}

fn render_node_reverse<W: Write>(
    w: &mut W,
    issue: &Issue,
    prefix: &str,
    depth: i32,
    is_last: bool,
    style: LabelStyle,
) -> io::Result<()> {
    let child_prefix = if depth <= 0 {
        String::new()
    } else if is_last {
        format!("{prefix}{SPACE}")
    } else {
        format!("{prefix}{PIPE}")
    };

    let count = issue.children.len();
    for (i, child) in issue.children.iter().enumerate() {
        render_node_reverse(w, child, &child_prefix, depth + 1, i == count - 1, style)?;
    }

    let connector = if depth <= 0 {
        ""
    } else if is_last {
        CORNER
    } else {
        BRANCH
    };
    writeln!(w, "{}{}{}", prefix, connector, format_label(issue, style))
}

/// Table headers matching the rows produced by [`flatten`].
#[must_use]
pub fn table_headers(style: LabelStyle) -> Vec<&'static str> {
    match style {
        LabelStyle::Compact => vec!["KEY", "TYPE", "SUMMARY", "STATUS", "ASSIGNEE"],
        LabelStyle::Verbose => vec![
            "KEY", "TYPE", "SUMMARY", "STATUS", "PRIORITY", "ASSIGNEE", "CREATED", "UPDATED",
        ],
    }
}

/// Flatten the tree into one row per node, pre-order.
///
/// Ancestors come first as bare keys (they sit above the root), then the
/// root, then descendants whose key column carries the same hierarchy
/// indicators as the ASCII tree.
#[must_use]
pub fn flatten(tree: &IssueTree, style: LabelStyle) -> Vec<Vec<String>> {
    let mut rows = Vec::new();

    // Farthest ancestor first, at the most negative depth.
    let mut depth = -(tree.ancestors.len() as i32);
    for ancestor in tree.ancestors.iter().rev() {
        rows.push(flat_row(ancestor, depth, true, style));
        depth += 1;
    }

    flatten_node(&tree.root, &mut rows, 0, true, style);
    rows
}

fn flatten_node(
    issue: &Issue,
    rows: &mut Vec<Vec<String>>,
    depth: i32,
    is_last: bool,
    style: LabelStyle,
) {
    rows.push(flat_row(issue, depth, is_last, style));

    let count = issue.children.len();
    for (i, child) in issue.children.iter().enumerate() {
        flatten_node(child, rows, depth + 1, i == count - 1, style);
    }
}

fn flat_row(issue: &Issue, depth: i32, is_last: bool, style: LabelStyle) -> Vec<String> {
    // Merged key column with the same hierarchy structure as the ASCII
    // tree; depth 0 (root) and negative depths (ancestors) stay bare.
    let key_column = if depth <= 0 {
        issue.key.clone()
    } else {
        let connector = if is_last { CORNER } else { BRANCH };
        let indent = PIPE.repeat((depth - 1) as usize);
        format!("{indent}{connector}{}", issue.key)
    };

    let fields = &issue.fields;
    let assignee = fields
        .assignee
        .as_ref()
        .map_or_else(|| "Unassigned".to_string(), |u| u.display_name.clone());

    match style {
        LabelStyle::Verbose => vec![
            key_column,
            fields.issue_type.name.clone(),
            truncate(&fields.summary, SUMMARY_WIDTH_VERBOSE),
            fields.status.name.clone(),
            fields.priority.name.clone(),
            assignee,
            fields
                .created
                .as_ref()
                .map_or_else(String::new, |t| t.format("%Y-%m-%d")),
            fields
                .updated
                .as_ref()
                .map_or_else(String::new, |t| t.format("%Y-%m-%d")),
        ],
        LabelStyle::Compact => vec![
            key_column,
            fields.issue_type.name.clone(),
            truncate(&fields.summary, SUMMARY_WIDTH_COMPACT),
            fields.status.name.clone(),
            assignee,
        ],
    }
}
