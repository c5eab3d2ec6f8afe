//! CLI argument structs for all commands.
//!
//! Each command has its own argument struct with clap derive attributes
//! for parsing and validation.

use clap::{Parser, Subcommand};

/// Arguments for the `tree` command
#[derive(Parser, Debug, Clone)]
pub struct TreeArgs {
    /// Issue key to start from (e.g. PROJ-123)
    pub key: String,

    /// Maximum depth to traverse
    #[arg(short, long, default_value = "3")]
    pub depth: i32,

    /// Show all fields for each issue
    #[arg(short, long)]
    pub all: bool,

    /// Show children first, then parents
    #[arg(short, long)]
    pub reverse: bool,
}

/// Arguments for the `get` command
#[derive(Parser, Debug, Clone)]
pub struct GetArgs {
    /// Resource to fetch
    #[command(subcommand)]
    pub resource: GetResource,
}

/// Resources fetchable via `get`
#[derive(Subcommand, Debug, Clone)]
pub enum GetResource {
    /// Get a Jira issue by key
    Issue(GetIssueArgs),

    /// Get a Jira project by key
    Project(GetProjectArgs),
}

/// Arguments for `get issue`
#[derive(Parser, Debug, Clone)]
pub struct GetIssueArgs {
    /// Issue key (e.g. PROJ-123)
    pub key: String,

    /// Display the issue hierarchy as a tree
    #[arg(long)]
    pub tree: bool,

    /// Maximum depth to traverse for tree view
    #[arg(long, default_value = "3")]
    pub tree_depth: i32,

    /// Show children first, then parents in tree view
    #[arg(long)]
    pub tree_reverse: bool,

    /// Show all fields for each issue in tree view
    #[arg(long)]
    pub tree_all: bool,
}

/// Arguments for `get project`
#[derive(Parser, Debug, Clone)]
pub struct GetProjectArgs {
    /// Project key (e.g. PROJ)
    pub key: String,
}

/// Arguments for the `search` command
#[derive(Parser, Debug, Clone)]
pub struct SearchArgs {
    /// JQL expression, e.g. "project = PROJ AND status = 'In Progress'"
    pub jql: String,

    /// Maximum number of results to return
    #[arg(long, default_value = "100")]
    pub max_results: usize,

    /// Starting index for pagination
    #[arg(long, default_value = "0")]
    pub start_at: usize,

    /// Retrieve all results by automatically handling pagination
    #[arg(long)]
    pub all: bool,
}

/// Arguments for the `config` command
#[derive(Parser, Debug, Clone)]
pub struct ConfigArgs {
    /// Configuration subcommand
    #[command(subcommand)]
    pub action: ConfigAction,
}

/// Configuration management actions
#[derive(Subcommand, Debug, Clone)]
pub enum ConfigAction {
    /// Write a starter configuration file
    Init,

    /// Show the current configuration (token masked)
    Show,

    /// Set a configuration value
    ///
    /// Supported keys: jira.base_url, jira.token, cli.output_format,
    /// cli.color, cli.verbose
    Set {
        /// Dotted key, e.g. jira.base_url
        key: String,

        /// New value
        value: String,
    },
}
