//! CLI argument parsing and command dispatch.
//!
//! This module provides the command-line interface for twig using clap's
//! derive API. Each command has its own argument struct with validation and
//! helpful error messages.
//!
//! # Commands
//!
//! - `get issue`: Fetch a single issue (optionally with its hierarchy)
//! - `get project`: Fetch a project
//! - `tree`: Display an issue hierarchy as a tree
//! - `search`: Search issues using JQL
//! - `config`: Manage configuration
//!
//! # Global Flags
//!
//! - `-o/--output`: Output format (table|json|yaml), applies to all commands
//!
//! # Example
//!
//! ```bash
//! twig tree PROJ-123 --depth 2
//! twig get issue PROJ-123 --tree --tree-reverse
//! twig search "project = PROJ AND status = 'In Progress'"
//! twig config set jira.base_url https://your-domain.atlassian.net
//! ```

mod args;
mod execute;
mod types;

use anyhow::Result;
use clap::{Parser, Subcommand};

// Re-export argument structs
pub use args::{
    ConfigAction, ConfigArgs, GetArgs, GetIssueArgs, GetProjectArgs, GetResource, SearchArgs,
    TreeArgs,
};

// Re-export types
pub use types::OutputFormatArg;

/// Twig - a Jira CLI that renders issue hierarchies
///
/// Fetch issues, search with JQL, and display parent/child hierarchies as
/// trees or tables. Connection settings live in the twig config file or the
/// TWIG_JIRA_BASE_URL / TWIG_JIRA_TOKEN environment variables.
#[derive(Parser, Debug)]
#[command(name = "twig")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output format for programmatic use
    #[arg(short = 'o', long = "output", global = true, value_enum)]
    pub output: Option<OutputFormatArg>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Get Jira resources
    ///
    /// Fetch issues or projects by key. `get issue --tree` additionally
    /// resolves and renders the issue hierarchy.
    Get(GetArgs),

    /// Display issue hierarchy as a tree
    ///
    /// Shows the specified issue and its subtasks, child issues, and
    /// epic-linked issues in a tree format. With --reverse, children come
    /// first and parent issues render above.
    Tree(TreeArgs),

    /// Search Jira issues using JQL
    ///
    /// Executes a JQL expression and lists the matching issues. Use --all
    /// to follow pagination until every match is retrieved.
    Search(SearchArgs),

    /// Manage twig configuration
    ///
    /// Initialize, inspect, or update the configuration file holding the
    /// Jira connection and CLI settings.
    Config(ConfigArgs),
}

impl Cli {
    /// Parse CLI arguments from command line
    #[must_use]
    pub fn parse_args() -> Self {
        <Self as Parser>::parse()
    }

    /// Parse CLI arguments from an iterator (for testing)
    ///
    /// # Errors
    ///
    /// Returns a clap error for invalid arguments.
    pub fn try_parse_from<I, T>(iter: I) -> std::result::Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        <Self as Parser>::try_parse_from(iter)
    }

    /// Execute the CLI command
    ///
    /// # Errors
    ///
    /// Propagates configuration, transport, and rendering failures.
    pub async fn execute(&self) -> Result<()> {
        match &self.command {
            Some(Commands::Get(get_args)) => match &get_args.resource {
                GetResource::Issue(issue_args) => {
                    execute::execute_get_issue(issue_args, self.output).await
                }
                GetResource::Project(project_args) => {
                    execute::execute_get_project(project_args, self.output).await
                }
            },
            Some(Commands::Tree(tree_args)) => execute::execute_tree(tree_args, self.output).await,
            Some(Commands::Search(search_args)) => {
                execute::execute_search(search_args, self.output).await
            }
            Some(Commands::Config(config_args)) => {
                execute::execute_config(config_args, self.output)
            }
            None => {
                println!("Twig Jira CLI");
                println!("Use --help for more information");
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ========== CLI Parsing Tests ==========

    #[test]
    fn test_parse_no_command() {
        let cli = Cli::try_parse_from(["twig"]).unwrap();
        assert!(cli.command.is_none());
        assert!(cli.output.is_none());
    }

    #[test]
    fn test_parse_global_output_flag() {
        let cli = Cli::try_parse_from(["twig", "-o", "json", "tree", "PROJ-1"]).unwrap();
        assert_eq!(cli.output, Some(OutputFormatArg::Json));
        assert!(matches!(cli.command, Some(Commands::Tree(_))));
    }

    #[test]
    fn test_parse_global_output_flag_after_subcommand() {
        let cli = Cli::try_parse_from(["twig", "tree", "PROJ-1", "--output", "yaml"]).unwrap();
        assert_eq!(cli.output, Some(OutputFormatArg::Yaml));
    }

    #[test]
    fn test_parse_output_rejects_unknown_format() {
        let result = Cli::try_parse_from(["twig", "-o", "csv", "tree", "PROJ-1"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_tree_defaults() {
        let cli = Cli::try_parse_from(["twig", "tree", "PROJ-123"]).unwrap();
        match cli.command {
            Some(Commands::Tree(args)) => {
                assert_eq!(args.key, "PROJ-123");
                assert_eq!(args.depth, 3); // default
                assert!(!args.all);
                assert!(!args.reverse);
            }
            _ => panic!("Expected Tree command"),
        }
    }

    #[test]
    fn test_parse_tree_with_flags() {
        let cli =
            Cli::try_parse_from(["twig", "tree", "PROJ-123", "-d", "5", "-a", "-r"]).unwrap();
        match cli.command {
            Some(Commands::Tree(args)) => {
                assert_eq!(args.depth, 5);
                assert!(args.all);
                assert!(args.reverse);
            }
            _ => panic!("Expected Tree command"),
        }
    }

    #[test]
    fn test_parse_tree_requires_key() {
        let result = Cli::try_parse_from(["twig", "tree"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_get_issue() {
        let cli = Cli::try_parse_from(["twig", "get", "issue", "PROJ-1"]).unwrap();
        match cli.command {
            Some(Commands::Get(args)) => match args.resource {
                GetResource::Issue(issue_args) => {
                    assert_eq!(issue_args.key, "PROJ-1");
                    assert!(!issue_args.tree);
                    assert_eq!(issue_args.tree_depth, 3);
                }
                GetResource::Project(_) => panic!("Expected Issue resource"),
            },
            _ => panic!("Expected Get command"),
        }
    }

    #[test]
    fn test_parse_get_issue_tree_flags() {
        let cli = Cli::try_parse_from([
            "twig",
            "get",
            "issue",
            "PROJ-1",
            "--tree",
            "--tree-depth",
            "2",
            "--tree-reverse",
            "--tree-all",
        ])
        .unwrap();
        match cli.command {
            Some(Commands::Get(args)) => match args.resource {
                GetResource::Issue(issue_args) => {
                    assert!(issue_args.tree);
                    assert_eq!(issue_args.tree_depth, 2);
                    assert!(issue_args.tree_reverse);
                    assert!(issue_args.tree_all);
                }
                GetResource::Project(_) => panic!("Expected Issue resource"),
            },
            _ => panic!("Expected Get command"),
        }
    }

    #[test]
    fn test_parse_get_project() {
        let cli = Cli::try_parse_from(["twig", "get", "project", "PROJ"]).unwrap();
        match cli.command {
            Some(Commands::Get(args)) => {
                assert!(matches!(args.resource, GetResource::Project(_)));
            }
            _ => panic!("Expected Get command"),
        }
    }

    #[test]
    fn test_parse_search_defaults() {
        let cli = Cli::try_parse_from(["twig", "search", "project = PROJ"]).unwrap();
        match cli.command {
            Some(Commands::Search(args)) => {
                assert_eq!(args.jql, "project = PROJ");
                assert_eq!(args.max_results, 100);
                assert_eq!(args.start_at, 0);
                assert!(!args.all);
            }
            _ => panic!("Expected Search command"),
        }
    }

    #[test]
    fn test_parse_search_with_pagination() {
        let cli = Cli::try_parse_from([
            "twig",
            "search",
            "project = PROJ",
            "--max-results",
            "25",
            "--start-at",
            "50",
        ])
        .unwrap();
        match cli.command {
            Some(Commands::Search(args)) => {
                assert_eq!(args.max_results, 25);
                assert_eq!(args.start_at, 50);
            }
            _ => panic!("Expected Search command"),
        }
    }

    #[test]
    fn test_parse_search_all() {
        let cli = Cli::try_parse_from(["twig", "search", "project = PROJ", "--all"]).unwrap();
        match cli.command {
            Some(Commands::Search(args)) => assert!(args.all),
            _ => panic!("Expected Search command"),
        }
    }

    #[test]
    fn test_parse_config_init() {
        let cli = Cli::try_parse_from(["twig", "config", "init"]).unwrap();
        match cli.command {
            Some(Commands::Config(args)) => {
                assert!(matches!(args.action, ConfigAction::Init));
            }
            _ => panic!("Expected Config command"),
        }
    }

    #[test]
    fn test_parse_config_show() {
        let cli = Cli::try_parse_from(["twig", "config", "show"]).unwrap();
        match cli.command {
            Some(Commands::Config(args)) => {
                assert!(matches!(args.action, ConfigAction::Show));
            }
            _ => panic!("Expected Config command"),
        }
    }

    #[test]
    fn test_parse_config_set() {
        let cli = Cli::try_parse_from([
            "twig",
            "config",
            "set",
            "jira.base_url",
            "https://jira.example.com",
        ])
        .unwrap();
        match cli.command {
            Some(Commands::Config(args)) => match args.action {
                ConfigAction::Set { key, value } => {
                    assert_eq!(key, "jira.base_url");
                    assert_eq!(value, "https://jira.example.com");
                }
                _ => panic!("Expected Set action"),
            },
            _ => panic!("Expected Config command"),
        }
    }

    #[test]
    fn test_parse_config_set_requires_value() {
        let result = Cli::try_parse_from(["twig", "config", "set", "jira.token"]);
        assert!(result.is_err());
    }
}
