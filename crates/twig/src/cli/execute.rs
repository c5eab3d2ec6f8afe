//! Command execution logic.
//!
//! This module contains the implementation of all CLI commands. Each
//! command loads configuration, builds a client when it needs the network,
//! and hands the result to the output layer in the requested format.

use std::io::{self, Write};

use anyhow::{Context, Result};

use twig_jira::tree::{self as hierarchy, IssueTree};
use twig_jira::types::{Issue, SearchResult};
use twig_jira::{IssueApi, JiraClient};

use super::args::{ConfigAction, ConfigArgs, GetIssueArgs, GetProjectArgs, SearchArgs, TreeArgs};
use super::types::OutputFormatArg;
use crate::config::Config;
use crate::output::color::status_color;
use crate::output::table::TableRenderer;
use crate::output::tree::{
    LabelStyle, flatten, render_tree, render_tree_reverse, table_headers,
};
use crate::output::{self, OutputConfig};

/// Field projection for search results.
const SEARCH_FIELDS: [&str; 5] = ["summary", "status", "assignee", "reporter", "issuetype"];

fn load_config() -> Result<Config> {
    Config::load().context("failed to load configuration")
}

fn build_client(config: &Config) -> Result<JiraClient> {
    JiraClient::new(&config.jira.base_url, &config.jira.token).context(
        "failed to create Jira client; run `twig config init` and set jira.base_url and jira.token",
    )
}

/// Presentation settings: environment first, then the config file.
fn output_config(config: &Config) -> OutputConfig {
    let mut out = OutputConfig::from_env();
    out.use_colors = out.use_colors && config.cli.color;
    out
}

/// Fetch the root issue, expand its hierarchy, and (for the reverse view)
/// fetch the ancestor chain.
async fn fetch_tree(
    client: &JiraClient,
    key: &str,
    depth: i32,
    reverse: bool,
) -> Result<IssueTree> {
    let mut root = client
        .get_issue(key)
        .await
        .with_context(|| format!("failed to get issue {key}"))?;

    hierarchy::build_tree(client, &mut root, depth)
        .await
        .context("failed to build issue tree")?;

    let mut tree = IssueTree::new(root);
    if reverse {
        tree.ancestors = hierarchy::fetch_ancestors(client, &tree.root)
            .await
            .context("failed to fetch ancestor chain")?;
    }
    Ok(tree)
}

/// Render a built tree in the requested format (ASCII tree by default).
fn render_tree_result(
    tree: &IssueTree,
    style: LabelStyle,
    reverse: bool,
    output: Option<OutputFormatArg>,
    out_config: &OutputConfig,
) -> Result<()> {
    match output {
        Some(OutputFormatArg::Json) => output::print_json(&tree.root)?,
        Some(OutputFormatArg::Yaml) => output::print_yaml(&tree.root)?,
        Some(OutputFormatArg::Table) => {
            let stdout = io::stdout();
            write_tree_table(&mut stdout.lock(), tree, style, out_config)?;
        }
        None => {
            let stdout = io::stdout();
            let mut handle = stdout.lock();
            if reverse {
                render_tree_reverse(&mut handle, tree, style)?;
            } else {
                render_tree(&mut handle, tree, style)?;
            }
        }
    }
    Ok(())
}

fn write_tree_table<W: Write>(
    w: &mut W,
    tree: &IssueTree,
    style: LabelStyle,
    out_config: &OutputConfig,
) -> io::Result<()> {
    let status_config = out_config.clone();
    let mut renderer = TableRenderer::new(&table_headers(style), out_config.clone())
        .with_formatter("STATUS", move |value| status_color(value, &status_config));
    renderer.append_all(flatten(tree, style))?;
    renderer.render(w)
}

/// Execute the tree command
pub async fn execute_tree(args: &TreeArgs, output: Option<OutputFormatArg>) -> Result<()> {
    let config = load_config()?;
    let client = build_client(&config)?;

    let tree = fetch_tree(&client, &args.key, args.depth, args.reverse).await?;
    let style = if args.all {
        LabelStyle::Verbose
    } else {
        LabelStyle::Compact
    };

    render_tree_result(&tree, style, args.reverse, output, &output_config(&config))
}

/// Execute the `get issue` command
pub async fn execute_get_issue(
    args: &GetIssueArgs,
    output: Option<OutputFormatArg>,
) -> Result<()> {
    let config = load_config()?;
    let client = build_client(&config)?;

    if args.tree {
        let tree = fetch_tree(&client, &args.key, args.tree_depth, args.tree_reverse).await?;
        let style = if args.tree_all {
            LabelStyle::Verbose
        } else {
            LabelStyle::Compact
        };
        return render_tree_result(
            &tree,
            style,
            args.tree_reverse,
            output,
            &output_config(&config),
        );
    }

    let issue = client
        .get_issue(&args.key)
        .await
        .with_context(|| format!("failed to get issue {}", args.key))?;

    let out_config = output_config(&config);
    let stdout = io::stdout();
    let mut handle = stdout.lock();
    match output {
        Some(OutputFormatArg::Json) => output::print_json(&issue)?,
        Some(OutputFormatArg::Yaml) => output::print_yaml(&issue)?,
        Some(OutputFormatArg::Table) => write_issue_table(&mut handle, &issue, &out_config)?,
        None => output::print_issue_plain(&mut handle, &issue, &out_config)?,
    }
    Ok(())
}

/// Execute the `get project` command
pub async fn execute_get_project(
    args: &GetProjectArgs,
    output: Option<OutputFormatArg>,
) -> Result<()> {
    let config = load_config()?;
    let client = build_client(&config)?;

    let project = client
        .get_project(&args.key)
        .await
        .with_context(|| format!("failed to get project {}", args.key))?;

    let out_config = output_config(&config);
    let stdout = io::stdout();
    let mut handle = stdout.lock();
    match output {
        Some(OutputFormatArg::Json) => output::print_json(&project)?,
        Some(OutputFormatArg::Yaml) => output::print_yaml(&project)?,
        Some(OutputFormatArg::Table) => {
            let mut renderer = TableRenderer::new(&["FIELD", "VALUE"], out_config);
            renderer.append_all(vec![
                vec!["Key".to_string(), project.key.clone()],
                vec!["Name".to_string(), project.name.clone()],
                vec!["ID".to_string(), project.id.clone()],
            ])?;
            renderer.render(&mut handle)?;
        }
        None => output::print_project_plain(&mut handle, &project)?,
    }
    Ok(())
}

/// Execute the search command
pub async fn execute_search(args: &SearchArgs, output: Option<OutputFormatArg>) -> Result<()> {
    let config = load_config()?;
    let client = build_client(&config)?;

    let result = if args.all {
        client.search_all(&args.jql, &SEARCH_FIELDS).await
    } else {
        client
            .search_issues_paged(&args.jql, args.start_at, args.max_results, &SEARCH_FIELDS)
            .await
    }
    .context("failed to search issues")?;

    // The stored output preference applies when no flag is given.
    let format = output
        .or_else(|| OutputFormatArg::from_config_name(&config.cli.output_format))
        .unwrap_or(OutputFormatArg::Table);

    match format {
        OutputFormatArg::Json => output::print_json(&result)?,
        OutputFormatArg::Yaml => output::print_yaml(&result)?,
        OutputFormatArg::Table => {
            let stdout = io::stdout();
            write_search_table(
                &mut stdout.lock(),
                &client,
                &result,
                &output_config(&config),
            )?;
        }
    }
    Ok(())
}

fn write_search_table<W: Write>(
    w: &mut W,
    client: &JiraClient,
    result: &SearchResult,
    out_config: &OutputConfig,
) -> io::Result<()> {
    if result.issues.is_empty() {
        writeln!(w, "No issues found.")?;
        return Ok(());
    }

    let status_config = out_config.clone();
    let mut renderer = TableRenderer::new(
        &["KEY", "TYPE", "URL", "SUMMARY", "STATUS", "ASSIGNEE", "REPORTER"],
        out_config.clone(),
    )
    .with_formatter("STATUS", move |value| status_color(value, &status_config));

    for issue in &result.issues {
        renderer.append(search_row(client, issue))?;
    }
    renderer.render(w)?;

    writeln!(w)?;
    let shown = result.issues.len();
    writeln!(
        w,
        "Showing {}-{} of {} issues",
        result.start_at + 1,
        result.start_at + shown,
        result.total
    )?;
    if result.start_at + shown < result.total {
        writeln!(w, "Use --start-at {} to see next page", result.start_at + shown)?;
    }

    Ok(())
}

fn search_row(client: &JiraClient, issue: &Issue) -> Vec<String> {
    let fields = &issue.fields;
    vec![
        issue.key.clone(),
        fields.issue_type.name.clone(),
        client.browse_url(&issue.key),
        output::truncate(&fields.summary, output::SUMMARY_WIDTH_SEARCH),
        fields.status.name.clone(),
        fields
            .assignee
            .as_ref()
            .map_or_else(|| "Unassigned".to_string(), |u| u.display_name.clone()),
        fields
            .reporter
            .as_ref()
            .map_or_else(String::new, |u| u.display_name.clone()),
    ]
}

fn write_issue_table<W: Write>(
    w: &mut W,
    issue: &Issue,
    out_config: &OutputConfig,
) -> io::Result<()> {
    let fields = &issue.fields;
    let assignee = fields
        .assignee
        .as_ref()
        .map_or_else(|| "Unassigned".to_string(), |u| u.display_name.clone());
    let reporter = fields
        .reporter
        .as_ref()
        .map_or_else(String::new, |u| u.display_name.clone());
    let created = fields
        .created
        .as_ref()
        .map_or_else(String::new, |t| t.format("%Y-%m-%d %H:%M:%S"));
    let updated = fields
        .updated
        .as_ref()
        .map_or_else(String::new, |t| t.format("%Y-%m-%d %H:%M:%S"));
    let description = output::truncate(fields.description.as_deref().unwrap_or(""), 100);

    let mut renderer = TableRenderer::new(&["FIELD", "VALUE"], out_config.clone());
    renderer.append_all(vec![
        vec!["Key".to_string(), issue.key.clone()],
        vec!["Summary".to_string(), fields.summary.clone()],
        vec!["Status".to_string(), fields.status.name.clone()],
        vec!["Type".to_string(), fields.issue_type.name.clone()],
        vec!["Priority".to_string(), fields.priority.name.clone()],
        vec!["Project".to_string(), fields.project.name.clone()],
        vec!["Assignee".to_string(), assignee],
        vec!["Reporter".to_string(), reporter],
        vec!["Created".to_string(), created],
        vec!["Updated".to_string(), updated],
        vec!["Description".to_string(), description],
    ])?;
    renderer.render(w)
}

/// Execute the config command
pub fn execute_config(args: &ConfigArgs, output: Option<OutputFormatArg>) -> Result<()> {
    match &args.action {
        ConfigAction::Init => {
            let path = Config::default_path()?;
            if path.exists() {
                anyhow::bail!("configuration already exists at {}", path.display());
            }
            Config::default().save(&path)?;
            println!("Configuration written to {}", path.display());
            println!("Set the Jira connection with:");
            println!("  twig config set jira.base_url https://your-domain.atlassian.net");
            println!("  twig config set jira.token <personal-access-token>");
            Ok(())
        }
        ConfigAction::Show => {
            let masked = load_config()?.masked();
            match output {
                Some(OutputFormatArg::Json) => output::print_json(&masked)?,
                Some(OutputFormatArg::Yaml) => output::print_yaml(&masked)?,
                Some(OutputFormatArg::Table) | None => {
                    let stdout = io::stdout();
                    write_config_table(&mut stdout.lock(), &masked)?;
                }
            }
            Ok(())
        }
        ConfigAction::Set { key, value } => {
            let path = Config::default_path()?;
            let mut config = if path.exists() {
                Config::load_from(&path)?
            } else {
                Config::default()
            };
            config.set(key, value)?;
            config.save(&path)?;
            println!("Configuration updated: {key} = {value}");
            Ok(())
        }
    }
}

fn write_config_table<W: Write>(w: &mut W, config: &Config) -> io::Result<()> {
    let mut renderer = TableRenderer::new(&["CONFIGURATION", "VALUE"], OutputConfig::from_env());
    renderer.append_all(vec![
        vec!["Jira Base URL".to_string(), config.jira.base_url.clone()],
        vec!["Jira Token".to_string(), config.jira.token.clone()],
        vec![
            "Output Format".to_string(),
            config.cli.output_format.clone(),
        ],
        vec!["Colors Enabled".to_string(), config.cli.color.to_string()],
        vec!["Verbose Mode".to_string(), config.cli.verbose.to_string()],
    ])?;
    renderer.render(w)
}
