//! Wire types for the Jira v2 REST API.
//!
//! Field names follow the JSON payloads exactly (`issuetype`, `issuelinks`,
//! camelCase user fields). Search results carry only the fields that were
//! requested in the query projection, so everything except the issue key is
//! defaulted when absent.

use std::fmt;

use chrono::{DateTime, FixedOffset};
use serde::de;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Jira's timestamp layout: `2025-05-12T06:54:41.542+0000`.
const JIRA_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3f%z";

/// A timestamp in Jira's wire format.
///
/// Jira emits a fixed-offset timestamp with millisecond precision and a
/// `+HHMM` zone suffix, which is not RFC 3339 and must be parsed with the
/// exact layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct JiraTime(pub DateTime<FixedOffset>);

impl JiraTime {
    /// Parse a timestamp from Jira's wire format.
    ///
    /// # Errors
    ///
    /// Returns a parse error when the input does not match the layout.
    pub fn parse(s: &str) -> Result<Self, chrono::ParseError> {
        DateTime::parse_from_str(s, JIRA_TIME_FORMAT).map(Self)
    }

    /// Format the timestamp for display using a strftime layout.
    #[must_use]
    pub fn format(&self, layout: &str) -> String {
        self.0.format(layout).to_string()
    }
}

impl fmt::Display for JiraTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d"))
    }
}

impl<'de> Deserialize<'de> for JiraTime {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        JiraTime::parse(&s)
            .map_err(|e| de::Error::custom(format!("invalid Jira timestamp {s:?}: {e}")))
    }
}

impl Serialize for JiraTime {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.0.format(JIRA_TIME_FORMAT).to_string())
    }
}

/// A Jira issue, as fetched or discovered via search.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Issue {
    /// Human-readable issue key, e.g. `PROJ-123`.
    pub key: String,

    /// Server-side numeric id.
    #[serde(default)]
    pub id: String,

    /// REST self link.
    #[serde(rename = "self", default, skip_serializing_if = "String::is_empty")]
    pub self_url: String,

    /// Issue field payload.
    #[serde(default)]
    pub fields: IssueFields,

    /// Child issues attached by the tree builder.
    ///
    /// Never present in API payloads; populated exactly once during tree
    /// construction and owned by this node.
    #[serde(default, skip_deserializing, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Issue>,
}

impl Issue {
    /// Assignee display name, or the empty string when unassigned.
    #[must_use]
    pub fn assignee_display(&self) -> &str {
        self.fields
            .assignee
            .as_ref()
            .map_or("", |user| user.display_name.as_str())
    }
}

/// The `fields` object of an issue payload.
///
/// Every field except the key may be missing in a projected search result,
/// so all of them default.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IssueFields {
    /// One-line summary.
    #[serde(default)]
    pub summary: String,

    /// Long-form description; null for many issues.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Issue type (Story, Task, Sub-task, Epic, ...).
    #[serde(rename = "issuetype", default)]
    pub issue_type: IssueType,

    /// Workflow status.
    #[serde(default)]
    pub status: Status,

    /// Priority.
    #[serde(default)]
    pub priority: Priority,

    /// Assigned user, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assignee: Option<User>,

    /// Reporting user.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reporter: Option<User>,

    /// Owning project.
    #[serde(default)]
    pub project: Project,

    /// Inline parent reference (subtasks and issues under an epic carry one).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<Box<Issue>>,

    /// Inline subtask references; abbreviated issues without timestamps.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub subtasks: Vec<Issue>,

    /// Typed links to other issues.
    #[serde(rename = "issuelinks", default, skip_serializing_if = "Vec::is_empty")]
    pub issue_links: Vec<IssueLink>,

    /// Creation timestamp; absent in abbreviated payloads.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created: Option<JiraTime>,

    /// Last-update timestamp; absent in abbreviated payloads.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated: Option<JiraTime>,
}

/// Issue type descriptor.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IssueType {
    /// Server-side id.
    #[serde(default)]
    pub id: String,
    /// Display name.
    #[serde(default)]
    pub name: String,
}

impl fmt::Display for IssueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// Workflow status descriptor.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Status {
    /// Server-side id.
    #[serde(default)]
    pub id: String,
    /// Display name, e.g. "In Progress".
    #[serde(default)]
    pub name: String,
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// Priority descriptor.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Priority {
    /// Server-side id.
    #[serde(default)]
    pub id: String,
    /// Display name, e.g. "Major".
    #[serde(default)]
    pub name: String,
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// A Jira user reference.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Stable account id.
    #[serde(default)]
    pub account_id: String,
    /// Display name.
    #[serde(default)]
    pub display_name: String,
    /// Email address, when visible.
    #[serde(default)]
    pub email_address: String,
}

/// A Jira project reference.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Project {
    /// Server-side id.
    #[serde(default)]
    pub id: String,
    /// Project key, e.g. `PROJ`.
    #[serde(default)]
    pub key: String,
    /// Display name.
    #[serde(default)]
    pub name: String,
}

/// A typed link between two issues.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IssueLink {
    /// Server-side id.
    #[serde(default)]
    pub id: String,

    /// The link type (blocks, relates to, ...).
    #[serde(rename = "type", default)]
    pub link_type: LinkType,

    /// The issue on the inward side of the link, if this is an inward link.
    #[serde(rename = "inwardIssue", default, skip_serializing_if = "Option::is_none")]
    pub inward_issue: Option<Box<Issue>>,

    /// The issue on the outward side of the link, if this is an outward link.
    #[serde(rename = "outwardIssue", default, skip_serializing_if = "Option::is_none")]
    pub outward_issue: Option<Box<Issue>>,
}

/// Link type descriptor with directional phrasing.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LinkType {
    /// Server-side id.
    #[serde(default)]
    pub id: String,
    /// Name, e.g. "Blocks".
    #[serde(default)]
    pub name: String,
    /// Inward phrase, e.g. "is blocked by".
    #[serde(default)]
    pub inward: String,
    /// Outward phrase, e.g. "blocks".
    #[serde(default)]
    pub outward: String,
}

/// One page of search results.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResult {
    /// The issues on this page.
    #[serde(default)]
    pub issues: Vec<Issue>,

    /// Index of the first result on this page.
    #[serde(default)]
    pub start_at: usize,

    /// Page size the server applied.
    #[serde(default)]
    pub max_results: usize,

    /// Total matches across all pages.
    #[serde(default)]
    pub total: usize,
}
