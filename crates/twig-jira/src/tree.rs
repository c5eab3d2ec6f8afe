//! Issue-hierarchy resolution.
//!
//! Children of an issue come from three independent relationship sources:
//! inline subtask references, a declared `parent` field on other issues, and
//! the Epic Link custom field. [`resolve_children`] merges all three with
//! cross-source deduplication; [`build_tree`] expands the resolver into a
//! depth-bounded owned tree; [`fetch_ancestors`] walks the parent chain
//! upward for the reverse view.
//!
//! Every query is strictly sequential (subtask batch, then the combined JQL
//! query, per node, in pre-order), so query ordering is deterministic. There
//! is no cross-branch memoization: an issue reachable via two parents is
//! expanded twice, and the hierarchy is assumed acyclic.

use std::collections::HashSet;
use std::future::Future;
use std::pin::Pin;

use crate::client::IssueApi;
use crate::error::{Error, Result};
use crate::types::Issue;

/// Field projection requested for every discovered child.
pub const CHILD_FIELDS: [&str; 9] = [
    "summary",
    "status",
    "issuetype",
    "priority",
    "assignee",
    "reporter",
    "created",
    "updated",
    "parent",
];

/// A built hierarchy: the expanded root plus its ancestor chain.
///
/// `ancestors[0]` is the root's immediate parent and the chain is ordered
/// upward. The chain is a separate, non-owned sequence rather than a
/// back-pointer on [`Issue`], so the ownership graph stays a strict tree.
/// It is populated only by [`fetch_ancestors`] — the downward builder never
/// touches it.
#[derive(Debug, Clone)]
pub struct IssueTree {
    /// The root issue with `children` populated by [`build_tree`].
    pub root: Issue,
    /// Ancestors of the root, nearest parent first. Empty unless fetched.
    pub ancestors: Vec<Issue>,
}

impl IssueTree {
    /// Wrap a built root with an empty ancestor chain.
    #[must_use]
    pub fn new(root: Issue) -> Self {
        Self {
            root,
            ancestors: Vec::new(),
        }
    }
}

/// Discover the direct children of `parent` from all three relationship
/// sources, deduplicated in first-seen order.
///
/// Inline subtasks are batch-fetched with a single `key IN (...)` query to
/// avoid one fetch per subtask; a second query covers the declared-parent
/// and Epic Link relationships in one combined expression. Subtask results
/// come first, then search results, skipping keys already found. The order
/// is never re-sorted.
///
/// Returned children carry only the [`CHILD_FIELDS`] projection — callers
/// must not assume descriptions or links are populated.
///
/// # Errors
///
/// Any query failure aborts immediately, wrapped with the offending JQL
/// text. No partial result is returned.
pub async fn resolve_children(api: &dyn IssueApi, parent: &Issue) -> Result<Vec<Issue>> {
    let mut children = Vec::with_capacity(parent.fields.subtasks.len());
    let mut found: HashSet<String> = HashSet::new();

    if !parent.fields.subtasks.is_empty() {
        let keys: Vec<&str> = parent
            .fields
            .subtasks
            .iter()
            .map(|subtask| subtask.key.as_str())
            .collect();
        for key in &keys {
            found.insert((*key).to_string());
        }

        let jql = format!("key IN ({})", keys.join(","));
        tracing::debug!(%jql, "batch fetching subtasks");
        let result = api
            .search_issues(&jql, &CHILD_FIELDS)
            .await
            .map_err(|e| Error::query(jql.as_str(), e))?;
        children.extend(result.issues);
    }

    // One combined query for both remaining sources; any issue can carry an
    // Epic Link, so there is no need to special-case epics.
    let jql = format!(
        "parent = {key} OR \"Epic Link\" = {key}",
        key = parent.key
    );
    tracing::debug!(%jql, "searching child issues");
    let result = api
        .search_issues(&jql, &CHILD_FIELDS)
        .await
        .map_err(|e| Error::query(jql.as_str(), e))?;

    for issue in result.issues {
        if found.contains(&issue.key) {
            continue;
        }
        found.insert(issue.key.clone());
        children.push(issue);
    }

    Ok(children)
}

/// Expand `issue.children` recursively down to `max_depth` levels.
///
/// `max_depth <= 0` is the base case: `children` is set to an empty vec and
/// the call succeeds without issuing any query — depth limiting is a hard
/// cutoff, not a discovery limit. Children are appended in resolver order,
/// each fully expanded before the next sibling is visited.
///
/// # Errors
///
/// Any failure below aborts the whole build; no partial tree is returned as
/// success.
pub fn build_tree<'a>(
    api: &'a dyn IssueApi,
    issue: &'a mut Issue,
    max_depth: i32,
) -> Pin<Box<dyn Future<Output = Result<()>> + Send + 'a>> {
    Box::pin(async move {
        if max_depth <= 0 {
            issue.children = Vec::new();
            return Ok(());
        }

        let children = resolve_children(api, issue).await?;

        issue.children = Vec::with_capacity(children.len());
        for mut child in children {
            build_tree(api, &mut child, max_depth - 1).await?;
            issue.children.push(child);
        }

        Ok(())
    })
}

/// Fetch the ancestor chain of `issue` by following inline parent
/// references upward, nearest parent first.
///
/// Each hop is a full issue fetch, so ancestors carry complete field
/// payloads. The walk stops at the first issue without a parent reference;
/// the hierarchy is assumed acyclic, so no visited-set is kept.
///
/// # Errors
///
/// Propagates the first failing fetch.
pub async fn fetch_ancestors(api: &dyn IssueApi, issue: &Issue) -> Result<Vec<Issue>> {
    let mut chain = Vec::new();
    let mut next = issue.fields.parent.as_ref().map(|parent| parent.key.clone());

    while let Some(key) = next {
        tracing::debug!(%key, "fetching ancestor");
        let ancestor = api.get_issue(&key).await?;
        next = ancestor
            .fields
            .parent
            .as_ref()
            .map(|parent| parent.key.clone());
        chain.push(ancestor);
    }

    Ok(chain)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{IssueFields, SearchResult, Status};
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// Scripted transport double: issues by key, search results by exact
    /// JQL text, and a log of executed queries for order assertions.
    #[derive(Default)]
    struct MockApi {
        issues: HashMap<String, Issue>,
        searches: HashMap<String, Vec<Issue>>,
        failing_jql: Option<String>,
        queries: Mutex<Vec<String>>,
    }

    impl MockApi {
        fn with_search(mut self, jql: &str, issues: Vec<Issue>) -> Self {
            self.searches.insert(jql.to_string(), issues);
            self
        }

        fn with_issue(mut self, issue: Issue) -> Self {
            self.issues.insert(issue.key.clone(), issue);
            self
        }

        fn failing_on(mut self, jql: &str) -> Self {
            self.failing_jql = Some(jql.to_string());
            self
        }

        fn executed_queries(&self) -> Vec<String> {
            self.queries.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl IssueApi for MockApi {
        async fn get_issue(&self, key: &str) -> Result<Issue> {
            self.issues
                .get(key)
                .cloned()
                .ok_or_else(|| Error::NotFound(key.to_string()))
        }

        async fn search_issues(&self, jql: &str, _fields: &[&str]) -> Result<SearchResult> {
            self.queries.lock().unwrap().push(jql.to_string());
            if self.failing_jql.as_deref() == Some(jql) {
                return Err(Error::Api {
                    status: 400,
                    body: "rejected".to_string(),
                });
            }
            let issues = self.searches.get(jql).cloned().unwrap_or_default();
            let total = issues.len();
            Ok(SearchResult {
                issues,
                start_at: 0,
                max_results: total,
                total,
            })
        }
    }

    fn issue(key: &str, summary: &str) -> Issue {
        Issue {
            key: key.to_string(),
            fields: IssueFields {
                summary: summary.to_string(),
                status: Status {
                    id: String::new(),
                    name: "New".to_string(),
                },
                ..IssueFields::default()
            },
            ..Issue::default()
        }
    }

    /// Issue carrying inline subtask stubs, as a full fetch returns it.
    fn issue_with_subtasks(key: &str, summary: &str, subtask_keys: &[&str]) -> Issue {
        let mut parent = issue(key, summary);
        parent.fields.subtasks = subtask_keys
            .iter()
            .map(|k| Issue {
                key: (*k).to_string(),
                ..Issue::default()
            })
            .collect();
        parent
    }

    fn child_query(key: &str) -> String {
        format!("parent = {key} OR \"Epic Link\" = {key}")
    }

    #[tokio::test]
    async fn test_resolve_children_without_subtasks_issues_one_query() {
        let api = MockApi::default().with_search(
            &child_query("EPIC-1"),
            vec![issue("STORY-1", "First"), issue("STORY-2", "Second")],
        );

        let root = issue("EPIC-1", "Epic");
        let children = resolve_children(&api, &root).await.unwrap();

        let keys: Vec<&str> = children.iter().map(|c| c.key.as_str()).collect();
        assert_eq!(keys, vec!["STORY-1", "STORY-2"]);
        assert_eq!(api.executed_queries(), vec![child_query("EPIC-1")]);
    }

    #[tokio::test]
    async fn test_resolve_children_batches_subtasks_first() {
        let api = MockApi::default()
            .with_search(
                "key IN (SUB-1,SUB-2)",
                vec![issue("SUB-1", "One"), issue("SUB-2", "Two")],
            )
            .with_search(&child_query("STORY-1"), vec![issue("STORY-9", "Linked")]);

        let root = issue_with_subtasks("STORY-1", "Story", &["SUB-1", "SUB-2"]);
        let children = resolve_children(&api, &root).await.unwrap();

        let keys: Vec<&str> = children.iter().map(|c| c.key.as_str()).collect();
        assert_eq!(keys, vec!["SUB-1", "SUB-2", "STORY-9"]);

        // Subtask batch executes before the combined relationship query.
        assert_eq!(
            api.executed_queries(),
            vec!["key IN (SUB-1,SUB-2)".to_string(), child_query("STORY-1")]
        );
    }

    #[tokio::test]
    async fn test_resolve_children_dedups_across_sources() {
        // SUB-1 appears both as an inline subtask and in the combined query
        // results; it must appear once, in subtask-batch position.
        let api = MockApi::default()
            .with_search("key IN (SUB-1)", vec![issue("SUB-1", "Subtask")])
            .with_search(
                &child_query("STORY-1"),
                vec![issue("SUB-1", "Subtask"), issue("STORY-2", "Sibling")],
            );

        let root = issue_with_subtasks("STORY-1", "Story", &["SUB-1"]);
        let children = resolve_children(&api, &root).await.unwrap();

        let keys: Vec<&str> = children.iter().map(|c| c.key.as_str()).collect();
        assert_eq!(keys, vec!["SUB-1", "STORY-2"]);
    }

    #[tokio::test]
    async fn test_resolve_children_error_carries_query_text() {
        let api = MockApi::default().failing_on(&child_query("EPIC-1"));

        let root = issue("EPIC-1", "Epic");
        let err = resolve_children(&api, &root).await.unwrap_err();

        let msg = err.to_string();
        assert!(msg.contains("Epic Link"), "got: {msg}");
        assert!(msg.contains("EPIC-1"), "got: {msg}");
    }

    #[tokio::test]
    async fn test_build_tree_depth_zero_is_a_hard_cutoff() {
        // Children exist in the source system but must not be discovered.
        let api = MockApi::default().with_search(
            &child_query("EPIC-1"),
            vec![issue("STORY-1", "Hidden")],
        );

        let mut root = issue("EPIC-1", "Epic");
        build_tree(&api, &mut root, 0).await.unwrap();

        assert!(root.children.is_empty());
        assert!(api.executed_queries().is_empty(), "no query may be issued");
    }

    #[tokio::test]
    async fn test_build_tree_depth_bound_limits_a_deeper_hierarchy() {
        // Four real levels below the root; max_depth 2 keeps exactly two.
        let api = MockApi::default()
            .with_search(&child_query("L0-1"), vec![issue("L1-1", "One")])
            .with_search(&child_query("L1-1"), vec![issue("L2-1", "Two")])
            .with_search(&child_query("L2-1"), vec![issue("L3-1", "Three")])
            .with_search(&child_query("L3-1"), vec![issue("L4-1", "Four")]);

        let mut root = issue("L0-1", "Root");
        build_tree(&api, &mut root, 2).await.unwrap();

        assert_eq!(root.children.len(), 1);
        let level1 = &root.children[0];
        assert_eq!(level1.key, "L1-1");
        assert_eq!(level1.children.len(), 1);
        let level2 = &level1.children[0];
        assert_eq!(level2.key, "L2-1");
        assert!(level2.children.is_empty(), "depth budget exhausted");
    }

    #[tokio::test]
    async fn test_build_tree_preserves_resolver_order() {
        let api = MockApi::default().with_search(
            &child_query("EPIC-1"),
            vec![
                issue("STORY-3", "C"),
                issue("STORY-1", "A"),
                issue("STORY-2", "B"),
            ],
        );

        let mut root = issue("EPIC-1", "Epic");
        build_tree(&api, &mut root, 1).await.unwrap();

        let keys: Vec<&str> = root.children.iter().map(|c| c.key.as_str()).collect();
        assert_eq!(keys, vec!["STORY-3", "STORY-1", "STORY-2"]);
    }

    #[tokio::test]
    async fn test_build_tree_fails_fast_on_nested_error() {
        let api = MockApi::default()
            .with_search(&child_query("EPIC-1"), vec![issue("STORY-1", "Story")])
            .failing_on(&child_query("STORY-1"));

        let mut root = issue("EPIC-1", "Epic");
        let err = build_tree(&api, &mut root, 3).await.unwrap_err();

        assert!(err.to_string().contains("STORY-1"), "got: {err}");
    }

    #[tokio::test]
    async fn test_build_tree_end_to_end_scenario() {
        // EPIC-1 has no inline subtasks; the combined query returns two
        // stories, one of which carries an inline subtask.
        let mut story1 = issue_with_subtasks("STORY-1", "First story", &["SUB-1"]);
        story1.fields.status.name = "In Progress".to_string();

        let api = MockApi::default()
            .with_search(
                &child_query("EPIC-1"),
                vec![story1, issue("STORY-2", "Second story")],
            )
            .with_search("key IN (SUB-1)", vec![issue("SUB-1", "Sub work")]);

        let mut root = issue("EPIC-1", "The epic");
        build_tree(&api, &mut root, 2).await.unwrap();

        assert_eq!(root.children.len(), 2);
        assert_eq!(root.children[0].key, "STORY-1");
        assert_eq!(root.children[1].key, "STORY-2");
        assert_eq!(root.children[0].children.len(), 1);
        assert_eq!(root.children[0].children[0].key, "SUB-1");
        assert!(root.children[0].children[0].children.is_empty());
        assert!(root.children[1].children.is_empty());
    }

    #[tokio::test]
    async fn test_fetch_ancestors_walks_parent_chain() {
        let mut epic1 = issue("EPIC-1", "Middle");
        epic1.fields.parent = Some(Box::new(Issue {
            key: "EPIC-0".to_string(),
            ..Issue::default()
        }));

        let epic0 = issue("EPIC-0", "Top");

        let mut start = issue("STORY-1", "Leaf");
        start.fields.parent = Some(Box::new(Issue {
            key: "EPIC-1".to_string(),
            ..Issue::default()
        }));

        let api = MockApi::default().with_issue(epic1).with_issue(epic0);

        let chain = fetch_ancestors(&api, &start).await.unwrap();
        let keys: Vec<&str> = chain.iter().map(|a| a.key.as_str()).collect();
        assert_eq!(keys, vec!["EPIC-1", "EPIC-0"]);
    }

    #[tokio::test]
    async fn test_fetch_ancestors_empty_without_parent() {
        let api = MockApi::default();
        let root = issue("EPIC-1", "Top-level");

        let chain = fetch_ancestors(&api, &root).await.unwrap();
        assert!(chain.is_empty());
    }

    #[tokio::test]
    async fn test_fetch_ancestors_propagates_missing_parent() {
        let mut start = issue("STORY-1", "Leaf");
        start.fields.parent = Some(Box::new(Issue {
            key: "EPIC-GONE".to_string(),
            ..Issue::default()
        }));

        let api = MockApi::default();
        let err = fetch_ancestors(&api, &start).await.unwrap_err();
        assert!(matches!(err, Error::NotFound(ref key) if key == "EPIC-GONE"));
    }
}
