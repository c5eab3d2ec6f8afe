//! Authenticated Jira REST client.
//!
//! The client is deliberately synchronous in behavior: every call blocks the
//! (single-threaded) runtime until the response arrives, so callers observe
//! strictly sequential, deterministic query ordering. Retry with exponential
//! backoff on rate-limit and server errors lives here and nowhere else; the
//! hierarchy core only ever sees success or a terminal error.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use reqwest::header;

use crate::error::{Error, Result};
use crate::types::{Issue, Project, SearchResult};

const API_ISSUE_ENDPOINT: &str = "/rest/api/2/issue";
const API_SEARCH_ENDPOINT: &str = "/rest/api/2/search";
const API_PROJECT_ENDPOINT: &str = "/rest/api/2/project";

const HTTP_PREFIX: &str = "http://";
const HTTPS_PREFIX: &str = "https://";

/// Maximum number of retries for retryable responses.
const RETRY_MAX: u32 = 3;
/// Initial backoff wait.
const RETRY_WAIT_MIN: Duration = Duration::from_secs(1);
/// Backoff ceiling.
const RETRY_WAIT_MAX: Duration = Duration::from_secs(30);

/// Page size used when exhaustively fetching search results.
pub const SEARCH_PAGE_SIZE: usize = 100;

/// The capability the hierarchy core needs from the transport.
///
/// `JiraClient` is the production implementation; tests substitute a mock
/// so resolver and builder logic can be exercised without a server.
#[async_trait]
pub trait IssueApi: Send + Sync {
    /// Fetch a single issue by exact key.
    async fn get_issue(&self, key: &str) -> Result<Issue>;

    /// Execute a JQL expression, requesting the given field projection.
    async fn search_issues(&self, jql: &str, fields: &[&str]) -> Result<SearchResult>;
}

/// HTTP client for a single Jira instance.
pub struct JiraClient {
    base_url: String,
    token: String,
    http: reqwest::Client,
}

impl std::fmt::Debug for JiraClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JiraClient")
            .field("base_url", &self.base_url)
            .field("token", &"<redacted>")
            .finish()
    }
}

impl JiraClient {
    /// Create a client for the given Jira base URL and API token.
    ///
    /// The base URL is normalized: a trailing `/` is stripped and `https://`
    /// is assumed when no scheme is present.
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` when the base URL or token is empty.
    pub fn new(base_url: &str, token: &str) -> Result<Self> {
        if base_url.is_empty() {
            return Err(Error::Config("base URL cannot be empty".to_string()));
        }
        if token.is_empty() {
            return Err(Error::Config("API token cannot be empty".to_string()));
        }

        let trimmed = base_url.trim_end_matches('/');
        let base_url = if trimmed.starts_with(HTTP_PREFIX) || trimmed.starts_with(HTTPS_PREFIX) {
            trimmed.to_string()
        } else {
            format!("{HTTPS_PREFIX}{trimmed}")
        };

        Ok(Self {
            base_url,
            token: token.to_string(),
            http: reqwest::Client::new(),
        })
    }

    /// The normalized base URL this client talks to.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Browser-facing URL for an issue key.
    #[must_use]
    pub fn browse_url(&self, key: &str) -> String {
        format!("{}/browse/{}", self.base_url, key)
    }

    /// Fetch a project by exact key.
    ///
    /// # Errors
    ///
    /// Returns `Error::NotFound` for an unknown key, `Error::Unauthorized`
    /// for rejected credentials, and `Error::Api`/`Error::Transport` for
    /// other failures.
    pub async fn get_project(&self, key: &str) -> Result<Project> {
        match self
            .get_json(&format!("{API_PROJECT_ENDPOINT}/{key}"), &[])
            .await
        {
            Err(Error::Api { status: 404, .. }) => Err(Error::NotFound(key.to_string())),
            other => other,
        }
    }

    /// Execute a JQL search for one explicit result page.
    ///
    /// # Errors
    ///
    /// Failures are wrapped with the offending JQL text.
    pub async fn search_issues_paged(
        &self,
        jql: &str,
        start_at: usize,
        max_results: usize,
        fields: &[&str],
    ) -> Result<SearchResult> {
        let mut params: Vec<(&str, String)> = vec![
            ("jql", jql.to_string()),
            ("startAt", start_at.to_string()),
            ("maxResults", max_results.to_string()),
        ];
        for field in fields {
            params.push(("fields", (*field).to_string()));
        }

        self.get_json(API_SEARCH_ENDPOINT, &params)
            .await
            .map_err(|e| Error::query(jql, e))
    }

    /// Execute a JQL search and follow pagination until every match is
    /// collected.
    ///
    /// # Errors
    ///
    /// Aborts on the first failing page; no partial result is returned.
    pub async fn search_all(&self, jql: &str, fields: &[&str]) -> Result<SearchResult> {
        let mut issues = Vec::new();
        let mut start_at = 0;
        let mut total = 0;

        loop {
            let page = self
                .search_issues_paged(jql, start_at, SEARCH_PAGE_SIZE, fields)
                .await?;
            if start_at == 0 {
                total = page.total;
            }

            let fetched = page.issues.len();
            issues.extend(page.issues);

            if fetched < SEARCH_PAGE_SIZE || start_at + fetched >= page.total {
                break;
            }
            start_at += fetched;
        }

        let max_results = issues.len();
        Ok(SearchResult {
            issues,
            start_at: 0,
            max_results,
            total,
        })
    }

    /// Perform a GET with auth headers, retrying retryable failures with
    /// exponential backoff, and decode the JSON body.
    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> Result<T> {
        let url = format!("{}{}", self.base_url, path);
        let mut wait = RETRY_WAIT_MIN;
        let mut attempt = 0;

        loop {
            let response = self
                .http
                .get(&url)
                .query(params)
                .bearer_auth(&self.token)
                .header(header::ACCEPT, "application/json")
                .header(header::CONTENT_TYPE, "application/json")
                .send()
                .await;

            match response {
                Ok(resp) => {
                    let status = resp.status();
                    if status.is_success() {
                        return Ok(resp.json::<T>().await?);
                    }
                    if is_retryable_status(status) && attempt < RETRY_MAX {
                        attempt += 1;
                        tracing::debug!(%url, status = status.as_u16(), attempt, "retrying Jira request");
                        tokio::time::sleep(wait).await;
                        wait = (wait * 2).min(RETRY_WAIT_MAX);
                        continue;
                    }
                    let body = resp.text().await.unwrap_or_default();
                    return Err(map_error_status(status, body));
                }
                Err(err) => {
                    if (err.is_timeout() || err.is_connect()) && attempt < RETRY_MAX {
                        attempt += 1;
                        tracing::debug!(%url, error = %err, attempt, "retrying Jira request");
                        tokio::time::sleep(wait).await;
                        wait = (wait * 2).min(RETRY_WAIT_MAX);
                        continue;
                    }
                    return Err(Error::Transport(err));
                }
            }
        }
    }
}

#[async_trait]
impl IssueApi for JiraClient {
    async fn get_issue(&self, key: &str) -> Result<Issue> {
        match self
            .get_json(&format!("{API_ISSUE_ENDPOINT}/{key}"), &[])
            .await
        {
            Err(Error::Api { status: 404, .. }) => Err(Error::NotFound(key.to_string())),
            other => other,
        }
    }

    async fn search_issues(&self, jql: &str, fields: &[&str]) -> Result<SearchResult> {
        self.search_issues_paged(jql, 0, SEARCH_PAGE_SIZE, fields)
            .await
    }
}

/// Whether a response status warrants another attempt.
fn is_retryable_status(status: StatusCode) -> bool {
    status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error()
}

/// Map a terminal non-success status to the error taxonomy.
fn map_error_status(status: StatusCode, body: String) -> Error {
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Error::Unauthorized {
            status: status.as_u16(),
        },
        _ => Error::Api {
            status: status.as_u16(),
            body,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_new_rejects_empty_base_url() {
        let result = JiraClient::new("", "token");
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("base URL"));
    }

    #[test]
    fn test_new_rejects_empty_token() {
        let result = JiraClient::new("https://jira.example.com", "");
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("token"));
    }

    #[rstest]
    #[case::bare_host("jira.example.com", "https://jira.example.com")]
    #[case::trailing_slash("https://jira.example.com/", "https://jira.example.com")]
    #[case::explicit_http("http://jira.local", "http://jira.local")]
    #[case::explicit_https("https://jira.example.com", "https://jira.example.com")]
    fn test_new_normalizes_base_url(#[case] input: &str, #[case] expected: &str) {
        let client = JiraClient::new(input, "token").unwrap();
        assert_eq!(client.base_url(), expected);
    }

    #[test]
    fn test_browse_url() {
        let client = JiraClient::new("https://jira.example.com", "token").unwrap();
        assert_eq!(
            client.browse_url("PROJ-1"),
            "https://jira.example.com/browse/PROJ-1"
        );
    }

    #[rstest]
    #[case::rate_limited(StatusCode::TOO_MANY_REQUESTS, true)]
    #[case::unavailable(StatusCode::SERVICE_UNAVAILABLE, true)]
    #[case::server_error(StatusCode::INTERNAL_SERVER_ERROR, true)]
    #[case::bad_request(StatusCode::BAD_REQUEST, false)]
    #[case::not_found(StatusCode::NOT_FOUND, false)]
    #[case::unauthorized(StatusCode::UNAUTHORIZED, false)]
    fn test_retryable_statuses(#[case] status: StatusCode, #[case] expected: bool) {
        assert_eq!(is_retryable_status(status), expected);
    }

    #[test]
    fn test_map_error_status_unauthorized() {
        let err = map_error_status(StatusCode::UNAUTHORIZED, String::new());
        assert!(matches!(err, Error::Unauthorized { status: 401 }));

        let err = map_error_status(StatusCode::FORBIDDEN, String::new());
        assert!(matches!(err, Error::Unauthorized { status: 403 }));
    }

    #[test]
    fn test_map_error_status_api() {
        let err = map_error_status(StatusCode::BAD_REQUEST, "bad jql".to_string());
        match err {
            Error::Api { status, body } => {
                assert_eq!(status, 400);
                assert_eq!(body, "bad jql");
            }
            other => panic!("expected Api error, got: {other:?}"),
        }
    }

    #[test]
    fn test_debug_redacts_token() {
        let client = JiraClient::new("https://jira.example.com", "secret").unwrap();
        let debug = format!("{client:?}");
        assert!(!debug.contains("secret"), "got: {debug}");
    }
}
