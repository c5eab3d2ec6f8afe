//! Error types for Jira API operations.

use thiserror::Error;

/// The error type for Jira client and tree-building operations.
#[derive(Debug, Error)]
pub enum Error {
    /// A JQL query was rejected or failed; carries the offending query text.
    #[error("JQL search failed for '{query}': {source}")]
    QueryFailure {
        /// The JQL expression that triggered the failure.
        query: String,
        /// The underlying failure.
        #[source]
        source: Box<Error>,
    },

    /// The requested issue or project key does not resolve.
    #[error("not found: {0}")]
    NotFound(String),

    /// Jira rejected the credentials.
    #[error("unauthorized: Jira rejected the request with HTTP {status}")]
    Unauthorized {
        /// The HTTP status code (401 or 403).
        status: u16,
    },

    /// Any other non-success API response.
    #[error("API request failed with status {status}: {body}")]
    Api {
        /// The HTTP status code.
        status: u16,
        /// The raw response body, for operator diagnosis.
        body: String,
    },

    /// Network-level failure from the HTTP transport.
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Client construction or configuration problem.
    #[error("configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Wrap an error with the JQL expression that produced it.
    ///
    /// Already-wrapped query failures are passed through unchanged so a
    /// failure keeps its innermost query text.
    pub fn query(jql: impl Into<String>, source: Error) -> Error {
        match source {
            wrapped @ Error::QueryFailure { .. } => wrapped,
            other => Error::QueryFailure {
                query: jql.into(),
                source: Box::new(other),
            },
        }
    }
}

/// A specialized Result type for Jira operations.
pub type Result<T> = std::result::Result<T, Error>;
