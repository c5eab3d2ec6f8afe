//! Jira REST client and issue-hierarchy resolution.
//!
//! This crate provides the server-facing half of twig: wire-faithful types
//! for the Jira v2 REST API, an authenticated HTTP client with retry, and
//! the hierarchy core that discovers an issue's children from its three
//! relationship sources (inline subtasks, declared parent, Epic Link) and
//! expands them into a depth-bounded tree.

#![forbid(unsafe_code)]

pub mod client;
pub mod error;
pub mod tree;
pub mod types;

pub use client::{IssueApi, JiraClient};
pub use error::{Error, Result};
