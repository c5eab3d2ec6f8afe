//! Twig - a Jira CLI that renders issue hierarchies.
//!
//! This crate provides the command-line surface on top of the `twig-jira`
//! client: argument parsing, configuration management, and all output
//! formatting (ASCII trees, tables, JSON/YAML).

#![forbid(unsafe_code)]

pub mod cli;
pub mod config;
pub mod error;
pub mod output;
