//! Error types for twig CLI operations.

use std::io;
use thiserror::Error;

/// The error type for twig CLI operations.
#[derive(Debug, Error)]
pub enum Error {
    /// IO error occurred.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),
}

/// A specialized Result type for twig operations.
pub type Result<T> = std::result::Result<T, Error>;
