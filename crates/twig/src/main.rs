//! Twig CLI binary.

use anyhow::Result;
use tracing_subscriber::EnvFilter;
use twig::cli::Cli;

/// Main entry point for the twig CLI.
///
/// Uses tokio's current_thread runtime: every Jira call blocks the single
/// thread before the next one is issued, which keeps query ordering
/// strictly sequential and deterministic.
#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // Initialize tracing subscriber
    // Can be controlled via RUST_LOG environment variable
    // Example: RUST_LOG=twig=debug,twig_jira=trace twig tree PROJ-1
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("twig=info,twig_jira=info")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    tracing::debug!("Starting twig CLI");

    let cli = Cli::parse_args();
    cli.execute().await?;

    tracing::debug!("Twig CLI completed successfully");
    Ok(())
}
