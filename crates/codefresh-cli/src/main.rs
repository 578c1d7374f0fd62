//! cli entrypoint for codefresh.

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod app;

/// log filter env var.
const LOG_ENV: &str = "CODEFRESH_LOG";

#[tokio::main]
async fn main() -> Result<()> {
    // logs go to stderr so plan/read output on stdout stays parseable
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn")))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();

    app::run(app::Cli::parse()).await
}
