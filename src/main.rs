//! taskboard - HTTP Server Entry Point
//!
//! Starts the HTTP server that exposes the task API.

use taskboard::{api, config::Config};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "taskboard=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;
    info!(
        "Loaded configuration: environment={}, database={}",
        config.environment, config.database_url
    );

    // The store is opened on first use, so a bad DATABASE_URL shows up as
    // 500s on task routes rather than a failed start.
    api::serve(config).await?;

    Ok(())
}
