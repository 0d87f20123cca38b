//! # Custody Node
//!
//! Entry point: load configuration, install the log subscriber, run the
//! node until Ctrl+C.

use anyhow::{Context, Result};
use custody_node::container::NodeConfig;
use custody_node::NodeRuntime;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Configuration first: it carries the log filter
    let config = NodeConfig::load().context("Failed to load configuration")?;

    // Initialize logging
    let filter = EnvFilter::try_new(&config.log_filter)
        .with_context(|| format!("Invalid log filter: {}", config.log_filter))?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(true)
        .try_init()
        .map_err(|e| anyhow::anyhow!(e))
        .context("Failed to install log subscriber")?;

    // Create and start the node runtime
    let mut runtime = NodeRuntime::new(config)?;
    runtime.start().await?;

    // Keep the node running
    info!("Node is running. Press Ctrl+C to stop.");
    tokio::signal::ctrl_c()
        .await
        .context("Failed to listen for Ctrl+C")?;

    // Graceful shutdown
    let logged = runtime.shutdown().await;
    info!(logged, "Node stopped");

    Ok(())
}
