//! relayd - minimal group-chat relay daemon.
//!
//! Clients connect over plain TCP, join named groups, and exchange
//! newline-delimited text; `/file` pushes a raw byte stream onto disk.

mod config;
mod files;
mod handlers;
mod network;
mod state;

use crate::config::Config;
use crate::network::Gateway;
use crate::state::Hub;
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .init();

    // Load configuration; a missing file means stock defaults.
    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "config.toml".to_string());

    let config = Config::load_or_default(&config_path).map_err(|e| {
        error!(path = %config_path, error = %e, "Failed to load config");
        e
    })?;
    let config = Arc::new(config);

    info!(
        listen = %config.server.listen,
        files_dir = %config.files.dir.display(),
        "Starting relayd"
    );

    let hub = Arc::new(Hub::new());
    let gateway = Gateway::bind(Arc::clone(&config), hub).await?;

    gateway.run().await
}
