//! Worldpop API Server
//!
//! Run with: cargo run --bin worldpop-api
//!
//! # Configuration
//!
//! Read from the first of `$CONFIG_DIR/worldpop/config.toml`,
//! `/etc/worldpop/config.toml` or `./config.toml`, or from `WORLDPOP_CONFIG`
//! when set. Environment variables override the file:
//! - `WORLDPOP_DATASET_PATH`: Source CSV (default: data/gapminder_sample.csv)
//! - `WORLDPOP_SELECTION_POLICY`: strict or permissive (default: strict)
//! - `WORLDPOP_API_HOST`: Host to bind to (default: 0.0.0.0)
//! - `WORLDPOP_API_PORT`: Port to listen on (default: 8050)
//! - `WORLDPOP_LOG_LEVEL`, `WORLDPOP_LOG_FORMAT`: Logging
//! - `RUST_LOG`: Overrides the log level filter entirely

use anyhow::Context;
use std::path::PathBuf;
use std::sync::Arc;
use worldpop::api::{serve, AppState};
use worldpop::config::Config;
use worldpop::logging::init_logging;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = match std::env::var("WORLDPOP_CONFIG") {
        Ok(path) => Config::load_with_env(&PathBuf::from(path))?,
        Err(_) => Config::load_default(),
    };

    init_logging(&config.logging);

    tracing::info!("Starting Worldpop API server v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!("Dataset: {:?}", config.dataset.path);
    tracing::info!("Selection policy: {:?}", config.dataset.selection_policy);

    // The dataset is loaded once; the server does not start without it
    let controller = worldpop::load_controller(&config)
        .with_context(|| format!("Failed to load dataset {:?}", config.dataset.path))?;

    let state = AppState::new(Arc::new(controller), config.dashboard, config.api);
    serve(state).await?;

    tracing::info!("Worldpop API server stopped");
    Ok(())
}
