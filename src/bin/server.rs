//! Record viewer HTTP server
//!
//! Serves `/?csv=<locator>&id=<identifier>` pages. Settings come from the
//! environment (or a `.env` file); see `record_viewer::config`.

use anyhow::Result;
use record_viewer::config::ViewerConfig;
use record_viewer::server::{serve, AppState};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenv::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = ViewerConfig::from_env()?;
    info!("Starting record viewer on http://{}", config.bind_addr);

    let state = Arc::new(AppState::from_config(config)?);
    serve(state).await?;

    Ok(())
}
