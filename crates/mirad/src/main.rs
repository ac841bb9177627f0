//! Mira daemon - emotion-aware interview assistant.
//!
//! Classifies the dominant emotion in a candidate's face image and picks a
//! follow-up interview question, never repeating one within a session.

use anyhow::Result;
use mirad::config::MiraConfig;
use mirad::server::{self, AppState};
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    info!("Mira daemon v{} starting", env!("CARGO_PKG_VERSION"));

    let config = MiraConfig::load();
    let bind = config.server.bind.clone();
    let state = Arc::new(AppState::new(config)?);

    // The daemon serves without a model; analysis retries the load per call.
    match state.try_load_model().await {
        Ok(()) => info!("Emotion model ready"),
        Err(e) => warn!("Could not load emotion model: {} - continuing startup", e),
    }

    server::run(state, &bind).await
}
