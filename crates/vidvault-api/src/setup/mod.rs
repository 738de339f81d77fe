//! Application setup and initialization
//!
//! This module contains all application initialization logic extracted from main.rs
//! so the same wiring can be driven from tests.

pub mod routes;
pub mod server;
pub mod storage;

use crate::state::AppState;
use anyhow::{Context, Result};
use std::sync::Arc;
use vidvault_core::Config;
use vidvault_registry::VideoRegistry;

/// Initialize the entire application
pub async fn initialize_app(config: Config) -> Result<(Arc<AppState>, axum::Router)> {
    // Validate configuration first - fail fast on misconfiguration
    config.validate().context("Configuration validation failed")?;

    crate::telemetry::init_telemetry(config.environment());

    tracing::info!(
        port = config.server_port(),
        public_base_url = %config.public_base_url(),
        "Configuration loaded and validated successfully"
    );

    let content_store = storage::setup_storage(&config).await?;
    let registry = VideoRegistry::new(config.public_base_url());

    let state = Arc::new(AppState::new(config.clone(), registry, content_store));

    let router = routes::setup_routes(&config, state.clone())?;

    Ok((state, router))
}
