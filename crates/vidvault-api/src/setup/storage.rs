//! Storage setup and initialization

use anyhow::Result;
use std::sync::Arc;
use vidvault_core::Config;
use vidvault_storage::{create_content_store, ContentStore};

pub async fn setup_storage(config: &Config) -> Result<Arc<dyn ContentStore>> {
    tracing::info!("Initializing content store...");
    let store = create_content_store(config).await?;
    tracing::info!(
        backend = %store.backend_type(),
        path = %config.content_storage_path(),
        "Content store initialized successfully"
    );
    Ok(store)
}
