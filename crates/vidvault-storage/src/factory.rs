#[cfg(feature = "storage-local")]
use crate::LocalContentStore;
#[cfg(feature = "storage-memory")]
use crate::MemoryContentStore;
use crate::{ContentStore, StorageBackend, StorageError, StorageResult};
use std::sync::Arc;
use vidvault_core::Config;

/// Create a content store based on configuration
pub async fn create_content_store(config: &Config) -> StorageResult<Arc<dyn ContentStore>> {
    match config.storage_backend() {
        #[cfg(feature = "storage-local")]
        StorageBackend::Local => {
            let base_path = config.content_storage_path();
            if base_path.is_empty() {
                return Err(StorageError::ConfigError(
                    "CONTENT_STORAGE_PATH not configured".to_string(),
                ));
            }

            let store = LocalContentStore::new(base_path).await?;
            Ok(Arc::new(store))
        }

        #[cfg(not(feature = "storage-local"))]
        StorageBackend::Local => Err(StorageError::ConfigError(
            "Local storage backend not available (storage-local feature not enabled)".to_string(),
        )),

        #[cfg(feature = "storage-memory")]
        StorageBackend::Memory => {
            tracing::warn!("Using in-memory content store; uploads will not survive a restart");
            Ok(Arc::new(MemoryContentStore::new()))
        }

        #[cfg(not(feature = "storage-memory"))]
        StorageBackend::Memory => Err(StorageError::ConfigError(
            "Memory storage backend not available (storage-memory feature not enabled)"
                .to_string(),
        )),
    }
}
