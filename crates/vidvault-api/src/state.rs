//! Application state shared by all handlers.
//!
//! Built once at startup and handed to the router as `Arc<AppState>`; there is no global
//! registry or lazily created store.

use crate::services::VideoContentService;
use std::sync::Arc;
use vidvault_core::Config;
use vidvault_registry::VideoRegistry;
use vidvault_storage::ContentStore;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub registry: VideoRegistry,
    pub content_store: Arc<dyn ContentStore>,
    pub videos: VideoContentService,
}

impl AppState {
    pub fn new(config: Config, registry: VideoRegistry, content_store: Arc<dyn ContentStore>) -> Self {
        let videos = VideoContentService::new(registry.clone(), content_store.clone());
        Self {
            config,
            registry,
            content_store,
            videos,
        }
    }
}
