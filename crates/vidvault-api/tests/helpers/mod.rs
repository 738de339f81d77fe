//! Test helpers: build AppState and router for integration tests.
//!
//! Run from workspace root: `cargo test -p vidvault-api`.

#![allow(dead_code)]

use axum_test::multipart::{MultipartForm, Part};
use axum_test::TestServer;
use std::sync::Arc;
use tempfile::TempDir;
use vidvault_api::setup::routes;
use vidvault_api::state::AppState;
use vidvault_core::{Config, StorageBackend};
use vidvault_registry::VideoRegistry;
use vidvault_storage::LocalContentStore;

pub const BASE_URL: &str = "http://videos.test:8080";

/// Test application: server plus the directory backing its content store.
pub struct TestApp {
    pub server: TestServer,
    pub state: Arc<AppState>,
    pub temp_dir: TempDir,
}

impl TestApp {
    pub fn client(&self) -> &TestServer {
        &self.server
    }
}

pub fn test_config(content_path: &str, max_upload_size_bytes: usize) -> Config {
    Config {
        server_port: 8080,
        environment: "test".to_string(),
        public_base_url: BASE_URL.to_string(),
        storage_backend: StorageBackend::Local,
        content_storage_path: content_path.to_string(),
        max_upload_size_bytes,
        cors_origins: vec!["*".to_string()],
        http_concurrency_limit: 64,
    }
}

/// Setup test app with a fresh registry and a local content store in a temp dir.
pub async fn setup_test_app() -> TestApp {
    setup_test_app_with_limit(1024 * 1024).await
}

pub async fn setup_test_app_with_limit(max_upload_size_bytes: usize) -> TestApp {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let config = test_config(
        temp_dir.path().to_str().expect("temp dir path is UTF-8"),
        max_upload_size_bytes,
    );

    let store = LocalContentStore::new(temp_dir.path())
        .await
        .expect("Failed to create local content store");
    let registry = VideoRegistry::new(config.public_base_url());
    let state = Arc::new(AppState::new(config.clone(), registry, Arc::new(store)));

    let router = routes::setup_routes(&config, state.clone()).expect("Failed to build routes");
    let server = TestServer::new(router).expect("Failed to start test server");

    TestApp {
        server,
        state,
        temp_dir,
    }
}

/// Multipart form carrying `bytes` in the `data` part.
pub fn data_form(bytes: Vec<u8>) -> MultipartForm {
    MultipartForm::new().add_part(
        "data",
        Part::bytes(bytes)
            .file_name("clip.mp4")
            .mime_type("video/mp4"),
    )
}
