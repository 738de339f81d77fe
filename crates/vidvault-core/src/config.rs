//! Configuration module
//!
//! This module provides the server configuration: listen port, the public base address used
//! to build video data URLs, content storage settings, and HTTP limits.

use std::env;

use crate::storage_types::StorageBackend;

const SERVER_PORT: u16 = 8080;
const MAX_UPLOAD_SIZE_MB: usize = 500;
const CONTENT_STORAGE_PATH: &str = "./data/videos";
const HTTP_CONCURRENCY_LIMIT: usize = 10_000;

/// Application configuration.
#[derive(Clone, Debug)]
pub struct Config {
    pub server_port: u16,
    pub environment: String,
    /// Externally visible base address (scheme, host, optional port) without a trailing slash.
    pub public_base_url: String,
    pub storage_backend: StorageBackend,
    pub content_storage_path: String,
    pub max_upload_size_bytes: usize,
    pub cors_origins: Vec<String>,
    pub http_concurrency_limit: usize,
}

/// Convert the configured upload limit from megabytes to bytes.
fn upload_size_bytes(megabytes: usize) -> Result<usize, anyhow::Error> {
    megabytes.checked_mul(1024 * 1024).ok_or_else(|| {
        anyhow::anyhow!(
            "MAX_UPLOAD_SIZE_MB must be at most {}",
            usize::MAX / (1024 * 1024)
        )
    })
}

impl Config {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();

        let environment = env::var("ENVIRONMENT")
            .or_else(|_| env::var("APP_ENV"))
            .unwrap_or_else(|_| "development".to_string());

        let server_port: u16 = env::var("PORT")
            .unwrap_or_else(|_| SERVER_PORT.to_string())
            .parse()
            .map_err(|_| anyhow::anyhow!("PORT must be a valid number"))?;

        let public_base_url = env::var("PUBLIC_BASE_URL")
            .unwrap_or_else(|_| format!("http://localhost:{}", server_port))
            .trim()
            .trim_end_matches('/')
            .to_string();

        let storage_backend = env::var("STORAGE_BACKEND")
            .ok()
            .map(|s| s.parse::<StorageBackend>())
            .transpose()?
            .unwrap_or(StorageBackend::Local);

        let max_upload_size_mb = env::var("MAX_UPLOAD_SIZE_MB")
            .unwrap_or_else(|_| MAX_UPLOAD_SIZE_MB.to_string())
            .parse::<usize>()
            .unwrap_or(MAX_UPLOAD_SIZE_MB);
        let max_upload_size_bytes = upload_size_bytes(max_upload_size_mb)?;

        let cors_origins = env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "*".to_string())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        Ok(Config {
            server_port,
            environment,
            public_base_url,
            storage_backend,
            content_storage_path: env::var("CONTENT_STORAGE_PATH")
                .unwrap_or_else(|_| CONTENT_STORAGE_PATH.to_string()),
            max_upload_size_bytes,
            cors_origins,
            http_concurrency_limit: env::var("HTTP_CONCURRENCY_LIMIT")
                .ok()
                .and_then(|s| s.parse::<usize>().ok())
                .unwrap_or(HTTP_CONCURRENCY_LIMIT)
                .max(1),
        })
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if !(self.public_base_url.starts_with("http://")
            || self.public_base_url.starts_with("https://"))
        {
            return Err(anyhow::anyhow!(
                "PUBLIC_BASE_URL must start with http:// or https://"
            ));
        }

        if self.public_base_url.ends_with('/') {
            return Err(anyhow::anyhow!(
                "PUBLIC_BASE_URL must not end with a trailing slash"
            ));
        }

        if self.storage_backend == StorageBackend::Local && self.content_storage_path.is_empty()
        {
            return Err(anyhow::anyhow!(
                "CONTENT_STORAGE_PATH is required for the local storage backend"
            ));
        }

        if self.max_upload_size_bytes == 0 {
            return Err(anyhow::anyhow!("MAX_UPLOAD_SIZE_MB must be greater than 0"));
        }

        if self.is_production() && self.cors_origins.iter().any(|o| o == "*") {
            return Err(anyhow::anyhow!(
                "CORS_ORIGINS cannot be '*' in production. Please specify explicit origins."
            ));
        }

        Ok(())
    }

    /// Check if the application is running in production mode
    pub fn is_production(&self) -> bool {
        let env = self.environment.to_lowercase();
        env == "production" || env == "prod"
    }

    // Convenience getters
    pub fn server_port(&self) -> u16 {
        self.server_port
    }

    pub fn environment(&self) -> &str {
        &self.environment
    }

    pub fn public_base_url(&self) -> &str {
        &self.public_base_url
    }

    pub fn storage_backend(&self) -> StorageBackend {
        self.storage_backend
    }

    pub fn content_storage_path(&self) -> &str {
        &self.content_storage_path
    }

    pub fn max_upload_size_bytes(&self) -> usize {
        self.max_upload_size_bytes
    }

    pub fn cors_origins(&self) -> &[String] {
        &self.cors_origins
    }

    pub fn http_concurrency_limit(&self) -> usize {
        self.http_concurrency_limit
    }
}
