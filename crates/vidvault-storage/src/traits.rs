//! Content store abstraction trait
//!
//! This module defines the ContentStore trait that all storage backends must implement.

use crate::StorageBackend;
use async_trait::async_trait;
use bytes::Bytes;
use futures::Stream;
use std::pin::Pin;
use thiserror::Error;
use tokio::io::{AsyncRead, AsyncWrite};
use vidvault_core::models::VideoId;
use vidvault_core::AppError;

/// Storage operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Upload failed: {0}")]
    UploadFailed(String),

    #[error("Download failed: {0}")]
    DownloadFailed(String),

    #[error("Content not found: {0}")]
    NotFound(String),

    #[error("Storage backend error: {0}")]
    BackendError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Stream of content chunks, as handed to an HTTP response body.
pub type ContentStream = Pin<Box<dyn Stream<Item = Result<Bytes, StorageError>> + Send>>;

impl From<StorageError> for AppError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::NotFound(msg) => AppError::NotFound(msg),
            StorageError::UploadFailed(msg)
            | StorageError::DownloadFailed(msg)
            | StorageError::BackendError(msg) => AppError::IoFailure(msg),
            StorageError::IoError(err) => AppError::IoFailure(err.to_string()),
            StorageError::ConfigError(msg) => AppError::Internal(msg),
        }
    }
}

/// Content store abstraction trait
///
/// Durable, id-addressed blob storage. Writes replace the whole object; a failed or abandoned
/// write leaves the previous content in place. Operations on different ids never wait on each
/// other.
#[async_trait]
pub trait ContentStore: Send + Sync {
    /// Consume `reader` to EOF and publish it as the content of `id`.
    ///
    /// Returns the number of bytes stored.
    async fn write_content(
        &self,
        id: VideoId,
        reader: &mut (dyn AsyncRead + Send + Unpin),
    ) -> StorageResult<u64>;

    /// Copy the full content of `id` into `sink`.
    ///
    /// Fails with `NotFound` if nothing was ever written for `id`.
    async fn read_content(
        &self,
        id: VideoId,
        sink: &mut (dyn AsyncWrite + Send + Unpin),
    ) -> StorageResult<u64>;

    /// Open the content of `id` as a chunk stream.
    ///
    /// The stream reflects the content published when it was opened, even if a newer upload
    /// completes while it is being consumed.
    async fn content_stream(&self, id: VideoId) -> StorageResult<ContentStream>;

    /// Whether any content has been published for `id`.
    async fn exists(&self, id: VideoId) -> StorageResult<bool>;

    /// Size in bytes of the published content of `id`.
    async fn content_length(&self, id: VideoId) -> StorageResult<u64>;

    /// Cheap probe used by the health endpoint.
    async fn health_check(&self) -> StorageResult<()>;

    /// Get the storage backend type
    fn backend_type(&self) -> StorageBackend;
}
