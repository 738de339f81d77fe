//! Video content service
//!
//! Couples the registry and the content store for the upload and download paths. The registry
//! is consulted only for the short existence check; the transfer itself runs without holding
//! any registry lock.

use std::sync::Arc;
use tokio::io::{AsyncRead, AsyncWrite};
use vidvault_core::models::{ContentState, VideoId, VideoMetadata, VideoStatus};
use vidvault_core::{AppError, AppResult};
use vidvault_registry::VideoRegistry;
use vidvault_storage::{ContentStore, ContentStream};

#[derive(Clone)]
pub struct VideoContentService {
    registry: VideoRegistry,
    store: Arc<dyn ContentStore>,
}

impl VideoContentService {
    pub fn new(registry: VideoRegistry, store: Arc<dyn ContentStore>) -> Self {
        Self { registry, store }
    }

    /// Fail with `NotFound` unless `id` is registered.
    pub async fn ensure_registered(&self, id: VideoId) -> AppResult<VideoMetadata> {
        self.registry.lookup(id).await
    }

    /// Store the bytes of `reader` as the content of a registered video.
    ///
    /// Unknown ids are rejected before a single byte is read.
    pub async fn upload(
        &self,
        id: VideoId,
        reader: &mut (dyn AsyncRead + Send + Unpin),
    ) -> AppResult<VideoStatus> {
        self.ensure_registered(id).await?;

        let size = self.store.write_content(id, reader).await.map_err(|e| {
            tracing::error!(error = %e, video_id = id, "Video content upload failed");
            AppError::from(e)
        })?;

        tracing::info!(video_id = id, size_bytes = size, "Video content ready");
        Ok(VideoStatus::ready())
    }

    /// Copy the content of a registered video into `sink`.
    pub async fn download(
        &self,
        id: VideoId,
        sink: &mut (dyn AsyncWrite + Send + Unpin),
    ) -> AppResult<u64> {
        self.ensure_registered(id).await?;
        Ok(self.store.read_content(id, sink).await?)
    }

    /// Open the content of a registered video for streaming into a response.
    pub async fn open(&self, id: VideoId) -> AppResult<(VideoMetadata, ContentStream)> {
        let video = self.ensure_registered(id).await?;
        let stream = self.store.content_stream(id).await?;
        Ok((video, stream))
    }

    pub async fn content_state(&self, id: VideoId) -> AppResult<ContentState> {
        if !self.registry.contains(id).await {
            return Ok(ContentState::Unregistered);
        }
        if self.store.exists(id).await? {
            Ok(ContentState::Ready)
        } else {
            Ok(ContentState::Registered)
        }
    }
}
