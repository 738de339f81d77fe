use crate::keys;
use crate::traits::{ContentStore, ContentStream, StorageError, StorageResult};
use crate::StorageBackend;
use async_trait::async_trait;
use bytes::Bytes;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::sync::RwLock;
use vidvault_core::models::VideoId;

/// In-process content store.
///
/// Not durable: content disappears with the process. Uploads are buffered completely before the
/// map entry is swapped, so the lock is only held for the swap itself.
#[derive(Clone, Default)]
pub struct MemoryContentStore {
    objects: Arc<RwLock<HashMap<VideoId, Bytes>>>,
}

impl MemoryContentStore {
    pub fn new() -> Self {
        Self::default()
    }

    async fn get(&self, id: VideoId) -> StorageResult<Bytes> {
        self.objects
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or_else(|| StorageError::NotFound(keys::content_key(id)))
    }
}

#[async_trait]
impl ContentStore for MemoryContentStore {
    async fn write_content(
        &self,
        id: VideoId,
        reader: &mut (dyn AsyncRead + Send + Unpin),
    ) -> StorageResult<u64> {
        let mut buffer = Vec::new();
        reader
            .read_to_end(&mut buffer)
            .await
            .map_err(|e| StorageError::UploadFailed(format!("Failed to read upload: {}", e)))?;

        let size = buffer.len() as u64;
        self.objects.write().await.insert(id, Bytes::from(buffer));

        tracing::debug!(
            video_id = id,
            key = %keys::content_key(id),
            size_bytes = size,
            "Memory content upload successful"
        );
        Ok(size)
    }

    async fn read_content(
        &self,
        id: VideoId,
        sink: &mut (dyn AsyncWrite + Send + Unpin),
    ) -> StorageResult<u64> {
        let data = self.get(id).await?;
        sink.write_all(&data)
            .await
            .map_err(|e| StorageError::DownloadFailed(format!("Failed to write sink: {}", e)))?;
        sink.flush().await?;
        Ok(data.len() as u64)
    }

    async fn content_stream(&self, id: VideoId) -> StorageResult<ContentStream> {
        let data = self.get(id).await?;
        Ok(Box::pin(futures::stream::once(async move {
            Ok::<_, StorageError>(data)
        })))
    }

    async fn exists(&self, id: VideoId) -> StorageResult<bool> {
        Ok(self.objects.read().await.contains_key(&id))
    }

    async fn content_length(&self, id: VideoId) -> StorageResult<u64> {
        Ok(self.get(id).await?.len() as u64)
    }

    async fn health_check(&self) -> StorageResult<()> {
        Ok(())
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::Memory
    }
}
