use crate::keys;
use crate::traits::{ContentStore, ContentStream, StorageError, StorageResult};
use crate::StorageBackend;
use async_trait::async_trait;
use futures::StreamExt;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::{AsyncRead, AsyncWrite, AsyncWriteExt};
use vidvault_core::models::VideoId;

/// Removes an unpublished upload file when dropped, including when the upload future is
/// cancelled by a dropped connection.
struct TempFileGuard {
    path: Option<PathBuf>,
}

impl TempFileGuard {
    fn new(path: PathBuf) -> Self {
        Self { path: Some(path) }
    }

    fn disarm(&mut self) {
        self.path = None;
    }
}

impl Drop for TempFileGuard {
    fn drop(&mut self) {
        if let Some(path) = self.path.take() {
            if let Err(e) = std::fs::remove_file(&path) {
                if e.kind() != ErrorKind::NotFound {
                    tracing::warn!(
                        path = %path.display(),
                        error = %e,
                        "Failed to remove abandoned upload file"
                    );
                }
            }
        }
    }
}

/// Local filesystem content store
///
/// Uploads are streamed into a uniquely named temporary file next to the target, synced, and
/// then renamed over the target. Rename is atomic within a directory, so concurrent readers see
/// either the old file or the new one.
#[derive(Clone)]
pub struct LocalContentStore {
    base_path: PathBuf,
}

impl LocalContentStore {
    /// Create a new LocalContentStore instance
    ///
    /// # Arguments
    /// * `base_path` - Root directory for content (e.g., "/var/lib/vidvault")
    ///
    /// Leftover temporary files from a previous crash are removed.
    pub async fn new(base_path: impl Into<PathBuf>) -> StorageResult<Self> {
        let base_path = base_path.into();
        let content_dir = base_path.join(keys::CONTENT_PREFIX);

        fs::create_dir_all(&content_dir).await.map_err(|e| {
            StorageError::ConfigError(format!(
                "Failed to create storage directory {}: {}",
                content_dir.display(),
                e
            ))
        })?;

        let store = LocalContentStore { base_path };
        store.remove_stale_uploads(&content_dir).await?;
        Ok(store)
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    fn key_to_path(&self, storage_key: &str) -> PathBuf {
        self.base_path.join(storage_key)
    }

    async fn remove_stale_uploads(&self, content_dir: &Path) -> StorageResult<()> {
        let mut entries = fs::read_dir(content_dir).await?;
        let mut removed = 0usize;

        while let Some(entry) = entries.next_entry().await? {
            let name = entry.file_name();
            if name.to_string_lossy().ends_with(keys::TEMP_SUFFIX) {
                fs::remove_file(entry.path()).await?;
                removed += 1;
            }
        }

        if removed > 0 {
            tracing::info!(
                removed,
                dir = %content_dir.display(),
                "Removed stale upload files"
            );
        }
        Ok(())
    }
}

#[async_trait]
impl ContentStore for LocalContentStore {
    async fn write_content(
        &self,
        id: VideoId,
        reader: &mut (dyn AsyncRead + Send + Unpin),
    ) -> StorageResult<u64> {
        let key = keys::content_key(id);
        let path = self.key_to_path(&key);
        let temp_path = self.key_to_path(&keys::temp_key(id));
        let start = std::time::Instant::now();

        let mut file = fs::File::create(&temp_path).await.map_err(|e| {
            StorageError::UploadFailed(format!(
                "Failed to create file {}: {}",
                temp_path.display(),
                e
            ))
        })?;
        let mut guard = TempFileGuard::new(temp_path.clone());

        let bytes_copied = tokio::io::copy(reader, &mut file).await.map_err(|e| {
            StorageError::UploadFailed(format!(
                "Failed to write stream to file {}: {}",
                temp_path.display(),
                e
            ))
        })?;

        file.sync_all().await.map_err(|e| {
            StorageError::UploadFailed(format!(
                "Failed to sync file {}: {}",
                temp_path.display(),
                e
            ))
        })?;
        drop(file);

        fs::rename(&temp_path, &path).await.map_err(|e| {
            StorageError::UploadFailed(format!(
                "Failed to publish {} as {}: {}",
                temp_path.display(),
                path.display(),
                e
            ))
        })?;
        guard.disarm();

        tracing::info!(
            video_id = id,
            path = %path.display(),
            key = %key,
            size_bytes = bytes_copied,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Local content upload successful"
        );

        Ok(bytes_copied)
    }

    async fn read_content(
        &self,
        id: VideoId,
        sink: &mut (dyn AsyncWrite + Send + Unpin),
    ) -> StorageResult<u64> {
        let key = keys::content_key(id);
        let path = self.key_to_path(&key);
        let start = std::time::Instant::now();

        let mut file = fs::File::open(&path).await.map_err(|e| {
            if e.kind() == ErrorKind::NotFound {
                StorageError::NotFound(key.clone())
            } else {
                StorageError::DownloadFailed(format!(
                    "Failed to open file {}: {}",
                    path.display(),
                    e
                ))
            }
        })?;

        let bytes_copied = tokio::io::copy(&mut file, sink).await.map_err(|e| {
            StorageError::DownloadFailed(format!("Failed to copy {}: {}", path.display(), e))
        })?;
        sink.flush().await?;

        tracing::info!(
            video_id = id,
            path = %path.display(),
            key = %key,
            size_bytes = bytes_copied,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Local content download successful"
        );

        Ok(bytes_copied)
    }

    async fn content_stream(&self, id: VideoId) -> StorageResult<ContentStream> {
        let key = keys::content_key(id);
        let path = self.key_to_path(&key);
        let start = std::time::Instant::now();

        let file = fs::File::open(&path).await.map_err(|e| {
            if e.kind() == ErrorKind::NotFound {
                StorageError::NotFound(key.clone())
            } else {
                StorageError::DownloadFailed(format!(
                    "Failed to open file {}: {}",
                    path.display(),
                    e
                ))
            }
        })?;

        let reader = tokio_util::io::ReaderStream::new(file);

        let path_display = path.display().to_string();
        let stream = reader.map(move |result| {
            result.map_err(|e| {
                tracing::error!(
                    video_id = id,
                    path = %path_display,
                    key = %key,
                    duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                    error = %e,
                    "Local content stream error"
                );
                StorageError::DownloadFailed(format!("Failed to read chunk: {}", e))
            })
        });

        Ok(Box::pin(stream))
    }

    async fn exists(&self, id: VideoId) -> StorageResult<bool> {
        let path = self.key_to_path(&keys::content_key(id));
        Ok(fs::try_exists(&path).await?)
    }

    async fn content_length(&self, id: VideoId) -> StorageResult<u64> {
        let key = keys::content_key(id);
        let path = self.key_to_path(&key);
        match fs::metadata(&path).await {
            Ok(meta) => Ok(meta.len()),
            Err(e) if e.kind() == ErrorKind::NotFound => Err(StorageError::NotFound(key)),
            Err(e) => Err(StorageError::BackendError(e.to_string())),
        }
    }

    async fn health_check(&self) -> StorageResult<()> {
        let meta = fs::metadata(self.base_path.join(keys::CONTENT_PREFIX))
            .await
            .map_err(|e| StorageError::BackendError(e.to_string()))?;
        if !meta.is_dir() {
            return Err(StorageError::BackendError(format!(
                "{} is not a directory",
                self.base_path.display()
            )));
        }
        Ok(())
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::Local
    }
}

#[cfg(all(test, feature = "storage-local"))]
mod tests {
    use super::*;
    use bytes::Bytes;
    use std::io::Cursor;
    use tempfile::tempdir;
    use tokio_util::io::StreamReader;

    async fn read_all(store: &LocalContentStore, id: VideoId) -> StorageResult<Vec<u8>> {
        let mut sink = Vec::new();
        store.read_content(id, &mut sink).await?;
        Ok(sink)
    }

    fn temp_files(dir: &Path) -> Vec<String> {
        std::fs::read_dir(dir.join(keys::CONTENT_PREFIX))
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().to_string())
            .filter(|name| name.ends_with(keys::TEMP_SUFFIX))
            .collect()
    }

    #[tokio::test]
    async fn test_local_store_write_read() {
        let dir = tempdir().unwrap();
        let store = LocalContentStore::new(dir.path()).await.unwrap();

        let mut reader = Cursor::new(vec![0x01, 0x02, 0x03]);
        let written = store.write_content(1, &mut reader).await.unwrap();
        assert_eq!(written, 3);

        assert_eq!(read_all(&store, 1).await.unwrap(), vec![0x01, 0x02, 0x03]);
        assert_eq!(read_all(&store, 1).await.unwrap(), vec![0x01, 0x02, 0x03]);
        assert_eq!(store.content_length(1).await.unwrap(), 3);
        assert!(dir.path().join("videos/1.bin").exists());
    }

    #[tokio::test]
    async fn test_local_store_missing_content_is_not_found() {
        let dir = tempdir().unwrap();
        let store = LocalContentStore::new(dir.path()).await.unwrap();

        assert!(matches!(
            read_all(&store, 9).await,
            Err(StorageError::NotFound(_))
        ));
        assert!(matches!(
            store.content_stream(9).await,
            Err(StorageError::NotFound(_))
        ));
        assert!(matches!(
            store.content_length(9).await,
            Err(StorageError::NotFound(_))
        ));
        assert!(!store.exists(9).await.unwrap());
    }

    #[tokio::test]
    async fn test_local_store_upload_replaces_content() {
        let dir = tempdir().unwrap();
        let store = LocalContentStore::new(dir.path()).await.unwrap();

        store
            .write_content(1, &mut Cursor::new(b"first version, longer".to_vec()))
            .await
            .unwrap();
        store
            .write_content(1, &mut Cursor::new(b"second".to_vec()))
            .await
            .unwrap();

        assert_eq!(read_all(&store, 1).await.unwrap(), b"second".to_vec());
    }

    #[tokio::test]
    async fn test_failed_upload_keeps_previous_content() {
        let dir = tempdir().unwrap();
        let store = LocalContentStore::new(dir.path()).await.unwrap();

        store
            .write_content(1, &mut Cursor::new(b"original".to_vec()))
            .await
            .unwrap();

        let chunks: Vec<Result<Bytes, std::io::Error>> = vec![
            Ok(Bytes::from_static(b"partial ")),
            Err(std::io::Error::new(
                std::io::ErrorKind::ConnectionReset,
                "client went away",
            )),
        ];
        let mut broken = StreamReader::new(futures::stream::iter(chunks));

        let result = store.write_content(1, &mut broken).await;
        assert!(matches!(result, Err(StorageError::UploadFailed(_))));

        assert_eq!(read_all(&store, 1).await.unwrap(), b"original".to_vec());
        assert!(temp_files(dir.path()).is_empty());
    }

    #[tokio::test]
    async fn test_stream_keeps_snapshot_across_replace() {
        let dir = tempdir().unwrap();
        let store = LocalContentStore::new(dir.path()).await.unwrap();

        store
            .write_content(4, &mut Cursor::new(b"old bytes".to_vec()))
            .await
            .unwrap();
        let mut stream = store.content_stream(4).await.unwrap();

        store
            .write_content(4, &mut Cursor::new(b"new bytes!".to_vec()))
            .await
            .unwrap();

        let mut streamed = Vec::new();
        while let Some(chunk) = stream.next().await {
            streamed.extend_from_slice(&chunk.unwrap());
        }
        assert_eq!(streamed, b"old bytes".to_vec());
        assert_eq!(read_all(&store, 4).await.unwrap(), b"new bytes!".to_vec());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_uploads_same_id_publish_whole_objects() {
        let dir = tempdir().unwrap();
        let store = LocalContentStore::new(dir.path()).await.unwrap();

        let versions: Vec<Vec<u8>> = (0..8u8).map(|i| vec![i; 64 * 1024]).collect();
        let handles: Vec<_> = versions
            .iter()
            .cloned()
            .map(|data| {
                let store = store.clone();
                tokio::spawn(async move { store.write_content(2, &mut Cursor::new(data)).await })
            })
            .collect();

        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        let stored = read_all(&store, 2).await.unwrap();
        assert!(versions.contains(&stored));
        assert!(temp_files(dir.path()).is_empty());
    }

    #[tokio::test]
    async fn test_new_removes_stale_temp_files() {
        let dir = tempdir().unwrap();
        let content_dir = dir.path().join(keys::CONTENT_PREFIX);
        std::fs::create_dir_all(&content_dir).unwrap();
        std::fs::write(content_dir.join("3.bin.deadbeef.tmp"), b"junk").unwrap();
        std::fs::write(content_dir.join("3.bin"), b"kept").unwrap();

        let store = LocalContentStore::new(dir.path()).await.unwrap();

        assert!(temp_files(dir.path()).is_empty());
        assert_eq!(read_all(&store, 3).await.unwrap(), b"kept".to_vec());
        assert!(store.health_check().await.is_ok());
    }
}
