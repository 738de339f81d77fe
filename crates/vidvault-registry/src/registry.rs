//! Video metadata registry

use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use vidvault_core::models::{video_data_url, VideoId, VideoMetadata};
use vidvault_core::{AppError, AppResult};

#[derive(Default)]
struct RegistryState {
    videos: HashMap<VideoId, VideoMetadata>,
    /// Highest id handed out or accepted so far.
    last_id: VideoId,
}

/// Registry of video metadata keyed by numeric id.
///
/// Cheap to clone; all clones share the same state. The id counter and the map live behind
/// one lock so "increment, derive URL, insert" happens in a single critical section.
#[derive(Clone)]
pub struct VideoRegistry {
    state: Arc<RwLock<RegistryState>>,
    base_url: Arc<str>,
}

impl VideoRegistry {
    /// Create an empty registry that derives data URLs from `base_url`.
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            state: Arc::new(RwLock::new(RegistryState::default())),
            base_url: Arc::from(base_url.trim_end_matches('/')),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Register a draft or upsert an existing record.
    ///
    /// A record with `id == 0` receives a fresh id and its data URL. A record with a non-zero
    /// id replaces whatever is stored under that id. The data URL is never taken from the
    /// client: an existing entry keeps its URL, a new entry gets one derived from its id.
    ///
    /// Fails with `Conflict` once the id space is exhausted; the counter never wraps to 0 and
    /// never reissues an id.
    pub async fn register(&self, mut video: VideoMetadata) -> AppResult<VideoMetadata> {
        let mut state = self.state.write().await;

        if video.id == 0 {
            let next_id = state.last_id.checked_add(1).ok_or_else(|| {
                tracing::error!(last_id = state.last_id, "Video id space exhausted");
                AppError::Conflict("No video ids left to assign".to_string())
            })?;
            state.last_id = next_id;
            video.id = next_id;
            video.data_url = video_data_url(&self.base_url, video.id);
            tracing::debug!(video_id = video.id, title = %video.title, "Registered new video");
        } else {
            // Keep minted ids clear of client-chosen ones.
            state.last_id = state.last_id.max(video.id);
            video.data_url = match state.videos.get(&video.id) {
                Some(existing) => existing.data_url.clone(),
                None => video_data_url(&self.base_url, video.id),
            };
            tracing::debug!(video_id = video.id, title = %video.title, "Updated video metadata");
        }

        state.videos.insert(video.id, video.clone());
        Ok(video)
    }

    /// Snapshot of every registered record, in no particular order.
    pub async fn list(&self) -> Vec<VideoMetadata> {
        let state = self.state.read().await;
        state.videos.values().cloned().collect()
    }

    pub async fn lookup(&self, id: VideoId) -> AppResult<VideoMetadata> {
        let state = self.state.read().await;
        state
            .videos
            .get(&id)
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("Video {} not found", id)))
    }

    pub async fn contains(&self, id: VideoId) -> bool {
        self.state.read().await.videos.contains_key(&id)
    }

    pub async fn len(&self) -> usize {
        self.state.read().await.videos.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    const BASE: &str = "http://localhost:8080";

    #[tokio::test]
    async fn test_register_assigns_id_and_url() {
        let registry = VideoRegistry::new(BASE);

        let video = registry
            .register(VideoMetadata::draft("a", 10, "video/mp4"))
            .await
            .unwrap();

        assert_eq!(video.id, 1);
        assert_eq!(video.data_url, "http://localhost:8080/video/1/data");
        assert_eq!(video.title, "a");
        assert_eq!(registry.lookup(1).await.unwrap(), video);
    }

    #[tokio::test]
    async fn test_base_url_trailing_slash_is_trimmed() {
        let registry = VideoRegistry::new("https://videos.example.com/");
        let video = registry.register(VideoMetadata::default()).await.unwrap();
        assert_eq!(video.data_url, "https://videos.example.com/video/1/data");
    }

    #[tokio::test]
    async fn test_update_keeps_id_and_url() {
        let registry = VideoRegistry::new(BASE);
        let original = registry
            .register(VideoMetadata::draft("first", 1, "video/mp4"))
            .await
            .unwrap();

        let mut update = original.clone();
        update.title = "renamed".to_string();
        update.data_url = "http://attacker.example/video/1/data".to_string();
        let updated = registry.register(update).await.unwrap();

        assert_eq!(updated.id, original.id);
        assert_eq!(updated.data_url, original.data_url);
        assert_eq!(updated.title, "renamed");
        assert_eq!(registry.len().await, 1);
        assert_eq!(registry.lookup(original.id).await.unwrap().title, "renamed");
    }

    #[tokio::test]
    async fn test_upsert_unknown_id_inserts_and_reserves_id() {
        let registry = VideoRegistry::new(BASE);

        let explicit = VideoMetadata {
            id: 5,
            ..VideoMetadata::draft("explicit", 0, "video/mp4")
        };
        let stored = registry.register(explicit).await.unwrap();
        assert_eq!(stored.id, 5);
        assert_eq!(stored.data_url, "http://localhost:8080/video/5/data");

        let fresh = registry
            .register(VideoMetadata::draft("next", 0, ""))
            .await
            .unwrap();
        assert_eq!(fresh.id, 6);
    }

    #[tokio::test]
    async fn test_lookup_unknown_is_not_found() {
        let registry = VideoRegistry::new(BASE);
        assert!(matches!(
            registry.lookup(2).await,
            Err(AppError::NotFound(_))
        ));
        assert!(!registry.contains(2).await);
        assert!(registry.is_empty().await);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_registrations_get_unique_ids() {
        let registry = VideoRegistry::new(BASE);

        let handles: Vec<_> = (0..200)
            .map(|i| {
                let registry = registry.clone();
                tokio::spawn(async move {
                    registry
                        .register(VideoMetadata::draft(format!("video-{}", i), i, "video/mp4"))
                        .await
                        .unwrap()
                })
            })
            .collect();

        let videos: Vec<VideoMetadata> = futures::future::join_all(handles)
            .await
            .into_iter()
            .map(|r| r.unwrap())
            .collect();

        let ids: HashSet<VideoId> = videos.iter().map(|v| v.id).collect();
        assert_eq!(ids.len(), 200);
        assert_eq!(ids, (1..=200).collect::<HashSet<_>>());

        for video in registry.list().await {
            assert_ne!(video.id, 0);
            assert_eq!(
                video.data_url,
                format!("http://localhost:8080/video/{}/data", video.id)
            );
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_two_concurrent_drafts_are_both_listed() {
        let registry = VideoRegistry::new(BASE);

        let (a, b) = tokio::join!(
            registry.register(VideoMetadata::draft("a", 0, "")),
            registry.register(VideoMetadata::draft("b", 0, ""))
        );

        let ids: HashSet<_> = [a.unwrap().id, b.unwrap().id].into_iter().collect();
        assert_eq!(ids, HashSet::from([1, 2]));

        let listed: HashSet<_> = registry.list().await.into_iter().map(|v| v.id).collect();
        assert_eq!(listed, ids);
    }

    #[tokio::test]
    async fn test_exhausted_id_space_never_wraps() {
        let registry = VideoRegistry::new(BASE);
        registry.register(VideoMetadata::draft("one", 0, "")).await.unwrap();

        let last = VideoMetadata {
            id: VideoId::MAX,
            ..VideoMetadata::draft("last", 0, "")
        };
        registry.register(last).await.unwrap();

        for _ in 0..2 {
            assert!(matches!(
                registry.register(VideoMetadata::default()).await,
                Err(AppError::Conflict(_))
            ));
        }

        assert!(!registry.contains(0).await);
        assert_eq!(registry.len().await, 2);
        assert_eq!(registry.lookup(1).await.unwrap().title, "one");
    }
}
