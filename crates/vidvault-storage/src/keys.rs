//! Shared key generation for content store backends.
//!
//! Key format: `videos/{id}.bin`. Temporary upload keys append a unique suffix so concurrent
//! uploads for the same id never write to the same file.

use uuid::Uuid;
use vidvault_core::models::VideoId;

pub const CONTENT_PREFIX: &str = "videos";
pub const TEMP_SUFFIX: &str = ".tmp";

/// Storage key for the published content of a video.
pub fn content_key(id: VideoId) -> String {
    format!("{}/{}.bin", CONTENT_PREFIX, id)
}

/// Unique storage key for an in-flight upload of `id`.
pub fn temp_key(id: VideoId) -> String {
    format!(
        "{}/{}.bin.{}{}",
        CONTENT_PREFIX,
        id,
        Uuid::new_v4().simple(),
        TEMP_SUFFIX
    )
}
