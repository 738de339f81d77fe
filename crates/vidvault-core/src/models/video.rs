use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter, Result as FmtResult};
use utoipa::ToSchema;

/// Numeric video identity. Zero means "not yet registered".
pub type VideoId = u64;

/// Video metadata as exchanged with clients.
///
/// A draft has `id == 0` and an empty `data_url`; the registry fills both exactly once.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct VideoMetadata {
    pub id: VideoId,
    pub title: String,
    /// Duration as supplied by the client; not interpreted by the server.
    pub duration: i64,
    pub content_type: String,
    pub data_url: String,
}

impl VideoMetadata {
    pub fn draft(title: impl Into<String>, duration: i64, content_type: impl Into<String>) -> Self {
        Self {
            id: 0,
            title: title.into(),
            duration,
            content_type: content_type.into(),
            data_url: String::new(),
        }
    }

    pub fn is_registered(&self) -> bool {
        self.id != 0
    }
}

/// Canonical location of a video's binary content: `<base>/video/<id>/data`.
pub fn video_data_url(base_url: &str, id: VideoId) -> String {
    format!("{}/video/{}/data", base_url.trim_end_matches('/'), id)
}

/// State reported to the uploading client.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "UPPERCASE")]
pub enum VideoState {
    Ready,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
pub struct VideoStatus {
    pub state: VideoState,
}

impl VideoStatus {
    pub fn ready() -> Self {
        Self {
            state: VideoState::Ready,
        }
    }
}

/// Lifecycle of a video's content: `Unregistered -> Registered -> Ready`.
///
/// There is no transition back out of `Ready`; a re-upload replaces content and stays `Ready`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ContentState {
    Unregistered,
    Registered,
    Ready,
}

impl Display for ContentState {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            ContentState::Unregistered => write!(f, "unregistered"),
            ContentState::Registered => write!(f, "registered"),
            ContentState::Ready => write!(f, "ready"),
        }
    }
}
