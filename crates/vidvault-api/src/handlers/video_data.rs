//! Upload and download of a video's binary content.
//!
//! Both directions stream: the multipart part is piped into the content store as it arrives and
//! downloads are served straight from the store's byte stream.

use crate::constants::DATA_PARAMETER;
use crate::error::{multipart_app_error, ErrorResponse, HttpAppError};
use crate::state::AppState;
use axum::{
    body::Body,
    extract::{Multipart, Path, State},
    http::{header, HeaderValue},
    response::{IntoResponse, Response},
    Json,
};
use futures::StreamExt;
use std::sync::{Arc, OnceLock};
use tokio_util::io::StreamReader;
use vidvault_core::models::{VideoId, VideoStatus};
use vidvault_core::AppError;

const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";
const VIDEO_MIME_PREFIX: &str = "video/";

#[utoipa::path(
    post,
    path = "/video/{id}/data",
    tag = "videos",
    params(
        ("id" = u64, Path, description = "Video ID")
    ),
    request_body(content = inline(Object), content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Content stored", body = VideoStatus),
        (status = 400, description = "Malformed multipart body or missing data part", body = ErrorResponse),
        (status = 404, description = "Video not found", body = ErrorResponse),
        (status = 413, description = "Upload too large", body = ErrorResponse),
        (status = 500, description = "Storage failure; previous content unchanged", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, multipart), fields(video_id = id, operation = "upload_video_data"))]
pub async fn upload_video_data(
    Path(id): Path<VideoId>,
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<Json<VideoStatus>, HttpAppError> {
    // Unknown ids are rejected before any part is read.
    state.videos.ensure_registered(id).await?;

    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some(DATA_PARAMETER) {
            continue;
        }

        let body_error = OnceLock::<AppError>::new();
        let result = {
            let chunks = field.map(|chunk| {
                chunk.map_err(|e| {
                    let _ = body_error.set(multipart_app_error(&e));
                    std::io::Error::other(e.body_text())
                })
            });
            let reader = StreamReader::new(chunks);
            let mut reader = std::pin::pin!(reader);
            state.videos.upload(id, &mut reader).await
        };

        return match (result, body_error.into_inner()) {
            (Ok(status), _) => Ok(Json(status)),
            // The request body broke, not the store.
            (Err(_), Some(client_error)) => Err(client_error.into()),
            (Err(e), None) => Err(e.into()),
        };
    }

    Err(AppError::BadRequest(format!("Missing multipart part '{}'", DATA_PARAMETER)).into())
}

#[utoipa::path(
    get,
    path = "/video/{id}/data",
    tag = "videos",
    params(
        ("id" = u64, Path, description = "Video ID")
    ),
    responses(
        (status = 200, description = "Raw video bytes", content_type = "application/octet-stream"),
        (status = 404, description = "Video or content not found", body = ErrorResponse),
        (status = 500, description = "Storage failure", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state), fields(video_id = id, operation = "download_video_data"))]
pub async fn download_video_data(
    Path(id): Path<VideoId>,
    State(state): State<Arc<AppState>>,
) -> Result<Response, HttpAppError> {
    let (video, stream) = state.videos.open(id).await?;

    let headers = [
        (header::CONTENT_TYPE, download_content_type(&video.content_type)),
        (
            header::X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        ),
    ];

    Ok((headers, Body::from_stream(stream)).into_response())
}

/// Content type served for a download. Only `video/*` types registered by the client are
/// echoed back; anything else is served as opaque bytes.
fn download_content_type(registered: &str) -> HeaderValue {
    let registered = registered.trim();
    let is_video = registered
        .get(..VIDEO_MIME_PREFIX.len())
        .is_some_and(|prefix| prefix.eq_ignore_ascii_case(VIDEO_MIME_PREFIX));

    if !is_video {
        return HeaderValue::from_static(DEFAULT_CONTENT_TYPE);
    }
    HeaderValue::from_str(registered)
        .unwrap_or_else(|_| HeaderValue::from_static(DEFAULT_CONTENT_TYPE))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_video_content_types_are_kept() {
        assert_eq!(download_content_type("video/mp4"), "video/mp4");
        assert_eq!(download_content_type(" Video/WebM "), "Video/WebM");
    }

    #[test]
    fn test_other_content_types_fall_back_to_octet_stream() {
        for registered in ["", "text/html", "image/svg+xml", "application/javascript", "vid"] {
            assert_eq!(download_content_type(registered), DEFAULT_CONTENT_TYPE);
        }
        assert_eq!(
            download_content_type("video/mp4\r\nSet-Cookie: a=b"),
            DEFAULT_CONTENT_TYPE
        );
    }
}
