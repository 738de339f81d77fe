use crate::error::{ErrorResponse, HttpAppError, ValidatedJson};
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    response::IntoResponse,
    Json,
};
use std::sync::Arc;
use vidvault_core::models::{VideoId, VideoMetadata};

#[utoipa::path(
    post,
    path = "/video",
    tag = "videos",
    request_body = VideoMetadata,
    responses(
        (status = 200, description = "Video registered or updated", body = VideoMetadata),
        (status = 400, description = "Invalid request body", body = ErrorResponse),
        (status = 409, description = "No video ids left to assign", body = ErrorResponse)
    )
)]
pub async fn add_video(
    State(state): State<Arc<AppState>>,
    ValidatedJson(video): ValidatedJson<VideoMetadata>,
) -> Result<impl IntoResponse, HttpAppError> {
    let video = state.registry.register(video).await?;
    Ok(Json(video))
}

#[utoipa::path(
    get,
    path = "/video",
    tag = "videos",
    responses(
        (status = 200, description = "All registered videos", body = Vec<VideoMetadata>)
    )
)]
pub async fn list_videos(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(state.registry.list().await)
}

#[utoipa::path(
    get,
    path = "/video/{id}",
    tag = "videos",
    params(
        ("id" = u64, Path, description = "Video ID")
    ),
    responses(
        (status = 200, description = "Video found", body = VideoMetadata),
        (status = 404, description = "Video not found", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state), fields(video_id = id, operation = "get_video"))]
pub async fn get_video(
    Path(id): Path<VideoId>,
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, HttpAppError> {
    let video = state.registry.lookup(id).await?;
    Ok(Json(video))
}
