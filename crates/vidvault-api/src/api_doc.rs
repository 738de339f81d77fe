//! OpenAPI documentation.

use utoipa::OpenApi;

use crate::error;
use crate::handlers;
use vidvault_core::models;

/// Returns the OpenAPI document served at [`crate::constants::OPENAPI_PATH`].
pub fn get_openapi_spec() -> utoipa::openapi::OpenApi {
    ApiDoc::openapi()
}

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Vidvault API",
        version = "0.1.0",
        description = "Video hosting API: register video metadata, then upload and download each video's binary content."
    ),
    paths(
        handlers::video_metadata::add_video,
        handlers::video_metadata::list_videos,
        handlers::video_metadata::get_video,
        handlers::video_data::upload_video_data,
        handlers::video_data::download_video_data,
    ),
    components(
        schemas(
            models::VideoMetadata,
            models::VideoStatus,
            models::VideoState,
            error::ErrorResponse,
        )
    ),
    tags(
        (name = "videos", description = "Video metadata and content")
    )
)]
pub struct ApiDoc;
