//! Route paths and request parameter names shared by handlers, routes, and tests.

/// Collection path for video metadata.
pub const VIDEO_SVC_PATH: &str = "/video";

/// Path of a single video's metadata.
pub const VIDEO_PATH: &str = "/video/{id}";

/// Path used to upload and download a video's binary content.
pub const VIDEO_DATA_PATH: &str = "/video/{id}/data";

/// Multipart part that carries the uploaded bytes.
pub const DATA_PARAMETER: &str = "data";

/// Served OpenAPI document.
pub const OPENAPI_PATH: &str = "/api-docs/openapi.json";
