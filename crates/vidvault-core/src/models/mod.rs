pub mod video;

pub use video::{video_data_url, ContentState, VideoId, VideoMetadata, VideoState, VideoStatus};
