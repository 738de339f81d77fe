pub mod video_content;

pub use video_content::VideoContentService;
