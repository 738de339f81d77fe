//! Vidvault API Library
//!
//! This crate provides the HTTP handlers, application state, and setup for the video
//! hosting server.

mod api_doc;
pub mod constants;
mod handlers;
pub mod services;
pub mod setup;
mod telemetry;

// Public modules
pub mod error;
pub mod state;

// Re-exports
pub use error::{ErrorResponse, HttpAppError};
pub use services::VideoContentService;
pub use state::AppState;
