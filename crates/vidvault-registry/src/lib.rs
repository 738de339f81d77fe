//! Vidvault Registry Library
//!
//! In-memory authority for video identity and metadata. The registry mints ids, derives
//! data URLs, and answers existence checks for the content path. Nothing here is persisted;
//! a restart starts from an empty registry.

pub mod registry;

pub use registry::VideoRegistry;
