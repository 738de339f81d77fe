//! Vidvault Storage Library
//!
//! This crate provides the content store abstraction and its implementations.
//! Content is addressed solely by numeric video id; every backend replaces a video's
//! content as a whole object, so a reader sees either the previous or the new bytes.
//!
//! # Key format
//!
//! All backends derive the object key from the id via the `keys` module:
//! `videos/{id}.bin`.

pub mod factory;
pub(crate) mod keys;
#[cfg(feature = "storage-local")]
pub mod local;
#[cfg(feature = "storage-memory")]
pub mod memory;
pub mod traits;

// Re-export commonly used types
pub use factory::create_content_store;
#[cfg(feature = "storage-local")]
pub use local::LocalContentStore;
#[cfg(feature = "storage-memory")]
pub use memory::MemoryContentStore;
pub use traits::{ContentStore, ContentStream, StorageError, StorageResult};
pub use vidvault_core::StorageBackend;
