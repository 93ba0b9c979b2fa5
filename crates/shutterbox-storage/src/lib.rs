//! Shutterbox Storage Library
//!
//! This crate provides the storage abstraction for the photo bucket: the
//! [`Storage`] trait with S3 and in-memory implementations, and the
//! [`PhotoBucket`] facade the web handlers talk to.
//!
//! # Storage key format
//!
//! Uploads live under a configurable prefix (`upload/{filename}` by default).
//! The approved photo in rename mode lives at a single well-known key
//! (`latest` by default).

pub mod bucket;
pub mod factory;
pub mod memory;
#[cfg(feature = "storage-s3")]
pub mod s3;
pub mod traits;

// Re-export commonly used types
pub use bucket::{ListQuery, PhotoBucket, TagFilter};
pub use factory::create_storage;
pub use memory::MemoryStorage;
#[cfg(feature = "storage-s3")]
pub use s3::{S3Credentials, S3Storage};
pub use shutterbox_core::StorageBackend;
pub use traits::{ObjectPage, Storage, StorageError, StorageResult};
