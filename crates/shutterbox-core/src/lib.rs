//! Shutterbox Core Library
//!
//! This crate provides the configuration, error types and domain models
//! shared by the storage, processing and API crates.

pub mod config;
pub mod error;
pub mod models;
pub mod storage_types;

// Re-export commonly used types
pub use config::{ApprovalMode, Config, SecretString, CONFIG_PATH_ENV, DEFAULT_CONFIG_PATH};
pub use error::{AppError, ErrorMetadata, LogLevel};
pub use models::{LastModified, PhotoObject, TagSet};
pub use storage_types::StorageBackend;
