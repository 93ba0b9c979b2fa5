//! Shutterbox API Library
//!
//! This crate provides the HTTP handlers, basic-auth middleware, approval
//! strategies and application setup for the photo gateway.

mod handlers;
pub mod services;
pub mod setup;
mod telemetry;
mod toast;

// Public modules
pub mod auth;
pub mod error;
pub mod state;

// Re-exports
pub use error::HttpAppError;
pub use services::approval::{ApprovalStrategy, RenameApprovalStrategy, TagApprovalStrategy};
pub use telemetry::init_telemetry;
pub use toast::UploadToast;
