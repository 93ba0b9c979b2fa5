//! Shutterbox Processing Library
//!
//! Upload validation and image normalization. Every accepted upload is
//! decoded, shrunk to fit a bounding box and re-encoded as JPEG before it
//! reaches storage.

pub mod image;
pub mod validator;

pub use crate::image::{ImageNormalizer, NormalizeError, NormalizedImage, JPEG_CONTENT_TYPE};
pub use validator::{UploadValidator, ValidatedUpload, ValidationError};
