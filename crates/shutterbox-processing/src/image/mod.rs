//! Image processing module

pub mod normalizer;

pub use normalizer::{ImageNormalizer, NormalizeError, NormalizedImage, JPEG_CONTENT_TYPE};
