//! Image normalizer - shrink to a bounding box and re-encode as JPEG

use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::{GenericImageView, ImageReader};
use std::io::Cursor;

pub const JPEG_CONTENT_TYPE: &str = "image/jpeg";

#[derive(Debug, thiserror::Error)]
pub enum NormalizeError {
    #[error("Failed to decode image: {0}")]
    Decode(#[source] image::ImageError),

    #[error("Failed to encode JPEG: {0}")]
    Encode(#[source] image::ImageError),

    #[error("Image normalization task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

/// Re-encoded upload ready for storage.
#[derive(Debug, Clone)]
pub struct NormalizedImage {
    pub data: Vec<u8>,
    pub width: u32,
    pub height: u32,
    pub original_width: u32,
    pub original_height: u32,
}

impl NormalizedImage {
    pub fn content_type(&self) -> &'static str {
        JPEG_CONTENT_TYPE
    }

    pub fn was_resized(&self) -> bool {
        self.width != self.original_width || self.height != self.original_height
    }
}

/// Decodes any supported format, shrinks it so neither side exceeds
/// `max_dimension` and encodes the result as JPEG.
#[derive(Debug, Clone, Copy)]
pub struct ImageNormalizer {
    max_dimension: u32,
    jpeg_quality: u8,
}

impl ImageNormalizer {
    pub fn new(max_dimension: u32, jpeg_quality: u8) -> Self {
        Self {
            max_dimension: max_dimension.max(1),
            jpeg_quality: jpeg_quality.clamp(1, 100),
        }
    }

    pub fn max_dimension(&self) -> u32 {
        self.max_dimension
    }

    /// Size that fits inside the bounding box, never larger than the input.
    pub fn target_dimensions(&self, width: u32, height: u32) -> (u32, u32) {
        let longest = width.max(height);
        if longest <= self.max_dimension {
            return (width, height);
        }

        let scale = self.max_dimension as f64 / longest as f64;
        let scaled = |side: u32| ((side as f64 * scale).round() as u32).clamp(1, self.max_dimension);
        (scaled(width), scaled(height))
    }

    /// Synchronous normalization. Prefer [`ImageNormalizer::normalize`] from async code.
    pub fn normalize_blocking(&self, data: &[u8]) -> Result<NormalizedImage, NormalizeError> {
        let img = ImageReader::new(Cursor::new(data))
            .with_guessed_format()
            .map_err(|e| NormalizeError::Decode(image::ImageError::IoError(e)))?
            .decode()
            .map_err(NormalizeError::Decode)?;

        let (original_width, original_height) = img.dimensions();
        let (width, height) = self.target_dimensions(original_width, original_height);

        let img = if (width, height) != (original_width, original_height) {
            img.resize_exact(width, height, FilterType::CatmullRom)
        } else {
            img
        };

        // JPEG has no alpha channel
        let rgb = img.to_rgb8();
        let mut buffer = Vec::new();
        let encoder = JpegEncoder::new_with_quality(&mut buffer, self.jpeg_quality);
        rgb.write_with_encoder(encoder)
            .map_err(NormalizeError::Encode)?;

        tracing::debug!(
            original_width,
            original_height,
            width,
            height,
            input_bytes = data.len(),
            output_bytes = buffer.len(),
            "Image normalized"
        );

        Ok(NormalizedImage {
            data: buffer,
            width,
            height,
            original_width,
            original_height,
        })
    }

    /// Normalize on the blocking thread pool.
    pub async fn normalize(&self, data: Vec<u8>) -> Result<NormalizedImage, NormalizeError> {
        let normalizer = *self;
        tokio::task::spawn_blocking(move || normalizer.normalize_blocking(&data)).await?
    }
}
