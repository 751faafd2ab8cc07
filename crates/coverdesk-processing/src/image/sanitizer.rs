//! Image sanitizer - decode and re-encode to a canonical format
//!
//! Only pixel data survives: metadata, trailers and any payload hidden in a
//! polyglot file are dropped by the round trip through `DynamicImage`.

use coverdesk_core::AppError;
use image::codecs::jpeg::JpegEncoder;
use image::{ColorType, DynamicImage, GenericImageView, ImageFormat, ImageReader};
use std::io::Cursor;

/// JPEG output quality
pub const JPEG_QUALITY: u8 = 90;

/// Formats a sanitized image can be stored in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CanonicalFormat {
    Png,
    Jpeg,
}

impl CanonicalFormat {
    pub fn content_type(&self) -> &'static str {
        match self {
            CanonicalFormat::Png => "image/png",
            CanonicalFormat::Jpeg => "image/jpeg",
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            CanonicalFormat::Png => "png",
            CanonicalFormat::Jpeg => "jpg",
        }
    }

    fn from_detected(format: Option<ImageFormat>) -> Option<Self> {
        match format {
            Some(ImageFormat::Png) => Some(CanonicalFormat::Png),
            Some(ImageFormat::Jpeg) => Some(CanonicalFormat::Jpeg),
            _ => None,
        }
    }
}

/// Re-encoded image bytes
#[derive(Debug, Clone)]
pub struct SanitizedImage {
    pub data: Vec<u8>,
    pub format: CanonicalFormat,
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ImageSanitizer;

impl ImageSanitizer {
    pub fn new() -> Self {
        ImageSanitizer
    }

    /// Decode `data` and re-encode it on the blocking pool.
    ///
    /// PNG stays PNG, JPEG becomes JPEG at [`JPEG_QUALITY`]. Anything else,
    /// or bytes that fail to decode, is `UnsupportedFormat`.
    pub async fn sanitize(&self, data: Vec<u8>) -> Result<SanitizedImage, AppError> {
        let input_len = data.len();
        let start = std::time::Instant::now();

        let sanitized = tokio::task::spawn_blocking(move || Self::sanitize_blocking(&data))
            .await
            .map_err(|e| AppError::Internal(format!("Image sanitize task failed: {}", e)))??;

        tracing::debug!(
            format = ?sanitized.format,
            width = sanitized.width,
            height = sanitized.height,
            input_bytes = input_len,
            output_bytes = sanitized.data.len(),
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Image sanitized"
        );

        Ok(sanitized)
    }

    /// Synchronous sanitize. Callers on the async runtime use [`Self::sanitize`].
    pub fn sanitize_blocking(data: &[u8]) -> Result<SanitizedImage, AppError> {
        let reader = ImageReader::new(Cursor::new(data))
            .with_guessed_format()
            .map_err(|e| AppError::UnsupportedFormat(format!("Unreadable image: {}", e)))?;

        let detected = reader.format();
        let format = CanonicalFormat::from_detected(detected).ok_or_else(|| {
            let name = detected
                .map(|f| format!("{:?}", f))
                .unwrap_or_else(|| "unknown".to_string());
            AppError::UnsupportedFormat(format!("Unsupported image format: {}", name))
        })?;

        let img = reader
            .decode()
            .map_err(|e| AppError::UnsupportedFormat(format!("Image could not be decoded: {}", e)))?;
        let (width, height) = img.dimensions();

        let data = match format {
            CanonicalFormat::Png => encode_png(&img)?,
            CanonicalFormat::Jpeg => encode_jpeg(img)?,
        };

        Ok(SanitizedImage {
            data,
            format,
            width,
            height,
        })
    }
}

fn encode_png(img: &DynamicImage) -> Result<Vec<u8>, AppError> {
    let mut buffer = Vec::new();
    img.write_to(&mut Cursor::new(&mut buffer), ImageFormat::Png)
        .map_err(|e| AppError::Internal(format!("PNG encode failed: {}", e)))?;
    Ok(buffer)
}

fn encode_jpeg(img: DynamicImage) -> Result<Vec<u8>, AppError> {
    // The JPEG encoder takes 8-bit gray or RGB only.
    let img = match img.color() {
        ColorType::L8 | ColorType::Rgb8 => img,
        _ => DynamicImage::ImageRgb8(img.to_rgb8()),
    };

    let mut buffer = Vec::new();
    let encoder = JpegEncoder::new_with_quality(&mut buffer, JPEG_QUALITY);
    img.write_with_encoder(encoder)
        .map_err(|e| AppError::Internal(format!("JPEG encode failed: {}", e)))?;
    Ok(buffer)
}
