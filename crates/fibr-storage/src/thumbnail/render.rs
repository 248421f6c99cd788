//! Preview rendering: decode, center-crop fill, encode.

use std::io::Cursor;

use image::imageops::FilterType;
use image::{DynamicImage, ImageFormat};

use fibr_core::error::{AppError, ErrorKind};
use fibr_core::result::AppResult;

/// Produces square preview bytes from source image bytes.
///
/// Rendering is CPU-bound; callers run it on a blocking thread.
pub trait PreviewRenderer: Send + Sync + std::fmt::Debug + 'static {
    /// Render `source` into a `size`×`size` preview encoded as `format`.
    fn render(&self, source: &[u8], format: ImageFormat, size: u32) -> AppResult<Vec<u8>>;
}

/// Renderer backed by the `image` crate.
#[derive(Debug, Clone, Copy, Default)]
pub struct ImageRenderer;

impl PreviewRenderer for ImageRenderer {
    fn render(&self, source: &[u8], format: ImageFormat, size: u32) -> AppResult<Vec<u8>> {
        let img = image::load_from_memory(source).map_err(|e| {
            AppError::with_source(ErrorKind::Internal, "Failed to decode image", e)
        })?;

        let filled = img.resize_to_fill(size, size, FilterType::Triangle);
        let encodable = match format {
            ImageFormat::Jpeg => DynamicImage::ImageRgb8(filled.to_rgb8()),
            ImageFormat::Gif => DynamicImage::ImageRgba8(filled.to_rgba8()),
            _ => filled,
        };

        let mut buf = Vec::new();
        encodable
            .write_to(&mut Cursor::new(&mut buf), format)
            .map_err(|e| {
                AppError::with_source(ErrorKind::Internal, "Failed to encode thumbnail", e)
            })?;

        Ok(buf)
    }
}
