//! Pure image transform: decode, resize to the fixed thumbnail size, encode
//!
//! The 128x128 output deliberately ignores the source aspect ratio (a
//! non-uniform scale). Existing consumers depend on the exact dimensions, so
//! this is kept for compatibility.

use std::io::Cursor;

use bytes::Bytes;
use image::{imageops::FilterType, DynamicImage, ImageOutputFormat};
use thiserror::Error;

/// Thumbnail width in pixels
pub const THUMBNAIL_WIDTH: u32 = 128;
/// Thumbnail height in pixels
pub const THUMBNAIL_HEIGHT: u32 = 128;

/// JPEG quality for encoded thumbnails
const JPEG_QUALITY: u8 = 75;

/// Result type for transform operations
pub type TransformResult<T> = Result<T, TransformError>;

/// Errors raised by the image transform
///
/// All variants are data-validity errors on the input bytes; the transform
/// has no failure modes tied to external state.
#[derive(Error, Debug)]
pub enum TransformError {
    /// Input bytes are not a recognized or intact image
    #[error("Failed to decode image: {0}")]
    Decode(#[source] image::ImageError),

    /// JPEG serialization failed
    #[error("Failed to encode thumbnail: {0}")]
    Encode(#[source] image::ImageError),
}

/// Decodes an image, auto-detecting the source format from its content
///
/// # Errors
///
/// Returns `TransformError::Decode` if the bytes are not a recognized image
/// format or are truncated/corrupt
pub fn decode(bytes: &[u8]) -> TransformResult<DynamicImage> {
    image::load_from_memory(bytes).map_err(TransformError::Decode)
}

/// Resizes to the fixed thumbnail dimensions with a Lanczos3 filter
///
/// Aspect ratio is not preserved.
#[must_use]
pub fn resize(image: &DynamicImage) -> DynamicImage {
    image.resize_exact(THUMBNAIL_WIDTH, THUMBNAIL_HEIGHT, FilterType::Lanczos3)
}

/// Encodes a bitmap as JPEG at the default quality
///
/// # Errors
///
/// Returns `TransformError::Encode` on serialization faults (practically
/// unreachable for valid bitmaps)
pub fn encode(image: &DynamicImage) -> TransformResult<Bytes> {
    let mut buf = Vec::new();
    image
        .write_to(
            &mut Cursor::new(&mut buf),
            ImageOutputFormat::Jpeg(JPEG_QUALITY),
        )
        .map_err(TransformError::Encode)?;

    Ok(Bytes::from(buf))
}

/// Produces an encoded thumbnail from raw source bytes
///
/// CPU-bound; async callers should run this under `spawn_blocking`.
///
/// # Errors
///
/// Returns `TransformError::Decode` or `TransformError::Encode`
pub fn generate(bytes: &[u8]) -> TransformResult<Bytes> {
    let image = decode(bytes)?;
    let thumbnail = resize(&image);
    encode(&thumbnail)
}
