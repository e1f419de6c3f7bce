//! Image file <-> [`PixelBuffer`] adapter on top of the `image` crate.
//!
//! - `decode`: open any supported format as 8-bit samples, keeping the
//!   channel layout (gray images get no channel axis).
//! - `encode`: write a buffer back out; format is chosen from the extension.
//!
//! Encrypted output must go to a lossless container. Saving to JPEG is
//! allowed but logged, since the re-encoded samples can no longer be
//! decrypted exactly.

use crate::buffer::PixelBuffer;
use crate::error::{PixcryptError, Result};
use image::{ColorType, DynamicImage, GrayImage, RgbImage, RgbaImage};
use log::{debug, warn};
use std::path::Path;

/// Extensions whose encoders discard sample information.
const LOSSY_EXTENSIONS: [&str; 2] = ["jpg", "jpeg"];

/// Decode an image file into a pixel buffer.
pub fn decode(path: &Path) -> Result<PixelBuffer> {
    let image = image::open(path)?;
    let buffer = from_dynamic(image)?;
    debug!("Decoded {} as {}", path.display(), buffer.shape());
    Ok(buffer)
}

/// True when `color` is stored as-is; anything else is converted on decode
/// and will not be written back in its original pixel format.
pub fn is_native_layout(color: ColorType) -> bool {
    matches!(color, ColorType::L8 | ColorType::Rgb8 | ColorType::Rgba8)
}

/// Convert a decoded image, normalizing to 8 bits per sample.
pub fn from_dynamic(image: DynamicImage) -> Result<PixelBuffer> {
    let height = image.height() as usize;
    let width = image.width() as usize;
    let color = image.color();
    if !is_native_layout(color) {
        warn!(
            "{:?} input is converted to 8-bit {}; output will not keep the original pixel format",
            color,
            if color.has_alpha() {
                "RGBA"
            } else if color.has_color() {
                "RGB"
            } else {
                "grayscale"
            }
        );
    }
    match image {
        DynamicImage::ImageLuma8(img) => PixelBuffer::new(height, width, None, img.into_raw()),
        DynamicImage::ImageRgb8(img) => PixelBuffer::new(height, width, Some(3), img.into_raw()),
        DynamicImage::ImageRgba8(img) => PixelBuffer::new(height, width, Some(4), img.into_raw()),
        other if other.color().has_alpha() => {
            PixelBuffer::new(height, width, Some(4), other.to_rgba8().into_raw())
        }
        other if other.color().has_color() => {
            PixelBuffer::new(height, width, Some(3), other.to_rgb8().into_raw())
        }
        other => PixelBuffer::new(height, width, None, other.to_luma8().into_raw()),
    }
}

/// Convert a pixel buffer back into an image.
pub fn to_dynamic(buffer: &PixelBuffer) -> Result<DynamicImage> {
    let width = u32::try_from(buffer.width())
        .map_err(|_| PixcryptError::InvalidBuffer("width exceeds u32".into()))?;
    let height = u32::try_from(buffer.height())
        .map_err(|_| PixcryptError::InvalidBuffer("height exceeds u32".into()))?;
    let samples = buffer.samples().to_vec();
    let size_error = || PixcryptError::InvalidBuffer(format!("cannot encode {}", buffer.shape()));

    let image = match buffer.channels() {
        None | Some(1) => {
            DynamicImage::ImageLuma8(GrayImage::from_raw(width, height, samples).ok_or_else(size_error)?)
        }
        Some(3) => {
            DynamicImage::ImageRgb8(RgbImage::from_raw(width, height, samples).ok_or_else(size_error)?)
        }
        Some(4) => {
            DynamicImage::ImageRgba8(RgbaImage::from_raw(width, height, samples).ok_or_else(size_error)?)
        }
        Some(c) => {
            return Err(PixcryptError::InvalidBuffer(format!(
                "unsupported channel count {}",
                c
            )))
        }
    };
    Ok(image)
}

/// Encode a pixel buffer to `path`, creating parent directories as needed.
pub fn encode(buffer: &PixelBuffer, path: &Path) -> Result<()> {
    if is_lossy(path) {
        warn!(
            "{} uses a lossy format; the image will not decrypt exactly",
            path.display()
        );
    }
    ensure_parent_dir(path)?;
    to_dynamic(buffer)?.save(path)?;
    debug!("Encoded {} to {}", buffer.shape(), path.display());
    Ok(())
}

/// True when `path`'s extension names a lossy container.
pub fn is_lossy(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| LOSSY_EXTENSIONS.contains(&e.to_lowercase().as_str()))
        .unwrap_or(false)
}

fn ensure_parent_dir(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}
