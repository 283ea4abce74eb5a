//! Loading the image to approximate.
use std::path::Path;

use image::imageops::FilterType;
use image::{DynamicImage, ImageReader};
use tracing::info;

use crate::buffer::PixelBuffer;
use crate::error::{Error, Result};

/// Decodes `path` and, if `height` is given, resizes it to that height with
/// the aspect ratio kept.
pub fn load(path: &Path, height: Option<u32>) -> Result<PixelBuffer> {
    let image = ImageReader::open(path)?.with_guessed_format()?.decode()?;
    info!(path = %path.display(), width = image.width(), height = image.height(), "loaded source");

    prepare(image, height)
}

pub fn prepare(image: DynamicImage, height: Option<u32>) -> Result<PixelBuffer> {
    if image.width() == 0 || image.height() == 0 {
        return Err(Error::EmptyImage);
    }

    let image = match height {
        Some(height) if height != image.height() => {
            let aspect = image.width() as f32 / image.height() as f32;
            let width = ((height as f32 * aspect).round() as u32).max(1);
            image.resize_exact(width, height.max(1), FilterType::Triangle)
        }
        _ => image,
    };

    Ok(image.into_rgba8().into())
}
