/*!
 * Depth image files
 *
 * Depth maps on disk are grayscale PNGs whose full intensity range maps to
 * normalized depth `[0, 1]`. Output is always 16-bit.
 */

use std::path::Path;

use image::{ImageBuffer, Luma};
use simlink_core_depth::DepthImage;

use crate::error::Result;

/// Load any grayscale-convertible image as normalized depth
pub fn load_depth(path: &Path) -> Result<DepthImage> {
    let image = image::open(path)?;
    Ok(image.to_luma32f())
}

/// Save normalized depth as a 16-bit grayscale PNG
pub fn save_depth(image: &DepthImage, path: &Path) -> Result<()> {
    let encoded: ImageBuffer<Luma<u16>, Vec<u16>> =
        ImageBuffer::from_fn(image.width(), image.height(), |x, y| {
            let v = image.get_pixel(x, y)[0].clamp(0.0, 1.0);
            Luma([(v * u16::MAX as f32).round() as u16])
        });
    encoded.save_with_format(path, image::ImageFormat::Png)?;
    Ok(())
}
