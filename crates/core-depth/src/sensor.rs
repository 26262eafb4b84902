//! Sensor buffer to image conversion

use image::imageops::{self, FilterType};
use image::{ImageBuffer, Luma};

use crate::error::{DepthError, Result};

/// Row-major grid of normalized depth samples, origin at the top-left
pub type DepthImage = ImageBuffer<Luma<f32>, Vec<f32>>;

/// Build an upright depth image from a raw sensor buffer
///
/// The sensor delivers rows bottom-up, so the rows are flipped.
pub fn from_sensor(width: u32, height: u32, samples: Vec<f32>) -> Result<DepthImage> {
    if width == 0 || height == 0 {
        return Err(DepthError::EmptyResolution { width, height });
    }

    let expected = (width as usize)
        .checked_mul(height as usize)
        .ok_or(DepthError::ShapeMismatch {
            width,
            height,
            expected: usize::MAX,
            actual: samples.len(),
        })?;
    let actual = samples.len();
    if actual != expected {
        return Err(DepthError::ShapeMismatch {
            width,
            height,
            expected,
            actual,
        });
    }

    let mut image = DepthImage::from_raw(width, height, samples).ok_or(DepthError::ShapeMismatch {
        width,
        height,
        expected,
        actual,
    })?;
    imageops::flip_vertical_in_place(&mut image);
    Ok(image)
}

/// Resample a depth image to a new resolution (bilinear)
pub fn resize(image: &DepthImage, width: u32, height: u32) -> DepthImage {
    if image.dimensions() == (width, height) {
        return image.clone();
    }
    imageops::resize(image, width, height, FilterType::Triangle)
}
