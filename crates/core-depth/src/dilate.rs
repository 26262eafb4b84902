//! Band-wise grayscale dilation
//!
//! Plain grayscale dilation lets the largest sample win every overlap, and in
//! a normalized depth buffer the largest sample is the farthest one. To keep
//! background from bleeding over foreground, the depth range is cut into
//! [`BAND_COUNT`] bands that are dilated separately and composited from the
//! farthest band to the nearest, so the nearest claim on a pixel is written
//! last.

use image::Luma;

use crate::sensor::DepthImage;

/// Number of equal-width depth bands
pub const BAND_COUNT: u32 = 10;

/// Accumulator value for pixels no band reaches ("nothing in range")
pub const FAR_SENTINEL: f32 = 1.0;

/// Bounds `(lower, upper]` of band `k`, where band 0 is the farthest
///
/// Band `k` covers `((9 - k) / 10, (10 - k) / 10]`.
pub fn band_bounds(k: u32) -> (f32, f32) {
    let k = k.min(BAND_COUNT - 1);
    let lower = (BAND_COUNT - 1 - k) as f32 / BAND_COUNT as f32;
    let upper = (BAND_COUNT - k) as f32 / BAND_COUNT as f32;
    (lower, upper)
}

/// Fill holes in a depth image by growing each depth band
///
/// For every band, far to near, the pixels inside `(lower, upper]` are dilated
/// with a flat square element of side `2 * radius_fn(lower * max_depth)` and
/// written over the accumulator wherever the result is nonzero. The
/// accumulator starts at [`FAR_SENTINEL`]; samples that are exactly zero
/// belong to no band and keep their zero unless a band grows over them.
pub fn dilate<F>(image: &DepthImage, max_depth: f32, radius_fn: F) -> DepthImage
where
    F: Fn(f32) -> i32,
{
    let mut acc = DepthImage::from_fn(image.width(), image.height(), |x, y| {
        if image.get_pixel(x, y)[0] == 0.0 {
            Luma([0.0])
        } else {
            Luma([FAR_SENTINEL])
        }
    });

    for k in 0..BAND_COUNT {
        let (lower, upper) = band_bounds(k);
        let side = radius_fn(lower * max_depth).saturating_mul(2);
        let grown = dilate_band(image, lower, upper, side);

        let mut claimed = 0usize;
        for (dst, src) in acc.pixels_mut().zip(grown.pixels()) {
            if src[0] != 0.0 {
                *dst = *src;
                claimed += 1;
            }
        }

        tracing::trace!(band = k, lower, upper, side, claimed, "merged depth band");
    }

    acc
}

/// Mask one depth band and dilate it
///
/// Pixels outside `(lower, upper]` are zeroed before a flat square dilation
/// of side `side`. A non-positive side leaves the masked band as it is.
pub fn dilate_band(image: &DepthImage, lower: f32, upper: f32, side: i32) -> DepthImage {
    let masked = DepthImage::from_fn(image.width(), image.height(), |x, y| {
        let v = image.get_pixel(x, y)[0];
        if v > lower && v <= upper {
            Luma([v])
        } else {
            Luma([0.0])
        }
    });

    square_dilate(&masked, side)
}

/// Flat square dilation; element of side `s` spans offsets `-s/2 ..= s/2`
fn square_dilate(image: &DepthImage, side: i32) -> DepthImage {
    if side <= 0 {
        return image.clone();
    }
    let reach = (side / 2) as u32;
    if reach == 0 || image.width() == 0 || image.height() == 0 {
        return image.clone();
    }

    // separable: a square maximum is a row maximum followed by a column maximum
    let rows = DepthImage::from_fn(image.width(), image.height(), |x, y| {
        let lo = x.saturating_sub(reach);
        let hi = x.saturating_add(reach).min(image.width() - 1);
        Luma([(lo..=hi)
            .map(|xx| image.get_pixel(xx, y)[0])
            .fold(f32::NEG_INFINITY, f32::max)])
    });

    DepthImage::from_fn(image.width(), image.height(), |x, y| {
        let lo = y.saturating_sub(reach);
        let hi = y.saturating_add(reach).min(image.height() - 1);
        Luma([(lo..=hi)
            .map(|yy| rows.get_pixel(x, yy)[0])
            .fold(f32::NEG_INFINITY, f32::max)])
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn uniform(width: u32, height: u32, value: f32) -> DepthImage {
        DepthImage::from_pixel(width, height, Luma([value]))
    }

    fn nonzero(image: &DepthImage) -> usize {
        image.pixels().filter(|p| p[0] != 0.0).count()
    }

    #[test]
    fn test_band_bounds_far_to_near() {
        assert_eq!(band_bounds(0), (0.9, 1.0));
        assert_eq!(band_bounds(1), (0.8, 0.9));
        assert_eq!(band_bounds(9), (0.0, 0.1));
    }

    #[test]
    fn test_end_to_end_single_near_pixel() {
        let mut image = uniform(4, 4, 1.0);
        image.put_pixel(1, 1, Luma([0.05]));

        let out = dilate(&image, 5.0, |_| 1);

        for (x, y, p) in out.enumerate_pixels() {
            if x <= 2 && y <= 2 {
                assert_eq!(p[0], 0.05, "pixel ({}, {})", x, y);
            } else {
                assert_eq!(p[0], 1.0, "pixel ({}, {})", x, y);
            }
        }
    }

    #[test]
    fn test_neighborhood_clipped_at_corner() {
        let mut image = uniform(4, 4, 1.0);
        image.put_pixel(0, 0, Luma([0.05]));

        let out = dilate(&image, 5.0, |_| 1);

        let near = out.pixels().filter(|p| p[0] == 0.05).count();
        assert_eq!(near, 4);
        assert_eq!(out.get_pixel(1, 1)[0], 0.05);
        assert_eq!(out.get_pixel(2, 0)[0], 1.0);
    }

    #[test]
    fn test_near_wins_over_far_background() {
        let mut image = uniform(7, 7, 0.95);
        image.put_pixel(3, 3, Luma([0.05]));

        let out = dilate(&image, 5.0, |_| 2);

        // ring within reach of the near pixel is taken by the near band
        for y in 1..=5 {
            for x in 1..=5 {
                assert_eq!(out.get_pixel(x, y)[0], 0.05);
            }
        }
        assert_eq!(out.get_pixel(0, 0)[0], 0.95);
        assert_eq!(out.get_pixel(6, 3)[0], 0.95);
    }

    #[test]
    fn test_uniform_images_unchanged() {
        let ones = uniform(5, 3, 1.0);
        assert_eq!(dilate(&ones, 5.0, |_| 3), ones);

        let zeros = uniform(5, 3, 0.0);
        assert_eq!(dilate(&zeros, 5.0, |_| 3), zeros);
    }

    #[test]
    fn test_empty_bands_leave_sentinel() {
        let mut image = uniform(3, 3, 0.0);
        image.put_pixel(0, 0, Luma([0.5]));

        let out = dilate(&image, 5.0, |_| 0);

        assert_eq!(out.get_pixel(0, 0)[0], 0.5);
        assert_eq!(out.get_pixel(2, 2)[0], 0.0);
    }

    #[test]
    fn test_hole_filled_from_neighbor() {
        let mut image = uniform(5, 1, 0.35);
        image.put_pixel(2, 0, Luma([1.0]));

        let out = dilate(&image, 5.0, |_| 1);

        assert_eq!(out.get_pixel(2, 0)[0], 0.35);
    }

    #[test]
    fn test_non_positive_side_is_identity() {
        let mut image = uniform(4, 4, 0.0);
        image.put_pixel(2, 2, Luma([0.45]));

        for side in [0, -2, i32::MIN] {
            let out = dilate_band(&image, 0.4, 0.5, side);
            assert_eq!(out, image);
        }

        let out = dilate(&image, 5.0, |_| -3);
        assert_eq!(out.get_pixel(2, 2)[0], 0.45);
        assert_eq!(nonzero(&out), 1);
        assert_eq!(out.get_pixel(1, 1)[0], 0.0);
    }

    #[test]
    fn test_band_mask_is_half_open() {
        let image = DepthImage::from_raw(3, 1, vec![0.4, 0.45, 0.5]).unwrap();
        let out = dilate_band(&image, 0.4, 0.5, 0);
        assert_eq!(out.get_pixel(0, 0)[0], 0.0);
        assert_eq!(out.get_pixel(1, 0)[0], 0.45);
        assert_eq!(out.get_pixel(2, 0)[0], 0.5);
    }

    #[test]
    fn test_band_growth_monotonic_in_radius() {
        let mut image = uniform(16, 16, 1.0);
        image.put_pixel(4, 4, Luma([0.25]));
        image.put_pixel(11, 9, Luma([0.28]));

        let mut previous = 0;
        for radius in 0..6 {
            let count = nonzero(&dilate_band(&image, 0.2, 0.3, 2 * radius));
            assert!(count >= previous, "radius {} shrank the band", radius);
            previous = count;
        }
        assert_eq!(nonzero(&dilate_band(&image, 0.2, 0.3, 0)), 2);
        assert_eq!(nonzero(&dilate_band(&image, 0.2, 0.3, 2)), 18);
    }

    #[test]
    fn test_radius_evaluated_at_band_near_edge() {
        use std::cell::RefCell;

        let seen = RefCell::new(Vec::new());
        let image = uniform(2, 2, 0.5);
        dilate(&image, 10.0, |d| {
            seen.borrow_mut().push(d);
            0
        });

        let seen = seen.into_inner();
        assert_eq!(seen.len(), BAND_COUNT as usize);
        assert!((seen[0] - 9.0).abs() < 1e-5);
        assert!((seen[9] - 0.0).abs() < 1e-5);
    }
}
