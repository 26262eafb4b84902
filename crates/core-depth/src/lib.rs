//! Simlink Core Depth: depth-buffer post-processing
//!
//! # Overview
//!
//! A simulated depth sensor returns a flat buffer of normalized samples in
//! `[0, 1]` (0 = near clipping plane, 1 = nothing within range), delivered
//! bottom row first. This crate turns that buffer into a [`DepthImage`] and
//! fills background holes by growing foreground structures over them:
//!
//! 1. [`from_sensor`] validates the buffer shape and flips it upright.
//! 2. [`dilate`] slices the depth range into ten bands, grows each band with a
//!    square structuring element sized by a caller-supplied radius function,
//!    and composites the bands far-to-near so nearer structures win overlaps.
//!
//! No I/O happens here.
//!
//! # Example
//!
//! ```
//! use simlink_core_depth::{dilate, from_sensor};
//!
//! let mut samples = vec![1.0_f32; 16];
//! samples[5] = 0.05; // second row from the bottom
//! let image = from_sensor(4, 4, samples).unwrap();
//! assert_eq!(image.get_pixel(1, 2)[0], 0.05);
//!
//! let filled = dilate(&image, 5.0, |_depth_m| 1);
//! assert_eq!(filled.get_pixel(0, 1)[0], 0.05);
//! assert_eq!(filled.get_pixel(3, 0)[0], 1.0);
//! ```

pub mod dilate;
pub mod error;
pub mod radius;
pub mod sensor;

pub use dilate::{band_bounds, dilate, dilate_band, BAND_COUNT, FAR_SENTINEL};
pub use error::{DepthError, Result};
pub use radius::RadiusModel;
pub use sensor::{from_sensor, resize, DepthImage};
