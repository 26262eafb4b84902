//! Error types for depth-buffer handling

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DepthError {
    #[error("Depth buffer has an empty resolution ({width}x{height})")]
    EmptyResolution { width: u32, height: u32 },

    #[error("Depth buffer holds {actual} samples, resolution {width}x{height} needs {expected}")]
    ShapeMismatch {
        width: u32,
        height: u32,
        expected: usize,
        actual: usize,
    },
}

pub type Result<T> = std::result::Result<T, DepthError>;
