/*!
 * Error types for Simlink
 */

use std::fmt;
use std::io;

use simlink_core_depth::DepthError;
use simlink_core_resilience::Recoverable;
use thiserror::Error;

use crate::remote::status::ErrorSet;

pub type Result<T> = std::result::Result<T, SimError>;

/// Exit code constants for structured process exit
pub const EXIT_SUCCESS: i32 = 0;
/// The simulator rejected a call or the session could not be established
pub const EXIT_REMOTE: i32 = 1;
pub const EXIT_FATAL: i32 = 2;

#[derive(Error, Debug)]
pub enum SimError {
    /// Remote call returned a nonzero status
    #[error("Remote call failed (code {code}): {}", describe_flags(.errors))]
    Remote { code: i32, errors: ErrorSet },

    /// Transport-level connection problem
    #[error("Connection error: {0}")]
    Connection(String),

    /// Depth operation on an object that is not a vision sensor
    #[error("Object '{0}' is not a depth sensor")]
    NotADepthSensor(String),

    /// Malformed depth buffer
    #[error("Depth buffer error: {0}")]
    Depth(#[from] DepthError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Image decoding/encoding error
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    /// Caller passed an unusable argument
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

impl SimError {
    /// Get the process exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            SimError::Remote { .. } | SimError::Connection(_) => EXIT_REMOTE,
            _ => EXIT_FATAL,
        }
    }

    /// Check if the failed call should be re-issued
    ///
    /// Only a decoded remote status with at least one flag and a
    /// transport-level connection problem qualify.
    pub fn is_recoverable(&self) -> bool {
        match self {
            SimError::Remote { errors, .. } => !errors.is_empty(),
            SimError::Connection(_) => true,
            _ => false,
        }
    }

    /// Get error category for logging
    pub fn category(&self) -> ErrorCategory {
        match self {
            SimError::Remote { .. } => ErrorCategory::Remote,
            SimError::Connection(_) => ErrorCategory::Connection,
            SimError::NotADepthSensor(_) | SimError::InvalidArgument(_) => {
                ErrorCategory::Validation
            }
            SimError::Depth(_) => ErrorCategory::Depth,
            SimError::Config(_) => ErrorCategory::Configuration,
            SimError::Io(_) => ErrorCategory::IoError,
            SimError::Image(_) => ErrorCategory::Image,
        }
    }
}

fn describe_flags(errors: &ErrorSet) -> String {
    if errors.is_empty() {
        "no known flags".to_string()
    } else {
        errors.to_string()
    }
}

impl Recoverable for SimError {
    fn is_recoverable(&self) -> bool {
        SimError::is_recoverable(self)
    }
}

impl From<serde_json::Error> for SimError {
    fn from(err: serde_json::Error) -> Self {
        SimError::Config(format!("JSON error: {}", err))
    }
}

/// Error category for classification and reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Nonzero remote status codes
    Remote,
    /// Transport/session problems
    Connection,
    /// Bad arguments or object kinds
    Validation,
    /// Depth buffer shape problems
    Depth,
    /// Configuration errors
    Configuration,
    /// I/O operation errors
    IoError,
    /// Image codec errors
    Image,
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorCategory::Remote => write!(f, "remote"),
            ErrorCategory::Connection => write!(f, "connection"),
            ErrorCategory::Validation => write!(f, "validation"),
            ErrorCategory::Depth => write!(f, "depth"),
            ErrorCategory::Configuration => write!(f, "configuration"),
            ErrorCategory::IoError => write!(f, "io"),
            ErrorCategory::Image => write!(f, "image"),
        }
    }
}
