/*!
 * Simlink - client convenience layer over a simulator remote API
 *
 * - Typed decoding of remote return codes into error flags
 * - Retry-until-success discipline around every object call
 * - Scene object access (pose, velocity, duplication, dummies)
 * - Depth-buffer fetch with band-wise dilation to fill background holes
 */

pub mod client;
pub mod config;
pub mod depth_io;
pub mod error;
pub mod logging;
pub mod object;
pub mod remote;

// Re-export commonly used types
pub use client::SimClient;
pub use config::{ClientConfig, DilationConfig, LogLevel};
pub use error::{Result, SimError};
pub use object::{DepthFrame, ObjectKind, SimObject, Spherical};
pub use remote::{decode, ErrorFlag, ErrorSet, ObjectHandle, RemoteApi};
pub use simlink_core_depth::{dilate, DepthImage, RadiusModel};
pub use simlink_core_resilience::RetryPolicy;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
