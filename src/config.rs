/*!
 * Configuration types for Simlink
 */

use serde::{Deserialize, Serialize};
use std::num::NonZeroU32;
use std::path::{Path, PathBuf};

use simlink_core_depth::RadiusModel;
use simlink_core_resilience::RetryPolicy;

use crate::error::{Result, SimError};

/// Main configuration for a simulator session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Simulator host
    #[serde(default = "default_host")]
    pub host: String,

    /// Remote API port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Block in `start` until the server answers
    #[serde(default = "default_true")]
    pub wait_until_connected: bool,

    /// Do not let the transport reconnect on its own
    #[serde(default = "default_true")]
    pub do_not_reconnect: bool,

    /// Connection timeout passed verbatim to the server
    /// (negative: connection timeout in ms; positive: first-packet timeout)
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: i32,

    /// Communication thread cycle in milliseconds
    #[serde(default = "default_comm_cycle_ms")]
    pub comm_cycle_ms: i32,

    /// Maximum attempts per remote call (None = retry forever)
    #[serde(default)]
    pub retry_limit: Option<u32>,

    /// Resample depth buffers to this `[width, height]` (None = native)
    #[serde(default)]
    pub depth_resize: Option<[u32; 2]>,

    /// Depth dilation settings
    #[serde(default)]
    pub dilation: DilationConfig,

    /// Log level for diagnostic output
    #[serde(default)]
    pub log_level: LogLevel,

    /// Log file path (None = stderr)
    #[serde(default)]
    pub log_file: Option<PathBuf>,

    /// Enable verbose logging (shorthand for log_level = debug)
    #[serde(default)]
    pub verbose: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            wait_until_connected: true,
            do_not_reconnect: true,
            timeout_ms: default_timeout_ms(),
            comm_cycle_ms: default_comm_cycle_ms(),
            retry_limit: None,
            depth_resize: None,
            dilation: DilationConfig::default(),
            log_level: LogLevel::Info,
            log_file: None,
            verbose: false,
        }
    }
}

/// Depth dilation settings
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DilationConfig {
    /// Sensor far clipping distance in meters (normalized depth 1.0)
    #[serde(default = "default_max_depth")]
    pub max_depth_m: f32,

    /// Radius in pixels of a structure one meter away
    #[serde(default = "default_radius_scale")]
    pub radius_scale_px_m: f32,

    /// Largest radius in pixels
    #[serde(default = "default_radius_max")]
    pub radius_max_px: i32,
}

impl Default for DilationConfig {
    fn default() -> Self {
        Self {
            max_depth_m: default_max_depth(),
            radius_scale_px_m: default_radius_scale(),
            radius_max_px: default_radius_max(),
        }
    }
}

impl DilationConfig {
    pub fn radius_model(&self) -> RadiusModel {
        RadiusModel::new(self.radius_scale_px_m, self.radius_max_px)
    }
}

/// Log level for diagnostic output
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Only errors
    Error,

    /// Warnings and errors
    Warn,

    /// Info, warnings, and errors
    #[default]
    Info,

    /// Debug and above
    Debug,

    /// All messages including traces
    Trace,
}

impl LogLevel {
    /// Convert to tracing::Level
    pub fn to_tracing_level(&self) -> tracing::Level {
        match self {
            LogLevel::Error => tracing::Level::ERROR,
            LogLevel::Warn => tracing::Level::WARN,
            LogLevel::Info => tracing::Level::INFO,
            LogLevel::Debug => tracing::Level::DEBUG,
            LogLevel::Trace => tracing::Level::TRACE,
        }
    }
}

// Default value functions for serde
fn default_true() -> bool {
    true
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    19997
}

fn default_timeout_ms() -> i32 {
    -100
}

fn default_comm_cycle_ms() -> i32 {
    5
}

fn default_max_depth() -> f32 {
    5.0
}

fn default_radius_scale() -> f32 {
    4.0
}

fn default_radius_max() -> i32 {
    8
}

impl ClientConfig {
    /// Load configuration from a TOML file
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: ClientConfig = toml::from_str(&contents)
            .map_err(|e| SimError::Config(format!("{}: {}", path.display(), e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a TOML file
    pub fn to_file(&self, path: &Path) -> Result<()> {
        let contents = toml::to_string_pretty(self)
            .map_err(|e| SimError::Config(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    /// Reject settings no session could work with
    pub fn validate(&self) -> Result<()> {
        if self.port == 0 {
            return Err(SimError::Config("port must be nonzero".to_string()));
        }
        if self.retry_limit == Some(0) {
            return Err(SimError::Config(
                "retry_limit must be at least 1 (omit it to retry forever)".to_string(),
            ));
        }
        if let Some([width, height]) = self.depth_resize {
            if width == 0 || height == 0 {
                return Err(SimError::Config(format!(
                    "depth_resize must be nonzero, got {}x{}",
                    width, height
                )));
            }
        }
        if !(self.dilation.max_depth_m.is_finite() && self.dilation.max_depth_m > 0.0) {
            return Err(SimError::Config(format!(
                "dilation.max_depth_m must be positive, got {}",
                self.dilation.max_depth_m
            )));
        }
        Ok(())
    }

    /// Retry policy for remote calls
    pub fn retry_policy(&self) -> RetryPolicy {
        match self.retry_limit.and_then(NonZeroU32::new) {
            Some(attempts) => RetryPolicy::capped(attempts),
            None => RetryPolicy::unbounded(),
        }
    }
}
