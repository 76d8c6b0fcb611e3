//! Layer configuration.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration for an SSM layer stack.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SsmConfig {
    /// State dimension N of each channel's system
    #[serde(default = "default_d_state")]
    pub d_state: usize,
    /// Number of independent channels
    #[serde(default = "default_channels")]
    pub channels: usize,
    /// Minimum step size for log-uniform init
    #[serde(default = "default_dt_min")]
    pub dt_min: f64,
    /// Maximum step size for log-uniform init
    #[serde(default = "default_dt_max")]
    pub dt_max: f64,
    /// Whether the convolutional path goes through the FFT
    #[serde(default = "default_use_fft")]
    pub use_fft: bool,
}

fn default_d_state() -> usize { 8 }
fn default_channels() -> usize { 1 }
fn default_dt_min() -> f64 { 0.001 }
fn default_dt_max() -> f64 { 0.1 }
fn default_use_fft() -> bool { true }

impl Default for SsmConfig {
    fn default() -> Self {
        Self {
            d_state: default_d_state(),
            channels: default_channels(),
            dt_min: default_dt_min(),
            dt_max: default_dt_max(),
            use_fft: default_use_fft(),
        }
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
}

impl SsmConfig {
    /// Parse a configuration from JSON; absent fields fall back to their
    /// defaults.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }
}
