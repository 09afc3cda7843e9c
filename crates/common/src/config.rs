//! Application configuration.
//!
//! Facemouse keeps no settings between runs: configuration is built from
//! these defaults and overridden by command-line flags.

use serde::{Deserialize, Serialize};

use crate::error::{FacemouseError, FacemouseResult};

/// Global application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct AppConfig {
    /// Gesture and frame-loop behaviour.
    pub controller: ControllerConfig,

    /// Initial values of the live-adjustable parameters.
    pub parameters: ParameterDefaults,

    /// Logging configuration.
    pub logging: LoggingConfig,
}

/// Gesture and frame-loop behaviour.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ControllerConfig {
    /// Lip gap (pixels of frame height) above which the mouth counts as open.
    pub mouth_open_threshold_px: u32,

    /// Whether landmarks come from a horizontally mirrored image.
    /// Decides the direction of the thumb-extension test.
    pub mirrored: bool,

    /// Clear a gesture latch when its landmarks disappear, instead of
    /// freezing it until they come back.
    pub reset_latches_on_absence: bool,

    /// Whether pointer tracking is enabled when the loop starts.
    pub start_tracking: bool,

    /// Consecutive capture failures tolerated before the loop stops.
    /// Zero stops on the first failure.
    pub max_capture_retries: u32,
}

/// Initial parameter values, in slider units.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ParameterDefaults {
    /// Pointer sensitivity, 1..=20.
    pub sensitivity: u32,

    /// Smoothness in tenths, 0..=20 (5 = 0.5).
    pub smoothness_raw: u32,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "facemouse_controller=trace,warn").
    pub level: String,

    /// Whether to output structured JSON logs.
    pub json: bool,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            mouth_open_threshold_px: 15,
            mirrored: true,
            reset_latches_on_absence: true,
            start_tracking: true,
            max_capture_retries: 0,
        }
    }
}

impl Default for ParameterDefaults {
    fn default() -> Self {
        Self {
            sensitivity: 5,
            smoothness_raw: 5,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

impl AppConfig {
    /// Reject settings the controller cannot work with.
    ///
    /// Out-of-range parameter values are not rejected here; they are clamped
    /// when read each frame.
    pub fn validate(&self) -> FacemouseResult<()> {
        if self.controller.mouth_open_threshold_px == 0 {
            return Err(FacemouseError::config(
                "mouth_open_threshold_px must be at least 1",
            ));
        }
        if self.logging.level.trim().is_empty() {
            return Err(FacemouseError::config("logging level must not be empty"));
        }
        Ok(())
    }
}
