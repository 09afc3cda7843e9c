//! Status values for an on-screen overlay.
//!
//! The controller only exposes text and numbers; drawing them is up to the
//! display side.

use std::fmt;

use facemouse_processing_core::InteractionState;
use serde::{Deserialize, Serialize};

use crate::params::ParameterSnapshot;

/// Usage hints shown under the status lines.
pub const HELP_LINES: [&str; 3] = [
    "Open mouth to make a click",
    "Show 5 fingers to toggle tracking",
    "Press Ctrl+C to quit",
];

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StatusLine {
    pub state: InteractionState,
    pub sensitivity: u32,
    /// Effective smoothing factor.
    pub smoothness: f64,
}

impl StatusLine {
    pub fn new(state: InteractionState, params: ParameterSnapshot) -> Self {
        Self {
            state,
            sensitivity: params.clamped().sensitivity,
            smoothness: params.smoothing().get(),
        }
    }

    pub fn tracking_text(&self) -> String {
        format!("Tracking: {}", self.state.label())
    }

    pub fn settings_text(&self) -> String {
        format!(
            "Sensitivity: {} | Smoothness: {:.2}",
            self.sensitivity, self.smoothness
        )
    }
}

impl fmt::Display for StatusLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} | {}", self.tracking_text(), self.settings_text())
    }
}
