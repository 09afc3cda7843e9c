//! Cursor motion smoothing.
//!
//! One-pole exponential low-pass between the previously emitted pointer
//! position and the new target:
//!
//! `final = prev + (target - prev) * smoothness`
//!
//! A smoothness of 1 follows the target instantly; values near 0 damp
//! per-frame jitter at the cost of lag.

use facemouse_landmark_model::ScreenPoint;
use serde::{Deserialize, Serialize};

/// Blend coefficient in `[MIN, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct SmoothingFactor(f64);

impl SmoothingFactor {
    /// Zero would freeze the cursor, so the factor never goes below this.
    pub const MIN: f64 = 0.05;
    pub const MAX: f64 = 1.0;

    /// Clamp `value` into range. NaN becomes the minimum.
    pub fn new(value: f64) -> Self {
        if value.is_nan() {
            return Self(Self::MIN);
        }
        Self(value.clamp(Self::MIN, Self::MAX))
    }

    /// From the slider scale, in tenths (`5` -> `0.5`).
    pub fn from_tenths(raw: u32) -> Self {
        Self::new(raw as f64 / 10.0)
    }

    pub fn get(self) -> f64 {
        self.0
    }
}

/// Advance one frame from `prev` toward `target`.
pub fn smooth_step(
    prev: ScreenPoint,
    target: ScreenPoint,
    factor: SmoothingFactor,
) -> ScreenPoint {
    let alpha = factor.get();
    if alpha >= SmoothingFactor::MAX {
        return target;
    }
    ScreenPoint::new(
        prev.x + (target.x - prev.x) * alpha,
        prev.y + (target.y - prev.y) * alpha,
    )
}
