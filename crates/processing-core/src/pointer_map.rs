//! Nose position to screen target mapping.
//!
//! The normalized offset from the image center is scaled by the
//! sensitivity and clamped to `[-1, 1]`, so higher sensitivity reaches the
//! screen edge with a smaller head movement and the result never leaves
//! the screen.

use facemouse_landmark_model::{LandmarkPoint, ScreenPoint, ScreenSize};
use serde::{Deserialize, Serialize};

/// Pointer sensitivity, always within `[MIN, MAX]`.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct Sensitivity(f64);

impl Sensitivity {
    pub const MIN: f64 = 1.0;
    pub const MAX: f64 = 20.0;

    /// Clamp `value` into range. NaN becomes the minimum.
    pub fn new(value: f64) -> Self {
        if value.is_nan() {
            return Self(Self::MIN);
        }
        Self(value.clamp(Self::MIN, Self::MAX))
    }

    pub fn get(self) -> f64 {
        self.0
    }
}

impl From<u32> for Sensitivity {
    fn from(value: u32) -> Self {
        Self::new(value as f64)
    }
}

/// Signed offset from center for one normalized coordinate, in `[-1, 1]`.
pub fn axis_offset(normalized: f64, sensitivity: Sensitivity) -> f64 {
    ((normalized - 0.5) * 2.0 * sensitivity.get()).clamp(-1.0, 1.0)
}

/// Map a normalized nose position to an absolute screen target.
pub fn map_to_screen(
    nose: LandmarkPoint,
    sensitivity: Sensitivity,
    screen: ScreenSize,
) -> ScreenPoint {
    let nose = nose.clamped();
    let sx = axis_offset(nose.x, sensitivity);
    let sy = axis_offset(nose.y, sensitivity);
    ScreenPoint::new(
        (sx + 1.0) / 2.0 * screen.width_f64(),
        (sy + 1.0) / 2.0 * screen.height_f64(),
    )
}
