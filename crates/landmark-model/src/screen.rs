//! Screen geometry in physical pixels.

use serde::{Deserialize, Serialize};

/// Size of the controlled screen in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScreenSize {
    pub width: u32,
    pub height: u32,
}

/// A pointer position in screen pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ScreenPoint {
    pub x: f64,
    pub y: f64,
}

impl ScreenSize {
    /// Create a screen size. Zero dimensions are raised to one pixel.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width: width.max(1),
            height: height.max(1),
        }
    }

    pub fn width_f64(&self) -> f64 {
        self.width as f64
    }

    pub fn height_f64(&self) -> f64 {
        self.height as f64
    }

    pub fn center(&self) -> ScreenPoint {
        ScreenPoint::new(self.width_f64() / 2.0, self.height_f64() / 2.0)
    }

    /// Whether `point` lies inside `[0, width] x [0, height]`.
    pub fn contains(&self, point: ScreenPoint) -> bool {
        (0.0..=self.width_f64()).contains(&point.x) && (0.0..=self.height_f64()).contains(&point.y)
    }

    /// Clamp `point` into `[0, width] x [0, height]`. Non-finite coordinates
    /// fall back to the screen center on that axis.
    pub fn clamp(&self, point: ScreenPoint) -> ScreenPoint {
        let center = self.center();
        let x = if point.x.is_finite() { point.x } else { center.x };
        let y = if point.y.is_finite() { point.y } else { center.y };
        ScreenPoint::new(
            x.clamp(0.0, self.width_f64()),
            y.clamp(0.0, self.height_f64()),
        )
    }
}

impl Default for ScreenSize {
    fn default() -> Self {
        Self::new(1920, 1080)
    }
}

impl ScreenPoint {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Whole-pixel coordinates, rounded to nearest.
    pub fn rounded(&self) -> (i32, i32) {
        (self.x.round() as i32, self.y.round() as i32)
    }

    pub fn distance_to(&self, other: ScreenPoint) -> f64 {
        ((self.x - other.x).powi(2) + (self.y - other.y).powi(2)).sqrt()
    }
}
