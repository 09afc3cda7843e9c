//! Facemouse Landmark Model
//!
//! Defines the data contracts shared by the control loop:
//! - **Landmarks:** Normalized face and hand keypoints from the perception stage
//! - **Frames:** One perception sample (landmarks plus frame dimensions), JSONL-encoded
//! - **Screen:** Pixel-space screen size and pointer positions
//! - **Actions:** Cursor moves, clicks, and tracking toggles emitted by the loop
//!
//! Landmark coordinates are normalized to `[0.0, 1.0]` relative to the
//! captured image; screen coordinates are pixels.

pub mod action;
pub mod frame;
pub mod landmarks;
pub mod screen;

pub use action::*;
pub use frame::*;
pub use landmarks::*;
pub use screen::*;
