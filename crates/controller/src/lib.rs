//! Facemouse Controller
//!
//! Runs the frame loop that turns landmark samples into pointer actions.
//! The perception and actuation sides are external collaborators behind
//! traits:
//!
//! - **FrameSource:** blocking frame capture (camera, recorded JSONL, synthetic)
//! - **LandmarkDetector:** face / hand landmarks for a captured frame
//! - **Actuator:** cursor movement and click injection (xdotool, virtual desktop)
//! - **ParameterSource:** live sensitivity / smoothness values
//!
//! The loop is single-threaded and synchronous; its only suspension point is
//! [`FrameSource::capture_frame`].

pub mod actuators;
pub mod controller;
pub mod params;
pub mod sources;
pub mod status;
pub mod synthetic;
pub mod writer;

use facemouse_common::error::FacemouseResult;
use facemouse_landmark_model::{
    FaceLandmarks, HandLandmarks, ScreenPoint, ScreenSize, TimestampNs,
};

pub use controller::{Controller, FrameReport, RunSummary, StopReason};
pub use params::{FixedParameters, ParameterSnapshot, SharedParameters};
pub use status::StatusLine;

/// Pixel payload of a captured frame.
#[derive(Debug, Clone, PartialEq)]
pub enum FrameImage {
    /// Raw RGB24 pixels, row-major, as delivered by a camera source. Only a
    /// detector that runs a landmark model in-process can use these;
    /// [`sources::RecordedLandmarkDetector`] treats them as empty frames.
    Rgb(Vec<u8>),

    /// Landmarks already extracted upstream (recorded or piped streams).
    Recorded {
        face: Option<FaceLandmarks>,
        hand: Option<HandLandmarks>,
    },
}

/// One frame delivered by a [`FrameSource`].
#[derive(Debug, Clone, PartialEq)]
pub struct CapturedFrame {
    /// Position in the stream, starting at zero.
    pub sequence: u64,

    /// Capture time, when the source knows it.
    pub timestamp_ns: Option<TimestampNs>,

    pub width: u32,
    pub height: u32,
    pub image: FrameImage,
}

/// Blocking frame capture.
pub trait FrameSource: Send {
    /// Block until the next frame is available.
    ///
    /// `Ok(None)` means the stream ended normally; `Err` is a capture failure.
    fn capture_frame(&mut self) -> FacemouseResult<Option<CapturedFrame>>;

    /// Source name for logging.
    fn name(&self) -> &str;

    /// Release the underlying device or stream.
    fn release(&mut self) -> FacemouseResult<()> {
        Ok(())
    }
}

/// Landmark extraction for a captured frame. At most one face and one hand.
pub trait LandmarkDetector: Send {
    fn detect_face(&mut self, frame: &CapturedFrame) -> Option<FaceLandmarks>;

    fn detect_hand(&mut self, frame: &CapturedFrame) -> Option<HandLandmarks>;

    fn name(&self) -> &str;
}

/// Pointer injection. Calls are fire-and-forget from the loop's point of
/// view: failures are logged and the frame continues.
pub trait Actuator: Send {
    /// Move the cursor to absolute screen coordinates.
    fn move_cursor(&mut self, point: ScreenPoint) -> FacemouseResult<()>;

    /// Primary button press and release.
    fn click(&mut self) -> FacemouseResult<()>;

    /// Current cursor position, read once at startup.
    fn cursor_position(&mut self) -> FacemouseResult<ScreenPoint>;

    fn screen_size(&mut self) -> FacemouseResult<ScreenSize>;

    /// Notification that tracking was switched on or off.
    fn tracking_changed(&mut self, _enabled: bool) -> FacemouseResult<()> {
        Ok(())
    }

    fn name(&self) -> &str;
}

/// Live parameters, sampled once per frame.
pub trait ParameterSource: Send + Sync {
    /// A self-consistent pair of values.
    fn snapshot(&self) -> ParameterSnapshot;
}

impl<P: ParameterSource + ?Sized> ParameterSource for std::sync::Arc<P> {
    fn snapshot(&self) -> ParameterSnapshot {
        (**self).snapshot()
    }
}
