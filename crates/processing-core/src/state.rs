//! Per-run controller state.

use facemouse_landmark_model::{ScreenPoint, ScreenSize};
use serde::{Deserialize, Serialize};

use crate::debounce::EdgeLatch;
use crate::interaction::InteractionState;

/// State carried from one frame to the next.
///
/// Owned by the frame loop and mutated once per frame; every pipeline stage
/// receives it by exclusive reference.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ControllerState {
    pub(crate) interaction: InteractionState,

    /// Last emitted pointer position, always within the screen.
    pub(crate) prev_pointer: ScreenPoint,

    /// Edge memory for the click gesture.
    pub(crate) mouth_open: EdgeLatch,

    /// Edge memory for the toggle gesture.
    pub(crate) five_fingers: EdgeLatch,
}

impl ControllerState {
    /// Fresh state seeded with the current cursor position.
    pub fn new(cursor: ScreenPoint, screen: ScreenSize, start_tracking: bool) -> Self {
        Self {
            interaction: if start_tracking {
                InteractionState::Tracking
            } else {
                InteractionState::Paused
            },
            prev_pointer: screen.clamp(cursor),
            mouth_open: EdgeLatch::new(),
            five_fingers: EdgeLatch::new(),
        }
    }

    pub fn interaction(&self) -> InteractionState {
        self.interaction
    }

    pub fn tracking_enabled(&self) -> bool {
        self.interaction == InteractionState::Tracking
    }

    pub fn prev_pointer(&self) -> ScreenPoint {
        self.prev_pointer
    }

    /// Record the position just emitted, clamped to the screen.
    pub fn set_prev_pointer(&mut self, point: ScreenPoint, screen: ScreenSize) {
        self.prev_pointer = screen.clamp(point);
    }

    pub fn mouth_open_latched(&self) -> bool {
        self.mouth_open.is_latched()
    }

    pub fn five_fingers_latched(&self) -> bool {
        self.five_fingers.is_latched()
    }
}
