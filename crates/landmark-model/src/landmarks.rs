//! Face and hand landmark sets produced by the perception stage.
//!
//! Indices follow the reference face-mesh and hand-landmark models.

use serde::{Deserialize, Serialize};

/// Errors raised when building landmark sets from raw data.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ModelError {
    #[error("hand landmark set must have {expected} points, got {actual}")]
    HandLength { expected: usize, actual: usize },

    #[error("landmark coordinate is not finite: ({x}, {y})")]
    NonFinite { x: f64, y: f64 },
}

/// Face-mesh indices used by the controller.
pub mod face_index {
    pub const NOSE_TIP: usize = 1;
    pub const UPPER_LIP: usize = 13;
    pub const LOWER_LIP: usize = 14;
}

/// Hand joint indices.
pub mod hand_index {
    pub const WRIST: usize = 0;
    pub const THUMB_CMC: usize = 1;
    pub const THUMB_MCP: usize = 2;
    pub const THUMB_IP: usize = 3;
    pub const THUMB_TIP: usize = 4;
    pub const INDEX_FINGER_MCP: usize = 5;
    pub const INDEX_FINGER_PIP: usize = 6;
    pub const INDEX_FINGER_DIP: usize = 7;
    pub const INDEX_FINGER_TIP: usize = 8;
    pub const MIDDLE_FINGER_MCP: usize = 9;
    pub const MIDDLE_FINGER_PIP: usize = 10;
    pub const MIDDLE_FINGER_DIP: usize = 11;
    pub const MIDDLE_FINGER_TIP: usize = 12;
    pub const RING_FINGER_MCP: usize = 13;
    pub const RING_FINGER_PIP: usize = 14;
    pub const RING_FINGER_DIP: usize = 15;
    pub const RING_FINGER_TIP: usize = 16;
    pub const PINKY_MCP: usize = 17;
    pub const PINKY_PIP: usize = 18;
    pub const PINKY_DIP: usize = 19;
    pub const PINKY_TIP: usize = 20;

    /// (tip, pip) pairs for the four non-thumb fingers.
    pub const FINGER_TIP_PIP: [(usize, usize); 4] = [
        (INDEX_FINGER_TIP, INDEX_FINGER_PIP),
        (MIDDLE_FINGER_TIP, MIDDLE_FINGER_PIP),
        (RING_FINGER_TIP, RING_FINGER_PIP),
        (PINKY_TIP, PINKY_PIP),
    ];
}

/// Number of points in a hand landmark set.
pub const HAND_LANDMARK_COUNT: usize = 21;

/// A normalized image-space position. `(0, 0)` is the top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct LandmarkPoint {
    /// Normalized X coordinate [0.0, 1.0].
    pub x: f64,
    /// Normalized Y coordinate [0.0, 1.0].
    pub y: f64,
}

impl LandmarkPoint {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Copy with both coordinates clamped into `[0, 1]`.
    pub fn clamped(self) -> Self {
        Self {
            x: self.x.clamp(0.0, 1.0),
            y: self.y.clamp(0.0, 1.0),
        }
    }

    /// Vertical position in whole pixels of a frame `frame_height` tall.
    /// Truncates toward zero.
    pub fn y_px(&self, frame_height: u32) -> i64 {
        (self.y * frame_height as f64) as i64
    }

    fn check_finite(&self) -> Result<(), ModelError> {
        if self.x.is_finite() && self.y.is_finite() {
            Ok(())
        } else {
            Err(ModelError::NonFinite {
                x: self.x,
                y: self.y,
            })
        }
    }
}

/// Landmarks of a single detected face.
///
/// The set length depends on the detector model; accessors return `None`
/// when a set is too short to carry the requested point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FaceLandmarks {
    points: Vec<LandmarkPoint>,
}

impl FaceLandmarks {
    pub fn new(points: Vec<LandmarkPoint>) -> Self {
        Self { points }
    }

    /// Build from detector output, rejecting non-finite coordinates.
    pub fn try_new(points: Vec<LandmarkPoint>) -> Result<Self, ModelError> {
        points.iter().try_for_each(LandmarkPoint::check_finite)?;
        Ok(Self { points })
    }

    pub fn points(&self) -> &[LandmarkPoint] {
        &self.points
    }

    pub fn get(&self, index: usize) -> Option<LandmarkPoint> {
        self.points.get(index).copied()
    }

    pub fn nose_tip(&self) -> Option<LandmarkPoint> {
        self.get(face_index::NOSE_TIP)
    }

    pub fn upper_lip(&self) -> Option<LandmarkPoint> {
        self.get(face_index::UPPER_LIP)
    }

    pub fn lower_lip(&self) -> Option<LandmarkPoint> {
        self.get(face_index::LOWER_LIP)
    }
}

/// The 21 landmarks of a single detected hand.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<LandmarkPoint>", into = "Vec<LandmarkPoint>")]
pub struct HandLandmarks {
    points: [LandmarkPoint; HAND_LANDMARK_COUNT],
}

impl HandLandmarks {
    pub fn new(points: [LandmarkPoint; HAND_LANDMARK_COUNT]) -> Self {
        Self { points }
    }

    /// Build from detector output, checking the point count and rejecting
    /// non-finite coordinates.
    pub fn from_slice(points: &[LandmarkPoint]) -> Result<Self, ModelError> {
        let points: [LandmarkPoint; HAND_LANDMARK_COUNT] =
            points.try_into().map_err(|_| ModelError::HandLength {
                expected: HAND_LANDMARK_COUNT,
                actual: points.len(),
            })?;
        points.iter().try_for_each(LandmarkPoint::check_finite)?;
        Ok(Self { points })
    }

    pub fn points(&self) -> &[LandmarkPoint; HAND_LANDMARK_COUNT] {
        &self.points
    }

    pub fn point(&self, index: usize) -> LandmarkPoint {
        self.points[index]
    }
}

impl TryFrom<Vec<LandmarkPoint>> for HandLandmarks {
    type Error = ModelError;

    fn try_from(points: Vec<LandmarkPoint>) -> Result<Self, Self::Error> {
        Self::from_slice(&points)
    }
}

impl From<HandLandmarks> for Vec<LandmarkPoint> {
    fn from(hand: HandLandmarks) -> Self {
        hand.points.to_vec()
    }
}
