//! Gesture classification from a single frame of landmarks.
//!
//! Two boolean signals are derived: "mouth open" from the lip gap, and
//! "five fingers extended" from per-finger joint comparisons. Missing
//! landmarks are normal input and classify as `false`.

use facemouse_landmark_model::landmarks::hand_index;
use facemouse_landmark_model::{FaceLandmarks, HandLandmarks, LandmarkPoint};
use serde::{Deserialize, Serialize};

/// Default lip gap, in pixels, above which the mouth counts as open.
pub const DEFAULT_MOUTH_OPEN_THRESHOLD_PX: u32 = 15;

/// Classifier settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GestureConfig {
    /// Strict lower bound on the lip gap for "mouth open".
    pub mouth_open_threshold_px: u32,

    /// Landmarks come from a horizontally mirrored image (selfie view).
    ///
    /// The thumb points across the image rather than up, so its test
    /// compares x-coordinates and the comparison flips with mirroring.
    pub mirrored: bool,
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            mouth_open_threshold_px: DEFAULT_MOUTH_OPEN_THRESHOLD_PX,
            mirrored: true,
        }
    }
}

/// Signals derived from one frame.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct GestureSignals {
    pub face_present: bool,
    pub hand_present: bool,

    /// Nose tip of the detected face, if the set carries one.
    pub nose: Option<LandmarkPoint>,

    pub mouth_open: bool,
    pub five_fingers_extended: bool,

    /// Lip gap in pixels, for display.
    pub mouth_distance_px: Option<u32>,

    /// Number of extended fingers (0..=5), for display.
    pub extended_fingers: Option<u8>,
}

/// Stateless per-frame gesture classifier.
#[derive(Debug, Clone, Copy, Default)]
pub struct GestureClassifier {
    config: GestureConfig,
}

impl GestureClassifier {
    pub fn new(config: GestureConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &GestureConfig {
        &self.config
    }

    /// Classify one frame. `frame_height` converts lip positions to pixels.
    pub fn classify(
        &self,
        face: Option<&FaceLandmarks>,
        hand: Option<&HandLandmarks>,
        frame_height: u32,
    ) -> GestureSignals {
        let mouth_distance_px = face.and_then(|f| mouth_distance_px(f, frame_height));
        let extended_fingers = hand.map(|h| extended_finger_count(h, self.config.mirrored));

        GestureSignals {
            face_present: face.is_some(),
            hand_present: hand.is_some(),
            nose: face.and_then(FaceLandmarks::nose_tip),
            mouth_open: mouth_distance_px
                .is_some_and(|d| d > self.config.mouth_open_threshold_px),
            five_fingers_extended: extended_fingers == Some(5),
            mouth_distance_px,
            extended_fingers,
        }
    }
}

/// Vertical lip gap in whole pixels. Each lip is truncated to a pixel row
/// before taking the difference.
pub fn mouth_distance_px(face: &FaceLandmarks, frame_height: u32) -> Option<u32> {
    let upper = face.upper_lip()?.y_px(frame_height);
    let lower = face.lower_lip()?.y_px(frame_height);
    Some(lower.abs_diff(upper).min(u32::MAX as u64) as u32)
}

/// Thumb test: tip beyond the interphalangeal joint along x.
pub fn thumb_extended(hand: &HandLandmarks, mirrored: bool) -> bool {
    let tip = hand.point(hand_index::THUMB_TIP);
    let ip = hand.point(hand_index::THUMB_IP);
    if mirrored {
        tip.x < ip.x
    } else {
        tip.x > ip.x
    }
}

/// Finger test: tip above the proximal joint (smaller y is higher).
pub fn finger_extended(hand: &HandLandmarks, tip: usize, pip: usize) -> bool {
    hand.point(tip).y < hand.point(pip).y
}

/// Count of extended fingers, thumb included.
pub fn extended_finger_count(hand: &HandLandmarks, mirrored: bool) -> u8 {
    let thumb = u8::from(thumb_extended(hand, mirrored));
    let others = hand_index::FINGER_TIP_PIP
        .iter()
        .filter(|(tip, pip)| finger_extended(hand, *tip, *pip))
        .count() as u8;
    thumb + others
}
