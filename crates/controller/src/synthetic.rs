//! Synthetic landmark streams for demos and end-to-end checks.
//!
//! Landmarks are laid out the way a mirrored selfie camera would report
//! them, so the default classifier settings recognise the gestures.

use facemouse_landmark_model::landmarks::{face_index, hand_index};
use facemouse_landmark_model::{
    FaceLandmarks, HandLandmarks, LandmarkFrame, LandmarkPoint, HAND_LANDMARK_COUNT,
};

pub const FRAME_WIDTH: u32 = 640;
pub const FRAME_HEIGHT: u32 = 480;

/// ~30 fps.
pub const FRAME_INTERVAL_NS: u64 = 33_333_333;

/// Size of a full face mesh.
const FACE_MESH_POINTS: usize = 468;

/// Upper lip row used by [`face_at`], in pixels.
const UPPER_LIP_ROW: u32 = 200;

/// Face mesh with the nose at `nose` and the lips `mouth_gap_px` rows apart
/// in a frame `frame_height` pixels tall.
pub fn face_at(nose: LandmarkPoint, mouth_gap_px: u32, frame_height: u32) -> FaceLandmarks {
    let height = frame_height.max(1) as f64;
    let upper_row = UPPER_LIP_ROW.min(frame_height) as f64;
    let lower_row = (UPPER_LIP_ROW + mouth_gap_px).min(frame_height) as f64;

    let mut points = vec![LandmarkPoint::new(0.5, 0.5); FACE_MESH_POINTS];
    points[face_index::NOSE_TIP] = nose;
    points[face_index::UPPER_LIP] = LandmarkPoint::new(nose.x, upper_row / height);
    points[face_index::LOWER_LIP] = LandmarkPoint::new(nose.x, lower_row / height);
    FaceLandmarks::new(points)
}

/// All five fingers extended.
pub fn open_palm() -> HandLandmarks {
    let mut points = [LandmarkPoint::new(0.5, 0.85); HAND_LANDMARK_COUNT];
    points[hand_index::THUMB_MCP] = LandmarkPoint::new(0.47, 0.78);
    points[hand_index::THUMB_IP] = LandmarkPoint::new(0.44, 0.74);
    points[hand_index::THUMB_TIP] = LandmarkPoint::new(0.41, 0.71);
    for (i, (tip, pip)) in hand_index::FINGER_TIP_PIP.into_iter().enumerate() {
        let x = 0.48 + 0.03 * i as f64;
        points[pip] = LandmarkPoint::new(x, 0.70);
        points[pip + 1] = LandmarkPoint::new(x, 0.65);
        points[tip] = LandmarkPoint::new(x, 0.60);
    }
    HandLandmarks::new(points)
}

/// Fingers curled below their middle joints; the thumb stays out.
pub fn closed_fist() -> HandLandmarks {
    let mut points = *open_palm().points();
    for (tip, pip) in hand_index::FINGER_TIP_PIP {
        let joint = points[pip];
        points[pip + 1] = LandmarkPoint::new(joint.x, joint.y + 0.03);
        points[tip] = LandmarkPoint::new(joint.x, joint.y + 0.05);
    }
    HandLandmarks::new(points)
}

/// Nose positions visiting the corners and center of the reachable area at
/// sensitivity 5 (a 0.1 offset from center already reaches the edge).
pub fn head_sweep_points() -> Vec<LandmarkPoint> {
    vec![
        LandmarkPoint::new(0.50, 0.50),
        LandmarkPoint::new(0.42, 0.42),
        LandmarkPoint::new(0.58, 0.42),
        LandmarkPoint::new(0.58, 0.58),
        LandmarkPoint::new(0.42, 0.58),
        LandmarkPoint::new(0.50, 0.50),
    ]
}

/// Builder for a scripted stream of frames at a fixed rate.
#[derive(Debug, Clone)]
pub struct SyntheticScript {
    frames: Vec<LandmarkFrame>,
    width: u32,
    height: u32,
}

impl SyntheticScript {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            frames: Vec::new(),
            width,
            height,
        }
    }

    /// Append `count` identical frames.
    pub fn hold(
        &mut self,
        count: usize,
        face: Option<&FaceLandmarks>,
        hand: Option<&HandLandmarks>,
    ) -> &mut Self {
        for _ in 0..count {
            let t = self.frames.len() as u64 * FRAME_INTERVAL_NS;
            self.frames.push(LandmarkFrame {
                timestamp_ns: t,
                width: self.width,
                height: self.height,
                face: face.cloned(),
                hand: hand.cloned(),
            });
        }
        self
    }

    /// Append `count` frames with a neutral face at `nose`.
    pub fn look_at(&mut self, count: usize, nose: LandmarkPoint) -> &mut Self {
        let face = face_at(nose, 0, self.height);
        self.hold(count, Some(&face), None)
    }

    pub fn frames(&self) -> &[LandmarkFrame] {
        &self.frames
    }

    pub fn into_frames(self) -> Vec<LandmarkFrame> {
        self.frames
    }
}

/// A demo session: head sweep, one click, pause, ignored click attempt,
/// resume. Produces exactly one click and two tracking toggles.
pub fn demo_session(hold_frames: usize) -> Vec<LandmarkFrame> {
    let hold = hold_frames.max(1);
    let center = LandmarkPoint::new(0.5, 0.5);
    let neutral = face_at(center, 0, FRAME_HEIGHT);
    let open_mouth = face_at(center, 30, FRAME_HEIGHT);
    let palm = open_palm();
    let fist = closed_fist();

    let mut script = SyntheticScript::new(FRAME_WIDTH, FRAME_HEIGHT);
    for nose in head_sweep_points() {
        script.look_at(hold, nose);
    }

    script
        .hold(hold, Some(&open_mouth), None)
        .hold(hold, Some(&neutral), None)
        // Pause, then try to click and move while paused
        .hold(hold, Some(&neutral), Some(&palm))
        .hold(hold, Some(&neutral), Some(&fist))
        .hold(hold, Some(&open_mouth), None)
        .hold(hold, Some(&neutral), None)
        .look_at(hold, LandmarkPoint::new(0.58, 0.58))
        // Resume
        .hold(hold, Some(&neutral), Some(&palm))
        .hold(hold, Some(&neutral), None);

    script.into_frames()
}
