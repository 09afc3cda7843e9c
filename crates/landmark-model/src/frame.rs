//! Recorded perception frames.
//!
//! A landmark stream is JSONL: one [`LandmarkFrame`] per line. Empty lines and
//! lines starting with `#` (headers, comments) are ignored.

use serde::{Deserialize, Serialize};

use crate::landmarks::{FaceLandmarks, HandLandmarks};

/// Monotonic timestamp in nanoseconds since the stream started.
pub type TimestampNs = u64;

/// One perception sample: at most one face and at most one hand.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LandmarkFrame {
    /// Nanoseconds since stream start.
    #[serde(rename = "t", default)]
    pub timestamp_ns: TimestampNs,

    /// Width of the analysed image in pixels.
    pub width: u32,

    /// Height of the analysed image in pixels.
    pub height: u32,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub face: Option<FaceLandmarks>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hand: Option<HandLandmarks>,
}

impl LandmarkFrame {
    /// A frame in which nothing was detected.
    pub fn empty(timestamp_ns: TimestampNs, width: u32, height: u32) -> Self {
        Self {
            timestamp_ns,
            width,
            height,
            face: None,
            hand: None,
        }
    }

    pub fn with_face(mut self, face: FaceLandmarks) -> Self {
        self.face = Some(face);
        self
    }

    pub fn with_hand(mut self, hand: HandLandmarks) -> Self {
        self.hand = Some(hand);
        self
    }

    pub fn timestamp_secs(&self) -> f64 {
        self.timestamp_ns as f64 / 1_000_000_000.0
    }
}

/// Whether a JSONL line carries a frame (not blank, not a `#` comment).
pub fn is_frame_line(line: &str) -> bool {
    let trimmed = line.trim();
    !trimmed.is_empty() && !trimmed.starts_with('#')
}

/// Parse a single JSONL line into a frame.
pub fn parse_frame(line: &str) -> Result<LandmarkFrame, serde_json::Error> {
    serde_json::from_str(line.trim())
}

/// Parse frames from JSONL content.
pub fn parse_frames(jsonl: &str) -> Result<Vec<LandmarkFrame>, serde_json::Error> {
    jsonl
        .lines()
        .filter(|line| is_frame_line(line))
        .map(parse_frame)
        .collect()
}

/// Serialize frames to JSONL.
pub fn serialize_frames(frames: &[LandmarkFrame]) -> Result<String, serde_json::Error> {
    let mut output = String::new();
    for frame in frames {
        output.push_str(&serde_json::to_string(frame)?);
        output.push('\n');
    }
    Ok(output)
}
