//! Pointer actions emitted by the control loop.
//!
//! Recorded as append-only JSONL: an `# {header}` comment line followed by
//! one action per line.

use serde::{Deserialize, Serialize};

use crate::frame::TimestampNs;
use crate::screen::{ScreenPoint, ScreenSize};

/// A single emitted action with timestamp.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointerAction {
    #[serde(rename = "t")]
    pub timestamp_ns: TimestampNs,

    #[serde(flatten)]
    pub kind: ActionKind,
}

/// Discriminated union of action types.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ActionKind {
    /// Absolute cursor move, screen pixels.
    Move { x: f64, y: f64 },

    /// Primary-button press and release at the current cursor position.
    Click { x: f64, y: f64 },

    /// Tracking switched on or off by the hand gesture.
    Tracking { enabled: bool },
}

/// Metadata written before the actions of a recorded session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionStreamHeader {
    pub schema_version: String,

    /// Wall-clock time at session start (RFC 3339).
    pub epoch_wall: String,

    pub screen_width: u32,
    pub screen_height: u32,
}

impl ActionStreamHeader {
    pub const SCHEMA_VERSION: &'static str = "1.0";

    pub fn new(epoch_wall: impl Into<String>, screen: ScreenSize) -> Self {
        Self {
            schema_version: Self::SCHEMA_VERSION.to_string(),
            epoch_wall: epoch_wall.into(),
            screen_width: screen.width,
            screen_height: screen.height,
        }
    }
}

impl PointerAction {
    pub fn move_to(timestamp_ns: TimestampNs, point: ScreenPoint) -> Self {
        Self {
            timestamp_ns,
            kind: ActionKind::Move {
                x: point.x,
                y: point.y,
            },
        }
    }

    pub fn click(timestamp_ns: TimestampNs, point: ScreenPoint) -> Self {
        Self {
            timestamp_ns,
            kind: ActionKind::Click {
                x: point.x,
                y: point.y,
            },
        }
    }

    pub fn tracking(timestamp_ns: TimestampNs, enabled: bool) -> Self {
        Self {
            timestamp_ns,
            kind: ActionKind::Tracking { enabled },
        }
    }

    /// Pointer position carried by the action, if any.
    pub fn position(&self) -> Option<ScreenPoint> {
        match self.kind {
            ActionKind::Move { x, y } | ActionKind::Click { x, y } => Some(ScreenPoint::new(x, y)),
            ActionKind::Tracking { .. } => None,
        }
    }

    pub fn is_click(&self) -> bool {
        matches!(self.kind, ActionKind::Click { .. })
    }
}

/// Parse actions from JSONL content, skipping the header comment.
pub fn parse_actions(jsonl: &str) -> Result<Vec<PointerAction>, serde_json::Error> {
    jsonl
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(serde_json::from_str)
        .collect()
}

/// Read the header from the first line of recorded JSONL content.
pub fn parse_action_header(jsonl: &str) -> Option<ActionStreamHeader> {
    let first = jsonl.lines().next()?.trim();
    let body = first.strip_prefix('#')?.trim();
    serde_json::from_str(body).ok()
}
