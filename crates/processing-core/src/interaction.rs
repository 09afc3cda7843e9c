//! Tracking / paused interaction machine.
//!
//! Two states, one trigger: a five-fingers rising edge toggles between
//! `Tracking` and `Paused`. Hand gestures are evaluated in both states.
//! While paused the face is ignored entirely: no movement, no mouth-edge
//! evaluation, no clicks. The toggle is applied before the face is looked
//! at, so a resume takes effect on the frame that performs it.

use facemouse_landmark_model::{ScreenPoint, ScreenSize};
use serde::{Deserialize, Serialize};

use crate::cursor_smooth::{smooth_step, SmoothingFactor};
use crate::gesture::GestureSignals;
use crate::pointer_map::{map_to_screen, Sensitivity};
use crate::state::ControllerState;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InteractionState {
    Tracking,
    Paused,
}

impl InteractionState {
    pub fn toggled(self) -> Self {
        match self {
            Self::Tracking => Self::Paused,
            Self::Paused => Self::Tracking,
        }
    }

    /// Status label shown to the user.
    pub fn label(self) -> &'static str {
        match self {
            Self::Tracking => "ON",
            Self::Paused => "PAUSED",
        }
    }
}

/// Latch handling when a modality disappears.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct InteractionPolicy {
    /// Clear a latch when its landmarks are absent. When false, the latch
    /// keeps its value until the landmarks return.
    pub reset_latches_on_absence: bool,
}

impl Default for InteractionPolicy {
    fn default() -> Self {
        Self {
            reset_latches_on_absence: true,
        }
    }
}

/// What the machine decided for one frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct InteractionOutcome {
    /// State after this frame.
    pub state: InteractionState,

    /// The toggle gesture fired this frame.
    pub toggled: bool,

    /// Emit exactly one click this frame.
    pub click: bool,

    /// Run the pointer path (map and smooth) this frame.
    pub track_face: bool,
}

/// Advance the machine by one frame of signals.
pub fn advance(
    state: &mut ControllerState,
    signals: &GestureSignals,
    policy: InteractionPolicy,
) -> InteractionOutcome {
    let mut toggled = false;
    if signals.hand_present {
        toggled = state.five_fingers.fire(signals.five_fingers_extended);
    } else if policy.reset_latches_on_absence {
        state.five_fingers.reset();
    }

    if toggled {
        state.interaction = state.interaction.toggled();
        tracing::debug!(state = ?state.interaction, "Tracking toggled");
    }

    let mut click = false;
    let mut track_face = false;
    if state.interaction == InteractionState::Tracking {
        if signals.face_present {
            track_face = true;
            click = state.mouth_open.fire(signals.mouth_open);
        } else if policy.reset_latches_on_absence {
            state.mouth_open.reset();
        }
    }

    InteractionOutcome {
        state: state.interaction,
        toggled,
        click,
        track_face,
    }
}

/// Pointer parameters sampled for one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerParams {
    pub sensitivity: Sensitivity,
    pub smoothing: SmoothingFactor,
    pub screen: ScreenSize,
}

/// Full per-frame decision: interaction outcome plus pointer motion.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameDecision {
    pub outcome: InteractionOutcome,

    /// Unsmoothed screen target, when the pointer path ran.
    pub target: Option<ScreenPoint>,

    /// Position to move the cursor to, when the pointer path ran.
    pub pointer: Option<ScreenPoint>,
}

/// Run the interaction machine and, when tracking a face, map and smooth
/// the nose position. Updates `state.prev_pointer` with the emitted position.
pub fn decide(
    state: &mut ControllerState,
    signals: &GestureSignals,
    params: PointerParams,
    policy: InteractionPolicy,
) -> FrameDecision {
    let outcome = advance(state, signals, policy);

    let mut target = None;
    let mut pointer = None;
    if outcome.track_face {
        if let Some(nose) = signals.nose {
            let mapped = map_to_screen(nose, params.sensitivity, params.screen);
            let next = smooth_step(state.prev_pointer, mapped, params.smoothing);
            state.set_prev_pointer(next, params.screen);
            target = Some(mapped);
            pointer = Some(state.prev_pointer);
        }
    }

    FrameDecision {
        outcome,
        target,
        pointer,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use facemouse_landmark_model::LandmarkPoint;

    fn fresh() -> ControllerState {
        ControllerState::new(ScreenPoint::new(0.0, 0.0), ScreenSize::new(1000, 1000), true)
    }

    fn hand(open: bool) -> GestureSignals {
        GestureSignals {
            hand_present: true,
            five_fingers_extended: open,
            ..GestureSignals::default()
        }
    }

    fn face(mouth_open: bool) -> GestureSignals {
        GestureSignals {
            face_present: true,
            nose: Some(LandmarkPoint::new(0.5, 0.5)),
            mouth_open,
            ..GestureSignals::default()
        }
    }

    #[test]
    fn test_two_edges_return_to_tracking() {
        let mut state = fresh();
        let policy = InteractionPolicy::default();

        let out = advance(&mut state, &hand(true), policy);
        assert!(out.toggled);
        assert_eq!(out.state, InteractionState::Paused);

        // Holding the pose does not toggle again
        let out = advance(&mut state, &hand(true), policy);
        assert!(!out.toggled);
        assert_eq!(out.state, InteractionState::Paused);

        advance(&mut state, &hand(false), policy);
        let out = advance(&mut state, &hand(true), policy);
        assert!(out.toggled);
        assert_eq!(out.state, InteractionState::Tracking);
    }

    #[test]
    fn test_paused_ignores_mouth() {
        let mut state = fresh();
        let policy = InteractionPolicy::default();
        advance(&mut state, &hand(true), policy);

        for open in [true, false, true] {
            let out = advance(&mut state, &face(open), policy);
            assert!(!out.click);
            assert!(!out.track_face);
        }
        assert!(!state.mouth_open_latched());
    }

    #[test]
    fn test_click_once_per_open_mouth() {
        let mut state = fresh();
        let policy = InteractionPolicy::default();
        let clicks: Vec<bool> = [false, true, true, false, true]
            .into_iter()
            .map(|open| advance(&mut state, &face(open), policy).click)
            .collect();
        assert_eq!(clicks, [false, true, false, false, true]);
    }

    #[test]
    fn test_hand_absence_resets_latch_by_default() {
        let mut state = fresh();
        let policy = InteractionPolicy::default();
        advance(&mut state, &hand(true), policy);
        assert!(state.five_fingers_latched());

        advance(&mut state, &GestureSignals::default(), policy);
        assert!(!state.five_fingers_latched());

        // Hand reappears already open: a genuine new edge
        let out = advance(&mut state, &hand(true), policy);
        assert!(out.toggled);
        assert_eq!(out.state, InteractionState::Tracking);
    }

    #[test]
    fn test_latches_freeze_when_reset_disabled() {
        let mut state = fresh();
        let policy = InteractionPolicy {
            reset_latches_on_absence: false,
        };
        advance(&mut state, &hand(true), policy);
        advance(&mut state, &GestureSignals::default(), policy);
        assert!(state.five_fingers_latched());

        let out = advance(&mut state, &hand(true), policy);
        assert!(!out.toggled);
    }

    #[test]
    fn test_face_absence_resets_mouth_latch_while_tracking() {
        let mut state = fresh();
        let policy = InteractionPolicy::default();
        assert!(advance(&mut state, &face(true), policy).click);
        advance(&mut state, &GestureSignals::default(), policy);
        assert!(!state.mouth_open_latched());
        assert!(advance(&mut state, &face(true), policy).click);
    }

    #[test]
    fn test_resume_and_click_in_same_frame() {
        let mut state = ControllerState::new(ScreenPoint::default(), ScreenSize::default(), false);
        let signals = GestureSignals {
            hand_present: true,
            five_fingers_extended: true,
            ..face(true)
        };
        let out = advance(&mut state, &signals, InteractionPolicy::default());
        assert!(out.toggled);
        assert!(out.track_face);
        assert!(out.click);
    }

    #[test]
    fn test_decide_moves_pointer_toward_target() {
        let mut state = fresh();
        let params = PointerParams {
            sensitivity: Sensitivity::from(5),
            smoothing: SmoothingFactor::from_tenths(5),
            screen: ScreenSize::new(1000, 1000),
        };
        let decision = decide(&mut state, &face(false), params, InteractionPolicy::default());
        assert_eq!(decision.target, Some(ScreenPoint::new(500.0, 500.0)));
        assert_eq!(decision.pointer, Some(ScreenPoint::new(250.0, 250.0)));
        assert_eq!(state.prev_pointer(), ScreenPoint::new(250.0, 250.0));
    }

    #[test]
    fn test_decide_paused_leaves_pointer() {
        let mut state = ControllerState::new(
            ScreenPoint::new(10.0, 20.0),
            ScreenSize::new(1000, 1000),
            false,
        );
        let params = PointerParams {
            sensitivity: Sensitivity::from(5),
            smoothing: SmoothingFactor::from_tenths(10),
            screen: ScreenSize::new(1000, 1000),
        };
        let decision = decide(&mut state, &face(true), params, InteractionPolicy::default());
        assert_eq!(decision.pointer, None);
        assert!(!decision.outcome.click);
        assert_eq!(state.prev_pointer(), ScreenPoint::new(10.0, 20.0));
    }
}
