//! Facemouse Processing Core
//!
//! Turns one frame of landmarks into pointer decisions:
//! - **Gesture Classifier:** mouth-open and five-fingers signals from raw landmarks
//! - **Debounce:** rising-edge latches so a held pose fires once
//! - **Pointer Mapping:** nose position and sensitivity to a screen target
//! - **Cursor Smoothing:** one-pole low-pass between frames
//! - **Interaction:** the tracking/paused machine that gates clicks and movement
//!
//! This crate is pure computation: no I/O, no platform dependencies.
//! All inputs are data; all outputs are data.

pub mod cursor_smooth;
pub mod debounce;
pub mod gesture;
pub mod interaction;
pub mod pointer_map;
pub mod state;

pub use cursor_smooth::{smooth_step, SmoothingFactor};
pub use debounce::{fire, EdgeLatch};
pub use gesture::{GestureClassifier, GestureConfig, GestureSignals};
pub use interaction::{
    advance, decide, FrameDecision, InteractionOutcome, InteractionPolicy, InteractionState,
    PointerParams,
};
pub use pointer_map::{map_to_screen, Sensitivity};
pub use state::ControllerState;
