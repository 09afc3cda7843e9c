//! The frame loop.
//!
//! One iteration: capture, detect, classify, debounce, map, smooth, emit.
//! The loop owns all controller state; the only blocking call is frame
//! capture.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use facemouse_common::clock::{FrameRateMeter, RateController, SessionClock};
use facemouse_common::config::ControllerConfig;
use facemouse_common::error::FacemouseResult;
use facemouse_landmark_model::{ScreenPoint, ScreenSize, TimestampNs};
use facemouse_processing_core::{
    decide, ControllerState, GestureClassifier, GestureConfig, GestureSignals,
    InteractionOutcome, InteractionPolicy, PointerParams,
};
use serde::Serialize;

use crate::status::StatusLine;
use crate::{Actuator, CapturedFrame, FrameSource, LandmarkDetector, ParameterSource};

/// Rate of the periodic status log line.
const STATUS_LOG_HZ: u32 = 1;

/// Why the loop ended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum StopReason {
    /// The stop flag was set.
    Requested,

    /// The source ran out of frames.
    EndOfStream,

    /// Capture failed (after any configured retries).
    CaptureFailed { message: String },
}

impl fmt::Display for StopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Requested => write!(f, "stop requested"),
            Self::EndOfStream => write!(f, "end of stream"),
            Self::CaptureFailed { message } => write!(f, "capture failed: {message}"),
        }
    }
}

/// Totals for a finished run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    pub frames: u64,
    pub clicks: u64,
    pub toggles: u64,
    pub stop_reason: StopReason,
}

/// Everything the loop decided for one frame, for display and logging.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FrameReport {
    pub frame_index: u64,
    pub timestamp_ns: TimestampNs,
    pub signals: GestureSignals,
    pub outcome: InteractionOutcome,

    /// Unsmoothed screen target.
    pub target: Option<ScreenPoint>,

    /// Position the cursor was moved to.
    pub pointer: Option<ScreenPoint>,

    pub status: StatusLine,
}

/// Owns the frame source and releases it exactly once, on every exit path.
pub struct CaptureGuard {
    source: Box<dyn FrameSource>,
    released: bool,
}

impl CaptureGuard {
    pub fn new(source: Box<dyn FrameSource>) -> Self {
        Self {
            source,
            released: false,
        }
    }

    pub fn capture(&mut self) -> FacemouseResult<Option<CapturedFrame>> {
        self.source.capture_frame()
    }

    pub fn name(&self) -> &str {
        self.source.name()
    }

    /// Release the source. Later calls do nothing.
    pub fn release(&mut self) -> FacemouseResult<()> {
        if self.released {
            return Ok(());
        }
        self.released = true;
        self.source.release()
    }
}

impl Drop for CaptureGuard {
    fn drop(&mut self) {
        if let Err(e) = self.release() {
            tracing::warn!(source = %self.source.name(), error = %e, "Failed to release frame source");
        }
    }
}

/// The face / hand pointer controller.
pub struct Controller {
    source: CaptureGuard,
    detector: Box<dyn LandmarkDetector>,
    actuator: Box<dyn Actuator>,
    params: Box<dyn ParameterSource>,
    classifier: GestureClassifier,
    policy: InteractionPolicy,
    state: ControllerState,
    screen: ScreenSize,
    clock: SessionClock,
    stop_flag: Arc<AtomicBool>,
    max_capture_retries: u32,
    frames: u64,
    clicks: u64,
    toggles: u64,
}

impl Controller {
    /// Build a controller. The actuator is asked once for the screen size
    /// and the starting cursor position.
    pub fn new(
        config: &ControllerConfig,
        source: Box<dyn FrameSource>,
        detector: Box<dyn LandmarkDetector>,
        mut actuator: Box<dyn Actuator>,
        params: Box<dyn ParameterSource>,
    ) -> Self {
        let screen = actuator.screen_size().unwrap_or_else(|e| {
            let fallback = ScreenSize::default();
            tracing::warn!(
                actuator = %actuator.name(),
                error = %e,
                width = fallback.width,
                height = fallback.height,
                "Screen size unavailable, using fallback"
            );
            fallback
        });

        let cursor = actuator.cursor_position().unwrap_or_else(|e| {
            tracing::warn!(actuator = %actuator.name(), error = %e, "Cursor position unavailable, starting at center");
            screen.center()
        });

        let classifier = GestureClassifier::new(GestureConfig {
            mouth_open_threshold_px: config.mouth_open_threshold_px,
            mirrored: config.mirrored,
        });

        Self {
            source: CaptureGuard::new(source),
            detector,
            actuator,
            params,
            classifier,
            policy: InteractionPolicy {
                reset_latches_on_absence: config.reset_latches_on_absence,
            },
            state: ControllerState::new(cursor, screen, config.start_tracking),
            screen,
            clock: SessionClock::start(),
            stop_flag: Arc::new(AtomicBool::new(false)),
            max_capture_retries: config.max_capture_retries,
            frames: 0,
            clicks: 0,
            toggles: 0,
        }
    }

    /// Flag polled once per iteration; set it to end the loop.
    pub fn stop_flag(&self) -> Arc<AtomicBool> {
        self.stop_flag.clone()
    }

    pub fn stop(&self) {
        self.stop_flag.store(true, Ordering::SeqCst);
    }

    pub fn state(&self) -> &ControllerState {
        &self.state
    }

    pub fn screen(&self) -> ScreenSize {
        self.screen
    }

    /// Process one captured frame and emit its pointer actions.
    ///
    /// Actuator failures are logged and do not stop the frame; the controller
    /// state advances as if the action had been delivered.
    pub fn step(&mut self, frame: &CapturedFrame) -> FrameReport {
        let face = self.detector.detect_face(frame);
        let hand = self.detector.detect_hand(frame);
        let signals = self
            .classifier
            .classify(face.as_ref(), hand.as_ref(), frame.height);

        let snapshot = self.params.snapshot();
        let pointer_params = PointerParams {
            sensitivity: snapshot.sensitivity(),
            smoothing: snapshot.smoothing(),
            screen: self.screen,
        };
        let decision = decide(&mut self.state, &signals, pointer_params, self.policy);
        let outcome = decision.outcome;

        if outcome.toggled {
            self.toggles += 1;
            tracing::info!(tracking = outcome.state.label(), frame = self.frames, "Tracking toggled");
            if let Err(e) = self.actuator.tracking_changed(self.state.tracking_enabled()) {
                tracing::warn!(error = %e, "Failed to report tracking change");
            }
        }

        if let Some(pointer) = decision.pointer {
            if let Err(e) = self.actuator.move_cursor(pointer) {
                tracing::warn!(error = %e, x = pointer.x, y = pointer.y, "Cursor move failed");
            }
        }

        if outcome.click {
            self.clicks += 1;
            let at = self.state.prev_pointer();
            tracing::info!(x = at.x, y = at.y, frame = self.frames, "Click");
            if let Err(e) = self.actuator.click() {
                tracing::warn!(error = %e, "Click failed");
            }
        }

        tracing::trace!(
            frame = self.frames,
            face = signals.face_present,
            hand = signals.hand_present,
            mouth_px = ?signals.mouth_distance_px,
            fingers = ?signals.extended_fingers,
            "Frame processed"
        );

        let report = FrameReport {
            frame_index: self.frames,
            timestamp_ns: frame
                .timestamp_ns
                .unwrap_or_else(|| self.clock.elapsed_ns()),
            signals,
            outcome,
            target: decision.target,
            pointer: decision.pointer,
            status: StatusLine::new(outcome.state, snapshot),
        };
        self.frames += 1;
        report
    }

    /// Run until stopped, the stream ends, or capture fails.
    pub fn run(&mut self) -> FacemouseResult<RunSummary> {
        self.run_with(|_| {})
    }

    /// Like [`Controller::run`], handing every frame report to `observer`.
    pub fn run_with<F>(&mut self, mut observer: F) -> FacemouseResult<RunSummary>
    where
        F: FnMut(&FrameReport),
    {
        tracing::info!(
            source = %self.source.name(),
            detector = %self.detector.name(),
            actuator = %self.actuator.name(),
            width = self.screen.width,
            height = self.screen.height,
            tracking = self.state.interaction().label(),
            "Controller started"
        );

        let mut status_rate = RateController::new(STATUS_LOG_HZ);
        let mut fps = FrameRateMeter::new();
        let mut consecutive_failures = 0u32;

        let stop_reason = loop {
            if self.stop_flag.load(Ordering::Relaxed) {
                break StopReason::Requested;
            }

            let frame = match self.source.capture() {
                Ok(Some(frame)) => {
                    consecutive_failures = 0;
                    frame
                }
                Ok(None) => break StopReason::EndOfStream,
                Err(e) if consecutive_failures < self.max_capture_retries => {
                    consecutive_failures += 1;
                    tracing::warn!(
                        error = %e,
                        attempt = consecutive_failures,
                        max = self.max_capture_retries,
                        "Frame capture failed, retrying"
                    );
                    continue;
                }
                Err(e) => {
                    tracing::error!(source = %self.source.name(), error = %e, "Frame capture failed");
                    break StopReason::CaptureFailed {
                        message: e.to_string(),
                    };
                }
            };

            let report = self.step(&frame);
            observer(&report);

            let now = self.clock.elapsed_ns();
            fps.record(now);
            if status_rate.should_tick(now) {
                tracing::debug!(
                    fps = ?fps.fps(now),
                    frames = self.frames,
                    status = %report.status,
                    "Status"
                );
                fps.reset();
            }
        };

        self.source.release()?;

        let summary = RunSummary {
            frames: self.frames,
            clicks: self.clicks,
            toggles: self.toggles,
            stop_reason,
        };
        tracing::info!(
            frames = summary.frames,
            clicks = summary.clicks,
            toggles = summary.toggles,
            reason = %summary.stop_reason,
            "Controller stopped"
        );
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actuators::VirtualActuator;
    use crate::params::{FixedParameters, ParameterSnapshot};
    use crate::sources::RecordedLandmarkDetector;
    use crate::synthetic::{face_at, FRAME_HEIGHT, FRAME_WIDTH};
    use crate::FrameImage;
    use facemouse_common::error::FacemouseError;
    use facemouse_landmark_model::LandmarkPoint;

    /// Source that fails a fixed number of times, then ends.
    struct FailingSource {
        failures: u32,
        released: Arc<AtomicBool>,
    }

    impl FrameSource for FailingSource {
        fn capture_frame(&mut self) -> FacemouseResult<Option<CapturedFrame>> {
            if self.failures == 0 {
                return Ok(None);
            }
            self.failures -= 1;
            Err(FacemouseError::capture("camera unplugged"))
        }

        fn name(&self) -> &str {
            "failing"
        }

        fn release(&mut self) -> FacemouseResult<()> {
            self.released.store(true, Ordering::SeqCst);
            Ok(())
        }
    }

    /// Actuator whose injections always fail.
    struct BrokenActuator;

    impl Actuator for BrokenActuator {
        fn move_cursor(&mut self, _point: ScreenPoint) -> FacemouseResult<()> {
            Err(FacemouseError::actuator("no display"))
        }

        fn click(&mut self) -> FacemouseResult<()> {
            Err(FacemouseError::actuator("no display"))
        }

        fn cursor_position(&mut self) -> FacemouseResult<ScreenPoint> {
            Err(FacemouseError::actuator("no display"))
        }

        fn screen_size(&mut self) -> FacemouseResult<ScreenSize> {
            Err(FacemouseError::actuator("no display"))
        }

        fn name(&self) -> &str {
            "broken"
        }
    }

    fn failing(failures: u32) -> (Box<dyn FrameSource>, Arc<AtomicBool>) {
        let released = Arc::new(AtomicBool::new(false));
        let source = FailingSource {
            failures,
            released: released.clone(),
        };
        (Box::new(source), released)
    }

    fn controller(
        config: &ControllerConfig,
        source: Box<dyn FrameSource>,
        actuator: Box<dyn Actuator>,
    ) -> Controller {
        Controller::new(
            config,
            source,
            Box::new(RecordedLandmarkDetector::new()),
            actuator,
            Box::new(FixedParameters::new(ParameterSnapshot::new(5, 5))),
        )
    }

    fn face_frame(gap: u32) -> CapturedFrame {
        CapturedFrame {
            sequence: 0,
            timestamp_ns: None,
            width: FRAME_WIDTH,
            height: FRAME_HEIGHT,
            image: FrameImage::Recorded {
                face: Some(face_at(LandmarkPoint::new(0.5, 0.5), gap, FRAME_HEIGHT)),
                hand: None,
            },
        }
    }

    #[test]
    fn test_capture_failure_stops_and_releases() {
        let (source, released) = failing(1);
        let desktop = VirtualActuator::new(ScreenSize::new(800, 600));
        let mut ctl = controller(&ControllerConfig::default(), source, Box::new(desktop));

        let summary = ctl.run().unwrap();
        assert_eq!(summary.frames, 0);
        assert_eq!(
            summary.stop_reason,
            StopReason::CaptureFailed {
                message: "Capture error: camera unplugged".to_string()
            }
        );
        assert!(released.load(Ordering::SeqCst));
    }

    #[test]
    fn test_retries_absorb_transient_failures() {
        let (source, _) = failing(2);
        let config = ControllerConfig {
            max_capture_retries: 2,
            ..ControllerConfig::default()
        };
        let desktop = VirtualActuator::new(ScreenSize::new(800, 600));
        let mut ctl = controller(&config, source, Box::new(desktop));
        assert_eq!(ctl.run().unwrap().stop_reason, StopReason::EndOfStream);
    }

    #[test]
    fn test_stop_flag_ends_before_capture() {
        let (source, released) = failing(5);
        let desktop = VirtualActuator::new(ScreenSize::new(800, 600));
        let mut ctl = controller(&ControllerConfig::default(), source, Box::new(desktop));
        ctl.stop();
        let summary = ctl.run().unwrap();
        assert_eq!(summary.stop_reason, StopReason::Requested);
        assert!(released.load(Ordering::SeqCst));
    }

    #[test]
    fn test_dropping_controller_releases_source() {
        let (source, released) = failing(0);
        let desktop = VirtualActuator::new(ScreenSize::new(800, 600));
        drop(controller(&ControllerConfig::default(), source, Box::new(desktop)));
        assert!(released.load(Ordering::SeqCst));
    }

    #[test]
    fn test_actuator_failures_do_not_stop_frames() {
        let (source, _) = failing(0);
        let mut ctl = controller(&ControllerConfig::default(), source, Box::new(BrokenActuator));
        assert_eq!(ctl.screen(), ScreenSize::default());
        assert_eq!(ctl.state().prev_pointer(), ScreenSize::default().center());

        let closed = ctl.step(&face_frame(0));
        assert!(closed.pointer.is_some());
        let open = ctl.step(&face_frame(40));
        assert!(open.outcome.click);
        assert_eq!(open.frame_index, 1);
        assert!(ctl.state().mouth_open_latched());
    }

    #[test]
    fn test_report_carries_status() {
        let (source, _) = failing(0);
        let desktop = VirtualActuator::new(ScreenSize::new(800, 600));
        let config = ControllerConfig {
            start_tracking: false,
            ..ControllerConfig::default()
        };
        let mut ctl = controller(&config, source, Box::new(desktop));
        let report = ctl.step(&face_frame(40));
        assert!(!report.outcome.click);
        assert_eq!(report.pointer, None);
        assert_eq!(report.status.tracking_text(), "Tracking: PAUSED");
        assert_eq!(report.status.settings_text(), "Sensitivity: 5 | Smoothness: 0.50");
    }
}
