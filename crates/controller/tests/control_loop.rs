use std::io::{Cursor, Write};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use facemouse_common::config::ControllerConfig;
use facemouse_common::error::FacemouseResult;
use facemouse_controller::actuators::VirtualActuator;
use facemouse_controller::sources::{JsonlFrameSource, RecordedLandmarkDetector, SyntheticSource};
use facemouse_controller::synthetic::{demo_session, face_at, SyntheticScript, FRAME_HEIGHT};
use facemouse_controller::{
    Actuator, Controller, FixedParameters, FrameReport, FrameSource, ParameterSnapshot,
    SharedParameters, StopReason,
};
use facemouse_landmark_model::{
    face_index, parse_actions, serialize_frames, ActionKind, FaceLandmarks, LandmarkFrame,
    LandmarkPoint, ScreenPoint, ScreenSize,
};
use facemouse_processing_core::InteractionState;
use proptest::prelude::*;

const SCREEN: ScreenSize = ScreenSize {
    width: 1920,
    height: 1080,
};

/// Lets the test inspect the desktop after the controller took ownership.
#[derive(Clone)]
struct SharedDesktop(Arc<Mutex<VirtualActuator>>);

impl SharedDesktop {
    fn new() -> Self {
        Self::on(SCREEN)
    }

    fn on(screen: ScreenSize) -> Self {
        Self(Arc::new(Mutex::new(VirtualActuator::new(screen))))
    }

    fn with<T>(&self, f: impl FnOnce(&VirtualActuator) -> T) -> T {
        f(&self.0.lock().unwrap())
    }
}

impl Actuator for SharedDesktop {
    fn move_cursor(&mut self, point: ScreenPoint) -> FacemouseResult<()> {
        self.0.lock().unwrap().move_cursor(point)
    }

    fn click(&mut self) -> FacemouseResult<()> {
        self.0.lock().unwrap().click()
    }

    fn cursor_position(&mut self) -> FacemouseResult<ScreenPoint> {
        self.0.lock().unwrap().cursor_position()
    }

    fn screen_size(&mut self) -> FacemouseResult<ScreenSize> {
        self.0.lock().unwrap().screen_size()
    }

    fn tracking_changed(&mut self, enabled: bool) -> FacemouseResult<()> {
        self.0.lock().unwrap().tracking_changed(enabled)
    }

    fn name(&self) -> &str {
        "shared"
    }
}

fn temp_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(name);
    let _ = std::fs::remove_dir_all(&dir);
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

fn build(
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

#[test]
fn demo_session_clicks_once_and_toggles_twice() {
    let frames = demo_session(4);
    let total = frames.len() as u64;
    let desktop = SharedDesktop::new();
    let mut ctl = build(
        &ControllerConfig::default(),
        Box::new(SyntheticSource::new(frames)),
        Box::new(desktop.clone()),
    );

    let mut reports: Vec<FrameReport> = Vec::new();
    let summary = ctl.run_with(|r| reports.push(r.clone())).unwrap();

    assert_eq!(summary.frames, total);
    assert_eq!(summary.clicks, 1);
    assert_eq!(summary.toggles, 2);
    assert_eq!(summary.stop_reason, StopReason::EndOfStream);
    assert_eq!(ctl.state().interaction(), InteractionState::Tracking);

    // Nothing moves or clicks while paused
    for report in reports.iter().filter(|r| r.outcome.state == InteractionState::Paused) {
        assert_eq!(report.pointer, None);
        assert!(!report.outcome.click);
    }

    desktop.with(|d| {
        assert_eq!(d.clicks(), 1);
        let toggles: Vec<bool> = d
            .actions()
            .iter()
            .filter_map(|a| match a.kind {
                ActionKind::Tracking { enabled } => Some(enabled),
                _ => None,
            })
            .collect();
        assert_eq!(toggles, [false, true]);
        for action in d.actions() {
            if let Some(p) = action.position() {
                assert!(SCREEN.contains(p));
            }
        }
    });
}

#[test]
fn cursor_converges_on_held_nose() {
    let mut script = SyntheticScript::new(640, FRAME_HEIGHT);
    script.look_at(40, LandmarkPoint::new(0.55, 0.45));
    let mut ctl = build(
        &ControllerConfig::default(),
        Box::new(SyntheticSource::new(script.into_frames())),
        Box::new(SharedDesktop::new()),
    );

    let mut last = None;
    ctl.run_with(|r| last = r.pointer).unwrap();

    // 0.05 off center at sensitivity 5 lands halfway to the edge
    let last = last.unwrap();
    assert!(last.distance_to(ScreenPoint::new(1440.0, 270.0)) < 1e-6);
}

#[test]
fn jsonl_recording_replays_like_memory() {
    let dir = temp_dir("facemouse_test_jsonl_replay");
    let path = dir.join("session.jsonl");
    let frames = demo_session(2);
    let mut file = std::fs::File::create(&path).unwrap();
    writeln!(file, "# {{\"detector\":\"synthetic\"}}").unwrap();
    file.write_all(serialize_frames(&frames).unwrap().as_bytes())
        .unwrap();
    drop(file);

    let source = JsonlFrameSource::from_path(&path).unwrap();
    let mut ctl = build(
        &ControllerConfig::default(),
        Box::new(source),
        Box::new(SharedDesktop::new()),
    );
    let summary = ctl.run().unwrap();
    assert_eq!(summary.frames, frames.len() as u64);
    assert_eq!(summary.clicks, 1);
    assert_eq!(summary.toggles, 2);

    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn malformed_line_ends_run_unless_retried() {
    let dir = temp_dir("facemouse_test_malformed");
    let path = dir.join("broken.jsonl");
    let good = serialize_frames(&demo_session(1)[..3]).unwrap();
    std::fs::write(&path, format!("{good}{{not a frame}}\n{good}")).unwrap();

    let source = JsonlFrameSource::from_path(&path).unwrap();
    let mut ctl = build(
        &ControllerConfig::default(),
        Box::new(source),
        Box::new(SharedDesktop::new()),
    );
    let summary = ctl.run().unwrap();
    assert_eq!(summary.frames, 3);
    match summary.stop_reason {
        StopReason::CaptureFailed { message } => assert!(message.contains("line 4")),
        other => panic!("unexpected stop reason: {other}"),
    }

    let config = ControllerConfig {
        max_capture_retries: 1,
        ..ControllerConfig::default()
    };
    let source = JsonlFrameSource::from_path(&path).unwrap();
    let mut ctl = build(&config, Box::new(source), Box::new(SharedDesktop::new()));
    let summary = ctl.run().unwrap();
    assert_eq!(summary.frames, 6);
    assert_eq!(summary.stop_reason, StopReason::EndOfStream);

    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn parameter_changes_apply_on_next_frame() {
    let mut script = SyntheticScript::new(640, FRAME_HEIGHT);
    script.look_at(6, LandmarkPoint::new(0.5, 0.5));
    let params = Arc::new(SharedParameters::new(ParameterSnapshot::new(5, 5)));

    let mut ctl = Controller::new(
        &ControllerConfig::default(),
        Box::new(SyntheticSource::new(script.into_frames())),
        Box::new(RecordedLandmarkDetector::new()),
        Box::new(SharedDesktop::new()),
        Box::new(params.clone()),
    );

    let mut seen = Vec::new();
    let writer = params.clone();
    ctl.run_with(|r| {
        seen.push((r.status.sensitivity, r.status.smoothness));
        if r.frame_index == 2 {
            writer.set(ParameterSnapshot::new(40, 10));
        }
    })
    .unwrap();

    assert_eq!(seen[2], (5, 0.5));
    assert_eq!(seen[3], (20, 1.0));
}

#[test]
fn recording_actuator_writes_action_log() {
    let dir = temp_dir("facemouse_test_action_log");
    let path = dir.join("actions.jsonl");
    {
        let desktop = VirtualActuator::recording(SCREEN, &path).unwrap();
        let mut ctl = build(
            &ControllerConfig::default(),
            Box::new(SyntheticSource::new(demo_session(2))),
            Box::new(desktop),
        );
        ctl.run().unwrap();
    }

    let content = std::fs::read_to_string(&path).unwrap();
    let actions = parse_actions(&content).unwrap();
    assert_eq!(actions.iter().filter(|a| a.is_click()).count(), 1);
    assert_eq!(
        actions
            .iter()
            .filter(|a| matches!(a.kind, ActionKind::Tracking { .. }))
            .count(),
        2
    );

    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn face_loss_while_mouth_open_rearms_click() {
    let open = face_at(LandmarkPoint::new(0.5, 0.5), 30, FRAME_HEIGHT);
    let mut script = SyntheticScript::new(640, FRAME_HEIGHT);
    script
        .hold(3, Some(&open), None)
        .hold(2, None, None)
        .hold(3, Some(&open), None);

    let mut ctl = build(
        &ControllerConfig::default(),
        Box::new(SyntheticSource::new(script.frames().to_vec())),
        Box::new(SharedDesktop::new()),
    );
    assert_eq!(ctl.run().unwrap().clicks, 2);

    let config = ControllerConfig {
        reset_latches_on_absence: false,
        ..ControllerConfig::default()
    };
    let mut ctl = build(
        &config,
        Box::new(SyntheticSource::new(script.into_frames())),
        Box::new(SharedDesktop::new()),
    );
    assert_eq!(ctl.run().unwrap().clicks, 1);
}

#[test]
fn far_out_lip_coordinates_do_not_stop_the_loop() {
    let mut points = face_at(LandmarkPoint::new(0.5, 0.5), 0, FRAME_HEIGHT)
        .points()
        .to_vec();
    points[face_index::UPPER_LIP] = LandmarkPoint::new(0.5, -1e300);
    points[face_index::LOWER_LIP] = LandmarkPoint::new(0.5, 1e300);
    let frames: Vec<LandmarkFrame> = (0..3)
        .map(|i| {
            LandmarkFrame::empty(i * 33_000_000, 640, FRAME_HEIGHT)
                .with_face(FaceLandmarks::new(points.clone()))
        })
        .collect();
    let jsonl = serialize_frames(&frames).unwrap();

    let desktop = SharedDesktop::new();
    let mut ctl = build(
        &ControllerConfig::default(),
        Box::new(JsonlFrameSource::new(Cursor::new(jsonl), "far-lips")),
        Box::new(desktop.clone()),
    );
    let mut gaps = Vec::new();
    let summary = ctl
        .run_with(|r| gaps.push(r.signals.mouth_distance_px))
        .unwrap();

    assert_eq!(summary.frames, 3);
    assert_eq!(summary.stop_reason, StopReason::EndOfStream);
    assert_eq!(summary.clicks, 1);
    assert!(gaps.iter().all(|g| *g == Some(u32::MAX)));
    desktop.with(|d| assert_eq!(d.clicks(), 1));
}

fn nose_coordinate() -> impl Strategy<Value = f64> {
    prop_oneof![
        4 => -0.5..1.5f64,
        1 => -1e12..1e12f64,
        1 => Just(-1e300),
        1 => Just(1e300),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn every_emitted_position_lies_on_screen(
        noses in prop::collection::vec((nose_coordinate(), nose_coordinate()), 1..40),
        gap in 0u32..40,
        sensitivity in 0u32..30,
        smoothness in 0u32..25,
        width in 1u32..4000,
        height in 1u32..3000,
    ) {
        let screen = ScreenSize::new(width, height);
        let mut script = SyntheticScript::new(640, FRAME_HEIGHT);
        for (x, y) in &noses {
            let face = face_at(LandmarkPoint::new(*x, *y), gap, FRAME_HEIGHT);
            script.hold(1, Some(&face), None);
        }

        let desktop = SharedDesktop::on(screen);
        let mut ctl = Controller::new(
            &ControllerConfig::default(),
            Box::new(SyntheticSource::new(script.into_frames())),
            Box::new(RecordedLandmarkDetector::new()),
            Box::new(desktop.clone()),
            Box::new(FixedParameters::new(ParameterSnapshot::new(sensitivity, smoothness))),
        );
        let mut placed = Vec::new();
        let summary = ctl
            .run_with(|r| placed.extend(r.target.into_iter().chain(r.pointer)))
            .unwrap();
        prop_assert_eq!(summary.frames, noses.len() as u64);
        prop_assert!(!placed.is_empty());

        // Checked before the desktop gets a chance to clamp
        for p in &placed {
            prop_assert!(screen.contains(*p), "{:?} off a {}x{} screen", p, width, height);
        }
        desktop.with(|d| {
            for action in d.actions() {
                if let Some(p) = action.position() {
                    assert!(screen.contains(p), "{p:?} off a {width}x{height} screen");
                }
            }
        });
    }
}
