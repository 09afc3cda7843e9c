//! Pointer actuators.
//!
//! - **xdotool:** drives the X11 cursor through the `xdotool` binary
//! - **virtual:** a simulated desktop that records every action, in memory
//!   and optionally to an append-only JSONL file

use std::path::Path;
use std::process::Command;

use facemouse_common::clock::SessionClock;
use facemouse_common::error::{FacemouseError, FacemouseResult};
use facemouse_landmark_model::{ActionStreamHeader, PointerAction, ScreenPoint, ScreenSize};

use crate::writer::JsonlWriter;
use crate::Actuator;

const XDOTOOL: &str = "xdotool";

/// X11 pointer control via `xdotool`.
#[derive(Debug)]
pub struct XdotoolActuator {
    program: String,
}

impl Default for XdotoolActuator {
    fn default() -> Self {
        Self::new()
    }
}

impl XdotoolActuator {
    pub fn new() -> Self {
        Self {
            program: XDOTOOL.to_string(),
        }
    }

    /// Use a different executable (a wrapper script, an absolute path).
    pub fn with_program(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// Whether the binary can be executed.
    pub fn is_available(&self) -> bool {
        Command::new(&self.program)
            .arg("version")
            .output()
            .map(|out| out.status.success())
            .unwrap_or(false)
    }

    fn run(&self, args: &[&str]) -> FacemouseResult<String> {
        let output = Command::new(&self.program).args(args).output().map_err(|e| {
            FacemouseError::actuator(format!("Failed to execute {}: {e}", self.program))
        })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(FacemouseError::actuator(format!(
                "{} {} exited with {}: {}",
                self.program,
                args.join(" "),
                output.status,
                stderr.trim()
            )));
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

impl Actuator for XdotoolActuator {
    fn move_cursor(&mut self, point: ScreenPoint) -> FacemouseResult<()> {
        let (x, y) = point.rounded();
        self.run(&["mousemove", &x.to_string(), &y.to_string()])?;
        Ok(())
    }

    fn click(&mut self) -> FacemouseResult<()> {
        self.run(&["click", "1"])?;
        Ok(())
    }

    fn cursor_position(&mut self) -> FacemouseResult<ScreenPoint> {
        let out = self.run(&["getmouselocation", "--shell"])?;
        parse_mouse_location(&out).ok_or_else(|| {
            FacemouseError::actuator(format!("Unexpected getmouselocation output: {out:?}"))
        })
    }

    fn screen_size(&mut self) -> FacemouseResult<ScreenSize> {
        let out = self.run(&["getdisplaygeometry"])?;
        parse_display_geometry(&out).ok_or_else(|| {
            FacemouseError::actuator(format!("Unexpected getdisplaygeometry output: {out:?}"))
        })
    }

    fn name(&self) -> &str {
        "xdotool"
    }
}

/// Parse `getmouselocation --shell` output (`X=..`, `Y=..` lines).
pub fn parse_mouse_location(output: &str) -> Option<ScreenPoint> {
    let mut x = None;
    let mut y = None;
    for line in output.lines() {
        match line.trim().split_once('=') {
            Some(("X", v)) => x = v.parse::<f64>().ok(),
            Some(("Y", v)) => y = v.parse::<f64>().ok(),
            _ => {}
        }
    }
    Some(ScreenPoint::new(x?, y?))
}

/// Parse `getdisplaygeometry` output (`WIDTH HEIGHT`).
pub fn parse_display_geometry(output: &str) -> Option<ScreenSize> {
    let mut parts = output.split_whitespace();
    let width = parts.next()?.parse().ok()?;
    let height = parts.next()?.parse().ok()?;
    Some(ScreenSize::new(width, height))
}

/// A simulated desktop.
///
/// Keeps the cursor position, stamps every action with the session clock and
/// records it in memory, to a JSONL file, or both.
pub struct VirtualActuator {
    screen: ScreenSize,
    cursor: ScreenPoint,
    clock: SessionClock,
    writer: Option<JsonlWriter>,
    history: Option<Vec<PointerAction>>,
}

impl VirtualActuator {
    /// In-memory desktop with the cursor at the center.
    pub fn new(screen: ScreenSize) -> Self {
        Self {
            screen,
            cursor: screen.center(),
            clock: SessionClock::start(),
            writer: None,
            history: Some(Vec::new()),
        }
    }

    /// Desktop that appends each action to the JSONL file at `path`.
    pub fn recording(screen: ScreenSize, path: impl AsRef<Path>) -> FacemouseResult<Self> {
        let clock = SessionClock::start();
        let header = ActionStreamHeader::new(clock.epoch_wall(), screen);
        let writer = JsonlWriter::with_header(path, &header)?;
        Ok(Self {
            screen,
            cursor: screen.center(),
            clock,
            writer: Some(writer),
            history: None,
        })
    }

    /// Start from a given cursor position instead of the center.
    pub fn with_cursor(mut self, cursor: ScreenPoint) -> Self {
        self.cursor = self.screen.clamp(cursor);
        self
    }

    pub fn cursor(&self) -> ScreenPoint {
        self.cursor
    }

    /// Recorded actions; empty for a file-only desktop.
    pub fn actions(&self) -> &[PointerAction] {
        self.history.as_deref().unwrap_or_default()
    }

    pub fn clicks(&self) -> usize {
        self.actions().iter().filter(|a| a.is_click()).count()
    }

    pub fn flush(&mut self) -> FacemouseResult<()> {
        match self.writer.as_mut() {
            Some(writer) => writer.flush(),
            None => Ok(()),
        }
    }

    fn record(&mut self, action: PointerAction) -> FacemouseResult<()> {
        if let Some(writer) = self.writer.as_mut() {
            writer.write_record(&action)?;
        }
        if let Some(history) = self.history.as_mut() {
            history.push(action);
        }
        Ok(())
    }
}

impl Actuator for VirtualActuator {
    fn move_cursor(&mut self, point: ScreenPoint) -> FacemouseResult<()> {
        self.cursor = self.screen.clamp(point);
        self.record(PointerAction::move_to(self.clock.elapsed_ns(), self.cursor))
    }

    fn click(&mut self) -> FacemouseResult<()> {
        self.record(PointerAction::click(self.clock.elapsed_ns(), self.cursor))
    }

    fn cursor_position(&mut self) -> FacemouseResult<ScreenPoint> {
        Ok(self.cursor)
    }

    fn screen_size(&mut self) -> FacemouseResult<ScreenSize> {
        Ok(self.screen)
    }

    fn tracking_changed(&mut self, enabled: bool) -> FacemouseResult<()> {
        self.record(PointerAction::tracking(self.clock.elapsed_ns(), enabled))
    }

    fn name(&self) -> &str {
        if self.writer.is_some() {
            "record"
        } else {
            "virtual"
        }
    }
}
