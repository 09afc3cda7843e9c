//! Frame sources and the detector for pre-extracted landmarks.
//!
//! Landmark streams come either from a JSONL file / pipe written by an
//! external detector process, or from an in-memory script.

use std::collections::VecDeque;
use std::fs::File;
use std::io::{BufRead, BufReader, Stdin};
use std::path::Path;
use std::time::{Duration, Instant};

use facemouse_common::error::{FacemouseError, FacemouseResult};
use facemouse_landmark_model::{
    is_frame_line, parse_frame, FaceLandmarks, HandLandmarks, LandmarkFrame,
};

use crate::{CapturedFrame, FrameImage, FrameSource, LandmarkDetector};

fn recorded(sequence: u64, frame: LandmarkFrame) -> CapturedFrame {
    CapturedFrame {
        sequence,
        timestamp_ns: Some(frame.timestamp_ns),
        width: frame.width,
        height: frame.height,
        image: FrameImage::Recorded {
            face: frame.face,
            hand: frame.hand,
        },
    }
}

/// Reads one [`LandmarkFrame`] per line.
///
/// End of input is the end of the stream. An unreadable or malformed line
/// is a capture failure; the reader stays positioned after it, so a caller
/// may retry and continue with the next line.
pub struct JsonlFrameSource<R: BufRead + Send> {
    reader: Option<R>,
    name: String,
    line_number: u64,
    sequence: u64,
    line: String,
}

impl<R: BufRead + Send> JsonlFrameSource<R> {
    pub fn new(reader: R, name: impl Into<String>) -> Self {
        Self {
            reader: Some(reader),
            name: name.into(),
            line_number: 0,
            sequence: 0,
            line: String::new(),
        }
    }

    /// Lines consumed so far, headers and blanks included.
    pub fn line_number(&self) -> u64 {
        self.line_number
    }
}

impl JsonlFrameSource<BufReader<File>> {
    pub fn from_path(path: impl AsRef<Path>) -> FacemouseResult<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| {
            FacemouseError::capture(format!("Failed to open {}: {e}", path.display()))
        })?;
        Ok(Self::new(BufReader::new(file), path.display().to_string()))
    }
}

impl JsonlFrameSource<BufReader<Stdin>> {
    /// Frames piped in on standard input.
    pub fn stdin() -> Self {
        Self::new(BufReader::new(std::io::stdin()), "stdin")
    }
}

impl<R: BufRead + Send> FrameSource for JsonlFrameSource<R> {
    fn capture_frame(&mut self) -> FacemouseResult<Option<CapturedFrame>> {
        let Some(reader) = self.reader.as_mut() else {
            return Err(FacemouseError::capture(format!(
                "{} has been released",
                self.name
            )));
        };

        loop {
            self.line.clear();
            let read = reader.read_line(&mut self.line).map_err(|e| {
                FacemouseError::capture(format!(
                    "Failed to read line {} of {}: {e}",
                    self.line_number + 1,
                    self.name
                ))
            })?;
            if read == 0 {
                return Ok(None);
            }
            self.line_number += 1;

            if !is_frame_line(&self.line) {
                continue;
            }

            let frame = parse_frame(&self.line).map_err(|e| {
                FacemouseError::capture(format!(
                    "Malformed frame at line {} of {}: {e}",
                    self.line_number, self.name
                ))
            })?;

            let captured = recorded(self.sequence, frame);
            self.sequence += 1;
            return Ok(Some(captured));
        }
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn release(&mut self) -> FacemouseResult<()> {
        if self.reader.take().is_some() {
            tracing::debug!(source = %self.name, lines = self.line_number, "Landmark stream closed");
        }
        Ok(())
    }
}

/// Replays frames held in memory.
#[derive(Debug, Default)]
pub struct SyntheticSource {
    frames: VecDeque<LandmarkFrame>,
    sequence: u64,
    released: bool,
}

impl SyntheticSource {
    pub fn new(frames: Vec<LandmarkFrame>) -> Self {
        Self {
            frames: frames.into(),
            sequence: 0,
            released: false,
        }
    }

    pub fn remaining(&self) -> usize {
        self.frames.len()
    }

    pub fn is_released(&self) -> bool {
        self.released
    }
}

impl FrameSource for SyntheticSource {
    fn capture_frame(&mut self) -> FacemouseResult<Option<CapturedFrame>> {
        if self.released {
            return Err(FacemouseError::capture("synthetic source has been released"));
        }
        Ok(self.frames.pop_front().map(|frame| {
            let captured = recorded(self.sequence, frame);
            self.sequence += 1;
            captured
        }))
    }

    fn name(&self) -> &str {
        "synthetic"
    }

    fn release(&mut self) -> FacemouseResult<()> {
        self.released = true;
        Ok(())
    }
}

/// Delays frames so that they are delivered no faster than their
/// timestamps, for replaying recordings in real time.
pub struct Paced<S> {
    inner: S,
    anchor: Option<(Instant, u64)>,
}

impl<S: FrameSource> Paced<S> {
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            anchor: None,
        }
    }

    pub fn into_inner(self) -> S {
        self.inner
    }
}

impl<S: FrameSource> FrameSource for Paced<S> {
    fn capture_frame(&mut self) -> FacemouseResult<Option<CapturedFrame>> {
        let frame = self.inner.capture_frame()?;
        let Some(t) = frame.as_ref().and_then(|f| f.timestamp_ns) else {
            return Ok(frame);
        };

        match self.anchor {
            None => self.anchor = Some((Instant::now(), t)),
            Some((started, first_t)) => {
                let due = started + Duration::from_nanos(t.saturating_sub(first_t));
                let now = Instant::now();
                if due > now {
                    std::thread::sleep(due - now);
                }
            }
        }
        Ok(frame)
    }

    fn name(&self) -> &str {
        self.inner.name()
    }

    fn release(&mut self) -> FacemouseResult<()> {
        self.inner.release()
    }
}

/// Detector for frames that already carry landmarks.
///
/// Raw pixel frames yield nothing; running a landmark model on them is the
/// job of an external detector process.
#[derive(Debug, Default)]
pub struct RecordedLandmarkDetector {
    warned_raw: bool,
}

impl RecordedLandmarkDetector {
    pub fn new() -> Self {
        Self::default()
    }

    fn note_raw_frame(&mut self) {
        if !self.warned_raw {
            self.warned_raw = true;
            tracing::warn!("Raw image frames carry no landmarks; treating as empty");
        }
    }
}

impl LandmarkDetector for RecordedLandmarkDetector {
    fn detect_face(&mut self, frame: &CapturedFrame) -> Option<FaceLandmarks> {
        match &frame.image {
            FrameImage::Recorded { face, .. } => face.clone(),
            FrameImage::Rgb(_) => {
                self.note_raw_frame();
                None
            }
        }
    }

    fn detect_hand(&mut self, frame: &CapturedFrame) -> Option<HandLandmarks> {
        match &frame.image {
            FrameImage::Recorded { hand, .. } => hand.clone(),
            FrameImage::Rgb(_) => {
                self.note_raw_frame();
                None
            }
        }
    }

    fn name(&self) -> &str {
        "recorded"
    }
}
