//! Clock and timing utilities for the frame loop.
//!
//! Every session is anchored to a monotonic epoch taken when the loop
//! starts. Frames and emitted pointer actions are stamped in nanoseconds
//! relative to that epoch.

use std::time::Instant;

/// A session clock that provides monotonic timestamps relative to
/// a fixed epoch (the moment the controller started).
#[derive(Debug, Clone)]
pub struct SessionClock {
    epoch: Instant,

    /// Wall-clock time at epoch (RFC 3339).
    epoch_wall: String,
}

impl SessionClock {
    /// Create a new clock anchored to now.
    pub fn start() -> Self {
        Self {
            epoch: Instant::now(),
            epoch_wall: chrono::Utc::now().to_rfc3339(),
        }
    }

    /// Nanoseconds elapsed since the session started.
    pub fn elapsed_ns(&self) -> u64 {
        self.epoch.elapsed().as_nanos() as u64
    }

    /// Seconds elapsed since the session started.
    pub fn elapsed_secs(&self) -> f64 {
        self.epoch.elapsed().as_secs_f64()
    }

    /// Wall-clock time at session start.
    pub fn epoch_wall(&self) -> &str {
        &self.epoch_wall
    }

    pub fn ns_to_secs(ns: u64) -> f64 {
        ns as f64 / 1_000_000_000.0
    }
}

/// Rate limiter for periodic work inside the frame loop (status logs).
#[derive(Debug)]
pub struct RateController {
    target_interval_ns: u64,
    last_tick_ns: Option<u64>,
}

impl RateController {
    /// Create a controller targeting the given Hz rate.
    pub fn new(target_hz: u32) -> Self {
        Self {
            target_interval_ns: 1_000_000_000 / target_hz.max(1) as u64,
            last_tick_ns: None,
        }
    }

    /// Returns true, and records the tick, when at least one interval has
    /// passed since the previous tick. The first call always returns true.
    pub fn should_tick(&mut self, current_ns: u64) -> bool {
        match self.last_tick_ns {
            None => {
                self.last_tick_ns = Some(current_ns);
                true
            }
            Some(last) if current_ns >= last + self.target_interval_ns => {
                self.last_tick_ns = Some(current_ns);
                true
            }
            _ => false,
        }
    }

    pub fn interval_ns(&self) -> u64 {
        self.target_interval_ns
    }
}

/// Running frame-rate estimate over the frames seen since the last reset.
#[derive(Debug, Default)]
pub struct FrameRateMeter {
    window_start_ns: Option<u64>,
    frames: u64,
}

impl FrameRateMeter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one frame at `timestamp_ns`.
    pub fn record(&mut self, timestamp_ns: u64) {
        if self.window_start_ns.is_none() {
            self.window_start_ns = Some(timestamp_ns);
        }
        self.frames += 1;
    }

    /// Frames per second between the first recorded frame and `now_ns`.
    /// `None` until the window spans a non-zero duration.
    pub fn fps(&self, now_ns: u64) -> Option<f64> {
        let start = self.window_start_ns?;
        let span = now_ns.checked_sub(start).filter(|span| *span > 0)?;
        Some(self.frames as f64 / SessionClock::ns_to_secs(span))
    }

    /// Start a new measurement window.
    pub fn reset(&mut self) {
        self.window_start_ns = None;
        self.frames = 0;
    }
}
