//! Live-adjustable pointer parameters.
//!
//! Values use the scale of the overlay slider controls: sensitivity
//! `1..=20` and smoothness in tenths `0..=20`. Out-of-range values are
//! clamped when read, never rejected.

use std::sync::atomic::{AtomicU64, Ordering};

use facemouse_common::config::ParameterDefaults;
use facemouse_processing_core::{Sensitivity, SmoothingFactor};
use serde::{Deserialize, Serialize};

use crate::ParameterSource;

pub const SENSITIVITY_RANGE: (u32, u32) = (1, 20);
pub const SMOOTHNESS_RAW_RANGE: (u32, u32) = (0, 20);

/// One frame's view of the parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParameterSnapshot {
    pub sensitivity: u32,
    pub smoothness_raw: u32,
}

impl ParameterSnapshot {
    pub fn new(sensitivity: u32, smoothness_raw: u32) -> Self {
        Self {
            sensitivity,
            smoothness_raw,
        }
    }

    /// Copy with both values clamped to their slider ranges.
    pub fn clamped(self) -> Self {
        Self {
            sensitivity: self
                .sensitivity
                .clamp(SENSITIVITY_RANGE.0, SENSITIVITY_RANGE.1),
            smoothness_raw: self
                .smoothness_raw
                .clamp(SMOOTHNESS_RAW_RANGE.0, SMOOTHNESS_RAW_RANGE.1),
        }
    }

    pub fn sensitivity(self) -> Sensitivity {
        Sensitivity::from(self.clamped().sensitivity)
    }

    pub fn smoothing(self) -> SmoothingFactor {
        SmoothingFactor::from_tenths(self.clamped().smoothness_raw)
    }

    fn pack(self) -> u64 {
        (u64::from(self.sensitivity) << 32) | u64::from(self.smoothness_raw)
    }

    fn unpack(bits: u64) -> Self {
        Self {
            sensitivity: (bits >> 32) as u32,
            smoothness_raw: bits as u32,
        }
    }
}

impl From<&ParameterDefaults> for ParameterSnapshot {
    fn from(defaults: &ParameterDefaults) -> Self {
        Self::new(defaults.sensitivity, defaults.smoothness_raw)
    }
}

/// Parameters that never change during a run.
#[derive(Debug, Clone, Copy)]
pub struct FixedParameters(ParameterSnapshot);

impl FixedParameters {
    pub fn new(snapshot: ParameterSnapshot) -> Self {
        Self(snapshot)
    }
}

impl ParameterSource for FixedParameters {
    fn snapshot(&self) -> ParameterSnapshot {
        self.0
    }
}

/// Parameters written from another thread (UI controls, IPC).
///
/// Both values live in a single atomic word so the frame loop never observes
/// a sensitivity from one update paired with a smoothness from another.
#[derive(Debug)]
pub struct SharedParameters {
    packed: AtomicU64,
}

impl SharedParameters {
    pub fn new(initial: ParameterSnapshot) -> Self {
        Self {
            packed: AtomicU64::new(initial.pack()),
        }
    }

    /// Replace both values at once.
    pub fn set(&self, snapshot: ParameterSnapshot) {
        self.packed.store(snapshot.pack(), Ordering::Release);
    }

    pub fn set_sensitivity(&self, sensitivity: u32) {
        self.update(|s| s.sensitivity = sensitivity);
    }

    pub fn set_smoothness_raw(&self, smoothness_raw: u32) {
        self.update(|s| s.smoothness_raw = smoothness_raw);
    }

    fn update(&self, mut apply: impl FnMut(&mut ParameterSnapshot)) {
        let _ = self
            .packed
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |bits| {
                let mut snapshot = ParameterSnapshot::unpack(bits);
                apply(&mut snapshot);
                Some(snapshot.pack())
            });
    }
}

impl ParameterSource for SharedParameters {
    fn snapshot(&self) -> ParameterSnapshot {
        ParameterSnapshot::unpack(self.packed.load(Ordering::Acquire))
    }
}
