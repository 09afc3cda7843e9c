//! Rising-edge detection for per-frame boolean signals.
//!
//! A held gesture is `true` for many consecutive frames; the latch makes it
//! fire once per continuous run and re-arm as soon as the signal drops.

use serde::{Deserialize, Serialize};

/// Returns true exactly when `raw` is true and `latch` was false, then
/// stores `raw` into `latch`.
pub fn fire(raw: bool, latch: &mut bool) -> bool {
    let fired = raw && !*latch;
    *latch = raw;
    fired
}

/// A single edge latch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct EdgeLatch {
    latched: bool,
}

impl EdgeLatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed this frame's value; true on a rising edge.
    pub fn fire(&mut self, raw: bool) -> bool {
        fire(raw, &mut self.latched)
    }

    /// Re-arm the latch without firing.
    pub fn reset(&mut self) {
        self.latched = false;
    }

    pub fn is_latched(&self) -> bool {
        self.latched
    }
}
