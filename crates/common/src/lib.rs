//! Facemouse Common Utilities
//!
//! Shared infrastructure for all Facemouse crates:
//! - Error types and result aliases
//! - Clock and frame-rate utilities for the control loop
//! - Tracing/logging initialization
//! - Controller configuration and defaults

pub mod clock;
pub mod config;
pub mod error;
pub mod logging;

pub use clock::*;
pub use config::*;
pub use error::*;
