//! Error types shared across Facemouse crates.

/// Top-level error type for Facemouse operations.
///
/// Absent landmarks are not represented here: a frame without a face or a
/// hand is a normal input and is modelled with `Option`.
#[derive(Debug, thiserror::Error)]
pub enum FacemouseError {
    #[error("Capture error: {message}")]
    Capture { message: String },

    #[error("Actuator error: {message}")]
    Actuator { message: String },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type alias using FacemouseError.
pub type FacemouseResult<T> = Result<T, FacemouseError>;

impl FacemouseError {
    pub fn capture(msg: impl Into<String>) -> Self {
        Self::Capture {
            message: msg.into(),
        }
    }

    pub fn actuator(msg: impl Into<String>) -> Self {
        Self::Actuator {
            message: msg.into(),
        }
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    /// Whether this error ends the frame loop.
    pub fn is_capture_failure(&self) -> bool {
        matches!(self, Self::Capture { .. })
    }
}
