//! Error types.

use thiserror::Error;

/// Errors raised while measuring a surface.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SurfaceError {
    #[error("Surface has no measurements yet")]
    Unmeasured,

    #[error("Layout lookup failed: {0}")]
    Layout(String),
}

/// Errors raised while reading tracker configuration.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("Invalid delay {value:?}: {reason}")]
    InvalidDelay { value: String, reason: String },
}
