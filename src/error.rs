//! # Error Types
//!
//! Custom error types for the RockBLOCK telemetry decoder using `thiserror`.

use std::num::{ParseFloatError, ParseIntError};
use thiserror::Error;

/// Main error type for the telemetry decoder
#[derive(Debug, Error)]
pub enum TelemetryError {
    /// Decoded payload is shorter than the fixed frame size
    #[error("Frame too short: expected {expected} bytes, got {actual}")]
    FrameTooShort { expected: usize, actual: usize },

    /// An envelope field is present but is not a valid integer
    #[error("Invalid integer in field '{field}': {value:?}")]
    InvalidInteger {
        field: &'static str,
        value: String,
        #[source]
        source: ParseIntError,
    },

    /// An envelope field is present but is not a valid number
    #[error("Invalid number in field '{field}': {value:?}")]
    InvalidFloat {
        field: &'static str,
        value: String,
        #[source]
        source: ParseFloatError,
    },

    /// A calibration constant would produce non-finite readings
    #[error("Invalid calibration: {0}")]
    InvalidCalibration(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(#[from] toml::de::Error),

    /// JSON serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for the telemetry decoder
pub type Result<T> = std::result::Result<T, TelemetryError>;
