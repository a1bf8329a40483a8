//! # Error Types
//!
//! Custom error types for Robot Joystick using `thiserror`.

use thiserror::Error;

/// Main error type for Robot Joystick
#[derive(Debug, Error)]
pub enum JoystickError {
    /// ADC communication failure
    #[error("ADC read error: {0}")]
    HardwareRead(String),

    /// Message bus publish or connection failure
    #[error("Transport error: {0}")]
    Transport(String),

    /// Axis bounds collapsed onto the center, or no calibration samples
    #[error("Degenerate calibration: {0}")]
    CalibrationDegenerate(String),

    /// A panic raised inside the control loop
    #[error("Control loop panicked: {0}")]
    Panicked(String),

    /// Motor command serialization errors
    #[error("Encode error: {0}")]
    Encode(#[from] serde_json::Error),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(#[from] toml::de::Error),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for Robot Joystick
pub type Result<T> = std::result::Result<T, JoystickError>;
