//! # Position Normalizer
//!
//! Maps raw axis samples onto `-1.0..=1.0` using the calibrated bounds.
//!
//! The result is rounded to one decimal place. That quantization is the
//! deadband: jitter of a few counts around center never produces a new motor
//! command.
//!
//! Callers must widen the bounds with the current sample before normalizing
//! it (see [`Joystick::get_position`](super::Joystick::get_position)), so the
//! current extreme always lies inside the range.

use tracing::warn;

use super::calibration::Axis;
use crate::math::round_tenths;

/// Normalized stick position, each component in `-1.0..=1.0`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct NormalizedPosition {
    pub x: f64,
    pub y: f64,
}

impl NormalizedPosition {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    #[must_use]
    pub fn is_centered(&self) -> bool {
        self.x == 0.0 && self.y == 0.0
    }
}

impl From<(f64, f64)> for NormalizedPosition {
    fn from((x, y): (f64, f64)) -> Self {
        Self { x, y }
    }
}

/// Normalizes one raw sample against its axis.
///
/// A sample exactly at center is `0.0`. Otherwise the offset from center is
/// divided by `max - center`, on both sides of center.
///
/// An axis whose `max` equals its center yields `0.0` and logs a warning,
/// until later samples widen the bounds.
///
/// # Examples
///
/// ```
/// use robot_joystick::joystick::calibration::Axis;
/// use robot_joystick::joystick::normalize::normalize_axis;
///
/// let axis = Axis::new(200, 1500, 800);
/// assert_eq!(normalize_axis(800, &axis), 0.0);
/// assert_eq!(normalize_axis(1500, &axis), 1.0);
/// assert_eq!(normalize_axis(500, &axis), -0.4);
/// ```
#[must_use]
pub fn normalize_axis(raw: i32, axis: &Axis) -> f64 {
    if raw == axis.center {
        return 0.0;
    }

    match axis.span() {
        Ok(span) => round_tenths(f64::from(raw - axis.center) / f64::from(span)),
        Err(e) => {
            warn!("Treating axis as centered: {}", e);
            0.0
        }
    }
}

/// Normalizes an (x, y) pair of raw samples.
///
/// # Examples
///
/// ```
/// use robot_joystick::joystick::calibration::Axis;
/// use robot_joystick::joystick::normalize::normalize;
///
/// let axis = Axis::new(200, 1500, 800);
/// assert_eq!(normalize(1150, 800, &axis, &axis), (0.5, 0.0));
/// ```
#[must_use]
pub fn normalize(raw_x: i32, raw_y: i32, x_axis: &Axis, y_axis: &Axis) -> (f64, f64) {
    (normalize_axis(raw_x, x_axis), normalize_axis(raw_y, y_axis))
}
