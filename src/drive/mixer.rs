//! # Differential Drive Mixer
//!
//! Converts a normalized stick position into left/right wheel speeds.
//!
//! ## Algorithm
//!
//! The stick deflection (distance from center) sets the speed of the
//! dominant side. Pulling back makes it negative. The other side is
//! attenuated by the stick angle measured from the forward axis:
//!
//! ```text
//! dominant   = round1(sqrt(x² + y²)), negated if y < 0
//! turn_ratio = |atan(x / y)| * (2 / (π/2))      y == 0 is replaced by 0.00001
//! weak       = round1(dominant * (1 - turn_ratio))
//! (left, right) = if x > 0 { (dominant, weak) } else { (weak, dominant) }
//! ```
//!
//! `turn_ratio` runs from 0 (stick straight ahead) to 2 (stick fully
//! sideways), so the weak side goes from matching the dominant side, through
//! stopped at 45°, to full reverse. A stick pushed hard right with no Y
//! component therefore pivots in place: `mix(1.0, 0.0) == (1.0, -1.0)`.

use std::f64::consts::FRAC_PI_2;

use crate::math::round_tenths;

/// Substitute for `y == 0` when computing the stick angle
const Y_EPSILON: f64 = 0.00001;

/// Mixes a normalized (x, y) stick position into `(left, right)` speeds.
///
/// Speeds are signed: negative drives the wheel backward.
///
/// # Examples
///
/// ```
/// use robot_joystick::drive::mixer::mix;
///
/// assert_eq!(mix(0.0, 1.0), (1.0, 1.0));   // straight ahead
/// assert_eq!(mix(0.0, -1.0), (-1.0, -1.0)); // straight back
/// assert_eq!(mix(0.5, 0.5), (0.7, 0.0));   // 45° right: right side stopped
/// assert_eq!(mix(0.0, 0.0), (0.0, 0.0));   // centered
/// ```
#[must_use]
pub fn mix(x: f64, y: f64) -> (f64, f64) {
    let mut dominant = round_tenths((x * x + y * y).sqrt());
    if y < 0.0 {
        dominant = -dominant;
    }

    let y = if y == 0.0 { Y_EPSILON } else { y };
    let turn_ratio = (x / y).atan().abs() * (2.0 / FRAC_PI_2);
    let weak = round_tenths(dominant * (1.0 - turn_ratio));

    if x > 0.0 {
        (dominant, weak)
    } else {
        (weak, dominant)
    }
}
