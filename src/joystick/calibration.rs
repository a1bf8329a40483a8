//! # Calibration Module
//!
//! Tracks the raw bounds of each joystick axis.
//!
//! ## Bounds Policy
//!
//! Every axis starts with conservative bounds around the expected mechanical
//! travel (200..1500 with the stock ADS1015 wiring). Calibration overwrites
//! only the center, using the mean of the rest-position samples. From then on
//! `min` and `max` widen as real extremes are observed and never shrink. The
//! center is never recomputed, since moving it mid-run would make the
//! normalized output jump.
//!
//! ## Usage
//!
//! ```
//! use robot_joystick::joystick::calibration::{Axis, AxisCalibrator};
//!
//! let mut axis = Axis::new(200, 1500, 800);
//! AxisCalibrator::apply(&mut axis, &[810, 812, 808]).unwrap();
//! assert_eq!(axis.center, 810);
//!
//! axis.update(1620);
//! assert_eq!(axis.max, 1620);
//! ```

use tokio::time::Duration;

use crate::error::{JoystickError, Result};

/// Conservative starting lower bound
pub const DEFAULT_AXIS_MIN: i32 = 200;
/// Conservative starting upper bound
pub const DEFAULT_AXIS_MAX: i32 = 1500;
/// Center assumed before calibration
pub const DEFAULT_AXIS_CENTER: i32 = 800;

/// Samples averaged per axis
pub const DEFAULT_CALIBRATION_SAMPLES: usize = 10;
/// Delay between calibration samples
pub const DEFAULT_SAMPLE_INTERVAL_MS: u64 = 200;

/// Raw bounds of one joystick axis.
///
/// Once calibrated, `min <= center <= max` holds. During the initial
/// conservative phase the center may sit outside the bounds until the first
/// readings widen them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Axis {
    pub min: i32,
    pub max: i32,
    pub center: i32,
}

impl Default for Axis {
    fn default() -> Self {
        Self {
            min: DEFAULT_AXIS_MIN,
            max: DEFAULT_AXIS_MAX,
            center: DEFAULT_AXIS_CENTER,
        }
    }
}

impl Axis {
    #[must_use]
    pub fn new(min: i32, max: i32, center: i32) -> Self {
        Self { min, max, center }
    }

    /// Widens the bounds to include `sample`.
    pub fn update(&mut self, sample: i32) {
        self.min = self.min.min(sample);
        self.max = self.max.max(sample);
    }

    /// Scale used for normalization: `max - center`.
    ///
    /// The same scale applies on both sides of center, so a reading below
    /// center can normalize past `-1.0` when `min` is further from center
    /// than `max` is.
    ///
    /// # Errors
    ///
    /// Returns [`JoystickError::CalibrationDegenerate`] when `max == center`.
    pub fn span(&self) -> Result<i32> {
        let span = self.max - self.center;
        if span == 0 {
            return Err(JoystickError::CalibrationDegenerate(format!(
                "max equals center (min={}, center={}, max={})",
                self.min, self.center, self.max
            )));
        }
        Ok(span)
    }

    /// True when the axis has no usable scale yet.
    #[must_use]
    pub fn is_degenerate(&self) -> bool {
        self.max == self.center
    }
}

/// Computes the rest position of an axis from repeated samples.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AxisCalibrator {
    samples: usize,
    interval: Duration,
}

impl Default for AxisCalibrator {
    fn default() -> Self {
        Self {
            samples: DEFAULT_CALIBRATION_SAMPLES,
            interval: Duration::from_millis(DEFAULT_SAMPLE_INTERVAL_MS),
        }
    }
}

impl AxisCalibrator {
    #[must_use]
    pub fn new(samples: usize, interval: Duration) -> Self {
        Self { samples, interval }
    }

    /// Number of samples taken per axis
    #[must_use]
    pub fn samples(&self) -> usize {
        self.samples
    }

    /// Delay between consecutive samples
    #[must_use]
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Mean of `samples`, rounded to the nearest integer.
    ///
    /// # Errors
    ///
    /// Returns [`JoystickError::CalibrationDegenerate`] if `samples` is empty.
    pub fn center_of(samples: &[i32]) -> Result<i32> {
        if samples.is_empty() {
            return Err(JoystickError::CalibrationDegenerate(
                "no calibration samples".to_string(),
            ));
        }
        let sum: i64 = samples.iter().map(|&s| i64::from(s)).sum();
        let mean = sum as f64 / samples.len() as f64;
        Ok(mean.round() as i32)
    }

    /// Overwrites the axis center with the mean of `samples`.
    ///
    /// `min` and `max` are left untouched.
    pub fn apply(axis: &mut Axis, samples: &[i32]) -> Result<()> {
        axis.center = Self::center_of(samples)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ==================== Axis Tests ====================

    #[test]
    fn test_axis_default_bounds() {
        let axis = Axis::default();
        assert_eq!(axis, Axis::new(200, 1500, 800));
    }

    #[test]
    fn test_update_widens_bounds() {
        let mut axis = Axis::default();
        axis.update(150);
        axis.update(1600);
        assert_eq!(axis.min, 150);
        assert_eq!(axis.max, 1600);
    }

    #[test]
    fn test_update_inside_bounds_is_noop() {
        let mut axis = Axis::default();
        axis.update(900);
        assert_eq!(axis, Axis::default());
    }

    #[test]
    fn test_bounds_are_monotonic() {
        let mut axis = Axis::default();
        let readings = [800, 120, 1450, 90, 1700, 300, 1650, 60, 800];
        let mut last = axis;
        for r in readings {
            axis.update(r);
            assert!(axis.min <= last.min);
            assert!(axis.max >= last.max);
            last = axis;
        }
        assert_eq!(axis.min, 60);
        assert_eq!(axis.max, 1700);
    }

    #[test]
    fn test_update_never_moves_center() {
        let mut axis = Axis::new(200, 1500, 812);
        axis.update(0);
        axis.update(2047);
        assert_eq!(axis.center, 812);
    }

    #[test]
    fn test_span_is_upper_travel() {
        let axis = Axis::new(200, 1500, 800);
        assert_eq!(axis.span().unwrap(), 700);
        assert!(!axis.is_degenerate());
    }

    #[test]
    fn test_span_degenerate() {
        let axis = Axis::new(200, 800, 800);
        assert!(matches!(
            axis.span(),
            Err(JoystickError::CalibrationDegenerate(_))
        ));
        assert!(axis.is_degenerate());
    }

    #[test]
    fn test_span_center_above_max() {
        // Center above the conservative max before any widening
        let axis = Axis::new(200, 1500, 1550);
        assert_eq!(axis.span().unwrap(), -50);
        assert!(!axis.is_degenerate());
    }

    // ==================== AxisCalibrator Tests ====================

    #[test]
    fn test_center_of_mean() {
        assert_eq!(AxisCalibrator::center_of(&[800, 810, 820]).unwrap(), 810);
    }

    #[test]
    fn test_center_of_rounds_to_nearest() {
        assert_eq!(AxisCalibrator::center_of(&[800, 801]).unwrap(), 801);
        assert_eq!(AxisCalibrator::center_of(&[800, 800, 801]).unwrap(), 800);
    }

    #[test]
    fn test_center_of_identical_samples() {
        let samples = [777; DEFAULT_CALIBRATION_SAMPLES];
        assert_eq!(AxisCalibrator::center_of(&samples).unwrap(), 777);
    }

    #[test]
    fn test_center_of_empty_is_degenerate() {
        assert!(matches!(
            AxisCalibrator::center_of(&[]),
            Err(JoystickError::CalibrationDegenerate(_))
        ));
    }

    #[test]
    fn test_apply_keeps_bounds() {
        let mut axis = Axis::default();
        AxisCalibrator::apply(&mut axis, &[830; 10]).unwrap();
        assert_eq!(axis, Axis::new(200, 1500, 830));
    }

    #[test]
    fn test_calibrator_defaults() {
        let cal = AxisCalibrator::default();
        assert_eq!(cal.samples(), 10);
        assert_eq!(cal.interval(), Duration::from_millis(200));
    }
}
