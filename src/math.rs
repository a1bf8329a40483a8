//! Numeric helpers shared by the normalizer and the drive mixer.

/// Rounds to one decimal place, from the exact value of `value`.
///
/// Both the normalized stick position and the mixed wheel speeds are
/// quantized to tenths, so sensor jitter smaller than half a step never
/// reaches the motors.
///
/// The decision is made on the exact binary value, not on `value * 10`:
/// `0.35` is stored as `0.34999..` and rounds down, while `0.45` is stored as
/// `0.45000..01` and rounds up. Only exactly representable halves round to
/// even.
///
/// # Examples
///
/// ```
/// use robot_joystick::math::round_tenths;
///
/// assert_eq!(round_tenths(0.44), 0.4);
/// assert_eq!(round_tenths(-0.96), -1.0);
/// assert_eq!(round_tenths(0.25), 0.2);
/// assert_eq!(round_tenths(0.35), 0.3);
/// ```
#[must_use]
pub fn round_tenths(value: f64) -> f64 {
    // Float formatting rounds the exact decimal expansion
    format!("{:.1}", value).parse().unwrap_or(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_tenths_basic() {
        assert_eq!(round_tenths(0.0), 0.0);
        assert_eq!(round_tenths(0.04), 0.0);
        assert_eq!(round_tenths(0.06), 0.1);
        assert_eq!(round_tenths(1.0), 1.0);
        assert_eq!(round_tenths(-0.66), -0.7);
    }

    #[test]
    fn test_round_tenths_exact_halves_to_even() {
        assert_eq!(round_tenths(0.25), 0.2);
        assert_eq!(round_tenths(0.75), 0.8);
        assert_eq!(round_tenths(-0.25), -0.2);
    }

    #[test]
    fn test_round_tenths_uses_stored_value() {
        // 0.35 is 0.34999.. in binary, 0.45 is 0.45000..
        assert_eq!(round_tenths(0.35), 0.3);
        assert_eq!(round_tenths(-0.65), -0.7);
        assert_eq!(round_tenths(0.45), 0.5);
        assert_eq!(round_tenths(245.0 / 700.0), 0.3);
    }

    #[test]
    fn test_round_tenths_negative_zero() {
        assert_eq!(round_tenths(-0.04), 0.0);
    }

    #[test]
    fn test_round_tenths_yields_one_decimal() {
        for i in -100..=100 {
            let rounded = round_tenths(i as f64 / 73.0);
            let scaled = rounded * 10.0;
            assert!((scaled - scaled.round()).abs() < 1e-9);
        }
    }
}
