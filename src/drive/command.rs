//! # Motor Command Types
//!
//! Wheel identifiers, cached motor state and the JSON messages published to
//! the motor subsystem.
//!
//! ## Wire Format
//!
//! ```text
//! {"command":"drive_motor","position":"front_left","speed":0.6,"direction":"forward"}
//! {"command":"stop"}
//! ```

use serde::Serialize;

use crate::error::Result;

/// Wheel position on the chassis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WheelPosition {
    FrontLeft,
    FrontRight,
    RearLeft,
    RearRight,
}

impl WheelPosition {
    /// Every wheel, in dispatch order
    pub const ALL: [WheelPosition; 4] = [
        WheelPosition::FrontLeft,
        WheelPosition::FrontRight,
        WheelPosition::RearLeft,
        WheelPosition::RearRight,
    ];

    /// Whether this wheel is on the left side of the chassis
    #[must_use]
    pub fn is_left(self) -> bool {
        matches!(self, WheelPosition::FrontLeft | WheelPosition::RearLeft)
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            WheelPosition::FrontLeft => "front_left",
            WheelPosition::FrontRight => "front_right",
            WheelPosition::RearLeft => "rear_left",
            WheelPosition::RearRight => "rear_right",
        }
    }
}

impl std::fmt::Display for WheelPosition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Rotation direction of a wheel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    #[default]
    Forward,
    Backward,
}

impl Direction {
    /// `Forward` for a strictly positive speed, `Backward` otherwise.
    ///
    /// A zero speed maps to `Backward`; the magnitude sent is zero either way.
    #[must_use]
    pub fn from_speed(speed: f64) -> Self {
        if speed > 0.0 {
            Direction::Forward
        } else {
            Direction::Backward
        }
    }
}

/// Last commanded state of one wheel
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct MotorState {
    /// Magnitude, never negative
    pub speed: f64,
    pub direction: Direction,
}

impl MotorState {
    #[must_use]
    pub fn new(speed: f64, direction: Direction) -> Self {
        Self { speed, direction }
    }

    /// Splits a signed wheel speed into magnitude and direction.
    ///
    /// # Examples
    ///
    /// ```
    /// use robot_joystick::drive::command::{Direction, MotorState};
    ///
    /// assert_eq!(MotorState::from_signed(-0.4), MotorState::new(0.4, Direction::Backward));
    /// ```
    #[must_use]
    pub fn from_signed(speed: f64) -> Self {
        Self {
            speed: speed.abs(),
            direction: Direction::from_speed(speed),
        }
    }
}

/// Outbound motor command
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum DriveCommand {
    DriveMotor {
        position: WheelPosition,
        speed: f64,
        direction: Direction,
    },
    Stop,
}

impl DriveCommand {
    /// Serializes the command as compact JSON.
    pub fn to_payload(&self) -> Result<Vec<u8>> {
        Ok(serde_json::to_vec(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_drive_payload() {
        let cmd = DriveCommand::DriveMotor {
            position: WheelPosition::FrontLeft,
            speed: 0.6,
            direction: Direction::Forward,
        };
        let json = String::from_utf8(cmd.to_payload().unwrap()).unwrap();
        assert_eq!(
            json,
            r#"{"command":"drive_motor","position":"front_left","speed":0.6,"direction":"forward"}"#
        );
    }

    #[test]
    fn test_drive_payload_whole_speed_keeps_decimal() {
        let cmd = DriveCommand::DriveMotor {
            position: WheelPosition::RearRight,
            speed: 1.0,
            direction: Direction::Backward,
        };
        let json = String::from_utf8(cmd.to_payload().unwrap()).unwrap();
        assert_eq!(
            json,
            r#"{"command":"drive_motor","position":"rear_right","speed":1.0,"direction":"backward"}"#
        );
    }

    #[test]
    fn test_stop_payload() {
        let json = String::from_utf8(DriveCommand::Stop.to_payload().unwrap()).unwrap();
        assert_eq!(json, r#"{"command":"stop"}"#);
    }

    #[test]
    fn test_wheel_position_names() {
        let names: Vec<_> = WheelPosition::ALL.iter().map(|p| p.to_string()).collect();
        assert_eq!(names, ["front_left", "front_right", "rear_left", "rear_right"]);
    }

    #[test]
    fn test_wheel_sides() {
        assert!(WheelPosition::FrontLeft.is_left());
        assert!(WheelPosition::RearLeft.is_left());
        assert!(!WheelPosition::FrontRight.is_left());
        assert!(!WheelPosition::RearRight.is_left());
    }

    #[test]
    fn test_direction_from_speed() {
        assert_eq!(Direction::from_speed(0.1), Direction::Forward);
        assert_eq!(Direction::from_speed(-0.1), Direction::Backward);
        assert_eq!(Direction::from_speed(0.0), Direction::Backward);
    }

    #[test]
    fn test_motor_state_default() {
        assert_eq!(MotorState::default(), MotorState::new(0.0, Direction::Forward));
    }

    #[test]
    fn test_motor_state_from_signed() {
        assert_eq!(MotorState::from_signed(0.8), MotorState::new(0.8, Direction::Forward));
        assert_eq!(MotorState::from_signed(-1.0), MotorState::new(1.0, Direction::Backward));
    }
}
