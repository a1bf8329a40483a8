//! # Drive Module
//!
//! Turns a normalized stick position into motor commands.
//!
//! This module handles:
//! - Differential-drive mixing of (x, y) into left/right speeds
//! - Wheel, direction and command types for the motor subsystem
//! - Deduplicated dispatch of drive/stop commands

pub mod command;
pub mod dispatcher;
pub mod mixer;

pub use command::{Direction, DriveCommand, MotorState, WheelPosition};
pub use dispatcher::{MotorCommandDispatcher, MotorStates};
pub use mixer::mix;
