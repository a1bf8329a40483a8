//! # Robot Joystick Library
//!
//! Drive a differential-drive robot with an analog joystick.
//!
//! This library reads a two-axis joystick through an ADS1015 ADC, normalizes
//! and mixes the stick position into left/right wheel speeds, and publishes
//! deduplicated motor commands to the motor subsystem over Redis pub/sub.

pub mod adc;
pub mod bus;
pub mod config;
pub mod control;
pub mod drive;
pub mod error;
pub mod joystick;
pub mod math;
