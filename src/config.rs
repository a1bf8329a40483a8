//! # Configuration Module
//!
//! Handles loading and validating configuration from TOML files.
//!
//! Every section and field is optional; anything left out takes the default
//! listed below.
//!
//! ```toml
//! [adc]
//! driver = "ads1015"      # or "simulated"
//! i2c_bus = 1
//! address = 0x48
//! gain = 1                # 2/3, 1, 2, 4, 8 or 16
//! x_channel = 0
//! y_channel = 1
//!
//! [bus]
//! host = "127.0.0.1"
//! port = 6379
//! db = 0
//! topic = "subsystem.motor.command"
//!
//! [calibration]
//! samples = 10
//! sample_interval_ms = 200
//! initial_min = 200
//! initial_max = 1500
//! initial_center = 800
//!
//! [control]
//! period_ms = 100
//!
//! [logging]
//! level = "info"
//! # directory = "./logs"
//! ```

use serde::de::Error;
use serde::Deserialize;
use std::fs;
use std::path::Path;
use tokio::time::Duration;

use crate::adc::ads1015::DEFAULT_ADDRESS;
use crate::adc::Gain;
use crate::bus::redis::DEFAULT_REDIS_PORT;
use crate::bus::MOTOR_COMMAND_TOPIC;
use crate::control::DEFAULT_PERIOD_MS;
use crate::error::{JoystickError, Result};
use crate::joystick::calibration::{
    Axis, AxisCalibrator, DEFAULT_AXIS_CENTER, DEFAULT_AXIS_MAX, DEFAULT_AXIS_MIN,
    DEFAULT_CALIBRATION_SAMPLES, DEFAULT_SAMPLE_INTERVAL_MS,
};

/// Main configuration structure
#[derive(Debug, Deserialize, Clone, Default, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub adc: AdcConfig,
    #[serde(default)]
    pub bus: BusConfig,
    #[serde(default)]
    pub calibration: CalibrationConfig,
    #[serde(default)]
    pub control: ControlConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Which ADC implementation to construct at startup
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum AdcDriver {
    #[default]
    Ads1015,
    Simulated,
}

/// ADC configuration
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct AdcConfig {
    #[serde(default)]
    pub driver: AdcDriver,

    #[serde(default = "default_i2c_bus")]
    pub i2c_bus: u8,

    #[serde(default = "default_address")]
    pub address: u8,

    #[serde(default)]
    pub gain: Gain,

    #[serde(default = "default_x_channel")]
    pub x_channel: u8,

    #[serde(default = "default_y_channel")]
    pub y_channel: u8,
}

/// Message bus configuration
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct BusConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default)]
    pub db: u32,

    #[serde(default = "default_topic")]
    pub topic: String,
}

/// Calibration configuration
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct CalibrationConfig {
    #[serde(default = "default_samples")]
    pub samples: usize,

    #[serde(default = "default_sample_interval_ms")]
    pub sample_interval_ms: u64,

    #[serde(default = "default_initial_min")]
    pub initial_min: i32,

    #[serde(default = "default_initial_max")]
    pub initial_max: i32,

    #[serde(default = "default_initial_center")]
    pub initial_center: i32,
}

/// Control loop configuration
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct ControlConfig {
    #[serde(default = "default_period_ms")]
    pub period_ms: u64,
}

/// Logging configuration
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Also write daily-rolling log files here when set
    #[serde(default)]
    pub directory: Option<String>,
}

// Default value functions
fn default_i2c_bus() -> u8 { 1 }
fn default_address() -> u8 { DEFAULT_ADDRESS }
fn default_x_channel() -> u8 { 0 }
fn default_y_channel() -> u8 { 1 }

fn default_host() -> String { "127.0.0.1".to_string() }
fn default_port() -> u16 { DEFAULT_REDIS_PORT }
fn default_topic() -> String { MOTOR_COMMAND_TOPIC.to_string() }

fn default_samples() -> usize { DEFAULT_CALIBRATION_SAMPLES }
fn default_sample_interval_ms() -> u64 { DEFAULT_SAMPLE_INTERVAL_MS }
fn default_initial_min() -> i32 { DEFAULT_AXIS_MIN }
fn default_initial_max() -> i32 { DEFAULT_AXIS_MAX }
fn default_initial_center() -> i32 { DEFAULT_AXIS_CENTER }

fn default_period_ms() -> u64 { DEFAULT_PERIOD_MS }

fn default_log_level() -> String { "info".to_string() }

impl Default for AdcConfig {
    fn default() -> Self {
        Self {
            driver: AdcDriver::default(),
            i2c_bus: default_i2c_bus(),
            address: default_address(),
            gain: Gain::default(),
            x_channel: default_x_channel(),
            y_channel: default_y_channel(),
        }
    }
}

impl Default for BusConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            db: 0,
            topic: default_topic(),
        }
    }
}

impl Default for CalibrationConfig {
    fn default() -> Self {
        Self {
            samples: default_samples(),
            sample_interval_ms: default_sample_interval_ms(),
            initial_min: default_initial_min(),
            initial_max: default_initial_max(),
            initial_center: default_initial_center(),
        }
    }
}

impl Default for ControlConfig {
    fn default() -> Self {
        Self {
            period_ms: default_period_ms(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            directory: None,
        }
    }
}

impl CalibrationConfig {
    /// Starting bounds shared by both axes
    #[must_use]
    pub fn initial_axis(&self) -> Axis {
        Axis::new(self.initial_min, self.initial_max, self.initial_center)
    }

    #[must_use]
    pub fn calibrator(&self) -> AxisCalibrator {
        AxisCalibrator::new(self.samples, Duration::from_millis(self.sample_interval_ms))
    }
}

impl ControlConfig {
    #[must_use]
    pub fn period(&self) -> Duration {
        Duration::from_millis(self.period_ms)
    }
}

impl Config {
    /// Load configuration from a TOML file
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the configuration file
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - File cannot be read
    /// - TOML parsing fails
    /// - Validation fails
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use robot_joystick::config::Config;
    ///
    /// let config = Config::load("config/default.toml")?;
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        Self::from_toml(&contents)
    }

    /// Parse and validate configuration from a TOML string
    pub fn from_toml(contents: &str) -> Result<Self> {
        let config: Config = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from `path` if given, otherwise use the built-in defaults
    pub fn load_or_default<P: AsRef<Path>>(path: Option<P>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    /// Validate configuration values
    ///
    /// # Errors
    ///
    /// Returns error if any configuration value is out of valid range
    pub fn validate(&self) -> Result<()> {
        // Bus
        if self.bus.host.is_empty() {
            return Err(invalid("bus host cannot be empty"));
        }

        if self.bus.port == 0 {
            return Err(invalid("bus port must be greater than 0"));
        }

        if self.bus.topic.is_empty() {
            return Err(invalid("bus topic cannot be empty"));
        }

        // ADC channels (ADS1015 has single-ended inputs 0-3)
        for (name, channel) in [("x_channel", self.adc.x_channel), ("y_channel", self.adc.y_channel)] {
            if channel > 3 {
                return Err(invalid(format!("{} must be between 0 and 3", name)));
            }
        }

        if self.adc.x_channel == self.adc.y_channel {
            return Err(invalid("x_channel and y_channel must differ"));
        }

        if self.adc.address > 0x7F {
            return Err(invalid("adc address must be a 7-bit I2C address"));
        }

        // Calibration
        if self.calibration.samples == 0 {
            return Err(invalid("calibration samples must be greater than 0"));
        }

        if self.calibration.sample_interval_ms > 10000 {
            return Err(invalid("sample_interval_ms must be at most 10000"));
        }

        if self.calibration.initial_min > self.calibration.initial_center
            || self.calibration.initial_center > self.calibration.initial_max
        {
            return Err(invalid(
                "initial bounds must satisfy initial_min <= initial_center <= initial_max",
            ));
        }

        // Control loop
        if self.control.period_ms == 0 || self.control.period_ms > 10000 {
            return Err(invalid("period_ms must be between 1 and 10000"));
        }

        // Logging
        if self.logging.level.parse::<tracing::Level>().is_err() {
            return Err(invalid(
                "logging level must be one of: trace, debug, info, warn, error",
            ));
        }

        if matches!(&self.logging.directory, Some(dir) if dir.is_empty()) {
            return Err(invalid("logging directory cannot be empty when set"));
        }

        Ok(())
    }
}

fn invalid(msg: impl std::fmt::Display) -> JoystickError {
    JoystickError::Config(toml::de::Error::custom(msg))
}
