//! # Robot Joystick
//!
//! Drive a differential-drive robot with an analog joystick.
//!
//! This application samples the joystick through an ADS1015 ADC and publishes
//! motor commands to the motor subsystem over Redis pub/sub.

use std::future::Future;
use std::path::PathBuf;

use anyhow::{Context, Result};
use tokio::signal::unix::{signal, SignalKind};
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

use robot_joystick::adc::{AdcReader, Ads1015, SimulatedAdc};
use robot_joystick::bus::RedisPublisher;
use robot_joystick::config::{AdcConfig, AdcDriver, Config, LoggingConfig};
use robot_joystick::control::ControlLoop;
use robot_joystick::error::JoystickError;

/// Environment variable consulted when no config path is given on the command line
const CONFIG_ENV_VAR: &str = "ROBOT_JOYSTICK_CONFIG";

/// File name prefix for daily-rolling log files
const LOG_FILE_PREFIX: &str = "robot-joystick.log";

/// Main entry point for Robot Joystick
///
/// # Control Flow
///
/// 1. **Initialization**
///    - Load configuration (first argument, then `ROBOT_JOYSTICK_CONFIG`, then defaults)
///    - Set up logging with tracing subscriber
///    - Open the ADC and connect to Redis
///
/// 2. **Main Loop**
///    - Calibrate the joystick center
///    - Read, mix and dispatch motor commands every control period
///    - Handle Ctrl+C, SIGTERM and SIGHUP for graceful shutdown
///
/// 3. **Shutdown**
///    - Publish `stop` to the motor subsystem
///    - Clean exit
///
/// # Errors
///
/// Returns error if:
/// - The configuration file cannot be loaded or is invalid
/// - The I2C bus cannot be opened
/// - Redis is unreachable
/// - An ADC read or publish fails while running
///
/// # Examples
///
/// ```bash
/// cargo run --release -- config/default.toml
/// ```
///
/// Expected output:
/// ```text
/// INFO robot_joystick: Robot Joystick v0.1.0 starting...
/// INFO robot_joystick: Publishing motor commands to 127.0.0.1:6379 on subsystem.motor.command
/// INFO robot_joystick::control: Control loop: init -> calibrating
/// INFO robot_joystick::control: Control loop: calibrating -> running
/// ```
#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let config_path = config_path();
    let config = Config::load_or_default(config_path.as_ref())
        .with_context(|| match &config_path {
            Some(path) => format!("Failed to load configuration from {}", path.display()),
            None => "Invalid default configuration".to_string(),
        })?;

    // Held for the whole process so buffered log lines are flushed on exit
    let _log_guard = init_logging(&config.logging);

    info!("Robot Joystick v{} starting...", env!("CARGO_PKG_VERSION"));
    match &config_path {
        Some(path) => info!("Loaded configuration from {}", path.display()),
        None => info!("No configuration file given, using defaults"),
    }

    let adc = open_adc(&config.adc)?;

    let bus = RedisPublisher::connect(&config.bus.host, config.bus.port, config.bus.db)
        .await
        .context("Failed to connect to the message bus")?;
    info!(
        "Publishing motor commands to {} on {}",
        bus.address(),
        config.bus.topic
    );

    let mut control = ControlLoop::from_config(adc, bus, &config);
    let shutdown = shutdown_signal()?;

    info!("Press Ctrl+C to exit");
    control.run_until(shutdown).await?;

    info!("Shut down cleanly");
    Ok(())
}

/// Config file path from the first argument, falling back to the environment
fn config_path() -> Option<PathBuf> {
    std::env::args_os()
        .nth(1)
        .or_else(|| std::env::var_os(CONFIG_ENV_VAR))
        .map(PathBuf::from)
}

/// Resolves on the first termination signal.
///
/// Handlers are installed before this returns, so a SIGTERM from the service
/// manager can no longer kill the process before the final stop is sent.
fn shutdown_signal() -> Result<impl Future<Output = ()>> {
    let mut terminate =
        signal(SignalKind::terminate()).context("Failed to install SIGTERM handler")?;
    let mut hangup = signal(SignalKind::hangup()).context("Failed to install SIGHUP handler")?;

    Ok(async move {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => info!("Received Ctrl+C, shutting down..."),
            _ = terminate.recv() => info!("Received SIGTERM, shutting down..."),
            _ = hangup.recv() => info!("Received SIGHUP, shutting down..."),
        }
    })
}

/// Installs the tracing subscriber.
///
/// `RUST_LOG` wins over the configured level. The returned guard must be kept
/// alive while file logging is in use.
fn init_logging(config: &LoggingConfig) -> Option<WorkerGuard> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));
    let registry = tracing_subscriber::registry().with(filter).with(fmt::layer());

    match &config.directory {
        Some(directory) => {
            let appender = tracing_appender::rolling::daily(directory, LOG_FILE_PREFIX);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            registry
                .with(fmt::layer().with_ansi(false).with_writer(writer))
                .init();
            Some(guard)
        }
        None => {
            registry.init();
            None
        }
    }
}

/// Opens the ADC selected by `adc.driver`.
fn open_adc(config: &AdcConfig) -> Result<Box<dyn AdcReader>> {
    match config.driver {
        AdcDriver::Ads1015 => {
            let i2c = rppal::i2c::I2c::with_bus(config.i2c_bus).map_err(|e| {
                JoystickError::HardwareRead(format!(
                    "Failed to open I2C bus {}: {}",
                    config.i2c_bus, e
                ))
            })?;
            info!(
                "ADS1015 on I2C bus {} at address {:#04x}",
                config.i2c_bus, config.address
            );
            Ok(Box::new(Ads1015::new(i2c, config.address)))
        }
        AdcDriver::Simulated => {
            info!("Using simulated ADC");
            Ok(Box::new(SimulatedAdc::new()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_env_var_name() {
        assert_eq!(CONFIG_ENV_VAR, "ROBOT_JOYSTICK_CONFIG");
    }

    #[test]
    fn test_log_file_prefix() {
        assert!(LOG_FILE_PREFIX.starts_with(env!("CARGO_PKG_NAME")));
    }

    #[tokio::test]
    async fn test_sigterm_resolves_shutdown() {
        let shutdown = shutdown_signal().unwrap();

        let status = std::process::Command::new("kill")
            .args(["-TERM", &std::process::id().to_string()])
            .status()
            .unwrap();
        assert!(status.success());

        tokio::time::timeout(std::time::Duration::from_secs(5), shutdown)
            .await
            .expect("SIGTERM should end the run");
    }

    #[tokio::test]
    async fn test_open_simulated_adc() {
        let config = AdcConfig {
            driver: AdcDriver::Simulated,
            ..AdcConfig::default()
        };
        let mut adc = open_adc(&config).unwrap();
        let value = adc.read_channel(0, config.gain).await.unwrap();
        assert!((0..=1600).contains(&value));
    }
}
