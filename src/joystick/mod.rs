//! # Joystick Module
//!
//! Two-axis analog joystick read through an ADC.
//!
//! This module handles:
//! - Sampling the rest position to find each axis center
//! - Widening axis bounds as new extremes are observed
//! - Normalizing raw samples to `-1.0..=1.0`

pub mod calibration;
pub mod normalize;

use tokio::time::sleep;
use tracing::{debug, warn};

use crate::adc::{AdcReader, Gain};
use crate::error::Result;
use calibration::{Axis, AxisCalibrator};
use normalize::{normalize, NormalizedPosition};

/// Default ADC input wired to the X potentiometer
pub const DEFAULT_X_CHANNEL: u8 = 0;
/// Default ADC input wired to the Y potentiometer
pub const DEFAULT_Y_CHANNEL: u8 = 1;

/// Joystick handle
///
/// Owns the ADC reader and the bounds of both axes for the lifetime of the
/// control loop.
pub struct Joystick<A> {
    adc: A,
    gain: Gain,
    x_channel: u8,
    y_channel: u8,
    x_axis: Axis,
    y_axis: Axis,
}

impl<A> std::fmt::Debug for Joystick<A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Joystick")
            .field("gain", &self.gain)
            .field("x_channel", &self.x_channel)
            .field("y_channel", &self.y_channel)
            .field("x_axis", &self.x_axis)
            .field("y_axis", &self.y_axis)
            .finish_non_exhaustive()
    }
}

impl<A: AdcReader> Joystick<A> {
    /// Creates a joystick on the default channels with conservative bounds.
    pub fn new(adc: A, gain: Gain) -> Self {
        Self::with_axes(adc, gain, Axis::default(), Axis::default())
    }

    /// Creates a joystick with explicit starting bounds.
    pub fn with_axes(adc: A, gain: Gain, x_axis: Axis, y_axis: Axis) -> Self {
        Self {
            adc,
            gain,
            x_channel: DEFAULT_X_CHANNEL,
            y_channel: DEFAULT_Y_CHANNEL,
            x_axis,
            y_axis,
        }
    }

    /// Overrides which ADC inputs carry the X and Y axes.
    #[must_use]
    pub fn with_channels(mut self, x_channel: u8, y_channel: u8) -> Self {
        self.x_channel = x_channel;
        self.y_channel = y_channel;
        self
    }

    pub fn x_axis(&self) -> &Axis {
        &self.x_axis
    }

    pub fn y_axis(&self) -> &Axis {
        &self.y_axis
    }

    pub fn gain(&self) -> Gain {
        self.gain
    }

    /// Samples the rest position and sets each axis center.
    ///
    /// Takes one X and one Y sample per round, sleeping the calibrator's
    /// interval after each round. Bounds keep their starting values.
    ///
    /// # Errors
    ///
    /// Any ADC failure is returned as-is; calibration is not retried.
    pub async fn calibrate(&mut self, calibrator: &AxisCalibrator) -> Result<()> {
        debug!("Calibrating joystick bounds");

        let mut x_samples = Vec::with_capacity(calibrator.samples());
        let mut y_samples = Vec::with_capacity(calibrator.samples());

        for _ in 0..calibrator.samples() {
            x_samples.push(self.adc.read_channel(self.x_channel, self.gain).await?);
            y_samples.push(self.adc.read_channel(self.y_channel, self.gain).await?);
            sleep(calibrator.interval()).await;
        }

        AxisCalibrator::apply(&mut self.x_axis, &x_samples)?;
        AxisCalibrator::apply(&mut self.y_axis, &y_samples)?;

        self.log_bounds();
        for (name, axis) in [("X", &self.x_axis), ("Y", &self.y_axis)] {
            if axis.is_degenerate() {
                warn!(
                    "{} axis max equals its center (min={}, center={}, max={})",
                    name, axis.min, axis.center, axis.max
                );
            }
        }

        Ok(())
    }

    /// Reads one raw (x, y) sample pair.
    pub async fn read_raw(&mut self) -> Result<(i32, i32)> {
        let x = self.adc.read_channel(self.x_channel, self.gain).await?;
        let y = self.adc.read_channel(self.y_channel, self.gain).await?;
        Ok((x, y))
    }

    /// Reads, widens the bounds, then normalizes.
    ///
    /// The bounds update must come first: the current reading is then always
    /// inside the range and never needs clamping.
    pub async fn get_position(&mut self) -> Result<NormalizedPosition> {
        let (x, y) = self.read_raw().await?;
        self.x_axis.update(x);
        self.y_axis.update(y);
        self.log_bounds();
        debug!("Read values from ADC: ({}, {})", x, y);

        Ok(normalize(x, y, &self.x_axis, &self.y_axis).into())
    }

    fn log_bounds(&self) {
        debug!(
            "X Bounds: Min={}, Center={}, Max={}",
            self.x_axis.min, self.x_axis.center, self.x_axis.max
        );
        debug!(
            "Y Bounds: Min={}, Center={}, Max={}",
            self.y_axis.min, self.y_axis.center, self.y_axis.max
        );
    }
}
