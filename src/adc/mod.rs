//! # ADC Module
//!
//! Analog-to-digital conversion for the joystick potentiometers.
//!
//! This module handles:
//! - The [`AdcReader`] capability used by the joystick
//! - PGA gain selection ([`Gain`])
//! - The ADS1015 driver over I2C
//! - A simulated reader for machines without the hardware

pub mod ads1015;
pub mod simulated;

use async_trait::async_trait;
use serde::Deserialize;

use crate::error::Result;

pub use ads1015::Ads1015;
pub use simulated::SimulatedAdc;

/// Programmable gain amplifier setting.
///
/// Selects the full-scale input voltage range of the converter:
///
/// | Gain | Range |
/// |------|-------|
/// | 2/3 | +/-6.144V |
/// | 1 | +/-4.096V |
/// | 2 | +/-2.048V |
/// | 4 | +/-1.024V |
/// | 8 | +/-0.512V |
/// | 16 | +/-0.256V |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(try_from = "f64")]
pub enum Gain {
    TwoThirds,
    #[default]
    One,
    Two,
    Four,
    Eight,
    Sixteen,
}

impl Gain {
    /// PGA field of the ADS1x15 config register.
    #[must_use]
    pub fn pga_bits(self) -> u16 {
        match self {
            Gain::TwoThirds => 0x0000,
            Gain::One => 0x0200,
            Gain::Two => 0x0400,
            Gain::Four => 0x0600,
            Gain::Eight => 0x0800,
            Gain::Sixteen => 0x0A00,
        }
    }
}

impl TryFrom<f64> for Gain {
    type Error = String;

    fn try_from(value: f64) -> std::result::Result<Self, Self::Error> {
        if (value - 2.0 / 3.0).abs() < 0.01 {
            return Ok(Gain::TwoThirds);
        }
        match value {
            v if v == 1.0 => Ok(Gain::One),
            v if v == 2.0 => Ok(Gain::Two),
            v if v == 4.0 => Ok(Gain::Four),
            v if v == 8.0 => Ok(Gain::Eight),
            v if v == 16.0 => Ok(Gain::Sixteen),
            _ => Err(format!("gain must be one of: 2/3, 1, 2, 4, 8, 16 (got {})", value)),
        }
    }
}

/// Reads raw samples from an ADC channel.
///
/// Implementations own their hardware handle exclusively. A failed read is
/// reported as [`JoystickError::HardwareRead`](crate::error::JoystickError::HardwareRead)
/// and is never retried.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AdcReader: Send {
    /// Take one sample from `channel` at the given gain.
    async fn read_channel(&mut self, channel: u8, gain: Gain) -> Result<i32>;
}

#[async_trait]
impl AdcReader for Box<dyn AdcReader> {
    async fn read_channel(&mut self, channel: u8, gain: Gain) -> Result<i32> {
        (**self).read_channel(channel, gain).await
    }
}
