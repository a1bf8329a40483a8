//! # ADS1015 Driver
//!
//! Single-shot, single-ended conversions on a TI ADS1015 12-bit ADC.
//!
//! ## Conversion Sequence
//!
//! 1. Write the config register (pointer `0x01`) with the OS bit set to start
//!    a conversion on the requested channel.
//! 2. Wait one sample period at the configured data rate.
//! 3. Read the conversion register (pointer `0x00`). The 12-bit result is
//!    left-aligned in the 16-bit word.
//!
//! ## Usage
//!
//! ```no_run
//! use robot_joystick::adc::{Ads1015, AdcReader, Gain};
//!
//! # async fn run() -> anyhow::Result<()> {
//! let i2c = rppal::i2c::I2c::with_bus(1)?;
//! let mut adc = Ads1015::new(i2c, 0x48);
//! let x = adc.read_channel(0, Gain::One).await?;
//! # Ok(())
//! # }
//! ```

use async_trait::async_trait;
use embedded_hal::i2c::I2c;
use tokio::time::{sleep, Duration};

use super::{AdcReader, Gain};
use crate::error::{JoystickError, Result};

/// Default I2C address (ADDR pin tied to GND)
pub const DEFAULT_ADDRESS: u8 = 0x48;

const POINTER_CONVERSION: u8 = 0x00;
const POINTER_CONFIG: u8 = 0x01;

const CONFIG_OS_SINGLE: u16 = 0x8000;
const CONFIG_MUX_OFFSET: u16 = 12;
const CONFIG_MODE_SINGLE: u16 = 0x0100;
const CONFIG_COMP_QUE_DISABLE: u16 = 0x0003;

/// Data rate field for 1600 samples per second
const CONFIG_DR_1600SPS: u16 = 0x0080;
const DATA_RATE_SPS: u64 = 1600;

/// Highest single-ended input (AIN0..AIN3)
const MAX_CHANNEL: u8 = 3;

/// ADS1015 attached to an `embedded-hal` I2C bus.
pub struct Ads1015<I2C> {
    i2c: I2C,
    address: u8,
}

impl<I2C> std::fmt::Debug for Ads1015<I2C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Ads1015")
            .field("address", &format_args!("0x{:02X}", self.address))
            .finish_non_exhaustive()
    }
}

impl<I2C: I2c> Ads1015<I2C> {
    /// Wraps an I2C bus handle. No bus traffic happens until the first read.
    pub fn new(i2c: I2C, address: u8) -> Self {
        Self { i2c, address }
    }

    /// I2C address this driver talks to
    pub fn address(&self) -> u8 {
        self.address
    }

    fn start_conversion(&mut self, channel: u8, gain: Gain) -> Result<()> {
        let config = config_word(channel, gain);
        let [hi, lo] = config.to_be_bytes();
        self.i2c
            .write(self.address, &[POINTER_CONFIG, hi, lo])
            .map_err(|e| {
                JoystickError::HardwareRead(format!(
                    "Failed to start conversion on channel {}: {:?}",
                    channel, e
                ))
            })
    }

    fn read_conversion(&mut self, channel: u8) -> Result<i32> {
        let mut buf = [0u8; 2];
        self.i2c
            .write_read(self.address, &[POINTER_CONVERSION], &mut buf)
            .map_err(|e| {
                JoystickError::HardwareRead(format!(
                    "Failed to read conversion on channel {}: {:?}",
                    channel, e
                ))
            })?;
        Ok(conversion_value(buf))
    }
}

#[async_trait]
impl<I2C> AdcReader for Ads1015<I2C>
where
    I2C: I2c + Send,
{
    async fn read_channel(&mut self, channel: u8, gain: Gain) -> Result<i32> {
        if channel > MAX_CHANNEL {
            return Err(JoystickError::HardwareRead(format!(
                "Channel {} out of range (0-{})",
                channel, MAX_CHANNEL
            )));
        }

        self.start_conversion(channel, gain)?;
        sleep(conversion_delay()).await;
        self.read_conversion(channel)
    }
}

/// Builds the config register word for a single-shot, single-ended read.
#[must_use]
pub fn config_word(channel: u8, gain: Gain) -> u16 {
    // Single-ended inputs are MUX codes 0b100..0b111
    let mux = (u16::from(channel) + 0x04) & 0x07;
    CONFIG_OS_SINGLE
        | (mux << CONFIG_MUX_OFFSET)
        | gain.pga_bits()
        | CONFIG_MODE_SINGLE
        | CONFIG_DR_1600SPS
        | CONFIG_COMP_QUE_DISABLE
}

/// Converts the big-endian conversion register to a signed 12-bit value.
#[must_use]
pub fn conversion_value(buf: [u8; 2]) -> i32 {
    let value = (i32::from(buf[0]) << 4) | (i32::from(buf[1]) >> 4);
    if value & 0x800 != 0 {
        value - (1 << 12)
    } else {
        value
    }
}

fn conversion_delay() -> Duration {
    Duration::from_micros(1_000_000 / DATA_RATE_SPS + 100)
}
