//! Simulated ADC for development machines without an ADS1015 attached.
//!
//! Each channel sweeps a triangle wave over `0..SIMULATED_FULL_SCALE`, so the
//! joystick appears to move slowly through its whole travel. Channels are
//! phase shifted so X and Y never move in lockstep.

use async_trait::async_trait;
use tracing::debug;

use super::{AdcReader, Gain};
use crate::error::Result;

/// Upper bound (exclusive) of simulated readings
pub const SIMULATED_FULL_SCALE: i32 = 1600;

/// Change per read
const SWEEP_STEP: i32 = 40;

const CHANNELS: usize = 4;

/// Deterministic stand-in for [`Ads1015`](super::Ads1015).
#[derive(Debug, Clone)]
pub struct SimulatedAdc {
    phase: [i32; CHANNELS],
}

impl Default for SimulatedAdc {
    fn default() -> Self {
        Self::new()
    }
}

impl SimulatedAdc {
    pub fn new() -> Self {
        let period = 2 * SIMULATED_FULL_SCALE;
        let mut phase = [0; CHANNELS];
        for (i, p) in phase.iter_mut().enumerate() {
            *p = (SIMULATED_FULL_SCALE / 2 + i as i32 * period / 4) % period;
        }
        Self { phase }
    }

    fn sample(phase: i32) -> i32 {
        if phase < SIMULATED_FULL_SCALE {
            phase
        } else {
            2 * SIMULATED_FULL_SCALE - 1 - phase
        }
    }
}

#[async_trait]
impl AdcReader for SimulatedAdc {
    async fn read_channel(&mut self, channel: u8, _gain: Gain) -> Result<i32> {
        let idx = usize::from(channel) % CHANNELS;
        let value = Self::sample(self.phase[idx]);
        self.phase[idx] = (self.phase[idx] + SWEEP_STEP) % (2 * SIMULATED_FULL_SCALE);
        debug!("Simulated ADC channel {} -> {}", channel, value);
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_readings_stay_in_range() {
        let mut adc = SimulatedAdc::new();
        for _ in 0..500 {
            for channel in 0..2 {
                let value = adc.read_channel(channel, Gain::One).await.unwrap();
                assert!((0..SIMULATED_FULL_SCALE).contains(&value));
            }
        }
    }

    #[tokio::test]
    async fn test_channels_are_phase_shifted() {
        let mut adc = SimulatedAdc::new();
        let x = adc.read_channel(0, Gain::One).await.unwrap();
        let y = adc.read_channel(1, Gain::One).await.unwrap();
        assert_eq!(x, 800);
        assert_ne!(x, y);
    }

    #[tokio::test]
    async fn test_sweep_is_deterministic() {
        let mut a = SimulatedAdc::new();
        let mut b = SimulatedAdc::new();
        for _ in 0..20 {
            assert_eq!(
                a.read_channel(0, Gain::One).await.unwrap(),
                b.read_channel(0, Gain::One).await.unwrap()
            );
        }
    }

    #[tokio::test]
    async fn test_sweep_reverses_at_full_scale() {
        let mut adc = SimulatedAdc::new();
        let mut previous = adc.read_channel(0, Gain::One).await.unwrap();
        let mut saw_rise = false;
        let mut saw_fall = false;
        for _ in 0..100 {
            let value = adc.read_channel(0, Gain::One).await.unwrap();
            if value > previous {
                saw_rise = true;
            }
            if value < previous {
                saw_fall = true;
            }
            previous = value;
        }
        assert!(saw_rise && saw_fall);
    }
}
