#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{
    error::{KernelError, Result},
    DEFAULT_RAMP_SECONDS, MAX_CHANNELS, MAX_SAMPLE_RATE, MIN_SAMPLE_RATE,
};

/// Channel/sample-rate configuration a kernel is initialized for, plus the
/// parameter ramp length.
///
/// ```ignore
/// let config = KernelConfig::default()
///     .channels(1)
///     .sample_rate(44_100.0)
///     .ramp_duration(0.005);
/// kernel.configure(&config)?;
/// ```
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KernelConfig {
    pub channel_count: usize,
    pub sample_rate: f64,
    /// Seconds a parameter change takes to reach its target.
    pub ramp_duration: f32,
}

impl KernelConfig {
    pub fn new(channel_count: usize, sample_rate: f64) -> Self {
        Self {
            channel_count,
            sample_rate,
            ramp_duration: DEFAULT_RAMP_SECONDS,
        }
    }

    pub fn channels(mut self, channel_count: usize) -> Self {
        self.channel_count = channel_count;
        self
    }

    pub fn sample_rate(mut self, sample_rate: f64) -> Self {
        self.sample_rate = sample_rate;
        self
    }

    pub fn ramp_duration(mut self, seconds: f32) -> Self {
        self.ramp_duration = seconds;
        self
    }

    /// Check the configuration without touching any kernel.
    pub fn validate(&self) -> Result<()> {
        validate_channel_count(self.channel_count)?;
        validate_sample_rate(self.sample_rate)?;
        validate_ramp_duration(self.ramp_duration)
    }
}

impl Default for KernelConfig {
    fn default() -> Self {
        Self::new(2, 48_000.0)
    }
}

pub(crate) fn validate_channel_count(channel_count: usize) -> Result<()> {
    if (1..=MAX_CHANNELS).contains(&channel_count) {
        Ok(())
    } else {
        Err(KernelError::InvalidChannelCount(channel_count))
    }
}

pub(crate) fn validate_sample_rate(sample_rate: f64) -> Result<()> {
    if (MIN_SAMPLE_RATE..=MAX_SAMPLE_RATE).contains(&sample_rate) {
        Ok(())
    } else {
        Err(KernelError::InvalidSampleRate(sample_rate))
    }
}

pub(crate) fn validate_ramp_duration(seconds: f32) -> Result<()> {
    if seconds.is_finite() && seconds >= 0.0 {
        Ok(())
    } else {
        Err(KernelError::InvalidRampDuration(seconds))
    }
}
