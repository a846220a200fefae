//! Configuration faults reported on the non-realtime paths.
//!
//! Nothing in here is ever produced by `process`: realtime faults (NaN input,
//! unstable filter state) are absorbed inside the kernel instead.

use thiserror::Error;

use crate::param::ParameterAddress;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum KernelError {
    #[error("channel count {0} is outside 1..={max}", max = crate::MAX_CHANNELS)]
    InvalidChannelCount(usize),

    #[error("sample rate {0} Hz must be within [{min}, {max}]", min = crate::MIN_SAMPLE_RATE, max = crate::MAX_SAMPLE_RATE)]
    InvalidSampleRate(f64),

    #[error("{kernel} has no parameter at address {address}")]
    UnknownParameter {
        kernel: &'static str,
        address: ParameterAddress,
    },

    #[error("{kernel} has no parameter named `{identifier}`")]
    UnknownIdentifier {
        kernel: &'static str,
        identifier: String,
    },

    #[error("parameter values must not be NaN")]
    NonFiniteValue,

    #[error("ramp duration {0} s must be finite and non-negative")]
    InvalidRampDuration(f32),

    #[error("{0} does not read wavetables")]
    WavetablesUnsupported(&'static str),

    #[error("{kernel} has no wavetable slot {index}")]
    UnknownWavetable { kernel: &'static str, index: usize },

    #[error("wavetable must contain at least one sample")]
    EmptyWavetable,

    #[error("wavetable queue is full; let the audio thread process a block first")]
    WavetableQueueFull,

    #[error("unknown kernel type `{0}`")]
    UnknownKernel(String),
}

pub type Result<T> = std::result::Result<T, KernelError>;
