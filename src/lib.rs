//! Realtime-safe DSP kernels sharing one lifecycle contract.
//!
//! Every kernel follows the same shape: construct it, `initialize` it for a
//! channel count and sample rate, then call `process` from the audio thread
//! while a control thread automates parameters through a [`KernelHandle`].
//! Parameter targets cross threads as single atomic stores; all smoothing
//! happens on the audio thread, so `process` never locks or allocates.
//!
//! ```ignore
//! use dsp_kernels::{AudioBuffers, DspKernel, KernelType};
//!
//! let mut kernel = KernelType::FmOscillator.create();
//! kernel.initialize(2, 48_000.0)?;
//! kernel.set_parameter_value(0, 220.0)?;
//!
//! let mut left = vec![0.0f32; 256];
//! let mut right = vec![0.0f32; 256];
//! let mut channels = [left.as_mut_slice(), right.as_mut_slice()];
//! kernel.process(&mut AudioBuffers::in_place(&mut channels), 256, 0);
//! ```

pub mod buffer;
pub mod config;
pub mod dsp; // Signal-processing primitives the kernels are built from
pub mod error;
pub mod kernel; // Lifecycle contract and the shared kernel base
pub mod kernels; // Concrete kernel types and the factory
pub mod param;

pub use buffer::AudioBuffers;
pub use config::KernelConfig;
pub use error::{KernelError, Result};
pub use kernel::{DspKernel, Kernel, KernelHandle, LifecycleState};
pub use kernels::KernelType;
pub use param::{ParameterAddress, ParameterDescriptor, ParameterUnit};

/// Largest block the demo host renders in one `process` call.
pub const MAX_BLOCK_SIZE: usize = 2048;
/// Upper bound accepted by `initialize` for the channel count.
pub const MAX_CHANNELS: usize = 16;
/// Lower bound accepted by `initialize` for the sample rate (Hz).
pub const MIN_SAMPLE_RATE: f64 = 1.0;
/// Upper bound accepted by `initialize` for the sample rate (Hz).
pub const MAX_SAMPLE_RATE: f64 = 768_000.0;
/// Parameter ramp length used until a host picks another one (seconds).
pub const DEFAULT_RAMP_SECONDS: f32 = 0.02;
