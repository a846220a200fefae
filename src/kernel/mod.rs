//! The lifecycle contract every kernel honours, and the generic base that
//! implements it once for all kernel types.
//!
//! ```text
//!            initialize              process
//! Created ─────────────► Initialized ───────► Processing
//!                          ▲   │ reset (any state, keeps state)
//!            initialize    │   │
//!   ┌──────────────────────┘   ▼ deinit (any state)
//! Deinitialized ◄──────────────┘
//! ```
//!
//! [`DspKernel`] is the object-safe face hosts program against.
//! [`KernelDsp`] is the much smaller trait a kernel type implements; the
//! generic [`Kernel`] wraps it with parameter ramping, buffer handling,
//! wavetable handoff and fault containment.

mod base;
mod handle;

use std::sync::Arc;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{
    buffer::AudioBuffers,
    config::KernelConfig,
    error::Result,
    kernels::KernelType,
    param::{ParameterAddress, ParameterDescriptor},
};

pub use base::Kernel;
pub use handle::{KernelHandle, Wavetable};

pub(crate) use handle::{wavetable_channel, Shared, WavetableReceiver};

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleState {
    Created,
    Initialized,
    Processing,
    Deinitialized,
}

impl LifecycleState {
    /// Internal data exists and `process` produces audio.
    pub fn is_ready(self) -> bool {
        matches!(self, Self::Initialized | Self::Processing)
    }
}

/// How a kernel maps its transform onto the host's channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelPolicy {
    /// Transforms each channel's input independently.
    Effect,
    /// Ignores input; computes one sample per frame and writes it to every
    /// output channel.
    Generator,
}

/// Per-frame inputs to a kernel transform.
pub struct RenderCtx<'a> {
    pub sample_rate: f64,
    /// Current (ramped) parameter values, indexed by address.
    pub values: &'a [f32],
    wavetables: &'a [Option<Wavetable>],
}

impl<'a> RenderCtx<'a> {
    pub(crate) fn new(
        sample_rate: f64,
        values: &'a [f32],
        wavetables: &'a [Option<Wavetable>],
    ) -> Self {
        Self {
            sample_rate,
            values,
            wavetables,
        }
    }

    /// Installed wavetable, or an empty slice if the slot is vacant.
    #[inline]
    pub fn wavetable(&self, index: usize) -> &'a [f32] {
        match self.wavetables.get(index) {
            Some(Some(table)) => table,
            _ => &[],
        }
    }

    #[inline]
    pub fn value(&self, address: impl Into<ParameterAddress>) -> f32 {
        self.values
            .get(address.into() as usize)
            .copied()
            .unwrap_or(0.0)
    }
}

/// What a concrete kernel type provides. Everything else comes from
/// [`Kernel`].
pub trait KernelDsp: Send + Sized + 'static {
    const KIND: KernelType;
    const POLICY: ChannelPolicy;
    const PARAMETERS: &'static [ParameterDescriptor];
    const WAVETABLE_SLOTS: usize = 0;

    /// Table a slot starts with before any `set_wavetable`.
    fn default_wavetable(_index: usize) -> Option<Wavetable> {
        None
    }

    /// Build working state for a configuration. Runs on the control thread.
    fn allocate(channel_count: usize, sample_rate: f64) -> Self;

    /// Clear transient state without allocating.
    fn reset(&mut self);

    /// Clear one channel's transient state after a numeric fault.
    fn reset_channel(&mut self, channel: usize);

    /// Transform one sample. Generators are called once per frame with
    /// `channel == 0` and silent input.
    fn render(&mut self, channel: usize, input: f32, ctx: &RenderCtx<'_>) -> f32;
}

/// Object-safe kernel contract.
///
/// `&mut self` methods belong to whoever owns the kernel (the audio thread
/// once processing starts); `&self` methods may be called from anywhere,
/// and [`DspKernel::handle`] gives a `Send + Sync` clone of that surface.
pub trait DspKernel: Send {
    fn kernel_type(&self) -> KernelType;

    fn parameters(&self) -> &'static [ParameterDescriptor];

    /// Validate the configuration and (re)allocate internal data. Snaps
    /// every parameter to its target. Not realtime safe.
    fn initialize(&mut self, channel_count: usize, sample_rate: f64) -> Result<()>;

    /// Apply a whole [`KernelConfig`], ramp duration included.
    fn configure(&mut self, config: &KernelConfig) -> Result<()> {
        config.validate()?;
        self.handle().set_ramp_duration(config.ramp_duration)?;
        self.initialize(config.channel_count, config.sample_rate)
    }

    /// Drop internal data. Idempotent.
    fn deinit(&mut self);

    /// Clear transient signal state and finish in-flight ramps. Keeps
    /// configuration, parameter targets and wavetables. Realtime safe.
    fn reset(&mut self);

    /// Render `frame_count` frames starting at `buffer_offset`. Realtime
    /// safe. Outputs silence when the kernel is not initialized.
    fn process(&mut self, buffers: &mut AudioBuffers<'_, '_>, frame_count: u32, buffer_offset: u32);

    /// Store a new clamped target and return it. NaN and unknown addresses
    /// are rejected.
    fn set_parameter_value(&self, address: ParameterAddress, value: f32) -> Result<f32>;

    /// Latest target for `address`.
    fn parameter_value(&self, address: ParameterAddress) -> Option<f32>;

    /// Value the audio path used for the last rendered frame.
    fn current_value(&self, address: ParameterAddress) -> Option<f32>;

    /// Queue a wavetable for `index`; installed at the next block boundary.
    fn set_wavetable(&self, table: Arc<[f32]>, index: usize) -> Result<()>;

    fn handle(&self) -> KernelHandle;

    fn lifecycle(&self) -> LifecycleState;

    fn channel_count(&self) -> usize;

    fn sample_rate(&self) -> f64;
}

impl DspKernel for Box<dyn DspKernel> {
    fn kernel_type(&self) -> KernelType {
        (**self).kernel_type()
    }

    fn parameters(&self) -> &'static [ParameterDescriptor] {
        (**self).parameters()
    }

    fn initialize(&mut self, channel_count: usize, sample_rate: f64) -> Result<()> {
        (**self).initialize(channel_count, sample_rate)
    }

    fn configure(&mut self, config: &KernelConfig) -> Result<()> {
        (**self).configure(config)
    }

    fn deinit(&mut self) {
        (**self).deinit()
    }

    fn reset(&mut self) {
        (**self).reset()
    }

    fn process(&mut self, buffers: &mut AudioBuffers<'_, '_>, frame_count: u32, buffer_offset: u32) {
        (**self).process(buffers, frame_count, buffer_offset)
    }

    fn set_parameter_value(&self, address: ParameterAddress, value: f32) -> Result<f32> {
        (**self).set_parameter_value(address, value)
    }

    fn parameter_value(&self, address: ParameterAddress) -> Option<f32> {
        (**self).parameter_value(address)
    }

    fn current_value(&self, address: ParameterAddress) -> Option<f32> {
        (**self).current_value(address)
    }

    fn set_wavetable(&self, table: Arc<[f32]>, index: usize) -> Result<()> {
        (**self).set_wavetable(table, index)
    }

    fn handle(&self) -> KernelHandle {
        (**self).handle()
    }

    fn lifecycle(&self) -> LifecycleState {
        (**self).lifecycle()
    }

    fn channel_count(&self) -> usize {
        (**self).channel_count()
    }

    fn sample_rate(&self) -> f64 {
        (**self).sample_rate()
    }
}
