use std::sync::Arc;

use crate::{
    buffer::{AudioBuffers, BlockLayout},
    config::{validate_channel_count, validate_sample_rate},
    error::Result,
    kernel::{
        wavetable_channel, ChannelPolicy, DspKernel, KernelDsp, KernelHandle, LifecycleState,
        RenderCtx, Shared, Wavetable, WavetableReceiver,
    },
    kernels::KernelType,
    param::{ParameterAddress, ParameterDescriptor, ParameterRamp},
};

/*
Per-Block Processing
====================

    block start
      install queued wavetables
      load every target once, retarget ramps (no-op when unchanged)

    for each frame in offset .. offset + frames
      tick every ramp one sample          shared by all channels
      generator: render once, fan out     effect: render per channel

Targets are only sampled at block boundaries, so splitting one block into
two at any frame produces bit-identical output as long as no target is
written in between. The start/stop flag is sampled there too; a stopped
kernel still ticks its ramps but skips the transform.

Fault containment
-----------------

Non-finite input is replaced with silence before it reaches a primitive.
If a primitive still produces a non-finite sample (an unstable filter, say)
the sample is written as silence and that channel's state is cleared, so
one bad sample cannot poison every block that follows.
*/

/// The shared kernel base: a [`KernelDsp`] plus parameters, lifecycle and
/// buffer handling.
pub struct Kernel<D: KernelDsp> {
    shared: Arc<Shared>,
    wavetable_rx: WavetableReceiver,
    wavetables: Box<[Option<Wavetable>]>,
    ramps: Box<[ParameterRamp]>,
    values: Box<[f32]>,
    dsp: Option<Box<D>>,
    lifecycle: LifecycleState,
    channel_count: usize,
    sample_rate: f64,
}

impl<D: KernelDsp> Kernel<D> {
    pub fn new() -> Self {
        let (tx, rx) = wavetable_channel();
        let shared = Arc::new(Shared::new(
            D::KIND,
            D::PARAMETERS,
            D::WAVETABLE_SLOTS,
            tx,
        ));

        Self {
            shared,
            wavetable_rx: rx,
            wavetables: (0..D::WAVETABLE_SLOTS).map(D::default_wavetable).collect(),
            ramps: D::PARAMETERS
                .iter()
                .map(|d| ParameterRamp::new(d.default))
                .collect(),
            values: D::PARAMETERS.iter().map(|d| d.default).collect(),
            dsp: None,
            lifecycle: LifecycleState::Created,
            channel_count: 0,
            sample_rate: 0.0,
        }
    }

    /// Working state, when initialized.
    pub fn dsp(&self) -> Option<&D> {
        self.dsp.as_deref()
    }

    /// Table currently installed in `index` on the audio side.
    pub fn wavetable(&self, index: usize) -> Option<&[f32]> {
        self.wavetables.get(index)?.as_deref()
    }

    fn ramp_samples(&self) -> u32 {
        let samples = (self.shared.store.ramp_duration() as f64 * self.sample_rate).round();
        samples.clamp(0.0, u32::MAX as f64) as u32
    }

    fn snap_to_targets(&mut self) {
        for (index, (ramp, value)) in self.ramps.iter_mut().zip(self.values.iter_mut()).enumerate() {
            ramp.jump_to(self.shared.store.load(index));
            *value = ramp.current();
        }
    }

    #[inline]
    fn retarget(&mut self) {
        let duration = self.ramp_samples();
        for (index, ramp) in self.ramps.iter_mut().enumerate() {
            ramp.retarget(self.shared.store.load(index), duration);
        }
    }

    #[inline]
    fn render_frames(&mut self, buffers: &mut AudioBuffers<'_, '_>, layout: &BlockLayout) {
        let Some(dsp) = self.dsp.as_deref_mut() else {
            return;
        };

        for index in layout.start..layout.end {
            for (ramp, value) in self.ramps.iter_mut().zip(self.values.iter_mut()) {
                *value = ramp.tick();
            }
            let ctx = RenderCtx::new(self.sample_rate, &self.values, &self.wavetables);

            match D::POLICY {
                ChannelPolicy::Generator => {
                    let sample = dsp.render(0, 0.0, &ctx);
                    let sample = contain(dsp, 0, sample);
                    buffers.fan_out(layout, index, sample);
                }
                ChannelPolicy::Effect => {
                    for channel in 0..layout.channels {
                        let input = buffers.input(channel, index);
                        let input = if input.is_finite() { input } else { 0.0 };
                        let sample = dsp.render(channel, input, &ctx);
                        let sample = contain(dsp, channel, sample);
                        buffers.write(channel, index, sample);
                    }
                }
            }
        }
    }

    /// Stopped: effects copy input to output, generators write silence.
    fn bypass_frames(&mut self, buffers: &mut AudioBuffers<'_, '_>, layout: &BlockLayout) {
        for index in layout.start..layout.end {
            for (ramp, value) in self.ramps.iter_mut().zip(self.values.iter_mut()) {
                *value = ramp.tick();
            }
            if let ChannelPolicy::Effect = D::POLICY {
                for channel in 0..layout.channels {
                    let input = buffers.input(channel, index);
                    buffers.write(channel, index, if input.is_finite() { input } else { 0.0 });
                }
            }
        }

        if let ChannelPolicy::Generator = D::POLICY {
            buffers.silence(layout);
        }
    }
}

/// Pass finite samples through; otherwise clear the channel and emit silence.
#[inline]
fn contain<D: KernelDsp>(dsp: &mut D, channel: usize, sample: f32) -> f32 {
    if sample.is_finite() {
        sample
    } else {
        dsp.reset_channel(channel);
        0.0
    }
}

impl<D: KernelDsp> Default for Kernel<D> {
    fn default() -> Self {
        Self::new()
    }
}

impl<D: KernelDsp> DspKernel for Kernel<D> {
    fn kernel_type(&self) -> KernelType {
        D::KIND
    }

    fn parameters(&self) -> &'static [ParameterDescriptor] {
        D::PARAMETERS
    }

    fn initialize(&mut self, channel_count: usize, sample_rate: f64) -> Result<()> {
        let kernel = D::KIND.name();
        if let Err(err) =
            validate_channel_count(channel_count).and_then(|_| validate_sample_rate(sample_rate))
        {
            tracing::warn!(kernel, channel_count, sample_rate, %err, "initialize rejected");
            return Err(err);
        }

        self.dsp = Some(Box::new(D::allocate(channel_count, sample_rate)));
        self.channel_count = channel_count;
        self.sample_rate = sample_rate;
        self.wavetable_rx.receive(&mut self.wavetables);
        self.snap_to_targets();
        self.lifecycle = LifecycleState::Initialized;

        tracing::info!(kernel, channel_count, sample_rate, "kernel initialized");
        Ok(())
    }

    fn deinit(&mut self) {
        if self.dsp.take().is_some() {
            tracing::debug!(kernel = D::KIND.name(), "kernel deinitialized");
        }
        self.lifecycle = LifecycleState::Deinitialized;
    }

    fn reset(&mut self) {
        let Some(dsp) = self.dsp.as_deref_mut() else {
            return;
        };
        dsp.reset();
        self.snap_to_targets();
    }

    fn process(&mut self, buffers: &mut AudioBuffers<'_, '_>, frame_count: u32, buffer_offset: u32) {
        if self.dsp.is_none() {
            let layout = buffers.layout(buffers.output_channels(), frame_count, buffer_offset);
            buffers.silence(&layout);
            return;
        }

        self.lifecycle = LifecycleState::Processing;
        self.wavetable_rx.receive(&mut self.wavetables);
        self.retarget();

        let layout = buffers.layout(self.channel_count, frame_count, buffer_offset);
        if layout.is_empty() {
            return;
        }
        if self.shared.is_started() {
            self.render_frames(buffers, &layout);
        } else {
            self.bypass_frames(buffers, &layout);
        }
    }

    fn set_parameter_value(&self, address: ParameterAddress, value: f32) -> Result<f32> {
        self.shared.store.set(address, value)
    }

    fn parameter_value(&self, address: ParameterAddress) -> Option<f32> {
        self.shared.store.target(address)
    }

    fn current_value(&self, address: ParameterAddress) -> Option<f32> {
        self.values.get(address as usize).copied()
    }

    fn set_wavetable(&self, table: Arc<[f32]>, index: usize) -> Result<()> {
        self.shared.set_wavetable(table, index)
    }

    fn handle(&self) -> KernelHandle {
        KernelHandle::new(Arc::clone(&self.shared))
    }

    fn lifecycle(&self) -> LifecycleState {
        self.lifecycle
    }

    fn channel_count(&self) -> usize {
        self.channel_count
    }

    fn sample_rate(&self) -> f64 {
        self.sample_rate
    }
}
