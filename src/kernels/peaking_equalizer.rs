use crate::{
    dsp::pareq::PeakingEq,
    kernel::{ChannelPolicy, Kernel, KernelDsp, RenderCtx},
    kernels::KernelType,
    param::{ParameterAddress, ParameterDescriptor, ParameterUnit},
};

#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PeakingEqualizerParameter {
    CenterFrequency = 0,
    Gain = 1,
    Q = 2,
}

impl From<PeakingEqualizerParameter> for ParameterAddress {
    fn from(parameter: PeakingEqualizerParameter) -> Self {
        parameter as ParameterAddress
    }
}

const PARAMETERS: &[ParameterDescriptor] = &[
    ParameterDescriptor::new(0, "centerFrequency", "Center Frequency", 12.0, 20_000.0, 1_000.0, ParameterUnit::Hertz),
    ParameterDescriptor::new(1, "gain", "Gain", 0.0, 10.0, 1.0, ParameterUnit::LinearGain),
    ParameterDescriptor::new(2, "q", "Q", 0.0, 2.0, 0.707, ParameterUnit::Generic),
];

pub struct PeakingEqualizerDsp {
    channels: Box<[PeakingEq]>,
}

impl KernelDsp for PeakingEqualizerDsp {
    const KIND: KernelType = KernelType::PeakingEqualizer;
    const POLICY: ChannelPolicy = ChannelPolicy::Effect;
    const PARAMETERS: &'static [ParameterDescriptor] = PARAMETERS;

    fn allocate(channel_count: usize, sample_rate: f64) -> Self {
        Self {
            channels: (0..channel_count)
                .map(|_| PeakingEq::new(sample_rate as f32))
                .collect(),
        }
    }

    fn reset(&mut self) {
        self.channels.iter_mut().for_each(PeakingEq::reset);
    }

    fn reset_channel(&mut self, channel: usize) {
        if let Some(eq) = self.channels.get_mut(channel) {
            eq.reset();
        }
    }

    #[inline]
    fn render(&mut self, channel: usize, input: f32, ctx: &RenderCtx<'_>) -> f32 {
        let Some(eq) = self.channels.get_mut(channel) else {
            return 0.0;
        };
        eq.set(
            ctx.value(PeakingEqualizerParameter::CenterFrequency),
            ctx.value(PeakingEqualizerParameter::Gain),
            ctx.value(PeakingEqualizerParameter::Q),
        );
        eq.process(input)
    }
}

/// Second-order peaking parametric equalizer.
pub type PeakingEqualizer = Kernel<PeakingEqualizerDsp>;
