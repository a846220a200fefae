use crate::{
    dsp::pshift::PitchShift,
    kernel::{ChannelPolicy, Kernel, KernelDsp, RenderCtx},
    kernels::KernelType,
    param::{ParameterAddress, ParameterDescriptor, ParameterUnit},
};

#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PitchShifterParameter {
    Shift = 0,
    WindowSize = 1,
    Crossfade = 2,
}

impl From<PitchShifterParameter> for ParameterAddress {
    fn from(parameter: PitchShifterParameter) -> Self {
        parameter as ParameterAddress
    }
}

const PARAMETERS: &[ParameterDescriptor] = &[
    ParameterDescriptor::new(0, "shift", "Pitch shift", -24.0, 24.0, 0.0, ParameterUnit::Semitones),
    ParameterDescriptor::new(1, "windowSize", "Window size", 0.0, 10_000.0, 1_024.0, ParameterUnit::Samples),
    ParameterDescriptor::new(2, "crossfade", "Crossfade", 0.0, 10_000.0, 512.0, ParameterUnit::Samples),
];

pub struct PitchShifterDsp {
    channels: Box<[PitchShift]>,
}

impl KernelDsp for PitchShifterDsp {
    const KIND: KernelType = KernelType::PitchShifter;
    const POLICY: ChannelPolicy = ChannelPolicy::Effect;
    const PARAMETERS: &'static [ParameterDescriptor] = PARAMETERS;

    fn allocate(channel_count: usize, _sample_rate: f64) -> Self {
        Self {
            channels: (0..channel_count).map(|_| PitchShift::new()).collect(),
        }
    }

    fn reset(&mut self) {
        self.channels.iter_mut().for_each(PitchShift::reset);
    }

    fn reset_channel(&mut self, channel: usize) {
        if let Some(shifter) = self.channels.get_mut(channel) {
            shifter.reset();
        }
    }

    #[inline]
    fn render(&mut self, channel: usize, input: f32, ctx: &RenderCtx<'_>) -> f32 {
        let Some(shifter) = self.channels.get_mut(channel) else {
            return 0.0;
        };
        shifter.process(
            input,
            ctx.value(PitchShifterParameter::Shift),
            ctx.value(PitchShifterParameter::WindowSize),
            ctx.value(PitchShifterParameter::Crossfade),
        )
    }
}

/// Delay-line pitch shifter. Latency is one window.
pub type PitchShifter = Kernel<PitchShifterDsp>;
