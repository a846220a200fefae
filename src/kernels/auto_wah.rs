use crate::{
    dsp::autowah,
    kernel::{ChannelPolicy, Kernel, KernelDsp, RenderCtx},
    kernels::KernelType,
    param::{ParameterAddress, ParameterDescriptor, ParameterUnit},
};

#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AutoWahParameter {
    Wah = 0,
    Mix = 1,
    Amplitude = 2,
}

impl From<AutoWahParameter> for ParameterAddress {
    fn from(parameter: AutoWahParameter) -> Self {
        parameter as ParameterAddress
    }
}

const PARAMETERS: &[ParameterDescriptor] = &[
    ParameterDescriptor::new(0, "wah", "Wah Amount", 0.0, 1.0, 0.0, ParameterUnit::Generic),
    ParameterDescriptor::new(1, "mix", "Dry/Wet Mix", 0.0, 1.0, 1.0, ParameterUnit::Mix),
    ParameterDescriptor::new(2, "amplitude", "Overall level", 0.0, 1.0, 0.1, ParameterUnit::LinearGain),
];

pub struct AutoWahDsp {
    channels: Box<[autowah::AutoWah]>,
}

impl KernelDsp for AutoWahDsp {
    const KIND: KernelType = KernelType::AutoWah;
    const POLICY: ChannelPolicy = ChannelPolicy::Effect;
    const PARAMETERS: &'static [ParameterDescriptor] = PARAMETERS;

    fn allocate(channel_count: usize, sample_rate: f64) -> Self {
        Self {
            channels: (0..channel_count)
                .map(|_| autowah::AutoWah::new(sample_rate as f32))
                .collect(),
        }
    }

    fn reset(&mut self) {
        self.channels.iter_mut().for_each(autowah::AutoWah::reset);
    }

    fn reset_channel(&mut self, channel: usize) {
        if let Some(wah) = self.channels.get_mut(channel) {
            wah.reset();
        }
    }

    #[inline]
    fn render(&mut self, channel: usize, input: f32, ctx: &RenderCtx<'_>) -> f32 {
        let Some(wah) = self.channels.get_mut(channel) else {
            return 0.0;
        };
        wah.process(
            input,
            ctx.value(AutoWahParameter::Wah),
            ctx.value(AutoWahParameter::Mix),
            ctx.value(AutoWahParameter::Amplitude),
        )
    }
}

/// Envelope-following wah, one independent sweep per channel.
pub type AutoWah = Kernel<AutoWahDsp>;
