use crate::{
    dsp::reverb::JcReverb,
    kernel::{ChannelPolicy, Kernel, KernelDsp, RenderCtx},
    kernels::KernelType,
    param::ParameterDescriptor,
};

pub struct ChowningReverbDsp {
    channels: Box<[JcReverb]>,
}

impl KernelDsp for ChowningReverbDsp {
    const KIND: KernelType = KernelType::ChowningReverb;
    const POLICY: ChannelPolicy = ChannelPolicy::Effect;
    const PARAMETERS: &'static [ParameterDescriptor] = &[];

    fn allocate(channel_count: usize, _sample_rate: f64) -> Self {
        Self {
            channels: (0..channel_count).map(|_| JcReverb::new()).collect(),
        }
    }

    fn reset(&mut self) {
        self.channels.iter_mut().for_each(JcReverb::reset);
    }

    fn reset_channel(&mut self, channel: usize) {
        if let Some(reverb) = self.channels.get_mut(channel) {
            reverb.reset();
        }
    }

    #[inline]
    fn render(&mut self, channel: usize, input: f32, _ctx: &RenderCtx<'_>) -> f32 {
        self.channels
            .get_mut(channel)
            .map_or(0.0, |reverb| reverb.process(input))
    }
}

/// Chowning (JC) reverb with no controls.
pub type ChowningReverb = Kernel<ChowningReverbDsp>;
