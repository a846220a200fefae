//! Two-operator FM oscillator kernel.

use std::sync::Arc;

use crate::{
    dsp::{
        fosc::{FmControls, Fosc},
        wavetable::{sine_table, DEFAULT_TABLE_SIZE},
    },
    kernel::{ChannelPolicy, Kernel, KernelDsp, RenderCtx, Wavetable},
    kernels::KernelType,
    param::{ParameterAddress, ParameterDescriptor, ParameterUnit},
};

#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FmOscillatorParameter {
    BaseFrequency = 0,
    CarrierMultiplier = 1,
    ModulatingMultiplier = 2,
    ModulationIndex = 3,
    Amplitude = 4,
}

impl From<FmOscillatorParameter> for ParameterAddress {
    fn from(parameter: FmOscillatorParameter) -> Self {
        parameter as ParameterAddress
    }
}

const PARAMETERS: &[ParameterDescriptor] = &[
    ParameterDescriptor::new(0, "baseFrequency", "Base Frequency", 0.0, 20_000.0, 440.0, ParameterUnit::Hertz),
    ParameterDescriptor::new(1, "carrierMultiplier", "Carrier Multiplier", 0.0, 1_000.0, 1.0, ParameterUnit::Ratio),
    ParameterDescriptor::new(2, "modulatingMultiplier", "Modulating Multiplier", 0.0, 1_000.0, 1.0, ParameterUnit::Ratio),
    ParameterDescriptor::new(3, "modulationIndex", "Modulation Index", 0.0, 1_000.0, 1.0, ParameterUnit::Generic),
    ParameterDescriptor::new(4, "amplitude", "Amplitude", 0.0, 10.0, 1.0, ParameterUnit::LinearGain),
];

pub struct FmOscillatorDsp {
    osc: Fosc,
}

impl KernelDsp for FmOscillatorDsp {
    const KIND: KernelType = KernelType::FmOscillator;
    const POLICY: ChannelPolicy = ChannelPolicy::Generator;
    const PARAMETERS: &'static [ParameterDescriptor] = PARAMETERS;
    const WAVETABLE_SLOTS: usize = 1;

    fn default_wavetable(_index: usize) -> Option<Wavetable> {
        Some(Arc::from(sine_table(DEFAULT_TABLE_SIZE)))
    }

    fn allocate(_channel_count: usize, sample_rate: f64) -> Self {
        Self {
            osc: Fosc::new(sample_rate),
        }
    }

    fn reset(&mut self) {
        self.osc.reset();
    }

    fn reset_channel(&mut self, _channel: usize) {
        self.osc.reset();
    }

    #[inline]
    fn render(&mut self, _channel: usize, _input: f32, ctx: &RenderCtx<'_>) -> f32 {
        use FmOscillatorParameter::*;

        let controls = FmControls {
            base_frequency: ctx.value(BaseFrequency),
            carrier_multiplier: ctx.value(CarrierMultiplier),
            modulating_multiplier: ctx.value(ModulatingMultiplier),
            modulation_index: ctx.value(ModulationIndex),
            amplitude: ctx.value(Amplitude),
        };
        self.osc.next_sample(ctx.wavetable(0), &controls)
    }
}

/// FM oscillator: a generator with one wavetable slot, starting on a sine.
pub type FmOscillator = Kernel<FmOscillatorDsp>;
