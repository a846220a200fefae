//! The kernel catalogue and the factory that builds kernels by type.
//!
//! | kernel                 | policy    | parameters                                          |
//! | ---------------------- | --------- | --------------------------------------------------- |
//! | `fm-oscillator`        | generator | baseFrequency, carrierMultiplier,                   |
//! |                        |           | modulatingMultiplier, modulationIndex, amplitude    |
//! | `auto-wah`             | effect    | wah, mix, amplitude                                 |
//! | `pitch-shifter`        | effect    | shift, windowSize, crossfade                        |
//! | `peaking-equalizer`    | effect    | centerFrequency, gain, q                            |
//! | `chowning-reverb`      | effect    | (none)                                              |

pub mod auto_wah;
pub mod chowning_reverb;
pub mod fm_oscillator;
pub mod peaking_equalizer;
pub mod pitch_shifter;

use std::{fmt, str::FromStr};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{
    error::KernelError,
    kernel::{ChannelPolicy, DspKernel, KernelDsp},
    param::ParameterDescriptor,
};

pub use auto_wah::{AutoWah, AutoWahParameter};
pub use chowning_reverb::ChowningReverb;
pub use fm_oscillator::{FmOscillator, FmOscillatorParameter};
pub use peaking_equalizer::{PeakingEqualizer, PeakingEqualizerParameter};
pub use pitch_shifter::{PitchShifter, PitchShifterParameter};

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KernelType {
    FmOscillator,
    AutoWah,
    PitchShifter,
    PeakingEqualizer,
    ChowningReverb,
}

impl KernelType {
    pub const ALL: [KernelType; 5] = [
        KernelType::FmOscillator,
        KernelType::AutoWah,
        KernelType::PitchShifter,
        KernelType::PeakingEqualizer,
        KernelType::ChowningReverb,
    ];

    /// Stable kebab-case name, also accepted by `FromStr`.
    pub const fn name(self) -> &'static str {
        match self {
            KernelType::FmOscillator => "fm-oscillator",
            KernelType::AutoWah => "auto-wah",
            KernelType::PitchShifter => "pitch-shifter",
            KernelType::PeakingEqualizer => "peaking-equalizer",
            KernelType::ChowningReverb => "chowning-reverb",
        }
    }

    /// Descriptor table, available without an instance.
    pub fn parameters(self) -> &'static [ParameterDescriptor] {
        match self {
            KernelType::FmOscillator => fm_oscillator::FmOscillatorDsp::PARAMETERS,
            KernelType::AutoWah => auto_wah::AutoWahDsp::PARAMETERS,
            KernelType::PitchShifter => pitch_shifter::PitchShifterDsp::PARAMETERS,
            KernelType::PeakingEqualizer => peaking_equalizer::PeakingEqualizerDsp::PARAMETERS,
            KernelType::ChowningReverb => chowning_reverb::ChowningReverbDsp::PARAMETERS,
        }
    }

    pub fn policy(self) -> ChannelPolicy {
        match self {
            KernelType::FmOscillator => ChannelPolicy::Generator,
            _ => ChannelPolicy::Effect,
        }
    }

    pub fn is_generator(self) -> bool {
        self.policy() == ChannelPolicy::Generator
    }

    pub fn wavetable_slots(self) -> usize {
        match self {
            KernelType::FmOscillator => fm_oscillator::FmOscillatorDsp::WAVETABLE_SLOTS,
            _ => 0,
        }
    }

    /// Build an uninitialized kernel of this type.
    pub fn create(self) -> Box<dyn DspKernel> {
        match self {
            KernelType::FmOscillator => Box::new(FmOscillator::new()),
            KernelType::AutoWah => Box::new(AutoWah::new()),
            KernelType::PitchShifter => Box::new(PitchShifter::new()),
            KernelType::PeakingEqualizer => Box::new(PeakingEqualizer::new()),
            KernelType::ChowningReverb => Box::new(ChowningReverb::new()),
        }
    }
}

impl fmt::Display for KernelType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for KernelType {
    type Err = KernelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        KernelType::ALL
            .into_iter()
            .find(|kind| kind.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| KernelError::UnknownKernel(s.to_owned()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_round_trip_through_from_str() {
        for kind in KernelType::ALL {
            assert_eq!(kind.name().parse::<KernelType>(), Ok(kind));
        }
        assert_eq!("Auto-Wah".parse::<KernelType>(), Ok(KernelType::AutoWah));
        assert!(matches!(
            "flanger".parse::<KernelType>(),
            Err(KernelError::UnknownKernel(name)) if name == "flanger"
        ));
    }

    #[test]
    fn created_kernels_report_their_type_and_table() {
        for kind in KernelType::ALL {
            let kernel = kind.create();
            assert_eq!(kernel.kernel_type(), kind);
            assert_eq!(kernel.parameters(), kind.parameters());
        }
    }

    #[test]
    fn descriptor_addresses_are_dense_and_defaults_in_range() {
        for kind in KernelType::ALL {
            for (index, descriptor) in kind.parameters().iter().enumerate() {
                assert_eq!(descriptor.address as usize, index, "{kind}");
                assert!(descriptor.min <= descriptor.max, "{kind}");
                assert!((descriptor.min..=descriptor.max).contains(&descriptor.default), "{kind}");
            }
        }
    }

    #[test]
    fn only_the_oscillator_is_a_generator() {
        assert!(KernelType::FmOscillator.is_generator());
        assert_eq!(KernelType::FmOscillator.wavetable_slots(), 1);
        for kind in &KernelType::ALL[1..] {
            assert!(!kind.is_generator());
            assert_eq!(kind.wavetable_slots(), 0);
        }
    }
}
