//! Parameter addressing and the lock-free parameter store.
//!
//! A kernel type publishes a `'static` table of [`ParameterDescriptor`]s whose
//! index is the parameter's address. Hosts persist automation by address, so
//! a shipped table only ever grows at the end.
//!
//! Threading model
//! ---------------
//!
//!   control thread                       audio thread
//!   --------------                       ------------
//!   set(address, value)                  process()
//!     clamp to range                       load every target (once per block)
//!     one atomic store ───────────────►    retarget ramps
//!                                          tick ramps once per frame
//!
//! Each target is an [`AtomicF32`]. Values are
//! independent of each other, so `Relaxed` loads/stores are enough: the
//! audio thread only needs to see *some* recent value of each word.

pub mod ramp;

use std::sync::atomic::Ordering;

use atomic_float::AtomicF32;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{
    config::validate_ramp_duration,
    error::{KernelError, Result},
    DEFAULT_RAMP_SECONDS,
};

pub use ramp::ParameterRamp;

/// Dense, zero-based parameter index within one kernel type.
pub type ParameterAddress = u32;

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParameterUnit {
    Generic,
    Hertz,
    /// Multiplier applied to another value (carrier/modulator ratios).
    Ratio,
    /// Linear amplitude factor (1.0 = unity).
    LinearGain,
    /// 0.0 = dry, 1.0 = wet.
    Mix,
    Semitones,
    Samples,
}

/// Immutable description of one automatable control.
#[cfg_attr(feature = "serde", derive(Serialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParameterDescriptor {
    pub address: ParameterAddress,
    /// Stable camelCase key, e.g. `baseFrequency`.
    pub identifier: &'static str,
    /// Human readable name.
    pub name: &'static str,
    pub min: f32,
    pub max: f32,
    pub default: f32,
    pub unit: ParameterUnit,
}

impl ParameterDescriptor {
    pub const fn new(
        address: ParameterAddress,
        identifier: &'static str,
        name: &'static str,
        min: f32,
        max: f32,
        default: f32,
        unit: ParameterUnit,
    ) -> Self {
        Self {
            address,
            identifier,
            name,
            min,
            max,
            default,
            unit,
        }
    }

    /// Clamp into `[min, max]`. Infinities land on the matching bound.
    #[inline]
    pub fn clamp(&self, value: f32) -> f32 {
        value.clamp(self.min, self.max)
    }
}

/// Target values for one kernel instance, writable from any thread.
#[derive(Debug)]
pub struct ParameterStore {
    kernel: &'static str,
    descriptors: &'static [ParameterDescriptor],
    targets: Box<[AtomicF32]>,
    ramp_seconds: AtomicF32,
}

impl ParameterStore {
    /// Create a store with every target at its descriptor default.
    pub fn new(kernel: &'static str, descriptors: &'static [ParameterDescriptor]) -> Self {
        debug_assert!(descriptors
            .iter()
            .enumerate()
            .all(|(index, d)| d.address as usize == index));

        let targets = descriptors
            .iter()
            .map(|d| AtomicF32::new(d.default))
            .collect();

        Self {
            kernel,
            descriptors,
            targets,
            ramp_seconds: AtomicF32::new(DEFAULT_RAMP_SECONDS),
        }
    }

    pub fn descriptors(&self) -> &'static [ParameterDescriptor] {
        self.descriptors
    }

    pub fn descriptor(&self, address: ParameterAddress) -> Option<&'static ParameterDescriptor> {
        self.descriptors.get(address as usize)
    }

    /// Resolve a stable identifier (`"baseFrequency"`) to its address.
    pub fn address_of(&self, identifier: &str) -> Result<ParameterAddress> {
        self.descriptors
            .iter()
            .find(|d| d.identifier == identifier)
            .map(|d| d.address)
            .ok_or_else(|| KernelError::UnknownIdentifier {
                kernel: self.kernel,
                identifier: identifier.to_owned(),
            })
    }

    /// Set a new target, clamped to the descriptor range.
    ///
    /// Returns the value actually stored. NaN is rejected; everything else is
    /// clamped rather than refused.
    pub fn set(&self, address: ParameterAddress, value: f32) -> Result<f32> {
        let descriptor = self.descriptor(address).ok_or(KernelError::UnknownParameter {
            kernel: self.kernel,
            address,
        })?;
        if value.is_nan() {
            return Err(KernelError::NonFiniteValue);
        }

        let clamped = descriptor.clamp(value);
        self.targets[address as usize].store(clamped, Ordering::Relaxed);
        Ok(clamped)
    }

    /// Current target of `address`.
    pub fn target(&self, address: ParameterAddress) -> Option<f32> {
        self.targets
            .get(address as usize)
            .map(|target| target.load(Ordering::Relaxed))
    }

    /// Audio-thread read of the target at a known-valid index.
    #[inline]
    pub(crate) fn load(&self, index: usize) -> f32 {
        self.targets[index].load(Ordering::Relaxed)
    }

    /// Seconds a target change takes to be reached. Picked up by the audio
    /// thread at the next block boundary.
    pub fn set_ramp_duration(&self, seconds: f32) -> Result<()> {
        validate_ramp_duration(seconds)?;
        self.ramp_seconds.store(seconds, Ordering::Relaxed);
        Ok(())
    }

    pub fn ramp_duration(&self) -> f32 {
        self.ramp_seconds.load(Ordering::Relaxed)
    }
}
