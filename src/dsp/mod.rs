//! Low-level DSP primitives the kernels are built from.
//!
//! Everything here allocates in `new` and never again, so instances can live
//! inside a kernel's per-channel state and run on the audio thread. The
//! primitives only know about samples and plain control values; parameter
//! ramping and buffer handling belong to the kernel layer.

/// Envelope-driven band-pass sweep.
pub mod autowah;
/// Power-of-two delay line with fractional reads.
pub mod delay;
/// State-variable filter implementation with multiple responses.
pub mod filter;
/// Peak envelope follower.
pub mod follower;
/// Two-operator table-lookup FM oscillator.
pub mod fosc;
pub mod pareq;
pub mod pshift;
/// Chowning/JC Schroeder reverb.
pub mod reverb;
pub mod wavetable;

pub use fosc::FmControls;
