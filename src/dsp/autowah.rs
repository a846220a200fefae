use crate::dsp::{filter::SVFilter, follower::EnvelopeFollower};

/*
Auto-Wah
========

A wah pedal sweeps a resonant band-pass filter up and down. An auto-wah
lets the player's dynamics do the sweeping: an envelope follower tracks
how loud the input is and moves the filter with it.

    input ──┬──────────────────────────────────────┬──► dry · (1 - mix)
            │                                      │
            └─► follower ─► sweep position ─► SVF band-pass ──► wet · mix
                                                   │
                                     output = (dry + wet) · amplitude

Sweep mapping
-------------

    position = clamp(wah · envelope · SENSITIVITY, 0, 1)
    center   = LOW_HZ · 2^(position · OCTAVES)

`wah = 0` parks the filter at its lowest point; `wah = 1` lets a loud note
open it fully. The sweep is exponential in frequency because pitch is
perceived logarithmically.
*/

const LOW_HZ: f32 = 350.0;
const OCTAVES: f32 = 4.0;
const SENSITIVITY: f32 = 6.0;
const RESONANCE: f32 = 0.8;
// Band-pass peak gain is 1/k with k = 2 - 2·RESONANCE; bring it back to unity
const WET_GAIN: f32 = 2.0 - 2.0 * RESONANCE;

pub struct AutoWah {
    follower: EnvelopeFollower,
    filter: SVFilter,
}

impl AutoWah {
    pub fn new(sample_rate: f32) -> Self {
        let mut filter = SVFilter::bandpass(LOW_HZ, sample_rate);
        filter.set_resonance(RESONANCE);

        Self {
            follower: EnvelopeFollower::new(sample_rate, 0.004, 0.12),
            filter,
        }
    }

    /// `wah` and `mix` in 0..=1, `amplitude` is the overall output level.
    #[inline]
    pub fn process(&mut self, sample: f32, wah: f32, mix: f32, amplitude: f32) -> f32 {
        let envelope = self.follower.process(sample);
        let position = (wah * envelope * SENSITIVITY).clamp(0.0, 1.0);
        self.filter.set_cutoff(LOW_HZ * (position * OCTAVES).exp2());

        let wet = self.filter.process(sample) * WET_GAIN;
        let out = sample * (1.0 - mix) + wet * mix;
        out * amplitude
    }

    /// Current band-pass center frequency (Hz).
    pub fn center_frequency(&self) -> f32 {
        self.filter.cutoff()
    }

    pub fn reset(&mut self) {
        self.follower.reset();
        self.filter.reset();
        self.filter.set_cutoff(LOW_HZ);
    }
}
