use std::f32::consts::PI;

/*
Band-pass State-Variable Filter
===============================

Topology-preserving (trapezoidal) SVF, read at its band-pass tap:

    input ─► [ integrator 1 ] ─► band-pass ─► [ integrator 2 ] ─► (low-pass)
                  ▲                                 │
                  └──────── k · band + low ◄────────┘

    g = tan(π · fc / sr)      prewarped cutoff
    k = 2 - 2 · resonance     damping; peak gain at fc is 1/k

The cutoff is kept below 0.49 · sr, where tan() is still well behaved.
*/

/// Topology-preserving state-variable filter, band-pass output.
pub struct SVFilter {
    ic1eq: f32, // First integrator's memory
    ic2eq: f32, // Second integrator's memory

    cutoff_hz: f32,
    resonance: f32,
    sample_rate: f32,

    // Cached coefficients, refreshed when cutoff/resonance change
    g: f32,
    k: f32,
}

impl SVFilter {
    pub fn bandpass(cutoff_hz: f32, sample_rate: f32) -> Self {
        let mut filter = Self {
            ic1eq: 0.0,
            ic2eq: 0.0,
            cutoff_hz,
            resonance: 0.0,
            sample_rate,
            g: 0.0,
            k: 2.0,
        };
        filter.update_coefficients();
        filter
    }

    fn update_coefficients(&mut self) {
        // max/min rather than clamp: at very low sample rates the upper
        // bound drops below 1 Hz
        let cutoff = self.cutoff_hz.max(1.0).min(self.sample_rate * 0.49);
        self.g = (PI * cutoff / self.sample_rate).tan();
        self.k = 2.0 - (2.0 * self.resonance);
    }

    #[inline]
    pub fn process(&mut self, sample: f32) -> f32 {
        let (g, k) = (self.g, self.k);
        let h = 1.0 / (1.0 + g * (g + k));
        let v3 = sample - self.ic2eq;
        let v1 = h * (self.ic1eq + g * v3);
        let v2 = self.ic2eq + g * v1;

        self.ic1eq = 2.0 * v1 - self.ic1eq;
        self.ic2eq = 2.0 * v2 - self.ic2eq;

        v1
    }

    pub fn reset(&mut self) {
        self.ic1eq = 0.0;
        self.ic2eq = 0.0;
    }

    pub fn cutoff(&self) -> f32 {
        self.cutoff_hz
    }

    pub fn set_cutoff(&mut self, cutoff: f32) {
        if cutoff != self.cutoff_hz {
            self.cutoff_hz = cutoff;
            self.update_coefficients();
        }
    }

    /// 0.0 = no emphasis, approaching 1.0 = self-oscillation.
    pub fn set_resonance(&mut self, resonance: f32) {
        let resonance = resonance.clamp(0.0, 0.98);
        if resonance != self.resonance {
            self.resonance = resonance;
            self.update_coefficients();
        }
    }
}
