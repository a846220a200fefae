//! Chowning reverb: the classic "JC" Schroeder network.
//!
//! Reverb simulates a space by summing many delayed, decaying copies of the
//! input. This network is the one John Chowning used at CCRMA: three allpass
//! stages smear an impulse into a dense burst, then four parallel feedback
//! combs turn the burst into an exponentially decaying tail.
//!
//! ```text
//!                                           ┌─→ [Comb 1601, .802] ──┐
//! Input ─→ ×0.06 ─→ [AP 347] ─→ [AP 113] ─→ [AP 37] ─┼─→ [Comb 1867, .773] ──┤
//!                                           ├─→ [Comb 2053, .753] ──┼─→ (+) ─→ Output
//!                                           └─→ [Comb 2251, .733] ──┘
//! ```
//!
//! ## Comb filters
//!
//! ```text
//! y[n] = d[n]            d = delay output
//! d ← x[n] + g · d[n]
//! ```
//!
//! Each comb rings at multiples of `sr / delay`. The delay lengths are
//! mutually prime so their resonances never stack up on one frequency.
//!
//! ## Allpass filters
//!
//! ```text
//! w    = x[n] + g · d[n]
//! y[n] = d[n] - g · w
//! d ← w
//! ```
//!
//! Flat magnitude response; they only add density by scattering phase.
//!
//! Delay lengths are in samples, as in the original network, and do not
//! scale with the sample rate. The buffers are sized once in `new`.

const INPUT_GAIN: f32 = 0.06;
const ALLPASS_GAIN: f32 = 0.7;
const ALLPASS_DELAYS: [usize; 3] = [347, 113, 37];
const COMBS: [(usize, f32); 4] = [(1601, 0.802), (1867, 0.773), (2053, 0.753), (2251, 0.733)];

/// Feedback comb with a fixed delay.
pub struct CombFilter {
    buffer: Box<[f32]>,
    write_pos: usize,
    feedback: f32,
}

impl CombFilter {
    pub fn new(delay_samples: usize, feedback: f32) -> Self {
        Self {
            buffer: vec![0.0; delay_samples.max(1)].into_boxed_slice(),
            write_pos: 0,
            feedback: feedback.clamp(0.0, 0.99),
        }
    }

    #[inline]
    pub fn process(&mut self, input: f32) -> f32 {
        let output = self.buffer[self.write_pos];
        self.buffer[self.write_pos] = input + self.feedback * output;
        self.write_pos = (self.write_pos + 1) % self.buffer.len();
        output
    }

    pub fn reset(&mut self) {
        self.buffer.fill(0.0);
        self.write_pos = 0;
    }
}

/// Schroeder allpass with a fixed delay.
pub struct AllpassFilter {
    buffer: Box<[f32]>,
    write_pos: usize,
    gain: f32,
}

impl AllpassFilter {
    pub fn new(delay_samples: usize, gain: f32) -> Self {
        Self {
            buffer: vec![0.0; delay_samples.max(1)].into_boxed_slice(),
            write_pos: 0,
            gain: gain.clamp(-0.99, 0.99),
        }
    }

    #[inline]
    pub fn process(&mut self, input: f32) -> f32 {
        let delayed = self.buffer[self.write_pos];
        let w = input + self.gain * delayed;
        self.buffer[self.write_pos] = w;
        self.write_pos = (self.write_pos + 1) % self.buffer.len();
        delayed - self.gain * w
    }

    pub fn reset(&mut self) {
        self.buffer.fill(0.0);
        self.write_pos = 0;
    }
}

pub struct JcReverb {
    allpasses: [AllpassFilter; 3],
    combs: [CombFilter; 4],
}

impl JcReverb {
    pub fn new() -> Self {
        Self {
            allpasses: ALLPASS_DELAYS.map(|delay| AllpassFilter::new(delay, ALLPASS_GAIN)),
            combs: COMBS.map(|(delay, feedback)| CombFilter::new(delay, feedback)),
        }
    }

    #[inline]
    pub fn process(&mut self, input: f32) -> f32 {
        let mut diffused = input * INPUT_GAIN;
        for allpass in &mut self.allpasses {
            diffused = allpass.process(diffused);
        }

        self.combs
            .iter_mut()
            .map(|comb| comb.process(diffused))
            .sum()
    }

    pub fn reset(&mut self) {
        for allpass in &mut self.allpasses {
            allpass.reset();
        }
        for comb in &mut self.combs {
            comb.reset();
        }
    }
}

impl Default for JcReverb {
    fn default() -> Self {
        Self::new()
    }
}
