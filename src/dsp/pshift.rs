use crate::dsp::delay::DelayLine;

/*
Delay-Line Pitch Shifter
========================

Reading a delay line with a delay that changes over time shifts pitch: a
shrinking delay plays the past back faster (pitch up), a growing delay
slower (pitch down). To shift by `s` semitones the read head must move at

    rate = 2^(s/12)        samples of input per sample of output

so the delay changes by `1 - rate` every sample. The delay cannot grow or
shrink forever, so it wraps inside a window of `w` samples:

    d ← (d + 1 - 2^(s/12) + w) mod w

The wrap would click, so two taps half a window apart are crossfaded:

    out = line(d) · g + line(d + w) · (1 - g)      g = min(d / crossfade, 1)

When `d` is about to wrap to 0, `g` has fallen to 0 and the second tap is
the only one heard.

Latency
-------

With `s = 0` the rate is 1, `d` stays at 0, `g = 0`, and the output is the
input delayed by exactly `w` samples.
*/

/// Window plus crossfade can never exceed this many samples.
pub const MAX_WINDOW: usize = 10_000;

pub struct PitchShift {
    line: DelayLine,
    position: f32,
}

impl PitchShift {
    pub fn new() -> Self {
        Self {
            line: DelayLine::new(2 * MAX_WINDOW + 2),
            position: 0.0,
        }
    }

    /// `window` and `crossfade` are in samples; `shift` in semitones.
    #[inline]
    pub fn process(&mut self, sample: f32, shift: f32, window: f32, crossfade: f32) -> f32 {
        let window = window.clamp(1.0, MAX_WINDOW as f32);
        let step = 1.0 - (shift / 12.0).exp2();

        self.position = (self.position + step + window).rem_euclid(window);
        // rem_euclid can round up to exactly `window`
        if self.position >= window {
            self.position = 0.0;
        }

        self.line.write(sample);

        let d = self.position;
        let gain = if crossfade > 0.0 {
            (d / crossfade).min(1.0)
        } else {
            1.0
        };

        self.line.read(d) * gain + self.line.read(d + window) * (1.0 - gain)
    }

    pub fn reset(&mut self) {
        self.line.reset();
        self.position = 0.0;
    }
}

impl Default for PitchShift {
    fn default() -> Self {
        Self::new()
    }
}
