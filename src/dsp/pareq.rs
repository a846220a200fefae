use std::f64::consts::PI;

/*
Peaking Equalizer
=================

A second-order section that boosts or cuts a band around a center frequency
and leaves everything far from it untouched:

    gain
      v ┤        ╭─╮            v > 1  boost
        │       ╱   ╲
      1 ┼──────╯     ╰──────    v = 1  flat
        │
        └──────────┬──────────→ frequency
                   fc

Coefficients follow Zoelzer's peak filter, with K = tan(π·fc/sr):

    a0 = 1 + K/q + K²
    b0 = (1 + v·K/q + K²) / a0
    b1 = 2(K² - 1) / a0           (= a1)
    b2 = (1 - v·K/q + K²) / a0
    a2 = (1 - K/q + K²) / a0

At fc the numerator and denominator differ only in the K/q term, so the
response there is exactly `v`. With `v = 1` numerator and denominator are
identical and the filter is a wire.

Direct form I:

    y[n] = b0·x[n] + b1·x[n-1] + b2·x[n-2] - a1·y[n-1] - a2·y[n-2]
*/

const MIN_Q: f32 = 1e-3;

#[derive(Debug, Clone, Copy, PartialEq)]
struct Coefficients {
    b0: f32,
    b1: f32,
    b2: f32,
    a1: f32,
    a2: f32,
}

impl Coefficients {
    const IDENTITY: Self = Self {
        b0: 1.0,
        b1: 0.0,
        b2: 0.0,
        a1: 0.0,
        a2: 0.0,
    };

    fn peaking(center_hz: f32, gain: f32, q: f32, sample_rate: f32) -> Self {
        let nyquist = 0.49 * sample_rate as f64;
        let fc = (center_hz as f64).max(1.0).min(nyquist);
        let q = q.max(MIN_Q) as f64;
        let v = gain.max(0.0) as f64;

        let k = (PI * fc / sample_rate as f64).tan();
        let kk = k * k;
        let kq = k / q;
        let a0 = 1.0 + kq + kk;

        let b1 = 2.0 * (kk - 1.0) / a0;
        Self {
            b0: ((1.0 + v * kq + kk) / a0) as f32,
            b1: b1 as f32,
            b2: ((1.0 - v * kq + kk) / a0) as f32,
            a1: b1 as f32,
            a2: ((1.0 - kq + kk) / a0) as f32,
        }
    }
}

pub struct PeakingEq {
    sample_rate: f32,
    center_hz: f32,
    gain: f32,
    q: f32,
    coeffs: Coefficients,
    x1: f32,
    x2: f32,
    y1: f32,
    y2: f32,
}

impl PeakingEq {
    pub fn new(sample_rate: f32) -> Self {
        let mut eq = Self {
            sample_rate,
            center_hz: 1_000.0,
            gain: 1.0,
            q: std::f32::consts::FRAC_1_SQRT_2,
            coeffs: Coefficients::IDENTITY,
            x1: 0.0,
            x2: 0.0,
            y1: 0.0,
            y2: 0.0,
        };
        eq.coeffs = Coefficients::peaking(eq.center_hz, eq.gain, eq.q, sample_rate);
        eq
    }

    /// Recomputes coefficients only when one of the three controls moved.
    #[inline]
    pub fn set(&mut self, center_hz: f32, gain: f32, q: f32) {
        if center_hz != self.center_hz || gain != self.gain || q != self.q {
            self.center_hz = center_hz;
            self.gain = gain;
            self.q = q;
            self.coeffs = Coefficients::peaking(center_hz, gain, q, self.sample_rate);
        }
    }

    #[inline]
    pub fn process(&mut self, sample: f32) -> f32 {
        let c = self.coeffs;
        let y = c.b0 * sample + c.b1 * self.x1 + c.b2 * self.x2 - c.a1 * self.y1 - c.a2 * self.y2;

        self.x2 = self.x1;
        self.x1 = sample;
        self.y2 = self.y1;
        self.y1 = y;
        y
    }

    pub fn reset(&mut self) {
        self.x1 = 0.0;
        self.x2 = 0.0;
        self.y1 = 0.0;
        self.y2 = 0.0;
    }
}
