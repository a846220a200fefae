/// Circular delay line with fractional, linearly interpolated reads.
///
/// The buffer length is rounded up to a power of two so the read/write
/// positions wrap with a mask. Allocation only happens in `new`.
pub struct DelayLine {
    buffer: Vec<f32>,
    mask: usize,
    write_pos: usize,
}

impl DelayLine {
    /// A line able to delay by at least `max_delay_samples`.
    pub fn new(max_delay_samples: usize) -> Self {
        let len = (max_delay_samples + 2).next_power_of_two();
        Self {
            buffer: vec![0.0; len],
            mask: len - 1,
            write_pos: 0,
        }
    }

    /// Longest delay `read` can honour.
    pub fn max_delay(&self) -> usize {
        self.buffer.len() - 2
    }

    /// Push a new sample. After this, `read(0.0)` returns `sample`.
    #[inline]
    pub fn write(&mut self, sample: f32) {
        self.write_pos = (self.write_pos + 1) & self.mask;
        self.buffer[self.write_pos] = sample;
    }

    /// Sample from `delay` samples ago (fractional). Delays are clamped to
    /// `0..=max_delay()`.
    #[inline]
    pub fn read(&self, delay: f32) -> f32 {
        let delay = if delay.is_finite() {
            delay.clamp(0.0, self.max_delay() as f32)
        } else {
            0.0
        };
        let whole = delay as usize;
        let frac = delay - whole as f32;

        let a = self.buffer[self.write_pos.wrapping_sub(whole) & self.mask];
        let b = self.buffer[self.write_pos.wrapping_sub(whole + 1) & self.mask];
        a + (b - a) * frac
    }

    pub fn reset(&mut self) {
        self.buffer.fill(0.0);
        self.write_pos = 0;
    }
}
