/*
Parameter Ramping
=================

Jumping a gain from 0.2 to 0.9 between two samples produces a click. A ramp
spreads the change over a fixed number of samples instead:

    value
      0.9 ┤          ╭──────────
          │        ╱
          │      ╱
          │    ╱
      0.2 ┼──╯
          └──┬───────┬──────────→ samples
           retarget  remaining == 0 (snap to target)

The step is computed once when the target changes:

    step = (target - current) / duration_samples

and every sample adds one step. Float accumulation never lands exactly on
the target, so the final tick assigns `target` outright. Intermediate values
are clamped to the segment between the start and the target, which keeps
the value inside the parameter range even with rounding.

A retarget while a ramp is in flight starts a new ramp from wherever the
value currently is.
*/

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParameterRamp {
    current: f32,
    target: f32,
    step: f32,
    remaining: u32,
    lo: f32,
    hi: f32,
}

impl ParameterRamp {
    pub fn new(value: f32) -> Self {
        Self {
            current: value,
            target: value,
            step: 0.0,
            remaining: 0,
            lo: value,
            hi: value,
        }
    }

    pub fn current(&self) -> f32 {
        self.current
    }

    pub fn target(&self) -> f32 {
        self.target
    }

    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    pub fn is_ramping(&self) -> bool {
        self.remaining > 0
    }

    /// Head toward `target` over `duration_samples`.
    ///
    /// Seeing the same target again is a no-op, so the audio thread can call
    /// this every block with whatever the store holds.
    pub fn retarget(&mut self, target: f32, duration_samples: u32) {
        if target.to_bits() == self.target.to_bits() {
            return;
        }
        self.target = target;

        if duration_samples == 0 || target == self.current {
            self.snap();
            return;
        }

        self.step = (target - self.current) / duration_samples as f32;
        self.remaining = duration_samples;
        self.lo = self.current.min(target);
        self.hi = self.current.max(target);
    }

    /// Advance one sample and return the new value.
    #[inline]
    pub fn tick(&mut self) -> f32 {
        if self.remaining > 0 {
            self.remaining -= 1;
            self.current = if self.remaining == 0 {
                self.target
            } else {
                (self.current + self.step).clamp(self.lo, self.hi)
            };
        }
        self.current
    }

    /// Finish immediately.
    pub fn snap(&mut self) {
        self.current = self.target;
        self.step = 0.0;
        self.remaining = 0;
        self.lo = self.target;
        self.hi = self.target;
    }

    /// Jump to `value` with no ramp (initialization).
    pub fn jump_to(&mut self, value: f32) {
        self.target = value;
        self.snap();
    }
}
