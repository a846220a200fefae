/// Peak envelope follower: rectify, then smooth with separate attack and
/// release time constants.
///
/// ```text
/// level += (|x| - level) · (1 - coeff)     coeff = e^(-1 / (time · sample_rate))
/// ```
///
/// The attack coefficient applies while the input rises above the current
/// level, the release coefficient while it falls below.
pub struct EnvelopeFollower {
    level: f32,
    attack_coeff: f32,
    release_coeff: f32,
}

impl EnvelopeFollower {
    pub fn new(sample_rate: f32, attack_seconds: f32, release_seconds: f32) -> Self {
        Self {
            level: 0.0,
            attack_coeff: time_to_coeff(attack_seconds, sample_rate),
            release_coeff: time_to_coeff(release_seconds, sample_rate),
        }
    }

    #[inline]
    pub fn process(&mut self, sample: f32) -> f32 {
        let rectified = sample.abs();
        let coeff = if rectified > self.level {
            self.attack_coeff
        } else {
            self.release_coeff
        };
        self.level = rectified + coeff * (self.level - rectified);
        self.level
    }

    pub fn level(&self) -> f32 {
        self.level
    }

    pub fn reset(&mut self) {
        self.level = 0.0;
    }
}

fn time_to_coeff(seconds: f32, sample_rate: f32) -> f32 {
    let samples = seconds * sample_rate;
    if samples <= 1.0 {
        0.0
    } else {
        (-1.0 / samples).exp()
    }
}
