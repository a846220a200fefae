use std::f64::consts::TAU;

/// Length of the built-in sine table.
pub const DEFAULT_TABLE_SIZE: usize = 4096;

/// One cycle of a sine wave, `len` points, starting at phase 0.
pub fn sine_table(len: usize) -> Vec<f32> {
    (0..len)
        .map(|i| (TAU * i as f64 / len as f64).sin() as f32)
        .collect()
}

/// Read a single-cycle table at `phase` (cycles, wrapped into `[0, 1)`),
/// linearly interpolating between neighbouring points.
///
/// Never indexes past `table.len()`; an empty table reads as silence.
#[inline]
pub fn lookup(table: &[f32], phase: f64) -> f32 {
    let len = table.len();
    if len == 0 {
        return 0.0;
    }

    let position = wrap_phase(phase) * len as f64;
    let index = (position as usize).min(len - 1);
    let frac = (position - index as f64) as f32;
    let next = if index + 1 == len { 0 } else { index + 1 };

    let a = table[index];
    let b = table[next];
    a + (b - a) * frac
}

/// Wrap any finite phase into `[0, 1)`. Non-finite phases collapse to 0.
#[inline]
pub fn wrap_phase(phase: f64) -> f64 {
    if !phase.is_finite() {
        return 0.0;
    }
    let wrapped = phase - phase.floor();
    // `x - floor(x)` can round up to exactly 1.0 for tiny negative x.
    if wrapped >= 1.0 {
        0.0
    } else {
        wrapped
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn sine_table_has_expected_points() {
        let table = sine_table(4);
        assert_abs_diff_eq!(table[0], 0.0, epsilon = 1e-7);
        assert_abs_diff_eq!(table[1], 1.0, epsilon = 1e-7);
        assert_abs_diff_eq!(table[2], 0.0, epsilon = 1e-7);
        assert_abs_diff_eq!(table[3], -1.0, epsilon = 1e-7);
    }

    #[test]
    fn lookup_interpolates_and_wraps() {
        let table = [0.0f32, 1.0, 0.0, -1.0];
        assert_abs_diff_eq!(lookup(&table, 0.125), 0.5, epsilon = 1e-6);
        // Between the last point and the first.
        assert_abs_diff_eq!(lookup(&table, 0.875), -0.5, epsilon = 1e-6);
        assert_abs_diff_eq!(lookup(&table, 1.25), 1.0, epsilon = 1e-6);
        assert_abs_diff_eq!(lookup(&table, -0.75), 1.0, epsilon = 1e-6);
    }

    #[test]
    fn lookup_tolerates_degenerate_input() {
        assert_eq!(lookup(&[], 0.3), 0.0);
        assert_eq!(lookup(&[0.4], 0.9), 0.4);
        assert_eq!(lookup(&[0.0, 1.0], f64::NAN), 0.0);
    }

    #[test]
    fn wrap_phase_stays_in_unit_interval() {
        for phase in [-3.5, -1e-18, 0.0, 0.999_999, 1.0, 42.25] {
            let w = wrap_phase(phase);
            assert!((0.0..1.0).contains(&w), "{phase} wrapped to {w}");
        }
    }
}
