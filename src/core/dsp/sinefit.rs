//! Fixed-frequency least-squares sine fitting
//!
//! Used by the clipping repair to reconstruct flattened sections from the
//! unclipped samples around them. With the frequency known, the fit
//! `a·sin(ωt) + b·cos(ωt) + c` is linear and solves through the 3×3 normal
//! equations.

use nalgebra::{Matrix3, Vector3};
use std::f64::consts::PI;

/// A fitted sine wave `amplitude·sin(2πf·t + phase) + offset`
#[derive(Debug, Clone, Copy)]
pub struct SineWave {
    pub amplitude: f64,
    /// Phase angle in radians
    pub phase: f64,
    pub offset: f64,
    pub frequency: f64,
}

impl SineWave {
    /// Evaluate the fitted wave at time `t` (seconds).
    pub fn evaluate(&self, t: f64) -> f64 {
        self.amplitude * (2.0 * PI * self.frequency * t + self.phase).sin() + self.offset
    }
}

/// Least-squares fit of a sine at a fixed `frequency` (Hz) through the
/// `(times[i], values[i])` pairs, times in seconds.
///
/// A singular system (too few or degenerate points) yields the flat zero
/// wave rather than an error; the repair loop treats that like any other
/// fit.
pub fn sine_fit(values: &[f64], times: &[f64], frequency: f64) -> SineWave {
    let omega = 2.0 * PI * frequency;

    let mut s_ss = 0.0;
    let mut s_sc = 0.0;
    let mut s_s1 = 0.0;
    let mut s_cc = 0.0;
    let mut s_c1 = 0.0;
    let mut s_11 = 0.0;
    let mut r_s = 0.0;
    let mut r_c = 0.0;
    let mut r_1 = 0.0;

    for (&value, &t) in values.iter().zip(times) {
        let sin = (omega * t).sin();
        let cos = (omega * t).cos();

        s_ss += sin * sin;
        s_sc += sin * cos;
        s_s1 += sin;
        s_cc += cos * cos;
        s_c1 += cos;
        s_11 += 1.0;

        r_s += value * sin;
        r_c += value * cos;
        r_1 += value;
    }

    let normal = Matrix3::new(
        s_ss, s_sc, s_s1, //
        s_sc, s_cc, s_c1, //
        s_s1, s_c1, s_11,
    );
    let rhs = Vector3::new(r_s, r_c, r_1);

    let solution = normal.lu().solve(&rhs).unwrap_or_else(Vector3::zeros);
    let (a, b, c) = (solution[0], solution[1], solution[2]);

    SineWave {
        amplitude: a.hypot(b),
        phase: b.atan2(a),
        offset: c,
        frequency,
    }
}
