//! Single-sided DFT spectrum of one analysis window
//!
//! The transform applies no 1/N normalization of its own; per-cycle
//! analytics divide the window by its length before calling in, which puts
//! a bin-aligned sinusoid of amplitude A at magnitude ≈ A after the
//! one-sided scaling below.

use rustfft::{num_complex::Complex, FftPlanner};

/// Magnitude/phase/frequency triplet covering the non-negative bins
#[derive(Debug, Clone, Default)]
pub struct Spectrum {
    /// Bin frequencies in Hz, non-decreasing, starting at DC
    pub frequency: Vec<f64>,
    pub magnitude: Vec<f64>,
    /// Bin phase angles in radians
    pub phase: Vec<f64>,
}

impl Spectrum {
    /// Forward DFT of a real window sampled at `sample_rate` Hz.
    ///
    /// Every bin is doubled for the one-sided convention, then the DC and
    /// Nyquist bins are halved back and the negative-frequency half is
    /// dropped. An empty window yields an empty spectrum.
    pub fn transform(sample_rate: f64, samples: &[f64]) -> Self {
        if samples.is_empty() {
            return Self::default();
        }

        let n = samples.len();
        let mut bins: Vec<Complex<f64>> =
            samples.iter().map(|&s| Complex::new(s, 0.0)).collect();

        FftPlanner::new().plan_fft_forward(n).process(&mut bins);

        let frequency = frequency_scale(n, sample_rate);
        let nyquist = n / 2;

        for bin in &mut bins {
            *bin *= 2.0;
        }
        bins[0] /= 2.0;
        bins[nyquist] /= 2.0;

        let mut spectrum = Self::default();
        for (freq, bin) in frequency.into_iter().zip(bins) {
            if freq >= 0.0 {
                spectrum.frequency.push(freq);
                spectrum.magnitude.push(bin.norm());
                spectrum.phase.push(bin.arg());
            }
        }

        spectrum
    }

    pub fn len(&self) -> usize {
        self.frequency.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frequency.is_empty()
    }
}

/// Standard FFT frequency layout: `i·fs/n` up to the Nyquist index, the
/// negative mirror above it.
fn frequency_scale(n: usize, sample_rate: f64) -> Vec<f64> {
    let df = sample_rate / n as f64;
    (0..n)
        .map(|i| {
            if i <= n / 2 {
                i as f64 * df
            } else {
                (i as f64 - n as f64) * df
            }
        })
        .collect()
}
