// FFT module - one-sided spectrum of a (windowed) real segment
//
// Magnitudes are scaled so a bin-centred sinusoid of amplitude A reads A
// (DC and Nyquist are not doubled). Power is magnitude squared.

use std::sync::Mutex;

use rustfft::{num_complex::Complex, FftPlanner};

use super::results::Spectrum;
use crate::error::AnalysisError;

/// FFT processor that computes one-sided spectra of arbitrary length
pub struct FftProcessor {
    fft_planner: Mutex<FftPlanner<f64>>,
}

impl FftProcessor {
    pub fn new() -> Self {
        Self {
            fft_planner: Mutex::new(FftPlanner::new()),
        }
    }

    /// Compute frequencies, magnitude and power for `segment`
    ///
    /// # Arguments
    /// * `segment` - Time-domain samples, already windowed if required
    /// * `sample_frequency` - Sampling frequency in Hz
    ///
    /// # Returns
    /// Spectrum with `segment.len() / 2 + 1` bins
    pub fn compute_spectrum(
        &self,
        segment: &[f64],
        sample_frequency: f64,
    ) -> Result<Spectrum, AnalysisError> {
        let n = segment.len();
        if n == 0 {
            return Err(AnalysisError::EmptySignal);
        }

        let mut buffer: Vec<Complex<f64>> =
            segment.iter().map(|&s| Complex::new(s, 0.0)).collect();

        let fft = {
            // The planner only caches plans, so a poisoned lock is still usable
            let mut planner = self
                .fft_planner
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner());
            planner.plan_fft_forward(n)
        };
        fft.process(&mut buffer);

        let bins = n / 2 + 1;
        let scale = 1.0 / n as f64;
        let frequencies: Vec<f64> = (0..bins)
            .map(|k| k as f64 * sample_frequency / n as f64)
            .collect();
        let magnitude: Vec<f64> = buffer[..bins]
            .iter()
            .enumerate()
            .map(|(k, c)| {
                let one_sided = k == 0 || (n % 2 == 0 && k == n / 2);
                let gain = if one_sided { scale } else { 2.0 * scale };
                c.norm() * gain
            })
            .collect();
        let power = magnitude.iter().map(|m| m * m).collect();

        Spectrum::new(frequencies, magnitude, power)
    }
}

impl Default for FftProcessor {
    fn default() -> Self {
        Self::new()
    }
}
