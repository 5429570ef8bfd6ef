// Analysis - fills the Results aggregate for one signal segment
//
// Module organization:
// - results: Results aggregate (statistics, descriptors, spectrum)
// - fft: One-sided spectrum via rustfft
// - mod.rs: Coordinator (SignalAnalyzer)
//
// Pipeline:
// 1. Validate samples and sample frequency
// 2. Compute statistics on the raw samples
// 3. Build the window for exactly the segment length and multiply it in
// 4. Compute the spectrum of the windowed segment

mod fft;
mod results;


pub use fft::FftProcessor;
pub use results::{Descriptors, Results, Spectrum, Statistics};

use crate::error::AnalysisError;
use crate::window::{self, WindowSpec};

/// SignalAnalyzer coordinates windowing and spectrum computation
///
/// The analyzer holds no per-run state; one instance can serve many
/// segments, including from several threads.
#[derive(Default)]
pub struct SignalAnalyzer {
    fft_processor: FftProcessor,
}

impl SignalAnalyzer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Analyze one segment
    ///
    /// # Arguments
    /// * `samples` - Raw time-domain samples
    /// * `sample_frequency` - Sampling frequency in Hz
    /// * `window` - Optional window request; its size is replaced by the
    ///   segment length so coefficients always match the data
    ///
    /// # Returns
    /// Results with default (zero) descriptors; attach externally computed
    /// descriptors with [`Results::with_descriptors`].
    pub fn analyze(
        &self,
        samples: &[f64],
        sample_frequency: f64,
        window: Option<&WindowSpec>,
    ) -> Result<Results, AnalysisError> {
        validate(samples, sample_frequency)?;

        let statistics = Statistics::from_samples(samples)?;

        let spectrum = match window {
            Some(spec) => {
                let spec = spec.with_size(samples.len());
                let coefficients = window::create(&spec)?;
                let windowed = window::apply_window(samples, &coefficients)?;
                tracing::debug!(
                    kind = %spec.kind,
                    size = spec.size,
                    normalize = spec.normalize,
                    "[SignalAnalyzer] Applied window"
                );
                self.fft_processor
                    .compute_spectrum(&windowed, sample_frequency)?
            }
            None => self.fft_processor.compute_spectrum(samples, sample_frequency)?,
        };

        tracing::info!(
            samples = samples.len(),
            sample_frequency,
            bins = spectrum.len(),
            average = statistics.average,
            "[SignalAnalyzer] Analysis complete"
        );

        Ok(Results::new(
            samples.len(),
            sample_frequency,
            statistics,
            spectrum,
        ))
    }
}

/// Analyze one segment with a fresh analyzer
///
/// See [`SignalAnalyzer::analyze`].
pub fn analyze(
    samples: &[f64],
    sample_frequency: f64,
    window: Option<&WindowSpec>,
) -> Result<Results, AnalysisError> {
    SignalAnalyzer::new().analyze(samples, sample_frequency, window)
}

fn validate(samples: &[f64], sample_frequency: f64) -> Result<(), AnalysisError> {
    if samples.is_empty() {
        return Err(AnalysisError::EmptySignal);
    }
    if !(sample_frequency.is_finite() && sample_frequency > 0.0) {
        return Err(AnalysisError::InvalidSampleFrequency {
            frequency: sample_frequency,
        });
    }
    if let Some(index) = samples.iter().position(|s| !s.is_finite()) {
        return Err(AnalysisError::NonFiniteSample { index });
    }
    Ok(())
}
