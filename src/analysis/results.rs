// Results aggregate - everything a full analysis run hands to persistence

use serde::{Deserialize, Serialize};

use crate::error::AnalysisError;

/// Scalar statistics of the raw (unwindowed) segment
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Statistics {
    pub average: f64,
    pub maximum: f64,
    pub minimum: f64,
}

impl Statistics {
    /// Compute average, maximum and minimum of `samples`
    pub fn from_samples(samples: &[f64]) -> Result<Self, AnalysisError> {
        if samples.is_empty() {
            return Err(AnalysisError::EmptySignal);
        }

        let (sum, maximum, minimum) = samples.iter().fold(
            (0.0, f64::NEG_INFINITY, f64::INFINITY),
            |(sum, max, min), &s| (sum + s, max.max(s), min.min(s)),
        );

        Ok(Self {
            average: sum / samples.len() as f64,
            maximum,
            minimum,
        })
    }
}

/// Nonlinear-dynamics descriptors
///
/// These are computed by collaborators outside this crate and carried
/// through to the exported files unchanged.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Descriptors {
    pub fractal_dimension: f64,
    pub fractal_variance: f64,
    pub approximate_entropy: f64,
    pub sample_entropy: f64,
    pub shannon_entropy: f64,
    pub entropy_bit: f64,
    pub ideal_entropy: f64,
}

/// One-sided spectrum: frequencies, magnitude and power of equal length
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Spectrum {
    frequencies: Vec<f64>,
    magnitude: Vec<f64>,
    power: Vec<f64>,
}

impl Spectrum {
    /// Build a spectrum, rejecting sequences of unequal length
    pub fn new(
        frequencies: Vec<f64>,
        magnitude: Vec<f64>,
        power: Vec<f64>,
    ) -> Result<Self, AnalysisError> {
        if frequencies.len() != magnitude.len() || frequencies.len() != power.len() {
            return Err(AnalysisError::SpectrumLengthMismatch {
                frequencies: frequencies.len(),
                magnitude: magnitude.len(),
                power: power.len(),
            });
        }

        Ok(Self {
            frequencies,
            magnitude,
            power,
        })
    }

    pub fn frequencies(&self) -> &[f64] {
        &self.frequencies
    }

    pub fn magnitude(&self) -> &[f64] {
        &self.magnitude
    }

    pub fn power(&self) -> &[f64] {
        &self.power
    }

    /// Number of frequency bins
    pub fn len(&self) -> usize {
        self.frequencies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frequencies.is_empty()
    }

    /// Iterate `(frequency, magnitude, power)` rows
    pub fn bins(&self) -> impl Iterator<Item = (f64, f64, f64)> + '_ {
        self.frequencies
            .iter()
            .zip(&self.magnitude)
            .zip(&self.power)
            .map(|((&f, &m), &p)| (f, m, p))
    }

    /// Frequency of the strongest non-DC bin, if any
    pub fn peak_frequency(&self) -> Option<f64> {
        self.bins()
            .skip(1)
            .max_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(f, _, _)| f)
    }
}

/// Statistics, descriptors and spectrum of one analyzed segment
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Results {
    pub sample_count: usize,
    pub sample_frequency: f64,
    pub statistics: Statistics,
    pub descriptors: Descriptors,
    pub spectrum: Spectrum,
}

impl Results {
    pub fn new(
        sample_count: usize,
        sample_frequency: f64,
        statistics: Statistics,
        spectrum: Spectrum,
    ) -> Self {
        Self {
            sample_count,
            sample_frequency,
            statistics,
            descriptors: Descriptors::default(),
            spectrum,
        }
    }

    /// Attach descriptors computed elsewhere
    pub fn with_descriptors(mut self, descriptors: Descriptors) -> Self {
        self.descriptors = descriptors;
        self
    }
}
