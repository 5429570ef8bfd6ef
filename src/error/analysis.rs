// Analysis error types and constants

use crate::error::{ErrorCode, WindowError};
use log::error;
use std::fmt;

/// Analysis error code constants
///
/// Error code range: 3001-3005
pub struct AnalysisErrorCodes {}

impl AnalysisErrorCodes {
    /// No samples to analyze
    pub const EMPTY_SIGNAL: i32 = 3001;

    /// Sample contains NaN or infinity
    pub const NON_FINITE_SAMPLE: i32 = 3002;

    /// Sample frequency is not a finite positive number
    pub const INVALID_SAMPLE_FREQUENCY: i32 = 3003;

    /// Spectrum sequences differ in length
    pub const SPECTRUM_LENGTH_MISMATCH: i32 = 3004;

    /// Window generation failed while windowing the segment
    pub const WINDOW: i32 = 3005;
}

/// Log an analysis error with structured context
pub fn log_analysis_error(err: &AnalysisError, context: &str) {
    error!(
        "Analysis error in {}: code={}, component=SpectrumAnalyzer, message={}",
        context,
        err.code(),
        err.message()
    );
}

/// Analysis-related errors
///
/// Error code ranges: 3001-3005
#[derive(Debug, Clone, PartialEq)]
pub enum AnalysisError {
    /// No samples to analyze
    EmptySignal,

    /// Sample at `index` is NaN or infinite
    NonFiniteSample { index: usize },

    /// Sample frequency must be finite and positive
    InvalidSampleFrequency { frequency: f64 },

    /// Frequencies, magnitude and power must have identical length
    SpectrumLengthMismatch {
        frequencies: usize,
        magnitude: usize,
        power: usize,
    },

    /// Window generation or application failed
    Window(WindowError),
}

impl ErrorCode for AnalysisError {
    fn code(&self) -> i32 {
        match self {
            AnalysisError::EmptySignal => AnalysisErrorCodes::EMPTY_SIGNAL,
            AnalysisError::NonFiniteSample { .. } => AnalysisErrorCodes::NON_FINITE_SAMPLE,
            AnalysisError::InvalidSampleFrequency { .. } => {
                AnalysisErrorCodes::INVALID_SAMPLE_FREQUENCY
            }
            AnalysisError::SpectrumLengthMismatch { .. } => {
                AnalysisErrorCodes::SPECTRUM_LENGTH_MISMATCH
            }
            AnalysisError::Window(_) => AnalysisErrorCodes::WINDOW,
        }
    }

    fn message(&self) -> String {
        match self {
            AnalysisError::EmptySignal => "Signal contains no samples".to_string(),
            AnalysisError::NonFiniteSample { index } => {
                format!("Sample {} is NaN or infinite", index)
            }
            AnalysisError::InvalidSampleFrequency { frequency } => {
                format!(
                    "Sample frequency must be finite and positive (got {})",
                    frequency
                )
            }
            AnalysisError::SpectrumLengthMismatch {
                frequencies,
                magnitude,
                power,
            } => format!(
                "Spectrum sequences differ in length: frequencies={}, magnitude={}, power={}",
                frequencies, magnitude, power
            ),
            AnalysisError::Window(err) => format!("Windowing failed: {}", err.message()),
        }
    }
}

impl fmt::Display for AnalysisError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "AnalysisError::{:?} (code {}): {}",
            self,
            self.code(),
            self.message()
        )
    }
}

impl std::error::Error for AnalysisError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AnalysisError::Window(err) => Some(err),
            _ => None,
        }
    }
}

impl From<WindowError> for AnalysisError {
    fn from(err: WindowError) -> Self {
        AnalysisError::Window(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_analysis_error_codes() {
        assert_eq!(
            AnalysisError::EmptySignal.code(),
            AnalysisErrorCodes::EMPTY_SIGNAL
        );
        assert_eq!(
            AnalysisError::NonFiniteSample { index: 3 }.code(),
            AnalysisErrorCodes::NON_FINITE_SAMPLE
        );
        assert_eq!(
            AnalysisError::InvalidSampleFrequency { frequency: 0.0 }.code(),
            AnalysisErrorCodes::INVALID_SAMPLE_FREQUENCY
        );
        assert_eq!(
            AnalysisError::SpectrumLengthMismatch {
                frequencies: 3,
                magnitude: 2,
                power: 3
            }
            .code(),
            AnalysisErrorCodes::SPECTRUM_LENGTH_MISMATCH
        );
    }

    #[test]
    fn test_from_window_error() {
        let err: AnalysisError = WindowError::InvalidSize { size: 0 }.into();
        assert_eq!(err.code(), AnalysisErrorCodes::WINDOW);
        assert!(err.message().contains("at least 1"));
        assert!(std::error::Error::source(&err).is_some());
    }
}
