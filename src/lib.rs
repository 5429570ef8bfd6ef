// Spectral Prep - window functions and spectrum pre-processing
// Tapering windows, one-sided spectra, and export of analysis results

// Module declarations
pub mod analysis;
pub mod config;
pub mod error;
pub mod persistence;
pub mod window;

// Re-exports for convenience
pub use analysis::{analyze, Descriptors, Results, SignalAnalyzer, Spectrum, Statistics};
pub use config::{AppConfig, WindowConfig};
pub use error::{AnalysisError, ErrorCode, PersistenceError, WindowError};
pub use persistence::{save_results, save_series, ExportSettings, SaveFormat, SaveOutcome, SeriesExport};
pub use window::{create, describe, generate, WindowKind, WindowSpec};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_module_structure() {
        // The crate root re-exports cover a full window -> analysis round
        let spec = WindowSpec::new(WindowKind::Hanning, 8).normalized(true);
        let results = analyze(&[1.0; 8], 8.0, Some(&spec)).unwrap();
        assert_eq!(results.spectrum.len(), 5);
        assert_eq!(describe(WindowKind::Hanning).name, WindowKind::Hanning.name());
    }
}
