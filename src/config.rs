//! Configuration management for windowing and export defaults
//!
//! This module provides runtime configuration loading from JSON files, so the
//! default window and the export culture/labels can be changed without
//! recompilation. Settings are passed explicitly into the analysis and export
//! calls; nothing here is process-wide state.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::persistence::ExportSettings;
use crate::window::{WindowKind, WindowSpec};

/// Complete application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub window: WindowConfig,
    pub export: ExportSettings,
}

/// Default window applied before the spectrum is computed
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    /// Window kind; `None` analyzes the raw segment
    pub kind: Option<WindowKind>,
    /// Normalize coefficients to unit mean gain
    pub normalize: bool,
    /// Shape parameter for parametric kinds (documented default if omitted)
    pub parameter: Option<f64>,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            kind: Some(WindowKind::Hanning),
            normalize: true,
            parameter: None,
        }
    }
}

impl WindowConfig {
    /// Window request for a segment of `size` samples
    pub fn to_spec(&self, size: usize) -> Option<WindowSpec> {
        self.kind.map(|kind| WindowSpec {
            kind,
            size,
            normalize: self.normalize,
            parameter: self.parameter,
        })
    }
}

impl AppConfig {
    /// Load configuration from JSON file
    ///
    /// # Arguments
    /// * `path` - Path to JSON config file
    ///
    /// # Returns
    /// The parsed configuration, or the defaults if the file is missing or
    /// its JSON is invalid
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Self {
        match fs::read_to_string(&path) {
            Ok(contents) => match serde_json::from_str(&contents) {
                Ok(config) => {
                    log::info!("[Config] Loaded configuration from {:?}", path.as_ref());
                    config
                }
                Err(err) => {
                    log::warn!(
                        "[Config] Failed to parse JSON from {:?}: {}. Using defaults.",
                        path.as_ref(),
                        err
                    );
                    Self::default()
                }
            },
            Err(err) => {
                log::warn!(
                    "[Config] Failed to read config file {:?}: {}. Using defaults.",
                    path.as_ref(),
                    err
                );
                Self::default()
            }
        }
    }

    /// Load configuration from the default location
    pub fn load() -> Self {
        Self::load_from_file("assets/spectral_config.json")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.window.kind, Some(WindowKind::Hanning));
        assert!(config.window.normalize);
        assert_eq!(config.export.culture, "en-US");
        assert_eq!(config.export.decimal_separator, '.');
    }

    #[test]
    fn test_json_roundtrip() {
        let config = AppConfig::default();
        let json = serde_json::to_string_pretty(&config).unwrap();
        let parsed: AppConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let parsed: AppConfig = serde_json::from_str(
            r#"{"window": {"kind": "tukey", "parameter": 0.25},
                "export": {"culture": "de-DE", "decimal_separator": ",",
                           "labels": {"time": "Zeit"}}}"#,
        )
        .unwrap();

        let spec = parsed.window.to_spec(128).unwrap();
        assert_eq!(spec.kind, WindowKind::Tukey);
        assert_eq!(spec.size, 128);
        assert_eq!(spec.parameter, Some(0.25));
        assert!(spec.normalize);
        assert_eq!(parsed.export.labels.time, "Zeit");
        assert_eq!(parsed.export.labels.power, "Power");
    }

    #[test]
    fn test_culture_without_separator_uses_culture_separator() {
        let parsed: AppConfig = serde_json::from_str(r#"{"export": {"culture": "de-DE"}}"#).unwrap();
        assert_eq!(parsed.export.culture, "de-DE");
        assert_eq!(parsed.export.decimal_separator, ',');
        assert_eq!(parsed.export, ExportSettings::for_culture("de-DE"));
    }

    #[test]
    fn test_null_kind_disables_windowing() {
        let parsed: AppConfig = serde_json::from_str(r#"{"window": {"kind": null}}"#).unwrap();
        assert_eq!(parsed.window.to_spec(64), None);
    }

    #[test]
    fn test_missing_file_falls_back_to_defaults() {
        let config = AppConfig::load_from_file("/nonexistent/spectral_config.json");
        assert_eq!(config, AppConfig::default());
    }
}
