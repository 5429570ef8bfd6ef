//! Export of analyzed series and results to disk
//!
//! Four layouts are supported: a labelled text file with timestamped rows, the
//! compact "sig" text layout, a little-endian binary layout mirroring the text
//! header, and a results file holding the summary plus the spectrum table.
//!
//! Every culture- or label-dependent choice comes from an explicit
//! [`ExportSettings`] value. The `save_*` functions never fail: I/O problems
//! are logged and reported through [`SaveOutcome`] so that a failed export
//! cannot abort the analysis that produced the data.

mod binary;
mod text;


pub use binary::{to_oa_date, write_binary};
pub use text::{write_results, write_sig, write_text};

use std::collections::HashMap;
use std::fs::File;
use std::fmt::Write as _;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use chrono::{Duration, NaiveDateTime};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::analysis::Results;
use crate::error::{log_persistence_error, ErrorCode, PersistenceError};

/// Languages whose cultures use a comma as decimal separator
static COMMA_DECIMAL_LANGUAGES: Lazy<HashMap<&'static str, char>> = Lazy::new(|| {
    [
        "bg", "cs", "da", "de", "el", "es", "fi", "fr", "hr", "hu", "id", "it", "nb", "nl", "pl",
        "pt", "ro", "ru", "sk", "sl", "sr", "sv", "tr", "uk", "vi",
    ]
    .into_iter()
    .map(|language| (language, ','))
    .collect()
});

/// Every label written into exported files
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeaderLabels {
    pub file_header: String,
    pub start_time: String,
    pub end_time: String,
    pub total_time: String,
    pub days: String,
    pub hours: String,
    pub minutes: String,
    pub seconds: String,
    pub and: String,
    pub milliseconds: String,
    pub series_count: String,
    pub sample_count: String,
    pub sample_frequency: String,
    pub average: String,
    pub maximum: String,
    pub minimum: String,
    pub fractal_dimension: String,
    pub fractal_variance: String,
    pub approximate_entropy: String,
    pub sample_entropy: String,
    pub shannon_entropy: String,
    pub entropy_bit: String,
    pub ideal_entropy: String,
    pub time: String,
    pub frequency: String,
    pub magnitude: String,
    pub power: String,
}

impl Default for HeaderLabels {
    fn default() -> Self {
        Self {
            file_header: "SignalAnalysis data".to_string(),
            start_time: "Start time".to_string(),
            end_time: "End time".to_string(),
            total_time: "Total measuring time".to_string(),
            days: "days".to_string(),
            hours: "hours".to_string(),
            minutes: "minutes".to_string(),
            seconds: "seconds".to_string(),
            and: "and".to_string(),
            milliseconds: "milliseconds".to_string(),
            series_count: "Number of series".to_string(),
            sample_count: "Number of data points".to_string(),
            sample_frequency: "Sampling frequency".to_string(),
            average: "Average value".to_string(),
            maximum: "Maximum value".to_string(),
            minimum: "Minimum value".to_string(),
            fractal_dimension: "Fractal dimension".to_string(),
            fractal_variance: "Fractal variance".to_string(),
            approximate_entropy: "Approximate entropy".to_string(),
            sample_entropy: "Sample entropy".to_string(),
            shannon_entropy: "Shannon entropy".to_string(),
            entropy_bit: "Entropy bit".to_string(),
            ideal_entropy: "Ideal entropy".to_string(),
            time: "Time".to_string(),
            frequency: "Frequency (Hz)".to_string(),
            magnitude: "Magnitude".to_string(),
            power: "Power".to_string(),
        }
    }
}

/// Culture and formatting choices for every writer
///
/// Deserialization starts from [`ExportSettings::for_culture`], so fields left
/// out of a config follow the configured culture rather than `en-US`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "ExportSettingsFile")]
pub struct ExportSettings {
    /// Culture tag written into every file header, e.g. `en-US`
    pub culture: String,
    pub decimal_separator: char,
    /// chrono strftime pattern; milliseconds should be included
    pub datetime_format: String,
    /// Fixed number of decimals for sample values; `None` writes the
    /// shortest round-trip representation
    pub data_precision: Option<usize>,
    pub labels: HeaderLabels,
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self::for_culture(DEFAULT_CULTURE)
    }
}

const DEFAULT_CULTURE: &str = "en-US";

/// On-disk shape of [`ExportSettings`]; every field is optional
#[derive(Deserialize)]
struct ExportSettingsFile {
    culture: Option<String>,
    decimal_separator: Option<char>,
    datetime_format: Option<String>,
    data_precision: Option<usize>,
    #[serde(default)]
    labels: HeaderLabels,
}

impl From<ExportSettingsFile> for ExportSettings {
    fn from(file: ExportSettingsFile) -> Self {
        let mut settings =
            ExportSettings::for_culture(file.culture.as_deref().unwrap_or(DEFAULT_CULTURE));
        if let Some(separator) = file.decimal_separator {
            settings.decimal_separator = separator;
        }
        if let Some(format) = file.datetime_format {
            settings.datetime_format = format;
        }
        settings.data_precision = file.data_precision;
        settings.labels = file.labels;
        settings
    }
}

impl ExportSettings {
    /// Settings for `culture`, choosing the decimal separator by language
    pub fn for_culture(culture: &str) -> Self {
        let language = culture
            .split(['-', '_'])
            .next()
            .unwrap_or_default()
            .to_lowercase();
        let decimal_separator = COMMA_DECIMAL_LANGUAGES
            .get(language.as_str())
            .copied()
            .unwrap_or('.');

        Self {
            culture: culture.to_string(),
            decimal_separator,
            datetime_format: "%Y-%m-%d %H:%M:%S%.3f".to_string(),
            data_precision: None,
            labels: HeaderLabels::default(),
        }
    }

    /// Format a value with this culture's decimal separator
    pub fn format_number(&self, value: f64) -> String {
        self.localize(value.to_string())
    }

    /// Format a value with exactly `decimals` fractional digits
    pub fn format_fixed(&self, value: f64, decimals: usize) -> String {
        self.localize(format!("{:.*}", decimals, value))
    }

    /// Format a sample value honouring `data_precision`
    pub fn format_data(&self, value: f64) -> String {
        match self.data_precision {
            Some(decimals) => self.format_fixed(value, decimals),
            None => self.format_number(value),
        }
    }

    /// Format a timestamp with `datetime_format`
    ///
    /// An invalid pattern is reported as `InvalidInput` instead of panicking.
    pub fn format_timestamp(&self, timestamp: NaiveDateTime) -> io::Result<String> {
        let mut formatted = String::new();
        write!(formatted, "{}", timestamp.format(&self.datetime_format)).map_err(|_| {
            io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("invalid datetime format {:?}", self.datetime_format),
            )
        })?;
        Ok(formatted)
    }

    /// The first line of every text file: `<header> (<culture>)`
    pub fn culture_line(&self) -> String {
        format!("{} ({})", self.labels.file_header, self.culture)
    }

    fn localize(&self, formatted: String) -> String {
        if self.decimal_separator == '.' {
            formatted
        } else {
            formatted.replace('.', &self.decimal_separator.to_string())
        }
    }
}

/// Elapsed time between the first and last sample
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Elapsed {
    pub days: i32,
    pub hours: i32,
    pub minutes: i32,
    pub seconds: i32,
    pub milliseconds: i32,
}

impl Elapsed {
    fn from_duration(duration: Duration) -> io::Result<Self> {
        let total_ms = duration.num_milliseconds().max(0);
        let days = i32::try_from(total_ms / 86_400_000)
            .map_err(|_| invalid_timing(format!("{} ms does not fit the days field", total_ms)))?;
        Ok(Self {
            days,
            hours: (total_ms / 3_600_000 % 24) as i32,
            minutes: (total_ms / 60_000 % 60) as i32,
            seconds: (total_ms / 1_000 % 60) as i32,
            milliseconds: (total_ms % 1_000) as i32,
        })
    }
}

/// One series to export, with the timing needed to stamp each sample
#[derive(Debug, Clone, Copy)]
pub struct SeriesExport<'a> {
    pub series_name: &'a str,
    pub data: &'a [f64],
    /// Acquisition time of the first sample of the full recording
    pub start: NaiveDateTime,
    pub sample_frequency: f64,
    /// Index of `data[0]` within the full recording
    pub index_offset: usize,
}

impl<'a> SeriesExport<'a> {
    pub fn new(
        series_name: &'a str,
        data: &'a [f64],
        start: NaiveDateTime,
        sample_frequency: f64,
    ) -> Self {
        Self {
            series_name,
            data,
            start,
            sample_frequency,
            index_offset: 0,
        }
    }

    pub fn with_index_offset(mut self, index_offset: usize) -> Self {
        self.index_offset = index_offset;
        self
    }

    /// `start + (index + index_offset) / sample_frequency`
    ///
    /// Fails with `InvalidInput` when the offset is not finite (zero or
    /// non-finite frequency) or leaves chrono's representable range.
    pub fn timestamp(&self, index: usize) -> io::Result<NaiveDateTime> {
        let offset = seconds((index + self.index_offset) as f64 / self.sample_frequency)?;
        self.start.checked_add_signed(offset).ok_or_else(|| {
            invalid_timing(format!(
                "timestamp of sample {} is out of range at {} Hz",
                index, self.sample_frequency
            ))
        })
    }

    pub fn start_time(&self) -> io::Result<NaiveDateTime> {
        self.timestamp(0)
    }

    pub fn end_time(&self) -> io::Result<NaiveDateTime> {
        self.timestamp(self.data.len().saturating_sub(1))
    }

    /// Span covered by the series, `(len - 1) / sample_frequency`
    pub fn elapsed(&self) -> io::Result<Elapsed> {
        let span = self.data.len().saturating_sub(1) as f64 / self.sample_frequency;
        Elapsed::from_duration(seconds(span)?)
    }
}

/// Largest offset accepted, about 100 000 years
const MAX_OFFSET_SECONDS: f64 = 3.2e12;

fn seconds(value: f64) -> io::Result<Duration> {
    if !(value.is_finite() && value.abs() <= MAX_OFFSET_SECONDS) {
        return Err(invalid_timing(format!(
            "time offset {} s is not representable",
            value
        )));
    }
    Ok(Duration::microseconds((value * 1e6).round() as i64))
}

fn invalid_timing(message: String) -> io::Error {
    io::Error::new(io::ErrorKind::InvalidInput, message)
}

/// Result of a save call: success flag plus a message for the user
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SaveOutcome {
    pub success: bool,
    pub message: String,
    /// Error code when the save failed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<i32>,
}

impl SaveOutcome {
    fn saved(path: &Path) -> Self {
        Self {
            success: true,
            message: format!("Saved {}", path.display()),
            code: None,
        }
    }

    fn failed(err: &PersistenceError) -> Self {
        Self {
            success: false,
            message: err.message(),
            code: Some(err.code()),
        }
    }
}

/// Series file layouts
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SaveFormat {
    #[default]
    Text,
    Sig,
    Binary,
}

impl SaveFormat {
    /// Pick the layout from a file extension, defaulting to text
    pub fn from_path(path: &Path) -> Self {
        match path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase)
            .as_deref()
        {
            Some("sig") => SaveFormat::Sig,
            Some("bin") => SaveFormat::Binary,
            _ => SaveFormat::Text,
        }
    }
}

/// Save a series in `format`
pub fn save_series(
    path: &Path,
    format: SaveFormat,
    results: &Results,
    series: &SeriesExport<'_>,
    settings: &ExportSettings,
) -> SaveOutcome {
    save_with(path, "save_series", |out| match format {
        SaveFormat::Text => write_text(out, results, series, settings),
        SaveFormat::Sig => write_sig(out, series, settings),
        SaveFormat::Binary => write_binary(out, results, series, settings),
    })
}

/// Save the results summary and spectrum table
pub fn save_results(path: &Path, results: &Results, settings: &ExportSettings) -> SaveOutcome {
    save_with(path, "save_results", |out| {
        write_results(out, results, settings)
    })
}

fn save_with(
    path: &Path,
    context: &str,
    write: impl FnOnce(&mut BufWriter<File>) -> io::Result<()>,
) -> SaveOutcome {
    let attempt = File::create(path).and_then(|file| {
        let mut out = BufWriter::new(file);
        write(&mut out)?;
        out.flush()
    });

    match attempt {
        Ok(()) => {
            log::info!("[Export] {} wrote {}", context, path.display());
            SaveOutcome::saved(path)
        }
        Err(err) => {
            let err = PersistenceError::from(err);
            log_persistence_error(&err, context);
            SaveOutcome::failed(&err)
        }
    }
}
