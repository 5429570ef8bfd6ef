// Window - tapering functions applied before spectral analysis
//
// A window function is multiplied element-wise against a time-domain segment
// before the FFT to reduce spectral leakage at the segment edges. Every kind
// shares one generation contract: produce `size` coefficients, optionally
// normalized so that different kinds have comparable gain.
//
// Module organization:
// - kinds: Closed-form coefficient formulas, one per WindowKind
// - normalize: Normalizer trait and the gain/power policies
// - mod.rs: Registry (names, descriptions, shape parameters) and the factory
//
// References:
// - Harris, F. J. (1978). On the use of windows for harmonic analysis with the
//   discrete Fourier transform
// - Heinzel, G., Rüdiger, A., Schilling, R. (2002). Spectrum and spectral
//   density estimation by the DFT

mod kinds;
mod normalize;


pub use kinds::generate;
pub use normalize::{MeanGain, Normalizer, UnitPower, DEGENERATE_DIVISOR_FLOOR};

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::thread;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::error::WindowError;

/// Supported window kinds
///
/// The set is closed; every kind owns a fixed display name and description.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WindowKind {
    Rectangular,
    Triangular,
    Welch,
    Hanning,
    Hamming,
    Blackman,
    BlackmanHarris,
    FlatTop,
    Cosine,
    Tukey,
    Kaiser,
}

/// Display metadata for a window kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct WindowInfo {
    pub name: &'static str,
    pub description: &'static str,
}

/// The single shape parameter of a parametric window
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ShapeParameter {
    pub name: &'static str,
    pub default: f64,
    pub min: f64,
    pub max: f64,
}

impl ShapeParameter {
    /// Check `value` against the documented range for `kind`
    fn validate(&self, kind: WindowKind, value: f64) -> Result<f64, WindowError> {
        if value.is_finite() && value >= self.min && value <= self.max {
            Ok(value)
        } else {
            Err(WindowError::ParameterOutOfRange {
                kind: kind.name(),
                parameter: self.name,
                value,
                min: self.min,
                max: self.max,
            })
        }
    }
}

const TUKEY_ALPHA: ShapeParameter = ShapeParameter {
    name: "alpha",
    default: 0.5,
    min: 0.0,
    max: 1.0,
};

const KAISER_BETA: ShapeParameter = ShapeParameter {
    name: "beta",
    default: 8.6,
    min: 0.0,
    max: 100.0,
};

const WELCH_EXPONENT: ShapeParameter = ShapeParameter {
    name: "exponent",
    default: 2.0,
    min: 0.5,
    max: 16.0,
};

const TRIANGULAR_EXTENSION: ShapeParameter = ShapeParameter {
    name: "extension",
    default: 0.0,
    min: 0.0,
    max: 2.0,
};

impl WindowKind {
    /// Every kind, in registry order
    pub const ALL: [WindowKind; 11] = [
        WindowKind::Rectangular,
        WindowKind::Triangular,
        WindowKind::Welch,
        WindowKind::Hanning,
        WindowKind::Hamming,
        WindowKind::Blackman,
        WindowKind::BlackmanHarris,
        WindowKind::FlatTop,
        WindowKind::Cosine,
        WindowKind::Tukey,
        WindowKind::Kaiser,
    ];

    pub fn name(self) -> &'static str {
        self.info().name
    }

    pub fn description(self) -> &'static str {
        self.info().description
    }

    /// Name and description of this kind
    pub fn info(self) -> WindowInfo {
        let (name, description) = match self {
            WindowKind::Rectangular => (
                "Rectangular",
                "The rectangular window leaves every sample unchanged. It has the narrowest \
                 main lobe and the worst spectral leakage, and should only be used when the \
                 segment already contains a whole number of periods.",
            ),
            WindowKind::Triangular => (
                "Triangular",
                "A linear ramp up to the centre and back down. With the default extension of \
                 zero it is the Bartlett window and reaches zero on both sides; larger \
                 extensions lift the end points off zero.",
            ),
            WindowKind::Welch => (
                "Welch",
                "A parabolic window that reaches zero on both sides. The exponent generalizes \
                 the parabola: higher values flatten the top and steepen the edges.",
            ),
            WindowKind::Hanning => (
                "Hanning",
                "A single raised cosine period that reaches zero on both sides. It is a good \
                 general-purpose window with moderate main lobe width and fast sidelobe \
                 roll-off.",
            ),
            WindowKind::Hamming => (
                "Hamming",
                "A raised cosine on a small pedestal, tuned to cancel the nearest sidelobe. \
                 It does not reach zero at the edges, so distant sidelobes decay slowly.",
            ),
            WindowKind::Blackman => (
                "Blackman",
                "A three-term cosine sum that reaches zero on both sides. Sidelobes are much \
                 lower than Hanning or Hamming at the cost of a wider main lobe.",
            ),
            WindowKind::BlackmanHarris => (
                "Blackman-Harris",
                "A four-term cosine sum with sidelobes below -90 dB. Use it when leakage from \
                 strong components must not mask weak ones.",
            ),
            WindowKind::FlatTop => (
                "Flat top",
                "A five-term cosine sum with a very flat main lobe, giving accurate amplitude \
                 readings for components between bins. Frequency resolution is poor and the \
                 coefficients dip slightly below zero.",
            ),
            WindowKind::Cosine => (
                "Cosine",
                "This window is simply a cosine function. It reaches zero on both sides and is \
                 similar to Blackman, Hamming, Hanning, and flat top windows, but probably \
                 should not be used in practice.",
            ),
            WindowKind::Tukey => (
                "Tukey",
                "A flat top with cosine tapers at both ends. Alpha is the fraction of the \
                 window inside the tapers: zero gives a rectangular window and one gives a \
                 Hanning window.",
            ),
            WindowKind::Kaiser => (
                "Kaiser",
                "A Bessel-function window whose beta trades main lobe width for sidelobe \
                 level. Beta zero is rectangular; beta near 8.6 resembles Blackman.",
            ),
        };
        WindowInfo { name, description }
    }

    /// Shape parameter metadata, for the parametric kinds only
    pub fn shape_parameter(self) -> Option<ShapeParameter> {
        match self {
            WindowKind::Tukey => Some(TUKEY_ALPHA),
            WindowKind::Kaiser => Some(KAISER_BETA),
            WindowKind::Welch => Some(WELCH_EXPONENT),
            WindowKind::Triangular => Some(TRIANGULAR_EXTENSION),
            _ => None,
        }
    }

    /// Resolve the parameter to use for this kind
    ///
    /// Parametric kinds fall back to their documented default; a value given
    /// to a kind without a parameter is rejected rather than ignored.
    pub fn resolve_parameter(self, parameter: Option<f64>) -> Result<Option<f64>, WindowError> {
        match (self.shape_parameter(), parameter) {
            (Some(shape), Some(value)) => shape.validate(self, value).map(Some),
            (Some(shape), None) => Ok(Some(shape.default)),
            (None, Some(value)) => Err(WindowError::UnexpectedParameter {
                kind: self.name(),
                value,
            }),
            (None, None) => Ok(None),
        }
    }

    /// Look up a kind by display name, identifier, or common alias
    ///
    /// Matching ignores case, spaces, hyphens and underscores.
    pub fn from_name(name: &str) -> Result<WindowKind, WindowError> {
        NAME_LOOKUP
            .get(&fold_name(name))
            .copied()
            .ok_or_else(|| WindowError::UnsupportedKind {
                name: name.to_string(),
            })
    }
}

/// Name and description of `kind`
pub fn describe(kind: WindowKind) -> WindowInfo {
    kind.info()
}

fn fold_name(name: &str) -> String {
    name.chars()
        .filter(|c| !matches!(c, ' ' | '-' | '_'))
        .flat_map(char::to_lowercase)
        .collect()
}

static NAME_LOOKUP: Lazy<HashMap<String, WindowKind>> = Lazy::new(|| {
    let mut lookup: HashMap<String, WindowKind> = WindowKind::ALL
        .iter()
        .map(|&kind| (fold_name(kind.name()), kind))
        .collect();
    // Debug names cover the identifiers ("FlatTop", "BlackmanHarris")
    for kind in WindowKind::ALL {
        lookup.insert(fold_name(&format!("{:?}", kind)), kind);
    }
    for (alias, kind) in [
        ("hann", WindowKind::Hanning),
        ("bartlett", WindowKind::Triangular),
        ("sine", WindowKind::Cosine),
        ("rect", WindowKind::Rectangular),
        ("boxcar", WindowKind::Rectangular),
    ] {
        lookup.insert(alias.to_string(), kind);
    }
    lookup
});

impl fmt::Display for WindowKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for WindowKind {
    type Err = WindowError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        WindowKind::from_name(s)
    }
}

/// A window request: kind, length, normalization, optional shape parameter
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WindowSpec {
    pub kind: WindowKind,
    pub size: usize,
    #[serde(default)]
    pub normalize: bool,
    #[serde(default)]
    pub parameter: Option<f64>,
}

impl WindowSpec {
    pub fn new(kind: WindowKind, size: usize) -> Self {
        Self {
            kind,
            size,
            normalize: false,
            parameter: None,
        }
    }

    pub fn normalized(mut self, normalize: bool) -> Self {
        self.normalize = normalize;
        self
    }

    pub fn with_parameter(mut self, parameter: f64) -> Self {
        self.parameter = Some(parameter);
        self
    }

    pub fn with_size(mut self, size: usize) -> Self {
        self.size = size;
        self
    }
}

/// Produce the coefficients described by `spec`
///
/// This is the single entry point for callers: it dispatches on the kind and
/// applies the default mean-gain normalization when requested.
pub fn create(spec: &WindowSpec) -> Result<Vec<f64>, WindowError> {
    create_with(spec, &MeanGain)
}

/// Like [`create`], with an explicit normalization policy
pub fn create_with(spec: &WindowSpec, normalizer: &dyn Normalizer) -> Result<Vec<f64>, WindowError> {
    let coefficients = generate(spec.kind, spec.size, spec.parameter)?;
    log::debug!(
        "[Window] Generated {} window: size={}, parameter={:?}, normalize={}",
        spec.kind,
        spec.size,
        spec.parameter,
        spec.normalize
    );

    if spec.normalize {
        normalizer.normalize(&coefficients)
    } else {
        Ok(coefficients)
    }
}

/// Generate many windows concurrently
///
/// Specs are split across scoped worker threads; the output order matches
/// the input order and each result equals a sequential [`create`] call.
pub fn create_batch(specs: &[WindowSpec]) -> Vec<Result<Vec<f64>, WindowError>> {
    if specs.is_empty() {
        return Vec::new();
    }

    let workers = thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
        .min(specs.len());
    let chunk_size = specs.len().div_ceil(workers);

    thread::scope(|scope| {
        let handles: Vec<_> = specs
            .chunks(chunk_size)
            .map(|chunk| scope.spawn(move || chunk.iter().map(create).collect::<Vec<_>>()))
            .collect();

        handles
            .into_iter()
            .flat_map(|handle| match handle.join() {
                Ok(results) => results,
                Err(panic) => std::panic::resume_unwind(panic),
            })
            .collect()
    })
}

/// Multiply a segment by window coefficients of exactly the same length
pub fn apply_window(samples: &[f64], coefficients: &[f64]) -> Result<Vec<f64>, WindowError> {
    if samples.len() != coefficients.len() {
        return Err(WindowError::LengthMismatch {
            expected: samples.len(),
            actual: coefficients.len(),
        });
    }

    Ok(samples
        .iter()
        .zip(coefficients)
        .map(|(&sample, &w)| sample * w)
        .collect())
}
