// Closed-form window formulas
//
// Every formula is evaluated over the first half of the window and mirrored
// onto the second half, so `w[i] == w[size - 1 - i]` holds exactly and both
// endpoints of edge-anchored windows take identical values.

use std::f64::consts::PI;

use super::WindowKind;
use crate::error::WindowError;

/// Hanning cosine-sum coefficients
const HANNING: [f64; 2] = [0.5, -0.5];

/// Hamming cosine-sum coefficients
const HAMMING: [f64; 2] = [0.54, -0.46];

/// Blackman cosine-sum coefficients (3-term)
const BLACKMAN: [f64; 3] = [0.42, -0.5, 0.08];

/// Blackman-Harris cosine-sum coefficients (4-term)
const BLACKMAN_HARRIS: [f64; 4] = [0.35875, -0.48829, 0.14128, -0.01168];

/// Flat top cosine-sum coefficients (5-term)
const FLAT_TOP: [f64; 5] = [
    0.21557895,
    -0.41663158,
    0.277263158,
    -0.083578947,
    0.006947368,
];

/// Maximum number of series terms for Bessel I0 convergence
const BESSEL_MAX_TERMS: usize = 500;
/// Relative convergence threshold for Bessel I0 series
const BESSEL_CONVERGENCE: f64 = 1e-17;

/// Generate raw (unnormalized) coefficients for `kind`
///
/// `parameter` is the shape parameter of parametric kinds; `None` selects the
/// documented default. A parameter for a non-parametric kind is rejected.
///
/// # Errors
/// * `InvalidSize` if `size == 0`
/// * `ParameterOutOfRange` / `UnexpectedParameter` for a bad shape parameter
pub fn generate(
    kind: WindowKind,
    size: usize,
    parameter: Option<f64>,
) -> Result<Vec<f64>, WindowError> {
    let parameter = kind.resolve_parameter(parameter)?;

    match size {
        0 => return Err(WindowError::InvalidSize { size }),
        1 => return Ok(vec![1.0]),
        _ => {}
    }

    let last = (size - 1) as f64;
    let shape = parameter.unwrap_or_default();

    let window = match kind {
        WindowKind::Rectangular => vec![1.0; size],
        WindowKind::Hanning => mirrored(size, |i| cosine_sum(&HANNING, i as f64 / last)),
        WindowKind::Hamming => mirrored(size, |i| cosine_sum(&HAMMING, i as f64 / last)),
        WindowKind::Blackman => mirrored(size, |i| cosine_sum(&BLACKMAN, i as f64 / last)),
        WindowKind::BlackmanHarris => {
            mirrored(size, |i| cosine_sum(&BLACKMAN_HARRIS, i as f64 / last))
        }
        WindowKind::FlatTop => mirrored(size, |i| cosine_sum(&FLAT_TOP, i as f64 / last)),
        WindowKind::Cosine => mirrored(size, |i| (i as f64 * PI / last).sin()),
        WindowKind::Triangular => {
            let half_base = (last + shape) / 2.0;
            mirrored(size, |i| 1.0 - ((i as f64 - last / 2.0) / half_base).abs())
        }
        WindowKind::Welch => mirrored(size, |i| {
            let x = 2.0 * i as f64 / last - 1.0;
            1.0 - x.abs().powf(shape)
        }),
        WindowKind::Tukey => {
            let taper = shape * last / 2.0;
            mirrored(size, |i| {
                let n = i as f64;
                if n < taper {
                    0.5 * (1.0 - (PI * n / taper).cos())
                } else {
                    1.0
                }
            })
        }
        WindowKind::Kaiser => {
            let denom = bessel_i0(shape);
            mirrored(size, |i| {
                let x = 2.0 * i as f64 / last - 1.0;
                bessel_i0(shape * (1.0 - x * x).max(0.0).sqrt()) / denom
            })
        }
    };

    Ok(window)
}

/// Evaluate `f` on the first half and mirror it onto the second half
fn mirrored(size: usize, f: impl Fn(usize) -> f64) -> Vec<f64> {
    let mut window = vec![0.0; size];
    for i in 0..size.div_ceil(2) {
        let value = f(i);
        window[i] = value;
        window[size - 1 - i] = value;
    }
    window
}

/// Generalized cosine window: `sum(a[k] * cos(2 * pi * k * t))`
#[inline]
fn cosine_sum(coefficients: &[f64], t: f64) -> f64 {
    coefficients
        .iter()
        .enumerate()
        .map(|(k, &a)| a * (2.0 * PI * k as f64 * t).cos())
        .sum()
}

/// Zeroth-order modified Bessel function of the first kind.
/// Computed via series expansion.
#[inline]
fn bessel_i0(x: f64) -> f64 {
    let mut sum = 1.0;
    let mut term = 1.0;
    let x_half = x / 2.0;
    for k in 1..BESSEL_MAX_TERMS {
        term *= (x_half / k as f64) * (x_half / k as f64);
        sum += term;
        if term < BESSEL_CONVERGENCE * sum {
            break;
        }
    }
    sum
}
