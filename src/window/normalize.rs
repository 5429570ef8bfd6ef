// Normalization policies for window coefficients
//
// Different window shapes have different areas and therefore attenuate a
// signal by different amounts. A normalizer rescales coefficients so that
// analyses windowed with different kinds are comparable. The policy sits
// behind a trait so it can change without touching the window formulas.

use crate::error::WindowError;

/// Divisors smaller than this are treated as zero
pub const DEGENERATE_DIVISOR_FLOOR: f64 = 1e-12;

/// Rescales a coefficient sequence by a policy-specific divisor
pub trait Normalizer: Send + Sync {
    /// The value every coefficient is divided by
    fn divisor(&self, coefficients: &[f64]) -> f64;

    /// Return a rescaled copy of `coefficients`
    ///
    /// # Errors
    /// `DegenerateNormalization` when the divisor is (near) zero or not finite,
    /// e.g. an all-zero window.
    fn normalize(&self, coefficients: &[f64]) -> Result<Vec<f64>, WindowError> {
        let divisor = checked_divisor(self.divisor(coefficients))?;
        Ok(coefficients.iter().map(|&w| w / divisor).collect())
    }

    /// Rescale `coefficients` in place
    ///
    /// On error the coefficients are left untouched.
    fn normalize_in_place(&self, coefficients: &mut [f64]) -> Result<(), WindowError> {
        let divisor = checked_divisor(self.divisor(coefficients))?;
        for w in coefficients.iter_mut() {
            *w /= divisor;
        }
        Ok(())
    }
}

fn checked_divisor(divisor: f64) -> Result<f64, WindowError> {
    if divisor.is_finite() && divisor.abs() >= DEGENERATE_DIVISOR_FLOOR {
        Ok(divisor)
    } else {
        log::debug!("[Normalizer] Rejecting degenerate divisor {}", divisor);
        Err(WindowError::DegenerateNormalization { divisor })
    }
}

/// Mean-gain normalization (the default)
///
/// Divides by the arithmetic mean so the window's mean gain is exactly 1.0,
/// equalizing the DC-gain contribution across kinds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MeanGain;

impl Normalizer for MeanGain {
    fn divisor(&self, coefficients: &[f64]) -> f64 {
        if coefficients.is_empty() {
            return 0.0;
        }
        coefficients.iter().sum::<f64>() / coefficients.len() as f64
    }
}

/// Unit-power normalization
///
/// Divides by the root mean square so the window's mean power is 1.0, which
/// equalizes noise-floor levels instead of tone amplitudes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UnitPower;

impl Normalizer for UnitPower {
    fn divisor(&self, coefficients: &[f64]) -> f64 {
        if coefficients.is_empty() {
            return 0.0;
        }
        let mean_square =
            coefficients.iter().map(|&w| w * w).sum::<f64>() / coefficients.len() as f64;
        mean_square.sqrt()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn mean(values: &[f64]) -> f64 {
        values.iter().sum::<f64>() / values.len() as f64
    }

    #[test]
    fn test_mean_gain_scales_to_unit_mean() {
        let normalized = MeanGain.normalize(&[0.0, 0.5, 1.0, 0.5, 0.0]).unwrap();
        assert_abs_diff_eq!(mean(&normalized), 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(normalized[2], 2.5, epsilon = 1e-12);
    }

    #[test]
    fn test_unit_power_scales_to_unit_mean_square() {
        let normalized = UnitPower.normalize(&[0.0, 0.5, 1.0, 0.5, 0.0]).unwrap();
        let mean_square = normalized.iter().map(|w| w * w).sum::<f64>() / 5.0;
        assert_abs_diff_eq!(mean_square, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_all_zero_window_is_rejected() {
        let zeros = [0.0; 8];
        assert_eq!(
            MeanGain.normalize(&zeros),
            Err(WindowError::DegenerateNormalization { divisor: 0.0 })
        );
        assert!(UnitPower.normalize(&zeros).is_err());
        assert!(MeanGain.normalize(&[]).is_err());
    }

    #[test]
    fn test_in_place_matches_pure_transform() {
        let window = [0.2, 0.7, 1.0, 0.7, 0.2];
        let pure = MeanGain.normalize(&window).unwrap();
        let mut in_place = window;
        MeanGain.normalize_in_place(&mut in_place).unwrap();
        assert_eq!(pure, in_place.to_vec());
    }

    #[test]
    fn test_in_place_leaves_input_untouched_on_error() {
        let mut window = [0.0, 0.0, f64::NAN];
        assert!(MeanGain.normalize_in_place(&mut window).is_err());
        assert_eq!(window[0], 0.0);
        assert!(window[2].is_nan());
    }
}
