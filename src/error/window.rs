// Window generation error types and constants

use crate::error::ErrorCode;
use log::error;
use std::fmt;

/// Window error code constants
///
/// Error code range: 2001-2006
pub struct WindowErrorCodes {}

impl WindowErrorCodes {
    /// Window name does not match any registered kind
    pub const UNSUPPORTED_KIND: i32 = 2001;

    /// Requested window size is below the minimum of one sample
    pub const INVALID_SIZE: i32 = 2002;

    /// Shape parameter is outside its documented range
    pub const PARAMETER_OUT_OF_RANGE: i32 = 2003;

    /// Shape parameter given to a kind that has none
    pub const UNEXPECTED_PARAMETER: i32 = 2004;

    /// Normalization divisor is zero or not finite
    pub const DEGENERATE_NORMALIZATION: i32 = 2005;

    /// Coefficients and samples differ in length
    pub const LENGTH_MISMATCH: i32 = 2006;
}

/// Log a window error with structured context
pub fn log_window_error(err: &WindowError, context: &str) {
    error!(
        "Window error in {}: code={}, component=WindowGenerator, message={}",
        context,
        err.code(),
        err.message()
    );
}

/// Window generation errors
///
/// Every variant is an invalid-argument outcome: generation is pure, so
/// retrying the same request reproduces the same error.
///
/// Error code ranges: 2001-2006
#[derive(Debug, Clone, PartialEq)]
pub enum WindowError {
    /// Window name does not match any registered kind
    UnsupportedKind { name: String },

    /// Window size must be at least 1
    InvalidSize { size: usize },

    /// Shape parameter outside `[min, max]` or not finite
    ParameterOutOfRange {
        kind: &'static str,
        parameter: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    /// Shape parameter supplied for a kind without one
    UnexpectedParameter { kind: &'static str, value: f64 },

    /// Normalization divisor is (near) zero or not finite
    DegenerateNormalization { divisor: f64 },

    /// Window length differs from the segment it is applied to
    LengthMismatch { expected: usize, actual: usize },
}

impl ErrorCode for WindowError {
    fn code(&self) -> i32 {
        match self {
            WindowError::UnsupportedKind { .. } => WindowErrorCodes::UNSUPPORTED_KIND,
            WindowError::InvalidSize { .. } => WindowErrorCodes::INVALID_SIZE,
            WindowError::ParameterOutOfRange { .. } => WindowErrorCodes::PARAMETER_OUT_OF_RANGE,
            WindowError::UnexpectedParameter { .. } => WindowErrorCodes::UNEXPECTED_PARAMETER,
            WindowError::DegenerateNormalization { .. } => {
                WindowErrorCodes::DEGENERATE_NORMALIZATION
            }
            WindowError::LengthMismatch { .. } => WindowErrorCodes::LENGTH_MISMATCH,
        }
    }

    fn message(&self) -> String {
        match self {
            WindowError::UnsupportedKind { name } => {
                format!("Unsupported window kind '{}'", name)
            }
            WindowError::InvalidSize { size } => {
                format!("Window size must be at least 1 (got {})", size)
            }
            WindowError::ParameterOutOfRange {
                kind,
                parameter,
                value,
                min,
                max,
            } => format!(
                "{} {} must be within [{}, {}] (got {})",
                kind, parameter, min, max, value
            ),
            WindowError::UnexpectedParameter { kind, value } => {
                format!("{} window takes no shape parameter (got {})", kind, value)
            }
            WindowError::DegenerateNormalization { divisor } => {
                format!(
                    "Cannot normalize window: divisor {} is zero or not finite",
                    divisor
                )
            }
            WindowError::LengthMismatch { expected, actual } => {
                format!(
                    "Window length {} does not match segment length {}",
                    actual, expected
                )
            }
        }
    }
}

impl fmt::Display for WindowError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "WindowError::{:?} (code {}): {}",
            self,
            self.code(),
            self.message()
        )
    }
}

impl std::error::Error for WindowError {}
