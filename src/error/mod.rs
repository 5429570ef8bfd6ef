// Error types for the spectral pre-processing crate
//
// This module defines custom error types for window generation, analysis, and
// persistence, providing structured error handling with stable error codes.
//
// Window and analysis errors are precondition violations (caller bugs);
// persistence errors are environmental and are reported as a save outcome.

mod analysis;
mod persistence;
mod window;

pub use analysis::{log_analysis_error, AnalysisError, AnalysisErrorCodes};
pub use persistence::{log_persistence_error, PersistenceError, PersistenceErrorCodes};
pub use window::{log_window_error, WindowError, WindowErrorCodes};

/// Error codes for structured error reporting
///
/// This trait provides a standard way to get error codes and messages
/// from custom error types, so callers can tell precondition violations
/// apart from environmental failures without matching on every variant.
pub trait ErrorCode {
    /// Get the numeric error code
    fn code(&self) -> i32;

    /// Get the human-readable error message
    fn message(&self) -> String;
}
