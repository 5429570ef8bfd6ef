// Persistence error types and constants

use crate::error::ErrorCode;
use log::error;
use std::fmt;
use std::io;

/// Persistence error code constants
///
/// Error code range: 4001-4003
pub struct PersistenceErrorCodes {}

impl PersistenceErrorCodes {
    /// Permission denied while creating or writing the file
    pub const PERMISSION_DENIED: i32 = 4001;

    /// Target directory or file could not be found
    pub const NOT_FOUND: i32 = 4002;

    /// Any other I/O failure
    pub const IO: i32 = 4003;
}

/// Log a persistence error with structured context
///
/// Persistence failures never abort analysis, so this is the only place they
/// surface besides the returned save outcome.
pub fn log_persistence_error(err: &PersistenceError, context: &str) {
    error!(
        "Persistence error in {}: code={}, component=Exporter, message={}",
        context,
        err.code(),
        err.message()
    );
}

/// Persistence errors (environmental failures)
///
/// Error code ranges: 4001-4003
#[derive(Debug, Clone, PartialEq)]
pub enum PersistenceError {
    /// Permission denied
    PermissionDenied { details: String },

    /// Path not found
    NotFound { details: String },

    /// Other I/O failure
    Io { details: String },
}

impl ErrorCode for PersistenceError {
    fn code(&self) -> i32 {
        match self {
            PersistenceError::PermissionDenied { .. } => PersistenceErrorCodes::PERMISSION_DENIED,
            PersistenceError::NotFound { .. } => PersistenceErrorCodes::NOT_FOUND,
            PersistenceError::Io { .. } => PersistenceErrorCodes::IO,
        }
    }

    fn message(&self) -> String {
        match self {
            PersistenceError::PermissionDenied { details } => {
                format!("Permission denied while saving data: {}", details)
            }
            PersistenceError::NotFound { details } => {
                format!("Path not found while saving data: {}", details)
            }
            PersistenceError::Io { details } => format!("Error saving data: {}", details),
        }
    }
}

impl fmt::Display for PersistenceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "PersistenceError::{:?} (code {}): {}",
            self,
            self.code(),
            self.message()
        )
    }
}

impl std::error::Error for PersistenceError {}

impl From<io::Error> for PersistenceError {
    fn from(err: io::Error) -> Self {
        let details = err.to_string();
        match err.kind() {
            io::ErrorKind::PermissionDenied => PersistenceError::PermissionDenied { details },
            io::ErrorKind::NotFound => PersistenceError::NotFound { details },
            _ => PersistenceError::Io { details },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_io_error_maps_kind() {
        let err: PersistenceError = io::Error::new(io::ErrorKind::NotFound, "missing").into();
        assert_eq!(err.code(), PersistenceErrorCodes::NOT_FOUND);

        let err: PersistenceError =
            io::Error::new(io::ErrorKind::PermissionDenied, "read-only").into();
        assert_eq!(err.code(), PersistenceErrorCodes::PERMISSION_DENIED);

        let err: PersistenceError = io::Error::other("disk full").into();
        match err {
            PersistenceError::Io { details } => assert!(details.contains("disk full")),
            other => panic!("Expected Io, got {:?}", other),
        }
    }

    #[test]
    fn test_persistence_error_display() {
        let err = PersistenceError::Io {
            details: "boom".to_string(),
        };
        let display = format!("{}", err);
        assert!(display.contains("PersistenceError"));
        assert!(display.contains("4003"));
        assert!(display.contains("boom"));
    }
}
