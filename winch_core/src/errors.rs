//! # Error Types
//!
//! Structured errors for winch_core. The computation core itself never
//! fails on numeric input (bad values are sanitized to neutral defaults);
//! every variant here belongs to the boundaries around it: request
//! validation, persistence, and serialization.
//!
//! ## Example
//!
//! ```rust
//! use winch_core::errors::{WinchError, WinchResult};
//!
//! fn require_positive(depth_m: f64) -> WinchResult<()> {
//!     if depth_m <= 0.0 {
//!         return Err(WinchError::invalid_input(
//!             "operating_depth_m",
//!             depth_m.to_string(),
//!             "Operating depth must be positive",
//!         ));
//!     }
//!     Ok(())
//! }
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for winch_core operations
pub type WinchResult<T> = Result<T, WinchError>;

/// Structured error type for boundary and persistence operations.
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "details")]
pub enum WinchError {
    /// An input value is invalid (wrong type, out of range, non-numeric)
    #[error("Invalid input for '{field}': {value} - {reason}")]
    InvalidInput {
        field: String,
        value: String,
        reason: String,
    },

    /// A required field is missing from a request body
    #[error("Missing required field: {field}")]
    MissingField { field: String },

    /// A request body failed validation; carries one entry per bad field
    #[error("Request validation failed: {} field error(s)", errors.len())]
    ValidationFailed { errors: Vec<FieldError> },

    /// File I/O error
    #[error("File error: {operation} on '{path}' - {reason}")]
    FileError {
        operation: String,
        path: String,
        reason: String,
    },

    /// File is locked by another user/process
    #[error("File locked: '{path}' is locked by {locked_by} since {locked_at}")]
    FileLocked {
        path: String,
        locked_by: String,
        locked_at: String,
    },

    /// JSON serialization/deserialization error
    #[error("Serialization error: {reason}")]
    SerializationError { reason: String },

    /// Schema version mismatch
    #[error("Version mismatch: file version {file_version}, expected {expected_version}")]
    VersionMismatch {
        file_version: String,
        expected_version: String,
    },

    /// Generic internal error (should be rare)
    #[error("Internal error: {message}")]
    Internal { message: String },
}

/// One offending field in a rejected request body.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FieldError {
    /// Field name as it appears in the JSON body
    pub field: String,
    /// Why it was rejected
    pub reason: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, reason: impl Into<String>) -> Self {
        FieldError {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

impl WinchError {
    /// Create an InvalidInput error
    pub fn invalid_input(
        field: impl Into<String>,
        value: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        WinchError::InvalidInput {
            field: field.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Create a MissingField error
    pub fn missing_field(field: impl Into<String>) -> Self {
        WinchError::MissingField {
            field: field.into(),
        }
    }

    /// Create a FileError
    pub fn file_error(
        operation: impl Into<String>,
        path: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        WinchError::FileError {
            operation: operation.into(),
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Create a FileLocked error
    pub fn file_locked(
        path: impl Into<String>,
        locked_by: impl Into<String>,
        locked_at: impl Into<String>,
    ) -> Self {
        WinchError::FileLocked {
            path: path.into(),
            locked_by: locked_by.into(),
            locked_at: locked_at.into(),
        }
    }

    /// Check if this is a recoverable error (e.g., can retry)
    pub fn is_recoverable(&self) -> bool {
        matches!(self, WinchError::FileLocked { .. })
    }

    /// Get a short error code for programmatic handling
    pub fn error_code(&self) -> &'static str {
        match self {
            WinchError::InvalidInput { .. } => "INVALID_INPUT",
            WinchError::MissingField { .. } => "MISSING_FIELD",
            WinchError::ValidationFailed { .. } => "VALIDATION_FAILED",
            WinchError::FileError { .. } => "FILE_ERROR",
            WinchError::FileLocked { .. } => "FILE_LOCKED",
            WinchError::SerializationError { .. } => "SERIALIZATION_ERROR",
            WinchError::VersionMismatch { .. } => "VERSION_MISMATCH",
            WinchError::Internal { .. } => "INTERNAL_ERROR",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_serialization() {
        let error = WinchError::invalid_input("payload_kg", "-5.0", "Payload must be numeric");
        let json = serde_json::to_string(&error).unwrap();
        let roundtrip: WinchError = serde_json::from_str(&json).unwrap();
        assert_eq!(error, roundtrip);
    }

    #[test]
    fn test_validation_failed_lists_fields() {
        let error = WinchError::ValidationFailed {
            errors: vec![
                FieldError::new("cable_diameter_in", "missing"),
                FieldError::new("payload_kg", "not a number"),
            ],
        };
        assert_eq!(error.error_code(), "VALIDATION_FAILED");
        assert!(error.to_string().contains("2 field error(s)"));
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(WinchError::missing_field("test").error_code(), "MISSING_FIELD");
        assert!(WinchError::file_locked("a.wcp", "user", "now").is_recoverable());
    }
}
