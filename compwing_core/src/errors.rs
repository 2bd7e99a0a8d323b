//! # Error Types
//!
//! Structured error types for compwing_core. Lookups into the property
//! registry and the catalogs fail with a named variant so callers can tell
//! a typo in a theory key apart from a missing material.
//!
//! Numeric anomalies (infinity, NaN) coming out of the micromechanics
//! formulas are not errors and never produce a `CalcError`.
//!
//! ## Example
//!
//! ```rust
//! use compwing_core::errors::{CalcError, CalcResult};
//!
//! fn check_fraction(vf: f64) -> CalcResult<()> {
//!     if !(0.0..=1.0).contains(&vf) {
//!         return Err(CalcError::invalid_input("vf", vf.to_string(), "Must be within [0, 1]"));
//!     }
//!     Ok(())
//! }
//!
//! assert!(check_fraction(1.5).is_err());
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for compwing_core operations
pub type CalcResult<T> = Result<T, CalcError>;

/// Which side of the catalog a material lookup went to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MaterialKind {
    Fiber,
    Matrix,
}

impl std::fmt::Display for MaterialKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MaterialKind::Fiber => write!(f, "fiber"),
            MaterialKind::Matrix => write!(f, "matrix"),
        }
    }
}

/// Structured error type for calculation operations.
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "details")]
pub enum CalcError {
    /// Property key is not registered
    #[error("Unknown property: {property}")]
    UnknownProperty { property: String },

    /// Theory key is not registered under the given property
    #[error("Unknown theory for {property}: {theory}")]
    UnknownTheory { property: String, theory: String },

    /// Fiber or matrix not found in the material catalog
    #[error("Unknown {kind} material: {name}")]
    UnknownMaterial { kind: MaterialKind, name: String },

    /// Aircraft preset not found in the preset catalog
    #[error("Unknown aircraft preset: {name}")]
    UnknownPreset { name: String },

    /// An input value is invalid (duplicate key, malformed catalog, etc.)
    #[error("Invalid input for '{field}': {value} - {reason}")]
    InvalidInput {
        field: String,
        value: String,
        reason: String,
    },

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

    /// JSON/TOML serialization or deserialization error
    #[error("Serialization error: {reason}")]
    SerializationError { reason: String },

    /// Schema version mismatch
    #[error("Version mismatch: file version {file_version}, expected {expected_version}")]
    VersionMismatch {
        file_version: String,
        expected_version: String,
    },
}

impl CalcError {
    /// Create an UnknownProperty error
    pub fn unknown_property(property: impl Into<String>) -> Self {
        CalcError::UnknownProperty {
            property: property.into(),
        }
    }

    /// Create an UnknownTheory error
    pub fn unknown_theory(property: impl Into<String>, theory: impl Into<String>) -> Self {
        CalcError::UnknownTheory {
            property: property.into(),
            theory: theory.into(),
        }
    }

    /// Create an UnknownMaterial error for a fiber
    pub fn unknown_fiber(name: impl Into<String>) -> Self {
        CalcError::UnknownMaterial {
            kind: MaterialKind::Fiber,
            name: name.into(),
        }
    }

    /// Create an UnknownMaterial error for a matrix
    pub fn unknown_matrix(name: impl Into<String>) -> Self {
        CalcError::UnknownMaterial {
            kind: MaterialKind::Matrix,
            name: name.into(),
        }
    }

    /// Create an UnknownPreset error
    pub fn unknown_preset(name: impl Into<String>) -> Self {
        CalcError::UnknownPreset { name: name.into() }
    }

    /// Create an InvalidInput error
    pub fn invalid_input(field: impl Into<String>, value: impl Into<String>, reason: impl Into<String>) -> Self {
        CalcError::InvalidInput {
            field: field.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Create a FileError
    pub fn file_error(operation: impl Into<String>, path: impl Into<String>, reason: impl Into<String>) -> Self {
        CalcError::FileError {
            operation: operation.into(),
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Create a FileLocked error
    pub fn file_locked(path: impl Into<String>, locked_by: impl Into<String>, locked_at: impl Into<String>) -> Self {
        CalcError::FileLocked {
            path: path.into(),
            locked_by: locked_by.into(),
            locked_at: locked_at.into(),
        }
    }

    /// Create a SerializationError
    pub fn serialization(reason: impl Into<String>) -> Self {
        CalcError::SerializationError {
            reason: reason.into(),
        }
    }

    /// Check if this is a recoverable error (e.g., can retry)
    pub fn is_recoverable(&self) -> bool {
        matches!(self, CalcError::FileLocked { .. })
    }

    /// True for the lookup failures raised by the registry and catalogs
    pub fn is_lookup_error(&self) -> bool {
        matches!(
            self,
            CalcError::UnknownProperty { .. }
                | CalcError::UnknownTheory { .. }
                | CalcError::UnknownMaterial { .. }
                | CalcError::UnknownPreset { .. }
        )
    }

    /// Get a short error code for programmatic handling
    pub fn error_code(&self) -> &'static str {
        match self {
            CalcError::UnknownProperty { .. } => "UNKNOWN_PROPERTY",
            CalcError::UnknownTheory { .. } => "UNKNOWN_THEORY",
            CalcError::UnknownMaterial { .. } => "UNKNOWN_MATERIAL",
            CalcError::UnknownPreset { .. } => "UNKNOWN_PRESET",
            CalcError::InvalidInput { .. } => "INVALID_INPUT",
            CalcError::FileError { .. } => "FILE_ERROR",
            CalcError::FileLocked { .. } => "FILE_LOCKED",
            CalcError::SerializationError { .. } => "SERIALIZATION_ERROR",
            CalcError::VersionMismatch { .. } => "VERSION_MISMATCH",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_serialization() {
        let error = CalcError::unknown_theory("E1", "Voigt");
        let json = serde_json::to_string(&error).unwrap();
        assert!(json.contains("\"type\":\"UnknownTheory\""));
        let roundtrip: CalcError = serde_json::from_str(&json).unwrap();
        assert_eq!(error, roundtrip);
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(CalcError::unknown_property("E9").error_code(), "UNKNOWN_PROPERTY");
        assert_eq!(CalcError::unknown_fiber("T-1000").error_code(), "UNKNOWN_MATERIAL");
        assert_eq!(CalcError::unknown_preset("F-16").error_code(), "UNKNOWN_PRESET");
    }

    #[test]
    fn test_material_error_message() {
        let err = CalcError::unknown_matrix("Bakelite");
        assert_eq!(err.to_string(), "Unknown matrix material: Bakelite");
        assert!(err.is_lookup_error());
        assert!(!err.is_recoverable());
    }
}
