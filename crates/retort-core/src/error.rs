//! Error types for Retort.
//!
//! This module provides the [`MappingError`] type, raised by validators, the
//! object builder and record accessors. Every variant is fatal to the build
//! in progress; nothing is retried or downgraded.
//!
//! # Categories
//!
//! | `ErrorCategory` | Variants | Status |
//! |---|---|---|
//! | `Validation` | `Validation`, `TypeMismatch`, `DepthExceeded` | 422 |
//! | `Internal` | `UnrecognizedClass`, `Conversion` | 500 |
//!
//! Validation errors are caused by the client payload and should be reported
//! back to the caller. Internal errors mean the schema registry or a factory
//! is wired incorrectly.

use http::StatusCode;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Result type alias using [`MappingError`].
pub type MappingResult<T> = Result<T, MappingError>;

/// Categories of errors for classification and handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    /// The raw input does not satisfy the declared schema.
    Validation,
    /// The schema registry or a factory is misconfigured.
    Internal,
}

impl ErrorCategory {
    /// Returns the default HTTP status code for this error category.
    #[must_use]
    pub const fn default_status_code(&self) -> StatusCode {
        match self {
            Self::Validation => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// The wording used by a validator when it rejects a value.
///
/// Number rules say "invalid number", every other rule says "invalid value".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueKind {
    /// Rejected by a number rule.
    Number,
    /// Rejected by a string or object rule.
    Value,
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number => write!(f, "number"),
            Self::Value => write!(f, "value"),
        }
    }
}

/// Standard error type for Retort.
///
/// # Example
///
/// ```
/// use retort_core::{MappingError, ValueKind};
///
/// let err = MappingError::validation("price", "5", ValueKind::Number);
/// assert_eq!(err.to_string(), "'5' is an invalid number for price.");
/// ```
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MappingError {
    /// A validator rejected a raw value.
    #[error("'{value}' is an invalid {kind} for {field}.")]
    Validation {
        /// Name of the field being validated.
        field: String,
        /// The offending raw value, stringified.
        value: String,
        /// Which validator wording applies.
        kind: ValueKind,
    },

    /// A field declared as an array received something else.
    #[error("{field} is not an array.")]
    TypeMismatch {
        /// Name of the array field.
        field: String,
    },

    /// The target type is not part of the registered request-object family.
    #[error("Unrecognized object class: {type_name}.")]
    UnrecognizedClass {
        /// Name of the type that was requested.
        type_name: String,
    },

    /// Nested objects go deeper than the configured limit.
    #[error("{field} exceeds the maximum nesting depth of {max_depth}.")]
    DepthExceeded {
        /// The field at which the limit was hit.
        field: String,
        /// The configured limit.
        max_depth: usize,
    },

    /// A factory asked a record for a field in a shape it does not hold.
    #[error("{field} cannot be read as {expected}.")]
    Conversion {
        /// Name of the field being read.
        field: String,
        /// The Rust-side shape the factory expected.
        expected: &'static str,
    },
}

impl MappingError {
    /// Creates a validation failure.
    #[must_use]
    pub fn validation(field: impl Into<String>, value: impl Into<String>, kind: ValueKind) -> Self {
        Self::Validation {
            field: field.into(),
            value: value.into(),
            kind,
        }
    }

    /// Creates a type mismatch for an array field.
    #[must_use]
    pub fn type_mismatch(field: impl Into<String>) -> Self {
        Self::TypeMismatch {
            field: field.into(),
        }
    }

    /// Creates an unrecognized class error.
    #[must_use]
    pub fn unrecognized_class(type_name: impl Into<String>) -> Self {
        Self::UnrecognizedClass {
            type_name: type_name.into(),
        }
    }

    /// Creates a depth exceeded error.
    #[must_use]
    pub fn depth_exceeded(field: impl Into<String>, max_depth: usize) -> Self {
        Self::DepthExceeded {
            field: field.into(),
            max_depth,
        }
    }

    /// Creates a record conversion error.
    #[must_use]
    pub fn conversion(field: impl Into<String>, expected: &'static str) -> Self {
        Self::Conversion {
            field: field.into(),
            expected,
        }
    }

    /// Returns the error category.
    #[must_use]
    pub const fn category(&self) -> ErrorCategory {
        match self {
            Self::Validation { .. } | Self::TypeMismatch { .. } | Self::DepthExceeded { .. } => {
                ErrorCategory::Validation
            }
            Self::UnrecognizedClass { .. } | Self::Conversion { .. } => ErrorCategory::Internal,
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        self.category().default_status_code()
    }

    /// Returns the field the error is about, if any.
    #[must_use]
    pub fn field(&self) -> Option<&str> {
        match self {
            Self::Validation { field, .. }
            | Self::TypeMismatch { field }
            | Self::DepthExceeded { field, .. }
            | Self::Conversion { field, .. } => Some(field),
            Self::UnrecognizedClass { .. } => None,
        }
    }

    /// Converts this error to a serializable error envelope.
    #[must_use]
    pub fn to_envelope(&self) -> ErrorEnvelope {
        ErrorEnvelope {
            error: ErrorDetail {
                code: self.error_code().to_string(),
                message: self.to_string(),
                category: self.category(),
                field: self.field().map(ToString::to_string),
            },
        }
    }

    const fn error_code(&self) -> &'static str {
        match self {
            Self::Validation { .. } => "VALIDATION_ERROR",
            Self::TypeMismatch { .. } => "TYPE_MISMATCH",
            Self::UnrecognizedClass { .. } => "UNRECOGNIZED_CLASS",
            Self::DepthExceeded { .. } => "DEPTH_EXCEEDED",
            Self::Conversion { .. } => "CONVERSION_ERROR",
        }
    }
}

/// Serializable error envelope for HTTP responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorEnvelope {
    /// The error details.
    pub error: ErrorDetail,
}

/// Error detail within an envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorDetail {
    /// Machine-readable error code.
    pub code: String,
    /// Human-readable error message.
    pub message: String,
    /// Error category.
    pub category: ErrorCategory,
    /// The offending field, when known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_message_format() {
        let err = MappingError::validation("price", "5", ValueKind::Number);
        assert_eq!(err.to_string(), "'5' is an invalid number for price.");

        let err = MappingError::validation("name", "", ValueKind::Value);
        assert_eq!(err.to_string(), "'' is an invalid value for name.");
    }

    #[test]
    fn test_type_mismatch_message() {
        let err = MappingError::type_mismatch("pockets");
        assert_eq!(err.to_string(), "pockets is not an array.");
        assert_eq!(err.status_code(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[test]
    fn test_unrecognized_class_is_internal() {
        let err = MappingError::unrecognized_class("app::Unknown");
        assert_eq!(err.category(), ErrorCategory::Internal);
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(err.field().is_none());
    }

    #[test]
    fn test_error_envelope_serialization() {
        let err = MappingError::validation("price", "5", ValueKind::Number);
        let json = serde_json::to_string(&err.to_envelope()).expect("serialization should work");
        assert!(json.contains("\"code\":\"VALIDATION_ERROR\""));
        assert!(json.contains("\"field\":\"price\""));
        assert!(json.contains("\"category\":\"validation\""));
    }

    #[test]
    fn test_envelope_omits_missing_field() {
        let envelope = MappingError::unrecognized_class("X").to_envelope();
        let json = serde_json::to_value(&envelope).expect("serialization should work");
        assert!(json["error"].get("field").is_none());
    }
}
