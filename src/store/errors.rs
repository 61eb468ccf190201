//! # Record Store Errors
//!
//! Every failure of a store operation surfaces as one [`StoreError`]. Driver
//! and validator failures met while writing or reading a record are wrapped
//! with the `type/name` of that record; they never escape in raw form.

use thiserror::Error;

use crate::driver::DriverError;
use crate::schema::ValidationError;

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Why a stored record could not be accepted on read
#[derive(Debug, Error)]
pub enum CorruptionCause {
    #[error("stored content is not valid JSON: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("stored content violates schema: {0}")]
    Invalid(#[from] ValidationError),
}

/// Record store errors
#[derive(Debug, Error)]
pub enum StoreError {
    /// Call arguments do not have the required shape
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Schema \"{0}\" already registered")]
    DuplicateSchema(String),

    #[error("Schema \"{0}\" not found")]
    SchemaNotFound(String),

    #[error("Record \"{0}\" already exists")]
    AlreadyExists(String),

    #[error("Record \"{0}\" not found")]
    NotFound(String),

    /// Payload rejected by the type's schema before writing
    #[error("Failed to write record \"{record}\": {source}")]
    ValidationFailed {
        record: String,
        source: ValidationError,
    },

    /// Stored payload unreadable or no longer valid for the type's schema
    #[error("Failed to read record \"{record}\": {source}")]
    CorruptRecord {
        record: String,
        source: CorruptionCause,
    },

    #[error("Failed to encode record \"{record}\": {source}")]
    Serialization {
        record: String,
        source: serde_json::Error,
    },

    #[error("Failed to write record \"{record}\": {source}")]
    WriteFailed { record: String, source: DriverError },

    #[error("Failed to read record \"{record}\": {source}")]
    ReadFailed { record: String, source: DriverError },

    /// Driver failure on an operation that does not wrap it
    #[error(transparent)]
    Driver(#[from] DriverError),
}

impl StoreError {
    /// Stable error code for machine consumers
    pub fn code(&self) -> &'static str {
        match self {
            StoreError::InvalidArgument(_) => "STORE_INVALID_ARGUMENT",
            StoreError::DuplicateSchema(_) => "STORE_DUPLICATE_SCHEMA",
            StoreError::SchemaNotFound(_) => "STORE_SCHEMA_NOT_FOUND",
            StoreError::AlreadyExists(_) => "STORE_ALREADY_EXISTS",
            StoreError::NotFound(_) => "STORE_NOT_FOUND",
            StoreError::ValidationFailed { .. } => "STORE_VALIDATION_FAILED",
            StoreError::CorruptRecord { .. } => "STORE_CORRUPT_RECORD",
            StoreError::Serialization { .. } => "STORE_SERIALIZATION",
            StoreError::WriteFailed { .. } => "STORE_WRITE_FAILED",
            StoreError::ReadFailed { .. } => "STORE_READ_FAILED",
            StoreError::Driver(_) => "STORE_DRIVER_ERROR",
        }
    }

    /// Validation details, for `ValidationFailed` and schema-invalid
    /// `CorruptRecord` errors
    pub fn validation(&self) -> Option<&ValidationError> {
        match self {
            StoreError::ValidationFailed { source, .. } => Some(source),
            StoreError::CorruptRecord {
                source: CorruptionCause::Invalid(source),
                ..
            } => Some(source),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::Violation;
    use std::error::Error;

    #[test]
    fn test_codes_are_distinct() {
        let errors = [
            StoreError::InvalidArgument("x".into()),
            StoreError::DuplicateSchema("user".into()),
            StoreError::SchemaNotFound("user".into()),
            StoreError::AlreadyExists("user/alice".into()),
            StoreError::NotFound("user/alice".into()),
            StoreError::Driver(DriverError::Io("disk".into())),
        ];
        let mut codes: Vec<_> = errors.iter().map(|e| e.code()).collect();
        codes.sort();
        codes.dedup();
        assert_eq!(codes.len(), errors.len());
    }

    #[test]
    fn test_validation_failure_keeps_cause() {
        let err = StoreError::ValidationFailed {
            record: "user/bob".into(),
            source: ValidationError::single(Violation::missing_field("age")),
        };

        let display = err.to_string();
        assert!(display.contains("user/bob"));
        assert!(display.contains("age"));
        assert!(err.source().is_some());
        assert_eq!(err.validation().unwrap().violations().len(), 1);
    }

    #[test]
    fn test_corrupt_record_display() {
        let cause = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        let err = StoreError::CorruptRecord {
            record: "user/alice".into(),
            source: cause.into(),
        };
        assert!(err.to_string().contains("not valid JSON"));
        assert!(err.validation().is_none());
    }

    #[test]
    fn test_driver_error_is_transparent() {
        let err = StoreError::from(DriverError::Connection("refused".into()));
        assert_eq!(err.to_string(), "Connection error: refused");
    }
}
