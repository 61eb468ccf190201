//! # Driver Errors

use thiserror::Error;

/// Result type for driver operations
pub type DriverResult<T> = Result<T, DriverError>;

/// Storage driver errors
#[derive(Debug, Clone, Error)]
pub enum DriverError {
    #[error("Path not found: {0}")]
    NotFound(String),

    #[error("Content at {0} is not valid UTF-8")]
    Encoding(String),

    #[error("I/O error: {0}")]
    Io(String),

    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Invalid driver config: {0}")]
    InvalidConfig(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl DriverError {
    /// Whether this error reports an absent path
    pub fn is_not_found(&self) -> bool {
        matches!(self, DriverError::NotFound(_))
    }
}

impl From<redis::RedisError> for DriverError {
    fn from(e: redis::RedisError) -> Self {
        if e.is_io_error() || e.is_connection_refusal() || e.is_connection_dropped() {
            DriverError::Connection(e.to_string())
        } else {
            DriverError::Io(e.to_string())
        }
    }
}
