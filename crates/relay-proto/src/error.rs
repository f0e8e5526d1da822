//! Protocol error types.

use thiserror::Error;

/// Errors produced by the line codec.
#[derive(Debug, Error)]
pub enum ProtocolError {
    /// Underlying transport I/O failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A line exceeded the configured maximum length.
    #[error("line too long: {actual} bytes exceeds limit of {limit}")]
    LineTooLong {
        /// Observed length in bytes, including the terminator.
        actual: usize,
        /// Configured maximum.
        limit: usize,
    },

    /// A line contained bytes that are not valid UTF-8.
    #[error("invalid UTF-8 in line: {0}")]
    InvalidUtf8(#[from] std::string::FromUtf8Error),
}

/// Result alias for protocol operations.
pub type Result<T> = std::result::Result<T, ProtocolError>;
