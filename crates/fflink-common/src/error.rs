//! Error types for fflink-common.

use thiserror::Error;

/// Common error type for fflink operations.
#[derive(Debug, Error)]
pub enum Error {
    /// End of buffer reached while reading.
    #[error("unexpected end of buffer: needed {needed} bytes but only {available} available")]
    UnexpectedEof { needed: usize, available: usize },

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Missing null terminator in string.
    #[error("string missing null terminator")]
    MissingNullTerminator,
}

impl Error {
    /// Whether this error means the buffer ended before a declared field did.
    pub fn is_truncation(&self) -> bool {
        matches!(self, Error::UnexpectedEof { .. } | Error::MissingNullTerminator)
    }
}

/// Result type alias using the common Error type.
pub type Result<T> = std::result::Result<T, Error>;
