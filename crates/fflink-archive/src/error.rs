//! Error types for the archive crate.

use std::io;

use thiserror::Error;

/// Errors raised by the compression adapter.
#[derive(Debug, Error)]
pub enum CompressionError {
    /// The DEFLATE encoder failed. Not recoverable.
    #[error("compressor failed: {0}")]
    Encoder(io::Error),

    /// The compressed stream is corrupt or ends early.
    #[error("inflate failed: {0}")]
    Inflate(io::Error),

    /// Inflating would produce more than the allowed number of bytes.
    #[error("decompressed output exceeds limit of {limit} bytes")]
    OutputTooLarge { limit: usize },
}

/// Errors that can occur when reading or writing fastfile envelopes.
#[derive(Debug, Error)]
pub enum Error {
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Common library error.
    #[error("{0}")]
    Common(#[from] fflink_common::Error),

    /// Not a fastfile.
    #[error("invalid fastfile magic: expected 'IWffu100', got {actual:?}")]
    InvalidMagic { actual: Vec<u8> },

    /// No zlib header anywhere in the file.
    #[error("no compressed stream found in archive")]
    NoCompressedStream,

    /// Compression or decompression failed.
    #[error("{0}")]
    Compression(#[from] CompressionError),
}

/// Result type for archive operations.
pub type Result<T> = std::result::Result<T, Error>;
