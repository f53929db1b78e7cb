//! Error types for asset list and payload codecs.

use std::io;
use std::path::PathBuf;

use fflink_archive::CompressionError;
use thiserror::Error;

/// Errors that can occur while loading, encoding, decoding or extracting assets.
#[derive(Debug, Error)]
pub enum Error {
    /// A source or output file could not be read or written.
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Fewer bytes remain than a field requires.
    #[error("truncated asset data: needed {needed} bytes but only {available} available")]
    Truncated { needed: usize, available: usize },

    /// An asset table entry points outside the asset list.
    #[error("asset {index} points at offset {offset:#x}, past the end of the asset list ({len} bytes)")]
    InvalidOffset { index: usize, offset: u32, len: usize },

    /// A string table header whose dimensions cannot describe any table.
    #[error("invalid string table '{name}': {columns} columns, {rows} rows")]
    InvalidTable { name: String, columns: u32, rows: u32 },

    /// A compressed raw file could not be inflated and is not stored raw either.
    #[error("failed to decompress raw file '{name}': {reason}")]
    DecompressionFailed { name: String, reason: String },

    /// A manifest names an asset type with no registered codec.
    #[error("unsupported asset type: {0}")]
    UnsupportedType(String),

    /// A text source file does not follow its grammar.
    #[error("{path}: {message}")]
    Grammar { path: String, message: String },

    /// A payload is too large for its 32-bit length field.
    #[error("'{name}' is {len} bytes, too large for an asset list")]
    Oversized { name: String, len: usize },

    /// An extracted name would land outside the output directory.
    #[error("refusing to write outside the output directory: {0}")]
    UnsafePath(String),

    /// Compression failed while encoding.
    #[error("{0}")]
    Compression(#[from] CompressionError),

    /// Common library error.
    #[error("{0}")]
    Common(fflink_common::Error),
}

impl Error {
    /// Wrap an I/O error with the path it concerns.
    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }
}

impl From<fflink_common::Error> for Error {
    fn from(err: fflink_common::Error) -> Self {
        match err {
            fflink_common::Error::UnexpectedEof { needed, available } => {
                Error::Truncated { needed, available }
            }
            fflink_common::Error::MissingNullTerminator => Error::Truncated {
                needed: 1,
                available: 0,
            },
            other => Error::Common(other),
        }
    }
}

/// Result type for asset operations.
pub type Result<T> = std::result::Result<T, Error>;
