//! Error type for the build and unpack pipelines.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors from building, unpacking or listing an archive.
#[derive(Debug, Error)]
pub enum Error {
    /// Envelope or compression error.
    #[error(transparent)]
    Archive(#[from] fflink_archive::Error),

    /// Asset list, codec or extraction error.
    #[error(transparent)]
    Assets(#[from] fflink_assets::Error),

    /// A pipeline file could not be read or written.
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The mod directory has no `zone_source/<name>.csv`.
    #[error("manifest not found: {}", .0.display())]
    MissingManifest(PathBuf),

    /// A path has no usable file name to derive an archive or manifest name from.
    #[error("cannot derive a name from {}", .0.display())]
    Unnamed(PathBuf),
}

impl Error {
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }
}

/// Result type for pipeline operations.
pub type Result<T> = std::result::Result<T, Error>;
